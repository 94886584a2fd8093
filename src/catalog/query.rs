//! Query engine over the catalog.
//!
//! Every function here is pure: it borrows products from the store and
//! returns references or derived values. "Not found" is reported as `None`.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{
    Availability, AvailabilityStatus, Category, FacetCount, Facets, Page, PageRequest,
    PaginationMeta, PriceRange, Product, ProductFilter, SortBy, SortOrder,
};

/// Relevance weight of a name match
const NAME_WEIGHT: u8 = 2;

/// Relevance weight of a description match
const DESCRIPTION_WEIGHT: u8 = 1;

impl ProductFilter {
    /// Whether a product passes every predicate of this filter
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if !product.belongs_to(category) {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            if product.brand.to_lowercase() != brand.to_lowercase() {
                return false;
            }
        }
        if self.in_stock == Some(true) && !product.in_stock {
            return false;
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }
}

/// Keep the products that pass `filter`, preserving their order
pub fn filter_products<'a, I>(products: I, filter: &ProductFilter) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    products.into_iter().filter(|p| filter.matches(p)).collect()
}

/// Ascending comparison of two products on one key
pub fn compare_by(a: &Product, b: &Product, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortBy::Price => a.price.total_cmp(&b.price),
        SortBy::Rating => a.rating.total_cmp(&b.rating),
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// Stable in-place sort; descending order flips the comparison, not the
/// sequence, so ties keep their relative order in both directions.
pub fn sort_products(products: &mut [&Product], sort_by: SortBy, order: SortOrder) {
    products.sort_by(|a, b| order.apply(compare_by(a, b, sort_by)));
}

/// Relevance of a product for an already lower-cased, non-empty needle
pub fn relevance(product: &Product, needle: &str) -> u8 {
    let mut score = 0;
    if product.name.to_lowercase().contains(needle) {
        score += NAME_WEIGHT;
    }
    if product.description.to_lowercase().contains(needle) {
        score += DESCRIPTION_WEIGHT;
    }
    score
}

fn text_matches(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Free-text search over name, description and tags
///
/// An empty query keeps every product in its original order. Otherwise the
/// matches are ranked by relevance, highest first, with `id` as tie-break.
pub fn search_products<'a, I>(products: I, query: &str) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.into_iter().collect();
    }

    let mut scored: Vec<(u8, &Product)> = products
        .into_iter()
        .filter(|p| text_matches(p, &needle))
        .map(|p| (relevance(p, &needle), p))
        .collect();
    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| a.id.cmp(&b.id)));
    scored.into_iter().map(|(_, p)| p).collect()
}

fn count_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<FacetCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut facets: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect();
    facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    facets
}

/// Category and brand facets over a result set
pub fn facets(products: &[&Product]) -> Facets {
    Facets {
        categories: count_values(products.iter().map(|p| p.category.as_str())),
        brands: count_values(products.iter().map(|p| p.brand.as_str())),
    }
}

/// Slice one page out of an ordered result set
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let pagination = PaginationMeta::new(request, items.len());
    let items = items
        .iter()
        .skip(request.offset())
        .take(request.limit() as usize)
        .cloned()
        .collect();
    Page { items, pagination }
}

fn rank_by<'a>(products: &mut [&'a Product], key: impl Fn(&Product) -> f64) {
    products.sort_by(|a, b| key(*b).total_cmp(&key(*a)).then_with(|| a.id.cmp(&b.id)));
}

/// Products related to `id` by category or brand, best rated first
///
/// Returns `None` when `id` does not resolve.
pub fn recommendations<'a>(
    products: &'a [Product],
    id: &str,
    limit: usize,
) -> Option<Vec<&'a Product>> {
    let target = products.iter().find(|p| p.id == id)?;
    let mut related: Vec<&Product> = products
        .iter()
        .filter(|p| p.id != target.id)
        .filter(|p| p.category == target.category || p.brand == target.brand)
        .collect();
    rank_by(&mut related, |p| p.rating);
    related.truncate(limit);
    Some(related)
}

/// Well-rated products ranked by `rating * review_count`
pub fn popular<'a>(
    products: &'a [Product],
    category: Option<&str>,
    min_rating: f64,
    limit: usize,
) -> Vec<&'a Product> {
    let mut candidates: Vec<&Product> = products
        .iter()
        .filter(|p| p.rating >= min_rating)
        .filter(|p| category.map_or(true, |c| p.belongs_to(c)))
        .collect();
    rank_by(&mut candidates, Product::popularity);
    candidates.truncate(limit);
    candidates
}

/// Classify stock: above `limited_threshold` units is in stock, any lower
/// positive stock is limited.
pub fn availability(product: &Product, limited_threshold: u32) -> Availability {
    let status = if !product.in_stock {
        AvailabilityStatus::OutOfStock
    } else if product.stock_quantity > limited_threshold {
        AvailabilityStatus::InStock
    } else {
        AvailabilityStatus::LimitedStock
    };
    Availability {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        in_stock: product.in_stock,
        stock_quantity: product.stock_quantity,
        status,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price statistics of a category; `None` when it has no products
pub fn price_range(products: &[Product], category_id: &str) -> Option<PriceRange> {
    let prices: Vec<&Product> = products.iter().filter(|p| p.belongs_to(category_id)).collect();
    let first = prices.first()?;

    let (min, max, sum) = prices.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), p| (min.min(p.price), max.max(p.price), sum + p.price),
    );

    Some(PriceRange {
        category_id: category_id.to_string(),
        min,
        max,
        average: round_cents(sum / prices.len() as f64),
        count: prices.len(),
        currency: first.currency.clone(),
    })
}

/// Number of products classified under `category_id`
pub fn product_count(products: &[Product], category_id: &str) -> usize {
    products.iter().filter(|p| p.belongs_to(category_id)).count()
}

/// Copy a category subtree with `product_count` filled in on every node
pub fn with_product_counts(category: &Category, products: &[Product]) -> Category {
    Category {
        product_count: Some(product_count(products, &category.id)),
        children: category
            .children
            .iter()
            .map(|child| with_product_counts(child, products))
            .collect(),
        ..category.clone()
    }
}

//! Read access to the catalog store.
//!
//! Repositories answer with `Option` for absence and never fail; turning
//! absence into an error is the service layer's job.

use std::sync::Arc;

use crate::catalog::{query, CatalogStore};
use crate::models::{
    Availability, Category, Facets, Page, PageRequest, PopularQuery, PriceRange, Product,
    ProductQuery, ProductSearch,
};

/// A page of search matches plus facets over every match
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub page: Page<Product>,
    pub facets: Facets,
}

pub trait ProductRepository: Send + Sync {
    fn list(&self, query: &ProductQuery) -> Page<Product>;

    fn search(&self, search: &ProductSearch) -> SearchOutcome;

    fn find_by_id(&self, id: &str) -> Option<Product>;

    fn recommendations(&self, id: &str, limit: usize) -> Option<Vec<Product>>;

    fn availability(&self, id: &str) -> Option<Availability>;

    fn popular(&self, query: &PopularQuery) -> Vec<Product>;
}

pub trait CategoryRepository: Send + Sync {
    /// Roots, or the children of `parent_id`; `None` when the parent is unknown
    fn list(&self, parent_id: Option<&str>, include_product_count: bool) -> Option<Vec<Category>>;

    fn find_by_id(&self, id: &str) -> Option<Category>;

    fn products(&self, id: &str, page: PageRequest) -> Page<Product>;

    fn price_range(&self, id: &str) -> Option<PriceRange>;
}

fn owned(products: Vec<&Product>) -> Vec<Product> {
    products.into_iter().cloned().collect()
}

pub struct InMemoryProductRepository {
    store: Arc<CatalogStore>,
    limited_stock_threshold: u32,
}

impl InMemoryProductRepository {
    pub fn new(store: Arc<CatalogStore>, limited_stock_threshold: u32) -> Self {
        Self {
            store,
            limited_stock_threshold,
        }
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn list(&self, q: &ProductQuery) -> Page<Product> {
        let mut matches = query::filter_products(self.store.products(), &q.filter);
        query::sort_products(&mut matches, q.sort_by, q.sort_order);
        let page = query::paginate(&matches, q.page);
        Page {
            items: page.items.into_iter().cloned().collect(),
            pagination: page.pagination,
        }
    }

    fn search(&self, search: &ProductSearch) -> SearchOutcome {
        let matches = query::search_products(self.store.products(), &search.query);
        let matches = query::filter_products(matches, &search.filter);
        let facets = query::facets(&matches);
        let page = query::paginate(&matches, search.page);
        SearchOutcome {
            page: Page {
                items: page.items.into_iter().cloned().collect(),
                pagination: page.pagination,
            },
            facets,
        }
    }

    fn find_by_id(&self, id: &str) -> Option<Product> {
        self.store.product(id).cloned()
    }

    fn recommendations(&self, id: &str, limit: usize) -> Option<Vec<Product>> {
        query::recommendations(self.store.products(), id, limit).map(owned)
    }

    fn availability(&self, id: &str) -> Option<Availability> {
        self.store
            .product(id)
            .map(|p| query::availability(p, self.limited_stock_threshold))
    }

    fn popular(&self, q: &PopularQuery) -> Vec<Product> {
        owned(query::popular(
            self.store.products(),
            q.category.as_deref(),
            q.min_rating,
            q.limit,
        ))
    }
}

pub struct InMemoryCategoryRepository {
    store: Arc<CatalogStore>,
}

impl InMemoryCategoryRepository {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    fn counted(&self, category: &Category, include_product_count: bool) -> Category {
        if include_product_count {
            query::with_product_counts(category, self.store.products())
        } else {
            category.clone()
        }
    }
}

impl CategoryRepository for InMemoryCategoryRepository {
    fn list(&self, parent_id: Option<&str>, include_product_count: bool) -> Option<Vec<Category>> {
        let level = match parent_id {
            Some(parent) => &self.store.category(parent)?.children,
            None => self.store.categories(),
        };
        Some(
            level
                .iter()
                .map(|c| self.counted(c, include_product_count))
                .collect(),
        )
    }

    fn find_by_id(&self, id: &str) -> Option<Category> {
        self.store
            .category(id)
            .map(|c| query::with_product_counts(c, self.store.products()))
    }

    fn products(&self, id: &str, page: PageRequest) -> Page<Product> {
        let members: Vec<&Product> = self
            .store
            .products()
            .iter()
            .filter(|p| p.belongs_to(id))
            .collect();
        let page = query::paginate(&members, page);
        Page {
            items: page.items.into_iter().cloned().collect(),
            pagination: page.pagination,
        }
    }

    fn price_range(&self, id: &str) -> Option<PriceRange> {
        query::price_range(self.store.products(), id)
    }
}

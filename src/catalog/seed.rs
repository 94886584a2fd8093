//! Built-in sample catalog.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Category, Product, ProductBuilder};

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

pub(crate) fn categories() -> Vec<Category> {
    vec![
        Category::new(
            "electronics",
            "Electronics",
            "Phones, computers, audio and wearable devices",
        )
        .with_child(Category::new(
            "smartphones",
            "Smartphones",
            "Mobile phones and accessories",
        ))
        .with_child(Category::new(
            "laptops",
            "Laptops",
            "Notebooks and ultrabooks",
        ))
        .with_child(Category::new(
            "audio",
            "Audio",
            "Headphones, earbuds and speakers",
        ))
        .with_child(Category::new(
            "wearables",
            "Wearables",
            "Smartwatches and fitness trackers",
        )),
        Category::new("clothing", "Clothing", "Apparel for every season")
            .with_child(Category::new(
                "outerwear",
                "Outerwear",
                "Jackets and insulated layers",
            ))
            .with_child(Category::new(
                "footwear",
                "Footwear",
                "Running and everyday shoes",
            )),
        Category::new("home-kitchen", "Home & Kitchen", "Appliances and furniture")
            .with_child(Category::new(
                "kitchen-appliances",
                "Kitchen Appliances",
                "Mixers, cookers and countertop appliances",
            ))
            .with_child(Category::new(
                "furniture",
                "Furniture",
                "Office and living room furniture",
            )),
        Category::new("books", "Books", "Printed and digital books").with_child(Category::new(
            "programming",
            "Programming",
            "Software engineering and programming languages",
        )),
    ]
}

pub(crate) fn products() -> Vec<Product> {
    vec![
        ProductBuilder::new("iphone-15-pro", "iPhone 15 Pro", "Apple", "electronics")
            .sku("APL-IP15P-128")
            .subcategory("smartphones")
            .description("Titanium smartphone with the A17 Pro chip and a 48MP camera system")
            .tags(["smartphone", "ios", "5g", "camera"])
            .price(999.0)
            .stock(45)
            .rating(4.8, 2847)
            .attribute("storage", "128GB")
            .attribute("color", "Natural Titanium")
            .attribute("screenSize", 6.1)
            .timestamps(day(2023, 9, 22), day(2024, 3, 1))
            .build(),
        ProductBuilder::new(
            "galaxy-s24-ultra",
            "Galaxy S24 Ultra",
            "Samsung",
            "electronics",
        )
        .sku("SMS-S24U-256")
        .subcategory("smartphones")
        .description("Android flagship with a built-in S Pen and 200MP camera")
        .tags(["smartphone", "android", "5g", "stylus"])
        .price(1199.0)
        .stock(8)
        .rating(4.7, 1923)
        .attribute("storage", "256GB")
        .attribute("screenSize", 6.8)
        .timestamps(day(2024, 1, 31), day(2024, 4, 12))
        .build(),
        ProductBuilder::new("pixel-8-pro", "Pixel 8 Pro", "Google", "electronics")
            .sku("GGL-PX8P-128")
            .subcategory("smartphones")
            .description("Android phone with Tensor G3 and seven years of updates")
            .tags(["smartphone", "android", "5g"])
            .price(899.0)
            .stock(0)
            .rating(4.6, 1204)
            .attribute("storage", "128GB")
            .timestamps(day(2023, 10, 12), day(2024, 2, 20))
            .build(),
        ProductBuilder::new(
            "macbook-pro-14",
            "MacBook Pro 14-inch",
            "Apple",
            "electronics",
        )
        .sku("APL-MBP14-M3")
        .subcategory("laptops")
        .description("Pro laptop with the M3 chip and a Liquid Retina XDR display")
        .tags(["laptop", "macos", "m3"])
        .price(1599.0)
        .stock(23)
        .rating(4.9, 1532)
        .attribute("memory", "16GB")
        .attribute("storage", "512GB")
        .timestamps(day(2023, 11, 7), day(2024, 1, 10))
        .build(),
        ProductBuilder::new("dell-xps-15", "XPS 15", "Dell", "electronics")
            .sku("DEL-XPS15-9530")
            .subcategory("laptops")
            .description("15-inch Windows laptop with an OLED display option")
            .tags(["laptop", "windows", "oled"])
            .price(1499.0)
            .stock(12)
            .rating(4.5, 876)
            .attribute("memory", "32GB")
            .timestamps(day(2023, 5, 2), day(2023, 12, 1))
            .build(),
        ProductBuilder::new("airpods-pro-2", "AirPods Pro (2nd generation)", "Apple", "electronics")
            .sku("APL-APP2-USBC")
            .subcategory("audio")
            .description("Wireless earbuds with active noise cancellation and USB-C charging")
            .tags(["earbuds", "wireless", "noise-cancelling"])
            .price(249.0)
            .stock(150)
            .rating(4.7, 5120)
            .attribute("wireless", true)
            .timestamps(day(2023, 9, 22), day(2023, 9, 22))
            .build(),
        ProductBuilder::new("sony-wh-1000xm5", "WH-1000XM5", "Sony", "electronics")
            .sku("SNY-WH1000XM5")
            .subcategory("audio")
            .description("Over-ear headphones with industry leading noise cancelling")
            .tags(["headphones", "wireless", "noise-cancelling"])
            .price(399.0)
            .stock(5)
            .rating(4.8, 3310)
            .attribute("wireless", true)
            .attribute("batteryHours", 30.0)
            .timestamps(day(2022, 5, 20), day(2024, 2, 2))
            .build(),
        ProductBuilder::new(
            "apple-watch-series-9",
            "Apple Watch Series 9",
            "Apple",
            "electronics",
        )
        .sku("APL-AW9-45")
        .subcategory("wearables")
        .description("Smartwatch with double tap gesture and a brighter display")
        .tags(["smartwatch", "fitness", "health"])
        .price(399.0)
        .stock(30)
        .rating(4.6, 2101)
        .attribute("caseSize", "45mm")
        .timestamps(day(2023, 9, 22), day(2024, 1, 5))
        .build(),
        ProductBuilder::new(
            "patagonia-nano-puff",
            "Nano Puff Jacket",
            "Patagonia",
            "clothing",
        )
        .sku("PTG-NANO-M")
        .subcategory("outerwear")
        .description("Lightweight insulated jacket made with recycled materials")
        .tags(["jacket", "insulated", "recycled"])
        .price(239.0)
        .stock(18)
        .rating(4.7, 640)
        .attribute("size", "M")
        .timestamps(day(2023, 8, 15), day(2023, 10, 1))
        .build(),
        ProductBuilder::new(
            "north-face-denali",
            "Denali Fleece Jacket",
            "The North Face",
            "clothing",
        )
        .sku("TNF-DENALI-L")
        .subcategory("outerwear")
        .description("Classic recycled fleece jacket with reinforced shoulders")
        .tags(["jacket", "fleece"])
        .price(179.0)
        .stock(0)
        .rating(4.4, 410)
        .attribute("size", "L")
        .timestamps(day(2023, 7, 1), day(2023, 7, 1))
        .build(),
        ProductBuilder::new("nike-pegasus-40", "Air Zoom Pegasus 40", "Nike", "clothing")
            .sku("NKE-PEG40-10")
            .subcategory("footwear")
            .description("Responsive daily running shoe")
            .tags(["running", "shoes"])
            .price(130.0)
            .stock(60)
            .rating(4.5, 2240)
            .attribute("size", 10.0)
            .timestamps(day(2023, 6, 1), day(2023, 11, 20))
            .build(),
        ProductBuilder::new("adidas-ultraboost", "Ultraboost Light", "Adidas", "clothing")
            .sku("ADS-UBL-9")
            .subcategory("footwear")
            .description("Lightweight running shoe with Boost cushioning")
            .tags(["running", "shoes"])
            .price(190.0)
            .stock(9)
            .rating(4.3, 1580)
            .attribute("size", 9.0)
            .timestamps(day(2023, 2, 14), day(2023, 9, 9))
            .build(),
        ProductBuilder::new(
            "kitchenaid-artisan-mixer",
            "Artisan Stand Mixer",
            "KitchenAid",
            "home-kitchen",
        )
        .sku("KAD-ART-5QT")
        .subcategory("kitchen-appliances")
        .description("5-quart tilt-head stand mixer with ten speeds")
        .tags(["mixer", "baking"])
        .price(449.99)
        .stock(14)
        .rating(4.9, 8900)
        .attribute("capacityQuarts", 5.0)
        .timestamps(day(2022, 11, 1), day(2024, 1, 15))
        .build(),
        ProductBuilder::new(
            "instant-pot-duo",
            "Duo 7-in-1 Pressure Cooker",
            "Instant Pot",
            "home-kitchen",
        )
        .sku("INP-DUO-6QT")
        .subcategory("kitchen-appliances")
        .description("Multi-use electric pressure cooker, slow cooker and rice cooker")
        .tags(["pressure-cooker", "slow-cooker"])
        .price(89.99)
        .stock(200)
        .rating(4.7, 12000)
        .attribute("capacityQuarts", 6.0)
        .timestamps(day(2021, 10, 10), day(2023, 10, 10))
        .build(),
        ProductBuilder::new(
            "herman-miller-aeron",
            "Aeron Chair",
            "Herman Miller",
            "home-kitchen",
        )
        .sku("HMI-AERON-B")
        .subcategory("furniture")
        .description("Ergonomic office chair with breathable mesh")
        .tags(["chair", "office", "ergonomic"])
        .price(1395.0)
        .stock(3)
        .rating(4.6, 530)
        .attribute("size", "B")
        .timestamps(day(2022, 3, 3), day(2023, 3, 3))
        .build(),
        ProductBuilder::new(
            "rust-programming-language",
            "The Rust Programming Language, 2nd Edition",
            "No Starch Press",
            "books",
        )
        .sku("NSP-RUST-2E")
        .subcategory("programming")
        .description("The official book on the Rust programming language")
        .tags(["rust", "programming", "systems"])
        .price(39.95)
        .stock(75)
        .rating(4.8, 1750)
        .attribute("pages", 560.0)
        .timestamps(day(2023, 2, 28), day(2023, 2, 28))
        .build(),
        ProductBuilder::new("atomic-habits", "Atomic Habits", "Avery", "books")
            .sku("AVY-ATOMIC-HC")
            .description("An easy and proven way to build good habits and break bad ones")
            .tags(["self-help", "habits", "bestseller"])
            .price(16.99)
            .stock(300)
            .rating(4.8, 98000)
            .attribute("hardcover", true)
            .timestamps(day(2018, 10, 16), day(2023, 1, 1))
            .build(),
    ]
}

use chrono::{DateTime, Duration, Utc};

use crate::models::Product;

// 2025-01-01T00:00:00Z
const CATALOG_EPOCH: i64 = 1_735_689_600;

struct Seed {
    name: &'static str,
    description: &'static str,
    price: i64,
    original_price: Option<i64>,
    category: &'static str,
    brand: &'static str,
    rating: f64,
    reviews: i32,
    stock: i32,
    tags: &'static [&'static str],
    sku: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        name: "Gaming Mouse Pro",
        description: "High-precision wireless gaming mouse with RGB lighting and a 16000 DPI sensor",
        price: 2499,
        original_price: Some(3499),
        category: "Accessories",
        brand: "Zentro",
        rating: 4.5,
        reviews: 128,
        stock: 45,
        tags: &["gaming", "mouse", "wireless", "rgb"],
        sku: "ZEN-GMP-001",
    },
    Seed {
        name: "Wireless Bluetooth Headphones",
        description: "Over-ear noise cancelling headphones with 30 hour battery life",
        price: 4999,
        original_price: Some(6999),
        category: "Audio",
        brand: "Aurel",
        rating: 4.3,
        reviews: 342,
        stock: 30,
        tags: &["audio", "wireless", "bluetooth", "headphones"],
        sku: "AUR-WBH-002",
    },
    Seed {
        name: "Mechanical Gaming Keyboard",
        description: "Hot-swappable mechanical keyboard with tactile switches and per-key lighting",
        price: 3999,
        original_price: None,
        category: "Accessories",
        brand: "Zentro",
        rating: 4.7,
        reviews: 211,
        stock: 25,
        tags: &["gaming", "keyboard", "mechanical"],
        sku: "ZEN-MGK-003",
    },
    Seed {
        name: "Smart Fitness Watch",
        description: "Fitness tracker with heart rate monitoring, sleep tracking and built-in GPS",
        price: 7999,
        original_price: Some(9999),
        category: "Wearables",
        brand: "Kestrel",
        rating: 4.1,
        reviews: 96,
        stock: 60,
        tags: &["fitness", "smartwatch", "wearable"],
        sku: "KES-SFW-004",
    },
    Seed {
        name: "4K Ultra HD Monitor",
        description: "27 inch IPS display with HDR support and a factory calibrated panel",
        price: 18999,
        original_price: Some(21999),
        category: "Electronics",
        brand: "Lumen",
        rating: 4.6,
        reviews: 77,
        stock: 12,
        tags: &["monitor", "display", "4k"],
        sku: "LUM-UHD-005",
    },
    Seed {
        name: "Portable Bluetooth Speaker",
        description: "Waterproof speaker with deep bass and 12 hour playback",
        price: 1999,
        original_price: None,
        category: "Audio",
        brand: "Aurel",
        rating: 4.0,
        reviews: 154,
        stock: 80,
        tags: &["speaker", "bluetooth", "portable"],
        sku: "AUR-PBS-006",
    },
    Seed {
        name: "USB-C Charging Hub",
        description: "Seven port hub with HDMI output and 100W power delivery",
        price: 1499,
        original_price: None,
        category: "Accessories",
        brand: "Volta",
        rating: 3.9,
        reviews: 58,
        stock: 150,
        tags: &["usb-c", "hub", "charging"],
        sku: "VOL-UCH-007",
    },
    Seed {
        name: "Noise Cancelling Earbuds",
        description: "True wireless earbuds with active noise cancellation and a charging case",
        price: 5999,
        original_price: Some(7499),
        category: "Audio",
        brand: "Aurel",
        rating: 4.4,
        reviews: 203,
        stock: 40,
        tags: &["earbuds", "wireless", "audio"],
        sku: "AUR-NCE-008",
    },
    Seed {
        name: "Ergonomic Office Chair",
        description: "Adjustable lumbar support with a breathable mesh back",
        price: 12999,
        original_price: Some(15999),
        category: "Furniture",
        brand: "Nimbus",
        rating: 4.2,
        reviews: 64,
        stock: 18,
        tags: &["chair", "office", "ergonomic"],
        sku: "NIM-EOC-009",
    },
    Seed {
        name: "LED Desk Lamp",
        description: "Dimmable lamp with a wireless charging base",
        price: 1299,
        original_price: None,
        category: "Home",
        brand: "Lumen",
        rating: 3.8,
        reviews: 39,
        stock: 70,
        tags: &["lamp", "led", "desk"],
        sku: "LUM-LDL-010",
    },
    Seed {
        name: "Yoga Mat Premium",
        description: "Non-slip eco friendly mat, 6mm thick",
        price: 899,
        original_price: Some(1199),
        category: "Fitness",
        brand: "Kestrel",
        rating: 4.5,
        reviews: 187,
        stock: 90,
        tags: &["yoga", "fitness", "mat"],
        sku: "KES-YMP-011",
    },
    Seed {
        name: "Smartphone Gimbal Stabilizer",
        description: "Three axis gimbal for smooth handheld video",
        price: 6499,
        original_price: None,
        category: "Electronics",
        brand: "Volta",
        rating: 4.0,
        reviews: 22,
        stock: 0,
        tags: &["gimbal", "camera", "smartphone"],
        sku: "VOL-SGS-012",
    },
];

/// The built-in catalog, with ids "1" through "12" in listing order.
pub fn products() -> Vec<Product> {
    let epoch = DateTime::<Utc>::from_timestamp(CATALOG_EPOCH, 0).unwrap_or_default();
    SEEDS
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let mut product = Product {
                id: (i + 1).to_string(),
                name: seed.name.to_string(),
                description: seed.description.to_string(),
                price: seed.price,
                original_price: seed.original_price,
                discount: None,
                category: seed.category.to_string(),
                brand: seed.brand.to_string(),
                rating: seed.rating,
                reviews: seed.reviews,
                stock: seed.stock,
                tags: seed.tags.iter().map(|t| t.to_string()).collect(),
                sku: seed.sku.to_string(),
                created_at: epoch + Duration::days(i as i64),
            };
            product.discount = Some(product.discount_percent());
            product
        })
        .collect()
}

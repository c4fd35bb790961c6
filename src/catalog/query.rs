use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    catalog::{index::KeywordIndex, scoring::relevance_score},
    models::Product,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Name,
    PriceLow,
    PriceHigh,
    Rating,
    Relevance,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
            SortKey::Relevance => "relevance",
        }
    }
}

/// Category label meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub category: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub sort: Option<SortKey>,
    pub limit: Option<usize>,
}

impl SearchQuery {
    /// Trimmed text, or `None` when absent or blank.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub items: Vec<Product>,
    /// Matches before the limit was applied.
    pub total: usize,
}

/// Case-insensitive containment of the whole query in any searchable field.
pub fn substring_match(product: &Product, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
    contains(&product.name)
        || contains(&product.description)
        || contains(&product.sku)
        || product.tags.iter().any(|tag| contains(tag))
        || contains(&product.category)
        || contains(&product.brand)
}

/// Text match over `products`. Uses the index when one is available,
/// otherwise a substring scan. The result keeps collection order.
pub fn text_search(products: &[Product], index: Option<&KeywordIndex>, query: &str) -> Vec<Product> {
    match index {
        Some(index) => index
            .search(query)
            .into_iter()
            .filter_map(|position| products.get(position).cloned())
            .collect(),
        None => products
            .iter()
            .filter(|product| substring_match(product, query))
            .cloned()
            .collect(),
    }
}

pub fn matches_category(product: &Product, category: Option<&str>) -> bool {
    match category.map(str::trim) {
        None | Some("") => true,
        Some(c) if c.eq_ignore_ascii_case(ALL_CATEGORIES) => true,
        Some(c) => product.category.to_lowercase() == c.to_lowercase(),
    }
}

pub fn matches_price(product: &Product, min: Option<i64>, max: Option<i64>) -> bool {
    let min = min.unwrap_or(0);
    product.price >= min && max.is_none_or(|max| product.price <= max)
}

pub fn sort_products(products: &mut [Product], sort: Option<SortKey>, text: Option<&str>) {
    match sort {
        None => {}
        Some(SortKey::Name) => products.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
        Some(SortKey::PriceLow) => products.sort_by_key(|p| p.price),
        Some(SortKey::PriceHigh) => products.sort_by_key(|p| Reverse(p.price)),
        Some(SortKey::Rating) => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        Some(SortKey::Relevance) => {
            if let Some(text) = text {
                products.sort_by_cached_key(|p| Reverse(relevance_score(p, text)));
            }
        }
    }
}

pub fn apply_limit(products: &mut Vec<Product>, limit: Option<usize>) {
    if let Some(limit) = limit.filter(|&n| n > 0) {
        products.truncate(limit);
    }
}

/// Filter, sort and limit candidates that already passed the text match.
pub fn refine(candidates: Vec<Product>, query: &SearchQuery) -> QueryOutcome {
    let category = query.category.as_deref();
    let mut items: Vec<Product> = candidates
        .into_iter()
        .filter(|p| matches_category(p, category))
        .filter(|p| matches_price(p, query.price_min, query.price_max))
        .collect();

    sort_products(&mut items, query.sort, query.text());
    let total = items.len();
    apply_limit(&mut items, query.limit);

    QueryOutcome { items, total }
}

/// The whole pipeline over an in-memory collection.
pub fn execute(products: &[Product], index: Option<&KeywordIndex>, query: &SearchQuery) -> QueryOutcome {
    let candidates = match query.text() {
        Some(text) => text_search(products, index, text),
        None => products.to_vec(),
    };
    refine(candidates, query)
}

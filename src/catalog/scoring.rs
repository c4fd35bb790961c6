use crate::models::Product;

pub const NAME_WEIGHT: u32 = 10;
pub const DESCRIPTION_WEIGHT: u32 = 5;
pub const TAG_WEIGHT: u32 = 3;
pub const BRAND_WEIGHT: u32 = 2;
pub const CATEGORY_WEIGHT: u32 = 1;

/// Weighted substring score of `product` against the untokenized query.
/// Blank queries score zero.
pub fn relevance_score(product: &Product, query: &str) -> u32 {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    let mut score = 0;
    if contains(&product.name) {
        score += NAME_WEIGHT;
    }
    if contains(&product.description) {
        score += DESCRIPTION_WEIGHT;
    }
    if product.tags.iter().any(|tag| contains(tag)) {
        score += TAG_WEIGHT;
    }
    if contains(&product.brand) {
        score += BRAND_WEIGHT;
    }
    if contains(&product.category) {
        score += CATEGORY_WEIGHT;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn blank(name: &str, category: &str) -> Product {
        Product {
            id: name.to_lowercase(),
            name: name.into(),
            description: String::new(),
            price: 100,
            original_price: None,
            discount: None,
            category: category.into(),
            brand: "Generic".into(),
            rating: 4.0,
            reviews: 0,
            stock: 1,
            tags: vec![],
            sku: format!("SKU-{name}"),
            created_at: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn every_field_contributes_its_weight() {
        let mut product = blank("Audio Cable", "Audio");
        product.description = "Braided audio cable".into();
        product.tags = vec!["audio".into()];
        product.brand = "AudioWorks".into();
        assert_eq!(relevance_score(&product, "audio"), 21);
    }

    #[test]
    fn match_is_case_insensitive() {
        let product = blank("Gaming Mouse Pro", "Accessories");
        assert_eq!(relevance_score(&product, "GAMING"), NAME_WEIGHT);
    }

    #[test]
    fn name_match_outranks_category_only_match() {
        let by_name = blank("Studio Monitor", "Displays");
        let by_category = blank("Desk Lamp", "Studio");
        assert!(relevance_score(&by_name, "studio") > relevance_score(&by_category, "studio"));
    }

    #[test]
    fn non_matching_and_blank_queries_score_zero() {
        let product = blank("Desk Lamp", "Home");
        assert_eq!(relevance_score(&product, "keyboard"), 0);
        assert_eq!(relevance_score(&product, "  "), 0);
    }
}

use crate::models::Product;

pub const MAX_SUGGESTIONS: usize = 5;

/// Distinct product names, categories and brands related to `query`.
///
/// Values starting with the query come first, then values that merely
/// contain it. Both groups keep collection order.
pub fn suggestions(products: &[Product], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let candidates = products
        .iter()
        .flat_map(|p| [p.name.as_str(), p.category.as_str(), p.brand.as_str()]);

    let mut prefixed: Vec<&str> = Vec::new();
    let mut containing: Vec<&str> = Vec::new();
    for value in candidates {
        if prefixed.contains(&value) || containing.contains(&value) {
            continue;
        }
        let lowered = value.to_lowercase();
        if lowered.starts_with(&needle) {
            prefixed.push(value);
        } else if lowered.contains(&needle) {
            containing.push(value);
        }
    }

    prefixed
        .into_iter()
        .chain(containing)
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture;

    #[test]
    fn suggestions_are_distinct_and_bounded() {
        let products = fixture::products();
        let found = suggestions(&products, "e");
        assert!(found.len() <= MAX_SUGGESTIONS);
        let mut sorted = found.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), found.len());
    }

    #[test]
    fn prefix_matches_come_first() {
        let products = fixture::products();
        let found = suggestions(&products, "gaming");
        assert_eq!(found.first().map(String::as_str), Some("Gaming Mouse Pro"));
        assert!(found.iter().all(|s| s.to_lowercase().contains("gaming")));
    }

    #[test]
    fn category_and_brand_are_suggested_once() {
        let products = fixture::products();
        let found = suggestions(&products, "electronics");
        assert_eq!(found, vec!["Electronics".to_string()]);
    }

    #[test]
    fn blank_query_has_no_suggestions() {
        assert!(suggestions(&fixture::products(), " ").is_empty());
    }
}

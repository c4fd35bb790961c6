use std::collections::{BTreeSet, HashMap};

use crate::models::Product;

/// Lowercased whitespace tokens longer than two characters.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() > 2)
}

fn searchable_text(product: &Product) -> String {
    format!(
        "{} {} {} {} {}",
        product.name,
        product.description,
        product.brand,
        product.category,
        product.tags.join(" ")
    )
}

/// Word to product-position lookup, built once over a product slice.
///
/// Positions refer to the slice the index was built from, so the index
/// must be kept alongside that exact slice.
#[derive(Debug, Default, Clone)]
pub struct KeywordIndex {
    entries: HashMap<String, Vec<usize>>,
}

impl KeywordIndex {
    pub fn build(products: &[Product]) -> Self {
        let mut entries: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, product) in products.iter().enumerate() {
            for token in tokenize(&searchable_text(product)) {
                let postings = entries.entry(token).or_default();
                if postings.last() != Some(&position) {
                    postings.push(position);
                }
            }
        }
        tracing::debug!(
            products = products.len(),
            keywords = entries.len(),
            "keyword index built"
        );
        Self { entries }
    }

    pub fn lookup(&self, token: &str) -> &[usize] {
        self.entries.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positions matching any query token, in collection order.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let mut hits = BTreeSet::new();
        for token in tokenize(query.trim()) {
            hits.extend(self.lookup(&token).iter().copied());
        }
        hits.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture;

    #[test]
    fn tokenize_drops_short_words_and_lowercases() {
        let tokens: Vec<String> = tokenize("An RGB Gaming mouse is OK").collect();
        assert_eq!(tokens, vec!["rgb", "gaming", "mouse"]);
    }

    #[test]
    fn empty_list_builds_empty_index() {
        let index = KeywordIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.search("gaming").is_empty());
    }

    #[test]
    fn postings_have_no_duplicates() {
        let products = fixture::products();
        let index = KeywordIndex::build(&products);
        for token in ["gaming", "wireless", "electronics"] {
            let postings = index.lookup(token);
            let unique: BTreeSet<_> = postings.iter().collect();
            assert_eq!(unique.len(), postings.len(), "duplicates for {token}");
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let products = fixture::products();
        let first = KeywordIndex::build(&products);
        let second = KeywordIndex::build(&products);
        assert_eq!(first.len(), second.len());
        assert_eq!(first.lookup("mouse"), second.lookup("mouse"));
    }

    #[test]
    fn search_unions_tokens_in_collection_order() {
        let products = fixture::products();
        let index = KeywordIndex::build(&products);
        let hits = index.search("gaming mouse");
        assert!(hits.windows(2).all(|w| w[0] < w[1]));
        assert!(hits.iter().any(|&pos| products[pos].id == "1"));
    }

    #[test]
    fn query_of_only_short_tokens_matches_nothing() {
        let products = fixture::products();
        let index = KeywordIndex::build(&products);
        assert!(index.search("a tv ok").is_empty());
        assert!(index.search("   ").is_empty());
    }
}

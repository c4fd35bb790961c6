//! Catalog search: keyword index, the query pipeline, relevance scoring
//! and suggestions, plus the repositories the pipeline reads from.

pub mod fixture;
pub mod index;
pub mod query;
pub mod repository;
pub mod scoring;
pub mod suggest;

pub use index::KeywordIndex;
pub use query::{QueryOutcome, SearchQuery, SortKey};
pub use repository::{DbProductRepository, InMemoryProductRepository, ProductRepository};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{catalog::SortKey, models::Product};

/// Query string shared by `/api/search` and `/api/products`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub sort: Option<SortKey>,
    pub limit: Option<i64>,
}

/// Only the text of a search query string. Other parameters are ignored,
/// so a missing `q` is reported even when the rest is malformed.
#[derive(Debug, Default, Deserialize)]
pub struct SearchText {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PriceRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<Product>,
    pub total: usize,
    pub query: String,
    pub category: Option<String>,
    pub price_range: PriceRange,
    pub sort_by: Option<SortKey>,
    pub suggestions: Vec<String>,
}

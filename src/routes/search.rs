use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::search::{SearchParams, SearchResponse, SearchText},
    error::{AppError, AppResult},
    routes::params::ValidatedQuery,
    services::search_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search_products))
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(
        ("q" = String, Query, description = "Search text, required"),
        ("category" = Option<String>, Query, description = "Category label; `all` disables the filter"),
        ("priceMin" = Option<i64>, Query, description = "Inclusive lower price bound"),
        ("priceMax" = Option<i64>, Query, description = "Inclusive upper price bound"),
        ("sort" = Option<String>, Query, description = "name, price-low, price-high, rating or relevance"),
        ("limit" = Option<i64>, Query, description = "Maximum number of results"),
    ),
    responses(
        (status = 200, description = "Search results", body = SearchResponse),
        (status = 400, description = "Search query is required, or a parameter is malformed"),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Search"
)]
pub async fn search_products(
    State(state): State<AppState>,
    ValidatedQuery(text): ValidatedQuery<SearchText>,
    params: Result<ValidatedQuery<SearchParams>, AppError>,
) -> AppResult<Json<SearchResponse>> {
    search_service::require_text(text.q.as_deref())?;
    let ValidatedQuery(params) = params?;
    let resp = search_service::search(&state, params).await?;
    Ok(Json(resp))
}

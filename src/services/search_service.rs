use crate::{
    catalog::{ProductRepository, QueryOutcome, SearchQuery, suggest::suggestions},
    dto::search::{PriceRange, SearchParams, SearchResponse},
    error::{AppError, AppResult},
    state::AppState,
};

pub const QUERY_REQUIRED: &str = "Search query is required";

/// Turn query-string parameters into a pipeline query. Blank text is
/// treated as absent here; `search` rejects it before calling this.
pub fn build_query(params: &SearchParams) -> AppResult<SearchQuery> {
    let limit = match params.limit {
        None => None,
        Some(n) if n > 0 => Some(n as usize),
        Some(_) => return Err(AppError::BadRequest("limit must be a positive integer".into())),
    };
    if let (Some(min), Some(max)) = (params.price_min, params.price_max) {
        if min > max {
            return Err(AppError::BadRequest("priceMin must not exceed priceMax".into()));
        }
    }
    Ok(SearchQuery {
        text: params
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string),
        category: params.category.clone(),
        price_min: params.price_min,
        price_max: params.price_max,
        sort: params.sort,
        limit,
    })
}

/// Trimmed search text, or 400 when it is missing or blank.
pub fn require_text(q: Option<&str>) -> AppResult<&str> {
    match q.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(AppError::BadRequest(QUERY_REQUIRED.into())),
    }
}

pub async fn run_catalog_query(
    repo: &dyn ProductRepository,
    query: &SearchQuery,
) -> AppResult<QueryOutcome> {
    let outcome = repo.run_query(query).await?;
    tracing::debug!(
        text = ?query.text(),
        category = ?query.category,
        sort = ?query.sort.map(|s| s.as_str()),
        total = outcome.total,
        returned = outcome.items.len(),
        "catalog query"
    );
    Ok(outcome)
}

/// Free-text search. Requires a non-blank `q`.
pub async fn search(state: &AppState, params: SearchParams) -> AppResult<SearchResponse> {
    let text = require_text(params.q.as_deref())?;
    let query = build_query(&params)?;
    let outcome = run_catalog_query(state.products.as_ref(), &query).await?;

    let all = state.products.get_all().await?;
    let suggestions = suggestions(&all, text);

    Ok(SearchResponse {
        success: true,
        data: outcome.items,
        total: outcome.total,
        query: text.to_string(),
        category: query.category,
        price_range: PriceRange {
            min: query.price_min,
            max: query.price_max,
        },
        sort_by: query.sort,
        suggestions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SortKey;

    #[test]
    fn blank_text_is_absent() {
        let params = SearchParams {
            q: Some("   ".into()),
            ..Default::default()
        };
        assert!(build_query(&params).expect("query").text.is_none());
    }

    #[test]
    fn text_is_required_and_trimmed() {
        assert_eq!(require_text(Some("  mouse ")).ok(), Some("mouse"));
        for q in [None, Some(""), Some("   ")] {
            assert!(matches!(require_text(q), Err(AppError::BadRequest(msg)) if msg == QUERY_REQUIRED));
        }
    }

    #[test]
    fn non_positive_limit_is_rejected() {
        for limit in [0, -3] {
            let params = SearchParams {
                limit: Some(limit),
                ..Default::default()
            };
            assert!(matches!(build_query(&params), Err(AppError::BadRequest(_))));
        }
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        let params = SearchParams {
            price_min: Some(500),
            price_max: Some(100),
            ..Default::default()
        };
        assert!(build_query(&params).is_err());
    }

    #[test]
    fn params_carry_over() {
        let params = SearchParams {
            q: Some(" mouse ".into()),
            category: Some("Accessories".into()),
            price_min: Some(100),
            price_max: Some(5000),
            sort: Some(SortKey::Rating),
            limit: Some(2),
        };
        let query = build_query(&params).expect("query");
        assert_eq!(query.text(), Some("mouse"));
        assert_eq!(query.limit, Some(2));
        assert_eq!(query.sort, Some(SortKey::Rating));
    }
}

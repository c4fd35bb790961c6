use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::{Deserialize, de::DeserializeOwned};
use utoipa::ToSchema;

use crate::error::AppError;

pub const INVALID_QUERY: &str = "Invalid query parameters";

/// `Query` whose rejection is an [`AppError::BadRequest`] with a fixed message.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "query string rejected");
                Err(AppError::BadRequest(INVALID_QUERY.into()))
            }
        }
    }
}

const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        let wild = Pagination {
            page: Some(-4),
            per_page: Some(1000),
        };
        assert_eq!(wild.normalize(), (1, 100, 0));
        let third = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(third.normalize(), (3, 10, 20));
    }

    #[test]
    fn huge_page_does_not_overflow_offset() {
        let far = Pagination {
            page: Some(i64::MAX),
            per_page: Some(100),
        };
        let (page, per_page, offset) = far.normalize();
        assert_eq!(page, MAX_PAGE);
        assert_eq!(offset, (MAX_PAGE - 1) * per_page);
    }
}

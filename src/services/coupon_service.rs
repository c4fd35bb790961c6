use chrono::{DateTime, Utc};

use crate::{
    coupons::{self, AppliedCoupon},
    dto::coupons::{ApplyCouponRequest, CouponList},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Coupons a shopper could use right now.
pub async fn list_available(state: &AppState, now: DateTime<Utc>) -> AppResult<ApiResponse<CouponList>> {
    let items: Vec<_> = state
        .coupons
        .list()
        .await?
        .into_iter()
        .filter(|c| c.is_available_at(now))
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Coupons",
        CouponList { items },
        Some(Meta {
            page: None,
            per_page: None,
            total: Some(total),
        }),
    ))
}

/// Preview a coupon against a subtotal. Nothing is redeemed.
pub async fn apply_coupon(
    state: &AppState,
    payload: ApplyCouponRequest,
    now: DateTime<Utc>,
) -> AppResult<ApiResponse<AppliedCoupon>> {
    if payload.subtotal < 0 {
        return Err(AppError::BadRequest("subtotal must not be negative".into()));
    }
    let coupon = state.coupons.find_by_code(&payload.code).await?;
    match coupons::evaluate(coupon.as_ref(), payload.subtotal, &payload.categories, now) {
        Ok(applied) => {
            tracing::info!(code = %applied.code, discount = applied.discount, "coupon applied");
            Ok(ApiResponse::success("Coupon applied", applied, None))
        }
        Err(reason) => {
            tracing::debug!(code = %payload.code, ?reason, "coupon rejected");
            Err(AppError::CouponRejected)
        }
    }
}

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::Utc;

use crate::{
    coupons::AppliedCoupon,
    dto::coupons::{ApplyCouponRequest, CouponList},
    error::AppResult,
    response::ApiResponse,
    services::coupon_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coupons))
        .route("/apply", post(apply_coupon))
}

#[utoipa::path(
    get,
    path = "/api/coupons",
    responses(
        (status = 200, description = "Coupons usable right now", body = ApiResponse<CouponList>)
    ),
    tag = "Coupons"
)]
pub async fn list_coupons(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CouponList>>> {
    let resp = coupon_service::list_available(&state, Utc::now()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/coupons/apply",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Discount preview", body = ApiResponse<AppliedCoupon>),
        (status = 400, description = "Invalid or expired coupon code"),
    ),
    tag = "Coupons"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<ApiResponse<AppliedCoupon>>> {
    let resp = coupon_service::apply_coupon(&state, payload, Utc::now()).await?;
    Ok(Json(resp))
}

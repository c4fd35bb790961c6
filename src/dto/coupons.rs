use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::coupons::Coupon;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyCouponRequest {
    pub code: String,
    pub subtotal: i64,
    /// Categories in the cart; enables the coupon's category allow-list.
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CouponList {
    #[schema(value_type = Vec<Coupon>)]
    pub items: Vec<Coupon>,
}

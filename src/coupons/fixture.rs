use chrono::{DateTime, Utc};

use super::{Coupon, CouponType};

// 2024-01-01T00:00:00Z
const OPENS: i64 = 1_704_067_200;
// 2030-12-31T23:59:59Z
const CLOSES: i64 = 1_924_991_999;
// 2025-08-31T23:59:59Z
const SUMMER_ENDS: i64 = 1_756_684_799;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}

struct Rule {
    code: &'static str,
    description: &'static str,
    coupon_type: CouponType,
    value: i64,
    min_order_amount: Option<i64>,
    max_discount: Option<i64>,
    usage_limit: i32,
    used_count: i32,
    until: i64,
    is_active: bool,
    categories: &'static [&'static str],
}

const RULES: &[Rule] = &[
    Rule {
        code: "WELCOME10",
        description: "10% off your first order, up to 500",
        coupon_type: CouponType::Percentage,
        value: 10,
        min_order_amount: Some(1000),
        max_discount: Some(500),
        usage_limit: 1000,
        used_count: 0,
        until: CLOSES,
        is_active: true,
        categories: &[],
    },
    Rule {
        code: "SAVE500",
        description: "Flat 500 off orders of 3000 or more",
        coupon_type: CouponType::Fixed,
        value: 500,
        min_order_amount: Some(3000),
        max_discount: None,
        usage_limit: 500,
        used_count: 0,
        until: CLOSES,
        is_active: true,
        categories: &[],
    },
    Rule {
        code: "FREESHIP",
        description: "Free shipping on orders of 499 or more",
        coupon_type: CouponType::FreeShipping,
        value: 0,
        min_order_amount: Some(499),
        max_discount: None,
        usage_limit: 10_000,
        used_count: 0,
        until: CLOSES,
        is_active: true,
        categories: &[],
    },
    Rule {
        code: "TECH20",
        description: "20% off electronics, up to 1500",
        coupon_type: CouponType::Percentage,
        value: 20,
        min_order_amount: Some(5000),
        max_discount: Some(1500),
        usage_limit: 200,
        used_count: 0,
        until: CLOSES,
        is_active: true,
        categories: &["Electronics"],
    },
    Rule {
        code: "SUMMER25",
        description: "25% summer sale",
        coupon_type: CouponType::Percentage,
        value: 25,
        min_order_amount: None,
        max_discount: Some(2000),
        usage_limit: 300,
        used_count: 0,
        until: SUMMER_ENDS,
        is_active: false,
        categories: &[],
    },
    Rule {
        code: "FIRST50",
        description: "50 off for the first fifty shoppers",
        coupon_type: CouponType::Fixed,
        value: 50,
        min_order_amount: None,
        max_discount: None,
        usage_limit: 50,
        used_count: 50,
        until: CLOSES,
        is_active: true,
        categories: &[],
    },
];

pub fn coupons() -> Vec<Coupon> {
    RULES
        .iter()
        .map(|rule| Coupon {
            code: rule.code.to_string(),
            description: rule.description.to_string(),
            coupon_type: rule.coupon_type,
            value: rule.value,
            min_order_amount: rule.min_order_amount,
            max_discount: rule.max_discount,
            usage_limit: rule.usage_limit,
            used_count: rule.used_count,
            valid_from: at(OPENS),
            valid_until: at(rule.until),
            is_active: rule.is_active,
            applicable_categories: rule.categories.iter().map(|c| c.to_string()).collect(),
        })
        .collect()
}

//! Coupon rules and the per-application evaluator.

pub mod fixture;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use store::{CouponStore, DbCouponStore, InMemoryCouponStore};

/// Discount granted by a `free_shipping` coupon.
pub const FREE_SHIPPING_DISCOUNT: i64 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CouponType {
    Percentage,
    Fixed,
    FreeShipping,
}

impl CouponType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponType::Percentage => "percentage",
            CouponType::Fixed => "fixed",
            CouponType::FreeShipping => "free_shipping",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "percentage" => Some(CouponType::Percentage),
            "fixed" => Some(CouponType::Fixed),
            "free_shipping" => Some(CouponType::FreeShipping),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    pub description: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    pub value: i64,
    pub min_order_amount: Option<i64>,
    pub max_discount: Option<i64>,
    pub usage_limit: i32,
    pub used_count: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
    /// Empty means every category.
    pub applicable_categories: Vec<String>,
}

/// Which check rejected a coupon. Only logged; callers see
/// [`crate::error::AppError::CouponRejected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    UnknownCode,
    Inactive,
    OutsideWindow,
    UsageExhausted,
    BelowMinimum,
    CategoryMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AppliedCoupon {
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
}

impl Coupon {
    /// Active, inside its window and not used up.
    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.valid_from <= now
            && now <= self.valid_until
            && self.used_count < self.usage_limit
    }

    pub fn matches_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }

    /// Discount by type, capped at `max_discount` (percentage) and then
    /// at the subtotal.
    pub fn discount_for(&self, subtotal: i64) -> i64 {
        let subtotal = subtotal.max(0);
        let computed = match self.coupon_type {
            CouponType::Percentage => {
                let raw = i128::from(subtotal) * i128::from(self.value) / 100;
                let raw = i64::try_from(raw).unwrap_or(i64::MAX);
                match self.max_discount {
                    Some(cap) => raw.min(cap),
                    None => raw,
                }
            }
            CouponType::Fixed => self.value,
            CouponType::FreeShipping => FREE_SHIPPING_DISCOUNT,
        };
        computed.clamp(0, subtotal)
    }

    fn check(&self, subtotal: i64, categories: &[String], now: DateTime<Utc>) -> Result<(), Rejection> {
        if !self.is_active {
            return Err(Rejection::Inactive);
        }
        if now < self.valid_from || now > self.valid_until {
            return Err(Rejection::OutsideWindow);
        }
        if self.used_count >= self.usage_limit {
            return Err(Rejection::UsageExhausted);
        }
        if self.min_order_amount.is_some_and(|min| subtotal < min) {
            return Err(Rejection::BelowMinimum);
        }
        if !self.applicable_categories.is_empty()
            && !categories.is_empty()
            && !categories.iter().any(|c| {
                self.applicable_categories
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(c))
            })
        {
            return Err(Rejection::CategoryMismatch);
        }
        Ok(())
    }
}

/// Validate `coupon` against an order and compute the discount.
///
/// Checks run in order and stop at the first failure: the code exists,
/// the coupon is active, `now` is inside the window, usage is below the
/// limit, the subtotal meets the minimum and the cart touches an
/// allowed category. `categories` may be empty when the caller does not
/// know the cart contents.
pub fn evaluate(
    coupon: Option<&Coupon>,
    subtotal: i64,
    categories: &[String],
    now: DateTime<Utc>,
) -> Result<AppliedCoupon, Rejection> {
    let coupon = coupon.ok_or(Rejection::UnknownCode)?;
    coupon.check(subtotal, categories, now)?;
    let discount = coupon.discount_for(subtotal);
    Ok(AppliedCoupon {
        code: coupon.code.clone(),
        coupon_type: coupon.coupon_type,
        subtotal,
        discount,
        total: subtotal - discount,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CouponState {
    #[default]
    Unapplied,
    Applied(AppliedCoupon),
    Rejected(Rejection),
}

/// One coupon slot for a single order. Validation happens inside
/// [`CouponSession::apply`]; applying again replaces whatever was there.
#[derive(Debug, Clone, Default)]
pub struct CouponSession {
    state: CouponState,
}

impl CouponSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(
        &mut self,
        coupon: Option<&Coupon>,
        subtotal: i64,
        categories: &[String],
        now: DateTime<Utc>,
    ) -> &CouponState {
        self.state = match evaluate(coupon, subtotal, categories, now) {
            Ok(applied) => CouponState::Applied(applied),
            Err(reason) => {
                tracing::debug!(?reason, "coupon rejected");
                CouponState::Rejected(reason)
            }
        };
        &self.state
    }

    pub fn clear(&mut self) {
        self.state = CouponState::Unapplied;
    }

    pub fn state(&self) -> &CouponState {
        &self.state
    }

    pub fn applied(&self) -> Option<&AppliedCoupon> {
        match &self.state {
            CouponState::Applied(applied) => Some(applied),
            _ => None,
        }
    }

    pub fn discount(&self) -> i64 {
        self.applied().map_or(0, |a| a.discount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn coupon(code: &str) -> Coupon {
        fixture::coupons()
            .into_iter()
            .find(|c| c.code == code)
            .expect("fixture coupon")
    }

    #[test]
    fn welcome10_is_ten_percent_capped_at_500() {
        let welcome = coupon("WELCOME10");
        let small = evaluate(Some(&welcome), 2000, &[], now()).expect("applies");
        assert_eq!(small.discount, 200);
        assert_eq!(small.total, 1800);

        let large = evaluate(Some(&welcome), 6000, &[], now()).expect("applies");
        assert_eq!(large.discount, 500);
    }

    #[test]
    fn percentage_respects_max_discount() {
        let mut c = coupon("WELCOME10");
        c.min_order_amount = None;
        assert_eq!(evaluate(Some(&c), 10_000, &[], now()).map(|a| a.discount), Ok(500));
    }

    #[test]
    fn percentage_on_huge_subtotal_is_capped() {
        let welcome = coupon("WELCOME10");
        let applied = evaluate(Some(&welcome), i64::MAX / 2, &[], now()).expect("applies");
        assert_eq!(applied.discount, 500);
        assert_eq!(applied.total, i64::MAX / 2 - 500);

        let mut uncapped = welcome.clone();
        uncapped.max_discount = None;
        uncapped.value = 150;
        assert_eq!(uncapped.discount_for(i64::MAX), i64::MAX);
    }

    #[test]
    fn save500_below_minimum_is_rejected() {
        let save = coupon("SAVE500");
        assert_eq!(
            evaluate(Some(&save), 2000, &[], now()),
            Err(Rejection::BelowMinimum)
        );
        assert_eq!(evaluate(Some(&save), 3000, &[], now()).map(|a| a.discount), Ok(500));
    }

    #[test]
    fn discount_never_exceeds_subtotal() {
        let mut fixed = coupon("SAVE500");
        fixed.min_order_amount = None;
        let mut shipping = coupon("FREESHIP");
        shipping.min_order_amount = None;
        let mut pct = coupon("WELCOME10");
        pct.min_order_amount = None;
        pct.max_discount = None;
        pct.value = 150;

        for subtotal in [0, 1, 50, 99, 499, 1000, 25_000] {
            for c in [&fixed, &shipping, &pct] {
                let applied = evaluate(Some(c), subtotal, &[], now()).expect("applies");
                assert!(applied.discount <= subtotal, "{} on {subtotal}", c.code);
                assert!(applied.total >= 0);
            }
        }
    }

    #[test]
    fn free_shipping_uses_the_shipping_constant() {
        let c = coupon("FREESHIP");
        assert_eq!(
            evaluate(Some(&c), 1500, &[], now()).map(|a| a.discount),
            Ok(FREE_SHIPPING_DISCOUNT)
        );
    }

    #[test]
    fn checks_short_circuit_in_order() {
        assert_eq!(evaluate(None, 5000, &[], now()), Err(Rejection::UnknownCode));

        let mut c = coupon("WELCOME10");
        c.is_active = false;
        c.used_count = c.usage_limit;
        assert_eq!(evaluate(Some(&c), 10, &[], now()), Err(Rejection::Inactive));

        c.is_active = true;
        c.valid_until = now() - chrono::Duration::days(1);
        assert_eq!(evaluate(Some(&c), 10, &[], now()), Err(Rejection::OutsideWindow));

        c.valid_until = now() + chrono::Duration::days(1);
        assert_eq!(evaluate(Some(&c), 10, &[], now()), Err(Rejection::UsageExhausted));

        c.used_count = 0;
        assert_eq!(evaluate(Some(&c), 10, &[], now()), Err(Rejection::BelowMinimum));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let c = coupon("SAVE500");
        assert!(evaluate(Some(&c), 5000, &[], c.valid_from).is_ok());
        assert!(evaluate(Some(&c), 5000, &[], c.valid_until).is_ok());
    }

    #[test]
    fn category_allow_list() {
        let c = coupon("TECH20");
        let audio = vec!["Audio".to_string()];
        let electronics = vec!["audio".to_string(), "electronics".to_string()];
        assert_eq!(
            evaluate(Some(&c), 10_000, &audio, now()),
            Err(Rejection::CategoryMismatch)
        );
        assert!(evaluate(Some(&c), 10_000, &electronics, now()).is_ok());
        assert!(evaluate(Some(&c), 10_000, &[], now()).is_ok());
    }

    #[test]
    fn session_transitions() {
        let welcome = coupon("WELCOME10");
        let save = coupon("SAVE500");
        let mut session = CouponSession::new();
        assert_eq!(session.state(), &CouponState::Unapplied);
        assert_eq!(session.discount(), 0);

        session.apply(Some(&save), 2000, &[], now());
        assert_eq!(session.state(), &CouponState::Rejected(Rejection::BelowMinimum));
        assert_eq!(session.discount(), 0);

        session.apply(Some(&welcome), 2000, &[], now());
        assert_eq!(session.discount(), 200);

        session.clear();
        assert_eq!(session.state(), &CouponState::Unapplied);
    }

    #[test]
    fn codes_match_case_insensitively() {
        assert!(coupon("WELCOME10").matches_code(" welcome10 "));
        assert!(!coupon("WELCOME10").matches_code("WELCOME"));
    }

    #[test]
    fn coupon_type_round_trips_through_str() {
        for t in [CouponType::Percentage, CouponType::Fixed, CouponType::FreeShipping] {
            assert_eq!(CouponType::parse(t.as_str()), Some(t));
        }
        assert_eq!(CouponType::parse("bogus"), None);
    }
}

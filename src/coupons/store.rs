use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Statement,
};

use super::{Coupon, CouponType};
use crate::{
    entity::coupons::{Column, Entity as Coupons, Model as CouponModel},
    error::{AppError, AppResult},
};

#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Case-insensitive lookup by code.
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Coupon>>;

    async fn list(&self) -> AppResult<Vec<Coupon>>;
}

pub struct InMemoryCouponStore {
    coupons: Vec<Coupon>,
}

impl InMemoryCouponStore {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    pub fn from_fixture() -> Self {
        Self::new(super::fixture::coupons())
    }
}

#[async_trait]
impl CouponStore for InMemoryCouponStore {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        Ok(self.coupons.iter().find(|c| c.matches_code(code)).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Coupon>> {
        Ok(self.coupons.clone())
    }
}

#[derive(Clone)]
pub struct DbCouponStore {
    orm: DatabaseConnection,
}

impl DbCouponStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl CouponStore for DbCouponStore {
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        find_by_code_in(&self.orm, code).await
    }

    async fn list(&self) -> AppResult<Vec<Coupon>> {
        Coupons::find()
            .order_by_asc(Column::Code)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(coupon_from_entity)
            .collect()
    }
}

/// Lookup usable inside a transaction.
pub async fn find_by_code_in<C: ConnectionTrait>(conn: &C, code: &str) -> AppResult<Option<Coupon>> {
    let model = Coupons::find()
        .filter(
            Expr::expr(Func::upper(Expr::col(Column::Code)))
                .eq(code.trim().to_uppercase()),
        )
        .one(conn)
        .await?;
    model.map(coupon_from_entity).transpose()
}

/// Count one redemption unless the coupon is already used up. The check
/// and the increment are one statement, so concurrent redemptions cannot
/// both slip under the limit. Returns false when nothing was redeemed.
pub async fn redeem<C: ConnectionTrait>(conn: &C, code: &str) -> AppResult<bool> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            UPDATE coupons
            SET used_count = used_count + 1
            WHERE code = $1 AND is_active AND used_count < usage_limit
            "#,
            [code.into()],
        ))
        .await?;
    Ok(result.rows_affected() == 1)
}

pub fn coupon_from_entity(model: CouponModel) -> AppResult<Coupon> {
    let coupon_type = CouponType::parse(&model.coupon_type).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "coupon {} has unknown type `{}`",
            model.code,
            model.coupon_type
        ))
    })?;
    Ok(Coupon {
        code: model.code,
        description: model.description,
        coupon_type,
        value: model.value,
        min_order_amount: model.min_order_amount,
        max_discount: model.max_discount,
        usage_limit: model.usage_limit,
        used_count: model.used_count,
        valid_from: model.valid_from.with_timezone(&Utc),
        valid_until: model.valid_until.with_timezone(&Utc),
        is_active: model.is_active,
        applicable_categories: model.applicable_categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_lookup_ignores_case() {
        let store = InMemoryCouponStore::from_fixture();
        let found = store.find_by_code("save500").await.expect("lookup");
        assert_eq!(found.map(|c| c.code), Some("SAVE500".to_string()));
        assert!(store.find_by_code("NOPE").await.expect("lookup").is_none());
    }
}

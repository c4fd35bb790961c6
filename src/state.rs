use std::sync::Arc;

use crate::{
    catalog::{DbProductRepository, InMemoryProductRepository, ProductRepository},
    config::CatalogSource,
    coupons::{CouponStore, DbCouponStore, InMemoryCouponStore},
    db::{DbPool, OrmConn, create_orm_conn},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub products: Arc<dyn ProductRepository>,
    pub coupons: Arc<dyn CouponStore>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(pool: DbPool, source: CatalogSource, jwt_secret: &str) -> Self {
        let orm = create_orm_conn(&pool);
        let (products, coupons): (Arc<dyn ProductRepository>, Arc<dyn CouponStore>) = match source {
            CatalogSource::Memory => (
                Arc::new(InMemoryProductRepository::from_fixture()),
                Arc::new(InMemoryCouponStore::from_fixture()),
            ),
            CatalogSource::Database => (
                Arc::new(DbProductRepository::new(orm.clone())),
                Arc::new(DbCouponStore::new(orm.clone())),
            ),
        };
        tracing::info!(?source, "catalog source selected");
        Self {
            pool,
            orm,
            products,
            coupons,
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}

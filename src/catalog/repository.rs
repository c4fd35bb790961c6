use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    catalog::{
        index::KeywordIndex,
        query::{self, QueryOutcome, SearchQuery},
    },
    entity::products::{Column, Entity as Products, Model as ProductModel},
    error::AppResult,
    models::Product,
};

/// Read access to the product collection.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, in listing order.
    async fn get_all(&self) -> AppResult<Vec<Product>>;

    /// Products matching `text`, in listing order.
    async fn search_by_query(&self, text: &str) -> AppResult<Vec<Product>>;

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Product>>;

    async fn run_query(&self, query: &SearchQuery) -> AppResult<QueryOutcome> {
        let candidates = match query.text() {
            Some(text) => self.search_by_query(text).await?,
            None => self.get_all().await?,
        };
        Ok(query::refine(candidates, query))
    }
}

/// Fixed product list with a keyword index built at construction.
pub struct InMemoryProductRepository {
    products: Vec<Product>,
    index: KeywordIndex,
}

impl InMemoryProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        let index = KeywordIndex::build(&products);
        Self { products, index }
    }

    pub fn from_fixture() -> Self {
        Self::new(crate::catalog::fixture::products())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_all(&self) -> AppResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn search_by_query(&self, text: &str) -> AppResult<Vec<Product>> {
        Ok(query::text_search(&self.products, Some(&self.index), text))
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }
}

/// Products table through sea-orm. Text search uses `ILIKE`, since
/// there is no keyword index.
#[derive(Clone)]
pub struct DbProductRepository {
    orm: DatabaseConnection,
}

impl DbProductRepository {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl ProductRepository for DbProductRepository {
    async fn get_all(&self) -> AppResult<Vec<Product>> {
        let items = Products::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }

    async fn search_by_query(&self, text: &str) -> AppResult<Vec<Product>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", text);
        let condition = Condition::any()
            .add(Expr::col(Column::Name).ilike(pattern.clone()))
            .add(Expr::col(Column::Description).ilike(pattern.clone()))
            .add(Expr::col(Column::Sku).ilike(pattern.clone()))
            .add(Expr::col(Column::Category).ilike(pattern.clone()))
            .add(Expr::col(Column::Brand).ilike(pattern.clone()))
            .add(Expr::cust_with_values(
                "array_to_string(tags, ' ') ILIKE ?",
                [pattern],
            ));

        let items = Products::find()
            .filter(condition)
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect::<Vec<_>>();
        tracing::debug!(query = %text, hits = items.len(), "database product search");
        Ok(items)
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Product>> {
        let product = Products::find()
            .filter(Column::Id.eq(id))
            .one(&self.orm)
            .await?
            .map(product_from_entity);
        Ok(product)
    }
}

pub fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        original_price: model.original_price,
        discount: model.discount,
        category: model.category,
        brand: model.brand,
        rating: model.rating,
        reviews: model.reviews,
        stock: model.stock,
        tags: model.tags,
        sku: model.sku,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_run_query_uses_the_index() {
        let repo = InMemoryProductRepository::from_fixture();
        let query = SearchQuery {
            text: Some("gaming mouse".into()),
            ..Default::default()
        };
        let outcome = repo.run_query(&query).await.expect("query");
        assert!(outcome.items.iter().any(|p| p.id == "1"));
        assert_eq!(outcome.total, outcome.items.len());
    }

    #[tokio::test]
    async fn in_memory_get_by_id() {
        let repo = InMemoryProductRepository::from_fixture();
        let found = repo.get_by_id("5").await.expect("lookup");
        assert_eq!(found.map(|p| p.name), Some("4K Ultra HD Monitor".to_string()));
        assert!(repo.get_by_id("missing").await.expect("lookup").is_none());
    }
}

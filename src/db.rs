use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseConnection, SqlxPostgresConnector, Statement};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tokio::fs;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// SeaORM connection sharing the sqlx pool.
pub fn create_orm_conn(pool: &DbPool) -> OrmConn {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone())
}

/// Minimal migration runner that executes SQL files in `migrations/` in filename order.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let mut entries = fs::read_dir("migrations").await?;
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();

    let backend = conn.get_database_backend();
    for file in files {
        tracing::info!(file = %file.display(), "applying migration");
        let sql = fs::read_to_string(&file).await?;
        // Postgres prepared statements cannot contain multiple commands,
        // so split the migration file and run each statement individually.
        for stmt in sql.split(';') {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            let statement = format!("{stmt};");
            conn.execute(Statement::from_string(backend, statement))
                .await?;
        }
    }

    Ok(())
}

/// Insert the bundled catalog and coupon fixtures. Existing rows are left alone.
pub async fn seed_catalog(pool: &DbPool) -> Result<()> {
    for p in crate::catalog::fixture::products() {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, original_price, discount,
                category, brand, rating, reviews, stock, tags, sku, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&p.id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.price)
        .bind(p.original_price)
        .bind(p.discount)
        .bind(&p.category)
        .bind(&p.brand)
        .bind(p.rating)
        .bind(p.reviews)
        .bind(p.stock)
        .bind(&p.tags)
        .bind(&p.sku)
        .bind(p.created_at)
        .execute(pool)
        .await?;
    }

    for c in crate::coupons::fixture::coupons() {
        sqlx::query(
            r#"
            INSERT INTO coupons (code, description, coupon_type, value, min_order_amount,
                max_discount, usage_limit, used_count, valid_from, valid_until, is_active,
                applicable_categories)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(&c.code)
        .bind(&c.description)
        .bind(c.coupon_type.as_str())
        .bind(c.value)
        .bind(c.min_order_amount)
        .bind(c.max_discount)
        .bind(c.usage_limit)
        .bind(c.used_count)
        .bind(c.valid_from)
        .bind(c.valid_until)
        .bind(c.is_active)
        .bind(&c.applicable_categories)
        .execute(pool)
        .await?;
    }

    tracing::info!("catalog fixtures seeded");
    Ok(())
}

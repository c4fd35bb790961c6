use storefront_api::{
    config::AppConfig,
    db::{DbPool, create_orm_conn, create_pool, run_migrations, seed_catalog},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&create_orm_conn(&pool)).await?;

    let admin_id = ensure_user_with_role(&pool, "admin@example.com", "admin12345", "admin").await?;
    let user_id = ensure_user_with_role(&pool, "user@example.com", "user12345", "user").await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user_with_role(
    pool: &DbPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

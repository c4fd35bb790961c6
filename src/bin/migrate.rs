use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&create_orm_conn(&pool)).await?;
    println!("Migrations applied");
    Ok(())
}

use sea_orm::{ConnectionTrait, Statement};
use storefront_api::{
    catalog::{DbProductRepository, ProductRepository, SearchQuery, SortKey},
    config::CatalogSource,
    db::{create_pool, run_migrations, seed_catalog},
    state::AppState,
};

fn ids(products: &[storefront_api::models::Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

fn text(q: &str) -> SearchQuery {
    SearchQuery {
        text: Some(q.into()),
        ..Default::default()
    }
}

// Postgres text search over the seeded catalog. Needs a database.
#[tokio::test]
async fn database_search_matches_fields_and_refines() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run catalog tests.");
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let repo = DbProductRepository::new(state.orm.clone());

    // Only product 12 carries this word, and only as a tag.
    let camera = repo.run_query(&text("camera")).await?;
    assert_eq!(ids(&camera.items), vec!["12"]);

    let sku = repo.run_query(&text("zen-gmp")).await?;
    assert_eq!(ids(&sku.items), vec!["1"]);

    let brand = repo.run_query(&text("AUREL")).await?;
    assert_eq!(ids(&brand.items), vec!["2", "6", "8"]);

    let limited = repo
        .run_query(&SearchQuery {
            text: Some("wireless".into()),
            limit: Some(2),
            ..Default::default()
        })
        .await?;
    assert_eq!(limited.total, 4);
    assert_eq!(ids(&limited.items), vec!["1", "2"]);

    let refined = repo
        .run_query(&SearchQuery {
            text: Some("bluetooth".into()),
            category: Some("audio".into()),
            price_max: Some(3000),
            ..Default::default()
        })
        .await?;
    assert_eq!(ids(&refined.items), vec!["6"]);

    let sorted = repo
        .run_query(&SearchQuery {
            category: Some("Audio".into()),
            sort: Some(SortKey::PriceHigh),
            ..Default::default()
        })
        .await?;
    assert_eq!(ids(&sorted.items), vec!["8", "2", "6"]);

    let nothing = repo.run_query(&text("zzz-not-a-product")).await?;
    assert_eq!(nothing.total, 0);

    assert_eq!(repo.get_all().await?.len(), 12);
    assert!(repo.get_by_id("missing").await?.is_none());

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let state = AppState::new(pool, CatalogSource::Database, "test-secret");
    run_migrations(&state.orm).await?;

    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE order_items, orders, cart_items, coupons, audit_logs, products, users CASCADE",
        ))
        .await?;
    seed_catalog(&state.pool).await?;

    Ok(state)
}

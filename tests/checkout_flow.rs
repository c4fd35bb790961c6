use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use storefront_api::{
    config::CatalogSource,
    db::{create_pool, run_migrations, seed_catalog},
    dto::{cart::AddToCartRequest, orders::CheckoutRequest},
    entity::{Coupons, Products, users::ActiveModel as UserActive},
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::Pagination,
    services::{cart_service, order_service},
    state::AppState,
};
use uuid::Uuid;

// Cart -> rejected coupon -> checkout with WELCOME10. Needs a database.
#[tokio::test]
async fn checkout_applies_and_redeems_coupon() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run checkout tests.");
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let user = AuthUser {
        user_id: create_user(&state, "shopper@example.com").await?,
        role: "user".into(),
    };

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: "7".into(),
            quantity: 1,
        },
    )
    .await?;

    // 1499 is below SAVE500's minimum of 3000.
    let rejected = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            address: "1 Main Street".into(),
            payment_method: "card".into(),
            coupon_code: Some("SAVE500".into()),
        },
    )
    .await;
    assert!(matches!(rejected, Err(AppError::CouponRejected)));

    let cart = cart_service::list_cart(&state, &user, Pagination::default()).await?;
    assert_eq!(cart.data.expect("cart").items.len(), 1, "rejected checkout keeps the cart");

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: "1".into(),
            quantity: 2,
        },
    )
    .await?;

    let resp = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            address: "1 Main Street".into(),
            payment_method: "card".into(),
            coupon_code: Some("welcome10".into()),
        },
    )
    .await?;
    let placed = resp.data.expect("order");
    // 1499 + 2 * 2499 = 6497; ten percent is 649, capped at 500.
    assert_eq!(placed.order.subtotal, 6497);
    assert_eq!(placed.order.discount_amount, 500);
    assert_eq!(placed.order.total_amount, 5997);
    assert_eq!(placed.order.coupon_code.as_deref(), Some("WELCOME10"));
    assert_eq!(placed.items.len(), 2);

    let welcome = Coupons::find_by_id("WELCOME10".to_string())
        .one(&state.orm)
        .await?
        .expect("coupon row");
    assert_eq!(welcome.used_count, 1);

    let mouse = Products::find_by_id("1".to_string())
        .one(&state.orm)
        .await?
        .expect("product row");
    assert_eq!(mouse.stock, 43);

    let cart = cart_service::list_cart(&state, &user, Pagination::default()).await?;
    assert!(cart.data.expect("cart").items.is_empty());

    let empty = order_service::checkout(
        &state,
        &user,
        CheckoutRequest {
            address: "1 Main Street".into(),
            payment_method: "card".into(),
            coupon_code: None,
        },
    )
    .await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

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

async fn create_user(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set("user".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

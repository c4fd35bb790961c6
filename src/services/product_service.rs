use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    catalog::repository::product_from_entity,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    dto::search::SearchParams,
    entity::products::{ActiveModel, Column, Entity as Products},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Product, derive_discount},
    response::{ApiResponse, Meta},
    services::search_service::{build_query, run_catalog_query},
    state::AppState,
};

/// Catalog listing. Unlike search, an empty `q` lists everything.
pub async fn list_products(
    state: &AppState,
    params: SearchParams,
) -> AppResult<ApiResponse<ProductList>> {
    let query = build_query(&params)?;
    let outcome = run_catalog_query(state.products.as_ref(), &query).await?;
    let meta = Meta::limited(query.limit, outcome.total);
    let data = ProductList {
        items: outcome.items,
    };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(state: &AppState, id: &str) -> AppResult<ApiResponse<Product>> {
    match state.products.get_by_id(id).await? {
        Some(p) => Ok(ApiResponse::success("Product", p, None)),
        None => Err(AppError::NotFound),
    }
}

fn validate_pricing(price: i64, original_price: Option<i64>) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if original_price.is_some_and(|original| original < price) {
        return Err(AppError::BadRequest(
            "original_price must be at least price".into(),
        ));
    }
    Ok(())
}

/// Merge a partial update into stored pricing. `Some(None)` clears the
/// original price.
fn resolve_pricing(
    (price, original_price): (i64, Option<i64>),
    new_price: Option<i64>,
    new_original: Option<Option<i64>>,
) -> AppResult<(i64, Option<i64>)> {
    let price = new_price.unwrap_or(price);
    let original_price = new_original.unwrap_or(original_price);
    validate_pricing(price, original_price)?;
    Ok((price, original_price))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    validate_pricing(payload.price, payload.original_price)?;
    if payload.stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }

    let sku_taken = Products::find()
        .filter(Column::Sku.eq(payload.sku.as_str()))
        .count(&state.orm)
        .await?
        > 0;
    if sku_taken {
        return Err(AppError::BadRequest("SKU is already in use".into()));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        original_price: Set(payload.original_price),
        discount: Set(derive_discount(payload.price, payload.original_price)),
        category: Set(payload.category),
        brand: Set(payload.brand),
        rating: Set(0.0),
        reviews: Set(0),
        stock: Set(payload.stock),
        tags: Set(payload.tags),
        sku: Set(payload.sku),
        created_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id.to_string())
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let (price, original_price) = resolve_pricing(
        (existing.price, existing.original_price),
        payload.price,
        payload.original_price,
    )?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(brand);
    }
    if let Some(stock) = payload.stock {
        if stock < 0 {
            return Err(AppError::BadRequest("stock must not be negative".into()));
        }
        active.stock = Set(stock);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(tags);
    }
    active.price = Set(price);
    active.original_price = Set(original_price);
    active.discount = Set(derive_discount(price, original_price));

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id.to_string())
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id, "at": Utc::now() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_price_below_price_is_rejected() {
        assert!(validate_pricing(1000, Some(900)).is_err());
        assert!(validate_pricing(-1, None).is_err());
        assert!(validate_pricing(1000, Some(1000)).is_ok());
    }

    #[test]
    fn update_can_clear_original_price() {
        let stored = (2499, Some(3499));
        assert_eq!(resolve_pricing(stored, None, None).ok(), Some((2499, Some(3499))));
        assert_eq!(resolve_pricing(stored, Some(3999), Some(None)).ok(), Some((3999, None)));
        assert_eq!(
            resolve_pricing(stored, Some(3999), Some(Some(4999))).ok(),
            Some((3999, Some(4999)))
        );
        // Raising the price past the kept original still fails.
        assert!(resolve_pricing(stored, Some(3999), None).is_err());
    }

    #[test]
    fn discount_is_derived_from_original_price() {
        assert_eq!(derive_discount(2499, Some(3499)), Some(29));
        assert_eq!(derive_discount(2499, None), None);
    }
}

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    catalog::repository::product_from_entity,
    dto::cart::{AddToCartRequest, CartItemDto, CartList},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems, Model as CartModel},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_cart(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<CartList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_desc(CartCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let everything = finder
        .clone()
        .find_also_related(Products)
        .all(&state.orm)
        .await?;
    let subtotal: i64 = everything
        .iter()
        .filter_map(|(item, product)| product.as_ref().map(|p| p.price * item.quantity as i64))
        .sum();

    let items = finder
        .find_also_related(Products)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(item, product)| {
            let product = product_from_entity(product?);
            Some(CartItemDto {
                id: item.id,
                line_total: product.price * item.quantity as i64,
                product,
                quantity: item.quantity,
            })
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("OK", CartList { items, subtotal }, Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product = Products::find_by_id(payload.product_id.clone())
        .one(&state.orm)
        .await?
        .map(product_from_entity)
        .ok_or_else(|| AppError::BadRequest("product not found".to_string()))?;
    if product.stock < payload.quantity {
        return Err(AppError::BadRequest(format!(
            "Insufficient stock for product {}",
            product.id
        )));
    }

    let existing = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(payload.product_id.as_str()))
        .one(&state.orm)
        .await?;

    let cart_item = match existing {
        Some(item) => {
            let mut active: CartActive = item.into();
            active.quantity = Set(payload.quantity);
            active.update(&state.orm).await?
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                product_id: Set(payload.product_id.clone()),
                quantity: Set(payload.quantity),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    audit::record(
        &state.pool,
        Some(user.user_id),
        "cart_update",
        "cart_items",
        serde_json::json!({ "product_id": payload.product_id, "quantity": payload.quantity }),
    )
    .await;

    Ok(ApiResponse::success("OK", cart_item_from_entity(cart_item), None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        "cart_items",
        serde_json::json!({ "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn cart_item_from_entity(model: CartModel) -> CartItem {
    CartItem {
        id: model.id,
        product_id: model.product_id,
        user_id: model.user_id,
        quantity: model.quantity,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}

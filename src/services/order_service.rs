use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    coupons::{CouponSession, CouponState, store as coupon_store},
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Turn the caller's cart into an order.
///
/// Everything runs in one transaction. An optional coupon is evaluated
/// against the cart subtotal and redeemed with a conditional increment,
/// and stock is decremented only where enough remains. Any failure rolls
/// the whole checkout back.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.address.trim().is_empty() {
        return Err(AppError::BadRequest("address is required".into()));
    }
    if payload.payment_method.trim().is_empty() {
        return Err(AppError::BadRequest("payment_method is required".into()));
    }

    let txn = state.orm.begin().await?;

    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .find_also_related(Products)
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let mut lines = Vec::with_capacity(rows.len());
    let mut categories: Vec<String> = Vec::new();
    let mut subtotal: i64 = 0;
    for (item, product) in rows {
        let product = product.ok_or_else(|| {
            AppError::BadRequest(format!("Product {} is no longer available", item.product_id))
        })?;
        if item.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        if product.stock < item.quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {}",
                product.id
            )));
        }
        subtotal += product.price * item.quantity as i64;
        if !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
        lines.push((product.id, product.price, item.quantity));
    }

    let mut session = CouponSession::new();
    if let Some(code) = payload.coupon_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        let coupon = coupon_store::find_by_code_in(&txn, code).await?;
        if !matches!(
            session.apply(coupon.as_ref(), subtotal, &categories, Utc::now()),
            CouponState::Applied(_)
        ) {
            return Err(AppError::CouponRejected);
        }
        if !coupon_store::redeem(&txn, session.applied().map_or(code, |a| a.code.as_str())).await? {
            return Err(AppError::CouponRejected);
        }
    }
    let discount_amount = session.discount();

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        subtotal: Set(subtotal),
        discount_amount: Set(discount_amount),
        total_amount: Set(subtotal - discount_amount),
        coupon_code: Set(session.applied().map(|a| a.code.clone())),
        status: Set("pending".into()),
        invoice_number: Set(build_invoice_number(order_id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::new();

    for (product_id, price, quantity) in lines {
        let reserved = Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
            .filter(ProdCol::Id.eq(product_id.as_str()))
            .filter(ProdCol::Stock.gte(quantity))
            .exec(&txn)
            .await?;
        if reserved.rows_affected == 0 {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {}",
                product_id
            )));
        }

        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            price: Set(price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        order_items.push(order_item_from_entity(item));
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        subtotal,
        discount = discount_amount,
        coupon = ?order.coupon_code,
        "checkout complete"
    );
    audit::record(
        &state.pool,
        Some(user.user_id),
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "coupon_code": order.coupon_code }),
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        OrderWithItems {
            order: order_from_entity(order),
            items: order_items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        subtotal: model.subtotal,
        discount_amount: model.discount_amount,
        total_amount: model.total_amount,
        coupon_code: model.coupon_code,
        status: model.status,
        invoice_number: model.invoice_number,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("INV-{}-{}", date, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_number_has_date_and_short_id() {
        let id = Uuid::new_v4();
        let invoice = build_invoice_number(id);
        assert!(invoice.starts_with("INV-"));
        assert_eq!(invoice.len(), "INV-20260101-".len() + 8);
        assert!(invoice.ends_with(&id.simple().to_string()[..8]));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

/// A catalog entry. Prices are whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub original_price: Option<i64>,
    pub discount: Option<i32>,
    pub category: String,
    pub brand: String,
    pub rating: f64,
    pub reviews: i32,
    pub stock: i32,
    pub tags: Vec<String>,
    pub sku: String,
    pub created_at: DateTime<Utc>,
}

/// Percent saved relative to `original_price`, when one is set.
pub fn derive_discount(price: i64, original_price: Option<i64>) -> Option<i32> {
    match original_price {
        Some(original) if original > 0 && original >= price => {
            Some((((original - price) as f64 / original as f64) * 100.0).round() as i32)
        }
        _ => None,
    }
}

impl Product {
    /// Stored discount percent, or the one implied by `original_price`.
    pub fn discount_percent(&self) -> i32 {
        self.discount
            .or_else(|| derive_discount(self.price, self.original_price))
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: String,
    pub user_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub total_amount: i64,
    pub coupon_code: Option<String>,
    pub status: String,
    pub invoice_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub original_price: Option<i64>,
    pub category: String,
    pub brand: String,
    pub stock: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sku: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    /// Absent keeps the stored value; `null` clears it.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>, nullable)]
    pub original_price: Option<Option<i64>>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub stock: Option<i32>,
    pub tags: Option<Vec<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_price_distinguishes_absent_from_null() {
        let absent: UpdateProductRequest = serde_json::from_str(r#"{"price": 10}"#).expect("absent");
        assert_eq!(absent.original_price, None);

        let cleared: UpdateProductRequest =
            serde_json::from_str(r#"{"original_price": null}"#).expect("null");
        assert_eq!(cleared.original_price, Some(None));

        let set: UpdateProductRequest =
            serde_json::from_str(r#"{"original_price": 4999}"#).expect("value");
        assert_eq!(set.original_price, Some(Some(4999)));
    }
}

// src/dtos/product.rs
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub description: String,
    pub category: String,
    pub stock: i32,
    /// Always two fractional digits, serialized as a string.
    pub price: Decimal,
    pub available: bool,
}

// Convert from Model to Response DTO
impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            description: product.description,
            category: product.category,
            stock: product.stock,
            price: crate::money::round_amount(product.price),
            available: product.available,
        }
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry. Never hard-deleted; `available = false` hides it from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub description: String,
    pub category: String,
    pub stock: i32,
    pub price: Decimal,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub description: String,
    pub category: String,
    pub stock: i32,
    pub price: Decimal,
}

/// Partial attribute update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    pub price: Option<Decimal>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.category.is_none()
            && self.stock.is_none()
            && self.price.is_none()
    }

    pub fn apply(&self, product: &mut Product) {
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}

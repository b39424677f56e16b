use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Stored purchase. Write-once; the owning account holds the back-reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub items: Vec<LineItem>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    pub items: Vec<LineItem>,
    pub date: DateTime<Utc>,
}

/// Read-side rendering of a purchase, priced from the products as they are *now*.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseView {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub total: Decimal,
    pub items: Vec<PurchaseViewItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseViewItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

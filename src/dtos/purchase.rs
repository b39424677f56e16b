use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{LineItem, Purchase};

/// Body of `POST /purchases/new`.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub id: Uuid,
    pub items: Vec<LineItem>,
    pub date: DateTime<Utc>,
}

impl From<Purchase> for PurchaseResponse {
    fn from(purchase: Purchase) -> Self {
        Self {
            id: purchase.id,
            items: purchase.items,
            date: purchase.date,
        }
    }
}

//! Read side of purchases.
//!
//! Views are priced from the products as they are when the view is built, not as
//! they were at checkout. A price change after the fact changes the total of every
//! earlier purchase containing that product.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Purchase, PurchaseView, PurchaseViewItem};
use crate::money::{line_total, round_amount};
use crate::store::{AccountStore, InventoryStore, PurchaseStore};

#[derive(Clone)]
pub struct PurchaseQueryService {
    inventory: Arc<dyn InventoryStore>,
    accounts: Arc<dyn AccountStore>,
    purchases: Arc<dyn PurchaseStore>,
}

impl PurchaseQueryService {
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        accounts: Arc<dyn AccountStore>,
        purchases: Arc<dyn PurchaseStore>,
    ) -> Self {
        Self { inventory, accounts, purchases }
    }

    /// Joins each line against the current product. A line whose product no longer
    /// exists fails the whole view with `NotFound`.
    pub async fn view(&self, purchase: &Purchase) -> Result<PurchaseView> {
        let mut items = Vec::with_capacity(purchase.items.len());
        for item in &purchase.items {
            let product = self
                .inventory
                .find_by_id(item.product_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Product {} not found", item.product_id)))?;
            items.push(PurchaseViewItem {
                product_id: item.product_id,
                name: product.description,
                price: round_amount(product.price),
                quantity: item.quantity,
            });
        }

        let total = line_total(items.iter().map(|i| (i.price, i.quantity)));

        Ok(PurchaseView {
            id: purchase.id,
            date: purchase.date,
            total,
            items,
        })
    }

    pub async fn all(&self) -> Result<Vec<PurchaseView>> {
        let purchases = self.purchases.find_all().await?;
        self.views(&purchases).await
    }

    pub async fn by_id(&self, id: Uuid) -> Result<Option<PurchaseView>> {
        match self.purchases.find_by_id(id).await? {
            Some(purchase) => Ok(Some(self.view(&purchase).await?)),
            None => Ok(None),
        }
    }

    /// Purchases referenced by the account, in the order they were made.
    pub async fn for_account(&self, account_id: Uuid) -> Result<Vec<PurchaseView>> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;
        let purchases = self.purchases.find_by_ids(&account.purchases).await?;
        self.views(&purchases).await
    }

    async fn views(&self, purchases: &[Purchase]) -> Result<Vec<PurchaseView>> {
        let mut views = Vec::with_capacity(purchases.len());
        for purchase in purchases {
            views.push(self.view(purchase).await?);
        }
        Ok(views)
    }
}

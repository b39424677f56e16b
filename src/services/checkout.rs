//! Checkout saga.
//!
//! A checkout is `validate_stock` followed by `submit_purchase`. The submit step
//! runs three kinds of store writes in order and undoes the earlier ones when a
//! later one fails:
//!
//! | step                         | compensation                         |
//! |------------------------------|--------------------------------------|
//! | conditional stock decrement  | `restore_stock` (reverse line order) |
//! | insert purchase record       | `discard` the record                 |
//! | append reference to account  | (last step, nothing after it)        |
//!
//! Decrements are compare-and-decrement, so two checkouts racing for the same
//! stock can both pass validation but only one of them gets the units.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{LineItem, NewPurchase, Purchase};
use crate::store::{AccountStore, InventoryStore, PurchaseStore};

pub const INSUFFICIENT_STOCK: &str = "One or more of the selected products does not exist or is out of stock";

#[derive(Clone)]
pub struct CheckoutEngine {
    inventory: Arc<dyn InventoryStore>,
    accounts: Arc<dyn AccountStore>,
    purchases: Arc<dyn PurchaseStore>,
}

impl CheckoutEngine {
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        accounts: Arc<dyn AccountStore>,
        purchases: Arc<dyn PurchaseStore>,
    ) -> Self {
        Self { inventory, accounts, purchases }
    }

    /// True when every line names an existing product whose stock covers the quantity.
    /// Checks lines in order and stops at the first one that fails. Read-only.
    pub async fn validate_stock(&self, items: &[LineItem]) -> Result<bool> {
        for item in items {
            match self.inventory.find_by_id(item.product_id).await? {
                Some(product) if item.quantity <= product.stock => {}
                Some(product) => {
                    debug!(product_id = %item.product_id, requested = item.quantity, stock = product.stock, "Insufficient stock");
                    return Ok(false);
                }
                None => {
                    debug!(product_id = %item.product_id, "Unknown product in checkout");
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Decrements stock for every line, records the purchase and links it to the account.
    ///
    /// Callers run [`validate_stock`](Self::validate_stock) first; this method does not
    /// re-validate up front. A line whose stock is gone by the time it is decremented
    /// still fails with `Conflict`, and every step already applied is compensated.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn submit_purchase(&self, items: Vec<LineItem>, account_id: Uuid) -> Result<Purchase> {
        let mut applied: Vec<LineItem> = Vec::with_capacity(items.len());

        for item in &items {
            match self.inventory.decrement_stock(item.product_id, item.quantity).await {
                Ok(true) => applied.push(*item),
                Ok(false) => {
                    debug!(product_id = %item.product_id, "Stock decrement not applied");
                    self.restore_stock(&applied).await;
                    return Err(AppError::conflict(INSUFFICIENT_STOCK));
                }
                Err(e) => {
                    self.restore_stock(&applied).await;
                    return Err(e);
                }
            }
        }

        let purchase = match self
            .purchases
            .insert(NewPurchase { items, date: Utc::now() })
            .await
        {
            Ok(purchase) => purchase,
            Err(e) => {
                error!(error = %e, "Purchase insert failed");
                self.restore_stock(&applied).await;
                return Err(e);
            }
        };

        let link_error = match self.accounts.append_purchase(account_id, purchase.id).await {
            Ok(true) => None,
            Ok(false) => Some(AppError::not_found("Account not found")),
            Err(e) => Some(e),
        };
        if let Some(e) = link_error {
            error!(error = %e, purchase_id = %purchase.id, "Linking purchase to account failed");
            if let Err(discard_err) = self.purchases.discard(purchase.id).await {
                error!(error = %discard_err, purchase_id = %purchase.id, "Could not discard unlinked purchase");
            }
            self.restore_stock(&applied).await;
            return Err(e);
        }

        info!(purchase_id = %purchase.id, %account_id, "Purchase created");
        Ok(purchase)
    }

    /// Validation then submission; the path the HTTP layer uses.
    pub async fn checkout(&self, items: Vec<LineItem>, account_id: Uuid) -> Result<Purchase> {
        if !self.validate_stock(&items).await? {
            return Err(AppError::conflict(INSUFFICIENT_STOCK));
        }
        self.submit_purchase(items, account_id).await
    }

    async fn restore_stock(&self, applied: &[LineItem]) {
        for item in applied.iter().rev() {
            match self.inventory.restore_stock(item.product_id, item.quantity).await {
                Ok(()) => warn!(product_id = %item.product_id, quantity = item.quantity, "Stock restored"),
                Err(e) => error!(
                    error = %e,
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    "Stock restore failed"
                ),
            }
        }
    }
}

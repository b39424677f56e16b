//! Persistence seams.
//!
//! Each collection is reached only through one of these traits. `PgStore` is the
//! production backend and `MemoryStore` backs tests and database-less runs. Every
//! method is a potential suspension point; no method holds a lock across calls.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Account, NewAccount, NewProduct, NewPurchase, Product, ProductChanges, Purchase};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Liveness probe for `/health`.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_available(&self) -> Result<Vec<Product>>;

    async fn find_by_description(&self, description: &str) -> Result<Option<Product>>;

    /// Returns the product regardless of availability.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>>;

    /// Inserts with `available = true`.
    async fn insert(&self, product: NewProduct) -> Result<Product>;

    /// Flips availability only when the product is in the other state.
    /// `None` means nothing changed (missing product or already in `available`).
    async fn set_availability(&self, id: Uuid, available: bool) -> Result<Option<Product>>;

    /// Applies `changes` only to an available product; `None` when missing or inactive.
    async fn update_attributes(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>>;

    /// Atomic compare-and-decrement: subtracts `quantity` only when stock covers it.
    /// Returns whether the decrement was applied.
    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<bool>;

    /// Adds `quantity` back. Used to compensate a decrement.
    async fn restore_stock(&self, id: Uuid, quantity: i32) -> Result<()>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Account>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    /// Fails with `Conflict` when the email is taken.
    async fn insert(&self, account: NewAccount) -> Result<Account>;

    /// Returns false when the account does not exist.
    async fn append_purchase(&self, account_id: Uuid, purchase_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Purchase>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Purchase>>;

    /// Purchases in the order of `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Purchase>>;

    async fn insert(&self, purchase: NewPurchase) -> Result<Purchase>;

    /// Removes a purchase that never got linked to its account. Compensation only.
    async fn discard(&self, id: Uuid) -> Result<()>;
}

/// Sorts `found` to follow `ids`, dropping ids with no match.
pub(crate) fn order_by_ids(ids: &[Uuid], found: Vec<Purchase>) -> Vec<Purchase> {
    let mut by_id: std::collections::HashMap<Uuid, Purchase> =
        found.into_iter().map(|p| (p.id, p)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

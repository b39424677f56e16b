// src/state.rs
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::checkout::CheckoutEngine;
use crate::services::purchase_query::PurchaseQueryService;
use crate::store::{AccountStore, InventoryStore, PurchaseStore};

/// Handles built once at startup and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<dyn InventoryStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub purchases: Arc<dyn PurchaseStore>,
    pub auth: AuthConfig,
}

impl AppState {
    /// Uses one backend for all three collections.
    pub fn new<S>(store: Arc<S>, auth: AuthConfig) -> Self
    where
        S: InventoryStore + AccountStore + PurchaseStore + 'static,
    {
        Self {
            inventory: store.clone(),
            accounts: store.clone(),
            purchases: store,
            auth,
        }
    }

    pub fn checkout(&self) -> CheckoutEngine {
        CheckoutEngine::new(self.inventory.clone(), self.accounts.clone(), self.purchases.clone())
    }

    pub fn purchase_query(&self) -> PurchaseQueryService {
        PurchaseQueryService::new(self.inventory.clone(), self.accounts.clone(), self.purchases.clone())
    }
}

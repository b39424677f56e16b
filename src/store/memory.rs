use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

use super::{AccountStore, InventoryStore, PurchaseStore};
use crate::error::{AppError, Result};
use crate::models::{Account, NewAccount, NewProduct, NewPurchase, Product, ProductChanges, Purchase};

const DUPLICATE_DESCRIPTION: &str = "A product with that description already exists";

/// In-process store. Each operation takes the collection lock once, so every
/// single operation is atomic while sequences of operations may interleave.
#[derive(Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
    accounts: Mutex<Vec<Account>>,
    purchases: Mutex<HashMap<Uuid, Purchase>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn find_available(&self) -> Result<Vec<Product>> {
        Ok(self.products.lock().iter().filter(|p| p.available).cloned().collect())
    }

    async fn find_by_description(&self, description: &str) -> Result<Option<Product>> {
        Ok(self
            .products
            .lock()
            .iter()
            .find(|p| p.description == description)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.products.lock().iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let mut products = self.products.lock();
        if products.iter().any(|p| p.description == product.description) {
            return Err(AppError::conflict(DUPLICATE_DESCRIPTION));
        }
        let product = Product {
            id: Uuid::new_v4(),
            description: product.description,
            category: product.category,
            stock: product.stock,
            price: product.price,
            available: true,
        };
        products.push(product.clone());
        Ok(product)
    }

    async fn set_availability(&self, id: Uuid, available: bool) -> Result<Option<Product>> {
        let mut products = self.products.lock();
        Ok(products
            .iter_mut()
            .find(|p| p.id == id && p.available != available)
            .map(|p| {
                p.available = available;
                p.clone()
            }))
    }

    async fn update_attributes(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>> {
        let mut products = self.products.lock();
        if let Some(description) = &changes.description {
            if products.iter().any(|p| p.id != id && &p.description == description) {
                return Err(AppError::conflict(DUPLICATE_DESCRIPTION));
            }
        }
        Ok(products
            .iter_mut()
            .find(|p| p.id == id && p.available)
            .map(|p| {
                changes.apply(p);
                p.clone()
            }))
    }

    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<bool> {
        let mut products = self.products.lock();
        match products.iter_mut().find(|p| p.id == id) {
            Some(p) if p.stock >= quantity => {
                p.stock -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore_stock(&self, id: Uuid, quantity: i32) -> Result<()> {
        let mut products = self.products.lock();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
        product.stock += quantity;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.lock().clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.accounts.lock().iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.accounts.lock().iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account> {
        let mut accounts = self.accounts.lock();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AppError::conflict("Email already registered"));
        }
        let account = Account {
            id: Uuid::new_v4(),
            email: account.email,
            password_hash: account.password_hash,
            name: account.name,
            lastname: account.lastname,
            role: account.role,
            purchases: Vec::new(),
            created_at: Utc::now(),
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn append_purchase(&self, account_id: Uuid, purchase_id: Uuid) -> Result<bool> {
        let mut accounts = self.accounts.lock();
        Ok(match accounts.iter_mut().find(|a| a.id == account_id) {
            Some(account) => {
                account.purchases.push(purchase_id);
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl PurchaseStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Purchase>> {
        let mut all: Vec<Purchase> = self.purchases.lock().values().cloned().collect();
        all.sort_by_key(|p| p.date);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Purchase>> {
        Ok(self.purchases.lock().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Purchase>> {
        let purchases = self.purchases.lock();
        Ok(ids.iter().filter_map(|id| purchases.get(id).cloned()).collect())
    }

    async fn insert(&self, purchase: NewPurchase) -> Result<Purchase> {
        let purchase = Purchase {
            id: Uuid::new_v4(),
            items: purchase.items,
            date: purchase.date,
        };
        self.purchases.lock().insert(purchase.id, purchase.clone());
        Ok(purchase)
    }

    async fn discard(&self, id: Uuid) -> Result<()> {
        self.purchases.lock().remove(&id);
        Ok(())
    }
}

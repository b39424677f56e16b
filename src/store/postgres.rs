use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Error as SqlxError, PgPool};
use uuid::Uuid;

use super::{order_by_ids, AccountStore, InventoryStore, PurchaseStore};
use crate::config::CollectionNames;
use crate::error::{AppError, Result};
use crate::models::{
    Account, LineItem, NewAccount, NewProduct, NewPurchase, Product, ProductChanges, Purchase, Role,
};

const PRODUCT_COLUMNS: &str = "id, description, category, stock, price, available";
const ACCOUNT_COLUMNS: &str = "id, email, password_hash, name, lastname, role, purchases, created_at";

fn map_unique_violation(err: SqlxError, message: &str) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::conflict(message)
        }
        other => other.into(),
    }
}

/// PostgreSQL backend. One table per collection, named by `CollectionNames`
/// (validated as identifiers when the config is loaded).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    tables: CollectionNames,
}

impl PgStore {
    pub fn new(pool: PgPool, tables: CollectionNames) -> Self {
        Self { pool, tables }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    lastname: String,
    role: String,
    purchases: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self> {
        Ok(Account {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            lastname: row.lastname,
            role: row.role.parse::<Role>().map_err(AppError::internal)?,
            purchases: row.purchases,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    items: Json<Vec<LineItem>>,
    date: DateTime<Utc>,
}

impl From<PurchaseRow> for Purchase {
    fn from(row: PurchaseRow) -> Self {
        Purchase {
            id: row.id,
            items: row.items.0,
            date: row.date,
        }
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn ping(&self) -> Result<()> {
        crate::database::check_health(&self.pool).await
    }

    async fn find_available(&self) -> Result<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM {} WHERE available ORDER BY description",
            self.tables.products
        );
        Ok(sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_description(&self, description: &str) -> Result<Option<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM {} WHERE description = $1 LIMIT 1",
            self.tables.products
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(description)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM {} WHERE id = $1", self.tables.products);
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let sql = format!(
            "INSERT INTO {} (id, description, category, stock, price, available)
             VALUES ($1, $2, $3, $4, $5, TRUE)
             RETURNING {PRODUCT_COLUMNS}",
            self.tables.products
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(Uuid::new_v4())
            .bind(&product.description)
            .bind(&product.category)
            .bind(product.stock)
            .bind(product.price)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "A product with that description already exists"))
    }

    async fn set_availability(&self, id: Uuid, available: bool) -> Result<Option<Product>> {
        let sql = format!(
            "UPDATE {} SET available = $2
             WHERE id = $1 AND available <> $2
             RETURNING {PRODUCT_COLUMNS}",
            self.tables.products
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(available)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_attributes(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>> {
        let sql = format!(
            "UPDATE {} SET
             description = COALESCE($2, description),
             category = COALESCE($3, category),
             stock = COALESCE($4, stock),
             price = COALESCE($5, price)
             WHERE id = $1 AND available
             RETURNING {PRODUCT_COLUMNS}",
            self.tables.products
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(changes.description)
            .bind(changes.category)
            .bind(changes.stock)
            .bind(changes.price)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "A product with that description already exists"))
    }

    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<bool> {
        // Single conditional statement: the row lock makes check and write one step.
        let sql = format!(
            "UPDATE {} SET stock = stock - $2 WHERE id = $1 AND stock >= $2",
            self.tables.products
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(quantity)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn restore_stock(&self, id: Uuid, quantity: i32) -> Result<()> {
        let sql = format!("UPDATE {} SET stock = stock + $2 WHERE id = $1", self.tables.products);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(quantity)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_all(&self) -> Result<Vec<Account>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM {} ORDER BY created_at",
            self.tables.users
        );
        sqlx::query_as::<_, AccountRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM {} WHERE email = $1", self.tables.users);
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM {} WHERE id = $1", self.tables.users);
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn insert(&self, account: NewAccount) -> Result<Account> {
        let sql = format!(
            "INSERT INTO {} (id, email, password_hash, name, lastname, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ACCOUNT_COLUMNS}",
            self.tables.users
        );
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.name)
            .bind(&account.lastname)
            .bind(account.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Email already registered"))?
            .try_into()
    }

    async fn append_purchase(&self, account_id: Uuid, purchase_id: Uuid) -> Result<bool> {
        let sql = format!(
            "UPDATE {} SET purchases = array_append(purchases, $2) WHERE id = $1",
            self.tables.users
        );
        let result = sqlx::query(&sql)
            .bind(account_id)
            .bind(purchase_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl PurchaseStore for PgStore {
    async fn find_all(&self) -> Result<Vec<Purchase>> {
        let sql = format!("SELECT id, items, date FROM {} ORDER BY date", self.tables.purchases);
        let rows = sqlx::query_as::<_, PurchaseRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Purchase::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Purchase>> {
        let sql = format!("SELECT id, items, date FROM {} WHERE id = $1", self.tables.purchases);
        let row = sqlx::query_as::<_, PurchaseRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Purchase::from))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Purchase>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, items, date FROM {} WHERE id = ANY($1)",
            self.tables.purchases
        );
        let rows = sqlx::query_as::<_, PurchaseRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(order_by_ids(ids, rows.into_iter().map(Purchase::from).collect()))
    }

    async fn insert(&self, purchase: NewPurchase) -> Result<Purchase> {
        let sql = format!(
            "INSERT INTO {} (id, items, date) VALUES ($1, $2, $3) RETURNING id, items, date",
            self.tables.purchases
        );
        let row = sqlx::query_as::<_, PurchaseRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(Json(&purchase.items))
            .bind(purchase.date)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn discard(&self, id: Uuid) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.tables.purchases);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}

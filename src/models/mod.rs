pub mod product;
pub mod purchase;
pub mod user;

pub use product::{NewProduct, Product, ProductChanges};
pub use purchase::{LineItem, NewPurchase, Purchase, PurchaseView, PurchaseViewItem};
pub use user::{Account, NewAccount, Role};

pub mod accounts;
pub mod checkout;
pub mod purchase_query;

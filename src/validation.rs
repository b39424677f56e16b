//! Request body checks and normalization, run before anything touches a store.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use uuid::Uuid;

use crate::dtos::user::RegisterUserRequest;
use crate::error::{AppError, Result};
use crate::models::{LineItem, NewProduct, ProductChanges};
use crate::money::{normalize_price, MAX_PRICE};

const MSG_REQUIRED_FIELDS: &str =
    "Missing required fields: name, lastname, email, password and password confirmation are required";
const MSG_INVALID_EMAIL: &str = "Invalid email, expected user@domain.com";
const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Registration fields after validation; email is trimmed and lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub lastname: String,
}

pub fn registration(req: RegisterUserRequest) -> Result<Registration> {
    let required = |field: Option<String>| -> Result<String> {
        field
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::bad_request(MSG_REQUIRED_FIELDS))
    };

    let email = required(req.email)?;
    let password = required(req.password)?;
    let r_password = required(req.r_password)?;
    let name = required(req.name)?;
    let lastname = required(req.lastname)?;

    let email = normalize_email(&email);
    if !is_email(&email) {
        return Err(AppError::bad_request(MSG_INVALID_EMAIL));
    }
    if password != r_password {
        return Err(AppError::bad_request(MSG_PASSWORD_MISMATCH));
    }

    Ok(Registration {
        email,
        password,
        name: name.trim().to_string(),
        lastname: lastname.trim().to_string(),
    })
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace and a dot inside the domain.
pub fn is_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty()
                && !host.starts_with('.')
                && !host.ends_with('.')
                && tld.len() >= 2
                && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

pub fn new_product(body: &Value) -> Result<NewProduct> {
    let fields = object(body)?;
    let missing = ["description", "category", "stock", "price"]
        .into_iter()
        .filter(|k| fields.get(*k).map_or(true, Value::is_null))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(AppError::unprocessable(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    Ok(NewProduct {
        description: text(fields, "description")?,
        category: text(fields, "category")?,
        stock: stock(fields)?,
        price: price(fields)?,
    })
}

pub fn product_changes(body: &Value) -> Result<ProductChanges> {
    let fields = object(body)?;
    let present = |key: &str| fields.get(key).is_some_and(|v| !v.is_null());

    let changes = ProductChanges {
        description: present("description").then(|| text(fields, "description")).transpose()?,
        category: present("category").then(|| text(fields, "category")).transpose()?,
        stock: present("stock").then(|| stock(fields)).transpose()?,
        price: present("price").then(|| price(fields)).transpose()?,
    };

    if changes.is_empty() {
        return Err(AppError::unprocessable(
            "At least one of description, category, stock or price is required",
        ));
    }
    Ok(changes)
}

/// Non-empty array of `{productId, quantity}`. Repeated products are merged into
/// one line, keeping the position of their first appearance.
pub fn purchase_items(body: &Value) -> Result<Vec<LineItem>> {
    let lines = body
        .as_array()
        .ok_or_else(|| AppError::unprocessable("Purchase body must be a list of items"))?;
    if lines.is_empty() {
        return Err(AppError::unprocessable("Purchase must contain at least one item"));
    }

    let mut items: Vec<LineItem> = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let product_id = line
            .get("productId")
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or_else(|| AppError::unprocessable(format!("Item {index}: productId is not a valid id")))?;
        let quantity = line
            .get("quantity")
            .and_then(Value::as_i64)
            .filter(|q| *q > 0)
            .and_then(|q| i32::try_from(q).ok())
            .ok_or_else(|| {
                AppError::unprocessable(format!("Item {index}: quantity must be a positive integer"))
            })?;

        match items.iter_mut().find(|i| i.product_id == product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(quantity).ok_or_else(|| {
                    AppError::unprocessable(format!("Item {index}: quantity is too large"))
                })?;
            }
            None => items.push(LineItem { product_id, quantity }),
        }
    }
    Ok(items)
}

/// Path ids that do not parse are reported exactly like ids that match nothing.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(not_found))
}

fn object(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| AppError::unprocessable("Request body must be a JSON object"))
}

fn text(fields: &Map<String, Value>, key: &str) -> Result<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::unprocessable(format!("{key} must be a non-empty string")))
}

fn stock(fields: &Map<String, Value>) -> Result<i32> {
    fields
        .get("stock")
        .and_then(Value::as_i64)
        .filter(|s| *s >= 0)
        .and_then(|s| i32::try_from(s).ok())
        .ok_or_else(|| AppError::unprocessable("stock must be a non-negative integer"))
}

/// Accepts `"19.99"` or `19.99`; JSON numbers go through their literal text, never `f64`.
fn price(fields: &Map<String, Value>) -> Result<Decimal> {
    let invalid = || {
        AppError::unprocessable(format!("price must be a decimal amount between 0 and {MAX_PRICE}"))
    };
    let parsed = match fields.get("price") {
        Some(Value::String(s)) => Decimal::from_str(s.trim()).map_err(|_| invalid())?,
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    let price = normalize_price(parsed);
    if (parsed.is_sign_negative() && !parsed.is_zero()) || price > MAX_PRICE {
        return Err(invalid());
    }
    Ok(price)
}

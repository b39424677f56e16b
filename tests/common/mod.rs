#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use storefront::config::{AdminSeed, AuthConfig, CorsConfig};
use storefront::services::accounts;
use storefront::store::MemoryStore;
use storefront::{app, AppState};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@shop.com";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const PASSWORD: &str = "hunter22";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            store.clone(),
            AuthConfig {
                jwt_secret: "integration-secret".to_string(),
                bcrypt_cost: 4,
            },
        );
        accounts::ensure_admin(
            state.accounts.as_ref(),
            &state.auth,
            &AdminSeed {
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            },
        )
        .await
        .unwrap();
        let router = app::router(state.clone(), &CorsConfig::default()).unwrap();
        Self { router, state, store }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn register(&self, email: &str) -> Value {
        let (status, body) = self
            .request(
                Method::POST,
                "/users/register",
                None,
                Some(json!({
                    "email": email,
                    "password": PASSWORD,
                    "r_password": PASSWORD,
                    "name": "Test",
                    "lastname": "User",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::GET,
                "/users/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Registers and logs in a standard user.
    pub async fn customer_token(&self, email: &str) -> String {
        self.register(email).await;
        self.login(email, PASSWORD).await
    }

    pub async fn add_product(&self, admin: &str, description: &str, stock: i64, price: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/products/add",
                Some(admin),
                Some(json!({
                    "description": description,
                    "category": "tools",
                    "stock": stock,
                    "price": price,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add product failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn stock_of(&self, product_id: &str) -> i64 {
        let (status, body) = self
            .request(Method::GET, &format!("/products/{product_id}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body["stock"].as_i64().unwrap()
    }

    pub async fn buy(&self, token: &str, lines: Value) -> (StatusCode, Value) {
        self.request(Method::POST, "/purchases/new", Some(token), Some(lines)).await
    }
}

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn added_price_is_truncated_to_cents() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .request(
            Method::POST,
            "/products/add",
            Some(&admin),
            Some(json!({ "description": "widget", "category": "tools", "stock": 1, "price": "19.999" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"], json!("19.99"));
    assert_eq!(created["available"], json!(true));

    let id = created["id"].as_str().unwrap();
    let (_, read) = app.request(Method::GET, &format!("/products/{id}"), None, None).await;
    assert_eq!(read["price"], json!("19.99"));
}

#[tokio::test]
async fn availability_toggles_are_conflicts_when_repeated() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let id = app.add_product(&admin, "widget", 1, "1.00").await;
    let unactivate = format!("/products/unactivate/{id}");
    let activate = format!("/products/activate/{id}");

    // New products start active.
    let (status, _) = app.request(Method::PUT, &activate, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.request(Method::PUT, &unactivate, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], json!(false));

    let (status, _) = app.request(Method::PUT, &unactivate, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.request(Method::GET, &format!("/products/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, listed) = app.request(Method::GET, "/products", None, None).await;
    assert!(listed.as_array().unwrap().is_empty());

    let (status, _) = app
        .request(Method::PUT, &format!("/products/update/{id}"), Some(&admin), Some(json!({ "stock": 9 })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.request(Method::PUT, &activate, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.request(Method::PUT, &activate, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_404() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let unknown = Uuid::new_v4();

    for uri in [
        format!("/products/activate/{unknown}"),
        format!("/products/unactivate/{unknown}"),
        "/products/activate/123".to_string(),
    ] {
        let (status, _) = app.request(Method::PUT, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/products/update/{unknown}"),
            Some(&admin),
            Some(json!({ "stock": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request(Method::GET, "/products/zzz", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_descriptions_conflict() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    app.add_product(&admin, "widget", 1, "1.00").await;
    let gadget = app.add_product(&admin, "gadget", 1, "1.00").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/products/add",
            Some(&admin),
            Some(json!({ "description": "widget", "category": "x", "stock": 1, "price": "2" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/products/update/{gadget}"),
            Some(&admin),
            Some(json!({ "description": "widget" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_product_bodies_are_422() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .request(Method::POST, "/products/add", Some(&admin), Some(json!({ "description": "w" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("price"));

    let id = app.add_product(&admin, "widget", 1, "1.00").await;
    let (status, _) = app
        .request(Method::PUT, &format!("/products/update/{id}"), Some(&admin), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn catalog_writes_need_an_admin() {
    let app = TestApp::new().await;
    let customer = app.customer_token("a@x.com").await;
    let body = json!({ "description": "w", "category": "c", "stock": 1, "price": "1" });

    let (status, _) = app.request(Method::POST, "/products/add", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::POST, "/products/add", Some(&customer), Some(body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn prices_beyond_column_precision_are_422() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/products/add",
            Some(&admin),
            Some(json!({
                "description": "yacht",
                "category": "boats",
                "stock": 2,
                "price": "50000000000000000000000000000",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("price"));

    let (_, listed) = app.request(Method::GET, "/products", None, None).await;
    assert!(listed.as_array().unwrap().is_empty());

    let id = app.add_product(&admin, "dinghy", 2, "9999999999.99").await;
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/products/update/{id}"),
            Some(&admin),
            Some(json!({ "price": "10000000000" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let customer = app.customer_token("a@x.com").await;
    let (status, _) = app.buy(&customer, json!([{ "productId": id, "quantity": 2 }])).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, purchases) = app.request(Method::GET, "/purchases", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purchases[0]["total"], json!("19999999999.98"));
}

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn widget_scenario_end_to_end() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token("a@x.com").await;
    let widget = app.add_product(&admin, "widget", 5, "10.00").await;

    let (status, body) = app.buy(&customer, json!([{ "productId": widget, "quantity": 3 }])).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["items"][0]["productId"], json!(widget));
    assert_eq!(body["items"][0]["quantity"], json!(3));
    assert_eq!(app.stock_of(&widget).await, 2);

    let (status, _) = app.buy(&customer, json!([{ "productId": widget, "quantity": 3 }])).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.stock_of(&widget).await, 2);

    let (status, purchases) = app.request(Method::GET, "/purchases", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let purchases = purchases.as_array().unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0]["total"], json!("30.00"));
    assert_eq!(purchases[0]["items"][0]["name"], json!("widget"));
    assert_eq!(purchases[0]["items"][0]["price"], json!("10.00"));
    assert_eq!(purchases[0]["items"][0]["quantity"], json!(3));
}

#[tokio::test]
async fn account_gains_one_reference_per_purchase() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token("a@x.com").await;
    let widget = app.add_product(&admin, "widget", 10, "2.50").await;
    let gadget = app.add_product(&admin, "gadget", 10, "1.25").await;

    for quantity in [1, 2] {
        let (status, _) = app
            .buy(
                &customer,
                json!([
                    { "productId": widget, "quantity": quantity },
                    { "productId": gadget, "quantity": 4 },
                ]),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, me) = app.request(Method::GET, "/users/me", Some(&customer), None).await;
    assert_eq!(me["purchases"].as_array().unwrap().len(), 2);
    assert_eq!(app.stock_of(&widget).await, 7);
    assert_eq!(app.stock_of(&gadget).await, 2);

    let (status, mine) = app
        .request(Method::GET, "/purchases/my-purchases", Some(&customer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    // 1 * 2.50 + 4 * 1.25, then 2 * 2.50 + 4 * 1.25
    assert_eq!(mine[0]["total"], json!("7.50"));
    assert_eq!(mine[1]["total"], json!("10.00"));
}

#[tokio::test]
async fn one_short_line_rejects_the_whole_purchase() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token("a@x.com").await;
    let widget = app.add_product(&admin, "widget", 5, "1.00").await;
    let gadget = app.add_product(&admin, "gadget", 1, "1.00").await;

    let (status, _) = app
        .buy(
            &customer,
            json!([
                { "productId": widget, "quantity": 2 },
                { "productId": gadget, "quantity": 2 },
            ]),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.stock_of(&widget).await, 5);
    assert_eq!(app.stock_of(&gadget).await, 1);

    let (status, _) = app
        .buy(&customer, json!([{ "productId": Uuid::new_v4(), "quantity": 1 }]))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn view_total_follows_later_price_changes() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token("a@x.com").await;
    let widget = app.add_product(&admin, "widget", 5, "10.00").await;

    let (_, created) = app.buy(&customer, json!([{ "productId": widget, "quantity": 2 }])).await;
    let purchase_id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/purchases/{purchase_id}");

    let (_, view) = app.request(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(view["total"], json!("20.00"));

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/products/update/{widget}"),
            Some(&admin),
            Some(json!({ "price": "12.345" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, view) = app.request(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(view["items"][0]["price"], json!("12.34"));
    assert_eq!(view["total"], json!("24.68"));
}

#[tokio::test]
async fn purchase_lookup_by_id() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app.request(Method::GET, "/purchases/not-an-id", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::GET, &format!("/purchases/{}", Uuid::new_v4()), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purchase_routes_are_role_gated() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let customer = app.customer_token("a@x.com").await;
    let widget = app.add_product(&admin, "widget", 5, "1.00").await;

    let (status, _) = app.request(Method::GET, "/purchases", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request(Method::GET, "/purchases", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request(Method::GET, "/purchases", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.buy(&admin, json!([{ "productId": widget, "quantity": 1 }])).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::GET, "/purchases/my-purchases", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.stock_of(&widget).await, 5);
}

#[tokio::test]
async fn malformed_purchase_bodies_are_422() {
    let app = TestApp::new().await;
    let customer = app.customer_token("a@x.com").await;

    for body in [
        json!([]),
        json!({ "productId": Uuid::new_v4(), "quantity": 1 }),
        json!([{ "productId": "abc", "quantity": 1 }]),
        json!([{ "productId": Uuid::new_v4(), "quantity": -2 }]),
    ] {
        let (status, _) = app.buy(&customer, body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

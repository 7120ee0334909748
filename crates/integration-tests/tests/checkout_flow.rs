//! End-to-end checkout flow through the HTTP router.
//!
//! Exercises the full pipeline: profile, cart, promo application, order
//! placement, and status updates. External services are unreachable, so
//! shipment creation and notifications degrade silently.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use rosewood_integration_tests::TestContext;

async fn send(
    router: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = if let Some(body) = body {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        builder
            .body(Body::from(body.to_string()))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    let response = router.oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse body")
    };
    (status, value)
}

fn profile_body() -> Value {
    json!({
        "full_name": "Anna Petrova",
        "phone": "+70000000000",
        "email": "anna@example.com",
        "pickup_address": "",
    })
}

async fn prepare_checkout(ctx: &TestContext) {
    let (status, _) = send(ctx.router(), "PUT", "/api/profile", Some(profile_body())).await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..2 {
        let (status, _) = send(
            ctx.router(),
            "POST",
            "/api/cart/items",
            Some(json!({"product_id": "rosewood-love", "size": "m"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_product_listing_and_detail() {
    let ctx = TestContext::new();

    let (status, body) = send(ctx.router(), "GET", "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().expect("array");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], "rosewood-love");

    let (status, product) = send(ctx.router(), "GET", "/api/products/rosewood-love", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["name"], "'ROSEWOOD LOVE' T-shirt");

    let (status, _) = send(ctx.router(), "GET", "/api/products/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_add_merge_and_remove() {
    let ctx = TestContext::new();
    let line = json!({"product_id": "rosewood-love", "size": "m"});

    let (status, cart) = send(ctx.router(), "POST", "/api/cart/items", Some(line.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart[0]["quantity"], 1);

    let (_, cart) = send(ctx.router(), "POST", "/api/cart/items", Some(line.clone())).await;
    assert_eq!(cart[0]["quantity"], 2);

    let (_, cart) = send(
        ctx.router(),
        "PATCH",
        "/api/cart/items",
        Some(json!({"product_id": "rosewood-love", "size": "m", "quantity": 5})),
    )
    .await;
    assert_eq!(cart[0]["quantity"], 5);

    let (status, cart) = send(ctx.router(), "DELETE", "/api/cart/items", Some(line)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cart.as_array().expect("array").is_empty());
}

#[tokio::test]
async fn test_cart_rejects_unknown_product() {
    let ctx = TestContext::new();
    let (status, _) = send(
        ctx.router(),
        "POST",
        "/api/cart/items",
        Some(json!({"product_id": "ghost", "size": "m"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_requires_profile() {
    let ctx = TestContext::new();
    let (status, _) = send(
        ctx.router(),
        "POST",
        "/api/cart/items",
        Some(json!({"product_id": "rosewood-love", "size": "m"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(ctx.router(), "POST", "/api/checkout", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("required"));
}

#[tokio::test]
async fn test_checkout_requires_items() {
    let ctx = TestContext::new();
    let (status, _) = send(ctx.router(), "PUT", "/api/profile", Some(profile_body())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(ctx.router(), "POST", "/api/checkout", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_pickup_order() {
    let ctx = TestContext::new();
    prepare_checkout(&ctx).await;

    let (status, placed) = send(ctx.router(), "POST", "/api/checkout", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let order_id = placed["order_id"].as_str().expect("id").to_string();
    assert!(order_id.starts_with("ORD-0001-"));

    // Cart is emptied by placement.
    let (_, cart) = send(ctx.router(), "GET", "/api/cart", None).await;
    assert!(cart.as_array().expect("array").is_empty());

    let (status, order) = send(
        ctx.router(),
        "GET",
        &format!("/api/orders/{order_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total"], "7000");
    assert_eq!(order["status"], "processing");
    assert_eq!(order["customer"]["first_name"], "Anna");
}

#[tokio::test]
async fn test_promo_discount_reflected_in_total() {
    let ctx = TestContext::new();
    prepare_checkout(&ctx).await;

    let expiry = rosewood_integration_tests::test_epoch() + chrono::Duration::days(30);
    ctx.state
        .promos()
        .create("SALE10", rust_decimal_macros::dec!(0.1), 5, expiry)
        .expect("create promo");

    // Codes are matched case-insensitively; the slot keeps what was typed.
    let (status, applied) = send(
        ctx.router(),
        "POST",
        "/api/promo/apply",
        Some(json!({"code": "SALE10"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(applied["discount"], "0.1");

    let (status, placed) = send(ctx.router(), "POST", "/api/checkout", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let order_id = placed["order_id"].as_str().expect("id");

    let (_, order) = send(
        ctx.router(),
        "GET",
        &format!("/api/orders/{order_id}"),
        None,
    )
    .await;
    assert_eq!(order["total"], "6300");
    assert_eq!(order["promo_code"], "SALE10");

    // One use consumed.
    assert_eq!(ctx.state.promos().list().expect("list")[0].uses_left, 4);
}

#[tokio::test]
async fn test_expired_promo_rejected_at_apply() {
    let ctx = TestContext::new();
    let expiry = rosewood_integration_tests::test_epoch() + chrono::Duration::days(1);
    ctx.state
        .promos()
        .create("BRIEF", rust_decimal_macros::dec!(0.2), 5, expiry)
        .expect("create promo");

    ctx.clock.advance(chrono::Duration::days(2));

    let (status, body) = send(
        ctx.router(),
        "POST",
        "/api/promo/apply",
        Some(json!({"code": "BRIEF"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Promo code has expired");
}

#[tokio::test]
async fn test_order_list_is_newest_first() {
    let ctx = TestContext::new();
    prepare_checkout(&ctx).await;
    let (_, first) = send(ctx.router(), "POST", "/api/checkout", Some(json!({}))).await;

    prepare_checkout(&ctx).await;
    let (_, second) = send(ctx.router(), "POST", "/api/checkout", Some(json!({}))).await;

    let (status, orders) = send(ctx.router(), "GET", "/api/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = orders.as_array().expect("array");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], second["order_id"]);
    assert_eq!(orders[1]["id"], first["order_id"]);
}

#[tokio::test]
async fn test_manual_status_update() {
    let ctx = TestContext::new();
    prepare_checkout(&ctx).await;
    let (_, placed) = send(ctx.router(), "POST", "/api/checkout", Some(json!({}))).await;
    let order_id = placed["order_id"].as_str().expect("id");

    let (status, order) = send(
        ctx.router(),
        "POST",
        &format!("/api/orders/{order_id}/status"),
        Some(json!({"status": "shipped"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "shipped");

    let (status, _) = send(
        ctx.router(),
        "POST",
        &format!("/api/orders/{order_id}/status"),
        Some(json!({"status": "teleported"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delivery_order_survives_carrier_outage() {
    let ctx = TestContext::new();
    prepare_checkout(&ctx).await;

    let (status, placed) = send(
        ctx.router(),
        "POST",
        "/api/checkout",
        Some(json!({
            "delivery": {
                "city": "Казань",
                "address": "ул. Баумана 1",
                "delivery_cost": "300",
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = placed["order_id"].as_str().expect("id");

    let (_, order) = send(
        ctx.router(),
        "GET",
        &format!("/api/orders/{order_id}"),
        None,
    )
    .await;
    assert_eq!(order["total"], "7300");
    assert!(order.get("tracking_ref").is_none());

    // No tracking reference, so a refresh is a no-op rather than an error.
    let (status, refreshed) = send(
        ctx.router(),
        "POST",
        &format!("/api/orders/{order_id}/refresh-status"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["status"], "processing");
}

#[tokio::test]
async fn test_quote_degrades_to_bad_gateway() {
    let ctx = TestContext::new();
    let (status, body) = send(
        ctx.router(),
        "POST",
        "/api/checkout/quote",
        Some(json!({"city": "Казань"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Delivery cost is currently unavailable");
}

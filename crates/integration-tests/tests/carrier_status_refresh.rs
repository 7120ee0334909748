//! Carrier status refresh against a local stand-in carrier server.
//!
//! The stand-in records every request path, so these tests pin down which
//! identifier the refresh flow sends: the carrier's shipment uuid, not the
//! customer-facing tracking number.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal_macros::dec;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use rosewood_core::{OrderId, OrderStatus, ProductId};
use rosewood_integration_tests::{TestContext, test_config, test_epoch};
use rosewood_storefront::stores::{CustomerProfile, DeliveryDetails, Order, OrderItem};

const SHIPMENT_UUID: &str = "72753031-1111-4e10-8a9f-000000000001";
const CDEK_NUMBER: &str = "1106207251";

/// Minimal HTTP/1.1 carrier stand-in: answers the token exchange and order
/// status lookups, recording each request path.
async fn spawn_carrier(status_code: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stand-in listener");
    let addr = listener.local_addr().expect("local addr");
    let paths = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&paths);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let seen = Arc::clone(&seen);
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                let mut header_end = None;
                loop {
                    if header_end.is_none() {
                        header_end = buf
                            .windows(4)
                            .position(|w| w == b"\r\n\r\n")
                            .map(|at| at + 4);
                    }
                    if let Some(end) = header_end {
                        // Drain the request body before replying.
                        let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                        let content_length = head
                            .lines()
                            .find_map(|line| line.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);
                        if buf.len() >= end + content_length {
                            break;
                        }
                    }
                    let Ok(n) = socket.read(&mut chunk).await else {
                        return;
                    };
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }

                let head = String::from_utf8_lossy(&buf);
                let path = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or_default()
                    .to_string();
                seen.lock().expect("path log lock").push(path.clone());

                let body = if path == "/oauth/token" {
                    r#"{"access_token":"tok-1","expires_in":3600}"#.to_string()
                } else {
                    format!(
                        r#"{{"entity":{{"uuid":"{SHIPMENT_UUID}","cdek_number":"{CDEK_NUMBER}","statuses":[{{"code":"{status_code}"}}]}}}}"#
                    )
                };
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), paths)
}

fn shipped_order(id: OrderId) -> Order {
    let created = test_epoch();
    Order {
        id,
        items: vec![OrderItem {
            product_id: ProductId::from("rosewood-love"),
            name: "'ROSEWOOD LOVE' T-shirt".to_string(),
            unit_price: dec!(3500),
            quantity: 1,
            size: "m".to_string(),
            image_url: None,
        }],
        total: dec!(3800),
        status: OrderStatus::Processing,
        created_at: created,
        estimated_delivery: created + chrono::Duration::days(7),
        customer: CustomerProfile {
            full_name: "Anna Petrova".to_string(),
            phone: "+70000000000".to_string(),
            email: "anna@example.com".to_string(),
            pickup_address: String::new(),
            first_name: None,
            last_name: None,
            address: None,
        },
        delivery: Some(DeliveryDetails {
            city: "Казань".to_string(),
            address: "ул. Баумана 1".to_string(),
            delivery_cost: dec!(300),
        }),
        tracking_ref: Some(CDEK_NUMBER.to_string()),
        shipment_uuid: Some(SHIPMENT_UUID.to_string()),
        promo_code: None,
        discount: None,
    }
}

async fn refresh(router: Router, order_id: &OrderId) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/orders/{order_id}/refresh-status"))
        .body(Body::empty())
        .expect("build request");
    let response = router.oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("parse body"))
}

#[tokio::test]
async fn test_refresh_queries_by_shipment_uuid() {
    let (base_url, paths) = spawn_carrier("DELIVERED").await;
    let mut config = test_config();
    config.cdek.base_url = base_url;
    let ctx = TestContext::with_config(config);

    let id = ctx.state.orders().next_id().expect("id");
    ctx.state
        .orders()
        .append(shipped_order(id.clone()))
        .expect("append");

    let (status, order) = refresh(ctx.router(), &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "delivered");

    // Both identifiers are present on the order; the lookup must use the
    // uuid, never the carrier number.
    let paths = paths.lock().expect("path log lock");
    assert!(
        paths.contains(&format!("/orders/{SHIPMENT_UUID}")),
        "paths seen: {paths:?}"
    );
    assert!(!paths.iter().any(|p| p.contains(CDEK_NUMBER)));
}

#[tokio::test]
async fn test_refresh_maps_transit_to_shipped() {
    let (base_url, _paths) = spawn_carrier("TRANSIT").await;
    let mut config = test_config();
    config.cdek.base_url = base_url;
    let ctx = TestContext::with_config(config);

    let id = ctx.state.orders().next_id().expect("id");
    ctx.state
        .orders()
        .append(shipped_order(id.clone()))
        .expect("append");

    let (status, order) = refresh(ctx.router(), &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "shipped");

    // The mapped status is persisted, not just echoed.
    let stored = ctx.state.orders().get(&id).expect("get").expect("present");
    assert_eq!(stored.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_refresh_without_shipment_uuid_is_noop() {
    let ctx = TestContext::new();
    let id = ctx.state.orders().next_id().expect("id");
    let mut order = shipped_order(id.clone());
    // Tracking number known, uuid lost: nothing to query by.
    order.shipment_uuid = None;
    ctx.state.orders().append(order).expect("append");

    let (status, body) = refresh(ctx.router(), &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "processing");
}

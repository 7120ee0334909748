//! Checkout route handlers: delivery quoting, pickup points, placement.

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rosewood_core::OrderId;

use crate::error::AppError;
use crate::services::cdek::DeliveryPoint;
use crate::state::AppState;
use crate::stores::DeliveryDetails;

/// Weight of a single garment in kilograms, matching the carrier client's
/// per-item shipment weight.
const GARMENT_WEIGHT_KG: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub city: String,
    pub delivery_cost: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryPointsQuery {
    pub city_code: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub delivery: Option<DeliveryDetails>,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub order_id: OrderId,
}

/// Delivery cost from the configured origin to a destination city, priced by
/// the carrier for the current cart weight.
pub async fn quote(
    State(state): State<AppState>,
    Json(body): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let city = body.city.trim();
    if city.is_empty() {
        return Err(AppError::BadRequest(
            "Destination city is required".to_string(),
        ));
    }

    let garments: u32 = state
        .cart()
        .lines()?
        .iter()
        .map(|line| line.quantity)
        .sum();
    let weight_kg = GARMENT_WEIGHT_KG * Decimal::from(garments.max(1));

    let cost = state
        .cdek()
        .quote(&state.config().origin_city, city, weight_kg)
        .await
        .ok_or_else(|| {
            AppError::Upstream("Delivery cost is currently unavailable".to_string())
        })?;

    Ok(Json(QuoteResponse {
        city: city.to_string(),
        delivery_cost: cost,
    }))
}

/// Pickup points for a carrier city code.
pub async fn delivery_points(
    State(state): State<AppState>,
    Query(query): Query<DeliveryPointsQuery>,
) -> Result<Json<Vec<DeliveryPoint>>, AppError> {
    state
        .cdek()
        .delivery_points(&query.city_code)
        .await
        .map(Json)
        .ok_or_else(|| {
            AppError::Upstream("Delivery points are currently unavailable".to_string())
        })
}

/// Place an order from the current cart and saved profile.
pub async fn place_order(
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<Json<PlaceOrderResponse>, AppError> {
    let order_id = state.checkout().place_order(body.delivery).await?;
    Ok(Json(PlaceOrderResponse { order_id }))
}

//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use rosewood_core::{OrderId, OrderStatus};

use crate::error::AppError;
use crate::services::cdek::map_status;
use crate::state::AppState;
use crate::stores::Order;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// All orders, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders().list_recent_first()?))
}

/// One order by id.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let id = OrderId::new(id);
    state
        .orders()
        .get(&id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))
}

/// Manually set an order's status.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<Json<Order>, AppError> {
    let status: OrderStatus = body
        .status
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown status {:?}", body.status)))?;

    let id = OrderId::new(id);
    if !state.orders().update_status(&id, status)? {
        return Err(AppError::NotFound(format!("Order {id} not found")));
    }
    let order = state
        .orders()
        .get(&id)?
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
    Ok(Json(order))
}

/// Pull the latest carrier status for an order's shipment and record it.
///
/// The lookup is keyed by the carrier's shipment uuid, not the customer
/// tracking number. Orders without one (pickup, or shipment creation failed)
/// are returned unchanged.
pub async fn refresh_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let id = OrderId::new(id);
    let order = state
        .orders()
        .get(&id)?
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;

    let Some(shipment_uuid) = &order.shipment_uuid else {
        return Ok(Json(order));
    };

    let Some(code) = state.cdek().order_status(shipment_uuid).await else {
        return Err(AppError::Upstream(
            "Carrier status is currently unavailable".to_string(),
        ));
    };

    state.orders().update_status(&id, map_status(&code))?;
    let refreshed = state
        .orders()
        .get(&id)?
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
    Ok(Json(refreshed))
}

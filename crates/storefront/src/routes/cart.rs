//! Cart route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use rosewood_core::ProductId;

use crate::error::AppError;
use crate::state::AppState;
use crate::stores::CartLine;

/// Identifies one cart line.
#[derive(Debug, Deserialize)]
pub struct LineSelector {
    pub product_id: ProductId,
    pub size: String,
}

/// Quantity update for one cart line.
#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: u32,
}

/// Current cart contents.
pub async fn view(State(state): State<AppState>) -> Result<Json<Vec<CartLine>>, AppError> {
    Ok(Json(state.cart().lines()?))
}

/// Add one unit of (product, size); merges into an existing line.
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<LineSelector>,
) -> Result<Json<Vec<CartLine>>, AppError> {
    if state.catalog().by_id(&body.product_id).is_none() {
        return Err(AppError::BadRequest(format!(
            "Product {} not found",
            body.product_id
        )));
    }
    state.cart().add(body.product_id, &body.size)?;
    Ok(Json(state.cart().lines()?))
}

/// Set a line's quantity; zero removes the line.
pub async fn update_quantity(
    State(state): State<AppState>,
    Json(body): Json<QuantityUpdate>,
) -> Result<Json<Vec<CartLine>>, AppError> {
    state
        .cart()
        .update_quantity(&body.product_id, &body.size, body.quantity)?;
    Ok(Json(state.cart().lines()?))
}

/// Remove a line.
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<LineSelector>,
) -> Result<Json<Vec<CartLine>>, AppError> {
    state.cart().remove(&body.product_id, &body.size)?;
    Ok(Json(state.cart().lines()?))
}

//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use rosewood_core::ProductId;

use crate::catalog::Product;
use crate::error::AppError;
use crate::state::AppState;

/// List every catalog product.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().products().to_vec())
}

/// One product by id.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = ProductId::new(id);
    state
        .catalog()
        .by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))
}

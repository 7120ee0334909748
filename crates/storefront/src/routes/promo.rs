//! Promo application route handler.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::stores::PromoCheck;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub code: String,
    pub discount: Decimal,
    pub message: &'static str,
}

/// Validate a code and, if redeemable, occupy the pending-promo slot.
///
/// The use count is consumed at order placement, not here; applying a code
/// twice is harmless.
pub async fn apply(
    State(state): State<AppState>,
    Json(body): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, AppError> {
    let code = body.code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("Promo code is required".to_string()));
    }

    let check = state.promos().check(code)?;
    let PromoCheck::Valid { discount } = &check else {
        return Err(AppError::BadRequest(check.reason().to_string()));
    };
    let discount = *discount;

    state.cart().apply_promo(code, discount)?;
    Ok(Json(ApplyResponse {
        code: code.to_string(),
        discount,
        message: check.reason(),
    }))
}

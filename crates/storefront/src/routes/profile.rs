//! Customer profile route handlers.

use axum::{Json, extract::State};

use crate::error::AppError;
use crate::state::AppState;
use crate::stores::CustomerProfile;

/// The saved profile, or 404 when none has been saved yet.
pub async fn view(State(state): State<AppState>) -> Result<Json<CustomerProfile>, AppError> {
    state
        .cart()
        .profile()?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No customer profile saved".to_string()))
}

/// Overwrite the profile wholesale.
pub async fn save(
    State(state): State<AppState>,
    Json(profile): Json<CustomerProfile>,
) -> Result<Json<CustomerProfile>, AppError> {
    if profile.full_name.trim().is_empty() {
        return Err(AppError::BadRequest("Full name is required".to_string()));
    }
    state.cart().save_profile(&profile)?;
    Ok(Json(profile))
}

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::json;

use crate::auth::AuthIdentity;
use crate::error::AppResult;
use crate::routes::AppState;
use crate::services::bookings::{self, CreateBookingRequest};

pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthIdentity>,
    Json(body): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let booking = bookings::create_booking(&state.db, &identity, body)?;
    Ok((StatusCode::CREATED, Json(json!({ "data": booking }))))
}

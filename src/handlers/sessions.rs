use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::session::BookingSession;
use crate::error::{AppError, AppResult};
use crate::geocoding::resolve_route;
use crate::utils::geo::{map_view, MapView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateAddressesRequest {
    pub pickup_address: Option<String>,
    pub destination_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectTierRequest {
    pub tier_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: BookingSession,
    pub map_view: MapView,
}

impl From<BookingSession> for SessionResponse {
    fn from(session: BookingSession) -> Self {
        let view = match &session.estimate {
            Some(e) => map_view(Some(&e.pickup), Some(&e.destination)),
            None => map_view(None, None),
        };
        Self {
            session,
            map_view: view,
        }
    }
}

/// Start a booking session with the default tier selected
pub async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state
        .sessions
        .insert(BookingSession::new(&state.catalog))
        .await;
    tracing::info!(session_id = %session.id, "Session created");

    Json(session.into())
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    Ok(Json(state.sessions.get(id).await?.into()))
}

/// Edit pickup and/or destination; a real change drops the current estimate
pub async fn update_addresses(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAddressesRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state
        .sessions
        .update(id, |s| {
            s.set_addresses(payload.pickup_address, payload.destination_address);
            Ok(())
        })
        .await?;

    Ok(Json(session.into()))
}

/// Switch the selected tier, re-pricing any existing estimate
pub async fn select_tier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectTierRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state
        .sessions
        .update(id, |s| s.select_tier(&state.engine, &state.catalog, &payload.tier_id))
        .await?;

    Ok(Json(session.into()))
}

/// Geocode the session's addresses and estimate the trip
pub async fn estimate_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let snapshot = state.sessions.get(id).await?;
    if !snapshot.has_addresses() {
        return Err(AppError::BadRequest(
            "Both pickup and destination addresses are required".to_string(),
        ));
    }

    let (pickup, destination) = resolve_route(
        state.geocoder.as_ref(),
        &snapshot.pickup_address,
        &snapshot.destination_address,
    )
    .await?;

    let session = state
        .sessions
        .update(id, |s| {
            // addresses may have been edited while geocoding was in flight
            if s.pickup_address != snapshot.pickup_address
                || s.destination_address != snapshot.destination_address
            {
                return Err(AppError::BadRequest(
                    "Addresses changed during estimation, please retry".to_string(),
                ));
            }

            let tier = state.catalog.get(&s.selected_tier_id)?;
            let estimate = state.engine.estimate(&pickup, &destination, tier)?;
            s.apply_estimate(estimate);
            Ok(())
        })
        .await?;

    Ok(Json(session.into()))
}

/// Complete or abandon a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    state.sessions.remove(id).await?;
    tracing::info!(session_id = %id, "Session closed");

    Ok(Json(serde_json::json!({ "message": "Session closed" })))
}

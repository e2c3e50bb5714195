use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::coordinate::Coordinate;
use crate::error::AppResult;
use crate::geocoding::SUGGESTION_LIMIT;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub address: String,
    pub location: Coordinate,
}

pub async fn geocode_address(
    State(state): State<AppState>,
    Json(payload): Json<GeocodeRequest>,
) -> AppResult<Json<GeocodeResponse>> {
    let location = state.geocoder.geocode(&payload.address).await?;

    Ok(Json(GeocodeResponse {
        address: payload.address.trim().to_string(),
        location,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub query: String,
    pub suggestions: Vec<String>,
}

pub async fn suggest_addresses(
    State(state): State<AppState>,
    Query(params): Query<SuggestQuery>,
) -> AppResult<Json<SuggestResponse>> {
    let suggestions = state.geocoder.suggest(&params.q, SUGGESTION_LIMIT).await?;

    Ok(Json(SuggestResponse {
        query: params.q,
        suggestions,
    }))
}

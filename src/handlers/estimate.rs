use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::entities::coordinate::Coordinate;
use crate::entities::route_estimate::RouteEstimate;
use crate::entities::tariff::{TariffCatalog, VehicleTier};
use crate::error::AppResult;
use crate::utils::geo::{map_view, MapView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub pickup: Coordinate,
    pub destination: Coordinate,
    pub tier_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecomputeRequest {
    pub estimate: RouteEstimate,
    pub tier_id: String,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    #[serde(flatten)]
    pub estimate: RouteEstimate,
    pub tier: VehicleTier,
    pub map_view: MapView,
}

impl EstimateResponse {
    pub fn new(estimate: RouteEstimate, tier: &VehicleTier) -> Self {
        let view = map_view(Some(&estimate.pickup), Some(&estimate.destination));
        Self {
            estimate,
            tier: tier.clone(),
            map_view: view,
        }
    }
}

/// Resolve the requested tier, falling back to the catalog default.
pub(crate) fn pick_tier<'a>(
    catalog: &'a TariffCatalog,
    tier_id: Option<&str>,
) -> AppResult<&'a VehicleTier> {
    match tier_id {
        Some(id) => catalog.get(id),
        None => Ok(catalog.default_tier()),
    }
}

/// Estimate a trip between two known coordinates
pub async fn estimate_route(
    State(state): State<AppState>,
    Json(payload): Json<EstimateRequest>,
) -> AppResult<Json<EstimateResponse>> {
    let tier = pick_tier(&state.catalog, payload.tier_id.as_deref())?;
    let estimate = state
        .engine
        .estimate(&payload.pickup, &payload.destination, tier)?;

    Ok(Json(EstimateResponse::new(estimate, tier)))
}

/// Re-price an existing estimate for another tier
pub async fn recompute_estimate(
    State(state): State<AppState>,
    Json(payload): Json<RecomputeRequest>,
) -> AppResult<Json<EstimateResponse>> {
    payload.estimate.pickup.validate()?;
    payload.estimate.destination.validate()?;

    let tier = state.catalog.get(&payload.tier_id)?;
    let estimate = state.engine.recompute_fare(&payload.estimate, tier)?;

    Ok(Json(EstimateResponse::new(estimate, tier)))
}

use axum::{extract::State, Json};
use serde::Serialize;

use crate::entities::tariff::VehicleTier;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TariffsResponse {
    pub default_tier_id: String,
    pub tiers: Vec<VehicleTier>,
}

/// List the tier catalog in display order
pub async fn list_tariffs(State(state): State<AppState>) -> Json<TariffsResponse> {
    Json(TariffsResponse {
        default_tier_id: state.catalog.default_tier().id.clone(),
        tiers: state.catalog.tiers().to_vec(),
    })
}

use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    /// Road distance, one decimal place.
    pub distance_km: f64,
    pub duration_min: u32,
    pub cost: u64,
    pub pickup: Coordinate,
    pub destination: Coordinate,
    pub tier_id: String,
}

//! Route estimation and fare calculation.
//!
//! The engine is a pure computation over coordinates and tariffs. It holds
//! only its tuning constants, so one instance can be shared freely.

use serde::{Deserialize, Serialize};

use crate::entities::coordinate::Coordinate;
use crate::entities::route_estimate::RouteEstimate;
use crate::entities::tariff::VehicleTier;
use crate::error::{AppError, AppResult};
use crate::utils::geo::{haversine_distance, EARTH_RADIUS_KM};

/// Tuning constants for the straight-line approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Multiplier from great-circle distance to driving distance.
    pub road_factor: f64,
    /// Average minutes per road kilometre (2.5 is roughly 24 km/h).
    pub minutes_per_km: f64,
    pub earth_radius_km: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            road_factor: 1.3,
            minutes_per_km: 2.5,
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> AppResult<()> {
        if !self.road_factor.is_finite() || self.road_factor < 1.0 {
            return Err(AppError::Config(format!(
                "road factor must be at least 1.0, got {}",
                self.road_factor
            )));
        }
        if !self.minutes_per_km.is_finite() || self.minutes_per_km <= 0.0 {
            return Err(AppError::Config(format!(
                "minutes per km must be positive, got {}",
                self.minutes_per_km
            )));
        }
        if !self.earth_radius_km.is_finite() || self.earth_radius_km <= 0.0 {
            return Err(AppError::Config(format!(
                "earth radius must be positive, got {}",
                self.earth_radius_km
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareEngine {
    config: EngineConfig,
}

impl Default for FareEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }
}

impl FareEngine {
    pub fn new(config: EngineConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Approximate driving distance in km, rounded to one decimal.
    pub fn estimate_distance(&self, pickup: &Coordinate, destination: &Coordinate) -> AppResult<f64> {
        pickup.validate()?;
        destination.validate()?;

        let straight = haversine_distance(pickup, destination, self.config.earth_radius_km);
        Ok(round_to_tenth(straight * self.config.road_factor))
    }

    pub fn estimate_duration(&self, road_distance_km: f64) -> AppResult<u32> {
        check_non_negative("road distance", road_distance_km)?;
        let minutes = rounded_whole("duration", road_distance_km * self.config.minutes_per_km)?;
        u32::try_from(minutes)
            .map_err(|_| AppError::InvalidDistance(format!("duration of {} min is out of range", minutes)))
    }

    pub fn compute_fare(&self, road_distance_km: f64, tier: &VehicleTier) -> AppResult<u64> {
        check_non_negative("road distance", road_distance_km)?;
        tier.validate()?;
        rounded_whole("fare", road_distance_km * tier.price_per_km)
    }

    pub fn estimate(
        &self,
        pickup: &Coordinate,
        destination: &Coordinate,
        tier: &VehicleTier,
    ) -> AppResult<RouteEstimate> {
        let distance_km = self.estimate_distance(pickup, destination)?;
        let duration_min = self.estimate_duration(distance_km)?;
        let cost = self.compute_fare(distance_km, tier)?;

        tracing::debug!(
            distance_km,
            duration_min,
            cost,
            tier = %tier.id,
            "Route estimated"
        );

        Ok(RouteEstimate {
            distance_km,
            duration_min,
            cost,
            pickup: *pickup,
            destination: *destination,
            tier_id: tier.id.clone(),
        })
    }

    /// Price a route whose road distance and duration were measured
    /// elsewhere, e.g. by a routing service, instead of approximated.
    pub fn price_route(
        &self,
        pickup: &Coordinate,
        destination: &Coordinate,
        measured_km: f64,
        measured_min: f64,
        tier: &VehicleTier,
    ) -> AppResult<RouteEstimate> {
        pickup.validate()?;
        destination.validate()?;
        check_non_negative("measured distance", measured_km)?;
        check_non_negative("measured duration", measured_min)?;

        let distance_km = round_to_tenth(measured_km);
        let cost = self.compute_fare(distance_km, tier)?;
        let minutes = rounded_whole("measured duration", measured_min)?;
        let duration_min = u32::try_from(minutes).map_err(|_| {
            AppError::InvalidDistance(format!("measured duration of {} min is out of range", minutes))
        })?;

        Ok(RouteEstimate {
            distance_km,
            duration_min,
            cost,
            pickup: *pickup,
            destination: *destination,
            tier_id: tier.id.clone(),
        })
    }

    /// Re-derive the cost of an existing estimate for another tier.
    /// Distance, duration and coordinates are kept as they are; a stored
    /// distance that is not on the 0.1 km grid was not produced here and is rejected.
    pub fn recompute_fare(
        &self,
        estimate: &RouteEstimate,
        tier: &VehicleTier,
    ) -> AppResult<RouteEstimate> {
        check_non_negative("stored distance", estimate.distance_km)?;
        let tenths = estimate.distance_km * 10.0;
        if (tenths - tenths.round()).abs() > 1e-6 {
            return Err(AppError::InvalidDistance(format!(
                "stored distance {} km is not rounded to one decimal",
                estimate.distance_km
            )));
        }

        let cost = self.compute_fare(estimate.distance_km, tier)?;

        tracing::debug!(
            from = %estimate.tier_id,
            to = %tier.id,
            old_cost = estimate.cost,
            cost,
            "Fare recomputed"
        );

        Ok(RouteEstimate {
            cost,
            tier_id: tier.id.clone(),
            ..estimate.clone()
        })
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to a whole number, refusing anything a `u64` cannot hold.
fn rounded_whole(what: &str, value: f64) -> AppResult<u64> {
    let rounded = value.round();
    // u64::MAX as f64 is 2^64, the first value that no longer fits
    if !rounded.is_finite() || rounded < 0.0 || rounded >= u64::MAX as f64 {
        return Err(AppError::InvalidDistance(format!(
            "{} of {} is out of range",
            what, value
        )));
    }
    Ok(rounded as u64)
}

fn check_non_negative(what: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::InvalidDistance(format!(
            "{} must be a non-negative number, got {}",
            what, value
        )));
    }
    Ok(())
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::route_estimate::RouteEstimate;
use super::tariff::TariffCatalog;
use crate::engine::FareEngine;
use crate::error::AppResult;

/// Per-rider booking state: addresses, chosen tier and the current estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSession {
    pub id: Uuid,
    pub pickup_address: String,
    pub destination_address: String,
    pub selected_tier_id: String,
    pub estimate: Option<RouteEstimate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingSession {
    pub fn new(catalog: &TariffCatalog) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            pickup_address: String::new(),
            destination_address: String::new(),
            selected_tier_id: catalog.default_tier().id.clone(),
            estimate: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update either address. Any actual change invalidates the estimate.
    pub fn set_addresses(&mut self, pickup: Option<String>, destination: Option<String>) {
        let mut changed = false;

        if let Some(pickup) = pickup {
            if pickup != self.pickup_address {
                self.pickup_address = pickup;
                changed = true;
            }
        }
        if let Some(destination) = destination {
            if destination != self.destination_address {
                self.destination_address = destination;
                changed = true;
            }
        }

        if changed {
            self.estimate = None;
        }
        self.touch();
    }

    pub fn has_addresses(&self) -> bool {
        !self.pickup_address.trim().is_empty() && !self.destination_address.trim().is_empty()
    }

    /// Switch tier; an existing estimate keeps its distance and gets a new cost.
    pub fn select_tier(
        &mut self,
        engine: &FareEngine,
        catalog: &TariffCatalog,
        tier_id: &str,
    ) -> AppResult<()> {
        let tier = catalog.get(tier_id)?;

        if let Some(estimate) = &self.estimate {
            self.estimate = Some(engine.recompute_fare(estimate, tier)?);
        }
        self.selected_tier_id = tier.id.clone();
        self.touch();
        Ok(())
    }

    pub fn apply_estimate(&mut self, estimate: RouteEstimate) {
        self.estimate = Some(estimate);
        self.touch();
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.updated_at > ttl
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::coordinate::Coordinate;

    fn estimated_session(engine: &FareEngine, catalog: &TariffCatalog) -> BookingSession {
        let mut session = BookingSession::new(catalog);
        session.set_addresses(Some("Red Square".into()), Some("Izmailovo".into()));
        let estimate = engine
            .estimate(
                &Coordinate::new(55.7558, 37.6173),
                &Coordinate::new(55.7558, 37.8173),
                catalog.get(&session.selected_tier_id).unwrap(),
            )
            .unwrap();
        session.apply_estimate(estimate);
        session
    }

    #[test]
    fn test_new_session_selects_cheapest_tier() {
        let session = BookingSession::new(&TariffCatalog::default());
        assert_eq!(session.selected_tier_id, "economy");
        assert!(session.estimate.is_none());
        assert!(!session.has_addresses());
    }

    #[test]
    fn test_editing_address_clears_estimate() {
        let engine = FareEngine::default();
        let catalog = TariffCatalog::default();
        let mut session = estimated_session(&engine, &catalog);
        assert!(session.estimate.is_some());

        // same value again is not an edit
        session.set_addresses(Some("Red Square".into()), None);
        assert!(session.estimate.is_some());

        session.set_addresses(None, Some("Sokolniki".into()));
        assert!(session.estimate.is_none());
        assert_eq!(session.destination_address, "Sokolniki");
    }

    #[test]
    fn test_select_tier_recomputes_cost_only() {
        let engine = FareEngine::default();
        let catalog = TariffCatalog::default();
        let mut session = estimated_session(&engine, &catalog);
        let before = session.estimate.clone().unwrap();
        assert_eq!(before.cost, 652);

        session.select_tier(&engine, &catalog, "business").unwrap();
        let after = session.estimate.clone().unwrap();
        assert_eq!(session.selected_tier_id, "business");
        assert_eq!(after.cost, 1304);
        assert_eq!(after.distance_km, before.distance_km);
        assert_eq!(after.duration_min, before.duration_min);
    }

    #[test]
    fn test_select_unknown_tier_keeps_state() {
        let engine = FareEngine::default();
        let catalog = TariffCatalog::default();
        let mut session = estimated_session(&engine, &catalog);
        let before = session.clone();

        assert!(session.select_tier(&engine, &catalog, "helicopter").is_err());
        assert_eq!(session.selected_tier_id, before.selected_tier_id);
        assert_eq!(session.estimate, before.estimate);
    }

    #[test]
    fn test_expiry() {
        let session = BookingSession::new(&TariffCatalog::default());
        let ttl = chrono::Duration::minutes(30);
        assert!(!session.is_expired(session.updated_at, ttl));
        assert!(session.is_expired(session.updated_at + chrono::Duration::minutes(31), ttl));
    }
}

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleTier {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_per_km: f64,
    pub icon: String,
    pub features: Vec<String>,
    pub color: String,
}

impl VehicleTier {
    pub fn validate(&self) -> AppResult<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::InvalidTier("tier id must not be empty".to_string()));
        }
        if !self.price_per_km.is_finite() || self.price_per_km <= 0.0 {
            return Err(AppError::InvalidTier(format!(
                "tier '{}' has non-positive price per km {}",
                self.id, self.price_per_km
            )));
        }
        Ok(())
    }
}

/// Ordered, read-only list of tiers offered to riders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffCatalog {
    tiers: Vec<VehicleTier>,
}

impl TariffCatalog {
    pub fn new(tiers: Vec<VehicleTier>) -> AppResult<Self> {
        if tiers.is_empty() {
            return Err(AppError::InvalidTier("catalog has no tiers".to_string()));
        }

        let mut seen = HashSet::new();
        for tier in &tiers {
            tier.validate()?;
            if !seen.insert(tier.id.as_str()) {
                return Err(AppError::InvalidTier(format!(
                    "duplicate tier id '{}'",
                    tier.id
                )));
            }
        }

        Ok(Self { tiers })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let tiers: Vec<VehicleTier> = serde_json::from_str(&raw)?;
        Self::new(tiers)
    }

    pub fn tiers(&self) -> &[VehicleTier] {
        &self.tiers
    }

    pub fn get(&self, id: &str) -> AppResult<&VehicleTier> {
        self.tiers
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::InvalidTier(format!("unknown tier '{}'", id)))
    }

    /// Cheapest tier; the first one wins on a price tie.
    pub fn default_tier(&self) -> &VehicleTier {
        let mut cheapest = &self.tiers[0];
        for tier in &self.tiers[1..] {
            if tier.price_per_km < cheapest.price_per_km {
                cheapest = tier;
            }
        }
        cheapest
    }
}

impl Default for TariffCatalog {
    fn default() -> Self {
        Self {
            tiers: vec![
                tier(
                    "economy",
                    "Economy",
                    "Affordable rides around the city",
                    40.0,
                    "Car",
                    &["Up to 4 passengers", "Air conditioning", "Free pickup"],
                    "border-gray-200 bg-gray-50",
                ),
                tier(
                    "comfort",
                    "Comfort",
                    "Newer cars with extra legroom",
                    60.0,
                    "CarFront",
                    &["Up to 4 passengers", "Climate control", "Experienced drivers"],
                    "border-blue-200 bg-blue-50",
                ),
                tier(
                    "business",
                    "Business",
                    "Premium sedans for business trips",
                    80.0,
                    "Crown",
                    &["Premium sedan", "Leather interior", "Bottled water", "Top-rated drivers"],
                    "border-yellow-200 bg-yellow-50",
                ),
                tier(
                    "minivan",
                    "Minivan",
                    "Room for groups and luggage",
                    70.0,
                    "Bus",
                    &["Up to 7 passengers", "Large trunk", "Child seat on request"],
                    "border-green-200 bg-green-50",
                ),
            ],
        }
    }
}

fn tier(
    id: &str,
    name: &str,
    description: &str,
    price_per_km: f64,
    icon: &str,
    features: &[&str],
    color: &str,
) -> VehicleTier {
    VehicleTier {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price_per_km,
        icon: icon.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        color: color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample(id: &str, price: f64) -> VehicleTier {
        tier(id, id, "", price, "Car", &[], "")
    }

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = TariffCatalog::default();
        let rebuilt = TariffCatalog::new(catalog.tiers().to_vec()).unwrap();
        assert_eq!(rebuilt, catalog);
        assert_eq!(catalog.tiers().len(), 4);
    }

    #[test]
    fn test_default_tier_is_cheapest() {
        let catalog = TariffCatalog::default();
        assert_eq!(catalog.default_tier().id, "economy");

        let catalog = TariffCatalog::new(vec![
            sample("a", 90.0),
            sample("b", 30.0),
            sample("c", 30.0),
        ])
        .unwrap();
        assert_eq!(catalog.default_tier().id, "b");
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = TariffCatalog::new(vec![sample("a", 10.0), sample("a", 20.0)]);
        assert!(matches!(result, Err(AppError::InvalidTier(_))));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(TariffCatalog::new(vec![sample("a", 0.0)]).is_err());
        assert!(TariffCatalog::new(vec![sample("a", -5.0)]).is_err());
        assert!(TariffCatalog::new(vec![sample("a", f64::NAN)]).is_err());
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(TariffCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_get_unknown_tier() {
        let catalog = TariffCatalog::default();
        assert_eq!(catalog.get("business").unwrap().price_per_km, 80.0);
        assert!(matches!(catalog.get("limo"), Err(AppError::InvalidTier(_))));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"std","name":"Standard","description":"City rides","price_per_km":50,
                "icon":"Car","features":[],"color":""}}]"#
        )
        .unwrap();

        let catalog = TariffCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.default_tier().id, "std");
        assert_eq!(catalog.default_tier().price_per_km, 50.0);
    }
}

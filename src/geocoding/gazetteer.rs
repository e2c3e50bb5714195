use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Geocoder, MIN_SUGGEST_QUERY_CHARS};
use crate::entities::coordinate::Coordinate;
use crate::error::{AppError, AppResult};

/// Location as it appears in gazetteer files. Objects use `{lat, lng}`;
/// arrays follow GeoJSON order, `[lng, lat]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLocation {
    Object { lat: f64, lng: f64 },
    GeoJson([f64; 2]),
}

impl From<RawLocation> for Coordinate {
    fn from(raw: RawLocation) -> Self {
        match raw {
            RawLocation::Object { lat, lng } => Coordinate::new(lat, lng),
            RawLocation::GeoJson([lng, lat]) => Coordinate::new(lat, lng),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    name: String,
    location: RawLocation,
}

/// Offline geocoder over a fixed table of named places.
#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder {
    places: HashMap<String, Coordinate>,
    // (normalized key, display label) in load order
    labels: Vec<(String, String)>,
}

impl GazetteerGeocoder {
    pub fn new<I, S>(places: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: AsRef<str>,
    {
        let mut table = HashMap::new();
        let mut labels = Vec::new();
        for (name, coordinate) in places {
            coordinate.validate()?;
            let key = normalize(name.as_ref());
            if key.is_empty() {
                return Err(AppError::BadRequest(
                    "Gazetteer entry has an empty name".to_string(),
                ));
            }
            if table.insert(key.clone(), coordinate).is_none() {
                labels.push((key, name.as_ref().trim().to_string()));
            }
        }
        Ok(Self {
            places: table,
            labels,
        })
    }

    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        let places: Vec<RawPlace> = serde_json::from_str(raw)?;
        Self::new(places.into_iter().map(|p| (p.name, p.location.into())))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

#[async_trait]
impl Geocoder for GazetteerGeocoder {
    async fn geocode(&self, address: &str) -> AppResult<Coordinate> {
        let key = normalize(address);
        if key.is_empty() {
            return Err(AppError::AddressNotFound("empty address".to_string()));
        }

        match self.places.get(&key) {
            Some(coordinate) => Ok(*coordinate),
            None => {
                tracing::debug!(address, "Address not in gazetteer");
                Err(AppError::AddressNotFound(address.trim().to_string()))
            }
        }
    }

    /// Prefix matches first, then names containing the query elsewhere.
    async fn suggest(&self, query: &str, limit: usize) -> AppResult<Vec<String>> {
        let needle = normalize(query);
        if needle.chars().count() < MIN_SUGGEST_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let prefixed = self
            .labels
            .iter()
            .filter(|(key, _)| key.starts_with(&needle));
        let inner = self
            .labels
            .iter()
            .filter(|(key, _)| !key.starts_with(&needle) && key.contains(&needle));

        Ok(prefixed
            .chain(inner)
            .take(limit)
            .map(|(_, label)| label.clone())
            .collect())
    }
}

fn normalize(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

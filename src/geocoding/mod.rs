//! Address resolution.
//!
//! Providers differ in response shape; every adapter normalises to a
//! [`Coordinate`] and reports unknown addresses as
//! [`AppError::AddressNotFound`].

pub mod gazetteer;

use async_trait::async_trait;

use crate::entities::coordinate::Coordinate;
use crate::error::{AppError, AppResult};

pub use gazetteer::GazetteerGeocoder;

/// Queries shorter than this get no suggestions.
pub const MIN_SUGGEST_QUERY_CHARS: usize = 2;
pub const SUGGESTION_LIMIT: usize = 5;

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> AppResult<Coordinate>;

    /// Address labels completing `query`, at most `limit` of them.
    async fn suggest(&self, query: &str, limit: usize) -> AppResult<Vec<String>>;
}

/// Resolve both ends of a trip. Fails on the first address that cannot be found
/// so no placeholder coordinate ever reaches the engine.
pub async fn resolve_route(
    geocoder: &dyn Geocoder,
    pickup: &str,
    destination: &str,
) -> AppResult<(Coordinate, Coordinate)> {
    if pickup.trim().is_empty() || destination.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Both pickup and destination addresses are required".to_string(),
        ));
    }

    let (pickup_coords, destination_coords) =
        tokio::try_join!(geocoder.geocode(pickup), geocoder.geocode(destination))?;

    pickup_coords.validate()?;
    destination_coords.validate()?;

    Ok((pickup_coords, destination_coords))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGeocoder;

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, address: &str) -> AppResult<Coordinate> {
            match address {
                "a" => Ok(Coordinate::new(55.0, 37.0)),
                "b" => Ok(Coordinate::new(56.0, 38.0)),
                "broken" => Ok(Coordinate::new(f64::NAN, 0.0)),
                other => Err(AppError::AddressNotFound(other.to_string())),
            }
        }

        async fn suggest(&self, _query: &str, _limit: usize) -> AppResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_resolve_route() {
        let (p, d) = resolve_route(&FixedGeocoder, "a", "b").await.unwrap();
        assert_eq!(p, Coordinate::new(55.0, 37.0));
        assert_eq!(d, Coordinate::new(56.0, 38.0));
    }

    #[tokio::test]
    async fn test_resolve_route_not_found() {
        let result = resolve_route(&FixedGeocoder, "a", "atlantis").await;
        assert!(matches!(result, Err(AppError::AddressNotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_route_requires_both_addresses() {
        let result = resolve_route(&FixedGeocoder, "a", "  ").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_resolve_route_rejects_bad_provider_output() {
        let result = resolve_route(&FixedGeocoder, "broken", "b").await;
        assert!(matches!(result, Err(AppError::InvalidCoordinate(_))));
    }
}

use serde::Serialize;

use crate::entities::coordinate::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Map centre used when no route point is known yet (Moscow).
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 55.7558,
    lng: 37.6173,
};

/// Calculate great-circle distance between two coordinates using Haversine formula
/// Returns distance in the unit of `radius`
pub fn haversine_distance(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

/// Centre and zoom that frame the known route points.
pub fn map_view(pickup: Option<&Coordinate>, destination: Option<&Coordinate>) -> MapView {
    match (pickup, destination) {
        (Some(p), Some(d)) => {
            let center = Coordinate::new((p.lat + d.lat) / 2.0, (p.lng + d.lng) / 2.0);
            // planar spread in degrees, good enough for picking a zoom level
            let spread = ((p.lat - d.lat).powi(2) + (p.lng - d.lng).powi(2)).sqrt();
            let zoom = if spread > 0.1 {
                10
            } else if spread > 0.05 {
                12
            } else {
                14
            };
            MapView { center, zoom }
        }
        (Some(point), None) | (None, Some(point)) => MapView {
            center: *point,
            zoom: 14,
        },
        (None, None) => MapView {
            center: DEFAULT_CENTER,
            zoom: 13,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_jakarta_bandung() {
        let jakarta = Coordinate::new(-6.2088, 106.8456);
        let bandung = Coordinate::new(-6.9175, 107.6191);

        let distance = haversine_distance(&jakarta, &bandung, EARTH_RADIUS_KM);
        // Should be approximately 116 km
        assert!(distance > 115.0 && distance < 117.5);
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let p = Coordinate::new(55.7558, 37.6173);
        assert_eq!(haversine_distance(&p, &p, EARTH_RADIUS_KM), 0.0);
    }

    #[test]
    fn test_haversine_antipodal_is_finite() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let d = haversine_distance(&a, &b, EARTH_RADIUS_KM);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_map_view_both_points() {
        let p = Coordinate::new(55.7558, 37.6173);
        let d = Coordinate::new(55.7558, 37.8173);
        let view = map_view(Some(&p), Some(&d));
        assert_eq!(view.zoom, 10);
        assert!((view.center.lng - 37.7173).abs() < 1e-9);

        let near = Coordinate::new(55.7558, 37.6873);
        assert_eq!(map_view(Some(&p), Some(&near)).zoom, 12);

        let next_door = Coordinate::new(55.7568, 37.6183);
        assert_eq!(map_view(Some(&p), Some(&next_door)).zoom, 14);
    }

    #[test]
    fn test_map_view_partial_and_empty() {
        let d = Coordinate::new(59.9343, 30.3351);
        let view = map_view(None, Some(&d));
        assert_eq!(view.center, d);
        assert_eq!(view.zoom, 14);

        let view = map_view(None, None);
        assert_eq!(view.center, DEFAULT_CENTER);
        assert_eq!(view.zoom, 13);
    }
}

//! Great-circle distance and coverage-envelope checks.

use crate::point::{BoundingBox, LatLon};

/// Mean Earth radius in kilometers, as used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Coverage envelope of the BGS borehole index: Great Britain plus margin.
pub const UK_BOUNDS: BoundingBox = BoundingBox {
    min_lat: 49.0,
    min_lon: -8.0,
    max_lat: 61.0,
    max_lon: 2.0,
};

/// Kilometers per degree of latitude, used for degree-buffer boxes.
const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two WGS84 points in kilometers.
///
/// Accurate to within meters over the UK latitude range, which is adequate
/// for proximity ranking but not for survey-grade measurement.
#[must_use]
pub fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// True when the point lies within the supported coverage envelope.
///
/// Used both to validate incoming query points and to sanity-check
/// transformed record coordinates.
#[must_use]
pub fn is_within_uk_bounds(point: LatLon) -> bool {
    UK_BOUNDS.contains(point)
}

/// Degree-buffered box around a point, sized to cover `radius_km` in every
/// direction. Longitude is widened by the latitude cosine so the box does not
/// pinch at northern latitudes.
#[must_use]
pub fn bbox_around(center: LatLon, radius_km: f64) -> BoundingBox {
    let lat_buffer = radius_km / KM_PER_DEGREE;
    let lon_buffer = radius_km / (KM_PER_DEGREE * center.latitude.to_radians().cos());

    BoundingBox {
        min_lat: center.latitude - lat_buffer,
        min_lon: center.longitude - lon_buffer,
        max_lat: center.latitude + lat_buffer,
        max_lon: center.longitude + lon_buffer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: LatLon = LatLon::new(51.5074, -0.1278);
    const EDINBURGH: LatLon = LatLon::new(55.9533, -3.1883);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(LONDON, LONDON), 0.0);
        assert_eq!(haversine_km(EDINBURGH, EDINBURGH), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_km(LONDON, EDINBURGH);
        let ba = haversine_km(EDINBURGH, LONDON);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn london_to_edinburgh_is_about_534_km() {
        let d = haversine_km(LONDON, EDINBURGH);
        assert!((d - 534.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn uk_bounds_accept_british_cities_and_reject_paris() {
        assert!(is_within_uk_bounds(LONDON));
        assert!(is_within_uk_bounds(EDINBURGH));
        assert!(!is_within_uk_bounds(LatLon::new(48.8566, 2.3522)));
        assert!(!is_within_uk_bounds(LatLon::new(40.7128, -74.0060)));
    }

    #[test]
    fn buffered_box_covers_the_requested_radius() {
        let bbox = bbox_around(LONDON, 5.0);
        assert!(bbox.contains(LONDON));
        // Corner-to-center spans at least the radius.
        let corner = LatLon::new(bbox.min_lat, bbox.min_lon);
        assert!(haversine_km(LONDON, corner) >= 5.0);
    }
}

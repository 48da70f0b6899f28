//! British National Grid (OSGB36) to WGS84 conversion.
//!
//! The transform runs in two stages: an inverse transverse Mercator
//! projection on the Airy 1830 ellipsoid recovers OSGB36 geodetic
//! coordinates, then a 7-parameter Helmert shift moves them onto the WGS84
//! datum. Collapsing the two stages into a single linear approximation drifts
//! by tens of meters across the grid, which is enough to reorder proximity
//! results, so both stages are kept explicit.

use std::error::Error;
use std::fmt;

use crate::point::LatLon;

// Airy 1830 ellipsoid, the OSGB36 reference surface.
const AIRY_A: f64 = 6_377_563.396;
const AIRY_B: f64 = 6_356_256.909;

// WGS84 ellipsoid.
const WGS84_A: f64 = 6_378_137.0;
const WGS84_B: f64 = 6_356_752.3141;

// National Grid transverse Mercator parameters: central-meridian scale,
// true origin 49N 2W, false origin offsets.
const SCALE_F0: f64 = 0.999_601_271_7;
const TRUE_ORIGIN_LAT_DEG: f64 = 49.0;
const TRUE_ORIGIN_LON_DEG: f64 = -2.0;
const FALSE_EASTING: f64 = 400_000.0;
const FALSE_NORTHING: f64 = -100_000.0;

// OSGB36 -> WGS84 Helmert parameters: translation in meters, scale in ppm,
// rotations in arcseconds.
const HELMERT_TX: f64 = 446.448;
const HELMERT_TY: f64 = -125.157;
const HELMERT_TZ: f64 = 542.060;
const HELMERT_S_PPM: f64 = -20.4894;
const HELMERT_RX_ARCSEC: f64 = 0.1502;
const HELMERT_RY_ARCSEC: f64 = 0.2470;
const HELMERT_RZ_ARCSEC: f64 = 0.8421;

// Representable window around the 700 x 1300 km grid. Inputs far outside it
// are garbage values, not grid references.
const MIN_EASTING: f64 = -500_000.0;
const MAX_EASTING: f64 = 1_500_000.0;
const MIN_NORTHING: f64 = -500_000.0;
const MAX_NORTHING: f64 = 2_500_000.0;

/// Transform input that cannot be interpreted as a grid position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    InvalidCoordinate { easting: f64, northing: f64 },
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate { easting, northing } => write!(
                f,
                "invalid BNG coordinate: easting {easting}, northing {northing}"
            ),
        }
    }
}

impl Error for GeoError {}

/// Converts a BNG easting/northing pair to WGS84 latitude/longitude.
///
/// Output is good to sub-meter resolution relative to the Helmert transform
/// itself, which sits within a few meters of the ETRS89 truth across Great
/// Britain. Inputs are never clamped.
///
/// # Errors
/// Returns [`GeoError::InvalidCoordinate`] when either input is non-finite or
/// falls wildly outside the representable grid window.
pub fn to_wgs84(easting: f64, northing: f64) -> Result<LatLon, GeoError> {
    if !easting.is_finite()
        || !northing.is_finite()
        || !(MIN_EASTING..=MAX_EASTING).contains(&easting)
        || !(MIN_NORTHING..=MAX_NORTHING).contains(&northing)
    {
        return Err(GeoError::InvalidCoordinate { easting, northing });
    }

    let osgb36 = grid_to_osgb36(easting, northing);
    Ok(osgb36_to_wgs84(osgb36))
}

/// Inverse transverse Mercator: grid easting/northing to OSGB36 geodetic
/// coordinates on the Airy 1830 ellipsoid.
fn grid_to_osgb36(easting: f64, northing: f64) -> LatLon {
    let a_f0 = AIRY_A * SCALE_F0;
    let b_f0 = AIRY_B * SCALE_F0;
    let e2 = (AIRY_A * AIRY_A - AIRY_B * AIRY_B) / (AIRY_A * AIRY_A);
    let n = (a_f0 - b_f0) / (a_f0 + b_f0);
    let phi0 = TRUE_ORIGIN_LAT_DEG.to_radians();
    let lambda0 = TRUE_ORIGIN_LON_DEG.to_radians();

    // Iterate the meridional arc until the residual drops below 0.01 mm.
    let mut phi = phi0;
    let mut arc = 0.0;
    loop {
        phi = (northing - FALSE_NORTHING - arc) / a_f0 + phi;
        arc = meridional_arc(b_f0, n, phi0, phi);
        if (northing - FALSE_NORTHING - arc).abs() < 1e-5 {
            break;
        }
    }

    let sin_phi = phi.sin();
    let sec_phi = 1.0 / phi.cos();
    let tan2 = phi.tan().powi(2);
    let tan4 = tan2 * tan2;
    let tan6 = tan4 * tan2;

    let nu = a_f0 / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let rho = a_f0 * (1.0 - e2) * (1.0 - e2 * sin_phi * sin_phi).powf(-1.5);
    let eta2 = nu / rho - 1.0;

    let vii = phi.tan() / (2.0 * rho * nu);
    let viii = phi.tan() / (24.0 * rho * nu.powi(3))
        * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
    let ix = phi.tan() / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
    let x = sec_phi / nu;
    let xi = sec_phi / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
    let xii = sec_phi / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
    let xiia = sec_phi / (5040.0 * nu.powi(7)) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

    let de = easting - FALSE_EASTING;
    let latitude = phi - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
    let longitude = lambda0 + x * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);

    LatLon::new(latitude.to_degrees(), longitude.to_degrees())
}

/// Meridional arc length on the scaled Airy ellipsoid.
fn meridional_arc(b_f0: f64, n: f64, phi0: f64, phi: f64) -> f64 {
    let n2 = n * n;
    let n3 = n2 * n;
    let dphi = phi - phi0;
    let sphi = phi + phi0;

    b_f0
        * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * dphi
            - (3.0 * n + 3.0 * n2 + 2.625 * n3) * dphi.sin() * sphi.cos()
            + (1.875 * n2 + 1.875 * n3) * (2.0 * dphi).sin() * (2.0 * sphi).cos()
            - (35.0 / 24.0) * n3 * (3.0 * dphi).sin() * (3.0 * sphi).cos())
}

/// Helmert datum shift from OSGB36 to WGS84 via cartesian coordinates.
fn osgb36_to_wgs84(point: LatLon) -> LatLon {
    let (x, y, z) = geodetic_to_cartesian(point, AIRY_A, AIRY_B);

    let s = 1.0 + HELMERT_S_PPM * 1e-6;
    let rx = arcsec_to_radians(HELMERT_RX_ARCSEC);
    let ry = arcsec_to_radians(HELMERT_RY_ARCSEC);
    let rz = arcsec_to_radians(HELMERT_RZ_ARCSEC);

    let xp = HELMERT_TX + s * x - rz * y + ry * z;
    let yp = HELMERT_TY + rz * x + s * y - rx * z;
    let zp = HELMERT_TZ - ry * x + rx * y + s * z;

    cartesian_to_geodetic(xp, yp, zp, WGS84_A, WGS84_B)
}

fn arcsec_to_radians(arcsec: f64) -> f64 {
    (arcsec / 3600.0).to_radians()
}

/// Geodetic coordinates (height zero) to earth-centered cartesian.
fn geodetic_to_cartesian(point: LatLon, a: f64, b: f64) -> (f64, f64, f64) {
    let phi = point.latitude.to_radians();
    let lambda = point.longitude.to_radians();
    let e2 = (a * a - b * b) / (a * a);

    let nu = a / (1.0 - e2 * phi.sin() * phi.sin()).sqrt();
    let x = nu * phi.cos() * lambda.cos();
    let y = nu * phi.cos() * lambda.sin();
    let z = (1.0 - e2) * nu * phi.sin();
    (x, y, z)
}

/// Earth-centered cartesian back to geodetic latitude/longitude.
fn cartesian_to_geodetic(x: f64, y: f64, z: f64, a: f64, b: f64) -> LatLon {
    let e2 = (a * a - b * b) / (a * a);
    let p = x.hypot(y);

    let mut phi = (z / (p * (1.0 - e2))).atan();
    // Converges in a handful of iterations; the cap is a safety stop.
    for _ in 0..16 {
        let nu = a / (1.0 - e2 * phi.sin() * phi.sin()).sqrt();
        let next = ((z + e2 * nu * phi.sin()) / p).atan();
        if (next - phi).abs() < 1e-12 {
            phi = next;
            break;
        }
        phi = next;
    }

    let lambda = y.atan2(x);
    LatLon::new(phi.to_degrees(), lambda.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::is_within_uk_bounds;

    // Ordnance Survey worked example: grid TG 51409 13177 (Caister water
    // tower), OSGB36 52 39 27.2531 N, 1 43 4.5177 E.
    const EXAMPLE_EASTING: f64 = 651_409.903;
    const EXAMPLE_NORTHING: f64 = 313_177.270;

    fn dms(degrees: f64, minutes: f64, seconds: f64) -> f64 {
        degrees + minutes / 60.0 + seconds / 3600.0
    }

    #[test]
    fn inverse_projection_matches_os_worked_example() {
        let p = grid_to_osgb36(EXAMPLE_EASTING, EXAMPLE_NORTHING);
        assert!((p.latitude - dms(52.0, 39.0, 27.2531)).abs() < 1e-6, "lat {}", p.latitude);
        assert!((p.longitude - dms(1.0, 43.0, 4.5177)).abs() < 1e-6, "lon {}", p.longitude);
    }

    #[test]
    fn inverse_projection_recovers_true_origin() {
        let p = grid_to_osgb36(FALSE_EASTING, FALSE_NORTHING);
        assert!((p.latitude - TRUE_ORIGIN_LAT_DEG).abs() < 1e-9);
        assert!((p.longitude - TRUE_ORIGIN_LON_DEG).abs() < 1e-9);
    }

    #[test]
    fn full_transform_lands_near_published_etrs89_position() {
        let p = to_wgs84(EXAMPLE_EASTING, EXAMPLE_NORTHING).expect("in-grid input");
        // ETRS89 52 39 28.8282 N, 1 42 57.8663 E; the single Helmert set is
        // documented as good to a few meters.
        assert!((p.latitude - dms(52.0, 39.0, 28.8282)).abs() < 1e-4, "lat {}", p.latitude);
        assert!((p.longitude - dms(1.0, 42.0, 57.8663)).abs() < 2e-4, "lon {}", p.longitude);
    }

    #[test]
    fn transform_of_british_grid_points_stays_in_coverage() {
        for (e, n) in [
            (530_000.0, 180_000.0),
            (325_000.0, 673_000.0),
            (180_000.0, 45_000.0),
            (651_409.903, 313_177.270),
        ] {
            let p = to_wgs84(e, n).expect("in-grid input");
            assert!(is_within_uk_bounds(p), "({e}, {n}) -> {p:?}");
        }
    }

    #[test]
    fn rejects_garbage_input_without_clamping() {
        assert!(to_wgs84(-999_999.0, 0.0).is_err());
        assert!(to_wgs84(0.0, 9_999_999.0).is_err());
        assert!(to_wgs84(f64::NAN, 100_000.0).is_err());
        assert!(to_wgs84(400_000.0, f64::INFINITY).is_err());
    }

    #[test]
    fn cartesian_round_trip_preserves_geodetic_position() {
        let p = LatLon::new(52.5, -1.5);
        let (x, y, z) = geodetic_to_cartesian(p, WGS84_A, WGS84_B);
        let back = cartesian_to_geodetic(x, y, z, WGS84_A, WGS84_B);
        assert!((back.latitude - p.latitude).abs() < 1e-9);
        assert!((back.longitude - p.longitude).abs() < 1e-9);
    }
}

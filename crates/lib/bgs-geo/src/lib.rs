//! Coordinate transforms and geodesy helpers for bgs-mcp.
//!
//! This crate owns the British National Grid (OSGB36) to WGS84 transform
//! chain and the great-circle math used for proximity ranking and coverage
//! checks. Everything here is pure and stateless.

pub mod bng;
pub mod math;
mod point;

pub use bng::{GeoError, to_wgs84};
pub use math::{EARTH_RADIUS_KM, UK_BOUNDS, bbox_around, haversine_km, is_within_uk_bounds};
pub use point::{BoundingBox, LatLon};

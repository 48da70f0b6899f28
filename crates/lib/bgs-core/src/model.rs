use bgs_geo::{BoundingBox, LatLon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical borehole record derived from one upstream feature.
///
/// `wgs84` is always recomputed from `easting`/`northing` during
/// normalization; the record never carries an upstream-supplied latitude or
/// longitude, so the two representations cannot diverge. Records are
/// immutable after construction and live for a single query/response cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoreholeRecord {
    pub id: String,
    pub easting: f64,
    pub northing: f64,
    pub wgs84: LatLon,
    /// Total drilled depth in meters. This is not depth to bedrock; bedrock
    /// depth must be read from the stratigraphy log behind `log_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_depth_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Great-circle distance from the query center. Present only for
    /// point-radius searches; never part of the record's identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Loosely-typed upstream GeoJSON feature, prior to normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBorehole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Geographic scope of a query, validated against the UK coverage envelope
/// before any upstream call is made.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchRegion {
    Point { center: LatLon, radius_km: f64 },
    Area(BoundingBox),
}

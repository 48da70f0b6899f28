//! Normalization of raw upstream features into canonical records.
//!
//! Field extraction is an enumerated contract over the loosely-typed
//! attribute map; every way a feature can be unusable is counted rather than
//! surfaced as a query-level failure.

use bgs_geo::LatLon;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::model::{BoreholeRecord, RawBorehole};

// Upstream attribute names in the AGS borehole index collection.
pub const FIELD_ID: &str = "loca_id";
pub const FIELD_EASTING: &str = "x";
pub const FIELD_NORTHING: &str = "y";
pub const FIELD_FINAL_DEPTH: &str = "loca_fdep";
pub const FIELD_LOG_URL: &str = "ags_log_url";
pub const FIELD_PROJECT_NAME: &str = "proj_name";

/// Why a raw feature was dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRejection {
    MissingIdentifier,
    MissingCoordinates,
    InvalidCoordinate,
    OutOfBounds,
}

/// Counters for features dropped during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkippedRecords {
    pub missing_identifier: usize,
    pub missing_coordinates: usize,
    pub invalid_coordinates: usize,
    pub out_of_bounds: usize,
}

impl SkippedRecords {
    pub fn count(&mut self, rejection: RecordRejection) {
        match rejection {
            RecordRejection::MissingIdentifier => self.missing_identifier += 1,
            RecordRejection::MissingCoordinates => self.missing_coordinates += 1,
            RecordRejection::InvalidCoordinate => self.invalid_coordinates += 1,
            RecordRejection::OutOfBounds => self.out_of_bounds += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.missing_identifier
            + self.missing_coordinates
            + self.invalid_coordinates
            + self.out_of_bounds
    }
}

/// Result of normalizing one upstream batch. Records keep their upstream
/// arrival order.
#[derive(Debug, Clone, Default)]
pub struct NormalizationReport {
    pub records: Vec<BoreholeRecord>,
    pub skipped: SkippedRecords,
}

/// Normalizes a batch of upstream features, attaching `distance_km` when a
/// reference point is supplied. Unusable features are dropped and counted.
#[must_use]
pub fn normalize_features(raw: Vec<RawBorehole>, reference: Option<LatLon>) -> NormalizationReport {
    let mut report = NormalizationReport::default();
    for feature in raw {
        match normalize_feature(&feature, reference) {
            Ok(record) => report.records.push(record),
            Err(rejection) => {
                debug!(?rejection, "dropping upstream feature");
                report.skipped.count(rejection);
            }
        }
    }
    report
}

/// Normalizes a single upstream feature.
///
/// # Errors
/// Returns the [`RecordRejection`] describing why the feature is unusable:
/// no identifier, no grid reference, a grid reference the transform rejects,
/// or a transformed position outside the coverage envelope. Upstream data
/// occasionally carries erroneous grid references; returning them would
/// silently corrupt proximity results.
pub fn normalize_feature(
    raw: &RawBorehole,
    reference: Option<LatLon>,
) -> Result<BoreholeRecord, RecordRejection> {
    let id = identifier(raw).ok_or(RecordRejection::MissingIdentifier)?;

    let (Some(easting), Some(northing)) = (
        number_field(raw, FIELD_EASTING),
        number_field(raw, FIELD_NORTHING),
    ) else {
        return Err(RecordRejection::MissingCoordinates);
    };

    let wgs84 =
        bgs_geo::to_wgs84(easting, northing).map_err(|_| RecordRejection::InvalidCoordinate)?;
    if !bgs_geo::is_within_uk_bounds(wgs84) {
        return Err(RecordRejection::OutOfBounds);
    }

    // Missing, unparsable, or negative depths are unusable for depth-based
    // filtering and statistics; excluded rather than defaulted to zero.
    let final_depth_m =
        number_field(raw, FIELD_FINAL_DEPTH).filter(|depth| depth.is_finite() && *depth >= 0.0);

    Ok(BoreholeRecord {
        id,
        easting,
        northing,
        wgs84,
        final_depth_m,
        log_url: string_field(raw, FIELD_LOG_URL),
        project_name: string_field(raw, FIELD_PROJECT_NAME),
        distance_km: reference.map(|center| bgs_geo::haversine_km(center, wgs84)),
    })
}

fn identifier(raw: &RawBorehole) -> Option<String> {
    string_field(raw, FIELD_ID).or_else(|| raw.id.as_ref().and_then(value_as_string))
}

fn string_field(raw: &RawBorehole, field: &str) -> Option<String> {
    raw.properties.get(field).and_then(value_as_string)
}

/// Accepts JSON numbers and numeric strings; the upstream index is not
/// consistent about which it emits.
fn number_field(raw: &RawBorehole, field: &str) -> Option<f64> {
    match raw.properties.get(field)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

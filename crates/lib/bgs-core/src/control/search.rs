//! Location, area, and deep-borehole search operations.

use bgs_geo::{BoundingBox, LatLon};
use serde::Serialize;
use tracing::info;

use super::{BoreholeControlPlane, ControlError};
use crate::fetch::BoreholeFetcher;
use crate::model::{BoreholeRecord, SearchRegion};
use crate::normalize::SkippedRecords;

/// Deep holes are the ones most likely to have reached bedrock; the
/// stratigraphy log behind each record's `log_url` is the authority.
const BEDROCK_NOTE: &str =
    "Final depth is total drilled depth, not depth to bedrock. Deeper boreholes are more likely \
     to have reached bedrock; check log_url for detailed stratigraphy.";

/// Parameters echoed back with a location search.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LocationSearchParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationSearchReport {
    pub records: Vec<BoreholeRecord>,
    pub count: usize,
    /// Raw features fetched before normalization and the radius filter.
    pub total_fetched: usize,
    pub skipped: SkippedRecords,
    pub search: LocationSearchParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaSearchReport {
    pub records: Vec<BoreholeRecord>,
    pub count: usize,
    pub total_fetched: usize,
    pub skipped: SkippedRecords,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeepBoreholeCriteria {
    pub min_depth_m: f64,
    pub region: SearchRegion,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeepBoreholeReport {
    pub records: Vec<BoreholeRecord>,
    pub count: usize,
    /// Normalized records examined before the depth filter.
    pub total_searched: usize,
    pub skipped: SkippedRecords,
    pub criteria: DeepBoreholeCriteria,
    pub note: &'static str,
}

impl<F: BoreholeFetcher> BoreholeControlPlane<F> {
    /// Finds boreholes within `radius_km` of `center`, nearest first.
    ///
    /// Records at equal distance keep their upstream arrival order, so
    /// identical upstream responses produce identical results.
    ///
    /// # Errors
    /// `OutOfCoverage` for centers outside the UK envelope and `InvalidQuery`
    /// for a bad radius, both before any upstream call; `Fetch` when the
    /// upstream call fails.
    pub async fn location_search(
        &self,
        center: LatLon,
        radius_km: f64,
        limit: Option<usize>,
    ) -> Result<LocationSearchReport, ControlError> {
        let limit = self.clamp_limit(limit);
        let region = SearchRegion::Point { center, radius_km };
        let (mut report, total_fetched) = self.region_records(region).await?;

        report.records.sort_by(|a, b| {
            a.distance_km
                .unwrap_or(f64::MAX)
                .total_cmp(&b.distance_km.unwrap_or(f64::MAX))
        });
        report.records.truncate(limit);

        info!(
            count = report.records.len(),
            total_fetched, radius_km, "location search complete"
        );
        Ok(LocationSearchReport {
            count: report.records.len(),
            records: report.records,
            total_fetched,
            skipped: report.skipped,
            search: LocationSearchParams {
                latitude: center.latitude,
                longitude: center.longitude,
                radius_km,
                limit,
            },
        })
    }

    /// Finds boreholes whose transformed position falls inside `bbox`,
    /// in upstream arrival order.
    ///
    /// # Errors
    /// `InvalidQuery` for a malformed box, `OutOfCoverage` when the box does
    /// not overlap the UK envelope, `Fetch` on upstream failure.
    pub async fn area_search(
        &self,
        bbox: BoundingBox,
        limit: Option<usize>,
    ) -> Result<AreaSearchReport, ControlError> {
        let limit = self.clamp_limit(limit);
        let (mut report, total_fetched) = self.region_records(SearchRegion::Area(bbox)).await?;
        report.records.truncate(limit);

        info!(count = report.records.len(), total_fetched, "area search complete");
        Ok(AreaSearchReport {
            count: report.records.len(),
            records: report.records,
            total_fetched,
            skipped: report.skipped,
            bbox,
        })
    }

    /// Finds boreholes drilled to at least `min_depth_m` within a region,
    /// deepest first. Records without a usable depth are excluded.
    ///
    /// # Errors
    /// Region validation errors as for the other searches; `InvalidQuery`
    /// for a bad depth threshold; `Fetch` on upstream failure.
    pub async fn deep_borehole_search(
        &self,
        region: SearchRegion,
        min_depth_m: f64,
        limit: Option<usize>,
    ) -> Result<DeepBoreholeReport, ControlError> {
        if !min_depth_m.is_finite() || min_depth_m < 0.0 {
            return Err(ControlError::InvalidQuery(format!(
                "minimum depth must be a non-negative number of meters, got {min_depth_m}"
            )));
        }

        let limit = self.clamp_limit(limit);
        let (report, _total_fetched) = self.region_records(region).await?;
        let total_searched = report.records.len();

        let mut deep: Vec<BoreholeRecord> = report
            .records
            .into_iter()
            .filter(|record| record.final_depth_m.is_some_and(|depth| depth >= min_depth_m))
            .collect();
        deep.sort_by(|a, b| {
            b.final_depth_m
                .unwrap_or(f64::MIN)
                .total_cmp(&a.final_depth_m.unwrap_or(f64::MIN))
        });
        deep.truncate(limit);

        info!(count = deep.len(), total_searched, min_depth_m, "deep borehole search complete");
        Ok(DeepBoreholeReport {
            count: deep.len(),
            records: deep,
            total_searched,
            skipped: report.skipped,
            criteria: DeepBoreholeCriteria {
                min_depth_m,
                region,
            },
            note: BEDROCK_NOTE,
        })
    }
}

//! The control plane implementing the query operations.
//!
//! Each operation is a pure request/response function over records fetched
//! for that call; there is no server-side index and no shared mutable state.
//! The upstream fetcher is an injected collaborator, shared behind an `Arc`.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use bgs_geo::{BoundingBox, LatLon, UK_BOUNDS};

use crate::fetch::{BoreholeFetcher, FetchError};
use crate::model::SearchRegion;
use crate::normalize::{NormalizationReport, normalize_features};

pub mod search;
pub mod summary;

pub use search::{
    AreaSearchReport,
    DeepBoreholeCriteria,
    DeepBoreholeReport,
    LocationSearchParams,
    LocationSearchReport,
};
pub use summary::RegionSummaryReport;

#[derive(Debug)]
pub enum ControlError {
    /// Query geometry falls outside the supported coverage envelope.
    /// Produced before any upstream call is made.
    OutOfCoverage(String),
    /// Malformed query parameters, also rejected before any upstream call.
    InvalidQuery(String),
    /// Upstream fetch failure; never conflated with an empty result set.
    Fetch(FetchError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfCoverage(message) => write!(f, "out of coverage: {message}"),
            Self::InvalidQuery(message) => write!(f, "invalid query: {message}"),
            Self::Fetch(err) => write!(f, "upstream fetch failed: {err}"),
        }
    }
}

impl Error for ControlError {}

impl From<FetchError> for ControlError {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}

/// Result shaping limits and histogram width. The upstream documentation does
/// not pin these down, so they are configuration rather than constants.
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    /// Records returned when the caller does not ask for a limit.
    pub default_limit: usize,
    /// Hard cap on records returned per operation.
    pub max_limit: usize,
    /// Raw features requested upstream per query.
    pub fetch_limit: usize,
    /// Histogram bucket width for summaries.
    pub bucket_width_m: f64,
}

impl QueryLimits {
    #[must_use]
    pub const fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    #[must_use]
    pub const fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit;
        self
    }

    #[must_use]
    pub const fn with_fetch_limit(mut self, fetch_limit: usize) -> Self {
        self.fetch_limit = fetch_limit;
        self
    }

    #[must_use]
    pub const fn with_bucket_width_m(mut self, bucket_width_m: f64) -> Self {
        self.bucket_width_m = bucket_width_m;
        self
    }
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 1000,
            fetch_limit: 1000,
            bucket_width_m: crate::summary::DEFAULT_BUCKET_WIDTH_M,
        }
    }
}

/// Query engine over an injected upstream fetcher.
pub struct BoreholeControlPlane<F> {
    fetcher: Arc<F>,
    limits: QueryLimits,
}

impl<F> Clone for BoreholeControlPlane<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            limits: self.limits,
        }
    }
}

impl<F: BoreholeFetcher> BoreholeControlPlane<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_limits(fetcher, QueryLimits::default())
    }

    pub fn with_limits(fetcher: F, limits: QueryLimits) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            limits,
        }
    }

    #[must_use]
    pub const fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    pub(crate) fn clamp_limit(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.limits.default_limit)
            .min(self.limits.max_limit)
    }

    /// Validates a region, fetches its raw features, and normalizes them with
    /// the region's own membership filter applied. Returns the report plus
    /// the raw feature count before normalization.
    pub(crate) async fn region_records(
        &self,
        region: SearchRegion,
    ) -> Result<(NormalizationReport, usize), ControlError> {
        match region {
            SearchRegion::Point { center, radius_km } => {
                ensure_center(center)?;
                ensure_radius(radius_km)?;
                let bbox = bgs_geo::bbox_around(center, radius_km);
                let raw = self.fetcher.fetch_area(bbox, self.limits.fetch_limit).await?;
                let total_fetched = raw.len();
                let mut report = normalize_features(raw, Some(center));
                report
                    .records
                    .retain(|record| record.distance_km.is_some_and(|d| d <= radius_km));
                Ok((report, total_fetched))
            }
            SearchRegion::Area(bbox) => {
                ensure_area(&bbox)?;
                let raw = self.fetcher.fetch_area(bbox, self.limits.fetch_limit).await?;
                let total_fetched = raw.len();
                let mut report = normalize_features(raw, None);
                report.records.retain(|record| bbox.contains(record.wgs84));
                Ok((report, total_fetched))
            }
        }
    }
}

fn ensure_center(center: LatLon) -> Result<(), ControlError> {
    if !center.is_finite() {
        return Err(ControlError::InvalidQuery(format!(
            "latitude and longitude must be finite, got ({}, {})",
            center.latitude, center.longitude
        )));
    }
    if !bgs_geo::is_within_uk_bounds(center) {
        return Err(ControlError::OutOfCoverage(format!(
            "({}, {}) is outside the coverage envelope {}-{}N, {}-{}E",
            center.latitude,
            center.longitude,
            UK_BOUNDS.min_lat,
            UK_BOUNDS.max_lat,
            UK_BOUNDS.min_lon,
            UK_BOUNDS.max_lon
        )));
    }
    Ok(())
}

fn ensure_radius(radius_km: f64) -> Result<(), ControlError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(ControlError::InvalidQuery(format!(
            "search radius must be a positive number of kilometers, got {radius_km}"
        )));
    }
    Ok(())
}

fn ensure_area(bbox: &BoundingBox) -> Result<(), ControlError> {
    if !bbox.is_valid() {
        return Err(ControlError::InvalidQuery(
            "bounding box corners must be finite with min not exceeding max".to_string(),
        ));
    }
    if !bbox.intersects(&UK_BOUNDS) {
        return Err(ControlError::OutOfCoverage(format!(
            "bounding box ({}, {}) .. ({}, {}) does not overlap the coverage envelope",
            bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
        )));
    }
    Ok(())
}

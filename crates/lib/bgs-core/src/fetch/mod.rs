//! Upstream data access for the BGS OGC API.
//!
//! The control plane only sees the [`BoreholeFetcher`] contract; the reqwest
//! client in [`ogc`] is the production implementation.

pub mod ogc;

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use bgs_geo::BoundingBox;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::RawBorehole;

pub use ogc::{DEFAULT_BASE_URL, DEFAULT_COLLECTION, OgcApiClient, OgcApiConfig};

/// Upstream fetch failure. Reported as a distinct category: a failed fetch is
/// never conflated with zero records found.
#[derive(Debug)]
pub enum FetchError {
    /// Transport-level failure reaching the upstream service.
    Network(String),
    /// Upstream responded with a non-success status.
    UpstreamStatus { status: u16, body: String },
    /// Upstream payload did not parse as a feature collection.
    Malformed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(message) => write!(f, "upstream request failed: {message}"),
            Self::UpstreamStatus { status, body } => {
                write!(f, "upstream returned HTTP {status}: {body}")
            }
            Self::Malformed(message) => write!(f, "malformed upstream response: {message}"),
        }
    }
}

impl Error for FetchError {}

/// Availability report for the upstream collection.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub collection_url: String,
    pub latency_ms: u64,
    pub checked_at: DateTime<Utc>,
}

/// Supplies raw borehole features for a bounding box.
///
/// Implementations own transport concerns; retry and backoff, if any, belong
/// here. The control plane never retries and treats every failure as a value.
#[async_trait]
pub trait BoreholeFetcher: Send + Sync + 'static {
    /// Fetches the raw features intersecting `bbox`, capped at `limit`.
    async fn fetch_area(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> Result<Vec<RawBorehole>, FetchError>;

    /// Probes upstream availability.
    async fn status(&self) -> Result<ServiceStatus, FetchError>;
}

//! Region summary and upstream status operations.

use serde::Serialize;
use tracing::info;

use super::{BoreholeControlPlane, ControlError};
use crate::fetch::{BoreholeFetcher, ServiceStatus};
use crate::model::SearchRegion;
use crate::normalize::SkippedRecords;
use crate::summary::{BoreholeSummary, summarize};

#[derive(Debug, Clone, Serialize)]
pub struct RegionSummaryReport {
    pub summary: BoreholeSummary,
    pub total_fetched: usize,
    pub skipped: SkippedRecords,
    pub region: SearchRegion,
}

impl<F: BoreholeFetcher> BoreholeControlPlane<F> {
    /// Fetches a region and reduces it to depth statistics.
    ///
    /// # Errors
    /// Region validation errors as for the searches; `Fetch` on upstream
    /// failure. An empty region is not an error; the summary carries the
    /// `empty` flag with zeroed statistics.
    pub async fn region_summary(
        &self,
        region: SearchRegion,
    ) -> Result<RegionSummaryReport, ControlError> {
        let (report, total_fetched) = self.region_records(region).await?;
        let summary = summarize(&report.records, self.limits().bucket_width_m);

        info!(total = summary.total, excluded = summary.excluded, "region summary complete");
        Ok(RegionSummaryReport {
            summary,
            total_fetched,
            skipped: report.skipped,
            region,
        })
    }

    /// Pass-through to the upstream availability probe.
    ///
    /// # Errors
    /// `Fetch` when the probe fails.
    pub async fn service_status(&self) -> Result<ServiceStatus, ControlError> {
        Ok(self.fetcher.status().await?)
    }
}

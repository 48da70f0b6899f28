//! Depth statistics over a result set.

use serde::Serialize;

use crate::model::BoreholeRecord;

/// Default histogram bucket width in meters. The upstream documentation does
/// not pin this down, so it stays configurable.
pub const DEFAULT_BUCKET_WIDTH_M: f64 = 10.0;

/// One fixed-width depth histogram bucket, `lower_m` inclusive, `upper_m`
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthBucket {
    pub lower_m: f64,
    pub upper_m: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DepthStatistics {
    /// Records with a usable depth.
    pub count: usize,
    pub min_m: f64,
    pub max_m: f64,
    pub mean_m: f64,
    pub total_drilled_m: f64,
}

/// Summary statistics for one record set.
///
/// Callers use the histogram to judge how many holes plausibly reached
/// bedrock without pulling every raw record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoreholeSummary {
    pub total: usize,
    /// Records without a usable depth, excluded from the statistics below.
    pub excluded: usize,
    /// True when no record carried a usable depth. Statistics are zeroed
    /// rather than raising; this is a reported, non-fatal condition.
    pub empty: bool,
    pub depth: DepthStatistics,
    pub depth_buckets: Vec<DepthBucket>,
    pub projects: Vec<String>,
    pub with_log_url: usize,
}

/// Reduces a record set to depth statistics and a fixed-width histogram.
///
/// A non-finite or non-positive `bucket_width_m` falls back to
/// [`DEFAULT_BUCKET_WIDTH_M`].
#[must_use]
pub fn summarize(records: &[BoreholeRecord], bucket_width_m: f64) -> BoreholeSummary {
    let depths: Vec<f64> = records.iter().filter_map(|r| r.final_depth_m).collect();
    let with_log_url = records.iter().filter(|r| r.log_url.is_some()).count();

    let mut projects: Vec<String> = records
        .iter()
        .filter_map(|r| r.project_name.clone())
        .collect();
    projects.sort();
    projects.dedup();

    let excluded = records.len() - depths.len();
    if depths.is_empty() {
        return BoreholeSummary {
            total: records.len(),
            excluded,
            empty: true,
            depth: DepthStatistics::default(),
            depth_buckets: Vec::new(),
            projects,
            with_log_url,
        };
    }

    let width = if bucket_width_m.is_finite() && bucket_width_m > 0.0 {
        bucket_width_m
    } else {
        DEFAULT_BUCKET_WIDTH_M
    };

    let mut min_m = f64::INFINITY;
    let mut max_m = f64::NEG_INFINITY;
    let mut total_drilled_m = 0.0;
    for depth in &depths {
        min_m = min_m.min(*depth);
        max_m = max_m.max(*depth);
        total_drilled_m += depth;
    }

    let depth = DepthStatistics {
        count: depths.len(),
        min_m,
        max_m,
        mean_m: total_drilled_m / depths.len() as f64,
        total_drilled_m,
    };

    BoreholeSummary {
        total: records.len(),
        excluded,
        empty: false,
        depth,
        depth_buckets: build_histogram(&depths, width),
        projects,
        with_log_url,
    }
}

fn build_histogram(depths: &[f64], width: f64) -> Vec<DepthBucket> {
    let bucket_index = |depth: f64| (depth / width).floor() as usize;
    let last = depths.iter().copied().map(bucket_index).max().unwrap_or(0);

    let mut counts = vec![0usize; last + 1];
    for depth in depths {
        counts[bucket_index(*depth)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| DepthBucket {
            lower_m: index as f64 * width,
            upper_m: (index + 1) as f64 * width,
            count,
        })
        .collect()
}

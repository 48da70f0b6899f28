use async_trait::async_trait;
use bgs_core::control::{BoreholeControlPlane, ControlError, QueryLimits};
use bgs_core::fetch::{BoreholeFetcher, FetchError, ServiceStatus};
use bgs_core::model::{RawBorehole, SearchRegion};
use bgs_geo::{BoundingBox, LatLon};
use serde_json::json;

/// Fetcher fed from a fixed feature list, or failing with a canned error.
struct StubFetcher {
    features: Vec<RawBorehole>,
    fail: bool,
}

impl StubFetcher {
    fn with_features(features: Vec<RawBorehole>) -> Self {
        Self {
            features,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            features: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl BoreholeFetcher for StubFetcher {
    async fn fetch_area(
        &self,
        _bbox: BoundingBox,
        _limit: usize,
    ) -> Result<Vec<RawBorehole>, FetchError> {
        if self.fail {
            return Err(FetchError::Network("connection refused".to_string()));
        }
        Ok(self.features.clone())
    }

    async fn status(&self) -> Result<ServiceStatus, FetchError> {
        Err(FetchError::Network("connection refused".to_string()))
    }
}

fn feature(id: &str, easting: f64, northing: f64, depth: Option<f64>) -> RawBorehole {
    let mut properties = json!({
        "loca_id": id,
        "x": easting,
        "y": northing,
    });
    if let Some(depth) = depth {
        properties["loca_fdep"] = json!(depth);
    }
    serde_json::from_value(json!({ "properties": properties })).expect("valid raw feature")
}

fn control(features: Vec<RawBorehole>) -> BoreholeControlPlane<StubFetcher> {
    BoreholeControlPlane::new(StubFetcher::with_features(features))
}

/// Center used throughout: the WGS84 position of grid (325000, 673000).
fn reference_center() -> LatLon {
    bgs_geo::to_wgs84(325_000.0, 673_000.0).expect("in-grid reference point")
}

#[tokio::test]
async fn location_search_orders_by_distance_within_radius() {
    let plane = control(vec![
        feature("B", 326_000.0, 674_000.0, Some(42.0)),
        feature("A", 325_000.0, 673_000.0, Some(15.2)),
    ]);

    let report = plane
        .location_search(reference_center(), 5.0, None)
        .await
        .expect("search succeeds");

    assert_eq!(report.count, 2);
    assert_eq!(report.records[0].id, "A");
    assert_eq!(report.records[1].id, "B");

    let near = report.records[0].distance_km.expect("distance attached");
    let far = report.records[1].distance_km.expect("distance attached");
    assert!(near < 0.01, "expected ~0, got {near}");
    assert!(far > 0.0 && far <= 5.0, "expected within radius, got {far}");
}

#[tokio::test]
async fn location_search_never_returns_records_beyond_the_radius() {
    // ~14 km between the two grid points.
    let plane = control(vec![
        feature("NEAR", 325_000.0, 673_000.0, None),
        feature("FAR", 335_000.0, 683_000.0, None),
    ]);

    let report = plane
        .location_search(reference_center(), 5.0, None)
        .await
        .expect("search succeeds");

    assert_eq!(report.count, 1);
    assert_eq!(report.records[0].id, "NEAR");
    assert!(
        report
            .records
            .iter()
            .all(|r| r.distance_km.is_some_and(|d| d <= 5.0))
    );
}

#[tokio::test]
async fn location_search_rejects_out_of_coverage_before_fetching() {
    // A failing fetcher proves validation short-circuits the upstream call.
    let plane = BoreholeControlPlane::new(StubFetcher::failing());
    let paris = LatLon::new(48.8566, 2.3522);

    let err = plane
        .location_search(paris, 5.0, None)
        .await
        .expect_err("out of coverage");
    assert!(matches!(err, ControlError::OutOfCoverage(_)), "got {err}");
}

#[tokio::test]
async fn location_search_rejects_bad_radius() {
    let plane = BoreholeControlPlane::new(StubFetcher::failing());
    let err = plane
        .location_search(reference_center(), -1.0, None)
        .await
        .expect_err("bad radius");
    assert!(matches!(err, ControlError::InvalidQuery(_)), "got {err}");
}

#[tokio::test]
async fn location_search_applies_the_result_limit() {
    let features = (0..10)
        .map(|i| feature(&format!("BH{i}"), 325_000.0 + f64::from(i) * 100.0, 673_000.0, None))
        .collect();
    let plane = BoreholeControlPlane::with_limits(
        StubFetcher::with_features(features),
        QueryLimits::default().with_default_limit(3),
    );

    let report = plane
        .location_search(reference_center(), 5.0, None)
        .await
        .expect("search succeeds");
    assert_eq!(report.count, 3);
    assert_eq!(report.search.limit, 3);
}

#[tokio::test]
async fn invalid_grid_references_are_counted_not_returned() {
    let plane = control(vec![
        feature("OK", 325_000.0, 673_000.0, None),
        feature("WILD", -999_999.0, 0.0, None),
    ]);

    let report = plane
        .location_search(reference_center(), 5.0, None)
        .await
        .expect("search succeeds");

    assert_eq!(report.count, 1);
    assert_eq!(report.records[0].id, "OK");
    assert_eq!(report.skipped.invalid_coordinates, 1);
    assert_eq!(report.total_fetched, 2);
}

#[tokio::test]
async fn area_search_keeps_only_contained_records() {
    let inside = bgs_geo::to_wgs84(325_000.0, 673_000.0).expect("in-grid");
    let bbox = BoundingBox::new(
        inside.latitude - 0.01,
        inside.longitude - 0.01,
        inside.latitude + 0.01,
        inside.longitude + 0.01,
    );
    // The second point is ~14 km away, outside the 0.01 degree box.
    let plane = control(vec![
        feature("IN", 325_000.0, 673_000.0, None),
        feature("OUT", 335_000.0, 683_000.0, None),
    ]);

    let report = plane.area_search(bbox, None).await.expect("search succeeds");
    assert_eq!(report.count, 1);
    assert_eq!(report.records[0].id, "IN");
    assert!(report.records.iter().all(|r| bbox.contains(r.wgs84)));
    assert!(report.records[0].distance_km.is_none());
}

#[tokio::test]
async fn area_search_rejects_malformed_and_non_overlapping_boxes() {
    let plane = BoreholeControlPlane::new(StubFetcher::failing());

    let inverted = BoundingBox::new(52.0, -1.0, 51.0, 1.0);
    let err = plane.area_search(inverted, None).await.expect_err("inverted box");
    assert!(matches!(err, ControlError::InvalidQuery(_)), "got {err}");

    let atlantic = BoundingBox::new(30.0, -40.0, 35.0, -30.0);
    let err = plane.area_search(atlantic, None).await.expect_err("no overlap");
    assert!(matches!(err, ControlError::OutOfCoverage(_)), "got {err}");
}

#[tokio::test]
async fn deep_borehole_search_filters_and_sorts_descending() {
    let plane = control(vec![
        feature("SHALLOW", 325_000.0, 673_000.0, Some(4.0)),
        feature("MID", 325_100.0, 673_000.0, Some(18.5)),
        feature("NO_DEPTH", 325_200.0, 673_000.0, None),
        feature("DEEP", 325_300.0, 673_000.0, Some(60.0)),
    ]);
    let region = SearchRegion::Point {
        center: reference_center(),
        radius_km: 5.0,
    };

    let report = plane
        .deep_borehole_search(region, 10.0, None)
        .await
        .expect("search succeeds");

    assert_eq!(report.count, 2);
    assert_eq!(report.records[0].id, "DEEP");
    assert_eq!(report.records[1].id, "MID");
    assert!(
        report
            .records
            .iter()
            .all(|r| r.final_depth_m.is_some_and(|d| d >= 10.0))
    );
    assert_eq!(report.total_searched, 4);
    assert_eq!(report.criteria.min_depth_m, 10.0);
}

#[tokio::test]
async fn deep_borehole_search_rejects_negative_threshold() {
    let plane = BoreholeControlPlane::new(StubFetcher::failing());
    let region = SearchRegion::Point {
        center: reference_center(),
        radius_km: 5.0,
    };
    let err = plane
        .deep_borehole_search(region, -2.0, None)
        .await
        .expect_err("bad threshold");
    assert!(matches!(err, ControlError::InvalidQuery(_)), "got {err}");
}

#[tokio::test]
async fn region_summary_reduces_depths_and_flags_empty_sets() {
    let region = SearchRegion::Point {
        center: reference_center(),
        radius_km: 5.0,
    };

    let plane = control(vec![
        feature("A", 325_000.0, 673_000.0, Some(15.2)),
        feature("B", 326_000.0, 674_000.0, Some(42.0)),
    ]);
    let report = plane.region_summary(region).await.expect("summary succeeds");
    assert!(!report.summary.empty);
    assert_eq!(report.summary.depth.count, 2);
    assert_eq!(report.summary.depth.min_m, 15.2);
    assert_eq!(report.summary.depth.max_m, 42.0);

    let depthless = control(vec![feature("A", 325_000.0, 673_000.0, None)]);
    let report = depthless.region_summary(region).await.expect("summary succeeds");
    assert!(report.summary.empty);
    assert_eq!(report.summary.total, 1);
    assert_eq!(report.summary.excluded, 1);
    assert_eq!(report.summary.depth.count, 0);
}

#[tokio::test]
async fn fetch_failures_are_distinct_from_empty_results() {
    let empty = control(Vec::new());
    let report = empty
        .location_search(reference_center(), 5.0, None)
        .await
        .expect("empty result is not an error");
    assert_eq!(report.count, 0);

    let failing = BoreholeControlPlane::new(StubFetcher::failing());
    let err = failing
        .location_search(reference_center(), 5.0, None)
        .await
        .expect_err("fetch failure surfaces");
    assert!(matches!(err, ControlError::Fetch(FetchError::Network(_))), "got {err}");
}

#[tokio::test]
async fn status_failures_surface_as_fetch_errors() {
    let plane = BoreholeControlPlane::new(StubFetcher::failing());
    let err = plane.service_status().await.expect_err("probe fails");
    assert!(matches!(err, ControlError::Fetch(_)), "got {err}");
}

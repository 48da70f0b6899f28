use bgs_core::fetch::BoreholeFetcher;
use bgs_core::model::SearchRegion;
use bgs_geo::{BoundingBox, LatLon};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{BgsMcp, helpers};

const DEFAULT_LOCATION_BUFFER_KM: f64 = 1.0;
const DEFAULT_DEEP_BUFFER_KM: f64 = 5.0;
const DEFAULT_MIN_DEPTH_M: f64 = 10.0;

/// Parameters for a point-plus-radius borehole search.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetBoreholesAtLocationParams {
    pub latitude: f64,
    pub longitude: f64,
    pub buffer_km: Option<f64>,
    pub limit: Option<usize>,
}

/// Parameters for a bounding-box borehole search.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchBoreholesInAreaParams {
    pub min_latitude: f64,
    pub min_longitude: f64,
    pub max_latitude: f64,
    pub max_longitude: f64,
    pub limit: Option<usize>,
}

/// Parameters for the minimum-depth borehole search.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FindDeepBoreholesParams {
    pub latitude: f64,
    pub longitude: f64,
    pub buffer_km: Option<f64>,
    pub min_depth_m: Option<f64>,
    pub limit: Option<usize>,
}

#[tool_router(router = tool_router_search, vis = "pub")]
impl<F: BoreholeFetcher> BgsMcp<F> {
    #[tool(
        description = "Find boreholes within a radius of a WGS84 point. Records are returned nearest first with distance_km attached. buffer_km defaults to 1.0."
    )]
    async fn get_boreholes_at_location(
        &self,
        Parameters(params): Parameters<GetBoreholesAtLocationParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let center = LatLon::new(params.latitude, params.longitude);
        let radius_km = params.buffer_km.unwrap_or(DEFAULT_LOCATION_BUFFER_KM);
        let report = self
            .control()
            .location_search(center, radius_km, params.limit)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(report)?]))
    }

    #[tool(
        description = "Search boreholes inside a latitude/longitude bounding box (southern/western minimums, northern/eastern maximums, decimal degrees WGS84)."
    )]
    async fn search_boreholes_in_area(
        &self,
        Parameters(params): Parameters<SearchBoreholesInAreaParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let bbox = BoundingBox::new(
            params.min_latitude,
            params.min_longitude,
            params.max_latitude,
            params.max_longitude,
        );
        let report = self
            .control()
            .area_search(bbox, params.limit)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(report)?]))
    }

    #[tool(
        description = "Find boreholes drilled to at least min_depth_m near a location, deepest first. Useful for bedrock analysis: deeper holes are more likely to reach bedrock. buffer_km defaults to 5.0, min_depth_m to 10.0."
    )]
    async fn find_deep_boreholes(
        &self,
        Parameters(params): Parameters<FindDeepBoreholesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let region = SearchRegion::Point {
            center: LatLon::new(params.latitude, params.longitude),
            radius_km: params.buffer_km.unwrap_or(DEFAULT_DEEP_BUFFER_KM),
        };
        let min_depth_m = params.min_depth_m.unwrap_or(DEFAULT_MIN_DEPTH_M);
        let report = self
            .control()
            .deep_borehole_search(region, min_depth_m, params.limit)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(report)?]))
    }
}

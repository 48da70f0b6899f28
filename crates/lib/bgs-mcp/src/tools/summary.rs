use bgs_core::fetch::BoreholeFetcher;
use bgs_core::model::SearchRegion;
use bgs_geo::{BoundingBox, LatLon};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ErrorCode},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{BgsMcp, helpers};

const DEFAULT_SUMMARY_BUFFER_KM: f64 = 1.0;

/// Parameters for a region summary. Exactly one region form must be given:
/// a point (`latitude`/`longitude`, optional `buffer_km`) or a bounding box
/// (all four `min_`/`max_` corners).
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetBoreholeSummaryParams {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub buffer_km: Option<f64>,
    pub min_latitude: Option<f64>,
    pub min_longitude: Option<f64>,
    pub max_latitude: Option<f64>,
    pub max_longitude: Option<f64>,
}

impl GetBoreholeSummaryParams {
    fn region(&self) -> Result<SearchRegion, ErrorData> {
        let point = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(SearchRegion::Point {
                center: LatLon::new(latitude, longitude),
                radius_km: self.buffer_km.unwrap_or(DEFAULT_SUMMARY_BUFFER_KM),
            }),
            (None, None) => None,
            _ => {
                return Err(helpers::mcp_err(
                    ErrorCode::INVALID_PARAMS,
                    "both latitude and longitude are required for a point summary",
                ));
            }
        };

        let area = match (
            self.min_latitude,
            self.min_longitude,
            self.max_latitude,
            self.max_longitude,
        ) {
            (Some(min_lat), Some(min_lon), Some(max_lat), Some(max_lon)) => Some(
                SearchRegion::Area(BoundingBox::new(min_lat, min_lon, max_lat, max_lon)),
            ),
            (None, None, None, None) => None,
            _ => {
                return Err(helpers::mcp_err(
                    ErrorCode::INVALID_PARAMS,
                    "all four bounding box corners are required for an area summary",
                ));
            }
        };

        match (point, area) {
            (Some(region), None) | (None, Some(region)) => Ok(region),
            (Some(_), Some(_)) => Err(helpers::mcp_err(
                ErrorCode::INVALID_PARAMS,
                "supply either a point or a bounding box, not both",
            )),
            (None, None) => Err(helpers::mcp_err(
                ErrorCode::INVALID_PARAMS,
                "supply a point (latitude/longitude) or a bounding box",
            )),
        }
    }
}

#[tool_router(router = tool_router_summary, vis = "pub")]
impl<F: BoreholeFetcher> BgsMcp<F> {
    #[tool(
        description = "Summarize boreholes in a region: depth statistics (min/max/mean/total drilled), a fixed-width depth histogram, project names, and log availability. Give either latitude/longitude (+optional buffer_km) or a min/max bounding box."
    )]
    async fn get_borehole_summary(
        &self,
        Parameters(params): Parameters<GetBoreholeSummaryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let region = params.region()?;
        let report = self
            .control()
            .region_summary(region)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(report)?]))
    }
}

use bgs_core::fetch::BoreholeFetcher;
use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::BgsMcp;

/// Payload listing the MCP commands exposed by this server.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "check_bgs_service_status - Probe the upstream BGS OGC API collection."
                    .to_string(),
                "get_boreholes_at_location - Boreholes within a radius of a WGS84 point, nearest first."
                    .to_string(),
                "search_boreholes_in_area - Boreholes inside a latitude/longitude bounding box."
                    .to_string(),
                "find_deep_boreholes - Boreholes drilled to at least a minimum depth, deepest first."
                    .to_string(),
                "get_borehole_summary - Depth statistics and histogram for a region."
                    .to_string(),
                "health - Returns 'ok'."
                    .to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl<F: BoreholeFetcher> BgsMcp<F> {
    #[tool(description = "List the MCP commands this server exposes.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }
}

//! MCP server implementation for bgs-mcp.
//!
//! This crate wires the borehole control plane into rmcp tool handlers and
//! exposes the stdio and streamable HTTP server surfaces.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use bgs_core::control::BoreholeControlPlane;
use bgs_core::fetch::BoreholeFetcher;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

const SERVER_INSTRUCTIONS: &str = r"bgs-mcp provides MCP tools for querying the British Geological Survey AGS borehole index.

Workflow:
1. Call `check_bgs_service_status` to confirm the upstream OGC API is reachable.
2. Query boreholes:
   - `get_boreholes_at_location` for a WGS84 point plus radius; records carry `distance_km`, nearest first.
   - `search_boreholes_in_area` for a latitude/longitude bounding box.
   - `find_deep_boreholes` for holes drilled to at least a minimum depth, deepest first.
3. `get_borehole_summary` reduces a region (point+buffer or bounding box) to depth statistics,
   a fixed-width depth histogram, and project names.

Notes:
- Coverage is the UK envelope (49-61N, -8-2E); queries outside it are rejected without an upstream call.
- Record coordinates are WGS84, derived from the British National Grid references supplied upstream.
- `final_depth_m` is total drilled depth, not depth to bedrock; follow `log_url` for stratigraphy.
- Responses carry `skipped` counters for upstream records dropped during normalization.
- `health` returns `ok`.";

/// MCP server wrapper around the borehole control plane and tool routers.
pub struct BgsMcp<F: BoreholeFetcher> {
    tool_router: ToolRouter<Self>,
    control: Arc<BoreholeControlPlane<F>>,
}

impl<F: BoreholeFetcher> Clone for BgsMcp<F> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            control: self.control.clone(),
        }
    }
}

impl<F: BoreholeFetcher> BgsMcp<F> {
    /// Creates a new server owning its control plane.
    #[must_use]
    pub fn new(control: BoreholeControlPlane<F>) -> Self {
        Self::with_control(Arc::new(control))
    }

    /// Creates a new server using a shared control-plane handle.
    #[must_use]
    pub fn with_control(control: Arc<BoreholeControlPlane<F>>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_status()
            + Self::tool_router_search()
            + Self::tool_router_summary()
            + Self::tool_router_context();
        Self {
            tool_router,
            control,
        }
    }

    pub(crate) fn control(&self) -> &BoreholeControlPlane<F> {
        &self.control
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl<F: BoreholeFetcher> BgsMcp<F> {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl<F: BoreholeFetcher> ServerHandler for BgsMcp<F> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

use bgs_core::control::ControlError;
use bgs_core::fetch::BoreholeFetcher;
use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    tool,
    tool_router,
};
use serde::Serialize;

use crate::{BgsMcp, helpers};

/// Returned instead of an MCP error when the probe itself fails: an
/// unreachable upstream is an answer, not a tool failure.
#[derive(Debug, Serialize)]
struct StatusFailure {
    healthy: bool,
    error: String,
}

#[tool_router(router = tool_router_status, vis = "pub")]
impl<F: BoreholeFetcher> BgsMcp<F> {
    #[tool(
        description = "Check whether the BGS OGC API collection is reachable. Reports collection title, description, latency, and check time."
    )]
    async fn check_bgs_service_status(&self) -> Result<CallToolResult, ErrorData> {
        match self.control().service_status().await {
            Ok(status) => Ok(CallToolResult::success(vec![Content::json(status)?])),
            Err(ControlError::Fetch(err)) => {
                Ok(CallToolResult::success(vec![Content::json(StatusFailure {
                    healthy: false,
                    error: err.to_string(),
                })?]))
            }
            Err(other) => Err(helpers::map_err(other)),
        }
    }
}

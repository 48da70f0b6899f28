use std::borrow::Cow;

use bgs_core::control::ControlError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub(crate) fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub(crate) fn map_err(err: ControlError) -> ErrorData {
    match err {
        ControlError::OutOfCoverage(_) | ControlError::InvalidQuery(_) => {
            mcp_err(ErrorCode::INVALID_PARAMS, err.to_string())
        }
        ControlError::Fetch(_) => mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string()),
    }
}

//! Error types for the docmirror MCP server with MCP error code mapping

use rmcp::model::{ErrorCode, ErrorData};
use thiserror::Error;

/// Errors that can occur in the MCP server
#[derive(Debug, Error)]
pub enum McpError {
    /// Core library operation failed
    #[error("core error: {0}")]
    Core(#[from] docmirror_core::Error),

    /// JSON serialization/deserialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Protocol error
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParams(String),

    /// Tool name not served here
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl McpError {
    /// Map error to MCP error code
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::Core(_) | Self::Internal(_) => -32603, // Internal error
            Self::Json(_) => -32700,                     // Parse error
            Self::Protocol(_) => -32600,                 // Invalid request
            Self::InvalidParams(_) | Self::UnknownTool(_) => -32602, // Invalid params
        }
    }
}

impl From<anyhow::Error> for McpError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<McpError> for ErrorData {
    fn from(err: McpError) -> Self {
        Self::new(ErrorCode(err.error_code()), err.to_string(), None)
    }
}

/// Result type alias for MCP operations
pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(McpError::InvalidParams("query".into()).error_code(), -32602);
        assert_eq!(McpError::UnknownTool("x".into()).error_code(), -32602);
        assert_eq!(McpError::Protocol("closed".into()).error_code(), -32600);
        assert_eq!(McpError::Internal("join".into()).error_code(), -32603);
        assert_eq!(
            McpError::Core(docmirror_core::Error::Storage("disk".into())).error_code(),
            -32603
        );
    }

    #[test]
    fn test_conversion_to_error_data() {
        let data: ErrorData = McpError::InvalidParams("missing field `query`".into()).into();
        assert_eq!(data.code, ErrorCode(-32602));
        assert_eq!(data.message, "invalid parameter: missing field `query`");
    }
}

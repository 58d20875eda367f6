//! MCP server implementation for docmirror

use std::sync::Arc;

use docmirror_core::{Config, DocumentStore, SearchEngine};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation, JsonObject,
    ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};

use crate::error::{McpError, McpResult};
use crate::tools::{self, QueryDocsParams};

/// MCP server for docmirror
#[derive(Clone)]
pub struct McpServer {
    engine: SearchEngine,
    limit: usize,
    query_docs_schema: Arc<JsonObject>,
}

impl McpServer {
    /// Create a server searching the configured documentation directory
    pub fn new(config: &Config) -> McpResult<Self> {
        let store = DocumentStore::new(&config.paths.docs_dir);
        Self::with_engine(
            SearchEngine::new(Arc::new(store)),
            config.search.default_limit,
        )
    }

    /// Create a server over an existing engine
    pub fn with_engine(engine: SearchEngine, limit: usize) -> McpResult<Self> {
        Ok(Self {
            engine,
            limit,
            query_docs_schema: Arc::new(tools::input_schema()?),
        })
    }

    /// Load the documents now instead of on the first query
    pub async fn preload(&self) -> McpResult<usize> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.store().load().len())
            .await
            .map_err(|e| McpError::Internal(format!("document load failed: {e}")))
    }

    /// Tools published by this server
    pub fn tools(&self) -> Vec<Tool> {
        vec![Tool::new(
            tools::QUERY_DOCS_NAME,
            tools::QUERY_DOCS_DESCRIPTION,
            Arc::clone(&self.query_docs_schema),
        )]
    }

    /// Run a tool by name
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> McpResult<String> {
        match name {
            tools::QUERY_DOCS_NAME => {
                let params: QueryDocsParams =
                    serde_json::from_value(serde_json::Value::Object(arguments.unwrap_or_default()))
                        .map_err(|e| McpError::InvalidParams(e.to_string()))?;
                tools::handle_query_docs(&self.engine, params, self.limit).await
            },
            other => Err(McpError::UnknownTool(other.to_string())),
        }
    }

    /// Serve the MCP protocol over stdio
    pub async fn serve_stdio(&self) -> McpResult<()> {
        tracing::info!("docmirror MCP server starting");

        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();

        let service = rmcp::serve_server(self.clone(), (stdin, stdout))
            .await
            .map_err(|e| {
                tracing::error!("server initialization error: {}", e);
                McpError::Protocol(e.to_string())
            })?;

        service.waiting().await.map_err(|e| {
            tracing::error!("server runtime error: {}", e);
            McpError::Protocol(e.to_string())
        })?;

        tracing::info!("docmirror MCP server stopped");
        Ok(())
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "docmirror-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Use query_docs to search the locally mirrored documentation.".to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.dispatch(&request.name, request.arguments).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => {
                tracing::warn!(tool = %request.name, error = %e, "tool call failed");
                Err(e.into())
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use docmirror_core::search::NO_RESULTS;
    use tempfile::TempDir;

    fn server_over(dir: &TempDir) -> McpServer {
        let engine = SearchEngine::new(Arc::new(DocumentStore::new(dir.path())));
        McpServer::with_engine(engine, 5).unwrap()
    }

    fn args(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    #[test]
    fn test_server_info_response() {
        let dir = TempDir::new().unwrap();
        let info = server_over(&dir).get_info();

        assert_eq!(info.server_info.name, "docmirror-mcp");
        assert!(!info.server_info.version.is_empty());
        assert_eq!(info.protocol_version, ProtocolVersion::default());
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_publishes_query_docs() {
        let dir = TempDir::new().unwrap();
        let tools = server_over(&dir).tools();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "query_docs");
        assert_eq!(
            tools[0].description.as_deref(),
            Some(tools::QUERY_DOCS_DESCRIPTION)
        );
        assert!(tools[0].input_schema.contains_key("properties"));
    }

    #[tokio::test]
    async fn test_dispatch_searches_directory() {
        // Given a directory with one mirrored page
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("oss_python_langchain_rag.md"),
            "---\nurl: https://docs.example.com/oss/python/langchain/rag\ntitle: RAG\n---\n\nRetrieval augmented generation.",
        )
        .unwrap();
        let server = server_over(&dir);
        assert_eq!(server.preload().await.unwrap(), 1);

        // When the tool is called
        let text = server
            .dispatch("query_docs", args(serde_json::json!({ "query": "retrieval" })))
            .await
            .unwrap();

        // Then the formatted block is returned
        assert!(text.starts_with("## RAG (Score: 11)\nSource: oss_python_langchain_rag.md"));
    }

    #[tokio::test]
    async fn test_dispatch_empty_corpus() {
        let dir = TempDir::new().unwrap();
        let text = server_over(&dir)
            .dispatch("query_docs", args(serde_json::json!({ "query": "agents" })))
            .await
            .unwrap();
        assert_eq!(text, NO_RESULTS);
    }

    #[tokio::test]
    async fn test_dispatch_rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        let server = server_over(&dir);

        let missing = server.dispatch("query_docs", None).await.unwrap_err();
        assert!(matches!(missing, McpError::InvalidParams(_)));

        let wrong_type = server
            .dispatch("query_docs", args(serde_json::json!({ "query": 7 })))
            .await
            .unwrap_err();
        assert!(matches!(wrong_type, McpError::InvalidParams(_)));

        let unknown = server.dispatch("find", None).await.unwrap_err();
        assert!(matches!(unknown, McpError::UnknownTool(_)));
    }
}

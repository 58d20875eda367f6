//! MCP tools for docmirror

pub mod query_docs;

pub use query_docs::{
    QUERY_DOCS_DESCRIPTION, QUERY_DOCS_NAME, QueryDocsParams, handle_query_docs, input_schema,
};

pub mod graph;
pub mod queries;

use async_trait::async_trait;
use serde_json::Value;

pub use graph::SubgraphClient;
pub use queries::{Decoded, QueryKind};

/// Transport seam over the GraphQL endpoint. Returns the response's `data` object.
#[async_trait]
pub trait SubgraphSource: Send + Sync {
    fn name(&self) -> &str;
    async fn execute(&self, query: &str, variables: &Value) -> Result<Value, QueryError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("GraphQL error: {0}")]
    GraphQl(String),
    #[error("Missing field `{0}` in response")]
    MissingField(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

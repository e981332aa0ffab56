use crate::error::GatewayError;
use crate::request::AnalysisRequest;
use async_trait::async_trait;
use serde_json::Value;

/// Request/response boundary to an external analyzer.
///
/// One call handles one request from start to finish. Implementations must
/// not retry on their own.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, GatewayError>;

    /// Name for logs.
    fn name(&self) -> &str;
}

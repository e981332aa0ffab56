use crate::analyzer::Analyzer;
use crate::error::GatewayError;
use crate::request::{AnalysisKind, AnalysisRequest};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Routes validated requests to the analyzer configured for their kind.
#[derive(Clone)]
pub struct Gateway {
    fact_check: Arc<dyn Analyzer>,
    search: Arc<dyn Analyzer>,
    page_analysis: Arc<dyn Analyzer>,
}

impl Gateway {
    pub fn new(
        fact_check: Arc<dyn Analyzer>,
        search: Arc<dyn Analyzer>,
        page_analysis: Arc<dyn Analyzer>,
    ) -> Self {
        Self {
            fact_check,
            search,
            page_analysis,
        }
    }

    pub fn analyzer(&self, kind: AnalysisKind) -> &Arc<dyn Analyzer> {
        match kind {
            AnalysisKind::FactCheck => &self.fact_check,
            AnalysisKind::Search => &self.search,
            AnalysisKind::PageAnalysis => &self.page_analysis,
        }
    }

    pub async fn dispatch(&self, request: &AnalysisRequest) -> Result<Value, GatewayError> {
        let analyzer = self.analyzer(request.kind);
        let t0 = Instant::now();
        let outcome = analyzer.analyze(request).await;
        let elapsed_ms = t0.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => tracing::info!(
                request_id = %request.id,
                kind = %request.kind,
                analyzer = analyzer.name(),
                elapsed_ms,
                "gateway.request.ok"
            ),
            Err(e) => tracing::warn!(
                request_id = %request.id,
                kind = %request.kind,
                analyzer = analyzer.name(),
                elapsed_ms,
                class = ?e.class(),
                error = %e,
                "gateway.request.failed"
            ),
        }
        outcome
    }

    /// Validate and run a fact check. Invalid input never reaches an analyzer.
    pub async fn fact_check(&self, text: &str) -> Result<Value, GatewayError> {
        let request = AnalysisRequest::fact_check(text)?;
        self.dispatch(&request).await
    }

    pub async fn search(&self, query: &str) -> Result<Value, GatewayError> {
        let request = AnalysisRequest::search(query)?;
        self.dispatch(&request).await
    }

    pub async fn analyze_page(&self, url: &str) -> Result<Value, GatewayError> {
        let request = AnalysisRequest::page_analysis(url)?;
        self.dispatch(&request).await
    }
}

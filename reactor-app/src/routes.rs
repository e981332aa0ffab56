//! HTTP route groups. Analysis routes take form-encoded input, the
//! reputation and crisis routes take JSON.

use crate::state::SharedState;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use reactor_claims::ClaimSpan;
use reactor_gateway::{ErrorClass, GatewayError};
use reactor_reputation::{
    AlertLevel, CrisisMetrics, DashboardSummary, DashboardTier, SortKey, SourceFilter,
    SourceWithReputation, TrendingClaim, alert_level, crisis_metrics,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Error body shared by every route: `{error, details?, raw_output?}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_output: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: message.into(),
                details: None,
                raw_output: None,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = match err.class() {
            ErrorClass::Validation => StatusCode::BAD_REQUEST,
            ErrorClass::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorClass::Process | ErrorClass::Parse => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            body: ErrorBody {
                error: err.to_string(),
                details: err.details(),
                raw_output: err.raw_output().map(str::to_owned),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// Missing form fields are treated like empty ones so the gateway reports them.
#[derive(Debug, Deserialize)]
struct FactCheckForm {
    #[serde(rename = "inputText", default)]
    input_text: String,
}

#[derive(Debug, Deserialize)]
struct SearchForm {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeForm {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct ClaimsForm {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelQuery {
    score: Option<f64>,
}

#[derive(Debug, Serialize)]
struct LabelResponse {
    score: f64,
    label: &'static str,
    tier: DashboardTier,
}

#[derive(Debug, Deserialize)]
struct SummaryRequest {
    sources: Vec<SourceWithReputation>,
    #[serde(default)]
    filter: SourceFilter,
    #[serde(default)]
    sort: SortKey,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    #[serde(flatten)]
    summary: DashboardSummary,
    view: Vec<SourceRow>,
}

#[derive(Debug, Serialize)]
struct SourceRow {
    id: String,
    title: String,
    overall: f64,
    label: &'static str,
    tier: DashboardTier,
}

#[derive(Debug, Deserialize)]
struct AlertRequest {
    claims: Vec<TrendingClaim>,
}

#[derive(Debug, Serialize)]
struct AlertResponse {
    alert_level: AlertLevel,
    #[serde(flatten)]
    metrics: CrisisMetrics,
}

pub fn analysis_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/fact-check", post(fact_check))
        .route("/api/search", post(search))
        .route("/api/analyze", post(analyze))
}

pub fn claims_routes() -> Router<SharedState> {
    Router::new().route("/api/claims", post(detect_claims))
}

pub fn reputation_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/reputation/label", get(trust_label))
        .route("/api/reputation/summary", post(reputation_summary))
        .route("/api/crisis/alert", post(crisis_alert))
}

pub fn health_routes() -> Router<SharedState> {
    Router::new().route("/health", get(health))
}

async fn fact_check(
    State(state): State<SharedState>,
    Form(form): Form<FactCheckForm>,
) -> ApiResult<Value> {
    let result = state.gateway.fact_check(&form.input_text).await?;
    Ok(Json(json!({
        "success": true,
        "result": result,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

async fn search(
    State(state): State<SharedState>,
    Form(form): Form<SearchForm>,
) -> ApiResult<Value> {
    let results = state.gateway.search(&form.query).await?;
    Ok(Json(json!({
        "success": true,
        "results": results,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// Returns the analyzer's JSON untouched.
async fn analyze(
    State(state): State<SharedState>,
    Form(form): Form<AnalyzeForm>,
) -> ApiResult<Value> {
    Ok(Json(state.gateway.analyze_page(&form.url).await?))
}

async fn detect_claims(
    State(state): State<SharedState>,
    Form(form): Form<ClaimsForm>,
) -> ApiResult<Value> {
    let text = form
        .text
        .ok_or_else(|| ApiError::bad_request("No text provided"))?;
    let claims: Vec<ClaimSpan> = state.detector.detect(&text);
    tracing::debug!(count = claims.len(), chars = text.len(), "api.claims.detected");
    Ok(Json(json!({ "claims": claims })))
}

async fn trust_label(
    State(state): State<SharedState>,
    Query(query): Query<LabelQuery>,
) -> ApiResult<LabelResponse> {
    let score = query
        .score
        .ok_or_else(|| ApiError::bad_request("score is required"))?;
    reactor_common::ensure_unit_interval("score", score)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Json(LabelResponse {
        score,
        label: state.trust.label(score).as_str(),
        tier: state.split.tier(score),
    }))
}

async fn reputation_summary(
    State(state): State<SharedState>,
    Json(request): Json<SummaryRequest>,
) -> ApiResult<SummaryResponse> {
    for source in &request.sources {
        source
            .reputation
            .validate()
            .map_err(|e| ApiError::bad_request(format!("source {}: {e}", source.id)))?;
    }
    let summary = SourceWithReputation::summarize(&request.sources, &state.split);
    let view = SourceWithReputation::dashboard(
        &request.sources,
        request.filter,
        request.sort,
        &state.split,
    )
    .into_iter()
    .map(|s| SourceRow {
        id: s.id.clone(),
        title: s.title.clone(),
        overall: s.reputation.overall,
        label: state.trust.label(s.reputation.overall).as_str(),
        tier: s.tier(&state.split),
    })
    .collect();
    Ok(Json(SummaryResponse { summary, view }))
}

async fn crisis_alert(Json(request): Json<AlertRequest>) -> ApiResult<AlertResponse> {
    let level = alert_level(&request.claims);
    if level >= AlertLevel::High {
        tracing::warn!(
            alert_level = ?level,
            claims = request.claims.len(),
            "api.crisis.escalated"
        );
    }
    Ok(Json(AlertResponse {
        alert_level: level,
        metrics: crisis_metrics(&request.claims),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

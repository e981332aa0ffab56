//! Networked analyzer.
//!
//! Posts the [`AnalysisRequest`] as JSON to a configured endpoint and returns
//! the JSON body. No retries: a failed call is reported once, like a failed
//! process.
//!
//! Security: bearer tokens are sanitized before use and never logged; logs
//! only record whether auth was attached.
//!
//! Set `REACTOR_HTTP_RAW=1` to log (truncated) raw response bodies on target
//! `http.raw`.

use crate::analyzer::Analyzer;
use crate::error::GatewayError;
use crate::request::AnalysisRequest;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::time::Duration;
use url::Url;

const RAW_ENV: &str = "REACTOR_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

#[derive(Clone)]
pub struct HttpAnalyzer {
    name: String,
    endpoint: Url,
    inner: Client,
    bearer: Option<String>,
    pub timeout: Option<Duration>,
}

impl HttpAnalyzer {
    /// Build an analyzer that posts to `endpoint`.
    ///
    /// ```no_run
    /// use reactor_gateway::{GatewayError, HttpAnalyzer};
    /// use std::time::Duration;
    ///
    /// let analyzer = HttpAnalyzer::new("search", "https://analyzers.internal/search")?
    ///     .with_timeout(Duration::from_secs(20));
    /// assert_eq!(analyzer.timeout, Some(Duration::from_secs(20)));
    /// # Ok::<(), GatewayError>(())
    /// ```
    pub fn new(name: impl Into<String>, endpoint: &str) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| GatewayError::Validation(format!("invalid analyzer endpoint: {e}")))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Ok(Self {
            name: name.into(),
            endpoint,
            inner,
            bearer: None,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a bearer token; rejected up front if it cannot form a header.
    pub fn with_bearer(mut self, token: &str) -> Result<Self, GatewayError> {
        self.bearer = Some(sanitize_token(token)?);
        Ok(self)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, GatewayError> {
        let mut rb = self.inner.post(self.endpoint.clone()).json(request);
        if let Some(limit) = self.timeout {
            rb = rb.timeout(limit);
        }
        if let Some(token) = &self.bearer {
            rb = rb.bearer_auth(token);
        }

        tracing::debug!(
            analyzer = %self.name,
            request_id = %request.id,
            kind = %request.kind,
            host_path = %format!("{}{}", self.endpoint.host_str().unwrap_or("-"), self.endpoint.path()),
            timeout_ms = ?self.timeout.map(|t| t.as_millis() as u64),
            auth_kind = if self.bearer.is_some() { "bearer" } else { "none" },
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|e| self.network_error(request, e))?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|e| self.network_error(request, e))?;
        let duration_ms = t0.elapsed().as_millis() as u64;

        let upstream_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::debug!(
            analyzer = %self.name,
            request_id = %request.id,
            %status,
            duration_ms,
            body_len = bytes.len(),
            x_request_id = %upstream_id,
            "http.response.headers"
        );

        if raw_enabled() {
            let end = bytes.len().min(RAW_MAX_BODY);
            tracing::info!(
                target: "http.raw",
                request_id = %request.id,
                %status,
                headers = ?redact_headers(&headers),
                body = %String::from_utf8_lossy(&bytes[..end]),
                truncated = bytes.len() > RAW_MAX_BODY,
                "http.response.raw"
            );
        }

        let snippet = snip_body(&bytes);
        if status.is_success() {
            return serde_json::from_slice::<Value>(&bytes).map_err(|e| {
                tracing::warn!(
                    analyzer = %self.name,
                    request_id = %request.id,
                    serde_err = %e,
                    body_snippet = %snippet,
                    "http.response.decode_error"
                );
                GatewayError::Parse {
                    parse_error: e.to_string(),
                    fallback_error: None,
                    raw_output: String::from_utf8_lossy(&bytes).into_owned(),
                }
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            analyzer = %self.name,
            request_id = %request.id,
            %status,
            message = %message,
            body_snippet = %snippet,
            "http.error"
        );
        if status == StatusCode::GATEWAY_TIMEOUT {
            if let Some(after) = self.timeout {
                return Err(GatewayError::Timeout { after });
            }
        }
        Err(GatewayError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl HttpAnalyzer {
    fn network_error(&self, request: &AnalysisRequest, err: reqwest::Error) -> GatewayError {
        tracing::warn!(
            analyzer = %self.name,
            request_id = %request.id,
            timeout = err.is_timeout(),
            message = %err,
            "http.network_error"
        );
        match (err.is_timeout(), self.timeout) {
            (true, Some(after)) => GatewayError::Timeout { after },
            _ => GatewayError::Http(err.to_string()),
        }
    }
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization")
                || key.eq_ignore_ascii_case("set-cookie")
            {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

/// Pull a human-readable message out of common error envelopes:
/// `{"error":{"message":..}}`, `{"error":".."}`, `{"message":..}`, `{"detail":..}`.
fn extract_error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        message: String,
    }
    #[derive(Deserialize)]
    struct Flat {
        #[serde(default)]
        error: String,
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
    }

    if let Ok(n) = serde_json::from_slice::<Nested>(body) {
        return n.error.message;
    }
    if let Ok(f) = serde_json::from_slice::<Flat>(body) {
        for candidate in [f.error, f.message, f.detail] {
            if !candidate.is_empty() {
                return candidate;
            }
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).into_owned();
    if snip.len() > SNIPPET_MAX {
        let mut end = SNIPPET_MAX;
        while !snip.is_char_boundary(end) {
            end -= 1;
        }
        snip.truncate(end);
        snip.push_str("...");
    }
    snip
}

fn sanitize_token(raw: &str) -> Result<String, GatewayError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if s.is_empty() {
        return Err(GatewayError::Validation("bearer token is empty".into()));
    }
    if !s.is_ascii() {
        return Err(GatewayError::Validation(
            "bearer token contains non-ASCII bytes".into(),
        ));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(GatewayError::Validation(
            "bearer token contains control characters".into(),
        ));
    }
    HeaderValue::from_str(&format!("Bearer {s}"))
        .map_err(|e| GatewayError::Validation(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}

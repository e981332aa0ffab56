//! Line-oriented client for a running server.
//!
//! A failed request never clears the screen: [`ResultPane`] keeps the last
//! good answer and adds a retry hint underneath it.

use anyhow::{Context, Result, anyhow};
use reactor_gateway::AnalysisResult;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    FactCheck(String),
    Search(String),
    Analyze(String),
    Retry,
    Quit,
}

impl ClientCommand {
    /// `search <q>`, `analyze <url>`, `retry` (or a blank line), `quit`;
    /// anything else is fact-checked verbatim.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() || line == "retry" {
            return Self::Retry;
        }
        if line == "quit" || line == "exit" {
            return Self::Quit;
        }
        match line.split_once(char::is_whitespace) {
            Some(("search", rest)) => Self::Search(rest.trim().to_string()),
            Some(("analyze", rest)) => Self::Analyze(rest.trim().to_string()),
            _ => Self::FactCheck(line.to_string()),
        }
    }
}

pub struct ReactorClient {
    http: Client,
    base: Url,
}

impl ReactorClient {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid server url {base:?}"))?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub async fn send(&self, command: &ClientCommand) -> Result<Value> {
        match command {
            ClientCommand::FactCheck(text) => {
                self.post_form("api/fact-check", &[("inputText", text)]).await
            }
            ClientCommand::Search(query) => self.post_form("api/search", &[("query", query)]).await,
            ClientCommand::Analyze(url) => self.post_form("api/analyze", &[("url", url)]).await,
            ClientCommand::Retry | ClientCommand::Quit => {
                Err(anyhow!("{command:?} is handled locally"))
            }
        }
    }

    async fn post_form(&self, path: &str, form: &[(&str, &String)]) -> Result<Value> {
        let url = self.base.join(path)?;
        let resp = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .context("server unreachable")?;
        let status = resp.status();
        let body: Value = resp.json().await.context("server returned non-JSON")?;
        if status.is_success() {
            return Ok(body);
        }
        let error = body["error"].as_str().unwrap_or("request failed");
        match body["details"].as_str() {
            Some(details) => Err(anyhow!("{error} ({status}): {details}")),
            None => Err(anyhow!("{error} ({status})")),
        }
    }
}

/// Last good result plus an optional failure notice.
#[derive(Debug, Default)]
pub struct ResultPane {
    last_good: Option<Value>,
    notice: Option<String>,
}

impl ResultPane {
    pub fn record(&mut self, outcome: Result<Value>) {
        match outcome {
            Ok(value) => {
                self.last_good = Some(value);
                self.notice = None;
            }
            Err(e) => {
                self.notice = Some(format!("{e:#}. Press Enter to retry."));
            }
        }
    }

    pub fn last_good(&self) -> Option<&Value> {
        self.last_good.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(value) = &self.last_good {
            for line in verdict_lines(value) {
                out.push_str(&line);
                out.push('\n');
            }
            out.push_str(&serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));
            out.push('\n');
        }
        if let Some(notice) = &self.notice {
            out.push_str("! ");
            out.push_str(notice);
            out.push('\n');
        }
        out
    }
}

/// Headline lines for a fact-check or page-analysis payload. Fact checks
/// arrive wrapped in `{success, result, timestamp}`.
fn verdict_lines(value: &Value) -> Vec<String> {
    let inner = value.get("result").unwrap_or(value);
    let Some(result) = AnalysisResult::from_value(inner) else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    if let Some(error) = result.reported_error() {
        lines.push(format!("Analyzer error: {error}"));
    }
    if let Some(correct) = result.is_correct {
        lines.push(format!("Verdict: {}", if correct { "correct" } else { "incorrect" }));
    }
    if let Some(confidence) = result.confidence_unit() {
        lines.push(format!("Confidence: {:.0}%", confidence * 100.0));
    }
    if let Some(text) = result.explanation.as_deref().or(result.conclusion.as_deref()) {
        lines.push(text.to_string());
    }
    let sources = result.source_urls();
    if !sources.is_empty() {
        lines.push(format!("Sources: {}", sources.join(", ")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_commands() {
        assert_eq!(ClientCommand::parse(""), ClientCommand::Retry);
        assert_eq!(ClientCommand::parse("quit"), ClientCommand::Quit);
        assert_eq!(
            ClientCommand::parse("search  solar flares "),
            ClientCommand::Search("solar flares".into())
        );
        assert_eq!(
            ClientCommand::parse("analyze https://example.org"),
            ClientCommand::Analyze("https://example.org".into())
        );
        assert_eq!(
            ClientCommand::parse("searching is fun"),
            ClientCommand::FactCheck("searching is fun".into())
        );
    }

    #[test]
    fn failure_keeps_previous_result() {
        let mut pane = ResultPane::default();
        pane.record(Ok(json!({"claim": "first"})));
        pane.record(Err(anyhow!("server unreachable")));

        assert_eq!(pane.last_good().unwrap()["claim"], "first");
        let notice = pane.notice().unwrap();
        assert!(notice.contains("server unreachable"));
        assert!(notice.contains("retry"));
        let rendered = pane.render();
        assert!(rendered.contains("first"));
        assert!(rendered.contains("! server unreachable"));
    }

    #[test]
    fn render_leads_with_verdict() {
        let mut pane = ResultPane::default();
        pane.record(Ok(json!({
            "success": true,
            "result": {
                "claim": "The Great Wall is visible from space",
                "is_correct": false,
                "confidence_score": 92.0,
                "explanation": "Not visible to the naked eye from orbit.",
                "sources": ["https://nasa.gov/wall", {"title": "no url"}]
            },
            "timestamp": "2024-09-15T10:00:00Z"
        })));
        let rendered = pane.render();
        let head: Vec<&str> = rendered.lines().take(4).collect();
        assert_eq!(
            head,
            [
                "Verdict: incorrect",
                "Confidence: 92%",
                "Not visible to the naked eye from orbit.",
                "Sources: https://nasa.gov/wall",
            ]
        );
    }

    #[test]
    fn search_payload_renders_without_verdict() {
        let mut pane = ResultPane::default();
        pane.record(Ok(json!({"success": true, "results": [{"title": "Aurora"}]})));
        assert!(pane.render().starts_with('{'));
    }

    #[test]
    fn success_clears_notice() {
        let mut pane = ResultPane::default();
        pane.record(Err(anyhow!("timeout")));
        assert!(pane.last_good().is_none());
        pane.record(Ok(json!({"claim": "second"})));
        assert!(pane.notice().is_none());
    }
}

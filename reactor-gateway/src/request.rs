use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix that marks free text as an inline image payload.
pub const IMAGE_DATA_PREFIX: &str = "data:image/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    FactCheck,
    Search,
    PageAnalysis,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::FactCheck => "fact_check",
            AnalysisKind::Search => "search",
            AnalysisKind::PageAnalysis => "page_analysis",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnalysisInput {
    /// Free-text claim.
    Text(String),
    /// Base64 `data:image/...` URL.
    Image(String),
    /// Absolute URL of a page to analyse.
    Url(String),
    /// Web search query.
    Query(String),
}

impl AnalysisInput {
    pub fn as_str(&self) -> &str {
        match self {
            AnalysisInput::Text(s)
            | AnalysisInput::Image(s)
            | AnalysisInput::Url(s)
            | AnalysisInput::Query(s) => s,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, AnalysisInput::Image(_))
    }
}

/// A validated request. Constructing one is the only way to reach an
/// analyzer, so invalid input never spawns anything.
///
/// ```
/// use reactor_gateway::{AnalysisInput, AnalysisRequest, GatewayError};
///
/// let req = AnalysisRequest::fact_check("data:image/png;base64,iVBORw0KGgo=").unwrap();
/// assert!(matches!(req.input, AnalysisInput::Image(_)));
///
/// assert!(matches!(AnalysisRequest::fact_check("  "), Err(GatewayError::Validation(_))));
/// assert!(matches!(AnalysisRequest::page_analysis("not-a-url"), Err(GatewayError::InvalidUrl(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub id: Uuid,
    pub kind: AnalysisKind,
    pub input: AnalysisInput,
}

impl AnalysisRequest {
    pub fn fact_check(text: &str) -> Result<Self, GatewayError> {
        let text = require(text, "No input provided")?;
        let input = if text.starts_with(IMAGE_DATA_PREFIX) {
            AnalysisInput::Image(text.to_string())
        } else {
            AnalysisInput::Text(text.to_string())
        };
        Ok(Self::with_input(AnalysisKind::FactCheck, input))
    }

    pub fn search(query: &str) -> Result<Self, GatewayError> {
        let query = require(query, "No search query provided")?;
        Ok(Self::with_input(
            AnalysisKind::Search,
            AnalysisInput::Query(query.to_string()),
        ))
    }

    pub fn page_analysis(target: &str) -> Result<Self, GatewayError> {
        let target = require(target, "URL is required")?;
        url::Url::parse(target).map_err(|e| GatewayError::InvalidUrl(format!("{target}: {e}")))?;
        Ok(Self::with_input(
            AnalysisKind::PageAnalysis,
            AnalysisInput::Url(target.to_string()),
        ))
    }

    fn with_input(kind: AnalysisKind, input: AnalysisInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            input,
        }
    }
}

fn require<'a>(raw: &'a str, message: &str) -> Result<&'a str, GatewayError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::Validation(message.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_and_kept() {
        let req = AnalysisRequest::fact_check("  Water boils at 100C at sea level. ").unwrap();
        assert_eq!(
            req.input,
            AnalysisInput::Text("Water boils at 100C at sea level.".into())
        );
        assert_eq!(req.kind, AnalysisKind::FactCheck);
    }

    #[test]
    fn each_request_gets_its_own_id() {
        let a = AnalysisRequest::search("moon landing").unwrap();
        let b = AnalysisRequest::search("moon landing").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn page_analysis_requires_absolute_url() {
        assert!(AnalysisRequest::page_analysis("https://example.org/a").is_ok());
        assert!(matches!(
            AnalysisRequest::page_analysis("/relative/path"),
            Err(GatewayError::InvalidUrl(_))
        ));
        assert!(matches!(
            AnalysisRequest::page_analysis(""),
            Err(GatewayError::Validation(_))
        ));
    }

    #[test]
    fn wire_shape_is_tagged() {
        let req = AnalysisRequest::search("vaccines").unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["kind"], "search");
        assert_eq!(json["input"]["type"], "query");
        assert_eq!(json["input"]["value"], "vaccines");
    }
}

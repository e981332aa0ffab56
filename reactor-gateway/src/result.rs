use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Typed view of an analyzer's JSON output.
///
/// Analyzers are opaque and may emit any subset of these fields; anything not
/// modelled here is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    /// 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    /// Best-effort typed view; non-object values or mistyped fields yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Confidence rescaled to `[0, 1]`, clamped.
    pub fn confidence_unit(&self) -> Option<f64> {
        self.confidence_score
            .filter(|c| !c.is_nan())
            .map(|c| (c / 100.0).clamp(0.0, 1.0))
    }

    /// Source URLs, skipping entries that are not plain strings.
    pub fn source_urls(&self) -> Vec<&str> {
        self.sources
            .iter()
            .flatten()
            .filter_map(Value::as_str)
            .collect()
    }

    /// The analyzer reported its own failure inside a successful run.
    pub fn reported_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_unknown_fields() {
        let v = json!({
            "claim": "The earth is flat",
            "is_correct": false,
            "confidence_score": 97.0,
            "sources": ["https://nasa.gov", {"title": "atlas"}],
            "credibility_grade": "A"
        });
        let r = AnalysisResult::from_value(&v).unwrap();
        assert_eq!(r.is_correct, Some(false));
        assert_eq!(r.confidence_unit(), Some(0.97));
        assert_eq!(r.source_urls(), ["https://nasa.gov"]);
        assert_eq!(r.extra["credibility_grade"], "A");
        assert_eq!(serde_json::to_value(&r).unwrap(), v);
    }

    #[test]
    fn empty_object_is_valid() {
        let r = AnalysisResult::from_value(&json!({})).unwrap();
        assert_eq!(r, AnalysisResult::default());
        assert!(AnalysisResult::from_value(&json!([1, 2])).is_none());
    }
}

//! Results-log fallback.
//!
//! Analyzers append every result to a shared log. When stdout cannot be
//! parsed, the entry tagged with this request's id is used instead. The log is
//! only ever read here.

use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Key analyzers use to tag log entries with the id they were handed.
pub const REQUEST_ID_KEY: &str = "request_id";

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("results log read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("results log decode error: {0}")]
    Decode(String),
    #[error("no results log entry for request {0}")]
    NotFound(Uuid),
}

/// Find the entry for `request_id` in the log at `path`.
///
/// The log is either one JSON array or JSON lines. If several entries carry
/// the id, the last one wins.
pub async fn lookup(path: &Path, request_id: Uuid) -> Result<Value, FallbackError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let entries = decode_entries(&raw)?;
    let wanted = request_id.to_string();
    entries
        .into_iter()
        .rev()
        .find(|entry| entry.get(REQUEST_ID_KEY).and_then(Value::as_str) == Some(wanted.as_str()))
        .ok_or(FallbackError::NotFound(request_id))
}

fn decode_entries(raw: &str) -> Result<Vec<Value>, FallbackError> {
    let trimmed = raw.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| FallbackError::Decode(e.to_string()));
    }
    trimmed
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| FallbackError::Decode(format!("line {}: {e}", n + 1)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_log(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[tokio::test]
    async fn finds_entry_by_id_not_position() {
        let ours = Uuid::new_v4();
        let theirs = Uuid::new_v4();
        let log = write_log(
            &serde_json::json!([
                {"request_id": ours.to_string(), "claim": "mine"},
                {"request_id": theirs.to_string(), "claim": "someone else"}
            ])
            .to_string(),
        );
        let entry = lookup(log.path(), ours).await.unwrap();
        assert_eq!(entry["claim"], "mine");
    }

    #[tokio::test]
    async fn reads_json_lines() {
        let id = Uuid::new_v4();
        let log = write_log(&format!(
            "{{\"claim\":\"untagged\"}}\n\n{{\"request_id\":\"{id}\",\"claim\":\"tagged\"}}\n"
        ));
        assert_eq!(lookup(log.path(), id).await.unwrap()["claim"], "tagged");
    }

    #[tokio::test]
    async fn untagged_log_is_not_found() {
        let id = Uuid::new_v4();
        let log = write_log(r#"[{"claim":"last entry"}]"#);
        assert!(matches!(
            lookup(log.path(), id).await,
            Err(FallbackError::NotFound(found)) if found == id
        ));
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = lookup(&dir.path().join("results.json"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, FallbackError::Read(_)));
    }
}

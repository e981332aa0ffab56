use std::time::Duration;
use thiserror::Error;

/// Failure of a single analysis request. Every variant is terminal; nothing
/// in the gateway retries.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Input missing or empty. No analyzer was invoked.
    #[error("{0}")]
    Validation(String),

    /// Page analysis target is not an absolute URL. No analyzer was invoked.
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("analyzer exited with code {}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("analysis timed out after {}", describe_wait(.after))]
    Timeout { after: Duration },

    #[error("Failed to parse result")]
    Parse {
        parse_error: String,
        fallback_error: Option<String>,
        raw_output: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("analyzer endpoint error: {0}")]
    Http(String),

    #[error("analyzer endpoint returned {status}: {message}")]
    Remote { status: u16, message: String },
}

fn describe_wait(after: &Duration) -> String {
    if after.as_secs() > 0 && after.subsec_millis() == 0 {
        format!("{} seconds", after.as_secs())
    } else {
        format!("{} ms", after.as_millis())
    }
}

/// Coarse failure class used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Process,
    Timeout,
    Parse,
}

impl GatewayError {
    pub fn class(&self) -> ErrorClass {
        match self {
            GatewayError::Validation(_) | GatewayError::InvalidUrl(_) => ErrorClass::Validation,
            GatewayError::Timeout { .. } => ErrorClass::Timeout,
            GatewayError::Parse { .. } => ErrorClass::Parse,
            GatewayError::Spawn { .. }
            | GatewayError::NonZeroExit { .. }
            | GatewayError::Io(_)
            | GatewayError::Http(_)
            | GatewayError::Remote { .. } => ErrorClass::Process,
        }
    }

    /// Supplementary text for the response body: stderr for exit failures,
    /// both reasons for parse failures.
    pub fn details(&self) -> Option<String> {
        match self {
            GatewayError::NonZeroExit { stderr, .. } => Some(stderr.clone()),
            GatewayError::Spawn { source, .. } => Some(source.to_string()),
            GatewayError::Parse {
                parse_error,
                fallback_error,
                ..
            } => Some(match fallback_error {
                Some(fallback) => {
                    format!("JSON parse error: {parse_error}, results log error: {fallback}")
                }
                None => format!("JSON parse error: {parse_error}"),
            }),
            _ => None,
        }
    }

    pub fn raw_output(&self) -> Option<&str> {
        match self {
            GatewayError::Parse { raw_output, .. } => Some(raw_output),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        assert_eq!(
            GatewayError::InvalidUrl("x".into()).class(),
            ErrorClass::Validation
        );
        assert_eq!(
            GatewayError::Timeout {
                after: Duration::from_secs(30)
            }
            .class(),
            ErrorClass::Timeout
        );
        let exit = GatewayError::NonZeroExit {
            code: Some(2),
            stderr: "boom".into(),
        };
        assert_eq!(exit.class(), ErrorClass::Process);
        assert_eq!(exit.to_string(), "analyzer exited with code 2");
        assert_eq!(exit.details().as_deref(), Some("boom"));
    }

    #[test]
    fn timeout_message_names_seconds() {
        let err = GatewayError::Timeout {
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "analysis timed out after 30 seconds");
        let short = GatewayError::Timeout {
            after: Duration::from_millis(500),
        };
        assert_eq!(short.to_string(), "analysis timed out after 500 ms");
        let fractional = GatewayError::Timeout {
            after: Duration::from_millis(1500),
        };
        assert_eq!(fractional.to_string(), "analysis timed out after 1500 ms");
    }

    #[test]
    fn parse_details_carry_both_reasons() {
        let err = GatewayError::Parse {
            parse_error: "expected value".into(),
            fallback_error: Some("no entry".into()),
            raw_output: "garbage".into(),
        };
        let details = err.details().unwrap();
        assert!(details.contains("expected value"));
        assert!(details.contains("no entry"));
        assert_eq!(err.raw_output(), Some("garbage"));
    }
}

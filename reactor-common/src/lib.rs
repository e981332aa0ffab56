//! Common types and utilities shared across Reactor crates.
//!
//! This crate defines the shared error type, score validation helpers and the
//! observability initialiser used throughout the Reactor workspace. It is
//! intentionally lightweight so that every crate can depend on it without
//! pulling in the HTTP or process stacks.
//!
//! # Overview
//!
//! - [`ReactorError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`ensure_unit_interval`]: Validation for the `[0, 1]` scores that flow
//!   between claim detection and reputation scoring
//!
//! # Examples
//!
//! ```rust
//! use reactor_common::{ensure_unit_interval, ReactorError};
//!
//! assert_eq!(ensure_unit_interval("authority", 0.75).unwrap(), 0.75);
//! assert!(matches!(
//!     ensure_unit_interval("authority", 1.5),
//!     Err(ReactorError::Validation(_))
//! ));
//! ```
pub mod observability;

/// Error types used across the Reactor system.
#[derive(thiserror::Error, Debug)]
pub enum ReactorError {
    /// Input was missing or outside its documented domain.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A background task (debouncer, server) is no longer running.
    #[error("Channel closed: {0}")]
    Closed(&'static str),

    /// Filesystem or socket failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything raised by a collaborator that has no dedicated variant.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`ReactorError`].
pub type Result<T> = std::result::Result<T, ReactorError>;

/// Reject scores that are NaN or fall outside `[0, 1]`.
pub fn ensure_unit_interval(field: &str, value: f64) -> Result<f64> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(ReactorError::Validation(format!(
            "{field} must be within [0, 1], got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_interval_accepts_bounds() {
        assert_eq!(ensure_unit_interval("s", 0.0).unwrap(), 0.0);
        assert_eq!(ensure_unit_interval("s", 1.0).unwrap(), 1.0);
    }

    #[test]
    fn unit_interval_rejects_nan_and_out_of_range() {
        assert!(ensure_unit_interval("s", f64::NAN).is_err());
        assert!(ensure_unit_interval("s", -0.01).is_err());
        let err = ensure_unit_interval("overall", 1.01).unwrap_err();
        assert!(err.to_string().contains("overall"));
    }
}

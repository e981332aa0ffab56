//! Source reputation, provenance and crisis monitoring models.
//!
//! Everything in this crate is pure data plus threshold tables:
//!
//! - [`ReputationRecord`]: five factor scores and an independently supplied overall score
//! - [`ProvenanceChain`]: chain of custody events, kept in insertion order
//! - [`TrustThresholds`] and [`DashboardSplit`]: the two score tables used for
//!   labelling a single source and for counting a dashboard
//! - [`SourceWithReputation`] with the dashboard filter/sort/summary helpers
//! - [`alert_level`] for the crisis dashboard
//!
//! ```
//! use reactor_reputation::{DashboardSplit, DashboardTier, TrustLabel, TrustThresholds};
//!
//! assert_eq!(TrustThresholds::default().label(0.7), TrustLabel::Reliable);
//! assert_eq!(DashboardSplit::default().tier(0.7), DashboardTier::Trusted);
//! ```

pub mod crisis;
pub mod provenance;
pub mod record;
pub mod source;
pub mod trust;

pub use crisis::{
    AlertLevel, CrisisMetrics, RiskLevel, Sentiment, TrendingClaim, VerificationStatus, alert_level,
    crisis_metrics,
};
pub use provenance::{CustodyAction, ProvenanceChain, ProvenanceData, ProvenanceEvent};
pub use record::ReputationRecord;
pub use source::{DashboardSummary, SortKey, SourceCategory, SourceFilter, SourceWithReputation};
pub use trust::{DashboardSplit, DashboardTier, TrustLabel, TrustThresholds};

use reactor_common::ReactorError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReputationError {
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{table} thresholds must be ascending: {detail}")]
    Unordered { table: &'static str, detail: String },
}

pub type Result<T> = std::result::Result<T, ReputationError>;

impl From<ReputationError> for ReactorError {
    fn from(err: ReputationError) -> Self {
        ReactorError::Validation(err.to_string())
    }
}

pub(crate) fn check_score(field: &'static str, value: f64) -> Result<f64> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(ReputationError::OutOfRange { field, value });
    }
    Ok(value)
}

pub(crate) fn check_ascending(table: &'static str, bounds: &[f64]) -> Result<()> {
    for b in bounds {
        check_score(table, *b)?;
    }
    if bounds.windows(2).any(|w| w[0] > w[1]) {
        return Err(ReputationError::Unordered {
            table,
            detail: format!("{bounds:?}"),
        });
    }
    Ok(())
}

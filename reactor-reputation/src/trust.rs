//! Score tables for sources.
//!
//! [`TrustThresholds`] labels a single source. [`DashboardSplit`] buckets a
//! set of sources into three counts. The two tables have different cut
//! points and are configured separately.

use crate::{Result, check_ascending};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLabel {
    Unreliable,
    Questionable,
    Reliable,
    Trusted,
    HighlyTrusted,
}

impl TrustLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustLabel::Unreliable => "Unreliable",
            TrustLabel::Questionable => "Questionable",
            TrustLabel::Reliable => "Reliable",
            TrustLabel::Trusted => "Trusted",
            TrustLabel::HighlyTrusted => "Highly Trusted",
        }
    }
}

impl fmt::Display for TrustLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive lower bounds for each trust label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustThresholds {
    pub highly_trusted: f64,
    pub trusted: f64,
    pub reliable: f64,
    pub questionable: f64,
}

impl Default for TrustThresholds {
    fn default() -> Self {
        Self {
            highly_trusted: 0.9,
            trusted: 0.8,
            reliable: 0.7,
            questionable: 0.6,
        }
    }
}

impl TrustThresholds {
    pub fn validate(&self) -> Result<()> {
        check_ascending(
            "trust",
            &[
                self.questionable,
                self.reliable,
                self.trusted,
                self.highly_trusted,
            ],
        )
    }

    pub fn label(&self, score: f64) -> TrustLabel {
        if score >= self.highly_trusted {
            TrustLabel::HighlyTrusted
        } else if score >= self.trusted {
            TrustLabel::Trusted
        } else if score >= self.reliable {
            TrustLabel::Reliable
        } else if score >= self.questionable {
            TrustLabel::Questionable
        } else {
            TrustLabel::Unreliable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTier {
    Trusted,
    Questionable,
    Unreliable,
}

/// Three-way split used by the dashboard counters and the trusted/questionable filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSplit {
    pub trusted: f64,
    pub questionable: f64,
}

impl Default for DashboardSplit {
    fn default() -> Self {
        Self {
            trusted: 0.7,
            questionable: 0.5,
        }
    }
}

impl DashboardSplit {
    pub fn validate(&self) -> Result<()> {
        check_ascending("dashboard split", &[self.questionable, self.trusted])
    }

    pub fn tier(&self, score: f64) -> DashboardTier {
        if score >= self.trusted {
            DashboardTier::Trusted
        } else if score >= self.questionable {
            DashboardTier::Questionable
        } else {
            DashboardTier::Unreliable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_bands_are_inclusive() {
        let t = TrustThresholds::default();
        assert_eq!(t.label(1.0), TrustLabel::HighlyTrusted);
        assert_eq!(t.label(0.9), TrustLabel::HighlyTrusted);
        assert_eq!(t.label(0.85), TrustLabel::Trusted);
        assert_eq!(t.label(0.7), TrustLabel::Reliable);
        assert_eq!(t.label(0.6), TrustLabel::Questionable);
        assert_eq!(t.label(0.59), TrustLabel::Unreliable);
        assert_eq!(t.label(0.0), TrustLabel::Unreliable);
    }

    #[test]
    fn split_differs_from_trust_table() {
        let s = DashboardSplit::default();
        assert_eq!(s.tier(0.7), DashboardTier::Trusted);
        assert_eq!(s.tier(0.55), DashboardTier::Questionable);
        assert_eq!(s.tier(0.5), DashboardTier::Questionable);
        assert_eq!(s.tier(0.49), DashboardTier::Unreliable);
        // 0.55 is questionable on the dashboard but unreliable as a label
        assert_eq!(TrustThresholds::default().label(0.55), TrustLabel::Unreliable);
    }

    #[test]
    fn display_uses_human_labels() {
        assert_eq!(TrustLabel::HighlyTrusted.to_string(), "Highly Trusted");
        assert_eq!(
            serde_json::to_string(&TrustLabel::HighlyTrusted).unwrap(),
            "\"highly_trusted\""
        );
    }

    #[test]
    fn rejects_unordered_tables() {
        let bad = TrustThresholds {
            reliable: 0.95,
            ..TrustThresholds::default()
        };
        assert!(bad.validate().is_err());
        let bad = DashboardSplit {
            trusted: 0.4,
            questionable: 0.5,
        };
        assert!(bad.validate().is_err());
        assert!(DashboardSplit::default().validate().is_ok());
    }
}

//! Claim-confidence → status classification.
//!
//! Bands are closed-open with inclusive lower bounds: a confidence equal to a
//! threshold lands in the band at that threshold. This table is deliberately
//! separate from the source trust tables in `reactor-reputation`.

use reactor_common::{ReactorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verification state attached to a detected claim, ordered from least to
/// most trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    False,
    Misleading,
    Unverified,
    Disputed,
    Verified,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::False => "false",
            ClaimStatus::Misleading => "misleading",
            ClaimStatus::Unverified => "unverified",
            ClaimStatus::Disputed => "disputed",
            ClaimStatus::Verified => "verified",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds for each status band.
///
/// ```
/// use reactor_claims::{ClaimStatus, StatusThresholds};
///
/// let table = StatusThresholds::default();
/// assert_eq!(table.classify(0.95), ClaimStatus::Verified);
/// assert_eq!(table.classify(0.8), ClaimStatus::Disputed);
/// assert_eq!(table.classify(0.59), ClaimStatus::False);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    pub verified: f64,
    pub disputed: f64,
    pub unverified: f64,
    pub misleading: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            verified: 0.9,
            disputed: 0.8,
            unverified: 0.7,
            misleading: 0.6,
        }
    }
}

impl StatusThresholds {
    /// Build a table, rejecting bounds that are unordered or outside `[0, 1]`.
    pub fn new(verified: f64, disputed: f64, unverified: f64, misleading: f64) -> Result<Self> {
        let table = Self {
            verified,
            disputed,
            unverified,
            misleading,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = [self.misleading, self.unverified, self.disputed, self.verified];
        for b in bounds {
            reactor_common::ensure_unit_interval("status threshold", b)?;
        }
        if bounds.windows(2).any(|w| w[0] > w[1]) {
            return Err(ReactorError::Validation(format!(
                "status thresholds must be ascending from misleading to verified: {bounds:?}"
            )));
        }
        Ok(())
    }

    pub fn classify(&self, confidence: f64) -> ClaimStatus {
        if confidence >= self.verified {
            ClaimStatus::Verified
        } else if confidence >= self.disputed {
            ClaimStatus::Disputed
        } else if confidence >= self.unverified {
            ClaimStatus::Unverified
        } else if confidence >= self.misleading {
            ClaimStatus::Misleading
        } else {
            ClaimStatus::False
        }
    }
}

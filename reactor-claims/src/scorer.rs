//! Pluggable scoring for detected claim candidates.
//!
//! Detection only decides *where* a claim is. How confident we are in it, and
//! how many sources weigh in, is the job of a [`ClaimScorer`]. Production
//! scorers can call out to a verifier; [`RandomScorer`] reproduces the
//! demonstration behaviour of the original overlay.

use crate::classify::{ClaimStatus, StatusThresholds};
use crate::patterns::PatternCategory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A raw pattern match handed to a scorer.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub category: PatternCategory,
}

/// What a scorer says about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub confidence: f64,
    pub status: ClaimStatus,
    pub sources: u32,
}

pub trait ClaimScorer: Send + Sync {
    fn assess(&self, candidate: &Candidate<'_>) -> Assessment;

    /// Name for logs.
    fn name(&self) -> &str {
        "custom"
    }
}

/// Uniform confidence in `[0.6, 1.0)` and 1-20 sources, with the status
/// derived from the configured table.
pub struct RandomScorer {
    rng: Mutex<StdRng>,
    thresholds: StatusThresholds,
}

impl RandomScorer {
    pub const CONFIDENCE_FLOOR: f64 = 0.6;
    pub const CONFIDENCE_CEIL: f64 = 1.0;
    pub const MAX_SOURCES: u32 = 20;

    pub fn new(thresholds: StatusThresholds) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            thresholds,
        }
    }

    /// Deterministic variant for tests and reproducible demos.
    ///
    /// ```
    /// use reactor_claims::{Candidate, ClaimScorer, PatternCategory, RandomScorer, StatusThresholds};
    ///
    /// let a = RandomScorer::seeded(7, StatusThresholds::default());
    /// let b = RandomScorer::seeded(7, StatusThresholds::default());
    /// let c = Candidate { text: "All swans are white.", start: 0, end: 20, category: PatternCategory::Absolutist };
    /// assert_eq!(a.assess(&c), b.assess(&c));
    /// ```
    pub fn seeded(seed: u64, thresholds: StatusThresholds) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            thresholds,
        }
    }
}

impl Default for RandomScorer {
    fn default() -> Self {
        Self::new(StatusThresholds::default())
    }
}

impl ClaimScorer for RandomScorer {
    fn assess(&self, _candidate: &Candidate<'_>) -> Assessment {
        // A poisoned lock only means another thread panicked mid-draw; the RNG is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        let confidence = rng.gen_range(Self::CONFIDENCE_FLOOR..Self::CONFIDENCE_CEIL);
        let sources = rng.gen_range(1..=Self::MAX_SOURCES);
        Assessment {
            confidence,
            status: self.thresholds.classify(confidence),
            sources,
        }
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Scores every candidate the same way; useful when wiring a real verifier
/// is not possible yet.
pub struct FixedScorer {
    pub confidence: f64,
    pub sources: u32,
    pub thresholds: StatusThresholds,
}

impl ClaimScorer for FixedScorer {
    fn assess(&self, _candidate: &Candidate<'_>) -> Assessment {
        Assessment {
            confidence: self.confidence,
            status: self.thresholds.classify(self.confidence),
            sources: self.sources,
        }
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

//! Claim extraction for the Reactor fact-checking back end.
//!
//! Free text is scanned with four families of linguistic patterns
//! ([`PatternCategory`]). Every match is scored by a pluggable
//! [`ClaimScorer`], classified through [`StatusThresholds`] and returned as a
//! [`ClaimSpan`]. [`Debouncer`] wraps the detector for live input.
//!
//! ```
//! use std::sync::Arc;
//! use reactor_claims::{ClaimDetector, ClaimStatus, FixedScorer, StatusThresholds};
//!
//! let scorer = FixedScorer { confidence: 0.92, sources: 5, thresholds: StatusThresholds::default() };
//! let detector = ClaimDetector::new(Arc::new(scorer));
//! let claims = detector.detect("According to the survey, 70% of people never read labels.");
//! assert!(!claims.is_empty());
//! assert!(claims.iter().all(|c| c.status == ClaimStatus::Verified));
//! ```

pub mod classify;
pub mod debounce;
pub mod detector;
pub mod patterns;
pub mod scorer;

pub use classify::{ClaimStatus, StatusThresholds};
pub use debounce::{DEFAULT_QUIET_PERIOD, Debouncer, Detection};
pub use detector::{ClaimDetector, ClaimSpan, DEFAULT_MAX_CLAIMS, OverlapPolicy};
pub use patterns::PatternCategory;
pub use scorer::{Assessment, Candidate, ClaimScorer, FixedScorer, RandomScorer};

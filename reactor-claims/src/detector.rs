use crate::classify::ClaimStatus;
use crate::patterns::PatternCategory;
use crate::scorer::{Candidate, ClaimScorer, RandomScorer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_MAX_CLAIMS: usize = 10;

/// A detected candidate claim. `start..end` is a half-open byte range into the
/// analysed text and always falls on character boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub category: PatternCategory,
    pub confidence: f64,
    pub status: ClaimStatus,
    pub sources: u32,
}

impl ClaimSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: &ClaimSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// How spans produced by different categories are reconciled when they cover
/// the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Report every match, overlapping or not.
    KeepAll,
    /// Keep the longest span of an overlapping group; earlier discovery breaks ties.
    #[default]
    LongestWins,
    /// Keep the most confident span of an overlapping group; earlier discovery breaks ties.
    HighestConfidence,
}

/// Pattern-based claim detector.
///
/// ```
/// use reactor_claims::{ClaimDetector, PatternCategory};
///
/// let detector = ClaimDetector::default();
/// let text = "Studies show that coffee cures cancer.";
/// let claims = detector.detect(text);
/// assert_eq!(claims.len(), 1);
/// assert_eq!(claims[0].category, PatternCategory::Attribution);
/// assert_eq!(&text[claims[0].start..claims[0].end], text);
/// ```
#[derive(Clone)]
pub struct ClaimDetector {
    scorer: Arc<dyn ClaimScorer>,
    max_claims: usize,
    overlap: OverlapPolicy,
}

impl Default for ClaimDetector {
    fn default() -> Self {
        Self::new(Arc::new(RandomScorer::default()))
    }
}

impl ClaimDetector {
    pub fn new(scorer: Arc<dyn ClaimScorer>) -> Self {
        Self {
            scorer,
            max_claims: DEFAULT_MAX_CLAIMS,
            overlap: OverlapPolicy::default(),
        }
    }

    pub fn with_max_claims(mut self, max_claims: usize) -> Self {
        self.max_claims = max_claims;
        self
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn max_claims(&self) -> usize {
        self.max_claims
    }

    pub fn overlap(&self) -> OverlapPolicy {
        self.overlap
    }

    /// Run every pattern category over `text` and return at most
    /// `max_claims` spans, in category order then match order.
    pub fn detect(&self, text: &str) -> Vec<ClaimSpan> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for category in PatternCategory::ALL {
            for m in category.regex().find_iter(text) {
                let candidate = Candidate {
                    text: m.as_str(),
                    start: m.start(),
                    end: m.end(),
                    category,
                };
                let assessment = self.scorer.assess(&candidate);
                found.push(ClaimSpan {
                    text: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                    category,
                    confidence: assessment.confidence,
                    status: assessment.status,
                    sources: assessment.sources,
                });
            }
        }

        let matched = found.len();
        let mut spans = resolve_overlaps(found, self.overlap);
        spans.truncate(self.max_claims);

        tracing::debug!(
            target: "claims.detect",
            text_len = text.len(),
            matched,
            kept = spans.len(),
            scorer = self.scorer.name(),
            overlap = ?self.overlap,
            "claims.detect.done"
        );
        spans
    }
}

fn resolve_overlaps(spans: Vec<ClaimSpan>, policy: OverlapPolicy) -> Vec<ClaimSpan> {
    if policy == OverlapPolicy::KeepAll || spans.len() < 2 {
        return spans;
    }

    let mut ranked: Vec<usize> = (0..spans.len()).collect();
    match policy {
        OverlapPolicy::LongestWins => {
            ranked.sort_by(|&a, &b| spans[b].len().cmp(&spans[a].len()).then(a.cmp(&b)));
        }
        OverlapPolicy::HighestConfidence => {
            ranked.sort_by(|&a, &b| {
                spans[b]
                    .confidence
                    .total_cmp(&spans[a].confidence)
                    .then(a.cmp(&b))
            });
        }
        OverlapPolicy::KeepAll => unreachable!("handled above"),
    }

    let mut accepted: Vec<usize> = Vec::with_capacity(spans.len());
    for idx in ranked {
        if accepted.iter().all(|&kept| !spans[kept].overlaps(&spans[idx])) {
            accepted.push(idx);
        }
    }
    // back to discovery order
    accepted.sort_unstable();

    let mut slots: Vec<Option<ClaimSpan>> = spans.into_iter().map(Some).collect();
    accepted
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}

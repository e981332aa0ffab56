//! Linguistic patterns that flag a clause as a checkable claim.
//!
//! Each category matches a trigger phrase followed by the rest of the clause
//! up to and including the sentence terminator. Matches within one category
//! never overlap; matches from different categories may.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    /// "studies show", "experts claim", "according to", ...
    Attribution,
    /// "always", "never", "completely", ...
    Absolutist,
    /// "40%", "12 percent", ...
    Statistical,
    /// "causes", "prevents", "leads to", ...
    Causal,
}

impl PatternCategory {
    /// Scan order; detection output follows it.
    pub const ALL: [PatternCategory; 4] = [
        PatternCategory::Attribution,
        PatternCategory::Absolutist,
        PatternCategory::Statistical,
        PatternCategory::Causal,
    ];

    pub fn regex(&self) -> &'static Regex {
        match self {
            PatternCategory::Attribution => &ATTRIBUTION,
            PatternCategory::Absolutist => &ABSOLUTIST,
            PatternCategory::Statistical => &STATISTICAL,
            PatternCategory::Causal => &CAUSAL,
        }
    }
}

fn compile(pattern: &str) -> Regex {
    // Patterns are literals in this file; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid claim pattern {pattern:?}: {e}"))
}

static ATTRIBUTION: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b(?:studies show|research proves|scientists say|experts claim|according to)\s+[^.!?]*[.!?]",
    )
});

static ABSOLUTIST: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b(?:always|never|all|none|every|completely|totally|absolutely)\s+[^.!?]*[.!?]",
    )
});

static STATISTICAL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:[0-9]+%|[0-9]+\s*percent)\s+[^.!?]*[.!?]"));

static CAUSAL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:causes?|prevents?|cures?|leads to|results in)\s+[^.!?]*[.!?]")
});

//! Chain of custody for a published source.
//!
//! Events are stored in the order they were supplied. Nothing is sorted or
//! validated on construction; [`ProvenanceChain::is_chronological`] and
//! [`ProvenanceChain::sorted_by_time`] are explicit queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustodyAction {
    Created,
    Shared,
    Modified,
    Verified,
    Flagged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEvent {
    #[serde(default)]
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: CustodyAction,
    pub actor: String,
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvenanceChain(Vec<ProvenanceEvent>);

impl ProvenanceChain {
    pub fn new(events: Vec<ProvenanceEvent>) -> Self {
        Self(events)
    }

    pub fn push(&mut self, event: ProvenanceEvent) {
        self.0.push(event);
    }

    pub fn events(&self) -> &[ProvenanceEvent] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when no event is timestamped before its predecessor.
    pub fn is_chronological(&self) -> bool {
        self.0.windows(2).all(|w| w[0].timestamp <= w[1].timestamp)
    }

    /// Copy of the chain ordered by timestamp. Equal timestamps keep their
    /// insertion order.
    pub fn sorted_by_time(&self) -> ProvenanceChain {
        let mut events = self.0.clone();
        events.sort_by_key(|e| e.timestamp);
        ProvenanceChain(events)
    }

    pub fn was_flagged(&self) -> bool {
        self.0.iter().any(|e| e.action == CustodyAction::Flagged)
    }
}

/// Publication header plus custody chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceData {
    pub original_source: String,
    pub publish_date: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub citations: u32,
    #[serde(default)]
    pub retractions: u32,
    #[serde(default)]
    pub corrections: u32,
    #[serde(default)]
    pub chain_of_custody: ProvenanceChain,
}

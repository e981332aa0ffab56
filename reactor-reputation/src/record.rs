use crate::{Result, check_score};
use serde::{Deserialize, Serialize};

/// Per-source reputation factors, each in `[0, 1]`.
///
/// `overall` is supplied by whoever scored the source and is stored as is.
/// It is not recomputed from the factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReputationRecord {
    pub authority: f64,
    pub consistency: f64,
    pub transparency: f64,
    pub peer_review: f64,
    pub factual_accuracy: f64,
    pub overall: f64,
}

impl ReputationRecord {
    pub fn new(
        authority: f64,
        consistency: f64,
        transparency: f64,
        peer_review: f64,
        factual_accuracy: f64,
        overall: f64,
    ) -> Result<Self> {
        let record = Self {
            authority,
            consistency,
            transparency,
            peer_review,
            factual_accuracy,
            overall,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<()> {
        check_score("authority", self.authority)?;
        check_score("consistency", self.consistency)?;
        check_score("transparency", self.transparency)?;
        check_score("peer_review", self.peer_review)?;
        check_score("factual_accuracy", self.factual_accuracy)?;
        check_score("overall", self.overall)?;
        Ok(())
    }

    pub fn factors(&self) -> [(&'static str, f64); 5] {
        [
            ("authority", self.authority),
            ("consistency", self.consistency),
            ("transparency", self.transparency),
            ("peer_review", self.peer_review),
            ("factual_accuracy", self.factual_accuracy),
        ]
    }
}

use crate::provenance::ProvenanceData;
use crate::record::ReputationRecord;
use crate::trust::{DashboardSplit, DashboardTier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceCategory {
    News,
    Academic,
    Government,
    Health,
    FactCheck,
    Social,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceWithReputation {
    pub id: String,
    pub title: String,
    pub domain: String,
    pub url: String,
    pub reputation: ReputationRecord,
    pub provenance: ProvenanceData,
    pub category: SourceCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    #[default]
    All,
    /// Overall score at or above the split's trusted cut.
    Trusted,
    /// Everything below the trusted cut, unreliable sources included.
    Questionable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Reputation,
    Authority,
    /// Newest publish date first.
    Recency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub trusted: usize,
    pub questionable: usize,
    pub unreliable: usize,
}

impl DashboardSummary {
    pub fn total(&self) -> usize {
        self.trusted + self.questionable + self.unreliable
    }
}

impl SourceWithReputation {
    pub fn tier(&self, split: &DashboardSplit) -> DashboardTier {
        split.tier(self.reputation.overall)
    }

    /// Count sources per dashboard tier.
    ///
    /// ```
    /// use reactor_reputation::{DashboardSplit, DashboardSummary, SourceWithReputation};
    ///
    /// let sources: Vec<SourceWithReputation> = Vec::new();
    /// let summary = SourceWithReputation::summarize(&sources, &DashboardSplit::default());
    /// assert_eq!(summary, DashboardSummary::default());
    /// ```
    pub fn summarize(sources: &[SourceWithReputation], split: &DashboardSplit) -> DashboardSummary {
        let mut summary = DashboardSummary::default();
        for source in sources {
            match source.tier(split) {
                DashboardTier::Trusted => summary.trusted += 1,
                DashboardTier::Questionable => summary.questionable += 1,
                DashboardTier::Unreliable => summary.unreliable += 1,
            }
        }
        tracing::debug!(
            target: "reputation.dashboard",
            total = summary.total(),
            trusted = summary.trusted,
            questionable = summary.questionable,
            unreliable = summary.unreliable,
            "reputation.dashboard.summarized"
        );
        summary
    }

    /// Filter then sort descending by `key`. Ties keep input order.
    pub fn dashboard<'a>(
        sources: &'a [SourceWithReputation],
        filter: SourceFilter,
        key: SortKey,
        split: &DashboardSplit,
    ) -> Vec<&'a SourceWithReputation> {
        let mut view: Vec<&SourceWithReputation> = sources
            .iter()
            .filter(|s| match filter {
                SourceFilter::All => true,
                SourceFilter::Trusted => s.reputation.overall >= split.trusted,
                SourceFilter::Questionable => s.reputation.overall < split.trusted,
            })
            .collect();

        match key {
            SortKey::Reputation => {
                view.sort_by(|a, b| b.reputation.overall.total_cmp(&a.reputation.overall))
            }
            SortKey::Authority => {
                view.sort_by(|a, b| b.reputation.authority.total_cmp(&a.reputation.authority))
            }
            SortKey::Recency => {
                view.sort_by(|a, b| b.provenance.publish_date.cmp(&a.provenance.publish_date))
            }
        }
        view
    }
}

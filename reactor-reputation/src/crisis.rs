//! Crisis monitoring: trending claims and the dashboard alert level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Elevated,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Unverified,
    Investigating,
    Disputed,
    Debunked,
    Verified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingClaim {
    #[serde(default)]
    pub id: String,
    pub text: String,
    /// Mentions per hour.
    #[serde(default)]
    pub velocity: f64,
    /// Estimated people reached.
    #[serde(default)]
    pub reach: u64,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_detected: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub related_claims: Vec<String>,
}

/// More than this many high-risk claims raise the alert to `high`.
pub const HIGH_RISK_ESCALATION: usize = 2;

/// Derive the dashboard alert level from the current trending claims.
///
/// ```
/// use reactor_reputation::{alert_level, AlertLevel};
///
/// assert_eq!(alert_level(&[]), AlertLevel::Normal);
/// ```
pub fn alert_level(claims: &[TrendingClaim]) -> AlertLevel {
    if claims.iter().any(|c| c.risk_level == RiskLevel::Critical) {
        return AlertLevel::Critical;
    }
    let high = claims
        .iter()
        .filter(|c| c.risk_level == RiskLevel::High)
        .count();
    if high > HIGH_RISK_ESCALATION {
        AlertLevel::High
    } else if high > 0 {
        AlertLevel::Elevated
    } else {
        AlertLevel::Normal
    }
}

/// Headline figures for the crisis dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrisisMetrics {
    /// Claims currently trending.
    pub active: usize,
    /// Claims at `high` risk or above.
    pub high_risk: usize,
    /// People reached across every claim. Saturates at `u64::MAX`.
    pub total_reach: u64,
}

/// ```
/// use reactor_reputation::{crisis_metrics, CrisisMetrics};
///
/// assert_eq!(crisis_metrics(&[]), CrisisMetrics::default());
/// ```
pub fn crisis_metrics(claims: &[TrendingClaim]) -> CrisisMetrics {
    CrisisMetrics {
        active: claims.len(),
        high_risk: claims
            .iter()
            .filter(|c| c.risk_level >= RiskLevel::High)
            .count(),
        total_reach: claims
            .iter()
            .fold(0u64, |total, c| total.saturating_add(c.reach)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(risk: RiskLevel) -> TrendingClaim {
        TrendingClaim {
            id: String::new(),
            text: "5G towers spread viruses".into(),
            velocity: 450.0,
            reach: 1_000,
            platforms: vec!["twitter".into()],
            sentiment: None,
            risk_level: risk,
            first_detected: None,
            last_updated: None,
            verification_status: VerificationStatus::Investigating,
            related_claims: Vec::new(),
        }
    }

    #[test]
    fn critical_dominates() {
        let claims = [claim(RiskLevel::Low), claim(RiskLevel::Critical)];
        assert_eq!(alert_level(&claims), AlertLevel::Critical);
    }

    #[test]
    fn high_count_escalates_past_two() {
        let two = vec![claim(RiskLevel::High); 2];
        assert_eq!(alert_level(&two), AlertLevel::Elevated);
        let three = vec![claim(RiskLevel::High); 3];
        assert_eq!(alert_level(&three), AlertLevel::High);
    }

    #[test]
    fn medium_and_low_stay_normal() {
        let claims = [claim(RiskLevel::Medium), claim(RiskLevel::Low)];
        assert_eq!(alert_level(&claims), AlertLevel::Normal);
    }

    #[test]
    fn metrics_count_every_claim() {
        let claims = [
            claim(RiskLevel::High),
            claim(RiskLevel::Critical),
            claim(RiskLevel::Medium),
        ];
        assert_eq!(
            crisis_metrics(&claims),
            CrisisMetrics {
                active: 3,
                high_risk: 2,
                total_reach: 3_000,
            }
        );
    }

    #[test]
    fn total_reach_saturates() {
        let mut huge = claim(RiskLevel::High);
        huge.reach = u64::MAX;
        let metrics = crisis_metrics(&[huge.clone(), huge]);
        assert_eq!(metrics.total_reach, u64::MAX);
        assert_eq!(metrics.high_risk, 2);
    }
}

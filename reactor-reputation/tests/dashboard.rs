use reactor_reputation::{
    CustodyAction, DashboardSplit, DashboardSummary, DashboardTier, SortKey, SourceCategory,
    SourceFilter, SourceWithReputation, TrustLabel, TrustThresholds,
};
use serde_json::json;

fn source(id: &str, overall: f64, authority: f64, published: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Report {id}"),
        "domain": format!("{id}.example.org"),
        "url": format!("https://{id}.example.org/report"),
        "category": "fact-check",
        "reputation": {
            "authority": authority,
            "consistency": 0.8,
            "transparency": 0.7,
            "peer_review": 0.6,
            "factual_accuracy": 0.9,
            "overall": overall
        },
        "provenance": {
            "original_source": format!("{id}.example.org"),
            "publish_date": published,
            "last_modified": published,
            "authors": ["Desk"],
            "citations": 12,
            "chain_of_custody": [
                {"timestamp": published, "action": "created", "actor": "Desk", "platform": "web"}
            ]
        }
    })
}

fn fixture() -> Vec<SourceWithReputation> {
    serde_json::from_value(json!([
        source("alpha", 0.92, 0.60, "2024-09-15T10:00:00Z"),
        source("bravo", 0.70, 0.95, "2024-09-18T15:30:00Z"),
        source("charlie", 0.55, 0.40, "2024-09-20T08:00:00Z"),
        source("delta", 0.30, 0.10, "2024-09-10T08:00:00Z"),
        source("echo", 0.70, 0.50, "2024-09-12T08:00:00Z"),
    ]))
    .unwrap()
}

fn ids(view: &[&SourceWithReputation]) -> Vec<String> {
    view.iter().map(|s| s.id.clone()).collect()
}

#[test]
fn parses_wire_format() {
    let sources = fixture();
    assert_eq!(sources[0].category, SourceCategory::FactCheck);
    let chain = &sources[0].provenance.chain_of_custody;
    assert_eq!(chain.events()[0].action, CustodyAction::Created);
    assert_eq!(sources[0].provenance.retractions, 0);
}

#[test]
fn boundary_score_is_reliable_and_trusted() {
    let sources = fixture();
    let bravo = &sources[1];
    assert_eq!(
        TrustThresholds::default().label(bravo.reputation.overall),
        TrustLabel::Reliable
    );
    assert_eq!(bravo.tier(&DashboardSplit::default()), DashboardTier::Trusted);
}

#[test]
fn summary_counts_each_tier() {
    let summary = SourceWithReputation::summarize(&fixture(), &DashboardSplit::default());
    assert_eq!(
        summary,
        DashboardSummary {
            trusted: 3,
            questionable: 1,
            unreliable: 1
        }
    );
}

#[test]
fn filters_use_trusted_cut() {
    let sources = fixture();
    let split = DashboardSplit::default();
    let trusted =
        SourceWithReputation::dashboard(&sources, SourceFilter::Trusted, SortKey::Reputation, &split);
    assert_eq!(ids(&trusted), ["alpha", "bravo", "echo"]);

    let questionable = SourceWithReputation::dashboard(
        &sources,
        SourceFilter::Questionable,
        SortKey::Reputation,
        &split,
    );
    assert_eq!(ids(&questionable), ["charlie", "delta"]);
}

#[test]
fn sorts_descending_by_key() {
    let sources = fixture();
    let split = DashboardSplit::default();
    let by_authority =
        SourceWithReputation::dashboard(&sources, SourceFilter::All, SortKey::Authority, &split);
    assert_eq!(ids(&by_authority), ["bravo", "alpha", "echo", "charlie", "delta"]);

    let by_recency =
        SourceWithReputation::dashboard(&sources, SourceFilter::All, SortKey::Recency, &split);
    assert_eq!(ids(&by_recency), ["charlie", "bravo", "alpha", "echo", "delta"]);
}

use std::sync::Arc;
use std::time::Duration;

use reactor_claims::{
    ClaimDetector, ClaimStatus, Debouncer, FixedScorer, OverlapPolicy, PatternCategory,
    RandomScorer, StatusThresholds,
};

const ARTICLE: &str = "Studies show that coffee cures cancer. Scientists say the planet is warming! \
    Vaccines never cause harm. Nearly 90% of doctors agree with this. \
    Sugar causes hyperactivity in children. According to the minister, every school is safe. \
    All roads lead somewhere. Research proves nothing is certain? \
    Exercise prevents most illness. 40 percent of voters stayed home. \
    Totally untrue rumours spread fast. Smoking leads to disease.";

fn seeded() -> ClaimDetector {
    ClaimDetector::new(Arc::new(RandomScorer::seeded(
        2024,
        StatusThresholds::default(),
    )))
}

#[test]
fn spans_are_capped_and_in_bounds() {
    for policy in [
        OverlapPolicy::KeepAll,
        OverlapPolicy::LongestWins,
        OverlapPolicy::HighestConfidence,
    ] {
        let spans = seeded().with_overlap(policy).detect(ARTICLE);
        assert!(!spans.is_empty());
        assert!(spans.len() <= 10, "{policy:?} returned {}", spans.len());
        for s in &spans {
            assert!(s.start < s.end && s.end <= ARTICLE.len());
            assert_eq!(&ARTICLE[s.start..s.end], s.text);
            assert!((0.6..1.0).contains(&s.confidence));
            assert!((1..=20).contains(&s.sources));
            assert_ne!(s.status, ClaimStatus::False);
        }
    }
}

#[test]
fn merged_spans_never_overlap() {
    let spans = seeded().with_max_claims(usize::MAX).detect(ARTICLE);
    for (i, a) in spans.iter().enumerate() {
        for b in &spans[i + 1..] {
            assert!(!a.overlaps(b), "{:?} overlaps {:?}", a.text, b.text);
        }
    }
}

#[test]
fn coffee_claim_is_one_attribution_span() {
    let text = "Studies show that coffee cures cancer.";
    let spans = seeded().detect(text);
    assert_eq!(spans.len(), 1);
    let span = &spans[0];
    assert_eq!(span.category, PatternCategory::Attribution);
    assert_eq!(span.start, 0);
    assert!(text[span.start..].starts_with("Studies show"));
    assert_eq!(span.end, text.len());
    assert!(span.text.ends_with('.'));
}

#[test]
fn multibyte_text_keeps_char_boundaries() {
    let text = "Café owners say: experts claim crème brûlée always sells out. Fin.";
    for s in seeded().with_overlap(OverlapPolicy::KeepAll).detect(text) {
        assert!(text.is_char_boundary(s.start));
        assert!(text.is_char_boundary(s.end));
    }
}

#[test]
fn empty_input_yields_nothing() {
    assert!(seeded().detect("").is_empty());
    assert!(seeded().detect("No checkable statement here").is_empty());
}

#[test]
fn same_seed_same_output() {
    assert_eq!(seeded().detect(ARTICLE), seeded().detect(ARTICLE));
}

fn fixed_detector() -> ClaimDetector {
    ClaimDetector::new(Arc::new(FixedScorer {
        confidence: 0.85,
        sources: 2,
        thresholds: StatusThresholds::default(),
    }))
}

#[tokio::test(start_paused = true)]
async fn burst_of_updates_runs_one_extraction() {
    let debouncer = Debouncer::spawn(fixed_detector(), Duration::from_millis(1500));
    let mut rx = debouncer.subscribe();

    debouncer.update("Never give up.").unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;
    debouncer.update("Never give").unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;
    debouncer
        .update("Studies show that coffee cures cancer.")
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;

    // 3s of activity, but no quiet period has elapsed yet
    assert_eq!(debouncer.latest().revision, 0);

    rx.changed().await.unwrap();
    let detection = rx.borrow_and_update().clone();
    assert_eq!(detection.revision, 1);
    assert_eq!(detection.claims.len(), 1);
    assert_eq!(detection.claims[0].status, ClaimStatus::Disputed);
    assert_eq!(
        detection.claims[0].text,
        "Studies show that coffee cures cancer."
    );
}

#[tokio::test(start_paused = true)]
async fn separate_pauses_run_separate_extractions() {
    let debouncer = Debouncer::spawn(fixed_detector(), Duration::from_millis(1500));

    debouncer.update("All cats are grey.").unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(debouncer.latest().revision, 1);

    debouncer.update("Nothing to see").unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    let latest = debouncer.latest();
    assert_eq!(latest.revision, 2);
    assert!(latest.claims.is_empty());
}

#[tokio::test(start_paused = true)]
async fn finish_flushes_pending_text() {
    let debouncer = Debouncer::spawn(fixed_detector(), Duration::from_millis(1500));
    debouncer.update("Smoking causes cancer.").unwrap();
    let last = debouncer.finish().await.unwrap();
    assert_eq!(last.revision, 1);
    assert_eq!(last.claims[0].category, PatternCategory::Causal);
}

//! Debounced live detection.
//!
//! Typing produces a burst of text updates. The [`Debouncer`] owns a single
//! Tokio task that waits for a quiet period after the most recent update and
//! only then runs one extraction. Results are published on a `watch` channel
//! so readers always see the latest completed pass.

use crate::detector::{ClaimDetector, ClaimSpan};
use reactor_common::{ReactorError, Result};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1500);

/// Output of one completed extraction pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// Number of completed passes; `0` means nothing has run yet.
    pub revision: u64,
    pub claims: Vec<ClaimSpan>,
}

pub struct Debouncer {
    updates: mpsc::UnboundedSender<String>,
    results: watch::Receiver<Detection>,
    task: JoinHandle<()>,
}

impl Debouncer {
    /// Spawn the debounce task on the current runtime.
    pub fn spawn(detector: ClaimDetector, quiet: Duration) -> Self {
        let (updates, rx) = mpsc::unbounded_channel();
        let (tx, results) = watch::channel(Detection::default());
        let task = tokio::spawn(run(detector, quiet, rx, tx));
        Self {
            updates,
            results,
            task,
        }
    }

    /// Replace the pending text and restart the quiet period.
    pub fn update(&self, text: impl Into<String>) -> Result<()> {
        self.updates
            .send(text.into())
            .map_err(|_| ReactorError::Closed("claim debouncer"))
    }

    pub fn subscribe(&self) -> watch::Receiver<Detection> {
        self.results.clone()
    }

    pub fn latest(&self) -> Detection {
        self.results.borrow().clone()
    }

    /// Stop accepting updates, let any pending text finish its quiet period
    /// and return the final result.
    pub async fn finish(self) -> Result<Detection> {
        let Debouncer {
            updates,
            results,
            task,
        } = self;
        drop(updates);
        task.await
            .map_err(|_| ReactorError::Closed("claim debouncer"))?;
        let last = results.borrow().clone();
        Ok(last)
    }
}

async fn run(
    detector: ClaimDetector,
    quiet: Duration,
    mut rx: mpsc::UnboundedReceiver<String>,
    tx: watch::Sender<Detection>,
) {
    let mut pending: Option<(String, Instant)> = None;
    let mut open = true;
    let mut revision = 0u64;

    loop {
        let Some(deadline) = pending.as_ref().map(|(_, at)| *at) else {
            if !open {
                break;
            }
            match rx.recv().await {
                Some(text) => pending = Some((text, Instant::now() + quiet)),
                None => break,
            }
            continue;
        };

        tokio::select! {
            msg = rx.recv(), if open => match msg {
                Some(text) => {
                    tracing::trace!(target: "claims.debounce", "claims.debounce.reset");
                    pending = Some((text, Instant::now() + quiet));
                }
                None => open = false,
            },
            _ = sleep_until(deadline) => {
                if let Some((text, _)) = pending.take() {
                    revision += 1;
                    let claims = detector.detect(&text);
                    tracing::debug!(
                        target: "claims.debounce",
                        revision,
                        claims = claims.len(),
                        "claims.debounce.fired"
                    );
                    tx.send_replace(Detection { revision, claims });
                }
            }
        }
    }
}

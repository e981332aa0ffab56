//! `reactor detect --follow`: debounced detection over a growing document.

use anyhow::Result;
use reactor_claims::{ClaimDetector, Debouncer, Detection};
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// Append each input line to the document and print every completed pass as
/// one JSON line. Returns the final pass once input ends or `cancel` trips.
pub async fn follow<R, W>(
    detector: ClaimDetector,
    quiet: Duration,
    input: R,
    mut output: W,
    cancel: CancellationToken,
) -> Result<Detection>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let debouncer = Debouncer::spawn(detector, quiet);
    let mut results = debouncer.subscribe();
    let mut lines = input.lines();
    let mut document = String::new();
    let mut printed = 0u64;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                let detection = results.borrow_and_update().clone();
                write_detection(&mut output, &detection).await?;
                printed = detection.revision;
            }
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !document.is_empty() {
                        document.push('\n');
                    }
                    document.push_str(&line);
                    debouncer.update(document.clone())?;
                }
                None => break,
            },
        }
    }

    let last = debouncer.finish().await?;
    if last.revision > printed {
        write_detection(&mut output, &last).await?;
    }
    output.flush().await?;
    tracing::info!(revision = last.revision, claims = last.claims.len(), "detect.follow.done");
    Ok(last)
}

async fn write_detection<W: AsyncWrite + Unpin>(output: &mut W, detection: &Detection) -> Result<()> {
    let mut line = json!({
        "revision": detection.revision,
        "claims": detection.claims,
    })
    .to_string();
    line.push('\n');
    output.write_all(line.as_bytes()).await?;
    Ok(())
}

//! Keep-alive engagement while synthesis runs.
//!
//! The loop samples on a fixed interval and speaks at most the two distinct
//! filler utterances, at the first two sampling points where synthesis is
//! still pending. After the second filler it goes silent and only waits for
//! cancellation: the shared token fires the instant synthesis completes,
//! fails, times out, or the context closes.

use chorus_core::persona::ENGAGEMENT_FILLERS;
use chorus_core::ports::{SessionHandle, SessionPort};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub(crate) async fn run(
    session: Arc<dyn SessionPort>,
    handle: SessionHandle,
    cancel: CancellationToken,
    interval: Duration,
) {
    let mut spoken = 0usize;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
        if cancel.is_cancelled() {
            return;
        }
        if spoken >= ENGAGEMENT_FILLERS.len() {
            // Budget spent; stay silent until the shared scope ends.
            cancel.cancelled().await;
            return;
        }
        let filler = ENGAGEMENT_FILLERS[spoken];
        spoken += 1;
        tracing::debug!(target: "engagement", attempt = spoken, "speaking filler");
        if let Err(e) = session.speak(&handle, filler).await {
            tracing::warn!(target: "engagement", error = %e, "filler utterance failed");
        }
    }
}

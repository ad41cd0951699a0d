//! Paced streaming delivery of envelope values
//!
//! The audio path feeds a live playback device, so envelope values are
//! published one window at a time at the target frame rate instead of all
//! at once. Delivery uses a `tokio::sync::watch` channel: a single-slot
//! overwrite cell where a value produced between two frame ticks and never
//! read is dropped, never queued (last-value-wins).

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use omote_core::{OmoteError, OmoteResult};

use crate::{AudioFormat, EnvelopeExtractor};

/// How a paced stream finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Every window was published
    Completed { windows: usize },
    /// Cancellation was observed; unprocessed windows were discarded
    Cancelled { windows: usize },
    /// The receiving side went away; remaining windows were discarded
    ReceiverDropped { windows: usize },
}

impl StreamOutcome {
    /// Number of windows published before the stream ended
    pub fn windows(&self) -> usize {
        match *self {
            StreamOutcome::Completed { windows }
            | StreamOutcome::Cancelled { windows }
            | StreamOutcome::ReceiverDropped { windows } => windows,
        }
    }
}

/// Detached cancellation handle for a paced stream.
///
/// Cheap to clone and share; the session holding the receiving end keeps
/// one so a destroyed session can stop its stream mid-extraction.
#[derive(Clone)]
pub struct EnvelopeCancel(Arc<watch::Sender<bool>>);

impl EnvelopeCancel {
    /// Signal cooperative cancellation
    pub fn cancel(&self) {
        let _ = self.0.send(true);
    }
}

/// Handle to a running paced stream
pub struct EnvelopeTask {
    handle: JoinHandle<StreamOutcome>,
    cancel: EnvelopeCancel,
}

impl EnvelopeTask {
    /// Signal cooperative cancellation. The task stops within one window's
    /// pacing delay.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A detachable cancellation handle
    pub fn cancel_handle(&self) -> EnvelopeCancel {
        self.cancel.clone()
    }

    /// Await stream completion
    pub async fn join(self) -> OmoteResult<StreamOutcome> {
        self.handle
            .await
            .map_err(|e| OmoteError::Teardown(format!("envelope task panicked: {e}")))
    }

    /// Cancel and await in one step
    pub async fn cancel_and_join(self) -> OmoteResult<StreamOutcome> {
        self.cancel();
        self.join().await
    }
}

/// Spawn a task that extracts the envelope of `pcm` and publishes one
/// value per window through `tx`, sleeping one window stride between
/// publishes to match real-time playback.
///
/// Must be called from within a tokio runtime. The format is validated
/// before the task is spawned, so a contract violation fails fast here
/// rather than inside the task.
pub fn spawn_paced(
    extractor: EnvelopeExtractor,
    pcm: Vec<u8>,
    format: AudioFormat,
    tx: watch::Sender<f32>,
) -> OmoteResult<EnvelopeTask> {
    format.validate()?;

    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        // Validated above; re-deriving the iterator inside the task keeps
        // the spawn signature by-value.
        let iter = match extractor.ingest(&pcm, format) {
            Ok(iter) => iter,
            Err(e) => {
                warn!(error = %e, "envelope stream failed to start");
                return StreamOutcome::Completed { windows: 0 };
            }
        };

        let pace = iter.stride_duration();
        let mut windows = 0usize;

        for sample in iter {
            if *cancel_rx.borrow() {
                debug!(windows, "envelope stream cancelled");
                return StreamOutcome::Cancelled { windows };
            }

            if tx.send(sample.value).is_err() {
                debug!(windows, "envelope receiver dropped");
                return StreamOutcome::ReceiverDropped { windows };
            }
            windows += 1;

            tokio::select! {
                biased;
                changed = cancel_rx.changed() => {
                    match changed {
                        Ok(()) if *cancel_rx.borrow() => {
                            debug!(windows, "envelope stream cancelled");
                            return StreamOutcome::Cancelled { windows };
                        }
                        Ok(()) => {}
                        // Every cancel handle is gone; keep pacing
                        Err(_) => tokio::time::sleep(pace).await,
                    }
                }
                _ = tokio::time::sleep(pace) => {}
            }
        }

        debug!(windows, "envelope stream completed");
        StreamOutcome::Completed { windows }
    });

    Ok(EnvelopeTask {
        handle,
        cancel: EnvelopeCancel(Arc::new(cancel_tx)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvelopeConfig;

    fn loud_pcm(seconds: f64, sample_rate: u32) -> Vec<u8> {
        let n = (seconds * sample_rate as f64) as usize;
        (0..n)
            .flat_map(|_| 8192i16.to_le_bytes())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_completes_and_publishes() {
        let format = AudioFormat::new(16000, 1);
        let (tx, rx) = watch::channel(0.0f32);

        let task = spawn_paced(
            EnvelopeExtractor::new(EnvelopeConfig::default()),
            loud_pcm(0.5, 16000),
            format,
            tx,
        )
        .unwrap();

        let outcome = task.join().await.unwrap();
        assert!(matches!(outcome, StreamOutcome::Completed { .. }));
        assert!(outcome.windows() > 0);
        // Last-value-wins: the receiver observes the final published value
        assert_eq!(*rx.borrow(), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_promptly() {
        let format = AudioFormat::new(16000, 1);
        let (tx, _rx) = watch::channel(0.0f32);

        let task = spawn_paced(
            EnvelopeExtractor::new(EnvelopeConfig::default()),
            loud_pcm(10.0, 16000),
            format,
            tx,
        )
        .unwrap();

        let outcome = task.cancel_and_join().await.unwrap();
        let windows = match outcome {
            StreamOutcome::Cancelled { windows } => windows,
            other => panic!("expected cancellation, got {other:?}"),
        };
        // Bounded by one window's latency: far fewer than the ~900
        // windows a 10 s buffer holds
        assert!(windows <= 2, "published {windows} windows after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn test_receiver_drop_ends_stream() {
        let format = AudioFormat::new(16000, 1);
        let (tx, rx) = watch::channel(0.0f32);
        drop(rx);

        let task = spawn_paced(
            EnvelopeExtractor::new(EnvelopeConfig::default()),
            loud_pcm(1.0, 16000),
            format,
            tx,
        )
        .unwrap();

        let outcome = task.join().await.unwrap();
        assert!(matches!(outcome, StreamOutcome::ReceiverDropped { .. }));
    }

    #[test]
    fn test_invalid_format_fails_before_spawn() {
        // No runtime: spawn_paced must reject the format before spawning
        let (tx, _rx) = watch::channel(0.0f32);
        let err = spawn_paced(
            EnvelopeExtractor::default(),
            Vec::new(),
            AudioFormat::new(0, 1),
            tx,
        );
        assert!(err.is_err());
    }
}

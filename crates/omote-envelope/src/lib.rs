//! Omote Envelope - PCM amplitude to lip-sync intensity
//!
//! Transforms a raw 16-bit PCM buffer into a time series of mouth-openness
//! values in `[0.0, 1.0]`:
//!
//! 1. Window the signal at the target frame rate (default 90 windows per
//!    second of audio) with 25% overlap to smooth frame-to-frame jitter.
//! 2. Per window: normalized RMS, hard silence gate, linear normalization
//!    against a speech ceiling, power-curve enhancement, and logistic
//!    reshaping.
//!
//! Two delivery modes:
//! - [`EnvelopeExtractor::ingest`] - lazy batch iterator over a whole buffer.
//! - [`spawn_paced`] - tokio task that publishes values one window at a
//!   time through a single-slot overwrite (`watch`) channel, paced to the
//!   target rate and cooperatively cancellable.

pub mod extractor;
pub mod stream;

pub use extractor::*;
pub use stream::*;

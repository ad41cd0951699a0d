//! Omote avatar demo
//!
//! Composition root wiring the pipeline crates together against a
//! console-backed animation model: one registry, one session, a paced
//! lip-sync stream over synthesized speech, a simulated drag gesture,
//! and a 60 Hz frame loop for a couple of seconds.

mod backend;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use omote_core::{PlatformContext, Vec2, PARAM_MOUTH_OPEN_Y};
use omote_envelope::{AudioFormat, EnvelopeExtractor};
use omote_session::InstanceRegistry;

use backend::ConsoleBackend;

const SAMPLE_RATE: u32 = 16_000;
const FRAME_DT: f32 = 1.0 / 60.0;

/// Two seconds of speech-like PCM: a tone with a syllable-rate envelope
fn synthesized_speech() -> Vec<u8> {
    let n = SAMPLE_RATE as usize * 2;
    let mut pcm = Vec::with_capacity(n * 2);
    for i in 0..n {
        let t = i as f64 / SAMPLE_RATE as f64;
        let carrier = (2.0 * std::f64::consts::PI * 140.0 * t).sin();
        let envelope = 0.5 + 0.5 * (2.0 * std::f64::consts::PI * 3.0 * t).sin();
        let sample = (carrier * envelope * 0.2 * 32767.0) as i16;
        pcm.extend_from_slice(&sample.to_le_bytes());
    }
    pcm
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let backend = Arc::new(ConsoleBackend::default());
    let registry = InstanceRegistry::new(backend.clone());
    let ctx = PlatformContext::new(1080, 1920, 2.0);

    assert!(registry.create_instance("demo", &ctx));
    registry.activate_instance("demo");
    info!(count = registry.count(), "registry ready");

    let task = registry
        .stream_lip_sync(
            "demo",
            EnvelopeExtractor::default(),
            synthesized_speech(),
            AudioFormat::new(SAMPLE_RATE, 1),
        )
        .expect("session exists");

    // Simulated drag: pointer lands, sweeps right, lifts
    let _ = registry.with_instance("demo", |session| {
        session.gesture_mut().begin(Vec2::new(540.0, 960.0), None);
        session.gesture_mut().move_to(Vec2::new(700.0, 960.0), None);
        session.set_dragging(0.6, 0.1);
    });

    // 2.5 s frame loop at 60 Hz
    for frame in 0..150 {
        registry.tick_active(FRAME_DT);

        if frame % 15 == 0 {
            let mouth = backend.last_value(PARAM_MOUTH_OPEN_Y).unwrap_or(0.0);
            info!(frame, mouth, "frame");
        }
        if frame == 90 {
            let _ = registry.with_instance("demo", |session| session.on_touch_end());
        }

        tokio::time::sleep(Duration::from_secs_f32(FRAME_DT)).await;
    }

    let outcome = task.join().await.expect("stream joins");
    info!(windows = outcome.windows(), ?outcome, "lip-sync stream finished");

    registry.dispose_all();
    info!("disposed");
}

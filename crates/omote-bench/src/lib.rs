//! Shared helpers for the Omote benchmark suite

use rand::Rng;

/// Synthesize `seconds` of speech-like PCM: a low-frequency tone with
/// amplitude modulation and noise, landing mostly in the extractor's
/// mid-range rather than the gate or the ceiling.
pub fn speech_like_pcm(seconds: f64, sample_rate: u32) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let n = (seconds * sample_rate as f64) as usize;
    let mut pcm = Vec::with_capacity(n * 2);

    for i in 0..n {
        let t = i as f64 / sample_rate as f64;
        // 140 Hz carrier, 3 Hz syllable-rate envelope
        let carrier = (2.0 * std::f64::consts::PI * 140.0 * t).sin();
        let envelope = 0.5 + 0.5 * (2.0 * std::f64::consts::PI * 3.0 * t).sin();
        let noise: f64 = rng.gen_range(-0.05..0.05);
        let sample = ((carrier * envelope * 0.15 + noise) * 32767.0) as i16;
        pcm.extend_from_slice(&sample.to_le_bytes());
    }

    pcm
}

/// A wandering pointer path for gesture benchmarks
pub fn pointer_path(steps: usize) -> Vec<(f32, f32)> {
    let mut rng = rand::thread_rng();
    let mut x = 540.0f32;
    let mut y = 960.0f32;
    let mut path = Vec::with_capacity(steps);

    for _ in 0..steps {
        x += rng.gen_range(-15.0..15.0);
        y += rng.gen_range(-15.0..15.0);
        path.push((x, y));
    }

    path
}

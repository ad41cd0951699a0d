//! Batch envelope extraction over a PCM buffer

use std::time::Duration;

use bytes::Buf;

use omote_core::{OmoteError, OmoteResult};

/// Envelope tuning parameters.
///
/// The defaults are calibrated for conversational speech at typical
/// capture levels; they are the contract constants, not free knobs, and
/// changing them changes the perceptual character of the mouth animation.
#[derive(Debug, Clone)]
pub struct EnvelopeConfig {
    /// Windows produced per second of audio
    pub target_frame_rate: u32,
    /// RMS below this maps to exactly 0.0 (hard gate, no jitter on
    /// near-silence)
    pub silence_threshold: f32,
    /// RMS at or above this maps to a normalized value of 1.0
    pub ceiling_rms: f32,
    /// Power-curve exponent emphasizing low-to-mid amplitudes
    pub enhancement_exponent: f32,
    /// Gain applied after the power curve; lets the intermediate value
    /// exceed 1.0 before the logistic stage
    pub enhancement_gain: f32,
    /// Logistic slope
    pub sigmoid_slope: f32,
    /// Logistic midpoint
    pub sigmoid_midpoint: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        EnvelopeConfig {
            target_frame_rate: 90,
            silence_threshold: 0.003,
            ceiling_rms: 0.15,
            enhancement_exponent: 0.3,
            enhancement_gain: 2.0,
            sigmoid_slope: 8.0,
            sigmoid_midpoint: 0.3,
        }
    }
}

/// PCM buffer format description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Samples per second per channel
    pub sample_rate: u32,
    /// 1 (mono) or 2 (stereo, interleaved)
    pub channels: u16,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        AudioFormat {
            sample_rate,
            channels,
        }
    }

    /// Reject formats the extractor cannot window
    pub fn validate(&self) -> OmoteResult<()> {
        if self.sample_rate == 0 {
            return Err(OmoteError::InvalidAudioFormat(
                "sample rate must be positive".to_string(),
            ));
        }
        if self.channels == 0 || self.channels > 2 {
            return Err(OmoteError::InvalidAudioFormat(format!(
                "unsupported channel count {}",
                self.channels
            )));
        }
        Ok(())
    }
}

/// One smoothed lip-sync value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSample {
    /// Offset of the window start from the beginning of the buffer
    pub offset: Duration,
    /// Mouth openness in `[0.0, 1.0]`
    pub value: f32,
}

/// Map one window's RMS to a lip-sync value.
///
/// gate → normalize → enhance → logistic → clamp. Pure; exposed for the
/// streaming path and for property tests.
pub fn lip_sync_value(rms: f32, config: &EnvelopeConfig) -> f32 {
    if rms < config.silence_threshold {
        return 0.0;
    }

    let normalized = ((rms - config.silence_threshold)
        / (config.ceiling_rms - config.silence_threshold))
        .clamp(0.0, 1.0);

    let enhanced = normalized.powf(config.enhancement_exponent) * config.enhancement_gain;

    let sigmoid =
        enhanced / (1.0 + (-config.sigmoid_slope * (enhanced - config.sigmoid_midpoint)).exp());

    sigmoid.clamp(0.0, 1.0)
}

/// Batch envelope extractor.
///
/// Stateless between calls: each `ingest` windows the given buffer from
/// scratch (batch semantics; a streamed microphone path holds one
/// extractor per stream and feeds it stride-aligned chunks).
#[derive(Debug, Clone, Default)]
pub struct EnvelopeExtractor {
    config: EnvelopeConfig,
}

impl EnvelopeExtractor {
    pub fn new(config: EnvelopeConfig) -> Self {
        EnvelopeExtractor { config }
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Window a little-endian 16-bit PCM buffer into a lazy sequence of
    /// envelope samples.
    ///
    /// Zero-length input yields an empty iterator. Stereo input is
    /// de-interleaved and channel-averaged before windowing; an odd
    /// trailing byte (or trailing half-frame) is ignored.
    pub fn ingest(&self, pcm: &[u8], format: AudioFormat) -> OmoteResult<EnvelopeIter> {
        format.validate()?;

        let samples = decode_mono(pcm, format.channels);

        let samples_per_window = (format.sample_rate / self.config.target_frame_rate).max(1) as usize;
        let stride = (samples_per_window - samples_per_window / 4).max(1);

        Ok(EnvelopeIter {
            config: self.config.clone(),
            samples,
            sample_rate: format.sample_rate,
            samples_per_window,
            stride,
            pos: 0,
        })
    }
}

/// Decode interleaved LE i16 PCM to normalized mono `[-1.0, 1.0]` samples
fn decode_mono(pcm: &[u8], channels: u16) -> Vec<f32> {
    let mut buf = pcm;
    let frame_bytes = 2 * channels as usize;
    let frames = pcm.len() / frame_bytes;
    let mut samples = Vec::with_capacity(frames);

    while buf.remaining() >= frame_bytes {
        let mut acc = 0.0f32;
        for _ in 0..channels {
            acc += buf.get_i16_le() as f32 / 32768.0;
        }
        samples.push(acc / channels as f32);
    }

    samples
}

/// Lazy window iterator produced by [`EnvelopeExtractor::ingest`]
#[derive(Debug)]
pub struct EnvelopeIter {
    config: EnvelopeConfig,
    samples: Vec<f32>,
    sample_rate: u32,
    samples_per_window: usize,
    stride: usize,
    pos: usize,
}

impl EnvelopeIter {
    /// Window length in samples
    pub fn samples_per_window(&self) -> usize {
        self.samples_per_window
    }

    /// Window advance in samples (75% of the window length)
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Wall-clock spacing between successive windows
    pub fn stride_duration(&self) -> Duration {
        Duration::from_secs_f64(self.stride as f64 / self.sample_rate as f64)
    }
}

impl Iterator for EnvelopeIter {
    type Item = EnvelopeSample;

    fn next(&mut self) -> Option<EnvelopeSample> {
        if self.pos >= self.samples.len() {
            return None;
        }

        let end = (self.pos + self.samples_per_window).min(self.samples.len());
        let window = &self.samples[self.pos..end];

        let mean_square: f32 =
            window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32;
        let rms = mean_square.sqrt();

        let sample = EnvelopeSample {
            offset: Duration::from_secs_f64(self.pos as f64 / self.sample_rate as f64),
            value: lip_sync_value(rms, &self.config),
        };

        self.pos += self.stride;
        Some(sample)
    }
}

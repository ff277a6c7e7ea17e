use std::sync::Arc;
use std::time::Duration;

use rodio::Source;
use serde::{Deserialize, Serialize};

pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// Recipe for one synthesized cue: a base waveform shaped by an exponential
/// decay envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub freq_hz: f32,
    pub duration_ms: u64,
    /// Envelope decay rate per second; higher dies away faster.
    pub decay: f32,
}

/// Render the full sample buffer for a spec. Cues are tens to hundreds of
/// milliseconds, so buffers stay small enough to pre-generate at startup.
pub fn render(spec: &ToneSpec) -> Vec<f32> {
    let total = (SAMPLE_RATE as u64 * spec.duration_ms / 1000) as usize;
    let mut samples = Vec::with_capacity(total);
    for n in 0..total {
        let t = n as f32 / SAMPLE_RATE as f32;
        let phase = (spec.freq_hz * t).fract();
        let raw = match spec.waveform {
            Waveform::Sine => (std::f32::consts::TAU * spec.freq_hz * t).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        };
        let envelope = (-spec.decay * t).exp();
        samples.push(raw * envelope * 0.35);
    }
    samples
}

/// One-shot playback source over a pre-rendered buffer. The buffer is shared,
/// so every playback is a fresh cursor over the same samples.
pub struct ToneSource {
    samples: Arc<Vec<f32>>,
    position: usize,
}

impl ToneSource {
    pub fn new(samples: Arc<Vec<f32>>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.samples.get(self.position).copied()?;
        self.position += 1;
        Some(sample)
    }
}

impl Source for ToneSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.position)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(
            self.samples.len() as u64 * 1000 / SAMPLE_RATE as u64,
        ))
    }
}

use super::{GestureConfig, GesturePayload, MotionSample};

/// Shake detection over accelerometer samples. The host forwards raw device
/// motion; samples arriving faster than the configured gap are dropped, which
/// both smooths jitter and debounces repeated emissions.
pub struct ShakeDetector {
    threshold: f64,
    sample_gap_ms: u64,
    last: Option<Accepted>,
}

struct Accepted {
    magnitude: f64,
    at_ms: u64,
}

impl ShakeDetector {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            threshold: config.shake_threshold,
            sample_gap_ms: config.shake_sample_gap_ms,
            last: None,
        }
    }

    pub fn push(&mut self, sample: MotionSample) -> Option<GesturePayload> {
        let magnitude = sample.ax + sample.ay + sample.az;

        let Some(last) = &self.last else {
            self.last = Some(Accepted {
                magnitude,
                at_ms: sample.at_ms,
            });
            return None;
        };

        let dt_ms = sample.at_ms.saturating_sub(last.at_ms);
        if dt_ms < self.sample_gap_ms {
            return None;
        }

        let speed = (magnitude - last.magnitude).abs() / dt_ms as f64 * 10_000.0;
        self.last = Some(Accepted {
            magnitude,
            at_ms: sample.at_ms,
        });

        if speed > self.threshold {
            Some(GesturePayload::Shake { speed })
        } else {
            None
        }
    }
}

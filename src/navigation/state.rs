use serde::{Deserialize, Serialize};

use crate::models::NavDirection;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    Stopped,
    Playing,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        PlaybackStatus::Stopped
    }
}

/// The slide-index state machine. Pure bookkeeping; scheduling and side
/// effects live in the controller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub status: PlaybackStatus,
    pub current_slide: usize,
    pub direction: NavDirection,
    /// Seconds until autoplay advances, counted down once per tick.
    pub time_left: u32,
    /// How far through the current slide's dwell time we are, 0-100.
    pub progress: f64,
    #[serde(skip)]
    durations: Vec<u32>,
}

/// What one autoplay tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Ticked { time_left: u32, progress: f64 },
    Elapsed,
}

impl NavigationState {
    pub fn new(durations: Vec<u32>) -> Self {
        let mut state = Self {
            status: PlaybackStatus::Stopped,
            current_slide: 0,
            direction: NavDirection::Forward,
            time_left: 0,
            progress: 0.0,
            durations,
        };
        state.reset_timer();
        state
    }

    pub fn slide_count(&self) -> usize {
        self.durations.len()
    }

    /// Configured dwell seconds for a slide, clamped to at least one so the
    /// progress math never divides by zero.
    pub fn duration_of(&self, index: usize) -> u32 {
        self.durations.get(index).copied().unwrap_or(1).max(1)
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Restart the countdown for the slide we are on.
    pub fn reset_timer(&mut self) {
        self.time_left = self.duration_of(self.current_slide);
        self.progress = 0.0;
    }

    /// One second elapsed. Decrements the countdown and recomputes progress;
    /// the caller advances the deck on [`TickOutcome::Elapsed`].
    pub fn tick(&mut self) -> TickOutcome {
        let duration = self.duration_of(self.current_slide);
        self.time_left = self.time_left.saturating_sub(1);
        self.progress = f64::from(duration - self.time_left) / f64::from(duration) * 100.0;
        if self.time_left == 0 {
            TickOutcome::Elapsed
        } else {
            TickOutcome::Ticked {
                time_left: self.time_left,
                progress: self.progress,
            }
        }
    }
}

mod circle;
mod clicks;
mod keys;
mod motion;
mod swipe;

pub use circle::CircleTracker;
pub use clicks::ClickTracker;
pub use keys::KeySequenceMatcher;
pub use motion::ShakeDetector;
pub use swipe::SwipeTracker;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::NavDirection;

/// Which visual element an input landed on. Some recognizers only listen on
/// slide titles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TargetClass {
    Title,
    Stage,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
    /// Host-supplied monotonic timestamp in milliseconds.
    pub at_ms: u64,
    pub target: TargetClass,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
    pub at_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    /// Raw key code, e.g. "ArrowUp" or "KeyB".
    pub code: String,
    /// The typed character, when the key produces one.
    #[serde(default)]
    pub ch: Option<char>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionSample {
    pub ax: f64,
    pub ay: f64,
    pub az: f64,
    pub at_ms: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum GestureKind {
    Swipe,
    DoubleClick,
    LongPress,
    RapidClick,
    Shake,
    CircleGesture,
    KeystrokeMatch,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::Swipe => "swipe",
            GestureKind::DoubleClick => "double_click",
            GestureKind::LongPress => "long_press",
            GestureKind::RapidClick => "rapid_click",
            GestureKind::Shake => "shake",
            GestureKind::CircleGesture => "circle_gesture",
            GestureKind::KeystrokeMatch => "keystroke_match",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum GesturePayload {
    Swipe {
        direction: NavDirection,
        offset_x: f64,
        velocity_x: f64,
    },
    DoubleClick,
    LongPress {
        held_ms: u64,
    },
    RapidClick {
        count: u32,
    },
    Shake {
        speed: f64,
    },
    CircleGesture {
        total_angle_deg: f64,
    },
    KeystrokeMatch {
        sequence: String,
    },
}

impl GesturePayload {
    pub fn kind(&self) -> GestureKind {
        match self {
            GesturePayload::Swipe { .. } => GestureKind::Swipe,
            GesturePayload::DoubleClick => GestureKind::DoubleClick,
            GesturePayload::LongPress { .. } => GestureKind::LongPress,
            GesturePayload::RapidClick { .. } => GestureKind::RapidClick,
            GesturePayload::Shake { .. } => GestureKind::Shake,
            GesturePayload::CircleGesture { .. } => GestureKind::CircleGesture,
            GesturePayload::KeystrokeMatch { .. } => GestureKind::KeystrokeMatch,
        }
    }
}

/// A recognized gesture, stamped with the slide it happened on.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureEvent {
    pub at: DateTime<Utc>,
    pub slide_index: usize,
    pub payload: GesturePayload,
}

impl GestureEvent {
    pub fn kind(&self) -> GestureKind {
        self.payload.kind()
    }
}

/// Tunable recognition thresholds. Defaults match the shipped presentation;
/// hosts with unusual input hardware can loosen them.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Release offset that commits a swipe, in pixels.
    pub swipe_offset_px: f64,
    /// Release velocity that commits a swipe, in pixels per second.
    pub swipe_velocity_px_s: f64,
    /// Fraction of the raw drag the host should render, for the elastic feel.
    pub swipe_resistance: f64,
    /// Drags shorter than this still count as clicks.
    pub click_slop_px: f64,
    pub long_press_ms: u64,
    /// Maximum gap between clicks that keeps a rapid run alive.
    pub rapid_gap_ms: u64,
    pub rapid_count: u32,
    pub shake_threshold: f64,
    /// Motion samples closer together than this are dropped.
    pub shake_sample_gap_ms: u64,
    pub circle_points: usize,
    pub circle_window_ms: u64,
    pub circle_min_angle_deg: f64,
    pub key_buffer: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_offset_px: 100.0,
            swipe_velocity_px_s: 500.0,
            swipe_resistance: 0.35,
            click_slop_px: 8.0,
            long_press_ms: 3000,
            rapid_gap_ms: 300,
            rapid_count: 10,
            shake_threshold: 15.0,
            shake_sample_gap_ms: 100,
            circle_points: 5,
            circle_window_ms: 3000,
            circle_min_angle_deg: 270.0,
            key_buffer: 10,
        }
    }
}

/// One facade over all recognizers, fed by the engine's input methods.
/// Each feed is a cheap, non-blocking append to a small rolling buffer.
pub struct GestureProcessor {
    config: GestureConfig,
    swipe: SwipeTracker,
    clicks: ClickTracker,
    shake: ShakeDetector,
    circle: CircleTracker,
    keys: KeySequenceMatcher,
}

impl GestureProcessor {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            swipe: SwipeTracker::new(&config),
            clicks: ClickTracker::new(&config),
            shake: ShakeDetector::new(&config),
            circle: CircleTracker::new(&config),
            keys: KeySequenceMatcher::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn pointer_down(&mut self, input: &PointerInput) -> Vec<GesturePayload> {
        self.swipe.begin(input);
        self.clicks.press(input.at_ms, input.target);
        Vec::new()
    }

    pub fn pointer_move(&mut self, input: &PointerInput) -> Vec<GesturePayload> {
        self.swipe.update(input);
        self.clicks.poll_long_press(input.at_ms).into_iter().collect()
    }

    pub fn pointer_up(&mut self, input: &PointerInput) -> Vec<GesturePayload> {
        let mut out = Vec::new();

        let drag_offset = self.swipe.pending_offset(input);
        if let Some(long_press) = self.clicks.release(input.at_ms) {
            out.push(long_press);
        } else if drag_offset.abs() <= self.config.click_slop_px {
            if let Some(rapid) = self.clicks.click(input.at_ms) {
                out.push(rapid);
            }
        }

        if let Some(swipe) = self.swipe.release(input) {
            out.push(swipe);
        }

        out
    }

    pub fn pointer_leave(&mut self) {
        self.swipe.cancel();
        self.clicks.cancel_press();
    }

    pub fn double_click(&mut self, target: TargetClass) -> Option<GesturePayload> {
        self.clicks.double_click(target)
    }

    /// Used by the engine's long-press timer to fire while the pointer is
    /// still held.
    pub fn force_long_press(&mut self) -> Option<GesturePayload> {
        self.clicks.force_long_press()
    }

    pub fn touch_point(&mut self, point: TouchPoint) -> Option<GesturePayload> {
        self.circle.push(point)
    }

    pub fn motion_sample(&mut self, sample: MotionSample) -> Option<GesturePayload> {
        self.shake.push(sample)
    }

    pub fn key_input(&mut self, input: &KeyInput) -> Option<GesturePayload> {
        self.keys.push(input)
    }
}

mod catalog;
mod registry;

pub use catalog::default_catalog;
pub use registry::{EggRegistry, EggSummary};

use serde::Serialize;

use crate::gestures::GesturePayload;

/// What unlocks an egg. Keystroke sequences carry the matched sequence name
/// from the recognizer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EggTrigger {
    KeySequence(&'static str),
    RapidClicks,
    Shake,
    CircleGesture,
    DoubleClickTitle,
    LongPressTitle,
}

/// Description of a visual effect for the host renderer to apply and revert.
/// The engine never touches the host surface; it only hands these out and
/// signals when they end.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "effect")]
pub enum EffectSpec {
    ConfettiBurst { particle_count: u32 },
    MatrixRain { glyph_density: f64 },
    RainbowTheme,
    ClockOverlay,
    ScreenShake { intensity: f64 },
    SpiralWarp { rotations: f64 },
    DiscoStrobe { bpm: u32 },
    SecretMessage { text: String },
    /// Flips the session into random transition selection for the effect
    /// window.
    TransitionShuffle,
    RetroMode,
}

/// One catalog entry. `slide_specific` restricts the trigger to a single
/// slide index; triggers on other slides are ignored.
#[derive(Debug, Clone)]
pub struct EggDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub trigger: EggTrigger,
    pub slide_specific: Option<usize>,
    pub effect: EffectSpec,
}

impl EggDef {
    pub fn matches(&self, payload: &GesturePayload) -> bool {
        match (&self.trigger, payload) {
            (EggTrigger::KeySequence(name), GesturePayload::KeystrokeMatch { sequence }) => {
                name == sequence
            }
            (EggTrigger::RapidClicks, GesturePayload::RapidClick { .. }) => true,
            (EggTrigger::Shake, GesturePayload::Shake { .. }) => true,
            (EggTrigger::CircleGesture, GesturePayload::CircleGesture { .. }) => true,
            (EggTrigger::DoubleClickTitle, GesturePayload::DoubleClick) => true,
            (EggTrigger::LongPressTitle, GesturePayload::LongPress { .. }) => true,
            _ => false,
        }
    }
}

mod catalog;

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::models::NavDirection;

/// The ten named transition animations between slides.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TransitionVariant {
    Slide,
    Fade,
    Zoom,
    Flip,
    Cube,
    Spiral,
    Wave,
    Dissolve,
    Curtain,
    Origami,
}

impl TransitionVariant {
    pub const ALL: [TransitionVariant; 10] = [
        TransitionVariant::Slide,
        TransitionVariant::Fade,
        TransitionVariant::Zoom,
        TransitionVariant::Flip,
        TransitionVariant::Cube,
        TransitionVariant::Spiral,
        TransitionVariant::Wave,
        TransitionVariant::Dissolve,
        TransitionVariant::Curtain,
        TransitionVariant::Origami,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionVariant::Slide => "slide",
            TransitionVariant::Fade => "fade",
            TransitionVariant::Zoom => "zoom",
            TransitionVariant::Flip => "flip",
            TransitionVariant::Cube => "cube",
            TransitionVariant::Spiral => "spiral",
            TransitionVariant::Wave => "wave",
            TransitionVariant::Dissolve => "dissolve",
            TransitionVariant::Curtain => "curtain",
            TransitionVariant::Origami => "origami",
        }
    }
}

impl fmt::Display for TransitionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionVariant {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TransitionVariant::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_str() == value)
            .ok_or_else(|| anyhow!("unknown transition variant '{value}'"))
    }
}

impl Default for TransitionVariant {
    fn default() -> Self {
        TransitionVariant::Slide
    }
}

/// One animation pose. Translations are percentages of the stage size,
/// rotation and skew are degrees, blur is pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotate: f64,
    pub blur: f64,
    pub opacity: f64,
    pub skew: f64,
}

impl Pose {
    pub fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotate: 0.0,
            blur: 0.0,
            opacity: 1.0,
            skew: 0.0,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingProfile {
    pub duration_ms: u64,
    pub easing: CubicBezier,
}

/// The full description of one slide change, ready for the host renderer:
/// where the incoming slide starts, where it rests, where the outgoing
/// slide leaves, and how the movement is timed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionSpec {
    pub variant: TransitionVariant,
    pub enter: Pose,
    pub center: Pose,
    pub exit: Pose,
    pub timing: TimingProfile,
}

/// Selection precedence: slide-forced variant, then the session selection,
/// then a uniformly random variant when random mode is on.
pub fn select_variant(
    forced: Option<TransitionVariant>,
    selected: TransitionVariant,
    random_enabled: bool,
) -> TransitionVariant {
    if let Some(variant) = forced {
        return variant;
    }
    if random_enabled {
        return TransitionVariant::ALL
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(selected);
    }
    selected
}

/// Build the pose/timing description for a variant, mirrored by travel
/// direction so going backward reverses the motion.
pub fn spec_for(variant: TransitionVariant, direction: NavDirection) -> TransitionSpec {
    let sign = f64::from(direction.sign());
    TransitionSpec {
        variant,
        enter: catalog::enter_pose(variant, sign),
        center: Pose::identity(),
        exit: catalog::exit_pose(variant, sign),
        timing: catalog::timing(variant),
    }
}

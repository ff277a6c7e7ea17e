use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transitions::TransitionVariant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NavDirection {
    Forward,
    Backward,
}

impl NavDirection {
    pub fn sign(self) -> i32 {
        match self {
            NavDirection::Forward => 1,
            NavDirection::Backward => -1,
        }
    }

    pub fn from_sign(sign: i64) -> Self {
        if sign < 0 {
            NavDirection::Backward
        } else {
            NavDirection::Forward
        }
    }
}

impl Default for NavDirection {
    fn default() -> Self {
        NavDirection::Forward
    }
}

/// Host-facing snapshot of a running presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSession {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub current_slide: usize,
    pub direction: NavDirection,
    pub is_playing: bool,
    pub time_left: u32,
    pub progress: f64,
    pub sound_enabled: bool,
    pub transition: TransitionVariant,
    pub random_transitions: bool,
}

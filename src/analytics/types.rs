use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gestures::GestureKind;
use crate::transitions::TransitionVariant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DeviceClass {
    Desktop,
    Tablet,
    Mobile,
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// One closed slide visit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DwellSample {
    pub slide_index: usize,
    pub dwell_ms: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    pub cpu_percent: f32,
    pub memory_mb: f64,
}

/// Everything measured over one presentation session, finalized at close.
/// Never persisted; the host forwards it to whatever sink it likes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub total_slides: usize,
    pub slides_viewed: Vec<usize>,
    pub dwell_samples: Vec<DwellSample>,
    /// Gesture kinds in first-use order.
    pub gestures_used: Vec<GestureKind>,
    /// Easter-egg ids in discovery order.
    pub eggs_discovered: Vec<String>,
    pub transitions_used: Vec<TransitionVariant>,
    pub device_class: DeviceClass,
    pub orientation: Orientation,
    pub interaction_count: u64,
    pub average_slide_time_ms: f64,
    pub skip_rate: f64,
    pub completion_rate: f64,
    pub performance: PerformanceSample,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementInsights {
    pub slides_viewed: usize,
    pub total_slides: usize,
    pub completion_rate: f64,
    pub average_slide_time_ms: f64,
    pub total_view_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryInsights {
    pub eggs_found: usize,
    pub eggs: Vec<String>,
    pub gesture_variety: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorInsights {
    pub interaction_count: u64,
    pub skip_rate: f64,
    pub transitions_used: Vec<TransitionVariant>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInsights {
    pub cpu_percent: f32,
    pub memory_mb: f64,
    pub session_ms: i64,
}

/// Grouped view over a finalized report for external consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub engagement: EngagementInsights,
    pub discovery: DiscoveryInsights,
    pub behavior: BehaviorInsights,
    pub performance: PerformanceInsights,
}

impl SessionReport {
    pub fn insights(&self) -> Insights {
        Insights {
            engagement: EngagementInsights {
                slides_viewed: self.slides_viewed.len(),
                total_slides: self.total_slides,
                completion_rate: self.completion_rate,
                average_slide_time_ms: self.average_slide_time_ms,
                total_view_ms: self.dwell_samples.iter().map(|s| s.dwell_ms).sum(),
            },
            discovery: DiscoveryInsights {
                eggs_found: self.eggs_discovered.len(),
                eggs: self.eggs_discovered.clone(),
                gesture_variety: self.gestures_used.len(),
            },
            behavior: BehaviorInsights {
                interaction_count: self.interaction_count,
                skip_rate: self.skip_rate,
                transitions_used: self.transitions_used.clone(),
            },
            performance: PerformanceInsights {
                cpu_percent: self.performance.cpu_percent,
                memory_mb: self.performance.memory_mb,
                session_ms: (self.ended_at - self.started_at).num_milliseconds(),
            },
        }
    }
}

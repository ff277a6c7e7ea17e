mod types;

pub use types::{
    BehaviorInsights, DeviceClass, DiscoveryInsights, DwellSample, EngagementInsights,
    Insights, Orientation, PerformanceInsights, PerformanceSample, SessionReport,
};

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::Mutex;

use crate::gestures::GestureKind;
use crate::transitions::TransitionVariant;

/// Per-session metrics accumulator. Everything funnels through recording
/// methods; derivations happen once at finalize time.
pub struct AnalyticsCollector {
    inner: Arc<Mutex<AnalyticsState>>,
}

struct AnalyticsState {
    total_slides: usize,
    device_class: DeviceClass,
    orientation: Orientation,
    viewed: BTreeSet<usize>,
    dwell_samples: Vec<DwellSample>,
    /// Open visit: which slide the session sits on and since when.
    current: Option<(usize, Instant)>,
    gestures_used: Vec<GestureKind>,
    eggs_discovered: Vec<String>,
    transitions_used: Vec<TransitionVariant>,
    interaction_count: u64,
    system: System,
    pid: Pid,
}

impl AnalyticsCollector {
    pub fn new(total_slides: usize, device_class: DeviceClass, orientation: Orientation) -> Self {
        let mut system = System::new();
        let pid = Pid::from_u32(std::process::id());

        // Initial refresh to establish baseline for CPU calculation
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        Self {
            inner: Arc::new(Mutex::new(AnalyticsState {
                total_slides,
                device_class,
                orientation,
                viewed: BTreeSet::new(),
                dwell_samples: Vec::new(),
                current: None,
                gestures_used: Vec::new(),
                eggs_discovered: Vec::new(),
                transitions_used: Vec::new(),
                interaction_count: 0,
                system,
                pid,
            })),
        }
    }

    /// Record an arrival on a slide, closing the previous slide's dwell
    /// timer. Each visit yields exactly one sample, cut when the session
    /// leaves the slide.
    pub async fn record_slide_viewed(&self, slide_index: usize) {
        let now = Instant::now();
        let mut state = self.inner.lock().await;
        if let Some((previous, since)) = state.current.take() {
            state.dwell_samples.push(DwellSample {
                slide_index: previous,
                dwell_ms: since.elapsed().as_millis() as u64,
            });
        }
        state.viewed.insert(slide_index);
        state.current = Some((slide_index, now));
    }

    pub async fn record_gesture(&self, kind: GestureKind) {
        let mut state = self.inner.lock().await;
        state.interaction_count += 1;
        if !state.gestures_used.contains(&kind) {
            state.gestures_used.push(kind);
        }
    }

    pub async fn record_transition(&self, variant: TransitionVariant) {
        let mut state = self.inner.lock().await;
        if !state.transitions_used.contains(&variant) {
            state.transitions_used.push(variant);
        }
    }

    pub async fn record_egg(&self, egg_id: &str) {
        let mut state = self.inner.lock().await;
        if !state.eggs_discovered.iter().any(|id| id == egg_id) {
            state.eggs_discovered.push(egg_id.to_string());
        }
    }

    /// Manual navigation calls count as interactions even when no gesture
    /// produced them.
    pub async fn record_interaction(&self) {
        self.inner.lock().await.interaction_count += 1;
    }

    pub async fn orientation_changed(&self, orientation: Orientation) {
        self.inner.lock().await.orientation = orientation;
    }

    /// Close the session: cut the open dwell timer, sample process load, and
    /// derive the session-level rates.
    pub async fn finalize(
        &self,
        session_id: &str,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> SessionReport {
        let mut state = self.inner.lock().await;

        if let Some((slide_index, since)) = state.current.take() {
            state.dwell_samples.push(DwellSample {
                slide_index,
                dwell_ms: since.elapsed().as_millis() as u64,
            });
        }

        let pid = state.pid;
        state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));
        let performance = if let Some(process) = state.system.process(pid) {
            PerformanceSample {
                cpu_percent: process.cpu_usage(),
                memory_mb: process.memory() as f64 / 1024.0 / 1024.0,
            }
        } else {
            PerformanceSample {
                cpu_percent: 0.0,
                memory_mb: 0.0,
            }
        };

        let distinct = state.viewed.len();
        let average_slide_time_ms = if state.dwell_samples.is_empty() {
            0.0
        } else {
            state.dwell_samples.iter().map(|s| s.dwell_ms).sum::<u64>() as f64
                / state.dwell_samples.len() as f64
        };
        // The index span the session actually moved through; skipping within
        // it is what the skip rate measures.
        let range_seen = match (state.viewed.first(), state.viewed.last()) {
            (Some(first), Some(last)) => last - first + 1,
            _ => 0,
        };
        let skip_rate = if range_seen == 0 {
            0.0
        } else {
            1.0 - distinct as f64 / range_seen as f64
        };
        let completion_rate = if state.total_slides == 0 {
            0.0
        } else {
            distinct as f64 / state.total_slides as f64
        };

        SessionReport {
            session_id: session_id.to_string(),
            started_at,
            ended_at,
            total_slides: state.total_slides,
            slides_viewed: state.viewed.iter().copied().collect(),
            dwell_samples: state.dwell_samples.clone(),
            gestures_used: state.gestures_used.clone(),
            eggs_discovered: state.eggs_discovered.clone(),
            transitions_used: state.transitions_used.clone(),
            device_class: state.device_class,
            orientation: state.orientation,
            interaction_count: state.interaction_count,
            average_slide_time_ms,
            skip_rate,
            completion_rate,
            performance,
        }
    }
}

impl Clone for AnalyticsCollector {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector(total: usize) -> AnalyticsCollector {
        AnalyticsCollector::new(total, DeviceClass::Desktop, Orientation::Landscape)
    }

    #[tokio::test]
    async fn every_visit_closes_into_one_dwell_sample() {
        let c = collector(3);
        c.record_slide_viewed(0).await;
        c.record_slide_viewed(1).await;
        c.record_slide_viewed(0).await;

        let report = c.finalize("s", Utc::now(), Utc::now()).await;
        // Three visits: two closed by navigation, one by finalize.
        assert_eq!(report.dwell_samples.len(), 3);
        assert_eq!(
            report
                .dwell_samples
                .iter()
                .map(|s| s.slide_index)
                .collect::<Vec<_>>(),
            vec![0, 1, 0]
        );
    }

    #[tokio::test]
    async fn completion_hits_one_after_visiting_every_slide() {
        let c = collector(4);
        for i in [2, 0, 3, 1] {
            c.record_slide_viewed(i).await;
        }
        let report = c.finalize("s", Utc::now(), Utc::now()).await;
        assert_eq!(report.completion_rate, 1.0);
        assert_eq!(report.slides_viewed, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn skip_rate_measures_holes_in_the_range_seen() {
        let c = collector(10);
        c.record_slide_viewed(0).await;
        c.record_slide_viewed(4).await;
        let report = c.finalize("s", Utc::now(), Utc::now()).await;
        // Range 0..=4 is five slides, two seen.
        assert!((report.skip_rate - 0.6).abs() < 1e-9);
        assert!((report.completion_rate - 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn gesture_and_egg_sets_keep_first_use_order() {
        let c = collector(2);
        c.record_gesture(GestureKind::Shake).await;
        c.record_gesture(GestureKind::Swipe).await;
        c.record_gesture(GestureKind::Shake).await;
        c.record_egg("matrix").await;
        c.record_egg("konami").await;
        c.record_egg("matrix").await;

        let report = c.finalize("s", Utc::now(), Utc::now()).await;
        assert_eq!(
            report.gestures_used,
            vec![GestureKind::Shake, GestureKind::Swipe]
        );
        assert_eq!(report.eggs_discovered, vec!["matrix", "konami"]);
        assert_eq!(report.interaction_count, 3);
    }

    #[tokio::test]
    async fn insights_group_the_derived_numbers() {
        let c = collector(2);
        c.record_slide_viewed(0).await;
        c.record_slide_viewed(1).await;
        c.record_egg("vortex").await;
        let report = c.finalize("s", Utc::now(), Utc::now()).await;
        let insights = report.insights();
        assert_eq!(insights.engagement.total_slides, 2);
        assert_eq!(insights.engagement.slides_viewed, 2);
        assert_eq!(insights.discovery.eggs_found, 1);
        assert_eq!(insights.behavior.interaction_count, 0);
    }
}

use std::collections::VecDeque;

use super::{GestureConfig, GesturePayload, TouchPoint};

/// The secret circle gesture: a rolling window of recent touch points,
/// checked for cumulative rotation around their centroid.
pub struct CircleTracker {
    max_points: usize,
    window_ms: u64,
    min_angle_deg: f64,
    points: VecDeque<TouchPoint>,
}

impl CircleTracker {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            max_points: config.circle_points,
            window_ms: config.circle_window_ms,
            min_angle_deg: config.circle_min_angle_deg,
            points: VecDeque::with_capacity(config.circle_points),
        }
    }

    pub fn push(&mut self, point: TouchPoint) -> Option<GesturePayload> {
        let horizon = point.at_ms.saturating_sub(self.window_ms);
        while self
            .points
            .front()
            .map(|p| p.at_ms < horizon)
            .unwrap_or(false)
        {
            self.points.pop_front();
        }

        self.points.push_back(point);
        if self.points.len() > self.max_points {
            self.points.pop_front();
        }
        if self.points.len() < self.max_points {
            return None;
        }

        let total_angle_deg = cumulative_angle_deg(self.points.make_contiguous());
        if total_angle_deg.abs() > self.min_angle_deg {
            self.points.clear();
            return Some(GesturePayload::CircleGesture { total_angle_deg });
        }
        None
    }
}

/// Signed rotation swept by consecutive points around the set's centroid.
/// Each step is normalized to (-180, 180] so a jump across the seam does not
/// register as a full turn.
fn cumulative_angle_deg(points: &[TouchPoint]) -> f64 {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

    let mut total = 0.0;
    for pair in points.windows(2) {
        let a = (pair[0].y - cy).atan2(pair[0].x - cx);
        let b = (pair[1].y - cy).atan2(pair[1].x - cx);
        let mut delta = b - a;
        while delta > std::f64::consts::PI {
            delta -= std::f64::consts::TAU;
        }
        while delta <= -std::f64::consts::PI {
            delta += std::f64::consts::TAU;
        }
        total += delta;
    }
    total.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> CircleTracker {
        CircleTracker::new(&GestureConfig::default())
    }

    fn on_ring(angle_deg: f64, at_ms: u64) -> TouchPoint {
        let rad = angle_deg.to_radians();
        TouchPoint {
            x: 100.0 + 50.0 * rad.cos(),
            y: 100.0 + 50.0 * rad.sin(),
            at_ms,
        }
    }

    #[test]
    fn full_turn_emits_and_clears() {
        let mut t = tracker();
        let mut emitted = None;
        for (i, angle) in [0.0, 90.0, 180.0, 270.0, 360.0].iter().enumerate() {
            emitted = t.push(on_ring(*angle, i as u64 * 200));
        }
        let event = emitted.expect("circle");
        match event {
            GesturePayload::CircleGesture { total_angle_deg } => {
                assert!(total_angle_deg > 270.0, "swept {total_angle_deg}");
            }
            other => panic!("unexpected payload {other:?}"),
        }
        // Cleared: the next point starts a fresh window.
        assert!(t.push(on_ring(0.0, 1200)).is_none());
    }

    #[test]
    fn counter_clockwise_turn_sweeps_negative() {
        let mut t = tracker();
        let mut emitted = None;
        for (i, angle) in [360.0, 270.0, 180.0, 90.0, 0.0].iter().enumerate() {
            emitted = t.push(on_ring(*angle, i as u64 * 200));
        }
        match emitted.expect("circle") {
            GesturePayload::CircleGesture { total_angle_deg } => {
                assert!(total_angle_deg < -270.0);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn half_turn_is_not_enough() {
        let mut t = tracker();
        for (i, angle) in [0.0, 45.0, 90.0, 135.0, 180.0].iter().enumerate() {
            assert!(t.push(on_ring(*angle, i as u64 * 200)).is_none());
        }
    }

    #[test]
    fn stale_points_age_out_of_the_window() {
        let mut t = tracker();
        for (i, angle) in [0.0, 90.0, 180.0, 270.0].iter().enumerate() {
            assert!(t.push(on_ring(*angle, i as u64 * 100)).is_none());
        }
        // Four seconds later the earlier arc is gone; one point cannot close
        // the circle.
        assert!(t.push(on_ring(360.0, 4000)).is_none());
    }
}

use crate::models::NavDirection;

use super::{GestureConfig, GesturePayload, PointerInput};

/// Tracks one horizontal drag from press to release. Recognition happens on
/// release: a large enough offset or a fast enough flick commits the swipe,
/// anything else snaps back without an event.
pub struct SwipeTracker {
    offset_threshold: f64,
    velocity_threshold: f64,
    resistance: f64,
    drag: Option<Drag>,
}

struct Drag {
    start_x: f64,
    last_x: f64,
    last_at_ms: u64,
    /// Previous sample, kept for the release velocity estimate.
    prev_x: f64,
    prev_at_ms: u64,
}

impl SwipeTracker {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            offset_threshold: config.swipe_offset_px,
            velocity_threshold: config.swipe_velocity_px_s,
            resistance: config.swipe_resistance,
            drag: None,
        }
    }

    pub fn begin(&mut self, input: &PointerInput) {
        self.drag = Some(Drag {
            start_x: input.x,
            last_x: input.x,
            last_at_ms: input.at_ms,
            prev_x: input.x,
            prev_at_ms: input.at_ms,
        });
    }

    pub fn update(&mut self, input: &PointerInput) {
        if let Some(drag) = &mut self.drag {
            drag.prev_x = drag.last_x;
            drag.prev_at_ms = drag.last_at_ms;
            drag.last_x = input.x;
            drag.last_at_ms = input.at_ms;
        }
    }

    /// Raw offset of the drag in progress; zero when idle.
    pub fn offset_x(&self) -> f64 {
        self.drag
            .as_ref()
            .map(|drag| drag.last_x - drag.start_x)
            .unwrap_or(0.0)
    }

    /// Offset the host should render while dragging, with elastic resistance
    /// applied so the slide feels anchored.
    pub fn elastic_offset(&self) -> f64 {
        self.offset_x() * self.resistance
    }

    /// Offset the drag would have if it released at `input`, without
    /// consuming the drag.
    pub fn pending_offset(&self, input: &PointerInput) -> f64 {
        self.drag
            .as_ref()
            .map(|drag| input.x - drag.start_x)
            .unwrap_or(0.0)
    }

    pub fn release(&mut self, input: &PointerInput) -> Option<GesturePayload> {
        let mut drag = self.drag.take()?;
        drag.prev_x = drag.last_x;
        drag.prev_at_ms = drag.last_at_ms;
        drag.last_x = input.x;
        drag.last_at_ms = input.at_ms;

        let offset_x = drag.last_x - drag.start_x;
        let velocity_x = velocity(&drag);

        let committed = offset_x.abs() > self.offset_threshold
            || velocity_x.abs() > self.velocity_threshold;
        if !committed || offset_x == 0.0 {
            return None;
        }

        // Dragging left pulls the next slide in, dragging right the previous.
        let direction = if offset_x < 0.0 {
            NavDirection::Forward
        } else {
            NavDirection::Backward
        };

        Some(GesturePayload::Swipe {
            direction,
            offset_x,
            velocity_x,
        })
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }
}

fn velocity(drag: &Drag) -> f64 {
    let dt_ms = drag.last_at_ms.saturating_sub(drag.prev_at_ms);
    if dt_ms == 0 {
        return 0.0;
    }
    (drag.last_x - drag.prev_x) / dt_ms as f64 * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, at_ms: u64) -> PointerInput {
        PointerInput {
            x,
            y: 0.0,
            at_ms,
            target: super::super::TargetClass::Stage,
        }
    }

    fn tracker() -> SwipeTracker {
        SwipeTracker::new(&GestureConfig::default())
    }

    #[test]
    fn fast_left_drag_commits_forward() {
        let mut t = tracker();
        t.begin(&at(300.0, 0));
        t.update(&at(250.0, 100));
        let event = t.release(&at(150.0, 200)).expect("swipe");
        match event {
            GesturePayload::Swipe {
                direction,
                offset_x,
                velocity_x,
            } => {
                assert_eq!(direction, NavDirection::Forward);
                assert_eq!(offset_x, -150.0);
                assert!(velocity_x < -500.0);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn slow_long_drag_commits_on_offset_alone() {
        let mut t = tracker();
        t.begin(&at(0.0, 0));
        t.update(&at(60.0, 1000));
        let event = t.release(&at(120.0, 2000)).expect("swipe");
        assert!(matches!(
            event,
            GesturePayload::Swipe {
                direction: NavDirection::Backward,
                ..
            }
        ));
    }

    #[test]
    fn short_slow_drag_snaps_back() {
        let mut t = tracker();
        t.begin(&at(0.0, 0));
        t.update(&at(-40.0, 400));
        assert!(t.release(&at(-60.0, 800)).is_none());
    }

    #[test]
    fn cancel_discards_the_drag() {
        let mut t = tracker();
        t.begin(&at(0.0, 0));
        t.cancel();
        assert!(t.release(&at(-400.0, 100)).is_none());
    }

    #[test]
    fn elastic_offset_scales_the_raw_drag() {
        let mut t = tracker();
        t.begin(&at(0.0, 0));
        t.update(&at(-200.0, 50));
        assert_eq!(t.elastic_offset(), -200.0 * 0.35);
    }
}

use super::{GestureConfig, GesturePayload, TargetClass};

struct Press {
    at_ms: u64,
    target: TargetClass,
    fired: bool,
}

/// Click-family recognizers: double-click and long-press on title elements,
/// plus the rapid-click counter over every click.
pub struct ClickTracker {
    long_press_ms: u64,
    rapid_gap_ms: u64,
    rapid_count: u32,
    press: Option<Press>,
    last_click_at_ms: Option<u64>,
    run_length: u32,
}

impl ClickTracker {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            long_press_ms: config.long_press_ms,
            rapid_gap_ms: config.rapid_gap_ms,
            rapid_count: config.rapid_count,
            press: None,
            last_click_at_ms: None,
            run_length: 0,
        }
    }

    pub fn press(&mut self, at_ms: u64, target: TargetClass) {
        self.press = Some(Press {
            at_ms,
            target,
            fired: false,
        });
    }

    /// Fires the long-press once the hold crosses the threshold while the
    /// pointer is still down.
    pub fn poll_long_press(&mut self, now_ms: u64) -> Option<GesturePayload> {
        let press = self.press.as_mut()?;
        if press.target != TargetClass::Title || press.fired {
            return None;
        }
        let held_ms = now_ms.saturating_sub(press.at_ms);
        if held_ms < self.long_press_ms {
            return None;
        }
        press.fired = true;
        Some(GesturePayload::LongPress { held_ms })
    }

    /// Timer-driven variant of [`poll_long_press`]: the engine arms a wall
    /// clock alarm at press time and calls this when it rings.
    pub fn force_long_press(&mut self) -> Option<GesturePayload> {
        let press = self.press.as_mut()?;
        if press.target != TargetClass::Title || press.fired {
            return None;
        }
        press.fired = true;
        Some(GesturePayload::LongPress {
            held_ms: self.long_press_ms,
        })
    }

    /// Ends the hold. Emits the long-press if the threshold was crossed but
    /// nothing fired yet; a release even 1ms early emits nothing.
    pub fn release(&mut self, at_ms: u64) -> Option<GesturePayload> {
        let press = self.press.take()?;
        if press.target != TargetClass::Title || press.fired {
            return None;
        }
        let held_ms = at_ms.saturating_sub(press.at_ms);
        if held_ms >= self.long_press_ms {
            return Some(GesturePayload::LongPress { held_ms });
        }
        None
    }

    pub fn cancel_press(&mut self) {
        self.press = None;
    }

    /// Counts a completed click. A gap at or over the configured limit starts
    /// a fresh run; reaching the target emits once and resets to zero so the
    /// triggering click is not counted twice.
    pub fn click(&mut self, at_ms: u64) -> Option<GesturePayload> {
        let rapid = self
            .last_click_at_ms
            .map(|last| at_ms.saturating_sub(last) < self.rapid_gap_ms)
            .unwrap_or(false);
        self.run_length = if rapid { self.run_length + 1 } else { 1 };
        self.last_click_at_ms = Some(at_ms);

        if self.run_length >= self.rapid_count {
            let count = self.run_length;
            self.run_length = 0;
            self.last_click_at_ms = None;
            return Some(GesturePayload::RapidClick { count });
        }
        None
    }

    /// Double-clicks only count on title elements and emit immediately.
    pub fn double_click(&mut self, target: TargetClass) -> Option<GesturePayload> {
        if target != TargetClass::Title {
            return None;
        }
        Some(GesturePayload::DoubleClick)
    }
}

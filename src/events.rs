use serde::Serialize;
use tokio::sync::broadcast;

use crate::eggs::EffectSpec;
use crate::gestures::GestureEvent;
use crate::models::NavDirection;
use crate::transitions::TransitionSpec;

/// Everything the engine tells the host. Rendering, effect application and
/// analytics transport all hang off this stream; the engine never touches
/// the host surface directly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum EngineEvent {
    SlideChanged {
        from: usize,
        to: usize,
        direction: NavDirection,
    },
    TransitionStarted {
        transition: TransitionSpec,
    },
    PlaybackChanged {
        is_playing: bool,
        time_left: u32,
    },
    AutoplayTick {
        time_left: u32,
        progress: f64,
    },
    NavigationBlocked,
    GestureRecognized {
        gesture: GestureEvent,
    },
    EggUnlocked {
        egg_id: String,
        first_discovery: bool,
    },
    EffectStarted {
        egg_id: String,
        effect: EffectSpec,
    },
    EffectEnded {
        egg_id: String,
        expired: bool,
    },
    DeckCompleted,
    SessionClosed {
        session_id: String,
    },
}

const EVENT_CAPACITY: usize = 64;

/// Fan-out channel for [`EngineEvent`]s. Sending never blocks and never
/// fails; hosts that fall behind lose the oldest events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: EngineEvent) {
        // No receivers is fine; the engine runs headless in tests.
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

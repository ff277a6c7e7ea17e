use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Result};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::analytics::AnalyticsCollector;
use crate::audio::{CueKind, SoundManager};
use crate::events::{EngineEvent, EventBus};
use crate::models::{NavDirection, Slide};
use crate::settings::SettingsStore;
use crate::transitions;

use super::state::{NavigationState, PlaybackStatus, TickOutcome};

const CUE_GAIN: f32 = 0.5;

#[derive(Clone, Copy, PartialEq, Eq)]
enum AdvanceSource {
    Manual,
    Autoplay,
}

enum ForwardStep {
    Advanced {
        from: usize,
        to: usize,
        playing: bool,
    },
    Completed {
        from: usize,
        was_playing: bool,
    },
}

/// Slide-index state machine plus the autoplay ticker. All mutations happen
/// under one lock; manual navigation aborts and respawns the ticker so a
/// stale tick can never double-advance.
#[derive(Clone)]
pub struct NavigationController {
    slides: Arc<Vec<Slide>>,
    state: Arc<Mutex<NavigationState>>,
    bus: EventBus,
    sound: Arc<SoundManager>,
    analytics: AnalyticsCollector,
    settings: Arc<SettingsStore>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
}

impl NavigationController {
    pub fn new(
        slides: Arc<Vec<Slide>>,
        bus: EventBus,
        sound: Arc<SoundManager>,
        analytics: AnalyticsCollector,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let durations = slides.iter().map(|slide| slide.duration_secs).collect();
        Self {
            slides,
            state: Arc::new(Mutex::new(NavigationState::new(durations))),
            bus,
            sound,
            analytics,
            settings,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub async fn snapshot(&self) -> NavigationState {
        self.state.lock().await.clone()
    }

    pub async fn current_index(&self) -> usize {
        self.state.lock().await.current_slide
    }

    pub async fn next(&self) {
        self.advance(AdvanceSource::Manual).await;
    }

    async fn advance(&self, source: AdvanceSource) {
        let slide_count = self.slides.len();
        let step = {
            let mut state = self.state.lock().await;
            if state.current_slide + 1 < slide_count {
                let from = state.current_slide;
                state.current_slide += 1;
                state.direction = NavDirection::Forward;
                state.reset_timer();
                ForwardStep::Advanced {
                    from,
                    to: state.current_slide,
                    playing: state.is_playing(),
                }
            } else {
                // End of deck: stop autoplay and wrap back to the start with
                // a distinct completion cue.
                let from = state.current_slide;
                let was_playing = state.is_playing();
                state.status = PlaybackStatus::Stopped;
                state.current_slide = 0;
                state.direction = NavDirection::Forward;
                state.reset_timer();
                ForwardStep::Completed { from, was_playing }
            }
        };

        match step {
            ForwardStep::Advanced { from, to, playing } => {
                self.after_index_change(from, to, NavDirection::Forward, CueKind::Advance)
                    .await;
                if playing && source == AdvanceSource::Manual {
                    self.spawn_ticker().await;
                }
            }
            ForwardStep::Completed { from, was_playing } => {
                if source == AdvanceSource::Manual {
                    self.cancel_ticker().await;
                }
                self.after_index_change(from, 0, NavDirection::Forward, CueKind::Complete)
                    .await;
                self.bus.emit(EngineEvent::DeckCompleted);
                if was_playing {
                    let time_left = self.state.lock().await.time_left;
                    self.bus.emit(EngineEvent::PlaybackChanged {
                        is_playing: false,
                        time_left,
                    });
                }
            }
        }
    }

    pub async fn prev(&self) {
        let step = {
            let mut state = self.state.lock().await;
            if state.current_slide == 0 {
                None
            } else {
                let from = state.current_slide;
                state.current_slide -= 1;
                state.direction = NavDirection::Backward;
                state.reset_timer();
                Some((from, state.current_slide, state.is_playing()))
            }
        };

        match step {
            None => {
                self.sound.play(CueKind::Blocked, CUE_GAIN);
                self.bus.emit(EngineEvent::NavigationBlocked);
            }
            Some((from, to, playing)) => {
                self.after_index_change(from, to, NavDirection::Backward, CueKind::Reverse)
                    .await;
                if playing {
                    self.spawn_ticker().await;
                }
            }
        }
    }

    /// Direct jump. Disables autoplay and resets progress, per the remote
    /// navigation controls.
    pub async fn goto(&self, index: usize) -> Result<()> {
        let slide_count = self.slides.len();
        ensure!(
            index < slide_count,
            "slide index {index} out of range (deck has {slide_count} slides)"
        );

        let (from, direction, was_playing) = {
            let mut state = self.state.lock().await;
            let from = state.current_slide;
            let direction = NavDirection::from_sign(index as i64 - from as i64);
            state.direction = direction;
            state.current_slide = index;
            let was_playing = state.is_playing();
            state.status = PlaybackStatus::Stopped;
            state.reset_timer();
            (from, direction, was_playing)
        };

        self.cancel_ticker().await;

        if from != index {
            let cue = match direction {
                NavDirection::Forward => CueKind::Advance,
                NavDirection::Backward => CueKind::Reverse,
            };
            self.after_index_change(from, index, direction, cue).await;
        }
        if was_playing {
            let time_left = self.state.lock().await.time_left;
            self.bus.emit(EngineEvent::PlaybackChanged {
                is_playing: false,
                time_left,
            });
        }
        Ok(())
    }

    /// Flip autoplay. Resuming restarts the countdown from the current
    /// slide's full duration.
    pub async fn toggle_play(&self) -> bool {
        let (now_playing, time_left) = {
            let mut state = self.state.lock().await;
            match state.status {
                PlaybackStatus::Playing => {
                    state.status = PlaybackStatus::Stopped;
                }
                PlaybackStatus::Stopped => {
                    state.status = PlaybackStatus::Playing;
                    state.reset_timer();
                }
            }
            (state.is_playing(), state.time_left)
        };

        if now_playing {
            self.spawn_ticker().await;
        } else {
            self.cancel_ticker().await;
        }

        self.sound.play(CueKind::PlayToggle, CUE_GAIN);
        self.bus.emit(EngineEvent::PlaybackChanged {
            is_playing: now_playing,
            time_left,
        });
        now_playing
    }

    pub async fn shutdown(&self) {
        {
            let mut state = self.state.lock().await;
            state.status = PlaybackStatus::Stopped;
        }
        self.cancel_ticker().await;
    }

    /// Analytics first, then the transition description: the slide-viewed
    /// event must land before the animation starts.
    async fn after_index_change(
        &self,
        from: usize,
        to: usize,
        direction: NavDirection,
        cue: CueKind,
    ) {
        self.analytics.record_slide_viewed(to).await;

        let playback = self.settings.playback();
        let forced = self.slides.get(to).and_then(|slide| slide.transition);
        let variant =
            transitions::select_variant(forced, playback.transition, playback.random_transitions);
        self.analytics.record_transition(variant).await;

        self.bus.emit(EngineEvent::SlideChanged {
            from,
            to,
            direction,
        });
        self.bus.emit(EngineEvent::TransitionStarted {
            transition: transitions::spec_for(variant, direction),
        });
        self.sound.play(cue, CUE_GAIN);
    }

    /// One autoplay second. Returns false when the ticker should stop.
    ///
    /// Returns a boxed `Send` future (rather than an `async fn`) so its type is
    /// named rather than opaque: the ticker task this feeds awaits it, and that
    /// task is in turn spawned by `spawn_ticker`, so an opaque return type would
    /// form an auto-trait inference cycle the compiler cannot resolve.
    pub(crate) fn tick_once(&self) -> Pin<Box<dyn Future<Output = bool> + Send>> {
        let this = self.clone();
        Box::pin(async move {
            let outcome = {
                let mut state = this.state.lock().await;
                if !state.is_playing() {
                    return false;
                }
                state.tick()
            };

            match outcome {
                TickOutcome::Ticked {
                    time_left,
                    progress,
                } => {
                    this.bus.emit(EngineEvent::AutoplayTick {
                        time_left,
                        progress,
                    });
                    true
                }
                TickOutcome::Elapsed => {
                    this.bus.emit(EngineEvent::AutoplayTick {
                        time_left: 0,
                        progress: 100.0,
                    });
                    this.advance(AdvanceSource::Autoplay).await;
                    this.state.lock().await.is_playing()
                }
            }
        })
    }

    async fn spawn_ticker(&self) {
        let mut guard = self.ticker.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let controller = self.clone();
        let tick_interval = self.tick_interval;
        let handle = tokio::spawn(async move {
            // The first interval tick would complete immediately; the
            // countdown starts one full second out.
            let mut interval = time::interval_at(time::Instant::now() + tick_interval, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !controller.tick_once().await {
                    break;
                }
            }
        });

        *guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}

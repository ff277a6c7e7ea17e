pub mod analytics;
pub mod audio;
pub mod eggs;
pub mod events;
pub mod gestures;
pub mod models;
pub mod navigation;
pub mod settings;
pub mod store;
pub mod transitions;

pub use analytics::{DeviceClass, Insights, Orientation, SessionReport};
pub use audio::{CueKind, SoundManager};
pub use eggs::{EffectSpec, EggSummary};
pub use events::{EngineEvent, EventBus};
pub use gestures::{
    GestureConfig, GestureEvent, GestureKind, KeyInput, MotionSample, PointerInput, TargetClass,
    TouchPoint,
};
pub use models::{NavDirection, PresentationSession, Slide};
pub use settings::PlaybackSettings;
pub use transitions::{TransitionSpec, TransitionVariant};

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use analytics::AnalyticsCollector;
use eggs::{default_catalog, EggRegistry};
use gestures::{GestureProcessor, GesturePayload};
use navigation::NavigationController;
use settings::SettingsStore;
use store::Store;

/// Initialize logging (reads RUST_LOG env var).
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Where the unlock store and settings file live.
    pub data_dir: PathBuf,
    pub device_class: DeviceClass,
    pub orientation: Orientation,
    pub gestures: GestureConfig,
}

impl EngineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            device_class: DeviceClass::Unknown,
            orientation: Orientation::Landscape,
            gestures: GestureConfig::default(),
        }
    }
}

/// Routes recognized gestures to navigation, the egg registry, and
/// analytics. Cloneable so background recognizer tasks can deliver too.
#[derive(Clone)]
struct GestureRouter {
    nav: NavigationController,
    eggs: EggRegistry,
    analytics: AnalyticsCollector,
    bus: EventBus,
}

impl GestureRouter {
    async fn dispatch(&self, payload: GesturePayload) {
        let slide_index = self.nav.current_index().await;
        let event = GestureEvent {
            at: Utc::now(),
            slide_index,
            payload,
        };

        self.analytics.record_gesture(event.kind()).await;
        self.bus.emit(EngineEvent::GestureRecognized {
            gesture: event.clone(),
        });

        if let GesturePayload::Swipe { direction, .. } = &event.payload {
            match direction {
                NavDirection::Forward => self.nav.next().await,
                NavDirection::Backward => self.nav.prev().await,
            }
        }

        self.eggs.handle_gesture(&event).await;
    }
}

/// One presentation session end to end: navigation, transitions, gestures,
/// audio cues, easter eggs, and analytics, wired together behind a single
/// context object. Construct one per open presentation and [`close`] it when
/// the presentation goes away.
///
/// [`close`]: PresentationEngine::close
pub struct PresentationEngine {
    slides: Arc<Vec<Slide>>,
    session_id: String,
    started_at: DateTime<Utc>,
    ended_at: Mutex<Option<DateTime<Utc>>>,
    bus: EventBus,
    settings: Arc<SettingsStore>,
    sound: Arc<SoundManager>,
    router: GestureRouter,
    gestures: Arc<Mutex<GestureProcessor>>,
    long_press_arm: Mutex<Option<CancellationToken>>,
    long_press_ms: u64,
    closed: AtomicBool,
}

impl PresentationEngine {
    pub async fn new(slides: Vec<Slide>, config: EngineConfig) -> Result<Self> {
        ensure!(!slides.is_empty(), "a presentation needs at least one slide");

        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.data_dir.display())
        })?;

        let store = Store::new(config.data_dir.join("deckflow.sqlite3"))?;
        let settings = Arc::new(SettingsStore::new(config.data_dir.join("settings.json"))?);
        let sound = Arc::new(SoundManager::new(settings.playback().sound_enabled));
        let bus = EventBus::new();
        let analytics =
            AnalyticsCollector::new(slides.len(), config.device_class, config.orientation);

        let slides = Arc::new(slides);
        let nav = NavigationController::new(
            Arc::clone(&slides),
            bus.clone(),
            Arc::clone(&sound),
            analytics.clone(),
            Arc::clone(&settings),
        );
        let eggs = EggRegistry::load(
            default_catalog(),
            store,
            bus.clone(),
            analytics.clone(),
            Arc::clone(&sound),
            Arc::clone(&settings),
        )
        .await;

        let long_press_ms = config.gestures.long_press_ms;
        let gestures = Arc::new(Mutex::new(GestureProcessor::new(config.gestures)));

        let session_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();

        // The opening slide counts as viewed from the start.
        analytics.record_slide_viewed(0).await;

        info!(
            "presentation session {session_id} opened with {} slides",
            slides.len()
        );

        Ok(Self {
            slides,
            session_id,
            started_at,
            ended_at: Mutex::new(None),
            bus: bus.clone(),
            settings,
            sound,
            router: GestureRouter {
                nav,
                eggs,
                analytics,
                bus,
            },
            gestures,
            long_press_arm: Mutex::new(None),
            long_press_ms,
            closed: AtomicBool::new(false),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.bus.subscribe()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub async fn session(&self) -> PresentationSession {
        let nav = self.router.nav.snapshot().await;
        let playback = self.settings.playback();
        PresentationSession {
            session_id: self.session_id.clone(),
            started_at: self.started_at,
            ended_at: *self.ended_at.lock().await,
            current_slide: nav.current_slide,
            direction: nav.direction,
            is_playing: nav.is_playing(),
            time_left: nav.time_left,
            progress: nav.progress,
            sound_enabled: self.sound.is_enabled(),
            transition: playback.transition,
            random_transitions: playback.random_transitions,
        }
    }

    // --- navigation ------------------------------------------------------

    pub async fn next(&self) {
        self.router.analytics.record_interaction().await;
        self.router.nav.next().await;
    }

    pub async fn prev(&self) {
        self.router.analytics.record_interaction().await;
        self.router.nav.prev().await;
    }

    pub async fn goto(&self, index: usize) -> Result<()> {
        self.router.analytics.record_interaction().await;
        self.router.nav.goto(index).await
    }

    pub async fn toggle_play(&self) -> bool {
        self.router.analytics.record_interaction().await;
        self.router.nav.toggle_play().await
    }

    // --- preferences -----------------------------------------------------

    pub fn set_transition(&self, variant: TransitionVariant) -> Result<()> {
        let mut playback = self.settings.playback();
        playback.transition = variant;
        self.settings.update_playback(playback)
    }

    pub fn set_random_transitions(&self, enabled: bool) -> Result<()> {
        let mut playback = self.settings.playback();
        playback.random_transitions = enabled;
        self.settings.update_playback(playback)
    }

    pub fn set_sound_enabled(&self, enabled: bool) -> Result<()> {
        self.sound.set_enabled(enabled);
        let mut playback = self.settings.playback();
        playback.sound_enabled = enabled;
        self.settings.update_playback(playback)
    }

    // --- easter eggs -----------------------------------------------------

    pub async fn egg_summaries(&self) -> Vec<EggSummary> {
        self.router.eggs.summaries().await
    }

    /// Host-driven early disposal of an active effect.
    pub async fn dispose_effect(&self, egg_id: &str) {
        self.router.eggs.dispose(egg_id).await;
    }

    // --- host input feeds ------------------------------------------------

    pub async fn pointer_down(&self, input: PointerInput) {
        let payloads = {
            let mut gestures = self.gestures.lock().await;
            gestures.pointer_down(&input)
        };
        if input.target == TargetClass::Title {
            self.arm_long_press().await;
        }
        self.dispatch_all(payloads).await;
    }

    pub async fn pointer_move(&self, input: PointerInput) {
        let payloads = {
            let mut gestures = self.gestures.lock().await;
            gestures.pointer_move(&input)
        };
        self.dispatch_all(payloads).await;
    }

    pub async fn pointer_up(&self, input: PointerInput) {
        self.disarm_long_press().await;
        let payloads = {
            let mut gestures = self.gestures.lock().await;
            gestures.pointer_up(&input)
        };
        self.dispatch_all(payloads).await;
    }

    pub async fn pointer_leave(&self) {
        self.disarm_long_press().await;
        self.gestures.lock().await.pointer_leave();
    }

    pub async fn double_click(&self, target: TargetClass) {
        let payload = self.gestures.lock().await.double_click(target);
        if let Some(payload) = payload {
            self.router.dispatch(payload).await;
        }
    }

    pub async fn touch_point(&self, point: TouchPoint) {
        let payload = self.gestures.lock().await.touch_point(point);
        if let Some(payload) = payload {
            self.router.dispatch(payload).await;
        }
    }

    pub async fn motion_sample(&self, sample: MotionSample) {
        let payload = self.gestures.lock().await.motion_sample(sample);
        if let Some(payload) = payload {
            self.router.dispatch(payload).await;
        }
    }

    /// Keyboard input: navigation keys act immediately, and every key feeds
    /// the sequence matcher.
    pub async fn handle_key(&self, input: KeyInput) {
        match input.code.as_str() {
            "ArrowRight" => self.next().await,
            "ArrowLeft" => self.prev().await,
            "Space" => {
                self.toggle_play().await;
            }
            "Home" => {
                let _ = self.goto(0).await;
            }
            "End" => {
                let _ = self.goto(self.slides.len() - 1).await;
            }
            _ => {}
        }

        let payload = self.gestures.lock().await.key_input(&input);
        if let Some(payload) = payload {
            self.router.dispatch(payload).await;
        }
    }

    pub async fn orientation_changed(&self, orientation: Orientation) {
        self.router.analytics.orientation_changed(orientation).await;
    }

    // --- teardown --------------------------------------------------------

    /// Close the session: stop autoplay, dispose every active effect, shut
    /// the audio thread down, and return the finalized analytics report.
    pub async fn close(&self) -> Result<SessionReport> {
        ensure!(
            !self.closed.swap(true, Ordering::SeqCst),
            "session already closed"
        );

        self.router.nav.shutdown().await;
        self.disarm_long_press().await;
        self.router.eggs.dispose_all().await;
        self.sound.shutdown();

        let ended_at = Utc::now();
        *self.ended_at.lock().await = Some(ended_at);

        let report = self
            .router
            .analytics
            .finalize(&self.session_id, self.started_at, ended_at)
            .await;

        self.bus.emit(EngineEvent::SessionClosed {
            session_id: self.session_id.clone(),
        });
        info!(
            "presentation session {} closed; {} of {} slides viewed",
            self.session_id,
            report.slides_viewed.len(),
            report.total_slides
        );

        Ok(report)
    }

    async fn dispatch_all(&self, payloads: Vec<GesturePayload>) {
        for payload in payloads {
            self.router.dispatch(payload).await;
        }
    }

    /// Start the hold timer for a title press. Fires the long-press through
    /// the normal dispatch path unless the pointer lifts first.
    async fn arm_long_press(&self) {
        let token = CancellationToken::new();
        {
            let mut guard = self.long_press_arm.lock().await;
            if let Some(previous) = guard.take() {
                previous.cancel();
            }
            *guard = Some(token.clone());
        }

        let gestures = Arc::clone(&self.gestures);
        let router = self.router.clone();
        let hold = Duration::from_millis(self.long_press_ms);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(hold) => {
                    let payload = {
                        let mut gestures = gestures.lock().await;
                        gestures.force_long_press()
                    };
                    if let Some(payload) = payload {
                        router.dispatch(payload).await;
                    }
                }
                _ = token.cancelled() => {}
            }
        });
    }

    async fn disarm_long_press(&self) {
        if let Some(token) = self.long_press_arm.lock().await.take() {
            token.cancel();
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::analytics::AnalyticsCollector;
use crate::audio::{CueKind, SoundManager};
use crate::events::{EngineEvent, EventBus};
use crate::gestures::GestureEvent;
use crate::settings::SettingsStore;
use crate::store::Store;

use super::{EffectSpec, EggDef};

/// Active effects dispose themselves after this window.
const EFFECT_TTL: Duration = Duration::from_secs(10);

const UNLOCK_GAIN: f32 = 0.6;
const REPLAY_GAIN: f32 = 0.4;

/// Host-facing view of one catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EggSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
    pub active: bool,
    pub slide_specific: Option<usize>,
}

struct ActiveEffect {
    cancel: CancellationToken,
    /// For effects that borrowed session state (transition shuffle), the
    /// value to put back when the effect ends.
    restore_random: Option<bool>,
}

struct RegistryState {
    /// Persisted, append-only within and across sessions.
    unlocked: Vec<String>,
    active: HashMap<String, ActiveEffect>,
}

/// Catalog of unlockable effects. Matching triggers activate an effect
/// description for the host, persist first-time unlocks, and guarantee every
/// activation is eventually disposed.
#[derive(Clone)]
pub struct EggRegistry {
    catalog: Arc<Vec<EggDef>>,
    store: Store,
    bus: EventBus,
    analytics: AnalyticsCollector,
    sound: Arc<SoundManager>,
    settings: Arc<SettingsStore>,
    inner: Arc<Mutex<RegistryState>>,
}

impl EggRegistry {
    /// Load the unlocked set from the durable store. An unreadable store is
    /// a fresh start, never a failed session.
    pub async fn load(
        catalog: Vec<EggDef>,
        store: Store,
        bus: EventBus,
        analytics: AnalyticsCollector,
        sound: Arc<SoundManager>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let unlocked = match store.load_unlocked_eggs().await {
            Ok(ids) => ids,
            Err(err) => {
                warn!("unlock store unreadable, starting with zero eggs: {err:#}");
                Vec::new()
            }
        };
        if !unlocked.is_empty() {
            info!("{} easter eggs carried over from previous sessions", unlocked.len());
        }

        Self {
            catalog: Arc::new(catalog),
            store,
            bus,
            analytics,
            sound,
            settings,
            inner: Arc::new(Mutex::new(RegistryState {
                unlocked,
                active: HashMap::new(),
            })),
        }
    }

    /// Route a recognized gesture to any catalog entry it unlocks. Entries
    /// scoped to another slide stay dormant.
    pub async fn handle_gesture(&self, event: &GestureEvent) {
        let matched: Vec<EggDef> = self
            .catalog
            .iter()
            .filter(|def| def.matches(&event.payload))
            .filter(|def| {
                def.slide_specific
                    .map(|slide| slide == event.slide_index)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        for def in matched {
            self.activate(&def).await;
        }
    }

    async fn activate(&self, def: &EggDef) {
        // Unlocks are monotonic; only the first activation grows the
        // persisted set or announces a discovery.
        let newly_unlocked = {
            let mut state = self.inner.lock().await;
            if state.unlocked.iter().any(|id| id == def.id) {
                None
            } else {
                state.unlocked.push(def.id.to_string());
                Some(state.unlocked.clone())
            }
        };

        if let Some(ids) = newly_unlocked {
            if let Err(err) = self.store.save_unlocked_eggs(&ids).await {
                warn!("failed to persist unlock of '{}': {err:#}", def.id);
            }
            info!("easter egg '{}' discovered", def.id);
            self.bus.emit(EngineEvent::EggUnlocked {
                egg_id: def.id.to_string(),
                first_discovery: true,
            });
            self.sound.play(CueKind::Unlock, UNLOCK_GAIN);
        } else {
            self.sound.play(CueKind::Sparkle, REPLAY_GAIN);
        }

        self.analytics.record_egg(def.id).await;

        let mut restore_random = match def.effect {
            EffectSpec::TransitionShuffle => {
                let mut playback = self.settings.playback();
                let previous = playback.random_transitions;
                playback.random_transitions = true;
                if let Err(err) = self.settings.update_playback(playback) {
                    warn!("failed to enable random transitions: {err:#}");
                }
                Some(previous)
            }
            _ => None,
        };

        let cancel = CancellationToken::new();
        {
            let mut state = self.inner.lock().await;
            if let Some(previous) = state.active.remove(def.id) {
                // Re-activation restarts the window; keep the original
                // restore value so we never "restore" our own override.
                previous.cancel.cancel();
                restore_random = previous.restore_random.or(restore_random);
            }
            state.active.insert(
                def.id.to_string(),
                ActiveEffect {
                    cancel: cancel.clone(),
                    restore_random,
                },
            );
        }

        self.bus.emit(EngineEvent::EffectStarted {
            egg_id: def.id.to_string(),
            effect: def.effect.clone(),
        });

        let registry = self.clone();
        let egg_id = def.id.to_string();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(EFFECT_TTL) => {
                    registry.finish_effect(&egg_id, true).await;
                }
                _ = cancel.cancelled() => {}
            }
        });
    }

    async fn finish_effect(&self, egg_id: &str, expired: bool) {
        let removed = {
            let mut state = self.inner.lock().await;
            state.active.remove(egg_id)
        };

        let Some(effect) = removed else {
            return;
        };
        if let Some(previous) = effect.restore_random {
            let mut playback = self.settings.playback();
            playback.random_transitions = previous;
            if let Err(err) = self.settings.update_playback(playback) {
                warn!("failed to restore transition selection: {err:#}");
            }
        }
        self.bus.emit(EngineEvent::EffectEnded {
            egg_id: egg_id.to_string(),
            expired,
        });
    }

    /// Host-driven early disposal of one active effect.
    pub async fn dispose(&self, egg_id: &str) {
        let token = {
            let state = self.inner.lock().await;
            state.active.get(egg_id).map(|effect| effect.cancel.clone())
        };
        if let Some(token) = token {
            token.cancel();
        }
        self.finish_effect(egg_id, false).await;
    }

    /// Shutdown path: every active effect gets its dispose, nothing leaks
    /// into the next session.
    pub async fn dispose_all(&self) {
        let ids: Vec<String> = {
            let state = self.inner.lock().await;
            state.active.keys().cloned().collect()
        };
        for id in ids {
            self.dispose(&id).await;
        }
    }

    pub async fn unlocked_ids(&self) -> Vec<String> {
        self.inner.lock().await.unlocked.clone()
    }

    pub async fn is_active(&self, egg_id: &str) -> bool {
        self.inner.lock().await.active.contains_key(egg_id)
    }

    pub async fn summaries(&self) -> Vec<EggSummary> {
        let state = self.inner.lock().await;
        self.catalog
            .iter()
            .map(|def| EggSummary {
                id: def.id.to_string(),
                name: def.name.to_string(),
                description: def.description.to_string(),
                unlocked: state.unlocked.iter().any(|id| id == def.id),
                active: state.active.contains_key(def.id),
                slide_specific: def.slide_specific,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{DeviceClass, Orientation};
    use crate::eggs::default_catalog;
    use crate::gestures::GesturePayload;
    use chrono::Utc;
    use tempfile::TempDir;

    async fn registry(dir: &TempDir) -> EggRegistry {
        let store = Store::new(dir.path().join("deckflow.sqlite3")).unwrap();
        let settings = Arc::new(SettingsStore::new(dir.path().join("settings.json")).unwrap());
        let analytics = AnalyticsCollector::new(5, DeviceClass::Desktop, Orientation::Landscape);
        EggRegistry::load(
            default_catalog(),
            store,
            EventBus::new(),
            analytics,
            Arc::new(SoundManager::new(false)),
            settings,
        )
        .await
    }

    fn gesture(payload: GesturePayload, slide_index: usize) -> GestureEvent {
        GestureEvent {
            at: Utc::now(),
            slide_index,
            payload,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_activation_unlocks_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir).await;
        let mut events = reg.bus.subscribe();

        reg.handle_gesture(&gesture(GesturePayload::RapidClick { count: 10 }, 3))
            .await;

        assert_eq!(reg.unlocked_ids().await, vec!["confetti"]);
        assert!(reg.is_active("confetti").await);
        assert_eq!(reg.store.load_unlocked_eggs().await.unwrap(), vec!["confetti"]);
        assert!(matches!(
            events.try_recv(),
            Ok(EngineEvent::EggUnlocked {
                first_discovery: true,
                ..
            })
        ));
        assert!(matches!(events.try_recv(), Ok(EngineEvent::EffectStarted { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn reactivation_neither_duplicates_nor_rediscovers() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir).await;

        reg.handle_gesture(&gesture(GesturePayload::Shake { speed: 40.0 }, 0))
            .await;
        let mut events = reg.bus.subscribe();
        reg.handle_gesture(&gesture(GesturePayload::Shake { speed: 55.0 }, 1))
            .await;

        assert_eq!(reg.unlocked_ids().await, vec!["quake"]);
        assert_eq!(reg.store.load_unlocked_eggs().await.unwrap(), vec!["quake"]);
        // Second activation: effect restarts, but no discovery signal.
        assert!(matches!(
            events.try_recv(),
            Ok(EngineEvent::EffectStarted { .. })
        ));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn slide_scoped_eggs_ignore_other_slides() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir).await;

        reg.handle_gesture(&gesture(GesturePayload::DoubleClick, 2)).await;
        assert!(reg.unlocked_ids().await.is_empty());

        reg.handle_gesture(&gesture(GesturePayload::DoubleClick, 0)).await;
        assert_eq!(reg.unlocked_ids().await, vec!["spotlight"]);
    }

    #[tokio::test(start_paused = true)]
    async fn effects_expire_after_the_window() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir).await;
        let mut events = reg.bus.subscribe();

        reg.handle_gesture(&gesture(
            GesturePayload::KeystrokeMatch {
                sequence: "matrix".to_string(),
            },
            0,
        ))
        .await;
        assert!(reg.is_active("matrix").await);

        tokio::time::sleep(EFFECT_TTL + Duration::from_millis(100)).await;
        assert!(!reg.is_active("matrix").await);

        let mut saw_end = false;
        while let Ok(event) = events.try_recv() {
            if matches!(
                event,
                EngineEvent::EffectEnded {
                    expired: true,
                    ..
                }
            ) {
                saw_end = true;
            }
        }
        assert!(saw_end);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_all_clears_every_active_effect() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir).await;

        reg.handle_gesture(&gesture(GesturePayload::Shake { speed: 40.0 }, 0))
            .await;
        reg.handle_gesture(&gesture(
            GesturePayload::CircleGesture {
                total_angle_deg: 320.0,
            },
            1,
        ))
        .await;
        assert!(reg.is_active("quake").await);
        assert!(reg.is_active("vortex").await);

        reg.dispose_all().await;
        assert!(!reg.is_active("quake").await);
        assert!(!reg.is_active("vortex").await);

        // Unlocks survive disposal.
        let mut unlocked = reg.unlocked_ids().await;
        unlocked.sort();
        assert_eq!(unlocked, vec!["quake", "vortex"]);
    }

    #[tokio::test(start_paused = true)]
    async fn shuffle_borrows_and_restores_random_mode() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir).await;
        assert!(!reg.settings.playback().random_transitions);

        reg.handle_gesture(&gesture(
            GesturePayload::KeystrokeMatch {
                sequence: "shuffle".to_string(),
            },
            0,
        ))
        .await;
        assert!(reg.settings.playback().random_transitions);

        tokio::time::sleep(EFFECT_TTL + Duration::from_millis(100)).await;
        assert!(!reg.settings.playback().random_transitions);
    }
}

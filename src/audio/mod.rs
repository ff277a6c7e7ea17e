pub mod tone;

pub use tone::{ToneSpec, Waveform};

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

use log::{error, warn};
use rodio::{OutputStream, Sink};
use serde::{Deserialize, Serialize};

use tone::ToneSource;

/// Named feedback cues, each mapped to a fixed synthesized tone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CueKind {
    Advance,
    Reverse,
    Blocked,
    Complete,
    PlayToggle,
    Unlock,
    Sparkle,
}

impl CueKind {
    pub const ALL: [CueKind; 7] = [
        CueKind::Advance,
        CueKind::Reverse,
        CueKind::Blocked,
        CueKind::Complete,
        CueKind::PlayToggle,
        CueKind::Unlock,
        CueKind::Sparkle,
    ];

    fn spec(self) -> ToneSpec {
        match self {
            CueKind::Advance => ToneSpec {
                waveform: Waveform::Sine,
                freq_hz: 660.0,
                duration_ms: 90,
                decay: 18.0,
            },
            CueKind::Reverse => ToneSpec {
                waveform: Waveform::Sine,
                freq_hz: 440.0,
                duration_ms: 90,
                decay: 18.0,
            },
            CueKind::Blocked => ToneSpec {
                waveform: Waveform::Square,
                freq_hz: 110.0,
                duration_ms: 140,
                decay: 22.0,
            },
            CueKind::Complete => ToneSpec {
                waveform: Waveform::Triangle,
                freq_hz: 523.25,
                duration_ms: 400,
                decay: 6.0,
            },
            CueKind::PlayToggle => ToneSpec {
                waveform: Waveform::Sine,
                freq_hz: 880.0,
                duration_ms: 60,
                decay: 30.0,
            },
            CueKind::Unlock => ToneSpec {
                waveform: Waveform::Triangle,
                freq_hz: 987.77,
                duration_ms: 250,
                decay: 9.0,
            },
            CueKind::Sparkle => ToneSpec {
                waveform: Waveform::Sawtooth,
                freq_hz: 1318.5,
                duration_ms: 120,
                decay: 20.0,
            },
        }
    }
}

enum AudioCommand {
    PlayCue { cue: CueKind, gain: f32 },
    Shutdown,
}

/// Fire-and-forget cue playback. A dedicated thread owns the non-Send audio
/// output and a table of pre-rendered tone buffers; each playback is a fresh
/// one-shot sink at the caller's gain. Losing the audio device flips the
/// manager into a permanent no-op instead of surfacing errors to navigation.
pub struct SoundManager {
    tx: Mutex<Option<Sender<AudioCommand>>>,
    enabled: Arc<AtomicBool>,
    dead: Arc<AtomicBool>,
}

impl SoundManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            tx: Mutex::new(None),
            enabled: Arc::new(AtomicBool::new(enabled)),
            dead: Arc::new(AtomicBool::new(false)),
        }
    }

    fn ensure_thread(&self) -> Option<Sender<AudioCommand>> {
        let mut guard = match self.tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(tx) = guard.as_ref() {
            return Some(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();
        let dead = Arc::clone(&self.dead);
        let enabled = Arc::clone(&self.enabled);

        // Dedicated audio thread holding non-Send audio objects.
        let spawned = thread::Builder::new()
            .name("audio-engine".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(err) => {
                        warn!("audio output unavailable, cues disabled: {err}");
                        dead.store(true, Ordering::SeqCst);
                        return;
                    }
                };

                let buffers: HashMap<CueKind, Arc<Vec<f32>>> = CueKind::ALL
                    .iter()
                    .map(|cue| (*cue, Arc::new(tone::render(&cue.spec()))))
                    .collect();

                while let Ok(command) = rx.recv() {
                    match command {
                        AudioCommand::PlayCue { cue, gain } => {
                            if !enabled.load(Ordering::SeqCst) {
                                continue;
                            }
                            let Some(samples) = buffers.get(&cue) else {
                                continue;
                            };
                            match Sink::try_new(&handle) {
                                Ok(sink) => {
                                    sink.set_volume(gain.clamp(0.0, 1.0));
                                    sink.append(ToneSource::new(Arc::clone(samples)));
                                    sink.detach();
                                }
                                Err(err) => {
                                    error!("failed to create cue sink: {err}");
                                }
                            }
                        }
                        AudioCommand::Shutdown => break,
                    }
                }
            });

        if let Err(err) = spawned {
            warn!("failed to spawn audio thread, cues disabled: {err}");
            self.dead.store(true, Ordering::SeqCst);
            return None;
        }

        *guard = Some(tx.clone());
        Some(tx)
    }

    /// Queue a cue. Never blocks, never fails: a disabled or dead manager
    /// simply drops the request.
    pub fn play(&self, cue: CueKind, gain: f32) {
        if self.dead.load(Ordering::SeqCst) || !self.enabled.load(Ordering::SeqCst) {
            return;
        }
        let Some(tx) = self.ensure_thread() else {
            return;
        };
        if tx.send(AudioCommand::PlayCue { cue, gain }).is_err() {
            // The thread bailed out at startup; stop trying.
            self.dead.store(true, Ordering::SeqCst);
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) {
        let guard = match self.tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(tx) = guard.as_ref() {
            let _ = tx.send(AudioCommand::Shutdown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cue_has_a_short_buffer() {
        for cue in CueKind::ALL {
            let spec = cue.spec();
            assert!(
                (30..=500).contains(&spec.duration_ms),
                "{cue:?} runs {}ms",
                spec.duration_ms
            );
        }
    }

    #[test]
    fn disabled_manager_swallows_playback() {
        let manager = SoundManager::new(false);
        // Nothing to assert beyond "does not panic or block".
        manager.play(CueKind::Advance, 0.5);
        assert!(!manager.is_enabled());
        manager.set_enabled(true);
        assert!(manager.is_enabled());
    }
}

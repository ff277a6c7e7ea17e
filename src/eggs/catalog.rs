use super::{EffectSpec, EggDef, EggTrigger};

/// The shipped easter eggs. Ids are stable: they key the persisted unlock
/// set, so renaming one orphans everyone's discovery.
pub fn default_catalog() -> Vec<EggDef> {
    vec![
        EggDef {
            id: "konami",
            name: "Konami Code",
            description: "The classics never die",
            trigger: EggTrigger::KeySequence("konami"),
            slide_specific: None,
            effect: EffectSpec::RetroMode,
        },
        EggDef {
            id: "matrix",
            name: "Digital Rain",
            description: "Type the word that started it all",
            trigger: EggTrigger::KeySequence("matrix"),
            slide_specific: None,
            effect: EffectSpec::MatrixRain { glyph_density: 0.8 },
        },
        EggDef {
            id: "shuffle",
            name: "Transition Roulette",
            description: "Let chance pick the next move",
            trigger: EggTrigger::KeySequence("shuffle"),
            slide_specific: None,
            effect: EffectSpec::TransitionShuffle,
        },
        EggDef {
            id: "time",
            name: "Clock Watcher",
            description: "Ask what time it is",
            trigger: EggTrigger::KeySequence("time"),
            slide_specific: None,
            effect: EffectSpec::ClockOverlay,
        },
        EggDef {
            id: "rainbow",
            name: "Full Spectrum",
            description: "Paint the deck in every color",
            trigger: EggTrigger::KeySequence("rainbow"),
            slide_specific: None,
            effect: EffectSpec::RainbowTheme,
        },
        EggDef {
            id: "confetti",
            name: "Confetti Explosion",
            description: "Ten clicks, no hesitation",
            trigger: EggTrigger::RapidClicks,
            slide_specific: None,
            effect: EffectSpec::ConfettiBurst {
                particle_count: 120,
            },
        },
        EggDef {
            id: "quake",
            name: "Earthquake",
            description: "Give the device a good shake",
            trigger: EggTrigger::Shake,
            slide_specific: None,
            effect: EffectSpec::ScreenShake { intensity: 0.7 },
        },
        EggDef {
            id: "vortex",
            name: "Vortex",
            description: "Draw a full circle with your finger",
            trigger: EggTrigger::CircleGesture,
            slide_specific: None,
            effect: EffectSpec::SpiralWarp { rotations: 3.0 },
        },
        EggDef {
            id: "spotlight",
            name: "Opening Night",
            description: "Double-tap the opening title",
            trigger: EggTrigger::DoubleClickTitle,
            slide_specific: Some(0),
            effect: EffectSpec::DiscoStrobe { bpm: 128 },
        },
        EggDef {
            id: "credits",
            name: "Patience Pays",
            description: "Hold a title down and wait",
            trigger: EggTrigger::LongPressTitle,
            slide_specific: None,
            effect: EffectSpec::SecretMessage {
                text: "Built slide by slide. Thanks for digging this deep.".to_string(),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gestures::GesturePayload;

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = default_catalog();
        for (i, a) in catalog.iter().enumerate() {
            for b in &catalog[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
        assert_eq!(catalog.len(), 10);
    }

    #[test]
    fn keystroke_triggers_match_their_own_sequence_only() {
        let catalog = default_catalog();
        let matrix = catalog.iter().find(|def| def.id == "matrix").unwrap();
        assert!(matrix.matches(&GesturePayload::KeystrokeMatch {
            sequence: "matrix".to_string()
        }));
        assert!(!matrix.matches(&GesturePayload::KeystrokeMatch {
            sequence: "rainbow".to_string()
        }));
        assert!(!matrix.matches(&GesturePayload::DoubleClick));
    }

    #[test]
    fn every_trigger_kind_is_represented() {
        let catalog = default_catalog();
        assert!(catalog
            .iter()
            .any(|def| matches!(def.trigger, EggTrigger::RapidClicks)));
        assert!(catalog
            .iter()
            .any(|def| matches!(def.trigger, EggTrigger::Shake)));
        assert!(catalog
            .iter()
            .any(|def| matches!(def.trigger, EggTrigger::CircleGesture)));
        assert!(catalog
            .iter()
            .any(|def| def.slide_specific.is_some()));
    }
}

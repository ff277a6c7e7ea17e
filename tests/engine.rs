use std::time::Duration;

use tempfile::TempDir;

use deckflow::{
    EngineConfig, EngineEvent, KeyInput, PointerInput, PresentationEngine, Slide, TargetClass,
};

fn deck(count: usize, duration_secs: u32) -> Vec<Slide> {
    (0..count)
        .map(|i| Slide::new(format!("slide-{i}"), format!("Slide {i}"), duration_secs))
        .collect()
}

async fn engine_in(dir: &TempDir, slides: Vec<Slide>) -> PresentationEngine {
    PresentationEngine::new(slides, EngineConfig::new(dir.path()))
        .await
        .unwrap()
}

fn pointer(x: f64, at_ms: u64, target: TargetClass) -> PointerInput {
    PointerInput {
        x,
        y: 200.0,
        at_ms,
        target,
    }
}

fn key(code: &str) -> KeyInput {
    KeyInput {
        code: code.to_string(),
        ch: None,
    }
}

fn typed(c: char) -> KeyInput {
    KeyInput {
        code: format!("Key{}", c.to_ascii_uppercase()),
        ch: Some(c),
    }
}

/// Let spawned timer tasks run after advancing the paused clock.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

fn drain(events: &mut tokio::sync::broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

#[tokio::test]
async fn index_stays_in_range_for_arbitrary_navigation() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(5, 10)).await;

    engine.prev().await;
    assert_eq!(engine.session().await.current_slide, 0);

    for _ in 0..9 {
        engine.next().await;
        let index = engine.session().await.current_slide;
        assert!(index < 5, "index {index} escaped the deck");
    }

    engine.goto(4).await.unwrap();
    assert!(engine.goto(7).await.is_err());
    assert_eq!(engine.session().await.current_slide, 4);

    for _ in 0..9 {
        engine.prev().await;
        assert!(engine.session().await.current_slide < 5);
    }
}

#[tokio::test]
async fn committed_swipe_advances_the_deck() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(5, 10)).await;
    engine.goto(2).await.unwrap();

    // offset -150px, release velocity -600px/s: well past both thresholds.
    engine
        .pointer_down(pointer(300.0, 0, TargetClass::Stage))
        .await;
    engine
        .pointer_move(pointer(210.0, 100, TargetClass::Stage))
        .await;
    engine
        .pointer_up(pointer(150.0, 200, TargetClass::Stage))
        .await;

    assert_eq!(engine.session().await.current_slide, 3);
}

#[tokio::test]
async fn timid_swipe_snaps_back_without_moving() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(5, 10)).await;
    engine.goto(2).await.unwrap();

    engine
        .pointer_down(pointer(300.0, 0, TargetClass::Stage))
        .await;
    engine
        .pointer_up(pointer(260.0, 400, TargetClass::Stage))
        .await;

    assert_eq!(engine.session().await.current_slide, 2);
}

#[tokio::test(start_paused = true)]
async fn autoplay_counts_one_second_per_tick_and_completes() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(2, 3)).await;
    let mut events = engine.subscribe();

    engine.toggle_play().await;
    assert_eq!(engine.session().await.time_left, 3);

    for expected in [2u32, 1] {
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        let session = engine.session().await;
        assert_eq!(session.time_left, expected);
        assert_eq!(session.current_slide, 0);
    }

    // Third second: the countdown hits zero and advances exactly once.
    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;
    let session = engine.session().await;
    assert_eq!(session.current_slide, 1);
    assert_eq!(session.time_left, 3);
    assert!(session.is_playing);

    // Let the second slide run out: the deck completes, playback stops, and
    // the index wraps to the start.
    for _ in 0..3 {
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
    }
    let session = engine.session().await;
    assert_eq!(session.current_slide, 0);
    assert!(!session.is_playing);

    let seen = drain(&mut events);
    let completions = seen
        .iter()
        .filter(|event| matches!(event, EngineEvent::DeckCompleted))
        .count();
    assert_eq!(completions, 1);
}

#[tokio::test]
async fn ten_rapid_clicks_explode_confetti_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(3, 10)).await;
    let mut events = engine.subscribe();

    for i in 0..10u64 {
        let at = i * 100;
        engine
            .pointer_down(pointer(400.0, at, TargetClass::Stage))
            .await;
        engine
            .pointer_up(pointer(400.0, at, TargetClass::Stage))
            .await;
    }

    let confetti_starts = |seen: &[EngineEvent]| {
        seen.iter()
            .filter(|event| {
                matches!(event, EngineEvent::EffectStarted { egg_id, .. } if egg_id == "confetti")
            })
            .count()
    };

    let seen = drain(&mut events);
    assert_eq!(confetti_starts(&seen), 1);

    // A later click after a 400ms gap starts a fresh run; nothing fires.
    engine
        .pointer_down(pointer(400.0, 1400, TargetClass::Stage))
        .await;
    engine
        .pointer_up(pointer(400.0, 1400, TargetClass::Stage))
        .await;
    assert_eq!(confetti_starts(&drain(&mut events)), 0);
}

#[tokio::test]
async fn confetti_unlock_survives_reopening_the_presentation() {
    let dir = tempfile::tempdir().unwrap();

    {
        let engine = engine_in(&dir, deck(3, 10)).await;
        for i in 0..10u64 {
            let at = i * 100;
            engine
                .pointer_down(pointer(400.0, at, TargetClass::Stage))
                .await;
            engine
                .pointer_up(pointer(400.0, at, TargetClass::Stage))
                .await;
        }
        engine.close().await.unwrap();
    }

    let engine = engine_in(&dir, deck(3, 10)).await;
    let summaries = engine.egg_summaries().await;
    let confetti = summaries.iter().find(|egg| egg.id == "confetti").unwrap();
    assert!(confetti.unlocked);
    assert!(!confetti.active);
}

#[tokio::test(start_paused = true)]
async fn long_press_fires_at_three_seconds_not_before() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(3, 10)).await;
    let mut events = engine.subscribe();

    // Held for 2999ms: released just before the threshold, nothing fires.
    engine
        .pointer_down(pointer(100.0, 0, TargetClass::Title))
        .await;
    tokio::time::advance(Duration::from_millis(2999)).await;
    settle().await;
    engine
        .pointer_up(pointer(100.0, 2999, TargetClass::Title))
        .await;
    let seen = drain(&mut events);
    assert!(
        !seen
            .iter()
            .any(|event| matches!(event, EngineEvent::GestureRecognized { .. })),
        "premature long press in {seen:?}"
    );

    // Held past the threshold: the hold timer fires while still pressed.
    engine
        .pointer_down(pointer(100.0, 5000, TargetClass::Title))
        .await;
    tokio::time::advance(Duration::from_millis(3000)).await;
    settle().await;

    let seen = drain(&mut events);
    assert!(seen
        .iter()
        .any(|event| matches!(event, EngineEvent::GestureRecognized { .. })));
    assert!(seen.iter().any(|event| {
        matches!(event, EngineEvent::EffectStarted { egg_id, .. } if egg_id == "credits")
    }));
}

#[tokio::test(start_paused = true)]
async fn konami_unlocks_once_and_clears_its_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(3, 10)).await;
    let mut events = engine.subscribe();

    let sequence = [
        "ArrowUp",
        "ArrowUp",
        "ArrowDown",
        "ArrowDown",
        "ArrowLeft",
        "ArrowRight",
        "ArrowLeft",
        "ArrowRight",
        "KeyB",
        "KeyA",
    ];
    for code in sequence {
        engine.handle_key(key(code)).await;
    }

    let konami_unlocks = |seen: &[EngineEvent]| {
        seen.iter()
            .filter(|event| {
                matches!(
                    event,
                    EngineEvent::EggUnlocked {
                        egg_id,
                        first_discovery: true,
                    } if egg_id == "konami"
                )
            })
            .count()
    };

    let seen = drain(&mut events);
    assert_eq!(konami_unlocks(&seen), 1);
    // The arrows also drove navigation; wherever we ended up, it is inside
    // the deck.
    assert!(engine.session().await.current_slide < 3);

    // Matching cleared the buffer: the trailing B+A alone cannot re-fire.
    engine.handle_key(key("KeyB")).await;
    engine.handle_key(key("KeyA")).await;
    let seen = drain(&mut events);
    assert_eq!(konami_unlocks(&seen), 0);
}

#[tokio::test(start_paused = true)]
async fn typed_word_trigger_rains_code() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(3, 10)).await;
    let mut events = engine.subscribe();

    for c in "matrix".chars() {
        engine.handle_key(typed(c)).await;
    }

    let seen = drain(&mut events);
    assert!(seen.iter().any(|event| {
        matches!(event, EngineEvent::EffectStarted { egg_id, .. } if egg_id == "matrix")
    }));
}

#[tokio::test]
async fn visiting_every_slide_completes_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(4, 10)).await;

    engine.goto(2).await.unwrap();
    engine.goto(1).await.unwrap();
    engine.goto(3).await.unwrap();

    let report = engine.close().await.unwrap();
    assert_eq!(report.completion_rate, 1.0);
    assert_eq!(report.skip_rate, 0.0);
    assert_eq!(report.slides_viewed, vec![0, 1, 2, 3]);
    // Four visits closed by navigation and finalize, one sample each.
    assert_eq!(report.dwell_samples.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn close_tears_the_session_down() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(&dir, deck(3, 10)).await;
    let mut events = engine.subscribe();

    engine.toggle_play().await;
    for c in "rainbow".chars() {
        engine.handle_key(typed(c)).await;
    }

    let report = engine.close().await.unwrap();
    assert_eq!(report.eggs_discovered, vec!["rainbow"]);
    assert!(report.gestures_used.iter().any(|kind| {
        *kind == deckflow::GestureKind::KeystrokeMatch
    }));

    let session = engine.session().await;
    assert!(!session.is_playing);
    assert!(session.ended_at.is_some());

    let seen = drain(&mut events);
    assert!(seen.iter().any(|event| {
        matches!(event, EngineEvent::EffectEnded { egg_id, expired: false } if egg_id == "rainbow")
    }));
    assert!(seen
        .iter()
        .any(|event| matches!(event, EngineEvent::SessionClosed { .. })));

    // A session closes once.
    assert!(engine.close().await.is_err());
}

#[tokio::test]
async fn forced_slide_transition_overrides_the_selection() {
    let dir = tempfile::tempdir().unwrap();
    let mut slides = deck(3, 10);
    slides[1] = slides[1]
        .clone()
        .with_transition(deckflow::TransitionVariant::Origami);
    let engine = engine_in(&dir, slides).await;
    let mut events = engine.subscribe();

    engine.next().await;
    let seen = drain(&mut events);
    let transition = seen.iter().find_map(|event| match event {
        EngineEvent::TransitionStarted { transition } => Some(*transition),
        _ => None,
    });
    assert_eq!(
        transition.unwrap().variant,
        deckflow::TransitionVariant::Origami
    );
}

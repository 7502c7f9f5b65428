//! End-to-end conversation flow through the real dispatcher and tokio runtime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use hamlet::{
    Direction, Entity, GameEvent, GameState, GenerationBackend, GenerationError, GreetingDispatcher,
    GreetingGenerator, GreetingSource, MessageImportance, PlayerIntent, Position, WanderState, FALLBACK_LINES,
};
use tokio::runtime::Runtime;

const TICK: f32 = 1.0 / 60.0;

/// Answers with the speaker's name after a delay.
struct NamedReply {
    delay: Duration,
}

#[async_trait]
impl GenerationBackend for NamedReply {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        tokio::time::sleep(self.delay).await;
        let name = prompt
            .trim_start_matches("You are ")
            .split(',')
            .next()
            .unwrap_or_default();
        Ok(format!("{} greets you.", name))
    }

    fn name(&self) -> &str {
        "named-reply"
    }
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("runtime")
}

/// Village with villagers parked so only the chosen one is in reach.
fn village() -> GameState {
    let mut state = GameState::new(4242).expect("village");
    for npc in state.npcs.iter_mut() {
        npc.wander = WanderState::idle_facing(10_000.0, Direction::East);
    }
    state
}

/// Ticks until the dialogue opens or `limit` passes. Returns all events seen.
fn tick_until_open(
    state: &mut GameState,
    dispatcher: &mut GreetingDispatcher,
    limit: Duration,
) -> Vec<GameEvent> {
    let mut seen = Vec::new();
    let start = Instant::now();
    while !state.dialogue.is_active() && start.elapsed() < limit {
        seen.extend(state.update(TICK, &[], dispatcher));
        std::thread::sleep(Duration::from_millis(5));
    }
    seen
}

#[test]
fn test_offline_villager_answers_with_fallback() {
    let rt = runtime();
    let mut dispatcher =
        GreetingDispatcher::new(rt.handle().clone(), Arc::new(GreetingGenerator::offline()));
    let mut state = village();

    // Stand on the blacksmith's tile, south-west of centre.
    state.player.position = Position::new(200.0, 200.0);
    let events = state.update(TICK, &[PlayerIntent::Interact], &mut dispatcher);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::GreetingRequested { speaker, .. } if speaker == "Blacksmith")));

    let events = tick_until_open(&mut state, &mut dispatcher, Duration::from_secs(3));

    assert!(state.dialogue.is_active());
    assert_eq!(state.dialogue.speaker(), "Blacksmith");
    assert!(FALLBACK_LINES.contains(&state.dialogue.text()));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Message { importance: MessageImportance::Warning, .. }
    )));
}

#[test]
fn test_frame_loop_keeps_running_while_waiting() {
    let rt = runtime();
    let generator = GreetingGenerator::new(
        Arc::new(NamedReply {
            delay: Duration::from_millis(300),
        }),
        Duration::from_secs(2),
    );
    let mut dispatcher = GreetingDispatcher::new(rt.handle().clone(), Arc::new(generator));
    let mut state = village();
    state.player.position = Position::new(200.0, 200.0);

    let start = Instant::now();
    state.update(TICK, &[PlayerIntent::Interact], &mut dispatcher);
    assert!(start.elapsed() < Duration::from_millis(100));
    assert!(dispatcher.is_pending());

    // The player can still walk while the villager thinks.
    let before = state.player.position;
    state.update(0.05, &[PlayerIntent::Move { dx: -1.0, dy: 0.0 }], &mut dispatcher);
    assert_ne!(state.player.position, before);
    assert!(!state.dialogue.is_active());

    let events = tick_until_open(&mut state, &mut dispatcher, Duration::from_secs(3));
    assert_eq!(state.dialogue.text(), "Blacksmith greets you.");
    assert!(events.contains(&GameEvent::DialogueOpened {
        speaker: "Blacksmith".to_string(),
        text: "Blacksmith greets you.".to_string(),
    }));
}

#[test]
fn test_second_interaction_supersedes_first() {
    let rt = runtime();
    let generator = GreetingGenerator::new(
        Arc::new(NamedReply {
            delay: Duration::from_millis(150),
        }),
        Duration::from_secs(2),
    );
    let mut dispatcher = GreetingDispatcher::new(rt.handle().clone(), Arc::new(generator));
    let mut state = village();

    state.player.position = Position::new(200.0, 200.0);
    state.update(TICK, &[PlayerIntent::Interact], &mut dispatcher);

    // Walk over to the innkeeper before the blacksmith answers.
    let innkeeper = state.npc_named("Innkeeper").expect("innkeeper").position();
    state.player.position = Position::new(innkeeper.x - 10.0, innkeeper.y);
    state.update(TICK, &[PlayerIntent::Interact], &mut dispatcher);
    assert_eq!(dispatcher.pending_speaker(), Some("Innkeeper"));

    tick_until_open(&mut state, &mut dispatcher, Duration::from_secs(3));
    assert_eq!(state.dialogue.speaker(), "Innkeeper");
    assert_eq!(state.dialogue.text(), "Innkeeper greets you.");

    // The blacksmith's answer never replaces it.
    std::thread::sleep(Duration::from_millis(300));
    state.update(TICK, &[], &mut dispatcher);
    assert_eq!(state.dialogue.speaker(), "Innkeeper");
}

#[test]
fn test_interact_toggles_dialogue_closed() {
    let rt = runtime();
    let mut dispatcher =
        GreetingDispatcher::new(rt.handle().clone(), Arc::new(GreetingGenerator::offline()));
    let mut state = village();
    state.player.position = Position::new(200.0, 200.0);

    state.update(TICK, &[PlayerIntent::Interact], &mut dispatcher);
    tick_until_open(&mut state, &mut dispatcher, Duration::from_secs(3));
    assert!(state.dialogue.is_active());

    let events = state.update(TICK, &[PlayerIntent::Interact], &mut dispatcher);
    assert!(events.contains(&GameEvent::DialogueClosed));
    assert!(!state.dialogue.is_active());
    assert_eq!(state.dialogue.speaker(), "");
    assert_eq!(state.dialogue.text(), "");
    assert!(!dispatcher.is_pending());
}

#[test]
fn test_escape_while_waiting_drops_the_reply() {
    let rt = runtime();
    let generator = GreetingGenerator::new(
        Arc::new(NamedReply {
            delay: Duration::from_millis(100),
        }),
        Duration::from_secs(2),
    );
    let mut dispatcher = GreetingDispatcher::new(rt.handle().clone(), Arc::new(generator));
    let mut state = village();
    state.player.position = Position::new(200.0, 200.0);

    state.update(TICK, &[PlayerIntent::Interact], &mut dispatcher);
    state.update(TICK, &[PlayerIntent::CloseDialogue], &mut dispatcher);
    assert!(!dispatcher.is_pending());

    std::thread::sleep(Duration::from_millis(300));
    state.update(TICK, &[], &mut dispatcher);
    assert!(!state.dialogue.is_active());
}

#[test]
fn test_asking_replaces_the_greeting() {
    let rt = runtime();
    let generator = GreetingGenerator::new(
        Arc::new(NamedReply {
            delay: Duration::from_millis(10),
        }),
        Duration::from_secs(2),
    );
    let mut dispatcher = GreetingDispatcher::new(rt.handle().clone(), Arc::new(generator));
    let mut state = village();
    state.dialogue.open("Merchant", "Fine wares!");

    state.update(
        TICK,
        &[PlayerIntent::Ask("Who do you trust?".to_string())],
        &mut dispatcher,
    );
    assert_eq!(dispatcher.pending_speaker(), Some("Merchant"));

    let start = Instant::now();
    while state.dialogue.text() == "Fine wares!" && start.elapsed() < Duration::from_secs(3) {
        state.update(TICK, &[], &mut dispatcher);
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(state.dialogue.speaker(), "Merchant");
    assert_eq!(state.dialogue.text(), "Merchant greets you.");
}

#[test]
fn test_closing_with_interact_drops_pending_answer() {
    let rt = runtime();
    let generator = GreetingGenerator::new(
        Arc::new(NamedReply {
            delay: Duration::from_millis(100),
        }),
        Duration::from_secs(2),
    );
    let mut dispatcher = GreetingDispatcher::new(rt.handle().clone(), Arc::new(generator));
    let mut state = village();
    state.dialogue.open("Merchant", "Fine wares!");

    state.update(
        TICK,
        &[PlayerIntent::Ask("Where were you last night?".to_string())],
        &mut dispatcher,
    );
    state.update(TICK, &[PlayerIntent::Interact], &mut dispatcher);
    assert!(!state.dialogue.is_active());
    assert!(!dispatcher.is_pending());

    std::thread::sleep(Duration::from_millis(300));
    state.update(TICK, &[], &mut dispatcher);
    assert!(!state.dialogue.is_active());
    assert_eq!(state.dialogue.text(), "");
}

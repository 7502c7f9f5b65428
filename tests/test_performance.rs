//! Performance tests for the simulation tick

use std::time::Instant;

use hamlet::{GameState, GreetingReply, GreetingSource, HamletResult, Npc, PlayerIntent};

/// Source that never has anything to say.
struct Silent;

impl GreetingSource for Silent {
    fn request_greeting(&mut self, _npc: &Npc) {}

    fn request_response(&mut self, _npc: &Npc, _utterance: &str) {}

    fn poll(&mut self) -> Option<GreetingReply> {
        None
    }

    fn cancel(&mut self) -> bool {
        false
    }

    fn is_pending(&self) -> bool {
        false
    }
}

#[test]
fn test_update_performance() -> HamletResult<()> {
    let mut game_state = GameState::new(12345)?;
    let mut greetings = Silent;

    let start = Instant::now();
    let iterations = 10_000u32;

    for i in 0..iterations {
        // Walk a small square so movement checks run every frame.
        let intent = match (i / 30) % 4 {
            0 => PlayerIntent::Move { dx: 1.0, dy: 0.0 },
            1 => PlayerIntent::Move { dx: 0.0, dy: 1.0 },
            2 => PlayerIntent::Move { dx: -1.0, dy: 0.0 },
            _ => PlayerIntent::Move { dx: 0.0, dy: -1.0 },
        };
        let _events = game_state.update(1.0 / 60.0, &[intent], &mut greetings);
    }

    let elapsed = start.elapsed();
    let avg_tick_time = elapsed / iterations;

    println!("Average tick time: {:?}", avg_tick_time);
    println!(
        "Theoretical max FPS: {:.1}",
        1.0 / avg_tick_time.as_secs_f64()
    );

    // A tick has to leave nearly the whole 60 FPS budget to rendering
    assert!(
        avg_tick_time.as_millis() < 1,
        "Simulation tick too slow: {:?}",
        avg_tick_time
    );

    Ok(())
}

#[test]
fn test_proximity_query_performance() -> HamletResult<()> {
    let game_state = GameState::new(12345)?;

    let start = Instant::now();
    let iterations = 100_000u32;

    for _ in 0..iterations {
        let _nearby = game_state.nearby_npc();
    }

    let elapsed = start.elapsed();
    let avg_query_time = elapsed / iterations;

    println!("Average proximity query time: {:?}", avg_query_time);

    assert!(
        avg_query_time.as_micros() < 50,
        "Proximity queries too slow: {:?}",
        avg_query_time
    );

    Ok(())
}

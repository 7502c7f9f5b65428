//! # Wander Behaviour
//!
//! Memoryless random walk for villagers.
//!
//! Each villager alternates between standing still and walking in one
//! cardinal direction. A countdown timer decides when to switch. Walking into
//! anything that is not open ground cuts the walk short and the villager
//! pauses briefly before choosing again. There is no pathfinding.

use crate::game::{Direction, Entity, Npc, TileGrid};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Seconds a villager walks once it starts moving.
pub const MOVE_DURATION: RangeInclusive<f32> = 0.5..=2.0;

/// Seconds a villager stands still after a walk.
pub const IDLE_DURATION: RangeInclusive<f32> = 1.0..=3.0;

/// Seconds a villager pauses after bumping into an obstacle.
pub const COLLISION_PAUSE: RangeInclusive<f32> = 0.2..=0.5;

/// The two behaviour modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WanderMode {
    Idle,
    Moving,
}

/// Mode, countdown and committed direction of one villager.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WanderState {
    pub mode: WanderMode,
    /// Seconds left in the current mode
    pub timer: f32,
    /// Direction walked while moving
    pub direction: Direction,
}

/// What a single wander update did to the villager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WanderOutcome {
    /// Stood still this tick
    Stood,
    /// Walked to a new position
    Moved,
    /// Tried to walk into an obstacle and stopped
    Blocked,
}

impl WanderState {
    /// Idle state that will walk towards `direction` only if it is re-rolled to it.
    pub fn idle_facing(timer: f32, direction: Direction) -> Self {
        Self {
            mode: WanderMode::Idle,
            timer,
            direction,
        }
    }

    /// Moving state committed to `direction` for `timer` seconds.
    pub fn moving(timer: f32, direction: Direction) -> Self {
        Self {
            mode: WanderMode::Moving,
            timer,
            direction,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.mode == WanderMode::Moving
    }

    /// Counts the timer down and switches mode when it runs out.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        self.timer -= dt;
        if self.timer > 0.0 {
            return;
        }

        match self.mode {
            WanderMode::Moving => {
                self.mode = WanderMode::Idle;
                self.timer = rng.gen_range(IDLE_DURATION);
            }
            WanderMode::Idle => {
                self.mode = WanderMode::Moving;
                self.direction = Direction::cardinal()[rng.gen_range(0..4)];
                self.timer = rng.gen_range(MOVE_DURATION);
            }
        }
    }

    /// Abandons the current walk after hitting an obstacle.
    pub fn collide<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.mode = WanderMode::Idle;
        self.timer = rng.gen_range(COLLISION_PAUSE);
    }
}

/// Runs one tick of wander behaviour for a villager.
///
/// The timer transition happens first, then a moving villager attempts a step
/// of `speed * dt`. The step is committed only if the destination tile is
/// walkable.
pub fn update_wanderer<R: Rng + ?Sized>(
    npc: &mut Npc,
    grid: &TileGrid,
    dt: f32,
    rng: &mut R,
) -> WanderOutcome {
    npc.wander.advance(dt, rng);

    if !npc.wander.is_moving() {
        return WanderOutcome::Stood;
    }

    let destination = npc.position().step(npc.wander.direction, npc.speed * dt);
    if grid.is_walkable_world(destination) {
        npc.commit_position(destination);
        WanderOutcome::Moved
    } else {
        npc.wander.collide(rng);
        WanderOutcome::Blocked
    }
}

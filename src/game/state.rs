//! # Game State Module
//!
//! Central simulation state and the per-tick update.
//!
//! [`GameState`] owns everything the village needs between frames: the tile
//! grid, the player, the villagers, the dialogue box and the random source
//! driving villager behaviour. The host loop hands it the frame's player
//! intents and a [`GreetingSource`]; nothing is global.

use crate::ai::{GreetingReply, GreetingSource};
use crate::config::{INTERACTION_RADIUS, PLAYER_SPAWN_TILE};
use crate::dialogue::DialogueSession;
use crate::game::{
    find_nearby, update_wanderer, Entity, EntityId, Npc, NpcColor, Player, Position, TileGrid,
    WanderOutcome,
};
use crate::{HamletError, HamletResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Something the player asked for this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerIntent {
    /// Walk along `(dx, dy)`; each component is -1, 0 or 1
    Move { dx: f32, dy: f32 },
    /// Talk to the nearest villager, or close the open dialogue
    Interact,
    /// Say something to the villager currently talking
    Ask(String),
    /// Close the dialogue box
    CloseDialogue,
    /// Leave the game
    Quit,
}

/// How prominently a message should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageImportance {
    Info,
    Hint,
    Warning,
}

/// Observable outcome of an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Text for the message log
    Message {
        text: String,
        importance: MessageImportance,
    },
    /// A speech request went out to a villager
    GreetingRequested { npc_id: EntityId, speaker: String },
    /// The dialogue box now shows a line
    DialogueOpened { speaker: String, text: String },
    /// The dialogue box was hidden
    DialogueClosed,
    /// The player's position changed
    PlayerMoved { from: Position, to: Position },
    /// The player asked to leave
    QuitRequested,
}

impl GameEvent {
    fn message(text: impl Into<String>, importance: MessageImportance) -> Self {
        GameEvent::Message {
            text: text.into(),
            importance,
        }
    }
}

/// The whole simulation between two frames.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Static map
    pub grid: TileGrid,
    /// The detective
    pub player: Player,
    /// Villagers in creation order, which is also interaction priority
    pub npcs: Vec<Npc>,
    /// The dialogue box
    pub dialogue: DialogueSession,
    /// Maximum distance for starting a conversation
    pub interaction_radius: f32,
    /// Seconds simulated so far
    pub elapsed: f32,
    rng: StdRng,
}

impl GameState {
    /// Creates the reference village: map, spawn point and three villagers.
    ///
    /// # Examples
    ///
    /// ```
    /// use hamlet::GameState;
    ///
    /// let state = GameState::new(12345).unwrap();
    /// assert_eq!(state.npcs.len(), 3);
    /// assert!(!state.dialogue.is_active());
    /// ```
    pub fn new(seed: u64) -> HamletResult<Self> {
        let mut state = Self::with_grid(TileGrid::village(), seed)?;

        let roster = [
            ("Blacksmith", (6, 6), NpcColor::Blue),
            ("Innkeeper", (12, 6), NpcColor::Green),
            ("Merchant", (17, 8), NpcColor::Yellow),
        ];
        for (name, tile, color) in roster {
            let npc = Npc::on_tile(name, &state.grid, tile, color, &mut state.rng);
            state.add_npc(npc)?;
        }

        info!("Created {} villagers", state.npcs.len());
        Ok(state)
    }

    /// Creates an empty village on `grid` with the player at the spawn tile.
    pub fn with_grid(grid: TileGrid, seed: u64) -> HamletResult<Self> {
        let (sx, sy) = PLAYER_SPAWN_TILE;
        if !grid.is_walkable(sx, sy) {
            return Err(HamletError::InvalidState(format!(
                "spawn tile ({}, {}) is not walkable",
                sx, sy
            )));
        }
        let player = Player::new("Detective", grid.tile_center(sx, sy));

        Ok(Self {
            grid,
            player,
            npcs: Vec::new(),
            dialogue: DialogueSession::new(),
            interaction_radius: INTERACTION_RADIUS,
            elapsed: 0.0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Adds a villager, rejecting one placed on a blocked tile.
    pub fn add_npc(&mut self, npc: Npc) -> HamletResult<EntityId> {
        if !self.grid.is_walkable_world(npc.position()) {
            return Err(HamletError::InvalidState(format!(
                "{} placed on a blocked tile at {:?}",
                npc.name,
                npc.position()
            )));
        }
        let id = npc.id;
        self.npcs.push(npc);
        Ok(id)
    }

    /// Looks up a villager by id.
    pub fn npc(&self, id: EntityId) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.id == id)
    }

    /// Looks up a villager by display name.
    pub fn npc_named(&self, name: &str) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.name == name)
    }

    /// The first villager within reach of the player.
    pub fn nearby_npc(&self) -> Option<&Npc> {
        find_nearby(self.player.position(), &self.npcs, self.interaction_radius)
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Order: deliver a finished reply, apply the player's intents, then let
    /// every villager wander.
    pub fn update(
        &mut self,
        dt: f32,
        intents: &[PlayerIntent],
        greetings: &mut dyn GreetingSource,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.elapsed += dt;

        if let Some(reply) = greetings.poll() {
            self.deliver(reply, &mut events);
        }

        for intent in intents {
            self.apply_intent(intent, dt, greetings, &mut events);
        }

        self.update_npcs(dt);
        events
    }

    fn deliver(&mut self, reply: GreetingReply, events: &mut Vec<GameEvent>) {
        if reply.fallback {
            events.push(GameEvent::message(
                format!("{} seems distracted; the generation service did not answer.", reply.speaker),
                MessageImportance::Warning,
            ));
        }
        self.dialogue.open(&reply.speaker, &reply.text);
        events.push(GameEvent::DialogueOpened {
            speaker: reply.speaker,
            text: reply.text,
        });
    }

    fn apply_intent(
        &mut self,
        intent: &PlayerIntent,
        dt: f32,
        greetings: &mut dyn GreetingSource,
        events: &mut Vec<GameEvent>,
    ) {
        match intent {
            PlayerIntent::Move { dx, dy } => {
                // The detective stands still while talking.
                if self.dialogue.is_active() {
                    return;
                }
                let from = self.player.position;
                if self.player.try_move(*dx, *dy, dt, &self.grid) {
                    events.push(GameEvent::PlayerMoved {
                        from,
                        to: self.player.position,
                    });
                }
            }

            PlayerIntent::Interact => self.interact(greetings, events),

            PlayerIntent::Ask(utterance) => {
                if !self.dialogue.is_active() {
                    events.push(GameEvent::message(
                        "You are not talking to anyone.",
                        MessageImportance::Hint,
                    ));
                    return;
                }
                let Some(npc) = self.npc_named(self.dialogue.speaker()) else {
                    return;
                };
                greetings.request_response(npc, utterance);
                events.push(GameEvent::message(
                    format!("You ask {}: \"{}\"", npc.name, utterance),
                    MessageImportance::Info,
                ));
                events.push(GameEvent::GreetingRequested {
                    npc_id: npc.id,
                    speaker: npc.name.clone(),
                });
            }

            PlayerIntent::CloseDialogue => {
                let cancelled = greetings.cancel();
                if cancelled {
                    debug!("Pending request dropped with the dialogue");
                }
                if self.dialogue.is_active() {
                    self.dialogue.close();
                    events.push(GameEvent::DialogueClosed);
                }
            }

            PlayerIntent::Quit => events.push(GameEvent::QuitRequested),
        }
    }

    /// Toggles the conversation: closes an open one along with any answer
    /// still on its way, or starts one with the first villager in reach.
    fn interact(&mut self, greetings: &mut dyn GreetingSource, events: &mut Vec<GameEvent>) {
        if self.dialogue.is_active() {
            if greetings.cancel() {
                debug!("Pending request dropped with the dialogue");
            }
            self.dialogue.close();
            events.push(GameEvent::DialogueClosed);
            return;
        }

        match self.nearby_npc() {
            Some(npc) => {
                info!("Starting dialogue with {}", npc.name);
                greetings.request_greeting(npc);
                events.push(GameEvent::GreetingRequested {
                    npc_id: npc.id,
                    speaker: npc.name.clone(),
                });
            }
            None => events.push(GameEvent::message(
                "No one nearby to talk to. Get closer to a villager and press E.",
                MessageImportance::Hint,
            )),
        }
    }

    fn update_npcs(&mut self, dt: f32) {
        for npc in self.npcs.iter_mut() {
            if update_wanderer(npc, &self.grid, dt, &mut self.rng) == WanderOutcome::Blocked {
                debug!("{} bumped into something", npc.name);
            }
        }
    }
}

//! Game Events
//!
//! Everything observable that happened during a frame. The state machine
//! returns them in [`crate::game::tick::TickResult`]; adapters log them or
//! react (the client exits on `QuitRequested`).

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vector2;
use crate::game::player::{PlayerAction, RejectReason};
use crate::game::state::GameState;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Active state changed
    StateChanged {
        /// Previous state
        from: GameState,
        /// New state
        to: GameState,
    },

    /// Player created by "New Game"
    PlayerSpawned {
        /// Spawn point
        position: Vector2,
    },

    /// Player health reached zero
    PlayerDied,

    /// Attack went through
    AttackPerformed,

    /// Roll went through
    RollPerformed {
        /// Burst velocity
        velocity: Vector2,
    },

    /// Action refused
    ActionRejected {
        /// Which action
        action: PlayerAction,
        /// Why
        reason: RejectReason,
    },

    /// Player took a hit
    DamageTaken {
        /// Damage requested (after difficulty scaling)
        amount: i32,
        /// Health after the hit
        health: i32,
    },

    /// Hit ignored because the player was invulnerable
    DamageBlocked,

    /// Instructions overlay toggled
    HelpToggled {
        /// Visible after the toggle
        visible: bool,
    },

    /// "Load Game" chosen; loading itself belongs to the save collaborator
    LoadRequested,

    /// "Quit" chosen
    QuitRequested,
}

/// A game event tagged with the frame it occurred on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Frame number
    pub frame: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(frame: u64, data: GameEventData) -> Self {
        Self { frame, data }
    }
}

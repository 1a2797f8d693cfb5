//! Game Logic Module
//!
//! Everything the frame loop touches. No windowing, no I/O.
//!
//! ## Module Structure
//!
//! - `input`: Keys, actions, bindings and per-frame snapshots
//! - `movement`: Acceleration/friction integrator and world clamp
//! - `camera`: Follow, spring smoothing, shake, bounds, transforms
//! - `player`: Player entity, stats, attack/roll/interact
//! - `menu`: Main menu buttons
//! - `state`: Menu/gameplay/pause state machine
//! - `tick`: One gameplay frame and session replay
//! - `events`: Game events for logging and replay

pub mod input;
pub mod movement;
pub mod camera;
pub mod player;
pub mod menu;
pub mod state;
pub mod tick;
pub mod events;

// Re-export key types
pub use input::{Action, InputSnapshot, InputSource, Key, KeyBindings, VirtualInput};
pub use movement::{MovementBounds, MovementState};
pub use camera::{Camera, FollowSettings, Positioned};
pub use player::{PlayerActionState, PlayerEntity, PlayerTuning};
pub use menu::{MainMenu, MenuAction};
pub use state::{GameState, StateMachine};
pub use tick::TickResult;
pub use events::GameEvent;

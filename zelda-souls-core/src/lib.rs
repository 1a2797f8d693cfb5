//! # Zelda Souls Core
//!
//! Frame loop for a small top-down action game: movement, camera, player
//! actions, and the menu/gameplay/pause state machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ZELDA SOULS CORE                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── vec2.rs     - Vector2 and Rectangle                     │
//! │  ├── direction.rs- Eight-way direction                       │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Frame loop                                │
//! │  ├── input.rs    - Keys, actions, snapshots                  │
//! │  ├── movement.rs - Acceleration/friction integrator          │
//! │  ├── camera.rs   - Follow, spring, shake, transforms         │
//! │  ├── player.rs   - Stats, attack/roll/interact               │
//! │  ├── menu.rs     - Main menu buttons                         │
//! │  ├── state.rs    - Menu/gameplay/pause machine               │
//! │  └── tick.rs     - Gameplay frame and replay                 │
//! │                                                              │
//! │  render.rs       - Draw intents (RenderSurface, DrawList)    │
//! │  config.rs       - TOML configuration                        │
//! │  save.rs         - Save slot lookup                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adapters
//!
//! The crate never opens a window. An adapter implements
//! [`game::input::InputSource`] and [`render::RenderSurface`], captures an
//! [`game::input::InputSnapshot`] each frame, calls
//! [`game::state::StateMachine::update`] and then
//! [`game::state::StateMachine::render`].
//!
//! Given identical snapshots and frame durations, the machine produces
//! **identical state hashes** on every run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod render;
pub mod config;
pub mod save;

// Re-export commonly used types
pub use core::vec2::{Rectangle, Vector2};
pub use core::direction::Direction;
pub use game::input::{Action, InputSnapshot, InputSource, Key, KeyBindings, VirtualInput};
pub use game::state::{GameState, StateMachine};
pub use render::{Color, DrawList, RenderSurface};
pub use config::{ConfigError, GameConfig};
pub use save::{NoSaves, SaveDirectory, SaveSlots};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default config file name
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

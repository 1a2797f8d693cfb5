//! Core primitives.
//!
//! Plain value types with no game rules: vectors and rectangles, the
//! eight-way direction, and the state hasher.

pub mod vec2;
pub mod direction;
pub mod hash;

// Re-export core types
pub use vec2::{Rectangle, Vector2};
pub use direction::Direction;
pub use hash::compute_state_hash;

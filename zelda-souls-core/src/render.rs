//! Render Intents
//!
//! The core never talks to a graphics backend. Every frame it describes
//! what to draw through [`RenderSurface`]; engine adapters implement the
//! trait, and [`DrawList`] records the calls so they can be replayed later
//! (or inspected in tests).

use serde::{Deserialize, Serialize};

use crate::core::vec2::{Rectangle, Vector2};

/// RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque red
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Opaque yellow
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// Opaque cyan
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    /// Opaque gray
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Create a color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Add `amount` to each color channel, saturating at 255.
    pub fn brighten(self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_add(amount),
            self.g.saturating_add(amount),
            self.b.saturating_add(amount),
            self.a,
        )
    }
}

/// Drawing capability supplied by the engine adapter.
///
/// All coordinates are screen pixels, origin top-left, +Y down.
pub trait RenderSurface {
    /// Draw a rectangle, filled or as a 1px outline.
    fn draw_rectangle(&mut self, rect: Rectangle, color: Color, filled: bool);

    /// Draw a line of text with its top-left corner at `position`.
    fn draw_text(&mut self, text: &str, position: Vector2, color: Color);
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// `draw_rectangle`
    Rectangle {
        /// Screen rectangle
        rect: Rectangle,
        /// Color
        color: Color,
        /// Filled or outline
        filled: bool,
    },
    /// `draw_text`
    Text {
        /// Text content
        text: String,
        /// Top-left corner
        position: Vector2,
        /// Color
        color: Color,
    },
}

/// Render surface that records every call in order.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands, in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the list empty.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forget all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// True if some text command contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.commands.iter().any(|cmd| match cmd {
            DrawCommand::Text { text, .. } => text.contains(needle),
            DrawCommand::Rectangle { .. } => false,
        })
    }

    /// Replay the recorded commands onto another surface.
    pub fn replay(&self, surface: &mut dyn RenderSurface) {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Rectangle { rect, color, filled } => {
                    surface.draw_rectangle(*rect, *color, *filled)
                }
                DrawCommand::Text { text, position, color } => {
                    surface.draw_text(text, *position, *color)
                }
            }
        }
    }
}

impl RenderSurface for DrawList {
    fn draw_rectangle(&mut self, rect: Rectangle, color: Color, filled: bool) {
        self.commands.push(DrawCommand::Rectangle { rect, color, filled });
    }

    fn draw_text(&mut self, text: &str, position: Vector2, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            position,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.draw_rectangle(Rectangle::new(0.0, 0.0, 10.0, 10.0), Color::RED, true);
        list.draw_text("hello", Vector2::new(1.0, 2.0), Color::WHITE);

        assert_eq!(list.len(), 2);
        assert!(matches!(list.commands()[0], DrawCommand::Rectangle { filled: true, .. }));
        assert!(list.contains_text("hell"));
        assert!(!list.contains_text("bye"));
    }

    #[test]
    fn test_replay_onto_another_list() {
        let mut source = DrawList::new();
        source.draw_text("a", Vector2::ZERO, Color::GRAY);
        source.draw_rectangle(Rectangle::new(1.0, 1.0, 2.0, 2.0), Color::BLUE, false);

        let mut target = DrawList::new();
        source.replay(&mut target);
        assert_eq!(source.commands(), target.commands());

        let drained = target.drain();
        assert_eq!(drained.len(), 2);
        assert!(target.is_empty());
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(Color::rgb(250, 10, 0).brighten(30), Color::rgb(255, 40, 30));
        assert_eq!(Color::WHITE.with_alpha(128).a, 128);
    }
}

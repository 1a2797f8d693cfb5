//! Bevy-backed input source.
//!
//! Reads `ButtonInput<KeyCode>`, `ButtonInput<MouseButton>` and the primary
//! window cursor, and exposes them to the core through `InputSource`.

use bevy::prelude::*;
use zelda_souls::{InputSource, Key, KeyBindings, Vector2};

/// Bevy key code for a core key.
pub fn key_code(key: Key) -> KeyCode {
    match key {
        Key::W => KeyCode::KeyW,
        Key::A => KeyCode::KeyA,
        Key::S => KeyCode::KeyS,
        Key::D => KeyCode::KeyD,
        Key::Z => KeyCode::KeyZ,
        Key::Q => KeyCode::KeyQ,
        Key::C => KeyCode::KeyC,
        Key::E => KeyCode::KeyE,
        Key::I => KeyCode::KeyI,
        Key::F => KeyCode::KeyF,
        Key::M => KeyCode::KeyM,
        Key::R => KeyCode::KeyR,
        Key::ArrowUp => KeyCode::ArrowUp,
        Key::ArrowDown => KeyCode::ArrowDown,
        Key::ArrowLeft => KeyCode::ArrowLeft,
        Key::ArrowRight => KeyCode::ArrowRight,
        Key::Space => KeyCode::Space,
        Key::Escape => KeyCode::Escape,
        Key::Enter => KeyCode::Enter,
        Key::Backspace => KeyCode::Backspace,
        Key::Tab => KeyCode::Tab,
        Key::LeftShift => KeyCode::ShiftLeft,
        Key::LeftControl => KeyCode::ControlLeft,
        Key::Digit1 => KeyCode::Digit1,
        Key::Digit2 => KeyCode::Digit2,
        Key::Digit3 => KeyCode::Digit3,
        Key::Digit4 => KeyCode::Digit4,
        Key::Equal => KeyCode::Equal,
        Key::Minus => KeyCode::Minus,
        Key::F12 => KeyCode::F12,
        Key::Backquote => KeyCode::Backquote,
    }
}

/// One frame of Bevy input, borrowed from the ECS.
pub struct BevyInput<'a> {
    pub keys: &'a ButtonInput<KeyCode>,
    pub mouse: &'a ButtonInput<MouseButton>,
    /// Cursor in core screen coordinates (top-left origin)
    pub cursor: Option<Vector2>,
    pub bindings: &'a KeyBindings,
}

impl InputSource for BevyInput<'_> {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.pressed(key_code(key))
    }

    fn is_key_just_pressed(&self, key: Key) -> bool {
        self.keys.just_pressed(key_code(key))
    }

    fn bindings(&self) -> &KeyBindings {
        self.bindings
    }

    fn cursor_position(&self) -> Option<Vector2> {
        self.cursor
    }

    fn is_mouse_pressed(&self) -> bool {
        self.mouse.pressed(MouseButton::Left)
    }
}

/// Window cursor (logical px) to core screen px when the window has been
/// resized away from the configured size.
pub fn cursor_to_screen(cursor: Vec2, window_size: Vec2, screen: Vector2) -> Option<Vector2> {
    if window_size.x <= 0.0 || window_size.y <= 0.0 {
        return None;
    }
    Some(Vector2::new(
        cursor.x as f64 * screen.x / window_size.x as f64,
        cursor.y as f64 * screen.y / window_size.y as f64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zelda_souls::{Action, InputSnapshot};

    #[test]
    fn test_key_codes_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for key in Key::ALL {
            assert!(seen.insert(key_code(key)), "{key:?} maps to a used code");
        }
    }

    #[test]
    fn test_snapshot_from_bevy_input() {
        let mut keys = ButtonInput::<KeyCode>::default();
        let mouse = ButtonInput::<MouseButton>::default();
        let bindings = KeyBindings::default();
        keys.press(KeyCode::KeyD);

        let input = BevyInput {
            keys: &keys,
            mouse: &mouse,
            cursor: None,
            bindings: &bindings,
        };
        let snapshot = InputSnapshot::capture(&input);
        assert!(snapshot.is_held(Action::MoveRight));
        assert!(snapshot.is_just_pressed(Action::MoveRight));
        assert_eq!(snapshot.intent(), Vector2::new(1.0, 0.0));
    }

    #[test]
    fn test_cursor_scaling() {
        let screen = Vector2::new(1280.0, 720.0);
        let p = cursor_to_screen(Vec2::new(320.0, 180.0), Vec2::new(640.0, 360.0), screen);
        assert_eq!(p, Some(Vector2::new(640.0, 360.0)));
        assert_eq!(cursor_to_screen(Vec2::ZERO, Vec2::ZERO, screen), None);
    }
}

//! Input Capture and Normalization
//!
//! Engines report raw key and mouse state through [`InputSource`]. Once per
//! frame the state machine captures an immutable [`InputSnapshot`] from it:
//! held actions, actions and keys that went down this frame, and the mouse.
//! Everything downstream reads the snapshot, never the source.
//!
//! Held and just-pressed sets are packed into bit sets, so a snapshot is
//! `Copy` and a whole session can be recorded and replayed cheaply.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vector2;

// =============================================================================
// KEYS
// =============================================================================

/// Physical keys the game knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Key {
    W = 0,
    A,
    S,
    D,
    Z,
    Q,
    C,
    E,
    I,
    F,
    M,
    R,
    /// Arrow up
    ArrowUp,
    /// Arrow down
    ArrowDown,
    /// Arrow left
    ArrowLeft,
    /// Arrow right
    ArrowRight,
    Space,
    Escape,
    Enter,
    Backspace,
    Tab,
    LeftShift,
    LeftControl,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    /// `=` / `+`
    Equal,
    /// `-`
    Minus,
    F12,
    /// `` ` ``
    Backquote,
}

impl Key {
    /// Every key, in discriminant order.
    pub const ALL: [Key; 31] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Z,
        Key::Q,
        Key::C,
        Key::E,
        Key::I,
        Key::F,
        Key::M,
        Key::R,
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::Space,
        Key::Escape,
        Key::Enter,
        Key::Backspace,
        Key::Tab,
        Key::LeftShift,
        Key::LeftControl,
        Key::Digit1,
        Key::Digit2,
        Key::Digit3,
        Key::Digit4,
        Key::Equal,
        Key::Minus,
        Key::F12,
        Key::Backquote,
    ];

    /// Canonical name, as written in config files.
    pub fn name(self) -> &'static str {
        match self {
            Key::W => "W",
            Key::A => "A",
            Key::S => "S",
            Key::D => "D",
            Key::Z => "Z",
            Key::Q => "Q",
            Key::C => "C",
            Key::E => "E",
            Key::I => "I",
            Key::F => "F",
            Key::M => "M",
            Key::R => "R",
            Key::ArrowUp => "Up",
            Key::ArrowDown => "Down",
            Key::ArrowLeft => "Left",
            Key::ArrowRight => "Right",
            Key::Space => "Space",
            Key::Escape => "Escape",
            Key::Enter => "Enter",
            Key::Backspace => "Backspace",
            Key::Tab => "Tab",
            Key::LeftShift => "LeftShift",
            Key::LeftControl => "LeftControl",
            Key::Digit1 => "1",
            Key::Digit2 => "2",
            Key::Digit3 => "3",
            Key::Digit4 => "4",
            Key::Equal => "Equal",
            Key::Minus => "Minus",
            Key::F12 => "F12",
            Key::Backquote => "BackQuote",
        }
    }

    /// Parse a key name. Case-insensitive; accepts a few common aliases.
    pub fn from_name(name: &str) -> Option<Key> {
        let name = name.trim();
        let alias = match name.to_ascii_lowercase().as_str() {
            "shift" | "shiftleft" => Some(Key::LeftShift),
            "ctrl" | "control" | "controlleft" => Some(Key::LeftControl),
            "esc" => Some(Key::Escape),
            "return" => Some(Key::Enter),
            "plus" => Some(Key::Equal),
            "arrowup" => Some(Key::ArrowUp),
            "arrowdown" => Some(Key::ArrowDown),
            "arrowleft" => Some(Key::ArrowLeft),
            "arrowright" => Some(Key::ArrowRight),
            _ => None,
        };
        alias.or_else(|| {
            Key::ALL
                .iter()
                .copied()
                .find(|key| key.name().eq_ignore_ascii_case(name))
        })
    }

    #[inline]
    const fn bit(self) -> u64 {
        1 << (self as u8)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Packed set of keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySet(u64);

impl KeySet {
    /// Empty set.
    pub const EMPTY: Self = Self(0);

    /// Add a key.
    #[inline]
    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    /// Remove a key.
    #[inline]
    pub fn remove(&mut self, key: Key) {
        self.0 &= !key.bit();
    }

    /// Membership test.
    #[inline]
    pub fn contains(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    /// Raw bits.
    #[inline]
    pub fn bits(self) -> u64 {
        self.0
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// Logical game actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Action {
    MoveUp = 0,
    MoveDown,
    MoveLeft,
    MoveRight,
    Attack,
    Block,
    Roll,
    Parry,
    Interact,
    Pickup,
    Use,
    Inventory,
    Map,
    Pause,
    Menu,
    Confirm,
    Cancel,
    CastSpell,
    QuickSlot1,
    QuickSlot2,
    QuickSlot3,
    QuickSlot4,
    CameraReset,
    CameraZoomIn,
    CameraZoomOut,
    /// Show or hide the gameplay instructions
    ToggleHelp,
}

impl Action {
    /// Every action, in discriminant order.
    pub const ALL: [Action; 26] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Attack,
        Action::Block,
        Action::Roll,
        Action::Parry,
        Action::Interact,
        Action::Pickup,
        Action::Use,
        Action::Inventory,
        Action::Map,
        Action::Pause,
        Action::Menu,
        Action::Confirm,
        Action::Cancel,
        Action::CastSpell,
        Action::QuickSlot1,
        Action::QuickSlot2,
        Action::QuickSlot3,
        Action::QuickSlot4,
        Action::CameraReset,
        Action::CameraZoomIn,
        Action::CameraZoomOut,
        Action::ToggleHelp,
    ];

    /// snake_case name used in the `[input.key_mapping]` config table.
    pub fn name(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::Attack => "attack",
            Action::Block => "block",
            Action::Roll => "roll",
            Action::Parry => "parry",
            Action::Interact => "interact",
            Action::Pickup => "pickup",
            Action::Use => "use",
            Action::Inventory => "inventory",
            Action::Map => "map",
            Action::Pause => "pause",
            Action::Menu => "menu",
            Action::Confirm => "confirm",
            Action::Cancel => "cancel",
            Action::CastSpell => "cast_spell",
            Action::QuickSlot1 => "quick_slot_1",
            Action::QuickSlot2 => "quick_slot_2",
            Action::QuickSlot3 => "quick_slot_3",
            Action::QuickSlot4 => "quick_slot_4",
            Action::CameraReset => "camera_reset",
            Action::CameraZoomIn => "camera_zoom_in",
            Action::CameraZoomOut => "camera_zoom_out",
            Action::ToggleHelp => "toggle_help",
        }
    }

    /// Parse an action name.
    pub fn from_name(name: &str) -> Option<Action> {
        let name = name.trim();
        Action::ALL.iter().copied().find(|a| a.name() == name)
    }

    #[inline]
    const fn bit(self) -> u32 {
        1 << (self as u8)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Packed set of actions (one bit per [`Action`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionSet(u32);

impl ActionSet {
    /// Empty set.
    pub const EMPTY: Self = Self(0);

    /// Add an action.
    #[inline]
    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    /// Membership test.
    #[inline]
    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    /// Raw bits.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }
}

// =============================================================================
// BINDINGS
// =============================================================================

/// Action to key mapping. An action fires when any of its keys does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    map: BTreeMap<Action, Vec<Key>>,
}

impl Default for KeyBindings {
    /// QWERTY keys with AZERTY alternates (Z up, Q left) and arrows.
    fn default() -> Self {
        let defaults: &[(Action, &[Key])] = &[
            (Action::MoveUp, &[Key::W, Key::Z, Key::ArrowUp]),
            (Action::MoveDown, &[Key::S, Key::ArrowDown]),
            (Action::MoveLeft, &[Key::A, Key::Q, Key::ArrowLeft]),
            (Action::MoveRight, &[Key::D, Key::ArrowRight]),
            (Action::Attack, &[Key::Space]),
            (Action::Block, &[Key::LeftShift]),
            (Action::Roll, &[Key::C, Key::LeftControl]),
            (Action::Interact, &[Key::E]),
            (Action::Inventory, &[Key::Tab]),
            (Action::Map, &[Key::M]),
            (Action::Pause, &[Key::Escape]),
            (Action::Menu, &[Key::Q]),
            (Action::Confirm, &[Key::Enter]),
            (Action::Cancel, &[Key::Backspace]),
            (Action::CastSpell, &[Key::F]),
            (Action::QuickSlot1, &[Key::Digit1]),
            (Action::QuickSlot2, &[Key::Digit2]),
            (Action::QuickSlot3, &[Key::Digit3]),
            (Action::QuickSlot4, &[Key::Digit4]),
            (Action::CameraReset, &[Key::R]),
            (Action::CameraZoomIn, &[Key::Equal]),
            (Action::CameraZoomOut, &[Key::Minus]),
            (Action::ToggleHelp, &[Key::I]),
        ];

        let map = defaults
            .iter()
            .map(|(action, keys)| (*action, keys.to_vec()))
            .collect();
        Self { map }
    }
}

impl KeyBindings {
    /// Bindings with no keys at all.
    pub fn empty() -> Self {
        Self { map: BTreeMap::new() }
    }

    /// Replace the keys bound to `action`.
    pub fn bind(&mut self, action: Action, keys: Vec<Key>) {
        self.map.insert(action, keys);
    }

    /// Keys bound to `action` (empty if unbound).
    pub fn keys(&self, action: Action) -> &[Key] {
        self.map.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Apply a `name -> "Key,Key"` table over the current bindings.
    ///
    /// On error the offending entry is returned as `Err((action, key))`,
    /// with `key` empty when the action name itself is unknown. The whole
    /// table is checked first; on error no binding changes.
    pub fn apply_overrides(
        &mut self,
        overrides: &BTreeMap<String, String>,
    ) -> Result<(), (String, String)> {
        let mut parsed = Vec::with_capacity(overrides.len());
        for (action_name, key_list) in overrides {
            let action = Action::from_name(action_name)
                .ok_or_else(|| (action_name.clone(), String::new()))?;
            let keys = key_list
                .split(',')
                .filter(|k| !k.trim().is_empty())
                .map(|key_name| {
                    Key::from_name(key_name)
                        .ok_or_else(|| (action_name.clone(), key_name.trim().to_owned()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push((action, keys));
        }

        for (action, keys) in parsed {
            self.bind(action, keys);
        }
        Ok(())
    }
}

// =============================================================================
// SOURCE
// =============================================================================

/// Raw input capability supplied by the engine adapter.
pub trait InputSource {
    /// Is the key held this frame?
    fn is_key_pressed(&self, key: Key) -> bool;

    /// Did the key go down this frame (held now, not held last frame)?
    fn is_key_just_pressed(&self, key: Key) -> bool;

    /// Bindings used to resolve actions.
    fn bindings(&self) -> &KeyBindings;

    /// Is any key bound to `action` held?
    fn is_action_pressed(&self, action: Action) -> bool {
        self.bindings()
            .keys(action)
            .iter()
            .any(|key| self.is_key_pressed(*key))
    }

    /// Did any key bound to `action` go down this frame?
    fn is_action_just_pressed(&self, action: Action) -> bool {
        self.bindings()
            .keys(action)
            .iter()
            .any(|key| self.is_key_just_pressed(*key))
    }

    /// Mouse position in screen pixels, if a mouse is available.
    fn cursor_position(&self) -> Option<Vector2> {
        None
    }

    /// Is the primary mouse button held?
    fn is_mouse_pressed(&self) -> bool {
        false
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Immutable per-frame view of the input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Actions held this frame
    pub held: ActionSet,
    /// Actions whose key went down this frame
    pub just_pressed: ActionSet,
    /// Keys that went down this frame
    pub keys_just_pressed: KeySet,
    /// Mouse position (screen pixels)
    pub mouse_position: Option<Vector2>,
    /// Primary mouse button held
    pub mouse_pressed: bool,
}

impl InputSnapshot {
    /// Snapshot with nothing pressed.
    pub const fn idle() -> Self {
        Self {
            held: ActionSet::EMPTY,
            just_pressed: ActionSet::EMPTY,
            keys_just_pressed: KeySet::EMPTY,
            mouse_position: None,
            mouse_pressed: false,
        }
    }

    /// Read everything the game needs from `source`.
    pub fn capture(source: &dyn InputSource) -> Self {
        let mut snapshot = Self::idle();

        for action in Action::ALL {
            if source.is_action_pressed(action) {
                snapshot.held.insert(action);
            }
            if source.is_action_just_pressed(action) {
                snapshot.just_pressed.insert(action);
            }
        }

        for key in Key::ALL {
            if source.is_key_just_pressed(key) {
                snapshot.keys_just_pressed.insert(key);
            }
        }

        snapshot.mouse_position = source.cursor_position();
        snapshot.mouse_pressed = source.is_mouse_pressed();
        snapshot
    }

    /// Is `action` held?
    #[inline]
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(action)
    }

    /// Did `action` go down this frame?
    #[inline]
    pub fn is_just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(action)
    }

    /// Did `key` go down this frame?
    #[inline]
    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.keys_just_pressed.contains(key)
    }

    /// Movement intent from the four move actions, normalized.
    ///
    /// Opposite directions cancel; diagonals have unit length.
    pub fn intent(&self) -> Vector2 {
        let axis = |neg: Action, pos: Action| {
            (self.is_held(pos) as i8 - self.is_held(neg) as i8) as f64
        };
        Vector2::new(
            axis(Action::MoveLeft, Action::MoveRight),
            axis(Action::MoveUp, Action::MoveDown),
        )
        .normalize()
    }
}

// =============================================================================
// VIRTUAL SOURCE
// =============================================================================

/// Scripted input source with frame-to-frame edge detection.
///
/// Call [`VirtualInput::end_frame`] after each capture; a key pressed
/// before a capture reads as just-pressed for exactly that frame.
#[derive(Clone, Debug, Default)]
pub struct VirtualInput {
    bindings: KeyBindings,
    held: KeySet,
    previous: KeySet,
    cursor: Option<Vector2>,
    mouse_pressed: bool,
}

impl VirtualInput {
    /// New source using `bindings`.
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Hold a key down.
    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    /// Let go of a key.
    pub fn release(&mut self, key: Key) {
        self.held.remove(key);
    }

    /// Release every key and the mouse button.
    pub fn release_all(&mut self) {
        self.held = KeySet::EMPTY;
        self.mouse_pressed = false;
    }

    /// Move the cursor.
    pub fn set_cursor(&mut self, position: Option<Vector2>) {
        self.cursor = position;
    }

    /// Set the primary mouse button.
    pub fn set_mouse_pressed(&mut self, pressed: bool) {
        self.mouse_pressed = pressed;
    }

    /// Commit this frame's key state as the previous frame's.
    pub fn end_frame(&mut self) {
        self.previous = self.held;
    }

    /// Capture a snapshot and end the frame.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::capture(self);
        self.end_frame();
        snapshot
    }
}

impl InputSource for VirtualInput {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.held.contains(key)
    }

    fn is_key_just_pressed(&self, key: Key) -> bool {
        self.held.contains(key) && !self.previous.contains(key)
    }

    fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    fn cursor_position(&self) -> Option<Vector2> {
        self.cursor
    }

    fn is_mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }
}

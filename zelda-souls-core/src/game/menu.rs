//! Main menu and its buttons.
//!
//! Buttons are edge-triggered: a click fires on the frame the mouse goes
//! from released to pressed while hovering. Activation is returned as a
//! [`MenuAction`] for the state machine to dispatch.

use tracing::info;

use crate::core::vec2::{Rectangle, Vector2};
use crate::render::{Color, RenderSurface};

/// Approximate glyph width used to center text.
pub const GLYPH_WIDTH: f64 = 8.0;

const BUTTON_WIDTH: f64 = 200.0;
const BUTTON_HEIGHT: f64 = 50.0;
const BUTTON_SPACING: f64 = 70.0;

/// What a menu button does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Start a new game
    NewGame,
    /// Load a saved game
    LoadGame,
    /// Exit the application
    Quit,
}

/// Visual state of a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Idle
    #[default]
    Normal,
    /// Mouse over
    Hover,
    /// Mouse over and held
    Pressed,
    /// Not clickable
    Disabled,
}

/// Button colors per state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonStyle {
    /// Idle fill
    pub normal: Color,
    /// Hover fill
    pub hover: Color,
    /// Pressed fill
    pub pressed: Color,
    /// Disabled fill
    pub disabled: Color,
    /// Label color
    pub text: Color,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            normal: Color::rgb(70, 70, 70),
            hover: Color::rgb(100, 100, 100),
            pressed: Color::rgb(50, 50, 50),
            disabled: Color::rgb(40, 40, 40),
            text: Color::WHITE,
        }
    }
}

/// Clickable rectangle with a label.
#[derive(Clone, Debug)]
pub struct Button {
    /// Screen rectangle
    pub bounds: Rectangle,
    /// Label
    pub label: String,
    /// Action fired on click
    pub action: MenuAction,
    /// Colors
    pub style: ButtonStyle,
    enabled: bool,
    state: ButtonState,
    was_pressed: bool,
}

impl Button {
    /// New enabled button.
    pub fn new(bounds: Rectangle, label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            bounds,
            label: label.into(),
            action,
            style: ButtonStyle::default(),
            enabled: true,
            state: ButtonState::Normal,
            was_pressed: false,
        }
    }

    /// Builder-style style override.
    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Enable or disable.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.state = ButtonState::Disabled;
        } else if self.state == ButtonState::Disabled {
            self.state = ButtonState::Normal;
        }
    }

    /// Is the button clickable?
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current visual state.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Feed this frame's mouse. Returns the action on a fresh click.
    pub fn update(&mut self, mouse: Option<Vector2>, pressed: bool) -> Option<MenuAction> {
        let was_pressed = std::mem::replace(&mut self.was_pressed, pressed);

        if !self.enabled {
            self.state = ButtonState::Disabled;
            return None;
        }

        let hovering = mouse.is_some_and(|p| self.bounds.contains(p));
        if !hovering {
            self.state = ButtonState::Normal;
            return None;
        }

        if pressed {
            self.state = ButtonState::Pressed;
            if !was_pressed {
                return Some(self.action);
            }
        } else {
            self.state = ButtonState::Hover;
        }
        None
    }

    /// Draw fill, border and centered label.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let fill = match self.state {
            ButtonState::Normal => self.style.normal,
            ButtonState::Hover => self.style.hover,
            ButtonState::Pressed => self.style.pressed,
            ButtonState::Disabled => self.style.disabled,
        };
        let disabled = self.state == ButtonState::Disabled;

        surface.draw_rectangle(self.bounds, fill, true);
        let border = if disabled { Color::rgb(100, 100, 100) } else { Color::rgb(200, 200, 200) };
        surface.draw_rectangle(self.bounds, border, false);

        let text_color = if disabled { Color::rgb(150, 150, 150) } else { self.style.text };
        let width = self.label.chars().count() as f64 * GLYPH_WIDTH;
        let position = Vector2::new(
            self.bounds.x + self.bounds.width / 2.0 - width / 2.0,
            self.bounds.y + self.bounds.height / 2.0 - 8.0,
        );
        surface.draw_text(&self.label, position, text_color);
    }
}

/// Title screen: New Game / Load Game / Quit stacked at the center.
#[derive(Clone, Debug)]
pub struct MainMenu {
    buttons: Vec<Button>,
    screen_width: f64,
    screen_height: f64,
}

impl MainMenu {
    /// Lay out the menu for a screen size.
    pub fn new(screen_width: f64, screen_height: f64) -> Self {
        let x = screen_width / 2.0 - BUTTON_WIDTH / 2.0;
        let start_y = screen_height / 2.0;
        let rect = |row: f64| Rectangle::new(x, start_y + row * BUTTON_SPACING, BUTTON_WIDTH, BUTTON_HEIGHT);

        let new_game = Button::new(rect(-1.0), "New Game", MenuAction::NewGame).with_style(ButtonStyle {
            normal: Color::rgb(50, 120, 50),
            hover: Color::rgb(70, 150, 70),
            ..ButtonStyle::default()
        });
        let load_game = Button::new(rect(0.0), "Load Game", MenuAction::LoadGame);
        let quit = Button::new(rect(1.0), "Quit", MenuAction::Quit).with_style(ButtonStyle {
            normal: Color::rgb(120, 50, 50),
            hover: Color::rgb(150, 70, 70),
            ..ButtonStyle::default()
        });

        Self {
            buttons: vec![new_game, load_game, quit],
            screen_width,
            screen_height,
        }
    }

    /// Enable "Load Game" only when a save exists.
    pub fn set_has_saves(&mut self, has_saves: bool) {
        if let Some(button) = self.button_mut(MenuAction::LoadGame) {
            button.set_enabled(has_saves);
        }
    }

    /// Buttons in layout order.
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Button firing `action`.
    pub fn button(&self, action: MenuAction) -> Option<&Button> {
        self.buttons.iter().find(|b| b.action == action)
    }

    fn button_mut(&mut self, action: MenuAction) -> Option<&mut Button> {
        self.buttons.iter_mut().find(|b| b.action == action)
    }

    /// Update every button; returns the first action clicked this frame.
    pub fn update(&mut self, mouse: Option<Vector2>, pressed: bool) -> Option<MenuAction> {
        let mut clicked = None;
        for button in &mut self.buttons {
            if let Some(action) = button.update(mouse, pressed) {
                info!(button = %button.label, "menu button clicked");
                clicked = clicked.or(Some(action));
            }
        }
        clicked
    }

    /// Draw title, buttons and hint.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let centered = |text: &str, glyph: f64| self.screen_width / 2.0 - text.len() as f64 * glyph / 2.0;

        let title = "ZELDA SOULS";
        surface.draw_text(title, Vector2::new(centered(title, 12.0), 100.0), Color::YELLOW);

        let subtitle = "Adventure Awaits";
        surface.draw_text(subtitle, Vector2::new(centered(subtitle, GLYPH_WIDTH), 140.0), Color::rgb(200, 200, 200));

        for button in &self.buttons {
            button.render(surface);
        }

        let hint = "Use the mouse to navigate";
        surface.draw_text(
            hint,
            Vector2::new(centered(hint, GLYPH_WIDTH), self.screen_height - 50.0),
            Color::rgb(150, 150, 150),
        );
    }
}

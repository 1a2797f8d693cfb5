//! Game State Machine
//!
//! [`StateMachine`] owns everything the loop mutates: the active
//! [`GameState`], the menu, the (at most one) player, and the camera.
//!
//! ## Transitions
//!
//! | From     | Trigger                        | To                 |
//! |----------|--------------------------------|--------------------|
//! | menu     | "New Game" clicked             | gameplay           |
//! | gameplay | Escape                         | pause (or menu)    |
//! | pause    | Escape                         | gameplay           |
//! | pause    | Q                              | menu               |
//! | gameplay | player health reaches 0        | menu               |
//!
//! Escape is handled before the per-state update. A frame that changes
//! state through Escape does not also run the new state's update.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{EscapeBehavior, GameConfig};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::vec2::{Rectangle, Vector2};
use crate::game::camera::{Camera, FollowSettings};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{Action, InputSnapshot};
use crate::game::menu::{MainMenu, MenuAction, GLYPH_WIDTH};
use crate::game::movement::MovementBounds;
use crate::game::player::{PlayerEntity, PlayerTuning};
use crate::game::tick::{gameplay_step, TickResult};
use crate::render::{Color, RenderSurface};
use crate::save::SaveSlots;

/// Zoom factor applied per zoom-in / zoom-out press.
const ZOOM_STEP: f64 = 1.25;

/// Player fill color.
const PLAYER_COLOR: Color = Color::rgb(100, 150, 255);

/// Top-level game states.
///
/// Only menu, gameplay and pause have behavior; the rest are declared for
/// the states a full game would add and render a placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameState {
    /// Title screen
    #[default]
    Menu = 0,
    /// Playing
    Gameplay = 1,
    /// Gameplay frozen under an overlay
    Pause = 2,
    #[allow(missing_docs)]
    Inventory = 3,
    #[allow(missing_docs)]
    Dialog = 4,
    #[allow(missing_docs)]
    Loading = 5,
    #[allow(missing_docs)]
    Settings = 6,
    #[allow(missing_docs)]
    GameOver = 7,
}

impl GameState {
    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            GameState::Menu => "menu",
            GameState::Gameplay => "gameplay",
            GameState::Pause => "pause",
            GameState::Inventory => "inventory",
            GameState::Dialog => "dialog",
            GameState::Loading => "loading",
            GameState::Settings => "settings",
            GameState::GameOver => "game-over",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The game loop's owned state.
#[derive(Clone, Debug)]
pub struct StateMachine {
    state: GameState,
    menu: MainMenu,
    player: Option<PlayerEntity>,
    camera: Camera,
    screen: Vector2,
    world: MovementBounds,
    tuning: PlayerTuning,
    escape_behavior: EscapeBehavior,
    damage_multiplier: f64,
    hit_shake_intensity: f64,
    hit_shake: Duration,
    follow: FollowSettings,
    show_instructions: bool,
    show_debug: bool,
    culling_margin: Option<f64>,
    frame: u64,
    game_time: Duration,
    quit_requested: bool,
    pending_events: Vec<GameEvent>,
}

impl StateMachine {
    /// Build from a validated config. Starts in the menu.
    pub fn new(config: &GameConfig, saves: &dyn SaveSlots) -> Self {
        let screen = config.screen_size();
        let world_size = config.world_size();

        let mut camera = Camera::new(screen * 0.5, screen.x, screen.y);
        camera.min_zoom = config.camera.min_zoom;
        camera.max_zoom = config.camera.max_zoom;
        camera.set_zoom(config.camera.zoom);
        camera.set_smoothing(config.camera.smoothing);

        let mut menu = MainMenu::new(screen.x, screen.y);
        menu.set_has_saves(saves.has_any_save());

        Self {
            state: GameState::Menu,
            menu,
            player: None,
            camera,
            screen,
            world: MovementBounds {
                width: world_size.x,
                height: world_size.y,
                margin: config.gameplay.world.margin,
            },
            tuning: config.player_tuning(),
            escape_behavior: config.gameplay.escape_behavior,
            damage_multiplier: config.gameplay.difficulty.settings().damage_multiplier,
            hit_shake_intensity: config.camera.hit_shake_intensity,
            hit_shake: Duration::try_from_secs_f64(config.camera.hit_shake_seconds)
                .unwrap_or(Duration::ZERO),
            follow: config.follow_settings(),
            show_instructions: true,
            show_debug: config.debug.show_debug,
            culling_margin: config.rendering.enable_culling.then_some(config.rendering.culling_margin),
            frame: 0,
            game_time: Duration::ZERO,
            quit_requested: false,
            pending_events: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Active state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The player, while a game is running.
    pub fn player(&self) -> Option<&PlayerEntity> {
        self.player.as_ref()
    }

    /// Mutable player access.
    pub fn player_mut(&mut self) -> Option<&mut PlayerEntity> {
        self.player.as_mut()
    }

    /// Camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Main menu.
    pub fn menu(&self) -> &MainMenu {
        &self.menu
    }

    /// Frames processed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Has "Quit" been chosen?
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Are the gameplay instructions shown?
    pub fn show_instructions(&self) -> bool {
        self.show_instructions
    }

    /// Re-check the save slots (after saving, for instance).
    pub fn refresh_saves(&mut self, saves: &dyn SaveSlots) {
        self.menu.set_has_saves(saves.has_any_save());
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Switch the active state.
    pub fn change_state(&mut self, to: GameState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!(%from, %to, "state changed");
        self.emit(GameEventData::StateChanged { from, to });
    }

    fn emit(&mut self, data: GameEventData) {
        self.pending_events.push(GameEvent::new(self.frame, data));
    }

    /// Spawn the player at the screen center and enter gameplay.
    pub fn start_new_game(&mut self) {
        let spawn = self.screen * 0.5;
        let player = PlayerEntity::spawn(spawn, self.tuning);
        info!(x = spawn.x, y = spawn.y, "player spawned");

        self.camera.stop_shake();
        self.camera.set_position(spawn + self.follow.offset);
        self.camera.start_following(self.follow);
        self.camera
            .set_bounds(Rectangle::new(0.0, 0.0, self.world.width, self.world.height));

        self.player = Some(player);
        self.game_time = Duration::ZERO;
        self.emit(GameEventData::PlayerSpawned { position: spawn });
        self.change_state(GameState::Gameplay);
    }

    /// Discard the player and show the menu.
    pub fn return_to_menu(&mut self) {
        self.player = None;
        self.camera.stop_following();
        self.camera.stop_shake();
        self.change_state(GameState::Menu);
    }

    /// Hit the player for `amount`, scaled by the difficulty multiplier.
    ///
    /// Returns `true` if the hit landed. Landing a hit shakes the camera.
    pub fn damage_player(&mut self, amount: i32) -> bool {
        let scaled = (amount as f64 * self.damage_multiplier).round() as i32;
        let Some(player) = self.player.as_mut() else {
            return false;
        };

        if !player.stats.take_damage(scaled) {
            self.emit(GameEventData::DamageBlocked);
            return false;
        }

        let health = player.stats.health;
        debug!(amount = scaled, health, "player hit");
        self.camera.start_shake(self.hit_shake_intensity, self.hit_shake);
        self.emit(GameEventData::DamageTaken { amount: scaled, health });
        true
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Advance one frame.
    pub fn update(&mut self, input: &InputSnapshot, dt: Duration) -> TickResult {
        self.frame += 1;

        if !self.handle_escape(input) {
            match self.state {
                GameState::Menu => self.update_menu(input),
                GameState::Gameplay => self.update_gameplay(input, dt),
                // Frozen: nothing moves, timers stop.
                GameState::Pause => {}
                GameState::Inventory
                | GameState::Dialog
                | GameState::Loading
                | GameState::Settings
                | GameState::GameOver => {}
            }
        }

        TickResult {
            events: std::mem::take(&mut self.pending_events),
            state: self.state,
            quit_requested: self.quit_requested,
        }
    }

    /// Returns `true` if Escape (or Q in pause) changed the state.
    fn handle_escape(&mut self, input: &InputSnapshot) -> bool {
        let escape = input.is_just_pressed(Action::Pause);
        match self.state {
            GameState::Gameplay if escape => {
                match self.escape_behavior {
                    EscapeBehavior::Pause => self.change_state(GameState::Pause),
                    EscapeBehavior::Menu => self.return_to_menu(),
                }
                true
            }
            GameState::Pause if escape => {
                self.change_state(GameState::Gameplay);
                true
            }
            GameState::Pause if input.is_just_pressed(Action::Menu) => {
                self.return_to_menu();
                true
            }
            _ => false,
        }
    }

    fn update_menu(&mut self, input: &InputSnapshot) {
        match self.menu.update(input.mouse_position, input.mouse_pressed) {
            Some(MenuAction::NewGame) => self.start_new_game(),
            Some(MenuAction::LoadGame) => {
                info!("load game requested");
                self.emit(GameEventData::LoadRequested);
            }
            Some(MenuAction::Quit) => {
                info!("quit requested");
                self.quit_requested = true;
                self.emit(GameEventData::QuitRequested);
            }
            None => {}
        }
    }

    fn update_gameplay(&mut self, input: &InputSnapshot, dt: Duration) {
        if input.is_just_pressed(Action::ToggleHelp) {
            self.show_instructions = !self.show_instructions;
            let visible = self.show_instructions;
            self.emit(GameEventData::HelpToggled { visible });
        }
        self.handle_camera_controls(input);

        let Some(player) = self.player.as_mut() else {
            // Gameplay without a player has nothing to run.
            self.return_to_menu();
            return;
        };

        if player.stats.is_alive() {
            let frame = self.frame;
            gameplay_step(
                player,
                &mut self.camera,
                input,
                dt,
                &self.world,
                frame,
                &mut self.pending_events,
            );
            self.game_time += dt;
        }

        if self.player.as_ref().is_some_and(|p| !p.stats.is_alive()) {
            info!(frame = self.frame, "player died");
            self.emit(GameEventData::PlayerDied);
            self.return_to_menu();
        }
    }

    fn handle_camera_controls(&mut self, input: &InputSnapshot) {
        if input.is_just_pressed(Action::CameraZoomIn) {
            let zoom = self.camera.zoom() * ZOOM_STEP;
            self.camera.set_zoom(zoom);
        }
        if input.is_just_pressed(Action::CameraZoomOut) {
            let zoom = self.camera.zoom() / ZOOM_STEP;
            self.camera.set_zoom(zoom);
        }
        if input.is_just_pressed(Action::CameraReset) {
            self.camera.set_zoom(1.0);
            if let Some(player) = &self.player {
                self.camera.set_position(player.position + self.follow.offset);
            }
        }
    }

    // =========================================================================
    // Render
    // =========================================================================

    /// Describe the current frame.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        match self.state {
            GameState::Menu => {
                self.menu.render(surface);
                if self.show_debug {
                    let text = format!("Debug: frame {}", self.frame);
                    surface.draw_text(&text, Vector2::new(10.0, self.screen.y - 30.0), Color::rgb(100, 100, 100));
                }
            }
            GameState::Gameplay => self.render_gameplay(surface),
            GameState::Pause => {
                self.render_gameplay(surface);
                self.render_pause_overlay(surface);
            }
            other => {
                let text = format!("{} (not available)", other.name().to_uppercase());
                surface.draw_text(&text, self.screen * 0.5, Color::WHITE);
            }
        }
    }

    fn render_gameplay(&self, surface: &mut dyn RenderSurface) {
        if let Some(player) = &self.player {
            self.render_player(surface, player);
        }

        surface.draw_text("=== IN GAME ===", Vector2::new(10.0, 10.0), Color::WHITE);
        let escape_hint = match self.escape_behavior {
            EscapeBehavior::Pause => "ESC - Pause",
            EscapeBehavior::Menu => "ESC - Back to menu",
        };
        surface.draw_text(escape_hint, Vector2::new(10.0, 30.0), Color::GREEN);

        if self.show_instructions {
            let lines = [
                "WASD/ZQSD - Move",
                "SPACE - Attack",
                "C - Roll",
                "E - Interact",
                "I - Toggle instructions",
            ];
            for (i, line) in lines.iter().enumerate() {
                surface.draw_text(line, Vector2::new(10.0, 60.0 + i as f64 * 20.0), Color::WHITE);
            }
        }

        self.render_player_info(surface);
        self.render_game_stats(surface);
    }

    fn render_player(&self, surface: &mut dyn RenderSurface, player: &PlayerEntity) {
        if let Some(margin) = self.culling_margin {
            let b = player.bounds();
            let padded = Rectangle::new(b.x - margin, b.y - margin, b.width + 2.0 * margin, b.height + 2.0 * margin);
            if !self.camera.is_visible(&padded) {
                return;
            }
        }

        let rect = self.camera.world_rect_to_screen(player.bounds());
        let center = self.camera.world_to_screen(player.position);

        let mut fill = PLAYER_COLOR;
        if player.movement.is_moving {
            fill = fill.brighten(30);
        }
        let invulnerable = player.stats.is_invulnerable();
        if invulnerable && (player.stats.invulnerability_remaining.as_millis() / 100) % 2 == 0 {
            fill = fill.with_alpha(128);
        }
        surface.draw_rectangle(rect, fill, true);
        let border = if invulnerable { Color::YELLOW } else { Color::WHITE };
        surface.draw_rectangle(rect, border, false);

        if player.movement.is_moving {
            let dir = player.movement.direction.to_vector();
            let tip = center + dir * 15.0;
            if dir.x != 0.0 {
                let r = Rectangle::new(center.x.min(tip.x) - 1.0, center.y - 1.0, (tip.x - center.x).abs() + 2.0, 2.0);
                surface.draw_rectangle(r, Color::YELLOW, true);
            }
            if dir.y != 0.0 {
                let r = Rectangle::new(center.x - 1.0, center.y.min(tip.y) - 1.0, 2.0, (tip.y - center.y).abs() + 2.0);
                surface.draw_rectangle(r, Color::YELLOW, true);
            }
        }

        let top = rect.y;
        let health = player.stats.health_fraction();
        let health_color = if health > 0.6 {
            Color::GREEN
        } else if health > 0.3 {
            Color::YELLOW
        } else {
            Color::RED
        };
        draw_bar(surface, center.x, top - 8.0, 4.0, health, health_color, Color::WHITE);
        draw_bar(surface, center.x, top - 14.0, 3.0, player.stats.stamina_fraction(), Color::CYAN, Color::GRAY);
    }

    fn render_player_info(&self, surface: &mut dyn RenderSurface) {
        let Some(player) = self.player.as_ref().filter(|p| p.stats.is_alive()) else {
            surface.draw_text("PLAYER DEAD", Vector2::new(10.0, 180.0), Color::RED);
            return;
        };

        let stats = &player.stats;
        let lines = [
            (format!("Position: ({:.0}, {:.0})", player.position.x, player.position.y), Color::YELLOW),
            (format!("Health: {}/{}", stats.health, stats.max_health), Color::GREEN),
            (format!("Stamina: {:.0}/{:.0}", stats.stamina, stats.max_stamina), Color::CYAN),
        ];
        for (i, (text, color)) in lines.iter().enumerate() {
            surface.draw_text(text, Vector2::new(10.0, 180.0 + i as f64 * 20.0), *color);
        }

        if player.movement.is_moving {
            let dir = format!("Direction: {}", player.movement.direction);
            surface.draw_text(&dir, Vector2::new(10.0, 240.0), Color::YELLOW);
            let speed = format!("Speed: {:.1}", player.movement.current_speed());
            surface.draw_text(&speed, Vector2::new(10.0, 260.0), Color::WHITE);
        }
    }

    fn render_game_stats(&self, surface: &mut dyn RenderSurface) {
        let secs = self.game_time.as_secs();
        let x = self.screen.x - 150.0;
        let y = self.screen.y - 60.0;
        let time = format!("Time: {:02}:{:02}", secs / 60, secs % 60);
        surface.draw_text(&time, Vector2::new(x, y), Color::GRAY);
        if self.show_debug {
            let frames = format!("Frames: {}", self.frame);
            surface.draw_text(&frames, Vector2::new(x, y + 20.0), Color::GRAY);
        }
    }

    fn render_pause_overlay(&self, surface: &mut dyn RenderSurface) {
        let overlay = Rectangle::new(0.0, 0.0, self.screen.x, self.screen.y);
        surface.draw_rectangle(overlay, Color::BLACK.with_alpha(128), true);

        let c = self.screen * 0.5;
        let lines = [
            ("=== PAUSE ===", Color::YELLOW, -50.0),
            ("ESC - Resume", Color::WHITE, -20.0),
            ("Q - Back to menu", Color::WHITE, 0.0),
        ];
        for (text, color, dy) in lines {
            let x = c.x - text.len() as f64 * GLYPH_WIDTH / 2.0;
            surface.draw_text(text, Vector2::new(x, c.y + dy), color);
        }
    }

    // =========================================================================
    // Hash
    // =========================================================================

    /// Hash of everything the loop mutates.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.frame, |h| {
            h.update_u8(self.state as u8);
            h.update_bool(self.show_instructions);
            h.update_bool(self.quit_requested);
            h.update_u64(self.game_time.as_nanos() as u64);

            h.update_vec2(self.camera.position);
            h.update_vec2(self.camera.target_position());
            h.update_f64(self.camera.zoom());
            h.update_vec2(self.camera.shake_offset());

            h.update_bool(self.player.is_some());
            if let Some(p) = &self.player {
                h.update_vec2(p.position);
                h.update_vec2(p.movement.velocity);
                h.update_u8(p.movement.direction as u8);
                h.update_u8(p.movement.facing_direction as u8);
                h.update_i32(p.stats.health);
                h.update_f64(p.stats.stamina);
                h.update_u64(p.stats.invulnerability_remaining.as_nanos() as u64);
                h.update_u64(p.stats.stun_remaining.as_nanos() as u64);
            }
        })
    }
}

/// 30px bar centered on `cx`: black fill, colored level, outline.
fn draw_bar(
    surface: &mut dyn RenderSurface,
    cx: f64,
    y: f64,
    height: f64,
    fraction: f64,
    color: Color,
    border: Color,
) {
    const WIDTH: f64 = 30.0;
    let background = Rectangle::new(cx - WIDTH / 2.0, y, WIDTH, height);
    surface.draw_rectangle(background, Color::BLACK, true);
    let filled = WIDTH * fraction.clamp(0.0, 1.0);
    if filled > 0.0 {
        surface.draw_rectangle(Rectangle::new(background.x, y, filled, height), color, true);
    }
    surface.draw_rectangle(background, border, false);
}

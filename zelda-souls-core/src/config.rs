//! Game Configuration
//!
//! `GameConfig` is read from a TOML file once at startup, validated, and
//! then handed to the state machine as a plain value. Every section has
//! defaults, so a file only needs the keys it changes.
//!
//! ```toml
//! [window]
//! width = 1280
//! height = 720
//!
//! [gameplay]
//! difficulty = "hard"
//! escape_behavior = "pause"
//!
//! [input.key_mapping]
//! attack = "Space,Enter"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::vec2::Vector2;
use crate::game::camera::FollowSettings;
use crate::game::input::KeyBindings;
use crate::game::player::PlayerTuning;

/// Configuration errors, surfaced once at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config I/O error at {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// Config could not be serialized
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Window dimensions are not positive
    #[error("invalid window size: {width}x{height}")]
    InvalidWindowSize {
        #[allow(missing_docs)]
        width: u32,
        #[allow(missing_docs)]
        height: u32,
    },

    /// Target FPS is zero
    #[error("invalid target FPS: {0}")]
    InvalidTargetFps(u32),

    /// Tile size is zero
    #[error("invalid tile size: {0}")]
    InvalidTileSize(u32),

    /// Zoom range is empty or non-positive
    #[error("invalid zoom range: min {min}, max {max}, initial {zoom}")]
    InvalidZoom {
        #[allow(missing_docs)]
        min: f64,
        #[allow(missing_docs)]
        max: f64,
        #[allow(missing_docs)]
        zoom: f64,
    },

    /// A number is NaN or infinite
    #[error("config value `{name}` must be finite (got {value})")]
    NonFinite {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// A number that must be non-negative is not
    #[error("config value `{name}` must be non-negative (got {value})")]
    NegativeValue {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// `[input.key_mapping]` names an unknown action
    #[error("unknown action `{0}` in key mapping")]
    UnknownAction(String),

    /// `[input.key_mapping]` names an unknown key
    #[error("unknown key `{key}` bound to action `{action}`")]
    UnknownKey {
        #[allow(missing_docs)]
        action: String,
        #[allow(missing_docs)]
        key: String,
    },
}

// =============================================================================
// ENUMS
// =============================================================================

/// Difficulty preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Reduced damage, fast regen
    Easy,
    /// Baseline
    #[default]
    Normal,
    /// Increased damage, slow regen
    Hard,
    /// Double damage
    Nightmare,
}

/// Numbers a difficulty preset controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultySettings {
    /// Incoming damage multiplier
    pub damage_multiplier: f64,
    /// Stamina regenerated per second
    pub stamina_regen: f64,
}

impl Difficulty {
    /// Preset values.
    pub fn settings(self) -> DifficultySettings {
        let (damage_multiplier, stamina_regen) = match self {
            Difficulty::Easy => (0.7, 35.0),
            Difficulty::Normal => (1.0, 25.0),
            Difficulty::Hard => (1.5, 15.0),
            Difficulty::Nightmare => (2.0, 10.0),
        };
        DifficultySettings {
            damage_multiplier,
            stamina_regen,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Nightmare => "nightmare",
        };
        f.write_str(name)
    }
}

/// What Escape does during gameplay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeBehavior {
    /// gameplay -> pause -> gameplay, Q quits to menu from pause
    #[default]
    Pause,
    /// gameplay -> menu directly
    Menu,
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Window settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width (px)
    pub width: u32,
    /// Height (px)
    pub height: u32,
    /// Title bar text
    pub title: String,
    #[allow(missing_docs)]
    pub fullscreen: bool,
    #[allow(missing_docs)]
    pub resizable: bool,
    #[allow(missing_docs)]
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Zelda Souls".to_string(),
            fullscreen: false,
            resizable: true,
            vsync: true,
        }
    }
}

/// Rendering settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Frame rate the headless runner steps at
    pub target_fps: u32,
    /// World tile size (px)
    pub tile_size: u32,
    /// Skip drawing things outside the view
    pub enable_culling: bool,
    /// Extra margin around the view when culling (px)
    pub culling_margin: f64,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            tile_size: 32,
            enable_culling: true,
            culling_margin: 100.0,
        }
    }
}

/// Input settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Action name -> comma-separated key names; overrides the defaults
    pub key_mapping: BTreeMap<String, String>,
}

/// Playable area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width (px); 0 uses the window width
    pub width: f64,
    /// Height (px); 0 uses the window height
    pub height: f64,
    /// Inset from each edge (px)
    pub margin: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            margin: 16.0,
        }
    }
}

/// Gameplay settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    #[allow(missing_docs)]
    pub difficulty: Difficulty,
    /// Cruising speed (px/s)
    pub player_speed: f64,
    /// Velocity cap (px/s)
    pub player_max_speed: f64,
    /// Body size (px)
    pub player_size: f64,
    /// Roll burst speed (px/s)
    pub roll_speed: f64,
    #[allow(missing_docs)]
    pub attack_stamina_cost: f64,
    #[allow(missing_docs)]
    pub roll_stamina_cost: f64,
    /// After a hit (s)
    pub invulnerability_seconds: f64,
    /// After a roll (s)
    pub roll_invulnerability_seconds: f64,
    #[allow(missing_docs)]
    pub world: WorldConfig,
    #[allow(missing_docs)]
    pub escape_behavior: EscapeBehavior,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            player_speed: 200.0,
            player_max_speed: 250.0,
            player_size: 32.0,
            roll_speed: 400.0,
            attack_stamina_cost: 15.0,
            roll_stamina_cost: 25.0,
            invulnerability_seconds: 1.0,
            roll_invulnerability_seconds: 0.3,
            world: WorldConfig::default(),
            escape_behavior: EscapeBehavior::Pause,
        }
    }
}

/// Camera settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// `>= 1` snaps the follow target
    pub follow_speed: f64,
    /// Follow offset `[x, y]` (px)
    pub follow_offset: [f64; 2],
    /// Seconds of velocity lead
    pub look_ahead: f64,
    /// Spring time constant (s); 0 snaps
    pub smoothing: f64,
    #[allow(missing_docs)]
    pub zoom: f64,
    #[allow(missing_docs)]
    pub min_zoom: f64,
    #[allow(missing_docs)]
    pub max_zoom: f64,
    /// Shake on taking a hit (px)
    pub hit_shake_intensity: f64,
    /// Shake duration on taking a hit (s)
    pub hit_shake_seconds: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_speed: 3.0,
            follow_offset: [0.0, -20.0],
            look_ahead: 0.0,
            smoothing: 0.1,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
            hit_shake_intensity: 6.0,
            hit_shake_seconds: 0.25,
        }
    }
}

/// Debug settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Draw frame counter and extra HUD lines
    pub show_debug: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_debug: false,
        }
    }
}

/// Filesystem locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `slot_N.sav` files
    pub saves_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            saves_dir: PathBuf::from("saves"),
        }
    }
}

// =============================================================================
// ROOT
// =============================================================================

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    #[allow(missing_docs)]
    pub game_title: String,
    #[allow(missing_docs)]
    pub game_version: String,
    #[allow(missing_docs)]
    pub window: WindowConfig,
    #[allow(missing_docs)]
    pub rendering: RenderingConfig,
    #[allow(missing_docs)]
    pub input: InputConfig,
    #[allow(missing_docs)]
    pub gameplay: GameplayConfig,
    #[allow(missing_docs)]
    pub camera: CameraConfig,
    #[allow(missing_docs)]
    pub debug: DebugConfig,
    #[allow(missing_docs)]
    pub paths: PathsConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_title: "Zelda Souls".to_string(),
            game_version: crate::VERSION.to_string(),
            window: WindowConfig::default(),
            rendering: RenderingConfig::default(),
            input: InputConfig::default(),
            gameplay: GameplayConfig::default(),
            camera: CameraConfig::default(),
            debug: DebugConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse TOML text and validate.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Like [`GameConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check every constraint the game relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.window;
        if window.width == 0 || window.height == 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: window.width,
                height: window.height,
            });
        }
        if self.rendering.target_fps == 0 {
            return Err(ConfigError::InvalidTargetFps(self.rendering.target_fps));
        }
        if self.rendering.tile_size == 0 {
            return Err(ConfigError::InvalidTileSize(self.rendering.tile_size));
        }

        let cam = &self.camera;
        let g = &self.gameplay;
        let finite = [
            ("camera.follow_speed", cam.follow_speed),
            ("camera.follow_offset[0]", cam.follow_offset[0]),
            ("camera.follow_offset[1]", cam.follow_offset[1]),
            ("camera.look_ahead", cam.look_ahead),
            ("camera.smoothing", cam.smoothing),
            ("camera.zoom", cam.zoom),
            ("camera.min_zoom", cam.min_zoom),
            ("camera.max_zoom", cam.max_zoom),
            ("camera.hit_shake_intensity", cam.hit_shake_intensity),
            ("camera.hit_shake_seconds", cam.hit_shake_seconds),
            ("rendering.culling_margin", self.rendering.culling_margin),
            ("player_speed", g.player_speed),
            ("player_max_speed", g.player_max_speed),
            ("player_size", g.player_size),
            ("roll_speed", g.roll_speed),
            ("attack_stamina_cost", g.attack_stamina_cost),
            ("roll_stamina_cost", g.roll_stamina_cost),
            ("invulnerability_seconds", g.invulnerability_seconds),
            ("roll_invulnerability_seconds", g.roll_invulnerability_seconds),
            ("world.width", g.world.width),
            ("world.height", g.world.height),
            ("world.margin", g.world.margin),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        if !(cam.min_zoom > 0.0 && cam.min_zoom <= cam.max_zoom) || cam.zoom <= 0.0 {
            return Err(ConfigError::InvalidZoom {
                min: cam.min_zoom,
                max: cam.max_zoom,
                zoom: cam.zoom,
            });
        }

        let non_negative = [
            ("player_speed", g.player_speed),
            ("player_max_speed", g.player_max_speed),
            ("player_size", g.player_size),
            ("roll_speed", g.roll_speed),
            ("attack_stamina_cost", g.attack_stamina_cost),
            ("roll_stamina_cost", g.roll_stamina_cost),
            ("invulnerability_seconds", g.invulnerability_seconds),
            ("roll_invulnerability_seconds", g.roll_invulnerability_seconds),
            ("world.width", g.world.width),
            ("world.height", g.world.height),
            ("world.margin", g.world.margin),
            ("camera.smoothing", cam.smoothing),
            ("camera.hit_shake_seconds", cam.hit_shake_seconds),
            ("camera.follow_speed", cam.follow_speed),
            ("camera.look_ahead", cam.look_ahead),
            ("camera.hit_shake_intensity", cam.hit_shake_intensity),
            ("rendering.culling_margin", self.rendering.culling_margin),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::NegativeValue { name, value });
            }
        }

        self.key_bindings().map(|_| ())
    }

    /// Default bindings with `[input.key_mapping]` applied.
    pub fn key_bindings(&self) -> Result<KeyBindings, ConfigError> {
        let mut bindings = KeyBindings::default();
        bindings
            .apply_overrides(&self.input.key_mapping)
            .map_err(|(action, key)| {
                if key.is_empty() {
                    ConfigError::UnknownAction(action)
                } else {
                    ConfigError::UnknownKey { action, key }
                }
            })?;
        Ok(bindings)
    }

    /// Player tuning derived from gameplay settings and difficulty.
    pub fn player_tuning(&self) -> PlayerTuning {
        let g = &self.gameplay;
        PlayerTuning {
            speed: g.player_speed,
            max_speed: g.player_max_speed,
            size: g.player_size,
            attack_stamina_cost: g.attack_stamina_cost,
            roll_stamina_cost: g.roll_stamina_cost,
            roll_speed: g.roll_speed,
            roll_invulnerability: seconds(g.roll_invulnerability_seconds),
            hit_invulnerability: seconds(g.invulnerability_seconds),
            stamina_regen_per_second: g.difficulty.settings().stamina_regen,
        }
    }

    /// Camera follow settings.
    pub fn follow_settings(&self) -> FollowSettings {
        FollowSettings {
            speed: self.camera.follow_speed,
            offset: Vector2::new(self.camera.follow_offset[0], self.camera.follow_offset[1]),
            look_ahead: self.camera.look_ahead,
        }
    }

    /// Screen size in px.
    pub fn screen_size(&self) -> Vector2 {
        Vector2::new(self.window.width as f64, self.window.height as f64)
    }

    /// Playable area size; zero dimensions fall back to the screen.
    pub fn world_size(&self) -> Vector2 {
        let screen = self.screen_size();
        let world = &self.gameplay.world;
        Vector2::new(
            if world.width > 0.0 { world.width } else { screen.x },
            if world.height > 0.0 { world.height } else { screen.y },
        )
    }

    /// Frame duration at the target FPS.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rendering.target_fps.max(1) as f64)
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

//! Zelda Souls - top-down action game
//!
//! Bevy shell around `zelda_souls`: opens the window, feeds keyboard and
//! mouse to the core state machine and draws what it describes.

mod game;
mod ui;

use anyhow::Context;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::{MonitorSelection, PresentMode, WindowMode, WindowResolution};
use zelda_souls::{GameConfig, DEFAULT_CONFIG_PATH};

use game::{GamePlugin, Session};
use ui::UiPlugin;

/// Per-frame ordering: the core advances before its draws are presented
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Simulate,
    Present,
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = GameConfig::load_or_default(&path).with_context(|| format!("loading config from {path}"))?;
    config.validate().context("invalid configuration")?;
    let session = Session::new(&config)?;

    let window = &config.window;
    App::new()
        // Bevy defaults with window from config
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window.title.clone(),
                resolution: WindowResolution::new(window.width as f32, window.height as f32),
                resizable: window.resizable,
                mode: if window.fullscreen {
                    WindowMode::BorderlessFullscreen(MonitorSelection::Current)
                } else {
                    WindowMode::Windowed
                },
                present_mode: if window.vsync { PresentMode::AutoVsync } else { PresentMode::AutoNoVsync },
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.08, 0.08, 0.1)))
        .insert_resource(session)
        .configure_sets(Update, (FrameSet::Simulate, FrameSet::Present).chain())
        // Our plugins
        .add_plugins((GamePlugin, UiPlugin))
        // Startup
        .add_systems(Startup, setup_2d_camera)
        .run();

    Ok(())
}

/// 2D camera showing exactly the configured screen, whatever the window size
fn setup_2d_camera(mut commands: Commands, session: Res<Session>) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::Fixed {
                width: session.screen.x as f32,
                height: session.screen.y as f32,
            },
            ..OrthographicProjection::default_2d()
        },
    ));

    info!("Zelda Souls v{} initialized", zelda_souls::VERSION);
}

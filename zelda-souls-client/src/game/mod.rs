//! Game module - drives the core state machine from Bevy
//!
//! Each `Update`:
//! - capture an `InputSnapshot` from Bevy's keyboard, mouse and cursor
//! - advance the `StateMachine` by the frame's delta
//! - render the frame into the `FrameDraws` list for the UI to present

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use zelda_souls::game::events::GameEventData;
use zelda_souls::{DrawList, GameConfig, InputSnapshot, KeyBindings, SaveDirectory, StateMachine, Vector2};

use crate::FrameSet;

pub mod input;

use input::{cursor_to_screen, BevyInput};

// ============================================================================
// RESOURCES
// ============================================================================

/// The running game: state machine plus what the adapter needs around it.
#[derive(Resource)]
pub struct Session {
    pub machine: StateMachine,
    pub bindings: KeyBindings,
    /// Logical screen size the core lays out against
    pub screen: Vector2,
}

impl Session {
    /// Build from a validated config.
    pub fn new(config: &GameConfig) -> anyhow::Result<Self> {
        let saves = SaveDirectory::new(&config.paths.saves_dir);
        Ok(Self {
            machine: StateMachine::new(config, &saves),
            bindings: config.key_bindings()?,
            screen: config.screen_size(),
        })
    }
}

/// Draw intents produced by the last frame.
#[derive(Resource, Default)]
pub struct FrameDraws(pub DrawList);

// ============================================================================
// GAME PLUGIN
// ============================================================================

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameDraws>()
            .add_systems(Update, advance_session.in_set(FrameSet::Simulate));
    }
}

/// Advance the core one frame and record its draw intents.
fn advance_session(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<Session>,
    mut draws: ResMut<FrameDraws>,
    mut exit: EventWriter<AppExit>,
) {
    let session = &mut *session;

    let cursor = windows.get_single().ok().and_then(|window| {
        let size = Vec2::new(window.width(), window.height());
        window
            .cursor_position()
            .and_then(|cursor| cursor_to_screen(cursor, size, session.screen))
    });

    let snapshot = {
        let source = BevyInput {
            keys: &keys,
            mouse: &mouse,
            cursor,
            bindings: &session.bindings,
        };
        InputSnapshot::capture(&source)
    };

    let result = session.machine.update(&snapshot, time.delta());
    for event in &result.events {
        match &event.data {
            GameEventData::StateChanged { from, to } => info!("State {} -> {}", from, to),
            GameEventData::PlayerDied => info!("Player died on frame {}", event.frame),
            GameEventData::LoadRequested => warn!("Loading saves is not supported yet"),
            other => debug!("Frame {}: {:?}", event.frame, other),
        }
    }

    draws.0.clear();
    session.machine.render(&mut draws.0);

    if result.quit_requested {
        info!("Quit requested, exiting");
        exit.send(AppExit::Success);
    }
}

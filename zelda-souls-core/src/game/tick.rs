//! Gameplay Tick
//!
//! One gameplay frame, in a fixed order:
//!
//! 1. movement integration (intent, acceleration/friction, world clamp)
//! 2. player timers and stamina regeneration
//! 3. just-pressed actions: attack, roll, interact
//! 4. camera follow, spring, shake and bounds
//!
//! Given the same inputs and frame durations the result is identical on
//! every run; [`replay_session`] relies on that.

use std::time::Duration;

use crate::config::GameConfig;
use crate::game::camera::Camera;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{Action, InputSnapshot};
use crate::game::movement::MovementBounds;
use crate::game::player::{PlayerAction, PlayerEntity, RejectReason};
use crate::game::state::{GameState, StateMachine};
use crate::save::SaveSlots;

/// Result of a frame.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this frame
    pub events: Vec<GameEvent>,
    /// State after the frame
    pub state: GameState,
    /// Whether "Quit" has been chosen
    pub quit_requested: bool,
}

impl TickResult {
    /// Did the active state change this frame?
    pub fn state_changed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e.data, GameEventData::StateChanged { .. }))
    }
}

/// Run one gameplay frame for `player`.
pub fn gameplay_step(
    player: &mut PlayerEntity,
    camera: &mut Camera,
    input: &InputSnapshot,
    dt: Duration,
    world: &MovementBounds,
    frame: u64,
    events: &mut Vec<GameEvent>,
) {
    // 1. Movement
    player.update_movement(input.intent(), dt.as_secs_f64(), Some(world));

    // 2. Timers and stamina
    player.stats.update(dt);

    // 3. Actions
    if input.is_just_pressed(Action::Attack) {
        let outcome = player.try_attack().map(|()| GameEventData::AttackPerformed);
        events.push(GameEvent::new(frame, action_event(PlayerAction::Attack, outcome)));
    }
    if input.is_just_pressed(Action::Roll) {
        let outcome = player
            .try_roll()
            .map(|velocity| GameEventData::RollPerformed { velocity });
        events.push(GameEvent::new(frame, action_event(PlayerAction::Roll, outcome)));
    }
    if input.is_just_pressed(Action::Interact) {
        if let Err(reason) = player.try_interact() {
            let data = GameEventData::ActionRejected { action: PlayerAction::Interact, reason };
            events.push(GameEvent::new(frame, data));
        }
    }

    // 4. Camera
    camera.update(dt, Some(&*player));
}

fn action_event(
    action: PlayerAction,
    outcome: Result<GameEventData, RejectReason>,
) -> GameEventData {
    outcome.unwrap_or_else(|reason| GameEventData::ActionRejected { action, reason })
}

/// Replay a session from recorded input snapshots.
///
/// Every frame uses the same `dt`. Stops early once "Quit" is chosen.
/// Returns the final machine and all events.
pub fn replay_session(
    config: &GameConfig,
    saves: &dyn SaveSlots,
    frames: &[InputSnapshot],
    dt: Duration,
) -> (StateMachine, Vec<GameEvent>) {
    let mut machine = StateMachine::new(config, saves);
    let mut all_events = Vec::new();

    for snapshot in frames {
        let result = machine.update(snapshot, dt);
        all_events.extend(result.events);

        if result.quit_requested {
            break;
        }
    }

    (machine, all_events)
}

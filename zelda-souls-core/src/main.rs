//! Zelda Souls Headless Runner
//!
//! Drives a scripted session through the state machine without a window,
//! logs what happened, then replays the recorded frames on a fresh machine
//! and checks that both runs end in the same state hash.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use zelda_souls::{
    game::{
        events::GameEventData,
        input::{InputSnapshot, Key, VirtualInput},
        menu::{MainMenu, MenuAction},
        state::StateMachine,
    },
    render::DrawList,
    GameConfig, SaveDirectory, DEFAULT_CONFIG_PATH, VERSION,
};

/// Headless session runner.
#[derive(Parser, Debug)]
#[command(name = "zelda-souls-headless", version, about)]
struct Args {
    /// Config file (defaults are used when it does not exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Frames of free walking before the scripted hits start
    #[arg(short, long, default_value_t = 600)]
    frames: u32,
}

/// One recorded frame: the input and an optional hit applied before it.
#[derive(Clone, Copy, Debug)]
struct RecordedFrame {
    input: InputSnapshot,
    damage: Option<i32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = GameConfig::load_or_default(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    config.validate().context("invalid configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.debug.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Zelda Souls headless v{}", VERSION);
    info!(
        "Window {}x{}, {} FPS, difficulty {}",
        config.window.width, config.window.height, config.rendering.target_fps, config.gameplay.difficulty
    );

    let saves = SaveDirectory::new(&config.paths.saves_dir);
    let dt = config.frame_duration();
    let recording = script_session(&config, args.frames)?;
    info!("Scripted {} frames", recording.len());

    // First run, with logging
    info!("=== Running Session ===");
    let mut machine = StateMachine::new(&config, &saves);
    let total_events = run(&mut machine, &recording, dt, true);

    let mut frame_draw = DrawList::new();
    machine.render(&mut frame_draw);
    info!("Final state: {}", machine.state());
    info!("Last frame draws {} commands", frame_draw.len());
    info!("Total events: {}", total_events);

    let hash = machine.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let mut replay = StateMachine::new(&config, &saves);
    run(&mut replay, &recording, dt, false);
    let replay_hash = replay.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED - hashes match");
        Ok(())
    } else {
        warn!("DETERMINISM FAILED - hashes differ");
        anyhow::bail!("replay diverged from the recorded session")
    }
}

/// Run every recorded frame. Returns the number of events.
fn run(machine: &mut StateMachine, recording: &[RecordedFrame], dt: Duration, log: bool) -> usize {
    let mut total = 0;
    for frame in recording {
        if let Some(amount) = frame.damage {
            machine.damage_player(amount);
        }

        let result = machine.update(&frame.input, dt);
        total += result.events.len();

        if log {
            for event in &result.events {
                match &event.data {
                    GameEventData::PlayerSpawned { position } => {
                        info!("Frame {}: player spawned at {}", event.frame, position);
                    }
                    GameEventData::DamageTaken { amount, health } => {
                        info!("Frame {}: took {} damage, health {}", event.frame, amount, health);
                    }
                    GameEventData::PlayerDied => info!("Frame {}: player died", event.frame),
                    other => debug!("Frame {}: {:?}", event.frame, other),
                }
            }
        }

        if result.quit_requested {
            break;
        }
    }
    total
}

/// Build the scripted session: New Game, walk, attack, roll, pause and
/// resume, then hits every second until the player dies.
fn script_session(config: &GameConfig, walk_frames: u32) -> Result<Vec<RecordedFrame>> {
    let bindings = config.key_bindings()?;
    let mut input = VirtualInput::new(bindings);
    let mut out = Vec::new();

    let push = |input: &mut VirtualInput, out: &mut Vec<RecordedFrame>, damage: Option<i32>| {
        out.push(RecordedFrame {
            input: input.snapshot(),
            damage,
        });
    };
    let tap = |input: &mut VirtualInput, out: &mut Vec<RecordedFrame>, key: Key| {
        input.press(key);
        push(input, out, None);
        input.release(key);
    };

    // Click "New Game"
    let screen = config.screen_size();
    let menu = MainMenu::new(screen.x, screen.y);
    let button = menu
        .button(MenuAction::NewGame)
        .map(|b| b.bounds.center())
        .context("main menu has no New Game button")?;
    input.set_cursor(Some(button));
    push(&mut input, &mut out, None);
    input.set_mouse_pressed(true);
    push(&mut input, &mut out, None);
    input.set_mouse_pressed(false);
    input.set_cursor(None);

    // Walk a square, attacking and rolling along the way
    let legs = [Key::D, Key::S, Key::A, Key::W];
    let per_leg = (walk_frames / legs.len() as u32).max(1);
    for key in legs {
        input.press(key);
        for f in 0..per_leg {
            if f == per_leg / 3 {
                tap(&mut input, &mut out, Key::Space);
            } else if f == 2 * per_leg / 3 {
                tap(&mut input, &mut out, Key::C);
            } else {
                push(&mut input, &mut out, None);
            }
        }
        input.release(key);
    }

    // Pause for half a second, then resume
    tap(&mut input, &mut out, Key::Escape);
    for _ in 0..30 {
        push(&mut input, &mut out, None);
    }
    tap(&mut input, &mut out, Key::Escape);

    // A hit every second; ten is more than enough to run out of health
    for _ in 0..10 {
        push(&mut input, &mut out, Some(25));
        for _ in 0..59 {
            push(&mut input, &mut out, None);
        }
    }

    Ok(out)
}

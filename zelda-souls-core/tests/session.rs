//! Full sessions through the public API.

use std::time::Duration;

use zelda_souls::game::events::GameEventData;
use zelda_souls::game::menu::MenuAction;
use zelda_souls::game::tick::replay_session;
use zelda_souls::{
    DrawList, GameConfig, GameState, InputSnapshot, Key, KeyBindings, NoSaves, SaveDirectory,
    SaveSlots, StateMachine, Vector2, VirtualInput,
};

const DT: Duration = Duration::from_micros(16_667);

struct Session {
    machine: StateMachine,
    input: VirtualInput,
    recorded: Vec<InputSnapshot>,
}

impl Session {
    fn new(config: &GameConfig, saves: &dyn SaveSlots) -> Self {
        Self {
            machine: StateMachine::new(config, saves),
            input: VirtualInput::new(config.key_bindings().unwrap()),
            recorded: Vec::new(),
        }
    }

    fn frame(&mut self) -> Vec<GameEventData> {
        let snapshot = self.input.snapshot();
        self.recorded.push(snapshot);
        let result = self.machine.update(&snapshot, DT);
        result.events.into_iter().map(|e| e.data).collect()
    }

    fn frames(&mut self, n: usize) -> Vec<GameEventData> {
        (0..n).flat_map(|_| self.frame()).collect()
    }

    fn click(&mut self, action: MenuAction) -> Vec<GameEventData> {
        let target = self.machine.menu().button(action).map(|b| b.bounds.center());
        self.input.set_cursor(target);
        let mut events = self.frame();
        self.input.set_mouse_pressed(true);
        events.extend(self.frame());
        self.input.set_mouse_pressed(false);
        self.input.set_cursor(None);
        events
    }

    fn tap(&mut self, key: Key) -> Vec<GameEventData> {
        self.input.press(key);
        let events = self.frame();
        self.input.release(key);
        events
    }
}

#[test]
fn test_full_session_until_death() {
    let config = GameConfig::default();
    let mut s = Session::new(&config, &NoSaves);

    s.click(MenuAction::NewGame);
    assert_eq!(s.machine.state(), GameState::Gameplay);
    let spawn = s.machine.player().unwrap().position;

    // Walk right for a second.
    s.input.press(Key::D);
    s.frames(60);
    s.input.release(Key::D);
    let player = s.machine.player().unwrap();
    assert!(player.position.x > spawn.x);
    assert!(player.movement.velocity.length() <= player.movement.max_speed + 1e-9);

    // Pause freezes the player.
    s.tap(Key::Escape);
    let frozen = s.machine.player().unwrap().position;
    s.frames(30);
    assert_eq!(s.machine.player().unwrap().position, frozen);
    s.tap(Key::Escape);
    assert_eq!(s.machine.state(), GameState::Gameplay);

    // Two hits inside the invulnerability window apply once.
    assert!(s.machine.damage_player(30));
    assert_eq!(s.machine.player().unwrap().stats.health, 75);
    s.frames(30);
    assert!(!s.machine.damage_player(30));
    assert_eq!(s.machine.player().unwrap().stats.health, 75);

    // Keep hitting once per second until dead.
    let mut died = false;
    for _ in 0..20 {
        s.machine.damage_player(40);
        let events = s.frames(61);
        if events.contains(&GameEventData::PlayerDied) {
            died = true;
            break;
        }
    }
    assert!(died);
    assert_eq!(s.machine.state(), GameState::Menu);
    assert!(s.machine.player().is_none());

    let mut list = DrawList::new();
    s.machine.render(&mut list);
    assert!(list.contains_text("New Game"));
}

#[test]
fn test_recorded_session_replays_to_same_hash() {
    let config = GameConfig::default();
    let mut s = Session::new(&config, &NoSaves);

    s.click(MenuAction::NewGame);
    s.input.press(Key::W);
    s.input.press(Key::A);
    s.frames(45);
    s.tap(Key::Space);
    s.tap(Key::C);
    s.input.release_all();
    s.frames(90);
    s.tap(Key::I);

    let (replayed, events) = replay_session(&config, &NoSaves, &s.recorded, DT);
    assert_eq!(replayed.compute_hash(), s.machine.compute_hash());
    assert!(events.contains(&zelda_souls::game::events::GameEvent::new(
        replayed.frame(),
        GameEventData::HelpToggled { visible: false },
    )));
}

#[test]
fn test_config_file_drives_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[window]
width = 800
height = 600

[input.key_mapping]
move_right = "M"

[gameplay]
escape_behavior = "menu"
"#,
    )
    .unwrap();

    let config = GameConfig::load(&path).unwrap();
    let mut s = Session::new(&config, &NoSaves);
    s.click(MenuAction::NewGame);
    assert_eq!(s.machine.player().unwrap().position, Vector2::new(400.0, 300.0));

    s.input.press(Key::D);
    s.frames(10);
    assert_eq!(s.machine.player().unwrap().position.x, 400.0);
    s.input.release(Key::D);

    s.tap(Key::Escape);
    assert_eq!(s.machine.state(), GameState::Menu);
}

#[test]
fn test_load_enabled_by_save_directory() {
    let dir = tempfile::tempdir().unwrap();
    let saves = SaveDirectory::new(dir.path());
    let config = GameConfig::default();

    let mut s = Session::new(&config, &saves);
    assert!(s.click(MenuAction::LoadGame).is_empty());

    std::fs::write(saves.slot_path(1), b"slot").unwrap();
    s.machine.refresh_saves(&saves);
    assert!(s.click(MenuAction::LoadGame).contains(&GameEventData::LoadRequested));
}

#[test]
fn test_random_input_keeps_invariants() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let keys = [Key::W, Key::A, Key::S, Key::D, Key::Space, Key::C, Key::E, Key::Escape, Key::Q];

    let mut s = Session::new(&config, &NoSaves);
    s.click(MenuAction::NewGame);

    for _ in 0..2000 {
        for &key in &keys {
            if rng.gen_bool(0.1) {
                s.input.press(key);
            } else if rng.gen_bool(0.2) {
                s.input.release(key);
            }
        }
        if rng.gen_bool(0.01) {
            s.machine.damage_player(rng.gen_range(1..40));
        }
        s.frame();

        if let Some(player) = s.machine.player() {
            let half = player.half_size();
            let margin = config.gameplay.world.margin;
            assert!(player.position.x >= margin + half.x - 1e-9);
            assert!(player.position.x <= 1280.0 - margin - half.x + 1e-9);
            assert!(player.position.y >= margin + half.y - 1e-9);
            assert!(player.position.y <= 720.0 - margin - half.y + 1e-9);
            assert!(player.stats.stamina >= 0.0 && player.stats.stamina <= player.stats.max_stamina);
        }

        let view = s.machine.camera().view_bounds();
        assert!(view.x >= -1e-9 && view.right() <= 1280.0 + 1e-9);

        if s.machine.state() == GameState::Menu {
            s.input.release_all();
            s.click(MenuAction::NewGame);
        }
    }
}

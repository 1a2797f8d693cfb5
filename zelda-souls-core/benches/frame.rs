//! Benchmarks for gameplay frames and rendering.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zelda_souls::game::menu::MenuAction;
use zelda_souls::{DrawList, GameConfig, InputSnapshot, Key, KeyBindings, NoSaves, StateMachine, VirtualInput};

const DT: Duration = Duration::from_micros(16_667);

/// Machine already in gameplay, plus an input source holding `keys`.
fn playing(keys: &[Key]) -> (StateMachine, VirtualInput) {
    let config = GameConfig::default();
    let mut machine = StateMachine::new(&config, &NoSaves);
    let mut input = VirtualInput::new(KeyBindings::default());

    let button = machine.menu().button(MenuAction::NewGame).map(|b| b.bounds.center());
    input.set_cursor(button);
    machine.update(&input.snapshot(), DT);
    input.set_mouse_pressed(true);
    machine.update(&input.snapshot(), DT);
    input.set_mouse_pressed(false);
    input.set_cursor(None);

    for &key in keys {
        input.press(key);
    }
    (machine, input)
}

fn bench_gameplay_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("gameplay_frames");

    for frames in [60u64, 600] {
        group.throughput(Throughput::Elements(frames));
        group.bench_with_input(BenchmarkId::new("walk_diagonal", frames), &frames, |b, &frames| {
            b.iter_batched(
                || {
                    let (machine, mut input) = playing(&[Key::D, Key::S]);
                    let snapshot: InputSnapshot = input.snapshot();
                    (machine, snapshot)
                },
                |(mut machine, snapshot)| {
                    for _ in 0..frames {
                        black_box(machine.update(&snapshot, DT));
                    }
                    machine
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let (machine, _) = playing(&[]);
    let mut list = DrawList::new();

    c.bench_function("render_gameplay", |b| {
        b.iter(|| {
            list.clear();
            machine.render(&mut list);
            black_box(list.len())
        })
    });
}

fn bench_state_hash(c: &mut Criterion) {
    let (machine, _) = playing(&[]);
    c.bench_function("compute_hash", |b| b.iter(|| black_box(machine.compute_hash())));
}

criterion_group!(benches, bench_gameplay_frames, bench_render, bench_state_hash);
criterion_main!(benches);

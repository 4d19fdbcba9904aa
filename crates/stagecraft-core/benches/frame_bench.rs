use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use stagecraft_core::behavior::{AlphaBehavior, RotateBehavior};
use stagecraft_core::{Actor, Behavior, Color, Director, DirectorConfig, RecordingSurface};

fn populated(count: usize, dirty_rects: bool) -> Director {
    let mut config = DirectorConfig::new(800, 600);
    config.dirty_rects = dirty_rects;
    let mut director = Director::new(config);
    let scene = director.create_scene();
    for i in 0..count {
        let x = (i % 40) as f32 * 20.0;
        let y = (i / 40) as f32 * 20.0;
        let id = director
            .graph
            .add_actor(Actor::new().with_bounds(x, y, 16.0, 16.0).with_fill(Color::WHITE));
        // Spin every other actor; the rest stay static for the dirty-rect path.
        if i % 2 == 0 {
            director.graph.add_behavior(
                id,
                Behavior::new(RotateBehavior::new(0.0, std::f32::consts::TAU))
                    .with_frame_time(0.0, 1000.0)
                    .with_cycle(true),
            );
        } else {
            director.graph.add_behavior(
                id,
                Behavior::new(AlphaBehavior::new(1.0, 1.0)).with_frame_time(0.0, 1000.0),
            );
        }
        let _ = director.graph.add_child(scene, id);
    }
    director
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("Director::render");

    for &count in &[100usize, 1000, 5000] {
        for dirty in [false, true] {
            let label = if dirty { "dirty_rects" } else { "full_clear" };
            group.bench_with_input(BenchmarkId::new(label, count), &count, |b, &n| {
                let mut director = populated(n, dirty);
                let mut surface = RecordingSurface::new();
                b.iter(|| {
                    surface.clear_commands();
                    director.render(16.0, &mut surface)
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);

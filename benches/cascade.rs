use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_blast::core::{
    cascade, find_connected_group, Grid, MoveScheduler, NullSink, SimpleRng, TileIds,
};
use tui_blast::types::{EngineConfig, Tile, TileKind, TICK_MS};

/// 6x6 grid filled with one kind: the worst case for group detection.
fn uniform_grid() -> Grid {
    let mut grid = Grid::new(6, 6);
    let mut ids = TileIds::new();
    for y in 0..6 {
        for x in 0..6 {
            let _ = grid.set(
                x,
                y,
                Some(Tile {
                    id: ids.next(),
                    kind: TileKind::Blue,
                }),
            );
        }
    }
    grid
}

fn bench_group_detection(c: &mut Criterion) {
    let grid = uniform_grid();

    c.bench_function("find_connected_group_full_grid", |b| {
        b.iter(|| find_connected_group(&grid, black_box(3), black_box(3)))
    });
}

fn bench_collapse_plan(c: &mut Criterion) {
    // Checkerboard of gaps: every column compacts.
    let mut grid = uniform_grid();
    for y in 0..6 {
        for x in 0..6 {
            if (x + y) % 2 == 0 {
                let _ = grid.set(x, y, None);
            }
        }
    }

    c.bench_function("plan_collapse_checkerboard", |b| {
        b.iter(|| cascade::plan_collapse(black_box(&grid)))
    });
}

fn bench_refill_plan(c: &mut Criterion) {
    let config = EngineConfig::default();
    let grid = Grid::new(config.width, config.height);
    let mut rng = SimpleRng::new(12345);
    let mut ids = TileIds::new();

    c.bench_function("plan_refill_empty_grid", |b| {
        b.iter(|| cascade::plan_refill(black_box(&grid), &config, &mut rng, &mut ids))
    });
}

fn bench_full_move_cycle(c: &mut Criterion) {
    let mut visuals = NullSink;

    c.bench_function("activate_and_settle", |b| {
        b.iter(|| {
            let config = EngineConfig {
                palette_size: 1,
                ..EngineConfig::default()
            };
            let mut scheduler = MoveScheduler::new(config, 12345);
            scheduler.initialize(&mut visuals);
            // Single-kind palette: the whole grid clears in one move.
            scheduler
                .on_tile_activated(3, 3, &mut visuals)
                .expect("full grid activation");
            while !scheduler.phase().is_idle() {
                scheduler.tick(TICK_MS, &mut visuals);
            }
            scheduler.take_last_outcome()
        })
    });
}

criterion_group!(
    benches,
    bench_group_detection,
    bench_collapse_plan,
    bench_refill_plan,
    bench_full_move_cycle
);
criterion_main!(benches);

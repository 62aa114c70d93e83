//! Benchmarks for A* on open and maze-like battle maps

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use bloodsword::battle::{find_path, reachable, BattleMap, TerrainKind};
use bloodsword::core::{Point, Side};

/// Serpentine walls with a gap at alternating ends
fn maze(size: i32) -> BattleMap {
    let mut map = BattleMap::new(size, size);
    for x in (1..size - 1).step_by(2) {
        let gap = if (x / 2) % 2 == 0 { size - 1 } else { 0 };
        for y in 0..size {
            if y != gap {
                map.set_terrain(Point::new(x, y), TerrainKind::Obstacle);
            }
        }
    }
    map
}

fn bench_open_map(c: &mut Criterion) {
    let map = BattleMap::new(32, 32);
    let (src, dst) = (Point::new(0, 0), Point::new(31, 31));

    c.bench_function("astar_open_32x32", |b| {
        b.iter(|| black_box(find_path(&map, black_box(src), black_box(dst), Side::Player, false)))
    });
}

fn bench_maze_map(c: &mut Criterion) {
    let map = maze(31);
    let (src, dst) = (Point::new(0, 0), Point::new(30, 30));

    c.bench_function("astar_maze_31x31", |b| {
        b.iter(|| black_box(find_path(&map, black_box(src), black_box(dst), Side::Player, false)))
    });
}

fn bench_reachable(c: &mut Criterion) {
    let map = BattleMap::new(32, 32);

    c.bench_function("reachable_budget_8", |b| {
        b.iter(|| black_box(reachable(&map, black_box(Point::new(16, 16)), Side::Opponent, 8)))
    });
}

criterion_group!(benches, bench_open_map, bench_maze_map, bench_reachable);
criterion_main!(benches);

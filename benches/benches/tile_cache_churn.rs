// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use understory_tile_cache::{CacheGrid, TileSurface};
use understory_view2d::{IRect, ISize};

/// A surface with no pixels, so the numbers measure bookkeeping only.
struct Blank;

impl TileSurface for Blank {
    fn blank(_size: ISize) -> Self {
        Self
    }
    fn clear(&mut self) {}
}

/// A 1920x1080 viewport sweeping right by `step` pixels per frame.
fn sweep(grid: &mut CacheGrid<Blank>, frames: i32, step: i32) -> usize {
    let mut redrawn = 0;
    for f in 0..frames {
        let x = f * step;
        grid.visit_cells(IRect::new(x, 0, x + 1920, 1080), |cell| {
            if cell.is_dirty() {
                cell.set_dirty(false);
                redrawn += 1;
            }
        });
    }
    redrawn
}

fn bench_pan(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile_cache_pan");
    for &capacity in &[20usize, 108, 400] {
        group.bench_function(format!("sweep_cap{}", capacity), |b| {
            b.iter(|| {
                let mut grid = CacheGrid::<Blank>::new(capacity).unwrap();
                black_box(sweep(&mut grid, 200, 37))
            });
        });
    }
    group.finish();
}

fn bench_invalidate(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile_cache_invalidate");
    let mut grid = CacheGrid::<Blank>::new(400).unwrap();
    grid.visit_cells(IRect::new(-5_000, -5_000, 5_000, 5_000), |cell| {
        cell.set_dirty(false);
    });
    group.bench_function("small_rect", |b| {
        b.iter(|| grid.mark_dirty(black_box(IRect::new(480, 480, 520, 520))));
    });
    group.bench_function("mark_all", |b| {
        b.iter(|| grid.mark_all_dirty());
    });
    group.finish();
}

criterion_group!(benches, bench_pan, bench_invalidate);
criterion_main!(benches);

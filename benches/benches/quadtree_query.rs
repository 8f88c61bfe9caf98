// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Line, Point, Rect};
use understory_quadtree::{QuadTree, filter};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Small rectangles scattered over a square of side `extent` centered on the origin.
fn gen_scattered(count: usize, extent: f64, size: f64) -> Vec<Rc<Rect>> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let x0 = (rng.next_f64() - 0.5) * extent;
            let y0 = (rng.next_f64() - 0.5) * extent;
            Rc::new(Rect::new(x0, y0, x0 + size, y0 + size))
        })
        .collect()
}

fn build(shapes: &[Rc<Rect>]) -> QuadTree<Rect> {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 1000.0, 1000.0)).unwrap();
    for s in shapes {
        tree.insert_item(s.clone());
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_insert");
    for &n in &[1_000usize, 10_000, 50_000] {
        let shapes = gen_scattered(n, 20_000.0, 40.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("scattered_n{}", n), |b| {
            b.iter(|| black_box(build(&shapes).node_count()));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_query");
    let shapes = gen_scattered(50_000, 20_000.0, 40.0);
    let tree = build(&shapes);
    group.bench_function("viewport_rect", |b| {
        b.iter(|| black_box(tree.query_items(Rect::new(-500.0, -500.0, 500.0, 500.0)).len()));
    });
    group.bench_function("tile_rect_sorted", |b| {
        b.iter(|| {
            let mut hits = tree.query_items(Rect::new(0.0, 0.0, 500.0, 500.0));
            tree.reorder(&mut hits).unwrap();
            black_box(hits.len())
        });
    });
    group.bench_function("point", |b| {
        b.iter(|| black_box(tree.query_items(Point::new(12.0, 34.0)).len()));
    });
    group.bench_function("line_exact", |b| {
        let line = Line::new((-10_000.0, -10_000.0), (10_000.0, 10_000.0));
        b.iter(|| black_box(tree.query_items_with(line, filter::exact).len()));
    });
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_update");
    let shapes = gen_scattered(10_000, 20_000.0, 40.0);
    group.bench_function("delete_reinsert_1k", |b| {
        b.iter_batched(
            || build(&shapes),
            |mut tree| {
                for s in shapes.iter().take(1_000) {
                    tree.detach_item(s);
                    tree.reinsert_item(s.clone());
                }
                black_box(tree.size());
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_query, bench_update);
criterion_main!(benches);

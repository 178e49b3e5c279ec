//! Benchmarks for quadtree redraw performance.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lifeview::render::{redraw, PixelBuffer};
use lifeview::{Automaton, Palette, Universe, Viewport};

/// Pseudo-random soup of `count` cells inside a `side x side` square.
fn soup(count: usize, side: i64) -> Universe {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    let cells: Vec<(i64, i64)> = (0..count)
        .map(|_| {
            let x = (next() % side as u64) as i64 - side / 2;
            let y = (next() % side as u64) as i64 - side / 2;
            (x, y)
        })
        .collect();
    Universe::construct(&cells)
}

fn viewport(cell_width: f64) -> Viewport {
    let mut vp = Viewport::with_canvas(1280, 720);
    vp.cell_width = cell_width;
    vp.center_view();
    vp
}

/// Full redraw at several zoom levels over the same universe
fn bench_zoom_levels(c: &mut Criterion) {
    let universe = soup(20_000, 512);
    let palette = Palette::default();
    let mut buffer = PixelBuffer::new(1280, 720);

    let mut group = c.benchmark_group("redraw_zoom");
    group.throughput(Throughput::Elements(1280 * 720));
    for cell_width in [0.25, 1.0, 4.0, 16.0] {
        let vp = viewport(cell_width);
        group.bench_with_input(BenchmarkId::from_parameter(cell_width), &vp, |b, vp| {
            b.iter(|| redraw(black_box(universe.root()), vp, &mut buffer, &palette))
        });
    }
    group.finish();
}

/// Mostly offscreen content should cost little thanks to culling
fn bench_culled(c: &mut Criterion) {
    let universe = soup(20_000, 4096);
    let palette = Palette::default();
    let mut buffer = PixelBuffer::new(1280, 720);
    let vp = viewport(32.0);

    c.bench_function("redraw_culled", |b| {
        b.iter(|| redraw(black_box(universe.root()), &vp, &mut buffer, &palette))
    });
}

fn bench_construct(c: &mut Criterion) {
    c.bench_function("construct_soup_5000", |b| b.iter(|| soup(black_box(5000), 256)));
}

criterion_group!(benches, bench_zoom_levels, bench_culled, bench_construct);
criterion_main!(benches);

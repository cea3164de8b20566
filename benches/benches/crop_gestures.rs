// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};
use understory_crop::{CropGesture, CropRegionState, HandlePosition};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    /// Uniform in `[-range, range)`.
    fn next_signed(&mut self, range: f64) -> f64 {
        (f64::from(self.next_u32()) / f64::from(u32::MAX) * 2.0 - 1.0) * range
    }
}

fn loaded(ratio: Option<f64>) -> CropRegionState {
    let mut crop = CropRegionState::default();
    crop.set_canvas_size(Size::new(1280.0, 720.0));
    crop.load_image(6000.0, 4000.0).expect("large image");
    crop.set_aspect_ratio(ratio).expect("ratio fits");
    crop
}

fn jitter(n: usize, range: f64, seed: u64) -> Vec<Vec2> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| Vec2::new(rng.next_signed(range), rng.next_signed(range)))
        .collect()
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("crop/resize_via_handle");
    let deltas = jitter(1_024, 12.0, 0xC209_0000_0000_0001);

    for (label, ratio) in [("free", None), ("locked_4_3", Some(4.0 / 3.0))] {
        group.bench_with_input(BenchmarkId::new(label, deltas.len()), &deltas, |b, deltas| {
            b.iter_batched(
                || loaded(ratio),
                |mut crop| {
                    let mut accepted = 0_u32;
                    for (i, delta) in deltas.iter().enumerate() {
                        let handle = HandlePosition::ALL[i % HandlePosition::ALL.len()];
                        if crop.resize_via_handle(handle, *delta).is_some() {
                            accepted += 1;
                        }
                        if i % 64 == 63 {
                            crop.finish_gesture();
                        }
                    }
                    black_box((accepted, crop.cropped_region()));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_pan_zoom(c: &mut Criterion) {
    let mut group = c.benchmark_group("crop/pan_zoom");
    let deltas = jitter(1_024, 40.0, 0xC209_0000_0000_0002);

    group.bench_function("pan", |b| {
        b.iter_batched(
            || {
                let mut crop = loaded(None);
                crop.zoom(60.0, Point::new(640.0, 360.0));
                crop
            },
            |mut crop| {
                for delta in &deltas {
                    black_box(crop.pan(*delta));
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("wheel_zoom", |b| {
        b.iter_batched(
            || (loaded(Some(1.5)), CropGesture::default()),
            |(mut crop, gesture)| {
                for (i, delta) in deltas.iter().enumerate() {
                    let notches = if i % 3 == 0 { -1.0 } else { 1.0 };
                    let pos = Point::new(640.0, 360.0) + *delta;
                    black_box(gesture.wheel(&mut crop, notches, pos));
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_resize, bench_pan_zoom);
criterion_main!(benches);

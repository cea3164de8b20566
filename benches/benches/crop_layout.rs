// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_crop::{CropShape, MaskGeometry, ViewportLayout};

const IMAGE: Rect = Rect::new(0.0, 0.0, 6000.0, 4000.0);

fn crops(n: usize) -> Vec<Rect> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            let x0 = t * 2000.0;
            let y0 = (1.0 - t) * 1500.0;
            Rect::new(x0, y0, x0 + 400.0 + t * 3000.0, y0 + 300.0 + t * 2000.0)
        })
        .collect()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("crop/layout_fit");

    for canvas in [Size::new(800.0, 600.0), Size::new(3840.0, 2160.0)] {
        let inputs = crops(256);
        group.throughput(Throughput::Elements(inputs.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("fit", format!("{}x{}", canvas.width, canvas.height)),
            &inputs,
            |b, inputs| {
                b.iter(|| {
                    for crop in inputs {
                        black_box(ViewportLayout::fit(canvas, *crop, IMAGE));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("crop/mask_is_dimmed");
    let canvas = Size::new(800.0, 600.0);
    let selection = Rect::new(150.0, 100.0, 650.0, 500.0);
    let points: Vec<Point> = (0..4_096)
        .map(|i| Point::new(f64::from(i % 64) * 12.5, f64::from(i / 64) * 9.375))
        .collect();
    group.throughput(Throughput::Elements(points.len() as u64));

    for shape in [CropShape::Rectangular, CropShape::Circular] {
        let mask = MaskGeometry::new(canvas, selection, shape);
        group.bench_with_input(
            BenchmarkId::new(format!("{shape:?}"), points.len()),
            &points,
            |b, points| {
                b.iter(|| points.iter().filter(|pt| mask.is_dimmed(**pt)).count());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_fit, bench_mask);
criterion_main!(benches);

//! Benchmarks for morphology algorithms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use granulo_algorithms::morphology::{
    area_opening, dilate, erode, remove_background, BallElement, MaxTree,
};
use granulo_core::{Connectivity, Image};

fn create_test_image(size: usize) -> Image<f64> {
    let mut image = Image::new(size, size);
    // Textured surface with many plateaus
    for row in 0..size {
        for col in 0..size {
            let v = ((row * 7 + col * 13) % 256) as f64;
            image.set(row, col, v).unwrap();
        }
    }
    image
}

fn bench_max_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("morphology/max_tree_build");
    for size in [128, 256, 512, 1024] {
        let image = create_test_image(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| MaxTree::build(black_box(&image), Connectivity::Eight).unwrap())
        });
    }
    group.finish();
}

fn bench_area_opening(c: &mut Criterion) {
    let mut group = c.benchmark_group("morphology/area_opening");
    let image = create_test_image(512);
    for area in [10.0, 100.0, 1000.0, 10000.0] {
        group.bench_with_input(BenchmarkId::from_parameter(area), &area, |b, &area| {
            b.iter(|| area_opening(black_box(&image), area, Connectivity::Eight).unwrap())
        });
    }
    group.finish();
}

fn bench_erode_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("morphology/erode_radius");
    let image = create_test_image(256);
    for radius in [2.0, 5.0, 10.0, 25.0] {
        let ball = BallElement::new(radius).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| erode(black_box(&image), &ball).unwrap())
        });
    }
    group.finish();
}

fn bench_dilate_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("morphology/dilate_radius");
    let image = create_test_image(256);
    for radius in [2.0, 5.0, 10.0, 25.0] {
        let ball = BallElement::new(radius).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| dilate(black_box(&image), &ball).unwrap())
        });
    }
    group.finish();
}

fn bench_remove_background(c: &mut Criterion) {
    let mut group = c.benchmark_group("morphology/remove_background");
    group.sample_size(10);
    for size in [128, 256, 512] {
        let image = create_test_image(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| remove_background(black_box(&image), 12.5).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_max_tree_build,
    bench_area_opening,
    bench_erode_radius,
    bench_dilate_radius,
    bench_remove_background,
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::{s, Array2, Array3};
use rust_shore::{ColorSpace, Frame};

fn criterion_benchmark(c: &mut Criterion) {
    let gray = Array2::<u8>::zeros((1080, 1920));
    let color = Array3::<u8>::zeros((1080, 1920, 3));
    let cropped = color.slice(s![100..900, 200..1800;2, ..]);

    c.bench_function("frame_grayscale", |b| {
        b.iter(|| Frame::new(black_box(gray.view()), ColorSpace::Grayscale).unwrap())
    });
    c.bench_function("frame_bgr", |b| {
        b.iter(|| Frame::new(black_box(color.view()), ColorSpace::Bgr).unwrap())
    });
    c.bench_function("frame_bgr_cropped", |b| {
        b.iter(|| Frame::new(black_box(cropped), ColorSpace::Bgr).unwrap())
    });
    c.bench_function("frame_tagged", |b| {
        b.iter(|| Frame::with_tag(black_box(gray.view()), black_box("GRAYSCALE")).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

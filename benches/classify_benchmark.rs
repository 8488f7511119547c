use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgb, RgbImage};

use colorseason::classifier::prediction::rank_probabilities;
use colorseason::classifier::preprocess::Preprocessor;

fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
    }
    DynamicImage::ImageRgb8(img)
}

fn bench_preprocess(c: &mut Criterion) {
    let preprocessor = Preprocessor::default();
    let image = gradient_image(640, 480);

    c.bench_function("preprocess_640x480", |b| {
        b.iter(|| preprocessor.prepare(black_box(&image)))
    });
}

fn bench_rank(c: &mut Criterion) {
    let probabilities: Vec<f32> = (0..1000).map(|i| ((i * 37) % 1000) as f32 / 1000.0).collect();

    c.bench_function("rank_probabilities_1000", |b| {
        b.iter(|| rank_probabilities(black_box(&probabilities)))
    });
}

criterion_group!(benches, bench_preprocess, bench_rank);
criterion_main!(benches);

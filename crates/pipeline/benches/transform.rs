//! Benchmarks for the transform stage
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic table shaped like ml-latest-small (~100k ratings) so the
//! numbers don't depend on a dataset being present on disk.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{RawMovieRow, RawRatingRow};
use pipeline::transform::{base_movie, parse_title, transform_ratings};

fn synthetic_ratings(n: usize) -> Vec<RawRatingRow> {
    (0..n)
        .map(|i| RawRatingRow {
            user_id: (i % 610) as i32 + 1,
            movie_id: (i % 9742) as i32 + 1,
            rating: ((i % 10) as f64 + 1.0) / 2.0,
            timestamp: 964_982_703 + i as i64,
        })
        .collect()
}

fn bench_transform_ratings(c: &mut Criterion) {
    let ratings = synthetic_ratings(100_836);

    c.bench_function("transform_ratings_100k", |b| {
        b.iter(|| {
            let out = transform_ratings(black_box(&ratings)).unwrap();
            black_box(out)
        })
    });
}

fn bench_parse_title(c: &mut Criterion) {
    c.bench_function("parse_title", |b| {
        b.iter(|| {
            let parsed = parse_title(black_box(
                "City of Lost Children, The (Cité des enfants perdus, La) (1995)",
            ));
            black_box(parsed)
        })
    });
}

fn bench_base_movie(c: &mut Criterion) {
    let row = RawMovieRow {
        movie_id: 1,
        title: "Toy Story (1995)".to_string(),
        genres: "Adventure|Animation|Children|Comedy|Fantasy".to_string(),
    };

    c.bench_function("base_movie", |b| {
        b.iter(|| black_box(base_movie(black_box(&row))))
    });
}

criterion_group!(
    benches,
    bench_transform_ratings,
    bench_parse_title,
    bench_base_movie
);
criterion_main!(benches);

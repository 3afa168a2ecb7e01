use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use attention_lab_core::AttentionHead;
use attention_lab_trainer::{PuzzleConfig, PuzzleGenerator, TrainerConfig, TrainerSession};

fn bench_puzzle_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("puzzle_generation");

    for key_count in [2, 4, 8, 16] {
        group.bench_with_input(
            BenchmarkId::new("keys", key_count),
            &key_count,
            |b, &key_count| {
                let config = PuzzleConfig::builder().key_count(key_count).build();
                let mut generator = PuzzleGenerator::with_seed(config, 42).unwrap();

                b.iter(|| black_box(generator.generate().unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_attention_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("attention_pipeline");

    for key_count in [4, 16, 64, 256] {
        let head = AttentionHead::new(3, 3);

        group.bench_with_input(
            BenchmarkId::new("keys", key_count),
            &key_count,
            |b, &key_count| {
                let query = vec![1.0, 0.5, -0.5];
                let keys: Vec<Vec<f64>> = (0..key_count)
                    .map(|i| vec![(i % 7) as f64 - 3.0; 3])
                    .collect();
                let values: Vec<Vec<f64>> = (0..key_count)
                    .map(|i| vec![(i % 5) as f64 - 2.0; 3])
                    .collect();

                b.iter(|| black_box(head.attend(&query, &keys, &values).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_session_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_round");

    for key_count in [2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("keys", key_count),
            &key_count,
            |b, &key_count| {
                let config = TrainerConfig {
                    puzzle: PuzzleConfig::builder().key_count(key_count).build(),
                    ..TrainerConfig::default()
                };

                b.iter(|| {
                    let mut session = TrainerSession::with_seed(config.clone(), 42).unwrap();
                    let best = session.puzzle().best_key_index();
                    session.attempt_find_key(best).unwrap();
                    let truth = session.puzzle().probabilities().to_vec();
                    session.submit_candidate(&truth).unwrap();
                    let correct = session.puzzle().correct_choice();
                    session.attempt_mix_values(correct).unwrap();
                    black_box(session.score())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_puzzle_generation,
    bench_attention_pipeline,
    bench_session_round,
);
criterion_main!(benches);

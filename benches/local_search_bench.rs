//! Criterion benchmarks for the local search engine.
//!
//! Uses the bundled problem adapters (N-queens, 2-opt) to measure engine
//! overhead per strategy, plus simulated annealing on a sphere function.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_localsearch::problems::{
    n_queens_components, two_opt_components, DistanceMatrix, NQueensSolution, Tour,
};
use u_localsearch::sa::{AnnealingConfig, AnnealingRunner, Minimize};
use u_localsearch::search::{best_improving_multi, first_improving_multi};
use u_numflow::random::{create_rng, shuffle};

// ===========================================================================
// Inputs
// ===========================================================================

fn circle(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|k| {
            let angle = 2.0 * std::f64::consts::PI * k as f64 / n as f64;
            (angle.cos(), angle.sin())
        })
        .collect()
}

fn shuffled_tour(n: usize, matrix: &DistanceMatrix) -> Tour {
    let mut cities: Vec<usize> = (0..n).collect();
    shuffle(&mut cities, &mut create_rng(42));
    Tour::new(cities, matrix).expect("shuffled range is a permutation")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_n_queens(c: &mut Criterion) {
    let mut group = c.benchmark_group("n_queens");
    group.sample_size(10);

    for &n in &[16, 64, 128] {
        group.bench_with_input(BenchmarkId::new("first", n), &n, |b, &n| {
            b.iter(|| {
                let mut board = NQueensSolution::new(n);
                first_improving_multi(&mut board, n_queens_components());
                black_box(board.conflicts())
            })
        });
        group.bench_with_input(BenchmarkId::new("best", n), &n, |b, &n| {
            b.iter(|| {
                let mut board = NQueensSolution::new(n);
                best_improving_multi(&mut board, n_queens_components());
                black_box(board.conflicts())
            })
        });
    }
    group.finish();
}

fn bench_two_opt(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_opt");
    group.sample_size(10);

    for &n in &[20, 50, 100] {
        let matrix = DistanceMatrix::from_points(&circle(n));
        let start = shuffled_tour(n, &matrix);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(matrix, start), |b, (m, t)| {
            b.iter(|| {
                let mut tour = t.clone();
                first_improving_multi(&mut tour, two_opt_components(black_box(m)));
                black_box(tour.length(m))
            })
        });
    }
    group.finish();
}

fn bench_annealing_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("annealing_sphere");
    group.sample_size(10);

    for &dim in &[10usize, 50, 100] {
        let config = AnnealingConfig::default()
            .with_initial_temperature(100.0)
            .with_min_temperature(0.01)
            .with_max_iterations(1000)
            .with_seed(42);
        let sphere = |x: &Vec<f64>| x.iter().map(|v| v * v).sum::<f64>();
        group.bench_with_input(BenchmarkId::from_parameter(dim), &config, |b, config| {
            b.iter(|| {
                let mut x = vec![3.0; dim];
                let result = AnnealingRunner::run(
                    &mut x,
                    |x: &Vec<f64>| {
                        (0..x.len())
                            .flat_map(|i| [(i, 0.5), (i, -0.5)])
                            .collect::<Vec<_>>()
                    },
                    |x: &Vec<f64>, &(i, d): &(usize, f64)| x[i] * x[i] - (x[i] + d).powi(2),
                    |x: &mut Vec<f64>, &(i, d): &(usize, f64)| {
                        x[i] += d;
                        true
                    },
                    Minimize(sphere),
                    black_box(config),
                );
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_n_queens, bench_two_opt, bench_annealing_sphere);
criterion_main!(benches);

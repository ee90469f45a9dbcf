//! Criterion benchmarks for circuit validity, flow simulation and the GA.
//!
//! Circuits are drawn with a fixed seed so every run measures the same
//! topologies.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_separation::circuit::{check, check_parallel};
use u_separation::fitness::FitnessEvaluator;
use u_separation::flow::{Feed, FlowSimulator};
use u_separation::ga::operators::random_circuit;
use u_separation::ga::{GaConfig, GaRunner};
use u_separation::random::create_rng;

/// Draws `count` valid circuits of `n` units.
fn valid_circuits(n: usize, count: usize) -> Vec<Vec<usize>> {
    let mut rng = create_rng(42);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let c = random_circuit(n, &mut rng);
        if check(&c).is_valid() {
            out.push(c);
        }
    }
    out
}

fn bench_validity(c: &mut Criterion) {
    let mut group = c.benchmark_group("validity");

    for &n in &[5, 10, 20] {
        let mut rng = create_rng(7);
        let candidates: Vec<Vec<usize>> = (0..256).map(|_| random_circuit(n, &mut rng)).collect();
        group.bench_with_input(BenchmarkId::new("check", n), &candidates, |b, cs| {
            b.iter(|| cs.iter().filter(|c| check(black_box(c)).is_valid()).count())
        });
        group.bench_with_input(BenchmarkId::new("check_parallel", n), &candidates, |b, cs| {
            b.iter(|| {
                cs.iter()
                    .filter(|c| check_parallel(black_box(c)).is_valid())
                    .count()
            })
        });
    }
    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("flow_simulation");
    let simulator = FlowSimulator::default();
    let feed = Feed::default();

    for &n in &[5, 10, 20] {
        let circuits = valid_circuits(n, 32);
        group.bench_with_input(BenchmarkId::from_parameter(n), &circuits, |b, cs| {
            b.iter(|| {
                for c in cs {
                    black_box(simulator.simulate(black_box(c), &feed).ok());
                }
            })
        });
    }
    group.finish();
}

fn bench_ga(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga");
    group.sample_size(10);

    let evaluator = FitnessEvaluator::default();
    for &(n, pop, gen) in &[(5, 50, 50), (10, 100, 50)] {
        let config = GaConfig {
            num_units: n,
            population_size: pop,
            max_generations: gen,
            stagnation_limit: 0,
            seed: Some(42),
            ..GaConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_p{}_g{}", n, pop, gen), n),
            &config,
            |b, cfg| {
                b.iter(|| {
                    let result = GaRunner::run(black_box(&evaluator), black_box(cfg));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_validity, bench_simulation, bench_ga);
criterion_main!(benches);

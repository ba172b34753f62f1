use criterion::{black_box, criterion_group, criterion_main, Criterion};
use preimage::evaluator::XorShiftStep;
use preimage::reverse_search::search::{solve, SearchOptions};
use preimage::reverse_search::target::TargetSequence;
use preimage::types::{Accumulator, Digit};

const REAL_TARGET: [Digit; 16] = [2, 4, 1, 3, 7, 5, 0, 3, 4, 1, 1, 5, 5, 5, 3, 0];

fn bench_real_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_real_target");
    let target = TargetSequence::new(REAL_TARGET.to_vec(), 8).unwrap();
    let step = XorShiftStep::default();

    group.bench_function("sequential", |b| {
        let options = SearchOptions::default();
        b.iter(|| solve(black_box(&target), &step, &options).unwrap());
    });

    group.bench_function("parallel", |b| {
        let options = SearchOptions { parallel: true, ..SearchOptions::default() };
        b.iter(|| solve(black_box(&target), &step, &options).unwrap());
    });

    group.finish();
}

fn bench_permissive_evaluator(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_permissive");
    let accept_all = |_: Accumulator, _: Digit| true;

    // full enumeration: 2^16 candidates at the last level
    let target = TargetSequence::new(vec![0; 16], 2).unwrap();

    group.bench_function("sequential_2^16", |b| {
        let options = SearchOptions::default();
        b.iter(|| solve(black_box(&target), &accept_all, &options).unwrap());
    });

    group.bench_function("parallel_2^16", |b| {
        let options = SearchOptions { parallel: true, ..SearchOptions::default() };
        b.iter(|| solve(black_box(&target), &accept_all, &options).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_real_target, bench_permissive_evaluator);
criterion_main!(benches);

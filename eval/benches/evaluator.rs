//! Benches for parsing, compiling and evaluating equations.
//!
//! Implemented benches:
//!
//! - Parsing and compiling a moderately complex equation
//! - Sampling a compiled equation at `SAMPLES` random points, compared with
//!   the equivalent native closure

use criterion::{criterion_group, criterion_main, BatchSize, Bencher, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use graphy_eval::compile;
use graphy_parser::parse;

const SEED: u64 = 123;
const SAMPLES: u64 = 1_000;
const EQUATION: &str = "5abs(x) + 10.2min(x, 1/2x, x^2) - 3sin(pi x)^2";

fn native(x: f64) -> f64 {
    let sin = (std::f64::consts::PI * x).sin();
    5.0 * x.abs() + 10.2 * x.min(0.5 * x).min(x * x) - 3.0 * sin * sin
}

fn bench_parse(bencher: &mut Bencher<'_>) {
    bencher.iter(|| parse(EQUATION));
}

fn bench_compile(bencher: &mut Bencher<'_>) {
    let result = parse(EQUATION);
    assert!(result.is_ok());
    bencher.iter(|| compile(&result));
}

fn bench_parse_and_compile(bencher: &mut Bencher<'_>) {
    bencher.iter(|| compile(&parse(EQUATION)));
}

fn bench_eval_native(bencher: &mut Bencher<'_>) {
    let mut rng = StdRng::seed_from_u64(SEED);
    bencher.iter_batched(
        || {
            (0..SAMPLES)
                .map(|_| rng.gen_range(-10.0..10.0))
                .collect::<Vec<f64>>()
        },
        |xs| xs.into_iter().map(native).sum::<f64>(),
        BatchSize::SmallInput,
    );
}

fn bench_eval_compiled(bencher: &mut Bencher<'_>) {
    let evaluator = compile(&parse(EQUATION));
    assert!(evaluator.is_compiled());

    let mut rng = StdRng::seed_from_u64(SEED);
    bencher.iter_batched(
        || {
            (0..SAMPLES)
                .map(|_| rng.gen_range(-10.0..10.0))
                .collect::<Vec<f64>>()
        },
        |xs| {
            xs.into_iter()
                .map(|x| evaluator.evaluate(&[x]).unwrap())
                .sum::<f64>()
        },
        BatchSize::SmallInput,
    );
}

fn bench_sample(bencher: &mut Bencher<'_>) {
    let evaluator = compile(&parse(EQUATION));
    let step = 20.0 / SAMPLES as f64;
    bencher.iter(|| evaluator.sample(-10.0..=10.0, step).unwrap());
}

fn bench_frontend(criterion: &mut Criterion) {
    criterion
        .benchmark_group("frontend")
        .bench_function("parse", bench_parse)
        .bench_function("compile", bench_compile)
        .bench_function("parse_and_compile", bench_parse_and_compile);
}

fn bench_evaluation(criterion: &mut Criterion) {
    criterion
        .benchmark_group("eval")
        .bench_function("native", bench_eval_native)
        .bench_function("compiled", bench_eval_compiled)
        .bench_function("sample", bench_sample)
        .throughput(Throughput::Elements(SAMPLES));
}

criterion_group!(benches, bench_frontend, bench_evaluation);
criterion_main!(benches);

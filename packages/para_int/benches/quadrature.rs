//! Benchmarking the single-threaded quadrature kernel with each catalogued integrand.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use para_int::{Integrand, Step, integrate};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const SAMPLES: f64 = 100_000.0;

fn entrypoint(c: &mut Criterion) {
    let Ok(step) = Step::new(1.0 / SAMPLES) else {
        return;
    };

    let mut group = c.benchmark_group("quadrature");

    for integrand in [
        Integrand::Oscillating,
        Integrand::PowerSeries,
        Integrand::Constant,
    ] {
        let function = integrand.function();

        group.bench_function(format!("{integrand}_100k"), |b| {
            b.iter(|| integrate(function, black_box(0.0), black_box(1.0), step));
        });
    }

    group.finish();
}

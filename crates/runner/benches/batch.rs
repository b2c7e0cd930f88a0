use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use warden_core::{AppError, ErrorKind, Job, NOT_FOUND};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Every `failure_every`-th job fails with a three-layer chain.
fn make_jobs(count: usize, failure_every: usize) -> Vec<Job> {
    (0..count)
        .map(|i| {
            Job::new(format!("job-{i}"), move || {
                if failure_every > 0 && i % failure_every == 0 {
                    let repo = AppError::wrap(&NOT_FOUND, format!("row {i}"));
                    Err(AppError::wrap_as(ErrorKind::NotFound, repo, "lookup"))
                } else {
                    Ok(())
                }
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmark: run_batch
// ---------------------------------------------------------------------------

fn bench_run_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_batch");
    for count in [10, 100, 1000] {
        let jobs = make_jobs(count, 4);
        group.bench_with_input(BenchmarkId::from_parameter(count), &jobs, |b, jobs| {
            b.iter(|| black_box(warden_runner::run_batch(jobs)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: chain lookups
// ---------------------------------------------------------------------------

fn bench_chain_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_lookup");
    for depth in [1usize, 8, 32] {
        let mut err = AppError::wrap(&NOT_FOUND, "root");
        for i in 0..depth {
            err = AppError::wrap(err, format!("layer {i}"));
        }
        group.bench_with_input(BenchmarkId::new("is", depth), &err, |b, err| {
            b.iter(|| black_box(err.is(&NOT_FOUND)));
        });
        group.bench_with_input(BenchmarkId::new("as_kind", depth), &err, |b, err| {
            b.iter(|| black_box(err.as_kind(ErrorKind::Validation).is_some()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_run_batch, bench_chain_lookup);
criterion_main!(benches);

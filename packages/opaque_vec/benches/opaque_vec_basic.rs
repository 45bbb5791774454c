//! Basic benchmarks for the `opaque_vec` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use opaque_vec::OpaqueVec;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

type TestItem = u64;
const TEST_VALUE: TestItem = 1024;
const FILL_COUNT: usize = 10_000;

fn filled_vec() -> OpaqueVec {
    let mut vec = OpaqueVec::builder().layout_of::<TestItem>().build();
    for _ in 0..FILL_COUNT {
        vec.push(&TEST_VALUE.to_ne_bytes());
    }
    vec
}

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("opaque_vec_basic");

    let mut allocs_op = allocs.operation("build_empty");
    group.bench_function("build_empty", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(OpaqueVec::builder().layout_of::<TestItem>().build()));
            }

            start.elapsed()
        });
    });

    let mut allocs_op = allocs.operation("push_one");
    group.bench_function("push_one", |b| {
        b.iter_custom(|iters| {
            let mut vecs =
                iter::repeat_with(|| OpaqueVec::builder().layout_of::<TestItem>().build())
                    .take(usize::try_from(iters).unwrap())
                    .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                vec.push(black_box(&TEST_VALUE.to_ne_bytes()));
            }

            start.elapsed()
        });
    });

    let mut allocs_op = allocs.operation("push_10k");
    group.bench_function("push_10k", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(filled_vec()));
            }

            start.elapsed()
        });
    });

    let mut allocs_op = allocs.operation("read_one");
    group.bench_function("read_one", |b| {
        b.iter_custom(|iters| {
            let vec = filled_vec();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                _ = black_box(vec.at(black_box(FILL_COUNT / 2)));
            }

            start.elapsed()
        });
    });

    let mut allocs_op = allocs.operation("erase_front");
    group.bench_function("erase_front", |b| {
        b.iter_custom(|iters| {
            let mut vecs = iter::repeat_with(filled_vec)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                vec.erase(black_box(0));
            }

            start.elapsed()
        });
    });

    let mut allocs_op = allocs.operation("erase_unordered_front");
    group.bench_function("erase_unordered_front", |b| {
        b.iter_custom(|iters| {
            let mut vecs = iter::repeat_with(filled_vec)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vec in &mut vecs {
                vec.erase_unordered(black_box(0));
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}

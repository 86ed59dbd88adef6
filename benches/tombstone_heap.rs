use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rentkit::ds::TombstoneHeap;

fn filled(n: u64) -> TombstoneHeap<(u64, u64)> {
    (0..n).map(|i| (i.wrapping_mul(7919) % 1000, i)).collect()
}

fn bench_insert_pop(c: &mut Criterion) {
    c.bench_function("tombstone_heap_insert_pop", |b| {
        b.iter_batched(
            || filled(1024),
            |mut heap| {
                for i in 0..1024u64 {
                    heap.insert(std::hint::black_box((i % 97, i + 10_000)));
                    let _ = std::hint::black_box(heap.pop());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_churn(c: &mut Criterion) {
    c.bench_function("tombstone_heap_remove_churn", |b| {
        b.iter_batched(
            || {
                let mut rng = SmallRng::seed_from_u64(42);
                let victims: Vec<u64> = (0..512).map(|_| rng.random_range(0..4096)).collect();
                (filled(4096), victims)
            },
            |(mut heap, victims)| {
                for i in victims {
                    heap.remove(std::hint::black_box((i.wrapping_mul(7919) % 1000, i)));
                }
                while let Some(v) = heap.pop() {
                    std::hint::black_box(v);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_peek_top_k(c: &mut Criterion) {
    c.bench_function("tombstone_heap_peek_top_5", |b| {
        b.iter_batched(
            || filled(4096),
            |mut heap| {
                for _ in 0..256 {
                    let _ = std::hint::black_box(heap.peek_top_k(5));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_insert_pop,
    bench_remove_churn,
    bench_peek_top_k
);
criterion_main!(benches);

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rentkit::rental::RentalService;

const ITEMS: u32 = 64;
const SUPPLIERS: u32 = 64;

fn catalog() -> RentalService<u32, u32, u32> {
    let mut rng = SmallRng::seed_from_u64(7);
    let entries: Vec<(u32, u32, u32)> = (0..ITEMS)
        .flat_map(|item| (0..SUPPLIERS).map(move |supplier| (item, supplier)))
        .map(|(item, supplier)| (item, supplier, rng.random_range(1..10_000)))
        .collect();
    RentalService::new(entries).unwrap()
}

fn bench_query_available(c: &mut Criterion) {
    c.bench_function("rental_query_available", |b| {
        b.iter_batched(
            catalog,
            |mut service| {
                for item in 0..ITEMS {
                    let _ = std::hint::black_box(service.query_available(&item));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_checkout_checkin_report(c: &mut Criterion) {
    c.bench_function("rental_checkout_checkin_report", |b| {
        b.iter_batched(
            || {
                let mut rng = SmallRng::seed_from_u64(99);
                let pairs: Vec<(u32, u32)> = (0..512)
                    .map(|_| (rng.random_range(0..SUPPLIERS), rng.random_range(0..ITEMS)))
                    .collect();
                (catalog(), pairs)
            },
            |(mut service, pairs)| {
                for &(supplier, item) in &pairs {
                    let _ = service.checkout(supplier, item);
                }
                let _ = std::hint::black_box(service.report_checked_out());
                for &(supplier, item) in &pairs {
                    let _ = service.checkin(supplier, item);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_query_available,
    bench_checkout_checkin_report
);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use cuckoo_filter::{Config, CuckooFilter, MembershipFilter};
use rand::distributions::Standard;
use rand::{thread_rng, Rng};

fn bench(c: &mut Criterion) {
    let items: Vec<String> = thread_rng()
        .sample_iter::<u64, _>(&Standard)
        .take(1000)
        .map(|i| i.to_string())
        .collect();

    c.bench_function("insert", |b| {
        b.iter_batched(
            || CuckooFilter::new(Config::default().with_capacity(2000)).unwrap(),
            |mut filter| {
                items.iter().for_each(|i| {
                    filter.add(i);
                });
                filter
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);

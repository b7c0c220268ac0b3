use std::convert::Infallible;
use std::sync::Arc;
use std::thread;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use replaykit::builder::CacheBuilder;
use replaykit::cache::LazyCache;
use replaykit::ds::{CyclicCounter, CyclicIter};

fn bench_cyclic_counter(c: &mut Criterion) {
    let counter = CyclicCounter::new(1023);
    c.bench_function("cyclic_counter_get_and_advance", |b| {
        b.iter(|| counter.get_and_advance())
    });
}

fn bench_cyclic_iter_next(c: &mut Criterion) {
    let iter = CyclicIter::new((0..1024u64).collect());
    c.bench_function("cyclic_iter_next", |b| b.iter(|| *iter.next().unwrap()));
}

fn bench_lazy_cache_hit(c: &mut Criterion) {
    let cache: LazyCache<u64, u64, _> =
        LazyCache::new(|key: &u64| Ok::<_, Infallible>(Some(key * 2)));
    for key in 0..1024 {
        let _ = cache.get(key);
    }
    c.bench_function("lazy_cache_get_hit", |b| {
        b.iter(|| {
            for key in 0..1024 {
                let _ = cache.get(key);
            }
        })
    });
}

fn bench_lazy_cache_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy_cache_contended");
    for shards in [1usize, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(shards), &shards, |b, &shards| {
            b.iter(|| {
                let cache = Arc::new(
                    CacheBuilder::new()
                        .shards(shards)
                        .build(|key: &u64| Ok::<_, Infallible>(Some(CyclicIter::new(vec![*key; 4])))),
                );
                let handles: Vec<_> = (0..4)
                    .map(|_| {
                        let cache = cache.clone();
                        thread::spawn(move || {
                            for key in 0..256 {
                                let iter = cache.get(key).unwrap();
                                let _ = iter.next();
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_cyclic_counter,
    bench_cyclic_iter_next,
    bench_lazy_cache_hit,
    bench_lazy_cache_contended
);
criterion_main!(benches);

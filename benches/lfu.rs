use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use twincache::policy::lfu::LfuCache;
use twincache::traits::{CoreCache, LfuCacheTrait};

fn warm(capacity: u64) -> LfuCache<u64, u64> {
    let mut cache = LfuCache::new(capacity as usize);
    for i in 0..capacity {
        cache.put(i, i);
    }
    cache
}

fn bench_lfu_put_get(c: &mut Criterion) {
    c.bench_function("lfu_put_get", |b| {
        b.iter_batched(
            || warm(1024),
            |mut cache| {
                for i in 0..1024u64 {
                    cache.put(std::hint::black_box(i + 10_000), i);
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lfu_eviction_churn(c: &mut Criterion) {
    c.bench_function("lfu_eviction_churn", |b| {
        b.iter_batched(
            || warm(1024),
            |mut cache| {
                for i in 0..4096u64 {
                    cache.put(std::hint::black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

// Repeated hits on one key walk it up a long chain of buckets.
fn bench_lfu_frequency_climb(c: &mut Criterion) {
    c.bench_function("lfu_frequency_climb", |b| {
        b.iter_batched(
            || warm(1024),
            |mut cache| {
                for _ in 0..4096u64 {
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(7)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lfu_skewed_mix(c: &mut Criterion) {
    c.bench_function("lfu_skewed_mix", |b| {
        b.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(42);
                // ~80% of accesses land on 10% of the key space
                let keys: Vec<u64> = (0..8192)
                    .map(|_| {
                        if rng.gen_bool(0.8) {
                            rng.gen_range(0..400)
                        } else {
                            rng.gen_range(0..4096)
                        }
                    })
                    .collect();
                (warm(1024), keys)
            },
            |(mut cache, keys)| {
                for key in keys {
                    if cache.get(&key).is_none() {
                        cache.put(key, key);
                    }
                }
                std::hint::black_box(cache.min_frequency());
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_lfu_put_get,
    bench_lfu_eviction_churn,
    bench_lfu_frequency_climb,
    bench_lfu_skewed_mix
);
criterion_main!(benches);

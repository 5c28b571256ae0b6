use tracing_subscriber::EnvFilter;
use twincache::builder::{CacheBuilder, CacheConfig, CachePolicy};
use twincache::error::ConfigError;
use twincache::traits::CoreCache;

// RUST_LOG=twincache=trace shows the builder and eviction events.
fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let policy: CachePolicy = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("lfu")
        .parse()?;
    let config = CacheConfig {
        capacity: 2,
        policy,
    };

    let mut cache = CacheBuilder::from_config(&config).build::<u32, u32>();
    cache.put(1, 1);
    cache.put(2, 2);
    cache.get(&1);
    cache.put(3, 3);

    println!(
        "{}: 1={:?} 2={:?} 3={:?}",
        cache.policy(),
        cache.peek(&1),
        cache.peek(&2),
        cache.peek(&3)
    );

    if CacheBuilder::try_new(-1).is_err() {
        println!("negative capacity rejected");
    }
    Ok(())
}

// Expected output (default policy):
// lfu: 1=Some(1) 2=None 3=Some(3)
// negative capacity rejected

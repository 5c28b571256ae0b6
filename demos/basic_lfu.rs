use twincache::policy::lfu::LfuCache;
use twincache::traits::{CoreCache, LfuCacheTrait};

fn main() {
    let mut cache: LfuCache<&str, &str> = LfuCache::new(2);

    cache.put("one", "first");
    cache.put("two", "second");

    if let Some(value) = cache.get(&"one") {
        println!("hit one: {value}");
    }

    cache.put("three", "third");

    println!("contains two? {}", cache.contains(&"two"));
    for key in ["one", "three"] {
        println!("freq({key}) = {:?}", cache.frequency(&key));
    }
}

// Expected output:
// hit one: first
// contains two? false
// freq(one) = Some(2)
// freq(three) = Some(1)
//
// Explanation: capacity=2; get("one") raises its count to 2 while "two"
// stays at 1, so putting "three" evicts "two".

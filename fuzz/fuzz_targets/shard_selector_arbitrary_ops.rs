#![no_main]

use libfuzzer_sys::fuzz_target;
use replaykit::ds::ShardSelector;
use replaykit::key::CacheKey;

// Fuzz shard selection for cache keys.
//
// Keys that compare equal must land on the same shard, whatever parts they
// were composed from.
fuzz_target!(|data: &[u8]| {
    let [shards, seed, rest @ ..] = data else {
        return;
    };
    let shard_count = usize::from(*shards % 64) + 1;
    let selector = ShardSelector::new(shard_count, u64::from(*seed));
    assert_eq!(selector.shard_count(), shard_count);

    for pair in rest.chunks_exact(2) {
        let key = CacheKey::new("C".to_string(), format!("{}_{}", pair[0], pair[1]));
        let alias = CacheKey::new(format!("C_{}", pair[0]), pair[1].to_string());
        assert_eq!(alias, key);

        let shard = selector.shard_for_key(&key);
        assert!(shard < shard_count);
        assert_eq!(selector.shard_for_key(&alias), shard);
    }
});

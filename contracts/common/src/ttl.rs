use soroban_sdk::{Env, IntoVal, Val};

/// Remaining-ledger threshold below which an entry's TTL is bumped.
pub const TTL_THRESHOLD: u32 = 5184000;
/// Ledger count an entry is extended to once bumped.
pub const TTL_EXTEND_TO: u32 = 10368000;

/// Extends the TTL of a persistent entry.
pub fn extend_persistent<K: IntoVal<Env, Val>>(env: &Env, key: &K) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Extends the TTL shared by all instance-storage keys.
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

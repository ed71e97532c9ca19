use crate::constant::{
    INSTANCE_BUMP_AMOUNT, INSTANCE_TTL_THRESHOLD, PERSISTENT_BUMP_AMOUNT, PERSISTENT_TTL_THRESHOLD,
};
use soroban_sdk::{Env, IntoVal, Val};

pub fn bump_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// key has to exist, extending ttl of a missing entry traps
pub fn bump_persistent<K>(e: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    e.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

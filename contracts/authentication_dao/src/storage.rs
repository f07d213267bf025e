//! Storage placement.
//!
//! Instance storage holds the admin, config, feedback store address, counters
//! and ledger totals: a fixed set of keys loaded on every call. Everything
//! keyed by account or auth id grows with use and lives in persistent storage,
//! with its TTL extended whenever it is touched.

use soroban_sdk::{Env, IntoVal, TryFromVal, Val};

use crate::DataKey;

pub const DAY_IN_LEDGERS: u32 = 17_280;
pub const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub const RECORD_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const RECORD_LIFETIME_THRESHOLD: u32 = RECORD_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub fn bump_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump(e: &Env, key: &DataKey) {
    e.storage()
        .persistent()
        .extend_ttl(key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
}

pub fn get<V: TryFromVal<Env, Val>>(e: &Env, key: &DataKey) -> Option<V> {
    let value = e.storage().persistent().get(key);
    if value.is_some() {
        bump(e, key);
    }
    value
}

pub fn set<V: IntoVal<Env, Val>>(e: &Env, key: &DataKey, value: &V) {
    e.storage().persistent().set(key, value);
    bump(e, key);
}

#[must_use]
pub fn has(e: &Env, key: &DataKey) -> bool {
    let present = e.storage().persistent().has(key);
    if present {
        bump(e, key);
    }
    present
}

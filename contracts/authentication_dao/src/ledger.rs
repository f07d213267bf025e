//! Stake ledger: member balances, the treasury and per-proposal escrow.
//!
//! All token movement goes through this module. Totals for circulating
//! balances and escrow are maintained alongside the individual entries so the
//! conservation invariant can be checked in constant time:
//!
//! `treasury + circulating + escrowed == total_supply`

use soroban_sdk::{Address, Env};

use crate::errors::DaoError;
use crate::storage;
use crate::DataKey;

// Totals sit in instance storage, per-account and per-auth entries in
// persistent storage.
fn is_keyed(key: &DataKey) -> bool {
    matches!(key, DataKey::Balance(_) | DataKey::AuthEscrow(_))
}

fn read(e: &Env, key: &DataKey) -> i128 {
    if is_keyed(key) {
        storage::get(e, key).unwrap_or(0)
    } else {
        e.storage().instance().get(key).unwrap_or(0)
    }
}

fn write(e: &Env, key: &DataKey, value: i128) {
    if is_keyed(key) {
        storage::set(e, key, &value);
    } else {
        e.storage().instance().set(key, &value);
    }
}

fn add(e: &Env, key: &DataKey, amount: i128) {
    let next = read(e, key)
        .checked_add(amount)
        .expect("ledger credit overflow");
    write(e, key, next);
}

fn sub(e: &Env, key: &DataKey, amount: i128) {
    let next = read(e, key)
        .checked_sub(amount)
        .expect("ledger debit underflow");
    if next < 0 {
        panic!("ledger entry would go negative");
    }
    write(e, key, next);
}

#[must_use]
pub fn balance(e: &Env, account: &Address) -> i128 {
    read(e, &DataKey::Balance(account.clone()))
}

#[must_use]
pub fn treasury(e: &Env) -> i128 {
    read(e, &DataKey::Treasury)
}

#[must_use]
pub fn total_supply(e: &Env) -> i128 {
    read(e, &DataKey::TotalSupply)
}

#[must_use]
pub fn escrowed_total(e: &Env) -> i128 {
    read(e, &DataKey::Escrowed)
}

#[must_use]
pub fn escrow_of(e: &Env, auth_id: u64) -> i128 {
    read(e, &DataKey::AuthEscrow(auth_id))
}

/// Create the whole supply in the treasury. Only called once, at initialization.
pub fn mint_to_treasury(e: &Env, amount: i128) {
    add(e, &DataKey::TotalSupply, amount);
    add(e, &DataKey::Treasury, amount);
}

/// Move `amount` from the treasury to `to`.
pub fn grant_from_treasury(e: &Env, to: &Address, amount: i128) {
    if amount <= 0 {
        return;
    }
    sub(e, &DataKey::Treasury, amount);
    add(e, &DataKey::Balance(to.clone()), amount);
    add(e, &DataKey::Circulating, amount);
}

/// Debit `amount` from `from` into the escrow held for `auth_id`.
pub fn lock(e: &Env, from: &Address, auth_id: u64, amount: i128) -> Result<(), DaoError> {
    if amount <= 0 {
        return Err(DaoError::InvalidAmount);
    }
    if balance(e, from) < amount {
        return Err(DaoError::InsufficientBalance);
    }
    sub(e, &DataKey::Balance(from.clone()), amount);
    sub(e, &DataKey::Circulating, amount);
    add(e, &DataKey::AuthEscrow(auth_id), amount);
    add(e, &DataKey::Escrowed, amount);
    Ok(())
}

/// Pay `amount` out of the escrow for `auth_id` to `to`.
pub fn release(e: &Env, auth_id: u64, to: &Address, amount: i128) {
    if amount <= 0 {
        return;
    }
    sub(e, &DataKey::AuthEscrow(auth_id), amount);
    sub(e, &DataKey::Escrowed, amount);
    add(e, &DataKey::Balance(to.clone()), amount);
    add(e, &DataKey::Circulating, amount);
}

/// Panics if value was created or destroyed. A failure here is a bug, never a user error.
pub fn assert_conserved(e: &Env) {
    let accounted = treasury(e)
        .checked_add(read(e, &DataKey::Circulating))
        .and_then(|v| v.checked_add(escrowed_total(e)))
        .expect("ledger total overflow");
    if accounted != total_supply(e) {
        panic!("stake conservation violated");
    }
}

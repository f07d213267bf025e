//! Membership registry. Membership is monotone: there is no way to leave.

use soroban_sdk::{Address, Env};

use crate::errors::DaoError;
use crate::ledger;
use crate::storage;
use crate::types::{DaoConfig, Member};
use crate::DataKey;

#[must_use]
pub fn is_member(e: &Env, account: &Address) -> bool {
    storage::has(e, &DataKey::Member(account.clone()))
}

pub fn require_member(e: &Env, account: &Address) -> Result<(), DaoError> {
    if !is_member(e, account) {
        return Err(DaoError::NotAMember);
    }
    Ok(())
}

pub fn get(e: &Env, account: &Address) -> Result<Member, DaoError> {
    storage::get(e, &DataKey::Member(account.clone())).ok_or(DaoError::NotAMember)
}

#[must_use]
pub fn count(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get(&DataKey::MemberCount)
        .unwrap_or(0)
}

/// Onboarding allocation for the next member under the current treasury.
#[must_use]
pub fn onboarding_grant(e: &Env, config: &DaoConfig) -> i128 {
    ledger::treasury(e) / config.member_token_divisor
}

/// Register `account` and pay it the onboarding grant. Returns the grant.
pub fn join(e: &Env, config: &DaoConfig, account: &Address) -> Result<i128, DaoError> {
    if is_member(e, account) {
        return Err(DaoError::AlreadyMember);
    }

    let member = Member {
        address: account.clone(),
        joined_at: e.ledger().timestamp(),
    };
    storage::set(e, &DataKey::Member(account.clone()), &member);

    let next = count(e).checked_add(1).expect("member count overflow");
    e.storage().instance().set(&DataKey::MemberCount, &next);

    let grant = onboarding_grant(e, config);
    ledger::grant_from_treasury(e, account, grant);
    Ok(grant)
}

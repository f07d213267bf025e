//! Authentication proposal state machine.

use soroban_sdk::{Address, Env};

use crate::errors::DaoError;
use crate::ledger;
use crate::storage;
use crate::types::{AuthStatus, DaoConfig, PendingAuthentication};
use crate::DataKey;

#[must_use]
pub fn count(e: &Env) -> u64 {
    e.storage()
        .instance()
        .get(&DataKey::AuthCounter)
        .unwrap_or(0)
}

pub fn load(e: &Env, auth_id: u64) -> Result<PendingAuthentication, DaoError> {
    storage::get(e, &DataKey::Auth(auth_id)).ok_or(DaoError::UnknownAuthId)
}

pub fn save(e: &Env, auth: &PendingAuthentication) {
    storage::set(e, &DataKey::Auth(auth.auth_id), auth);
}

/// Move `auth` to `next`, rejecting anything outside the legal transition table.
pub fn transition(auth: &mut PendingAuthentication, next: AuthStatus) -> Result<(), DaoError> {
    if !auth.status.can_transition_to(next) {
        return Err(DaoError::InvalidStateTransition);
    }
    auth.status = next;
    Ok(())
}

/// Escrow `stake` from `staker` and open a new proposal in `Pending`.
pub fn open(
    e: &Env,
    config: &DaoConfig,
    staker: &Address,
    subject_id: u64,
    reviewer: &Address,
    feedback_index: u64,
    stake: i128,
) -> Result<PendingAuthentication, DaoError> {
    let auth_id = count(e).checked_add(1).expect("auth id overflow");
    ledger::lock(e, staker, auth_id, stake)?;

    let now = e.ledger().timestamp();
    let auth = PendingAuthentication {
        auth_id,
        staker: staker.clone(),
        stake_amount: stake,
        start_time: now,
        paused_at: 0,
        challenge_deadline: now
            .checked_add(config.authentication_period)
            .expect("challenge deadline overflow"),
        subject_id,
        reviewer: reviewer.clone(),
        feedback_index,
        status: AuthStatus::Pending,
    };
    save(e, &auth);
    e.storage().instance().set(&DataKey::AuthCounter, &auth_id);
    Ok(auth)
}

/// Checks shared by both finalize paths: `Authenticated`/`Rejected` proposals
/// are reported as already finalized.
pub fn require_open(auth: &PendingAuthentication) -> Result<(), DaoError> {
    if auth.status.is_terminal() {
        return Err(DaoError::AlreadyFinalized);
    }
    Ok(())
}

/// Record that the feedback behind `auth` has been authenticated. The
/// per-subject count only moves the first time a triple is authenticated.
pub fn mark_authenticated(e: &Env, auth: &PendingAuthentication) {
    let key = DataKey::Authenticated(auth.subject_id, auth.reviewer.clone(), auth.feedback_index);
    if storage::has(e, &key) {
        return;
    }
    storage::set(e, &key, &auth.auth_id);

    let count_key = DataKey::AuthenticatedCount(auth.subject_id);
    let current: u32 = storage::get(e, &count_key).unwrap_or(0);
    let next = current
        .checked_add(1)
        .expect("authenticated count overflow");
    storage::set(e, &count_key, &next);
}

#[must_use]
pub fn is_authenticated(e: &Env, subject_id: u64, reviewer: &Address, feedback_index: u64) -> bool {
    storage::has(
        e,
        &DataKey::Authenticated(subject_id, reviewer.clone(), feedback_index),
    )
}

#[must_use]
pub fn authenticated_count(e: &Env, subject_id: u64) -> u32 {
    storage::get(e, &DataKey::AuthenticatedCount(subject_id)).unwrap_or(0)
}

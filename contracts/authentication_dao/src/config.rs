//! DAO configuration: timing windows, onboarding grant and voter cap.
//!
//! Stored once at initialization and updatable by the admin. Every public
//! operation loads it first, which doubles as the "is initialized" check.

use soroban_sdk::{Address, Env};

use crate::errors::DaoError;
use crate::storage;
use crate::types::DaoConfig;
use crate::DataKey;

/// Dispute window after a proposal is opened: 2 hours.
pub const AUTHENTICATION_PERIOD: u64 = 2 * 60 * 60;

/// Voting window after a contest is opened: 24 hours.
pub const VOTING_PERIOD: u64 = 24 * 60 * 60;

/// Onboarding grant is `treasury / MEMBER_TOKEN_DIVISOR`.
pub const MEMBER_TOKEN_DIVISOR: i128 = 100;

/// Upper bound on ballots per contestation; settlement walks every voter.
pub const MAX_VOTERS: u32 = 100;

impl DaoConfig {
    /// The canonical policy.
    #[must_use]
    pub fn standard() -> Self {
        DaoConfig {
            authentication_period: AUTHENTICATION_PERIOD,
            voting_period: VOTING_PERIOD,
            member_token_divisor: MEMBER_TOKEN_DIVISOR,
            max_voters: MAX_VOTERS,
        }
    }

    pub fn validate(&self) -> Result<(), DaoError> {
        if self.authentication_period == 0
            || self.voting_period == 0
            || self.member_token_divisor <= 0
            || self.max_voters == 0
        {
            return Err(DaoError::InvalidConfig);
        }
        Ok(())
    }
}

#[must_use]
pub fn is_initialized(e: &Env) -> bool {
    e.storage().instance().has(&DataKey::Config)
}

/// Load the config and keep the instance entry alive.
pub fn load(e: &Env) -> Result<DaoConfig, DaoError> {
    let config = e
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(DaoError::NotInitialized)?;
    storage::bump_instance(e);
    Ok(config)
}

pub fn store(e: &Env, config: &DaoConfig) -> Result<(), DaoError> {
    config.validate()?;
    e.storage().instance().set(&DataKey::Config, config);
    Ok(())
}

pub fn set_admin(e: &Env, admin: &Address) {
    e.storage().instance().set(&DataKey::Admin, admin);
}

pub fn admin(e: &Env) -> Result<Address, DaoError> {
    e.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(DaoError::NotInitialized)
}

/// Fails with `Unauthorized` unless `caller` is the stored admin.
pub fn require_admin(e: &Env, caller: &Address) -> Result<(), DaoError> {
    if admin(e)? != *caller {
        return Err(DaoError::Unauthorized);
    }
    Ok(())
}

pub fn set_feedback_store(e: &Env, store: &Address) {
    e.storage().instance().set(&DataKey::FeedbackStore, store);
}

pub fn feedback_store(e: &Env) -> Result<Address, DaoError> {
    e.storage()
        .instance()
        .get(&DataKey::FeedbackStore)
        .ok_or(DaoError::NotInitialized)
}

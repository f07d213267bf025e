//! Contestation of pending proposals and stake-weighted voting.

use soroban_sdk::{Address, Env, Vec};

use crate::errors::DaoError;
use crate::ledger;
use crate::proposal;
use crate::storage;
use crate::types::{AuthStatus, Contestation, DaoConfig, PendingAuthentication, Vote, VoteChoice};
use crate::DataKey;

pub fn load(e: &Env, auth_id: u64) -> Result<Contestation, DaoError> {
    storage::get(e, &DataKey::Contestation(auth_id)).ok_or(DaoError::NotContested)
}

pub fn save(e: &Env, contestation: &Contestation) {
    storage::set(e, &DataKey::Contestation(contestation.auth_id), contestation);
}

#[must_use]
pub fn exists(e: &Env, auth_id: u64) -> bool {
    storage::has(e, &DataKey::Contestation(auth_id))
}

#[must_use]
pub fn vote_of(e: &Env, auth_id: u64, voter: &Address) -> Vote {
    storage::get(e, &DataKey::Vote(auth_id, voter.clone())).unwrap_or(Vote::empty())
}

/// Voters on `auth_id` in ballot order.
#[must_use]
pub fn voters(e: &Env, auth_id: u64) -> Vec<Address> {
    storage::get(e, &DataKey::Voters(auth_id)).unwrap_or(Vec::new(e))
}

/// Dispute a pending proposal with an equal stake. Pauses the dispute window
/// and opens the voting window.
pub fn contest(
    e: &Env,
    config: &DaoConfig,
    auth: &mut PendingAuthentication,
    contester: &Address,
    stake: i128,
) -> Result<Contestation, DaoError> {
    if exists(e, auth.auth_id) {
        return Err(DaoError::AlreadyContested);
    }
    if auth.status != AuthStatus::Pending {
        return Err(DaoError::NotPending);
    }

    let now = e.ledger().timestamp();
    if now >= auth.challenge_deadline {
        return Err(DaoError::WindowClosed);
    }
    if stake != auth.stake_amount {
        return Err(DaoError::StakeMismatch);
    }

    ledger::lock(e, contester, auth.auth_id, stake)?;
    proposal::transition(auth, AuthStatus::Contested)?;
    auth.paused_at = now;

    let contestation = Contestation {
        auth_id: auth.auth_id,
        contester: contester.clone(),
        contest_stake: stake,
        vote_start_time: now,
        vote_deadline: now
            .checked_add(config.voting_period)
            .expect("vote deadline overflow"),
        legitimate_stake: 0,
        not_legitimate_stake: 0,
        voter_count: 0,
        is_active: true,
    };
    save(e, &contestation);
    proposal::save(e, auth);
    Ok(contestation)
}

/// Record a stake-weighted ballot on a contested proposal.
pub fn vote(
    e: &Env,
    config: &DaoConfig,
    auth: &PendingAuthentication,
    voter: &Address,
    choice: VoteChoice,
    stake: i128,
) -> Result<Contestation, DaoError> {
    if auth.status != AuthStatus::Contested {
        return Err(DaoError::NotContested);
    }
    let mut contestation = load(e, auth.auth_id)?;

    if e.ledger().timestamp() >= contestation.vote_deadline {
        return Err(DaoError::VotingWindowClosed);
    }
    if vote_of(e, auth.auth_id, voter).has_voted {
        return Err(DaoError::AlreadyVoted);
    }
    if choice == VoteChoice::None {
        return Err(DaoError::InvalidChoice);
    }
    if stake <= 0 {
        return Err(DaoError::InvalidAmount);
    }
    if contestation.voter_count >= config.max_voters {
        return Err(DaoError::TooManyVoters);
    }

    ledger::lock(e, voter, auth.auth_id, stake)?;

    match choice {
        VoteChoice::Legitimate => {
            contestation.legitimate_stake = contestation
                .legitimate_stake
                .checked_add(stake)
                .expect("tally overflow");
        }
        VoteChoice::NotLegitimate => {
            contestation.not_legitimate_stake = contestation
                .not_legitimate_stake
                .checked_add(stake)
                .expect("tally overflow");
        }
        VoteChoice::None => unreachable!(),
    }
    contestation.voter_count += 1;

    storage::set(
        e,
        &DataKey::Vote(auth.auth_id, voter.clone()),
        &Vote {
            choice,
            stake_amount: stake,
            has_voted: true,
        },
    );
    let mut all = voters(e, auth.auth_id);
    all.push_back(voter.clone());
    storage::set(e, &DataKey::Voters(auth.auth_id), &all);
    save(e, &contestation);

    Ok(contestation)
}

/// Stake majority decides; a tie rejects.
#[must_use]
pub fn outcome(contestation: &Contestation) -> AuthStatus {
    if contestation.legitimate_stake > contestation.not_legitimate_stake {
        AuthStatus::Authenticated
    } else {
        AuthStatus::Rejected
    }
}

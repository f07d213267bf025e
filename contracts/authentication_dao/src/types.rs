//! Records kept by the DAO.
//!
//! Proposals, contestations, votes and settlements form an append-only log:
//! entries are status-transitioned but never removed.

use soroban_sdk::{contracttype, Address};

/// Lifecycle of an authentication proposal.
///
/// Legal transitions:
/// * `Pending -> Authenticated` (dispute window elapsed without a contest)
/// * `Pending -> Contested`
/// * `Contested -> Authenticated | Rejected` (after the vote)
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthStatus {
    Pending,
    Contested,
    Authenticated,
    Rejected,
}

impl AuthStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuthStatus::Authenticated | AuthStatus::Rejected)
    }

    #[must_use]
    pub fn can_transition_to(&self, next: AuthStatus) -> bool {
        matches!(
            (self, next),
            (AuthStatus::Pending, AuthStatus::Authenticated)
                | (AuthStatus::Pending, AuthStatus::Contested)
                | (AuthStatus::Contested, AuthStatus::Authenticated)
                | (AuthStatus::Contested, AuthStatus::Rejected)
        )
    }
}

/// A voter's position on a contested proposal. `None` is the value read back
/// for addresses that never voted and is not accepted as a ballot.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoteChoice {
    None = 0,
    Legitimate = 1,
    NotLegitimate = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Member {
    pub address: Address,
    pub joined_at: u64,
}

/// A staked claim that feedback `(subject_id, reviewer, feedback_index)` is legitimate.
///
/// # Fields
/// * `start_time` - Ledger timestamp of the proposal.
/// * `paused_at` - Timestamp of the contest that paused the dispute window, 0 if never contested.
/// * `challenge_deadline` - End of the dispute window, fixed when the proposal is created.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingAuthentication {
    pub auth_id: u64,
    pub staker: Address,
    pub stake_amount: i128,
    pub start_time: u64,
    pub paused_at: u64,
    pub challenge_deadline: u64,
    pub subject_id: u64,
    pub reviewer: Address,
    pub feedback_index: u64,
    pub status: AuthStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contestation {
    pub auth_id: u64,
    pub contester: Address,
    pub contest_stake: i128,
    pub vote_start_time: u64,
    pub vote_deadline: u64,
    pub legitimate_stake: i128,
    pub not_legitimate_stake: i128,
    pub voter_count: u32,
    pub is_active: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Vote {
    pub choice: VoteChoice,
    pub stake_amount: i128,
    pub has_voted: bool,
}

impl Vote {
    /// The value reported for a voter with no ballot on record.
    #[must_use]
    pub fn empty() -> Self {
        Vote {
            choice: VoteChoice::None,
            stake_amount: 0,
            has_voted: false,
        }
    }
}

/// Audit record written once, when a proposal reaches a terminal status.
///
/// `refunded + distributed` equals everything that was escrowed for the
/// proposal, and `distributed == forfeited`. `remainder` is the part of
/// `distributed` left over by pro-rata rounding and paid to the heaviest winner.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub auth_id: u64,
    pub status: AuthStatus,
    pub refunded: i128,
    pub forfeited: i128,
    pub distributed: i128,
    pub remainder: i128,
    pub settled_at: u64,
}

/// Policy knobs. Window lengths are copied into each proposal and contestation
/// when it is opened.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DaoConfig {
    pub authentication_period: u64,
    pub voting_period: u64,
    pub member_token_divisor: i128,
    pub max_voters: u32,
}

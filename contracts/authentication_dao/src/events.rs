//! Contract events, one per state change.

use soroban_sdk::{contractevent, Address};

use crate::types::{AuthStatus, DaoConfig, VoteChoice};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DaoInitialized {
    pub admin: Address,
    pub feedback_store: Address,
    pub total_supply: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigUpdated {
    pub config: DaoConfig,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemberJoined {
    #[topic]
    pub member: Address,
    pub grant: i128,
    pub member_count: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthenticationProposed {
    #[topic]
    pub auth_id: u64,
    pub staker: Address,
    pub subject_id: u64,
    pub reviewer: Address,
    pub feedback_index: u64,
    pub stake: i128,
    pub challenge_deadline: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthenticationContested {
    #[topic]
    pub auth_id: u64,
    pub contester: Address,
    pub stake: i128,
    pub vote_deadline: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteCast {
    #[topic]
    pub auth_id: u64,
    #[topic]
    pub voter: Address,
    pub choice: VoteChoice,
    pub stake: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthenticationFinalized {
    #[topic]
    pub auth_id: u64,
    pub staker: Address,
    pub refunded: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContestationFinalized {
    #[topic]
    pub auth_id: u64,
    pub status: AuthStatus,
    pub legitimate_stake: i128,
    pub not_legitimate_stake: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakePaidOut {
    #[topic]
    pub auth_id: u64,
    #[topic]
    pub recipient: Address,
    pub amount: i128,
}

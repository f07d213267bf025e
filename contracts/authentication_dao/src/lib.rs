#![no_std]

//! # Feedback Authentication DAO
//!
//! Members stake tokens to claim that a feedback record in the feedback
//! registry is legitimate. An unchallenged claim is authenticated once the
//! dispute window elapses and the stake is returned. A claim may be contested
//! with an equal stake inside the window; members then vote with stake, and
//! the losing side's stakes are redistributed to the winners.
//!
//! Time-dependent transitions are lazy: nothing happens until someone calls
//! `finalize_authentication` or `finalize_contestation` after the window.

use soroban_sdk::{contract, contractimpl, contracttype, log, Address, Env};

pub mod config;
pub mod contestation;
pub mod errors;
pub mod events;
mod feedback;
pub mod ledger;
pub mod membership;
pub mod proposal;
pub mod settlement;
mod storage;
pub mod types;

pub use config::{AUTHENTICATION_PERIOD, MAX_VOTERS, MEMBER_TOKEN_DIVISOR, VOTING_PERIOD};
pub use errors::DaoError;
pub use types::{
    AuthStatus, Contestation, DaoConfig, Member, PendingAuthentication, Settlement, Vote,
    VoteChoice,
};

use events::{
    AuthenticationContested, AuthenticationFinalized, AuthenticationProposed, ConfigUpdated,
    ContestationFinalized, DaoInitialized, MemberJoined, VoteCast,
};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Config,
    FeedbackStore,
    // Stake ledger
    TotalSupply,
    Treasury,
    Circulating,
    Escrowed,
    Balance(Address),
    AuthEscrow(u64),
    // Membership
    Member(Address),
    MemberCount,
    // Proposals and votes
    AuthCounter,
    Auth(u64),
    Contestation(u64),
    Vote(u64, Address),
    Voters(u64),
    Settlement(u64),
    /// (subject_id, reviewer, feedback_index) -> auth_id that authenticated it
    Authenticated(u64, Address, u64),
    AuthenticatedCount(u64),
}

#[contract]
pub struct AuthenticationDao;

#[contractimpl]
impl AuthenticationDao {
    // ── Setup ────────────────────────────────────────────────────────────

    /// Initialize the DAO. Mints `initial_supply` into the treasury.
    pub fn initialize(
        e: Env,
        admin: Address,
        feedback_store: Address,
        initial_supply: i128,
        config: DaoConfig,
    ) -> Result<(), DaoError> {
        admin.require_auth();
        if config::is_initialized(&e) {
            return Err(DaoError::AlreadyInitialized);
        }
        if initial_supply < 0 {
            return Err(DaoError::InvalidAmount);
        }

        config::store(&e, &config)?;
        config::set_admin(&e, &admin);
        config::set_feedback_store(&e, &feedback_store);
        storage::bump_instance(&e);
        ledger::mint_to_treasury(&e, initial_supply);
        ledger::assert_conserved(&e);

        DaoInitialized {
            admin,
            feedback_store,
            total_supply: initial_supply,
        }
        .publish(&e);
        Ok(())
    }

    /// Replace the configuration. Open proposals keep the windows they were created with.
    pub fn set_config(e: Env, admin: Address, config: DaoConfig) -> Result<(), DaoError> {
        admin.require_auth();
        config::load(&e)?;
        config::require_admin(&e, &admin)?;
        config::store(&e, &config)?;
        ConfigUpdated { config }.publish(&e);
        Ok(())
    }

    // ── Membership ───────────────────────────────────────────────────────

    /// Join the DAO and receive the onboarding grant. Returns the grant.
    pub fn join_dao(e: Env, caller: Address) -> Result<i128, DaoError> {
        caller.require_auth();
        let cfg = config::load(&e)?;

        let grant = membership::join(&e, &cfg, &caller)?;
        ledger::assert_conserved(&e);

        MemberJoined {
            member: caller,
            grant,
            member_count: membership::count(&e),
        }
        .publish(&e);
        Ok(grant)
    }

    // ── Authentication proposals ─────────────────────────────────────────

    /// Stake on a feedback record being legitimate. Returns the new auth id.
    pub fn authenticate_feedback(
        e: Env,
        caller: Address,
        subject_id: u64,
        reviewer: Address,
        feedback_index: u64,
        stake_amount: i128,
    ) -> Result<u64, DaoError> {
        caller.require_auth();
        let cfg = config::load(&e)?;
        membership::require_member(&e, &caller)?;
        if stake_amount <= 0 {
            return Err(DaoError::InvalidAmount);
        }
        if ledger::balance(&e, &caller) < stake_amount {
            return Err(DaoError::InsufficientBalance);
        }
        feedback::require_live_feedback(
            &e,
            &config::feedback_store(&e)?,
            subject_id,
            &reviewer,
            feedback_index,
        )?;

        let auth = proposal::open(
            &e,
            &cfg,
            &caller,
            subject_id,
            &reviewer,
            feedback_index,
            stake_amount,
        )?;
        ledger::assert_conserved(&e);

        AuthenticationProposed {
            auth_id: auth.auth_id,
            staker: caller,
            subject_id,
            reviewer,
            feedback_index,
            stake: stake_amount,
            challenge_deadline: auth.challenge_deadline,
        }
        .publish(&e);
        Ok(auth.auth_id)
    }

    /// Authenticate an unchallenged proposal once its dispute window has
    /// elapsed and refund the stake. Callable by anyone.
    pub fn finalize_authentication(e: Env, auth_id: u64) -> Result<(), DaoError> {
        config::load(&e)?;
        let mut auth = proposal::load(&e, auth_id)?;
        proposal::require_open(&auth)?;
        if auth.status != AuthStatus::Pending {
            return Err(DaoError::WrongStatus);
        }
        if e.ledger().timestamp() < auth.challenge_deadline {
            return Err(DaoError::WindowNotElapsed);
        }

        proposal::transition(&mut auth, AuthStatus::Authenticated)?;
        proposal::save(&e, &auth);
        proposal::mark_authenticated(&e, &auth);
        let settlement = settlement::settle_unchallenged(&e, &auth);
        ledger::assert_conserved(&e);

        AuthenticationFinalized {
            auth_id,
            staker: auth.staker,
            refunded: settlement.refunded,
        }
        .publish(&e);
        Ok(())
    }

    // ── Contestation and voting ──────────────────────────────────────────

    /// Contest a pending proposal with a stake equal to the proposer's.
    pub fn contest_authentication(
        e: Env,
        caller: Address,
        auth_id: u64,
        stake_amount: i128,
    ) -> Result<(), DaoError> {
        caller.require_auth();
        let cfg = config::load(&e)?;
        membership::require_member(&e, &caller)?;
        let mut auth = proposal::load(&e, auth_id)?;

        let contest = contestation::contest(&e, &cfg, &mut auth, &caller, stake_amount)?;
        ledger::assert_conserved(&e);

        AuthenticationContested {
            auth_id,
            contester: caller,
            stake: stake_amount,
            vote_deadline: contest.vote_deadline,
        }
        .publish(&e);
        Ok(())
    }

    /// Cast a stake-weighted ballot on a contested proposal. One ballot per member.
    pub fn vote_on_contestation(
        e: Env,
        caller: Address,
        auth_id: u64,
        choice: VoteChoice,
        stake_amount: i128,
    ) -> Result<(), DaoError> {
        caller.require_auth();
        let cfg = config::load(&e)?;
        membership::require_member(&e, &caller)?;
        let auth = proposal::load(&e, auth_id)?;

        contestation::vote(&e, &cfg, &auth, &caller, choice, stake_amount)?;
        ledger::assert_conserved(&e);

        VoteCast {
            auth_id,
            voter: caller,
            choice,
            stake: stake_amount,
        }
        .publish(&e);
        Ok(())
    }

    /// Close the vote on a contested proposal and settle stakes. Callable by
    /// anyone once the voting window has elapsed. Returns the terminal status.
    pub fn finalize_contestation(e: Env, auth_id: u64) -> Result<AuthStatus, DaoError> {
        config::load(&e)?;
        let mut auth = proposal::load(&e, auth_id)?;
        proposal::require_open(&auth)?;
        if auth.status != AuthStatus::Contested {
            return Err(DaoError::NotContested);
        }
        let mut contest = contestation::load(&e, auth_id)?;
        if e.ledger().timestamp() < contest.vote_deadline {
            return Err(DaoError::VotingStillOpen);
        }

        let status = contestation::outcome(&contest);
        proposal::transition(&mut auth, status)?;
        contest.is_active = false;
        proposal::save(&e, &auth);
        contestation::save(&e, &contest);
        if status == AuthStatus::Authenticated {
            proposal::mark_authenticated(&e, &auth);
        }
        settlement::settle_contested(&e, &auth, &contest, status);
        ledger::assert_conserved(&e);
        log!(&e, "contestation finalized", auth_id, status);

        ContestationFinalized {
            auth_id,
            status,
            legitimate_stake: contest.legitimate_stake,
            not_legitimate_stake: contest.not_legitimate_stake,
        }
        .publish(&e);
        Ok(status)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn is_member(e: Env, account: Address) -> bool {
        membership::is_member(&e, &account)
    }

    pub fn get_member(e: Env, account: Address) -> Result<Member, DaoError> {
        membership::get(&e, &account)
    }

    pub fn get_member_count(e: Env) -> u32 {
        membership::count(&e)
    }

    pub fn get_balance(e: Env, account: Address) -> i128 {
        ledger::balance(&e, &account)
    }

    pub fn get_treasury_balance(e: Env) -> i128 {
        ledger::treasury(&e)
    }

    pub fn get_total_supply(e: Env) -> i128 {
        ledger::total_supply(&e)
    }

    /// Sum of all stakes currently held in escrow.
    pub fn get_escrowed_total(e: Env) -> i128 {
        ledger::escrowed_total(&e)
    }

    pub fn get_auth_count(e: Env) -> u64 {
        proposal::count(&e)
    }

    pub fn get_pending_authentication(
        e: Env,
        auth_id: u64,
    ) -> Result<PendingAuthentication, DaoError> {
        proposal::load(&e, auth_id)
    }

    pub fn get_contestation(e: Env, auth_id: u64) -> Result<Contestation, DaoError> {
        proposal::load(&e, auth_id)?;
        contestation::load(&e, auth_id)
    }

    /// A voter's ballot; `{None, 0, false}` if they have not voted.
    pub fn get_vote(e: Env, auth_id: u64, voter: Address) -> Vote {
        contestation::vote_of(&e, auth_id, &voter)
    }

    pub fn get_settlement(e: Env, auth_id: u64) -> Option<Settlement> {
        settlement::load(&e, auth_id)
    }

    pub fn is_authenticated_feedback(
        e: Env,
        subject_id: u64,
        reviewer: Address,
        feedback_index: u64,
    ) -> bool {
        proposal::is_authenticated(&e, subject_id, &reviewer, feedback_index)
    }

    /// Number of distinct feedback records of `subject_id` that have been authenticated.
    pub fn get_authenticated_feedback_count(e: Env, subject_id: u64) -> u32 {
        proposal::authenticated_count(&e, subject_id)
    }

    pub fn get_config(e: Env) -> Result<DaoConfig, DaoError> {
        config::load(&e)
    }

    pub fn get_admin(e: Env) -> Result<Address, DaoError> {
        config::admin(&e)
    }

    pub fn get_feedback_store(e: Env) -> Result<Address, DaoError> {
        config::feedback_store(&e)
    }
}






#[cfg(test)]
mod test_settlement;

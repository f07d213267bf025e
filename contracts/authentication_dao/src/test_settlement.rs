//! Contested settlement: payouts, slashing and the finalize guard.

use crate::test_helpers::{self, SUBJECT};
use crate::{AuthStatus, DaoError, VoteChoice, VOTING_PERIOD};
use soroban_sdk::{Address, Env};

struct Contest {
    auth_id: u64,
    staker: Address,
    contester: Address,
}

fn open_contest(e: &Env, dao: &test_helpers::Dao, stake: i128) -> Contest {
    let staker = test_helpers::member(e, dao);
    let contester = test_helpers::member(e, dao);
    let auth_id = test_helpers::propose(e, dao, &staker, stake);
    dao.client
        .contest_authentication(&contester, &auth_id, &stake);
    Contest {
        auth_id,
        staker,
        contester,
    }
}

fn balances(dao: &test_helpers::Dao, accounts: &[&Address]) -> [i128; 8] {
    let mut out = [0; 8];
    for (slot, account) in out.iter_mut().zip(accounts.iter()) {
        *slot = dao.client.get_balance(account);
    }
    out
}

#[test]
fn test_majority_legitimate_rewards_legitimate_voters() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);
    let v1 = test_helpers::member(&e, &dao);
    let v2 = test_helpers::member(&e, &dao);
    let v3 = test_helpers::member(&e, &dao);
    let accounts = [&c.staker, &c.contester, &v1, &v2, &v3];
    // Balances with the proposal and contest stakes already escrowed.
    let start = balances(&dao, &accounts);

    dao.client
        .vote_on_contestation(&v1, &c.auth_id, &VoteChoice::Legitimate, &1_000);
    dao.client
        .vote_on_contestation(&v2, &c.auth_id, &VoteChoice::Legitimate, &500);
    dao.client
        .vote_on_contestation(&v3, &c.auth_id, &VoteChoice::NotLegitimate, &500);

    test_helpers::advance(&e, VOTING_PERIOD + 1);
    let status = dao.client.finalize_contestation(&c.auth_id);
    assert_eq!(status, AuthStatus::Authenticated);

    let end = balances(&dao, &accounts);
    // Staker refunded in full.
    assert_eq!(end[0], start[0] + 1_000);
    // Contester's stake is gone.
    assert_eq!(end[1], start[1]);
    // Pool = contester 1000 + losing ballot 500, split 1000:500.
    assert_eq!(end[2], start[2] + 1_000);
    assert_eq!(end[3], start[3] + 500);
    assert_eq!(end[4], start[4] - 500);

    let auth = dao.client.get_pending_authentication(&c.auth_id);
    assert_eq!(auth.status, AuthStatus::Authenticated);
    assert!(!dao.client.get_contestation(&c.auth_id).is_active);
    assert!(dao
        .client
        .is_authenticated_feedback(&SUBJECT, &auth.reviewer, &auth.feedback_index));
    assert_eq!(dao.client.get_escrowed_total(), 0);

    let settlement = dao.client.get_settlement(&c.auth_id).unwrap();
    assert_eq!(settlement.status, AuthStatus::Authenticated);
    assert_eq!(settlement.refunded, 1_000 + 1_500);
    assert_eq!(settlement.forfeited, 1_500);
    assert_eq!(settlement.distributed, 1_500);
    assert_eq!(settlement.remainder, 0);
    test_helpers::assert_conserved(&dao, &accounts);
}

#[test]
fn test_majority_not_legitimate_rewards_contester_and_voters() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);
    let v1 = test_helpers::member(&e, &dao);
    let v2 = test_helpers::member(&e, &dao);
    let accounts = [&c.staker, &c.contester, &v1, &v2];
    let start = balances(&dao, &accounts);

    dao.client
        .vote_on_contestation(&v1, &c.auth_id, &VoteChoice::Legitimate, &1_000);
    dao.client
        .vote_on_contestation(&v2, &c.auth_id, &VoteChoice::NotLegitimate, &3_000);

    test_helpers::advance(&e, VOTING_PERIOD);
    let status = dao.client.finalize_contestation(&c.auth_id);
    assert_eq!(status, AuthStatus::Rejected);

    let end = balances(&dao, &accounts);
    // Staker slashed.
    assert_eq!(end[0], start[0]);
    // Pool = staker 1000 + losing ballot 1000 = 2000, split contester 1000 : v2 3000.
    assert_eq!(end[1], start[1] + 1_000 + 500);
    assert_eq!(end[2], start[2] - 1_000);
    assert_eq!(end[3], start[3] + 1_500);

    let auth = dao.client.get_pending_authentication(&c.auth_id);
    assert_eq!(auth.status, AuthStatus::Rejected);
    assert!(!dao
        .client
        .is_authenticated_feedback(&SUBJECT, &auth.reviewer, &auth.feedback_index));
    assert_eq!(dao.client.get_authenticated_feedback_count(&SUBJECT), 0);
    assert_eq!(dao.client.get_escrowed_total(), 0);
    test_helpers::assert_conserved(&dao, &accounts);
}

#[test]
fn test_tie_rejects() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);
    let v1 = test_helpers::member(&e, &dao);
    let v2 = test_helpers::member(&e, &dao);

    dao.client
        .vote_on_contestation(&v1, &c.auth_id, &VoteChoice::Legitimate, &700);
    dao.client
        .vote_on_contestation(&v2, &c.auth_id, &VoteChoice::NotLegitimate, &700);

    test_helpers::advance(&e, VOTING_PERIOD);
    assert_eq!(
        dao.client.finalize_contestation(&c.auth_id),
        AuthStatus::Rejected
    );
}

#[test]
fn test_no_votes_rejects_and_pays_contester() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);
    let start = balances(&dao, &[&c.staker, &c.contester]);

    test_helpers::advance(&e, VOTING_PERIOD);
    assert_eq!(
        dao.client.finalize_contestation(&c.auth_id),
        AuthStatus::Rejected
    );

    let end = balances(&dao, &[&c.staker, &c.contester]);
    assert_eq!(end[0], start[0]);
    assert_eq!(end[1], start[1] + 2_000);
}

#[test]
fn test_rounding_remainder_goes_to_first_heaviest_winner() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);
    let v1 = test_helpers::member(&e, &dao);
    let v2 = test_helpers::member(&e, &dao);
    let v3 = test_helpers::member(&e, &dao);
    let v4 = test_helpers::member(&e, &dao);
    let accounts = [&c.staker, &c.contester, &v1, &v2, &v3, &v4];
    let start = balances(&dao, &accounts);

    for voter in [&v1, &v2, &v3] {
        dao.client
            .vote_on_contestation(voter, &c.auth_id, &VoteChoice::Legitimate, &1);
    }
    dao.client
        .vote_on_contestation(&v4, &c.auth_id, &VoteChoice::NotLegitimate, &1);
    let treasury = dao.client.get_treasury_balance();

    test_helpers::advance(&e, VOTING_PERIOD);
    dao.client.finalize_contestation(&c.auth_id);

    // Pool = 1000 + 1 = 1001 over three equal weights: 333 each, and the
    // 2 left over go to the first voter.
    let end = balances(&dao, &accounts);
    assert_eq!(end[2], start[2] + 335);
    assert_eq!(end[3], start[3] + 333);
    assert_eq!(end[4], start[4] + 333);
    assert_eq!(end[5], start[5] - 1);
    assert_eq!(dao.client.get_treasury_balance(), treasury);

    let settlement = dao.client.get_settlement(&c.auth_id).unwrap();
    assert_eq!(settlement.forfeited, 1_001);
    assert_eq!(settlement.distributed, settlement.forfeited);
    assert_eq!(settlement.remainder, 2);
    assert_eq!(dao.client.get_escrowed_total(), 0);
    test_helpers::assert_conserved(&dao, &accounts);
}

#[test]
fn test_rounding_remainder_follows_weight_not_ballot_order() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);
    let v1 = test_helpers::member(&e, &dao);
    let v2 = test_helpers::member(&e, &dao);
    let v3 = test_helpers::member(&e, &dao);
    let accounts = [&c.staker, &c.contester, &v1, &v2, &v3];
    let start = balances(&dao, &accounts);

    for (voter, stake) in [(&v1, 1_i128), (&v2, 3), (&v3, 3)] {
        dao.client
            .vote_on_contestation(voter, &c.auth_id, &VoteChoice::Legitimate, &stake);
    }
    test_helpers::advance(&e, VOTING_PERIOD);
    assert_eq!(
        dao.client.finalize_contestation(&c.auth_id),
        AuthStatus::Authenticated
    );

    // Pool = 1000 over weights 1:3:3 floors to 142 + 428 + 428 = 998.
    let end = balances(&dao, &accounts);
    assert_eq!(end[0], start[0] + 1_000);
    assert_eq!(end[1], start[1]);
    assert_eq!(end[2], start[2] + 142);
    assert_eq!(end[3], start[3] + 430);
    assert_eq!(end[4], start[4] + 428);

    let settlement = dao.client.get_settlement(&c.auth_id).unwrap();
    assert_eq!(settlement.distributed, 1_000);
    assert_eq!(settlement.distributed, settlement.forfeited);
    assert_eq!(settlement.remainder, 2);
    test_helpers::assert_conserved(&dao, &accounts);
}

#[test]
fn test_contester_voting_with_equal_stake_is_refunded() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);
    let start = balances(&dao, &[&c.staker, &c.contester]);

    dao.client.vote_on_contestation(
        &c.contester,
        &c.auth_id,
        &VoteChoice::NotLegitimate,
        &1_000,
    );

    test_helpers::advance(&e, VOTING_PERIOD);
    assert_eq!(
        dao.client.finalize_contestation(&c.auth_id),
        AuthStatus::Rejected
    );

    // Contest stake back plus the whole 1000 pool (weights 1000 + 1000); the ballot nets to zero.
    let end = balances(&dao, &[&c.staker, &c.contester]);
    assert_eq!(end[1], start[1] + 1_000 + 1_000);
    assert_eq!(end[0], start[0]);
    assert_eq!(dao.client.get_escrowed_total(), 0);
}

// ── finalize_contestation guards ─────────────────────────────────────────────

#[test]
fn test_finalize_contestation_too_early() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);

    test_helpers::advance(&e, VOTING_PERIOD - 1);
    let res = dao.client.try_finalize_contestation(&c.auth_id);
    assert_eq!(res, Err(Ok(DaoError::VotingStillOpen)));
    assert!(dao.client.get_contestation(&c.auth_id).is_active);
    assert_eq!(
        dao.client.get_pending_authentication(&c.auth_id).status,
        AuthStatus::Contested
    );
}

#[test]
fn test_finalize_contestation_twice_fails() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);

    test_helpers::advance(&e, VOTING_PERIOD);
    dao.client.finalize_contestation(&c.auth_id);
    let contester_balance = dao.client.get_balance(&c.contester);

    let res = dao.client.try_finalize_contestation(&c.auth_id);
    assert_eq!(res, Err(Ok(DaoError::AlreadyFinalized)));
    let res = dao.client.try_finalize_authentication(&c.auth_id);
    assert_eq!(res, Err(Ok(DaoError::AlreadyFinalized)));
    assert_eq!(dao.client.get_balance(&c.contester), contester_balance);
}

#[test]
fn test_finalize_contestation_on_uncontested_proposal() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let staker = test_helpers::member(&e, &dao);
    let auth_id = test_helpers::propose(&e, &dao, &staker, 1_000);

    test_helpers::advance(&e, VOTING_PERIOD);
    let res = dao.client.try_finalize_contestation(&auth_id);
    assert_eq!(res, Err(Ok(DaoError::NotContested)));

    let res = dao.client.try_finalize_contestation(&(auth_id + 1));
    assert_eq!(res, Err(Ok(DaoError::UnknownAuthId)));
}

#[test]
fn test_vote_after_finalize_fails() {
    let e = Env::default();
    let dao = test_helpers::setup(&e);
    let c = open_contest(&e, &dao, 1_000);
    let voter = test_helpers::member(&e, &dao);

    test_helpers::advance(&e, VOTING_PERIOD);
    dao.client.finalize_contestation(&c.auth_id);

    let res = dao
        .client
        .try_vote_on_contestation(&voter, &c.auth_id, &VoteChoice::Legitimate, &10);
    assert_eq!(res, Err(Ok(DaoError::NotContested)));
}

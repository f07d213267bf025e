//! Settlement engine: refunds and pro-rata redistribution once a proposal
//! reaches a terminal status.
//!
//! Runs exactly once per proposal, from the terminal transition. When it
//! returns, the proposal's escrow is empty.

use soroban_sdk::{log, Address, Env, Vec};

use crate::contestation;
use crate::events::StakePaidOut;
use crate::ledger;
use crate::storage;
use crate::types::{AuthStatus, Contestation, PendingAuthentication, Settlement, VoteChoice};
use crate::DataKey;

pub fn load(e: &Env, auth_id: u64) -> Option<Settlement> {
    storage::get(e, &DataKey::Settlement(auth_id))
}

fn pay(e: &Env, auth_id: u64, recipient: &Address, amount: i128) {
    if amount <= 0 {
        return;
    }
    ledger::release(e, auth_id, recipient, amount);
    StakePaidOut {
        auth_id,
        recipient: recipient.clone(),
        amount,
    }
    .publish(e);
}

fn record(e: &Env, settlement: &Settlement) {
    if ledger::escrow_of(e, settlement.auth_id) != 0 {
        panic!("escrow not fully settled");
    }
    storage::set(e, &DataKey::Settlement(settlement.auth_id), settlement);
}

/// Happy path: the proposal went unchallenged, the staker gets the stake back.
pub fn settle_unchallenged(e: &Env, auth: &PendingAuthentication) -> Settlement {
    pay(e, auth.auth_id, &auth.staker, auth.stake_amount);
    let settlement = Settlement {
        auth_id: auth.auth_id,
        status: AuthStatus::Authenticated,
        refunded: auth.stake_amount,
        forfeited: 0,
        distributed: 0,
        remainder: 0,
        settled_at: e.ledger().timestamp(),
    };
    record(e, &settlement);
    settlement
}

/// Contested path.
///
/// The winning principal (staker if authenticated, contester if rejected) is
/// refunded. The losing principal's stake and every losing ballot form the
/// pool, which is shared among winners in proportion to their weight. Winning
/// voters also get their own ballot stake back. The rounding remainder goes to
/// the heaviest winner (earliest on ties), so the whole pool is distributed.
pub fn settle_contested(
    e: &Env,
    auth: &PendingAuthentication,
    contest: &Contestation,
    status: AuthStatus,
) -> Settlement {
    let auth_id = auth.auth_id;
    let (winner_principal, winner_stake, loser_stake, winning_choice) = match status {
        AuthStatus::Authenticated => (
            &auth.staker,
            auth.stake_amount,
            contest.contest_stake,
            VoteChoice::Legitimate,
        ),
        AuthStatus::Rejected => (
            &contest.contester,
            contest.contest_stake,
            auth.stake_amount,
            VoteChoice::NotLegitimate,
        ),
        _ => panic!("settlement requires a terminal status"),
    };

    let mut refunded = winner_stake;
    let mut pool = loser_stake;
    // (recipient, weight, ballot refund)
    let mut winners: Vec<(Address, i128, i128)> = Vec::new(e);

    // When the contester wins, they share the pool with the majority voters.
    if status == AuthStatus::Rejected {
        winners.push_back((contest.contester.clone(), contest.contest_stake, 0));
    }

    for voter in contestation::voters(e, auth_id).iter() {
        let ballot = contestation::vote_of(e, auth_id, &voter);
        if ballot.choice == winning_choice {
            refunded = refunded
                .checked_add(ballot.stake_amount)
                .expect("refund overflow");
            winners.push_back((voter, ballot.stake_amount, ballot.stake_amount));
        } else {
            pool = pool
                .checked_add(ballot.stake_amount)
                .expect("pool overflow");
        }
    }

    let total_weight: i128 = winners.iter().map(|(_, weight, _)| weight).sum();
    if total_weight <= 0 {
        panic!("contested settlement without winners");
    }

    let mut shares: Vec<i128> = Vec::new(e);
    let mut floored: i128 = 0;
    let mut heaviest: u32 = 0;
    let mut heaviest_weight: i128 = 0;
    for (i, (_, weight, _)) in winners.iter().enumerate() {
        let share = pool.checked_mul(weight).expect("share overflow") / total_weight;
        floored = floored.checked_add(share).expect("share overflow");
        shares.push_back(share);
        if weight > heaviest_weight {
            heaviest = i as u32;
            heaviest_weight = weight;
        }
    }
    let remainder = pool - floored;

    pay(e, auth_id, winner_principal, winner_stake);

    let mut distributed: i128 = 0;
    for (i, (recipient, _, ballot_refund)) in winners.iter().enumerate() {
        let mut share = shares.get_unchecked(i as u32);
        if i as u32 == heaviest {
            share += remainder;
        }
        distributed = distributed.checked_add(share).expect("share overflow");
        pay(
            e,
            auth_id,
            &recipient,
            ballot_refund.checked_add(share).expect("payout overflow"),
        );
    }
    if distributed != pool {
        panic!("forfeited stake not fully distributed");
    }
    log!(e, "settled contested auth", auth_id, pool, remainder);

    let settlement = Settlement {
        auth_id,
        status,
        refunded,
        forfeited: pool,
        distributed,
        remainder,
        settled_at: e.ledger().timestamp(),
    };
    record(e, &settlement);
    settlement
}

#![no_std]

//! # Feedback Registry Contract
//!
//! Stores reputation feedback given by reviewers about subjects. A record is
//! identified by `(subject_id, reviewer, feedback_index)` and never changes
//! after it is written, except for the one-way `revoked` flag. Indices are
//! assigned per (subject, reviewer) pair starting at 1.

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, Address, Env, IntoVal,
    Symbol, TryFromVal, Val, Vec,
};

/// Highest score a reviewer may give.
pub const MAX_SCORE: u32 = 100;

const DAY_IN_LEDGERS: u32 = 17_280;
const RECORD_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const RECORD_LIFETIME_THRESHOLD: u32 = RECORD_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RegistryError {
    InvalidScore = 1,
    FeedbackNotFound = 2,
    AlreadyRevoked = 3,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// (subject_id, reviewer, feedback_index) -> FeedbackRecord
    Feedback(u64, Address, u64),
    /// (subject_id, reviewer) -> last assigned index
    LastIndex(u64, Address),
    /// subject_id -> reviewers in first-seen order
    Clients(u64),
}

/// A single feedback entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedbackRecord {
    pub subject_id: u64,
    pub reviewer: Address,
    pub feedback_index: u64,
    pub score: u32,
    pub tag1: Symbol,
    pub tag2: Symbol,
    pub revoked: bool,
    pub created_at: u64,
}

/// Aggregate over the non-revoked feedback of a subject.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedbackSummary {
    pub count: u32,
    pub average_score: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedbackGiven {
    #[topic]
    pub subject_id: u64,
    #[topic]
    pub reviewer: Address,
    pub feedback_index: u64,
    pub score: u32,
    pub tag1: Symbol,
    pub tag2: Symbol,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedbackRevoked {
    #[topic]
    pub subject_id: u64,
    #[topic]
    pub reviewer: Address,
    pub feedback_index: u64,
}

// Every key grows with use, so all of them live in persistent storage.
fn read<V: TryFromVal<Env, Val>>(e: &Env, key: &DataKey) -> Option<V> {
    let value = e.storage().persistent().get(key);
    if value.is_some() {
        e.storage()
            .persistent()
            .extend_ttl(key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
    }
    value
}

fn write<V: IntoVal<Env, Val>>(e: &Env, key: &DataKey, value: &V) {
    e.storage().persistent().set(key, value);
    e.storage()
        .persistent()
        .extend_ttl(key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
}

#[contract]
pub struct FeedbackRegistry;

#[contractimpl]
impl FeedbackRegistry {
    /// Record feedback from `reviewer` about `subject_id`. Returns the new feedback index.
    pub fn give_feedback(
        e: Env,
        reviewer: Address,
        subject_id: u64,
        score: u32,
        tag1: Symbol,
        tag2: Symbol,
    ) -> Result<u64, RegistryError> {
        reviewer.require_auth();

        if score > MAX_SCORE {
            return Err(RegistryError::InvalidScore);
        }

        let last = Self::get_last_index(e.clone(), subject_id, reviewer.clone());
        let feedback_index = last.checked_add(1).expect("feedback index overflow");

        if last == 0 {
            let mut clients = Self::get_clients(e.clone(), subject_id);
            clients.push_back(reviewer.clone());
            write(&e, &DataKey::Clients(subject_id), &clients);
        }

        let record = FeedbackRecord {
            subject_id,
            reviewer: reviewer.clone(),
            feedback_index,
            score,
            tag1: tag1.clone(),
            tag2: tag2.clone(),
            revoked: false,
            created_at: e.ledger().timestamp(),
        };
        write(
            &e,
            &DataKey::Feedback(subject_id, reviewer.clone(), feedback_index),
            &record,
        );
        write(
            &e,
            &DataKey::LastIndex(subject_id, reviewer.clone()),
            &feedback_index,
        );

        FeedbackGiven {
            subject_id,
            reviewer,
            feedback_index,
            score,
            tag1,
            tag2,
        }
        .publish(&e);

        Ok(feedback_index)
    }

    /// Revoke one of the caller's own feedback entries. Revocation cannot be undone.
    pub fn revoke_feedback(
        e: Env,
        reviewer: Address,
        subject_id: u64,
        feedback_index: u64,
    ) -> Result<(), RegistryError> {
        reviewer.require_auth();

        let key = DataKey::Feedback(subject_id, reviewer.clone(), feedback_index);
        let mut record: FeedbackRecord =
            read(&e, &key).ok_or(RegistryError::FeedbackNotFound)?;

        if record.revoked {
            return Err(RegistryError::AlreadyRevoked);
        }

        record.revoked = true;
        write(&e, &key, &record);

        FeedbackRevoked {
            subject_id,
            reviewer,
            feedback_index,
        }
        .publish(&e);

        Ok(())
    }

    pub fn get_feedback(
        e: Env,
        subject_id: u64,
        reviewer: Address,
        feedback_index: u64,
    ) -> Option<FeedbackRecord> {
        read(&e, &DataKey::Feedback(subject_id, reviewer, feedback_index))
    }

    /// All feedback for a subject, grouped by reviewer in first-seen order.
    pub fn read_all_feedback(
        e: Env,
        subject_id: u64,
        include_revoked: bool,
    ) -> Vec<FeedbackRecord> {
        let mut out = Vec::new(&e);
        for reviewer in Self::get_clients(e.clone(), subject_id).iter() {
            let last = Self::get_last_index(e.clone(), subject_id, reviewer.clone());
            for index in 1..=last {
                let record: Option<FeedbackRecord> =
                    read(&e, &DataKey::Feedback(subject_id, reviewer.clone(), index));
                if let Some(record) = record {
                    if include_revoked || !record.revoked {
                        out.push_back(record);
                    }
                }
            }
        }
        out
    }

    pub fn get_clients(e: Env, subject_id: u64) -> Vec<Address> {
        read(&e, &DataKey::Clients(subject_id)).unwrap_or(Vec::new(&e))
    }

    pub fn get_last_index(e: Env, subject_id: u64, reviewer: Address) -> u64 {
        read(&e, &DataKey::LastIndex(subject_id, reviewer)).unwrap_or(0)
    }

    /// Count and integer mean score of the subject's non-revoked feedback.
    pub fn get_summary(e: Env, subject_id: u64) -> FeedbackSummary {
        let records = Self::read_all_feedback(e, subject_id, false);
        let count = records.len();
        if count == 0 {
            return FeedbackSummary {
                count: 0,
                average_score: 0,
            };
        }
        let total: u64 = records.iter().map(|r| r.score as u64).sum();
        FeedbackSummary {
            count,
            average_score: (total / count as u64) as u32,
        }
    }
}

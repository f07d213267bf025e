//! Adapters from feedback registry records to aggregator input.

use feedback_registry::FeedbackRecord;
use soroban_sdk::Address;

use crate::FeedbackEntry;

/// Convert registry records, keeping their revoked flag.
pub fn entries_from_records(
    records: &soroban_sdk::Vec<FeedbackRecord>,
) -> Vec<FeedbackEntry<Address>> {
    records
        .iter()
        .map(|r| FeedbackEntry {
            reviewer: r.reviewer,
            score: r.score,
            revoked: r.revoked,
        })
        .collect()
}

/// Like [`entries_from_records`], but only keeps records accepted by
/// `is_authenticated`, typically a lookup of
/// `is_authenticated_feedback(subject_id, reviewer, feedback_index)` on the DAO.
pub fn authenticated_only<F>(
    records: &soroban_sdk::Vec<FeedbackRecord>,
    mut is_authenticated: F,
) -> Vec<FeedbackEntry<Address>>
where
    F: FnMut(&FeedbackRecord) -> bool,
{
    records
        .iter()
        .filter(|r| is_authenticated(r))
        .map(|r| FeedbackEntry {
            reviewer: r.reviewer,
            score: r.score,
            revoked: r.revoked,
        })
        .collect()
}

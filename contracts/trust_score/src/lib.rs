//! # Trust Score
//!
//! Folds a subject's feedback history into a single score in `[0, 1]`.
//!
//! The score is a weighted blend of four components, each in `[0, 1]`:
//!
//! | component   | weight | definition                                   |
//! |-------------|--------|----------------------------------------------|
//! | average     | 0.30   | `mean / 100`                                 |
//! | volume      | 0.20   | `min(1, log10(n + 1) / log10(50))`           |
//! | diversity   | 0.30   | `min(1, unique_reviewers / n)`               |
//! | consistency | 0.20   | `max(0, 1 - min(1, stddev / 50))`            |
//!
//! Revoked entries are ignored. The function is pure: callers decide whether
//! to pass every record or only those the authentication DAO has accepted
//! (see [`records::authenticated_only`]).

use std::collections::BTreeSet;

pub mod records;

pub const AVERAGE_WEIGHT: f64 = 0.30;
pub const VOLUME_WEIGHT: f64 = 0.20;
pub const DIVERSITY_WEIGHT: f64 = 0.30;
pub const CONSISTENCY_WEIGHT: f64 = 0.20;

/// Feedback count at which the volume component saturates (`log10(n + 1)` reaches `log10(50)`).
pub const VOLUME_SATURATION: f64 = 50.0;

/// Standard deviation at which the consistency component reaches zero.
pub const STDDEV_CEILING: f64 = 50.0;

/// Scores are on a 0-100 scale; anything above is clamped.
pub const MAX_SCORE: u32 = 100;

/// One piece of feedback as seen by the aggregator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackEntry<R> {
    pub reviewer: R,
    pub score: u32,
    pub revoked: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrustScoreResult {
    pub final_score: f64,
    pub avg_component: f64,
    pub volume_component: f64,
    pub diversity_component: f64,
    pub consistency_component: f64,
    /// Non-revoked entries considered.
    pub feedback_count: usize,
    pub unique_reviewers: usize,
    pub average_score: f64,
    /// Population standard deviation of the considered scores.
    pub std_dev: f64,
}

/// Compute the trust score of a feedback set.
pub fn trust_score<R: Ord>(feedback: &[FeedbackEntry<R>]) -> TrustScoreResult {
    let live: Vec<&FeedbackEntry<R>> = feedback.iter().filter(|f| !f.revoked).collect();
    if live.is_empty() {
        return TrustScoreResult::default();
    }

    let n = live.len();
    let unique_reviewers = live
        .iter()
        .map(|f| &f.reviewer)
        .collect::<BTreeSet<_>>()
        .len();

    let scores: Vec<f64> = live
        .iter()
        .map(|f| f64::from(f.score.min(MAX_SCORE)))
        .collect();
    let mean = scores.iter().sum::<f64>() / n as f64;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;
    let std_dev = variance.sqrt();

    let avg_component = mean / f64::from(MAX_SCORE);
    let volume_component = ((n as f64 + 1.0).log10() / VOLUME_SATURATION.log10()).min(1.0);
    let diversity_component = (unique_reviewers as f64 / n as f64).min(1.0);
    let consistency_component = (1.0 - (std_dev / STDDEV_CEILING).min(1.0)).max(0.0);

    let final_score = AVERAGE_WEIGHT * avg_component
        + VOLUME_WEIGHT * volume_component
        + DIVERSITY_WEIGHT * diversity_component
        + CONSISTENCY_WEIGHT * consistency_component;

    TrustScoreResult {
        final_score,
        avg_component,
        volume_component,
        diversity_component,
        consistency_component,
        feedback_count: n,
        unique_reviewers,
        average_score: mean,
        std_dev,
    }
}

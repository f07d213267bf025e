//! Read-only access to the external feedback registry.
//!
//! The wasm build imports the registry's compiled contract, so the registry
//! has to be built first:
//!
//! ```text
//! stellar contract build --package feedback_registry
//! stellar contract build --package authentication_dao
//! ```
//!
//! Host builds (tests, tooling) link the `feedback_registry` crate directly.

use soroban_sdk::{Address, Env};

use crate::errors::DaoError;

/// Registry client: WASM import for wasm32, crate client for host builds.
#[cfg(target_arch = "wasm32")]
mod registry_import {
    soroban_sdk::contractimport!(
        file = "../../target/wasm32v1-none/release/feedback_registry.wasm"
    );
    pub use Client as FeedbackRegistryClient;
}

#[cfg(target_arch = "wasm32")]
use registry_import::FeedbackRegistryClient;

#[cfg(not(target_arch = "wasm32"))]
use feedback_registry::FeedbackRegistryClient;

/// Fails unless the record exists in `store` and has not been revoked.
pub fn require_live_feedback(
    e: &Env,
    store: &Address,
    subject_id: u64,
    reviewer: &Address,
    feedback_index: u64,
) -> Result<(), DaoError> {
    let client = FeedbackRegistryClient::new(e, store);
    let record = client
        .get_feedback(&subject_id, reviewer, &feedback_index)
        .ok_or(DaoError::FeedbackNotFound)?;
    if record.revoked {
        return Err(DaoError::FeedbackRevoked);
    }
    Ok(())
}

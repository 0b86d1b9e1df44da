// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Decision Recorder
//!
//! Records one like/pass decision as a single transaction:
//!
//! 1. upsert the (actor → recipient) decision, learning the previous verdict
//! 2. apply the [`CounterEffect`] of that transition to the recipient's counter
//! 3. for likes only, check whether the recipient already likes the actor
//! 4. commit
//!
//! Any failure after the transaction opens rolls everything back. A pass
//! never reports a match, even if the pair was mutual before.

use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::application::ledger::LedgerError;
use crate::domain::decision::{CounterEffect, UserId};
use crate::domain::repository::{DecisionRepository, DecisionTransaction, RepositoryError};

pub struct DecisionRecorder {
    repository: Arc<dyn DecisionRepository>,
}

impl DecisionRecorder {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    /// Record `actor_id`'s verdict on `recipient_id`; returns whether the pair is now a match.
    pub async fn record_decision(
        &self,
        actor_id: &UserId,
        recipient_id: &UserId,
        liked: bool,
    ) -> Result<bool, LedgerError> {
        let mut tx = self.repository.begin().await.map_err(|e| match e {
            RepositoryError::Connectivity(_) => LedgerError::ConnectivityFailure(e),
            _ => LedgerError::TransactionFailure(e),
        })?;

        match Self::apply(tx.as_mut(), actor_id, recipient_id, liked).await {
            Ok(mutual_like) => {
                tx.commit().await.map_err(LedgerError::TransactionFailure)?;
                debug!(
                    "Recorded decision {} -> {} (liked={}, mutual={})",
                    actor_id, recipient_id, liked, mutual_like
                );
                Ok(mutual_like)
            }
            Err(e) => {
                warn!(
                    "Rolling back decision {} -> {}: {}",
                    actor_id, recipient_id, e
                );
                if let Err(rollback_err) = tx.rollback().await {
                    error!("Rollback failed for {} -> {}: {}", actor_id, recipient_id, rollback_err);
                }
                Err(LedgerError::TransactionFailure(e))
            }
        }
    }

    async fn apply(
        tx: &mut dyn DecisionTransaction,
        actor_id: &UserId,
        recipient_id: &UserId,
        liked: bool,
    ) -> Result<bool, RepositoryError> {
        let previous = tx.upsert_decision(actor_id, recipient_id, liked).await?;

        match CounterEffect::for_transition(previous, liked) {
            CounterEffect::Increment => tx.increment_like_count(recipient_id).await?,
            CounterEffect::Decrement => tx.decrement_like_count(recipient_id).await?,
            CounterEffect::Unchanged => {}
        }

        if !liked {
            return Ok(false);
        }
        tx.has_liked(recipient_id, actor_id).await
    }
}

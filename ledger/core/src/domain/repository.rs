// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for the decision ledger. The interfaces live in the
//! domain layer and are implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Concern | Implementations |
//! |-------|---------|----------------|
//! | `DecisionRepository` | Decision store reads, like counter reads, transaction factory | `InMemoryDecisionRepository`, `PostgresDecisionRepository` |
//! | `DecisionTransaction` | Atomic decision upsert + counter adjustment + mutual check | one per repository |
//!
//! ## Storage Backend Abstraction
//!
//! The concrete repository is selected at startup from configuration
//! (`explore-config.yaml`): in-memory for development and tests, PostgreSQL
//! for production.

use async_trait::async_trait;
use crate::domain::decision::{Liker, SequenceId, UserId};

/// Storage backend enum for pluggable persistence
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
    /// How long startup keeps retrying an unreachable database
    pub connect_timeout: std::time::Duration,
}

/// Selection criteria for a liked-you listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikerQuery {
    pub recipient_id: UserId,
    /// Only rows with a strictly greater cursor are returned
    pub after: SequenceId,
    pub limit: u32,
    /// Drop actors the recipient has already liked back
    pub exclude_mutual: bool,
}

/// Read side of the ledger plus the entry point for write transactions.
#[async_trait]
pub trait DecisionRepository: Send + Sync {
    /// Open a transaction for recording one decision
    async fn begin(&self) -> Result<Box<dyn DecisionTransaction>, RepositoryError>;

    /// Actors with an active like toward `query.recipient_id`, ascending by cursor
    async fn find_likers(&self, query: &LikerQuery) -> Result<Vec<Liker>, RepositoryError>;

    /// Current like counter for a user.
    ///
    /// A user who has never been liked has no counter row; that surfaces as
    /// `RepositoryError::NotFound` and is left to the caller to interpret.
    async fn like_count(&self, user_id: &UserId) -> Result<u64, RepositoryError>;
}

/// Unit of work for a single decision.
///
/// Nothing written through a transaction is visible to other readers until
/// `commit` succeeds. Dropping a transaction without committing discards it.
#[async_trait]
pub trait DecisionTransaction: Send {
    /// Insert or overwrite the decision for (actor → recipient).
    ///
    /// Returns the previous verdict, or `None` for a first decision. A
    /// pre-existing row keeps its sequence id. Concurrent transactions on the
    /// same pair are serialized from this call until commit/rollback.
    async fn upsert_decision(
        &mut self,
        actor_id: &UserId,
        recipient_id: &UserId,
        liked: bool,
    ) -> Result<Option<bool>, RepositoryError>;

    /// Add one to the user's counter, creating it at 1 if absent
    async fn increment_like_count(&mut self, user_id: &UserId) -> Result<(), RepositoryError>;

    /// Subtract one from the user's counter, never below zero; absent counters are left alone
    async fn decrement_like_count(&mut self, user_id: &UserId) -> Result<(), RepositoryError>;

    /// Whether `actor_id` currently likes `recipient_id`, as seen by this transaction
    async fn has_liked(&mut self, actor_id: &UserId, recipient_id: &UserId) -> Result<bool, RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Store unreachable: {0}")]
    Connectivity(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => RepositoryError::Connectivity(err.to_string()),
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

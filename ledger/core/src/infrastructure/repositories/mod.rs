// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the ledger repository traits defined in
//! `crate::domain::repository`.
//!
//! ## PostgreSQL
//!
//! - **PostgresDecisionRepository** - `decisions` and `like_counters` tables,
//!   per-pair advisory locking inside each decision transaction
//!
//! ## In-Memory
//!
//! - **InMemoryDecisionRepository** - one writer at a time; each transaction
//!   buffers the rows it touches and publishes them on commit, so readers
//!   never wait on an open transaction; used for development and tests
//!
//! # Usage
//!
//! ```no_run
//! use explore_core::infrastructure::db::Database;
//! use explore_core::infrastructure::repositories::postgres_decision::PostgresDecisionRepository;
//!
//! # async fn run(database_url: &str) -> anyhow::Result<()> {
//! let db = Database::new(database_url).await?;
//! let repo = PostgresDecisionRepository::new(db.get_pool().clone());
//! # Ok(())
//! # }
//! ```

pub mod postgres_decision;

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::decision::{Decision, Liker, SequenceId, UserId};
use crate::domain::repository::{
    DecisionRepository, DecisionTransaction, LikerQuery, RepositoryError,
};

type PairKey = (UserId, UserId);

/// Committed ledger contents.
#[derive(Debug, Default)]
struct LedgerState {
    decisions: HashMap<PairKey, Decision>,
    /// recipient -> (sequence -> actor), covering likes and passes
    by_recipient: HashMap<UserId, BTreeMap<SequenceId, UserId>>,
    like_counts: HashMap<UserId, u64>,
    last_sequence: SequenceId,
}

impl LedgerState {
    fn has_liked(&self, actor_id: &UserId, recipient_id: &UserId) -> bool {
        self.decisions
            .get(&(actor_id.clone(), recipient_id.clone()))
            .map(|d| d.liked)
            .unwrap_or(false)
    }

    fn apply(&mut self, pending: PendingWrites) {
        for (key, decision) in pending.decisions {
            if !self.decisions.contains_key(&key) {
                self.by_recipient
                    .entry(key.1.clone())
                    .or_default()
                    .insert(decision.sequence_id, key.0.clone());
            }
            self.decisions.insert(key, decision);
        }
        self.like_counts.extend(pending.like_counts);
        self.last_sequence = pending.last_sequence;
    }
}

/// Rows touched by an open transaction, published as a unit on commit.
#[derive(Debug, Default)]
struct PendingWrites {
    decisions: HashMap<PairKey, Decision>,
    like_counts: HashMap<UserId, u64>,
    last_sequence: SequenceId,
}

#[derive(Clone, Default)]
pub struct InMemoryDecisionRepository {
    state: Arc<RwLock<LedgerState>>,
    writer: Arc<Mutex<()>>,
}

impl InMemoryDecisionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DecisionRepository for InMemoryDecisionRepository {
    async fn begin(&self) -> Result<Box<dyn DecisionTransaction>, RepositoryError> {
        let writer = self.writer.clone().lock_owned().await;
        let last_sequence = self.state.read().await.last_sequence;
        Ok(Box::new(InMemoryDecisionTransaction {
            state: self.state.clone(),
            _writer: writer,
            pending: PendingWrites {
                last_sequence,
                ..PendingWrites::default()
            },
        }))
    }

    async fn find_likers(&self, query: &LikerQuery) -> Result<Vec<Liker>, RepositoryError> {
        let state = self.state.read().await;
        let Some(actors) = state.by_recipient.get(&query.recipient_id) else {
            return Ok(vec![]);
        };

        let likers = actors
            .range((Bound::Excluded(query.after), Bound::Unbounded))
            .filter_map(|(_, actor_id)| {
                state
                    .decisions
                    .get(&(actor_id.clone(), query.recipient_id.clone()))
            })
            .filter(|d| d.liked)
            .filter(|d| !(query.exclude_mutual && state.has_liked(&query.recipient_id, &d.actor_id)))
            .take(query.limit as usize)
            .map(Decision::as_liker)
            .collect();
        Ok(likers)
    }

    async fn like_count(&self, user_id: &UserId) -> Result<u64, RepositoryError> {
        let state = self.state.read().await;
        state
            .like_counts
            .get(user_id)
            .copied()
            .ok_or_else(|| RepositoryError::NotFound(format!("like counter for {}", user_id)))
    }
}

/// Holds the writer lock for its whole lifetime so transactions run one at a
/// time; readers only see `pending` once `commit` publishes it.
struct InMemoryDecisionTransaction {
    state: Arc<RwLock<LedgerState>>,
    _writer: OwnedMutexGuard<()>,
    pending: PendingWrites,
}

impl InMemoryDecisionTransaction {
    async fn current_decision(&self, key: &PairKey) -> Option<Decision> {
        if let Some(decision) = self.pending.decisions.get(key) {
            return Some(decision.clone());
        }
        self.state.read().await.decisions.get(key).cloned()
    }

    async fn current_count(&self, user_id: &UserId) -> Option<u64> {
        if let Some(count) = self.pending.like_counts.get(user_id) {
            return Some(*count);
        }
        self.state.read().await.like_counts.get(user_id).copied()
    }
}

#[async_trait]
impl DecisionTransaction for InMemoryDecisionTransaction {
    async fn upsert_decision(
        &mut self,
        actor_id: &UserId,
        recipient_id: &UserId,
        liked: bool,
    ) -> Result<Option<bool>, RepositoryError> {
        let key = (actor_id.clone(), recipient_id.clone());

        if let Some(mut existing) = self.current_decision(&key).await {
            let previous = existing.redecide(liked);
            self.pending.decisions.insert(key, existing);
            return Ok(Some(previous));
        }

        let sequence_id = self.pending.last_sequence.next();
        self.pending.last_sequence = sequence_id;
        self.pending.decisions.insert(
            key,
            Decision::new(actor_id.clone(), recipient_id.clone(), liked, sequence_id),
        );
        Ok(None)
    }

    async fn increment_like_count(&mut self, user_id: &UserId) -> Result<(), RepositoryError> {
        let count = self.current_count(user_id).await.unwrap_or(0);
        self.pending.like_counts.insert(user_id.clone(), count + 1);
        Ok(())
    }

    async fn decrement_like_count(&mut self, user_id: &UserId) -> Result<(), RepositoryError> {
        if let Some(count) = self.current_count(user_id).await {
            self.pending
                .like_counts
                .insert(user_id.clone(), count.saturating_sub(1));
        }
        Ok(())
    }

    async fn has_liked(&mut self, actor_id: &UserId, recipient_id: &UserId) -> Result<bool, RepositoryError> {
        let key = (actor_id.clone(), recipient_id.clone());
        Ok(self.current_decision(&key).await.map(|d| d.liked).unwrap_or(false))
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let InMemoryDecisionTransaction { state, _writer, pending } = *self;
        state.write().await.apply(pending);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    async fn decide(repo: &InMemoryDecisionRepository, actor: &str, recipient: &str, liked: bool) -> Option<bool> {
        let mut tx = repo.begin().await.unwrap();
        let previous = tx.upsert_decision(&user(actor), &user(recipient), liked).await.unwrap();
        tx.commit().await.unwrap();
        previous
    }

    fn query(recipient: &str, exclude_mutual: bool) -> LikerQuery {
        LikerQuery {
            recipient_id: user(recipient),
            after: SequenceId::START,
            limit: 100,
            exclude_mutual,
        }
    }

    #[tokio::test]
    async fn test_upsert_reports_previous_and_keeps_sequence() {
        let repo = InMemoryDecisionRepository::new();

        assert_eq!(decide(&repo, "a", "b", true).await, None);
        let before = repo.find_likers(&query("b", false)).await.unwrap();

        assert_eq!(decide(&repo, "a", "b", false).await, Some(true));
        assert_eq!(decide(&repo, "a", "b", true).await, Some(false));
        let after = repo.find_likers(&query("b", false)).await.unwrap();

        assert_eq!(before[0].sequence_id, after[0].sequence_id);
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let repo = InMemoryDecisionRepository::new();

        let mut tx = repo.begin().await.unwrap();
        tx.upsert_decision(&user("a"), &user("b"), true).await.unwrap();
        tx.increment_like_count(&user("b")).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(repo.find_likers(&query("b", false)).await.unwrap().is_empty());
        assert!(matches!(
            repo.like_count(&user("b")).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let repo = InMemoryDecisionRepository::new();
        {
            let mut tx = repo.begin().await.unwrap();
            tx.increment_like_count(&user("b")).await.unwrap();
        }
        assert!(repo.like_count(&user("b")).await.is_err());
    }

    #[tokio::test]
    async fn test_reads_proceed_while_transaction_open() {
        let repo = InMemoryDecisionRepository::new();
        decide(&repo, "x", "zzz", true).await;
        let mut counter_tx = repo.begin().await.unwrap();
        counter_tx.increment_like_count(&user("zzz")).await.unwrap();
        counter_tx.commit().await.unwrap();

        let mut open = repo.begin().await.unwrap();
        open.upsert_decision(&user("a"), &user("b"), true).await.unwrap();
        open.increment_like_count(&user("b")).await.unwrap();

        let wait = Duration::from_millis(200);
        let likers = timeout(wait, repo.find_likers(&query("zzz", false)))
            .await
            .expect("listing blocked by open transaction")
            .unwrap();
        assert_eq!(likers.len(), 1);
        let count = timeout(wait, repo.like_count(&user("zzz")))
            .await
            .expect("count blocked by open transaction")
            .unwrap();
        assert_eq!(count, 1);

        // Uncommitted writes stay invisible.
        let pending = timeout(wait, repo.find_likers(&query("b", false))).await.unwrap().unwrap();
        assert!(pending.is_empty());
        assert!(repo.like_count(&user("b")).await.is_err());

        open.commit().await.unwrap();
        assert_eq!(repo.find_likers(&query("b", false)).await.unwrap().len(), 1);
        assert_eq!(repo.like_count(&user("b")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_writers_run_one_at_a_time() {
        let repo = InMemoryDecisionRepository::new();

        let first = repo.begin().await.unwrap();
        assert!(timeout(Duration::from_millis(50), repo.begin()).await.is_err());

        first.rollback().await.unwrap();
        assert!(timeout(Duration::from_millis(200), repo.begin()).await.is_ok());
    }

    #[tokio::test]
    async fn test_transaction_reads_its_own_writes() {
        let repo = InMemoryDecisionRepository::new();
        decide(&repo, "b", "a", true).await;

        let mut tx = repo.begin().await.unwrap();
        assert_eq!(tx.upsert_decision(&user("a"), &user("b"), true).await.unwrap(), None);
        assert_eq!(tx.upsert_decision(&user("a"), &user("b"), false).await.unwrap(), Some(true));
        assert!(!tx.has_liked(&user("a"), &user("b")).await.unwrap());
        assert!(tx.has_liked(&user("b"), &user("a")).await.unwrap());
        tx.commit().await.unwrap();

        let ids: Vec<String> = repo
            .find_likers(&query("a", false))
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.actor_id.to_string())
            .collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[tokio::test]
    async fn test_counter_never_negative() {
        let repo = InMemoryDecisionRepository::new();

        let mut tx = repo.begin().await.unwrap();
        tx.decrement_like_count(&user("u")).await.unwrap();
        tx.increment_like_count(&user("u")).await.unwrap();
        tx.decrement_like_count(&user("u")).await.unwrap();
        tx.decrement_like_count(&user("u")).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(repo.like_count(&user("u")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_exclude_mutual_filters_liked_back_actors() {
        let repo = InMemoryDecisionRepository::new();
        decide(&repo, "x", "me", true).await;
        decide(&repo, "y", "me", true).await;
        decide(&repo, "z", "me", false).await;
        decide(&repo, "me", "x", true).await;
        decide(&repo, "me", "y", false).await;

        let all: Vec<String> = repo
            .find_likers(&query("me", false))
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.actor_id.to_string())
            .collect();
        assert_eq!(all, vec!["x", "y"]);

        let fresh: Vec<String> = repo
            .find_likers(&query("me", true))
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.actor_id.to_string())
            .collect();
        assert_eq!(fresh, vec!["y"]);
    }

    #[tokio::test]
    async fn test_cursor_and_limit() {
        let repo = InMemoryDecisionRepository::new();
        for actor in ["1", "2", "3", "4"] {
            decide(&repo, actor, "r", true).await;
        }

        let first = repo
            .find_likers(&LikerQuery { limit: 2, ..query("r", false) })
            .await
            .unwrap();
        assert_eq!(first.len(), 2);

        let rest = repo
            .find_likers(&LikerQuery {
                after: first[1].sequence_id,
                ..query("r", false)
            })
            .await
            .unwrap();
        let ids: Vec<&str> = rest.iter().map(|l| l.actor_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }
}

// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Decision Repository
//!
//! Production `DecisionRepository` backed by the `decisions` and
//! `like_counters` tables (see `crate::infrastructure::db` for the schema).
//!
//! Each decision transaction first takes a transaction-scoped advisory lock
//! on the hashed (actor, recipient) pair. Row locks alone cannot serialize two
//! first-time decisions for the same pair because neither sees a row to lock;
//! the advisory lock covers that case and is released on commit or rollback.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, Row, Transaction};
use tracing::{debug, error};

use crate::domain::decision::{Liker, SequenceId, UserId};
use crate::domain::repository::{
    DecisionRepository, DecisionTransaction, LikerQuery, RepositoryError,
};

const LIKERS_QUERY: &str = r#"
    SELECT sequence_id, actor_id, decided_at
    FROM decisions
    WHERE recipient_id = $1
      AND liked = TRUE
      AND sequence_id > $2
    ORDER BY sequence_id ASC
    LIMIT $3
"#;

const NEW_LIKERS_QUERY: &str = r#"
    SELECT d.sequence_id, d.actor_id, d.decided_at
    FROM decisions d
    WHERE d.recipient_id = $1
      AND d.liked = TRUE
      AND d.sequence_id > $2
      AND NOT EXISTS (
          SELECT 1
          FROM decisions back
          WHERE back.actor_id = $1
            AND back.recipient_id = d.actor_id
            AND back.liked = TRUE
      )
    ORDER BY d.sequence_id ASC
    LIMIT $3
"#;

pub struct PostgresDecisionRepository {
    pool: PgPool,
}

impl PostgresDecisionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn deserialize_liker(row: &PgRow) -> Result<Liker, RepositoryError> {
        let sequence_id: i64 = row.try_get("sequence_id")
            .map_err(|e| RepositoryError::Database(format!("Missing sequence_id: {}", e)))?;
        let actor_id: String = row.try_get("actor_id")
            .map_err(|e| RepositoryError::Database(format!("Missing actor_id: {}", e)))?;
        let decided_at: DateTime<Utc> = row.try_get("decided_at")
            .map_err(|e| RepositoryError::Database(format!("Missing decided_at: {}", e)))?;

        let actor_id = UserId::new(actor_id)
            .map_err(|e| RepositoryError::Database(format!("Stored actor_id is invalid: {}", e)))?;

        Ok(Liker {
            actor_id,
            decided_at,
            sequence_id: SequenceId::from_raw(sequence_id),
        })
    }
}

#[async_trait]
impl DecisionRepository for PostgresDecisionRepository {
    async fn begin(&self) -> Result<Box<dyn DecisionTransaction>, RepositoryError> {
        let tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to begin decision transaction: {}", e);
            RepositoryError::from(e)
        })?;
        Ok(Box::new(PostgresDecisionTransaction { tx }))
    }

    async fn find_likers(&self, query: &LikerQuery) -> Result<Vec<Liker>, RepositoryError> {
        let sql = if query.exclude_mutual {
            NEW_LIKERS_QUERY
        } else {
            LIKERS_QUERY
        };

        let rows = sqlx::query(sql)
            .bind(query.recipient_id.as_str())
            .bind(query.after.as_raw())
            .bind(i64::from(query.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list likers of {}: {}", query.recipient_id, e);
                RepositoryError::from(e)
            })?;

        let likers = rows
            .iter()
            .map(Self::deserialize_liker)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Fetched {} likers of {} after cursor {} (exclude_mutual={})",
            likers.len(),
            query.recipient_id,
            query.after,
            query.exclude_mutual
        );
        Ok(likers)
    }

    async fn like_count(&self, user_id: &UserId) -> Result<u64, RepositoryError> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT like_count FROM like_counters WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        count
            .map(|c| c.max(0) as u64)
            .ok_or_else(|| RepositoryError::NotFound(format!("like counter for {}", user_id)))
    }
}

pub struct PostgresDecisionTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl DecisionTransaction for PostgresDecisionTransaction {
    async fn upsert_decision(
        &mut self,
        actor_id: &UserId,
        recipient_id: &UserId,
        liked: bool,
    ) -> Result<Option<bool>, RepositoryError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1), hashtext($2))")
            .bind(actor_id.as_str())
            .bind(recipient_id.as_str())
            .execute(&mut *self.tx)
            .await?;

        let previous: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT liked
            FROM decisions
            WHERE actor_id = $1 AND recipient_id = $2
            FOR UPDATE
            "#,
        )
        .bind(actor_id.as_str())
        .bind(recipient_id.as_str())
        .fetch_optional(&mut *self.tx)
        .await?;

        // The conflict branch leaves sequence_id untouched.
        sqlx::query(
            r#"
            INSERT INTO decisions (actor_id, recipient_id, liked, decided_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (actor_id, recipient_id) DO UPDATE SET
                liked = EXCLUDED.liked,
                decided_at = EXCLUDED.decided_at
            "#,
        )
        .bind(actor_id.as_str())
        .bind(recipient_id.as_str())
        .bind(liked)
        .execute(&mut *self.tx)
        .await?;

        Ok(previous)
    }

    async fn increment_like_count(&mut self, user_id: &UserId) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO like_counters (user_id, like_count)
            VALUES ($1, 1)
            ON CONFLICT (user_id) DO UPDATE SET
                like_count = like_counters.like_count + 1
            "#,
        )
        .bind(user_id.as_str())
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn decrement_like_count(&mut self, user_id: &UserId) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE like_counters
            SET like_count = GREATEST(like_count - 1, 0)
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn has_liked(&mut self, actor_id: &UserId, recipient_id: &UserId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM decisions
                WHERE actor_id = $1
                  AND recipient_id = $2
                  AND liked = TRUE
            )
            "#,
        )
        .bind(actor_id.as_str())
        .bind(recipient_id.as_str())
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(exists)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let this = *self;
        this.tx.commit().await.map_err(|e| {
            error!("Decision transaction commit failed: {}", e);
            RepositoryError::from(e)
        })
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        let this = *self;
        this.tx.rollback().await?;
        Ok(())
    }
}

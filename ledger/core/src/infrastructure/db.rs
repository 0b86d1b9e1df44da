// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Connection Pool
//!
//! Wraps `sqlx::postgres::PgPool` in a thin `Database` newtype that is
//! injected into `PostgresDecisionRepository`.
//!
//! Startup waits for the database to become reachable (containers often
//! start the service before PostgreSQL accepts connections) and creates the
//! ledger tables if they do not exist yet.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** PostgreSQL pool creation, readiness wait and schema bootstrap

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const PING_INTERVAL: Duration = Duration::from_millis(500);
const MAX_PING_WAIT: Duration = Duration::from_secs(5);

/// Ledger tables. Every statement is idempotent.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS decisions (
    sequence_id  BIGSERIAL PRIMARY KEY,
    actor_id     TEXT        NOT NULL,
    recipient_id TEXT        NOT NULL,
    liked        BOOLEAN     NOT NULL,
    decided_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT decisions_pair_key UNIQUE (actor_id, recipient_id)
);

CREATE INDEX IF NOT EXISTS decisions_recipient_liked_idx
    ON decisions (recipient_id, sequence_id)
    WHERE liked;

CREATE TABLE IF NOT EXISTS like_counters (
    user_id    TEXT   PRIMARY KEY,
    like_count BIGINT NOT NULL DEFAULT 0 CHECK (like_count >= 0)
);
"#;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    /// Connect and ping until the database answers or `deadline` elapses.
    pub async fn connect(connection_string: &str, deadline: Duration) -> Result<Self> {
        let started = Instant::now();
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(deadline.min(MAX_PING_WAIT))
            .connect_lazy(connection_string)
            .context("Invalid database connection string")?;

        loop {
            match sqlx::query("SELECT 1").execute(&pool).await {
                Ok(_) => break,
                Err(e) if started.elapsed() < deadline => {
                    debug!("Database not reachable yet: {}", e);
                    tokio::time::sleep(PING_INTERVAL).await;
                }
                Err(e) => {
                    return Err(anyhow::Error::new(e))
                        .with_context(|| format!("Database ping timed out after {:?}", deadline));
                }
            }
        }

        info!("Database connection established");
        Ok(Self { pool })
    }

    /// Create the ledger tables when missing
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .context("Failed to create ledger schema")?;
        Ok(())
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory
//!
//! Turns a configured [`StorageBackend`] into a concrete
//! [`DecisionRepository`]. The PostgreSQL path waits for the database and
//! creates the ledger tables before handing the repository out.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Selects and bootstraps the decision repository backend

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::domain::repository::{DecisionRepository, StorageBackend};
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::postgres_decision::PostgresDecisionRepository;
use crate::infrastructure::repositories::InMemoryDecisionRepository;

/// Creates a DecisionRepository implementation based on the configured backend
pub async fn create_decision_repository(backend: &StorageBackend) -> Result<Arc<dyn DecisionRepository>> {
    match backend {
        StorageBackend::InMemory => {
            info!("Using in-memory decision ledger; data is lost on shutdown");
            Ok(Arc::new(InMemoryDecisionRepository::new()))
        }
        StorageBackend::PostgreSQL(config) => {
            let db = Database::connect(&config.connection_string, config.connect_timeout).await?;
            db.ensure_schema().await?;
            info!("Using PostgreSQL decision ledger");
            Ok(Arc::new(PostgresDecisionRepository::new(db.get_pool().clone())))
        }
    }
}

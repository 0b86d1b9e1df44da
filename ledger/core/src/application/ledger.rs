// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Ledger Service
//!
//! The public operation set of the explore service. Transport adapters (the
//! gRPC server, tests, embedding code) talk to [`LedgerService`]; the
//! standard implementation validates raw request parameters, bounds each
//! call by a deadline and delegates to the Decision Recorder and the
//! Liked-You Query Engine.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::application::decision_recorder::DecisionRecorder;
use crate::application::liked_you::LikedYouQueryEngine;
use crate::domain::decision::UserId;
use crate::domain::pagination::{LikedYouPage, PageRequest, PaginationError};
use crate::domain::repository::{DecisionRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    InvalidToken(#[from] PaginationError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("decision transaction failed: {0}")]
    TransactionFailure(#[source] RepositoryError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store unreachable: {0}")]
    ConnectivityFailure(#[source] RepositoryError),

    #[error("persistence error: {0}")]
    Persistence(#[source] RepositoryError),

    #[error("{operation} exceeded its deadline of {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl LedgerError {
    /// Classify a failed read-path repository call.
    pub(crate) fn from_read(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => LedgerError::NotFound(what),
            RepositoryError::Connectivity(_) => LedgerError::ConnectivityFailure(err),
            RepositoryError::Database(_) => LedgerError::Persistence(err),
        }
    }
}

#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Record a like or pass; returns `true` when the pair now likes each other.
    async fn record_decision(
        &self,
        actor_id: &str,
        recipient_id: &str,
        liked: bool,
    ) -> Result<bool, LedgerError>;

    async fn list_liked_you(
        &self,
        recipient_id: &str,
        page_size: Option<u32>,
        pagination_token: Option<&str>,
    ) -> Result<LikedYouPage, LedgerError>;

    /// Like `list_liked_you`, minus actors the recipient has already liked back.
    async fn list_new_liked_you(
        &self,
        recipient_id: &str,
        page_size: Option<u32>,
        pagination_token: Option<&str>,
    ) -> Result<LikedYouPage, LedgerError>;

    async fn count_liked_you(&self, recipient_id: &str) -> Result<u64, LedgerError>;
}

pub struct StandardLedgerService {
    recorder: DecisionRecorder,
    liked_you: LikedYouQueryEngine,
    operation_timeout: Duration,
}

impl StandardLedgerService {
    pub fn new(repository: Arc<dyn DecisionRepository>, operation_timeout: Duration) -> Self {
        Self {
            recorder: DecisionRecorder::new(repository.clone()),
            liked_you: LikedYouQueryEngine::new(repository),
            operation_timeout,
        }
    }

    async fn with_deadline<T, F>(&self, operation: &'static str, fut: F) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<T, LedgerError>> + Send,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} timed out after {:?}", operation, self.operation_timeout);
                Err(LedgerError::Timeout {
                    operation,
                    timeout: self.operation_timeout,
                })
            }
        }
    }
}

fn user_id(field: &str, value: &str) -> Result<UserId, LedgerError> {
    UserId::new(value).map_err(|e| LedgerError::InvalidArgument(format!("{}: {}", field, e)))
}

#[async_trait]
impl LedgerService for StandardLedgerService {
    async fn record_decision(
        &self,
        actor_id: &str,
        recipient_id: &str,
        liked: bool,
    ) -> Result<bool, LedgerError> {
        let actor_id = user_id("actor_user_id", actor_id)?;
        let recipient_id = user_id("recipient_user_id", recipient_id)?;

        self.with_deadline(
            "record_decision",
            self.recorder.record_decision(&actor_id, &recipient_id, liked),
        )
        .await
    }

    async fn list_liked_you(
        &self,
        recipient_id: &str,
        page_size: Option<u32>,
        pagination_token: Option<&str>,
    ) -> Result<LikedYouPage, LedgerError> {
        let recipient_id = user_id("recipient_user_id", recipient_id)?;
        let page = PageRequest::parse(page_size, pagination_token)?;

        self.with_deadline(
            "list_liked_you",
            self.liked_you.list_liked_you(&recipient_id, &page),
        )
        .await
    }

    async fn list_new_liked_you(
        &self,
        recipient_id: &str,
        page_size: Option<u32>,
        pagination_token: Option<&str>,
    ) -> Result<LikedYouPage, LedgerError> {
        let recipient_id = user_id("recipient_user_id", recipient_id)?;
        let page = PageRequest::parse(page_size, pagination_token)?;

        self.with_deadline(
            "list_new_liked_you",
            self.liked_you.list_new_liked_you(&recipient_id, &page),
        )
        .await
    }

    async fn count_liked_you(&self, recipient_id: &str) -> Result<u64, LedgerError> {
        let recipient_id = user_id("recipient_user_id", recipient_id)?;

        self.with_deadline(
            "count_liked_you",
            self.liked_you.count_liked_you(&recipient_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::Liker;
    use crate::domain::repository::{DecisionTransaction, LikerQuery};
    use crate::infrastructure::repositories::InMemoryDecisionRepository;

    fn service() -> StandardLedgerService {
        StandardLedgerService::new(
            Arc::new(InMemoryDecisionRepository::new()),
            Duration::from_secs(5),
        )
    }

    /// Never answers; used to trip the deadline.
    struct StalledRepository;

    #[async_trait]
    impl DecisionRepository for StalledRepository {
        async fn begin(&self) -> Result<Box<dyn DecisionTransaction>, RepositoryError> {
            std::future::pending().await
        }

        async fn find_likers(&self, _query: &LikerQuery) -> Result<Vec<Liker>, RepositoryError> {
            std::future::pending().await
        }

        async fn like_count(&self, _user_id: &UserId) -> Result<u64, RepositoryError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_empty_ids_rejected() {
        let service = service();

        assert!(matches!(
            service.record_decision("", "b", true).await,
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.record_decision("a", "  ", true).await,
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.list_liked_you("", None, None).await,
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.count_liked_you("").await,
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let service = service();

        let err = service.list_liked_you("r", None, Some("abc")).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidToken(_)));

        let err = service.list_new_liked_you("r", None, Some("abc")).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_operations_time_out() {
        let service = StandardLedgerService::new(Arc::new(StalledRepository), Duration::from_millis(20));

        assert!(matches!(
            service.record_decision("a", "b", true).await,
            Err(LedgerError::Timeout { operation: "record_decision", .. })
        ));
        assert!(matches!(
            service.list_liked_you("b", None, None).await,
            Err(LedgerError::Timeout { .. })
        ));
        assert!(matches!(
            service.count_liked_you("b").await,
            Err(LedgerError::Timeout { .. })
        ));
    }

    #[test]
    fn test_read_error_classification() {
        assert!(matches!(
            LedgerError::from_read(RepositoryError::NotFound("x".into())),
            LedgerError::NotFound(_)
        ));
        assert!(matches!(
            LedgerError::from_read(RepositoryError::Connectivity("x".into())),
            LedgerError::ConnectivityFailure(_)
        ));
        assert!(matches!(
            LedgerError::from_read(RepositoryError::Database("x".into())),
            LedgerError::Persistence(_)
        ));
    }
}

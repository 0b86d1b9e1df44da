// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Liked-You Query Engine
//!
//! Read side of the ledger: paged listings of who liked a recipient, the
//! "new" variant that hides actors the recipient already liked back, and the
//! like counter lookup.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::ledger::LedgerError;
use crate::domain::decision::UserId;
use crate::domain::pagination::{LikedYouPage, PageRequest};
use crate::domain::repository::{DecisionRepository, LikerQuery, RepositoryError};

pub struct LikedYouQueryEngine {
    repository: Arc<dyn DecisionRepository>,
}

impl LikedYouQueryEngine {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_liked_you(
        &self,
        recipient_id: &UserId,
        page: &PageRequest,
    ) -> Result<LikedYouPage, LedgerError> {
        self.list(recipient_id, page, false).await
    }

    pub async fn list_new_liked_you(
        &self,
        recipient_id: &UserId,
        page: &PageRequest,
    ) -> Result<LikedYouPage, LedgerError> {
        self.list(recipient_id, page, true).await
    }

    async fn list(
        &self,
        recipient_id: &UserId,
        page: &PageRequest,
        exclude_mutual: bool,
    ) -> Result<LikedYouPage, LedgerError> {
        let query = LikerQuery {
            recipient_id: recipient_id.clone(),
            after: page.after,
            limit: page.page_size,
            exclude_mutual,
        };

        let likers = self
            .repository
            .find_likers(&query)
            .await
            .map_err(LedgerError::from_read)?;

        let result = LikedYouPage::from_rows(page, likers);
        debug!(
            "Listed {} likers of {} (new_only={}, next={:?})",
            result.likers.len(),
            recipient_id,
            exclude_mutual,
            result.next_pagination_token
        );
        Ok(result)
    }

    /// Current like counter. A user nobody has ever liked has no counter row
    /// and counts as zero.
    pub async fn count_liked_you(&self, recipient_id: &UserId) -> Result<u64, LedgerError> {
        match self.repository.like_count(recipient_id).await {
            Ok(count) => Ok(count),
            Err(RepositoryError::NotFound(_)) => {
                debug!("No like counter for {}, reporting 0", recipient_id);
                Ok(0)
            }
            Err(e) => {
                warn!("Like counter lookup failed for {}: {}", recipient_id, e);
                Err(LedgerError::from_read(e))
            }
        }
    }
}

// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Cursor pagination shared by the liked-you listings.
//!
//! A pagination token is the decimal encoding of the last [`SequenceId`] the
//! caller has seen. A continuation token is only handed out when a page comes
//! back exactly full, so a dataset whose remainder equals the page size costs
//! one extra (empty) round trip.

use crate::domain::decision::{Liker, SequenceId};
use std::num::ParseIntError;
use thiserror::Error;

/// Page size used when the caller omits one or sends zero.
pub const DEFAULT_PAGE_SIZE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("invalid pagination token {token}: {source}")]
    InvalidToken {
        token: String,
        #[source]
        source: ParseIntError,
    },
}

/// Validated pagination parameters for one listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: u32,
    pub after: SequenceId,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            after: SequenceId::START,
        }
    }
}

impl PageRequest {
    /// Normalize raw request parameters.
    ///
    /// An absent or empty token starts from the beginning; negative cursors
    /// are clamped to the start. Anything that is not an integer is rejected.
    pub fn parse(page_size: Option<u32>, token: Option<&str>) -> Result<Self, PaginationError> {
        let mut request = Self::default();

        if let Some(size) = page_size.filter(|s| *s > 0) {
            request.page_size = size;
        }

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let raw: i64 = token.parse().map_err(|source| PaginationError::InvalidToken {
                token: token.to_string(),
                source,
            })?;
            if raw > 0 {
                request.after = SequenceId::from_raw(raw);
            }
        }

        Ok(request)
    }

    /// Continuation token for a page of `returned` rows whose last row has
    /// cursor `last`. `None` signals the end of results.
    pub fn next_token(&self, returned: usize, last: Option<SequenceId>) -> Option<String> {
        if returned != self.page_size as usize {
            return None;
        }
        last.map(|seq| seq.to_string())
    }
}

/// One page of a liked-you listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikedYouPage {
    pub likers: Vec<Liker>,
    pub next_pagination_token: Option<String>,
}

impl LikedYouPage {
    pub fn from_rows(request: &PageRequest, likers: Vec<Liker>) -> Self {
        let last = likers.last().map(|l| l.sequence_id);
        let next_pagination_token = request.next_token(likers.len(), last);
        Self {
            likers,
            next_pagination_token,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next_pagination_token.is_none()
    }
}

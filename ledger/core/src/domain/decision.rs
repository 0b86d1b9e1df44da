// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! # Decision Aggregate
//!
//! A [`Decision`] is the latest like/pass verdict one user (the *actor*) has
//! given another (the *recipient*). There is at most one decision per
//! directional pair; re-deciding overwrites it in place.
//!
//! The per-recipient like counter is a materialized view of these rows. How
//! each decision changes that counter is captured by [`CounterEffect`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Value Objects
// ============================================================================

/// Opaque user identifier supplied by the (already authenticated) caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wrap a caller-supplied identifier, rejecting blank values.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidUserId> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(InvalidUserId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("user id must not be empty")]
pub struct InvalidUserId;

/// Position of a decision row in pagination order.
///
/// Assigned when a pair is first decided and strictly increasing across
/// inserts. It is only a cursor: it carries no wall-clock meaning and a
/// re-decision keeps the value the row already had.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(i64);

impl SequenceId {
    /// Cursor that precedes every stored decision.
    pub const START: SequenceId = SequenceId(0);

    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> i64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Latest decision for one (actor → recipient) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub actor_id: UserId,
    pub recipient_id: UserId,
    pub liked: bool,
    pub sequence_id: SequenceId,
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    pub fn new(actor_id: UserId, recipient_id: UserId, liked: bool, sequence_id: SequenceId) -> Self {
        Self {
            actor_id,
            recipient_id,
            liked,
            sequence_id,
            decided_at: Utc::now(),
        }
    }

    /// Overwrite the verdict, keeping the row's place in pagination order.
    /// Returns the previous verdict.
    pub fn redecide(&mut self, liked: bool) -> bool {
        let previous = self.liked;
        self.liked = liked;
        self.decided_at = Utc::now();
        previous
    }

    pub fn as_liker(&self) -> Liker {
        Liker {
            actor_id: self.actor_id.clone(),
            decided_at: self.decided_at,
            sequence_id: self.sequence_id,
        }
    }
}

/// A user who currently likes some recipient, as returned by liked-you listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Liker {
    pub actor_id: UserId,
    pub decided_at: DateTime<Utc>,
    pub sequence_id: SequenceId,
}

impl Liker {
    /// Seconds since the Unix epoch of the most recent decision.
    pub fn unix_timestamp(&self) -> u64 {
        self.decided_at.timestamp().max(0) as u64
    }
}

// ============================================================================
// Counter transitions
// ============================================================================

/// Change a decision makes to the recipient's like counter.
///
/// | previous | new   | effect    |
/// |----------|-------|-----------|
/// | none     | false | unchanged |
/// | none     | true  | increment |
/// | false    | false | unchanged |
/// | false    | true  | increment |
/// | true     | false | decrement |
/// | true     | true  | unchanged |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEffect {
    Increment,
    Decrement,
    Unchanged,
}

impl CounterEffect {
    pub fn for_transition(previous: Option<bool>, liked: bool) -> Self {
        let was_liked = previous.unwrap_or(false);
        match (was_liked, liked) {
            (false, true) => Self::Increment,
            (true, false) => Self::Decrement,
            _ => Self::Unchanged,
        }
    }
}

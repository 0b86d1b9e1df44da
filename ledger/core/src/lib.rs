// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # explore-core
//!
//! Decision ledger behind the explore service: users like or pass on each
//! other, the ledger keeps a per-recipient like counter consistent with those
//! decisions, detects mutual likes and serves cursor-paginated "liked you"
//! listings.
//!
//! | Layer | Contents |
//! |-------|----------|
//! | [`domain`] | Decisions, pagination, repository traits, configuration |
//! | [`application`] | `LedgerService`, Decision Recorder, Liked-You Query Engine |
//! | [`infrastructure`] | PostgreSQL and in-memory repositories |
//! | [`presentation`] | tonic gRPC server |

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

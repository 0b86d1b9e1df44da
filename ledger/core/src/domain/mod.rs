// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer (`explore-core`)
//!
//! Pure ledger types with no transport concerns.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decision`] | `Decision` aggregate, `UserId` / `SequenceId` value objects, counter transitions |
//! | [`pagination`] | Cursor token parsing and continuation policy |
//! | [`repository`] | Repository traits and `RepositoryError` |
//! | [`config`] | YAML configuration model |

pub mod config;
pub mod decision;
pub mod pagination;
pub mod repository;

// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Application Layer (`explore-core`)
//!
//! Use cases over the decision ledger.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`ledger`] | `LedgerService` facade, `LedgerError`, per-call deadlines |
//! | [`decision_recorder`] | Transactional like/pass recording and mutual detection |
//! | [`liked_you`] | Paged liked-you listings and like counts |
//! | [`repository_factory`] | Backend selection for the decision repository |
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrates ledger use cases over the repository traits

pub mod decision_recorder;
pub mod ledger;
pub mod liked_you;
pub mod repository_factory;

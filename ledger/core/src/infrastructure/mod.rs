// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Infrastructure Layer (`explore-core`)
//!
//! Adapters behind the domain repository traits.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`db`] | PostgreSQL pool bootstrap and schema creation |
//! | [`repositories`] | PostgreSQL and in-memory `DecisionRepository` implementations |
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Storage adapters implementing the domain repository traits

pub mod db;
pub mod repositories;

// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`explore-core`)
//!
//! Translates external requests into `LedgerService` calls. No ledger rules
//! live here.
//!
//! | Module | Transport | Description |
//! |--------|-----------|-------------|
//! | [`grpc`] | gRPC (Tonic) | `explore.v1.ExploreService` server and generated client |

pub mod grpc;

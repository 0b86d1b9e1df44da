// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! gRPC transport for `explore.v1.ExploreService`.

pub mod server;

// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the explore CLI

pub mod config;
pub mod decide;
pub mod likes;
pub mod serve;

pub use self::config::ConfigCommand;
pub use self::decide::DecideArgs;
pub use self::likes::LikesCommand;

use anyhow::{Context, Result};
use tonic::transport::Channel;

use explore_core::presentation::grpc::server::explore_v1::explore_service_client::ExploreServiceClient;

/// Open a client connection to a running explore service
pub(crate) async fn connect(endpoint: &str) -> Result<ExploreServiceClient<Channel>> {
    ExploreServiceClient::connect(endpoint.to_string())
        .await
        .with_context(|| format!("Failed to connect to explore service at {}", endpoint))
}

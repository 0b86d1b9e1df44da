// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Liked-you queries
//!
//! Commands: list, count

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use explore_core::presentation::grpc::server::explore_v1::{
    CountLikedYouRequest, ListLikedYouRequest, ListLikedYouResponse,
};

use super::connect;

#[derive(Subcommand)]
pub enum LikesCommand {
    /// List users who liked RECIPIENT, following pagination tokens
    List {
        #[arg(value_name = "RECIPIENT")]
        recipient: String,

        /// Only likers the recipient has not liked back
        #[arg(long)]
        new: bool,

        /// Likers per page (server default when omitted)
        #[arg(long)]
        page_size: Option<u32>,

        /// Stop after this many pages
        #[arg(long, default_value_t = 10)]
        max_pages: u32,
    },

    /// Show how many users currently like each USER
    Count {
        #[arg(value_name = "USER", required = true)]
        users: Vec<String>,
    },
}

pub async fn handle_command(command: LikesCommand, endpoint: &str) -> Result<()> {
    match command {
        LikesCommand::List {
            recipient,
            new,
            page_size,
            max_pages,
        } => list(endpoint, recipient, new, page_size, max_pages).await,
        LikesCommand::Count { users } => count(endpoint, users).await,
    }
}

/// Token to request the page after `response`, or `None` at the end of results
fn continuation(response: &ListLikedYouResponse) -> Option<String> {
    response
        .next_pagination_token
        .clone()
        .filter(|token| !token.is_empty())
}

async fn list(
    endpoint: &str,
    recipient: String,
    new_only: bool,
    page_size: Option<u32>,
    max_pages: u32,
) -> Result<()> {
    let mut client = connect(endpoint).await?;
    let mut token: Option<String> = None;
    let mut total = 0usize;

    for page_number in 1..=max_pages {
        let request = ListLikedYouRequest {
            recipient_user_id: recipient.clone(),
            pagination_token: token.clone(),
            page_size,
        };

        let response = if new_only {
            client.list_new_liked_you(request).await
        } else {
            client.list_liked_you(request).await
        }
        .context("Liked-you listing failed")?
        .into_inner();

        println!("{}", format!("Page {}:", page_number).bold());
        if response.likers.is_empty() {
            println!("  {}", "(no likers)".dimmed());
        }
        for liker in &response.likers {
            println!("  {}  liked at {}", liker.actor_id, liker.unix_timestamp);
        }
        total += response.likers.len();

        token = continuation(&response);
        if token.is_none() {
            println!("{}", format!("✓ {} liker(s) in total", total).green());
            return Ok(());
        }
    }

    println!(
        "{}",
        format!("Stopped after {} page(s); more results may exist", max_pages).yellow()
    );
    Ok(())
}

async fn count(endpoint: &str, users: Vec<String>) -> Result<()> {
    let mut client = connect(endpoint).await?;

    for user in users {
        let response = client
            .count_liked_you(CountLikedYouRequest {
                recipient_user_id: user.clone(),
            })
            .await
            .with_context(|| format!("CountLikedYou failed for {}", user))?
            .into_inner();

        println!("{}: {}", user.bold(), response.count);
    }

    Ok(())
}

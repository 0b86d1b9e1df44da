// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! `explore decide`: record a like or pass through PutDecision

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use explore_core::presentation::grpc::server::explore_v1::PutDecisionRequest;

use super::connect;

#[derive(Args)]
pub struct DecideArgs {
    /// User making the decision
    #[arg(value_name = "ACTOR")]
    pub actor: String,

    /// User being decided on
    #[arg(value_name = "RECIPIENT")]
    pub recipient: String,

    #[command(flatten)]
    pub verdict: Verdict,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct Verdict {
    /// Like the recipient
    #[arg(long)]
    pub like: bool,

    /// Pass on the recipient
    #[arg(long)]
    pub pass: bool,
}

pub async fn execute(args: DecideArgs, endpoint: &str) -> Result<()> {
    let mut client = connect(endpoint).await?;
    let liked = args.verdict.like;

    let response = client
        .put_decision(PutDecisionRequest {
            actor_user_id: args.actor.clone(),
            recipient_user_id: args.recipient.clone(),
            liked_recipient: liked,
        })
        .await
        .context("PutDecision failed")?
        .into_inner();

    let verb = if liked { "liked" } else { "passed on" };
    println!("{} {} {}", args.actor.bold(), verb, args.recipient.bold());

    if response.mutual_likes {
        println!("{}", "✓ It's a match".green());
    }

    Ok(())
}

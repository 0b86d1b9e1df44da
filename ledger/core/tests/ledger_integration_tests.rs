// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end ledger behavior through `StandardLedgerService` over the
//! in-memory repository.
//!
//! Covers:
//! - idempotent decisions and like/pass round trips
//! - mutual-like detection (likes only, never passes)
//! - pagination order, continuation tokens and termination
//! - the "new" listing excluding liked-back actors
//! - counter consistency under concurrent writes to the same pair

use explore_core::application::ledger::{LedgerError, LedgerService, StandardLedgerService};
use explore_core::domain::pagination::LikedYouPage;
use explore_core::infrastructure::repositories::InMemoryDecisionRepository;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

fn ledger() -> Arc<StandardLedgerService> {
    Arc::new(StandardLedgerService::new(
        Arc::new(InMemoryDecisionRepository::new()),
        Duration::from_secs(5),
    ))
}

fn actor_ids(page: &LikedYouPage) -> Vec<String> {
    page.likers.iter().map(|l| l.actor_id.to_string()).collect()
}

/// Follow continuation tokens to the end, returning every actor and the number of pages fetched.
async fn drain(ledger: &StandardLedgerService, recipient: &str, page_size: u32, new_only: bool) -> (Vec<String>, usize) {
    let mut token: Option<String> = None;
    let mut actors = Vec::new();
    let mut pages = 0;

    loop {
        let page = if new_only {
            ledger.list_new_liked_you(recipient, Some(page_size), token.as_deref()).await
        } else {
            ledger.list_liked_you(recipient, Some(page_size), token.as_deref()).await
        }
        .unwrap();
        pages += 1;
        actors.extend(actor_ids(&page));

        match page.next_pagination_token {
            Some(next) => token = Some(next),
            None => break,
        }
        assert!(pages < 1000, "pagination did not terminate");
    }

    (actors, pages)
}

#[tokio::test]
async fn test_three_likers_two_pages() {
    let ledger = ledger();
    for actor in ["3", "4", "5"] {
        ledger.record_decision(actor, "1", true).await.unwrap();
    }

    let first = ledger.list_liked_you("1", None, None).await.unwrap();
    assert_eq!(actor_ids(&first), vec!["3", "4"]);
    assert_eq!(first.next_pagination_token.as_deref(), Some("2"));

    let second = ledger.list_liked_you("1", None, Some("2")).await.unwrap();
    assert_eq!(actor_ids(&second), vec!["5"]);
    assert!(second.next_pagination_token.is_none());
}

#[tokio::test]
async fn test_repeated_decision_is_idempotent() {
    let ledger = ledger();

    let first = ledger.record_decision("a", "b", true).await.unwrap();
    let second = ledger.record_decision("a", "b", true).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(ledger.count_liked_you("b").await.unwrap(), 1);
    let (actors, _) = drain(&ledger, "b", 10, false).await;
    assert_eq!(actors, vec!["a"]);
}

#[tokio::test]
async fn test_like_then_pass_restores_counter() {
    let ledger = ledger();
    ledger.record_decision("x", "b", true).await.unwrap();
    let before = ledger.count_liked_you("b").await.unwrap();

    ledger.record_decision("a", "b", true).await.unwrap();
    assert_eq!(ledger.count_liked_you("b").await.unwrap(), before + 1);

    ledger.record_decision("a", "b", false).await.unwrap();
    assert_eq!(ledger.count_liked_you("b").await.unwrap(), before);

    let (actors, _) = drain(&ledger, "b", 10, false).await;
    assert_eq!(actors, vec!["x"]);
}

#[tokio::test]
async fn test_mutual_like_detected_on_second_like() {
    let ledger = ledger();

    assert!(!ledger.record_decision("a", "b", true).await.unwrap());
    assert!(ledger.record_decision("b", "a", true).await.unwrap());
}

#[tokio::test]
async fn test_pass_never_reports_match() {
    let ledger = ledger();
    ledger.record_decision("a", "b", true).await.unwrap();
    ledger.record_decision("b", "a", true).await.unwrap();

    assert!(!ledger.record_decision("b", "a", false).await.unwrap());
    assert!(!ledger.record_decision("a", "b", false).await.unwrap());
}

#[tokio::test]
async fn test_count_ignores_passes() {
    let ledger = ledger();
    ledger.record_decision("2", "1", true).await.unwrap();
    ledger.record_decision("3", "1", true).await.unwrap();
    ledger.record_decision("4", "1", true).await.unwrap();
    ledger.record_decision("4", "1", false).await.unwrap();
    ledger.record_decision("5", "1", false).await.unwrap();

    assert_eq!(ledger.count_liked_you("1").await.unwrap(), 2);
    assert_eq!(ledger.count_liked_you("never-liked").await.unwrap(), 0);
}

#[tokio::test]
async fn test_pagination_terminates_and_covers_all_likers() {
    let ledger = ledger();
    let expected: Vec<String> = (0..7).map(|i| format!("actor-{}", i)).collect();
    for actor in &expected {
        ledger.record_decision(actor, "r", true).await.unwrap();
    }
    ledger.record_decision("passer", "r", false).await.unwrap();

    for page_size in [1, 2, 3, 7, 8] {
        let (actors, pages) = drain(&ledger, "r", page_size, false).await;
        assert_eq!(actors, expected, "page_size={}", page_size);
        assert!(pages <= expected.len() / page_size as usize + 1);
    }
}

#[tokio::test]
async fn test_redecision_keeps_position() {
    let ledger = ledger();
    for actor in ["a", "b", "c"] {
        ledger.record_decision(actor, "r", true).await.unwrap();
    }
    ledger.record_decision("a", "r", false).await.unwrap();
    ledger.record_decision("a", "r", true).await.unwrap();

    let (actors, _) = drain(&ledger, "r", 10, false).await;
    assert_eq!(actors, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_new_listing_excludes_liked_back() {
    let ledger = ledger();
    for actor in ["a", "b", "c", "d"] {
        ledger.record_decision(actor, "me", true).await.unwrap();
    }
    ledger.record_decision("me", "b", true).await.unwrap();
    ledger.record_decision("me", "c", false).await.unwrap();

    let (fresh, _) = drain(&ledger, "me", 1, true).await;
    assert_eq!(fresh, vec!["a", "c", "d"]);

    let (all, _) = drain(&ledger, "me", 1, false).await;
    assert_eq!(all, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_liking_back_removes_actor_from_new_listing() {
    let ledger = ledger();
    ledger.record_decision("a", "me", true).await.unwrap();
    ledger.record_decision("b", "me", true).await.unwrap();

    let (before, _) = drain(&ledger, "me", 2, true).await;
    assert_eq!(before, vec!["a", "b"]);

    assert!(ledger.record_decision("me", "a", true).await.unwrap());
    let (after, _) = drain(&ledger, "me", 2, true).await;
    assert_eq!(after, vec!["b"]);

    // Passing again restores the actor to the new listing.
    ledger.record_decision("me", "a", false).await.unwrap();
    let (restored, _) = drain(&ledger, "me", 2, true).await;
    assert_eq!(restored, vec!["a", "b"]);
}

#[tokio::test]
async fn test_malformed_token_rejected() {
    let ledger = ledger();
    ledger.record_decision("a", "r", true).await.unwrap();

    let err = ledger.list_liked_you("r", None, Some("abc")).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidToken(_)));

    let page = ledger.list_liked_you("r", None, Some("-5")).await.unwrap();
    assert_eq!(actor_ids(&page), vec!["a"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_pair_decisions_keep_counter_consistent() {
    let ledger = ledger();

    let tasks = (0..40).map(|i| {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.record_decision("a", "b", i % 3 != 0).await })
    });
    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let (likers, _) = drain(&ledger, "b", 10, false).await;
    let expected = if likers.is_empty() { 0 } else { 1 };
    assert!(likers.len() <= 1);
    assert_eq!(ledger.count_liked_you("b").await.unwrap(), expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_likers_all_counted() {
    let ledger = ledger();

    let tasks = (0..25).map(|i| {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.record_decision(&format!("fan-{}", i), "star", true).await })
    });
    for result in join_all(tasks).await {
        assert!(!result.unwrap().unwrap());
    }

    assert_eq!(ledger.count_liked_you("star").await.unwrap(), 25);
    let (likers, _) = drain(&ledger, "star", 4, false).await;
    assert_eq!(likers.len(), 25);
}

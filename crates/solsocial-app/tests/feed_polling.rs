//! Feed loading, polling and the pending delta.

#![allow(clippy::unwrap_used)]

mod common;

use assert_matches::assert_matches;
use common::Harness;
use solsocial_app::workflows::{
    clear_pending, load_feed, load_more, mark_pending_viewed, merge_pending, poll_feed_once,
    switch_feed,
};
use solsocial_app::{FeedPoller, PollOutcome};
use solsocial_core::types::{FeedItem, FeedKind};
use solsocial_core::SocialError;
use solsocial_testkit::fixtures::feed_items;
use solsocial_testkit::ApiOp;
use std::time::Duration;

fn labels(items: &[FeedItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

async fn loaded(initial: &[&str]) -> Harness {
    let h = Harness::signed_in().await;
    h.api.set_feed(FeedKind::Following, feed_items(initial));
    load_feed(&h.core, FeedKind::Following).await.unwrap();
    h
}

#[tokio::test]
async fn poll_queues_only_unseen_items() {
    let h = loaded(&["A", "B"]).await;
    h.api.set_feed(FeedKind::Following, feed_items(&["A", "B", "C"]));

    let outcome = poll_feed_once(&h.core).await.unwrap();
    assert_eq!(outcome, PollOutcome::Fetched { new_items: 1 });

    let view = h.snapshot().await;
    assert_eq!(labels(view.feed.pending()), vec!["C"]);
    assert_eq!(view.feed.new_count(), 1);
    assert_eq!(labels(view.feed.items()), vec!["A", "B"]);
}

#[tokio::test]
async fn merge_prepends_pending_and_clears_counter() {
    let h = loaded(&["A", "B"]).await;
    h.api.set_feed(FeedKind::Following, feed_items(&["D", "C", "A", "B"]));
    poll_feed_once(&h.core).await.unwrap();

    assert_eq!(merge_pending(&h.core).await, 2);
    let view = h.snapshot().await;
    assert!(view.feed.pending().is_empty());
    assert_eq!(view.feed.new_count(), 0);
    assert_eq!(labels(view.feed.items()), vec!["D", "C", "A", "B"]);
}

#[tokio::test]
async fn mark_viewed_and_clear() {
    let h = loaded(&["A"]).await;
    h.api.set_feed(FeedKind::Following, feed_items(&["B", "A"]));
    poll_feed_once(&h.core).await.unwrap();

    mark_pending_viewed(&h.core).await;
    let view = h.snapshot().await;
    assert_eq!(view.feed.new_count(), 0);
    assert_eq!(labels(view.feed.pending()), vec!["B"]);

    clear_pending(&h.core).await;
    let view = h.snapshot().await;
    assert!(view.feed.pending().is_empty());
    assert_eq!(labels(view.feed.items()), vec!["A"]);
}

#[tokio::test]
async fn polling_is_gated() {
    let h = loaded(&["A"]).await;
    h.api.clear_calls();

    h.set_online(false).await;
    assert_eq!(poll_feed_once(&h.core).await.unwrap(), PollOutcome::Skipped);
    h.set_online(true).await;

    h.sign_out().await;
    assert_eq!(poll_feed_once(&h.core).await.unwrap(), PollOutcome::Skipped);
    h.sign_in("me").await;

    switch_feed(&h.core, FeedKind::Trending).await;
    assert_eq!(poll_feed_once(&h.core).await.unwrap(), PollOutcome::Skipped);

    assert_eq!(h.api.call_count(ApiOp::FetchFeed), 0);

    switch_feed(&h.core, FeedKind::Explore).await;
    assert_matches!(
        poll_feed_once(&h.core).await.unwrap(),
        PollOutcome::Fetched { .. }
    );
}

#[tokio::test]
async fn poll_error_is_stored_then_cleared() {
    let h = loaded(&["A"]).await;
    h.api
        .fail_next(ApiOp::FetchFeed, SocialError::network("timeout"));

    assert!(poll_feed_once(&h.core).await.is_err());
    assert_eq!(h.snapshot().await.feed.poll_error(), Some("timeout"));

    poll_feed_once(&h.core).await.unwrap();
    let view = h.snapshot().await;
    assert_eq!(view.feed.poll_error(), None);
    assert!(view.feed.last_polled_ms().is_some());
}

#[tokio::test]
async fn response_for_switched_feed_is_dropped() {
    let h = loaded(&["A"]).await;
    h.api.set_feed(FeedKind::Following, feed_items(&["B", "A"]));
    h.api.pause(ApiOp::FetchFeed);

    let poll = tokio::spawn({
        let core = h.core.clone();
        async move { poll_feed_once(&core).await }
    });
    assert!(h.api.wait_for_calls(ApiOp::FetchFeed, 2).await);

    assert!(switch_feed(&h.core, FeedKind::Explore).await);
    h.api.resume(ApiOp::FetchFeed);

    assert_eq!(poll.await.unwrap().unwrap(), PollOutcome::Stale);
    let view = h.snapshot().await;
    assert!(view.feed.pending().is_empty());
    assert_eq!(view.feed.new_count(), 0);
    assert_eq!(view.feed.kind(), FeedKind::Explore);
}

#[tokio::test]
async fn switching_feed_discards_pending() {
    let h = loaded(&["A"]).await;
    h.api.set_feed(FeedKind::Following, feed_items(&["B", "A"]));
    poll_feed_once(&h.core).await.unwrap();

    h.api.set_feed(FeedKind::Explore, feed_items(&["X", "Y"]));
    assert_eq!(load_feed(&h.core, FeedKind::Explore).await.unwrap(), 2);

    let view = h.snapshot().await;
    assert_eq!(view.feed.kind(), FeedKind::Explore);
    assert!(view.feed.pending().is_empty());
    assert_eq!(view.feed.new_count(), 0);
    assert_eq!(labels(view.feed.items()), vec!["X", "Y"]);
}

#[tokio::test]
async fn load_more_follows_cursor() {
    let all: Vec<String> = (0..25).map(|i| format!("P{i}")).collect();
    let refs: Vec<&str> = all.iter().map(String::as_str).collect();
    let h = loaded(&refs).await;

    assert_eq!(h.snapshot().await.feed.items().len(), 20);
    assert_eq!(load_more(&h.core).await.unwrap(), 5);
    assert_eq!(h.snapshot().await.feed.items().len(), 25);
    assert_eq!(load_more(&h.core).await.unwrap(), 0);
}

#[tokio::test]
async fn load_failure_is_stored() {
    let h = Harness::signed_in().await;
    h.api
        .fail_next(ApiOp::FetchFeed, SocialError::http_status(502, "bad gateway"));
    assert!(load_feed(&h.core, FeedKind::Explore).await.is_err());
    assert_eq!(h.snapshot().await.feed.load_error(), Some("bad gateway"));
}

#[tokio::test(start_paused = true)]
async fn poller_ticks_until_stopped() {
    let h = loaded(&["A"]).await;
    h.api.set_feed(FeedKind::Following, feed_items(&["B", "A"]));

    let poller = FeedPoller::spawn(h.core.clone(), Duration::from_secs(1));
    assert!(poller.is_running());

    // No tick at spawn time.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(h.api.call_count(ApiOp::FetchFeed), 1);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(labels(h.snapshot().await.feed.pending()), vec!["B"]);
    assert_eq!(h.api.call_count(ApiOp::FetchFeed), 2);

    // Errors do not stop the loop.
    h.api
        .fail_next(ApiOp::FetchFeed, SocialError::network("flaky"));
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(h.snapshot().await.feed.poll_error(), Some("flaky"));
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(h.snapshot().await.feed.poll_error(), None);

    poller.shutdown().await;
    let calls = h.api.call_count(ApiOp::FetchFeed);
    h.api.set_feed(FeedKind::Following, feed_items(&["C", "B", "A"]));
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.api.call_count(ApiOp::FetchFeed), calls);
    assert_eq!(labels(h.snapshot().await.feed.pending()), vec!["B"]);
}

#[tokio::test(start_paused = true)]
async fn dropping_poller_stops_it() {
    let h = loaded(&["A"]).await;
    let poller = FeedPoller::spawn(h.core.clone(), Duration::from_secs(1));
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(h.api.call_count(ApiOp::FetchFeed), 2);

    drop(poller);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.api.call_count(ApiOp::FetchFeed), 2);
}

//! Reaction and share reconciliation.

#![allow(clippy::unwrap_used)]

mod common;

use common::Harness;
use solsocial_app::workflows::{add_reaction, load_reactions, remove_reaction, share_content};
use solsocial_core::types::{ReactionCount, ReactionKind, ReactionRequest, ReactionSummary};
use solsocial_core::SocialError;
use solsocial_testkit::fixtures::content_id;
use solsocial_testkit::ApiOp;

fn fire() -> ReactionRequest {
    ReactionRequest::new(content_id("P"), "fire")
}

fn count(h: &solsocial_app::ViewState, kind: &str) -> Option<(u32, bool)> {
    h.interactions
        .reactions_for(&content_id("P"))
        .and_then(|s| s.get(&ReactionKind::new(kind)))
        .map(|e| (e.count, e.reacted_by_me))
}

#[tokio::test]
async fn load_replaces_summary() {
    let h = Harness::signed_in().await;
    h.api.set_reactions(
        content_id("P"),
        ReactionSummary::from_entries(vec![ReactionCount {
            kind: ReactionKind::new("fire"),
            count: 3,
            reacted_by_me: false,
        }]),
    );
    let summary = load_reactions(&h.core, &content_id("P")).await.unwrap();
    assert_eq!(summary.total(), 3);
    assert_eq!(count(&h.snapshot().await, "fire"), Some((3, false)));
}

#[tokio::test]
async fn add_then_duplicate_add_is_noop() {
    let h = Harness::signed_in().await;

    assert!(add_reaction(&h.core, fire()).await.unwrap());
    assert!(!add_reaction(&h.core, fire()).await.unwrap());

    let view = h.snapshot().await;
    assert_eq!(count(&view, "fire"), Some((1, true)));
    assert_eq!(h.api.call_count(ApiOp::AddReaction), 1);

    // The confirmed record replaced the temporary one.
    let records = view.interactions.reaction_records.get(&content_id("P"));
    assert_eq!(records.len(), 1);
    assert!(!records[0].is_pending);
    assert!(!records[0].id.starts_with("temp-"));
}

#[tokio::test]
async fn failed_add_restores_summary_exactly() {
    let h = Harness::signed_in().await;
    h.api.set_reactions(
        content_id("P"),
        ReactionSummary::from_entries(vec![
            ReactionCount {
                kind: ReactionKind::new("heart"),
                count: 2,
                reacted_by_me: false,
            },
            ReactionCount {
                kind: ReactionKind::new("fire"),
                count: 5,
                reacted_by_me: false,
            },
        ]),
    );
    load_reactions(&h.core, &content_id("P")).await.unwrap();
    let before = h.snapshot().await;

    h.api
        .fail_next(ApiOp::AddReaction, SocialError::network("reset"));
    assert!(add_reaction(&h.core, fire()).await.is_err());

    let after = h.snapshot().await;
    assert_eq!(
        after.interactions.reactions_for(&content_id("P")),
        before.interactions.reactions_for(&content_id("P"))
    );
    assert!(after
        .interactions
        .reaction_records
        .get(&content_id("P"))
        .is_empty());
}

#[tokio::test]
async fn failed_add_on_unseen_content_leaves_no_residue() {
    let h = Harness::signed_in().await;
    let before = h.snapshot().await;
    assert!(before.interactions.reactions_for(&content_id("P")).is_none());

    h.api
        .fail_next(ApiOp::AddReaction, SocialError::network("reset"));
    assert!(add_reaction(&h.core, fire()).await.is_err());

    let after = h.snapshot().await;
    assert!(after.interactions.reactions_for(&content_id("P")).is_none());
    assert!(!after
        .interactions
        .reaction_records
        .contains(&content_id("P")));
    assert_eq!(after, before);
}

#[tokio::test]
async fn remove_decrements_and_drops_empty_entry() {
    let h = Harness::signed_in().await;
    add_reaction(&h.core, fire()).await.unwrap();

    assert!(remove_reaction(&h.core, fire()).await.unwrap());
    let view = h.snapshot().await;
    assert_eq!(count(&view, "fire"), None);
    assert!(view
        .interactions
        .reaction_records
        .get(&content_id("P"))
        .is_empty());

    // Not held any more: no call.
    assert!(!remove_reaction(&h.core, fire()).await.unwrap());
    assert_eq!(h.api.call_count(ApiOp::RemoveReaction), 1);
}

#[tokio::test]
async fn failed_remove_reverts() {
    let h = Harness::signed_in().await;
    add_reaction(&h.core, fire()).await.unwrap();
    let before = h.snapshot().await;

    h.api
        .fail_next(ApiOp::RemoveReaction, SocialError::http_status(500, "boom"));
    assert!(remove_reaction(&h.core, fire()).await.is_err());
    assert_eq!(h.snapshot().await, before);
}

#[tokio::test]
async fn share_increments_and_reverts_on_failure() {
    let h = Harness::signed_in().await;

    let after = share_content(&h.core, &content_id("P")).await.unwrap();
    assert_eq!(after.count, 1);
    assert!(after.shared_by_me);

    let before = h.snapshot().await;
    h.api
        .fail_next(ApiOp::ShareContent, SocialError::network("offline"));
    assert!(share_content(&h.core, &content_id("P")).await.is_err());
    assert_eq!(h.snapshot().await, before);
    assert_eq!(
        h.snapshot().await.interactions.shares_for(&content_id("P")).count,
        1
    );
}

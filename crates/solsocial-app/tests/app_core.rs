//! AppCore construction, change notification and lane behaviour.

#![allow(clippy::unwrap_used)]

mod common;

use common::Harness;
use solsocial_app::workflows::{share_content, toggle_receipt};
use solsocial_app::{AppCore, AppEffects};
use solsocial_core::types::FeedKind;
use solsocial_core::{ClientConfig, SocialError};
use solsocial_testkit::fixtures::{content_id, test_signature};
use solsocial_testkit::{ApiOp, ManualClock, MemoryStorage, MockSocialApi};
use std::sync::Arc;

#[test]
fn invalid_config_is_refused() {
    let mut config = ClientConfig::default();
    config.polling.page_size = 0;
    let effects = AppEffects {
        api: Arc::new(MockSocialApi::new()),
        storage: Arc::new(MemoryStorage::new()),
        time: Arc::new(ManualClock::default()),
    };
    let err = AppCore::new(config, effects).unwrap_err();
    assert!(matches!(err, SocialError::Config { .. }));
}

#[tokio::test]
async fn subscribers_see_revision_changes() {
    let h = Harness::signed_in().await;
    let mut rx = h.core.read().await.subscribe();
    let start = *rx.borrow_and_update();

    toggle_receipt(&h.core, &test_signature(1)).await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert!(*rx.borrow_and_update() > start);
    assert_eq!(h.core.read().await.revision(), *rx.borrow());
}

#[tokio::test]
async fn different_keys_run_concurrently() {
    let h = Harness::signed_in().await;
    h.api.pause(ApiOp::UpdateReceipt);
    h.api.pause(ApiOp::ShareContent);

    let receipt = tokio::spawn({
        let core = h.core.clone();
        async move { toggle_receipt(&core, &test_signature(2)).await }
    });
    let share = tokio::spawn({
        let core = h.core.clone();
        async move { share_content(&core, &content_id("P")).await }
    });

    assert!(h.api.wait_for_calls(ApiOp::UpdateReceipt, 1).await);
    assert!(h.api.wait_for_calls(ApiOp::ShareContent, 1).await);
    assert_eq!(h.api.in_flight(), 2);
    assert_eq!(h.core.read().await.lanes().active_lanes(), 2);

    h.api.resume(ApiOp::UpdateReceipt);
    h.api.resume(ApiOp::ShareContent);
    assert!(receipt.await.unwrap().unwrap());
    assert_eq!(share.await.unwrap().unwrap().count, 1);
    assert_eq!(h.core.read().await.lanes().active_lanes(), 0);
}

#[tokio::test]
async fn session_flags_gate_polling() {
    let h = Harness::with_config(ClientConfig::default());
    {
        let core = h.core.read().await;
        assert!(!core.session().authenticated());
        assert!(core.session().online);
        assert!(!solsocial_app::workflows::polling_enabled(&core));
    }
    h.sign_in("me").await;
    assert!(solsocial_app::workflows::polling_enabled(&*h.core.read().await));
    assert_eq!(h.snapshot().await.feed.kind(), FeedKind::Following);
}

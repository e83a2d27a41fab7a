//! Notification store persistence.

#![allow(clippy::unwrap_used)]

mod common;

use common::Harness;
use solsocial_app::workflows::persistence::{MENTIONS_KEY, NOTIFICATIONS_KEY, UNREAD_COUNT_KEY};
use solsocial_app::workflows::{
    mark_all_read, mark_read, record_mention, record_notification, refresh_notifications,
    restore_persisted,
};
use solsocial_core::types::Notification;
use solsocial_core::ClientConfig;
use solsocial_testkit::fixtures::{test_notification, test_wallet};
use solsocial_testkit::{ApiOp, MockSocialApi};

#[tokio::test]
async fn record_caps_list_and_persists() {
    let h = Harness::signed_in().await;
    for i in 0..60 {
        assert!(record_notification(&h.core, test_notification(&format!("n{i}")))
            .await
            .unwrap());
    }
    assert!(!record_notification(&h.core, test_notification("n59")).await.unwrap());

    let view = h.snapshot().await;
    assert_eq!(view.notifications.notifications().len(), 50);
    assert_eq!(view.notifications.notifications()[0].id, "n59");
    assert_eq!(view.notifications.unread_count(), 60);
    assert_eq!(
        h.storage.keys(),
        vec![NOTIFICATIONS_KEY.to_string(), UNREAD_COUNT_KEY.to_string()]
    );
}

#[tokio::test]
async fn state_survives_restart() {
    let h = Harness::signed_in().await;
    record_notification(&h.core, test_notification("a")).await.unwrap();
    record_notification(&h.core, test_notification("b")).await.unwrap();
    mark_read(&h.core, "a").await.unwrap();
    record_mention(&h.core, test_wallet("alice"), "@alice").await.unwrap();
    let before = h.snapshot().await.notifications;

    let restarted = Harness::with_parts(
        ClientConfig::default(),
        MockSocialApi::new(),
        h.storage.clone(),
    );
    assert_eq!(restore_persisted(&restarted.core).await, 1);
    assert_eq!(restarted.snapshot().await.notifications, before);
}

#[tokio::test]
async fn corrupt_payload_is_ignored() {
    let h = Harness::signed_in().await;
    record_mention(&h.core, test_wallet("bob"), "@bob").await.unwrap();
    h.storage.put_raw(NOTIFICATIONS_KEY, "{not json");
    h.storage.put_raw(UNREAD_COUNT_KEY, "7");

    let restarted = Harness::with_parts(
        ClientConfig::default(),
        MockSocialApi::new(),
        h.storage.clone(),
    );
    assert_eq!(restore_persisted(&restarted.core).await, 7);
    let view = restarted.snapshot().await;
    assert!(view.notifications.notifications().is_empty());
    assert_eq!(view.notifications.mentions().len(), 1);
}

#[tokio::test]
async fn missing_keys_restore_empty() {
    let h = Harness::signed_in().await;
    assert_eq!(restore_persisted(&h.core).await, 0);
    assert_eq!(h.snapshot().await.notifications, Default::default());
}

#[tokio::test]
async fn mark_all_read_zeroes_and_persists() {
    let h = Harness::signed_in().await;
    record_notification(&h.core, test_notification("a")).await.unwrap();
    record_notification(&h.core, test_notification("b")).await.unwrap();

    mark_all_read(&h.core).await.unwrap();
    let view = h.snapshot().await;
    assert_eq!(view.notifications.unread_count(), 0);
    assert!(view.notifications.notifications().iter().all(|n| n.is_read));
    assert_eq!(h.storage.get_raw(UNREAD_COUNT_KEY).unwrap(), b"0".to_vec());
}

#[tokio::test]
async fn mentions_are_capped_most_recent_first() {
    let h = Harness::signed_in().await;
    for i in 0..25 {
        record_mention(&h.core, test_wallet(&format!("u{i}")), format!("@u{i}"))
            .await
            .unwrap();
    }
    record_mention(&h.core, test_wallet("u10"), "@u10").await.unwrap();

    let view = h.snapshot().await;
    let mentions = view.notifications.mentions();
    assert_eq!(mentions.len(), 20);
    assert_eq!(mentions[0].handle, "@u10");
    assert_eq!(mentions[1].handle, "@u24");
    assert_eq!(
        mentions.iter().filter(|m| m.handle == "@u10").count(),
        1
    );
    assert!(h.storage.get_raw(MENTIONS_KEY).is_some());
}

#[tokio::test]
async fn refresh_merges_by_id() {
    let h = Harness::signed_in().await;
    record_notification(&h.core, test_notification("old")).await.unwrap();
    h.api.set_notifications(vec![
        test_notification("new"),
        test_notification("old"),
    ]);

    assert_eq!(refresh_notifications(&h.core).await.unwrap(), 1);
    let view = h.snapshot().await;
    let ids: Vec<_> = view
        .notifications
        .notifications()
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(ids, vec!["new", "old"]);
    assert_eq!(view.notifications.unread_count(), 2);
    assert_eq!(h.api.call_count(ApiOp::FetchNotifications), 1);
}

#[tokio::test]
async fn refresh_applies_server_read_to_held_notification() {
    let h = Harness::signed_in().await;
    record_notification(&h.core, test_notification("a")).await.unwrap();
    record_notification(&h.core, test_notification("b")).await.unwrap();

    let mut read_a = test_notification("a");
    read_a.is_read = true;
    h.api.set_notifications(vec![test_notification("b"), read_a]);

    assert_eq!(refresh_notifications(&h.core).await.unwrap(), 0);
    let view = h.snapshot().await;
    assert_eq!(view.notifications.unread_count(), 1);
    let held_a = view
        .notifications
        .notifications()
        .iter()
        .find(|n| n.id == "a")
        .unwrap();
    assert!(held_a.is_read);

    // The read state is persisted too.
    assert_eq!(h.storage.get_raw(UNREAD_COUNT_KEY).unwrap(), b"1".to_vec());
    let persisted: Vec<Notification> =
        serde_json::from_slice(&h.storage.get_raw(NOTIFICATIONS_KEY).unwrap()).unwrap();
    assert!(persisted.iter().find(|n| n.id == "a").unwrap().is_read);
}

#[tokio::test]
async fn concurrent_records_persist_in_order() {
    let h = Harness::signed_in().await;
    h.storage.pause_writes();

    let core = h.core.clone();
    let first = tokio::spawn(async move {
        record_notification(&core, test_notification("a")).await
    });
    assert!(h.storage.wait_for_writes(1).await);

    let core = h.core.clone();
    let second = tokio::spawn(async move {
        record_notification(&core, test_notification("b")).await
    });
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
    // The second record waits for the first persist to finish.
    assert_eq!(h.storage.writes_started(), 1);
    assert_eq!(h.snapshot().await.notifications.notifications().len(), 1);

    h.storage.resume_writes();
    assert!(first.await.unwrap().unwrap());
    assert!(second.await.unwrap().unwrap());

    let view = h.snapshot().await.notifications;
    let persisted: Vec<Notification> =
        serde_json::from_slice(&h.storage.get_raw(NOTIFICATIONS_KEY).unwrap()).unwrap();
    assert_eq!(persisted, view.notifications());
    let ids: Vec<_> = persisted.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(h.storage.get_raw(UNREAD_COUNT_KEY).unwrap(), b"2".to_vec());
}

#[tokio::test]
async fn storage_failure_is_reported_but_state_kept() {
    let h = Harness::signed_in().await;
    h.storage.fail_writes(true);
    assert!(record_notification(&h.core, test_notification("a")).await.is_err());
    assert_eq!(h.snapshot().await.notifications.notifications().len(), 1);
}

//! Fixture builders.

use solsocial_core::types::{Comment, FeedItem, Notification, NotificationKind};
use solsocial_core::{CommentId, ContentId, ContentRef, ReceiptSignature, WalletAddress};

const BASE58: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// An 88-character base58 string, deterministic per seed.
pub fn test_signature(seed: u8) -> String {
    let mut state = u32::from(seed).wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..88)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            char::from(BASE58[(state % BASE58.len() as u32) as usize])
        })
        .collect()
}

/// Parsed form of [`test_signature`] at the default minimum length.
#[allow(clippy::expect_used)]
pub fn test_receipt_signature(seed: u8) -> ReceiptSignature {
    ReceiptSignature::parse(&test_signature(seed), 32).expect("fixture signature is valid")
}

/// Content id keyed by [`test_signature`].
#[allow(clippy::expect_used)]
pub fn test_content_id(seed: u8) -> ContentId {
    ContentId::canonical(&ContentRef::signature(test_signature(seed)))
        .expect("fixture reference is valid")
}

/// Content id for a short label (`"A"`, `"B"`), keyed as a signature.
#[allow(clippy::expect_used)]
pub fn content_id(label: &str) -> ContentId {
    ContentId::canonical(&ContentRef::signature(label)).expect("label is not blank")
}

/// Wallet address for a label.
pub fn test_wallet(label: &str) -> WalletAddress {
    WalletAddress::new(format!("{label}Wa11et1111111111111111111111111111"))
}

/// Feed item with the given label as its content id.
pub fn feed_item(label: &str) -> FeedItem {
    FeedItem {
        id: content_id(label),
        author: test_wallet("author"),
        author_handle: Some("@author".to_string()),
        text: format!("post {label}"),
        created_at_ms: 1_700_000_000_000,
        comment_count: 0,
        reaction_count: 0,
    }
}

/// Feed items for a list of labels, in order.
pub fn feed_items(labels: &[&str]) -> Vec<FeedItem> {
    labels.iter().map(|label| feed_item(label)).collect()
}

/// Confirmed comment on `content_id`.
pub fn comment(content_id: &ContentId, id: &str) -> Comment {
    Comment {
        id: CommentId::new(id),
        content_id: content_id.clone(),
        parent_comment_id: None,
        author: test_wallet("commenter"),
        text: format!("comment {id}"),
        upvotes: 0,
        downvotes: 0,
        score: 0,
        my_vote: None,
        created_at_ms: 1_700_000_000_000,
        updated_at_ms: None,
        is_edited: false,
        is_pinned: false,
        is_pending: false,
    }
}

/// Unread reply notification.
pub fn test_notification(id: &str) -> Notification {
    Notification {
        id: id.to_string(),
        kind: NotificationKind::Reply,
        actor: test_wallet("actor"),
        content_id: None,
        text: format!("notification {id}"),
        created_at_ms: 1_700_000_000_000,
        is_read: false,
    }
}

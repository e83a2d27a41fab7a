//! JSON wire format of the backend.
//!
//! Every response is wrapped in `{ "success": bool, "data": …, "error": … }`.
//! Field names are camelCase; post references arrive as any mix of
//! `transactionSignature`, `signature` and a numeric or string `postId`, and
//! are canonicalized on the way in.

use serde::{Deserialize, Deserializer, Serialize};
use solsocial_core::types::{
    Comment, FeedItem, FeedPage, Notification, NotificationKind, Reaction, ReactionCount,
    ReactionKind, ReactionSummary, ReceiptAction, VoteDirection,
};
use solsocial_core::{CommentId, ContentId, ContentRef, SocialError, WalletAddress};

/// Response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload. `success == false` is a rejection.
    pub fn into_data(self) -> Result<T, SocialError> {
        if !self.success {
            return Err(SocialError::rejected(
                self.error.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| SocialError::serialization("response envelope has no data"))
    }

    /// Check success without requiring a payload.
    pub fn into_unit(self) -> Result<(), SocialError> {
        if self.success {
            Ok(())
        } else {
            Err(SocialError::rejected(
                self.error.unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// Post reference fields as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePostRef {
    #[serde(default)]
    pub transaction_signature: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub post_id: Option<String>,
}

impl WirePostRef {
    /// Canonical content id.
    pub fn content_id(&self) -> Result<ContentId, SocialError> {
        ContentId::canonical(&ContentRef {
            transaction_signature: self.transaction_signature.clone(),
            signature: self.signature.clone(),
            post_id: self.post_id.clone(),
        })
    }
}

/// Comment record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireComment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub post: WirePostRef,
    #[serde(default, deserialize_with = "string_or_number")]
    pub parent_comment_id: Option<String>,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default)]
    pub my_vote: Option<VoteDirection>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: Option<u64>,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub is_pinned: bool,
}

impl WireComment {
    /// Convert to the domain type, keyed under `content_id`.
    ///
    /// The key the request was made with wins over whatever post reference
    /// the record carries, so a comment lands in the list it was asked for.
    pub fn into_comment(self, content_id: &ContentId) -> Result<Comment, SocialError> {
        let id = self
            .id
            .ok_or_else(|| SocialError::serialization("comment without id"))?;
        if let Ok(reported) = self.post.content_id() {
            if &reported != content_id {
                tracing::debug!(
                    requested = %content_id,
                    %reported,
                    "comment record references the post by another key"
                );
            }
        }
        let content_id = content_id.clone();
        let mut comment = Comment {
            id: CommentId::new(id),
            content_id,
            parent_comment_id: self.parent_comment_id.map(CommentId::new),
            author: WalletAddress::new(self.author),
            text: self.content,
            upvotes: self.upvotes,
            downvotes: self.downvotes,
            score: 0,
            my_vote: self.my_vote,
            created_at_ms: self.created_at,
            updated_at_ms: self.updated_at,
            is_edited: self.is_edited,
            is_pinned: self.is_pinned,
            is_pending: false,
        };
        comment.recompute_score();
        Ok(comment)
    }
}

/// Aggregate reaction entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReactionCount {
    pub reaction_type: String,
    pub count: u32,
    #[serde(default)]
    pub reacted_by_me: bool,
}

impl From<WireReactionCount> for ReactionCount {
    fn from(wire: WireReactionCount) -> Self {
        Self {
            kind: ReactionKind::new(wire.reaction_type),
            count: wire.count,
            reacted_by_me: wire.reacted_by_me,
        }
    }
}

/// Build a summary from wire entries.
pub fn reaction_summary(entries: Vec<WireReactionCount>) -> ReactionSummary {
    ReactionSummary::from_entries(entries.into_iter().map(ReactionCount::from).collect())
}

/// Stored reaction record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub post: WirePostRef,
    pub reaction_type: String,
    pub wallet: String,
    #[serde(default)]
    pub created_at: u64,
}

impl WireReaction {
    /// Convert, keyed under the content the request was made for.
    pub fn into_reaction(self, content_id: &ContentId) -> Result<Reaction, SocialError> {
        Ok(Reaction {
            id: self
                .id
                .ok_or_else(|| SocialError::serialization("reaction without id"))?,
            content_id: content_id.clone(),
            kind: ReactionKind::new(self.reaction_type),
            reactor: WalletAddress::new(self.wallet),
            created_at_ms: self.created_at,
            is_pending: false,
        })
    }
}

/// Feed post.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePost {
    #[serde(flatten)]
    pub post: WirePostRef,
    pub author: String,
    #[serde(default)]
    pub author_handle: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub reaction_count: u32,
}

impl WirePost {
    /// Convert to a feed item.
    pub fn into_item(self) -> Result<FeedItem, SocialError> {
        Ok(FeedItem {
            id: self.post.content_id()?,
            author: WalletAddress::new(self.author),
            author_handle: self.author_handle,
            text: self.content,
            created_at_ms: self.created_at,
            comment_count: self.comment_count,
            reaction_count: self.reaction_count,
        })
    }
}

/// Feed page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFeedPage {
    #[serde(default)]
    pub posts: Vec<WirePost>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl WireFeedPage {
    /// Convert, dropping posts without any usable reference.
    pub fn into_page(self) -> FeedPage {
        let items = self
            .posts
            .into_iter()
            .filter_map(|post| match post.into_item() {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping feed post without identifier");
                    None
                }
            })
            .collect();
        FeedPage {
            items,
            next_cursor: self.next_cursor,
        }
    }
}

/// Notification record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNotification {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub actor: String,
    #[serde(flatten)]
    pub post: WirePostRef,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub read: bool,
}

impl WireNotification {
    /// Convert to the domain type.
    pub fn into_notification(self) -> Result<Notification, SocialError> {
        Ok(Notification {
            id: self
                .id
                .ok_or_else(|| SocialError::serialization("notification without id"))?,
            kind: self.kind,
            actor: WalletAddress::new(self.actor),
            content_id: self.post.content_id().ok(),
            text: self.message,
            created_at_ms: self.created_at,
            is_read: self.read,
        })
    }
}

/// Receipt status payload.
#[derive(Debug, Deserialize)]
pub struct WireReceiptStatus {
    pub receipted: bool,
}

// ─── Request bodies ──────────────────────────────────────────

/// `POST /api/comments`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentBody<'a> {
    pub content_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<&'a str>,
    pub content: &'a str,
}

/// `POST /api/comments/{id}/vote`
#[derive(Debug, Serialize)]
pub struct VoteBody {
    pub vote: Option<VoteDirection>,
}

/// `POST /api/comments/{id}/pin`
#[derive(Debug, Serialize)]
pub struct PinBody {
    pub pinned: bool,
}

/// `POST|DELETE /api/reactions`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionBody<'a> {
    pub content_id: &'a str,
    pub reaction_type: &'a str,
}

/// `POST /api/receipts`
#[derive(Debug, Serialize)]
pub struct ReceiptBody<'a> {
    pub signature: &'a str,
    pub action: ReceiptAction,
}

//! Comment types

use crate::identifiers::{CommentId, ContentId, WalletAddress};
use serde::{Deserialize, Serialize};

/// Direction of a comment vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// Upvote
    Up,
    /// Downvote
    Down,
}

impl VoteDirection {
    /// Wire label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// A comment on a piece of content, or a reply to another comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier (`temp-…` while optimistic)
    pub id: CommentId,
    /// Content this comment belongs to
    pub content_id: ContentId,
    /// Comment being replied to
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,
    /// Author wallet
    pub author: WalletAddress,
    /// Body text
    pub text: String,
    /// Upvote counter
    #[serde(default)]
    pub upvotes: u32,
    /// Downvote counter
    #[serde(default)]
    pub downvotes: u32,
    /// `upvotes - downvotes`
    #[serde(default)]
    pub score: i64,
    /// The current user's vote
    #[serde(default)]
    pub my_vote: Option<VoteDirection>,
    /// Creation time (ms since epoch)
    pub created_at_ms: u64,
    /// Last edit time (ms since epoch)
    #[serde(default)]
    pub updated_at_ms: Option<u64>,
    /// Whether the text was edited after posting
    #[serde(default)]
    pub is_edited: bool,
    /// Whether the comment is pinned to the top of its list
    #[serde(default)]
    pub is_pinned: bool,
    /// Set only on local temporaries awaiting confirmation
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_pending: bool,
}

impl Comment {
    /// Build the local temporary shown while a create request is in flight.
    pub fn temporary(request: &CreateCommentRequest, author: WalletAddress, now_ms: u64) -> Self {
        Self {
            id: CommentId::temporary(),
            content_id: request.content_id.clone(),
            parent_comment_id: request.parent_comment_id.clone(),
            author,
            text: request.text.clone(),
            upvotes: 0,
            downvotes: 0,
            score: 0,
            my_vote: None,
            created_at_ms: now_ms,
            updated_at_ms: None,
            is_edited: false,
            is_pinned: false,
            is_pending: true,
        }
    }

    /// Apply a vote tap from the current user.
    ///
    /// Tapping the direction already held clears the vote; tapping the other
    /// direction moves it. Returns the resulting vote marker.
    pub fn apply_vote(&mut self, direction: VoteDirection) -> Option<VoteDirection> {
        if let Some(previous) = self.my_vote.take() {
            self.retract(previous);
            if previous == direction {
                self.recompute_score();
                return None;
            }
        }
        match direction {
            VoteDirection::Up => self.upvotes = self.upvotes.saturating_add(1),
            VoteDirection::Down => self.downvotes = self.downvotes.saturating_add(1),
        }
        self.my_vote = Some(direction);
        self.recompute_score();
        self.my_vote
    }

    fn retract(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::Up => self.upvotes = self.upvotes.saturating_sub(1),
            VoteDirection::Down => self.downvotes = self.downvotes.saturating_sub(1),
        }
    }

    /// Recompute `score` from the counters.
    pub fn recompute_score(&mut self) {
        self.score = i64::from(self.upvotes) - i64::from(self.downvotes);
    }
}

/// Request to create a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    /// Content being commented on
    pub content_id: ContentId,
    /// Comment being replied to
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,
    /// Body text
    pub text: String,
}

impl CreateCommentRequest {
    /// Top-level comment on a piece of content.
    pub fn new(content_id: ContentId, text: impl Into<String>) -> Self {
        Self {
            content_id,
            parent_comment_id: None,
            text: text.into(),
        }
    }

    /// Mark this request as a reply.
    #[must_use]
    pub fn replying_to(mut self, parent: CommentId) -> Self {
        self.parent_comment_id = Some(parent);
        self
    }
}

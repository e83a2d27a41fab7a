//! Backend API effect.
//!
//! One method per backend call the stores make. Implementations return typed
//! [`SocialError`]s; they never touch local state.

use crate::errors::SocialError;
use crate::identifiers::{CommentId, ContentId, ReceiptSignature};
use crate::types::{
    Comment, CreateCommentRequest, FeedKind, FeedPage, Notification, Reaction, ReactionRequest,
    ReactionSummary, ReceiptAck, ReceiptAction, VoteDirection,
};
use async_trait::async_trait;

/// The social backend as seen by the client stores.
#[async_trait]
pub trait SocialApiEffects: Send + Sync {
    // ─── Comments ────────────────────────────────────────────

    /// Fetch the comment list for a piece of content.
    async fn fetch_comments(&self, content_id: &ContentId) -> Result<Vec<Comment>, SocialError>;

    /// Create a comment, returning the server-confirmed record.
    async fn create_comment(&self, request: &CreateCommentRequest)
        -> Result<Comment, SocialError>;

    /// Set the current user's vote on a comment (`None` clears it).
    async fn vote_comment(
        &self,
        comment_id: &CommentId,
        vote: Option<VoteDirection>,
    ) -> Result<(), SocialError>;

    /// Pin or unpin a comment.
    async fn set_comment_pinned(
        &self,
        comment_id: &CommentId,
        pinned: bool,
    ) -> Result<(), SocialError>;

    // ─── Reactions & shares ──────────────────────────────────

    /// Fetch the reaction summary for a piece of content.
    async fn fetch_reactions(&self, content_id: &ContentId)
        -> Result<ReactionSummary, SocialError>;

    /// Add the current user's reaction, returning the stored record.
    async fn add_reaction(&self, request: &ReactionRequest) -> Result<Reaction, SocialError>;

    /// Remove the current user's reaction.
    async fn remove_reaction(&self, request: &ReactionRequest) -> Result<(), SocialError>;

    /// Record a share of a piece of content.
    async fn share_content(&self, content_id: &ContentId) -> Result<(), SocialError>;

    // ─── Receipts ────────────────────────────────────────────

    /// Add or remove a receipt.
    async fn update_receipt(
        &self,
        signature: &ReceiptSignature,
        action: ReceiptAction,
    ) -> Result<ReceiptAck, SocialError>;

    /// Authoritative receipt state for a signature.
    async fn receipt_status(&self, signature: &ReceiptSignature) -> Result<bool, SocialError>;

    // ─── Feeds & notifications ───────────────────────────────

    /// Fetch a feed page. `cursor == None` is the latest page.
    async fn fetch_feed(
        &self,
        kind: FeedKind,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<FeedPage, SocialError>;

    /// Fetch the most recent notifications.
    async fn fetch_notifications(&self, limit: u32) -> Result<Vec<Notification>, SocialError>;
}

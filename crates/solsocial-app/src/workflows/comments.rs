//! Comments Workflow - Portable Business Logic
//!
//! Loading, creating, voting on and pinning comments. Every mutation applies
//! an [`OptimisticOp`] first, publishes it, and reverts it if the backend
//! call fails.

use crate::optimistic::{LaneKey, OptimisticOp};
use crate::workflows::state_helpers::{handles, read_views, rollback, with_views};
use crate::AppCore;
use async_lock::RwLock;
use solsocial_core::types::{Comment, CreateCommentRequest, VoteDirection};
use solsocial_core::{CommentId, ContentId, SocialError};
use std::sync::Arc;

/// Replace the comment list for a piece of content with the server's list.
///
/// **What it does**: Fetches comments and replaces the held list; clears the
/// stored error for the content.
/// **Returns**: Number of comments loaded.
/// **Signal pattern**: On failure the held list is left alone and the error
/// is stored for display.
pub async fn load_comments(
    app_core: &Arc<RwLock<AppCore>>,
    content_id: &ContentId,
) -> Result<usize, SocialError> {
    let h = handles(app_core).await;
    let _lane = h.lane(LaneKey::Content(content_id.clone())).await;

    match h.api.fetch_comments(content_id).await {
        Ok(mut comments) => {
            for comment in &mut comments {
                comment.content_id = content_id.clone();
            }
            let count = comments.len();
            with_views(app_core, |views| {
                views.interactions.comments.replace(content_id.clone(), comments);
                views.interactions.clear_comment_error(content_id);
            })
            .await;
            tracing::debug!(content_id = %content_id, count, "comments loaded");
            Ok(count)
        }
        Err(error) => {
            tracing::warn!(content_id = %content_id, error = %error, "failed to load comments");
            with_views(app_core, |views| {
                views
                    .interactions
                    .set_comment_error(content_id.clone(), error.user_message());
            })
            .await;
            Err(error)
        }
    }
}

/// Post a comment (or reply).
///
/// **What it does**: Validates the text, inserts a pending `temp-…` comment at
/// the head of the list and publishes it, then calls the backend.
/// **Returns**: The confirmed comment, which has taken the temporary's place.
/// **Signal pattern**: On failure the temporary is removed and the error is
/// stored per content id. No retry.
pub async fn create_comment(
    app_core: &Arc<RwLock<AppCore>>,
    request: CreateCommentRequest,
) -> Result<Comment, SocialError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(SocialError::invalid("Comment text cannot be empty"));
    }
    let request = CreateCommentRequest {
        text: text.to_string(),
        ..request
    };

    let h = handles(app_core).await;
    let author = h.require_wallet("comment")?;
    let _lane = h.lane(LaneKey::Content(request.content_id.clone())).await;

    let temporary = Comment::temporary(&request, author, h.now_ms);
    let temp_id = temporary.id.clone();
    let op = with_views(app_core, |views| OptimisticOp::insert_comment(views, temporary)).await;
    tracing::debug!(content_id = %request.content_id, temp_id = temp_id.as_str(), "optimistic comment inserted");

    match h.api.create_comment(&request).await {
        Ok(mut confirmed) => {
            confirmed.content_id = request.content_id.clone();
            with_views(app_core, |views| {
                views
                    .interactions
                    .confirm_comment(&request.content_id, &temp_id, confirmed.clone());
                views.interactions.clear_comment_error(&request.content_id);
            })
            .await;
            tracing::debug!(
                content_id = %request.content_id,
                comment_id = confirmed.id.as_str(),
                "comment confirmed"
            );
            Ok(confirmed)
        }
        Err(error) => {
            with_views(app_core, |views| {
                views
                    .interactions
                    .set_comment_error(request.content_id.clone(), error.user_message());
            })
            .await;
            rollback(app_core, op, error).await
        }
    }
}

/// Vote on a comment.
///
/// **What it does**: Tapping the held direction clears the vote; tapping the
/// other moves it. Counters and score update immediately.
/// **Returns**: The resulting vote marker.
/// **Signal pattern**: Counters revert exactly on failure.
pub async fn vote_comment(
    app_core: &Arc<RwLock<AppCore>>,
    comment_id: &CommentId,
    direction: VoteDirection,
) -> Result<Option<VoteDirection>, SocialError> {
    if comment_id.is_temporary() {
        return Err(SocialError::invalid(
            "Comment is still being posted; try again in a moment",
        ));
    }
    let h = handles(app_core).await;
    h.require_wallet("vote")?;
    let _lane = h.lane(LaneKey::Comment(comment_id.clone())).await;

    let (op, vote) = with_views(app_core, |views| {
        OptimisticOp::vote(views, comment_id, direction)
    })
    .await
    .ok_or_else(|| SocialError::not_found(format!("Comment {} not found", comment_id.as_str())))?;
    tracing::debug!(comment_id = comment_id.as_str(), vote = ?vote, "optimistic vote applied");

    match h.api.vote_comment(comment_id, vote).await {
        Ok(()) => Ok(vote),
        Err(error) => rollback(app_core, op, error).await,
    }
}

/// Pin or unpin a comment.
///
/// **What it does**: Pinning moves the comment to the head of its list and
/// flags it; unpinning clears the flag in place.
/// **Signal pattern**: Original position and flag are restored on failure.
pub async fn pin_comment(
    app_core: &Arc<RwLock<AppCore>>,
    comment_id: &CommentId,
    pinned: bool,
) -> Result<(), SocialError> {
    if comment_id.is_temporary() {
        return Err(SocialError::invalid("Comment is still being posted"));
    }
    let h = handles(app_core).await;
    h.require_wallet("pin comments")?;

    let content_id = read_views(app_core, |views| {
        views
            .interactions
            .comments
            .locate(|c| &c.id == comment_id)
            .map(|(content_id, _)| content_id)
    })
    .await
    .ok_or_else(|| SocialError::not_found(format!("Comment {} not found", comment_id.as_str())))?;
    let _lane = h.lane(LaneKey::Content(content_id)).await;

    // Re-located under the lane: the list may have changed while waiting.
    let op = with_views(app_core, |views| OptimisticOp::pin(views, comment_id, pinned))
        .await
        .ok_or_else(|| {
            SocialError::not_found(format!("Comment {} not found", comment_id.as_str()))
        })?;
    tracing::debug!(comment_id = comment_id.as_str(), pinned, "optimistic pin applied");

    match h.api.set_comment_pinned(comment_id, pinned).await {
        Ok(()) => Ok(()),
        Err(error) => rollback(app_core, op, error).await,
    }
}

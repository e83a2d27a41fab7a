//! Reactions & Shares Workflow - Portable Business Logic

use crate::optimistic::{LaneKey, OptimisticOp};
use crate::workflows::state_helpers::{handles, rollback, with_views};
use crate::AppCore;
use async_lock::RwLock;
use solsocial_core::types::{ReactionRequest, ReactionSummary, ShareSummary};
use solsocial_core::{ContentId, SocialError};
use std::sync::Arc;

/// Replace the reaction summary for a piece of content with the server's.
pub async fn load_reactions(
    app_core: &Arc<RwLock<AppCore>>,
    content_id: &ContentId,
) -> Result<ReactionSummary, SocialError> {
    let h = handles(app_core).await;
    let _lane = h.lane(LaneKey::Content(content_id.clone())).await;

    let summary = h.api.fetch_reactions(content_id).await.map_err(|error| {
        tracing::warn!(content_id = %content_id, error = %error, "failed to load reactions");
        error
    })?;
    with_views(app_core, |views| {
        views
            .interactions
            .reactions
            .insert(content_id.clone(), summary.clone());
    })
    .await;
    Ok(summary)
}

/// React to a piece of content.
///
/// **What it does**: Counts the user's reaction immediately and holds a
/// temporary record; the confirmed record replaces it.
/// **Returns**: `false` when the user already held this reaction (no call made).
/// **Signal pattern**: The summary entry is restored exactly on failure.
pub async fn add_reaction(
    app_core: &Arc<RwLock<AppCore>>,
    request: ReactionRequest,
) -> Result<bool, SocialError> {
    let h = handles(app_core).await;
    let reactor = h.require_wallet("react")?;
    let _lane = h.lane(LaneKey::Content(request.content_id.clone())).await;

    let Some(op) = with_views(app_core, |views| {
        OptimisticOp::add_reaction(views, &request, reactor, h.now_ms)
    })
    .await
    else {
        tracing::debug!(content_id = %request.content_id, kind = %request.kind, "reaction already held");
        return Ok(false);
    };

    match h.api.add_reaction(&request).await {
        Ok(confirmed) => {
            if let OptimisticOp::AddReaction { record_id, .. } = &op {
                with_views(app_core, |views| {
                    views.interactions.reaction_records.replace_or_push(
                        request.content_id.clone(),
                        |r| &r.id == record_id,
                        confirmed,
                    );
                })
                .await;
            }
            Ok(true)
        }
        Err(error) => rollback(app_core, op, error).await,
    }
}

/// Withdraw a reaction.
///
/// **What it does**: Decrements the entry (dropping it at zero), clears
/// `reacted_by_me` and drops the user's record.
/// **Returns**: `false` when the user did not hold this reaction (no call made).
/// **Signal pattern**: Entry and record are restored on failure.
pub async fn remove_reaction(
    app_core: &Arc<RwLock<AppCore>>,
    request: ReactionRequest,
) -> Result<bool, SocialError> {
    let h = handles(app_core).await;
    h.require_wallet("react")?;
    let _lane = h.lane(LaneKey::Content(request.content_id.clone())).await;

    let Some(op) = with_views(app_core, |views| {
        OptimisticOp::remove_reaction(views, &request, h.wallet.as_ref())
    })
    .await
    else {
        tracing::debug!(content_id = %request.content_id, kind = %request.kind, "reaction not held");
        return Ok(false);
    };

    match h.api.remove_reaction(&request).await {
        Ok(()) => Ok(true),
        Err(error) => rollback(app_core, op, error).await,
    }
}

/// Share a piece of content.
///
/// **What it does**: Increments the share counter and marks it shared by the
/// user. Repeat shares count again.
/// **Returns**: The counter after the share.
pub async fn share_content(
    app_core: &Arc<RwLock<AppCore>>,
    content_id: &ContentId,
) -> Result<ShareSummary, SocialError> {
    let h = handles(app_core).await;
    h.require_wallet("share")?;
    let _lane = h.lane(LaneKey::Content(content_id.clone())).await;

    let (op, after) = with_views(app_core, |views| {
        let op = OptimisticOp::share(views, content_id);
        (op, views.interactions.shares_for(content_id))
    })
    .await;

    match h.api.share_content(content_id).await {
        Ok(()) => Ok(after),
        Err(error) => rollback(app_core, op, error).await,
    }
}

//! Feed Workflow - Portable Business Logic
//!
//! Loading and paginating the active feed, plus the polling tick that finds
//! new posts and queues them as a pending delta.
//!
//! Responses are checked against the feed generation captured before the
//! request. A response for a feed the user has since switched away from is
//! dropped rather than applied.

use crate::workflows::state_helpers::{read_views, with_views};
use crate::AppCore;
use async_lock::RwLock;
use solsocial_core::types::FeedKind;
use solsocial_core::SocialError;
use std::sync::Arc;

/// Result of one polling tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Polling is disabled right now (signed out, offline or unpolled feed).
    Skipped,
    /// The feed changed while the request was in flight; result dropped.
    Stale,
    /// The tick completed.
    Fetched {
        /// Items newly queued as pending
        new_items: usize,
    },
}

/// Whether polling should run: signed in, online, and the feed kind supports it.
pub fn polling_enabled(core: &AppCore) -> bool {
    let session = core.session();
    session.authenticated() && session.online && core.read(|views| views.feed.kind().supports_polling())
}

/// Load the first page of a feed, making it the active feed.
///
/// **What it does**: Switching kind discards the pending delta. The main list
/// is replaced by the fetched page.
/// **Returns**: Number of items loaded (0 if the result went stale).
/// **Signal pattern**: Failures are stored as the feed's load error.
pub async fn load_feed(app_core: &Arc<RwLock<AppCore>>, kind: FeedKind) -> Result<usize, SocialError> {
    let (api, page_size) = {
        let core = app_core.read().await;
        (core.api(), core.config().polling.page_size)
    };
    let generation = with_views(app_core, |views| {
        if views.feed.switch_kind(kind) {
            tracing::info!(feed = %kind, "switched feed; pending items discarded");
        }
        views.feed.generation()
    })
    .await;

    match api.fetch_feed(kind, None, page_size).await {
        Ok(page) => {
            let count = page.items.len();
            let applied = with_views(app_core, |views| {
                if views.feed.generation() != generation || views.feed.kind() != kind {
                    return false;
                }
                views.feed.replace_items(page);
                true
            })
            .await;
            if applied {
                tracing::debug!(feed = %kind, count, "feed loaded");
                Ok(count)
            } else {
                tracing::debug!(feed = %kind, "feed load went stale");
                Ok(0)
            }
        }
        Err(error) => {
            tracing::warn!(feed = %kind, error = %error, "failed to load feed");
            with_views(app_core, |views| {
                if views.feed.generation() == generation {
                    views.feed.set_load_error(error.user_message());
                }
            })
            .await;
            Err(error)
        }
    }
}

/// Load the next page of the active feed.
///
/// **Returns**: Number of items appended; `0` when there is no further page.
pub async fn load_more(app_core: &Arc<RwLock<AppCore>>) -> Result<usize, SocialError> {
    let (api, page_size) = {
        let core = app_core.read().await;
        (core.api(), core.config().polling.page_size)
    };
    let (kind, generation, cursor) = read_views(app_core, |views| {
        (
            views.feed.kind(),
            views.feed.generation(),
            views.feed.next_cursor().map(str::to_string),
        )
    })
    .await;
    let Some(cursor) = cursor else {
        return Ok(0);
    };

    match api.fetch_feed(kind, Some(&cursor), page_size).await {
        Ok(page) => Ok(with_views(app_core, |views| {
            if views.feed.generation() != generation {
                return 0;
            }
            views.feed.append_page(page)
        })
        .await),
        Err(error) => {
            tracing::warn!(feed = %kind, error = %error, "failed to load next page");
            with_views(app_core, |views| views.feed.set_load_error(error.user_message())).await;
            Err(error)
        }
    }
}

/// Make `kind` the active feed without loading it.
///
/// Returns `false` when it already was.
pub async fn switch_feed(app_core: &Arc<RwLock<AppCore>>, kind: FeedKind) -> bool {
    with_views(app_core, |views| views.feed.switch_kind(kind)).await
}

/// Run one polling tick.
///
/// **What it does**: Fetches the latest page of the active feed and queues
/// every item whose id is not already held (main list or pending), in
/// backend order. Nothing is merged into the main list.
/// **Returns**: What happened. A failed fetch is stored as the poll error and
/// returned; the poller carries on at the next tick.
pub async fn poll_feed_once(app_core: &Arc<RwLock<AppCore>>) -> Result<PollOutcome, SocialError> {
    let (api, page_size, kind, generation) = {
        let core = app_core.read().await;
        if !polling_enabled(&core) {
            return Ok(PollOutcome::Skipped);
        }
        let (kind, generation) = core.read(|views| (views.feed.kind(), views.feed.generation()));
        (core.api(), core.config().polling.page_size, kind, generation)
    };

    let result = api.fetch_feed(kind, None, page_size).await;

    let core = app_core.read().await;
    let now_ms = core.now_ms();
    core.update(|views| {
        if views.feed.generation() != generation || views.feed.kind() != kind {
            tracing::debug!(feed = %kind, "poll response went stale");
            return Ok(PollOutcome::Stale);
        }
        match result {
            Ok(page) => {
                let new_items = views.feed.apply_poll(page.items, now_ms);
                if new_items > 0 {
                    tracing::debug!(feed = %kind, new_items, "new posts queued");
                }
                Ok(PollOutcome::Fetched { new_items })
            }
            Err(error) => {
                tracing::warn!(feed = %kind, error = %error, "feed poll failed");
                views.feed.set_poll_error(error.user_message());
                Err(error)
            }
        }
    })
}

/// Move the pending delta to the head of the main list.
///
/// **Returns**: How many items were merged. The counter is zero afterwards.
pub async fn merge_pending(app_core: &Arc<RwLock<AppCore>>) -> usize {
    with_views(app_core, |views| views.feed.merge_pending()).await
}

/// Discard the pending delta.
pub async fn clear_pending(app_core: &Arc<RwLock<AppCore>>) {
    with_views(app_core, |views| views.feed.clear_pending()).await;
}

/// Hide the "new posts" counter; the pending items stay queued.
pub async fn mark_pending_viewed(app_core: &Arc<RwLock<AppCore>>) {
    with_views(app_core, |views| views.feed.mark_viewed()).await;
}

//! Per-key mutation lanes.
//!
//! Two mutations on the same key (a rapid double tap on a receipt, two votes
//! on one comment) run one after the other: the second waits for the first to
//! finish its backend call and any revert. Mutations on different keys run
//! concurrently.

use async_lock::{Mutex, MutexGuardArc};
use solsocial_core::{CommentId, ContentId, ReceiptSignature};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a mutation is serialized on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LaneKey {
    /// Comment list, reactions and shares of one piece of content
    Content(ContentId),
    /// Votes on one comment
    Comment(CommentId),
    /// Receipt flag of one signature
    Receipt(ReceiptSignature),
    /// The persisted notification list, counter and mentions
    Notifications,
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content(id) => write!(f, "content:{id}"),
            Self::Comment(id) => write!(f, "comment:{}", id.as_str()),
            Self::Receipt(sig) => write!(f, "receipt:{sig}"),
            Self::Notifications => f.write_str("notifications"),
        }
    }
}

/// Held while a mutation runs. Dropping it lets the next one in.
pub struct LaneGuard {
    key: LaneKey,
    _guard: MutexGuardArc<()>,
}

impl LaneGuard {
    /// The lane this guard holds.
    pub fn key(&self) -> &LaneKey {
        &self.key
    }
}

impl fmt::Debug for LaneGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaneGuard").field("key", &self.key).finish()
    }
}

/// Registry of lanes, created on demand and pruned when idle.
#[derive(Default)]
pub struct MutationLanes {
    lanes: parking_lot::Mutex<HashMap<LaneKey, Arc<Mutex<()>>>>,
}

impl MutationLanes {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `key`.
    pub async fn acquire(&self, key: LaneKey) -> LaneGuard {
        let lane = {
            let mut lanes = self.lanes.lock();
            // Only the map holds an idle lane.
            lanes.retain(|_, lane| Arc::strong_count(lane) > 1);
            lanes.entry(key.clone()).or_default().clone()
        };
        let guard = lane.lock_arc().await;
        LaneGuard { key, _guard: guard }
    }

    /// Lanes currently held or awaited.
    pub fn active_lanes(&self) -> usize {
        self.lanes
            .lock()
            .values()
            .filter(|lane| Arc::strong_count(lane) > 1)
            .count()
    }
}

impl fmt::Debug for MutationLanes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationLanes")
            .field("active", &self.active_lanes())
            .finish()
    }
}

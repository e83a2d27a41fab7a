//! Reaction and share types

use crate::identifiers::{ContentId, WalletAddress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reaction type, e.g. `"fire"` or an emoji.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionKind(String);

impl ReactionKind {
    /// Wrap a reaction type label.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// Borrow the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single reaction record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Record id (`temp-…` while optimistic)
    pub id: String,
    /// Content reacted to
    pub content_id: ContentId,
    /// Reaction type
    pub kind: ReactionKind,
    /// Who reacted
    pub reactor: WalletAddress,
    /// When (ms since epoch)
    pub created_at_ms: u64,
    /// Set only on local temporaries
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_pending: bool,
}

/// Aggregate count for one reaction type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCount {
    /// Reaction type
    pub kind: ReactionKind,
    /// How many users reacted with it
    pub count: u32,
    /// Whether the current user is one of them
    #[serde(default)]
    pub reacted_by_me: bool,
}

/// Per-content reaction summary, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionSummary {
    entries: Vec<ReactionCount>,
}

impl ReactionSummary {
    /// Build from backend entries.
    pub fn from_entries(entries: Vec<ReactionCount>) -> Self {
        Self { entries }
    }

    /// All entries.
    pub fn entries(&self) -> &[ReactionCount] {
        &self.entries
    }

    /// Entry for one kind.
    pub fn get(&self, kind: &ReactionKind) -> Option<&ReactionCount> {
        self.entries.iter().find(|e| &e.kind == kind)
    }

    /// Whether the current user holds this reaction.
    pub fn reacted_by_me(&self, kind: &ReactionKind) -> bool {
        self.get(kind).map_or(false, |e| e.reacted_by_me)
    }

    /// Sum over all kinds.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Snapshot of one entry with its position, for exact restore.
    pub fn snapshot(&self, kind: &ReactionKind) -> Option<(usize, ReactionCount)> {
        self.entries
            .iter()
            .position(|e| &e.kind == kind)
            .map(|idx| (idx, self.entries[idx].clone()))
    }

    /// Restore an entry captured by [`snapshot`](Self::snapshot).
    ///
    /// `None` means the kind did not exist and any entry for it is removed.
    pub fn restore(&mut self, kind: &ReactionKind, snapshot: Option<(usize, ReactionCount)>) {
        self.entries.retain(|e| &e.kind != kind);
        if let Some((idx, entry)) = snapshot {
            let idx = idx.min(self.entries.len());
            self.entries.insert(idx, entry);
        }
    }

    /// Count the current user's reaction. Returns `false` if already held.
    pub fn add_mine(&mut self, kind: &ReactionKind) -> bool {
        match self.entries.iter_mut().find(|e| &e.kind == kind) {
            Some(entry) if entry.reacted_by_me => false,
            Some(entry) => {
                entry.count = entry.count.saturating_add(1);
                entry.reacted_by_me = true;
                true
            }
            None => {
                self.entries.push(ReactionCount {
                    kind: kind.clone(),
                    count: 1,
                    reacted_by_me: true,
                });
                true
            }
        }
    }

    /// Uncount the current user's reaction. Returns `false` if not held.
    ///
    /// Entries that drop to zero are removed.
    pub fn remove_mine(&mut self, kind: &ReactionKind) -> bool {
        let Some(idx) = self
            .entries
            .iter()
            .position(|e| &e.kind == kind && e.reacted_by_me)
        else {
            return false;
        };
        let entry = &mut self.entries[idx];
        entry.count = entry.count.saturating_sub(1);
        entry.reacted_by_me = false;
        if entry.count == 0 {
            self.entries.remove(idx);
        }
        true
    }
}

/// Request to add or remove a reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRequest {
    /// Target content
    pub content_id: ContentId,
    /// Reaction type
    pub kind: ReactionKind,
}

impl ReactionRequest {
    /// Build a request.
    pub fn new(content_id: ContentId, kind: impl Into<String>) -> Self {
        Self {
            content_id,
            kind: ReactionKind::new(kind),
        }
    }
}

/// Share counter for one piece of content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSummary {
    /// Total shares
    pub count: u32,
    /// Whether the current user shared it
    pub shared_by_me: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire() -> ReactionKind {
        ReactionKind::new("fire")
    }

    #[test]
    fn test_add_mine_creates_then_refuses_duplicate() {
        let mut summary = ReactionSummary::default();
        assert!(summary.add_mine(&fire()));
        assert_eq!(summary.get(&fire()).unwrap().count, 1);
        assert!(!summary.add_mine(&fire()));
        assert_eq!(summary.total(), 1);
    }

    #[test]
    fn test_remove_mine_drops_empty_entry() {
        let mut summary = ReactionSummary::default();
        summary.add_mine(&fire());
        assert!(summary.remove_mine(&fire()));
        assert!(summary.get(&fire()).is_none());
        assert!(!summary.remove_mine(&fire()));
    }

    #[test]
    fn test_remove_mine_keeps_other_reactors() {
        let mut summary = ReactionSummary::from_entries(vec![ReactionCount {
            kind: fire(),
            count: 3,
            reacted_by_me: true,
        }]);
        assert!(summary.remove_mine(&fire()));
        let entry = summary.get(&fire()).unwrap();
        assert_eq!(entry.count, 2);
        assert!(!entry.reacted_by_me);
    }

    #[test]
    fn test_snapshot_restore_preserves_position() {
        let mut summary = ReactionSummary::from_entries(vec![
            ReactionCount {
                kind: ReactionKind::new("a"),
                count: 1,
                reacted_by_me: false,
            },
            ReactionCount {
                kind: fire(),
                count: 1,
                reacted_by_me: true,
            },
            ReactionCount {
                kind: ReactionKind::new("b"),
                count: 4,
                reacted_by_me: false,
            },
        ]);
        let before = summary.clone();
        let snap = summary.snapshot(&fire());
        summary.remove_mine(&fire());
        summary.restore(&fire(), snap);
        assert_eq!(summary, before);
    }
}

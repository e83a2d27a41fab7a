//! # Feed View State
//!
//! The main feed list plus the pending delta produced by polling.
//!
//! Polled items never enter `items` on their own. They queue in `pending`
//! until the screen merges them (the "N new posts" pill) or discards them
//! (feed switch). `generation` changes whenever the feed is switched or
//! reset, so a poll response that started under an older generation can be
//! recognised and dropped.

use serde::{Deserialize, Serialize};
use solsocial_core::types::{FeedItem, FeedKind, FeedPage};
use solsocial_core::ContentId;
use std::collections::HashSet;

/// Feed state for the active feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedState {
    kind: FeedKind,
    items: Vec<FeedItem>,
    pending: Vec<FeedItem>,
    new_count: usize,
    next_cursor: Option<String>,
    load_error: Option<String>,
    poll_error: Option<String>,
    last_polled_ms: Option<u64>,
    generation: u64,
}

impl FeedState {
    // ─── Queries ─────────────────────────────────────────────

    /// Active feed kind.
    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    /// Main list.
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Items found by polling, not yet merged.
    pub fn pending(&self) -> &[FeedItem] {
        &self.pending
    }

    /// Counter shown on the "new posts" pill.
    pub fn new_count(&self) -> usize {
        self.new_count
    }

    /// Cursor for the next page.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Last load/pagination failure.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Last poll failure. Cleared by the next successful tick.
    pub fn poll_error(&self) -> Option<&str> {
        self.poll_error.as_deref()
    }

    /// When the last successful tick completed (ms since epoch).
    pub fn last_polled_ms(&self) -> Option<u64> {
        self.last_polled_ms
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Identifiers already held, in the main list or pending.
    pub fn seen_ids(&self) -> HashSet<&ContentId> {
        self.items
            .iter()
            .chain(self.pending.iter())
            .map(|item| &item.id)
            .collect()
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Switch the active feed. Pending items and the main list are dropped.
    ///
    /// Returns `false` when `kind` is already active.
    pub fn switch_kind(&mut self, kind: FeedKind) -> bool {
        if self.kind == kind {
            return false;
        }
        self.kind = kind;
        self.items.clear();
        self.next_cursor = None;
        self.load_error = None;
        self.clear_pending();
        true
    }

    /// Replace the main list with a freshly loaded first page.
    ///
    /// Pending items that the new page already contains are dropped.
    pub fn replace_items(&mut self, page: FeedPage) {
        let FeedPage { items, next_cursor } = page;
        let loaded: HashSet<&ContentId> = items.iter().map(|item| &item.id).collect();
        self.pending.retain(|item| !loaded.contains(&item.id));
        self.new_count = self.new_count.min(self.pending.len());
        self.items = dedupe(items);
        self.next_cursor = next_cursor;
        self.load_error = None;
    }

    /// Append a further page, skipping ids already held.
    ///
    /// Returns how many items were appended.
    pub fn append_page(&mut self, page: FeedPage) -> usize {
        let FeedPage { items, next_cursor } = page;
        let mut seen: HashSet<ContentId> = self.seen_ids().into_iter().cloned().collect();
        let before = self.items.len();
        for item in items {
            if seen.insert(item.id.clone()) {
                self.items.push(item);
            }
        }
        self.next_cursor = next_cursor;
        self.load_error = None;
        self.items.len() - before
    }

    /// Record a load failure.
    pub fn set_load_error(&mut self, message: impl Into<String>) {
        self.load_error = Some(message.into());
    }

    /// Apply one poll result: queue every item whose id is not yet held.
    ///
    /// New items keep backend order and the counter grows by their number.
    /// Returns that number.
    pub fn apply_poll(&mut self, fetched: Vec<FeedItem>, now_ms: u64) -> usize {
        let mut seen: HashSet<ContentId> = self.seen_ids().into_iter().cloned().collect();
        let mut added = 0;
        for item in fetched {
            if seen.insert(item.id.clone()) {
                self.pending.push(item);
                added += 1;
            }
        }
        self.new_count += added;
        self.poll_error = None;
        self.last_polled_ms = Some(now_ms);
        added
    }

    /// Record a poll failure. The poller keeps running.
    pub fn set_poll_error(&mut self, message: impl Into<String>) {
        self.poll_error = Some(message.into());
    }

    /// Move pending items to the head of the main list.
    ///
    /// Returns how many items were merged.
    pub fn merge_pending(&mut self) -> usize {
        let merged = self.pending.len();
        let mut combined = std::mem::take(&mut self.pending);
        combined.append(&mut self.items);
        self.items = combined;
        self.new_count = 0;
        merged
    }

    /// Discard pending items.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
        self.new_count = 0;
        self.poll_error = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Hide the counter without dropping the pending items.
    pub fn mark_viewed(&mut self) {
        self.new_count = 0;
    }
}

fn dedupe(items: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solsocial_core::{ContentRef, WalletAddress};

    fn item(id: &str) -> FeedItem {
        FeedItem {
            id: ContentId::canonical(&ContentRef::signature(id)).unwrap(),
            author: WalletAddress::new("author"),
            author_handle: None,
            text: format!("post {id}"),
            created_at_ms: 0,
            comment_count: 0,
            reaction_count: 0,
        }
    }

    fn ids(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn page(ids: &[&str]) -> FeedPage {
        FeedPage {
            items: ids.iter().map(|id| item(id)).collect(),
            next_cursor: None,
        }
    }

    #[test]
    fn test_poll_delta_is_exactly_new_ids() {
        let mut feed = FeedState::default();
        feed.replace_items(page(&["A", "B"]));

        let added = feed.apply_poll(vec![item("A"), item("B"), item("C")], 10);
        assert_eq!(added, 1);
        assert_eq!(ids(feed.pending()), vec!["C"]);
        assert_eq!(feed.new_count(), 1);
        assert_eq!(ids(feed.items()), vec!["A", "B"]);
    }

    #[test]
    fn test_repeated_poll_does_not_double_count() {
        let mut feed = FeedState::default();
        feed.replace_items(page(&["A"]));
        feed.apply_poll(vec![item("B"), item("A")], 1);
        feed.apply_poll(vec![item("C"), item("B"), item("A")], 2);
        assert_eq!(ids(feed.pending()), vec!["B", "C"]);
        assert_eq!(feed.new_count(), 2);
    }

    #[test]
    fn test_merge_prepends_and_resets_counter() {
        let mut feed = FeedState::default();
        feed.replace_items(page(&["A", "B"]));
        feed.apply_poll(vec![item("D"), item("C"), item("A")], 1);

        assert_eq!(feed.merge_pending(), 2);
        assert!(feed.pending().is_empty());
        assert_eq!(feed.new_count(), 0);
        assert_eq!(ids(feed.items()), vec!["D", "C", "A", "B"]);
    }

    #[test]
    fn test_mark_viewed_keeps_pending() {
        let mut feed = FeedState::default();
        feed.apply_poll(vec![item("A")], 1);
        feed.mark_viewed();
        assert_eq!(feed.new_count(), 0);
        assert_eq!(feed.pending().len(), 1);

        feed.apply_poll(vec![item("B"), item("A")], 2);
        assert_eq!(feed.new_count(), 1);
        assert_eq!(feed.pending().len(), 2);
    }

    #[test]
    fn test_switch_kind_discards_pending_and_bumps_generation() {
        let mut feed = FeedState::default();
        feed.apply_poll(vec![item("A")], 1);
        let generation = feed.generation();

        assert!(feed.switch_kind(FeedKind::Explore));
        assert!(feed.pending().is_empty());
        assert_eq!(feed.new_count(), 0);
        assert!(feed.generation() > generation);
        assert!(!feed.switch_kind(FeedKind::Explore));
    }

    #[test]
    fn test_append_page_skips_held_ids() {
        let mut feed = FeedState::default();
        feed.replace_items(page(&["A", "B"]));
        let appended = feed.append_page(page(&["B", "C", "C"]));
        assert_eq!(appended, 1);
        assert_eq!(ids(feed.items()), vec!["A", "B", "C"]);
    }

    proptest::proptest! {
        #[test]
        fn poll_never_duplicates_ids(
            initial in proptest::collection::vec(0u8..30, 0..10),
            polls in proptest::collection::vec(proptest::collection::vec(0u8..30, 0..10), 0..6),
        ) {
            let mut feed = FeedState::default();
            let initial: Vec<String> = initial.iter().map(|n| format!("S{n}")).collect();
            let refs: Vec<&str> = initial.iter().map(String::as_str).collect();
            feed.replace_items(page(&refs));
            for poll in polls {
                let before = feed.new_count();
                let added = feed.apply_poll(poll.iter().map(|n| item(&format!("S{n}"))).collect(), 0);
                proptest::prop_assert_eq!(feed.new_count(), before + added);
            }
            let all: Vec<&str> = ids(feed.items()).into_iter().chain(ids(feed.pending())).collect();
            let unique: HashSet<&str> = all.iter().copied().collect();
            proptest::prop_assert_eq!(unique.len(), all.len());
        }
    }

    #[test]
    fn test_reload_absorbs_pending_duplicates() {
        let mut feed = FeedState::default();
        feed.replace_items(page(&["A"]));
        feed.apply_poll(vec![item("B"), item("C")], 1);
        feed.replace_items(page(&["B", "A"]));
        assert_eq!(ids(feed.pending()), vec!["C"]);
        assert_eq!(feed.new_count(), 1);
    }
}

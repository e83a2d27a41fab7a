//! # Content Lists
//!
//! Ordered per-content lists (comments, reaction records) keyed by
//! [`ContentId`].
//!
//! Unlike a plain map of items, order matters here: optimistic inserts go to
//! the head, confirmations replace in place, pins reorder. Every mutation
//! takes the content key explicitly; lookups by item predicate scan all lists
//! and report where the item lives.

use serde::{Deserialize, Serialize};
use solsocial_core::ContentId;
use std::collections::HashMap;

/// Ordered item lists keyed by content id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentLists<Item> {
    lists: HashMap<ContentId, Vec<Item>>,
}

impl<Item> Default for ContentLists<Item> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Item> ContentLists<Item> {
    /// Create an empty set of lists.
    pub fn new() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }

    // ─── Queries ─────────────────────────────────────────────

    /// Items for a content id (empty when none are held).
    pub fn get(&self, content_id: &ContentId) -> &[Item] {
        self.lists.get(content_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a list is held for this content id.
    pub fn contains(&self, content_id: &ContentId) -> bool {
        self.lists.contains_key(content_id)
    }

    /// Content ids with a held list.
    pub fn content_ids(&self) -> impl Iterator<Item = &ContentId> {
        self.lists.keys()
    }

    /// Total items across all lists.
    pub fn total(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    /// Position of the first item matching `pred` in one list.
    pub fn position(
        &self,
        content_id: &ContentId,
        pred: impl FnMut(&Item) -> bool,
    ) -> Option<usize> {
        self.lists.get(content_id)?.iter().position(pred)
    }

    /// Locate an item anywhere: linear scan over every held list.
    pub fn locate(&self, mut pred: impl FnMut(&Item) -> bool) -> Option<(ContentId, usize)> {
        self.lists.iter().find_map(|(content_id, items)| {
            items
                .iter()
                .position(&mut pred)
                .map(|idx| (content_id.clone(), idx))
        })
    }

    /// Find an item anywhere.
    pub fn find(&self, mut pred: impl FnMut(&Item) -> bool) -> Option<&Item> {
        self.lists
            .values()
            .flat_map(|items| items.iter())
            .find(|item| pred(*item))
    }

    /// Find an item anywhere, mutably.
    pub fn find_mut(&mut self, mut pred: impl FnMut(&Item) -> bool) -> Option<&mut Item> {
        self.lists
            .values_mut()
            .flat_map(|items| items.iter_mut())
            .find(|item| pred(&**item))
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Replace the whole list for a content id.
    pub fn replace(&mut self, content_id: ContentId, items: Vec<Item>) {
        self.lists.insert(content_id, items);
    }

    /// Insert at the head of a list, creating it if needed.
    pub fn insert_front(&mut self, content_id: ContentId, item: Item) {
        self.lists.entry(content_id).or_default().insert(0, item);
    }

    /// Insert at `index` (clamped to the list length).
    pub fn insert_at(&mut self, content_id: ContentId, index: usize, item: Item) {
        let list = self.lists.entry(content_id).or_default();
        let index = index.min(list.len());
        list.insert(index, item);
    }

    /// Append to a list, creating it if needed.
    pub fn push(&mut self, content_id: ContentId, item: Item) {
        self.lists.entry(content_id).or_default().push(item);
    }

    /// Remove the first item matching `pred`, returning it with its index.
    pub fn remove_where(
        &mut self,
        content_id: &ContentId,
        pred: impl FnMut(&Item) -> bool,
    ) -> Option<(usize, Item)> {
        let list = self.lists.get_mut(content_id)?;
        let idx = list.iter().position(pred)?;
        Some((idx, list.remove(idx)))
    }

    /// Replace the first item matching `pred` in place, or append when absent.
    ///
    /// Returns the index the new item ended up at.
    pub fn replace_or_push(
        &mut self,
        content_id: ContentId,
        pred: impl FnMut(&Item) -> bool,
        item: Item,
    ) -> usize {
        let list = self.lists.entry(content_id).or_default();
        match list.iter().position(pred) {
            Some(idx) => {
                list[idx] = item;
                idx
            }
            None => {
                list.push(item);
                list.len() - 1
            }
        }
    }

    /// Move the item at `from` to the head of its list.
    pub fn move_to_front(&mut self, content_id: &ContentId, from: usize) -> bool {
        match self.lists.get_mut(content_id) {
            Some(list) if from < list.len() => {
                let item = list.remove(from);
                list.insert(0, item);
                true
            }
            _ => false,
        }
    }

    /// Mutable access to one item by index.
    pub fn get_mut(&mut self, content_id: &ContentId, index: usize) -> Option<&mut Item> {
        self.lists.get_mut(content_id)?.get_mut(index)
    }

    /// Drop the list for a content id.
    pub fn clear_content(&mut self, content_id: &ContentId) -> Option<Vec<Item>> {
        self.lists.remove(content_id)
    }
}

//! # Interaction View State
//!
//! Comments, reactions and shares, all keyed by canonical [`ContentId`].

use super::content_lists::ContentLists;
use serde::{Deserialize, Serialize};
use solsocial_core::types::{Comment, Reaction, ReactionSummary, ShareSummary};
use solsocial_core::{CommentId, ContentId};
use std::collections::HashMap;

/// Interaction state for every piece of content a screen has opened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionsState {
    /// Comment lists, newest optimistic entries at the head
    pub comments: ContentLists<Comment>,
    /// Last comment failure per content id, for display under the composer
    pub comment_errors: HashMap<ContentId, String>,
    /// Reaction summaries
    pub reactions: HashMap<ContentId, ReactionSummary>,
    /// Reaction records held locally (including optimistic ones)
    pub reaction_records: ContentLists<Reaction>,
    /// Share counters
    pub shares: HashMap<ContentId, ShareSummary>,
}

impl InteractionsState {
    /// Comments for a content id.
    pub fn comments_for(&self, content_id: &ContentId) -> &[Comment] {
        self.comments.get(content_id)
    }

    /// Find a comment in any list.
    pub fn comment(&self, comment_id: &CommentId) -> Option<&Comment> {
        self.comments.find(|c| &c.id == comment_id)
    }

    /// Stored error for a content id.
    pub fn comment_error(&self, content_id: &ContentId) -> Option<&str> {
        self.comment_errors.get(content_id).map(String::as_str)
    }

    /// Record a comment failure for display.
    pub fn set_comment_error(&mut self, content_id: ContentId, message: impl Into<String>) {
        self.comment_errors.insert(content_id, message.into());
    }

    /// Clear the stored failure for a content id.
    pub fn clear_comment_error(&mut self, content_id: &ContentId) {
        self.comment_errors.remove(content_id);
    }

    /// Swap a temporary comment for the confirmed one.
    ///
    /// `content_id` is the list the temporary was inserted into; the
    /// confirmed comment is keyed under it whatever reference the backend
    /// echoed. It takes the temporary's position, or is appended when the
    /// temporary is gone (e.g. the list was reloaded meanwhile). A reload that
    /// already delivered the confirmed id is not duplicated.
    pub fn confirm_comment(
        &mut self,
        content_id: &ContentId,
        temp_id: &CommentId,
        mut confirmed: Comment,
    ) {
        confirmed.content_id = content_id.clone();
        let temp_pos = self.comments.position(content_id, |c| &c.id == temp_id);
        let existing = self.comments.position(content_id, |c| c.id == confirmed.id);
        match (temp_pos, existing) {
            (Some(_), Some(_)) => {
                self.comments.remove_where(content_id, |c| &c.id == temp_id);
            }
            (Some(_), None) => {
                self.comments
                    .replace_or_push(content_id.clone(), |c| &c.id == temp_id, confirmed);
            }
            (None, Some(_)) => {}
            (None, None) => self.comments.push(content_id.clone(), confirmed),
        }
    }

    /// Reaction summary for a content id.
    pub fn reactions_for(&self, content_id: &ContentId) -> Option<&ReactionSummary> {
        self.reactions.get(content_id)
    }

    /// Share counter for a content id.
    pub fn shares_for(&self, content_id: &ContentId) -> ShareSummary {
        self.shares.get(content_id).copied().unwrap_or_default()
    }

    /// Number of pending (optimistic) comments across all lists.
    pub fn pending_comment_count(&self) -> usize {
        self.comments
            .content_ids()
            .map(|id| self.comments.get(id).iter().filter(|c| c.is_pending).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solsocial_core::types::CreateCommentRequest;
    use solsocial_core::{ContentRef, WalletAddress};
    use solsocial_testkit::fixtures::{comment, content_id};

    #[test]
    fn test_confirm_rekeys_to_temporary_list() {
        let post = content_id("SIGabc");
        let mut state = InteractionsState::default();
        let temp = Comment::temporary(
            &CreateCommentRequest::new(post.clone(), "hi"),
            WalletAddress::new("me"),
            1,
        );
        let temp_id = temp.id.clone();
        state.comments.insert_front(post.clone(), temp);

        let other = ContentId::canonical(&ContentRef::post_id("42")).unwrap();
        state.confirm_comment(&post, &temp_id, comment(&other, "c-9"));

        let held = state.comments_for(&post);
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].id.as_str(), "c-9");
        assert_eq!(held[0].content_id, post);
        assert!(state.comments_for(&other).is_empty());
        assert_eq!(state.pending_comment_count(), 0);
    }
}

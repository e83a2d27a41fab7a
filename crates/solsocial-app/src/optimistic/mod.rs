//! # Optimistic Operations
//!
//! Every optimistic mutation is an [`OptimisticOp`]: applying it changes the
//! view state immediately and records exactly what it replaced, and
//! [`OptimisticOp::revert`] puts that back when the backend call fails.
//!
//! Constructors apply the change and return the op. They return `None` when
//! the target does not exist or the change would be a no-op, in which case
//! nothing was touched and there is nothing to revert.

mod lanes;

pub use lanes::{LaneGuard, LaneKey, MutationLanes};

use crate::views::ViewState;
use solsocial_core::types::{
    Comment, Reaction, ReactionCount, ReactionKind, ReactionRequest, ShareSummary, VoteDirection,
};
use solsocial_core::{CommentId, ContentId, ReceiptSignature, WalletAddress};
use uuid::Uuid;

/// Vote counters captured before a vote tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteSnapshot {
    upvotes: u32,
    downvotes: u32,
    score: i64,
    my_vote: Option<VoteDirection>,
}

impl VoteSnapshot {
    fn capture(comment: &Comment) -> Self {
        Self {
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
            score: comment.score,
            my_vote: comment.my_vote,
        }
    }

    fn restore(self, comment: &mut Comment) {
        comment.upvotes = self.upvotes;
        comment.downvotes = self.downvotes;
        comment.score = self.score;
        comment.my_vote = self.my_vote;
    }
}

/// A reversible local change.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimisticOp {
    /// A temporary comment was inserted at the head of a list.
    InsertComment {
        /// List it was inserted into
        content_id: ContentId,
        /// Temporary id
        comment_id: CommentId,
        /// Whether a list was held before the insert
        had_list: bool,
    },
    /// A vote tap changed a comment's counters.
    Vote {
        /// Voted comment
        comment_id: CommentId,
        /// Counters before the tap
        previous: VoteSnapshot,
    },
    /// A comment's pin flag changed (and pinning moved it to the head).
    Pin {
        /// List holding the comment
        content_id: ContentId,
        /// Comment
        comment_id: CommentId,
        /// Index before the change
        previous_index: usize,
        /// Flag before the change
        was_pinned: bool,
    },
    /// The user's reaction was counted.
    AddReaction {
        /// Reacted content
        content_id: ContentId,
        /// Reaction type
        kind: ReactionKind,
        /// Summary entry before the change (`None`: no entry existed)
        previous: Option<(usize, ReactionCount)>,
        /// Temporary record id
        record_id: String,
        /// Whether a summary was held before the change
        had_summary: bool,
        /// Whether a record list was held before the change
        had_records: bool,
    },
    /// The user's reaction was uncounted.
    RemoveReaction {
        /// Content
        content_id: ContentId,
        /// Reaction type
        kind: ReactionKind,
        /// Summary entry before the change
        previous: Option<(usize, ReactionCount)>,
        /// The user's record, if one was held, with its index
        removed_record: Option<(usize, Reaction)>,
    },
    /// The share counter was incremented.
    Share {
        /// Shared content
        content_id: ContentId,
        /// Counter before the change (`None`: no counter was held)
        previous: Option<ShareSummary>,
    },
    /// A receipt flag was set.
    Receipt {
        /// Signature
        signature: ReceiptSignature,
        /// Flag before the change
        previous: bool,
    },
}

impl OptimisticOp {
    // ─── Apply ───────────────────────────────────────────────

    /// Insert a temporary comment at the head of its list.
    pub fn insert_comment(views: &mut ViewState, temporary: Comment) -> Self {
        let content_id = temporary.content_id.clone();
        let comment_id = temporary.id.clone();
        views.interactions.clear_comment_error(&content_id);
        let had_list = views.interactions.comments.contains(&content_id);
        views
            .interactions
            .comments
            .insert_front(content_id.clone(), temporary);
        Self::InsertComment {
            content_id,
            comment_id,
            had_list,
        }
    }

    /// Apply a vote tap. Returns the op and the resulting vote marker.
    pub fn vote(
        views: &mut ViewState,
        comment_id: &CommentId,
        direction: VoteDirection,
    ) -> Option<(Self, Option<VoteDirection>)> {
        let comment = views
            .interactions
            .comments
            .find_mut(|c| &c.id == comment_id)?;
        let previous = VoteSnapshot::capture(comment);
        let vote = comment.apply_vote(direction);
        Some((
            Self::Vote {
                comment_id: comment_id.clone(),
                previous,
            },
            vote,
        ))
    }

    /// Pin (move to head and flag) or unpin (clear flag in place).
    pub fn pin(views: &mut ViewState, comment_id: &CommentId, pinned: bool) -> Option<Self> {
        let comments = &mut views.interactions.comments;
        let (content_id, index) = comments.locate(|c| &c.id == comment_id)?;
        let comment = comments.get_mut(&content_id, index)?;
        let was_pinned = comment.is_pinned;
        comment.is_pinned = pinned;
        if pinned {
            comments.move_to_front(&content_id, index);
        }
        Some(Self::Pin {
            content_id,
            comment_id: comment_id.clone(),
            previous_index: index,
            was_pinned,
        })
    }

    /// Count the user's reaction and hold a temporary record for it.
    ///
    /// `None` when the user already holds this reaction.
    pub fn add_reaction(
        views: &mut ViewState,
        request: &ReactionRequest,
        reactor: WalletAddress,
        now_ms: u64,
    ) -> Option<Self> {
        let had_summary = views.interactions.reactions.contains_key(&request.content_id);
        let had_records = views
            .interactions
            .reaction_records
            .contains(&request.content_id);
        let summary = views
            .interactions
            .reactions
            .entry(request.content_id.clone())
            .or_default();
        let previous = summary.snapshot(&request.kind);
        if !summary.add_mine(&request.kind) {
            if !had_summary {
                views.interactions.reactions.remove(&request.content_id);
            }
            return None;
        }
        let record_id = format!("temp-{}", Uuid::new_v4());
        views.interactions.reaction_records.insert_front(
            request.content_id.clone(),
            Reaction {
                id: record_id.clone(),
                content_id: request.content_id.clone(),
                kind: request.kind.clone(),
                reactor,
                created_at_ms: now_ms,
                is_pending: true,
            },
        );
        Some(Self::AddReaction {
            content_id: request.content_id.clone(),
            kind: request.kind.clone(),
            previous,
            record_id,
            had_summary,
            had_records,
        })
    }

    /// Uncount the user's reaction and drop their record.
    ///
    /// `None` when the user does not hold this reaction.
    pub fn remove_reaction(
        views: &mut ViewState,
        request: &ReactionRequest,
        reactor: Option<&WalletAddress>,
    ) -> Option<Self> {
        let summary = views.interactions.reactions.get_mut(&request.content_id)?;
        let previous = summary.snapshot(&request.kind);
        if !summary.remove_mine(&request.kind) {
            return None;
        }
        let removed_record = views
            .interactions
            .reaction_records
            .remove_where(&request.content_id, |r| {
                r.kind == request.kind && Some(&r.reactor) == reactor
            });
        Some(Self::RemoveReaction {
            content_id: request.content_id.clone(),
            kind: request.kind.clone(),
            previous,
            removed_record,
        })
    }

    /// Increment the share counter.
    pub fn share(views: &mut ViewState, content_id: &ContentId) -> Self {
        let previous = views.interactions.shares.get(content_id).copied();
        let entry = views
            .interactions
            .shares
            .entry(content_id.clone())
            .or_default();
        entry.count = entry.count.saturating_add(1);
        entry.shared_by_me = true;
        Self::Share {
            content_id: content_id.clone(),
            previous,
        }
    }

    /// Set a receipt flag.
    pub fn receipt(views: &mut ViewState, signature: &ReceiptSignature, receipted: bool) -> Self {
        let previous = views.receipts.set(signature, receipted);
        Self::Receipt {
            signature: signature.clone(),
            previous,
        }
    }

    // ─── Revert ──────────────────────────────────────────────

    /// Undo the change.
    pub fn revert(self, views: &mut ViewState) {
        match self {
            Self::InsertComment {
                content_id,
                comment_id,
                had_list,
            } => {
                let comments = &mut views.interactions.comments;
                comments.remove_where(&content_id, |c| c.id == comment_id);
                if !had_list && comments.get(&content_id).is_empty() {
                    comments.clear_content(&content_id);
                }
            }
            Self::Vote {
                comment_id,
                previous,
            } => {
                if let Some(comment) = views
                    .interactions
                    .comments
                    .find_mut(|c| c.id == comment_id)
                {
                    previous.restore(comment);
                }
            }
            Self::Pin {
                content_id,
                comment_id,
                previous_index,
                was_pinned,
            } => {
                let comments = &mut views.interactions.comments;
                if let Some((_, mut comment)) =
                    comments.remove_where(&content_id, |c| c.id == comment_id)
                {
                    comment.is_pinned = was_pinned;
                    comments.insert_at(content_id, previous_index, comment);
                }
            }
            Self::AddReaction {
                content_id,
                kind,
                previous,
                record_id,
                had_summary,
                had_records,
            } => {
                if had_summary {
                    views
                        .interactions
                        .reactions
                        .entry(content_id.clone())
                        .or_default()
                        .restore(&kind, previous);
                } else {
                    views.interactions.reactions.remove(&content_id);
                }
                let records = &mut views.interactions.reaction_records;
                records.remove_where(&content_id, |r| r.id == record_id);
                if !had_records && records.get(&content_id).is_empty() {
                    records.clear_content(&content_id);
                }
            }
            Self::RemoveReaction {
                content_id,
                kind,
                previous,
                removed_record,
            } => {
                views
                    .interactions
                    .reactions
                    .entry(content_id.clone())
                    .or_default()
                    .restore(&kind, previous);
                if let Some((index, record)) = removed_record {
                    views
                        .interactions
                        .reaction_records
                        .insert_at(content_id, index, record);
                }
            }
            Self::Share {
                content_id,
                previous,
            } => match previous {
                Some(summary) => {
                    views.interactions.shares.insert(content_id, summary);
                }
                None => {
                    views.interactions.shares.remove(&content_id);
                }
            },
            Self::Receipt {
                signature,
                previous,
            } => {
                views.receipts.set(&signature, previous);
            }
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InsertComment { .. } => "insert_comment",
            Self::Vote { .. } => "vote",
            Self::Pin { .. } => "pin",
            Self::AddReaction { .. } => "add_reaction",
            Self::RemoveReaction { .. } => "remove_reaction",
            Self::Share { .. } => "share",
            Self::Receipt { .. } => "receipt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solsocial_core::types::{CreateCommentRequest, ReactionSummary};
    use solsocial_core::ContentRef;

    fn content() -> ContentId {
        ContentId::canonical(&ContentRef::post_id("7")).unwrap()
    }

    fn comment(id: &str) -> Comment {
        let mut c = Comment::temporary(
            &CreateCommentRequest::new(content(), id),
            WalletAddress::new("author"),
            0,
        );
        c.id = CommentId::new(id);
        c.is_pending = false;
        c
    }

    fn seeded() -> ViewState {
        let mut views = ViewState::default();
        views
            .interactions
            .comments
            .replace(content(), vec![comment("a"), comment("b"), comment("c")]);
        views
    }

    fn order(views: &ViewState) -> Vec<&str> {
        views
            .interactions
            .comments_for(&content())
            .iter()
            .map(|c| c.id.as_str())
            .collect()
    }

    #[test]
    fn test_insert_comment_revert_removes_temporary() {
        let mut views = seeded();
        let before = views.clone();
        let temp = Comment::temporary(
            &CreateCommentRequest::new(content(), "hi"),
            WalletAddress::new("me"),
            1,
        );
        let op = OptimisticOp::insert_comment(&mut views, temp);
        assert_eq!(views.interactions.comments_for(&content()).len(), 4);
        assert!(views.interactions.comments_for(&content())[0].is_pending);
        op.revert(&mut views);
        assert_eq!(views, before);
    }

    #[test]
    fn test_vote_revert_restores_counters() {
        let mut views = seeded();
        let before = views.clone();
        let (op, vote) = OptimisticOp::vote(&mut views, &CommentId::new("b"), VoteDirection::Up)
            .unwrap();
        assert_eq!(vote, Some(VoteDirection::Up));
        assert_eq!(views.interactions.comment(&CommentId::new("b")).unwrap().score, 1);
        op.revert(&mut views);
        assert_eq!(views, before);

        assert!(OptimisticOp::vote(&mut views, &CommentId::new("zz"), VoteDirection::Up).is_none());
    }

    #[test]
    fn test_pin_moves_to_front_and_reverts_position() {
        let mut views = seeded();
        let before = views.clone();
        let op = OptimisticOp::pin(&mut views, &CommentId::new("c"), true).unwrap();
        assert_eq!(order(&views), vec!["c", "a", "b"]);
        assert!(views.interactions.comment(&CommentId::new("c")).unwrap().is_pinned);
        op.revert(&mut views);
        assert_eq!(views, before);
    }

    #[test]
    fn test_unpin_keeps_position() {
        let mut views = seeded();
        OptimisticOp::pin(&mut views, &CommentId::new("b"), true).unwrap();
        let op = OptimisticOp::pin(&mut views, &CommentId::new("b"), false).unwrap();
        assert_eq!(order(&views), vec!["b", "a", "c"]);
        assert!(!views.interactions.comment(&CommentId::new("b")).unwrap().is_pinned);
        op.revert(&mut views);
        assert!(views.interactions.comment(&CommentId::new("b")).unwrap().is_pinned);
        assert_eq!(order(&views), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_add_reaction_is_noop_when_held() {
        let mut views = ViewState::default();
        let request = ReactionRequest::new(content(), "fire");
        let op = OptimisticOp::add_reaction(&mut views, &request, WalletAddress::new("me"), 1);
        assert!(op.is_some());
        assert!(
            OptimisticOp::add_reaction(&mut views, &request, WalletAddress::new("me"), 2).is_none()
        );
        assert_eq!(views.interactions.reactions_for(&content()).unwrap().total(), 1);
        assert_eq!(views.interactions.reaction_records.get(&content()).len(), 1);

        op.unwrap().revert(&mut views);
        assert_eq!(views, ViewState::default());
    }

    #[test]
    fn test_insert_comment_revert_on_unloaded_content_drops_list() {
        let mut views = ViewState::default();
        let temp = Comment::temporary(
            &CreateCommentRequest::new(content(), "first"),
            WalletAddress::new("me"),
            1,
        );
        let op = OptimisticOp::insert_comment(&mut views, temp);
        assert!(views.interactions.comments.contains(&content()));
        op.revert(&mut views);
        assert!(!views.interactions.comments.contains(&content()));
        assert_eq!(views, ViewState::default());
    }

    #[test]
    fn test_remove_reaction_revert_restores_entry_and_record() {
        let mut views = ViewState::default();
        let me = WalletAddress::new("me");
        views.interactions.reactions.insert(
            content(),
            ReactionSummary::from_entries(vec![ReactionCount {
                kind: ReactionKind::new("fire"),
                count: 1,
                reacted_by_me: true,
            }]),
        );
        views.interactions.reaction_records.push(
            content(),
            Reaction {
                id: "r1".into(),
                content_id: content(),
                kind: ReactionKind::new("fire"),
                reactor: me.clone(),
                created_at_ms: 0,
                is_pending: false,
            },
        );
        let before = views.clone();

        let request = ReactionRequest::new(content(), "fire");
        let op = OptimisticOp::remove_reaction(&mut views, &request, Some(&me)).unwrap();
        assert!(views.interactions.reactions_for(&content()).unwrap().entries().is_empty());
        assert!(views.interactions.reaction_records.get(&content()).is_empty());

        op.revert(&mut views);
        assert_eq!(views, before);
    }

    #[test]
    fn test_share_revert_drops_new_counter() {
        let mut views = ViewState::default();
        let op = OptimisticOp::share(&mut views, &content());
        assert_eq!(views.interactions.shares_for(&content()).count, 1);
        op.revert(&mut views);
        assert!(views.interactions.shares.is_empty());
    }

    #[test]
    fn test_receipt_revert() {
        let mut views = ViewState::default();
        let sig = ReceiptSignature::parse(&"x".repeat(44), 32).unwrap();
        let op = OptimisticOp::receipt(&mut views, &sig, true);
        assert_eq!(op.label(), "receipt");
        assert!(views.receipts.is_receipted(&sig));
        op.revert(&mut views);
        assert!(!views.receipts.is_receipted(&sig));
    }
}

//! Scriptable in-memory backend.
//!
//! `MockSocialApi` implements [`SocialApiEffects`] over seeded in-memory data
//! and records every call. Tests can:
//!
//! - fail the next call (or every call) of one kind
//! - make the next receipt update answer `success = false`
//! - pause calls of one kind and release them one at a time, to hold an
//!   optimistic state open while asserting on it
//!
//! Every handle shares state with its clones.

use async_trait::async_trait;
use parking_lot::Mutex;
use solsocial_core::effects::SocialApiEffects;
use solsocial_core::types::{
    Comment, CreateCommentRequest, FeedItem, FeedKind, FeedPage, Notification, Reaction,
    ReactionRequest, ReactionSummary, ReceiptAck, ReceiptAction, VoteDirection,
};
use solsocial_core::{CommentId, ContentId, ReceiptSignature, SocialError, WalletAddress};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Kinds of backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOp {
    /// `fetch_comments`
    FetchComments,
    /// `create_comment`
    CreateComment,
    /// `vote_comment`
    VoteComment,
    /// `set_comment_pinned`
    SetCommentPinned,
    /// `fetch_reactions`
    FetchReactions,
    /// `add_reaction`
    AddReaction,
    /// `remove_reaction`
    RemoveReaction,
    /// `share_content`
    ShareContent,
    /// `update_receipt`
    UpdateReceipt,
    /// `receipt_status`
    ReceiptStatus,
    /// `fetch_feed`
    FetchFeed,
    /// `fetch_notifications`
    FetchNotifications,
}

/// A recorded call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// Comments fetched
    FetchComments(ContentId),
    /// Comment created
    CreateComment(CreateCommentRequest),
    /// Vote set
    VoteComment {
        /// Target
        comment_id: CommentId,
        /// Vote sent
        vote: Option<VoteDirection>,
    },
    /// Pin flag set
    SetCommentPinned {
        /// Target
        comment_id: CommentId,
        /// Flag sent
        pinned: bool,
    },
    /// Reactions fetched
    FetchReactions(ContentId),
    /// Reaction added
    AddReaction(ReactionRequest),
    /// Reaction removed
    RemoveReaction(ReactionRequest),
    /// Content shared
    ShareContent(ContentId),
    /// Receipt updated
    UpdateReceipt {
        /// Signature
        signature: ReceiptSignature,
        /// Action sent
        action: ReceiptAction,
    },
    /// Receipt status read
    ReceiptStatus(ReceiptSignature),
    /// Feed page fetched
    FetchFeed {
        /// Feed
        kind: FeedKind,
        /// Cursor sent
        cursor: Option<String>,
        /// Page size
        limit: u32,
    },
    /// Notifications fetched
    FetchNotifications {
        /// Limit sent
        limit: u32,
    },
}

impl ApiCall {
    /// Kind of this call.
    pub fn op(&self) -> ApiOp {
        match self {
            Self::FetchComments(_) => ApiOp::FetchComments,
            Self::CreateComment(_) => ApiOp::CreateComment,
            Self::VoteComment { .. } => ApiOp::VoteComment,
            Self::SetCommentPinned { .. } => ApiOp::SetCommentPinned,
            Self::FetchReactions(_) => ApiOp::FetchReactions,
            Self::AddReaction(_) => ApiOp::AddReaction,
            Self::RemoveReaction(_) => ApiOp::RemoveReaction,
            Self::ShareContent(_) => ApiOp::ShareContent,
            Self::UpdateReceipt { .. } => ApiOp::UpdateReceipt,
            Self::ReceiptStatus(_) => ApiOp::ReceiptStatus,
            Self::FetchFeed { .. } => ApiOp::FetchFeed,
            Self::FetchNotifications { .. } => ApiOp::FetchNotifications,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<ApiCall>,
    fail_next: HashMap<ApiOp, VecDeque<SocialError>>,
    fail_always: HashMap<ApiOp, SocialError>,
    refuse_receipts: VecDeque<String>,
    comments: HashMap<ContentId, Vec<Comment>>,
    reactions: HashMap<ContentId, ReactionSummary>,
    receipts: HashSet<ReceiptSignature>,
    feeds: HashMap<FeedKind, Vec<FeedItem>>,
    notifications: Vec<Notification>,
    echo_content_as: Option<ContentId>,
    next_id: u64,
    now_ms: u64,
}

/// Mock backend for deterministic tests.
#[derive(Debug, Clone)]
pub struct MockSocialApi {
    state: Arc<Mutex<MockState>>,
    gates: Arc<Mutex<HashMap<ApiOp, Arc<Semaphore>>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    wallet: WalletAddress,
}

impl Default for MockSocialApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSocialApi {
    /// Empty backend; created records are authored by `"mock-wallet"`.
    pub fn new() -> Self {
        Self::for_wallet(WalletAddress::new("mock-wallet"))
    }

    /// Empty backend acting for `wallet`.
    pub fn for_wallet(wallet: WalletAddress) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                now_ms: 1_700_000_000_000,
                ..MockState::default()
            })),
            gates: Arc::new(Mutex::new(HashMap::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            wallet,
        }
    }

    // ─── Seeding ─────────────────────────────────────────────

    /// Set the full item list a feed serves (newest first).
    pub fn set_feed(&self, kind: FeedKind, items: Vec<FeedItem>) {
        self.state.lock().feeds.insert(kind, items);
    }

    /// Set the comments served for a piece of content.
    pub fn set_comments(&self, content_id: ContentId, comments: Vec<Comment>) {
        self.state.lock().comments.insert(content_id, comments);
    }

    /// Set the reaction summary served for a piece of content.
    pub fn set_reactions(&self, content_id: ContentId, summary: ReactionSummary) {
        self.state.lock().reactions.insert(content_id, summary);
    }

    /// Mark a signature receipted on the server.
    pub fn set_receipted(&self, signature: ReceiptSignature, receipted: bool) {
        let mut state = self.state.lock();
        if receipted {
            state.receipts.insert(signature);
        } else {
            state.receipts.remove(&signature);
        }
    }

    /// Set the notifications served (newest first).
    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        self.state.lock().notifications = notifications;
    }

    /// Answer comment creates with records that reference the post by
    /// `content_id` instead of the key the request used.
    pub fn echo_content_as(&self, content_id: ContentId) {
        self.state.lock().echo_content_as = Some(content_id);
    }

    // ─── Failure scripting ───────────────────────────────────

    /// Fail the next call of `op` with `error`. Queued errors are used in order.
    pub fn fail_next(&self, op: ApiOp, error: SocialError) {
        self.state
            .lock()
            .fail_next
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Fail every call of `op` until [`recover`](Self::recover).
    pub fn fail_always(&self, op: ApiOp, error: SocialError) {
        self.state.lock().fail_always.insert(op, error);
    }

    /// Stop failing `op`.
    pub fn recover(&self, op: ApiOp) {
        let mut state = self.state.lock();
        state.fail_always.remove(&op);
        state.fail_next.remove(&op);
    }

    /// Answer the next receipt update with `success = false`.
    pub fn refuse_next_receipt(&self, message: impl Into<String>) {
        self.state.lock().refuse_receipts.push_back(message.into());
    }

    // ─── Pausing ─────────────────────────────────────────────

    /// Hold calls of `op` until released.
    pub fn pause(&self, op: ApiOp) {
        self.gates.lock().insert(op, Arc::new(Semaphore::new(0)));
    }

    /// Let `count` held calls of `op` proceed.
    pub fn release(&self, op: ApiOp, count: usize) {
        if let Some(gate) = self.gates.lock().get(&op) {
            gate.add_permits(count);
        }
    }

    /// Stop holding calls of `op` and let all waiting ones through.
    pub fn resume(&self, op: ApiOp) {
        if let Some(gate) = self.gates.lock().remove(&op) {
            gate.close();
        }
    }

    /// Calls currently executing (including paused ones).
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of calls ever executing at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Yield until `count` calls of `op` have been recorded.
    ///
    /// Gives up after a bounded number of yields and returns whether the
    /// count was reached.
    pub async fn wait_for_calls(&self, op: ApiOp, count: usize) -> bool {
        for _ in 0..10_000 {
            if self.call_count(op) >= count {
                return true;
            }
            tokio::task::yield_now().await;
        }
        self.call_count(op) >= count
    }

    // ─── Inspection ──────────────────────────────────────────

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    /// Recorded calls of one kind.
    pub fn calls_of(&self, op: ApiOp) -> Vec<ApiCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.op() == op)
            .cloned()
            .collect()
    }

    /// Number of recorded calls of one kind.
    pub fn call_count(&self, op: ApiOp) -> usize {
        self.state.lock().calls.iter().filter(|c| c.op() == op).count()
    }

    /// Receipt actions sent, in order.
    pub fn receipt_actions(&self) -> Vec<ReceiptAction> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                ApiCall::UpdateReceipt { action, .. } => Some(*action),
                _ => None,
            })
            .collect()
    }

    /// Server-side receipt flag.
    pub fn server_receipted(&self, signature: &ReceiptSignature) -> bool {
        self.state.lock().receipts.contains(signature)
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    // ─── Call plumbing ───────────────────────────────────────

    async fn enter(&self, call: ApiCall) -> Result<InFlight, SocialError> {
        let op = call.op();
        self.state.lock().calls.push(call);

        let guard = InFlight::new(self.in_flight.clone());
        self.max_in_flight.fetch_max(self.in_flight(), Ordering::SeqCst);

        let gate = self.gates.lock().get(&op).cloned();
        if let Some(gate) = gate {
            // A closed gate (resumed) lets everything through.
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let mut state = self.state.lock();
        if let Some(error) = state.fail_next.get_mut(&op).and_then(VecDeque::pop_front) {
            return Err(error);
        }
        if let Some(error) = state.fail_always.get(&op) {
            return Err(error.clone());
        }
        Ok(guard)
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.state.lock();
        state.next_id += 1;
        format!("{prefix}-{}", state.next_id)
    }
}

/// Decrements the in-flight counter when the call finishes.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SocialApiEffects for MockSocialApi {
    async fn fetch_comments(&self, content_id: &ContentId) -> Result<Vec<Comment>, SocialError> {
        let _call = self.enter(ApiCall::FetchComments(content_id.clone())).await?;
        Ok(self
            .state
            .lock()
            .comments
            .get(content_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_comment(
        &self,
        request: &CreateCommentRequest,
    ) -> Result<Comment, SocialError> {
        let _call = self.enter(ApiCall::CreateComment(request.clone())).await?;
        let id = self.next_id("comment");
        let mut state = self.state.lock();
        let comment = Comment {
            id: CommentId::new(id),
            content_id: state
                .echo_content_as
                .clone()
                .unwrap_or_else(|| request.content_id.clone()),
            parent_comment_id: request.parent_comment_id.clone(),
            author: self.wallet.clone(),
            text: request.text.clone(),
            upvotes: 0,
            downvotes: 0,
            score: 0,
            my_vote: None,
            created_at_ms: state.now_ms,
            updated_at_ms: None,
            is_edited: false,
            is_pinned: false,
            is_pending: false,
        };
        state
            .comments
            .entry(request.content_id.clone())
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn vote_comment(
        &self,
        comment_id: &CommentId,
        vote: Option<VoteDirection>,
    ) -> Result<(), SocialError> {
        let _call = self
            .enter(ApiCall::VoteComment {
                comment_id: comment_id.clone(),
                vote,
            })
            .await?;
        let mut state = self.state.lock();
        if let Some(comment) = state
            .comments
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|c| &c.id == comment_id)
        {
            comment.my_vote = vote;
        }
        Ok(())
    }

    async fn set_comment_pinned(
        &self,
        comment_id: &CommentId,
        pinned: bool,
    ) -> Result<(), SocialError> {
        let _call = self
            .enter(ApiCall::SetCommentPinned {
                comment_id: comment_id.clone(),
                pinned,
            })
            .await?;
        let mut state = self.state.lock();
        if let Some(comment) = state
            .comments
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|c| &c.id == comment_id)
        {
            comment.is_pinned = pinned;
        }
        Ok(())
    }

    async fn fetch_reactions(
        &self,
        content_id: &ContentId,
    ) -> Result<ReactionSummary, SocialError> {
        let _call = self.enter(ApiCall::FetchReactions(content_id.clone())).await?;
        Ok(self
            .state
            .lock()
            .reactions
            .get(content_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_reaction(&self, request: &ReactionRequest) -> Result<Reaction, SocialError> {
        let _call = self.enter(ApiCall::AddReaction(request.clone())).await?;
        let id = self.next_id("reaction");
        let mut state = self.state.lock();
        state
            .reactions
            .entry(request.content_id.clone())
            .or_default()
            .add_mine(&request.kind);
        Ok(Reaction {
            id,
            content_id: request.content_id.clone(),
            kind: request.kind.clone(),
            reactor: self.wallet.clone(),
            created_at_ms: state.now_ms,
            is_pending: false,
        })
    }

    async fn remove_reaction(&self, request: &ReactionRequest) -> Result<(), SocialError> {
        let _call = self.enter(ApiCall::RemoveReaction(request.clone())).await?;
        if let Some(summary) = self.state.lock().reactions.get_mut(&request.content_id) {
            summary.remove_mine(&request.kind);
        }
        Ok(())
    }

    async fn share_content(&self, content_id: &ContentId) -> Result<(), SocialError> {
        let _call = self.enter(ApiCall::ShareContent(content_id.clone())).await?;
        Ok(())
    }

    async fn update_receipt(
        &self,
        signature: &ReceiptSignature,
        action: ReceiptAction,
    ) -> Result<ReceiptAck, SocialError> {
        let _call = self
            .enter(ApiCall::UpdateReceipt {
                signature: signature.clone(),
                action,
            })
            .await?;
        let mut state = self.state.lock();
        if let Some(message) = state.refuse_receipts.pop_front() {
            return Ok(ReceiptAck::refused(message));
        }
        match action {
            ReceiptAction::Add => state.receipts.insert(signature.clone()),
            ReceiptAction::Remove => state.receipts.remove(signature),
        };
        Ok(ReceiptAck::accepted())
    }

    async fn receipt_status(&self, signature: &ReceiptSignature) -> Result<bool, SocialError> {
        let _call = self.enter(ApiCall::ReceiptStatus(signature.clone())).await?;
        Ok(self.state.lock().receipts.contains(signature))
    }

    async fn fetch_feed(
        &self,
        kind: FeedKind,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<FeedPage, SocialError> {
        let _call = self
            .enter(ApiCall::FetchFeed {
                kind,
                cursor: cursor.map(str::to_string),
                limit,
            })
            .await?;
        let offset = match cursor {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("offset:")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| SocialError::invalid(format!("bad cursor: {cursor}")))?,
        };
        let state = self.state.lock();
        let items = state.feeds.get(&kind).map(Vec::as_slice).unwrap_or(&[]);
        let start = offset.min(items.len());
        let end = start.saturating_add(limit as usize).min(items.len());
        Ok(FeedPage {
            items: items[start..end].to_vec(),
            next_cursor: (end < items.len()).then(|| format!("offset:{end}")),
        })
    }

    async fn fetch_notifications(&self, limit: u32) -> Result<Vec<Notification>, SocialError> {
        let _call = self.enter(ApiCall::FetchNotifications { limit }).await?;
        Ok(self
            .state
            .lock()
            .notifications
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

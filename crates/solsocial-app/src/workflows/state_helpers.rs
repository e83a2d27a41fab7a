//! ViewState read-modify-write helpers for workflows.
//!
//! None of these hold the core lock across a backend call: workflows collect
//! their handles first, drop the guard, await the effect, then come back to
//! apply the result.

use std::sync::Arc;

use async_lock::RwLock;

use crate::optimistic::{LaneGuard, LaneKey, MutationLanes, OptimisticOp};
use crate::views::ViewState;
use crate::AppCore;
use solsocial_core::effects::{SocialApiEffects, StorageEffects};
use solsocial_core::{ClientConfig, SocialError, WalletAddress};

/// Handles a workflow needs for one run.
pub(crate) struct Handles {
    pub api: Arc<dyn SocialApiEffects>,
    pub storage: Arc<dyn StorageEffects>,
    pub lanes: Arc<MutationLanes>,
    pub config: ClientConfig,
    pub wallet: Option<WalletAddress>,
    pub now_ms: u64,
}

impl Handles {
    /// Connected wallet or an input error.
    pub fn require_wallet(&self, action: &str) -> Result<WalletAddress, SocialError> {
        self.wallet
            .clone()
            .ok_or_else(|| SocialError::invalid(format!("Connect a wallet to {action}")))
    }

    /// Enter a mutation lane.
    pub async fn lane(&self, key: LaneKey) -> LaneGuard {
        self.lanes.acquire(key).await
    }
}

/// Collect handles under a short read lock.
pub(crate) async fn handles(app_core: &Arc<RwLock<AppCore>>) -> Handles {
    let core = app_core.read().await;
    Handles {
        api: core.api(),
        storage: core.storage(),
        lanes: core.lanes(),
        config: core.config().clone(),
        wallet: core.session().wallet.clone(),
        now_ms: core.now_ms(),
    }
}

/// Mutate the view state.
pub(crate) async fn with_views<T>(
    app_core: &Arc<RwLock<AppCore>>,
    update: impl FnOnce(&mut ViewState) -> T,
) -> T {
    let core = app_core.read().await;
    core.update(update)
}

/// Read the view state.
pub(crate) async fn read_views<T>(
    app_core: &Arc<RwLock<AppCore>>,
    read: impl FnOnce(&ViewState) -> T,
) -> T {
    let core = app_core.read().await;
    core.read(read)
}

/// Revert an optimistic op after a failed backend call, then hand back the error.
pub(crate) async fn rollback<T>(
    app_core: &Arc<RwLock<AppCore>>,
    op: OptimisticOp,
    error: SocialError,
) -> Result<T, SocialError> {
    tracing::warn!(op = op.label(), error = %error, "backend call failed; reverting");
    with_views(app_core, |views| op.revert(views)).await;
    Err(error)
}

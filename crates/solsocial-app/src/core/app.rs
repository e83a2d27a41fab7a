//! # AppCore
//!
//! The headless client core. Frontends build one `AppCore`, wrap it in
//! `Arc<async_lock::RwLock<_>>` and hand that to the workflows.
//!
//! View state sits behind its own short-lived lock so workflows can mutate it
//! while holding only a read guard on the core. Every mutation goes through
//! [`AppCore::update`], which bumps a revision counter that screens observe
//! through [`AppCore::subscribe`].

use super::session::Session;
use crate::optimistic::MutationLanes;
use crate::views::ViewState;
use parking_lot::RwLock;
use solsocial_core::effects::{PhysicalTimeEffects, SocialApiEffects, StorageEffects};
use solsocial_core::{ClientConfig, SocialError, WalletAddress};
use std::sync::Arc;
use tokio::sync::watch;

/// Effect handlers the core runs against.
#[derive(Clone)]
pub struct AppEffects {
    /// Backend API
    pub api: Arc<dyn SocialApiEffects>,
    /// Key-value persistence
    pub storage: Arc<dyn StorageEffects>,
    /// Wall clock
    pub time: Arc<dyn PhysicalTimeEffects>,
}

impl std::fmt::Debug for AppEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEffects").finish_non_exhaustive()
    }
}

/// Headless client core.
pub struct AppCore {
    config: ClientConfig,
    effects: AppEffects,
    session: Session,
    views: RwLock<ViewState>,
    lanes: Arc<MutationLanes>,
    revision: watch::Sender<u64>,
}

impl AppCore {
    /// Build a core from validated configuration and effect handlers.
    pub fn new(config: ClientConfig, effects: AppEffects) -> Result<Self, SocialError> {
        config.validate()?;
        let (revision, _) = watch::channel(0);
        Ok(Self {
            config,
            effects,
            session: Session::default(),
            views: RwLock::new(ViewState::default()),
            lanes: Arc::new(MutationLanes::new()),
            revision,
        })
    }

    // ─── Configuration & effects ─────────────────────────────

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// All effect handlers.
    pub fn effects(&self) -> &AppEffects {
        &self.effects
    }

    /// Backend API handle.
    pub fn api(&self) -> Arc<dyn SocialApiEffects> {
        self.effects.api.clone()
    }

    /// Storage handle.
    pub fn storage(&self) -> Arc<dyn StorageEffects> {
        self.effects.storage.clone()
    }

    /// Current wall-clock time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.effects.time.now_ms()
    }

    /// Per-key mutation lanes.
    pub fn lanes(&self) -> Arc<MutationLanes> {
        self.lanes.clone()
    }

    // ─── Session ─────────────────────────────────────────────

    /// Session status.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Connect a wallet (`None` signs out).
    pub fn set_wallet(&mut self, wallet: Option<WalletAddress>) {
        tracing::info!(
            wallet = wallet.as_ref().map(WalletAddress::short).as_deref(),
            "session wallet changed"
        );
        self.session.wallet = wallet;
        self.bump();
    }

    /// Record a connectivity change.
    pub fn set_online(&mut self, online: bool) {
        if self.session.online != online {
            tracing::info!(online, "connectivity changed");
            self.session.online = online;
            self.bump();
        }
    }

    // ─── View state ──────────────────────────────────────────

    /// Clone of the current view state.
    pub fn snapshot(&self) -> ViewState {
        self.views.read().clone()
    }

    /// Read from the view state without cloning it.
    pub fn read<T>(&self, f: impl FnOnce(&ViewState) -> T) -> T {
        f(&*self.views.read())
    }

    /// Mutate the view state and notify subscribers.
    pub fn update<T>(&self, f: impl FnOnce(&mut ViewState) -> T) -> T {
        let out = f(&mut *self.views.write());
        self.bump();
        out
    }

    /// Current revision. Increases on every state change.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}

impl std::fmt::Debug for AppCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCore")
            .field("session", &self.session)
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}

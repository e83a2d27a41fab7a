//! Shared harness for app integration tests.

#![allow(clippy::unwrap_used, dead_code)]

use async_lock::RwLock;
use solsocial_app::{AppCore, AppEffects};
use solsocial_core::ClientConfig;
use solsocial_testkit::fixtures::test_wallet;
use solsocial_testkit::{ManualClock, MemoryStorage, MockSocialApi};
use std::sync::Arc;

pub struct Harness {
    pub core: Arc<RwLock<AppCore>>,
    pub api: MockSocialApi,
    pub storage: MemoryStorage,
    pub clock: ManualClock,
}

impl Harness {
    /// Signed-in core with default configuration.
    pub async fn signed_in() -> Self {
        let harness = Self::with_config(ClientConfig::default());
        harness.sign_in("me").await;
        harness
    }

    /// Signed-out core.
    pub fn with_config(config: ClientConfig) -> Self {
        let api = MockSocialApi::for_wallet(test_wallet("me"));
        let storage = MemoryStorage::new();
        Self::with_parts(config, api, storage)
    }

    /// Core over existing mocks (e.g. storage from a previous "run").
    pub fn with_parts(config: ClientConfig, api: MockSocialApi, storage: MemoryStorage) -> Self {
        let clock = ManualClock::default();
        let effects = AppEffects {
            api: Arc::new(api.clone()),
            storage: Arc::new(storage.clone()),
            time: Arc::new(clock.clone()),
        };
        let core = AppCore::new(config, effects).unwrap();
        Self {
            core: Arc::new(RwLock::new(core)),
            api,
            storage,
            clock,
        }
    }

    pub async fn sign_in(&self, label: &str) {
        self.core.write().await.set_wallet(Some(test_wallet(label)));
    }

    pub async fn sign_out(&self) {
        self.core.write().await.set_wallet(None);
    }

    pub async fn set_online(&self, online: bool) {
        self.core.write().await.set_online(online);
    }

    pub async fn snapshot(&self) -> solsocial_app::ViewState {
        self.core.read().await.snapshot()
    }
}

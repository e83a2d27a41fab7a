//! In-memory key-value storage.
//!
//! Writes can be paused to hold a workflow between its view change and its
//! persist, the same way [`crate::MockSocialApi`] holds backend calls.

use async_trait::async_trait;
use parking_lot::Mutex;
use solsocial_core::effects::StorageEffects;
use solsocial_core::SocialError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Storage backed by a shared `HashMap`. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
    write_gate: Arc<Mutex<Option<Arc<Semaphore>>>>,
    writes_started: Arc<AtomicUsize>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `store`/`remove` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Hold every subsequent `store` until [`Self::resume_writes`].
    pub fn pause_writes(&self) {
        *self.write_gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let held and future writes through.
    pub fn resume_writes(&self) {
        if let Some(gate) = self.write_gate.lock().take() {
            gate.close();
        }
    }

    /// `store` calls entered so far, including held ones.
    pub fn writes_started(&self) -> usize {
        self.writes_started.load(Ordering::SeqCst)
    }

    /// Yield until `count` writes have started. Returns whether they did.
    pub async fn wait_for_writes(&self, count: usize) -> bool {
        for _ in 0..10_000 {
            if self.writes_started() >= count {
                return true;
            }
            tokio::task::yield_now().await;
        }
        self.writes_started() >= count
    }

    /// Write raw bytes directly, bypassing failure scripting.
    pub fn put_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.entries.lock().insert(key.to_string(), value.into());
    }

    /// Read raw bytes directly.
    pub fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().get(key).cloned()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn check_writable(&self) -> Result<(), SocialError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(SocialError::storage("mock storage write failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StorageEffects for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SocialError> {
        Ok(self.get_raw(key))
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), SocialError> {
        self.writes_started.fetch_add(1, Ordering::SeqCst);
        let gate = self.write_gate.lock().clone();
        if let Some(gate) = gate {
            // Closed on resume.
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.check_writable()?;
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SocialError> {
        self.check_writable()?;
        self.entries.lock().remove(key);
        Ok(())
    }
}

//! Session state: who is signed in and whether the device is online.

use serde::{Deserialize, Serialize};
use solsocial_core::WalletAddress;

/// Connection and sign-in status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Connected wallet, if any
    pub wallet: Option<WalletAddress>,
    /// Whether the device reports network connectivity
    pub online: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            wallet: None,
            online: true,
        }
    }
}

impl Session {
    /// Whether a wallet is connected.
    #[must_use]
    pub fn authenticated(&self) -> bool {
        self.wallet.is_some()
    }
}

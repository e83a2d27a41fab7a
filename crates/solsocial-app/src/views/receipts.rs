//! # Receipt View State
//!
//! Local cache of which signatures the user has receipted. The backend is
//! authoritative; this set is toggled optimistically and reconciled by status
//! checks.

use serde::{Deserialize, Serialize};
use solsocial_core::ReceiptSignature;
use std::collections::HashSet;

/// Receipted signatures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptsState {
    receipted: HashSet<ReceiptSignature>,
}

impl ReceiptsState {
    /// Whether the signature is receipted locally.
    pub fn is_receipted(&self, signature: &ReceiptSignature) -> bool {
        self.receipted.contains(signature)
    }

    /// Set the local flag. Returns the previous value.
    pub fn set(&mut self, signature: &ReceiptSignature, receipted: bool) -> bool {
        if receipted {
            !self.receipted.insert(signature.clone())
        } else {
            self.receipted.remove(signature)
        }
    }

    /// Number of receipted signatures.
    pub fn count(&self) -> usize {
        self.receipted.len()
    }

    /// All receipted signatures.
    pub fn iter(&self) -> impl Iterator<Item = &ReceiptSignature> {
        self.receipted.iter()
    }
}

//! Receipts Workflow - Portable Business Logic
//!
//! A receipt is the user saving a post, keyed by its transaction signature.
//! The backend is authoritative; the local flag is toggled optimistically and
//! reconciled on demand.

use crate::optimistic::{LaneKey, OptimisticOp};
use crate::workflows::state_helpers::{handles, read_views, rollback, with_views};
use crate::AppCore;
use async_lock::RwLock;
use solsocial_core::types::ReceiptAction;
use solsocial_core::{ReceiptSignature, SocialError};
use std::sync::Arc;

/// Validate a raw signature against the configured minimum length.
pub async fn parse_signature(
    app_core: &Arc<RwLock<AppCore>>,
    raw: &str,
) -> Result<ReceiptSignature, SocialError> {
    let min_len = app_core.read().await.config().receipts.min_signature_len;
    ReceiptSignature::parse(raw, min_len)
}

/// Whether the signature is receipted locally.
pub async fn is_receipted(app_core: &Arc<RwLock<AppCore>>, signature: &ReceiptSignature) -> bool {
    read_views(app_core, |views| views.receipts.is_receipted(signature)).await
}

/// Toggle the receipt on a post.
///
/// **What it does**: Validates the signature, flips the local flag, then
/// sends `add` or `remove`.
/// **Returns**: The flag after reconciliation.
/// **Signal pattern**: A refused acknowledgement or an error flips the flag
/// back. Rapid toggles on one signature run one after the other.
pub async fn toggle_receipt(app_core: &Arc<RwLock<AppCore>>, raw: &str) -> Result<bool, SocialError> {
    let signature = parse_signature(app_core, raw).await?;
    let h = handles(app_core).await;
    let _lane = h.lane(LaneKey::Receipt(signature.clone())).await;

    let (op, target) = with_views(app_core, |views| {
        let target = !views.receipts.is_receipted(&signature);
        (OptimisticOp::receipt(views, &signature, target), target)
    })
    .await;
    let action = ReceiptAction::toward(target);
    tracing::debug!(signature = %signature, action = action.as_str(), "optimistic receipt toggle");

    match h.api.update_receipt(&signature, action).await {
        Ok(ack) if ack.success => Ok(target),
        Ok(ack) => {
            let message = ack
                .message
                .unwrap_or_else(|| format!("Receipt {} was refused", action.as_str()));
            rollback(app_core, op, SocialError::rejected(message)).await
        }
        Err(error) => rollback(app_core, op, error).await,
    }
}

/// Reconcile the local flag with the server's.
///
/// **What it does**: Reads the authoritative status and overwrites the local
/// flag. Idempotent.
/// **Returns**: The server's value.
pub async fn check_receipt_status(
    app_core: &Arc<RwLock<AppCore>>,
    raw: &str,
) -> Result<bool, SocialError> {
    let signature = parse_signature(app_core, raw).await?;
    let h = handles(app_core).await;
    let _lane = h.lane(LaneKey::Receipt(signature.clone())).await;

    let receipted = h.api.receipt_status(&signature).await.map_err(|error| {
        tracing::warn!(signature = %signature, error = %error, "receipt status check failed");
        error
    })?;
    let previous = with_views(app_core, |views| views.receipts.set(&signature, receipted)).await;
    if previous != receipted {
        tracing::info!(signature = %signature, receipted, "receipt reconciled with server");
    }
    Ok(receipted)
}

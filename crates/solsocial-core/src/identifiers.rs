//! Client identifiers
//!
//! [`ContentId`] is the key every store indexes by. The backend can describe
//! one post by a transaction signature, a plain signature or a numeric post
//! id; [`ContentId::canonical`] is the only constructor from such a reference
//! so that the same post always lands under the same key.

use crate::errors::SocialError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix applied to keys derived from a numeric/string post id.
const POST_ID_PREFIX: &str = "post:";

/// Prefix applied to locally synthesized comment and reaction ids.
const TEMP_PREFIX: &str = "temp-";

/// The ways the backend refers to a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    /// Signature of the transaction that created the post
    #[serde(default)]
    pub transaction_signature: Option<String>,
    /// Post signature when it differs from the transaction signature
    #[serde(default)]
    pub signature: Option<String>,
    /// Backend row id
    #[serde(default)]
    pub post_id: Option<String>,
}

impl ContentRef {
    /// Reference by signature only.
    pub fn signature(signature: impl Into<String>) -> Self {
        Self {
            signature: Some(signature.into()),
            ..Self::default()
        }
    }

    /// Reference by backend post id only.
    pub fn post_id(post_id: impl Into<String>) -> Self {
        Self {
            post_id: Some(post_id.into()),
            ..Self::default()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Canonical content key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Resolve the canonical key for a post reference.
    ///
    /// Signatures win over the post id, the transaction signature over the
    /// plain signature. Post ids are namespaced so they never collide with a
    /// signature.
    pub fn canonical(reference: &ContentRef) -> Result<Self, SocialError> {
        if let Some(sig) = non_empty(&reference.transaction_signature) {
            return Ok(Self(sig.to_string()));
        }
        if let Some(sig) = non_empty(&reference.signature) {
            return Ok(Self(sig.to_string()));
        }
        if let Some(id) = non_empty(&reference.post_id) {
            let id = id.strip_prefix(POST_ID_PREFIX).unwrap_or(id);
            return Ok(Self(format!("{POST_ID_PREFIX}{id}")));
        }
        Err(SocialError::invalid("post reference carries no identifier"))
    }

    /// Whether this key came from a signature rather than a post id.
    #[must_use]
    pub fn is_signature(&self) -> bool {
        !self.0.starts_with(POST_ID_PREFIX)
    }

    /// Borrow the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comment identifier. Temporaries carry a `temp-` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    /// Wrap a server-issued id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh local id for an optimistic comment.
    #[must_use]
    pub fn temporary() -> Self {
        Self(format!("{TEMP_PREFIX}{}", Uuid::new_v4()))
    }

    /// Whether this id was synthesized locally.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_PREFIX)
    }

    /// Borrow the id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wallet address of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Wrap an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for display (`abcd…wxyz`).
    #[must_use]
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return self.0.clone();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A content signature that passed the receipt heuristics.
///
/// The checks are a cheap plausibility filter, not signature verification:
/// non-empty after trimming, at least `min_len` characters, and not made up
/// entirely of digits (which would be a post id that leaked in).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptSignature(String);

impl ReceiptSignature {
    /// Validate and wrap a raw signature.
    pub fn parse(raw: &str, min_len: usize) -> Result<Self, SocialError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SocialError::invalid("Missing content signature"));
        }
        if trimmed.chars().count() < min_len {
            return Err(SocialError::invalid(format!(
                "Signature is too short ({} < {min_len} characters)",
                trimmed.chars().count()
            )));
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) || trimmed.starts_with(POST_ID_PREFIX) {
            return Err(SocialError::invalid(
                "Value looks like a post id, not a signature",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the signature.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

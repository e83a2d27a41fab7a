//! Feed types

use crate::identifiers::{ContentId, WalletAddress};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which feed a screen is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Posts from followed wallets
    #[default]
    Following,
    /// Everyone
    Explore,
    /// Ranked by engagement
    Trending,
    /// The user's receipted posts
    Receipts,
}

impl FeedKind {
    /// Whether new-post polling runs for this feed.
    ///
    /// Ranked and personal feeds do not grow at the head, so polling them
    /// would only produce noise.
    #[must_use]
    pub fn supports_polling(&self) -> bool {
        matches!(self, Self::Following | Self::Explore)
    }

    /// Wire label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Following => "following",
            Self::Explore => "explore",
            Self::Trending => "trending",
            Self::Receipts => "receipts",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedKind {
    type Err = crate::SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "following" => Ok(Self::Following),
            "explore" => Ok(Self::Explore),
            "trending" => Ok(Self::Trending),
            "receipts" => Ok(Self::Receipts),
            other => Err(crate::SocialError::invalid(format!(
                "unknown feed kind: {other}"
            ))),
        }
    }
}

/// A post as shown in a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Canonical content key
    pub id: ContentId,
    /// Author wallet
    pub author: WalletAddress,
    /// Author display handle
    #[serde(default)]
    pub author_handle: Option<String>,
    /// Post body
    pub text: String,
    /// Creation time (ms since epoch)
    pub created_at_ms: u64,
    /// Number of comments
    #[serde(default)]
    pub comment_count: u32,
    /// Number of reactions
    #[serde(default)]
    pub reaction_count: u32,
}

/// One page of a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    /// Items in backend order
    pub items: Vec<FeedItem>,
    /// Cursor for the next page
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polling_kinds() {
        assert!(FeedKind::Following.supports_polling());
        assert!(FeedKind::Explore.supports_polling());
        assert!(!FeedKind::Trending.supports_polling());
        assert!(!FeedKind::Receipts.supports_polling());
    }

    #[test]
    fn test_parse_feed_kind() {
        assert_eq!("Explore".parse::<FeedKind>().unwrap(), FeedKind::Explore);
        assert!("home".parse::<FeedKind>().is_err());
    }
}

//! reqwest implementation of [`SocialApiEffects`].

use crate::wire::{
    reaction_summary, ApiEnvelope, CreateCommentBody, PinBody, ReactionBody, ReceiptBody,
    VoteBody, WireComment, WireFeedPage, WireNotification, WireReaction, WireReactionCount,
    WireReceiptStatus,
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use solsocial_core::config::ApiConfig;
use solsocial_core::effects::SocialApiEffects;
use solsocial_core::types::{
    Comment, CreateCommentRequest, FeedKind, FeedPage, Notification, Reaction, ReactionRequest,
    ReactionSummary, ReceiptAck, ReceiptAction, VoteDirection,
};
use solsocial_core::{CommentId, ContentId, ReceiptSignature, SocialError};

/// HTTP client for the social backend.
#[derive(Debug, Clone)]
pub struct HttpSocialApi {
    client: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpSocialApi {
    /// Build a client from the `[api]` config section.
    pub fn new(config: &ApiConfig) -> Result<Self, SocialError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            SocialError::config(format!("Invalid api.base_url {}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SocialError::config(format!(
                "api.base_url is not a base URL: {}",
                config.base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SocialError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            auth_token: config.auth_token.clone(),
        })
    }

    /// `{base}/api/{segments…}` with each segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, SocialError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SocialError::config("api.base_url is not a base URL"))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, SocialError> {
        let response = builder
            .send()
            .await
            .map_err(|e| SocialError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|env| env.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            tracing::debug!(status = status.as_u16(), %message, "backend returned error status");
            return Err(SocialError::http_status(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| SocialError::serialization(format!("Failed to parse response: {e}")))
    }

    async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, SocialError> {
        self.envelope(builder).await?.into_data()
    }

    async fn unit(&self, builder: RequestBuilder) -> Result<(), SocialError> {
        self.envelope::<serde_json::Value>(builder)
            .await?
            .into_unit()
    }
}

#[async_trait]
impl SocialApiEffects for HttpSocialApi {
    async fn fetch_comments(&self, content_id: &ContentId) -> Result<Vec<Comment>, SocialError> {
        let url = self.endpoint(&["posts", content_id.as_str(), "comments"])?;
        let wire: Vec<WireComment> = self.data(self.request(Method::GET, url)).await?;
        wire.into_iter()
            .map(|c| c.into_comment(content_id))
            .collect()
    }

    async fn create_comment(
        &self,
        request: &CreateCommentRequest,
    ) -> Result<Comment, SocialError> {
        let url = self.endpoint(&["comments"])?;
        let body = CreateCommentBody {
            content_id: request.content_id.as_str(),
            parent_comment_id: request.parent_comment_id.as_ref().map(CommentId::as_str),
            content: &request.text,
        };
        let wire: WireComment = self
            .data(self.request(Method::POST, url).json(&body))
            .await?;
        wire.into_comment(&request.content_id)
    }

    async fn vote_comment(
        &self,
        comment_id: &CommentId,
        vote: Option<VoteDirection>,
    ) -> Result<(), SocialError> {
        let url = self.endpoint(&["comments", comment_id.as_str(), "vote"])?;
        self.unit(self.request(Method::POST, url).json(&VoteBody { vote }))
            .await
    }

    async fn set_comment_pinned(
        &self,
        comment_id: &CommentId,
        pinned: bool,
    ) -> Result<(), SocialError> {
        let url = self.endpoint(&["comments", comment_id.as_str(), "pin"])?;
        self.unit(self.request(Method::POST, url).json(&PinBody { pinned }))
            .await
    }

    async fn fetch_reactions(
        &self,
        content_id: &ContentId,
    ) -> Result<ReactionSummary, SocialError> {
        let url = self.endpoint(&["posts", content_id.as_str(), "reactions"])?;
        let wire: Vec<WireReactionCount> = self.data(self.request(Method::GET, url)).await?;
        Ok(reaction_summary(wire))
    }

    async fn add_reaction(&self, request: &ReactionRequest) -> Result<Reaction, SocialError> {
        let url = self.endpoint(&["reactions"])?;
        let body = ReactionBody {
            content_id: request.content_id.as_str(),
            reaction_type: request.kind.as_str(),
        };
        let wire: WireReaction = self
            .data(self.request(Method::POST, url).json(&body))
            .await?;
        wire.into_reaction(&request.content_id)
    }

    async fn remove_reaction(&self, request: &ReactionRequest) -> Result<(), SocialError> {
        let url = self.endpoint(&["reactions"])?;
        let body = ReactionBody {
            content_id: request.content_id.as_str(),
            reaction_type: request.kind.as_str(),
        };
        self.unit(self.request(Method::DELETE, url).json(&body))
            .await
    }

    async fn share_content(&self, content_id: &ContentId) -> Result<(), SocialError> {
        let url = self.endpoint(&["posts", content_id.as_str(), "share"])?;
        self.unit(self.request(Method::POST, url)).await
    }

    async fn update_receipt(
        &self,
        signature: &ReceiptSignature,
        action: ReceiptAction,
    ) -> Result<ReceiptAck, SocialError> {
        let url = self.endpoint(&["receipts"])?;
        let body = ReceiptBody {
            signature: signature.as_str(),
            action,
        };
        // A refusal arrives as a 2xx envelope with success == false.
        let envelope: ApiEnvelope<serde_json::Value> = self
            .envelope(self.request(Method::POST, url).json(&body))
            .await?;
        Ok(if envelope.success {
            ReceiptAck::accepted()
        } else {
            ReceiptAck {
                success: false,
                message: envelope.error,
            }
        })
    }

    async fn receipt_status(&self, signature: &ReceiptSignature) -> Result<bool, SocialError> {
        let url = self.endpoint(&["receipts", signature.as_str()])?;
        let status: WireReceiptStatus = self.data(self.request(Method::GET, url)).await?;
        Ok(status.receipted)
    }

    async fn fetch_feed(
        &self,
        kind: FeedKind,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<FeedPage, SocialError> {
        let mut url = self.endpoint(&["feed", kind.as_str()])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
        }
        let page: WireFeedPage = self.data(self.request(Method::GET, url)).await?;
        Ok(page.into_page())
    }

    async fn fetch_notifications(&self, limit: u32) -> Result<Vec<Notification>, SocialError> {
        let mut url = self.endpoint(&["notifications"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let wire: Vec<WireNotification> = self.data(self.request(Method::GET, url)).await?;
        wire.into_iter()
            .map(WireNotification::into_notification)
            .collect()
    }
}

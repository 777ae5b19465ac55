//! reqwest client for the like and comment endpoints.

use crate::application::submit_comment::dto::{AddCommentRequest, DataEnvelope};
use crate::application::toggle_like::dto::ToggleLikeRequest;
use crate::domain::social::{
    CommentGateway, CommentId, CommentRecord, EntityId, GatewayError, LikeGateway, LikeSnapshot,
    UserId,
};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const USER_HEADER: &str = "x-user-id";

/// Talks to the interaction API rooted at `base_url` (e.g.
/// `http://127.0.0.1:3000/api`). The caller identity travels in the
/// `x-user-id` header.
#[derive(Clone)]
pub struct RestGateway {
    base_url: String,
    client: reqwest::Client,
}

impl RestGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn entity_url(&self, path: &str, entity_id: &EntityId) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| GatewayError::Transport(format!("invalid url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("entity_id", entity_id.as_str());
        Ok(url)
    }

    fn identify(request: RequestBuilder, user_id: Option<&UserId>) -> RequestBuilder {
        match user_id {
            Some(user_id) => request.header(USER_HEADER, user_id.as_str()),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(Self::error_from(response).await)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn error_from(response: Response) -> GatewayError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return GatewayError::Unauthorized;
        }
        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| String::from_utf8_lossy(&body).to_string());
        GatewayError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            GatewayError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl LikeGateway for RestGateway {
    async fn fetch_like(
        &self,
        entity_id: &EntityId,
        user_id: Option<UserId>,
    ) -> Result<LikeSnapshot, GatewayError> {
        let url = self.entity_url("likes", entity_id)?;
        let request = Self::identify(self.client.get(url), user_id.as_ref());
        Self::decode(Self::send(request).await?).await
    }

    async fn toggle_like(
        &self,
        entity_id: &EntityId,
        user_id: &UserId,
    ) -> Result<LikeSnapshot, GatewayError> {
        let body = ToggleLikeRequest {
            entity_id: entity_id.clone(),
        };
        let request = Self::identify(self.client.post(self.url("likes")), Some(user_id)).json(&body);
        Self::decode(Self::send(request).await?).await
    }
}

#[async_trait]
impl CommentGateway for RestGateway {
    async fn list_comments(&self, entity_id: &EntityId) -> Result<Vec<CommentRecord>, GatewayError> {
        let url = self.entity_url("comments", entity_id)?;
        let envelope: DataEnvelope<Vec<CommentRecord>> =
            Self::decode(Self::send(self.client.get(url)).await?).await?;
        Ok(envelope.data)
    }

    async fn create_comment(
        &self,
        entity_id: &EntityId,
        user_id: &UserId,
        content: &str,
    ) -> Result<CommentRecord, GatewayError> {
        let body = AddCommentRequest {
            entity_id: entity_id.clone(),
            content: content.to_string(),
        };
        let request =
            Self::identify(self.client.post(self.url("comments")), Some(user_id)).json(&body);
        let envelope: DataEnvelope<CommentRecord> =
            Self::decode(Self::send(request).await?).await?;
        Ok(envelope.data)
    }

    async fn delete_comment(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<(), GatewayError> {
        let url = self.url(&format!("comments/{comment_id}"));
        Self::send(Self::identify(self.client.delete(url), Some(user_id))).await?;
        Ok(())
    }
}

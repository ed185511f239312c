//! Internal API client
//!
//! The bot talks to its own HTTP API over localhost rather than calling the
//! registration service directly; the HTTP boundary keeps the credential
//! contract identical for internal and external callers.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::api::{ApiResponse, API_KEY_HEADER};
use crate::utils::errors::{AvangardError, Result};

/// HTTP client for the `/v1` registration endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Client pointed at the locally served API.
    pub fn new(port: u16, api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(format!("http://localhost:{port}/v1"), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(AvangardError::Http)?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Call `POST /v1/create_user`; returns the freshly issued raw key.
    pub async fn create_user(&self, tg_id: i64, nickname: &str, chats: &[i64]) -> Result<i64> {
        self.post(
            "create_user",
            json!({ "tg_id": tg_id, "nickname": nickname, "chats": chats }),
        )
        .await
    }

    /// Call `POST /v1/reset_key`; returns the rotated raw key.
    pub async fn reset_key(&self, tg_id: i64) -> Result<i64> {
        self.post("reset_key", json!({ "tg_id": tg_id })).await
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<i64> {
        let url = format!("{}/{path}", self.base_url);
        debug!(url = %url, "Calling internal API");

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AvangardError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiResponse = response.json().await?;
        envelope.key.ok_or(AvangardError::Upstream {
            status: status.as_u16(),
            body: "response carried no key".to_string(),
        })
    }
}

//! REST client for the netmon dashboard API.
//!
//! Implements [`InventoryService`] and [`RuleStore`] over HTTP using
//! [`reqwest`].

use async_trait::async_trait;
use reqwest::Method;

use netmon_core::rule_payload::RulePayload;
use netmon_core::stored_rule::StoredRule;
use netmon_core::types::DbId;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::inventory::{Device, Interface, InventoryService};
use crate::rule_store::RuleStore;

/// HTTP client for one dashboard backend.
pub struct NetmonApi {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
}

impl NetmonApi {
    /// Create a client for `api_url`, e.g. `http://host:8000/api/v1`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_token: None,
        }
    }

    /// Build a client from configuration, applying its timeout and token.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let mut api = Self::with_client(client, config.api_url.clone());
        api.api_token = config.api_token.clone();
        Ok(api)
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.api_url, path));
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Ensure the response has a success status code, or turn it into
    /// [`ClientError::Api`] carrying the raw body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl InventoryService for NetmonApi {
    async fn list_devices(&self) -> Result<Vec<Device>, ClientError> {
        let response = self.request(Method::GET, "/devices").send().await?;
        Self::parse_response(response).await
    }

    async fn list_interfaces_for_device(
        &self,
        device_id: DbId,
    ) -> Result<Vec<Interface>, ClientError> {
        let response = self
            .request(Method::GET, &format!("/devices/{device_id}/interfaces"))
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl RuleStore for NetmonApi {
    async fn get_rule(&self, rule_id: DbId) -> Result<StoredRule, ClientError> {
        let response = self
            .request(Method::GET, &format!("/alerts/rules/{rule_id}"))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn create_rule(&self, payload: &RulePayload) -> Result<StoredRule, ClientError> {
        let response = self
            .request(Method::POST, "/alerts/rules")
            .json(payload)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update_rule(
        &self,
        rule_id: DbId,
        payload: &RulePayload,
    ) -> Result<StoredRule, ClientError> {
        let response = self
            .request(Method::PATCH, &format!("/alerts/rules/{rule_id}"))
            .json(payload)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the game's REST API.
//!
//! Provides [`ApiClient`], which builds request URLs from the configured API
//! root, classifies HTTP failures into [`ApiError`] and retries transient
//! ones through [`with_retry`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, trace};
use tyria_config::{ApiConfig, TyriaConfig};
use tyria_core::{ApiError, Query, ResourceFetcher, TyriaError};

use crate::retry::{RetryPolicy, with_retry};

/// Shape of the `{"text": "..."}` error body the API returns.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    text: String,
}

/// HTTP client for API communication.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    language: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client for the API described by `api`.
    pub fn new(api: &ApiConfig, retry: RetryPolicy) -> Result<Self, TyriaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(api.user_agent.clone())
            .build()
            .map_err(|e| TyriaError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            language: api.language.clone(),
            retry,
        })
    }

    /// Creates a client from the full configuration.
    pub fn from_config(config: &TyriaConfig) -> Result<Self, TyriaError> {
        Self::new(&config.api, RetryPolicy::from(&config.retry))
    }

    /// Overrides the API root (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    fn url_for(&self, endpoint: &str, query: &Query) -> Result<reqwest::Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut params: Vec<(&str, &str)> = query
            .pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if query.get("lang").is_none() {
            params.push(("lang", self.language.as_str()));
        }
        reqwest::Url::parse_with_params(&raw, &params)
            .map_err(|e| ApiError::network(endpoint, format!("invalid request URL: {e}")))
    }

    /// One request with no retry.
    async fn fetch_once(
        &self,
        endpoint: &str,
        query: &Query,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.url_for(endpoint, query)?;
        trace!(endpoint, query = %query.redacted(), "sending request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::network(endpoint, e.to_string()))?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "response received");

        // 206 (partial content) still carries a usable body.
        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ApiError::network(endpoint, e.to_string()))?;
            return serde_json::from_str(&body)
                .map_err(|e| ApiError::parse(endpoint, e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.text)
            .unwrap_or(body);
        debug!(endpoint, status = status.as_u16(), detail = %detail, "request failed");

        Err(ApiError::from_status(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            endpoint,
        ))
    }
}

#[async_trait]
impl ResourceFetcher for ApiClient {
    async fn fetch(&self, endpoint: &str, query: &Query) -> Result<serde_json::Value, ApiError> {
        with_retry(&self.retry, || self.fetch_once(endpoint, query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tyria_core::ApiErrorKind;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_retries: 2,
            retry_delay: Duration::from_millis(1),
            exponential_backoff: true,
        }
    }

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig::default(), fast_retry())
            .expect("client builds")
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn successful_fetch_returns_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Tester.1234"})))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server)
            .fetch("account", &Query::new())
            .await
            .unwrap();
        assert_eq!(value["name"], "Tester.1234");
    }

    #[tokio::test]
    async fn token_ids_and_language_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("ids", "1,2,3"))
            .and(query_param("access_token", "secret-token"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let query = Query::ids(&[1u32, 2, 3]).with_token("secret-token");
        let value = client_for(&server).fetch("items", &query).await.unwrap();
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn explicit_language_is_not_overridden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("lang", "fr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .fetch("items", &Query::new().with("lang", "fr"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rate_limit_is_retried_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account/wallet"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/account/wallet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "value": 5}])))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server)
            .fetch("account/wallet", &Query::new())
            .await
            .unwrap();
        assert_eq!(value[0]["value"], 5);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account/home/cats"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"text": "no such id"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("account/home/cats", &Query::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::NotFound);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.endpoint(), "account/home/cats");
    }

    #[tokio::test]
    async fn persistent_server_error_uses_every_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("items", &Query::ids(&[1u32]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Server);
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"text": "Invalid access token"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("account", &Query::new().with_token("bad"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Authentication);
        assert!(err.user_message().is_some());
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("account", &Query::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Parse);
    }

    #[tokio::test]
    async fn partial_content_counts_as_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(206).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server)
            .fetch("items", &Query::ids(&[1u32, 999_999]))
            .await
            .unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let client = ApiClient::new(&ApiConfig::default(), RetryPolicy::none())
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let err = client.fetch("account", &Query::new()).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Network);
    }
}

// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote resource client boundary.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::query::Query;

/// Issues parameterized requests against the external API.
///
/// Implementations own transport concerns (base URL, language, retry). The
/// returned value is the parsed JSON body of a successful response.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetches `endpoint` (relative, e.g. `account/bank`) with `query`.
    async fn fetch(&self, endpoint: &str, query: &Query) -> Result<serde_json::Value, ApiError>;
}

/// Fetches and decodes a response into an endpoint schema.
///
/// Shape mismatches surface as [`ApiError::Parse`].
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn ResourceFetcher,
    endpoint: &str,
    query: &Query,
) -> Result<T, ApiError> {
    let value = fetcher.fetch(endpoint, query).await?;
    serde_json::from_value(value).map_err(|e| ApiError::parse(endpoint, e.to_string()))
}

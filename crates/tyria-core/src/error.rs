// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tyria account data layer.
//!
//! [`ApiError`] describes a failure at the remote API boundary and is cheap to
//! clone, so one batch failure can be reported to every caller waiting on it.
//! [`TyriaError`] is the workspace-wide error returned by everything else; it
//! clones too, so a failed memoized load can be handed to every waiter.

use std::sync::Arc;

use strum::{Display, EnumString};
use thiserror::Error;

/// Classification of a remote API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ApiErrorKind {
    Network,
    Authentication,
    NotFound,
    RateLimit,
    Server,
    Http,
    Parse,
}

/// A failure returned by the remote resource client.
///
/// Every status-bearing variant carries the HTTP status, its reason phrase and
/// the endpoint that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, TLS, reset, timeout).
    #[error("network error on {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    /// 401 or 403: the token is invalid or lacks a permission.
    #[error("authentication rejected on {endpoint} ({status} {status_text})")]
    Authentication {
        status: u16,
        status_text: String,
        endpoint: String,
    },

    /// 404: resource missing, or not unlocked on this account.
    #[error("not found: {endpoint} ({status} {status_text})")]
    NotFound {
        status: u16,
        status_text: String,
        endpoint: String,
    },

    /// 429: too many requests.
    #[error("rate limited on {endpoint} ({status} {status_text})")]
    RateLimit {
        status: u16,
        status_text: String,
        endpoint: String,
    },

    /// 5xx.
    #[error("server error on {endpoint} ({status} {status_text})")]
    Server {
        status: u16,
        status_text: String,
        endpoint: String,
    },

    /// Any other non-success status.
    #[error("unexpected status on {endpoint} ({status} {status_text})")]
    Http {
        status: u16,
        status_text: String,
        endpoint: String,
    },

    /// The body was not the JSON shape the endpoint schema expects.
    #[error("unexpected response shape from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },
}

impl ApiError {
    /// Classifies a non-success HTTP status.
    pub fn from_status(
        status: u16,
        status_text: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        let status_text = status_text.into();
        let endpoint = endpoint.into();
        match status {
            401 | 403 => ApiError::Authentication {
                status,
                status_text,
                endpoint,
            },
            404 => ApiError::NotFound {
                status,
                status_text,
                endpoint,
            },
            429 => ApiError::RateLimit {
                status,
                status_text,
                endpoint,
            },
            500..=599 => ApiError::Server {
                status,
                status_text,
                endpoint,
            },
            _ => ApiError::Http {
                status,
                status_text,
                endpoint,
            },
        }
    }

    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn parse(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Parse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network { .. } => ApiErrorKind::Network,
            ApiError::Authentication { .. } => ApiErrorKind::Authentication,
            ApiError::NotFound { .. } => ApiErrorKind::NotFound,
            ApiError::RateLimit { .. } => ApiErrorKind::RateLimit,
            ApiError::Server { .. } => ApiErrorKind::Server,
            ApiError::Http { .. } => ApiErrorKind::Http,
            ApiError::Parse { .. } => ApiErrorKind::Parse,
        }
    }

    /// HTTP status, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { status, .. }
            | ApiError::NotFound { status, .. }
            | ApiError::RateLimit { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Http { status, .. } => Some(*status),
            ApiError::Network { .. } | ApiError::Parse { .. } => None,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Network { endpoint, .. }
            | ApiError::Authentication { endpoint, .. }
            | ApiError::NotFound { endpoint, .. }
            | ApiError::RateLimit { endpoint, .. }
            | ApiError::Server { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Parse { endpoint, .. } => endpoint,
        }
    }

    /// Transient failures worth another attempt: network, 429 and 5xx.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ApiErrorKind::Network | ApiErrorKind::RateLimit | ApiErrorKind::Server
        )
    }

    /// Message suitable for showing to a user.
    ///
    /// Never includes the raw status text. Returns `None` for 404, which
    /// usually means "not unlocked yet" rather than a real failure.
    pub fn user_message(&self) -> Option<&'static str> {
        match self.kind() {
            ApiErrorKind::NotFound => None,
            ApiErrorKind::Network => {
                Some("Could not reach the game API. Check your connection and try again.")
            }
            ApiErrorKind::Authentication => Some(
                "The API key was rejected or is missing a required permission.",
            ),
            ApiErrorKind::RateLimit => {
                Some("The game API is rate limiting requests. Please wait a moment.")
            }
            ApiErrorKind::Server => Some("The game API is having trouble. Try again later."),
            ApiErrorKind::Http => Some("The game API refused the request."),
            ApiErrorKind::Parse => Some("The game API returned data in an unexpected format."),
        }
    }
}

/// The primary error type used across the Tyria workspace.
#[derive(Debug, Clone, Error)]
pub enum TyriaError {
    /// Invalid configuration or misuse of a component (e.g. bulk-loading a
    /// catalog that only supports lookups by ID).
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote API failure that exhausted retries or was not retryable.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Persistence backend failure.
    #[error("storage error: {source}")]
    Storage {
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// Credential management errors (duplicate token, unknown credential).
    #[error("credential error: {0}")]
    Credential(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TyriaError {
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TyriaError::Storage {
            source: Arc::from(source.into()),
        }
    }

    /// Message suitable for showing to a user, or `None` when the error should
    /// stay silent.
    pub fn user_message(&self) -> Option<String> {
        match self {
            TyriaError::Api(e) => e.user_message().map(str::to_string),
            TyriaError::Config(msg) | TyriaError::Credential(msg) => Some(msg.clone()),
            TyriaError::Storage { .. } => {
                Some("Saved settings could not be read or written.".into())
            }
            TyriaError::Internal(_) => Some("Something went wrong.".into()),
        }
    }

    /// Returns the API error if this wraps one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            TyriaError::Api(e) => Some(e),
            _ => None,
        }
    }
}

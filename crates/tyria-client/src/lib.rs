// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote resource client for the game's REST API.
//!
//! [`ApiClient`] implements [`tyria_core::ResourceFetcher`] over reqwest,
//! retrying network failures, rate limits and server errors with exponential
//! backoff.

pub mod client;
pub mod retry;

pub use client::ApiClient;
pub use retry::{RetryPolicy, with_retry};

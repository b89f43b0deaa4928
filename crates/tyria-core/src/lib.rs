// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tyria account data layer.
//!
//! This crate provides the error taxonomy, shared types and the adapter
//! traits (remote fetcher, key/value store, catalog entity) that the rest of
//! the workspace is written against.

pub mod error;
pub mod query;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ApiError, ApiErrorKind, TyriaError};
pub use query::Query;
pub use types::{COIN_CURRENCY_ID, Coins, Credential, GameMode, Rarity};

pub use traits::{CatalogEntry, CatalogId, KeyValueStore, ResourceFetcher, fetch_json};

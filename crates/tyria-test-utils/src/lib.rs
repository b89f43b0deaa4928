// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tyria integration tests.
//!
//! Provides mock adapters so resolver, cache and aggregate tests run fast and
//! deterministically without the live API.
//!
//! # Components
//!
//! - [`MockFetcher`] - Scripted fetcher with call recording and response gates
//! - [`MemoryStore`] - In-memory key/value store
//! - [`fixtures`] - JSON payloads shaped like live API responses

pub mod fixtures;
pub mod memory_store;
pub mod mock_fetcher;

pub use memory_store::MemoryStore;
pub use mock_fetcher::{Gate, MockFetcher, RecordedCall};

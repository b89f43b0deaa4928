// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions at the seams of the data layer.
//!
//! The remote API and the credential persistence medium are external
//! collaborators; the core only sees them through these traits.

pub mod catalog;
pub mod fetcher;
pub mod store;

pub use catalog::{CatalogEntry, CatalogId};
pub use fetcher::{ResourceFetcher, fetch_json};
pub use store::KeyValueStore;

// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static reference data for the Tyria account data layer.
//!
//! Provides the [`BatchResolver`] that expands foreign IDs in API-capped
//! batches, the per-kind [`Catalog`], the bundled [`ReferenceCache`], and the
//! memoized load primitives they are built on.

pub mod catalog;
pub mod entities;
pub mod memo;
pub mod reference;
pub mod resolver;

pub use catalog::{Catalog, Lookup};
pub use memo::{KeyedLoadOnce, LoadOnce};
pub use reference::ReferenceCache;
pub use resolver::{BatchFailure, BatchResolver, BatchSettings, Resolution};

// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference entity schema contract.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::de::DeserializeOwned;

/// An ID assigned by the external API (numeric or string).
pub trait CatalogId:
    Clone + Eq + Hash + Ord + Display + Debug + DeserializeOwned + Send + Sync + 'static
{
}

impl CatalogId for u32 {}
impl CatalogId for String {}

/// A reference entity type that can be fetched by ID from one endpoint.
pub trait CatalogEntry: DeserializeOwned + Debug + Send + Sync + 'static {
    type Id: CatalogId;

    /// Endpoint path relative to the API root (e.g. `items`).
    const ENDPOINT: &'static str;

    /// Whether the endpoint accepts `ids=all`.
    const BULK: bool;

    fn id(&self) -> Self::Id;
}

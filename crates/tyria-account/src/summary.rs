// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The active account's name and home world.

use std::sync::Arc;

use tracing::warn;
use tyria_cache::ReferenceCache;
use tyria_cache::entities::World;
use tyria_core::{Query, ResourceFetcher, TyriaError, fetch_json};

use crate::owned::AccountInfo;
use crate::scope::CredentialScope;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub info: AccountInfo,
    /// `None` when the worlds catalog is unavailable or lacks the id.
    pub world: Option<Arc<World>>,
}

impl AccountSummary {
    pub fn world_name(&self) -> String {
        self.world
            .as_ref()
            .map(|w| w.name.clone())
            .unwrap_or_else(|| format!("World #{}", self.info.world))
    }
}

/// Fetches `account` and resolves its world against the worlds catalog.
pub async fn account_summary(
    fetcher: &dyn ResourceFetcher,
    cache: &ReferenceCache,
    scope: &CredentialScope,
) -> Result<AccountSummary, TyriaError> {
    let token = scope
        .token()
        .ok_or_else(|| TyriaError::Credential("no active credential".into()))?;
    let query = Query::new().with_token(token);

    let (info, worlds_loaded) = futures::join!(
        fetch_json::<AccountInfo>(fetcher, "account", &query),
        cache.worlds.load_all(),
    );
    let info = info?;
    if let Err(error) = worlds_loaded {
        warn!(error = %error, "worlds unavailable");
    }

    Ok(AccountSummary {
        world: cache.worlds.get(&info.world),
        info,
    })
}

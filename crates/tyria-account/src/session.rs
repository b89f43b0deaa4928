// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-process account session.
//!
//! Ties the identity store, the reference cache and the fetcher together.
//! Aggregates are memoized per credential scope, so concurrent callers share
//! one build and a credential switch starts from scratch.

use std::sync::Arc;

use tracing::{debug, info};
use tyria_cache::{KeyedLoadOnce, ReferenceCache};
use tyria_core::{Credential, ResourceFetcher, TyriaError};

use crate::aggregate::{AccountAggregate, build_aggregate};
use crate::detail::{CharacterDetail, character_detail};
use crate::identity::IdentityStore;
use crate::scope::CredentialScope;
use crate::summary::{AccountSummary, account_summary};
use crate::unlocks::{LoadState, Unlock, UnlockSource, UnlockStates, load_unlocks};

pub struct AccountSession {
    fetcher: Arc<dyn ResourceFetcher>,
    cache: Arc<ReferenceCache>,
    identity: Arc<IdentityStore>,
    aggregates: KeyedLoadOnce<CredentialScope, Arc<AccountAggregate>, TyriaError>,
    unlocks: UnlockStates,
}

impl AccountSession {
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        cache: Arc<ReferenceCache>,
        identity: Arc<IdentityStore>,
    ) -> Self {
        let unlocks = UnlockStates::new(identity.scope_tracker());
        Self {
            fetcher,
            cache,
            identity,
            aggregates: KeyedLoadOnce::new(),
            unlocks,
        }
    }

    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    pub fn scope(&self) -> CredentialScope {
        self.identity.scope()
    }

    /// Aggregate for the active credential, built at most once per scope.
    pub async fn aggregate(&self) -> Result<Arc<AccountAggregate>, TyriaError> {
        let scope = self.identity.scope();
        self.evict_stale(&scope);
        self.aggregates
            .get_or_try_load(scope.clone(), || async {
                build_aggregate(self.fetcher.as_ref(), &self.cache, &scope)
                    .await
                    .map(Arc::new)
            })
            .await
    }

    /// Drops the memoized aggregate for the active credential and rebuilds it.
    pub async fn refresh(&self) -> Result<Arc<AccountAggregate>, TyriaError> {
        self.aggregates.invalidate(&self.identity.scope());
        debug!("aggregate invalidated");
        self.aggregate().await
    }

    /// Loads unlocks of kind `E` unless they are already ready under the
    /// current credential.
    pub async fn unlocks<E: UnlockSource>(&self) -> LoadState<Vec<Unlock<E>>> {
        let slot = E::slot(&self.unlocks);
        if let Some(state @ LoadState::Ready(_)) = slot.get() {
            return state;
        }
        let scope = self.identity.scope();
        load_unlocks(self.fetcher.as_ref(), E::catalog(&self.cache), &scope, slot).await
    }

    /// Last known state for `E` without loading anything.
    pub fn unlock_state<E: UnlockSource>(&self) -> LoadState<Vec<Unlock<E>>> {
        self.unlocks.state::<E>()
    }

    pub async fn character_detail(&self, name: &str) -> Result<CharacterDetail, TyriaError> {
        character_detail(self.fetcher.as_ref(), &self.cache, &self.identity.scope(), name).await
    }

    /// Name and home world of the active account.
    pub async fn account_summary(&self) -> Result<AccountSummary, TyriaError> {
        account_summary(self.fetcher.as_ref(), &self.cache, &self.identity.scope()).await
    }

    pub async fn add_credential(
        &self,
        token: &str,
        description: Option<String>,
    ) -> Result<Credential, TyriaError> {
        self.identity.add(token, description, self.fetcher.as_ref()).await
    }

    /// Switches the active credential. Aggregates built for other
    /// credentials are dropped.
    pub async fn select(&self, token: &str) -> Result<CredentialScope, TyriaError> {
        let before = self.identity.scope();
        let scope = self.identity.select(token).await?;
        if scope != before {
            self.evict_stale(&scope);
            info!(generation = scope.generation(), "switched credential");
        }
        Ok(scope)
    }

    pub async fn remove_credential(&self, token: &str) -> Result<bool, TyriaError> {
        let removed = self.identity.remove(token).await?;
        self.evict_stale(&self.identity.scope());
        Ok(removed)
    }

    /// Drops aggregates memoized under scopes older than `current`, including
    /// any a load raced in after the switch.
    fn evict_stale(&self, current: &CredentialScope) {
        self.aggregates
            .retain(|scope| scope.generation() >= current.generation());
    }
}

// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity store: saved API credentials and the active selection.
//!
//! Credentials persist as a JSON list under `credentials` and the active token
//! under `active_credential`. A pre-existing `{account_name: token}` map under
//! `accounts` is folded into the list on open and then deleted. Stored JSON
//! that no longer parses is logged and ignored so a corrupt entry can never
//! prevent startup.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tyria_core::{Credential, KeyValueStore, Query, ResourceFetcher, TyriaError, fetch_json};

use crate::owned::AccountInfo;
use crate::scope::{CredentialScope, ScopeTracker};

pub const CREDENTIALS_KEY: &str = "credentials";
pub const ACTIVE_KEY: &str = "active_credential";
pub const LEGACY_ACCOUNTS_KEY: &str = "accounts";

#[derive(Debug, Default)]
struct IdentityState {
    credentials: Vec<Credential>,
    active: Option<String>,
}

/// Saved credentials, persisted through a [`KeyValueStore`].
pub struct IdentityStore {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<IdentityState>,
    scope: Arc<ScopeTracker>,
}

/// Reads and decodes `key`, treating undecodable JSON as absent.
async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, TyriaError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed stored value");
            Ok(None)
        }
    }
}

impl IdentityStore {
    /// Loads saved credentials, migrating the legacy account map if present.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Result<Self, TyriaError> {
        let mut credentials: Vec<Credential> = read_json(store.as_ref(), CREDENTIALS_KEY)
            .await?
            .unwrap_or_default();

        if let Some(legacy) =
            read_json::<BTreeMap<String, String>>(store.as_ref(), LEGACY_ACCOUNTS_KEY).await?
        {
            let mut migrated = 0usize;
            for (name, token) in legacy {
                if credentials.iter().any(|c| c.token == token) {
                    continue;
                }
                credentials.push(Credential::new(name, token));
                migrated += 1;
            }
            persist_credentials(store.as_ref(), &credentials).await?;
            store.delete(LEGACY_ACCOUNTS_KEY).await?;
            info!(migrated, "migrated legacy account credentials");
        }

        let mut active: Option<String> = read_json(store.as_ref(), ACTIVE_KEY).await?;
        if let Some(token) = &active
            && !credentials.iter().any(|c| &c.token == token)
        {
            warn!("active credential is no longer saved, clearing selection");
            store.delete(ACTIVE_KEY).await?;
            active = None;
        }

        debug!(count = credentials.len(), active = active.is_some(), "identity store opened");
        Ok(Self {
            store,
            scope: Arc::new(ScopeTracker::new(active.clone())),
            state: Mutex::new(IdentityState {
                credentials,
                active,
            }),
        })
    }

    pub async fn list(&self) -> Vec<Credential> {
        self.state.lock().await.credentials.clone()
    }

    pub async fn active(&self) -> Option<Credential> {
        let state = self.state.lock().await;
        let token = state.active.as_ref()?;
        state.credentials.iter().find(|c| &c.token == token).cloned()
    }

    /// Validates `token` against the API and saves it.
    ///
    /// The credential is named after the account the token belongs to. The
    /// first credential added becomes active.
    pub async fn add(
        &self,
        token: &str,
        description: Option<String>,
        fetcher: &dyn ResourceFetcher,
    ) -> Result<Credential, TyriaError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TyriaError::Credential("API key must not be empty".into()));
        }
        if self.contains(token).await {
            return Err(TyriaError::Credential("this API key is already saved".into()));
        }

        let account: AccountInfo =
            fetch_json(fetcher, "account", &Query::new().with_token(token)).await?;

        let mut credential = Credential::new(account.name, token);
        credential.description = description.filter(|d| !d.trim().is_empty());

        let mut state = self.state.lock().await;
        // Re-check: another add may have finished while we were validating.
        if state.credentials.iter().any(|c| c.token == token) {
            return Err(TyriaError::Credential("this API key is already saved".into()));
        }
        let mut credentials = state.credentials.clone();
        credentials.push(credential.clone());
        persist_credentials(self.store.as_ref(), &credentials).await?;
        state.credentials = credentials;
        info!(name = %credential.name, token = %credential.masked_token(), "credential added");

        if state.active.is_none() {
            self.activate(&mut state, Some(token.to_string())).await?;
        }
        Ok(credential)
    }

    /// Removes the credential with `token`. Returns whether one was removed.
    pub async fn remove(&self, token: &str) -> Result<bool, TyriaError> {
        let mut state = self.state.lock().await;
        let remaining: Vec<Credential> = state
            .credentials
            .iter()
            .filter(|c| c.token != token)
            .cloned()
            .collect();
        if remaining.len() == state.credentials.len() {
            return Ok(false);
        }
        persist_credentials(self.store.as_ref(), &remaining).await?;
        state.credentials = remaining;

        if state.active.as_deref() == Some(token) {
            self.activate(&mut state, None).await?;
        }
        info!("credential removed");
        Ok(true)
    }

    /// Makes the credential with `token` active.
    pub async fn select(&self, token: &str) -> Result<CredentialScope, TyriaError> {
        let mut state = self.state.lock().await;
        if !state.credentials.iter().any(|c| c.token == token) {
            return Err(TyriaError::Credential("no saved credential has this API key".into()));
        }
        if state.active.as_deref() == Some(token) {
            return Ok(self.scope.current());
        }
        self.activate(&mut state, Some(token.to_string())).await
    }

    /// The scope of the currently active credential.
    pub fn scope(&self) -> CredentialScope {
        self.scope.current()
    }

    pub fn scope_tracker(&self) -> Arc<ScopeTracker> {
        self.scope.clone()
    }

    async fn contains(&self, token: &str) -> bool {
        self.state
            .lock()
            .await
            .credentials
            .iter()
            .any(|c| c.token == token)
    }

    async fn activate(
        &self,
        state: &mut IdentityState,
        token: Option<String>,
    ) -> Result<CredentialScope, TyriaError> {
        match &token {
            Some(token) => {
                let encoded = serde_json::to_string(token).map_err(|e| {
                    TyriaError::Internal(format!("failed to encode active credential: {e}"))
                })?;
                self.store.set(ACTIVE_KEY, &encoded).await?;
            }
            None => self.store.delete(ACTIVE_KEY).await?,
        }
        state.active = token.clone();
        let scope = self.scope.advance(token);
        info!(generation = scope.generation(), "active credential changed");
        Ok(scope)
    }
}

async fn persist_credentials(
    store: &dyn KeyValueStore,
    credentials: &[Credential],
) -> Result<(), TyriaError> {
    let encoded = serde_json::to_string(credentials)
        .map_err(|e| TyriaError::Internal(format!("failed to encode credentials: {e}")))?;
    store.set(CREDENTIALS_KEY, &encoded).await
}

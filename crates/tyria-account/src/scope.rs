// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential scopes and the stale-response guard.
//!
//! Every change of the active credential advances a generation counter. Work
//! started under one `(generation, token)` pair may only write its result
//! while that pair is still current; anything that finishes after a switch is
//! dropped on the floor.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;
use tyria_core::types::mask_token;

/// Which active credential a piece of work was started under.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct CredentialScope {
    generation: u64,
    token: Option<String>,
}

impl CredentialScope {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The active token, or `None` when no credential is selected.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Debug for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialScope")
            .field("generation", &self.generation)
            .field("token", &self.token.as_deref().map(mask_token))
            .finish()
    }
}

/// Publishes the current scope.
#[derive(Debug)]
pub struct ScopeTracker {
    current: watch::Sender<CredentialScope>,
}

impl ScopeTracker {
    pub fn new(token: Option<String>) -> Self {
        let (current, _) = watch::channel(CredentialScope {
            generation: 0,
            token,
        });
        Self { current }
    }

    pub fn current(&self) -> CredentialScope {
        self.current.borrow().clone()
    }

    pub fn is_current(&self, scope: &CredentialScope) -> bool {
        *self.current.borrow() == *scope
    }

    /// Moves to a new generation with `token` active and returns it.
    pub fn advance(&self, token: Option<String>) -> CredentialScope {
        self.current.send_modify(|scope| {
            scope.generation += 1;
            scope.token = token;
        });
        let scope = self.current();
        debug!(generation = scope.generation, "credential scope advanced");
        scope
    }

    /// Receiver notified on every scope change.
    pub fn subscribe(&self) -> watch::Receiver<CredentialScope> {
        self.current.subscribe()
    }
}

/// A state slot that only accepts writes from the current scope.
pub struct Scoped<T> {
    tracker: Arc<ScopeTracker>,
    slot: Mutex<Option<(CredentialScope, T)>>,
}

impl<T: Clone> Scoped<T> {
    pub fn new(tracker: Arc<ScopeTracker>) -> Self {
        Self {
            tracker,
            slot: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<(CredentialScope, T)>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `value` if `scope` is still current. Returns whether it landed.
    pub fn apply(&self, scope: &CredentialScope, value: T) -> bool {
        if !self.tracker.is_current(scope) {
            debug!(
                generation = scope.generation,
                current = self.tracker.current().generation,
                "discarding stale result"
            );
            return false;
        }
        *self.lock() = Some((scope.clone(), value));
        true
    }

    /// The stored value, if it was written under the current scope.
    pub fn get(&self) -> Option<T> {
        let slot = self.lock();
        match slot.as_ref() {
            Some((scope, value)) if self.tracker.is_current(scope) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }
}

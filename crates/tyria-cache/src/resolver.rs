// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chunked batch resolver.
//!
//! Expands a set of foreign IDs into reference entities with as few requests
//! as the API's per-request cap allows. IDs already cached are never
//! requested, IDs another resolution is fetching are awaited rather than
//! requested again, and the rest are claimed and fetched in concurrent
//! batches. Each batch is merged into the shared entry map as it lands.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use futures::StreamExt;
use tokio::sync::watch;
use tracing::{debug, warn};
use tyria_config::BatchConfig;
use tyria_core::{ApiError, ApiErrorKind, CatalogEntry, Query, ResourceFetcher, fetch_json};

/// Batch sizing and concurrency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    pub max_batch_size: usize,
    pub max_concurrent_batches: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self::from(&BatchConfig::default())
    }
}

impl From<&BatchConfig> for BatchSettings {
    fn from(config: &BatchConfig) -> Self {
        Self {
            max_batch_size: config.max_batch_size.max(1),
            max_concurrent_batches: config.max_concurrent_batches.max(1),
        }
    }
}

/// A batch request that failed, with the IDs it covered.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure<Id> {
    pub ids: Vec<Id>,
    pub error: ApiError,
}

/// Outcome of one [`BatchResolver::resolve`] call.
#[derive(Debug)]
pub struct Resolution<E: CatalogEntry> {
    /// Every requested ID that is now cached.
    pub entries: HashMap<E::Id, Arc<E>>,
    /// Batches that failed.
    pub failures: Vec<BatchFailure<E::Id>>,
    /// IDs that are still unknown but not covered by a failure.
    pub missing: Vec<E::Id>,
}

impl<E: CatalogEntry> Default for Resolution<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            failures: Vec::new(),
            missing: Vec::new(),
        }
    }
}

impl<E: CatalogEntry> Resolution<E> {
    pub fn get(&self, id: &E::Id) -> Option<Arc<E>> {
        self.entries.get(id).cloned()
    }

    /// No failures and nothing missing.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.missing.is_empty()
    }

    /// The first batch error, if any batch failed.
    pub fn first_error(&self) -> Option<&ApiError> {
        self.failures.first().map(|f| &f.error)
    }
}

type InFlight<Id> = Mutex<HashMap<Id, watch::Receiver<()>>>;

fn lock<Id>(in_flight: &InFlight<Id>) -> MutexGuard<'_, HashMap<Id, watch::Receiver<()>>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// IDs claimed by one batch.
///
/// Dropping the claim releases the IDs and wakes every waiter, so a cancelled
/// resolution never leaves IDs stuck in flight.
struct Claim<'a, Id: std::hash::Hash + Eq> {
    ids: Vec<Id>,
    in_flight: &'a InFlight<Id>,
    _done: watch::Sender<()>,
}

impl<Id: std::hash::Hash + Eq> Drop for Claim<'_, Id> {
    fn drop(&mut self) {
        let mut in_flight = lock(self.in_flight);
        for id in &self.ids {
            in_flight.remove(id);
        }
        // `_done` drops after this, closing the channel for waiters.
    }
}

/// Resolves IDs of one entity kind into a shared, append-only entry map.
pub struct BatchResolver<E: CatalogEntry> {
    entries: Arc<DashMap<E::Id, Arc<E>>>,
    in_flight: InFlight<E::Id>,
    settings: BatchSettings,
}

impl<E: CatalogEntry> BatchResolver<E> {
    pub fn new(entries: Arc<DashMap<E::Id, Arc<E>>>, settings: BatchSettings) -> Self {
        Self {
            entries,
            in_flight: Mutex::new(HashMap::new()),
            settings,
        }
    }

    pub fn settings(&self) -> BatchSettings {
        self.settings
    }

    /// Number of IDs currently claimed by an outstanding batch.
    pub fn in_flight_count(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// Resolves `ids`, fetching whatever is neither cached nor in flight.
    pub async fn resolve(&self, fetcher: &dyn ResourceFetcher, ids: &[E::Id]) -> Resolution<E> {
        let mut seen = HashSet::new();
        let unique: Vec<E::Id> = ids
            .iter()
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect();
        if unique.is_empty() {
            return Resolution::default();
        }

        let (claims, waits) = self.claim(&unique);
        if !claims.is_empty() {
            debug!(
                endpoint = E::ENDPOINT,
                requested = unique.len(),
                fetching = claims.iter().map(|c| c.ids.len()).sum::<usize>(),
                batches = claims.len(),
                awaiting = waits.len(),
                "resolving reference ids"
            );
        }

        // Built before streaming: a `map` closure taking `Claim<'_>` makes
        // the `resolve` future non-`Send`.
        let batches: Vec<_> = claims
            .into_iter()
            .map(|claim| self.fetch_batch(fetcher, claim))
            .collect();
        let fetches = futures::stream::iter(batches)
            .buffer_unordered(self.settings.max_concurrent_batches)
            .collect::<Vec<_>>();
        let awaits = futures::future::join_all(waits.into_iter().map(|mut rx| async move {
            // Err means the owning claim dropped, which is the completion signal.
            let _ = rx.changed().await;
        }));
        let (outcomes, _) = futures::join!(fetches, awaits);

        let failures: Vec<BatchFailure<E::Id>> =
            outcomes.into_iter().filter_map(Result::err).collect();
        let failed: HashSet<&E::Id> = failures.iter().flat_map(|f| f.ids.iter()).collect();

        let mut resolution = Resolution::default();
        for id in &unique {
            match self.entries.get(id) {
                Some(entry) => {
                    resolution.entries.insert(id.clone(), entry.value().clone());
                }
                None if !failed.contains(id) => resolution.missing.push(id.clone()),
                None => {}
            }
        }
        if !resolution.missing.is_empty() {
            debug!(
                endpoint = E::ENDPOINT,
                missing = resolution.missing.len(),
                "ids not returned by the API"
            );
        }
        resolution.failures = failures;
        resolution
    }

    /// Splits uncached IDs into fresh claims and receivers for IDs another
    /// resolution already owns. Runs without awaiting, so the check and the
    /// claim are atomic with respect to other tasks.
    fn claim(&self, unique: &[E::Id]) -> (Vec<Claim<'_, E::Id>>, Vec<watch::Receiver<()>>) {
        let mut in_flight = lock(&self.in_flight);
        let mut waits = Vec::new();
        let mut fresh = Vec::new();
        for id in unique {
            if self.entries.contains_key(id) {
                continue;
            }
            match in_flight.get(id) {
                Some(rx) => waits.push(rx.clone()),
                None => fresh.push(id.clone()),
            }
        }

        let claims = fresh
            .chunks(self.settings.max_batch_size)
            .map(|chunk| {
                let (tx, rx) = watch::channel(());
                for id in chunk {
                    in_flight.insert(id.clone(), rx.clone());
                }
                Claim {
                    ids: chunk.to_vec(),
                    in_flight: &self.in_flight,
                    _done: tx,
                }
            })
            .collect();
        drop(in_flight);
        (claims, waits)
    }

    async fn fetch_batch(
        &self,
        fetcher: &dyn ResourceFetcher,
        claim: Claim<'_, E::Id>,
    ) -> Result<(), BatchFailure<E::Id>> {
        let query = Query::ids(&claim.ids);
        match fetch_json::<Vec<E>>(fetcher, E::ENDPOINT, &query).await {
            Ok(list) => {
                debug!(
                    endpoint = E::ENDPOINT,
                    batch_size = claim.ids.len(),
                    received = list.len(),
                    "batch resolved"
                );
                self.merge(list);
                Ok(())
            }
            // The API answers 404 when none of the IDs exist.
            Err(err) if err.kind() == ApiErrorKind::NotFound => {
                debug!(
                    endpoint = E::ENDPOINT,
                    batch_size = claim.ids.len(),
                    "no ids in batch exist"
                );
                Ok(())
            }
            Err(error) => {
                warn!(
                    endpoint = E::ENDPOINT,
                    batch_size = claim.ids.len(),
                    error = %error,
                    "batch request failed"
                );
                Err(BatchFailure {
                    ids: claim.ids.clone(),
                    error,
                })
            }
        }
    }

    /// Inserts entries that are not already present. Existing entries are
    /// never replaced.
    pub fn merge(&self, list: Vec<E>) {
        for entry in list {
            self.entries.entry(entry.id()).or_insert_with(|| Arc::new(entry));
        }
    }
}

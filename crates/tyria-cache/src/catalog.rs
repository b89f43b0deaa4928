// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-kind reference catalog.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};
use tyria_core::{ApiError, CatalogEntry, Query, ResourceFetcher, TyriaError, fetch_json};

use crate::memo::LoadOnce;
use crate::resolver::{BatchResolver, BatchSettings, Resolution};

/// Keyed read access to reference data, whatever holds it.
pub trait Lookup<K, V> {
    fn lookup(&self, key: &K) -> Option<Arc<V>>;
}

impl<K, V, S> Lookup<K, V> for HashMap<K, Arc<V>, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn lookup(&self, key: &K) -> Option<Arc<V>> {
        self.get(key).cloned()
    }
}

impl<E: CatalogEntry> Lookup<E::Id, E> for Resolution<E> {
    fn lookup(&self, key: &E::Id) -> Option<Arc<E>> {
        self.get(key)
    }
}

/// Append-only cache of one reference entity kind.
///
/// Entries are fetched in bulk (`ids=all`) for catalogs that allow it, or
/// resolved by ID through a [`BatchResolver`]. An entry, once present, is
/// never replaced or removed.
pub struct Catalog<E: CatalogEntry> {
    entries: Arc<DashMap<E::Id, Arc<E>>>,
    resolver: BatchResolver<E>,
    bulk: LoadOnce<ApiError>,
    fetcher: Arc<dyn ResourceFetcher>,
}

impl<E: CatalogEntry> Catalog<E> {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, settings: BatchSettings) -> Self {
        let entries = Arc::new(DashMap::new());
        Self {
            resolver: BatchResolver::new(entries.clone(), settings),
            entries,
            bulk: LoadOnce::new(),
            fetcher,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        E::ENDPOINT
    }

    pub fn get(&self, id: &E::Id) -> Option<Arc<E>> {
        self.entries.get(id).map(|e| e.value().clone())
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.entries.contains_key(id)
    }

    /// Fetches the whole catalog once per session.
    ///
    /// Concurrent callers share the pending request and its outcome. Once a
    /// failure has settled the next call tries again; after a success later
    /// calls return immediately.
    pub async fn load_all(&self) -> Result<(), TyriaError> {
        if !E::BULK {
            return Err(TyriaError::Config(format!(
                "catalog `{}` cannot be loaded in bulk; resolve entries by id",
                E::ENDPOINT
            )));
        }
        self.bulk
            .run(|| async {
                let list: Vec<E> =
                    fetch_json(self.fetcher.as_ref(), E::ENDPOINT, &Query::all()).await?;
                info!(endpoint = E::ENDPOINT, count = list.len(), "catalog loaded");
                self.resolver.merge(list);
                Ok(())
            })
            .await
            .map_err(TyriaError::from)
    }

    /// Resolves `ids`, fetching only those not cached or already in flight.
    pub async fn load_by_ids(&self, ids: &[E::Id]) -> Resolution<E> {
        if ids.is_empty() {
            return Resolution::default();
        }
        debug!(endpoint = E::ENDPOINT, count = ids.len(), "loading catalog entries by id");
        self.resolver.resolve(self.fetcher.as_ref(), ids).await
    }

    /// Whether a bulk load has completed.
    pub fn is_loaded(&self) -> bool {
        self.bulk.is_done()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every cached entry, in no particular order.
    pub fn values(&self) -> Vec<Arc<E>> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }

    /// Copies the cached entries into a plain map.
    pub fn snapshot(&self) -> HashMap<E::Id, Arc<E>> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Inserts entries obtained elsewhere, keeping any already present.
    pub fn extend(&self, entries: Vec<E>) {
        self.resolver.merge(entries);
    }
}

impl<E: CatalogEntry> Lookup<E::Id, E> for Catalog<E> {
    fn lookup(&self, key: &E::Id) -> Option<Arc<E>> {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyria_core::{ApiError, ApiErrorKind};
    use tyria_test_utils::{MockFetcher, fixtures};

    use crate::entities::{Currency, Item};

    fn catalog<E: CatalogEntry>(mock: &Arc<MockFetcher>) -> Catalog<E> {
        Catalog::new(mock.clone(), BatchSettings::default())
    }

    #[tokio::test]
    async fn load_all_fetches_once() {
        let mock = Arc::new(MockFetcher::new());
        mock.catalog("currencies", fixtures::currencies());
        let currencies: Catalog<Currency> = catalog(&mock);

        currencies.load_all().await.unwrap();
        currencies.load_all().await.unwrap();

        assert!(currencies.is_loaded());
        assert_eq!(currencies.len(), 3);
        assert_eq!(currencies.get(&1).unwrap().name, "Coin");
        assert_eq!(mock.call_count("currencies"), 1);
    }

    #[tokio::test]
    async fn concurrent_load_all_shares_one_request() {
        let mock = Arc::new(MockFetcher::new());
        mock.catalog("currencies", fixtures::currencies());
        let currencies: Arc<Catalog<Currency>> = Arc::new(catalog(&mock));

        let loads = (0..5).map(|_| {
            let currencies = currencies.clone();
            async move { currencies.load_all().await }
        });
        let results = futures::future::join_all(loads).await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(mock.call_count("currencies"), 1);
    }

    #[tokio::test]
    async fn failed_load_all_can_be_retried() {
        let mock = Arc::new(MockFetcher::new());
        mock.on_error(
            "currencies",
            ApiError::from_status(503, "Service Unavailable", "currencies"),
        );
        let currencies: Catalog<Currency> = catalog(&mock);

        let err = currencies.load_all().await.unwrap_err();
        assert_eq!(err.as_api().map(ApiError::kind), Some(ApiErrorKind::Server));
        assert!(!currencies.is_loaded());

        mock.catalog("currencies", fixtures::currencies());
        currencies.load_all().await.unwrap();
        assert!(currencies.is_loaded());
        assert_eq!(mock.call_count("currencies"), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_a_failed_load() {
        let mock = Arc::new(MockFetcher::new());
        let gate = mock.gated_error(
            "currencies",
            ApiError::from_status(503, "Service Unavailable", "currencies"),
        );
        let currencies: Arc<Catalog<Currency>> = Arc::new(catalog(&mock));

        let loads: Vec<_> = (0..5)
            .map(|_| {
                let currencies = currencies.clone();
                tokio::spawn(async move { currencies.load_all().await })
            })
            .collect();
        while mock.call_count("currencies") == 0 {
            tokio::task::yield_now().await;
        }
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        gate.open();

        for load in loads {
            let err = load.await.unwrap().unwrap_err();
            assert_eq!(err.as_api().map(ApiError::kind), Some(ApiErrorKind::Server));
        }
        assert_eq!(mock.call_count("currencies"), 1);
        assert!(!currencies.is_loaded());
    }

    #[tokio::test]
    async fn id_only_catalog_rejects_bulk_load() {
        let mock = Arc::new(MockFetcher::new());
        let items: Catalog<Item> = catalog(&mock);
        assert!(matches!(items.load_all().await, Err(TyriaError::Config(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn load_by_ids_populates_and_lookup_reads() {
        let mock = Arc::new(MockFetcher::new());
        mock.catalog(
            "items",
            vec![fixtures::item(10, "Ten", "Rare"), fixtures::item(20, "Twenty", "Basic")],
        );
        let items: Catalog<Item> = catalog(&mock);

        let resolution = items.load_by_ids(&[10, 20, 10]).await;
        assert!(resolution.is_complete());
        assert_eq!(items.lookup(&20).unwrap().name, "Twenty");
        assert_eq!(resolution.lookup(&10).unwrap().name, "Ten");

        let snapshot = items.snapshot();
        assert_eq!(snapshot.lookup(&10).map(|i| i.id), Some(10));
        assert_eq!(items.values().len(), 2);
    }

    #[tokio::test]
    async fn entries_are_never_removed_or_altered() {
        let mock = Arc::new(MockFetcher::new());
        mock.catalog("items", vec![fixtures::item(1, "First", "Fine")]);
        let items: Catalog<Item> = catalog(&mock);
        items.load_by_ids(&[1]).await;
        let before = items.get(&1).unwrap();

        mock.catalog("items", vec![fixtures::item(1, "Changed", "Legendary")]);
        items.load_by_ids(&[1, 2]).await;
        items.extend(vec![serde_json::from_value(fixtures::item(1, "Again", "Junk")).unwrap()]);

        let after = items.get(&1).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.name, "First");
        assert_eq!(items.len(), 1);
    }
}

// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memoized async operations.
//!
//! Every caller that arrives while an attempt is pending joins it and gets its
//! outcome, success or failure, so one attempt is ever in flight. A failure is
//! forgotten once it settles and the next call starts fresh; a success is
//! kept. [`LoadOnce`] holds one such operation, [`KeyedLoadOnce`] one per key.

use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use tokio::sync::watch;

type Outcome<T, E> = Option<Result<T, E>>;

enum Slot<T, E> {
    Pending(watch::Receiver<Outcome<T, E>>),
    Ready(T),
}

enum Join<T, E> {
    Ready(T),
    Wait(watch::Receiver<Outcome<T, E>>),
    Lead(watch::Sender<Outcome<T, E>>),
}

/// One memoized operation.
struct Flight<T, E> {
    slot: Mutex<Option<Slot<T, E>>>,
}

impl<T, E> Default for Flight<T, E> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone, E: Clone> Flight<T, E> {
    fn lock(&self) -> MutexGuard<'_, Option<Slot<T, E>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decides, without awaiting, whether this caller reuses a value, waits
    /// on a pending attempt or leads a new one.
    fn join(&self) -> Join<T, E> {
        let mut slot = self.lock();
        match &*slot {
            Some(Slot::Ready(value)) => Join::Ready(value.clone()),
            Some(Slot::Pending(rx)) => Join::Wait(rx.clone()),
            None => {
                let (tx, rx) = watch::channel(None);
                *slot = Some(Slot::Pending(rx));
                Join::Lead(tx)
            }
        }
    }

    async fn run<F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let tx = loop {
            let mut rx = match self.join() {
                Join::Ready(value) => return Ok(value),
                Join::Wait(rx) => rx,
                Join::Lead(tx) => break tx,
            };
            // Err means the leader was dropped before settling; start over.
            let outcome = rx.wait_for(Option::is_some).await.ok().and_then(|r| (*r).clone());
            if let Some(result) = outcome {
                return result;
            }
        };

        let lead = Lead {
            flight: self,
            tx: Some(tx),
        };
        let result = op().await;
        lead.settle(&result);
        result
    }

    fn ready(&self) -> Option<T> {
        match &*self.lock() {
            Some(Slot::Ready(value)) => Some(value.clone()),
            _ => None,
        }
    }
}

/// The running attempt. Dropped without settling (the leading caller was
/// cancelled), it reopens the slot and waiters retry.
struct Lead<'a, T: Clone, E: Clone> {
    flight: &'a Flight<T, E>,
    tx: Option<watch::Sender<Outcome<T, E>>>,
}

impl<T: Clone, E: Clone> Lead<'_, T, E> {
    fn settle(mut self, result: &Result<T, E>) {
        *self.flight.lock() = match result {
            Ok(value) => Some(Slot::Ready(value.clone())),
            Err(_) => None,
        };
        if let Some(tx) = self.tx.take() {
            tx.send_replace(Some(result.clone()));
        }
    }
}

impl<T: Clone, E: Clone> Drop for Lead<'_, T, E> {
    fn drop(&mut self) {
        if self.tx.is_some() {
            *self.flight.lock() = None;
        }
    }
}

/// "Run once, share the in-flight attempt, retry after failure."
pub struct LoadOnce<E> {
    flight: Flight<(), E>,
}

impl<E> Default for LoadOnce<E> {
    fn default() -> Self {
        Self {
            flight: Flight::default(),
        }
    }
}

impl<E: Clone> LoadOnce<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `op` unless a previous call already succeeded.
    ///
    /// While one caller's `op` is pending, other callers wait for it and
    /// receive its result, including its error.
    pub async fn run<F, Fut>(&self, op: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        self.flight.run(op).await
    }

    /// Whether an operation has completed successfully.
    pub fn is_done(&self) -> bool {
        self.flight.ready().is_some()
    }
}

/// Per-key memoized operation whose successful result is kept.
pub struct KeyedLoadOnce<K, T, E>
where
    K: Eq + Hash,
{
    flights: DashMap<K, Arc<Flight<T, E>>>,
}

impl<K, T, E> Default for KeyedLoadOnce<K, T, E>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            flights: DashMap::new(),
        }
    }
}

impl<K, T, E> KeyedLoadOnce<K, T, E>
where
    K: Eq + Hash + Clone,
    T: Clone,
    E: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, joining an in-flight load or starting one.
    pub async fn get_or_try_load<F, Fut>(&self, key: K, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        // Clone the flight out so the map shard is not locked across the await.
        let flight = self.flights.entry(key).or_default().value().clone();
        flight.run(op).await
    }

    /// The value for `key`, if a load has completed.
    pub fn get(&self, key: &K) -> Option<T> {
        self.flights.get(key).and_then(|flight| flight.ready())
    }

    /// Forgets `key`. A load still in flight finishes but is not kept.
    pub fn invalidate(&self, key: &K) {
        self.flights.remove(key);
    }

    /// Forgets every key for which `keep` returns false.
    pub fn retain(&self, mut keep: impl FnMut(&K) -> bool) {
        self.flights.retain(|key, _| keep(key));
    }

    /// Forgets every key.
    pub fn clear(&self) {
        self.flights.clear();
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

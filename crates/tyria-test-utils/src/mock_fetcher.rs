// SPDX-FileCopyrightText: 2026 Tyria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted `ResourceFetcher` for deterministic tests.
//!
//! Routes are registered per endpoint (optionally per access token), every
//! call is recorded, and a route can be gated so its response is held back
//! until the test releases it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;
use tyria_core::{ApiError, Query, ResourceFetcher};

type Handler = Arc<dyn Fn(&Query) -> Result<Value, ApiError> + Send + Sync>;

struct Route {
    endpoint: String,
    token: Option<String>,
    handler: Handler,
    gate: Option<Arc<Notify>>,
}

/// One request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub query: Query,
}

/// Holds back a gated route's response until [`Gate::open`] is called.
///
/// Each `open` releases exactly one pending or future request.
#[derive(Clone)]
pub struct Gate {
    notify: Arc<Notify>,
}

impl Gate {
    pub fn open(&self) {
        self.notify.notify_one();
    }
}

/// A fetcher whose responses are scripted by the test.
///
/// Unrouted requests fail with a 404 `NotFound` error. When several routes
/// match, a token-specific one wins over a generic one, and later
/// registrations win over earlier ones.
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(endpoint: &str) -> ApiError {
    ApiError::from_status(404, "Not Found", endpoint)
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(
        &self,
        endpoint: &str,
        token: Option<&str>,
        handler: Handler,
        gate: Option<Arc<Notify>>,
    ) {
        lock(&self.routes).push(Route {
            endpoint: endpoint.to_string(),
            token: token.map(str::to_string),
            handler,
            gate,
        });
    }

    /// Responds to `endpoint` with `body`.
    pub fn on(&self, endpoint: &str, body: Value) -> &Self {
        self.route(endpoint, None, Arc::new(move |_| Ok(body.clone())), None);
        self
    }

    /// Responds to `endpoint` with `body` only for requests carrying `token`.
    pub fn on_for_token(&self, endpoint: &str, token: &str, body: Value) -> &Self {
        self.route(endpoint, Some(token), Arc::new(move |_| Ok(body.clone())), None);
        self
    }

    /// Fails every request to `endpoint` with `error`.
    pub fn on_error(&self, endpoint: &str, error: ApiError) -> &Self {
        self.route(endpoint, None, Arc::new(move |_| Err(error.clone())), None);
        self
    }

    /// Answers `endpoint` with a closure over the request query.
    pub fn on_with<F>(&self, endpoint: &str, handler: F) -> &Self
    where
        F: Fn(&Query) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        self.route(endpoint, None, Arc::new(handler), None);
        self
    }

    /// Serves `entries` like a catalog endpoint.
    ///
    /// `ids=all` returns everything, `ids=a,b` returns the matching subset
    /// (unknown IDs are silently omitted), and no `ids` returns the ID list.
    /// A lookup matching nothing is a 404, as the live API does.
    pub fn catalog(&self, endpoint: &str, entries: Vec<Value>) -> &Self {
        let name = endpoint.to_string();
        self.on_with(endpoint, move |query| match query.get("ids") {
            Some("all") => Ok(Value::Array(entries.clone())),
            None => Ok(Value::Array(
                entries.iter().map(|e| e["id"].clone()).collect(),
            )),
            Some(list) => {
                let wanted: HashSet<&str> = list.split(',').collect();
                let found: Vec<Value> = entries
                    .iter()
                    .filter(|e| id_text(e).is_some_and(|id| wanted.contains(id.as_str())))
                    .cloned()
                    .collect();
                if found.is_empty() {
                    Err(not_found(&name))
                } else {
                    Ok(Value::Array(found))
                }
            }
        })
    }

    /// Like [`on`](Self::on), but the response waits for the returned gate.
    pub fn gated(&self, endpoint: &str, token: Option<&str>, body: Value) -> Gate {
        let notify = Arc::new(Notify::new());
        self.route(
            endpoint,
            token,
            Arc::new(move |_| Ok(body.clone())),
            Some(notify.clone()),
        );
        Gate { notify }
    }

    /// Like [`on_error`](Self::on_error), but the failure waits for the
    /// returned gate.
    pub fn gated_error(&self, endpoint: &str, error: ApiError) -> Gate {
        let notify = Arc::new(Notify::new());
        self.route(
            endpoint,
            None,
            Arc::new(move |_| Err(error.clone())),
            Some(notify.clone()),
        );
        Gate { notify }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    /// Every ID requested from `endpoint`, in request order.
    pub fn requested_ids(&self, endpoint: &str) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .filter_map(|c| c.query.get("ids").map(str::to_string))
            .flat_map(|ids| ids.split(',').map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    fn find(&self, endpoint: &str, query: &Query) -> Option<(Handler, Option<Arc<Notify>>)> {
        let token = query.get("access_token");
        let routes = lock(&self.routes);
        let candidates = routes
            .iter()
            .rev()
            .filter(|r| r.endpoint == endpoint);
        let mut generic = None;
        for route in candidates {
            match (&route.token, token) {
                (Some(wanted), Some(actual)) if wanted == actual => {
                    return Some((route.handler.clone(), route.gate.clone()));
                }
                (None, _) if generic.is_none() => {
                    generic = Some((route.handler.clone(), route.gate.clone()));
                }
                _ => {}
            }
        }
        generic
    }
}

fn id_text(entry: &Value) -> Option<String> {
    match &entry["id"] {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl ResourceFetcher for MockFetcher {
    async fn fetch(&self, endpoint: &str, query: &Query) -> Result<Value, ApiError> {
        lock(&self.calls).push(RecordedCall {
            endpoint: endpoint.to_string(),
            query: query.clone(),
        });

        let route = self.find(endpoint, query);

        // Let concurrent callers interleave as they would over the network.
        tokio::task::yield_now().await;

        let Some((handler, gate)) = route else {
            return Err(not_found(endpoint));
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        handler(query)
    }
}

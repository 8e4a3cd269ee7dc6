use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::resource::{QueryKey, Resource};
use super::source::{RemoteSource, SourceRequest, TransportError};
use super::state::QueryResult;

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Value>, TransportError>>>;

struct InFlight {
    generation: u64,
    fetch: SharedFetch,
}

struct CacheEntry {
    payload: Arc<Value>,
    fetched_at: Instant,
}

#[derive(Default)]
struct Registry {
    cache: HashMap<QueryKey, CacheEntry>,
    in_flight: HashMap<QueryKey, InFlight>,
}

struct Inner<S> {
    source: Arc<S>,
    stale_time: Duration,
    generation: AtomicU64,
    registry: Mutex<Registry>,
}

/// Deduplicating, caching front for a [`RemoteSource`].
///
/// Cloning is cheap; clones share the cache and the in-flight registry.
pub struct QueryClient<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for QueryClient<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RemoteSource> QueryClient<S> {
    pub fn new(source: Arc<S>, stale_time: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                stale_time,
                generation: AtomicU64::new(1),
                registry: Mutex::new(Registry::default()),
            }),
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.inner.source
    }

    /// Runs one observation of `query` to its terminal state.
    pub async fn fetch<R: Resource>(&self, query: &R) -> QueryResult<R::Item> {
        let key = query.key();
        match self.payload(&key, query.request()).await {
            Ok(payload) => {
                QueryResult::from_records(R::records(&payload), R::FAILURE_CONTEXT, R::normalize)
            }
            Err(err) => {
                warn!(key = %key, error = %err, "catalog query failed");
                QueryResult::failed(R::FAILURE_CONTEXT, err)
            }
        }
    }

    /// Starts an observation in the background and returns a handle that
    /// reads `Loading` until the query settles.
    ///
    /// Dropping the handle discards the outcome; the underlying request still
    /// completes for any other observer and for the cache.
    pub fn observe<R: Resource>(&self, query: R) -> QueryHandle<R::Item> {
        let key = query.key();
        let (sender, receiver) = watch::channel(QueryResult::Loading);
        let client = self.clone();
        let task_key = key.clone();

        tokio::spawn(async move {
            let result = client.fetch(&query).await;
            if sender.send(result).is_err() {
                debug!(key = %task_key, "observer gone before query settled; result discarded");
            }
        });

        QueryHandle {
            key,
            context: R::FAILURE_CONTEXT,
            receiver,
        }
    }

    /// Drops the cached response for `key`; the next query refetches.
    pub fn invalidate(&self, key: &QueryKey) {
        if self.registry().cache.remove(key).is_some() {
            debug!(key = %key, "cache entry invalidated");
        }
    }

    pub fn invalidate_all(&self) {
        self.registry().cache.clear();
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.registry().in_flight.contains_key(key)
    }

    /// Number of responses currently held in the cache.
    pub fn cached_len(&self) -> usize {
        self.registry().cache.len()
    }

    async fn payload(
        &self,
        key: &QueryKey,
        request: SourceRequest,
    ) -> Result<Arc<Value>, TransportError> {
        let (generation, fetch) = {
            let mut registry = self.registry();

            let stale_time = self.inner.stale_time;
            registry
                .cache
                .retain(|_, entry| entry.fetched_at.elapsed() < stale_time);
            if let Some(entry) = registry.cache.get(key) {
                debug!(key = %key, "serving cached response");
                return Ok(Arc::clone(&entry.payload));
            }

            match registry.in_flight.get(key) {
                Some(in_flight) => {
                    debug!(key = %key, "joining in-flight request");
                    (in_flight.generation, in_flight.fetch.clone())
                }
                None => {
                    let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
                    let source = Arc::clone(&self.inner.source);
                    let fetch = async move { source.get(&request).await.map(Arc::new) }
                        .boxed()
                        .shared();
                    registry.in_flight.insert(
                        key.clone(),
                        InFlight {
                            generation,
                            fetch: fetch.clone(),
                        },
                    );
                    self.drive(key.clone(), generation, fetch.clone());
                    (generation, fetch)
                }
            }
        };

        let outcome = fetch.await;
        self.settle(key, generation, &outcome);
        outcome
    }

    /// Polls the request to completion on its own task, so the slot settles
    /// even when every caller is cancelled mid-await.
    fn drive(&self, key: QueryKey, generation: u64, fetch: SharedFetch) {
        let client = self.clone();
        tokio::spawn(async move {
            let outcome = fetch.await;
            client.settle(&key, generation, &outcome);
        });
    }

    /// Whoever finishes first, the driver or an observer, retires the
    /// in-flight entry and caches a successful payload.
    fn settle(&self, key: &QueryKey, generation: u64, outcome: &Result<Arc<Value>, TransportError>) {
        let mut registry = self.registry();
        let owns_slot = registry
            .in_flight
            .get(key)
            .is_some_and(|in_flight| in_flight.generation == generation);
        if !owns_slot {
            return;
        }

        registry.in_flight.remove(key);
        if let Ok(payload) = outcome {
            if !self.inner.stale_time.is_zero() {
                registry.cache.insert(
                    key.clone(),
                    CacheEntry {
                        payload: Arc::clone(payload),
                        fetched_at: Instant::now(),
                    },
                );
            }
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Observer side of [`QueryClient::observe`].
#[derive(Debug)]
pub struct QueryHandle<T> {
    key: QueryKey,
    context: &'static str,
    receiver: watch::Receiver<QueryResult<T>>,
}

impl<T: Clone> QueryHandle<T> {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn current(&self) -> QueryResult<T> {
        self.receiver.borrow().clone()
    }

    /// Waits for the terminal state.
    pub async fn settled(mut self) -> QueryResult<T> {
        match self.receiver.wait_for(QueryResult::is_terminal).await {
            Ok(result) => result.clone(),
            Err(_) => QueryResult::failed(self.context, "query task stopped before settling"),
        }
    }
}

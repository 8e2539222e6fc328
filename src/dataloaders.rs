//! DataLoader utilities for per-request loading
//!
//! Implements the DataLoader pattern for preventing N+1 upstream calls.
//! See: https://github.com/graphql/dataloader
//!
//! The upstream only answers single-id lookups, so the loader coalesces
//! duplicate keys rather than packing several keys into one call. The first
//! `load(k)` starts the fetch and stores it as a shared future; every later
//! `load(k)` in the same scope awaits that same future, whether it is still
//! in flight or already finished. Failures are cached the same way.

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;

use crate::rest::RestClient;
use crate::types::User;
use crate::{GatewayError, Result};

/// Single-key loader trait
#[async_trait]
pub trait Loader<K>: Send + Sync
where
    K: Send + Sync + Clone + Eq + Hash,
{
    type Value: Send + Sync + Clone + 'static;

    /// Fetch the value for one key from the underlying source
    ///
    /// Called at most once per key for the lifetime of a [`DataLoader`].
    async fn load_one(&self, key: &K) -> Result<Self::Value>;
}

type PendingLoad<V> = Shared<BoxFuture<'static, Result<V>>>;

/// DataLoader with coalescing and caching
///
/// Create one per GraphQL execution and drop it when the execution ends;
/// nothing is evicted while it lives.
pub struct DataLoader<K, L>
where
    K: Send + Sync + Clone + Eq + Hash + Debug + 'static,
    L: Loader<K> + 'static,
{
    loader: Arc<L>,
    cache: Arc<Mutex<HashMap<K, PendingLoad<L::Value>>>>,
}

impl<K, L> DataLoader<K, L>
where
    K: Send + Sync + Clone + Eq + Hash + Debug + 'static,
    L: Loader<K> + 'static,
{
    /// Create new DataLoader around a loader
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Load a single item by key
    ///
    /// Joins an in-flight or finished load for the same key if there is one,
    /// otherwise starts it.
    pub async fn load(&self, key: K) -> Result<L::Value> {
        let pending = {
            let mut cache = self.cache.lock().await;
            match cache.get(&key) {
                Some(pending) => {
                    trace!(?key, "joining existing load");
                    pending.clone()
                }
                None => {
                    trace!(?key, "starting load");
                    let loader = self.loader.clone();
                    let owned_key = key.clone();
                    let pending = async move { loader.load_one(&owned_key).await }
                        .boxed()
                        .shared();
                    cache.insert(key, pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Load multiple items by keys
    ///
    /// Keys are loaded concurrently; duplicates share one upstream call.
    /// Results come back in the order of `keys`.
    pub async fn load_many(&self, keys: Vec<K>) -> Vec<Result<L::Value>> {
        future::join_all(keys.into_iter().map(|key| self.load(key))).await
    }

    /// Prime the cache with a value
    ///
    /// Does not overwrite a key that is already loading or loaded.
    pub async fn prime(&self, key: K, value: L::Value) {
        let mut cache = self.cache.lock().await;
        cache
            .entry(key)
            .or_insert_with(|| future::ready(Ok::<_, GatewayError>(value)).boxed().shared());
    }

    /// Number of distinct keys seen by this loader
    pub async fn distinct_keys(&self) -> usize {
        self.cache.lock().await.len()
    }
}

impl<K, L> Clone for DataLoader<K, L>
where
    K: Send + Sync + Clone + Eq + Hash + Debug + 'static,
    L: Loader<K> + 'static,
{
    fn clone(&self) -> Self {
        Self {
            loader: self.loader.clone(),
            cache: self.cache.clone(),
        }
    }
}

/// Loads full [`User`] records via `GET /users?id=<id>`
pub struct UserLoader {
    client: RestClient,
}

impl UserLoader {
    pub const PATH: &'static str = "/users";

    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Loader<String> for UserLoader {
    type Value = User;

    async fn load_one(&self, id: &String) -> Result<User> {
        self.client.fetch_by_id(Self::PATH, id).await
    }
}

/// Convenience alias for the per-request user loader
pub type UserDataLoader = DataLoader<String, UserLoader>;

impl From<RestClient> for UserDataLoader {
    fn from(client: RestClient) -> Self {
        DataLoader::new(UserLoader::new(client))
    }
}

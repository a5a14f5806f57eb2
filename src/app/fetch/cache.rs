//! Single-flight cache shared by the fetch-funcs of one fetcher.
//!
//! Each key maps to a `tokio::sync::OnceCell` kept in a moka cache. The first caller of
//! [`FetchCache::get`] runs the producer; concurrent callers for the same key wait on the
//! cell and receive the same outcome, errors included. Values are type-erased and
//! downcast on the way out.

use std::any::{type_name, Any};
use std::future::Future;
use std::sync::Arc;

use moka::sync::Cache;
use tokio::sync::OnceCell;

use crate::app::error::FetchError;

type Shared = Arc<dyn Any + Send + Sync>;
type Slot = Arc<OnceCell<Result<Shared, FetchError>>>;

#[derive(Clone)]
pub struct FetchCache {
    entries: Cache<String, Slot>,
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl FetchCache {
    pub fn new() -> Self {
        FetchCache {
            entries: Cache::builder().build(),
        }
    }

    /// Value stored under `key`, running `producer` once if the key is empty.
    ///
    /// The producer must not ask for its own key.
    pub async fn get<T, F, Fut>(&self, key: &str, producer: F) -> Result<Arc<T>, FetchError>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let slot = self
            .entries
            .get_with(key.to_string(), || Arc::new(OnceCell::new()));

        let stored = slot
            .get_or_init(|| async move {
                trace_debug!("cache miss for '{}'", key);
                producer().await.map(|value| Arc::new(value) as Shared)
            })
            .await;

        downcast(key, stored.clone())
    }

    /// Overwrites `key`.
    pub fn store<T: Any + Send + Sync>(&self, key: &str, value: T) {
        let cell = OnceCell::new_with(Some(Ok(Arc::new(value) as Shared)));
        self.entries.insert(key.to_string(), Arc::new(cell));
    }

    /// Value under `key` if a producer already completed for it.
    pub fn peek<T: Any + Send + Sync>(&self, key: &str) -> Result<Option<Arc<T>>, FetchError> {
        match self.entries.get(key).as_ref().and_then(|slot| slot.get()) {
            Some(stored) => downcast(key, stored.clone()).map(Some),
            None => Ok(None),
        }
    }

    pub fn reset(&self) {
        self.entries.invalidate_all();
    }
}

fn downcast<T: Any + Send + Sync>(key: &str, stored: Result<Shared, FetchError>) -> Result<Arc<T>, FetchError> {
    stored?
        .downcast::<T>()
        .map_err(|_| FetchError::type_cast(key, type_name::<T>()))
}

//! Concurrent fetch orchestration.
//!
//! A [`Fetcher`] owns one fetch-func per resource type. [`Fetcher::fetch`] runs them all
//! concurrently, folds their resources into a [`Graph`] and keeps every type's raw
//! objects in the [`FetchCache`] under `"<type>_objects"` for relation inference.
//! Fetch-funcs share the cache for intermediate results such as the cluster list, which
//! is computed once however many fetch-funcs need it.

pub mod cache;
pub mod context;

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;

use crate::app::cloud::ResourceType;
use crate::app::config::Config;
use crate::app::convert::new_resource;
use crate::app::dto::{Dto, FromDto};
use crate::app::error::{Error, FetchError, ProviderError, ProviderErrorCategory};
use crate::app::graph::{Graph, Resource};
use crate::app::provider::{Page, ProviderResult};

pub use cache::FetchCache;
pub use context::FetchContext;

/// Cache key of the raw objects of `kind`.
pub fn objects_key(kind: ResourceType) -> String {
    format!("{}_objects", kind)
}

/// What a fetch-func produced.
#[derive(Debug, Default)]
pub struct FetchOutput {
    pub resources: Vec<Resource>,
    pub objects: Vec<Dto>,
    pub error: Error,
}

impl FetchOutput {
    pub fn failed(err: impl Into<Error>) -> Self {
        FetchOutput {
            error: err.into(),
            ..Default::default()
        }
    }

    /// Converts `dto` and appends both forms. Returns false when conversion reported errors.
    pub async fn push(&mut self, dto: Dto) -> bool {
        let (res, errors) = new_resource(&dto).await;
        self.push_converted(res, dto, errors)
    }

    /// Appends an already converted resource, e.g. one with extra properties set.
    pub fn push_converted(&mut self, res: Resource, dto: Dto, errors: Error) -> bool {
        let clean = !errors.any();
        self.error.add(errors);
        self.resources.push(res);
        self.objects.push(dto);
        clean
    }
}

pub type FetchFunc = Arc<dyn Fn(FetchContext, FetchCache) -> BoxFuture<'static, FetchOutput> + Send + Sync>;

/// Boxes an async closure into a [`FetchFunc`].
pub fn fetch_func<F, Fut>(f: F) -> FetchFunc
where
    F: Fn(FetchContext, FetchCache) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchOutput> + Send + 'static,
{
    Arc::new(move |ctx, cache| f(ctx, cache).boxed())
}

/// Config switch deciding whether a type is fetched.
#[derive(Debug, Clone)]
pub struct SyncGate {
    config: Arc<Config>,
    service: &'static str,
}

impl SyncGate {
    pub fn new(config: Arc<Config>, service: &'static str) -> Self {
        SyncGate { config, service }
    }

    pub fn allows(&self, ctx: &FetchContext, kind: ResourceType) -> bool {
        if ctx.force() || self.config.type_sync(self.service, kind.as_str()) {
            return true;
        }
        log_info!(
            "sync disabled for {}.{}, skipping (use force to fetch anyway)",
            self.service,
            kind
        );
        false
    }

    /// Wraps `func` so that it returns nothing, without any provider call, when gated off.
    pub fn wrap(&self, kind: ResourceType, func: FetchFunc) -> FetchFunc {
        let gate = self.clone();
        Arc::new(move |ctx, cache| {
            if gate.allows(&ctx, kind) {
                func(ctx, cache)
            } else {
                futures::future::ready(FetchOutput::default()).boxed()
            }
        })
    }
}

pub struct Fetcher {
    funcs: BTreeMap<ResourceType, FetchFunc>,
    cache: FetchCache,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("types", &self.funcs.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Fetcher {
            funcs: BTreeMap::new(),
            cache: FetchCache::new(),
        }
    }

    pub fn register(mut self, kind: ResourceType, func: FetchFunc) -> Self {
        self.funcs.insert(kind, func);
        self
    }

    pub fn resource_types(&self) -> Vec<ResourceType> {
        self.funcs.keys().copied().collect()
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Runs every fetch-func concurrently.
    pub async fn fetch(&self, ctx: &FetchContext) -> (Graph, Error) {
        log_info!("fetching {} resource types in {}", self.funcs.len(), ctx.region());

        let runs = self.funcs.iter().map(|(kind, func)| {
            let run = func(ctx.clone(), self.cache.clone());
            async move { (*kind, run.await) }
        });
        let outputs = join_all(runs).await;

        let graph = Graph::new();
        let mut errors = Error::new();
        for (kind, output) in outputs {
            self.absorb(kind, output, &graph, &mut errors);
        }

        log_info!("fetched {} resources in {} ({} errors)", graph.len(), ctx.region(), errors.len());
        (graph, errors)
    }

    /// Runs the fetch-func of `kind` only.
    pub async fn fetch_by_type(&self, ctx: &FetchContext, kind: ResourceType) -> (Graph, Error) {
        let graph = Graph::new();
        let mut errors = Error::new();
        let func = match self.funcs.get(&kind) {
            Some(func) => func,
            None => {
                errors.add(FetchError::UnknownResourceType(kind.to_string()));
                return (graph, errors);
            }
        };

        let output = func(ctx.clone().fetching_type(kind), self.cache.clone()).await;
        self.absorb(kind, output, &graph, &mut errors);
        (graph, errors)
    }

    fn absorb(&self, kind: ResourceType, output: FetchOutput, graph: &Graph, errors: &mut Error) {
        trace_debug!("{}: {} resources", kind, output.resources.len());
        graph.add_resources(output.resources.iter().cloned());
        self.cache.store(kind.as_str(), output.resources);
        self.cache.store(&objects_key(kind), output.objects);
        errors.add(output.error);
    }

    /// A cached intermediate value; `None` when nothing was stored under `key`.
    pub fn get<T: std::any::Any + Send + Sync>(&self, key: &str) -> Result<Option<Arc<T>>, FetchError> {
        self.cache.peek(key)
    }

    /// Raw objects fetched for `kind`; empty when the type was not fetched.
    pub fn objects(&self, kind: ResourceType) -> Result<Arc<Vec<Dto>>, FetchError> {
        Ok(self
            .cache
            .peek::<Vec<Dto>>(&objects_key(kind))?
            .unwrap_or_default())
    }

    /// Raw objects of `kind` as their concrete shape.
    pub fn get_objects<T: FromDto + Clone>(&self, kind: ResourceType) -> Result<Vec<T>, FetchError> {
        self.objects(kind)?
            .iter()
            .map(|dto| {
                T::from_dto(dto)
                    .cloned()
                    .ok_or_else(|| FetchError::type_cast(objects_key(kind), std::any::type_name::<T>()))
            })
            .collect()
    }

    pub fn reset(&self) {
        self.cache.reset();
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Maps a provider failure met while listing `kind`.
pub fn pagination_error(kind: ResourceType, err: ProviderError) -> FetchError {
    match err.category() {
        ProviderErrorCategory::AccessDenied => FetchError::AccessDenied,
        _ => FetchError::Pagination {
            kind: kind.to_string(),
            message: err.to_string(),
        },
    }
}

/// Pages through `call`, converting every item.
pub async fn paginate<T, C, Fut>(ctx: &FetchContext, kind: ResourceType, call: C) -> FetchOutput
where
    T: Into<Dto>,
    C: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
{
    paginate_with(ctx, kind, call, |item: T| vec![item.into()]).await
}

/// Like [`paginate`], with `explode` turning each page item into zero or more objects.
///
/// Pages are requested while a next token is returned. A conversion error stops the
/// stream after the current page; a provider error or a cancellation stops it at once.
pub async fn paginate_with<T, C, Fut, E>(ctx: &FetchContext, kind: ResourceType, mut call: C, explode: E) -> FetchOutput
where
    C: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
    E: Fn(T) -> Vec<Dto>,
{
    let mut output = FetchOutput::default();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        if ctx.is_cancelled() {
            output.error.add(FetchError::Cancelled);
            break;
        }

        let page = tokio::select! {
            _ = ctx.cancellation().cancelled() => {
                output.error.add(FetchError::Cancelled);
                break;
            }
            page = call(token.take()) => page,
        };

        let page = match page {
            Ok(page) => page,
            Err(e) => {
                output.error.add(pagination_error(kind, e));
                break;
            }
        };
        pages += 1;

        let mut clean = true;
        for item in page.items {
            for dto in explode(item) {
                clean &= output.push(dto).await;
            }
        }
        trace_debug!("{}: page {} done, {} resources so far", kind, pages, output.resources.len());

        if !clean {
            break;
        }
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    output
}

/// Runs `f` for every input concurrently. The first error is returned and cancels the
/// child token handed to the peers.
pub async fn fan_out<I, F, Fut, T>(ctx: &FetchContext, inputs: I, f: F) -> Result<Vec<T>, FetchError>
where
    I: IntoIterator,
    F: Fn(FetchContext, I::Item) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let child = ctx.child();
    let mut pending: FuturesUnordered<Fut> = inputs.into_iter().map(|input| f(child.clone(), input)).collect();

    let mut results = Vec::new();
    while let Some(result) = pending.next().await {
        match result {
            Ok(value) => results.push(value),
            Err(e) => {
                child.cancellation().cancel();
                return Err(e);
            }
        }
    }
    Ok(results)
}

/// Drains a paginated provider call into one list, without conversion.
pub async fn collect_pages<T, C, Fut>(ctx: &FetchContext, mut call: C) -> Result<Vec<T>, FetchError>
where
    C: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        if ctx.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        let page = tokio::select! {
            _ = ctx.cancellation().cancelled() => return Err(FetchError::Cancelled),
            page = call(token.take()) => page?,
        };
        items.extend(page.items);
        match page.next_token {
            Some(next) => token = Some(next),
            None => return Ok(items),
        }
    }
}

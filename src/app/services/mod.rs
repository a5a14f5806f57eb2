//! Cloud services: fetch pipelines and the registry holding them.
//!
//! A service owns the fetch-funcs of its resource types. [`Service::fetch`] runs them,
//! adds the service's region, snapshots the result and runs the relation rules of
//! every fetched object against that snapshot. The fetch cache is cleared whatever
//! the outcome.

pub mod access;
pub mod cdn;
pub mod cloudformation;
pub mod dns;
pub mod infra;
pub mod lambda;
pub mod messaging;
pub mod monitoring;
pub mod relations;
pub mod storage;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::app::cloud::{ResourceType, REGION_GLOBAL};
use crate::app::config::Config;
use crate::app::dto::Dto;
use crate::app::error::{Error, FetchError};
use crate::app::fetch::{fetch_func, paginate_with, FetchContext, FetchFunc, Fetcher, SyncGate};
use crate::app::graph::{Graph, Resource, ResourceKey};
use crate::app::provider::{Clients, Page, ProviderResult};

use self::relations::{rules_for, RelationCtx};

#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    /// Region the service fetches from, `global` for account-wide services.
    fn region(&self) -> &str;

    fn resource_types(&self) -> Vec<ResourceType>;

    fn is_sync_disabled(&self) -> bool;

    /// Fetches every owned type and infers their relations.
    async fn fetch(&self, ctx: &FetchContext) -> (Graph, Error);

    /// Fetches one type, without relation inference.
    async fn fetch_by_type(&self, ctx: &FetchContext, kind: ResourceType) -> (Graph, Error);
}

/// Clears the fetch cache when dropped.
struct ResetOnDrop<'a>(&'a Fetcher);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.reset();
    }
}

/// A service built from its fetch-funcs.
pub struct CloudService {
    name: &'static str,
    region: String,
    fetcher: Fetcher,
    config: Arc<Config>,
    clients: Clients,
}

impl std::fmt::Debug for CloudService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudService")
            .field("name", &self.name)
            .field("region", &self.region)
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

impl CloudService {
    /// Registers `funcs`, each behind the `cloud.<name>.<type>.sync` switch.
    pub fn new(
        name: &'static str,
        region: impl Into<String>,
        config: Arc<Config>,
        clients: Clients,
        funcs: Vec<(ResourceType, FetchFunc)>,
    ) -> Self {
        let gate = SyncGate::new(config.clone(), name);
        let fetcher = funcs
            .into_iter()
            .fold(Fetcher::new(), |fetcher, (kind, func)| fetcher.register(kind, gate.wrap(kind, func)));
        CloudService {
            name,
            region: region.into(),
            fetcher,
            config,
            clients,
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    async fn infer_relations(&self, ctx: &FetchContext, graph: &Graph, errors: &mut Error) {
        let snapshot = graph.snapshot();
        let rctx = RelationCtx {
            graph,
            snapshot: &snapshot,
            region: &self.region,
            clients: &self.clients,
        };

        let mut owned = Vec::new();
        for kind in self.fetcher.resource_types() {
            if !ctx.force() && !self.config.type_sync(self.name, kind.as_str()) {
                continue;
            }
            match self.fetcher.objects(kind) {
                Ok(objects) => owned.push((kind, objects)),
                Err(e) => {
                    errors.add(e);
                    return;
                }
            }
        }

        let mut tasks = Vec::new();
        for (kind, objects) in &owned {
            let rules = rules_for(*kind);
            if rules.is_empty() {
                continue;
            }
            for dto in objects.iter() {
                let object = match dto.to_value() {
                    Ok(object) => Arc::new(object),
                    Err(e) => {
                        errors.add(e);
                        continue;
                    }
                };
                let key = ResourceKey::new(*kind, dto.id());
                for rule in rules {
                    let object = object.clone();
                    let key = key.clone();
                    let rctx = &rctx;
                    tasks.push(async move { rule.apply(rctx, &key, &object).await });
                }
            }
        }

        trace_debug!("{}: running {} relation rules", self.name, tasks.len());
        for result in join_all(tasks).await {
            if let Err(e) = result {
                errors.add(e);
            }
        }
    }
}

#[async_trait]
impl Service for CloudService {
    fn name(&self) -> &str {
        self.name
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn resource_types(&self) -> Vec<ResourceType> {
        self.fetcher.resource_types()
    }

    fn is_sync_disabled(&self) -> bool {
        !self.config.service_sync(self.name)
    }

    async fn fetch(&self, ctx: &FetchContext) -> (Graph, Error) {
        if self.is_sync_disabled() {
            log_info!("sync disabled for service {}", self.name);
            return (Graph::new(), Error::new());
        }

        let _reset = ResetOnDrop(&self.fetcher);
        let ctx = ctx.clone().with_region(self.region.clone());
        let (graph, mut errors) = self.fetcher.fetch(&ctx).await;

        graph.add_resource(Resource::region(self.region.clone()));
        self.infer_relations(&ctx, &graph, &mut errors).await;

        (graph, errors)
    }

    async fn fetch_by_type(&self, ctx: &FetchContext, kind: ResourceType) -> (Graph, Error) {
        if self.is_sync_disabled() {
            log_info!("sync disabled for service {}", self.name);
            return (Graph::new(), Error::new());
        }

        let _reset = ResetOnDrop(&self.fetcher);
        let ctx = ctx.clone().with_region(self.region.clone());
        let (graph, errors) = self.fetcher.fetch_by_type(&ctx, kind).await;
        graph.add_resource(Resource::region(self.region.clone()));
        (graph, errors)
    }
}

// ============================================================================
// Fetch-func builders
// ============================================================================

/// Fetch-func paginating one provider list call.
pub(crate) fn list_func<T, F, Fut>(kind: ResourceType, clients: &Clients, call: F) -> FetchFunc
where
    T: Into<Dto> + Send + 'static,
    F: Fn(Clients, Option<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProviderResult<Page<T>>> + Send + 'static,
{
    list_func_with(kind, clients, call, |item: T| vec![item.into()])
}

/// Like [`list_func`], turning every page item into zero or more objects.
pub(crate) fn list_func_with<T, F, Fut, E>(kind: ResourceType, clients: &Clients, call: F, explode: E) -> FetchFunc
where
    T: Send + 'static,
    F: Fn(Clients, Option<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProviderResult<Page<T>>> + Send + 'static,
    E: Fn(T) -> Vec<Dto> + Send + Sync + 'static,
{
    let clients = clients.clone();
    let call = Arc::new(call);
    let explode = Arc::new(explode);
    fetch_func(move |ctx, _cache| {
        let clients = clients.clone();
        let call = call.clone();
        let explode = explode.clone();
        async move {
            paginate_with(&ctx, kind, |token| call(clients.clone(), token), |item| explode(item)).await
        }
    })
}

/// Sets a property computed outside the conversion tables, recording a failure in `errors`.
pub(crate) fn set_extra(
    res: &mut Resource,
    errors: &mut Error,
    name: &str,
    value: impl Into<crate::app::cloud::PropertyValue>,
) {
    if let Err(e) = res.set_property(name, value) {
        errors.add(FetchError::resource_fetch(res.kind(), name, e));
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Every service, built for one region.
pub struct ServiceRegistry {
    services: Vec<Box<dyn Service>>,
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.services.iter().map(|s| (s.name(), s.region())))
            .finish()
    }
}

impl ServiceRegistry {
    pub fn new(config: Arc<Config>, clients: Clients, region: &str) -> Self {
        let services: Vec<Box<dyn Service>> = vec![
            Box::new(infra::service(config.clone(), clients.clone(), region)),
            Box::new(access::service(config.clone(), clients.clone(), REGION_GLOBAL)),
            Box::new(storage::service(config.clone(), clients.clone(), region)),
            Box::new(messaging::service(config.clone(), clients.clone(), region)),
            Box::new(dns::service(config.clone(), clients.clone(), REGION_GLOBAL)),
            Box::new(lambda::service(config.clone(), clients.clone(), region)),
            Box::new(monitoring::service(config.clone(), clients.clone(), region)),
            Box::new(cdn::service(config.clone(), clients.clone(), REGION_GLOBAL)),
            Box::new(cloudformation::service(config, clients, region)),
        ];
        ServiceRegistry { services }
    }

    pub fn services(&self) -> impl Iterator<Item = &dyn Service> {
        self.services.iter().map(|s| s.as_ref())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Service> {
        self.services().find(|s| s.name() == name)
    }

    /// Service owning `kind`.
    pub fn service_for(&self, kind: ResourceType) -> Option<&dyn Service> {
        self.services().find(|s| s.resource_types().contains(&kind))
    }

    /// Fetches the named services concurrently, or all of them when `names` is empty, and
    /// merges their graphs.
    pub async fn fetch_all(&self, ctx: &FetchContext, names: &[String]) -> (Graph, Error) {
        let mut errors = Error::new();
        for name in names {
            if self.get(name).is_none() {
                errors.add(FetchError::Invalid(format!("unknown service '{}'", name)));
            }
        }

        let selected: Vec<&dyn Service> = self
            .services()
            .filter(|s| names.is_empty() || names.iter().any(|n| n == s.name()))
            .collect();
        let results = join_all(selected.iter().map(|s| s.fetch(ctx))).await;

        let graph = Graph::new();
        for (service, (fetched, service_errors)) in selected.iter().zip(results) {
            log_info!(
                "service {} fetched {} resources ({} errors)",
                service.name(),
                fetched.len(),
                service_errors.len()
            );
            graph.add_graph(&fetched);
            errors.add(service_errors);
        }
        (graph, errors)
    }

    /// Fetches a single type through the service owning it.
    pub async fn fetch_by_type(&self, ctx: &FetchContext, kind: ResourceType) -> (Graph, Error) {
        match self.service_for(kind) {
            Some(service) => service.fetch_by_type(ctx, kind).await,
            None => (Graph::new(), Error::from(FetchError::NoFetchFunc(kind.to_string()))),
        }
    }
}

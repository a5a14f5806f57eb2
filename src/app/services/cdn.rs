//! Content delivery distributions. Account-wide.

use std::sync::Arc;

use crate::app::cloud::ResourceType;
use crate::app::config::Config;
use crate::app::provider::Clients;

use super::{list_func, CloudService};

pub const NAME: &str = "cdn";

pub fn service(config: Arc<Config>, clients: Clients, region: &str) -> CloudService {
    let funcs = vec![(
        ResourceType::Distribution,
        list_func(ResourceType::Distribution, &clients, |c, t| async move {
            c.cloudfront.list_distributions(t).await
        }),
    )];
    CloudService::new(NAME, region, config, clients, funcs)
}

//! Infrastructure stacks.

use std::sync::Arc;

use crate::app::cloud::ResourceType;
use crate::app::config::Config;
use crate::app::provider::Clients;

use super::{list_func, CloudService};

pub const NAME: &str = "cloudformation";

pub fn service(config: Arc<Config>, clients: Clients, region: &str) -> CloudService {
    let funcs = vec![(
        ResourceType::Stack,
        list_func(ResourceType::Stack, &clients, |c, t| async move { c.cloudformation.describe_stacks(t).await }),
    )];
    CloudService::new(NAME, region, config, clients, funcs)
}

//! Metrics and the alarms watching them.

use std::sync::Arc;

use crate::app::cloud::ResourceType;
use crate::app::config::Config;
use crate::app::provider::Clients;

use super::{list_func, CloudService};

pub const NAME: &str = "monitoring";

pub fn service(config: Arc<Config>, clients: Clients, region: &str) -> CloudService {
    use ResourceType::*;

    let c = &clients;
    let funcs = vec![
        (Metric, list_func(Metric, c, |c, t| async move { c.cloudwatch.list_metrics(t).await })),
        (Alarm, list_func(Alarm, c, |c, t| async move { c.cloudwatch.describe_alarms(t).await })),
    ];
    CloudService::new(NAME, region, config, clients, funcs)
}

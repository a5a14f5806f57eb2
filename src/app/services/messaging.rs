//! Notification topics, their subscriptions and queues.

use std::sync::Arc;

use futures::future::join_all;

use crate::app::cloud::ResourceType;
use crate::app::config::Config;
use crate::app::dto::{messaging, Dto};
use crate::app::error::{ProviderError, ProviderErrorCategory};
use crate::app::fetch::{fetch_func, FetchFunc, FetchOutput};
use crate::app::provider::Clients;

use super::{list_func, CloudService};

pub const NAME: &str = "messaging";

pub fn service(config: Arc<Config>, clients: Clients, region: &str) -> CloudService {
    use ResourceType::*;

    let c = &clients;
    let funcs = vec![
        (
            Subscription,
            list_func(Subscription, c, |c, t| async move { c.sns.list_subscriptions(t).await }),
        ),
        (Topic, list_func(Topic, c, |c, t| async move { c.sns.list_topics(t).await })),
        (Queue, queues(c)),
    ];
    CloudService::new(NAME, region, config, clients, funcs)
}

/// A queue listed but deleted before its attributes were read.
fn is_gone(err: &ProviderError) -> bool {
    err.category() == ProviderErrorCategory::NotFound || err.code.contains("QueueDeletedRecently")
}

fn queues(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |_ctx, _cache| {
        let clients = clients.clone();
        async move {
            let urls = match clients.sqs.list_queues().await {
                Ok(urls) => urls,
                Err(e) => return FetchOutput::failed(e),
            };

            let described = join_all(urls.into_iter().map(|url| {
                let clients = &clients;
                async move {
                    let attributes = clients.sqs.get_queue_attributes(&url).await;
                    (url, attributes)
                }
            }))
            .await;

            let mut output = FetchOutput::default();
            for (url, attributes) in described {
                match attributes {
                    Ok(attributes) => {
                        let queue = messaging::Queue {
                            queue_url: Some(url),
                            attributes,
                        };
                        output.push(Dto::from(queue)).await;
                    }
                    Err(e) if is_gone(&e) => log_debug!("queue {} is gone, skipping", url),
                    Err(e) => output.error.add(e),
                }
            }
            output
        }
    })
}

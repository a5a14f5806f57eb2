//! Serverless functions.

use std::sync::Arc;

use crate::app::cloud::ResourceType;
use crate::app::config::Config;
use crate::app::provider::Clients;

use super::{list_func, CloudService};

pub const NAME: &str = "lambda";

pub fn service(config: Arc<Config>, clients: Clients, region: &str) -> CloudService {
    let funcs = vec![(
        ResourceType::Function,
        list_func(ResourceType::Function, &clients, |c, t| async move { c.lambda.list_functions(t).await }),
    )];
    CloudService::new(NAME, region, config, clients, funcs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cloud::properties::NAME as PROP_NAME;
    use crate::app::fetch::FetchContext;
    use crate::app::provider::RecordedProvider;
    use crate::app::services::Service;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_functions_follow_pages() {
        let provider = Arc::new(RecordedProvider::new().with_pages(
            "lambda.ListFunctions",
            vec![
                (vec![json!({"FunctionArn": "arn:fn:one", "FunctionName": "one"})], Some("p2")),
                (vec![json!({"FunctionArn": "arn:fn:two", "FunctionName": "two"})], None),
            ],
        ));
        let service = service(Arc::new(Config::new()), Clients::from_provider(provider.clone()), "eu-west-1");

        let (graph, errors) = service.fetch(&FetchContext::new("eu-west-1")).await;
        assert!(!errors.any(), "{}", errors);
        assert_eq!(provider.calls("lambda.ListFunctions"), 2);
        let two = graph.get_resource(ResourceType::Function, "arn:fn:two").unwrap();
        assert_eq!(two.property_str(PROP_NAME), Some("two"));
    }
}

use std::io::Write;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use awsgraph::app::cloud::properties::ZONE;
use awsgraph::app::cloud::ResourceType;
use awsgraph::app::config::Config;
use awsgraph::app::fetch::FetchContext;
use awsgraph::app::provider::{Clients, RecordedProvider};
use awsgraph::app::services::ServiceRegistry;

const JSON_FIXTURE: &str = r#"{
  "route53.ListHostedZones": [
    { "Items": [{ "Id": "/hostedzone/Z1", "Name": "example.com." }], "NextToken": "p2" },
    { "Items": [{ "Id": "/hostedzone/Z2", "Name": "other.org." }] }
  ],
  "route53.ListResourceRecordSets:/hostedzone/Z1": [
    { "Items": [{ "Name": "www.example.com.", "Type": "A" }] }
  ],
  "lambda.ListFunctions": { "error": "AccessDenied: not authorized" }
}"#;

const YAML_FIXTURE: &str = r#"
sns.ListTopics:
  - Items:
      - TopicArn: "arn:aws:sns:eu-west-1:123:alerts"
"#;

fn write_fixture(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_json_fixture_file_drives_a_fetch() {
    let file = write_fixture(".json", JSON_FIXTURE);
    let provider = Arc::new(RecordedProvider::load(file.path()).unwrap());
    let registry = ServiceRegistry::new(Arc::new(Config::new()), Clients::from_provider(provider.clone()), "eu-west-1");

    let names = vec!["dns".to_string(), "lambda".to_string()];
    let (graph, errors) = registry.fetch_all(&FetchContext::new("eu-west-1"), &names).await;

    assert_eq!(graph.get_all_resources(&[ResourceType::Zone]).len(), 2);
    let records = graph.get_all_resources(&[ResourceType::Record]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].property_str(ZONE), Some("example.com."));
    assert_eq!(errors.len(), 1, "{}", errors);
    assert!(graph.get_resource(ResourceType::Region, "global").is_ok());
    assert!(graph.get_resource(ResourceType::Region, "eu-west-1").is_ok());
}

#[tokio::test]
async fn test_yaml_fixture_file_drives_a_fetch() {
    let file = write_fixture(".yaml", YAML_FIXTURE);
    let provider = Arc::new(RecordedProvider::load(file.path()).unwrap());
    let registry = ServiceRegistry::new(Arc::new(Config::new()), Clients::from_provider(provider.clone()), "eu-west-1");

    let (graph, errors) = registry
        .fetch_by_type(&FetchContext::new("eu-west-1"), ResourceType::Topic)
        .await;
    assert!(!errors.any(), "{}", errors);
    assert!(graph
        .get_resource(ResourceType::Topic, "arn:aws:sns:eu-west-1:123:alerts")
        .is_ok());
    assert_eq!(provider.calls("sns.ListTopics"), 1);
}

#[test]
fn test_malformed_fixture_is_rejected() {
    let file = write_fixture(".json", "{ not json");
    assert!(RecordedProvider::load(file.path()).is_err());
}

//! Object storage: buckets of the fetched region and their objects.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::app::cloud::properties::{BUCKET, GRANTS};
use crate::app::cloud::{Grant, Grantee, RelationKind, ResourceType};
use crate::app::config::Config;
use crate::app::convert::new_resource;
use crate::app::dto::{s3, Dto};
use crate::app::error::FetchError;
use crate::app::fetch::{collect_pages, fan_out, fetch_func, FetchCache, FetchContext, FetchFunc, FetchOutput};
use crate::app::graph::ResourceKey;
use crate::app::provider::Clients;

use super::{set_extra, CloudService};

pub const NAME: &str = "storage";

const BUCKETS_KEY: &str = "getBucketsPerRegion";

/// Region of buckets reporting no location constraint.
const DEFAULT_BUCKET_REGION: &str = "us-east-1";

pub fn service(config: Arc<Config>, clients: Clients, region: &str) -> CloudService {
    let funcs = vec![
        (ResourceType::Bucket, buckets(&clients)),
        (ResourceType::S3Object, objects(&clients)),
    ];
    CloudService::new(NAME, region, config, clients, funcs)
}

/// Buckets located in the fetched region, narrowed by the `id` or `bucket` filter.
async fn buckets_in_region(
    ctx: &FetchContext,
    cache: &FetchCache,
    clients: &Clients,
) -> Result<Arc<Vec<s3::Bucket>>, FetchError> {
    cache
        .get(BUCKETS_KEY, || async {
            let mut buckets = clients.s3.list_buckets().await?;
            if let Some(wanted) = ctx.filter("id").or_else(|| ctx.filter("bucket")) {
                let wanted = wanted.to_lowercase();
                buckets.retain(|b| b.name.as_deref().unwrap_or_default().to_lowercase().contains(&wanted));
            }

            let locations = try_join_all(
                buckets
                    .iter()
                    .map(|b| clients.s3.get_bucket_location(b.name.as_deref().unwrap_or_default())),
            )
            .await?;

            let region = ctx.region();
            let kept: Vec<s3::Bucket> = buckets
                .into_iter()
                .zip(locations)
                .filter(|(_, location)| {
                    let location = if location.is_empty() { DEFAULT_BUCKET_REGION } else { location.as_str() };
                    location == region
                })
                .map(|(bucket, _)| bucket)
                .collect();
            trace_debug!("{} buckets in {}", kept.len(), region);
            Ok(kept)
        })
        .await
}

/// Grants of an access control list, in the shape exported on buckets.
fn to_grants(acl: Vec<s3::AclGrant>) -> Vec<Grant> {
    acl.into_iter()
        .map(|entry| {
            let grantee = entry.grantee.unwrap_or_default();
            let mut display_name = grantee.display_name.unwrap_or_default();
            if let Some(email) = grantee.email_address.filter(|e| !e.is_empty()) {
                display_name = format!("{}<{}>", display_name, email);
            }
            let grantee_type = grantee.kind.unwrap_or_default();
            let mut grantee_id = grantee.id.unwrap_or_default();
            if grantee_type == "Group" {
                grantee_id.push_str(grantee.uri.as_deref().unwrap_or_default());
            }
            Grant {
                permission: entry.permission.unwrap_or_default(),
                grantee: Grantee {
                    grantee_id,
                    grantee_type,
                    grantee_display_name: display_name,
                },
            }
        })
        .collect()
}

fn buckets(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, cache| {
        let clients = clients.clone();
        async move {
            let buckets = match buckets_in_region(&ctx, &cache, &clients).await {
                Ok(buckets) => buckets,
                Err(e) => return FetchOutput::failed(e),
            };

            let clients = &clients;
            let with_grants = fan_out(&ctx, buckets.iter().cloned(), |_, bucket| async move {
                let name = bucket.name.clone().unwrap_or_default();
                let acl = clients.s3.get_bucket_acl(&name).await.map_err(|e| {
                    FetchError::resource_fetch(ResourceType::Bucket, GRANTS, format!("bucket {}: {}", name, e))
                })?;
                Ok((bucket, to_grants(acl)))
            })
            .await;

            let with_grants = match with_grants {
                Ok(with_grants) => with_grants,
                Err(e) => return FetchOutput::failed(e),
            };

            let mut output = FetchOutput::default();
            for (bucket, grants) in with_grants {
                let dto = Dto::from(bucket);
                let (mut res, mut errors) = new_resource(&dto).await;
                set_extra(&mut res, &mut errors, GRANTS, grants);
                output.push_converted(res, dto, errors);
            }
            output
        }
    })
}

fn objects(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, cache| {
        let clients = clients.clone();
        async move {
            let buckets = match buckets_in_region(&ctx, &cache, &clients).await {
                Ok(buckets) => buckets,
                Err(e) => return FetchOutput::failed(e),
            };

            let clients = &clients;
            let per_bucket = fan_out(&ctx, buckets.iter(), |ctx, bucket| async move {
                let name = bucket.name.clone().unwrap_or_default();
                let objects = collect_pages(&ctx, |t| clients.s3.list_objects(&name, t)).await?;
                Ok((name, objects))
            })
            .await;

            let per_bucket = match per_bucket {
                Ok(per_bucket) => per_bucket,
                Err(e) => return FetchOutput::failed(e),
            };

            let mut output = FetchOutput::default();
            for (bucket, objects) in per_bucket {
                for object in objects {
                    let dto = Dto::from(object);
                    let (mut res, mut errors) = new_resource(&dto).await;
                    set_extra(&mut res, &mut errors, BUCKET, bucket.as_str());
                    res.add_relation(RelationKind::ChildOf, ResourceKey::new(ResourceType::Bucket, bucket.as_str()));
                    output.push_converted(res, dto, errors);
                }
            }
            output
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cloud::PropertyValue;
    use crate::app::provider::RecordedProvider;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture() -> RecordedProvider {
        RecordedProvider::new()
            .with_items(
                "s3.ListBuckets",
                vec![
                    json!({"Name": "logs-eu"}),
                    json!({"Name": "assets-us"}),
                    json!({"Name": "Backups-EU"}),
                ],
            )
            .with_items("s3.GetBucketLocation:logs-eu", vec![json!("eu-west-1")])
            .with_items("s3.GetBucketLocation:Backups-EU", vec![json!("eu-west-1")])
            .with_items(
                "s3.GetBucketAcl:logs-eu",
                vec![
                    json!({"Permission": "FULL_CONTROL", "Grantee": {"ID": "own_1", "DisplayName": "owner", "EmailAddress": "o@example.com", "Type": "CanonicalUser"}}),
                    json!({"Permission": "READ", "Grantee": {"Type": "Group", "URI": "http://acs.amazonaws.com/groups/global/AllUsers"}}),
                ],
            )
            .with_items("s3.ListObjects:logs-eu", vec![json!({"Key": "2017/01/app.log", "Size": 42})])
            .with_items("s3.ListObjects:Backups-EU", vec![json!({"Key": "db.dump"})])
    }

    fn service_for(provider: Arc<RecordedProvider>, region: &str) -> CloudService {
        service(Arc::new(Config::new()), Clients::from_provider(provider), region)
    }

    #[tokio::test]
    async fn test_only_buckets_of_the_region() {
        let provider = Arc::new(fixture());
        let service = service_for(provider.clone(), "eu-west-1");
        let (graph, errors) = service.fetcher().fetch(&FetchContext::new("eu-west-1")).await;
        assert!(!errors.any(), "{}", errors);

        let mut names: Vec<String> = graph
            .get_all_resources(&[ResourceType::Bucket])
            .iter()
            .map(|b| b.id().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Backups-EU", "logs-eu"]);
        assert_eq!(provider.calls("s3.ListBuckets"), 1);
        assert_eq!(provider.calls("s3.GetBucketLocation"), 3);

        let object = graph.get_resource(ResourceType::S3Object, "2017/01/app.log").unwrap();
        assert_eq!(object.property_str(BUCKET), Some("logs-eu"));
        assert!(graph.edges().contains(&(
            RelationKind::ParentOf,
            ResourceKey::new(ResourceType::Bucket, "logs-eu"),
            ResourceKey::new(ResourceType::S3Object, "2017/01/app.log"),
        )));
    }

    #[tokio::test]
    async fn test_empty_location_is_us_east_1() {
        let provider = Arc::new(fixture());
        let service = service_for(provider, "us-east-1");
        let (graph, _) = service.fetcher().fetch_by_type(&FetchContext::new("us-east-1"), ResourceType::Bucket).await;
        let buckets = graph.get_all_resources(&[ResourceType::Bucket]);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].id(), "assets-us");
    }

    #[tokio::test]
    async fn test_bucket_filter_ignores_case() {
        let provider = Arc::new(fixture());
        let service = service_for(provider.clone(), "eu-west-1");
        let ctx = FetchContext::new("eu-west-1").with_filter("bucket", "backups");
        let (graph, _) = service.fetcher().fetch_by_type(&ctx, ResourceType::Bucket).await;
        assert_eq!(graph.len(), 1);
        assert!(graph.get_resource(ResourceType::Bucket, "Backups-EU").is_ok());
        assert_eq!(provider.calls("s3.GetBucketLocation"), 1);
    }

    #[tokio::test]
    async fn test_bucket_grants() {
        let provider = Arc::new(fixture());
        let service = service_for(provider, "eu-west-1");
        let (graph, _) = service.fetcher().fetch(&FetchContext::new("eu-west-1")).await;

        let bucket = graph.get_resource(ResourceType::Bucket, "logs-eu").unwrap();
        let expected = vec![
            Grant {
                permission: "FULL_CONTROL".to_string(),
                grantee: Grantee {
                    grantee_id: "own_1".to_string(),
                    grantee_type: "CanonicalUser".to_string(),
                    grantee_display_name: "owner<o@example.com>".to_string(),
                },
            },
            Grant {
                permission: "READ".to_string(),
                grantee: Grantee {
                    grantee_id: "http://acs.amazonaws.com/groups/global/AllUsers".to_string(),
                    grantee_type: "Group".to_string(),
                    grantee_display_name: String::new(),
                },
            },
        ];
        assert_eq!(bucket.property(GRANTS), Some(&PropertyValue::from(expected)));

        let backups = graph.get_resource(ResourceType::Bucket, "Backups-EU").unwrap();
        assert_eq!(backups.property(GRANTS), Some(&PropertyValue::from(Vec::<Grant>::new())));
    }

    #[tokio::test]
    async fn test_acl_failure_names_the_bucket() {
        let provider = Arc::new(fixture().with_error("s3.GetBucketAcl:logs-eu", "AccessDenied: nope"));
        let service = service_for(provider, "eu-west-1");
        let (_, errors) = service
            .fetcher()
            .fetch_by_type(&FetchContext::new("eu-west-1"), ResourceType::Bucket)
            .await;
        let message = errors.to_string();
        assert!(message.contains("logs-eu"), "{}", message);
    }
}

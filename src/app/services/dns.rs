//! Hosted zones and their record sets. Account-wide.

use std::sync::Arc;

use crate::app::cloud::properties::ZONE;
use crate::app::cloud::{RelationKind, ResourceType};
use crate::app::config::Config;
use crate::app::convert::new_resource;
use crate::app::dto::Dto;
use crate::app::fetch::{collect_pages, fan_out, fetch_func, FetchFunc, FetchOutput};
use crate::app::graph::ResourceKey;
use crate::app::provider::Clients;

use super::{list_func, set_extra, CloudService};

pub const NAME: &str = "dns";

pub fn service(config: Arc<Config>, clients: Clients, region: &str) -> CloudService {
    let funcs = vec![
        (
            ResourceType::Zone,
            list_func(ResourceType::Zone, &clients, |c, t| async move { c.route53.list_hosted_zones(t).await }),
        ),
        (ResourceType::Record, records(&clients)),
    ];
    CloudService::new(NAME, region, config, clients, funcs)
}

/// Record sets of every hosted zone whose name contains the `zone` filter.
fn records(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, _cache| {
        let clients = clients.clone();
        async move {
            let mut zones = match collect_pages(&ctx, |t| clients.route53.list_hosted_zones(t)).await {
                Ok(zones) => zones,
                Err(e) => return FetchOutput::failed(e),
            };
            if let Some(wanted) = ctx.filter("zone") {
                let wanted = wanted.to_lowercase();
                zones.retain(|z| z.name.as_deref().unwrap_or_default().to_lowercase().contains(&wanted));
            }

            let clients = &clients;
            let per_zone = fan_out(&ctx, zones, |ctx, zone| async move {
                let id = zone.id.clone().unwrap_or_default();
                let records = collect_pages(&ctx, |t| clients.route53.list_resource_record_sets(&id, t)).await?;
                Ok((zone, records))
            })
            .await;

            let per_zone = match per_zone {
                Ok(per_zone) => per_zone,
                Err(e) => return FetchOutput::failed(e),
            };

            let mut output = FetchOutput::default();
            for (zone, records) in per_zone {
                let zone_id = zone.id.unwrap_or_default();
                let zone_name = zone.name.unwrap_or_default();
                for record in records {
                    let dto = Dto::from(record);
                    let (mut res, mut errors) = new_resource(&dto).await;
                    set_extra(&mut res, &mut errors, ZONE, zone_name.as_str());
                    res.add_relation(RelationKind::ChildOf, ResourceKey::new(ResourceType::Zone, zone_id.as_str()));
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
    use crate::app::dto::route53;
    use crate::app::fetch::FetchContext;
    use crate::app::provider::RecordedProvider;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture() -> RecordedProvider {
        RecordedProvider::new()
            .with_items(
                "route53.ListHostedZones",
                vec![
                    json!({"Id": "/hostedzone/Z1", "Name": "example.com."}),
                    json!({"Id": "/hostedzone/Z2", "Name": "Internal.Corp."}),
                ],
            )
            .with_items(
                "route53.ListResourceRecordSets:/hostedzone/Z1",
                vec![json!({"Name": "www.example.com.", "Type": "A", "TTL": 300, "ResourceRecords": [{"Value": "1.2.3.4"}]})],
            )
            .with_items(
                "route53.ListResourceRecordSets:/hostedzone/Z2",
                vec![json!({"Name": "db.internal.corp.", "Type": "CNAME"})],
            )
    }

    fn record_id(name: &str, kind: &str) -> String {
        Dto::from(route53::ResourceRecordSet {
            name: Some(name.to_string()),
            kind: Some(kind.to_string()),
            ..Default::default()
        })
        .id()
    }

    #[tokio::test]
    async fn test_records_are_children_of_their_zone() {
        let provider = Arc::new(fixture());
        let service = service(Arc::new(Config::new()), Clients::from_provider(provider.clone()), "global");
        let (graph, errors) = service.fetcher().fetch(&FetchContext::new("global")).await;
        assert!(!errors.any(), "{}", errors);

        assert_eq!(graph.get_all_resources(&[ResourceType::Zone]).len(), 2);
        let id = record_id("www.example.com.", "A");
        let record = graph.get_resource(ResourceType::Record, &id).unwrap();
        assert_eq!(record.property_str(ZONE), Some("example.com."));
        assert!(graph.edges().contains(&(
            RelationKind::ParentOf,
            ResourceKey::new(ResourceType::Zone, "/hostedzone/Z1"),
            ResourceKey::new(ResourceType::Record, id.as_str()),
        )));
    }

    #[tokio::test]
    async fn test_zone_filter_is_case_insensitive_substring() {
        let provider = Arc::new(fixture());
        let service = service(Arc::new(Config::new()), Clients::from_provider(provider.clone()), "global");
        let ctx = FetchContext::new("global").with_filter("zone", "internal");

        let (graph, errors) = service.fetcher().fetch_by_type(&ctx, ResourceType::Record).await;
        assert!(!errors.any(), "{}", errors);
        let records = graph.get_all_resources(&[ResourceType::Record]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].property_str(ZONE), Some("Internal.Corp."));
        assert_eq!(provider.calls("route53.ListResourceRecordSets"), 1);
    }
}

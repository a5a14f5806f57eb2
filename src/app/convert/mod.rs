//! Table-driven conversion of provider objects into resources.
//!
//! Every [`Dto`] shape has a transformation table (see [`tables`]) mapping property names
//! to a [`PropDef`]. [`new_resource`] projects the object to JSON once, evaluates all the
//! table entries concurrently and writes the successful values into the resource bag.
//! Failed entries are reported together with the resource, which keeps what converted.

pub mod extract;
pub mod tables;

use futures::future::join_all;
use serde_json::Value;

use crate::app::cloud::PropertyValue;
use crate::app::dto::Dto;
use crate::app::error::{Error, FetchError};
use crate::app::graph::Resource;

use self::extract::{lookup, ExtractResult};

pub type Extractor = Box<dyn Fn(&Value) -> ExtractResult + Send + Sync>;

/// How one property is produced from an object.
pub enum PropDef {
    /// Extract from the value at a dotted field path; absent or null fields are skipped.
    Transform { path: &'static str, extract: Extractor },
    /// Compute from the whole object.
    Fetch(Extractor),
}

impl PropDef {
    pub fn transform<F>(path: &'static str, extract: F) -> Self
    where
        F: Fn(&Value) -> ExtractResult + Send + Sync + 'static,
    {
        PropDef::Transform {
            path,
            extract: Box::new(extract),
        }
    }

    pub fn fetch<F>(extract: F) -> Self
    where
        F: Fn(&Value) -> ExtractResult + Send + Sync + 'static,
    {
        PropDef::Fetch(Box::new(extract))
    }

    fn evaluate(&self, object: &Value) -> Result<Option<PropertyValue>, FetchError> {
        match self {
            PropDef::Transform { path, extract } => match lookup(object, path) {
                Some(found) => extract(found).map(Some),
                None => Ok(None),
            },
            PropDef::Fetch(extract) => extract(object).map(Some),
        }
    }
}

impl std::fmt::Debug for PropDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropDef::Transform { path, .. } => write!(f, "Transform({})", path),
            PropDef::Fetch(_) => f.write_str("Fetch"),
        }
    }
}

pub type Table = Vec<(&'static str, PropDef)>;

/// Builds the resource for `dto`.
///
/// The returned error lists the entries that failed; the resource still carries its id
/// and every property that did convert.
pub async fn new_resource(dto: &Dto) -> (Resource, Error) {
    let kind = dto.resource_type();
    let mut resource = Resource::new(kind, dto.id());
    let mut errors = Error::new();

    let object = match dto.to_value() {
        Ok(object) => object,
        Err(e) => {
            errors.add(e);
            return (resource, errors);
        }
    };

    let table = tables::table_for(dto);
    let object = &object;
    let results = join_all(
        table
            .iter()
            .map(|(name, def)| async move { (*name, def.evaluate(object)) }),
    )
    .await;

    for (name, result) in results {
        let outcome = match result {
            Ok(Some(value)) => resource.set_property(name, value),
            Ok(None) | Err(FetchError::TagNotFound) => Ok(()),
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            errors.add(FetchError::resource_fetch(kind, name, e));
        }
    }

    trace_trace!("converted {} with {} properties", resource, resource.properties().len());
    (resource, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cloud::properties::*;
    use crate::app::dto::{ec2, iam, Tag};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn instance() -> ec2::Instance {
        ec2::Instance {
            instance_id: Some("inst_1".to_string()),
            instance_type: Some("t2.micro".to_string()),
            state: Some(ec2::InstanceState {
                code: Some(16),
                name: Some("running".to_string()),
            }),
            subnet_id: Some("sub_1".to_string()),
            vpc_id: Some("vpc_1".to_string()),
            key_name: Some("my-key".to_string()),
            launch_time: Some(Utc.with_ymd_and_hms(2017, 1, 10, 16, 47, 18).unwrap()),
            placement: Some(ec2::Placement {
                availability_zone: Some("us-west-1a".to_string()),
                ..Default::default()
            }),
            tags: Some(vec![Tag::new("Name", "redis"), Tag::new("Env", "prod")]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_new_resource_from_table() {
        let (res, errors) = new_resource(&Dto::from(instance())).await;
        assert!(!errors.any(), "{}", errors);
        assert_eq!(res.id(), "inst_1");
        assert_eq!(res.property_str(ID), Some("inst_1"));
        assert_eq!(res.property_str(NAME), Some("redis"));
        assert_eq!(res.property_str(TYPE), Some("t2.micro"));
        assert_eq!(res.property_str(STATE), Some("running"));
        assert_eq!(res.property_str(SUBNET), Some("sub_1"));
        assert_eq!(res.property_str(KEY_PAIR), Some("my-key"));
        assert_eq!(res.property_str(AVAILABILITY_ZONE), Some("us-west-1a"));
        assert_eq!(
            res.property(LAUNCHED),
            Some(&PropertyValue::Time(Utc.with_ymd_and_hms(2017, 1, 10, 16, 47, 18).unwrap()))
        );
        assert_eq!(res.property(TAGS), Some(&PropertyValue::from(vec!["Name=redis", "Env=prod"])));
        assert_eq!(res.property(PUBLIC_IP), None);
    }

    #[tokio::test]
    async fn test_new_resource_is_deterministic() {
        let dto = Dto::from(instance());
        let (first, _) = new_resource(&dto).await;
        let (second, _) = new_resource(&dto).await;
        assert_eq!(first.properties(), second.properties());
    }

    #[tokio::test]
    async fn test_missing_name_tag_is_skipped() {
        let mut inst = instance();
        inst.tags = Some(vec![Tag::new("Env", "prod")]);
        let (res, errors) = new_resource(&Dto::from(inst)).await;
        assert!(!errors.any());
        assert_eq!(res.property(NAME), None);
        assert_eq!(res.property(TAGS), Some(&PropertyValue::from(vec!["Env=prod"])));
    }

    #[tokio::test]
    async fn test_failed_entry_keeps_partial_resource() {
        let mut group = ec2::SecurityGroup {
            group_id: Some("sg_1".to_string()),
            group_name: Some("web".to_string()),
            ..Default::default()
        };
        group.ip_permissions = Some(vec![ec2::IpPermission {
            ip_protocol: Some("tcp".to_string()),
            from_port: Some(22),
            to_port: Some(22),
            ip_ranges: Some(vec![ec2::IpRange {
                cidr_ip: Some("not-a-cidr".to_string()),
            }]),
            ..Default::default()
        }]);

        let (res, errors) = new_resource(&Dto::from(group)).await;
        assert_eq!(errors.len(), 1);
        match errors.iter().next() {
            Some(FetchError::ResourceFetch { kind, property, .. }) => {
                assert_eq!(kind, "securitygroup");
                assert_eq!(property, INBOUND_RULES);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(res.property_str(NAME), Some("web"));
        assert_eq!(res.property(INBOUND_RULES), None);
    }

    #[tokio::test]
    async fn test_several_shapes_share_a_type() {
        let detail = iam::UserDetail {
            user_id: Some("usr_1".to_string()),
            user_name: Some("alice".to_string()),
            ..Default::default()
        };
        let (res, _) = new_resource(&Dto::from(detail)).await;
        assert_eq!(res.kind(), crate::app::cloud::ResourceType::User);
        assert_eq!(res.property_str(NAME), Some("alice"));
    }
}

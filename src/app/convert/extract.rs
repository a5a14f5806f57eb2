//! Value extractors over the JSON projection of a provider object.
//!
//! An extractor receives the value found at its table entry's field path (or the whole
//! object for a fetch entry) and produces a typed [`PropertyValue`]. Parameterised
//! extractors (`field`, `tag`, `key_values`...) return closures the tables box.

use chrono::{DateTime, NaiveDateTime, Utc};
use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::app::cloud::{
    Cidr, DistributionOrigin, FirewallRule, KeyValue, PortRange, PropertyValue, Route, RouteTarget,
    RouteTargetType,
};
use crate::app::error::FetchError;

pub type ExtractResult = Result<PropertyValue, FetchError>;

const OFFSET_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
const Z_SUFFIX_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn invalid(message: impl Into<String>) -> FetchError {
    FetchError::Invalid(message.into())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Walks a dotted field path. Null counts as absent.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let found = path.split('.').try_fold(value, |current, step| current.get(step))?;
    if found.is_null() {
        None
    } else {
        Some(found)
    }
}

/// String at `path`, empty when absent or not a string.
pub fn str_at<'a>(value: &'a Value, path: &str) -> &'a str {
    lookup(value, path).and_then(Value::as_str).unwrap_or_default()
}

fn int_at(value: &Value, path: &str) -> i64 {
    lookup(value, path).and_then(Value::as_i64).unwrap_or_default()
}

fn array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, FetchError> {
    value
        .as_array()
        .ok_or_else(|| invalid(format!("extract {}: not a list but a {}", what, json_kind(value))))
}

// ============================================================================
// Scalars
// ============================================================================

/// Scalar to scalar; a list of strings becomes a string list.
pub fn value(v: &Value) -> ExtractResult {
    match v {
        Value::String(s) => Ok(PropertyValue::String(s.clone())),
        Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(PropertyValue::Int)
            .ok_or_else(|| invalid(format!("extract value: {} is not an integer", n))),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(String::from)
                    .ok_or_else(|| invalid(format!("extract value: list holds a {}", json_kind(item))))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PropertyValue::StringList),
        other => Err(invalid(format!("extract value: unexpected {}", json_kind(other)))),
    }
}

pub fn value_as_string(v: &Value) -> ExtractResult {
    match v {
        Value::String(s) => Ok(PropertyValue::String(s.clone())),
        Value::Number(n) => Ok(PropertyValue::String(n.to_string())),
        Value::Bool(b) => Ok(PropertyValue::String(b.to_string())),
        other => Err(invalid(format!("extract value as string: unexpected {}", json_kind(other)))),
    }
}

fn expect_str<'a>(v: &'a Value, what: &str) -> Result<&'a str, FetchError> {
    v.as_str()
        .ok_or_else(|| invalid(format!("extract {}: expected a string, got a {}", what, json_kind(v))))
}

/// Timestamp in RFC 3339 or `2006-01-02T15:04:05.000+0000` form, coerced to UTC.
pub fn time(v: &Value) -> ExtractResult {
    let s = expect_str(v, "time")?;
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(PropertyValue::Time(t.with_timezone(&Utc)));
    }
    DateTime::parse_from_str(s, OFFSET_LAYOUT)
        .map(|t| PropertyValue::Time(t.with_timezone(&Utc)))
        .map_err(|e| invalid(format!("extract time: cannot parse '{}': {}", s, e)))
}

/// Timestamp in `2006-01-02T15:04:05.000Z` form. The instant is taken as written.
pub fn time_z(v: &Value) -> ExtractResult {
    let s = expect_str(v, "time")?;
    match NaiveDateTime::parse_from_str(s, Z_SUFFIX_LAYOUT) {
        Ok(t) => Ok(PropertyValue::Time(t.and_utc())),
        Err(e) => DateTime::parse_from_rfc3339(s)
            .map(|t| PropertyValue::Time(t.with_timezone(&Utc)))
            .map_err(|_| invalid(format!("extract time: cannot parse '{}': {}", s, e))),
    }
}

/// Integer seconds since the epoch, as a number or a numeric string.
pub fn unix_time(v: &Value) -> ExtractResult {
    let secs = match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid(format!("extract unix time: unexpected {}", v)))?;
    DateTime::from_timestamp(secs, 0)
        .map(PropertyValue::Time)
        .ok_or_else(|| invalid(format!("extract unix time: {} out of range", secs)))
}

/// Integer held in a string, as queue attributes carry them.
pub fn string_int(v: &Value) -> ExtractResult {
    match v {
        Value::Number(_) => value(v),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(PropertyValue::Int)
            .map_err(|e| invalid(format!("extract int: '{}': {}", s, e))),
        other => Err(invalid(format!("extract int: unexpected {}", json_kind(other)))),
    }
}

// ============================================================================
// Fields of objects and lists of objects
// ============================================================================

pub fn field(name: &'static str) -> impl Fn(&Value) -> ExtractResult + Send + Sync {
    move |v| match lookup(v, name) {
        Some(inner) => value(inner),
        None => Err(invalid(format!("extract field: field not found: {}", name))),
    }
}

/// One string per element, read from each element's `name` field.
pub fn string_slice(name: &'static str) -> impl Fn(&Value) -> ExtractResult + Send + Sync {
    move |v| {
        array(v, "string slice")?
            .iter()
            .map(|item| match lookup(item, name) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => value_as_string(other).map(|p| p.to_string()),
                None => Err(invalid(format!("extract string slice: element has no field '{}'", name))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PropertyValue::StringList)
    }
}

/// True when any element's boolean `name` field is true. Elements without it are skipped.
pub fn has_true_bool(name: &'static str) -> impl Fn(&Value) -> ExtractResult + Send + Sync {
    move |v| {
        let mut found = false;
        for item in array(v, "true bool")? {
            match lookup(item, name) {
                None => continue,
                Some(Value::Bool(b)) => found |= *b,
                Some(other) => {
                    return Err(invalid(format!(
                        "extract true bool: the field {} is not a boolean, but a {}",
                        name,
                        json_kind(other)
                    )))
                }
            }
        }
        Ok(PropertyValue::Bool(found))
    }
}

/// `KeyValue` list built from two named fields of each element.
pub fn key_values(key: &'static str, val: &'static str) -> impl Fn(&Value) -> ExtractResult + Send + Sync {
    move |v| {
        let pairs = array(v, "key values")?
            .iter()
            .map(|item| KeyValue::new(str_at(item, key), str_at(item, val)))
            .collect::<Vec<_>>();
        Ok(PropertyValue::KeyValues(pairs))
    }
}

// ============================================================================
// Tags
// ============================================================================

/// `Key=Value` strings, from EC2 tags or autoscaling tag descriptions alike.
pub fn tags(v: &Value) -> ExtractResult {
    let tags = array(v, "tags")?
        .iter()
        .map(|tag| format!("{}={}", str_at(tag, "Key"), str_at(tag, "Value")))
        .collect::<Vec<_>>();
    Ok(PropertyValue::StringList(tags))
}

/// Value of the tag `key`; [`FetchError::TagNotFound`] when absent.
pub fn tag(key: &'static str) -> impl Fn(&Value) -> ExtractResult + Send + Sync {
    move |v| {
        array(v, "tag")?
            .iter()
            .find(|tag| str_at(tag, "Key") == key)
            .map(|tag| PropertyValue::String(str_at(tag, "Value").to_string()))
            .ok_or(FetchError::TagNotFound)
    }
}

// ============================================================================
// Network values
// ============================================================================

/// Security group permissions to firewall rules.
///
/// Protocol `-1` is any protocol on any port. For tcp, udp, icmp and icmpv6 (`58`) a port
/// of `-1` on either side opens the whole range. Any other protocol keeps its literal name
/// and covers every port.
pub fn firewall_rules(v: &Value) -> ExtractResult {
    let mut rules = Vec::new();
    for permission in array(v, "ip permission")? {
        let protocol = str_at(permission, "IpProtocol");
        let (protocol, port_range) = match protocol {
            "-1" => ("any".to_string(), PortRange::any()),
            "tcp" | "udp" | "icmp" | "58" => {
                let from_port = int_at(permission, "FromPort");
                let to_port = int_at(permission, "ToPort");
                let range = if from_port == -1 || to_port == -1 {
                    PortRange::any()
                } else {
                    PortRange {
                        from_port,
                        to_port,
                        any: false,
                    }
                };
                (protocol.to_string(), range)
            }
            other => (other.to_string(), PortRange::any()),
        };

        let mut ip_ranges = Vec::new();
        for (list, cidr_field) in [("IpRanges", "CidrIp"), ("Ipv6Ranges", "CidrIpv6")] {
            let entries = lookup(permission, list).and_then(Value::as_array);
            for entry in entries.into_iter().flatten() {
                ip_ranges.push(str_at(entry, cidr_field).parse::<Cidr>()?);
            }
        }

        let sources = lookup(permission, "UserIdGroupPairs")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|pair| str_at(pair, "GroupId").to_string())
            .collect();

        rules.push(FirewallRule {
            protocol,
            port_range,
            ip_ranges,
            sources,
        });
    }
    Ok(PropertyValue::FirewallRules(rules))
}

const ROUTE_TARGETS: &[(&str, RouteTargetType)] = &[
    ("EgressOnlyInternetGatewayId", RouteTargetType::EgressOnlyInternetGateway),
    ("GatewayId", RouteTargetType::Gateway),
    ("InstanceId", RouteTargetType::Instance),
    ("NatGatewayId", RouteTargetType::Nat),
    ("NetworkInterfaceId", RouteTargetType::NetworkInterface),
    ("VpcPeeringConnectionId", RouteTargetType::VpcPeeringConnection),
];

fn optional_cidr(route: &Value, name: &str) -> Result<Option<Cidr>, FetchError> {
    match str_at(route, name) {
        "" => Ok(None),
        cidr => cidr.parse().map(Some),
    }
}

pub fn routes(v: &Value) -> ExtractResult {
    let mut routes = Vec::new();
    for entry in array(v, "route")? {
        let targets = ROUTE_TARGETS
            .iter()
            .filter(|(name, _)| !str_at(entry, name).is_empty())
            .map(|(name, kind)| RouteTarget {
                kind: *kind,
                reference: str_at(entry, name).to_string(),
                owner: match kind {
                    RouteTargetType::Instance => str_at(entry, "InstanceOwnerId").to_string(),
                    _ => String::new(),
                },
            })
            .collect();

        routes.push(Route {
            destination: optional_cidr(entry, "DestinationCidrBlock")?,
            destination_ipv6: optional_cidr(entry, "DestinationIpv6CidrBlock")?,
            destination_prefix_list_id: str_at(entry, "DestinationPrefixListId").to_string(),
            targets,
        });
    }
    Ok(PropertyValue::Routes(routes))
}

/// `{Protocol}:{LoadBalancerPort}:{InstanceProtocol}:{InstancePort}`.
pub fn listener_description(listener: &Value) -> String {
    format!(
        "{}:{}:{}:{}",
        str_at(listener, "Protocol"),
        int_at(listener, "LoadBalancerPort"),
        str_at(listener, "InstanceProtocol"),
        int_at(listener, "InstancePort"),
    )
}

pub fn classic_listener_descriptions(v: &Value) -> ExtractResult {
    let ports = array(v, "classic loadb listener descriptions")?
        .iter()
        .filter_map(|description| lookup(description, "Listener"))
        .map(listener_description)
        .collect();
    Ok(PropertyValue::StringList(ports))
}

// ============================================================================
// Distributions and documents
// ============================================================================

pub fn distribution_origins(v: &Value) -> ExtractResult {
    let items = lookup(v, "Items").map(|items| array(items, "origins")).transpose()?;
    let origins = items
        .into_iter()
        .flatten()
        .map(|origin| {
            let mut out = DistributionOrigin {
                id: str_at(origin, "Id").to_string(),
                public_dns: str_at(origin, "DomainName").to_string(),
                path_prefix: str_at(origin, "OriginPath").to_string(),
                ..Default::default()
            };
            let identity = str_at(origin, "S3OriginConfig.OriginAccessIdentity");
            if !identity.is_empty() {
                out.origin_type = "s3".to_string();
                out.config = identity.to_string();
            }
            out
        })
        .collect();
    Ok(PropertyValue::Origins(origins))
}

/// Document of the default policy version, unescaped and compacted.
pub fn document_default_version(v: &Value) -> ExtractResult {
    let default = array(v, "document default version")?
        .iter()
        .find(|version| lookup(version, "IsDefaultVersion").and_then(Value::as_bool) == Some(true));
    match default {
        Some(version) => decode_document(str_at(version, "Document")),
        None => Ok(PropertyValue::String(String::new())),
    }
}

pub fn url_encoded_json(v: &Value) -> ExtractResult {
    decode_document(expect_str(v, "url encoded json")?)
}

fn decode_document(raw: &str) -> ExtractResult {
    match query_unescape(raw) {
        Some(doc) => compact_json(&doc).map(PropertyValue::String),
        None => Ok(PropertyValue::String(raw.to_string())),
    }
}

/// Form-style unescaping: `+` is a space and every `%` must start a hex pair.
pub fn query_unescape(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let pair = bytes.get(i + 1..i + 3)?;
            if !pair.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
        }
    }
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8().ok().map(|c| c.into_owned())
}

/// Strips insignificant whitespace, keeping member order.
pub fn compact_json(doc: &str) -> Result<String, FetchError> {
    let value: Value = serde_json::from_str(doc).map_err(|e| invalid(format!("invalid JSON document: {}", e)))?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_lookup_walks_paths_and_skips_null() {
        let v = json!({"State": {"Name": "running"}, "VpcId": null});
        assert_eq!(lookup(&v, "State.Name"), Some(&json!("running")));
        assert_eq!(lookup(&v, "VpcId"), None);
        assert_eq!(lookup(&v, "State.Code"), None);
        assert_eq!(lookup(&v, "Missing.Deep"), None);
    }

    #[test_case(json!("t2.micro"), PropertyValue::from("t2.micro") ; "string")]
    #[test_case(json!(30), PropertyValue::Int(30) ; "integer")]
    #[test_case(json!(true), PropertyValue::Bool(true) ; "boolean")]
    #[test_case(json!(["a", "b"]), PropertyValue::from(vec!["a", "b"]) ; "string list")]
    fn test_value(input: Value, expected: PropertyValue) {
        assert_eq!(value(&input).unwrap(), expected);
    }

    #[test]
    fn test_value_rejects_objects_and_floats() {
        assert!(value(&json!({"a": 1})).is_err());
        assert!(value(&json!(1.5)).is_err());
        assert!(value(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_value_as_string() {
        assert_eq!(value_as_string(&json!(1)).unwrap(), PropertyValue::from("1"));
        assert_eq!(value_as_string(&json!("v2")).unwrap(), PropertyValue::from("v2"));
    }

    #[test_case("2016-11-29T13:21:04.515+0000", (2016, 11, 29, 13, 21, 4, 515) ; "offset form")]
    #[test_case("2016-11-29T14:21:04.515+0100", (2016, 11, 29, 13, 21, 4, 515) ; "offset form to utc")]
    #[test_case("2017-01-10T16:47:18Z", (2017, 1, 10, 16, 47, 18, 0) ; "rfc3339")]
    fn test_time(input: &str, expected: (i32, u32, u32, u32, u32, u32, u32)) {
        let (y, mo, d, h, mi, s, ms) = expected;
        let want = Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap() + chrono::Duration::milliseconds(i64::from(ms));
        assert_eq!(time(&json!(input)).unwrap(), PropertyValue::Time(want));
    }

    #[test]
    fn test_time_z_suffix() {
        let want = Utc.with_ymd_and_hms(2017, 1, 10, 16, 47, 18).unwrap();
        assert_eq!(time_z(&json!("2017-01-10T16:47:18.000Z")).unwrap(), PropertyValue::Time(want));
        assert!(time_z(&json!("yesterday")).is_err());
        assert!(time(&json!(12)).is_err());
    }

    #[test]
    fn test_unix_time() {
        let want = Utc.with_ymd_and_hms(2017, 1, 10, 16, 47, 18).unwrap();
        assert_eq!(unix_time(&json!("1484066838")).unwrap(), PropertyValue::Time(want));
        assert_eq!(unix_time(&json!(1484066838)).unwrap(), PropertyValue::Time(want));
        assert!(unix_time(&json!("soon")).is_err());
    }

    #[test]
    fn test_string_slice_requires_field() {
        let groups = json!([{"GroupId": "sg_1"}, {"GroupId": "sg_2"}]);
        assert_eq!(string_slice("GroupId")(&groups).unwrap(), PropertyValue::from(vec!["sg_1", "sg_2"]));

        let broken = json!([{"GroupId": "sg_1"}, {"GroupName": "web"}]);
        assert!(string_slice("GroupId")(&broken).is_err());
    }

    #[test]
    fn test_has_true_bool() {
        let extract = has_true_bool("Main");
        assert_eq!(extract(&json!([{"Main": false}, {"Main": true}])).unwrap(), PropertyValue::Bool(true));
        assert_eq!(extract(&json!([{"SubnetId": "s"}, {"Main": false}])).unwrap(), PropertyValue::Bool(false));
        assert!(extract(&json!([{"Main": "yes"}])).is_err());
    }

    #[test]
    fn test_tags_and_tag() {
        let v = json!([{"Key": "Name", "Value": "web"}, {"Key": "Env", "Value": "prod"}]);
        assert_eq!(tags(&v).unwrap(), PropertyValue::from(vec!["Name=web", "Env=prod"]));
        assert_eq!(tag("Name")(&v).unwrap(), PropertyValue::from("web"));
        assert_eq!(tag("Owner")(&v).unwrap_err(), FetchError::TagNotFound);
    }

    #[test]
    fn test_firewall_rules() {
        let v = json!([
            {"IpProtocol": "-1", "IpRanges": [{"CidrIp": "10.0.0.0/16"}]},
            {"IpProtocol": "tcp", "FromPort": 22, "ToPort": 22, "IpRanges": [{"CidrIp": "1.2.3.4/32"}]},
            {"IpProtocol": "udp", "FromPort": -1, "ToPort": 53},
            {"IpProtocol": "27", "UserIdGroupPairs": [{"GroupId": "sg_2"}]},
            {"IpProtocol": "tcp", "FromPort": 80, "ToPort": 443,
             "IpRanges": [{"CidrIp": "10.10.0.0/16"}], "Ipv6Ranges": [{"CidrIpv6": "2001:db8::/110"}]}
        ]);
        let rules = match firewall_rules(&v).unwrap() {
            PropertyValue::FirewallRules(rules) => rules,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(rules.len(), 5);

        assert_eq!(rules[0].protocol, "any");
        assert_eq!(rules[0].port_range, PortRange::any());
        assert_eq!(rules[0].ip_ranges, vec!["10.0.0.0/16".parse::<Cidr>().unwrap()]);

        assert_eq!(rules[1].protocol, "tcp");
        assert_eq!(
            rules[1].port_range,
            PortRange {
                from_port: 22,
                to_port: 22,
                any: false
            }
        );

        assert_eq!(rules[2].port_range, PortRange::any());

        assert_eq!(rules[3].protocol, "27");
        assert!(rules[3].port_range.any);
        assert_eq!(rules[3].sources, vec!["sg_2".to_string()]);

        let mixed: Vec<String> = rules[4].ip_ranges.iter().map(|c| c.to_string()).collect();
        assert_eq!(mixed, vec!["10.10.0.0/16", "2001:db8::/110"]);
    }

    #[test]
    fn test_firewall_rules_reject_bad_cidr() {
        let v = json!([{"IpProtocol": "tcp", "FromPort": 1, "ToPort": 2, "IpRanges": [{"CidrIp": "nope"}]}]);
        assert!(firewall_rules(&v).is_err());
    }

    #[test]
    fn test_routes() {
        let v = json!([
            {"DestinationCidrBlock": "10.0.0.0/16", "GatewayId": "local"},
            {"DestinationCidrBlock": "0.0.0.0/0", "DestinationIpv6CidrBlock": "2001:db8::/110",
             "InstanceId": "inst_1", "InstanceOwnerId": "owner_1", "NatGatewayId": ""},
            {"DestinationPrefixListId": "pl-1", "VpcPeeringConnectionId": "pcx_1"}
        ]);
        let routes = match routes(&v).unwrap() {
            PropertyValue::Routes(routes) => routes,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].targets[0].kind, RouteTargetType::Gateway);
        assert_eq!(routes[0].targets[0].reference, "local");

        assert_eq!(routes[1].destination.unwrap().to_string(), "0.0.0.0/0");
        assert_eq!(routes[1].destination_ipv6.unwrap().to_string(), "2001:db8::/110");
        assert_eq!(
            routes[1].targets,
            vec![RouteTarget {
                kind: RouteTargetType::Instance,
                reference: "inst_1".to_string(),
                owner: "owner_1".to_string(),
            }]
        );

        assert_eq!(routes[2].destination, None);
        assert_eq!(routes[2].destination_prefix_list_id, "pl-1");
        assert_eq!(routes[2].targets[0].kind, RouteTargetType::VpcPeeringConnection);
    }

    #[test]
    fn test_key_values() {
        let v = json!([{"OutputKey": "url", "OutputValue": "http://x"}, {"OutputKey": "empty"}]);
        assert_eq!(
            key_values("OutputKey", "OutputValue")(&v).unwrap(),
            PropertyValue::KeyValues(vec![KeyValue::new("url", "http://x"), KeyValue::new("empty", "")])
        );
    }

    #[test]
    fn test_classic_listener_descriptions() {
        let v = json!([
            {"Listener": {"Protocol": "HTTP", "LoadBalancerPort": 80, "InstanceProtocol": "HTTP", "InstancePort": 8080}},
            {"PolicyNames": []}
        ]);
        assert_eq!(classic_listener_descriptions(&v).unwrap(), PropertyValue::from(vec!["HTTP:80:HTTP:8080"]));
    }

    #[test]
    fn test_distribution_origins() {
        let v = json!({"Quantity": 2, "Items": [
            {"Id": "o1", "DomainName": "bucket.s3.amazonaws.com", "OriginPath": "/static",
             "S3OriginConfig": {"OriginAccessIdentity": "origin-access-identity/cloudfront/E1"}},
            {"Id": "o2", "DomainName": "api.example.com", "S3OriginConfig": {"OriginAccessIdentity": ""}}
        ]});
        let origins = match distribution_origins(&v).unwrap() {
            PropertyValue::Origins(origins) => origins,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(origins[0].origin_type, "s3");
        assert_eq!(origins[0].config, "origin-access-identity/cloudfront/E1");
        assert_eq!(origins[0].path_prefix, "/static");
        assert_eq!(origins[1].origin_type, "");
    }

    #[test]
    fn test_document_default_version() {
        let v = json!([
            {"VersionId": "v1", "IsDefaultVersion": false, "Document": "%7B%7D"},
            {"VersionId": "v2", "IsDefaultVersion": true,
             "Document": "%7B%0A%20%20%22Version%22%3A%20%222012-10-17%22%2C%0A%20%20%22Statement%22%3A%20%5B%5D%0A%7D"}
        ]);
        assert_eq!(
            document_default_version(&v).unwrap(),
            PropertyValue::from(r#"{"Version":"2012-10-17","Statement":[]}"#)
        );
        assert_eq!(document_default_version(&json!([])).unwrap(), PropertyValue::from(""));
    }

    #[test]
    fn test_url_encoded_json() {
        let encoded = "%7B%22Effect%22%3A+%22Allow%22%7D";
        assert_eq!(url_encoded_json(&json!(encoded)).unwrap(), PropertyValue::from(r#"{"Effect":"Allow"}"#));
        assert_eq!(url_encoded_json(&json!("100%")).unwrap(), PropertyValue::from("100%"));
        assert!(url_encoded_json(&json!("%7Bnot json")).is_err());
    }

    #[test]
    fn test_compact_json_keeps_spaces_in_strings() {
        assert_eq!(
            compact_json("{ \"b\" : \"two words\",\n \"a\": [1, 2] }").unwrap(),
            r#"{"b":"two words","a":[1,2]}"#
        );
        assert_eq!(compact_json(r#"{"q": "say \"hi \""}"#).unwrap(), r#"{"q":"say \"hi \""}"#);
    }

    #[test]
    fn test_compact_json_keeps_member_order() {
        let policy = r#"{
            "Version": "2012-10-17",
            "Statement": [{ "Sid": "s1", "Effect": "Allow", "Action": "s3:GetObject" }]
        }"#;
        assert_eq!(
            compact_json(policy).unwrap(),
            r#"{"Version":"2012-10-17","Statement":[{"Sid":"s1","Effect":"Allow","Action":"s3:GetObject"}]}"#
        );
        assert!(compact_json("{\"a\": }").is_err());
    }
}

//! Provider replaying recorded responses.
//!
//! A fixture maps a call key to the pages the call returns. The key is the service
//! prefix and the call name (`ec2.DescribeInstances`), followed by `:<argument>` for calls
//! scoped to a parent (`s3.GetBucketAcl:bucket_1`, `ecs.ListTasks:<cluster>:RUNNING`).
//!
//! ```json
//! {
//!   "ec2.DescribeVpcs": [{ "Items": [{ "VpcId": "vpc_1" }] }],
//!   "ec2.DescribeSubnets": [
//!     { "Items": [{ "SubnetId": "sub_1" }], "NextToken": "p2" },
//!     { "Items": [{ "SubnetId": "sub_2" }] }
//!   ],
//!   "iam.ListUsers": { "error": "AccessDenied: not authorized" }
//! }
//! ```
//!
//! A whole entry or a single page may be `{"error": "Code: message"}`. Calls without an
//! entry return nothing.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::*;
use crate::app::error::ProviderError;

#[derive(Debug, Clone, Deserialize)]
struct Failure {
    error: String,
}

impl Failure {
    fn to_error(&self) -> ProviderError {
        match self.error.split_once(": ") {
            Some((code, message)) => ProviderError::new(code, message),
            None => ProviderError::new(self.error.clone(), ""),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RecordedPage {
    Failure(Failure),
    Page {
        #[serde(rename = "Items", default)]
        items: Vec<Value>,
        #[serde(rename = "NextToken", default)]
        next_token: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Recorded {
    Failure(Failure),
    Pages(Vec<RecordedPage>),
}

/// Replays a fixture and counts the calls it serves.
#[derive(Debug, Default)]
pub struct RecordedProvider {
    entries: BTreeMap<String, Recorded>,
    calls: Mutex<BTreeMap<String, usize>>,
}

impl RecordedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries = serde_json::from_str(content).context("invalid JSON fixture")?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let entries = serde_yaml::from_str(content).context("invalid YAML fixture")?;
        Ok(Self::from_entries(entries))
    }

    /// Loads a `.yaml`/`.yml` or JSON fixture file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read fixture {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let provider = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        };
        provider.with_context(|| format!("in fixture {}", path.display()))
    }

    fn from_entries(entries: BTreeMap<String, Recorded>) -> Self {
        RecordedProvider {
            entries,
            calls: Mutex::new(BTreeMap::new()),
        }
    }

    /// Records a single page of items for `call`.
    pub fn with_items(self, call: &str, items: Vec<Value>) -> Self {
        self.with_pages(call, vec![(items, None)])
    }

    /// Records several pages; each page names the token of the next one.
    pub fn with_pages(mut self, call: &str, pages: Vec<(Vec<Value>, Option<&str>)>) -> Self {
        let pages = pages
            .into_iter()
            .map(|(items, next)| RecordedPage::Page {
                items,
                next_token: next.map(str::to_string),
            })
            .collect();
        self.entries.insert(call.to_string(), Recorded::Pages(pages));
        self
    }

    /// Makes `call` fail with `error`, written as `Code: message`.
    pub fn with_error(mut self, call: &str, error: &str) -> Self {
        self.entries.insert(
            call.to_string(),
            Recorded::Failure(Failure {
                error: error.to_string(),
            }),
        );
        self
    }

    /// Number of calls served for `call`, arguments excluded.
    pub fn calls(&self, call: &str) -> usize {
        self.lock_calls().get(call).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.lock_calls().values().sum()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, usize>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: &str) {
        *self.lock_calls().entry(call.to_string()).or_insert(0) += 1;
    }

    fn entry(&self, call: &str, arg: Option<&str>) -> Option<&Recorded> {
        self.record(call);
        match arg {
            Some(arg) => self.entries.get(&format!("{}:{}", call, arg)),
            None => self.entries.get(call),
        }
    }

    /// The page following `token`.
    fn page<T: DeserializeOwned>(
        &self,
        call: &str,
        arg: Option<&str>,
        token: Option<String>,
    ) -> ProviderResult<Page<T>> {
        let pages = match self.entry(call, arg) {
            None => return Ok(Page::default()),
            Some(Recorded::Failure(failure)) => return Err(failure.to_error()),
            Some(Recorded::Pages(pages)) => pages,
        };

        let index = match token.as_deref() {
            None => 0,
            Some(token) => pages
                .iter()
                .position(|p| matches!(p, RecordedPage::Page { next_token: Some(t), .. } if t == token))
                .map(|i| i + 1)
                .ok_or_else(|| {
                    ProviderError::new("InvalidNextToken", format!("unknown token '{}' for {}", token, call))
                })?,
        };

        match pages.get(index) {
            None => Ok(Page::default()),
            Some(RecordedPage::Failure(failure)) => Err(failure.to_error()),
            Some(RecordedPage::Page { items, next_token }) => Ok(Page {
                items: decode(call, items)?,
                next_token: next_token.clone(),
            }),
        }
    }

    /// Items of every page, for calls that are not paginated.
    fn items<T: DeserializeOwned>(&self, call: &str, arg: Option<&str>) -> ProviderResult<Vec<T>> {
        let pages = match self.entry(call, arg) {
            None => return Ok(Vec::new()),
            Some(Recorded::Failure(failure)) => return Err(failure.to_error()),
            Some(Recorded::Pages(pages)) => pages,
        };
        let mut all = Vec::new();
        for page in pages {
            match page {
                RecordedPage::Failure(failure) => return Err(failure.to_error()),
                RecordedPage::Page { items, .. } => all.extend(decode(call, items)?),
            }
        }
        Ok(all)
    }
}

fn decode<T: DeserializeOwned>(call: &str, items: &[Value]) -> ProviderResult<Vec<T>> {
    items
        .iter()
        .map(|item| {
            serde_json::from_value(item.clone()).map_err(|e| {
                ProviderError::new("SerializationException", format!("{}: {}", call, e))
            })
        })
        .collect()
}

fn requested(wanted: &[String], candidates: &[&Option<String>]) -> bool {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .any(|c| wanted.iter().any(|w| w == c))
}

// ============================================================================
// Trait implementations
// ============================================================================

#[async_trait]
impl Ec2Api for RecordedProvider {
    async fn describe_instances(&self, token: Option<String>) -> ProviderResult<Page<ec2::Reservation>> {
        self.page("ec2.DescribeInstances", None, token)
    }

    async fn describe_vpcs(&self, token: Option<String>) -> ProviderResult<Page<ec2::Vpc>> {
        self.page("ec2.DescribeVpcs", None, token)
    }

    async fn describe_subnets(&self, token: Option<String>) -> ProviderResult<Page<ec2::Subnet>> {
        self.page("ec2.DescribeSubnets", None, token)
    }

    async fn describe_security_groups(&self, token: Option<String>) -> ProviderResult<Page<ec2::SecurityGroup>> {
        self.page("ec2.DescribeSecurityGroups", None, token)
    }

    async fn describe_key_pairs(&self, token: Option<String>) -> ProviderResult<Page<ec2::KeyPairInfo>> {
        self.page("ec2.DescribeKeyPairs", None, token)
    }

    async fn describe_volumes(&self, token: Option<String>) -> ProviderResult<Page<ec2::Volume>> {
        self.page("ec2.DescribeVolumes", None, token)
    }

    async fn describe_images(&self, token: Option<String>) -> ProviderResult<Page<ec2::Image>> {
        self.page("ec2.DescribeImages", None, token)
    }

    async fn describe_internet_gateways(&self, token: Option<String>) -> ProviderResult<Page<ec2::InternetGateway>> {
        self.page("ec2.DescribeInternetGateways", None, token)
    }

    async fn describe_nat_gateways(&self, token: Option<String>) -> ProviderResult<Page<ec2::NatGateway>> {
        self.page("ec2.DescribeNatGateways", None, token)
    }

    async fn describe_route_tables(&self, token: Option<String>) -> ProviderResult<Page<ec2::RouteTable>> {
        self.page("ec2.DescribeRouteTables", None, token)
    }

    async fn describe_availability_zones(&self, token: Option<String>) -> ProviderResult<Page<ec2::AvailabilityZone>> {
        self.page("ec2.DescribeAvailabilityZones", None, token)
    }

    async fn describe_addresses(&self, token: Option<String>) -> ProviderResult<Page<ec2::Address>> {
        self.page("ec2.DescribeAddresses", None, token)
    }

    async fn describe_snapshots(&self, token: Option<String>) -> ProviderResult<Page<ec2::Snapshot>> {
        self.page("ec2.DescribeSnapshots", None, token)
    }

    async fn describe_network_interfaces(&self, token: Option<String>) -> ProviderResult<Page<ec2::NetworkInterface>> {
        self.page("ec2.DescribeNetworkInterfaces", None, token)
    }
}

#[async_trait]
impl ElbApi for RecordedProvider {
    async fn describe_classic_load_balancers(&self, token: Option<String>) -> ProviderResult<Page<elb::LoadBalancerDescription>> {
        self.page("elb.DescribeLoadBalancers", None, token)
    }
}

#[async_trait]
impl Elbv2Api for RecordedProvider {
    async fn describe_load_balancers(&self, token: Option<String>) -> ProviderResult<Page<elb::LoadBalancer>> {
        self.page("elbv2.DescribeLoadBalancers", None, token)
    }

    async fn describe_target_groups(&self, token: Option<String>) -> ProviderResult<Page<elb::TargetGroup>> {
        self.page("elbv2.DescribeTargetGroups", None, token)
    }

    async fn describe_listeners(&self, load_balancer_arn: &str, token: Option<String>) -> ProviderResult<Page<elb::Listener>> {
        self.page("elbv2.DescribeListeners", Some(load_balancer_arn), token)
    }

    async fn describe_target_health(&self, target_group_arn: &str) -> ProviderResult<Vec<elb::TargetHealthDescription>> {
        self.items("elbv2.DescribeTargetHealth", Some(target_group_arn))
    }
}

#[async_trait]
impl RdsApi for RecordedProvider {
    async fn describe_db_instances(&self, token: Option<String>) -> ProviderResult<Page<rds::DbInstance>> {
        self.page("rds.DescribeDBInstances", None, token)
    }

    async fn describe_db_subnet_groups(&self, token: Option<String>) -> ProviderResult<Page<rds::DbSubnetGroup>> {
        self.page("rds.DescribeDBSubnetGroups", None, token)
    }
}

#[async_trait]
impl AutoscalingApi for RecordedProvider {
    async fn describe_launch_configurations(&self, token: Option<String>) -> ProviderResult<Page<autoscaling::LaunchConfiguration>> {
        self.page("autoscaling.DescribeLaunchConfigurations", None, token)
    }

    async fn describe_auto_scaling_groups(&self, token: Option<String>) -> ProviderResult<Page<autoscaling::Group>> {
        self.page("autoscaling.DescribeAutoScalingGroups", None, token)
    }

    async fn describe_policies(&self, token: Option<String>) -> ProviderResult<Page<autoscaling::ScalingPolicy>> {
        self.page("autoscaling.DescribePolicies", None, token)
    }
}

#[async_trait]
impl EcrApi for RecordedProvider {
    async fn describe_repositories(&self, token: Option<String>) -> ProviderResult<Page<ecs::Repository>> {
        self.page("ecr.DescribeRepositories", None, token)
    }
}

#[async_trait]
impl EcsApi for RecordedProvider {
    async fn list_clusters(&self, token: Option<String>) -> ProviderResult<Page<String>> {
        self.page("ecs.ListClusters", None, token)
    }

    async fn describe_clusters(&self, clusters: &[String]) -> ProviderResult<Vec<ecs::Cluster>> {
        let all: Vec<ecs::Cluster> = self.items("ecs.DescribeClusters", None)?;
        Ok(all
            .into_iter()
            .filter(|c| requested(clusters, &[&c.cluster_arn, &c.cluster_name]))
            .collect())
    }

    async fn list_task_definitions(&self, family_prefix: Option<&str>, token: Option<String>) -> ProviderResult<Page<String>> {
        let mut page: Page<String> = self.page("ecs.ListTaskDefinitions", None, token)?;
        if let Some(prefix) = family_prefix {
            page.items.retain(|arn| {
                arn.rsplit('/')
                    .next()
                    .map(|family| family.starts_with(prefix))
                    .unwrap_or(false)
            });
        }
        Ok(page)
    }

    async fn describe_task_definition(&self, arn: &str) -> ProviderResult<ecs::TaskDefinition> {
        let all: Vec<ecs::TaskDefinition> = self.items("ecs.DescribeTaskDefinition", None)?;
        all.into_iter()
            .find(|d| d.task_definition_arn.as_deref() == Some(arn))
            .ok_or_else(|| ProviderError::new("ClientException", format!("unable to describe task definition {}", arn)))
    }

    async fn list_tasks(&self, cluster: &str, desired_status: &str, token: Option<String>) -> ProviderResult<Page<String>> {
        self.page("ecs.ListTasks", Some(&format!("{}:{}", cluster, desired_status)), token)
    }

    async fn describe_tasks(&self, _cluster: &str, arns: &[String]) -> ProviderResult<Vec<ecs::Task>> {
        let all: Vec<ecs::Task> = self.items("ecs.DescribeTasks", None)?;
        Ok(all.into_iter().filter(|t| requested(arns, &[&t.task_arn])).collect())
    }

    async fn list_container_instances(&self, cluster: &str, token: Option<String>) -> ProviderResult<Page<String>> {
        self.page("ecs.ListContainerInstances", Some(cluster), token)
    }

    async fn describe_container_instances(&self, _cluster: &str, arns: &[String]) -> ProviderResult<Vec<ecs::ContainerInstance>> {
        let all: Vec<ecs::ContainerInstance> = self.items("ecs.DescribeContainerInstances", None)?;
        Ok(all
            .into_iter()
            .filter(|i| requested(arns, &[&i.container_instance_arn]))
            .collect())
    }
}

#[async_trait]
impl AcmApi for RecordedProvider {
    async fn list_certificates(&self, token: Option<String>) -> ProviderResult<Page<acm::CertificateSummary>> {
        self.page("acm.ListCertificates", None, token)
    }
}

#[async_trait]
impl IamApi for RecordedProvider {
    async fn list_users(&self, token: Option<String>) -> ProviderResult<Page<iam::User>> {
        self.page("iam.ListUsers", None, token)
    }

    async fn get_account_authorization_details(
        &self,
        filter: &[iam::EntityType],
        token: Option<String>,
    ) -> ProviderResult<Page<iam::AccountAuthorizationDetails>> {
        use iam::EntityType;

        let mut page: Page<iam::AccountAuthorizationDetails> =
            self.page("iam.GetAccountAuthorizationDetails", None, token)?;
        let wants = |kind: EntityType| filter.is_empty() || filter.contains(&kind);
        for details in page.items.iter_mut() {
            if !wants(EntityType::User) {
                details.user_detail_list.clear();
            }
            if !wants(EntityType::Group) {
                details.group_detail_list.clear();
            }
            if !wants(EntityType::Role) {
                details.role_detail_list.clear();
            }
            let aws_managed = wants(EntityType::AwsManagedPolicy);
            let local = wants(EntityType::LocalManagedPolicy);
            details.policies.retain(|p| {
                let is_aws = p
                    .arn
                    .as_deref()
                    .map(|arn| arn.starts_with(crate::app::convert::tables::AWS_MANAGED_POLICY_PREFIX))
                    .unwrap_or(false);
                if is_aws {
                    aws_managed
                } else {
                    local
                }
            });
        }
        Ok(page)
    }

    async fn list_access_keys(&self, user_name: &str, token: Option<String>) -> ProviderResult<Page<iam::AccessKeyMetadata>> {
        self.page("iam.ListAccessKeys", Some(user_name), token)
    }

    async fn list_instance_profiles(&self, token: Option<String>) -> ProviderResult<Page<iam::InstanceProfile>> {
        self.page("iam.ListInstanceProfiles", None, token)
    }

    async fn list_virtual_mfa_devices(&self, token: Option<String>) -> ProviderResult<Page<iam::VirtualMfaDevice>> {
        self.page("iam.ListVirtualMFADevices", None, token)
    }
}

#[async_trait]
impl S3Api for RecordedProvider {
    async fn list_buckets(&self) -> ProviderResult<Vec<s3::Bucket>> {
        self.items("s3.ListBuckets", None)
    }

    async fn get_bucket_location(&self, bucket: &str) -> ProviderResult<String> {
        let locations: Vec<String> = self.items("s3.GetBucketLocation", Some(bucket))?;
        Ok(locations.into_iter().next().unwrap_or_default())
    }

    async fn get_bucket_acl(&self, bucket: &str) -> ProviderResult<Vec<s3::AclGrant>> {
        self.items("s3.GetBucketAcl", Some(bucket))
    }

    async fn list_objects(&self, bucket: &str, token: Option<String>) -> ProviderResult<Page<s3::Object>> {
        self.page("s3.ListObjects", Some(bucket), token)
    }
}

#[async_trait]
impl SnsApi for RecordedProvider {
    async fn list_subscriptions(&self, token: Option<String>) -> ProviderResult<Page<messaging::Subscription>> {
        self.page("sns.ListSubscriptions", None, token)
    }

    async fn list_topics(&self, token: Option<String>) -> ProviderResult<Page<messaging::Topic>> {
        self.page("sns.ListTopics", None, token)
    }
}

#[async_trait]
impl SqsApi for RecordedProvider {
    async fn list_queues(&self) -> ProviderResult<Vec<String>> {
        self.items("sqs.ListQueues", None)
    }

    async fn get_queue_attributes(&self, queue_url: &str) -> ProviderResult<BTreeMap<String, String>> {
        let attributes: Vec<BTreeMap<String, String>> = self.items("sqs.GetQueueAttributes", Some(queue_url))?;
        Ok(attributes.into_iter().next().unwrap_or_default())
    }
}

#[async_trait]
impl Route53Api for RecordedProvider {
    async fn list_hosted_zones(&self, token: Option<String>) -> ProviderResult<Page<route53::HostedZone>> {
        self.page("route53.ListHostedZones", None, token)
    }

    async fn list_resource_record_sets(&self, zone_id: &str, token: Option<String>) -> ProviderResult<Page<route53::ResourceRecordSet>> {
        self.page("route53.ListResourceRecordSets", Some(zone_id), token)
    }
}

#[async_trait]
impl LambdaApi for RecordedProvider {
    async fn list_functions(&self, token: Option<String>) -> ProviderResult<Page<lambda::FunctionConfiguration>> {
        self.page("lambda.ListFunctions", None, token)
    }
}

#[async_trait]
impl CloudWatchApi for RecordedProvider {
    async fn list_metrics(&self, token: Option<String>) -> ProviderResult<Page<cloudwatch::Metric>> {
        self.page("cloudwatch.ListMetrics", None, token)
    }

    async fn describe_alarms(&self, token: Option<String>) -> ProviderResult<Page<cloudwatch::MetricAlarm>> {
        self.page("cloudwatch.DescribeAlarms", None, token)
    }
}

#[async_trait]
impl CloudFrontApi for RecordedProvider {
    async fn list_distributions(&self, token: Option<String>) -> ProviderResult<Page<cloudfront::DistributionSummary>> {
        self.page("cloudfront.ListDistributions", None, token)
    }
}

#[async_trait]
impl CloudFormationApi for RecordedProvider {
    async fn describe_stacks(&self, token: Option<String>) -> ProviderResult<Page<cloudformation::Stack>> {
        self.page("cloudformation.DescribeStacks", None, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::error::{FetchError, ProviderErrorCategory};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_pages_follow_next_token() {
        let provider = RecordedProvider::new().with_pages(
            "ec2.DescribeSubnets",
            vec![
                (vec![json!({"SubnetId": "sub_1"})], Some("p2")),
                (vec![json!({"SubnetId": "sub_2"})], None),
            ],
        );

        let first = provider.describe_subnets(None).await.unwrap();
        assert_eq!(first.items[0].subnet_id.as_deref(), Some("sub_1"));
        assert_eq!(first.next_token.as_deref(), Some("p2"));

        let second = provider.describe_subnets(first.next_token).await.unwrap();
        assert_eq!(second.items[0].subnet_id.as_deref(), Some("sub_2"));
        assert_eq!(second.next_token, None);
        assert_eq!(provider.calls("ec2.DescribeSubnets"), 2);
    }

    #[tokio::test]
    async fn test_missing_entry_is_empty() {
        let provider = RecordedProvider::new();
        let page = provider.describe_vpcs(None).await.unwrap();
        assert!(page.items.is_empty());
        assert!(provider.list_buckets().await.unwrap().is_empty());
        assert_eq!(provider.total_calls(), 2);
    }

    #[tokio::test]
    async fn test_error_entry() {
        let provider = RecordedProvider::new().with_error("iam.ListUsers", "AccessDenied: not authorized");
        let err = provider.list_users(None).await.unwrap_err();
        assert_eq!(err.code, "AccessDenied");
        assert_eq!(err.category(), ProviderErrorCategory::AccessDenied);
        assert_eq!(FetchError::from(err), FetchError::AccessDenied);
    }

    #[tokio::test]
    async fn test_json_fixture_with_failing_second_page() {
        let provider = RecordedProvider::from_json_str(
            r#"{
                "ec2.DescribeVolumes": [
                    { "Items": [{ "VolumeId": "vol_1" }], "NextToken": "next" },
                    { "error": "RequestLimitExceeded: slow down" }
                ]
            }"#,
        )
        .unwrap();

        let first = provider.describe_volumes(None).await.unwrap();
        assert_eq!(first.items.len(), 1);
        let err = provider.describe_volumes(first.next_token).await.unwrap_err();
        assert_eq!(err.category(), ProviderErrorCategory::Throttled);
    }

    #[tokio::test]
    async fn test_yaml_fixture_with_arguments() {
        let provider = RecordedProvider::from_yaml_str(
            r#"
s3.GetBucketLocation:bucket_1:
  - Items: ["eu-west-1"]
s3.GetBucketAcl:bucket_1:
  - Items:
      - Permission: READ
        Grantee: { ID: usr_1, Type: CanonicalUser }
"#,
        )
        .unwrap();

        assert_eq!(provider.get_bucket_location("bucket_1").await.unwrap(), "eu-west-1");
        assert_eq!(provider.get_bucket_location("bucket_2").await.unwrap(), "");
        let acl = provider.get_bucket_acl("bucket_1").await.unwrap();
        assert_eq!(acl[0].permission.as_deref(), Some("READ"));
        assert_eq!(provider.calls("s3.GetBucketLocation"), 2);
    }

    #[tokio::test]
    async fn test_describe_calls_select_requested_items() {
        let provider = RecordedProvider::new().with_items(
            "ecs.DescribeClusters",
            vec![
                json!({"ClusterArn": "arn:cluster/one", "ClusterName": "one"}),
                json!({"ClusterArn": "arn:cluster/two", "ClusterName": "two"}),
            ],
        );
        let clusters = provider.describe_clusters(&["two".to_string()]).await.unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].cluster_arn.as_deref(), Some("arn:cluster/two"));
    }

    #[tokio::test]
    async fn test_authorization_details_honour_filter() {
        let provider = RecordedProvider::new().with_items(
            "iam.GetAccountAuthorizationDetails",
            vec![json!({
                "UserDetailList": [{"UserId": "usr_1"}],
                "GroupDetailList": [{"GroupId": "grp_1"}],
                "Policies": [
                    {"PolicyId": "pol_1", "Arn": "arn:aws:iam::aws:policy/ReadOnly"},
                    {"PolicyId": "pol_2", "Arn": "arn:aws:iam::123:policy/Mine"}
                ]
            })],
        );

        let page = provider
            .get_account_authorization_details(&[iam::EntityType::User], None)
            .await
            .unwrap();
        assert_eq!(page.items[0].user_detail_list.len(), 1);
        assert!(page.items[0].group_detail_list.is_empty());
        assert!(page.items[0].policies.is_empty());

        let page = provider
            .get_account_authorization_details(&[iam::EntityType::LocalManagedPolicy], None)
            .await
            .unwrap();
        assert_eq!(page.items[0].policies.len(), 1);
        assert_eq!(page.items[0].policies[0].policy_id.as_deref(), Some("pol_2"));
    }

    #[test]
    fn test_load_reports_bad_fixture() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"{ not json").unwrap();
        assert!(RecordedProvider::load(file.path()).is_err());
    }
}

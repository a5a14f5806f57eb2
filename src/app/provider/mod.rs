//! Async provider traits, one per cloud service.
//!
//! Every call the fetch pipeline issues goes through one of these traits. List calls
//! take the continuation token of the previous page and return a [`Page`]; the fetch
//! pipeline keeps asking while the page carries a next token. Implementations are shared
//! by all fetch-funcs of a service, so they must be `Send + Sync`.
//!
//! [`RecordedProvider`] implements every trait from a fixture file.

pub mod recorded;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::app::dto::{
    acm, autoscaling, cloudformation, cloudfront, cloudwatch, ec2, ecs, elb, iam, lambda,
    messaging, rds, route53, s3,
};
use crate::app::error::ProviderError;

pub use recorded::RecordedProvider;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// One page of a list call.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Page {
            items: Vec::new(),
            next_token: None,
        }
    }
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Page {
            items,
            next_token: None,
        }
    }
}

// ============================================================================
// Compute and networking
// ============================================================================

#[async_trait]
pub trait Ec2Api: Send + Sync {
    async fn describe_instances(&self, token: Option<String>) -> ProviderResult<Page<ec2::Reservation>>;
    async fn describe_vpcs(&self, token: Option<String>) -> ProviderResult<Page<ec2::Vpc>>;
    async fn describe_subnets(&self, token: Option<String>) -> ProviderResult<Page<ec2::Subnet>>;
    async fn describe_security_groups(&self, token: Option<String>) -> ProviderResult<Page<ec2::SecurityGroup>>;
    async fn describe_key_pairs(&self, token: Option<String>) -> ProviderResult<Page<ec2::KeyPairInfo>>;
    async fn describe_volumes(&self, token: Option<String>) -> ProviderResult<Page<ec2::Volume>>;
    /// Images owned by the account.
    async fn describe_images(&self, token: Option<String>) -> ProviderResult<Page<ec2::Image>>;
    async fn describe_internet_gateways(&self, token: Option<String>) -> ProviderResult<Page<ec2::InternetGateway>>;
    async fn describe_nat_gateways(&self, token: Option<String>) -> ProviderResult<Page<ec2::NatGateway>>;
    async fn describe_route_tables(&self, token: Option<String>) -> ProviderResult<Page<ec2::RouteTable>>;
    async fn describe_availability_zones(&self, token: Option<String>) -> ProviderResult<Page<ec2::AvailabilityZone>>;
    async fn describe_addresses(&self, token: Option<String>) -> ProviderResult<Page<ec2::Address>>;
    /// Snapshots owned by the account.
    async fn describe_snapshots(&self, token: Option<String>) -> ProviderResult<Page<ec2::Snapshot>>;
    async fn describe_network_interfaces(&self, token: Option<String>) -> ProviderResult<Page<ec2::NetworkInterface>>;
}

#[async_trait]
pub trait ElbApi: Send + Sync {
    async fn describe_classic_load_balancers(&self, token: Option<String>) -> ProviderResult<Page<elb::LoadBalancerDescription>>;
}

#[async_trait]
pub trait Elbv2Api: Send + Sync {
    async fn describe_load_balancers(&self, token: Option<String>) -> ProviderResult<Page<elb::LoadBalancer>>;
    async fn describe_target_groups(&self, token: Option<String>) -> ProviderResult<Page<elb::TargetGroup>>;
    async fn describe_listeners(&self, load_balancer_arn: &str, token: Option<String>) -> ProviderResult<Page<elb::Listener>>;
    async fn describe_target_health(&self, target_group_arn: &str) -> ProviderResult<Vec<elb::TargetHealthDescription>>;
}

#[async_trait]
pub trait RdsApi: Send + Sync {
    async fn describe_db_instances(&self, token: Option<String>) -> ProviderResult<Page<rds::DbInstance>>;
    async fn describe_db_subnet_groups(&self, token: Option<String>) -> ProviderResult<Page<rds::DbSubnetGroup>>;
}

#[async_trait]
pub trait AutoscalingApi: Send + Sync {
    async fn describe_launch_configurations(&self, token: Option<String>) -> ProviderResult<Page<autoscaling::LaunchConfiguration>>;
    async fn describe_auto_scaling_groups(&self, token: Option<String>) -> ProviderResult<Page<autoscaling::Group>>;
    async fn describe_policies(&self, token: Option<String>) -> ProviderResult<Page<autoscaling::ScalingPolicy>>;
}

// ============================================================================
// Containers and certificates
// ============================================================================

#[async_trait]
pub trait EcrApi: Send + Sync {
    async fn describe_repositories(&self, token: Option<String>) -> ProviderResult<Page<ecs::Repository>>;
}

#[async_trait]
pub trait EcsApi: Send + Sync {
    /// Cluster arns.
    async fn list_clusters(&self, token: Option<String>) -> ProviderResult<Page<String>>;
    /// Accepts cluster names or arns; at most 100 per call.
    async fn describe_clusters(&self, clusters: &[String]) -> ProviderResult<Vec<ecs::Cluster>>;
    async fn list_task_definitions(&self, family_prefix: Option<&str>, token: Option<String>) -> ProviderResult<Page<String>>;
    async fn describe_task_definition(&self, arn: &str) -> ProviderResult<ecs::TaskDefinition>;
    /// Task arns of `cluster` with the given desired status (`RUNNING` or `STOPPED`).
    async fn list_tasks(&self, cluster: &str, desired_status: &str, token: Option<String>) -> ProviderResult<Page<String>>;
    async fn describe_tasks(&self, cluster: &str, arns: &[String]) -> ProviderResult<Vec<ecs::Task>>;
    async fn list_container_instances(&self, cluster: &str, token: Option<String>) -> ProviderResult<Page<String>>;
    async fn describe_container_instances(&self, cluster: &str, arns: &[String]) -> ProviderResult<Vec<ecs::ContainerInstance>>;
}

#[async_trait]
pub trait AcmApi: Send + Sync {
    async fn list_certificates(&self, token: Option<String>) -> ProviderResult<Page<acm::CertificateSummary>>;
}

// ============================================================================
// Access
// ============================================================================

#[async_trait]
pub trait IamApi: Send + Sync {
    async fn list_users(&self, token: Option<String>) -> ProviderResult<Page<iam::User>>;
    /// Pages of users, groups, roles and managed policies, restricted to `filter`.
    async fn get_account_authorization_details(
        &self,
        filter: &[iam::EntityType],
        token: Option<String>,
    ) -> ProviderResult<Page<iam::AccountAuthorizationDetails>>;
    async fn list_access_keys(&self, user_name: &str, token: Option<String>) -> ProviderResult<Page<iam::AccessKeyMetadata>>;
    async fn list_instance_profiles(&self, token: Option<String>) -> ProviderResult<Page<iam::InstanceProfile>>;
    async fn list_virtual_mfa_devices(&self, token: Option<String>) -> ProviderResult<Page<iam::VirtualMfaDevice>>;
}

// ============================================================================
// Storage, messaging and the rest
// ============================================================================

#[async_trait]
pub trait S3Api: Send + Sync {
    async fn list_buckets(&self) -> ProviderResult<Vec<s3::Bucket>>;
    /// Location constraint of the bucket; empty for `us-east-1`.
    async fn get_bucket_location(&self, bucket: &str) -> ProviderResult<String>;
    async fn get_bucket_acl(&self, bucket: &str) -> ProviderResult<Vec<s3::AclGrant>>;
    async fn list_objects(&self, bucket: &str, token: Option<String>) -> ProviderResult<Page<s3::Object>>;
}

#[async_trait]
pub trait SnsApi: Send + Sync {
    async fn list_subscriptions(&self, token: Option<String>) -> ProviderResult<Page<messaging::Subscription>>;
    async fn list_topics(&self, token: Option<String>) -> ProviderResult<Page<messaging::Topic>>;
}

#[async_trait]
pub trait SqsApi: Send + Sync {
    async fn list_queues(&self) -> ProviderResult<Vec<String>>;
    /// All attributes of the queue.
    async fn get_queue_attributes(&self, queue_url: &str) -> ProviderResult<BTreeMap<String, String>>;
}

#[async_trait]
pub trait Route53Api: Send + Sync {
    async fn list_hosted_zones(&self, token: Option<String>) -> ProviderResult<Page<route53::HostedZone>>;
    async fn list_resource_record_sets(&self, zone_id: &str, token: Option<String>) -> ProviderResult<Page<route53::ResourceRecordSet>>;
}

#[async_trait]
pub trait LambdaApi: Send + Sync {
    async fn list_functions(&self, token: Option<String>) -> ProviderResult<Page<lambda::FunctionConfiguration>>;
}

#[async_trait]
pub trait CloudWatchApi: Send + Sync {
    async fn list_metrics(&self, token: Option<String>) -> ProviderResult<Page<cloudwatch::Metric>>;
    async fn describe_alarms(&self, token: Option<String>) -> ProviderResult<Page<cloudwatch::MetricAlarm>>;
}

#[async_trait]
pub trait CloudFrontApi: Send + Sync {
    async fn list_distributions(&self, token: Option<String>) -> ProviderResult<Page<cloudfront::DistributionSummary>>;
}

#[async_trait]
pub trait CloudFormationApi: Send + Sync {
    async fn describe_stacks(&self, token: Option<String>) -> ProviderResult<Page<cloudformation::Stack>>;
}

// ============================================================================
// Client bundle
// ============================================================================

/// A provider implementing every service trait.
pub trait CloudProvider:
    Ec2Api
    + ElbApi
    + Elbv2Api
    + RdsApi
    + AutoscalingApi
    + EcrApi
    + EcsApi
    + AcmApi
    + IamApi
    + S3Api
    + SnsApi
    + SqsApi
    + Route53Api
    + LambdaApi
    + CloudWatchApi
    + CloudFrontApi
    + CloudFormationApi
{
}

impl<T> CloudProvider for T where
    T: Ec2Api
        + ElbApi
        + Elbv2Api
        + RdsApi
        + AutoscalingApi
        + EcrApi
        + EcsApi
        + AcmApi
        + IamApi
        + S3Api
        + SnsApi
        + SqsApi
        + Route53Api
        + LambdaApi
        + CloudWatchApi
        + CloudFrontApi
        + CloudFormationApi
{
}

/// Provider clients shared by the services.
///
/// Each field can be swapped independently, e.g. to point a single service at a test
/// double while the others replay a fixture.
#[derive(Clone)]
pub struct Clients {
    pub ec2: Arc<dyn Ec2Api>,
    pub elb: Arc<dyn ElbApi>,
    pub elbv2: Arc<dyn Elbv2Api>,
    pub rds: Arc<dyn RdsApi>,
    pub autoscaling: Arc<dyn AutoscalingApi>,
    pub ecr: Arc<dyn EcrApi>,
    pub ecs: Arc<dyn EcsApi>,
    pub acm: Arc<dyn AcmApi>,
    pub iam: Arc<dyn IamApi>,
    pub s3: Arc<dyn S3Api>,
    pub sns: Arc<dyn SnsApi>,
    pub sqs: Arc<dyn SqsApi>,
    pub route53: Arc<dyn Route53Api>,
    pub lambda: Arc<dyn LambdaApi>,
    pub cloudwatch: Arc<dyn CloudWatchApi>,
    pub cloudfront: Arc<dyn CloudFrontApi>,
    pub cloudformation: Arc<dyn CloudFormationApi>,
}

impl Clients {
    pub fn from_provider<P: CloudProvider + 'static>(provider: Arc<P>) -> Self {
        Clients {
            ec2: provider.clone(),
            elb: provider.clone(),
            elbv2: provider.clone(),
            rds: provider.clone(),
            autoscaling: provider.clone(),
            ecr: provider.clone(),
            ecs: provider.clone(),
            acm: provider.clone(),
            iam: provider.clone(),
            s3: provider.clone(),
            sns: provider.clone(),
            sqs: provider.clone(),
            route53: provider.clone(),
            lambda: provider.clone(),
            cloudwatch: provider.clone(),
            cloudfront: provider.clone(),
            cloudformation: provider,
        }
    }
}

impl std::fmt::Debug for Clients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clients").finish_non_exhaustive()
    }
}

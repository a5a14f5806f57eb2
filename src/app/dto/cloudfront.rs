use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DistributionSummary {
    pub id: Option<String>,
    #[serde(rename = "ARN")]
    pub arn: Option<String>,
    pub domain_name: Option<String>,
    pub comment: Option<String>,
    pub enabled: Option<bool>,
    pub http_version: Option<String>,
    #[serde(rename = "IsIPV6Enabled")]
    pub is_ipv6_enabled: Option<bool>,
    pub last_modified_time: Option<DateTime<Utc>>,
    pub price_class: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "WebACLId")]
    pub web_acl_id: Option<String>,
    pub aliases: Option<Aliases>,
    pub origins: Option<Origins>,
    pub viewer_certificate: Option<ViewerCertificate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Aliases {
    pub quantity: Option<i64>,
    pub items: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Origins {
    pub quantity: Option<i64>,
    pub items: Option<Vec<Origin>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Origin {
    pub id: Option<String>,
    pub domain_name: Option<String>,
    pub origin_path: Option<String>,
    pub s3_origin_config: Option<S3OriginConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct S3OriginConfig {
    pub origin_access_identity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ViewerCertificate {
    #[serde(rename = "ACMCertificateArn")]
    pub acm_certificate_arn: Option<String>,
    pub certificate: Option<String>,
    pub minimum_protocol_version: Option<String>,
    #[serde(rename = "SSLSupportMethod")]
    pub ssl_support_method: Option<String>,
}

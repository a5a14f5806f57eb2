//! Notification (`sns`) and queue (`sqs`) shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Subscription {
    pub subscription_arn: Option<String>,
    pub topic_arn: Option<String>,
    pub endpoint: Option<String>,
    pub owner: Option<String>,
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Topic {
    pub topic_arn: Option<String>,
}

/// A queue url with the attributes read for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Queue {
    pub queue_url: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FunctionConfiguration {
    pub function_arn: Option<String>,
    pub function_name: Option<String>,
    pub description: Option<String>,
    pub handler: Option<String>,
    pub runtime: Option<String>,
    pub role: Option<String>,
    pub memory_size: Option<i64>,
    pub timeout: Option<i64>,
    pub code_size: Option<i64>,
    pub code_sha256: Option<String>,
    pub version: Option<String>,
    /// `YYYY-MM-DDTHH:MM:SS.sss+0000` as returned by the API.
    pub last_modified: Option<String>,
}

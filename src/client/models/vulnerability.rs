//! Container vulnerability models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::pagination::Pagination;

/// A vulnerability observed in a container image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityContainer {
    #[serde(default)]
    pub image_id: String,

    /// CVE identifier
    #[serde(default)]
    pub vuln_id: String,

    #[serde(default)]
    pub severity: String,

    /// "New", "Active", "Fixed", ...
    #[serde(default)]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub feature_key: FeatureKey,

    #[serde(default)]
    pub fix_info: FixInfo,

    /// Scan evaluation context (image info, scanner versions)
    #[serde(default)]
    pub eval_ctx: Value,
}

/// Package the vulnerability was found in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureKey {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixInfo {
    #[serde(default)]
    pub fix_available: i64,

    #[serde(default)]
    pub fixed_version: String,
}

impl VulnerabilityContainer {
    pub fn has_fix(&self) -> bool {
        self.fix_info.fix_available != 0
    }
}

/// One page of container vulnerabilities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VulnerabilitiesContainersResponse {
    #[serde(default)]
    pub data: Vec<VulnerabilityContainer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Pagination>,
}

paged_response!(VulnerabilitiesContainersResponse, VulnerabilityContainer);

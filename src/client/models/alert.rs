//! Alert models

use serde::{Deserialize, Serialize};

use crate::client::pagination::Pagination;

/// Alert raised by a policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub alert_id: i64,

    #[serde(default)]
    pub alert_name: String,

    #[serde(default)]
    pub alert_type: String,

    /// Severity level: "Critical", "High", "Medium", "Low", "Info"
    #[serde(default)]
    pub severity: String,

    #[serde(default)]
    pub alert_info: AlertInfo,

    /// Alert status: "Open" or "Closed"
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub start_time: String,

    #[serde(default)]
    pub end_time: String,

    #[serde(default)]
    pub policy_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reachability: Option<String>,
}

/// Human readable alert summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertInfo {
    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub description: String,
}

/// One page of alerts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub data: Vec<Alert>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Pagination>,
}

paged_response!(AlertsResponse, Alert);

//! Entity models

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::pagination::Pagination;

/// Machine details reported by an agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineDetailEntity {
    /// Machine ID
    pub mid: i64,

    #[serde(default)]
    pub hostname: String,

    #[serde(default)]
    pub domain: String,

    #[serde(default)]
    pub os: String,

    #[serde(default)]
    pub os_version: String,

    #[serde(default)]
    pub kernel: String,

    #[serde(default)]
    pub kernel_release: String,

    #[serde(default)]
    pub kernel_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_instance_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_zone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,

    /// Cloud and agent tags (`Account`, `VmProvider`, `arch`, ...)
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// One page of machine details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineDetailsEntityResponse {
    #[serde(default)]
    pub data: Vec<MachineDetailEntity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Pagination>,
}

paged_response!(MachineDetailsEntityResponse, MachineDetailEntity);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_details_deserialization() {
        let json = r#"{
            "data": [
                {
                    "awsInstanceId": "i-abc12345678901234",
                    "awsZone": "us-west-2",
                    "createdTime": "2022-01-20T20:42:03.912Z",
                    "domain": "(none)",
                    "hostname": "mock-hostname",
                    "kernel": "Linux",
                    "kernelRelease": "5.3.0-1035-aws",
                    "mid": 51,
                    "os": "Ubuntu",
                    "osVersion": "18.04",
                    "tags": {
                        "VmProvider": "AWS",
                        "arch": "arm64"
                    }
                }
            ],
            "paging": {
                "rows": 1,
                "totalRows": 1,
                "urls": { "nextPage": null }
            }
        }"#;

        let response: MachineDetailsEntityResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.data.len(), 1);
        let machine = &response.data[0];
        assert_eq!(machine.mid, 51);
        assert_eq!(machine.hostname, "mock-hostname");
        assert_eq!(machine.aws_zone.as_deref(), Some("us-west-2"));
        assert_eq!(machine.tags.get("arch").map(String::as_str), Some("arm64"));
        assert!(machine.created_time.is_some());
    }
}

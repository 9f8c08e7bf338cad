//! Cloud resource inventory models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::pagination::Pagination;
use crate::client::search::{SearchFilter, SearchableFilter, TimeFilter};

/// Cloud service provider of an inventory search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryType {
    #[default]
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "Azure")]
    Azure,
    #[serde(rename = "GCP")]
    Gcp,
}

/// Body of an inventory search: a search filter plus the provider to search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySearch {
    #[serde(flatten)]
    pub filter: SearchFilter,

    pub csp: InventoryType,
}

impl InventorySearch {
    pub fn new(csp: InventoryType, filter: SearchFilter) -> Self {
        Self { filter, csp }
    }
}

impl SearchableFilter for InventorySearch {
    fn time_filter(&self) -> Option<&TimeFilter> {
        self.filter.time_filter()
    }

    fn set_start_time(&mut self, start: DateTime<Utc>) {
        self.filter.set_start_time(start);
    }

    fn set_end_time(&mut self, end: DateTime<Utc>) {
        self.filter.set_end_time(end);
    }
}

/// A cloud resource as seen by a configuration scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResource {
    #[serde(default)]
    pub csp: String,

    #[serde(default)]
    pub resource_id: String,

    #[serde(default)]
    pub resource_region: String,

    #[serde(default)]
    pub resource_type: String,

    #[serde(default)]
    pub service: String,

    #[serde(default)]
    pub urn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Provider specific resource configuration
    #[serde(default)]
    pub resource_config: Value,
}

/// One page of inventory resources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryResponse {
    #[serde(default)]
    pub data: Vec<InventoryResource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Pagination>,
}

paged_response!(InventoryResponse, InventoryResource);

//! Container vulnerabilities service

use crate::client::models::VulnerabilitiesContainersResponse;
use crate::client::pagination::collect_all_pages;
use crate::client::search::{SearchFilter, V2_API_MAX_SEARCH_WINDOW_DAYS};
use crate::client::{ApiTransport, post_json};
use crate::error::Result;

pub const CONTAINERS_SEARCH_PATH: &str = "/api/v2/Vulnerabilities/Containers/search";

pub struct VulnerabilitiesService<'a> {
    transport: &'a dyn ApiTransport,
}

impl<'a> VulnerabilitiesService<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self { transport }
    }

    /// First page of container vulnerabilities matching `filter`
    pub async fn search(&self, filter: &SearchFilter) -> Result<VulnerabilitiesContainersResponse> {
        post_json(self.transport, CONTAINERS_SEARCH_PATH, filter).await
    }

    /// First page of container vulnerabilities from the last week
    pub async fn search_last_week(&self) -> Result<VulnerabilitiesContainersResponse> {
        self.search(&SearchFilter::last_days(V2_API_MAX_SEARCH_WINDOW_DAYS)).await
    }

    /// Every container vulnerability matching `filter`
    pub async fn search_all_pages(
        &self,
        filter: &SearchFilter,
    ) -> Result<VulnerabilitiesContainersResponse> {
        let mut response = self.search(filter).await?;
        collect_all_pages(self.transport, &mut response).await?;
        Ok(response)
    }
}

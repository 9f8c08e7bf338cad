//! Entities service (machine details)

use crate::client::models::MachineDetailsEntityResponse;
use crate::client::pagination::collect_all_pages;
use crate::client::search::SearchFilter;
use crate::client::{ApiTransport, post_json};
use crate::error::Result;

pub const MACHINE_DETAILS_SEARCH_PATH: &str = "/api/v2/Entities/MachineDetails/search";

pub struct EntitiesService<'a> {
    transport: &'a dyn ApiTransport,
}

impl<'a> EntitiesService<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self { transport }
    }

    /// First page of machine details matching `filter`
    pub async fn search(&self, filter: &SearchFilter) -> Result<MachineDetailsEntityResponse> {
        post_json(self.transport, MACHINE_DETAILS_SEARCH_PATH, filter).await
    }

    /// Every machine detail matching `filter`
    pub async fn search_all_pages(
        &self,
        filter: &SearchFilter,
    ) -> Result<MachineDetailsEntityResponse> {
        let mut response = self.search(filter).await?;
        collect_all_pages(self.transport, &mut response).await?;
        Ok(response)
    }

    /// Machine details seen in the last seven days
    pub async fn list_last_week(&self) -> Result<MachineDetailsEntityResponse> {
        self.search_all_pages(&SearchFilter::last_days(7)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::client::search::Filter;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_posts_filter() {
        let mock = MockTransport::new()
            .with_response(
                "POST",
                MACHINE_DETAILS_SEARCH_PATH,
                json!({ "data": [{ "mid": 51, "hostname": "mock-hostname" }] }),
            )
            .await;
        let filter = SearchFilter::default().with_filter(Filter::eq("mid", "51"));

        let response = EntitiesService::new(&mock).search(&filter).await.unwrap();

        assert_eq!(response.data[0].hostname, "mock-hostname");
        let requests = mock.captured_requests().await;
        assert_eq!(requests[0].method, "POST");
        assert_eq!(
            requests[0].body.as_ref().unwrap()["filters"][0],
            json!({ "field": "mid", "expression": "eq", "value": "51" })
        );
    }

    #[tokio::test]
    async fn test_list_walks_every_page() {
        let mock = MockTransport::new()
            .with_response(
                "POST",
                MACHINE_DETAILS_SEARCH_PATH,
                json!({
                    "data": [{ "mid": 1 }],
                    "paging": { "rows": 1, "totalRows": 2, "urls": { "nextPage": "/api/v2/NextPage/machines" } }
                }),
            )
            .await
            .with_response(
                "GET",
                "/api/v2/NextPage/machines",
                json!({
                    "data": [{ "mid": 2 }],
                    "paging": { "rows": 1, "totalRows": 2, "urls": { "nextPage": null } }
                }),
            )
            .await;

        let response = EntitiesService::new(&mock)
            .list_last_week()
            .await
            .unwrap();

        let mids: Vec<_> = response.data.iter().map(|m| m.mid).collect();
        assert_eq!(mids, vec![1, 2]);

        let requests = mock.captured_requests().await;
        let time_filter = &requests[0].body.as_ref().unwrap()["timeFilter"];
        assert!(time_filter["startTime"].is_string());
        assert!(time_filter["endTime"].is_string());
    }
}

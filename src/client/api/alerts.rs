//! Alerts service

use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;

use crate::client::models::AlertsResponse;
use crate::client::pagination::collect_all_pages;
use crate::client::{ApiTransport, get_json};
use crate::error::Result;

pub const ALERTS_PATH: &str = "/api/v2/Alerts";

pub struct AlertsService<'a> {
    transport: &'a dyn ApiTransport,
}

impl<'a> AlertsService<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self { transport }
    }

    /// First page of alerts from the default time range
    pub async fn list(&self) -> Result<AlertsResponse> {
        get_json(self.transport, ALERTS_PATH).await
    }

    /// First page of alerts raised between `start` and `end`
    pub async fn list_by_time(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<AlertsResponse> {
        get_json(self.transport, &by_time_path(start, end)).await
    }

    /// Every alert from the default time range
    pub async fn list_all(&self) -> Result<AlertsResponse> {
        let mut response = self.list().await?;
        collect_all_pages(self.transport, &mut response).await?;
        debug!("Listed {} alerts", response.data.len());
        Ok(response)
    }

    /// Every alert raised between `start` and `end`
    pub async fn list_all_by_time(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<AlertsResponse> {
        let mut response = self.list_by_time(start, end).await?;
        collect_all_pages(self.transport, &mut response).await?;
        debug!("Listed {} alerts between {} and {}", response.data.len(), start, end);
        Ok(response)
    }
}

fn by_time_path(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "{}?startTime={}&endTime={}",
        ALERTS_PATH,
        start.to_rfc3339_opts(SecondsFormat::Millis, true),
        end.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use crate::error::{ApiError, Error};
    use serde_json::json;

    fn alerts_page(ids: &[i64], next: Option<&str>) -> serde_json::Value {
        let data: Vec<_> = ids
            .iter()
            .map(|id| json!({ "alertId": id, "severity": "High", "status": "Open" }))
            .collect();
        json!({
            "data": data,
            "paging": { "rows": ids.len(), "totalRows": 3, "urls": { "nextPage": next } }
        })
    }

    #[test]
    fn test_by_time_path_uses_millisecond_timestamps() {
        let start = "2022-09-29T16:00:00Z".parse().unwrap();
        let end = "2022-09-30T16:00:00Z".parse().unwrap();
        assert_eq!(
            by_time_path(start, end),
            "/api/v2/Alerts?startTime=2022-09-29T16:00:00.000Z&endTime=2022-09-30T16:00:00.000Z"
        );
    }

    #[tokio::test]
    async fn test_list_is_a_get() {
        let mock = MockTransport::new()
            .with_response("GET", ALERTS_PATH, json!({}))
            .await;

        let response = AlertsService::new(&mock).list().await.unwrap();

        assert!(response.data.is_empty());
        let requests = mock.captured_requests().await;
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, ALERTS_PATH);
    }

    #[tokio::test]
    async fn test_list_all_walks_pages() {
        let mock = MockTransport::new()
            .with_response(
                "GET",
                ALERTS_PATH,
                alerts_page(&[1, 2], Some("https://demo.lacework.net/api/v2/NextPage/alerts")),
            )
            .await
            .with_response("GET", "/api/v2/NextPage/alerts", alerts_page(&[3], None))
            .await;

        let response = AlertsService::new(&mock).list_all().await.unwrap();

        let ids: Vec<_> = response.data.iter().map(|a| a.alert_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(response.paging.is_none());
        assert_eq!(mock.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_list_all_by_time_single_page() {
        let start = "2022-09-29T16:00:00Z".parse().unwrap();
        let end = "2022-09-30T16:00:00Z".parse().unwrap();
        let mock = MockTransport::new()
            .with_response("GET", &by_time_path(start, end), alerts_page(&[7], None))
            .await;

        let response = AlertsService::new(&mock)
            .list_all_by_time(start, end)
            .await
            .unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(mock.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_list_error() {
        let mock = MockTransport::new()
            .with_error(ApiError::Unauthorized)
            .await;

        let err = AlertsService::new(&mock).list_all().await.unwrap_err();

        assert!(matches!(err, Error::Api(ApiError::Unauthorized)));
    }
}

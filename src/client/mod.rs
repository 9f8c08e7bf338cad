//! Lacework API client

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

pub mod api;
pub mod lacework;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod search;

pub use lacework::{ClientBuilder, LaceworkClient};
#[cfg(test)]
pub use mock::MockTransport;
pub use pagination::{
    PageUrls, Pageable, PagedData, Pagination, collect_all_pages, next_page, next_page_path,
};
pub use search::{
    DataLength, Filter, SearchFilter, SearchableFilter, TimeFilter,
    V2_API_MAX_SEARCH_HISTORY_DAYS, V2_API_MAX_SEARCH_WINDOW_DAYS, day_span, windowed_search,
};

/// Request/decode primitive the pagination walker and services are built on.
///
/// `path` is relative to the account host (e.g. `/api/v2/Alerts`). A
/// response body is returned as JSON; non-success statuses are errors.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;
}

/// GET `path` and decode the response body
pub async fn get_json<T, R>(transport: &T, path: &str) -> Result<R>
where
    T: ApiTransport + ?Sized,
    R: DeserializeOwned,
{
    let value = transport.request(Method::GET, path, None).await?;
    Ok(serde_json::from_value(value)?)
}

/// POST `body` as JSON to `path` and decode the response body
pub async fn post_json<T, B, R>(transport: &T, path: &str, body: &B) -> Result<R>
where
    T: ApiTransport + ?Sized,
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let body = serde_json::to_value(body)?;
    let value = transport.request(Method::POST, path, Some(&body)).await?;
    Ok(serde_json::from_value(value)?)
}

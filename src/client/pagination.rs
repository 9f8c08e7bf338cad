//! Cursor pagination for API v2 responses
//!
//! Search and list endpoints return at most one page of rows together with a
//! `paging` object. When more rows exist, `paging.urls.nextPage` holds the URL
//! of the following page, valid only for the lifetime of the originating
//! search.

use log::debug;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ApiTransport;
use crate::error::{ApiError, Error, Result};

/// Paging metadata attached to a v2 response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Rows in the current page
    #[serde(default)]
    pub rows: u64,

    /// Rows across all pages
    #[serde(default)]
    pub total_rows: u64,

    #[serde(default)]
    pub urls: PageUrls,
}

/// Locators for neighbouring pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageUrls {
    #[serde(default)]
    pub next_page: Option<String>,
}

impl Pagination {
    /// Next page locator, `None` on the last page
    pub fn next_page_url(&self) -> Option<&str> {
        self.urls
            .next_page
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Check if there are more pages to fetch.
    pub fn has_next_page(&self) -> bool {
        self.next_page_url().is_some()
    }
}

/// A response that can be walked page by page with [`next_page`].
pub trait Pageable: DeserializeOwned {
    /// Paging metadata of the current page, `None` for endpoints that never paginate
    fn page_info(&self) -> Option<&Pagination>;

    /// Clear paging metadata and the rows of the current page
    fn reset_paging(&mut self);
}

/// A pageable response whose rows can be moved in and out.
pub trait PagedData: Pageable {
    type Item;

    fn take_data(&mut self) -> Vec<Self::Item>;
    fn set_data(&mut self, data: Vec<Self::Item>);
}

/// Hosts relative locators are resolved against
const LOCATOR_ROOT: &str = "https://localhost/";
const LOCATOR_BASE: &str = "https://localhost/api/v2/";

/// Turn a next page locator into a request path.
///
/// Absolute URLs contribute their path and query, `/`-rooted paths are used
/// as-is. Relative paths resolve under `/api/v2/` unless they already start
/// with `api/`.
pub fn next_page_path(locator: &str) -> Result<String> {
    let malformed = || Error::from(ApiError::MalformedCursor(locator.to_string()));

    if locator.starts_with('/') {
        return Ok(locator.to_string());
    }

    let url = match Url::parse(locator) {
        Ok(url) if !url.cannot_be_a_base() => url,
        Ok(_) => return Err(malformed()),
        Err(_) if is_relative_path(locator) => {
            let base = if locator.starts_with("api/") {
                LOCATOR_ROOT
            } else {
                LOCATOR_BASE
            };
            Url::parse(base)
                .and_then(|base| base.join(locator))
                .map_err(|_| malformed())?
        }
        Err(_) => return Err(malformed()),
    };

    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }
    Ok(path)
}

/// A relative reference may not contain whitespace or a colon in its first segment
fn is_relative_path(locator: &str) -> bool {
    let first_segment = locator.split(['/', '?', '#']).next().unwrap_or_default();
    !locator.is_empty()
        && !first_segment.contains(':')
        && !locator.chars().any(char::is_whitespace)
}

/// Fetch the page following `pageable` into `pageable` itself.
///
/// Returns `Ok(false)` without touching the response when there is no paging
/// metadata or no next page locator. Otherwise the response is reset, the
/// next page is fetched and decoded in its place, and `Ok(true)` is returned.
/// Callers accumulate rows before each call since the reset discards them.
pub async fn next_page<T, P>(transport: &T, pageable: &mut P) -> Result<bool>
where
    T: ApiTransport + ?Sized,
    P: Pageable,
{
    let Some(paging) = pageable.page_info() else {
        debug!("Paging information not found");
        return Ok(false);
    };

    let Some(locator) = paging.next_page_url() else {
        return Ok(false);
    };

    let path = next_page_path(locator)?;
    debug!(
        "Fetching next page ({} of {} rows so far): {}",
        paging.rows, paging.total_rows, path
    );

    pageable.reset_paging();
    let page = transport.request(Method::GET, &path, None).await?;
    *pageable = serde_json::from_value(page)?;

    Ok(true)
}

/// Walk every remaining page, leaving all rows in `response`.
///
/// Stops at the first error, which is returned after the rows gathered so
/// far have been stored back into `response`. Paging metadata is always
/// cleared on return.
pub async fn collect_all_pages<T, P>(transport: &T, response: &mut P) -> Result<()>
where
    T: ApiTransport + ?Sized,
    P: PagedData,
{
    let mut all = Vec::new();

    let walk = loop {
        all.extend(response.take_data());

        match next_page(transport, response).await {
            Ok(true) => continue,
            Ok(false) => break Ok(()),
            Err(err) => break Err(err),
        }
    };

    debug!("Collected {} rows across all pages", all.len());
    response.reset_paging();
    response.set_data(all);
    walk
}

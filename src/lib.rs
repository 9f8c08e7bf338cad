//! Lacework SDK - client for the Lacework API v2
//!
//! The core of the crate is two generic helpers the resource services are
//! built on:
//! - [`next_page`] walks cursor-paginated responses in place
//! - [`windowed_search`] slides a bounded time window back through history
//!   until a search returns data
//!
//! ```no_run
//! use lacework_sdk::{Config, LaceworkClient, SearchFilter};
//!
//! # async fn run() -> lacework_sdk::Result<()> {
//! let client = LaceworkClient::from_config(&Config::load()?)?;
//!
//! let mut response = client.vulnerabilities().search(&SearchFilter::last_days(7)).await?;
//! loop {
//!     for vuln in &response.data {
//!         println!("{} {}", vuln.vuln_id, vuln.severity);
//!     }
//!     if !client.next_page(&mut response).await? {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;

pub use client::models;
pub use client::{
    ApiTransport, ClientBuilder, DataLength, Filter, LaceworkClient, PageUrls, Pageable,
    PagedData, Pagination, SearchFilter, SearchableFilter, TimeFilter,
    V2_API_MAX_SEARCH_HISTORY_DAYS, V2_API_MAX_SEARCH_WINDOW_DAYS, collect_all_pages, day_span,
    next_page, windowed_search,
};
pub use config::{Config, SearchSettings};
pub use error::{ApiError, ConfigError, Error, Result, SearchError};

//! Resource services built on [`ApiTransport`](super::ApiTransport)
//!
//! Each service borrows a transport and exposes the single-page request of
//! its resource next to helpers that walk every page:
//! - [`AlertsService`] - alert listing
//! - [`EntitiesService`] - machine details search
//! - [`InventoryService`] - cloud inventory search, including windowed search
//! - [`VulnerabilitiesService`] - container vulnerability search

mod alerts;
mod entities;
mod inventory;
mod vulnerabilities;

pub use alerts::AlertsService;
pub use entities::EntitiesService;
pub use inventory::InventoryService;
pub use vulnerabilities::VulnerabilitiesService;

//! Lacework API v2 data models
//!
//! Response types wrap one page of rows together with optional paging
//! metadata, so every one of them can be walked with
//! [`next_page`](super::next_page) and retried with
//! [`windowed_search`](super::windowed_search).

/// Implement the paging and data-length traits for a `{ data, paging }` response
macro_rules! paged_response {
    ($response:ty, $item:ty) => {
        impl $crate::client::pagination::Pageable for $response {
            fn page_info(&self) -> Option<&$crate::client::pagination::Pagination> {
                self.paging.as_ref()
            }

            fn reset_paging(&mut self) {
                self.paging = None;
                self.data.clear();
            }
        }

        impl $crate::client::pagination::PagedData for $response {
            type Item = $item;

            fn take_data(&mut self) -> Vec<$item> {
                std::mem::take(&mut self.data)
            }

            fn set_data(&mut self, data: Vec<$item>) {
                self.data = data;
            }
        }

        impl $crate::client::search::DataLength for $response {
            fn data_len(&self) -> usize {
                self.data.len()
            }
        }
    };
}

mod alert;
mod entity;
mod inventory;
mod vulnerability;

pub use alert::{Alert, AlertInfo, AlertsResponse};
pub use entity::{MachineDetailEntity, MachineDetailsEntityResponse};
pub use inventory::{InventoryResource, InventoryResponse, InventorySearch, InventoryType};
pub use vulnerability::{
    FeatureKey, FixInfo, VulnerabilitiesContainersResponse, VulnerabilityContainer,
};

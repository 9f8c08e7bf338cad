//! Inventory service

use log::debug;

use crate::client::models::{InventoryResponse, InventorySearch};
use crate::client::pagination::collect_all_pages;
use crate::client::search::windowed_search;
use crate::client::{ApiTransport, post_json};
use crate::config::SearchSettings;
use crate::error::Result;

pub const INVENTORY_SEARCH_PATH: &str = "/api/v2/Inventory/search";

pub struct InventoryService<'a> {
    transport: &'a dyn ApiTransport,
    settings: SearchSettings,
}

impl<'a> InventoryService<'a> {
    pub fn new(transport: &'a dyn ApiTransport) -> Self {
        Self {
            transport,
            settings: SearchSettings::default(),
        }
    }

    /// Use `settings` for windowed searches
    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// First page of resources matching `filter`
    pub async fn search(&self, filter: &InventorySearch) -> Result<InventoryResponse> {
        post_json(self.transport, INVENTORY_SEARCH_PATH, filter).await
    }

    /// Search backwards one window at a time until resources are found, then
    /// collect every page of the matching window.
    ///
    /// `filter` is left holding the window that produced the result, or the
    /// oldest window tried when history was exhausted with nothing found.
    pub async fn search_windowed(&self, filter: &mut InventorySearch) -> Result<InventoryResponse> {
        let transport = self.transport;
        let mut response = InventoryResponse::default();

        windowed_search(
            move |filter: InventorySearch| async move {
                post_json::<_, _, InventoryResponse>(transport, INVENTORY_SEARCH_PATH, &filter)
                    .await
            },
            self.settings.window_days,
            self.settings.max_history_days,
            &mut response,
            filter,
        )
        .await?;

        collect_all_pages(self.transport, &mut response).await?;
        debug!("Inventory search returned {} resources", response.data.len());
        Ok(response)
    }
}

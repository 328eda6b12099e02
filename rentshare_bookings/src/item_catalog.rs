use reqwest::StatusCode;
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::TracingMiddleware;
use serde::{Deserialize, Serialize};

use crate::api::{ItemId, UserId};

/// Live item record as the catalog service reports it. Ownership and
/// availability are read from here, never from booking snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub owner_id: UserId,
    pub available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ItemCatalogError {
    #[error("Item {0} not found")]
    NotFound(ItemId),

    #[error("Other error {0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn resolve_item(&self, item_id: ItemId) -> Result<CatalogItem, ItemCatalogError>;
}

pub struct HttpItemCatalog {
    item_catalog_url: String,
}

impl HttpItemCatalog {
    pub fn new(item_catalog_url: String) -> Self {
        Self { item_catalog_url }
    }
}

#[async_trait::async_trait]
impl ItemCatalog for HttpItemCatalog {
    async fn resolve_item(&self, item_id: ItemId) -> Result<CatalogItem, ItemCatalogError> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .map_err(|e| ItemCatalogError::Other(format!("Failed to build reqwest client: {}", e)))?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        let response = client
            .get(format!("{}/api/item/{}", self.item_catalog_url, item_id))
            .send()
            .await
            .map_err(|e| ItemCatalogError::Other(format!("Failed to get item by id: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ItemCatalogError::NotFound(item_id));
        }
        if !response.status().is_success() {
            return Err(ItemCatalogError::Other(format!(
                "Item catalog returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ItemCatalogError::Other(format!("Failed to parse item: {}", e)))
    }
}

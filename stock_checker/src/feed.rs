//! Store directory and inventory feed client

use serde::de::DeserializeOwned;
use stock_common::{InventorySnapshot, Result, StockError, StoreDirectory, StoresFeed};

const USER_AGENT: &str = "stock_checker/1.0";

/// Fetches the two upstream JSON feeds
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    stores_url: String,
    stock_url: String,
}

impl FeedClient {
    pub fn new(stores_url: impl Into<String>, stock_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            stores_url: stores_url.into(),
            stock_url: stock_url.into(),
        }
    }

    /// Download and flatten the store directory
    pub async fn fetch_store_directory(&self) -> Result<StoreDirectory> {
        log::info!("Fetching stores list from {}", self.stores_url);
        let feed: StoresFeed = self.get_json(&self.stores_url).await?;
        let directory = StoreDirectory::from_feed(feed);
        log::info!("Downloaded stores list ({} stores)", directory.len());
        Ok(directory)
    }

    /// Download one inventory snapshot
    pub async fn fetch_snapshot(&self) -> Result<InventorySnapshot> {
        log::debug!("Fetching stock list from {}", self.stock_url);
        let snapshot: InventorySnapshot = self.get_json(&self.stock_url).await?;
        log::info!("Got stock list ({} entries)", snapshot.len());
        Ok(snapshot)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StockError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;

//! Poll loop: fetch -> diff -> batch -> notify, then wait out the interval
//!
//! One cycle runs at a time. The interval is the idle gap after a cycle
//! finishes, so a slow fetch pushes the next one back instead of overlapping.

use crate::batcher::{batch_messages, DEFAULT_MAX_BATCH_SIZE};
use crate::config::Config;
use crate::dedup_cache::DedupCache;
use crate::feed::FeedClient;
use crate::notifier::{Notifier, Priority};
use crate::stock_diff::diff_snapshot;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use stock_common::{InventorySnapshot, ModelCatalog, Result, StockError, StockEvent, StoreDirectory};
use tokio::sync::watch;

/// Pushed once the store list is loaded so the operator sees what an alert looks like
pub const STARTUP_PREVIEW_MESSAGE: &str = "Stores list has been successfully downloaded, stock checker will now start. This is a test message to preview the message you will get when stock arrives";

/// Result of one poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Snapshot could not be fetched; the reported error text
    FetchFailed(String),
    Processed {
        events: Vec<StockEvent>,
        unfound: BTreeSet<String>,
        messages: Vec<String>,
    },
}

/// Warning text for wanted codes the feed does not list
pub fn unfound_models_message(unfound: &BTreeSet<String>) -> String {
    let codes: Vec<&str> = unfound.iter().map(String::as_str).collect();
    format!(
        "Some of the models you requested were not found in the store stock list, there is either a problem with the store feed, or you have picked the wrong models for the country you chose: {}",
        codes.join(" ")
    )
}

pub struct StockChecker {
    feed: FeedClient,
    notifier: Notifier,
    directory: StoreDirectory,
    catalog: ModelCatalog,
    wanted: Vec<String>,
    cache: Arc<DedupCache>,
    interval: Duration,
    max_batch_size: usize,
}

impl StockChecker {
    pub fn new(
        feed: FeedClient,
        notifier: Notifier,
        directory: StoreDirectory,
        catalog: ModelCatalog,
        wanted: Vec<String>,
        cache: Arc<DedupCache>,
    ) -> Self {
        Self {
            feed,
            notifier,
            directory,
            catalog,
            wanted,
            cache,
            interval: Duration::from_millis(3000),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Validate the configuration, load the store directory and announce startup.
    ///
    /// Any error here is reported through `notifier` and returned; polling must
    /// not start.
    pub async fn from_config(
        config: &Config,
        notifier: Notifier,
        cache: Arc<DedupCache>,
    ) -> Result<Self> {
        let catalog = match Self::checked_catalog(config) {
            Ok(catalog) => catalog,
            Err(e) => {
                notifier.report_error(e.to_string());
                return Err(e);
            }
        };

        let feed = FeedClient::new(&config.stores_url, &config.stock_url);
        let directory = match feed.fetch_store_directory().await {
            Ok(directory) => directory,
            Err(e) => {
                notifier.report_error(format!("Error downloading stores {}", e));
                return Err(e);
            }
        };

        notifier.notify(STARTUP_PREVIEW_MESSAGE, Priority::Emergency);

        Ok(Self::new(
            feed,
            notifier,
            directory,
            catalog,
            config.models_wanted.clone(),
            cache,
        )
        .with_interval(config.poll_interval())
        .with_max_batch_size(config.max_batch_size))
    }

    fn checked_catalog(config: &Config) -> Result<ModelCatalog> {
        config.validate()?;
        let catalog = config.load_catalog()?;
        catalog.validate_wanted(&config.models_wanted)?;
        Ok(catalog)
    }

    pub fn cache(&self) -> &Arc<DedupCache> {
        &self.cache
    }

    pub fn directory(&self) -> &StoreDirectory {
        &self.directory
    }

    /// Fetch one snapshot and process it. A fetch failure is reported and
    /// ends the cycle; it never stops later cycles.
    pub async fn run_cycle(&self) -> CycleOutcome {
        match self.feed.fetch_snapshot().await {
            Ok(snapshot) => self.process(&snapshot),
            Err(e) => self.fetch_failed(e),
        }
    }

    fn fetch_failed(&self, err: StockError) -> CycleOutcome {
        let message = format!("Error downloading stock list {}", err);
        self.notifier.report_error(&message);
        CycleOutcome::FetchFailed(message)
    }

    /// Diff, batch and notify. No network I/O is awaited here.
    pub fn process(&self, snapshot: &InventorySnapshot) -> CycleOutcome {
        let diff = diff_snapshot(
            &self.directory,
            snapshot,
            &self.wanted,
            &self.catalog,
            &self.cache,
        );

        let messages = batch_messages(&diff.events, self.max_batch_size);
        if messages.is_empty() {
            log::info!("No new stock");
        }
        for message in &messages {
            self.notifier.stock_alert(message.as_str());
        }

        if !diff.unfound.is_empty() {
            self.notifier
                .report_error(unfound_models_message(&diff.unfound));
        }

        CycleOutcome::Processed {
            events: diff.events,
            unfound: diff.unfound,
            messages,
        }
    }

    /// Poll until `shutdown` flips to true (or its sender is dropped).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        log::info!(
            "Polling every {:?} for {} model(s) across {} stores",
            self.interval,
            self.wanted.len(),
            self.directory.len()
        );

        while !*shutdown.borrow() {
            let outcome = self.run_cycle().await;
            log::debug!("Cycle finished: {:?}", outcome);

            if !wait_for_next_poll(self.interval, &mut shutdown).await {
                break;
            }
        }

        log::info!("Polling stopped");
    }
}

/// Sleep for `interval`. Returns false if shutdown was requested meanwhile.
async fn wait_for_next_poll(interval: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return false;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;

//! Stock Checker - store inventory polling with deduplicated push alerts
//!
//! Polls an inventory feed for wanted product codes across every store in a
//! store directory and pushes a notification the first time a store shows
//! stock within the dedup window.

pub mod batcher;
pub mod config;
pub mod dedup_cache;
pub mod feed;
pub mod notifier;
pub mod poller;
pub mod stock_diff;

pub use batcher::batch_messages;
pub use config::Config;
pub use dedup_cache::{spawn_sweeper, DedupCache};
pub use feed::FeedClient;
pub use notifier::{Delivery, Notifier, Priority};
pub use poller::{CycleOutcome, StockChecker};
pub use stock_diff::{diff_snapshot, StockDiff};

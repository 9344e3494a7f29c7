//! Stock diff engine: snapshot + directory + wanted list -> new stock events

use crate::dedup_cache::DedupCache;
use std::collections::BTreeSet;
use stock_common::{InventorySnapshot, ModelCatalog, StockEvent, StoreDirectory};

/// Outcome of diffing one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDiff {
    /// New in-stock (store, product) pairs, in feed store order then wanted order
    pub events: Vec<StockEvent>,
    /// Wanted codes missing from at least one recognised store's listing
    pub unfound: BTreeSet<String>,
}

/// Availability text counts as in stock only when it is "all" (any case)
pub fn is_in_stock(availability: &str) -> bool {
    availability.eq_ignore_ascii_case("all")
}

/// Diff a snapshot against the dedup cache.
///
/// Store codes missing from the directory (warehouses, online-only codes) are
/// skipped. A wanted code absent from any recognised store's listing lands in
/// `unfound`. Every in-stock pair the cache has not seen within its window
/// becomes an event and is marked in the cache.
pub fn diff_snapshot(
    directory: &StoreDirectory,
    snapshot: &InventorySnapshot,
    wanted: &[String],
    catalog: &ModelCatalog,
    cache: &DedupCache,
) -> StockDiff {
    let mut result = StockDiff::default();

    for (store_code, stock) in snapshot.stores() {
        let Some(store_name) = directory.name(store_code) else {
            continue;
        };

        for product_code in wanted {
            match stock.get(product_code) {
                None => {
                    result.unfound.insert(product_code.clone());
                }
                Some(availability) if is_in_stock(availability) => {
                    if cache.should_notify(&DedupCache::key(store_code, product_code)) {
                        let display_name = catalog
                            .display_name(product_code)
                            .unwrap_or(product_code.as_str())
                            .to_string();
                        result.events.push(StockEvent {
                            store_name: store_name.to_string(),
                            product_code: product_code.clone(),
                            display_name,
                        });
                    } else {
                        log::debug!(
                            "Already notified {} at {}, suppressing",
                            product_code,
                            store_name
                        );
                    }
                }
                Some(_) => {}
            }
        }
    }

    result
}

#[cfg(test)]
#[path = "stock_diff_tests.rs"]
mod tests;

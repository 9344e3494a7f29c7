//! Feed documents and the values derived from them

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// One entry of the store directory feed. Unknown fields are ignored.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub store_number: String,
    pub store_name: String,
}

/// Store directory feed file structure
#[derive(Debug, Deserialize)]
pub struct StoresFeed {
    pub stores: Vec<StoreRecord>,
}

/// Store code -> store name lookup, built once before the first poll
#[derive(Debug, Clone, Default)]
pub struct StoreDirectory {
    names: HashMap<String, String>,
}

impl StoreDirectory {
    /// Flatten the directory feed. Duplicate store numbers: last one wins.
    pub fn from_feed(feed: StoresFeed) -> Self {
        let names = feed
            .stores
            .into_iter()
            .map(|s| (s.store_number, s.store_name))
            .collect();
        Self { names }
    }

    /// Look up the display name of a store
    pub fn name(&self, store_code: &str) -> Option<&str> {
        self.names.get(store_code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StoreDirectory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let names = iter
            .into_iter()
            .map(|(code, name)| (code.into(), name.into()))
            .collect();
        Self { names }
    }
}

/// One full read of the inventory feed.
///
/// The feed is an object keyed by store code, each value an object keyed by
/// product code with free-text availability. Top-level values that are not
/// objects (e.g. an `updated` timestamp) are dropped. A `null` availability
/// counts as the product not being listed; other non-string values are kept
/// as their JSON text so the product still counts as listed.
/// Stores keep the document order of the feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct InventorySnapshot {
    stores: Vec<(String, HashMap<String, String>)>,
}

impl InventorySnapshot {
    /// Iterate stores in feed order
    pub fn stores(&self) -> impl Iterator<Item = (&str, &HashMap<String, String>)> {
        self.stores
            .iter()
            .map(|(code, stock)| (code.as_str(), stock))
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl From<Map<String, Value>> for InventorySnapshot {
    fn from(doc: Map<String, Value>) -> Self {
        let stores = doc
            .into_iter()
            .filter_map(|(store_code, listing)| match listing {
                Value::Object(products) => {
                    let stock = products
                        .into_iter()
                        .filter_map(|(product, availability)| {
                            let text = match availability {
                                Value::Null => return None,
                                Value::String(s) => s,
                                other => other.to_string(),
                            };
                            Some((product, text))
                        })
                        .collect();
                    Some((store_code, stock))
                }
                _ => {
                    log::debug!("Skipping non-store feed entry: {}", store_code);
                    None
                }
            })
            .collect();
        Self { stores }
    }
}

/// A store that has stock of a wanted product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockEvent {
    pub store_name: String,
    pub product_code: String,
    pub display_name: String,
}

impl fmt::Display for StockEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has stock of {}", self.store_name, self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing<'a>(snapshot: &'a InventorySnapshot, store_code: &str) -> &'a HashMap<String, String> {
        snapshot
            .stores()
            .find(|(code, _)| *code == store_code)
            .map(|(_, stock)| stock)
            .unwrap()
    }

    #[test]
    fn store_directory_flattens_feed_last_write_wins() {
        let feed: StoresFeed = serde_json::from_value(json!({
            "stores": [
                { "storeNumber": "R001", "storeName": "Covent Garden", "storeCity": "London" },
                { "storeNumber": "R002", "storeName": "Regent Street" },
                { "storeNumber": "R001", "storeName": "Covent Garden (new)" }
            ]
        }))
        .unwrap();

        let directory = StoreDirectory::from_feed(feed);
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.name("R001"), Some("Covent Garden (new)"));
        assert_eq!(directory.name("R002"), Some("Regent Street"));
        assert_eq!(directory.name("R999"), None);
    }

    #[test]
    fn snapshot_keeps_feed_order_and_drops_non_objects() {
        let snapshot: InventorySnapshot = serde_json::from_value(json!({
            "updated": 1474000000,
            "R300": { "MN4V2B/A": "ALL" },
            "R100": { "MN4V2B/A": "NONE" },
            "R200": {}
        }))
        .unwrap();

        let codes: Vec<&str> = snapshot.stores().map(|(code, _)| code).collect();
        assert_eq!(codes, vec!["R300", "R100", "R200"]);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            listing(&snapshot, "R300").get("MN4V2B/A").map(String::as_str),
            Some("ALL")
        );
        assert!(snapshot.stores().all(|(code, _)| code != "updated"));
    }

    #[test]
    fn snapshot_drops_null_availability_and_keeps_other_values_as_text() {
        let snapshot: InventorySnapshot = serde_json::from_value(json!({
            "R001": { "MN4V2B/A": true, "MN4W2B/A": null }
        }))
        .unwrap();

        let stock = listing(&snapshot, "R001");
        assert_eq!(stock.get("MN4V2B/A").map(String::as_str), Some("true"));
        assert!(!stock.contains_key("MN4W2B/A"));
    }

    #[test]
    fn stock_event_renders_display_text() {
        let event = StockEvent {
            store_name: "Covent Garden".to_string(),
            product_code: "MN4V2B/A".to_string(),
            display_name: "iPhone 7 Plus 128GB Jet Black".to_string(),
        };
        assert_eq!(
            event.to_string(),
            "Covent Garden has stock of iPhone 7 Plus 128GB Jet Black"
        );
    }
}

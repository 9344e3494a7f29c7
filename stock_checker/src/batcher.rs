//! Notification batching

use stock_common::StockEvent;

/// Maximum number of stock lines in one push message
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// Split events into messages of at most `max_batch_size` lines each.
/// Chunking is purely positional; no events means no messages.
pub fn batch_messages(events: &[StockEvent], max_batch_size: usize) -> Vec<String> {
    let size = max_batch_size.max(1);
    events
        .chunks(size)
        .map(|chunk| {
            chunk
                .iter()
                .map(|event| event.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(count: usize) -> Vec<StockEvent> {
        (0..count)
            .map(|i| StockEvent {
                store_name: format!("Store {}", i),
                product_code: "MN4V2B/A".to_string(),
                display_name: "iPhone 7 Plus 128GB Jet Black".to_string(),
            })
            .collect()
    }

    #[test]
    fn splits_into_ceiling_division_chunks() {
        let messages = batch_messages(&events(120), DEFAULT_MAX_BATCH_SIZE);
        let sizes: Vec<usize> = messages.iter().map(|m| m.lines().count()).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
    }

    #[test]
    fn no_events_gives_no_messages() {
        assert!(batch_messages(&[], DEFAULT_MAX_BATCH_SIZE).is_empty());
    }

    #[test]
    fn chunk_lines_are_newline_joined_in_order() {
        let messages = batch_messages(&events(3), 2);
        assert_eq!(
            messages,
            vec![
                "Store 0 has stock of iPhone 7 Plus 128GB Jet Black\nStore 1 has stock of iPhone 7 Plus 128GB Jet Black",
                "Store 2 has stock of iPhone 7 Plus 128GB Jet Black",
            ]
        );
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_batch() {
        assert_eq!(batch_messages(&events(100), 50).len(), 2);
    }
}

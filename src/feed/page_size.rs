//! Page-size negotiation between the client cap and the backend maximum

/// Items still allowed under `top`, or `None` when uncapped
pub fn remaining_under_top(top: Option<u64>, total_fetched: u64) -> Option<u64> {
    top.map(|top| top.saturating_sub(total_fetched))
}

/// Page size for the next request
///
/// Returns `None` when the cap is already used up, so callers never build a
/// request for zero (or a negative number of) items.
pub fn next_page_size(max_item_count: u32, top: Option<u64>, total_fetched: u64) -> Option<u32> {
    match remaining_under_top(top, total_fetched) {
        None => Some(max_item_count),
        Some(0) => None,
        Some(remaining) => Some(remaining.min(u64::from(max_item_count)) as u32),
    }
}

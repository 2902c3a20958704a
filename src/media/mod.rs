//! Canonical media entities for Arrlink.
//!
//! Each backend returns its own JSON shape; the constructors here
//! normalize records into stable in-memory entities with defaulted
//! optional fields. The original payload is retained on each entity so
//! filters can inspect nested data (cast credits and the like) without
//! the normalizer modeling every shape.

mod movie;
mod queue;
mod series;

pub use movie::Movie;
pub use queue::QueueItem;
pub use series::{Episode, Series, Statistics};

use serde_json::Value;

/// Maximum overview length in list and search responses.
pub const OVERVIEW_LIMIT: usize = 200;

/// Truncate an overview for list views; detail views keep the full text.
pub fn truncate_overview(text: &str) -> String {
    if text.chars().count() > OVERVIEW_LIMIT {
        let cut: String = text.chars().take(OVERVIEW_LIMIT).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

pub(crate) fn get_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn get_opt_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

pub(crate) fn get_bool(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn get_i64(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

pub(crate) fn get_opt_i64(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

pub(crate) fn get_str_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn get_i64_list(value: &Value, key: &str) -> Vec<i64> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_overview_short_text_untouched() {
        assert_eq!(truncate_overview("short"), "short");
    }

    #[test]
    fn test_truncate_overview_long_text() {
        let long = "x".repeat(250);
        let truncated = truncate_overview(&long);
        assert_eq!(truncated.len(), OVERVIEW_LIMIT + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_overview_exact_limit() {
        let exact = "y".repeat(OVERVIEW_LIMIT);
        assert_eq!(truncate_overview(&exact), exact);
    }
}

//! Download queue item normalization.

use super::{get_i64, get_str};
use serde_json::Value;

/// An entry in a backend's download queue.
#[derive(Debug, Clone)]
pub struct QueueItem {
    pub title: String,
    pub status: String,
    pub size: i64,
    pub size_left: i64,
}

impl QueueItem {
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: get_str(value, "title"),
            status: get_str(value, "status"),
            size: get_i64(value, "size"),
            // Radarr/Sonarr report this field in lowercase.
            size_left: get_i64(value, "sizeleft"),
        }
    }

    /// Download progress as a percentage. None when the size is unknown.
    pub fn progress(&self) -> Option<f64> {
        if self.size > 0 {
            Some((self.size - self.size_left) as f64 / self.size as f64 * 100.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_progress() {
        let item = QueueItem::from_value(&json!({
            "title": "Some.Release.1080p",
            "status": "downloading",
            "size": 100,
            "sizeleft": 25
        }));
        assert_eq!(item.progress(), Some(75.0));
    }

    #[test]
    fn test_progress_zero_size() {
        let item = QueueItem::from_value(&json!({"title": "Unknown", "size": 0}));
        assert_eq!(item.progress(), None);
    }

    #[test]
    fn test_defaults() {
        let item = QueueItem::from_value(&json!({}));
        assert_eq!(item.title, "");
        assert_eq!(item.status, "");
        assert_eq!(item.size, 0);
        assert_eq!(item.progress(), None);
    }
}

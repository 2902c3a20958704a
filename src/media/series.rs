//! Series, statistics, and episode entity normalization.

use super::{get_bool, get_i64, get_i64_list, get_opt_i64, get_opt_str, get_str, get_str_list};
use serde_json::Value;

/// Aggregate episode statistics for a series. All counts default to 0.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub episode_file_count: i64,
    pub episode_count: i64,
    pub total_episode_count: i64,
    pub size_on_disk: i64,
}

impl Statistics {
    pub fn from_value(value: &Value) -> Self {
        Self {
            episode_file_count: get_i64(value, "episodeFileCount"),
            episode_count: get_i64(value, "episodeCount"),
            total_episode_count: get_i64(value, "totalEpisodeCount"),
            size_on_disk: get_i64(value, "sizeOnDisk"),
        }
    }
}

/// A TV series record normalized from the Sonarr API shape.
#[derive(Debug, Clone)]
pub struct Series {
    pub id: i64,
    pub title: String,
    pub year: i64,
    pub overview: String,
    pub status: String,
    pub network: String,
    pub monitored: bool,
    pub tags: Vec<i64>,
    pub genres: Vec<String>,
    pub statistics: Option<Statistics>,
    /// Original payload, kept for filter predicates on nested data.
    pub raw: Value,
}

impl Series {
    /// Normalize a raw Sonarr record. Missing optional fields default.
    pub fn from_value(value: &Value) -> Self {
        let statistics = value.get("statistics").map(Statistics::from_value);
        Self {
            id: get_i64(value, "id"),
            title: get_str(value, "title"),
            year: get_i64(value, "year"),
            overview: get_str(value, "overview"),
            status: get_str(value, "status"),
            network: get_str(value, "network"),
            monitored: get_bool(value, "monitored"),
            tags: get_i64_list(value, "tags"),
            genres: get_str_list(value, "genres"),
            statistics,
            raw: value.clone(),
        }
    }

    /// Episode file count, zero when statistics are absent.
    pub fn episode_file_count(&self) -> i64 {
        self.statistics
            .as_ref()
            .map(|s| s.episode_file_count)
            .unwrap_or(0)
    }

    /// Episode count, zero when statistics are absent.
    pub fn episode_count(&self) -> i64 {
        self.statistics
            .as_ref()
            .map(|s| s.episode_count)
            .unwrap_or(0)
    }

    /// Names from the retained cast list, if the payload carries one.
    pub fn cast_names(&self) -> Option<Vec<String>> {
        let cast = self.raw.get("credits")?.get("cast")?.as_array()?;
        Some(
            cast.iter()
                .filter_map(|member| member.get("name").and_then(Value::as_str))
                .map(|name| name.to_string())
                .collect(),
        )
    }
}

/// A single episode record.
#[derive(Debug, Clone)]
pub struct Episode {
    pub id: i64,
    pub series_id: i64,
    pub episode_file_id: Option<i64>,
    pub season_number: i64,
    pub episode_number: i64,
    pub title: String,
    pub air_date: Option<String>,
    pub has_file: bool,
    pub monitored: bool,
    pub overview: String,
}

impl Episode {
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: get_i64(value, "id"),
            series_id: get_i64(value, "seriesId"),
            episode_file_id: get_opt_i64(value, "episodeFileId"),
            season_number: get_i64(value, "seasonNumber"),
            episode_number: get_i64(value, "episodeNumber"),
            title: get_str(value, "title"),
            air_date: get_opt_str(value, "airDate"),
            has_file: get_bool(value, "hasFile"),
            monitored: get_bool(value, "monitored"),
            overview: get_str(value, "overview"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statistics_default_to_zero() {
        let stats = Statistics::from_value(&json!({}));
        assert_eq!(stats.episode_file_count, 0);
        assert_eq!(stats.episode_count, 0);
        assert_eq!(stats.total_episode_count, 0);
        assert_eq!(stats.size_on_disk, 0);
    }

    #[test]
    fn test_series_without_statistics() {
        let series = Series::from_value(&json!({"id": 3, "title": "Dark"}));
        assert!(series.statistics.is_none());
        assert_eq!(series.episode_file_count(), 0);
        assert_eq!(series.episode_count(), 0);
    }

    #[test]
    fn test_series_full() {
        let series = Series::from_value(&json!({
            "id": 1,
            "title": "Severance",
            "year": 2022,
            "status": "continuing",
            "network": "Apple TV+",
            "monitored": true,
            "statistics": {
                "episodeFileCount": 9,
                "episodeCount": 9,
                "totalEpisodeCount": 19,
                "sizeOnDisk": 42000000
            }
        }));
        assert_eq!(series.network, "Apple TV+");
        assert_eq!(series.episode_file_count(), 9);
        assert_eq!(
            series.statistics.as_ref().unwrap().total_episode_count,
            19
        );
    }

    #[test]
    fn test_episode_defaults() {
        let ep = Episode::from_value(&json!({
            "id": 10,
            "seriesId": 1,
            "seasonNumber": 2,
            "episodeNumber": 5
        }));
        assert_eq!(ep.season_number, 2);
        assert_eq!(ep.episode_number, 5);
        assert!(ep.episode_file_id.is_none());
        assert!(ep.air_date.is_none());
        assert!(!ep.has_file);
        assert_eq!(ep.title, "");
    }
}

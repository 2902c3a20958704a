//! Query/filter engine for Arrlink.
//!
//! Predicates are independent and conjunctive. Every predicate is
//! optional: an absent argument filters nothing, which is why each
//! field is an `Option` rather than a defaulted bool. The watched
//! predicate is the one place filtering leaves memory: it consults the
//! watch resolver once per entity, concurrently, and joins the answers
//! back in backend order.

use crate::media::{Movie, Series};
use crate::watch::WatchResolver;
use futures::future::join_all;

/// Case-insensitive substring match against a cast list. Entities with
/// no cast data are excluded when the predicate is supplied.
fn cast_matches(names: Option<Vec<String>>, actor: &str) -> bool {
    let Some(names) = names else {
        return false;
    };
    let needle = actor.to_lowercase();
    names.iter().any(|name| name.to_lowercase().contains(&needle))
}

/// Caller-supplied predicates over a movie collection.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub year: Option<i64>,
    pub monitored: Option<bool>,
    pub downloaded: Option<bool>,
    pub watched: Option<bool>,
    pub actor: Option<String>,
}

impl MovieFilter {
    fn matches_pure(&self, movie: &Movie) -> bool {
        if let Some(year) = self.year {
            if movie.year != year {
                return false;
            }
        }
        if let Some(monitored) = self.monitored {
            if movie.monitored != monitored {
                return false;
            }
        }
        if let Some(downloaded) = self.downloaded {
            if movie.has_file != downloaded {
                return false;
            }
        }
        if let Some(actor) = &self.actor {
            if !cast_matches(movie.cast_names(), actor) {
                return false;
            }
        }
        true
    }

    /// Apply all predicates, preserving the input order.
    pub async fn apply(&self, movies: Vec<Movie>, resolver: &WatchResolver) -> Vec<Movie> {
        let passed: Vec<Movie> = movies
            .into_iter()
            .filter(|m| self.matches_pure(m))
            .collect();

        let Some(want_watched) = self.watched else {
            return passed;
        };

        let verdicts = join_all(passed.iter().map(|m| resolver.is_movie_watched(m))).await;
        passed
            .into_iter()
            .zip(verdicts)
            .filter(|(_, watched)| *watched == want_watched)
            .map(|(movie, _)| movie)
            .collect()
    }
}

/// Caller-supplied predicates over a series collection.
#[derive(Debug, Clone, Default)]
pub struct SeriesFilter {
    pub year: Option<i64>,
    pub monitored: Option<bool>,
    pub downloaded: Option<bool>,
    pub watched: Option<bool>,
    pub actor: Option<String>,
}

impl SeriesFilter {
    fn matches_pure(&self, series: &Series) -> bool {
        if let Some(year) = self.year {
            if series.year != year {
                return false;
            }
        }
        if let Some(monitored) = self.monitored {
            if series.monitored != monitored {
                return false;
            }
        }
        if let Some(downloaded) = self.downloaded {
            if (series.episode_file_count() > 0) != downloaded {
                return false;
            }
        }
        if let Some(actor) = &self.actor {
            if !cast_matches(series.cast_names(), actor) {
                return false;
            }
        }
        true
    }

    /// Apply all predicates, preserving the input order.
    pub async fn apply(&self, series: Vec<Series>, resolver: &WatchResolver) -> Vec<Series> {
        let passed: Vec<Series> = series
            .into_iter()
            .filter(|s| self.matches_pure(s))
            .collect();

        let Some(want_watched) = self.watched else {
            return passed;
        };

        let verdicts = join_all(passed.iter().map(|s| resolver.is_series_watched(s))).await;
        passed
            .into_iter()
            .zip(verdicts)
            .filter(|(_, watched)| *watched == want_watched)
            .map(|(series, _)| series)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::watch::WatchProvider;
    use async_trait::async_trait;
    use serde_json::json;

    fn movies() -> Vec<Movie> {
        vec![
            Movie::from_value(&json!({
                "id": 1, "title": "Heat", "year": 1995, "hasFile": true,
                "monitored": true,
                "credits": {"cast": [{"name": "Al Pacino"}, {"name": "Robert De Niro"}]}
            })),
            Movie::from_value(&json!({
                "id": 2, "title": "The Matrix", "year": 1999, "hasFile": false,
                "monitored": true,
                "credits": {"cast": [{"name": "Keanu Reeves"}]}
            })),
            Movie::from_value(&json!({
                "id": 3, "title": "Unknown Cast", "year": 1999, "hasFile": true,
                "monitored": false
            })),
        ]
    }

    #[tokio::test]
    async fn test_absent_predicates_filter_nothing() {
        let resolver = WatchResolver::new(vec![]);
        let result = MovieFilter::default().apply(movies(), &resolver).await;
        assert_eq!(result.len(), 3);
        // Backend order preserved.
        assert_eq!(result[0].id, 1);
        assert_eq!(result[2].id, 3);
    }

    #[tokio::test]
    async fn test_predicates_are_conjunctive() {
        let resolver = WatchResolver::new(vec![]);
        let filter = MovieFilter {
            year: Some(1999),
            downloaded: Some(true),
            ..MovieFilter::default()
        };
        let result = filter.apply(movies(), &resolver).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 3);
    }

    #[tokio::test]
    async fn test_actor_match_is_case_insensitive_substring() {
        let resolver = WatchResolver::new(vec![]);
        let filter = MovieFilter {
            actor: Some("de niro".to_string()),
            ..MovieFilter::default()
        };
        let result = filter.apply(movies(), &resolver).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Heat");
    }

    #[tokio::test]
    async fn test_actor_predicate_excludes_missing_cast() {
        let resolver = WatchResolver::new(vec![]);
        let filter = MovieFilter {
            actor: Some("anyone".to_string()),
            ..MovieFilter::default()
        };
        let result = filter.apply(movies(), &resolver).await;
        // Movie 3 has no cast data and is excluded, not matched.
        assert!(result.is_empty());
    }

    /// Provider that marks a fixed set of titles watched.
    struct TitleSetProvider(Vec<String>);

    #[async_trait]
    impl WatchProvider for TitleSetProvider {
        fn name(&self) -> &str {
            "fixture"
        }

        async fn is_movie_watched(&self, title: &str) -> Result<bool> {
            Ok(self.0.iter().any(|t| t == title))
        }

        async fn is_series_watched(&self, title: &str) -> Result<bool> {
            Ok(self.0.iter().any(|t| t == title))
        }
    }

    #[tokio::test]
    async fn test_watched_predicate_preserves_order() {
        let resolver = WatchResolver::new(vec![Box::new(TitleSetProvider(vec![
            "Heat".to_string(),
            "Unknown Cast".to_string(),
        ]))]);
        let filter = MovieFilter {
            watched: Some(true),
            ..MovieFilter::default()
        };
        let result = filter.apply(movies(), &resolver).await;
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "Heat");
        assert_eq!(result[1].title, "Unknown Cast");
    }

    #[tokio::test]
    async fn test_unwatched_predicate() {
        let resolver =
            WatchResolver::new(vec![Box::new(TitleSetProvider(vec!["Heat".to_string()]))]);
        let filter = MovieFilter {
            watched: Some(false),
            ..MovieFilter::default()
        };
        let result = filter.apply(movies(), &resolver).await;
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "The Matrix");
    }

    #[tokio::test]
    async fn test_series_downloaded_uses_file_count() {
        let resolver = WatchResolver::new(vec![]);
        let series = vec![
            Series::from_value(&json!({
                "id": 1, "title": "Downloaded",
                "statistics": {"episodeFileCount": 4, "episodeCount": 8}
            })),
            Series::from_value(&json!({"id": 2, "title": "Empty"})),
        ];
        let filter = SeriesFilter {
            downloaded: Some(true),
            ..SeriesFilter::default()
        };
        let result = filter.apply(series, &resolver).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Downloaded");
    }
}

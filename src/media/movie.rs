//! Movie entity normalization.

use super::{get_bool, get_i64, get_i64_list, get_str, get_str_list};
use serde_json::Value;

/// A movie record normalized from the Radarr API shape.
#[derive(Debug, Clone)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i64,
    pub overview: String,
    pub has_file: bool,
    pub status: String,
    pub monitored: bool,
    pub tags: Vec<i64>,
    pub genres: Vec<String>,
    /// Original payload, kept for filter predicates on nested data.
    pub raw: Value,
}

impl Movie {
    /// Normalize a raw Radarr record. Missing optional fields default.
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: get_i64(value, "id"),
            title: get_str(value, "title"),
            year: get_i64(value, "year"),
            overview: get_str(value, "overview"),
            has_file: get_bool(value, "hasFile"),
            status: get_str(value, "status"),
            monitored: get_bool(value, "monitored"),
            tags: get_i64_list(value, "tags"),
            genres: get_str_list(value, "genres"),
            raw: value.clone(),
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_defaults() {
        let movie = Movie::from_value(&json!({"id": 7, "title": "Heat"}));
        assert_eq!(movie.id, 7);
        assert_eq!(movie.title, "Heat");
        assert_eq!(movie.year, 0);
        assert!(!movie.has_file);
        assert!(!movie.monitored);
        assert!(movie.genres.is_empty());
        assert_eq!(movie.overview, "");
    }

    #[test]
    fn test_from_value_full() {
        let movie = Movie::from_value(&json!({
            "id": 1,
            "title": "The Matrix",
            "year": 1999,
            "overview": "A hacker learns the truth.",
            "hasFile": true,
            "status": "released",
            "monitored": true,
            "tags": [1, 2],
            "genres": ["Action", "Sci-Fi"]
        }));
        assert_eq!(movie.year, 1999);
        assert!(movie.has_file);
        assert_eq!(movie.genres, vec!["Action", "Sci-Fi"]);
        assert_eq!(movie.tags, vec![1, 2]);
    }

    #[test]
    fn test_cast_names() {
        let movie = Movie::from_value(&json!({
            "id": 1,
            "title": "Heat",
            "credits": {"cast": [
                {"name": "Al Pacino", "character": "Hanna"},
                {"name": "Robert De Niro", "character": "McCauley"}
            ]}
        }));
        let names = movie.cast_names().unwrap();
        assert_eq!(names, vec!["Al Pacino", "Robert De Niro"]);

        let bare = Movie::from_value(&json!({"id": 2, "title": "No Credits"}));
        assert!(bare.cast_names().is_none());
    }
}

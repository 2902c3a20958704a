//! MCP tool definitions for Arrlink.
//!
//! Tool names and argument schemas are a compatibility surface for
//! existing callers; changing them breaks deployed assistants.

use super::protocol::Tool;
use serde_json::{json, Value};

fn tool(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn service_property(allowed: &[&str]) -> Value {
    json!({
        "type": "string",
        "description": "Which service to query",
        "enum": allowed
    })
}

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    let mut tools = library_tools();
    tools.extend(mutation_tools());
    tools.extend(download_tools());
    tools.extend(calendar_tools());
    tools.extend(system_tools());
    tools
}

fn library_tools() -> Vec<Tool> {
    vec![
        tool(
            "get_radarr_movies",
            "Get list of movies from Radarr",
            json!({
                "type": "object",
                "properties": {
                    "monitored": {
                        "type": "boolean",
                        "description": "Filter by monitored status"
                    },
                    "downloaded": {
                        "type": "boolean",
                        "description": "Filter by downloaded status"
                    }
                },
                "additionalProperties": false
            }),
        ),
        tool(
            "get_sonarr_series",
            "Get list of TV series from Sonarr",
            json!({
                "type": "object",
                "properties": {
                    "monitored": {
                        "type": "boolean",
                        "description": "Filter by monitored status"
                    },
                    "downloaded": {
                        "type": "boolean",
                        "description": "Filter by downloaded status"
                    }
                },
                "additionalProperties": false
            }),
        ),
        tool(
            "get_available_movies",
            "Get movies filtered by year, download state, watched status, or cast",
            json!({
                "type": "object",
                "properties": {
                    "year": {
                        "type": "integer",
                        "description": "Filter by release year"
                    },
                    "downloaded": {
                        "type": "boolean",
                        "description": "Filter by downloaded status"
                    },
                    "watched": {
                        "type": "boolean",
                        "description": "Filter by watched status (requires a watch provider)"
                    },
                    "actors": {
                        "type": "string",
                        "description": "Filter by actor name (substring match)"
                    }
                },
                "additionalProperties": false
            }),
        ),
        tool(
            "get_available_series",
            "Get TV series filtered by year, download state, watched status, or cast",
            json!({
                "type": "object",
                "properties": {
                    "year": {
                        "type": "integer",
                        "description": "Filter by first-air year"
                    },
                    "downloaded": {
                        "type": "boolean",
                        "description": "Filter by downloaded status"
                    },
                    "watched": {
                        "type": "boolean",
                        "description": "Filter by watched status (requires a watch provider)"
                    },
                    "actors": {
                        "type": "string",
                        "description": "Filter by actor name (substring match)"
                    }
                },
                "additionalProperties": false
            }),
        ),
        tool(
            "search_radarr_movies",
            "Search for movies in Radarr",
            json!({
                "type": "object",
                "properties": {
                    "term": {
                        "type": "string",
                        "description": "Search term for movie title"
                    }
                },
                "required": ["term"],
                "additionalProperties": false
            }),
        ),
        tool(
            "search_sonarr_series",
            "Search for TV series in Sonarr",
            json!({
                "type": "object",
                "properties": {
                    "term": {
                        "type": "string",
                        "description": "Search term for series title"
                    }
                },
                "required": ["term"],
                "additionalProperties": false
            }),
        ),
        tool(
            "get_radarr_movie_by_id",
            "Get detailed information for a single movie",
            json!({
                "type": "object",
                "properties": {
                    "movieId": {
                        "type": "integer",
                        "description": "Radarr movie ID"
                    }
                },
                "required": ["movieId"],
                "additionalProperties": false
            }),
        ),
        tool(
            "get_sonarr_series_by_id",
            "Get detailed information for a single TV series",
            json!({
                "type": "object",
                "properties": {
                    "seriesId": {
                        "type": "integer",
                        "description": "Sonarr series ID"
                    }
                },
                "required": ["seriesId"],
                "additionalProperties": false
            }),
        ),
        tool(
            "get_sonarr_episodes",
            "List episodes for a TV series",
            json!({
                "type": "object",
                "properties": {
                    "seriesId": {
                        "type": "integer",
                        "description": "Sonarr series ID"
                    }
                },
                "required": ["seriesId"],
                "additionalProperties": false
            }),
        ),
    ]
}

fn mutation_tools() -> Vec<Tool> {
    vec![
        tool(
            "add_radarr_movie",
            "Add a movie to Radarr library and request download",
            json!({
                "type": "object",
                "properties": {
                    "tmdbId": {
                        "type": "integer",
                        "description": "TMDB ID of the movie to add"
                    },
                    "title": {
                        "type": "string",
                        "description": "Movie title"
                    },
                    "year": {
                        "type": "integer",
                        "description": "Release year"
                    },
                    "qualityProfileId": {
                        "type": "integer",
                        "description": "Quality profile ID (optional, uses default if not provided)",
                        "default": 1
                    },
                    "rootFolderPath": {
                        "type": "string",
                        "description": "Root folder path (optional, uses default if not provided)"
                    },
                    "monitored": {
                        "type": "boolean",
                        "description": "Whether to monitor the movie",
                        "default": true
                    },
                    "searchForMovie": {
                        "type": "boolean",
                        "description": "Whether to search for the movie immediately",
                        "default": true
                    }
                },
                "required": ["tmdbId", "title", "year"],
                "additionalProperties": false
            }),
        ),
        tool(
            "add_sonarr_series",
            "Add a TV series to Sonarr library and request download",
            json!({
                "type": "object",
                "properties": {
                    "tvdbId": {
                        "type": "integer",
                        "description": "TVDB ID of the series to add"
                    },
                    "title": {
                        "type": "string",
                        "description": "Series title"
                    },
                    "year": {
                        "type": "integer",
                        "description": "First air year"
                    },
                    "qualityProfileId": {
                        "type": "integer",
                        "description": "Quality profile ID (optional, uses default if not provided)",
                        "default": 1
                    },
                    "rootFolderPath": {
                        "type": "string",
                        "description": "Root folder path (optional, uses default if not provided)"
                    },
                    "monitored": {
                        "type": "boolean",
                        "description": "Whether to monitor the series",
                        "default": true
                    },
                    "searchForMissingEpisodes": {
                        "type": "boolean",
                        "description": "Whether to search for missing episodes immediately",
                        "default": true
                    },
                    "seasonFolder": {
                        "type": "boolean",
                        "description": "Whether to use season folders",
                        "default": true
                    }
                },
                "required": ["tvdbId", "title", "year"],
                "additionalProperties": false
            }),
        ),
        tool(
            "update_radarr_movie",
            "Update fields on an existing movie without clobbering the rest",
            json!({
                "type": "object",
                "properties": {
                    "movieId": {
                        "type": "integer",
                        "description": "Radarr movie ID"
                    },
                    "monitored": {
                        "type": "boolean",
                        "description": "New monitored state"
                    },
                    "qualityProfileId": {
                        "type": "integer",
                        "description": "New quality profile ID"
                    }
                },
                "required": ["movieId"],
                "additionalProperties": false
            }),
        ),
        tool(
            "update_sonarr_series",
            "Update fields on an existing series without clobbering the rest",
            json!({
                "type": "object",
                "properties": {
                    "seriesId": {
                        "type": "integer",
                        "description": "Sonarr series ID"
                    },
                    "monitored": {
                        "type": "boolean",
                        "description": "New monitored state"
                    },
                    "qualityProfileId": {
                        "type": "integer",
                        "description": "New quality profile ID"
                    }
                },
                "required": ["seriesId"],
                "additionalProperties": false
            }),
        ),
        tool(
            "delete_radarr_movie",
            "Remove a movie from the Radarr library",
            json!({
                "type": "object",
                "properties": {
                    "movieId": {
                        "type": "integer",
                        "description": "Radarr movie ID"
                    },
                    "deleteFiles": {
                        "type": "boolean",
                        "description": "Also delete files on disk",
                        "default": false
                    },
                    "addImportExclusion": {
                        "type": "boolean",
                        "description": "Exclude from future import lists",
                        "default": false
                    }
                },
                "required": ["movieId"],
                "additionalProperties": false
            }),
        ),
        tool(
            "delete_sonarr_series",
            "Remove a TV series from the Sonarr library",
            json!({
                "type": "object",
                "properties": {
                    "seriesId": {
                        "type": "integer",
                        "description": "Sonarr series ID"
                    },
                    "deleteFiles": {
                        "type": "boolean",
                        "description": "Also delete files on disk",
                        "default": false
                    }
                },
                "required": ["seriesId"],
                "additionalProperties": false
            }),
        ),
    ]
}

fn download_tools() -> Vec<Tool> {
    vec![
        tool(
            "get_download_queue",
            "Get current download queue for Radarr and Sonarr",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr", "both"]),
                    "includeUnknownItems": {
                        "type": "boolean",
                        "description": "Include items with unknown series/movie",
                        "default": false
                    }
                },
                "required": ["service"],
                "additionalProperties": false
            }),
        ),
        tool(
            "remove_from_queue",
            "Remove an item from the download queue",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr"]),
                    "id": {
                        "type": "integer",
                        "description": "Queue item ID to remove"
                    },
                    "removeFromClient": {
                        "type": "boolean",
                        "description": "Remove from download client",
                        "default": true
                    },
                    "blocklist": {
                        "type": "boolean",
                        "description": "Add to blocklist to prevent re-download",
                        "default": false
                    }
                },
                "required": ["service", "id"],
                "additionalProperties": false
            }),
        ),
        tool(
            "get_history",
            "Get download/import history",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr"]),
                    "pageSize": {
                        "type": "integer",
                        "description": "Number of items per page",
                        "default": 50
                    },
                    "page": {
                        "type": "integer",
                        "description": "Page number",
                        "default": 1
                    },
                    "eventType": {
                        "type": "string",
                        "description": "Filter by event type",
                        "enum": ["grabbed", "downloadFolderImported", "downloadFailed", "deleted", "renamed"]
                    }
                },
                "required": ["service"],
                "additionalProperties": false
            }),
        ),
        tool(
            "manual_import",
            "Manually import downloaded files",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr"]),
                    "path": {
                        "type": "string",
                        "description": "Path to scan for importable files"
                    },
                    "movieId": {
                        "type": "integer",
                        "description": "Movie ID (for Radarr)"
                    },
                    "seriesId": {
                        "type": "integer",
                        "description": "Series ID (for Sonarr)"
                    }
                },
                "required": ["service", "path"],
                "additionalProperties": false
            }),
        ),
    ]
}

fn calendar_tools() -> Vec<Tool> {
    vec![
        tool(
            "get_radarr_calendar",
            "Get upcoming movie releases",
            json!({
                "type": "object",
                "properties": {
                    "start": {
                        "type": "string",
                        "description": "Start date (ISO format)"
                    },
                    "end": {
                        "type": "string",
                        "description": "End date (ISO format)"
                    },
                    "unmonitored": {
                        "type": "boolean",
                        "description": "Include unmonitored movies",
                        "default": false
                    }
                },
                "additionalProperties": false
            }),
        ),
        tool(
            "get_sonarr_calendar",
            "Get upcoming episode releases",
            json!({
                "type": "object",
                "properties": {
                    "start": {
                        "type": "string",
                        "description": "Start date (ISO format)"
                    },
                    "end": {
                        "type": "string",
                        "description": "End date (ISO format)"
                    },
                    "unmonitored": {
                        "type": "boolean",
                        "description": "Include unmonitored episodes",
                        "default": false
                    }
                },
                "additionalProperties": false
            }),
        ),
        tool(
            "get_wanted_missing",
            "Get missing movies or episodes",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr"]),
                    "pageSize": {
                        "type": "integer",
                        "description": "Number of items per page",
                        "default": 50
                    },
                    "page": {
                        "type": "integer",
                        "description": "Page number",
                        "default": 1
                    },
                    "sortKey": {
                        "type": "string",
                        "description": "Sort by field",
                        "enum": ["title", "airDateUtc", "releaseDate", "year"]
                    },
                    "sortDir": {
                        "type": "string",
                        "description": "Sort direction",
                        "enum": ["asc", "desc"]
                    }
                },
                "required": ["service"],
                "additionalProperties": false
            }),
        ),
        tool(
            "get_wanted_cutoff",
            "Get items not meeting quality cutoff",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr"]),
                    "pageSize": {
                        "type": "integer",
                        "description": "Number of items per page",
                        "default": 50
                    },
                    "page": {
                        "type": "integer",
                        "description": "Page number",
                        "default": 1
                    }
                },
                "required": ["service"],
                "additionalProperties": false
            }),
        ),
    ]
}

fn system_tools() -> Vec<Tool> {
    vec![
        tool(
            "get_system_status",
            "Get system status and health checks",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr", "both"])
                },
                "required": ["service"],
                "additionalProperties": false
            }),
        ),
        tool(
            "get_disk_space",
            "Get disk space information",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr", "both"])
                },
                "required": ["service"],
                "additionalProperties": false
            }),
        ),
        tool(
            "execute_command",
            "Execute maintenance commands",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr"]),
                    "command": {
                        "type": "string",
                        "description": "Command to execute",
                        "enum": ["RefreshMovie", "RefreshSeries", "RescanMovie", "RescanSeries",
                                 "RssSync", "Backup", "MissingMoviesSearch", "MissingEpisodeSearch"]
                    },
                    "movieId": {
                        "type": "integer",
                        "description": "Movie ID (for movie-specific commands)"
                    },
                    "seriesId": {
                        "type": "integer",
                        "description": "Series ID (for series-specific commands)"
                    }
                },
                "required": ["service", "command"],
                "additionalProperties": false
            }),
        ),
        tool(
            "get_collections",
            "Get movie collections from Radarr",
            json!({
                "type": "object",
                "properties": {
                    "tmdbId": {
                        "type": "integer",
                        "description": "Filter by collection TMDB ID"
                    }
                },
                "additionalProperties": false
            }),
        ),
        tool(
            "refresh_monitored",
            "Force refresh of monitored items",
            json!({
                "type": "object",
                "properties": {
                    "service": service_property(&["radarr", "sonarr"])
                },
                "required": ["service"],
                "additionalProperties": false
            }),
        ),
    ]
}

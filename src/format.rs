//! Response formatting for Arrlink.
//!
//! Turns structured tool results into concise line-oriented text for the
//! MCP channel. Dispatch is by tool name; any shape without a known
//! category falls back to a pretty-printed structured dump.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Format a structured tool result into the final text block.
pub fn format_response(result: &Value, tool_name: &str) -> String {
    match tool_name {
        "get_radarr_movies" | "get_available_movies" => format_media_list(result, "movies"),
        "get_sonarr_series" | "get_available_series" => format_media_list(result, "series"),
        "search_radarr_movies" => format_search_results(result, "movies"),
        "search_sonarr_series" => format_search_results(result, "series"),
        "get_radarr_movie_by_id" => format_media_details(result, "movie"),
        "get_sonarr_series_by_id" => format_media_details(result, "series"),
        "get_sonarr_episodes" => format_episodes(result),
        "get_download_queue" => format_download_queue(result),
        "get_history" => format_history(result),
        "get_radarr_calendar" => format_calendar(result, "movies"),
        "get_sonarr_calendar" => format_calendar(result, "episodes"),
        "get_wanted_missing" => format_wanted(result, "missing"),
        "get_wanted_cutoff" => format_wanted(result, "cutoff unmet"),
        "get_system_status" => format_system_status(result),
        "get_disk_space" => format_disk_space(result),
        _ if result.get("success").is_some() => format_success_message(result),
        _ => fallback_dump(result),
    }
}

/// Parse an ISO-8601 date, with or without a time component, and render
/// it human-readable. Unparsable strings are emitted verbatim.
fn format_date(date_str: &str) -> String {
    if date_str.is_empty() || date_str == "TBA" {
        return "TBA".to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return dt.format("%B %d, %Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%B %d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return date.format("%B %d, %Y").to_string();
    }
    date_str.to_string()
}

fn str_of(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "Unknown".to_string(),
    }
}

fn int_of(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn items_of<'a>(value: &'a Value, key: &str) -> Vec<&'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|a| a.iter().collect())
        .unwrap_or_default()
}

fn fallback_dump(result: &Value) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string())
}

fn format_media_list(result: &Value, media_type: &str) -> String {
    let items = items_of(result, media_type);
    let count = result
        .get("count")
        .and_then(Value::as_i64)
        .unwrap_or(items.len() as i64);

    if items.is_empty() {
        return format!("No {} found.", media_type);
    }

    let mut lines = vec![format!("{} {}:", count, media_type)];
    for item in &items {
        let title = str_of(item, "title");
        let year = str_of(item, "year");
        let id = str_of(item, "id");
        if media_type == "series" {
            let files = int_of(item, "episodeFileCount");
            let total = int_of(item, "episodeCount");
            lines.push(format!("  [{}] {} ({}) - {}/{}", id, title, year, files, total));
        } else {
            let tmdb = str_of(item, "tmdbId");
            lines.push(format!("  [{}] {} ({}) - TMDB: {}", id, title, year, tmdb));
        }
    }

    if count > items.len() as i64 {
        lines.push(format!("  ... {} more", count - items.len() as i64));
    }

    lines.join("\n")
}

fn format_search_results(result: &Value, media_type: &str) -> String {
    let items = items_of(result, media_type);
    let count = result
        .get("count")
        .and_then(Value::as_i64)
        .unwrap_or(items.len() as i64);

    if items.is_empty() {
        return format!("No {} found in search.", media_type);
    }

    let mut lines = vec![format!("Found {} {} in search:", count, media_type)];
    for item in &items {
        let title = str_of(item, "title");
        let year = str_of(item, "year");
        let remote_id = item
            .get("tmdbId")
            .or_else(|| item.get("tvdbId"))
            .filter(|v| !v.is_null())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string());
        lines.push(format!("  {} ({}) - ID: {}", title, year, remote_id));
    }

    if count > items.len() as i64 {
        lines.push(format!("  ... {} more", count - items.len() as i64));
    }

    lines.join("\n")
}

fn format_media_details(result: &Value, media_type: &str) -> String {
    let Some(item) = result.get(media_type).filter(|v| !v.is_null()) else {
        return format!("No {} details found.", media_type);
    };

    let monitored = if item.get("monitored").and_then(Value::as_bool).unwrap_or(false) {
        "Yes"
    } else {
        "No"
    };
    let has_file = if item.get("hasFile").and_then(Value::as_bool).unwrap_or(false) {
        "Yes"
    } else {
        "No"
    };

    let mut lines = vec![
        format!("**{} ({})**", str_of(item, "title"), str_of(item, "year")),
        format!("Status: {}", str_of(item, "status")),
        format!("Monitored: {}", monitored),
        format!("Downloaded: {}", has_file),
    ];

    if media_type == "series" {
        lines.push(format!(
            "Episodes: {}/{}",
            int_of(item, "episodeFileCount"),
            int_of(item, "totalEpisodeCount")
        ));
        let network = str_of(item, "network");
        if network != "Unknown" && !network.is_empty() {
            lines.push(format!("Network: {}", network));
        }
    }

    // Detail views carry the full overview, untruncated.
    if let Some(overview) = item.get("overview").and_then(Value::as_str) {
        if !overview.is_empty() {
            lines.push(format!("Overview: {}", overview));
        }
    }

    lines.join("\n")
}

fn format_episodes(result: &Value) -> String {
    let episodes = items_of(result, "episodes");
    let count = result
        .get("count")
        .and_then(Value::as_i64)
        .unwrap_or(episodes.len() as i64);

    if episodes.is_empty() {
        return "No episodes found.".to_string();
    }

    let mut lines = vec![format!("Found {} episodes:", count)];
    for ep in &episodes {
        let has_file = if ep.get("hasFile").and_then(Value::as_bool).unwrap_or(false) {
            "Downloaded"
        } else {
            "Missing"
        };
        let monitored = if ep.get("monitored").and_then(Value::as_bool).unwrap_or(false) {
            "Monitored"
        } else {
            "Unmonitored"
        };
        let air_date = ep.get("airDate").and_then(Value::as_str).unwrap_or("");
        let date_str = if air_date.is_empty() {
            String::new()
        } else {
            format!(" ({})", air_date)
        };
        lines.push(format!(
            "  S{:02}E{:02}: {}{} - {}, {}",
            int_of(ep, "seasonNumber"),
            int_of(ep, "episodeNumber"),
            str_of(ep, "title"),
            date_str,
            has_file,
            monitored
        ));
    }

    lines.join("\n")
}

fn format_queue_section(lines: &mut Vec<String>, service: &str, section: &Value) {
    if let Some(error) = section.get("error").and_then(Value::as_str) {
        lines.push(format!("\n{}: unavailable ({})", service.to_uppercase(), error));
        return;
    }

    let items = items_of(section, "items");
    let count = section
        .get("count")
        .and_then(Value::as_i64)
        .unwrap_or(items.len() as i64);

    if items.is_empty() {
        lines.push(format!("\n{}: Empty", service.to_uppercase()));
        return;
    }

    lines.push(format!("\n{} ({} items):", service.to_uppercase(), count));
    for item in &items {
        let title = str_of(item, "title");
        let status = str_of(item, "status");
        let size = int_of(item, "size");
        let size_left = int_of(item, "sizeleft");
        let progress = if size > 0 {
            let pct = (size - size_left) as f64 / size as f64 * 100.0;
            format!(" ({:.1}%)", pct)
        } else {
            String::new()
        };
        lines.push(format!("  {} - {}{}", title, status, progress));
    }
}

fn format_download_queue(result: &Value) -> String {
    let Some(queues) = result.get("queues").and_then(Value::as_object) else {
        return "Download queue is empty.".to_string();
    };
    if queues.is_empty() {
        return "Download queue is empty.".to_string();
    }

    let mut lines = vec!["Download Queue:".to_string()];
    for (service, section) in queues {
        format_queue_section(&mut lines, service, section);
    }
    lines.join("\n")
}

fn format_history(result: &Value) -> String {
    let records = items_of(result, "records");
    let total = result
        .get("totalRecords")
        .and_then(Value::as_i64)
        .unwrap_or(records.len() as i64);
    let page = result.get("page").and_then(Value::as_i64).unwrap_or(1);

    if records.is_empty() {
        return "No history records found.".to_string();
    }

    let mut lines = vec![format!("History ({} records, page {}):", total, page)];
    for record in &records {
        let event = str_of(record, "eventType");
        let source = str_of(record, "sourceTitle");
        let date = record.get("date").and_then(Value::as_str).unwrap_or("");
        lines.push(format!("  [{}] {} - {}", event, source, format_date(date)));
    }

    lines.join("\n")
}

fn format_calendar(result: &Value, media_type: &str) -> String {
    let items = items_of(result, media_type);
    let count = result
        .get("count")
        .and_then(Value::as_i64)
        .unwrap_or(items.len() as i64);

    if items.is_empty() {
        return format!("No upcoming {} found.", media_type);
    }

    let mut lines = vec![format!("Upcoming {} ({}):", media_type, count)];
    for item in &items {
        if media_type == "movies" {
            let title = str_of(item, "title");
            let date = item
                .get("releaseDate")
                .or_else(|| item.get("inCinemas"))
                .and_then(Value::as_str)
                .unwrap_or("TBA");
            lines.push(format!("  {} - {}", title, format_date(date)));
        } else {
            let series_title = item
                .get("series")
                .map(|s| str_of(s, "title"))
                .filter(|t| t != "Unknown")
                .unwrap_or_else(|| format!("Series ID {}", str_of(item, "seriesId")));
            let air_date = item.get("airDate").and_then(Value::as_str).unwrap_or("TBA");
            lines.push(format!(
                "  {} S{:02}E{:02}: {} - {}",
                series_title,
                int_of(item, "seasonNumber"),
                int_of(item, "episodeNumber"),
                str_of(item, "title"),
                format_date(air_date)
            ));
        }
    }

    lines.join("\n")
}

fn format_wanted(result: &Value, wanted_type: &str) -> String {
    let records = items_of(result, "records");
    let total = result
        .get("totalRecords")
        .and_then(Value::as_i64)
        .unwrap_or(records.len() as i64);
    let page = result.get("page").and_then(Value::as_i64).unwrap_or(1);

    if records.is_empty() {
        return "No missing/wanted items found.".to_string();
    }

    let mut lines = vec![format!("Found {} {} items (page {}):", total, wanted_type, page)];
    for item in &records {
        if item.get("seriesId").is_some() {
            let series_title = item
                .get("series")
                .map(|s| str_of(s, "title"))
                .unwrap_or_else(|| "Unknown".to_string());
            lines.push(format!(
                "  {} S{:02}E{:02}: {}",
                series_title,
                int_of(item, "seasonNumber"),
                int_of(item, "episodeNumber"),
                str_of(item, "title")
            ));
        } else {
            lines.push(format!(
                "  {} ({})",
                str_of(item, "title"),
                str_of(item, "year")
            ));
        }
    }

    lines.join("\n")
}

fn format_system_status(result: &Value) -> String {
    let Some(status) = result.get("status").and_then(Value::as_object) else {
        return "No system status available.".to_string();
    };
    if status.is_empty() {
        return "No system status available.".to_string();
    }

    let mut lines = vec!["System Status:".to_string()];
    for (service, data) in status {
        if let Some(error) = data.get("error").and_then(Value::as_str) {
            lines.push(format!("\n{}: unavailable ({})", service.to_uppercase(), error));
            continue;
        }

        lines.push(format!("\n{}: v{}", service.to_uppercase(), str_of(data, "version")));

        let health = items_of(data, "health");
        if health.is_empty() {
            lines.push("  All systems healthy".to_string());
        } else {
            lines.push("  Health Issues:".to_string());
            for issue in &health {
                let level = if issue.get("type").and_then(Value::as_str) == Some("error") {
                    "ERROR"
                } else {
                    "WARNING"
                };
                lines.push(format!("    {}: {}", level, str_of(issue, "message")));
            }
        }
    }

    lines.join("\n")
}

fn format_disk_space(result: &Value) -> String {
    let Some(disk_data) = result.get("diskSpace").and_then(Value::as_object) else {
        return "No disk space information available.".to_string();
    };
    if disk_data.is_empty() {
        return "No disk space information available.".to_string();
    }

    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

    let mut lines = vec!["Disk Space:".to_string()];
    for (service, disks) in disk_data {
        if let Some(error) = disks.get("error").and_then(Value::as_str) {
            lines.push(format!("\n{}: unavailable ({})", service.to_uppercase(), error));
            continue;
        }

        lines.push(format!("\n{}:", service.to_uppercase()));
        for disk in disks.as_array().map(|a| a.iter().collect::<Vec<_>>()).unwrap_or_default() {
            let path = str_of(disk, "path");
            let free_gb = int_of(disk, "freeSpace") as f64 / GIB;
            let total_gb = int_of(disk, "totalSpace") as f64 / GIB;
            let used_pct = disk
                .get("percentUsed")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            lines.push(format!(
                "  {}: {:.1}GB free / {:.1}GB total ({:.1}% used)",
                path, free_gb, total_gb, used_pct
            ));
        }
    }

    lines.join("\n")
}

fn format_success_message(result: &Value) -> String {
    result
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Operation completed successfully")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_list_count_exceeds_displayed_items() {
        let result = json!({
            "count": 75,
            "movies": [
                {"id": 1, "title": "Heat", "year": 1995, "tmdbId": 949},
                {"id": 2, "title": "The Matrix", "year": 1999, "tmdbId": 603}
            ]
        });
        let text = format_response(&result, "get_radarr_movies");
        assert!(text.starts_with("75 movies:"));
        assert!(text.contains("[1] Heat (1995) - TMDB: 949"));
        assert!(text.contains("... 73 more"));
    }

    #[test]
    fn test_series_list_shows_episode_counts() {
        let result = json!({
            "count": 1,
            "series": [{"id": 4, "title": "Dark", "year": 2017,
                        "episodeFileCount": 18, "episodeCount": 26}]
        });
        let text = format_response(&result, "get_sonarr_series");
        assert!(text.contains("[4] Dark (2017) - 18/26"));
        assert!(!text.contains("more"));
    }

    #[test]
    fn test_wanted_missing_episode_numbers_zero_padded() {
        let result = json!({
            "page": 1,
            "pageSize": 2,
            "totalRecords": 5,
            "records": [
                {"seriesId": 1, "seasonNumber": 1, "episodeNumber": 3,
                 "title": "Pilot Part 3", "series": {"title": "Lost"}},
                {"seriesId": 1, "seasonNumber": 2, "episodeNumber": 11,
                 "title": "Fire", "series": {"title": "Lost"}}
            ]
        });
        let text = format_response(&result, "get_wanted_missing");
        assert!(text.starts_with("Found 5 missing items (page 1):"));
        assert!(text.contains("Lost S01E03: Pilot Part 3"));
        assert!(text.contains("Lost S02E11: Fire"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_queue_progress_and_partial_failure() {
        let result = json!({
            "queues": {
                "radarr": {"count": 1, "items": [
                    {"title": "Some.Movie", "status": "downloading", "size": 100, "sizeleft": 25}
                ]},
                "sonarr": {"error": "sonarr unreachable at 'queue': timed out"}
            }
        });
        let text = format_response(&result, "get_download_queue");
        assert!(text.contains("RADARR (1 items):"));
        assert!(text.contains("Some.Movie - downloading (75.0%)"));
        assert!(text.contains("SONARR: unavailable"));
    }

    #[test]
    fn test_queue_zero_size_omits_progress() {
        let result = json!({
            "queues": {"sonarr": {"count": 1, "items": [
                {"title": "Unknown.Release", "status": "queued", "size": 0, "sizeleft": 0}
            ]}}
        });
        let text = format_response(&result, "get_download_queue");
        assert!(text.contains("Unknown.Release - queued"));
        assert!(!text.contains('%'));
    }

    #[test]
    fn test_date_parsing_variants() {
        assert_eq!(format_date("2026-08-05"), "August 05, 2026");
        assert_eq!(format_date("2026-08-05T12:30:00Z"), "August 05, 2026");
        assert_eq!(format_date("2026-08-05T12:30:00"), "August 05, 2026");
        // Unparsable dates are emitted verbatim.
        assert_eq!(format_date("soon-ish"), "soon-ish");
        assert_eq!(format_date(""), "TBA");
    }

    #[test]
    fn test_calendar_falls_back_to_series_id() {
        let result = json!({
            "count": 1,
            "episodes": [{"seriesId": 42, "seasonNumber": 1, "episodeNumber": 1,
                          "title": "Premiere", "airDate": "2026-09-01"}]
        });
        let text = format_response(&result, "get_sonarr_calendar");
        assert!(text.contains("Series ID 42 S01E01: Premiere - September 01, 2026"));
    }

    #[test]
    fn test_detail_view_keeps_full_overview() {
        let overview = "o".repeat(400);
        let result = json!({"movie": {
            "title": "Heat", "year": 1995, "status": "released",
            "monitored": true, "hasFile": true, "overview": overview
        }});
        let text = format_response(&result, "get_radarr_movie_by_id");
        assert!(text.contains(&format!("Overview: {}", overview)));
        assert!(text.contains("Monitored: Yes"));
    }

    #[test]
    fn test_system_status_health() {
        let result = json!({"status": {"radarr": {
            "version": "5.2.6",
            "health": [{"type": "error", "message": "Indexer down"}]
        }}});
        let text = format_response(&result, "get_system_status");
        assert!(text.contains("RADARR: v5.2.6"));
        assert!(text.contains("ERROR: Indexer down"));
    }

    #[test]
    fn test_success_message_passthrough() {
        let result = json!({"success": true, "message": "Movie 'Heat (1995)' has been added to Radarr"});
        let text = format_response(&result, "add_radarr_movie");
        assert_eq!(text, "Movie 'Heat (1995)' has been added to Radarr");
    }

    #[test]
    fn test_unknown_shape_falls_back_to_dump() {
        let result = json!({"strange": {"nested": [1, 2, 3]}});
        let text = format_response(&result, "some_future_tool");
        assert!(text.contains("\"strange\""));
        assert!(text.contains("\"nested\""));
    }
}

//! Tool dispatch for Arrlink.
//!
//! Maps a tool name plus flat arguments to the appropriate backend
//! call(s), validates required arguments up front, and shapes the
//! structured result consumed by the response formatter. Tools that
//! address both backends query them concurrently; a failure on one side
//! becomes an error marker in that backend's section instead of
//! aborting the whole invocation.

use crate::backend::{BackendClient, Service};
use crate::context::AppContext;
use crate::error::{ArrlinkError, Result};
use crate::media::{truncate_overview, Episode, Movie, QueueItem, Series};
use crate::query::{MovieFilter, SeriesFilter};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tracing::warn;

/// Maximum items returned by list tools.
const LIST_LIMIT: usize = 50;
/// Maximum items returned by lookup/search tools.
const SEARCH_LIMIT: usize = 20;

/// Dispatch a tool invocation against the application context.
pub async fn dispatch(ctx: &AppContext, name: &str, args: &Value) -> Result<Value> {
    match name {
        "get_radarr_movies" => get_radarr_movies(ctx, args).await,
        "get_sonarr_series" => get_sonarr_series(ctx, args).await,
        "get_available_movies" => get_available_movies(ctx, args).await,
        "get_available_series" => get_available_series(ctx, args).await,
        "search_radarr_movies" => search_radarr_movies(ctx, args).await,
        "search_sonarr_series" => search_sonarr_series(ctx, args).await,
        "get_radarr_movie_by_id" => get_radarr_movie_by_id(ctx, args).await,
        "get_sonarr_series_by_id" => get_sonarr_series_by_id(ctx, args).await,
        "get_sonarr_episodes" => get_sonarr_episodes(ctx, args).await,
        "add_radarr_movie" => add_radarr_movie(ctx, args).await,
        "add_sonarr_series" => add_sonarr_series(ctx, args).await,
        "update_radarr_movie" => update_radarr_movie(ctx, args).await,
        "update_sonarr_series" => update_sonarr_series(ctx, args).await,
        "delete_radarr_movie" => delete_radarr_movie(ctx, args).await,
        "delete_sonarr_series" => delete_sonarr_series(ctx, args).await,
        "get_download_queue" => get_download_queue(ctx, args).await,
        "remove_from_queue" => remove_from_queue(ctx, args).await,
        "get_history" => get_history(ctx, args).await,
        "manual_import" => manual_import(ctx, args).await,
        "get_radarr_calendar" => get_calendar(ctx, args, Service::Radarr).await,
        "get_sonarr_calendar" => get_calendar(ctx, args, Service::Sonarr).await,
        "get_wanted_missing" => get_wanted(ctx, args, true).await,
        "get_wanted_cutoff" => get_wanted(ctx, args, false).await,
        "get_system_status" => get_system_status(ctx, args).await,
        "get_disk_space" => get_disk_space(ctx, args).await,
        "execute_command" => execute_command(ctx, args).await,
        "get_collections" => get_collections(ctx, args).await,
        "refresh_monitored" => refresh_monitored(ctx, args).await,
        _ => Err(ArrlinkError::UnknownTool(name.to_string())),
    }
}

// ---- argument helpers -------------------------------------------------

fn require_i64(args: &Value, key: &str) -> Result<i64> {
    args.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| ArrlinkError::InvalidArgument(key.to_string()))
}

fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ArrlinkError::InvalidArgument(key.to_string()))
}

fn opt_i64(args: &Value, key: &str) -> Option<i64> {
    args.get(key).and_then(Value::as_i64)
}

fn opt_str(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(|s| s.to_string())
}

fn opt_bool(args: &Value, key: &str) -> Option<bool> {
    args.get(key).and_then(Value::as_bool)
}

fn bool_or(args: &Value, key: &str, default: bool) -> bool {
    opt_bool(args, key).unwrap_or(default)
}

/// Parse the `service` argument, optionally allowing `both`.
fn require_service(args: &Value, allow_both: bool) -> Result<Service> {
    let raw = require_str(args, "service")?;
    match Service::parse(raw) {
        Some(Service::Both) if !allow_both => {
            Err(ArrlinkError::InvalidArgument("service".to_string()))
        }
        Some(service) => Ok(service),
        None => Err(ArrlinkError::InvalidArgument("service".to_string())),
    }
}

fn client_for<'a>(ctx: &'a AppContext, service: Service) -> &'a BackendClient {
    match service {
        Service::Sonarr => &ctx.sonarr,
        _ => &ctx.radarr,
    }
}

fn as_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Turn a per-backend outcome into a result section, downgrading the
/// error to a marker so the other backend's data still goes out.
fn section_or_error(backend: &str, outcome: Result<Value>) -> Value {
    match outcome {
        Ok(section) => section,
        Err(e) => {
            warn!(backend, "section failed: {}", e);
            json!({"error": e.to_string()})
        }
    }
}

// ---- result shaping ---------------------------------------------------

fn movie_summary(movie: &Movie) -> Value {
    json!({
        "id": movie.id,
        "title": movie.title,
        "year": movie.year,
        "monitored": movie.monitored,
        "hasFile": movie.has_file,
        "status": movie.status,
        "tmdbId": movie.raw.get("tmdbId").cloned().unwrap_or(Value::Null),
        "overview": truncate_overview(&movie.overview),
    })
}

fn series_summary(series: &Series) -> Value {
    json!({
        "id": series.id,
        "title": series.title,
        "year": series.year,
        "monitored": series.monitored,
        "status": series.status,
        "episodeCount": series.episode_count(),
        "episodeFileCount": series.episode_file_count(),
        "overview": truncate_overview(&series.overview),
    })
}

fn movie_list_result(movies: &[Movie]) -> Value {
    json!({
        "count": movies.len(),
        "movies": movies.iter().take(LIST_LIMIT).map(movie_summary).collect::<Vec<_>>(),
    })
}

fn series_list_result(series: &[Series]) -> Value {
    json!({
        "count": series.len(),
        "series": series.iter().take(LIST_LIMIT).map(series_summary).collect::<Vec<_>>(),
    })
}

fn episode_summary(ep: &Episode) -> Value {
    json!({
        "id": ep.id,
        "seriesId": ep.series_id,
        "seasonNumber": ep.season_number,
        "episodeNumber": ep.episode_number,
        "title": ep.title,
        "airDate": ep.air_date,
        "hasFile": ep.has_file,
        "monitored": ep.monitored,
    })
}

fn queue_section_result(items: &[QueueItem]) -> Value {
    json!({
        "count": items.len(),
        "items": items.iter().take(LIST_LIMIT).map(|item| json!({
            "title": item.title,
            "status": item.status,
            "size": item.size,
            "sizeleft": item.size_left,
        })).collect::<Vec<_>>(),
    })
}

// ---- library views ----------------------------------------------------

async fn fetch_movies(ctx: &AppContext) -> Result<Vec<Movie>> {
    let raw = ctx.radarr.get("movie").await?;
    Ok(as_array(raw).iter().map(Movie::from_value).collect())
}

async fn fetch_series(ctx: &AppContext) -> Result<Vec<Series>> {
    let raw = ctx.sonarr.get("series").await?;
    Ok(as_array(raw).iter().map(Series::from_value).collect())
}

async fn get_radarr_movies(ctx: &AppContext, args: &Value) -> Result<Value> {
    let filter = MovieFilter {
        monitored: opt_bool(args, "monitored"),
        downloaded: opt_bool(args, "downloaded"),
        ..MovieFilter::default()
    };
    let movies = filter.apply(fetch_movies(ctx).await?, &ctx.watch).await;
    Ok(movie_list_result(&movies))
}

async fn get_sonarr_series(ctx: &AppContext, args: &Value) -> Result<Value> {
    let filter = SeriesFilter {
        monitored: opt_bool(args, "monitored"),
        downloaded: opt_bool(args, "downloaded"),
        ..SeriesFilter::default()
    };
    let series = filter.apply(fetch_series(ctx).await?, &ctx.watch).await;
    Ok(series_list_result(&series))
}

async fn get_available_movies(ctx: &AppContext, args: &Value) -> Result<Value> {
    let filter = MovieFilter {
        year: opt_i64(args, "year"),
        downloaded: opt_bool(args, "downloaded"),
        watched: opt_bool(args, "watched"),
        actor: opt_str(args, "actors"),
        ..MovieFilter::default()
    };
    let movies = filter.apply(fetch_movies(ctx).await?, &ctx.watch).await;
    Ok(movie_list_result(&movies))
}

async fn get_available_series(ctx: &AppContext, args: &Value) -> Result<Value> {
    let filter = SeriesFilter {
        year: opt_i64(args, "year"),
        downloaded: opt_bool(args, "downloaded"),
        watched: opt_bool(args, "watched"),
        actor: opt_str(args, "actors"),
        ..SeriesFilter::default()
    };
    let series = filter.apply(fetch_series(ctx).await?, &ctx.watch).await;
    Ok(series_list_result(&series))
}

async fn search_radarr_movies(ctx: &AppContext, args: &Value) -> Result<Value> {
    let term = require_str(args, "term")?;
    let raw = ctx
        .radarr
        .get_with("movie/lookup", &[("term", term.to_string())])
        .await?;
    let items = as_array(raw);
    Ok(json!({
        "count": items.len(),
        "movies": items.iter().take(SEARCH_LIMIT).map(|m| json!({
            "title": m.get("title").cloned().unwrap_or(Value::Null),
            "year": m.get("year").cloned().unwrap_or(Value::Null),
            "tmdbId": m.get("tmdbId").cloned().unwrap_or(Value::Null),
            "imdbId": m.get("imdbId").cloned().unwrap_or(Value::Null),
            "overview": truncate_overview(m.get("overview").and_then(Value::as_str).unwrap_or("")),
        })).collect::<Vec<_>>(),
    }))
}

async fn search_sonarr_series(ctx: &AppContext, args: &Value) -> Result<Value> {
    let term = require_str(args, "term")?;
    let raw = ctx
        .sonarr
        .get_with("series/lookup", &[("term", term.to_string())])
        .await?;
    let items = as_array(raw);
    Ok(json!({
        "count": items.len(),
        "series": items.iter().take(SEARCH_LIMIT).map(|s| json!({
            "title": s.get("title").cloned().unwrap_or(Value::Null),
            "year": s.get("year").cloned().unwrap_or(Value::Null),
            "tvdbId": s.get("tvdbId").cloned().unwrap_or(Value::Null),
            "imdbId": s.get("imdbId").cloned().unwrap_or(Value::Null),
            "overview": truncate_overview(s.get("overview").and_then(Value::as_str).unwrap_or("")),
        })).collect::<Vec<_>>(),
    }))
}

async fn get_radarr_movie_by_id(ctx: &AppContext, args: &Value) -> Result<Value> {
    let movie_id = require_i64(args, "movieId")?;
    let raw = ctx.radarr.get(&format!("movie/{}", movie_id)).await?;
    let movie = Movie::from_value(&raw);
    // Detail views keep the overview untruncated.
    Ok(json!({
        "movie": {
            "id": movie.id,
            "title": movie.title,
            "year": movie.year,
            "monitored": movie.monitored,
            "hasFile": movie.has_file,
            "status": movie.status,
            "genres": movie.genres,
            "tmdbId": movie.raw.get("tmdbId").cloned().unwrap_or(Value::Null),
            "overview": movie.overview,
        }
    }))
}

async fn get_sonarr_series_by_id(ctx: &AppContext, args: &Value) -> Result<Value> {
    let series_id = require_i64(args, "seriesId")?;
    let raw = ctx.sonarr.get(&format!("series/{}", series_id)).await?;
    let series = Series::from_value(&raw);
    let total_episode_count = series
        .statistics
        .as_ref()
        .map(|s| s.total_episode_count)
        .unwrap_or(0);
    Ok(json!({
        "series": {
            "id": series.id,
            "title": series.title,
            "year": series.year,
            "monitored": series.monitored,
            "status": series.status,
            "network": series.network,
            "genres": series.genres,
            "episodeCount": series.episode_count(),
            "episodeFileCount": series.episode_file_count(),
            "totalEpisodeCount": total_episode_count,
            "overview": series.overview,
        }
    }))
}

async fn get_sonarr_episodes(ctx: &AppContext, args: &Value) -> Result<Value> {
    let series_id = require_i64(args, "seriesId")?;
    let raw = ctx
        .sonarr
        .get_with("episode", &[("seriesId", series_id.to_string())])
        .await?;
    let episodes: Vec<Episode> = as_array(raw).iter().map(Episode::from_value).collect();
    Ok(json!({
        "count": episodes.len(),
        "episodes": episodes.iter().take(LIST_LIMIT).map(episode_summary).collect::<Vec<_>>(),
    }))
}

// ---- library mutation -------------------------------------------------

fn first_profile_id(profiles: &[Value]) -> i64 {
    profiles
        .first()
        .and_then(|p| p.get("id"))
        .and_then(Value::as_i64)
        .unwrap_or(1)
}

fn first_folder_path(folders: &[Value], fallback: &str) -> String {
    folders
        .first()
        .and_then(|f| f.get("path"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

/// Resolve the first available quality profile when none was supplied.
async fn default_quality_profile(client: &BackendClient) -> Result<i64> {
    let profiles = as_array(client.get("qualityprofile").await?);
    Ok(first_profile_id(&profiles))
}

/// Resolve the first available root folder when none was supplied.
async fn default_root_folder(client: &BackendClient, fallback: &str) -> Result<String> {
    let folders = as_array(client.get("rootfolder").await?);
    Ok(first_folder_path(&folders, fallback))
}

async fn add_radarr_movie(ctx: &AppContext, args: &Value) -> Result<Value> {
    let tmdb_id = require_i64(args, "tmdbId")?;
    let title = require_str(args, "title")?;
    let year = require_i64(args, "year")?;

    let quality_profile_id = match opt_i64(args, "qualityProfileId") {
        Some(id) => id,
        None => default_quality_profile(&ctx.radarr).await?,
    };
    let root_folder_path = match opt_str(args, "rootFolderPath") {
        Some(path) => path,
        None => default_root_folder(&ctx.radarr, "/movies").await?,
    };

    let movie_data = json!({
        "title": title,
        "year": year,
        "tmdbId": tmdb_id,
        "qualityProfileId": quality_profile_id,
        "rootFolderPath": root_folder_path,
        "monitored": bool_or(args, "monitored", true),
        "addOptions": {
            "searchForMovie": bool_or(args, "searchForMovie", true),
            "monitor": "movieOnly",
        },
    });

    let added = ctx.radarr.post("movie", &movie_data).await?;
    let movie = Movie::from_value(&added);
    Ok(json!({
        "success": true,
        "message": format!("Movie '{} ({})' has been added to Radarr", title, year),
        "movie": {
            "id": movie.id,
            "title": movie.title,
            "year": movie.year,
            "tmdbId": movie.raw.get("tmdbId").cloned().unwrap_or(Value::Null),
            "monitored": movie.monitored,
            "hasFile": movie.has_file,
            "status": movie.status,
        }
    }))
}

async fn add_sonarr_series(ctx: &AppContext, args: &Value) -> Result<Value> {
    let tvdb_id = require_i64(args, "tvdbId")?;
    let title = require_str(args, "title")?;
    let year = require_i64(args, "year")?;

    let quality_profile_id = match opt_i64(args, "qualityProfileId") {
        Some(id) => id,
        None => default_quality_profile(&ctx.sonarr).await?,
    };
    let root_folder_path = match opt_str(args, "rootFolderPath") {
        Some(path) => path,
        None => default_root_folder(&ctx.sonarr, "/tv").await?,
    };

    let series_data = json!({
        "title": title,
        "year": year,
        "tvdbId": tvdb_id,
        "qualityProfileId": quality_profile_id,
        "rootFolderPath": root_folder_path,
        "monitored": bool_or(args, "monitored", true),
        "seasonFolder": bool_or(args, "seasonFolder", true),
        "addOptions": {
            "searchForMissingEpisodes": bool_or(args, "searchForMissingEpisodes", true),
            "monitor": "all",
        },
    });

    let added = ctx.sonarr.post("series", &series_data).await?;
    let series = Series::from_value(&added);
    let season_count = added
        .get("seasons")
        .and_then(Value::as_array)
        .map(|s| s.len())
        .unwrap_or(0);
    Ok(json!({
        "success": true,
        "message": format!("Series '{} ({})' has been added to Sonarr", title, year),
        "series": {
            "id": series.id,
            "title": series.title,
            "year": series.year,
            "tvdbId": series.raw.get("tvdbId").cloned().unwrap_or(Value::Null),
            "monitored": series.monitored,
            "status": series.status,
            "seasonCount": season_count,
        }
    }))
}

/// Apply the supplied fields onto a freshly fetched entity and write the
/// merged record back, so unspecified fields keep their current values.
fn merge_update_fields(entity: &mut Value, args: &Value) {
    if let Some(obj) = entity.as_object_mut() {
        if let Some(monitored) = opt_bool(args, "monitored") {
            obj.insert("monitored".to_string(), Value::Bool(monitored));
        }
        if let Some(profile) = opt_i64(args, "qualityProfileId") {
            obj.insert("qualityProfileId".to_string(), json!(profile));
        }
    }
}

async fn update_radarr_movie(ctx: &AppContext, args: &Value) -> Result<Value> {
    let movie_id = require_i64(args, "movieId")?;
    let endpoint = format!("movie/{}", movie_id);

    let mut existing = ctx.radarr.get(&endpoint).await?;
    merge_update_fields(&mut existing, args);
    let updated = ctx.radarr.put(&endpoint, &existing).await?;

    let title = updated
        .get("title")
        .or_else(|| existing.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();
    Ok(json!({
        "success": true,
        "message": format!("Movie '{}' has been updated", title),
    }))
}

async fn update_sonarr_series(ctx: &AppContext, args: &Value) -> Result<Value> {
    let series_id = require_i64(args, "seriesId")?;
    let endpoint = format!("series/{}", series_id);

    let mut existing = ctx.sonarr.get(&endpoint).await?;
    merge_update_fields(&mut existing, args);
    let updated = ctx.sonarr.put(&endpoint, &existing).await?;

    let title = updated
        .get("title")
        .or_else(|| existing.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();
    Ok(json!({
        "success": true,
        "message": format!("Series '{}' has been updated", title),
    }))
}

async fn delete_radarr_movie(ctx: &AppContext, args: &Value) -> Result<Value> {
    let movie_id = require_i64(args, "movieId")?;
    let params = [
        ("deleteFiles", bool_or(args, "deleteFiles", false).to_string()),
        (
            "addImportExclusion",
            bool_or(args, "addImportExclusion", false).to_string(),
        ),
    ];
    ctx.radarr
        .delete(&format!("movie/{}", movie_id), &params)
        .await?;
    Ok(json!({
        "success": true,
        "message": format!("Movie {} has been removed from Radarr", movie_id),
    }))
}

async fn delete_sonarr_series(ctx: &AppContext, args: &Value) -> Result<Value> {
    let series_id = require_i64(args, "seriesId")?;
    let params = [("deleteFiles", bool_or(args, "deleteFiles", false).to_string())];
    ctx.sonarr
        .delete(&format!("series/{}", series_id), &params)
        .await?;
    Ok(json!({
        "success": true,
        "message": format!("Series {} has been removed from Sonarr", series_id),
    }))
}

// ---- download management ----------------------------------------------

async fn queue_section(
    client: &BackendClient,
    unknown_param: &str,
    include_unknown: bool,
) -> Result<Value> {
    let raw = client
        .get_with("queue", &[(unknown_param, include_unknown.to_string())])
        .await?;
    let records = raw
        .get("records")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let items: Vec<QueueItem> = records.iter().map(QueueItem::from_value).collect();
    Ok(queue_section_result(&items))
}

async fn get_download_queue(ctx: &AppContext, args: &Value) -> Result<Value> {
    let service = require_service(args, true)?;
    let include_unknown = bool_or(args, "includeUnknownItems", false);

    let mut queues = Map::new();
    match service {
        Service::Both => {
            let (radarr, sonarr) = tokio::join!(
                queue_section(&ctx.radarr, "includeUnknownMovieItems", include_unknown),
                queue_section(&ctx.sonarr, "includeUnknownSeriesItems", include_unknown),
            );
            queues.insert("radarr".to_string(), section_or_error("radarr", radarr));
            queues.insert("sonarr".to_string(), section_or_error("sonarr", sonarr));
        }
        Service::Radarr => {
            let radarr =
                queue_section(&ctx.radarr, "includeUnknownMovieItems", include_unknown).await?;
            queues.insert("radarr".to_string(), radarr);
        }
        Service::Sonarr => {
            let sonarr =
                queue_section(&ctx.sonarr, "includeUnknownSeriesItems", include_unknown).await?;
            queues.insert("sonarr".to_string(), sonarr);
        }
    }

    Ok(Value::Object(
        [("queues".to_string(), Value::Object(queues))]
            .into_iter()
            .collect(),
    ))
}

async fn remove_from_queue(ctx: &AppContext, args: &Value) -> Result<Value> {
    let service = require_service(args, false)?;
    let queue_id = require_i64(args, "id")?;
    let remove_from_client = bool_or(args, "removeFromClient", true);
    let blocklist = bool_or(args, "blocklist", false);

    let params = [
        ("removeFromClient", remove_from_client.to_string()),
        ("blocklist", blocklist.to_string()),
    ];
    client_for(ctx, service)
        .delete(&format!("queue/{}", queue_id), &params)
        .await?;

    Ok(json!({
        "success": true,
        "message": format!("Queue item {} has been removed from {}", queue_id, service),
        "removeFromClient": remove_from_client,
        "blocklist": blocklist,
    }))
}

async fn get_history(ctx: &AppContext, args: &Value) -> Result<Value> {
    let service = require_service(args, false)?;
    let page_size = opt_i64(args, "pageSize").unwrap_or(50);
    let page = opt_i64(args, "page").unwrap_or(1);

    let mut params = vec![
        ("pageSize", page_size.to_string()),
        ("page", page.to_string()),
        ("sortKey", "date".to_string()),
        ("sortDirection", "descending".to_string()),
    ];
    if let Some(event_type) = opt_str(args, "eventType") {
        params.push(("eventType", event_type));
    }

    let history = client_for(ctx, service).get_with("history", &params).await?;

    let records: Vec<Value> = history
        .get("records")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
        .iter()
        .map(|record| {
            json!({
                "id": record.get("id").cloned().unwrap_or(Value::Null),
                "movieId": record.get("movieId").cloned().unwrap_or(Value::Null),
                "seriesId": record.get("seriesId").cloned().unwrap_or(Value::Null),
                "episodeId": record.get("episodeId").cloned().unwrap_or(Value::Null),
                "sourceTitle": record.get("sourceTitle").cloned().unwrap_or(Value::Null),
                "quality": record.get("quality").cloned().unwrap_or_else(|| json!({})),
                "date": record.get("date").cloned().unwrap_or(Value::Null),
                "eventType": record.get("eventType").cloned().unwrap_or(Value::Null),
                "data": record.get("data").cloned().unwrap_or_else(|| json!({})),
            })
        })
        .collect();

    Ok(json!({
        "page": history.get("page").cloned().unwrap_or(json!(1)),
        "pageSize": history.get("pageSize").cloned().unwrap_or(json!(page_size)),
        "totalRecords": history.get("totalRecords").cloned().unwrap_or(json!(0)),
        "records": records,
    }))
}

async fn manual_import(ctx: &AppContext, args: &Value) -> Result<Value> {
    let service = require_service(args, false)?;
    let path = require_str(args, "path")?;

    let mut params = vec![("path", path.to_string())];
    match service {
        Service::Radarr => {
            if let Some(movie_id) = opt_i64(args, "movieId") {
                params.push(("movieId", movie_id.to_string()));
            }
        }
        _ => {
            if let Some(series_id) = opt_i64(args, "seriesId") {
                params.push(("seriesId", series_id.to_string()));
            }
        }
    }

    let items = as_array(
        client_for(ctx, service)
            .get_with("manualimport", &params)
            .await?,
    );

    Ok(json!({
        "count": items.len(),
        "items": items.iter().take(LIST_LIMIT).map(|item| json!({
            "path": item.get("path").cloned().unwrap_or(Value::Null),
            "relativePath": item.get("relativePath").cloned().unwrap_or(Value::Null),
            "name": item.get("name").cloned().unwrap_or(Value::Null),
            "size": item.get("size").cloned().unwrap_or(json!(0)),
            "quality": item.get("quality").cloned().unwrap_or_else(|| json!({})),
            "movie": item.get("movie").cloned().unwrap_or(Value::Null),
            "series": item.get("series").cloned().unwrap_or(Value::Null),
            "episodes": item.get("episodes").cloned().unwrap_or_else(|| json!([])),
            "rejections": item.get("rejections").cloned().unwrap_or_else(|| json!([])),
        })).collect::<Vec<_>>(),
    }))
}

// ---- calendar and wanted ----------------------------------------------

async fn get_calendar(ctx: &AppContext, args: &Value, service: Service) -> Result<Value> {
    // Default window: the next 30 days.
    let start = opt_str(args, "start")
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    let end = opt_str(args, "end").unwrap_or_else(|| {
        (Utc::now() + Duration::days(30)).to_rfc3339_opts(SecondsFormat::Secs, true)
    });
    let unmonitored = bool_or(args, "unmonitored", false);

    let params = [
        ("start", start),
        ("end", end),
        ("unmonitored", unmonitored.to_string()),
    ];
    let items = as_array(client_for(ctx, service).get_with("calendar", &params).await?);

    if service == Service::Radarr {
        Ok(json!({
            "count": items.len(),
            "movies": items.iter().take(LIST_LIMIT).map(|movie| json!({
                "id": movie.get("id").cloned().unwrap_or(Value::Null),
                "title": movie.get("title").cloned().unwrap_or(Value::Null),
                "releaseDate": movie.get("releaseDate").cloned().unwrap_or(Value::Null),
                "inCinemas": movie.get("inCinemas").cloned().unwrap_or(Value::Null),
                "physicalRelease": movie.get("physicalRelease").cloned().unwrap_or(Value::Null),
                "digitalRelease": movie.get("digitalRelease").cloned().unwrap_or(Value::Null),
                "monitored": movie.get("monitored").cloned().unwrap_or(json!(false)),
                "hasFile": movie.get("hasFile").cloned().unwrap_or(json!(false)),
            })).collect::<Vec<_>>(),
        }))
    } else {
        Ok(json!({
            "count": items.len(),
            "episodes": items.iter().take(LIST_LIMIT).map(|ep| json!({
                "id": ep.get("id").cloned().unwrap_or(Value::Null),
                "seriesId": ep.get("seriesId").cloned().unwrap_or(Value::Null),
                "seasonNumber": ep.get("seasonNumber").cloned().unwrap_or(json!(0)),
                "episodeNumber": ep.get("episodeNumber").cloned().unwrap_or(json!(0)),
                "title": ep.get("title").cloned().unwrap_or(Value::Null),
                "airDate": ep.get("airDate").cloned().unwrap_or(Value::Null),
                "airDateUtc": ep.get("airDateUtc").cloned().unwrap_or(Value::Null),
                "monitored": ep.get("monitored").cloned().unwrap_or(json!(false)),
                "hasFile": ep.get("hasFile").cloned().unwrap_or(json!(false)),
                "series": {
                    "title": ep.get("series").and_then(|s| s.get("title")).cloned().unwrap_or(Value::Null),
                    "year": ep.get("series").and_then(|s| s.get("year")).cloned().unwrap_or(Value::Null),
                },
            })).collect::<Vec<_>>(),
        }))
    }
}

async fn get_wanted(ctx: &AppContext, args: &Value, missing: bool) -> Result<Value> {
    let service = require_service(args, false)?;
    let page_size = opt_i64(args, "pageSize").unwrap_or(50);
    let page = opt_i64(args, "page").unwrap_or(1);

    let mut params = vec![
        ("pageSize", page_size.to_string()),
        ("page", page.to_string()),
    ];
    if missing {
        if let Some(sort_key) = opt_str(args, "sortKey") {
            params.push(("sortKey", sort_key));
        }
        if let Some(sort_dir) = opt_str(args, "sortDir") {
            params.push(("sortDirection", sort_dir));
        }
    }

    let endpoint = if missing { "wanted/missing" } else { "wanted/cutoff" };
    let wanted = client_for(ctx, service).get_with(endpoint, &params).await?;

    let raw_records = wanted
        .get("records")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let records: Vec<Value> = if service == Service::Radarr {
        raw_records
            .iter()
            .map(|movie| {
                json!({
                    "id": movie.get("id").cloned().unwrap_or(Value::Null),
                    "title": movie.get("title").cloned().unwrap_or(Value::Null),
                    "year": movie.get("year").cloned().unwrap_or(Value::Null),
                    "monitored": movie.get("monitored").cloned().unwrap_or(json!(false)),
                    "status": movie.get("status").cloned().unwrap_or(Value::Null),
                    "minimumAvailability": movie.get("minimumAvailability").cloned().unwrap_or(Value::Null),
                })
            })
            .collect()
    } else {
        raw_records
            .iter()
            .map(|ep| {
                json!({
                    "id": ep.get("id").cloned().unwrap_or(Value::Null),
                    "seriesId": ep.get("seriesId").cloned().unwrap_or(Value::Null),
                    "seasonNumber": ep.get("seasonNumber").cloned().unwrap_or(json!(0)),
                    "episodeNumber": ep.get("episodeNumber").cloned().unwrap_or(json!(0)),
                    "title": ep.get("title").cloned().unwrap_or(Value::Null),
                    "airDate": ep.get("airDate").cloned().unwrap_or(Value::Null),
                    "monitored": ep.get("monitored").cloned().unwrap_or(json!(false)),
                    "series": {
                        "title": ep.get("series").and_then(|s| s.get("title")).cloned().unwrap_or(Value::Null),
                        "year": ep.get("series").and_then(|s| s.get("year")).cloned().unwrap_or(Value::Null),
                    },
                })
            })
            .collect()
    };

    Ok(json!({
        "page": wanted.get("page").cloned().unwrap_or(json!(1)),
        "pageSize": wanted.get("pageSize").cloned().unwrap_or(json!(page_size)),
        "totalRecords": wanted.get("totalRecords").cloned().unwrap_or(json!(0)),
        "records": records,
    }))
}

// ---- system ------------------------------------------------------------

async fn status_section(client: &BackendClient) -> Result<Value> {
    let (status, health) = tokio::join!(client.get("system/status"), client.get("health"));
    let status = status?;
    let health = as_array(health?);

    Ok(json!({
        "version": status.get("version").cloned().unwrap_or(Value::Null),
        "buildTime": status.get("buildTime").cloned().unwrap_or(Value::Null),
        "osName": status.get("osName").cloned().unwrap_or(Value::Null),
        "osVersion": status.get("osVersion").cloned().unwrap_or(Value::Null),
        "branch": status.get("branch").cloned().unwrap_or(Value::Null),
        "authentication": status.get("authentication").cloned().unwrap_or(Value::Null),
        "startupPath": status.get("startupPath").cloned().unwrap_or(Value::Null),
        "appData": status.get("appData").cloned().unwrap_or(Value::Null),
        "urlBase": status.get("urlBase").cloned().unwrap_or(Value::Null),
        "health": health.iter().map(|h| json!({
            "source": h.get("source").cloned().unwrap_or(Value::Null),
            "type": h.get("type").cloned().unwrap_or(Value::Null),
            "message": h.get("message").cloned().unwrap_or(Value::Null),
            "wikiUrl": h.get("wikiUrl").cloned().unwrap_or(Value::Null),
        })).collect::<Vec<_>>(),
    }))
}

async fn get_system_status(ctx: &AppContext, args: &Value) -> Result<Value> {
    let service = require_service(args, true)?;

    let mut status = Map::new();
    match service {
        Service::Both => {
            let (radarr, sonarr) =
                tokio::join!(status_section(&ctx.radarr), status_section(&ctx.sonarr));
            status.insert("radarr".to_string(), section_or_error("radarr", radarr));
            status.insert("sonarr".to_string(), section_or_error("sonarr", sonarr));
        }
        Service::Radarr => {
            status.insert("radarr".to_string(), status_section(&ctx.radarr).await?);
        }
        Service::Sonarr => {
            status.insert("sonarr".to_string(), status_section(&ctx.sonarr).await?);
        }
    }

    Ok(Value::Object(
        [("status".to_string(), Value::Object(status))]
            .into_iter()
            .collect(),
    ))
}

/// Percentage of a disk in use, treating an unknown total as 0%.
fn percent_used(free: i64, total: i64) -> f64 {
    if total > 0 {
        (1.0 - free as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

async fn disk_section(client: &BackendClient) -> Result<Value> {
    let disks = as_array(client.get("diskspace").await?);
    Ok(Value::Array(
        disks
            .iter()
            .map(|disk| {
                let free = disk.get("freeSpace").and_then(Value::as_i64).unwrap_or(0);
                let total = disk.get("totalSpace").and_then(Value::as_i64).unwrap_or(0);
                json!({
                    "path": disk.get("path").cloned().unwrap_or(Value::Null),
                    "label": disk.get("label").cloned().unwrap_or(Value::Null),
                    "freeSpace": free,
                    "totalSpace": total,
                    "percentUsed": (percent_used(free, total) * 100.0).round() / 100.0,
                })
            })
            .collect(),
    ))
}

async fn get_disk_space(ctx: &AppContext, args: &Value) -> Result<Value> {
    let service = require_service(args, true)?;

    let mut disk_space = Map::new();
    match service {
        Service::Both => {
            let (radarr, sonarr) = tokio::join!(disk_section(&ctx.radarr), disk_section(&ctx.sonarr));
            disk_space.insert("radarr".to_string(), section_or_error("radarr", radarr));
            disk_space.insert("sonarr".to_string(), section_or_error("sonarr", sonarr));
        }
        Service::Radarr => {
            disk_space.insert("radarr".to_string(), disk_section(&ctx.radarr).await?);
        }
        Service::Sonarr => {
            disk_space.insert("sonarr".to_string(), disk_section(&ctx.sonarr).await?);
        }
    }

    Ok(Value::Object(
        [("diskSpace".to_string(), Value::Object(disk_space))]
            .into_iter()
            .collect(),
    ))
}

async fn execute_command(ctx: &AppContext, args: &Value) -> Result<Value> {
    let service = require_service(args, false)?;
    let command = require_str(args, "command")?;

    let mut command_data = json!({"name": command});
    if let Some(obj) = command_data.as_object_mut() {
        match service {
            Service::Radarr => {
                if let Some(movie_id) = opt_i64(args, "movieId") {
                    obj.insert("movieIds".to_string(), json!([movie_id]));
                }
            }
            _ => {
                if let Some(series_id) = opt_i64(args, "seriesId") {
                    obj.insert("seriesId".to_string(), json!(series_id));
                }
            }
        }
    }

    let result = client_for(ctx, service).post("command", &command_data).await?;

    Ok(json!({
        "success": true,
        "message": format!("Command '{}' has been queued", command),
        "command": {
            "id": result.get("id").cloned().unwrap_or(Value::Null),
            "name": result.get("name").cloned().unwrap_or(Value::Null),
            "status": result.get("status").cloned().unwrap_or(Value::Null),
            "queued": result.get("queued").cloned().unwrap_or(Value::Null),
            "started": result.get("started").cloned().unwrap_or(Value::Null),
            "trigger": result.get("trigger").cloned().unwrap_or(Value::Null),
            "stateChangeTime": result.get("stateChangeTime").cloned().unwrap_or(Value::Null),
        }
    }))
}

async fn get_collections(ctx: &AppContext, args: &Value) -> Result<Value> {
    let mut params = Vec::new();
    if let Some(tmdb_id) = opt_i64(args, "tmdbId") {
        params.push(("tmdbId", tmdb_id.to_string()));
    }

    let collections = as_array(ctx.radarr.get_with("collection", &params).await?);

    Ok(json!({
        "count": collections.len(),
        "collections": collections.iter().take(LIST_LIMIT).map(|coll| json!({
            "id": coll.get("id").cloned().unwrap_or(Value::Null),
            "title": coll.get("title").cloned().unwrap_or(Value::Null),
            "tmdbId": coll.get("tmdbId").cloned().unwrap_or(Value::Null),
            "monitored": coll.get("monitored").cloned().unwrap_or(json!(false)),
            "qualityProfileId": coll.get("qualityProfileId").cloned().unwrap_or(Value::Null),
            "rootFolderPath": coll.get("rootFolderPath").cloned().unwrap_or(Value::Null),
            "minimumAvailability": coll.get("minimumAvailability").cloned().unwrap_or(Value::Null),
            "movies": coll.get("movies").and_then(Value::as_array).map(|movies| {
                movies.iter().map(|movie| json!({
                    "tmdbId": movie.get("tmdbId").cloned().unwrap_or(Value::Null),
                    "title": movie.get("title").cloned().unwrap_or(Value::Null),
                    "year": movie.get("year").cloned().unwrap_or(Value::Null),
                    "runtime": movie.get("runtime").cloned().unwrap_or(Value::Null),
                    "overview": truncate_overview(movie.get("overview").and_then(Value::as_str).unwrap_or("")),
                })).collect::<Vec<_>>()
            }).unwrap_or_default(),
        })).collect::<Vec<_>>(),
    }))
}

async fn refresh_monitored(ctx: &AppContext, args: &Value) -> Result<Value> {
    let service = require_service(args, false)?;
    let command = match service {
        Service::Radarr => "RefreshMovie",
        _ => "RefreshSeries",
    };
    let delegated = json!({"service": service.to_string(), "command": command});
    execute_command(ctx, &delegated).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use serde_json::json;

    fn ctx() -> AppContext {
        AppContext::new(&Settings::default())
    }

    #[tokio::test]
    async fn test_unknown_tool_is_rejected() {
        let err = dispatch(&ctx(), "no_such_tool", &json!({})).await.unwrap_err();
        assert!(matches!(err, ArrlinkError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_missing_required_argument_names_the_field() {
        let err = dispatch(&ctx(), "search_radarr_movies", &json!({}))
            .await
            .unwrap_err();
        match err {
            ArrlinkError::InvalidArgument(field) => assert_eq!(field, "term"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_service_argument_is_validated() {
        let err = dispatch(&ctx(), "get_download_queue", &json!({"service": "plex"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ArrlinkError::InvalidArgument(_)));

        // `both` is not valid for single-service tools.
        let err = dispatch(
            &ctx(),
            "remove_from_queue",
            &json!({"service": "both", "id": 1}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ArrlinkError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_add_movie_validates_before_any_network_call() {
        let err = dispatch(
            &ctx(),
            "add_radarr_movie",
            &json!({"tmdbId": 603, "title": "The Matrix"}),
        )
        .await
        .unwrap_err();
        match err {
            ArrlinkError::InvalidArgument(field) => assert_eq!(field, "year"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_movie_list_caps_items_but_not_count() {
        let movies: Vec<Movie> = (0..120)
            .map(|i| Movie::from_value(&json!({"id": i, "title": format!("Movie {}", i)})))
            .collect();
        let result = movie_list_result(&movies);
        assert_eq!(result["count"], 120);
        assert_eq!(result["movies"].as_array().unwrap().len(), LIST_LIMIT);
        // Order preserved from input.
        assert_eq!(result["movies"][0]["id"], 0);
        assert_eq!(result["movies"][49]["id"], 49);
    }

    #[test]
    fn test_movie_summary_truncates_overview() {
        let movie = Movie::from_value(&json!({
            "id": 1, "title": "Wordy", "overview": "a".repeat(300)
        }));
        let summary = movie_summary(&movie);
        let overview = summary["overview"].as_str().unwrap();
        assert_eq!(overview.len(), 203);
        assert!(overview.ends_with("..."));
    }

    #[test]
    fn test_add_defaults_resolve_to_first_profile_and_folder() {
        let profiles = vec![json!({"id": 6, "name": "HD-1080p"}), json!({"id": 9})];
        assert_eq!(first_profile_id(&profiles), 6);
        assert_eq!(first_profile_id(&[]), 1);

        let folders = vec![json!({"path": "/data/movies"}), json!({"path": "/mnt/b"})];
        assert_eq!(first_folder_path(&folders, "/movies"), "/data/movies");
        assert_eq!(first_folder_path(&[], "/movies"), "/movies");
    }

    #[test]
    fn test_percent_used_guards_zero_total() {
        assert_eq!(percent_used(25, 100), 75.0);
        assert_eq!(percent_used(0, 0), 0.0);
    }

    #[test]
    fn test_merge_update_fields_preserves_unspecified() {
        let mut entity = json!({
            "id": 5, "title": "Heat", "monitored": true,
            "qualityProfileId": 1, "path": "/movies/Heat"
        });
        merge_update_fields(&mut entity, &json!({"monitored": false}));
        assert_eq!(entity["monitored"], false);
        assert_eq!(entity["qualityProfileId"], 1);
        assert_eq!(entity["path"], "/movies/Heat");
    }

    #[test]
    fn test_queue_section_result_shape() {
        let items = vec![QueueItem::from_value(&json!({
            "title": "Show.S01E01", "status": "downloading",
            "size": 200, "sizeleft": 50
        }))];
        let section = queue_section_result(&items);
        assert_eq!(section["count"], 1);
        assert_eq!(section["items"][0]["sizeleft"], 50);
    }
}

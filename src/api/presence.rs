use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde_json::{Value, json};
use tracing::{debug, error, instrument};

use crate::error::PresenceError;
use crate::model::store::{AttendanceStore, DatePresence};
use crate::utils::presence_loader::StoreCache;
use crate::utils::time_math::Mean;
use crate::utils::weekday::{
    WEEKDAY_LABELS, group_durations_by_weekday, group_start_end_by_weekday,
    mean_durations_per_weekday, mean_start_end_per_weekday, total_durations_per_weekday,
};

/// User queried by the routes that omit the id.
const DEFAULT_USER_ID: u64 = 0;

/// Runs the memoized loader on the blocking pool; a refresh reads the CSV
/// while holding the cache lock.
async fn current_store(cache: web::Data<StoreCache>) -> Result<Arc<AttendanceStore>, PresenceError> {
    let cache = cache.into_inner();
    web::block(move || cache.call())
        .await
        .map_err(|e| PresenceError::Internal {
            reason: e.to_string(),
        })?
        .inspect_err(|e| error!(error = %e, "Failed to load attendance data"))
}

async fn user_rows<T, F>(
    user_id: u64,
    cache: web::Data<StoreCache>,
    rows: F,
) -> Result<T, PresenceError>
where
    F: FnOnce(&DatePresence) -> T,
{
    let store = current_store(cache).await?;
    let days = store
        .lookup(user_id)
        .inspect_err(|_| debug!(user_id, "User not found"))?;
    Ok(rows(days))
}

pub fn mean_time_rows(days: &DatePresence) -> Vec<(&'static str, Mean)> {
    let means = mean_durations_per_weekday(&group_durations_by_weekday(days));
    WEEKDAY_LABELS.into_iter().zip(means).collect()
}

/// Header row followed by one row per weekday.
pub fn presence_weekday_rows(days: &DatePresence) -> Vec<Value> {
    let totals = total_durations_per_weekday(&group_durations_by_weekday(days));
    let mut rows = Vec::with_capacity(WEEKDAY_LABELS.len() + 1);
    rows.push(json!(["Weekday", "Presence (s)"]));
    rows.extend(
        WEEKDAY_LABELS
            .into_iter()
            .zip(totals)
            .map(|(label, total)| json!([label, total])),
    );
    rows
}

pub fn start_end_rows(days: &DatePresence) -> Vec<(&'static str, String, String)> {
    let means = mean_start_end_per_weekday(&group_start_end_by_weekday(days));
    WEEKDAY_LABELS
        .into_iter()
        .zip(means)
        .map(|(label, (start, end))| (label, start, end))
        .collect()
}

/// Mean presence time of a user grouped by weekday
#[utoipa::path(
    get,
    path = "/api/v1/mean_time_weekday/{user_id}",
    params(("user_id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "Mean presence (s) per weekday", body = Object, example = json!([
            ["Mon", 24123.0], ["Tue", 16564.0], ["Wed", 25321.0], ["Thu", 22984.0],
            ["Fri", 6426.0], ["Sat", 0], ["Sun", 0]
        ])),
        (status = 404, description = "User not found"),
        (status = 503, description = "Attendance data unavailable")
    ),
    tag = "Presence"
)]
#[instrument(name = "mean_time_weekday", skip(path, cache), fields(user_id = *path))]
pub async fn mean_time_weekday(
    path: web::Path<u64>,
    cache: web::Data<StoreCache>,
) -> actix_web::Result<impl Responder> {
    let rows = user_rows(path.into_inner(), cache, mean_time_rows).await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn mean_time_weekday_default(
    cache: web::Data<StoreCache>,
) -> actix_web::Result<impl Responder> {
    let rows = user_rows(DEFAULT_USER_ID, cache, mean_time_rows).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Total presence time of a user grouped by weekday
#[utoipa::path(
    get,
    path = "/api/v1/presence_weekday/{user_id}",
    params(("user_id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "Total presence (s) per weekday", body = Object, example = json!([
            ["Weekday", "Presence (s)"],
            ["Mon", 24123], ["Tue", 16564], ["Wed", 25321], ["Thu", 45968],
            ["Fri", 6426], ["Sat", 0], ["Sun", 0]
        ])),
        (status = 404, description = "User not found"),
        (status = 503, description = "Attendance data unavailable")
    ),
    tag = "Presence"
)]
#[instrument(name = "presence_weekday", skip(path, cache), fields(user_id = *path))]
pub async fn presence_weekday(
    path: web::Path<u64>,
    cache: web::Data<StoreCache>,
) -> actix_web::Result<impl Responder> {
    let rows = user_rows(path.into_inner(), cache, presence_weekday_rows).await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn presence_weekday_default(
    cache: web::Data<StoreCache>,
) -> actix_web::Result<impl Responder> {
    let rows = user_rows(DEFAULT_USER_ID, cache, presence_weekday_rows).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Mean presence start and end time of a user grouped by weekday
#[utoipa::path(
    get,
    path = "/api/v1/presence_start_end_per_weekday/{user_id}",
    params(("user_id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "Mean start and end clock time per weekday", body = Object, example = json!([
            ["Mon", "09:12:14", "15:54:17"], ["Tue", "09:19:50", "13:55:54"],
            ["Wed", "09:13:26", "16:15:27"], ["Thu", "09:53:22", "16:16:26"],
            ["Fri", "13:16:56", "15:04:02"], ["Sat", "00:00:00", "00:00:00"],
            ["Sun", "00:00:00", "00:00:00"]
        ])),
        (status = 404, description = "User not found"),
        (status = 503, description = "Attendance data unavailable")
    ),
    tag = "Presence"
)]
#[instrument(name = "presence_start_end", skip(path, cache), fields(user_id = *path))]
pub async fn presence_start_end(
    path: web::Path<u64>,
    cache: web::Data<StoreCache>,
) -> actix_web::Result<impl Responder> {
    let rows = user_rows(path.into_inner(), cache, start_end_rows).await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn presence_start_end_default(
    cache: web::Data<StoreCache>,
) -> actix_web::Result<impl Responder> {
    let rows = user_rows(DEFAULT_USER_ID, cache, start_end_rows).await?;
    Ok(HttpResponse::Ok().json(rows))
}

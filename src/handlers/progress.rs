use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::progress::{DayQuery, ProgressEntry, ProgressRangeQuery, UpsertProgressRequest};
use crate::AppState;

/// Record (or overwrite) the progress entry for a day. One row per user per
/// calendar day; a second submission for the same day replaces the fields.
pub async fn upsert_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertProgressRequest>,
) -> AppResult<Json<ProgressEntry>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if body.workout_duration.is_some() && !body.workout_completed {
        return Err(AppError::Validation(
            "Workout duration requires a completed workout".into(),
        ));
    }

    let entry_date = body.entry_date.unwrap_or_else(|| Utc::now().date_naive());

    let entry = sqlx::query_as::<_, ProgressEntry>(
        r#"
        INSERT INTO progress_entries
            (id, user_id, entry_date, workout_completed, weight, workout_duration, notes, photo_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id, entry_date) DO UPDATE SET
            workout_completed = EXCLUDED.workout_completed,
            weight = EXCLUDED.weight,
            workout_duration = EXCLUDED.workout_duration,
            notes = EXCLUDED.notes,
            photo_url = EXCLUDED.photo_url,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(entry_date)
    .bind(body.workout_completed)
    .bind(body.weight)
    .bind(body.workout_duration)
    .bind(&body.notes)
    .bind(&body.photo_url)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(entry))
}

pub async fn list_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ProgressRangeQuery>,
) -> AppResult<Json<Vec<ProgressEntry>>> {
    let start = query
        .start_date
        .unwrap_or_else(|| Utc::now().date_naive() - chrono::Duration::days(30));
    let end = query.end_date.unwrap_or_else(|| Utc::now().date_naive());

    if end < start {
        return Err(AppError::Validation(
            "start_date must not be after end_date".into(),
        ));
    }

    let entries = sqlx::query_as::<_, ProgressEntry>(
        r#"
        SELECT * FROM progress_entries
        WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
        ORDER BY entry_date ASC
        "#,
    )
    .bind(auth_user.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}

/// The entry for one day, or JSON `null` when nothing was recorded.
pub async fn get_daily_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<Option<ProgressEntry>>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let entry = sqlx::query_as::<_, ProgressEntry>(
        "SELECT * FROM progress_entries WHERE user_id = $1 AND entry_date = $2",
    )
    .bind(auth_user.id)
    .bind(date)
    .fetch_optional(&state.db)
    .await?;

    Ok(Json(entry))
}

/// Just the photo reference for a day; the photo itself lives elsewhere.
pub async fn get_progress_photo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let photo_url = sqlx::query_scalar::<_, Option<String>>(
        "SELECT photo_url FROM progress_entries WHERE user_id = $1 AND entry_date = $2",
    )
    .bind(auth_user.id)
    .bind(date)
    .fetch_optional(&state.db)
    .await?
    .flatten();

    Ok(Json(serde_json::json!({ "photo_url": photo_url })))
}

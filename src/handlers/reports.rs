use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::progress::{MonthQuery, ProgressEntry, ProgressRangeQuery, WeightTrendPoint};
use crate::report::{self, MonthlySummary};
use crate::AppState;

/// Aggregated report for one calendar month.
pub async fn monthly_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthlySummary>> {
    let (month_start, month_end) = report::month_bounds(query.year, query.month)?;

    let entries = sqlx::query_as::<_, ProgressEntry>(
        r#"
        SELECT * FROM progress_entries
        WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
        ORDER BY entry_date ASC
        "#,
    )
    .bind(auth_user.id)
    .bind(month_start)
    .bind(month_end)
    .fetch_all(&state.db)
    .await?;

    let summary = report::aggregate(entries, month_start, month_end)?;
    Ok(Json(summary))
}

/// Chronological weight samples across a date range.
pub async fn weight_trend(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ProgressRangeQuery>,
) -> AppResult<Json<Vec<WeightTrendPoint>>> {
    let start = query
        .start_date
        .unwrap_or_else(|| Utc::now().date_naive() - chrono::Duration::days(30));
    let end = query.end_date.unwrap_or_else(|| Utc::now().date_naive());

    if end < start {
        return Err(AppError::Validation(
            "start_date must not be after end_date".into(),
        ));
    }

    let points = sqlx::query_as::<_, WeightTrendPoint>(
        r#"
        SELECT entry_date AS date, weight FROM progress_entries
        WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3 AND weight IS NOT NULL
        ORDER BY entry_date ASC
        "#,
    )
    .bind(auth_user.id)
    .bind(start)
    .bind(end)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(points))
}

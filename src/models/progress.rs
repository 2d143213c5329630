use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// One user's recorded progress for a single calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub workout_completed: bool,
    /// Kilograms, present only on days the user weighed in.
    pub weight: Option<f64>,
    /// Minutes, meaningful only when `workout_completed`.
    pub workout_duration: Option<i32>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertProgressRequest {
    /// Defaults to today when omitted.
    pub entry_date: Option<NaiveDate>,
    pub workout_completed: bool,

    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg"))]
    pub weight: Option<f64>,

    #[validate(range(min = 0, max = 1440, message = "Duration must be between 0 and 1440 minutes"))]
    pub workout_duration: Option<i32>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    #[validate(length(max = 1024, message = "Photo URL too long"))]
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    /// Defaults to today when omitted.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Serialize, FromRow)]
pub struct WeightTrendPoint {
    pub date: NaiveDate,
    pub weight: f64,
}

//! Monthly progress aggregation.
//!
//! Single source of truth for the monthly report numbers. Every call site
//! (the HTTP report handler today) is a thin adapter: fetch one user's
//! entries for a calendar month, hand them to [`aggregate`], serialize the
//! result. Pure computation, no I/O, no shared state.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::models::progress::ProgressEntry;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("invalid range: {end} precedes {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("no such calendar month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Aggregated view of one user's progress over one calendar month.
#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub workouts_completed: u32,
    pub total_workout_minutes: u32,
    /// `total / count` rounded to the nearest minute; 0 with no workouts.
    pub average_workout_minutes: u32,
    /// Last minus first recorded weight; `None` with fewer than two samples.
    pub weight_change: Option<f64>,
    pub best_streak: u32,
    pub days_in_month: u32,
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    /// The input entries, unmodified, for calendar rendering downstream.
    pub entries: Vec<ProgressEntry>,
}

/// First and last day of a calendar month (leap-year aware).
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), ReportError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(ReportError::InvalidMonth { year, month })?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or(ReportError::InvalidMonth { year, month })?;
    Ok((start, end))
}

/// Reduce a month's entries to a [`MonthlySummary`].
///
/// Total for any well-formed input, including the empty set. The only
/// rejected input is an inverted range, which would otherwise produce a
/// negative `days_in_month`.
pub fn aggregate(
    entries: Vec<ProgressEntry>,
    month_start: NaiveDate,
    month_end: NaiveDate,
) -> Result<MonthlySummary, ReportError> {
    if month_end < month_start {
        return Err(ReportError::InvalidRange {
            start: month_start,
            end: month_end,
        });
    }

    let mut workouts_completed: u32 = 0;
    let mut total_workout_minutes: u32 = 0;
    for entry in &entries {
        if entry.workout_completed {
            workouts_completed += 1;
            total_workout_minutes += entry.workout_duration.unwrap_or(0).max(0) as u32;
        }
    }

    let average_workout_minutes = if workouts_completed > 0 {
        (f64::from(total_workout_minutes) / f64::from(workouts_completed)).round() as u32
    } else {
        0
    };

    // Storage hands entries back ordered by date, but weight delta and streak
    // silently corrupt if that guarantee ever slips. Compute over a sorted
    // view; the echoed `entries` keep caller order.
    let mut ordered: Vec<&ProgressEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.entry_date);

    let weights: Vec<f64> = ordered.iter().filter_map(|e| e.weight).collect();
    let weight_change = match weights.as_slice() {
        [first, .., last] => Some(last - first),
        _ => None,
    };

    // Streaks count consecutive entries in date order, not consecutive
    // calendar days; a logged rest day resets, a missing day does not.
    let mut best_streak: u32 = 0;
    let mut current_streak: u32 = 0;
    for entry in &ordered {
        if entry.workout_completed {
            current_streak += 1;
            best_streak = best_streak.max(current_streak);
        } else {
            current_streak = 0;
        }
    }

    let days_in_month = (month_end - month_start).num_days() as u32 + 1;

    Ok(MonthlySummary {
        workouts_completed,
        total_workout_minutes,
        average_workout_minutes,
        weight_change,
        best_streak,
        days_in_month,
        month_start,
        month_end,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn entry(
        day: u32,
        completed: bool,
        weight: Option<f64>,
        duration: Option<i32>,
    ) -> ProgressEntry {
        let now = Utc::now();
        ProgressEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            entry_date: date(day),
            workout_completed: completed,
            weight,
            workout_duration: duration,
            notes: None,
            photo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn march() -> (NaiveDate, NaiveDate) {
        month_bounds(2024, 3).unwrap()
    }

    #[test]
    fn empty_month_is_all_zeros() {
        let (start, end) = march();
        let summary = aggregate(vec![], start, end).unwrap();
        assert_eq!(summary.workouts_completed, 0);
        assert_eq!(summary.total_workout_minutes, 0);
        assert_eq!(summary.average_workout_minutes, 0);
        assert_eq!(summary.weight_change, None);
        assert_eq!(summary.best_streak, 0);
        assert_eq!(summary.days_in_month, 31);
        assert!(summary.entries.is_empty());
    }

    #[test]
    fn end_to_end_march_scenario() {
        // 5 entries, 3 completed with durations 30/45/60, weights on the
        // first and last day only.
        let entries = vec![
            entry(1, true, Some(80.0), Some(30)),
            entry(5, false, None, None),
            entry(10, true, None, Some(45)),
            entry(15, false, None, None),
            entry(20, true, Some(78.0), Some(60)),
        ];
        let (start, end) = march();
        let summary = aggregate(entries, start, end).unwrap();

        assert_eq!(summary.workouts_completed, 3);
        assert_eq!(summary.total_workout_minutes, 135);
        assert_eq!(summary.average_workout_minutes, 45);
        assert_eq!(summary.weight_change, Some(-2.0));
        assert_eq!(summary.best_streak, 1);
        assert_eq!(summary.entries.len(), 5);
        assert_eq!(summary.month_start, start);
        assert_eq!(summary.month_end, end);
    }

    #[test]
    fn streak_resets_on_missed_workout() {
        let flags = [true, true, false, true, true, true];
        let entries: Vec<ProgressEntry> = flags
            .iter()
            .enumerate()
            .map(|(i, &done)| entry(i as u32 + 1, done, None, None))
            .collect();
        let (start, end) = march();
        let summary = aggregate(entries, start, end).unwrap();
        assert_eq!(summary.best_streak, 3);
        assert_eq!(summary.workouts_completed, 5);
    }

    #[test]
    fn streak_ignores_calendar_gaps() {
        // Days 1 and 20 are far apart but adjacent in the entry sequence.
        let entries = vec![entry(1, true, None, None), entry(20, true, None, None)];
        let (start, end) = march();
        let summary = aggregate(entries, start, end).unwrap();
        assert_eq!(summary.best_streak, 2);
    }

    #[test]
    fn weight_change_uses_chronological_endpoints() {
        let entries = vec![
            entry(3, false, Some(70.0), None),
            entry(7, true, Some(68.0), Some(20)),
        ];
        let (start, end) = march();
        let summary = aggregate(entries, start, end).unwrap();
        assert_eq!(summary.weight_change, Some(-2.0));
    }

    #[test]
    fn fewer_than_two_weight_samples_yield_none() {
        let (start, end) = march();

        let one = vec![entry(4, true, Some(75.5), Some(30))];
        assert_eq!(aggregate(one, start, end).unwrap().weight_change, None);

        let zero = vec![entry(4, true, None, Some(30))];
        assert_eq!(aggregate(zero, start, end).unwrap().weight_change, None);
    }

    #[test]
    fn out_of_order_input_matches_sorted_input() {
        let shuffled = vec![
            entry(20, true, Some(78.0), Some(60)),
            entry(1, true, Some(80.0), Some(30)),
            entry(5, false, None, None),
        ];
        let (start, end) = march();
        let summary = aggregate(shuffled, start, end).unwrap();
        // Chronologically: done(1), missed(5), done(20) — never consecutive.
        assert_eq!(summary.best_streak, 1);
        // First weight is day 1 (80), last is day 20 (78), despite caller order.
        assert_eq!(summary.weight_change, Some(-2.0));
        // Echoed entries keep caller order.
        assert_eq!(summary.entries[0].entry_date, date(20));
    }

    #[test]
    fn missing_duration_counts_as_zero() {
        let entries = vec![
            entry(1, true, None, None),
            entry(2, true, None, Some(50)),
        ];
        let (start, end) = march();
        let summary = aggregate(entries, start, end).unwrap();
        assert_eq!(summary.total_workout_minutes, 50);
        assert_eq!(summary.average_workout_minutes, 25);
    }

    #[test]
    fn uncompleted_durations_are_not_summed() {
        let entries = vec![
            entry(1, false, None, Some(90)),
            entry(2, true, None, Some(30)),
        ];
        let (start, end) = march();
        let summary = aggregate(entries, start, end).unwrap();
        assert_eq!(summary.total_workout_minutes, 30);
    }

    #[test]
    fn average_is_rounded_to_nearest_minute() {
        let entries = vec![
            entry(1, true, None, Some(10)),
            entry(2, true, None, Some(11)),
        ];
        let (start, end) = march();
        let summary = aggregate(entries, start, end).unwrap();
        // 21 / 2 = 10.5 → 11
        assert_eq!(summary.average_workout_minutes, 11);
    }

    #[test]
    fn result_bounds_hold() {
        let entries = vec![
            entry(1, true, None, Some(30)),
            entry(2, true, None, None),
            entry(3, false, None, None),
            entry(4, true, None, Some(45)),
        ];
        let n = entries.len() as u32;
        let (start, end) = march();
        let summary = aggregate(entries, start, end).unwrap();
        assert!(summary.best_streak <= summary.workouts_completed);
        assert!(summary.workouts_completed <= n);
        // average * count within rounding distance of the total
        let reconstructed = summary.average_workout_minutes * summary.workouts_completed;
        let diff = reconstructed.abs_diff(summary.total_workout_minutes);
        assert!(diff * 2 <= summary.workouts_completed);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let (start, end) = march();
        let err = aggregate(vec![], end, start).unwrap_err();
        assert_eq!(
            err,
            ReportError::InvalidRange {
                start: end,
                end: start
            }
        );
    }

    #[test]
    fn month_bounds_handles_leap_years() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let summary = aggregate(vec![], start, end).unwrap();
        assert_eq!(summary.days_in_month, 29);

        let (_, feb_2023) = month_bounds(2023, 2).unwrap();
        assert_eq!(feb_2023, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn month_bounds_rejects_bad_months() {
        assert!(month_bounds(2024, 0).is_err());
        assert!(month_bounds(2024, 13).is_err());
    }
}

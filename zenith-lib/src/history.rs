//src/history.rs
//! Read-side computations over completed workouts.
use crate::catalog;
use crate::model::{Exercise, Workout};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

const PREVIEW_LEN: usize = 3;

/// Workouts of one calendar month, in collection order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    /// e.g. "January 2024".
    pub label: String,
    pub workouts: Vec<Workout>,
}

/// Groups by calendar month in `tz`. Groups appear in order of their first
/// workout in `workouts` (newest-first for the history collection).
pub fn month_groups<Tz: TimeZone>(workouts: &[Workout], tz: &Tz) -> Vec<MonthGroup>
where
    Tz::Offset: std::fmt::Display,
{
    let mut groups: Vec<MonthGroup> = Vec::new();
    for workout in workouts {
        let local = workout.date.with_timezone(tz);
        let (year, month) = (local.year(), local.month());
        match groups.iter_mut().find(|g| g.year == year && g.month == month) {
            Some(group) => group.workouts.push(workout.clone()),
            None => groups.push(MonthGroup {
                year,
                month,
                label: local.format("%B %Y").to_string(),
                workouts: vec![workout.clone()],
            }),
        }
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorkoutStats {
    pub total_sets: usize,
    pub completed_sets: usize,
    /// Σ weight × reps over every set, completed or not.
    pub total_volume: f64,
}

pub fn workout_stats(workout: &Workout) -> WorkoutStats {
    workout
        .exercises
        .iter()
        .flat_map(|e| e.sets.iter())
        .fold(WorkoutStats::default(), |acc, set| WorkoutStats {
            total_sets: acc.total_sets + 1,
            completed_sets: acc.completed_sets + usize::from(set.completed),
            total_volume: acc.total_volume + set.weight * f64::from(set.reps),
        })
}

/// Latest `date` among completed workouts containing the exercise.
pub fn last_performed(workouts: &[Workout], exercise_id: &str) -> Option<DateTime<Utc>> {
    workouts
        .iter()
        .filter(|w| w.completed && w.contains_exercise(exercise_id))
        .map(|w| w.date)
        .max()
}

/// Calendar-day difference bucketed into a human label. Dates after `today`
/// read as "Today".
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days().max(0);
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => plural(days / 7, "week"),
        30..=364 => plural(days / 30, "month"),
        _ => plural(days / 365, "year"),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// `TODAY`, `YESTERDAY`, or a short date like `Mon, Jan 15`.
pub fn history_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        0 => "TODAY".to_string(),
        1 => "YESTERDAY".to_string(),
        _ => date.format("%a, %b %-d").to_string(),
    }
}

/// `"{h}h {m}m"` from an hour up, `"{m} min"` below. Empty when absent or zero.
pub fn format_duration(seconds: Option<i64>) -> String {
    match seconds {
        Some(s) if s > 0 => {
            let (hours, minutes) = (s / 3600, (s % 3600) / 60);
            if hours > 0 {
                format!("{hours}h {minutes}m")
            } else {
                format!("{minutes} min")
            }
        }
        _ => String::new(),
    }
}

/// Names of the first few exercises, then `+N more`. Unknown ids are skipped.
pub fn exercise_preview(workout: &Workout, catalog: &[Exercise]) -> String {
    let mut parts: Vec<String> = workout
        .exercises
        .iter()
        .take(PREVIEW_LEN)
        .filter_map(|we| catalog::find(catalog, &we.exercise_id))
        .map(|e| e.name.clone())
        .collect();
    if workout.exercises.len() > PREVIEW_LEN {
        parts.push(format!("+{} more", workout.exercises.len() - PREVIEW_LEN));
    }
    parts.join(", ")
}

/// Removes a workout from history. Returns `None` if the id is unknown.
pub fn without_workout(workouts: &[Workout], workout_id: &str) -> Option<Vec<Workout>> {
    workouts.iter().any(|w| w.id == workout_id).then(|| {
        workouts
            .iter()
            .filter(|w| w.id != workout_id)
            .cloned()
            .collect()
    })
}

//src/derivation.rs
use crate::model::{generate_id, TemplateDay, Workout, WorkoutExercise, WorkoutTemplate};
use crate::template::TemplateError;
use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// An empty session named after the weekday it starts on in `tz`.
pub fn empty_workout<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Workout {
    let weekday = now.with_timezone(tz).weekday();
    Workout {
        id: generate_id(),
        name: format!("{} Workout", weekday_name(weekday)),
        date: now,
        start_time: Some(now),
        exercises: Vec::new(),
        completed: false,
        duration: None,
        template_id: None,
        template_day_id: None,
    }
}

/// Display name of a session started from `day`.
pub fn workout_name(template: &WorkoutTemplate, day: &TemplateDay) -> String {
    if template.days.len() > 1 {
        format!("{} - {}", template.name, day.name)
    } else {
        template.name.clone()
    }
}

/// Builds a session from one template day: one exercise per assigned slot, each
/// with `set_count` zeroed sets and a link back to its slot.
pub fn workout_from_day(template: &WorkoutTemplate, day: &TemplateDay, now: DateTime<Utc>) -> Workout {
    let exercises: Vec<WorkoutExercise> = day
        .assigned_slots()
        .map(|(exercise_id, slot)| WorkoutExercise::from_slot(exercise_id, slot))
        .collect();
    Workout {
        id: generate_id(),
        name: workout_name(template, day),
        date: now,
        start_time: Some(now),
        exercises,
        completed: false,
        duration: None,
        template_id: Some(template.id.clone()),
        template_day_id: Some(day.id.clone()),
    }
}

/// Resolves which day to start. Single-day templates need no choice.
/// # Errors
/// - `TemplateError::DayRequired` if a multi-day template is started without a day.
/// - `TemplateError::DayNotFound` if the chosen day index is out of range.
pub fn resolve_day(template: &WorkoutTemplate, day_index: Option<usize>) -> Result<&TemplateDay, TemplateError> {
    match (template.days.len(), day_index) {
        (0, _) => Err(TemplateError::DayNotFound(template.id.clone())),
        (1, None) => Ok(&template.days[0]),
        (count, None) => Err(TemplateError::DayRequired(template.name.clone(), count)),
        (_, Some(index)) => template
            .days
            .get(index)
            .ok_or_else(|| TemplateError::DayNotFound(format!("#{}", index + 1))),
    }
}

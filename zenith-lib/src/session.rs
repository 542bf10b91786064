//src/session.rs
//! Rules for the in-progress workout. Every operation takes the current workout by
//! reference and returns the next one; persisting it is the caller's job.
use crate::model::{SetUpdate, Workout, WorkoutExercise, WorkoutSet, WorkoutTemplate};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("No workout in progress.")]
    NoActiveWorkout,
    #[error("A workout is already in progress: '{0}'. Finish or cancel it first.")]
    AlreadyActive(String),
    #[error("Exercise not found in workout: {0}")]
    ExerciseNotFound(String),
    #[error("Set not found: {0}")]
    SetNotFound(String),
    #[error("Cannot remove the only remaining set of an exercise.")]
    LastSet,
    #[error("Invalid weight: {0}. Weight must be zero or more.")]
    InvalidWeight(f64),
    #[error("Complete every set before finishing the workout.")]
    NotAllSetsCompleted,
    #[error("Every set is completed; finish the workout instead of cancelling.")]
    AllSetsCompleted,
}

/// Outcome of writing an exercise substitution back to the source template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateWriteBack {
    NotRequested,
    NotFromTemplate,
    Updated,
    /// The template no longer lines up with the workout; nothing was changed.
    Skipped(String),
}

/// Appends an exercise with one zeroed set. Returns the new entry's id.
pub fn add_exercise(workout: &Workout, exercise_id: &str) -> (Workout, String) {
    let entry = WorkoutExercise::with_fresh_sets(exercise_id, 1);
    let id = entry.id.clone();
    let mut next = workout.clone();
    next.exercises.push(entry);
    (next, id)
}

/// # Errors
/// Returns `SessionError::ExerciseNotFound` if no entry has the id.
pub fn remove_exercise(workout: &Workout, workout_exercise_id: &str) -> Result<Workout, SessionError> {
    ensure_exercise(workout, workout_exercise_id)?;
    let mut next = workout.clone();
    next.exercises.retain(|e| e.id != workout_exercise_id);
    Ok(next)
}

/// Appends a set seeded with the weight and reps of the exercise's last set.
/// # Errors
/// Returns `SessionError::ExerciseNotFound` if no entry has the id.
pub fn add_set(workout: &Workout, workout_exercise_id: &str) -> Result<Workout, SessionError> {
    map_exercise(workout, workout_exercise_id, |entry| {
        let (weight, reps) = entry.sets.last().map_or((0.0, 0), |s| (s.weight, s.reps));
        entry.sets.push(WorkoutSet::seeded(weight, reps));
        Ok(())
    })
}

/// Removes a set, keeping the order of the rest.
/// # Errors
/// - `SessionError::LastSet` if it is the only set left.
/// - `SessionError::ExerciseNotFound` / `SetNotFound` for unknown ids.
pub fn remove_set(workout: &Workout, workout_exercise_id: &str, set_id: &str) -> Result<Workout, SessionError> {
    map_exercise(workout, workout_exercise_id, |entry| {
        if !entry.sets.iter().any(|s| s.id == set_id) {
            return Err(SessionError::SetNotFound(set_id.to_string()));
        }
        if entry.sets.len() <= 1 {
            return Err(SessionError::LastSet);
        }
        entry.sets.retain(|s| s.id != set_id);
        Ok(())
    })
}

/// Applies a partial update to one set. With `auto_match_weight`, a weight in the
/// update is copied onto every set of the exercise.
/// # Errors
/// - `SessionError::InvalidWeight` for negative or non-finite weights.
/// - `SessionError::ExerciseNotFound` / `SetNotFound` for unknown ids.
pub fn update_set(
    workout: &Workout,
    workout_exercise_id: &str,
    set_id: &str,
    update: SetUpdate,
    auto_match_weight: bool,
) -> Result<Workout, SessionError> {
    if let Some(weight) = update.weight {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SessionError::InvalidWeight(weight));
        }
    }
    map_exercise(workout, workout_exercise_id, |entry| {
        if !entry.sets.iter().any(|s| s.id == set_id) {
            return Err(SessionError::SetNotFound(set_id.to_string()));
        }
        for set in &mut entry.sets {
            if set.id == set_id {
                apply_update(set, update);
            } else if auto_match_weight {
                if let Some(weight) = update.weight {
                    set.weight = weight;
                }
            }
        }
        Ok(())
    })
}

fn apply_update(set: &mut WorkoutSet, update: SetUpdate) {
    if let Some(weight) = update.weight {
        set.weight = weight;
    }
    if let Some(reps) = update.reps {
        set.reps = reps;
    }
    if let Some(completed) = update.completed {
        set.completed = completed;
    }
}

/// Swaps the exercise of an entry and zeroes all of its sets. The entry keeps
/// its link to the template slot it came from.
/// # Errors
/// Returns `SessionError::ExerciseNotFound` if no entry has the id.
pub fn replace_exercise(
    workout: &Workout,
    workout_exercise_id: &str,
    new_exercise_id: &str,
) -> Result<Workout, SessionError> {
    map_exercise(workout, workout_exercise_id, |entry| {
        entry.exercise_id = new_exercise_id.to_string();
        for set in &mut entry.sets {
            set.weight = 0.0;
            set.reps = 0;
            set.completed = false;
        }
        Ok(())
    })
}

/// Renames the workout; blank input keeps the current name.
pub fn rename(workout: &Workout, name: &str) -> Workout {
    let trimmed = name.trim();
    let mut next = workout.clone();
    if !trimmed.is_empty() {
        next.name = trimmed.to_string();
    }
    next
}

/// False for a workout without exercises.
pub fn all_sets_completed(workout: &Workout) -> bool {
    !workout.exercises.is_empty()
        && workout
            .exercises
            .iter()
            .all(|e| e.sets.iter().all(|s| s.completed))
}

/// Whole seconds between `from` and `to`, floored, never negative.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().max(0).div_euclid(1000)
}

pub fn elapsed_seconds(workout: &Workout, now: DateTime<Utc>) -> i64 {
    seconds_between(workout.started_at(), now)
}

/// `H:MM:SS`.
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Completes the workout, stamping its duration.
/// # Errors
/// Returns `SessionError::NotAllSetsCompleted` while any set is open.
pub fn finish(workout: &Workout, now: DateTime<Utc>) -> Result<Workout, SessionError> {
    if !all_sets_completed(workout) {
        return Err(SessionError::NotAllSetsCompleted);
    }
    let mut done = workout.clone();
    done.duration = Some(elapsed_seconds(workout, now));
    done.completed = true;
    Ok(done)
}

/// # Errors
/// Returns `SessionError::AllSetsCompleted` once the workout can be finished.
pub fn ensure_cancellable(workout: &Workout) -> Result<(), SessionError> {
    if all_sets_completed(workout) {
        Err(SessionError::AllSetsCompleted)
    } else {
        Ok(())
    }
}

/// Points the template slot the entry was derived from at `new_exercise_id`.
/// Skipped when the entry has no slot link, or the template, day or slot is gone.
pub fn write_back(
    templates: &[WorkoutTemplate],
    workout: &Workout,
    workout_exercise_id: &str,
    new_exercise_id: &str,
) -> (Option<Vec<WorkoutTemplate>>, TemplateWriteBack) {
    let (Some(template_id), Some(day_id)) = (&workout.template_id, &workout.template_day_id) else {
        return (None, TemplateWriteBack::NotFromTemplate);
    };
    let Some(entry) = workout.find_exercise(workout_exercise_id) else {
        return skipped(format!("exercise {workout_exercise_id} is not in the workout"));
    };
    let Some(slot_id) = &entry.template_slot_id else {
        return skipped(format!(
            "{} was added during the workout and has no template slot",
            entry.exercise_id
        ));
    };
    let Some(template) = templates.iter().find(|t| &t.id == template_id) else {
        return skipped(format!("template {template_id} no longer exists"));
    };
    let Some(day) = template.find_day(day_id) else {
        return skipped(format!("day {day_id} no longer exists in '{}'", template.name));
    };
    if !day.flattened_slots().any(|slot| &slot.id == slot_id) {
        return skipped(format!(
            "the slot for {} was removed from '{}'",
            entry.exercise_id, day.name
        ));
    }

    let updated = templates
        .iter()
        .map(|t| {
            let mut t = t.clone();
            if &t.id == template_id {
                let slots = t
                    .days
                    .iter_mut()
                    .filter(|d| &d.id == day_id)
                    .flat_map(|d| d.muscle_groups.iter_mut())
                    .flat_map(|mg| mg.exercises.iter_mut());
                for slot in slots.filter(|s| &s.id == slot_id) {
                    slot.exercise_id = Some(new_exercise_id.to_string());
                }
            }
            t
        })
        .collect();
    (Some(updated), TemplateWriteBack::Updated)
}

fn skipped(reason: String) -> (Option<Vec<WorkoutTemplate>>, TemplateWriteBack) {
    tracing::warn!("Template write-back skipped: {reason}");
    (None, TemplateWriteBack::Skipped(reason))
}

fn ensure_exercise(workout: &Workout, workout_exercise_id: &str) -> Result<(), SessionError> {
    workout
        .find_exercise(workout_exercise_id)
        .map(|_| ())
        .ok_or_else(|| SessionError::ExerciseNotFound(workout_exercise_id.to_string()))
}

fn map_exercise(
    workout: &Workout,
    workout_exercise_id: &str,
    f: impl FnOnce(&mut WorkoutExercise) -> Result<(), SessionError>,
) -> Result<Workout, SessionError> {
    let mut next = workout.clone();
    let entry = next
        .exercises
        .iter_mut()
        .find(|e| e.id == workout_exercise_id)
        .ok_or_else(|| SessionError::ExerciseNotFound(workout_exercise_id.to_string()))?;
    f(entry)?;
    Ok(next)
}

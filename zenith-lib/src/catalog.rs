//src/catalog.rs
//! Exercise directory: built-in defaults merged with the user's own records.
use crate::model::{generate_id, is_default_exercise, Exercise, ExerciseType, MuscleGroup};
use strum::IntoEnumIterator;
use thiserror::Error;

mod defaults;

pub use defaults::default_exercises;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Exercise name cannot be empty.")]
    EmptyName,
    #[error("Exercise not found: {0}")]
    ExerciseNotFound(String),
    #[error("Default exercise '{0}' cannot be deleted.")]
    DefaultNotDeletable(String),
    #[error("Exercise '{0}' has no override to reset.")]
    NoOverride(String),
}

/// Fields of a user exercise, without its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub exercise_type: ExerciseType,
    pub notes: String,
}

/// Partial edit of an exercise. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseEdit {
    pub name: Option<String>,
    pub muscle_group: Option<MuscleGroup>,
    pub exercise_type: Option<ExerciseType>,
    pub notes: Option<String>,
}

/// Effective catalog: defaults in declared order with user overrides substituted
/// in place, followed by user-created exercises in creation order.
pub fn merge(defaults: &[Exercise], user: &[Exercise]) -> Vec<Exercise> {
    defaults
        .iter()
        .map(|d| user.iter().find(|u| u.id == d.id).unwrap_or(d).clone())
        .chain(user.iter().filter(|u| !is_default_exercise(&u.id)).cloned())
        .collect()
}

pub fn find<'a>(catalog: &'a [Exercise], id: &str) -> Option<&'a Exercise> {
    catalog.iter().find(|e| e.id == id)
}

/// Case-insensitive name search, optionally limited to one muscle group.
pub fn filter(
    catalog: &[Exercise],
    muscle_group: Option<MuscleGroup>,
    search: Option<&str>,
) -> Vec<Exercise> {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    catalog
        .iter()
        .filter(|e| muscle_group.map_or(true, |mg| e.muscle_group == mg))
        .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Groups exercises by muscle group in declaration order, skipping empty groups.
pub fn group_by_muscle(exercises: &[Exercise]) -> Vec<(MuscleGroup, Vec<Exercise>)> {
    MuscleGroup::iter()
        .filter_map(|mg| {
            let members: Vec<Exercise> = exercises
                .iter()
                .filter(|e| e.muscle_group == mg)
                .cloned()
                .collect();
            (!members.is_empty()).then_some((mg, members))
        })
        .collect()
}

/// Appends a new user exercise.
/// # Errors
/// Returns `CatalogError::EmptyName` if the trimmed name is empty.
pub fn create_exercise(
    user: &[Exercise],
    new: NewExercise,
) -> Result<(Vec<Exercise>, Exercise), CatalogError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(CatalogError::EmptyName);
    }
    let exercise = Exercise {
        id: generate_id(),
        name: name.to_string(),
        muscle_group: new.muscle_group,
        exercise_type: new.exercise_type,
        notes: new.notes.trim().to_string(),
    };
    let mut updated = user.to_vec();
    updated.push(exercise.clone());
    Ok((updated, exercise))
}

/// Edits a user exercise in place, or materializes an override for a default.
/// # Errors
/// - `CatalogError::ExerciseNotFound` if the id is in neither collection.
/// - `CatalogError::EmptyName` if a provided name trims to empty.
pub fn edit_exercise(
    user: &[Exercise],
    defaults: &[Exercise],
    id: &str,
    edit: ExerciseEdit,
) -> Result<Vec<Exercise>, CatalogError> {
    let current = find(user, id)
        .or_else(|| find(defaults, id))
        .ok_or_else(|| CatalogError::ExerciseNotFound(id.to_string()))?;

    let name = match edit.name.as_deref().map(str::trim) {
        Some("") => return Err(CatalogError::EmptyName),
        Some(n) => n.to_string(),
        None => current.name.clone(),
    };
    let edited = Exercise {
        id: current.id.clone(),
        name,
        muscle_group: edit.muscle_group.unwrap_or(current.muscle_group),
        exercise_type: edit.exercise_type.unwrap_or(current.exercise_type),
        notes: edit
            .notes
            .map_or_else(|| current.notes.clone(), |n| n.trim().to_string()),
    };
    Ok(upsert(user, edited))
}

/// Deletes a user-created exercise.
/// # Errors
/// - `CatalogError::DefaultNotDeletable` for default ids (use `reset_exercise`).
/// - `CatalogError::ExerciseNotFound` if no user record has the id.
pub fn delete_exercise(user: &[Exercise], id: &str) -> Result<Vec<Exercise>, CatalogError> {
    if is_default_exercise(id) {
        return Err(CatalogError::DefaultNotDeletable(id.to_string()));
    }
    if find(user, id).is_none() {
        return Err(CatalogError::ExerciseNotFound(id.to_string()));
    }
    Ok(user.iter().filter(|e| e.id != id).cloned().collect())
}

/// Drops the user override of a default exercise, restoring the built-in record.
/// # Errors
/// Returns `CatalogError::NoOverride` if `id` is not an overridden default.
pub fn reset_exercise(user: &[Exercise], id: &str) -> Result<Vec<Exercise>, CatalogError> {
    if !is_default_exercise(id) || find(user, id).is_none() {
        return Err(CatalogError::NoOverride(id.to_string()));
    }
    Ok(user.iter().filter(|e| e.id != id).cloned().collect())
}

/// Sets an exercise note. A default without an override gets one, carrying the
/// default's other fields. Returns `None` when the id is unknown.
pub fn with_note(user: &[Exercise], defaults: &[Exercise], id: &str, text: &str) -> Option<Vec<Exercise>> {
    if find(user, id).is_some() {
        return Some(
            user.iter()
                .map(|e| {
                    if e.id == id {
                        Exercise {
                            notes: text.to_string(),
                            ..e.clone()
                        }
                    } else {
                        e.clone()
                    }
                })
                .collect(),
        );
    }
    let default = find(defaults, id)?;
    let mut updated = user.to_vec();
    updated.push(Exercise {
        notes: text.to_string(),
        ..default.clone()
    });
    Some(updated)
}

/// Clears a note on a user record. Pristine defaults have nothing to clear.
pub fn without_note(user: &[Exercise], id: &str) -> Option<Vec<Exercise>> {
    find(user, id)?;
    Some(
        user.iter()
            .map(|e| {
                if e.id == id {
                    Exercise {
                        notes: String::new(),
                        ..e.clone()
                    }
                } else {
                    e.clone()
                }
            })
            .collect(),
    )
}

fn upsert(user: &[Exercise], exercise: Exercise) -> Vec<Exercise> {
    if find(user, &exercise.id).is_some() {
        user.iter()
            .map(|e| if e.id == exercise.id { exercise.clone() } else { e.clone() })
            .collect()
    } else {
        let mut updated = user.to_vec();
        updated.push(exercise);
        updated
    }
}

//src/model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumIter;

/// Prefix that marks an exercise id as part of the built-in catalog.
pub const DEFAULT_ID_PREFIX: &str = "default-";

pub const MIN_SET_COUNT: u32 = 1;
pub const MAX_SET_COUNT: u32 = 20;
pub const DEFAULT_SET_COUNT: u32 = 3;

/// Generates a fresh record id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[must_use]
pub fn is_default_exercise(exercise_id: &str) -> bool {
    exercise_id.starts_with(DEFAULT_ID_PREFIX)
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Abs,
    Traps,
}

impl MuscleGroup {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Chest => "Chest",
            Self::Back => "Back",
            Self::Shoulders => "Shoulders",
            Self::Biceps => "Biceps",
            Self::Triceps => "Triceps",
            Self::Forearms => "Forearms",
            Self::Quads => "Quads",
            Self::Hamstrings => "Hamstrings",
            Self::Glutes => "Glutes",
            Self::Calves => "Calves",
            Self::Abs => "Abs",
            Self::Traps => "Traps",
        }
    }

    const fn wire_name(self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Biceps => "biceps",
            Self::Triceps => "triceps",
            Self::Forearms => "forearms",
            Self::Quads => "quads",
            Self::Hamstrings => "hamstrings",
            Self::Glutes => "glutes",
            Self::Calves => "calves",
            Self::Abs => "abs",
            Self::Traps => "traps",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}


#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseType {
    Barbell,
    Dumbbell,
    Machine,
    MachineAssistance,
    SmithMachine,
    Cable,
    Freemotion,
    Bodyweight,
    LoadedBodyweight,
}

impl ExerciseType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Barbell => "Barbell",
            Self::Dumbbell => "Dumbbell",
            Self::Machine => "Machine",
            Self::MachineAssistance => "Machine Assistance",
            Self::SmithMachine => "Smith Machine",
            Self::Cable => "Cable",
            Self::Freemotion => "Freemotion",
            Self::Bodyweight => "Bodyweight",
            Self::LoadedBodyweight => "Loaded Bodyweight",
        }
    }

    const fn wire_name(self) -> &'static str {
        match self {
            Self::Barbell => "barbell",
            Self::Dumbbell => "dumbbell",
            Self::Machine => "machine",
            Self::MachineAssistance => "machine-assistance",
            Self::SmithMachine => "smith-machine",
            Self::Cable => "cable",
            Self::Freemotion => "freemotion",
            Self::Bodyweight => "bodyweight",
            Self::LoadedBodyweight => "loaded-bodyweight",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub exercise_type: ExerciseType,
    #[serde(default)]
    pub notes: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub id: String,
    pub weight: f64,
    pub reps: u32,
    pub completed: bool,
}

impl WorkoutSet {
    /// A zeroed, uncompleted set.
    pub fn fresh() -> Self {
        Self::seeded(0.0, 0)
    }

    pub fn seeded(weight: f64, reps: u32) -> Self {
        Self {
            id: generate_id(),
            weight,
            reps,
            completed: false,
        }
    }
}

/// Partial update applied to a single set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetUpdate {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub completed: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub id: String,
    pub exercise_id: String,
    pub sets: Vec<WorkoutSet>,
    /// Template slot this entry was derived from; `None` for exercises added
    /// during the workout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_slot_id: Option<String>,
}

impl WorkoutExercise {
    /// A new exercise entry with `set_count` zeroed sets (at least one).
    pub fn with_fresh_sets(exercise_id: &str, set_count: u32) -> Self {
        Self {
            id: generate_id(),
            exercise_id: exercise_id.to_string(),
            sets: (0..set_count.max(1)).map(|_| WorkoutSet::fresh()).collect(),
            template_slot_id: None,
        }
    }

    /// Entry for an assigned template slot, linked back to it.
    pub fn from_slot(exercise_id: &str, slot: &TemplateExercise) -> Self {
        Self {
            template_slot_id: Some(slot.id.clone()),
            ..Self::with_fresh_sets(exercise_id, slot.set_count)
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    pub exercises: Vec<WorkoutExercise>,
    pub completed: bool,
    /// Seconds, set on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_day_id: Option<String>,
}

impl Workout {
    /// Session start, falling back to `date` for records written without one.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.start_time.unwrap_or(self.date)
    }

    pub fn find_exercise(&self, workout_exercise_id: &str) -> Option<&WorkoutExercise> {
        self.exercises.iter().find(|e| e.id == workout_exercise_id)
    }

    pub fn contains_exercise(&self, exercise_id: &str) -> bool {
        self.exercises.iter().any(|e| e.exercise_id == exercise_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExercise {
    pub id: String,
    pub exercise_id: Option<String>,
    pub set_count: u32,
}

impl TemplateExercise {
    pub fn empty_slot() -> Self {
        Self {
            id: generate_id(),
            exercise_id: None,
            set_count: DEFAULT_SET_COUNT,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMuscleGroup {
    pub id: String,
    pub muscle_group: MuscleGroup,
    pub exercises: Vec<TemplateExercise>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDay {
    pub id: String,
    pub name: String,
    pub muscle_groups: Vec<TemplateMuscleGroup>,
}

impl TemplateDay {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            muscle_groups: Vec::new(),
        }
    }

    /// Slots in display order, flattened across muscle-group blocks.
    pub fn flattened_slots(&self) -> impl Iterator<Item = &TemplateExercise> {
        self.muscle_groups.iter().flat_map(|mg| mg.exercises.iter())
    }

    /// Slots with an assigned exercise, paired with that exercise id.
    pub fn assigned_slots(&self) -> impl Iterator<Item = (&str, &TemplateExercise)> {
        self.flattened_slots()
            .filter_map(|slot| slot.exercise_id.as_deref().map(|id| (id, slot)))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    pub id: String,
    pub name: String,
    pub days: Vec<TemplateDay>,
}

impl WorkoutTemplate {
    pub fn find_day(&self, day_id: &str) -> Option<&TemplateDay> {
        self.days.iter().find(|d| d.id == day_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_match_weight: bool,
}

/// Uncommitted template edit, persisted so that work survives restarts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftTemplate {
    pub name: String,
    pub days: Vec<TemplateDay>,
    pub active_day_index: usize,
}

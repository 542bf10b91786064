//src/template.rs
use crate::model::{
    generate_id, DraftTemplate, Exercise, MuscleGroup, TemplateDay, TemplateExercise,
    TemplateMuscleGroup, WorkoutTemplate, MAX_SET_COUNT, MIN_SET_COUNT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Please enter a template name")]
    EmptyName,
    #[error("Please add at least one exercise to the template")]
    NoExercises,
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("Template day not found: {0}")]
    DayNotFound(String),
    #[error("Template '{0}' has {1} days; choose one to start")]
    DayRequired(String, usize),
    #[error("No template draft in progress")]
    NoDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Counts shown next to a template in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateSummary {
    pub exercise_count: usize,
    pub set_count: u32,
    pub day_count: usize,
}

/// In-progress template edit. Mutations that target the "active day" only touch
/// `days[active_day_index]`; unknown ids are ignored.
///
/// There is always at least one day and the active index points at one of them.
/// Stored state is normalized on the way in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", from = "StoredEditor")]
pub struct TemplateEditor {
    /// Id of the template being edited; `None` while creating a new one.
    #[serde(skip_serializing_if = "Option::is_none")]
    template_id: Option<String>,
    name: String,
    days: Vec<TemplateDay>,
    active_day_index: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEditor {
    #[serde(default)]
    template_id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    days: Vec<TemplateDay>,
    #[serde(default)]
    active_day_index: usize,
}

impl From<StoredEditor> for TemplateEditor {
    fn from(stored: StoredEditor) -> Self {
        Self {
            template_id: stored.template_id,
            name: stored.name,
            days: stored.days,
            active_day_index: stored.active_day_index,
        }
        .normalized()
    }
}

impl Default for TemplateEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEditor {
    /// Blank editor with a single empty "Day 1".
    pub fn new() -> Self {
        Self {
            template_id: None,
            name: String::new(),
            days: vec![TemplateDay::named("Day 1")],
            active_day_index: 0,
        }
    }

    pub fn from_template(template: &WorkoutTemplate) -> Self {
        let days = if template.days.is_empty() {
            vec![TemplateDay::named("Day 1")]
        } else {
            template.days.clone()
        };
        Self {
            template_id: Some(template.id.clone()),
            name: template.name.clone(),
            days,
            active_day_index: 0,
        }
    }

    pub fn from_draft(draft: DraftTemplate) -> Self {
        Self {
            template_id: None,
            name: draft.name,
            days: draft.days,
            active_day_index: draft.active_day_index,
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        if self.days.is_empty() {
            self.days.push(TemplateDay::named("Day 1"));
        }
        self.active_day_index = self.active_day_index.min(self.days.len() - 1);
        self
    }

    pub fn to_draft(&self) -> DraftTemplate {
        DraftTemplate {
            name: self.name.clone(),
            days: self.days.clone(),
            active_day_index: self.active_day_index,
        }
    }

    pub const fn is_new(&self) -> bool {
        self.template_id.is_none()
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn days(&self) -> &[TemplateDay] {
        &self.days
    }

    pub const fn active_day_index(&self) -> usize {
        self.active_day_index
    }

    pub fn active_day(&self) -> &TemplateDay {
        &self.days[self.active_day_index]
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    // ========== Days ==========

    /// Appends `Day N` and makes it active. Returns its id.
    pub fn add_day(&mut self) -> String {
        let day = TemplateDay::named(format!("Day {}", self.days.len() + 1));
        let id = day.id.clone();
        self.days.push(day);
        self.active_day_index = self.days.len() - 1;
        id
    }

    /// Removes the day at `index`. The last remaining day cannot be removed.
    pub fn remove_day(&mut self, index: usize) -> bool {
        if self.days.len() <= 1 || index >= self.days.len() {
            return false;
        }
        self.days.remove(index);
        if self.active_day_index >= self.days.len() {
            self.active_day_index = self.days.len() - 1;
        } else if self.active_day_index > index {
            self.active_day_index -= 1;
        }
        true
    }

    pub fn select_day(&mut self, index: usize) -> bool {
        if index >= self.days.len() {
            return false;
        }
        self.active_day_index = index;
        true
    }

    pub fn rename_day(&mut self, index: usize, name: &str) -> bool {
        let trimmed = name.trim();
        match self.days.get_mut(index) {
            Some(day) if !trimmed.is_empty() => {
                day.name = trimmed.to_string();
                true
            }
            _ => false,
        }
    }

    // ========== Muscle groups ==========

    /// Adds a block with one empty slot to the active day. Returns the block id.
    pub fn add_muscle_group(&mut self, muscle_group: MuscleGroup) -> String {
        let block = TemplateMuscleGroup {
            id: generate_id(),
            muscle_group,
            exercises: vec![TemplateExercise::empty_slot()],
        };
        let id = block.id.clone();
        self.active_day_mut().muscle_groups.push(block);
        id
    }

    pub fn remove_muscle_group(&mut self, muscle_group_id: &str) -> bool {
        let groups = &mut self.active_day_mut().muscle_groups;
        let before = groups.len();
        groups.retain(|mg| mg.id != muscle_group_id);
        groups.len() != before
    }

    /// Swaps a block with its neighbour. No-op at the bounds.
    pub fn move_muscle_group(&mut self, muscle_group_id: &str, direction: MoveDirection) -> bool {
        let groups = &mut self.active_day_mut().muscle_groups;
        let Some(current) = groups.iter().position(|mg| mg.id == muscle_group_id) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up if current > 0 => current - 1,
            MoveDirection::Down if current + 1 < groups.len() => current + 1,
            _ => return false,
        };
        groups.swap(current, target);
        true
    }

    // ========== Slots ==========

    /// Adds another empty slot to a block. Returns the slot id.
    pub fn add_slot(&mut self, muscle_group_id: &str) -> Option<String> {
        let block = self.block_mut(muscle_group_id)?;
        let slot = TemplateExercise::empty_slot();
        let id = slot.id.clone();
        block.exercises.push(slot);
        Some(id)
    }

    pub fn remove_slot(&mut self, muscle_group_id: &str, slot_id: &str) -> bool {
        let Some(block) = self.block_mut(muscle_group_id) else {
            return false;
        };
        let before = block.exercises.len();
        block.exercises.retain(|ex| ex.id != slot_id);
        block.exercises.len() != before
    }

    /// Assigns an exercise to a slot.
    pub fn select_exercise(&mut self, muscle_group_id: &str, slot_id: &str, exercise_id: &str) -> bool {
        match self.slot_mut(muscle_group_id, slot_id) {
            Some(slot) => {
                slot.exercise_id = Some(exercise_id.to_string());
                true
            }
            None => false,
        }
    }

    /// Adjusts a slot's set count by `delta`, clamped to the allowed range.
    pub fn adjust_set_count(&mut self, muscle_group_id: &str, slot_id: &str, delta: i32) -> Option<u32> {
        let slot = self.slot_mut(muscle_group_id, slot_id)?;
        let next = i64::from(slot.set_count) + i64::from(delta);
        let clamped = next.clamp(i64::from(MIN_SET_COUNT), i64::from(MAX_SET_COUNT));
        slot.set_count = u32::try_from(clamped).unwrap_or(MIN_SET_COUNT);
        Some(slot.set_count)
    }

    /// Exercises a slot of the given block may be assigned. Empty for unknown blocks.
    pub fn candidates<'a>(&self, muscle_group_id: &str, catalog: &'a [Exercise]) -> Vec<&'a Exercise> {
        let Some(group) = self
            .active_day()
            .muscle_groups
            .iter()
            .find(|mg| mg.id == muscle_group_id)
            .map(|mg| mg.muscle_group)
        else {
            return Vec::new();
        };
        catalog.iter().filter(|e| e.muscle_group == group).collect()
    }

    // ========== Save ==========

    /// Validates the edit and produces the template to persist, with unassigned
    /// slots and then empty blocks stripped.
    /// # Errors
    /// - `TemplateError::EmptyName` if the trimmed name is empty.
    /// - `TemplateError::NoExercises` if no slot has an assigned exercise.
    pub fn build(&self) -> Result<WorkoutTemplate, TemplateError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyName);
        }
        let has_exercises = self
            .days
            .iter()
            .any(|day| day.flattened_slots().any(|ex| ex.exercise_id.is_some()));
        if !has_exercises {
            return Err(TemplateError::NoExercises);
        }
        Ok(WorkoutTemplate {
            id: self.template_id.clone().unwrap_or_else(generate_id),
            name: name.to_string(),
            days: self.days.iter().map(prune_day).collect(),
        })
    }

    fn active_day_mut(&mut self) -> &mut TemplateDay {
        let index = self.active_day_index;
        &mut self.days[index]
    }

    fn block_mut(&mut self, muscle_group_id: &str) -> Option<&mut TemplateMuscleGroup> {
        self.active_day_mut()
            .muscle_groups
            .iter_mut()
            .find(|mg| mg.id == muscle_group_id)
    }

    fn slot_mut(&mut self, muscle_group_id: &str, slot_id: &str) -> Option<&mut TemplateExercise> {
        self.block_mut(muscle_group_id)?
            .exercises
            .iter_mut()
            .find(|ex| ex.id == slot_id)
    }
}

fn prune_day(day: &TemplateDay) -> TemplateDay {
    TemplateDay {
        muscle_groups: day
            .muscle_groups
            .iter()
            .map(|mg| TemplateMuscleGroup {
                exercises: mg
                    .exercises
                    .iter()
                    .filter(|ex| ex.exercise_id.is_some())
                    .cloned()
                    .collect(),
                ..mg.clone()
            })
            .filter(|mg| !mg.exercises.is_empty())
            .collect(),
        ..day.clone()
    }
}

/// Replaces the template with the same id in place, or prepends a new one.
pub fn upsert_template(templates: &[WorkoutTemplate], template: WorkoutTemplate) -> Vec<WorkoutTemplate> {
    if templates.iter().any(|t| t.id == template.id) {
        templates
            .iter()
            .map(|t| if t.id == template.id { template.clone() } else { t.clone() })
            .collect()
    } else {
        std::iter::once(template)
            .chain(templates.iter().cloned())
            .collect()
    }
}

pub fn summarize(template: &WorkoutTemplate) -> TemplateSummary {
    let assigned = template
        .days
        .iter()
        .flat_map(TemplateDay::flattened_slots)
        .filter(|ex| ex.exercise_id.is_some());
    let (exercise_count, set_count) =
        assigned.fold((0, 0), |(count, sets), ex| (count + 1, sets + ex.set_count));
    TemplateSummary {
        exercise_count,
        set_count,
        day_count: template.days.len(),
    }
}

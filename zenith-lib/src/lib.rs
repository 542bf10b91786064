// src/lib.rs
use anyhow::{bail, Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error, info};

// --- Declare modules ---
pub mod catalog;
mod config;
pub mod derivation;
pub mod history;
pub mod model;
pub mod repository;
pub mod session;
pub mod store;
pub mod template;

// --- Expose public types ---
pub use catalog::{CatalogError, ExerciseEdit, NewExercise};
pub use config::{
    get_config_path as get_config_path_util, load_config as load_config_util, parse_color,
    save_config as save_config_util, Config, Error as ConfigError, StandardColor, Theme,
    WeightUnit, DEFAULT_KEY_PREFIX,
};
pub use history::{MonthGroup, WorkoutStats};
pub use model::{
    DraftTemplate, Exercise, ExerciseType, MuscleGroup, SetUpdate, Settings, TemplateDay,
    TemplateExercise, TemplateMuscleGroup, Workout, WorkoutExercise, WorkoutSet, WorkoutTemplate,
};
pub use repository::{Repository, SubscriptionId};
pub use session::{SessionError, TemplateWriteBack};
pub use store::{
    get_db_path as get_db_path_util, Error as StoreError, KeyValueStore, MemoryStore,
    SqliteStore, StoreWrite,
};
pub use template::{MoveDirection, TemplateEditor, TemplateError, TemplateSummary};

/// Storage key names, joined to the configured prefix.
pub mod keys {
    pub const EXERCISES: &str = "exercises";
    pub const WORKOUTS: &str = "workouts";
    pub const ACTIVE_WORKOUT: &str = "active_workout";
    pub const TEMPLATES: &str = "templates";
    pub const DRAFT_TEMPLATE: &str = "draft_template";
    /// Editor state while changing an existing template.
    pub const TEMPLATE_EDIT: &str = "template_edit";
    pub const SETTINGS: &str = "settings";
}

pub struct AppService {
    pub config: Config,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
    store: Rc<dyn KeyValueStore>,
    defaults: Vec<Exercise>,
    exercises: Repository<Vec<Exercise>>,
    workouts: Repository<Vec<Workout>>,
    active_workout: Repository<Option<Workout>>,
    templates: Repository<Vec<WorkoutTemplate>>,
    draft: Repository<Option<DraftTemplate>>,
    template_edit: Repository<Option<TemplateEditor>>,
    settings: Repository<Settings>,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or opening the store fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load_config(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {config_path:?}"))?;

        let db_path = store::get_db_path().context("Failed to determine database path")?;
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        Ok(Self::with_store(config, Rc::new(store), db_path, config_path))
    }

    /// Builds the service over an already opened store.
    pub fn with_store(
        config: Config,
        store: Rc<dyn KeyValueStore>,
        db_path: PathBuf,
        config_path: PathBuf,
    ) -> Self {
        let exercises = Repository::load(store.clone(), config.key(keys::EXERCISES), Vec::new());
        let workouts = Repository::load(store.clone(), config.key(keys::WORKOUTS), Vec::new());
        let active_workout = Repository::load(store.clone(), config.key(keys::ACTIVE_WORKOUT), None);
        let templates = Repository::load(store.clone(), config.key(keys::TEMPLATES), Vec::new());
        let draft = Repository::load(store.clone(), config.key(keys::DRAFT_TEMPLATE), None);
        let template_edit = Repository::load(store.clone(), config.key(keys::TEMPLATE_EDIT), None);
        let settings = Repository::load(store.clone(), config.key(keys::SETTINGS), Settings::default());
        Self {
            config,
            db_path,
            config_path,
            store,
            defaults: catalog::default_exercises(),
            exercises,
            workouts,
            active_workout,
            templates,
            draft,
            template_edit,
            settings,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save_config(&self.config_path, &self.config)
    }

    /// Re-reads every key after another process wrote to the store. Returns the
    /// keys whose value changed.
    pub fn reload(&mut self) -> Vec<String> {
        let mut changed = Vec::new();
        let mut track = |reloaded: bool, key: &str| {
            if reloaded {
                changed.push(key.to_string());
            }
        };
        track(self.exercises.reload(), self.exercises.key());
        track(self.workouts.reload(), self.workouts.key());
        track(self.active_workout.reload(), self.active_workout.key());
        track(self.templates.reload(), self.templates.key());
        track(self.draft.reload(), self.draft.key());
        track(self.template_edit.reload(), self.template_edit.key());
        track(self.settings.reload(), self.settings.key());
        changed
    }

    /// Calls `listener` whenever the active workout changes, from this process or
    /// after a [`reload`](Self::reload).
    pub fn subscribe_active_workout(
        &mut self,
        listener: impl Fn(&Option<Workout>) + 'static,
    ) -> SubscriptionId {
        self.active_workout.subscribe(listener)
    }

    pub fn unsubscribe_active_workout(&mut self, id: SubscriptionId) -> bool {
        self.active_workout.unsubscribe(id)
    }

    // ========== Settings ==========

    pub fn settings(&self) -> Settings {
        *self.settings.get()
    }

    pub fn set_auto_match_weight(&mut self, enabled: bool) {
        self.settings.set(Settings {
            auto_match_weight: enabled,
        });
    }

    // ========== Exercise catalog ==========

    /// The effective catalog, merged on every call.
    pub fn exercises(&self) -> Vec<Exercise> {
        catalog::merge(&self.defaults, self.exercises.get())
    }

    pub fn list_exercises(
        &self,
        muscle_group: Option<MuscleGroup>,
        search: Option<&str>,
    ) -> Vec<Exercise> {
        catalog::filter(&self.exercises(), muscle_group, search)
    }

    pub fn find_exercise(&self, id: &str) -> Option<Exercise> {
        catalog::find(&self.exercises(), id).cloned()
    }

    /// Looks an exercise up by id, then by case-insensitive name.
    /// # Errors
    /// Returns `CatalogError::ExerciseNotFound` if neither matches.
    pub fn resolve_exercise(&self, identifier: &str) -> Result<Exercise> {
        let all = self.exercises();
        let wanted = identifier.trim();
        all.iter()
            .find(|e| e.id == wanted)
            .or_else(|| all.iter().find(|e| e.name.eq_ignore_ascii_case(wanted)))
            .cloned()
            .ok_or_else(|| CatalogError::ExerciseNotFound(identifier.to_string()).into())
    }

    /// # Errors
    /// Returns `CatalogError::EmptyName` for a blank name.
    pub fn create_exercise(&mut self, new: NewExercise) -> Result<Exercise> {
        let (updated, exercise) = catalog::create_exercise(self.exercises.get(), new)?;
        self.exercises.set(updated);
        info!(id = %exercise.id, "Created exercise '{}'", exercise.name);
        Ok(exercise)
    }

    /// # Errors
    /// Returns `CatalogError` for unknown ids or a blank name.
    pub fn edit_exercise(&mut self, id: &str, edit: ExerciseEdit) -> Result<()> {
        let updated = catalog::edit_exercise(self.exercises.get(), &self.defaults, id, edit)?;
        self.exercises.set(updated);
        Ok(())
    }

    /// # Errors
    /// Returns `CatalogError` for default or unknown ids.
    pub fn delete_exercise(&mut self, id: &str) -> Result<()> {
        let updated = catalog::delete_exercise(self.exercises.get(), id)?;
        self.exercises.set(updated);
        Ok(())
    }

    /// # Errors
    /// Returns `CatalogError::NoOverride` unless `id` is an overridden default.
    pub fn reset_exercise(&mut self, id: &str) -> Result<()> {
        let updated = catalog::reset_exercise(self.exercises.get(), id)?;
        self.exercises.set(updated);
        Ok(())
    }

    /// # Errors
    /// Returns `CatalogError::ExerciseNotFound` for unknown ids.
    pub fn update_exercise_note(&mut self, id: &str, text: &str) -> Result<()> {
        let Some(updated) = catalog::with_note(self.exercises.get(), &self.defaults, id, text)
        else {
            bail!(CatalogError::ExerciseNotFound(id.to_string()));
        };
        self.exercises.set(updated);
        Ok(())
    }

    /// Clears a note. Returns `false` when there was no user record to clear.
    pub fn clear_exercise_note(&mut self, id: &str) -> bool {
        match catalog::without_note(self.exercises.get(), id) {
            Some(updated) => {
                self.exercises.set(updated);
                true
            }
            None => false,
        }
    }

    pub fn last_performed(&self, exercise_id: &str) -> Option<DateTime<Utc>> {
        history::last_performed(self.workouts.get(), exercise_id)
    }

    // ========== Templates ==========

    pub fn templates(&self) -> &[WorkoutTemplate] {
        self.templates.get()
    }

    /// # Errors
    /// Returns `TemplateError::TemplateNotFound` for unknown ids.
    pub fn find_template(&self, id: &str) -> Result<&WorkoutTemplate> {
        self.templates
            .get()
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TemplateError::TemplateNotFound(id.to_string()).into())
    }

    /// # Errors
    /// Returns `TemplateError::TemplateNotFound` for unknown ids.
    pub fn delete_template(&mut self, id: &str) -> Result<()> {
        self.find_template(id)?;
        self.templates
            .update(|all| all.iter().filter(|t| t.id != id).cloned().collect());
        Ok(())
    }

    /// The open editor: an edit of an existing template, else the new-template draft.
    pub fn current_editor(&self) -> Option<TemplateEditor> {
        self.template_edit
            .get()
            .clone()
            .or_else(|| self.draft.get().clone().map(TemplateEditor::from_draft))
    }

    /// Opens the new-template editor, resuming the draft if one is stored. Any
    /// open edit of an existing template is dropped.
    pub fn begin_new_template(&mut self) -> TemplateEditor {
        if self.template_edit.get().is_some() {
            info!("Closing the open template edit to start a new template");
            self.template_edit.set(None);
        }
        let editor = self
            .draft
            .get()
            .clone()
            .map_or_else(TemplateEditor::new, TemplateEditor::from_draft);
        self.persist_editor(&editor);
        editor
    }

    /// Opens an existing template for editing. The new-template draft is untouched.
    /// # Errors
    /// Returns `TemplateError::TemplateNotFound` for unknown ids.
    pub fn begin_edit_template(&mut self, id: &str) -> Result<TemplateEditor> {
        let editor = TemplateEditor::from_template(self.find_template(id)?);
        self.persist_editor(&editor);
        Ok(editor)
    }

    /// Applies `f` to the open editor and persists the result.
    /// # Errors
    /// Returns `TemplateError::NoDraft` when no editor is open.
    pub fn update_editor<R>(&mut self, f: impl FnOnce(&mut TemplateEditor) -> R) -> Result<R> {
        let mut editor = self.current_editor().ok_or(TemplateError::NoDraft)?;
        let result = f(&mut editor);
        self.persist_editor(&editor);
        Ok(result)
    }

    /// Writes editor state: new templates go to the draft key, edits of an
    /// existing template to their own key.
    pub fn persist_editor(&mut self, editor: &TemplateEditor) {
        if editor.is_new() {
            self.draft.set(Some(editor.to_draft()));
        } else {
            self.template_edit.set(Some(editor.clone()));
        }
    }

    /// Validates and stores the open editor's template, then closes the editor.
    /// # Errors
    /// - `TemplateError::NoDraft` when no editor is open.
    /// - `TemplateError::EmptyName` / `NoExercises` on validation failure.
    pub fn save_editor(&mut self) -> Result<WorkoutTemplate> {
        let editor = self.current_editor().ok_or(TemplateError::NoDraft)?;
        let template = editor.build()?;
        self.templates
            .update(|all| template::upsert_template(all, template.clone()));
        if editor.is_new() {
            self.draft.set(None);
        } else {
            self.template_edit.set(None);
        }
        info!(id = %template.id, "Saved template '{}'", template.name);
        Ok(template)
    }

    /// Closes the open editor without saving. Returns `false` if none was open.
    pub fn discard_editor(&mut self) -> bool {
        if self.template_edit.get().is_some() {
            self.template_edit.set(None);
            true
        } else if self.draft.get().is_some() {
            self.draft.set(None);
            true
        } else {
            false
        }
    }

    // ========== Active workout ==========

    pub fn active_workout(&self) -> Option<&Workout> {
        self.active_workout.get().as_ref()
    }

    fn require_active(&self) -> Result<&Workout, SessionError> {
        self.active_workout().ok_or(SessionError::NoActiveWorkout)
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.active_workout() {
            Some(active) => Err(SessionError::AlreadyActive(active.name.clone())),
            None => Ok(()),
        }
    }

    fn set_active(&mut self, workout: Workout) {
        self.active_workout.set(Some(workout));
    }

    /// Starts an empty workout named after the weekday of `now` in `tz`.
    /// # Errors
    /// Returns `SessionError::AlreadyActive` while another workout is in progress.
    pub fn start_empty_workout<Tz: TimeZone>(&mut self, now: DateTime<Utc>, tz: &Tz) -> Result<Workout> {
        self.ensure_idle()?;
        let workout = derivation::empty_workout(now, tz);
        info!(id = %workout.id, "Started workout '{}'", workout.name);
        self.set_active(workout.clone());
        Ok(workout)
    }

    /// Starts a workout from one day of a template.
    /// # Errors
    /// - `SessionError::AlreadyActive` while another workout is in progress.
    /// - `TemplateError` for unknown templates, or a missing/invalid day choice.
    pub fn start_template_workout(
        &mut self,
        template_id: &str,
        day_index: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<Workout> {
        self.ensure_idle()?;
        let template = self.find_template(template_id)?;
        let day = derivation::resolve_day(template, day_index)?;
        let workout = derivation::workout_from_day(template, day, now);
        info!(id = %workout.id, "Started workout '{}' from template", workout.name);
        self.set_active(workout.clone());
        Ok(workout)
    }

    /// # Errors
    /// Returns `SessionError::NoActiveWorkout` when idle.
    pub fn rename_workout(&mut self, name: &str) -> Result<()> {
        let next = session::rename(self.require_active()?, name);
        self.set_active(next);
        Ok(())
    }

    /// Adds a catalog exercise with one empty set. Returns the entry id.
    /// # Errors
    /// - `SessionError::NoActiveWorkout` when idle.
    /// - `CatalogError::ExerciseNotFound` if the exercise is not in the catalog.
    pub fn add_exercise_to_workout(&mut self, exercise_id: &str) -> Result<String> {
        let active = self.require_active()?;
        if self.find_exercise(exercise_id).is_none() {
            bail!(CatalogError::ExerciseNotFound(exercise_id.to_string()));
        }
        let (next, entry_id) = session::add_exercise(active, exercise_id);
        self.set_active(next);
        Ok(entry_id)
    }

    /// # Errors
    /// Returns `SessionError` when idle or for an unknown entry.
    pub fn remove_exercise_from_workout(&mut self, workout_exercise_id: &str) -> Result<()> {
        let next = session::remove_exercise(self.require_active()?, workout_exercise_id)?;
        self.set_active(next);
        Ok(())
    }

    /// # Errors
    /// Returns `SessionError` when idle or for an unknown entry.
    pub fn add_set(&mut self, workout_exercise_id: &str) -> Result<()> {
        let next = session::add_set(self.require_active()?, workout_exercise_id)?;
        self.set_active(next);
        Ok(())
    }

    /// # Errors
    /// Returns `SessionError` when idle, for unknown ids, or for the last set.
    pub fn remove_set(&mut self, workout_exercise_id: &str, set_id: &str) -> Result<()> {
        let next = session::remove_set(self.require_active()?, workout_exercise_id, set_id)?;
        self.set_active(next);
        Ok(())
    }

    /// Updates one set, honouring the auto-match-weight setting.
    /// # Errors
    /// Returns `SessionError` when idle, for unknown ids, or an invalid weight.
    pub fn update_set(&mut self, workout_exercise_id: &str, set_id: &str, update: SetUpdate) -> Result<()> {
        let auto_match = self.settings.get().auto_match_weight;
        let next = session::update_set(
            self.require_active()?,
            workout_exercise_id,
            set_id,
            update,
            auto_match,
        )?;
        self.set_active(next);
        Ok(())
    }

    /// Swaps the exercise of an entry, resetting its sets. With `update_template`
    /// the template slot the entry came from is repointed too, if it still exists.
    /// # Errors
    /// - `SessionError` when idle or for an unknown entry.
    /// - `CatalogError::ExerciseNotFound` if the new exercise is not in the catalog.
    pub fn replace_exercise(
        &mut self,
        workout_exercise_id: &str,
        new_exercise_id: &str,
        update_template: bool,
    ) -> Result<TemplateWriteBack> {
        let active = self.require_active()?;
        if self.find_exercise(new_exercise_id).is_none() {
            bail!(CatalogError::ExerciseNotFound(new_exercise_id.to_string()));
        }
        let next = session::replace_exercise(active, workout_exercise_id, new_exercise_id)?;

        let outcome = if update_template {
            let (templates, outcome) =
                session::write_back(self.templates.get(), active, workout_exercise_id, new_exercise_id);
            if let Some(templates) = templates {
                self.templates.set(templates);
            }
            outcome
        } else {
            TemplateWriteBack::NotRequested
        };
        self.set_active(next);
        Ok(outcome)
    }

    /// # Errors
    /// Returns `SessionError::NoActiveWorkout` when idle.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> Result<i64> {
        Ok(session::elapsed_seconds(self.require_active()?, now))
    }

    /// Completes the active workout, prepends it to history and clears the active
    /// slot. Both writes go through one batch.
    /// # Errors
    /// - `SessionError::NoActiveWorkout` when idle.
    /// - `SessionError::NotAllSetsCompleted` while any set is open.
    pub fn finish_workout(&mut self, now: DateTime<Utc>) -> Result<Workout> {
        let done = session::finish(self.require_active()?, now)?;
        let history: Vec<Workout> = std::iter::once(done.clone())
            .chain(self.workouts.get().iter().cloned())
            .collect();

        if self.store.is_transactional() {
            let writes = vec![
                self.workouts
                    .stage(&history)
                    .context("Failed to encode workout history")?,
                self.active_workout
                    .stage(&None)
                    .context("Failed to encode active workout")?,
            ];
            let persisted = match self.store.apply(&writes) {
                Ok(()) => true,
                Err(e) => {
                    error!("Error saving finished workout: {e}");
                    false
                }
            };
            self.workouts.accept(history, persisted);
            self.active_workout.accept(None, persisted);
        } else {
            // History first: a crash in between leaves a duplicate, never a loss.
            self.workouts.set(history);
            self.active_workout.set(None);
        }
        info!(id = %done.id, duration = ?done.duration, "Finished workout '{}'", done.name);
        Ok(done)
    }

    /// Discards the active workout. Callers confirm with the user first.
    /// # Errors
    /// - `SessionError::NoActiveWorkout` when idle.
    /// - `SessionError::AllSetsCompleted` once it can be finished instead.
    pub fn cancel_workout(&mut self) -> Result<Workout> {
        let active = self.require_active()?.clone();
        session::ensure_cancellable(&active)?;
        self.active_workout.set(None);
        debug!(id = %active.id, "Cancelled workout");
        Ok(active)
    }

    // ========== History ==========

    /// Completed workouts, newest first.
    pub fn history(&self) -> &[Workout] {
        self.workouts.get()
    }

    /// # Errors
    /// Returns an error if no workout in history has the id.
    pub fn find_history_workout(&self, id: &str) -> Result<&Workout> {
        match self.workouts.get().iter().find(|w| w.id == id) {
            Some(workout) => Ok(workout),
            None => bail!("Workout not found in history: {id}"),
        }
    }

    /// Removes a workout from history. Callers confirm with the user first.
    /// # Errors
    /// Returns an error if no workout in history has the id.
    pub fn delete_history_workout(&mut self, id: &str) -> Result<()> {
        let Some(updated) = history::without_workout(self.workouts.get(), id) else {
            bail!("Workout not found in history: {id}");
        };
        self.workouts.set(updated);
        Ok(())
    }

    pub fn history_by_month<Tz: TimeZone>(&self, tz: &Tz) -> Vec<MonthGroup>
    where
        Tz::Offset: std::fmt::Display,
    {
        history::month_groups(self.workouts.get(), tz)
    }
}

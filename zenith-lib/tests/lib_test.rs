use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::rc::Rc;
use zenith_lib::{
    catalog, derivation, history, template, AppService, CatalogError, Config, ExerciseEdit, ExerciseType,
    KeyValueStore, MemoryStore, MoveDirection, MuscleGroup, NewExercise, Repository,
    SessionError, SetUpdate, SqliteStore, StoreError, TemplateEditor, TemplateError,
    TemplateSummary, TemplateWriteBack, WorkoutTemplate,
};

const BENCH: &str = "default-bench-press";
const DB_BENCH: &str = "default-dumbbell-bench-press";
const SQUAT: &str = "default-squats";
const CURL: &str = "default-barbell-curl";
const DEADLIFT: &str = "default-deadlift";

// Helper function to create a test service over an in-memory database
fn create_test_service() -> Result<AppService> {
    let store = SqliteStore::open_in_memory()?;
    Ok(service_over(Rc::new(store)))
}

fn service_over(store: Rc<dyn KeyValueStore>) -> AppService {
    AppService::with_store(
        Config::default(),
        store,
        ":memory:".into(),
        "test_config.toml".into(),
    )
}

fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .unwrap()
        .with_timezone(&Utc)
}

fn push_blocks(editor: &mut TemplateEditor, blocks: &[(MuscleGroup, &str)]) {
    for (muscle_group, exercise_id) in blocks {
        let block = editor.add_muscle_group(*muscle_group);
        let slot = editor.active_day().muscle_groups.last().unwrap().exercises[0]
            .id
            .clone();
        editor.select_exercise(&block, &slot, exercise_id);
    }
}

fn create_template(
    service: &mut AppService,
    name: &str,
    days: &[&[(MuscleGroup, &str)]],
) -> Result<WorkoutTemplate> {
    service.begin_new_template();
    service.update_editor(|editor| {
        editor.rename(name);
        for (index, blocks) in days.iter().enumerate() {
            if index > 0 {
                editor.add_day();
            }
            push_blocks(editor, blocks);
        }
    })?;
    service.save_editor()
}

/// Marks every set of the active workout completed with the given numbers.
fn complete_all_sets(service: &mut AppService, weight: f64, reps: u32) -> Result<()> {
    let active = service.active_workout().unwrap().clone();
    for entry in &active.exercises {
        for set in &entry.sets {
            service.update_set(
                &entry.id,
                &set.id,
                SetUpdate {
                    weight: Some(weight),
                    reps: Some(reps),
                    completed: Some(true),
                },
            )?;
        }
    }
    Ok(())
}

// ========== Catalog ==========

#[test]
fn test_catalog_merge_user_record_wins_and_is_idempotent() -> Result<()> {
    let mut service = create_test_service()?;
    service.edit_exercise(
        BENCH,
        ExerciseEdit {
            name: Some("Flat Bench".to_string()),
            ..Default::default()
        },
    )?;

    let merged = service.exercises();
    let benches: Vec<_> = merged.iter().filter(|e| e.id == BENCH).collect();
    assert_eq!(benches.len(), 1);
    assert_eq!(benches[0].name, "Flat Bench");
    // Override stays at the default's position.
    assert_eq!(merged[0].id, BENCH);

    let defaults = catalog::default_exercises();
    let again = catalog::merge(&defaults, &merged);
    assert_eq!(again, merged);
    Ok(())
}

#[test]
fn test_create_exercise_appends_after_defaults() -> Result<()> {
    let mut service = create_test_service()?;
    let created = service.create_exercise(NewExercise {
        name: "  Landmine Press ".to_string(),
        muscle_group: MuscleGroup::Shoulders,
        exercise_type: ExerciseType::Barbell,
        notes: " keep elbows in ".to_string(),
    })?;
    assert_eq!(created.name, "Landmine Press");
    assert_eq!(created.notes, "keep elbows in");
    assert_eq!(service.exercises().last().unwrap().id, created.id);

    let err = service
        .create_exercise(NewExercise {
            name: "   ".to_string(),
            muscle_group: MuscleGroup::Chest,
            exercise_type: ExerciseType::Cable,
            notes: String::new(),
        })
        .unwrap_err();
    assert_eq!(err.downcast_ref::<CatalogError>(), Some(&CatalogError::EmptyName));
    Ok(())
}

#[test]
fn test_filter_and_resolve_exercises() -> Result<()> {
    let service = create_test_service()?;
    let curls = service.list_exercises(Some(MuscleGroup::Biceps), Some("CURL"));
    assert!(!curls.is_empty());
    assert!(curls
        .iter()
        .all(|e| e.muscle_group == MuscleGroup::Biceps && e.name.to_lowercase().contains("curl")));

    assert_eq!(service.resolve_exercise("bench press")?.id, BENCH);
    assert_eq!(service.resolve_exercise(SQUAT)?.name, "Squats");
    assert!(service.resolve_exercise("Underwater Basket Press").is_err());
    Ok(())
}

#[test]
fn test_group_by_muscle_follows_declaration_order() -> Result<()> {
    let service = create_test_service()?;
    let all = service.exercises();
    let picked: Vec<_> = [SQUAT, CURL, BENCH, DB_BENCH]
        .iter()
        .filter_map(|id| catalog::find(&all, id).cloned())
        .collect();

    let groups = catalog::group_by_muscle(&picked);
    let order: Vec<MuscleGroup> = groups.iter().map(|(mg, _)| *mg).collect();
    assert_eq!(
        order,
        vec![MuscleGroup::Chest, MuscleGroup::Biceps, MuscleGroup::Quads]
    );
    let chest: Vec<&str> = groups[0].1.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(chest, vec![BENCH, DB_BENCH]);
    Ok(())
}

#[test]
fn test_slot_candidates_match_the_block_muscle_group() -> Result<()> {
    let service = create_test_service()?;
    let all = service.exercises();
    let mut editor = TemplateEditor::new();
    editor.add_muscle_group(MuscleGroup::Chest);
    let biceps = editor.add_muscle_group(MuscleGroup::Biceps);

    let candidates = editor.candidates(&biceps, &all);
    let expected = all
        .iter()
        .filter(|e| e.muscle_group == MuscleGroup::Biceps)
        .count();
    assert_eq!(candidates.len(), expected);
    assert!(candidates.iter().any(|e| e.id == CURL));
    assert!(candidates.iter().all(|e| e.muscle_group == MuscleGroup::Biceps));
    assert!(editor.candidates("missing", &all).is_empty());
    Ok(())
}

#[test]
fn test_template_summary_counts_assigned_slots_only() {
    let mut editor = TemplateEditor::new();
    let chest = editor.add_muscle_group(MuscleGroup::Chest);
    let slot = editor.active_day().muscle_groups[0].exercises[0].id.clone();
    editor.select_exercise(&chest, &slot, BENCH);
    editor.adjust_set_count(&chest, &slot, 1);
    editor.add_slot(&chest);
    editor.add_day();
    push_blocks(&mut editor, &[(MuscleGroup::Quads, SQUAT)]);

    let unsaved = WorkoutTemplate {
        id: "t1".to_string(),
        name: "Split".to_string(),
        days: editor.days().to_vec(),
    };
    let summary = template::summarize(&unsaved);
    assert_eq!(
        summary,
        TemplateSummary {
            exercise_count: 2,
            set_count: 7,
            day_count: 2,
        }
    );
}

#[test]
fn test_default_exercises_cannot_be_deleted_but_can_be_reset() -> Result<()> {
    let mut service = create_test_service()?;
    let err = service.delete_exercise(BENCH).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::DefaultNotDeletable(_))
    ));

    service.update_exercise_note(BENCH, "Pause on chest")?;
    assert_eq!(service.find_exercise(BENCH).unwrap().notes, "Pause on chest");

    service.reset_exercise(BENCH)?;
    assert_eq!(service.find_exercise(BENCH).unwrap().notes, "");
    assert!(service.reset_exercise(BENCH).is_err());
    Ok(())
}

#[test]
fn test_user_exercises_can_be_deleted() -> Result<()> {
    let mut service = create_test_service()?;
    let created = service.create_exercise(NewExercise {
        name: "Sled Push".to_string(),
        muscle_group: MuscleGroup::Quads,
        exercise_type: ExerciseType::Machine,
        notes: String::new(),
    })?;
    service.delete_exercise(&created.id)?;
    assert!(service.find_exercise(&created.id).is_none());
    assert!(service.delete_exercise(&created.id).is_err());
    Ok(())
}

#[test]
fn test_clearing_a_note_only_touches_user_records() -> Result<()> {
    let mut service = create_test_service()?;
    // Pristine default: nothing to clear, no override created.
    assert!(!service.clear_exercise_note(SQUAT));
    assert_eq!(service.exercises(), catalog::default_exercises());

    service.update_exercise_note(SQUAT, "Belt on top set")?;
    assert!(service.clear_exercise_note(SQUAT));
    // The cleared override still supersedes the default.
    assert_eq!(service.find_exercise(SQUAT).unwrap().notes, "");
    assert!(service.update_exercise_note("nope", "x").is_err());
    Ok(())
}

// ========== Templates ==========

#[test]
fn test_template_save_with_empty_name_is_rejected() -> Result<()> {
    let mut service = create_test_service()?;
    service.begin_new_template();
    service.update_editor(|editor| {
        editor.rename("   ");
        push_blocks(editor, &[(MuscleGroup::Chest, BENCH)]);
    })?;

    let err = service.save_editor().unwrap_err();
    assert_eq!(err.downcast_ref::<TemplateError>(), Some(&TemplateError::EmptyName));
    assert_eq!(err.to_string(), "Please enter a template name");
    assert!(service.templates().is_empty());
    // The draft survives a failed save.
    assert!(service.current_editor().is_some());
    Ok(())
}

#[test]
fn test_template_save_with_only_empty_slots_is_rejected() -> Result<()> {
    let mut service = create_test_service()?;
    service.begin_new_template();
    service.update_editor(|editor| {
        editor.rename("Push");
        editor.add_muscle_group(MuscleGroup::Chest);
        editor.add_muscle_group(MuscleGroup::Triceps);
    })?;
    let err = service.save_editor().unwrap_err();
    assert_eq!(err.downcast_ref::<TemplateError>(), Some(&TemplateError::NoExercises));
    assert_eq!(
        err.to_string(),
        "Please add at least one exercise to the template"
    );
    Ok(())
}

#[test]
fn test_template_save_prunes_empty_slots_and_groups() -> Result<()> {
    let mut service = create_test_service()?;
    service.begin_new_template();
    service.update_editor(|editor| {
        editor.rename("Upper");
        editor.add_muscle_group(MuscleGroup::Back);
        let chest = editor.add_muscle_group(MuscleGroup::Chest);
        let first = editor.active_day().muscle_groups[1].exercises[0].id.clone();
        editor.select_exercise(&chest, &first, BENCH);
        editor.add_slot(&chest);
    })?;
    let saved = service.save_editor()?;

    let groups = &saved.days[0].muscle_groups;
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].muscle_group, MuscleGroup::Chest);
    assert_eq!(groups[0].exercises.len(), 1);
    assert_eq!(groups[0].exercises[0].exercise_id.as_deref(), Some(BENCH));
    assert!(service.current_editor().is_none());
    Ok(())
}

#[test]
fn test_new_templates_are_prepended_and_edits_replace_in_place() -> Result<()> {
    let mut service = create_test_service()?;
    let first = create_template(&mut service, "Push", &[&[(MuscleGroup::Chest, BENCH)]])?;
    let second = create_template(&mut service, "Legs", &[&[(MuscleGroup::Quads, SQUAT)]])?;
    let ids: Vec<&str> = service.templates().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    service.begin_edit_template(&first.id)?;
    service.update_editor(|editor| editor.rename("Push Day"))?;
    service.save_editor()?;
    assert_eq!(service.templates().len(), 2);
    assert_eq!(service.templates()[1].name, "Push Day");
    assert_eq!(service.templates()[1].id, first.id);
    Ok(())
}

#[test]
fn test_draft_is_resumed_and_untouched_by_template_edits() -> Result<()> {
    let store: Rc<dyn KeyValueStore> = Rc::new(SqliteStore::open_in_memory()?);
    let mut service = service_over(store.clone());
    let existing = create_template(&mut service, "Pull", &[&[(MuscleGroup::Back, DEADLIFT)]])?;

    service.begin_new_template();
    service.update_editor(|editor| {
        editor.rename("Work in progress");
        editor.add_day();
    })?;

    // A fresh service over the same store resumes the draft.
    let mut reopened = service_over(store);
    let draft = reopened.begin_new_template();
    assert_eq!(draft.name(), "Work in progress");
    assert_eq!(draft.days().len(), 2);
    assert_eq!(draft.active_day_index(), 1);

    // Editing an existing template leaves the draft alone.
    reopened.begin_edit_template(&existing.id)?;
    reopened.update_editor(|editor| editor.rename("Pull Heavy"))?;
    reopened.save_editor()?;
    assert_eq!(reopened.current_editor().unwrap().name(), "Work in progress");

    assert!(reopened.discard_editor());
    assert!(reopened.current_editor().is_none());
    assert!(!reopened.discard_editor());
    Ok(())
}

#[test]
fn test_moving_blocks_past_the_bounds_is_a_no_op() {
    let mut editor = TemplateEditor::new();
    let chest = editor.add_muscle_group(MuscleGroup::Chest);
    let back = editor.add_muscle_group(MuscleGroup::Back);
    let order = |e: &TemplateEditor| -> Vec<String> {
        e.active_day().muscle_groups.iter().map(|mg| mg.id.clone()).collect()
    };

    assert!(!editor.move_muscle_group(&chest, MoveDirection::Up));
    assert!(!editor.move_muscle_group(&back, MoveDirection::Down));
    assert!(!editor.move_muscle_group("missing", MoveDirection::Up));
    assert_eq!(order(&editor), vec![chest.clone(), back.clone()]);

    assert!(editor.move_muscle_group(&back, MoveDirection::Up));
    assert_eq!(order(&editor), vec![back, chest]);
}

#[test]
fn test_delete_template() -> Result<()> {
    let mut service = create_test_service()?;
    let template = create_template(&mut service, "Arms", &[&[(MuscleGroup::Biceps, CURL)]])?;
    service.delete_template(&template.id)?;
    assert!(service.templates().is_empty());
    assert!(service.delete_template(&template.id).is_err());
    Ok(())
}

// ========== Derivation ==========

#[test]
fn test_derived_exercises_get_exactly_the_target_sets() -> Result<()> {
    let now = at("2024-03-04T18:00:00Z");
    for set_count in 1..=20 {
        let mut editor = TemplateEditor::new();
        editor.rename("Sets");
        let block = editor.add_muscle_group(MuscleGroup::Chest);
        let slot = editor.active_day().muscle_groups[0].exercises[0].id.clone();
        editor.select_exercise(&block, &slot, BENCH);
        editor.adjust_set_count(&block, &slot, set_count - 3);
        let template = editor.build()?;

        let workout = derivation::workout_from_day(&template, &template.days[0], now);
        let sets = &workout.exercises[0].sets;
        assert_eq!(sets.len(), set_count as usize);
        assert!(sets
            .iter()
            .all(|s| s.weight == 0.0 && s.reps == 0 && !s.completed));
    }
    Ok(())
}

#[test]
fn test_start_template_workout_names_and_links() -> Result<()> {
    let mut service = create_test_service()?;
    let now = at("2024-03-04T18:00:00Z");
    let split = create_template(
        &mut service,
        "PPL",
        &[
            &[(MuscleGroup::Chest, BENCH)],
            &[(MuscleGroup::Back, DEADLIFT), (MuscleGroup::Biceps, CURL)],
        ],
    )?;

    let err = service.start_template_workout(&split.id, None, now).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TemplateError>(),
        Some(TemplateError::DayRequired(_, 2))
    ));
    assert!(service.start_template_workout(&split.id, Some(5), now).is_err());

    let workout = service.start_template_workout(&split.id, Some(1), now)?;
    assert_eq!(workout.name, "PPL - Day 2");
    assert_eq!(workout.template_id.as_deref(), Some(split.id.as_str()));
    assert_eq!(workout.template_day_id.as_deref(), Some(split.days[1].id.as_str()));
    assert_eq!(workout.exercises.len(), 2);
    assert_eq!(workout.start_time, Some(now));
    assert_eq!(workout.date, now);
    Ok(())
}

#[test]
fn test_single_day_template_starts_without_a_choice() -> Result<()> {
    let mut service = create_test_service()?;
    let template = create_template(&mut service, "Legs", &[&[(MuscleGroup::Quads, SQUAT)]])?;
    let workout = service.start_template_workout(&template.id, None, at("2024-03-04T18:00:00Z"))?;
    assert_eq!(workout.name, "Legs");
    Ok(())
}

#[test]
fn test_empty_workout_is_named_after_the_weekday() -> Result<()> {
    let mut service = create_test_service()?;
    // 2024-01-15 was a Monday.
    let workout = service.start_empty_workout(at("2024-01-15T07:30:00Z"), &Utc)?;
    assert_eq!(workout.name, "Monday Workout");
    assert!(workout.exercises.is_empty());

    let err = service
        .start_empty_workout(at("2024-01-15T08:00:00Z"), &Utc)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SessionError>(),
        Some(SessionError::AlreadyActive(_))
    ));
    Ok(())
}

// ========== Session ==========

#[test]
fn test_add_exercise_and_sets() -> Result<()> {
    let mut service = create_test_service()?;
    service.start_empty_workout(at("2024-01-15T07:30:00Z"), &Utc)?;
    let entry = service.add_exercise_to_workout(BENCH)?;
    assert!(service.add_exercise_to_workout("default-unknown").is_err());

    let set = service.active_workout().unwrap().exercises[0].sets[0].clone();
    assert_eq!((set.weight, set.reps, set.completed), (0.0, 0, false));
    service.update_set(
        &entry,
        &set.id,
        SetUpdate {
            weight: Some(135.0),
            reps: Some(8),
            completed: Some(true),
        },
    )?;
    service.add_set(&entry)?;

    let sets = &service.active_workout().unwrap().exercises[0].sets;
    assert_eq!(sets.len(), 2);
    assert_eq!((sets[1].weight, sets[1].reps, sets[1].completed), (135.0, 8, false));

    service.remove_exercise_from_workout(&entry)?;
    assert!(service.active_workout().unwrap().exercises.is_empty());
    Ok(())
}

#[test]
fn test_auto_match_weight_on_updates_every_set() -> Result<()> {
    let mut service = create_test_service()?;
    service.set_auto_match_weight(true);
    let template = create_template(&mut service, "Push", &[&[(MuscleGroup::Chest, BENCH)]])?;
    let workout = service.start_template_workout(&template.id, None, at("2024-01-15T07:30:00Z"))?;
    let entry = &workout.exercises[0];

    service.update_set(
        &entry.id,
        &entry.sets[1].id,
        SetUpdate {
            weight: Some(185.0),
            reps: Some(5),
            ..Default::default()
        },
    )?;
    let sets = &service.active_workout().unwrap().exercises[0].sets;
    assert!(sets.iter().all(|s| s.weight == 185.0));
    assert_eq!(sets.iter().map(|s| s.reps).collect::<Vec<_>>(), vec![0, 5, 0]);
    Ok(())
}

#[test]
fn test_auto_match_weight_off_updates_only_the_target() -> Result<()> {
    let mut service = create_test_service()?;
    assert!(!service.settings().auto_match_weight);
    let template = create_template(&mut service, "Push", &[&[(MuscleGroup::Chest, BENCH)]])?;
    let workout = service.start_template_workout(&template.id, None, at("2024-01-15T07:30:00Z"))?;
    let entry = &workout.exercises[0];

    service.update_set(
        &entry.id,
        &entry.sets[0].id,
        SetUpdate {
            weight: Some(185.0),
            ..Default::default()
        },
    )?;
    let weights: Vec<f64> = service.active_workout().unwrap().exercises[0]
        .sets
        .iter()
        .map(|s| s.weight)
        .collect();
    assert_eq!(weights, vec![185.0, 0.0, 0.0]);

    let err = service
        .update_set(
            &entry.id,
            &entry.sets[0].id,
            SetUpdate {
                weight: Some(-5.0),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<SessionError>(),
        Some(&SessionError::InvalidWeight(-5.0))
    );
    Ok(())
}

#[test]
fn test_remove_set_keeps_order_and_rejects_the_last_one() -> Result<()> {
    let mut service = create_test_service()?;
    let template = create_template(&mut service, "Push", &[&[(MuscleGroup::Chest, BENCH)]])?;
    let workout = service.start_template_workout(&template.id, None, at("2024-01-15T07:30:00Z"))?;
    let entry = workout.exercises[0].clone();
    let ids: Vec<String> = entry.sets.iter().map(|s| s.id.clone()).collect();

    service.remove_set(&entry.id, &ids[1])?;
    let remaining: Vec<String> = service.active_workout().unwrap().exercises[0]
        .sets
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(remaining, vec![ids[0].clone(), ids[2].clone()]);

    service.remove_set(&entry.id, &ids[0])?;
    let err = service.remove_set(&entry.id, &ids[2]).unwrap_err();
    assert_eq!(err.downcast_ref::<SessionError>(), Some(&SessionError::LastSet));
    assert_eq!(service.active_workout().unwrap().exercises[0].sets.len(), 1);
    Ok(())
}

#[test]
fn test_replace_exercise_resets_sets_and_writes_back_to_template() -> Result<()> {
    let mut service = create_test_service()?;
    let template = create_template(
        &mut service,
        "Push",
        &[&[(MuscleGroup::Chest, BENCH), (MuscleGroup::Quads, SQUAT)]],
    )?;
    service.start_template_workout(&template.id, None, at("2024-01-15T07:30:00Z"))?;
    complete_all_sets(&mut service, 100.0, 5)?;

    let entry = service.active_workout().unwrap().exercises[0].id.clone();
    let outcome = service.replace_exercise(&entry, DB_BENCH, true)?;
    assert_eq!(outcome, TemplateWriteBack::Updated);

    let replaced = &service.active_workout().unwrap().exercises[0];
    assert_eq!(replaced.exercise_id, DB_BENCH);
    assert_eq!(replaced.sets.len(), 3);
    assert!(replaced
        .sets
        .iter()
        .all(|s| s.weight == 0.0 && s.reps == 0 && !s.completed));

    let slots: Vec<Option<String>> = service.find_template(&template.id)?.days[0]
        .flattened_slots()
        .map(|s| s.exercise_id.clone())
        .collect();
    assert_eq!(slots, vec![Some(DB_BENCH.to_string()), Some(SQUAT.to_string())]);
    Ok(())
}

#[test]
fn test_replace_without_write_back_leaves_template_alone() -> Result<()> {
    let mut service = create_test_service()?;
    let template = create_template(&mut service, "Push", &[&[(MuscleGroup::Chest, BENCH)]])?;
    service.start_template_workout(&template.id, None, at("2024-01-15T07:30:00Z"))?;
    let entry = service.active_workout().unwrap().exercises[0].id.clone();

    let outcome = service.replace_exercise(&entry, DB_BENCH, false)?;
    assert_eq!(outcome, TemplateWriteBack::NotRequested);
    assert_eq!(service.find_template(&template.id)?, &template);
    Ok(())
}

fn template_slots(service: &AppService, template_id: &str) -> Result<Vec<Option<String>>> {
    Ok(service.find_template(template_id)?.days[0]
        .flattened_slots()
        .map(|s| s.exercise_id.clone())
        .collect())
}

#[test]
fn test_write_back_targets_the_source_slot_after_the_workout_changed() -> Result<()> {
    let mut service = create_test_service()?;
    let template = create_template(
        &mut service,
        "Push",
        &[&[(MuscleGroup::Chest, BENCH), (MuscleGroup::Quads, SQUAT)]],
    )?;
    service.start_template_workout(&template.id, None, at("2024-01-15T07:30:00Z"))?;

    // Same exercise count as the template, but every position has shifted.
    let bench = service.active_workout().unwrap().exercises[0].id.clone();
    service.remove_exercise_from_workout(&bench)?;
    service.add_exercise_to_workout(CURL)?;
    let squats = service.active_workout().unwrap().exercises[0].id.clone();

    let outcome = service.replace_exercise(&squats, "default-front-squat", true)?;
    assert_eq!(outcome, TemplateWriteBack::Updated);
    assert_eq!(
        template_slots(&service, &template.id)?,
        vec![Some(BENCH.to_string()), Some("default-front-squat".to_string())]
    );
    Ok(())
}

#[test]
fn test_write_back_survives_slots_added_to_the_template() -> Result<()> {
    let mut service = create_test_service()?;
    let template = create_template(
        &mut service,
        "Push",
        &[&[(MuscleGroup::Chest, BENCH), (MuscleGroup::Quads, SQUAT)]],
    )?;
    service.start_template_workout(&template.id, None, at("2024-01-15T07:30:00Z"))?;

    service.begin_edit_template(&template.id)?;
    service.update_editor(|editor| push_blocks(editor, &[(MuscleGroup::Back, DEADLIFT)]))?;
    service.save_editor()?;

    let entry = service.active_workout().unwrap().exercises[1].id.clone();
    let outcome = service.replace_exercise(&entry, "default-front-squat", true)?;
    assert_eq!(outcome, TemplateWriteBack::Updated);
    assert_eq!(
        template_slots(&service, &template.id)?,
        vec![
            Some(BENCH.to_string()),
            Some("default-front-squat".to_string()),
            Some(DEADLIFT.to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_write_back_is_skipped_when_the_slot_was_removed() -> Result<()> {
    let mut service = create_test_service()?;
    let template = create_template(
        &mut service,
        "Push",
        &[&[(MuscleGroup::Chest, BENCH), (MuscleGroup::Quads, SQUAT)]],
    )?;
    service.start_template_workout(&template.id, None, at("2024-01-15T07:30:00Z"))?;

    // The squats block is dropped from the template while the workout is running.
    service.begin_edit_template(&template.id)?;
    service.update_editor(|editor| {
        let quads = editor.active_day().muscle_groups[1].id.clone();
        editor.remove_muscle_group(&quads);
    })?;
    let edited = service.save_editor()?;

    let entry = service.active_workout().unwrap().exercises[1].id.clone();
    let outcome = service.replace_exercise(&entry, "default-front-squat", true)?;
    assert_eq!(
        outcome,
        TemplateWriteBack::Skipped(format!("the slot for {SQUAT} was removed from 'Day 1'"))
    );
    assert_eq!(service.find_template(&template.id)?, &edited);
    // The workout itself still changed.
    assert_eq!(
        service.active_workout().unwrap().exercises[1].exercise_id,
        "default-front-squat"
    );
    Ok(())
}

#[test]
fn test_write_back_is_skipped_for_exercises_added_during_the_workout() -> Result<()> {
    let mut service = create_test_service()?;
    let template = create_template(&mut service, "Push", &[&[(MuscleGroup::Chest, BENCH)]])?;
    service.start_template_workout(&template.id, None, at("2024-01-15T07:30:00Z"))?;
    let curl = service.add_exercise_to_workout(CURL)?;

    let outcome = service.replace_exercise(&curl, "default-hammer-curl", true)?;
    assert!(matches!(outcome, TemplateWriteBack::Skipped(_)));
    assert_eq!(service.find_template(&template.id)?, &template);
    Ok(())
}

#[test]
fn test_write_back_for_an_empty_workout_reports_no_template() -> Result<()> {
    let mut service = create_test_service()?;
    service.start_empty_workout(at("2024-01-15T07:30:00Z"), &Utc)?;
    let entry = service.add_exercise_to_workout(BENCH)?;
    assert_eq!(
        service.replace_exercise(&entry, DB_BENCH, true)?,
        TemplateWriteBack::NotFromTemplate
    );
    Ok(())
}

#[test]
fn test_rename_workout_ignores_blank_names() -> Result<()> {
    let mut service = create_test_service()?;
    service.start_empty_workout(at("2024-01-15T07:30:00Z"), &Utc)?;
    service.rename_workout("   ")?;
    assert_eq!(service.active_workout().unwrap().name, "Monday Workout");
    service.rename_workout(" Early lift ")?;
    assert_eq!(service.active_workout().unwrap().name, "Early lift");
    Ok(())
}

#[test]
fn test_finish_is_rejected_while_sets_are_open() -> Result<()> {
    let mut service = create_test_service()?;
    let start = at("2024-01-15T07:30:00Z");
    service.start_empty_workout(start, &Utc)?;

    // No exercises: nothing to finish.
    let err = service.finish_workout(start + Duration::minutes(5)).unwrap_err();
    assert_eq!(
        err.downcast_ref::<SessionError>(),
        Some(&SessionError::NotAllSetsCompleted)
    );

    service.add_exercise_to_workout(BENCH)?;
    service.add_exercise_to_workout(SQUAT)?;
    let active = service.active_workout().unwrap().clone();
    let first = &active.exercises[0];
    service.update_set(
        &first.id,
        &first.sets[0].id,
        SetUpdate {
            completed: Some(true),
            ..Default::default()
        },
    )?;
    assert!(service.finish_workout(start + Duration::minutes(30)).is_err());
    assert!(service.active_workout().is_some());
    assert!(service.history().is_empty());
    Ok(())
}

#[test]
fn test_finish_records_floored_duration_and_moves_to_history() -> Result<()> {
    let mut service = create_test_service()?;
    let start = at("2024-01-15T10:00:00.000Z");
    let template = create_template(&mut service, "Legs", &[&[(MuscleGroup::Quads, SQUAT)]])?;
    service.start_template_workout(&template.id, None, start)?;
    complete_all_sets(&mut service, 225.0, 5)?;

    let done = service.finish_workout(at("2024-01-15T10:45:30.999Z"))?;
    assert!(done.completed);
    assert_eq!(done.duration, Some(2730));
    assert!(service.active_workout().is_none());
    assert_eq!(service.history().len(), 1);
    assert_eq!(service.history()[0], done);

    // Newest first.
    service.start_empty_workout(at("2024-01-16T10:00:00Z"), &Utc)?;
    service.add_exercise_to_workout(BENCH)?;
    complete_all_sets(&mut service, 135.0, 10)?;
    let second = service.finish_workout(at("2024-01-16T10:20:00Z"))?;
    assert_eq!(service.history()[0].id, second.id);
    assert_eq!(service.history()[1].id, done.id);
    Ok(())
}

#[test]
fn test_finish_over_a_non_transactional_store() -> Result<()> {
    let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
    let mut service = service_over(store.clone());
    service.start_empty_workout(at("2024-01-15T10:00:00Z"), &Utc)?;
    service.add_exercise_to_workout(CURL)?;
    complete_all_sets(&mut service, 60.0, 12)?;
    service.finish_workout(at("2024-01-15T10:10:00Z"))?;

    assert_eq!(store.get("zenith_active_workout")?, None);
    let reopened = service_over(store);
    assert_eq!(reopened.history().len(), 1);
    assert_eq!(reopened.history()[0].duration, Some(600));
    Ok(())
}

#[test]
fn test_cancel_discards_without_touching_history() -> Result<()> {
    let mut service = create_test_service()?;
    service.start_empty_workout(at("2024-01-15T10:00:00Z"), &Utc)?;
    service.add_exercise_to_workout(BENCH)?;
    service.cancel_workout()?;
    assert!(service.active_workout().is_none());
    assert!(service.history().is_empty());

    let err = service.cancel_workout().unwrap_err();
    assert_eq!(
        err.downcast_ref::<SessionError>(),
        Some(&SessionError::NoActiveWorkout)
    );
    Ok(())
}

#[test]
fn test_cancel_is_rejected_once_every_set_is_done() -> Result<()> {
    let mut service = create_test_service()?;
    service.start_empty_workout(at("2024-01-15T10:00:00Z"), &Utc)?;
    service.add_exercise_to_workout(BENCH)?;
    complete_all_sets(&mut service, 95.0, 10)?;
    let err = service.cancel_workout().unwrap_err();
    assert_eq!(
        err.downcast_ref::<SessionError>(),
        Some(&SessionError::AllSetsCompleted)
    );
    Ok(())
}

#[test]
fn test_elapsed_time_survives_a_reload() -> Result<()> {
    let store: Rc<dyn KeyValueStore> = Rc::new(SqliteStore::open_in_memory()?);
    let start = at("2024-01-15T10:00:00Z");
    let mut first = service_over(store.clone());
    first.start_empty_workout(start, &Utc)?;

    let second = service_over(store);
    let earlier = second.elapsed_seconds(start + Duration::milliseconds(90_500))?;
    let later = second.elapsed_seconds(start + Duration::seconds(125))?;
    assert_eq!(earlier, 90);
    assert_eq!(later, 125);
    assert!(later > earlier);
    Ok(())
}

#[test]
fn test_reload_picks_up_writes_from_another_service() -> Result<()> {
    let store: Rc<dyn KeyValueStore> = Rc::new(SqliteStore::open_in_memory()?);
    let mut writer = service_over(store.clone());
    let mut reader = service_over(store);

    let seen = Rc::new(std::cell::Cell::new(0));
    let counter = seen.clone();
    reader.subscribe_active_workout(move |_| counter.set(counter.get() + 1));

    writer.start_empty_workout(at("2024-01-15T10:00:00Z"), &Utc)?;
    assert!(reader.active_workout().is_none());
    let changed = reader.reload();
    assert_eq!(changed, vec!["zenith_active_workout".to_string()]);
    assert!(reader.active_workout().is_some());
    assert_eq!(seen.get(), 1);
    assert!(reader.reload().is_empty());
    Ok(())
}

// ========== History ==========

#[test]
fn test_last_performed_returns_the_latest_completed_date() -> Result<()> {
    let mut service = create_test_service()?;
    for day in ["2024-01-01", "2024-01-15", "2024-02-01"] {
        let start = at(&format!("{day}T09:00:00Z"));
        service.start_empty_workout(start, &Utc)?;
        service.add_exercise_to_workout(DEADLIFT)?;
        complete_all_sets(&mut service, 315.0, 3)?;
        service.finish_workout(start + Duration::minutes(40))?;
    }
    assert_eq!(
        service.last_performed(DEADLIFT),
        Some(at("2024-02-01T09:00:00Z"))
    );
    assert_eq!(service.last_performed(CURL), None);
    Ok(())
}

#[test]
fn test_previous_calendar_day_is_yesterday_regardless_of_hour() {
    let performed = at("2024-01-15T23:59:00Z").date_naive();
    let today = at("2024-01-16T00:01:00Z").date_naive();
    assert_eq!(history::relative_label(performed, today), "Yesterday");

    let same_day = at("2024-01-16T00:00:01Z").date_naive();
    let evening = at("2024-01-16T23:59:59Z").date_naive();
    assert_eq!(history::relative_label(same_day, evening), "Today");
}

#[test]
fn test_history_groups_by_month_in_collection_order() -> Result<()> {
    let mut service = create_test_service()?;
    for start in ["2024-01-20T09:00:00Z", "2024-02-03T09:00:00Z", "2024-02-10T09:00:00Z"] {
        let start = at(start);
        service.start_empty_workout(start, &Utc)?;
        service.add_exercise_to_workout(BENCH)?;
        complete_all_sets(&mut service, 100.0, 10)?;
        service.finish_workout(start + Duration::minutes(30))?;
    }

    let groups = service.history_by_month(&Utc);
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["February 2024", "January 2024"]);
    assert_eq!(groups[0].workouts.len(), 2);
    assert_eq!(groups[1].workouts.len(), 1);
    Ok(())
}

#[test]
fn test_workout_stats_count_every_set_for_volume() -> Result<()> {
    let mut service = create_test_service()?;
    service.start_empty_workout(at("2024-01-15T10:00:00Z"), &Utc)?;
    let entry = service.add_exercise_to_workout(BENCH)?;
    service.add_set(&entry)?;
    let sets = service.active_workout().unwrap().exercises[0].sets.clone();
    service.update_set(
        &entry,
        &sets[0].id,
        SetUpdate {
            weight: Some(100.0),
            reps: Some(10),
            completed: Some(true),
        },
    )?;
    service.update_set(
        &entry,
        &sets[1].id,
        SetUpdate {
            weight: Some(50.0),
            reps: Some(4),
            completed: None,
        },
    )?;

    let stats = history::workout_stats(service.active_workout().unwrap());
    assert_eq!(stats.total_sets, 2);
    assert_eq!(stats.completed_sets, 1);
    assert_eq!(stats.total_volume, 1200.0);
    Ok(())
}

#[test]
fn test_exercise_preview_lists_three_names() -> Result<()> {
    let mut service = create_test_service()?;
    service.start_empty_workout(at("2024-01-15T10:00:00Z"), &Utc)?;
    for id in [BENCH, SQUAT, CURL, DEADLIFT, DB_BENCH] {
        service.add_exercise_to_workout(id)?;
    }
    let preview = history::exercise_preview(service.active_workout().unwrap(), &service.exercises());
    assert_eq!(preview, "Bench Press, Squats, Barbell Curl, +2 more");
    Ok(())
}

#[test]
fn test_delete_history_workout() -> Result<()> {
    let mut service = create_test_service()?;
    service.start_empty_workout(at("2024-01-15T10:00:00Z"), &Utc)?;
    service.add_exercise_to_workout(BENCH)?;
    complete_all_sets(&mut service, 100.0, 10)?;
    let done = service.finish_workout(at("2024-01-15T10:30:00Z"))?;

    assert_eq!(service.find_history_workout(&done.id)?.name, "Monday Workout");
    service.delete_history_workout(&done.id)?;
    assert!(service.history().is_empty());
    assert!(service.delete_history_workout(&done.id).is_err());
    Ok(())
}

// ========== Storage ==========

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(Some("[1, 2".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::DataDir)
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::DataDir)
    }
}

#[test]
fn test_repository_survives_unreadable_and_unwritable_stores() {
    let mut repo: Repository<Vec<u32>> = Repository::load(Rc::new(ReadOnlyStore), "k", Vec::new());
    assert!(repo.get().is_empty());

    repo.set(vec![4]);
    assert_eq!(repo.get(), &vec![4]);
    assert!(repo.is_dirty());
}

#[test]
fn test_keys_use_the_configured_prefix() -> Result<()> {
    let store = Rc::new(SqliteStore::open_in_memory()?);
    let config = Config {
        key_prefix: "gym_".to_string(),
        ..Default::default()
    };
    let mut service = AppService::with_store(
        config,
        store.clone(),
        ":memory:".into(),
        "test_config.toml".into(),
    );
    service.set_auto_match_weight(true);
    assert_eq!(store.keys()?, vec!["gym_settings".to_string()]);
    assert_eq!(
        store.get("gym_settings")?.as_deref(),
        Some(r#"{"autoMatchWeight":true}"#)
    );
    Ok(())
}

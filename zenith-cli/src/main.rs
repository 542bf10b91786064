//src/main.rs
mod cli;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, Utc};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdin, stdout, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use zenith_lib::model::is_default_exercise;
use zenith_lib::{
    catalog, history, session, template, AppService, Exercise, ExerciseEdit, MuscleGroup,
    NewExercise, SessionError, SetUpdate, TemplateEditor, TemplateError, TemplateWriteBack, WeightUnit,
    Workout, WorkoutExercise, WorkoutTemplate,
};

fn main() -> Result<()> {
    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();
        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    debug!(db = ?service.db_path, config = ?service.config_path, "Service initialized");

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Exercises(command) => run_exercise_command(&mut service, command, export_csv)?,
        cli::Commands::Templates(command) => run_template_command(&mut service, command)?,
        cli::Commands::Draft(command) => run_draft_command(&mut service, command)?,
        cli::Commands::Workout(command) => run_workout_command(&mut service, command)?,
        cli::Commands::History(command) => run_history_command(&mut service, command, export_csv)?,
        cli::Commands::Settings(command) => run_settings_command(&mut service, command)?,
        cli::Commands::ConfigPath => {
            println!("{}", service.get_config_path().display());
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.db_path);
        }
    }
    Ok(())
}

// ========== Exercises ==========

fn run_exercise_command(
    service: &mut AppService,
    command: cli::ExerciseCommands,
    export_csv: bool,
) -> Result<()> {
    match command {
        cli::ExerciseCommands::List { muscle, search } => {
            let exercises = service.list_exercises(muscle.map(Into::into), search.as_deref());
            if exercises.is_empty() {
                println!("No exercises match.");
            } else if export_csv {
                print_exercise_csv(service, &exercises)?;
            } else {
                print_exercise_table(service, &exercises, header_color(service));
            }
        }
        cli::ExerciseCommands::Create {
            name,
            muscle,
            type_,
            notes,
        } => {
            match service.create_exercise(NewExercise {
                name,
                muscle_group: muscle.into(),
                exercise_type: type_.into(),
                notes,
            }) {
                Ok(exercise) => println!(
                    "Successfully defined exercise: '{}' ({}, {}) ID: {}",
                    exercise.name,
                    exercise.muscle_group.label(),
                    exercise.exercise_type.label(),
                    exercise.id
                ),
                Err(e) => bail!("Error creating exercise: {}", e),
            }
        }
        cli::ExerciseCommands::Edit {
            identifier,
            name,
            muscle,
            type_,
            notes,
        } => {
            let exercise = service.resolve_exercise(&identifier)?;
            let edit = ExerciseEdit {
                name,
                muscle_group: muscle.map(Into::into),
                exercise_type: type_.map(Into::into),
                notes,
            };
            match service.edit_exercise(&exercise.id, edit) {
                Ok(()) => {
                    println!("Successfully updated exercise '{}'.", exercise.name);
                    if is_default_exercise(&exercise.id) {
                        println!("Note: saved as your own version of a built-in exercise. Use 'exercises reset' to undo.");
                    }
                }
                Err(e) => bail!("Error editing exercise '{}': {}", identifier, e),
            }
        }
        cli::ExerciseCommands::Delete { identifier } => {
            let exercise = service.resolve_exercise(&identifier)?;
            match service.delete_exercise(&exercise.id) {
                Ok(()) => println!("Successfully deleted exercise '{}'.", exercise.name),
                Err(e) => bail!("Error deleting exercise: {}", e),
            }
        }
        cli::ExerciseCommands::Reset { identifier } => {
            let exercise = service.resolve_exercise(&identifier)?;
            match service.reset_exercise(&exercise.id) {
                Ok(()) => println!("Restored built-in exercise '{}'.", exercise.id),
                Err(e) => bail!("Error resetting exercise: {}", e),
            }
        }
        cli::ExerciseCommands::Note { identifier, text } => {
            let exercise = service.resolve_exercise(&identifier)?;
            service.update_exercise_note(&exercise.id, &text)?;
            println!("Note saved for '{}'.", exercise.name);
        }
        cli::ExerciseCommands::ClearNote { identifier } => {
            let exercise = service.resolve_exercise(&identifier)?;
            if service.clear_exercise_note(&exercise.id) {
                println!("Note cleared for '{}'.", exercise.name);
            } else {
                println!("'{}' has no note to clear.", exercise.name);
            }
        }
        cli::ExerciseCommands::Last { identifier } => {
            let exercise = service.resolve_exercise(&identifier)?;
            match service.last_performed(&exercise.id) {
                Some(date) => {
                    let local = date.with_timezone(&Local);
                    println!(
                        "'{}' last performed {} ({}).",
                        exercise.name,
                        history::relative_label(local.date_naive(), Local::now().date_naive()),
                        local.format("%Y-%m-%d %H:%M")
                    );
                }
                None => println!("'{}' has not been performed yet.", exercise.name),
            }
        }
    }
    Ok(())
}

// ========== Templates ==========

fn run_template_command(service: &mut AppService, command: cli::TemplateCommands) -> Result<()> {
    match command {
        cli::TemplateCommands::List => {
            if service.templates().is_empty() {
                println!("No templates yet. Create one with 'draft new'.");
            } else {
                print_template_table(service.templates(), header_color(service));
            }
        }
        cli::TemplateCommands::Show { template } => {
            let id = resolve_template_id(service, &template)?;
            let catalog = service.exercises();
            print_template_detail(service.find_template(&id)?, &catalog, header_color(service));
        }
        cli::TemplateCommands::Delete { template, yes } => {
            let id = resolve_template_id(service, &template)?;
            let name = service.find_template(&id)?.name.clone();
            if !yes && !confirm(&format!("Delete template '{name}'?"))? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            service.delete_template(&id)?;
            println!("Deleted template '{name}'.");
        }
        cli::TemplateCommands::Start { template, day } => {
            let id = resolve_template_id(service, &template)?;
            start_from_template(service, &id, day)?;
        }
    }
    Ok(())
}

fn start_from_template(service: &mut AppService, template_id: &str, day: Option<usize>) -> Result<()> {
    let day_index = match day {
        Some(0) => bail!("Day numbers start at 1."),
        Some(n) => Some(n - 1),
        None => None,
    };
    match service.start_template_workout(template_id, day_index, Utc::now()) {
        Ok(workout) => println!(
            "Started '{}' with {} exercise(s).",
            workout.name,
            workout.exercises.len()
        ),
        Err(e) => {
            if let Some(TemplateError::DayRequired(..)) = e.downcast_ref::<TemplateError>() {
                let template = service.find_template(template_id)?;
                for (i, d) in template.days.iter().enumerate() {
                    println!("  {}. {}", i + 1, d.name);
                }
                bail!("{e}. Use --day <N>.");
            }
            bail!("Error starting workout: {}", e);
        }
    }
    Ok(())
}

/// Matches a template by id first, then by case-insensitive name.
fn resolve_template_id(service: &AppService, identifier: &str) -> Result<String> {
    let wanted = identifier.trim();
    service
        .templates()
        .iter()
        .find(|t| t.id == wanted)
        .or_else(|| {
            service
                .templates()
                .iter()
                .find(|t| t.name.eq_ignore_ascii_case(wanted))
        })
        .map(|t| t.id.clone())
        .ok_or_else(|| anyhow!(TemplateError::TemplateNotFound(identifier.to_string())))
}

// ========== Draft ==========

fn run_draft_command(service: &mut AppService, command: cli::DraftCommands) -> Result<()> {
    match command {
        cli::DraftCommands::New => {
            let editor = service.begin_new_template();
            println!("Editing new template draft.");
            print_editor(&editor, &service.exercises(), header_color(service));
        }
        cli::DraftCommands::Edit { template } => {
            let id = resolve_template_id(service, &template)?;
            let editor = service.begin_edit_template(&id)?;
            println!("Editing template '{}'.", editor.name());
            print_editor(&editor, &service.exercises(), header_color(service));
        }
        cli::DraftCommands::Show => {
            let editor = open_editor(service)?;
            print_editor(&editor, &service.exercises(), header_color(service));
        }
        cli::DraftCommands::Rename { name } => {
            service.update_editor(|e| e.rename(&name))?;
            println!("Template renamed to '{}'.", name.trim());
        }
        cli::DraftCommands::AddDay => {
            let count = service.update_editor(|e| {
                e.add_day();
                e.days().len()
            })?;
            println!("Added Day {count}; it is now the active day.");
        }
        cli::DraftCommands::RemoveDay { day } => {
            let index = to_index(day, open_editor(service)?.days().len(), "day")?;
            if !service.update_editor(|e| e.remove_day(index))? {
                bail!("A template needs at least one day.");
            }
            println!("Removed day {day}.");
        }
        cli::DraftCommands::SelectDay { day } => {
            let index = to_index(day, open_editor(service)?.days().len(), "day")?;
            service.update_editor(|e| e.select_day(index))?;
            println!("Day {day} is now active.");
        }
        cli::DraftCommands::RenameDay { day, name } => {
            let index = to_index(day, open_editor(service)?.days().len(), "day")?;
            if !service.update_editor(|e| e.rename_day(index, &name))? {
                bail!("Day name cannot be empty.");
            }
            println!("Day {day} renamed to '{}'.", name.trim());
        }
        cli::DraftCommands::AddGroup { muscle } => {
            let muscle: MuscleGroup = muscle.into();
            service.update_editor(|e| e.add_muscle_group(muscle))?;
            println!("Added a {} block with one empty slot.", muscle.label());
        }
        cli::DraftCommands::RemoveGroup { group } => {
            let block = block_id(&open_editor(service)?, group)?;
            service.update_editor(|e| e.remove_muscle_group(&block))?;
            println!("Removed block {group}.");
        }
        cli::DraftCommands::MoveGroup { group, direction } => {
            let block = block_id(&open_editor(service)?, group)?;
            if service.update_editor(|e| e.move_muscle_group(&block, direction.into()))? {
                println!("Moved block {group} {direction:?}.");
            } else {
                println!("Block {group} is already at the edge.");
            }
        }
        cli::DraftCommands::AddSlot { group } => {
            let block = block_id(&open_editor(service)?, group)?;
            service.update_editor(|e| e.add_slot(&block))?;
            println!("Added a slot to block {group}.");
        }
        cli::DraftCommands::RemoveSlot { group, slot } => {
            let (block, slot_id) = slot_ids(&open_editor(service)?, group, slot)?;
            service.update_editor(|e| e.remove_slot(&block, &slot_id))?;
            println!("Removed slot {slot} of block {group}.");
        }
        cli::DraftCommands::Select {
            group,
            slot,
            exercise,
        } => {
            let editor = open_editor(service)?;
            let (block, slot_id) = slot_ids(&editor, group, slot)?;
            let exercise = service.resolve_exercise(&exercise)?;
            let catalog = service.exercises();
            if !editor
                .candidates(&block, &catalog)
                .iter()
                .any(|e| e.id == exercise.id)
            {
                bail!(
                    "'{}' is a {} exercise and does not fit block {group}.",
                    exercise.name,
                    exercise.muscle_group.label()
                );
            }
            service.update_editor(|e| e.select_exercise(&block, &slot_id, &exercise.id))?;
            println!("Slot {slot} of block {group} set to '{}'.", exercise.name);
        }
        cli::DraftCommands::Sets { group, slot, delta } => {
            let (block, slot_id) = slot_ids(&open_editor(service)?, group, slot)?;
            if let Some(count) = service.update_editor(|e| e.adjust_set_count(&block, &slot_id, delta))? {
                println!("Slot {slot} of block {group} now has {count} set(s).");
            }
        }
        cli::DraftCommands::Save => match service.save_editor() {
            Ok(saved) => println!("Saved template '{}' (ID: {}).", saved.name, saved.id),
            Err(e) => bail!("Error saving template: {}", e),
        },
        cli::DraftCommands::Discard => {
            if service.discard_editor() {
                println!("Draft discarded.");
            } else {
                println!("No draft to discard.");
            }
        }
    }
    Ok(())
}

fn open_editor(service: &AppService) -> Result<TemplateEditor> {
    service
        .current_editor()
        .ok_or_else(|| anyhow!(TemplateError::NoDraft))
        .context("Start one with 'draft new' or 'draft edit <template>'")
}

fn block_id(editor: &TemplateEditor, group: usize) -> Result<String> {
    let groups = &editor.active_day().muscle_groups;
    let index = to_index(group, groups.len(), "block")?;
    Ok(groups[index].id.clone())
}

fn slot_ids(editor: &TemplateEditor, group: usize, slot: usize) -> Result<(String, String)> {
    let groups = &editor.active_day().muscle_groups;
    let block = &groups[to_index(group, groups.len(), "block")?];
    let slot_index = to_index(slot, block.exercises.len(), "slot")?;
    Ok((block.id.clone(), block.exercises[slot_index].id.clone()))
}

/// Converts a 1-based position into an index.
fn to_index(number: usize, len: usize, what: &str) -> Result<usize> {
    if number == 0 || number > len {
        bail!("No {what} #{number} (there are {len}).");
    }
    Ok(number - 1)
}

// ========== Workout ==========

fn run_workout_command(service: &mut AppService, command: cli::WorkoutCommands) -> Result<()> {
    match command {
        cli::WorkoutCommands::Start { template, day } => match template {
            Some(template) => {
                let id = resolve_template_id(service, &template)?;
                start_from_template(service, &id, day)?;
            }
            None => {
                let workout = service.start_empty_workout(Utc::now(), &Local)?;
                println!("Started '{}'. Add exercises with 'workout add'.", workout.name);
            }
        },
        cli::WorkoutCommands::Show => {
            let active = active_workout(service)?;
            let elapsed = service.elapsed_seconds(Utc::now())?;
            println!(
                "{}  [{}]",
                active.name,
                session::format_elapsed(elapsed)
            );
            print_workout(active, &service.exercises(), display_unit(service), header_color(service));
            if session::all_sets_completed(active) {
                println!("All sets completed. Run 'workout finish' to save it.");
            }
        }
        cli::WorkoutCommands::Rename { name } => {
            service.rename_workout(&name)?;
            println!("Workout is now '{}'.", active_workout(service)?.name);
        }
        cli::WorkoutCommands::Add { exercise } => {
            let exercise = service.resolve_exercise(&exercise)?;
            service.add_exercise_to_workout(&exercise.id)?;
            println!("Added '{}'.", exercise.name);
            if let Some(last) = service.last_performed(&exercise.id) {
                println!(
                    "Last performed {}.",
                    history::relative_label(
                        last.with_timezone(&Local).date_naive(),
                        Local::now().date_naive()
                    )
                );
            }
        }
        cli::WorkoutCommands::Remove { exercise } => {
            let entry = workout_entry(service, exercise)?;
            service.remove_exercise_from_workout(&entry.id)?;
            println!("Removed exercise {exercise}.");
        }
        cli::WorkoutCommands::AddSet { exercise } => {
            let entry = workout_entry(service, exercise)?;
            service.add_set(&entry.id)?;
            println!("Added set {} to exercise {exercise}.", entry.sets.len() + 1);
        }
        cli::WorkoutCommands::RemoveSet { exercise, set } => {
            let entry = workout_entry(service, exercise)?;
            let index = to_index(set, entry.sets.len(), "set")?;
            match service.remove_set(&entry.id, &entry.sets[index].id) {
                Ok(()) => println!("Removed set {set} of exercise {exercise}."),
                Err(e) => bail!("Error removing set: {}", e),
            }
        }
        cli::WorkoutCommands::Set {
            exercise,
            set,
            weight,
            reps,
            done,
            undone,
        } => {
            let entry = workout_entry(service, exercise)?;
            let index = to_index(set, entry.sets.len(), "set")?;
            let completed = match (done, undone) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let update = SetUpdate {
                weight,
                reps,
                completed,
            };
            if update == SetUpdate::default() {
                bail!("Nothing to update. Pass --weight, --reps, --done or --undone.");
            }
            service.update_set(&entry.id, &entry.sets[index].id, update)?;
            if weight.is_some() && service.settings().auto_match_weight {
                println!("Updated set {set}; weight copied to every set of exercise {exercise}.");
            } else {
                println!("Updated set {set} of exercise {exercise}.");
            }
        }
        cli::WorkoutCommands::Replace {
            exercise,
            new_exercise,
            update_template,
        } => {
            let entry = workout_entry(service, exercise)?;
            let replacement = service.resolve_exercise(&new_exercise)?;
            let outcome = service.replace_exercise(&entry.id, &replacement.id, update_template)?;
            println!("Exercise {exercise} is now '{}'; its sets were reset.", replacement.name);
            match outcome {
                TemplateWriteBack::Updated => println!("The template was updated too."),
                TemplateWriteBack::Skipped(reason) => {
                    println!("The template was not updated: {reason}.");
                }
                TemplateWriteBack::NotFromTemplate => {
                    println!("This workout did not start from a template; only the workout changed.");
                }
                TemplateWriteBack::NotRequested => {}
            }
        }
        cli::WorkoutCommands::Finish => match service.finish_workout(Utc::now()) {
            Ok(done) => {
                let stats = history::workout_stats(&done);
                println!(
                    "Finished '{}' in {}: {} sets, {} {} total volume.",
                    done.name,
                    history::format_duration(done.duration),
                    stats.completed_sets,
                    stats.total_volume,
                    display_unit(service).label()
                );
            }
            Err(e) => bail!("Error finishing workout: {}", e),
        },
        cli::WorkoutCommands::Cancel { yes } => {
            session::ensure_cancellable(active_workout(service)?)?;
            if !yes && !confirm("Discard the workout in progress?")? {
                println!("Workout kept.");
                return Ok(());
            }
            let discarded = service.cancel_workout()?;
            println!("Discarded '{}'.", discarded.name);
        }
    }
    Ok(())
}

fn active_workout(service: &AppService) -> Result<&Workout> {
    service
        .active_workout()
        .ok_or_else(|| anyhow!(SessionError::NoActiveWorkout))
}

fn workout_entry(service: &AppService, exercise: usize) -> Result<WorkoutExercise> {
    let active = active_workout(service)?;
    let index = to_index(exercise, active.exercises.len(), "exercise")?;
    Ok(active.exercises[index].clone())
}

// ========== History ==========

fn run_history_command(
    service: &mut AppService,
    command: cli::HistoryCommands,
    export_csv: bool,
) -> Result<()> {
    match command {
        cli::HistoryCommands::List => {
            if service.history().is_empty() {
                println!("No completed workouts yet.");
            } else if export_csv {
                print_history_csv(service)?;
            } else {
                print_history_table(service, header_color(service));
            }
        }
        cli::HistoryCommands::Show { workout } => {
            let id = resolve_history_id(service, &workout)?;
            let done = service.find_history_workout(&id)?;
            let local = done.date.with_timezone(&Local);
            println!(
                "{}  {}  {}",
                done.name,
                local.format("%A, %B %-d, %Y %H:%M"),
                history::format_duration(done.duration)
            );
            print_workout(done, &service.exercises(), display_unit(service), header_color(service));
        }
        cli::HistoryCommands::Delete { workout, yes } => {
            let id = resolve_history_id(service, &workout)?;
            let name = service.find_history_workout(&id)?.name.clone();
            if !yes && !confirm(&format!("Delete '{name}' from history?"))? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            service.delete_history_workout(&id)?;
            println!("Deleted '{name}' from history.");
        }
    }
    Ok(())
}

/// Accepts a workout id or its 1-based number in the history list.
fn resolve_history_id(service: &AppService, identifier: &str) -> Result<String> {
    let workouts = service.history();
    if let Some(workout) = workouts.iter().find(|w| w.id == identifier.trim()) {
        return Ok(workout.id.clone());
    }
    let number: usize = identifier
        .trim()
        .parse()
        .with_context(|| format!("Workout not found in history: {identifier}"))?;
    let index = to_index(number, workouts.len(), "workout")?;
    Ok(workouts[index].id.clone())
}

// ========== Settings ==========

fn run_settings_command(service: &mut AppService, command: cli::SettingsCommands) -> Result<()> {
    match command {
        cli::SettingsCommands::Show => print_settings(service),
        cli::SettingsCommands::AutoMatchWeight { enabled } => {
            service.set_auto_match_weight(enabled);
            println!(
                "Auto-match weight {}.",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        cli::SettingsCommands::WeightUnit { unit } => {
            service.config.weight_unit = unit.into();
            service.save_config()?;
            println!("Weights are now shown in {}.", service.config.weight_unit.label());
        }
        cli::SettingsCommands::HeaderColor { color } => {
            let parsed = zenith_lib::parse_color(&color)?;
            service.config.theme.header_color = format!("{parsed:?}");
            service.save_config()?;
            println!("Header colour set to {parsed:?}.");
        }
    }
    Ok(())
}

// ========== Prompts ==========

/// Asks a yes/no question on stdin. Anything but "y"/"yes" declines.
fn confirm(question: &str) -> Result<bool> {
    print!("{question} (y/N): ");
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    let answer = input.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

// --- Table Printing Functions ---

fn header_color(service: &AppService) -> Color {
    zenith_lib::parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Cyan)
}

fn display_unit(service: &AppService) -> WeightUnit {
    service.config.weight_unit
}

fn header(titles: &[&str], color: Color) -> Vec<Cell> {
    titles.iter().map(|t| Cell::new(t).fg(color)).collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn exercise_name(catalog: &[Exercise], id: &str) -> String {
    catalog::find(catalog, id).map_or_else(|| format!("Unknown ({id})"), |e| e.name.clone())
}

fn print_exercise_table(service: &AppService, exercises: &[Exercise], header_color: Color) {
    let today = Local::now().date_naive();
    let mut table = new_table();
    table.set_header(header(&["Muscle", "Name", "Type", "Last", "Notes", "ID"], header_color));
    for (group, members) in catalog::group_by_muscle(exercises) {
        for (i, exercise) in members.iter().enumerate() {
            let muscle = if i == 0 { group.label() } else { "" };
            let last = service.last_performed(&exercise.id).map_or_else(String::new, |d| {
                history::relative_label(d.with_timezone(&Local).date_naive(), today)
            });
            table.add_row(vec![
                Cell::new(muscle).add_attribute(Attribute::Bold),
                Cell::new(&exercise.name),
                Cell::new(exercise.exercise_type.label()),
                Cell::new(last),
                Cell::new(&exercise.notes),
                Cell::new(&exercise.id),
            ]);
        }
    }
    println!("{table}");
}

fn print_exercise_csv(service: &AppService, exercises: &[Exercise]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["ID", "Name", "Muscle_Group", "Type", "Notes", "Last_Performed_Local"])?;
    for exercise in exercises {
        writer.write_record([
            exercise.id.clone(),
            exercise.name.clone(),
            exercise.muscle_group.to_string(),
            exercise.exercise_type.to_string(),
            exercise.notes.clone(),
            service
                .last_performed(&exercise.id)
                .map_or_else(String::new, |d| d.with_timezone(&Local).to_rfc3339()),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_template_table(templates: &[WorkoutTemplate], header_color: Color) {
    let mut table = new_table();
    table.set_header(header(&["Name", "Days", "Exercises", "Sets", "ID"], header_color));
    for t in templates {
        let summary = template::summarize(t);
        table.add_row(vec![
            Cell::new(&t.name),
            Cell::new(summary.day_count),
            Cell::new(summary.exercise_count),
            Cell::new(summary.set_count),
            Cell::new(&t.id),
        ]);
    }
    println!("{table}");
}

fn print_template_detail(t: &WorkoutTemplate, catalog: &[Exercise], header_color: Color) {
    println!("{}  (ID: {})", t.name, t.id);
    let mut table = new_table();
    table.set_header(header(&["Day", "Muscle", "Exercise", "Sets"], header_color));
    for (day_number, day) in t.days.iter().enumerate() {
        let mut first_row = true;
        for block in &day.muscle_groups {
            for slot in &block.exercises {
                let day_label = if first_row {
                    format!("{}. {}", day_number + 1, day.name)
                } else {
                    String::new()
                };
                first_row = false;
                table.add_row(vec![
                    Cell::new(day_label).add_attribute(Attribute::Bold),
                    Cell::new(block.muscle_group.label()),
                    Cell::new(
                        slot.exercise_id
                            .as_deref()
                            .map_or_else(|| "-".to_string(), |id| exercise_name(catalog, id)),
                    ),
                    Cell::new(slot.set_count),
                ]);
            }
        }
    }
    println!("{table}");
}

fn print_editor(editor: &TemplateEditor, catalog: &[Exercise], header_color: Color) {
    let name = if editor.name().trim().is_empty() {
        "(unnamed)"
    } else {
        editor.name()
    };
    let kind = if editor.is_new() { "new template" } else { "editing" };
    println!("{name}  [{kind}]");
    let days: Vec<String> = editor
        .days()
        .iter()
        .enumerate()
        .map(|(i, d)| {
            if i == editor.active_day_index() {
                format!("*{}. {}*", i + 1, d.name)
            } else {
                format!("{}. {}", i + 1, d.name)
            }
        })
        .collect();
    println!("Days: {}", days.join("  "));

    let mut table = new_table();
    table.set_header(header(&["Block", "Muscle", "Slot", "Exercise", "Sets"], header_color));
    for (g, block) in editor.active_day().muscle_groups.iter().enumerate() {
        for (s, slot) in block.exercises.iter().enumerate() {
            table.add_row(vec![
                Cell::new(g + 1),
                Cell::new(block.muscle_group.label()),
                Cell::new(s + 1),
                Cell::new(
                    slot.exercise_id
                        .as_deref()
                        .map_or_else(|| "(choose)".to_string(), |id| exercise_name(catalog, id)),
                ),
                Cell::new(slot.set_count),
            ]);
        }
    }
    println!("{table}");
}

fn print_workout(workout: &Workout, catalog: &[Exercise], unit: WeightUnit, header_color: Color) {
    let mut table = new_table();
    table.set_header(header(
        &["#", "Exercise", "Set", &format!("Weight ({})", unit.label()), "Reps", "Done"],
        header_color,
    ));
    for (e, entry) in workout.exercises.iter().enumerate() {
        let name = exercise_name(catalog, &entry.exercise_id);
        for (s, set) in entry.sets.iter().enumerate() {
            let (number, label) = if s == 0 {
                ((e + 1).to_string(), name.clone())
            } else {
                (String::new(), String::new())
            };
            let done = if set.completed {
                Cell::new("✓").fg(Color::Green)
            } else {
                Cell::new("")
            };
            table.add_row(vec![
                Cell::new(number),
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(s + 1),
                Cell::new(format!("{:.1}", set.weight)),
                Cell::new(set.reps),
                done,
            ]);
        }
    }
    println!("{table}");
    let stats = history::workout_stats(workout);
    println!(
        "{}/{} sets completed, {} {} volume",
        stats.completed_sets,
        stats.total_sets,
        stats.total_volume,
        unit.label()
    );
}

fn print_history_table(service: &AppService, header_color: Color) {
    let catalog = service.exercises();
    let today = Local::now().date_naive();
    let weight_unit = display_unit(service);
    for group in service.history_by_month(&Local) {
        println!("{}", group.label);
        let mut table = new_table();
        table.set_header(header(
            &["#", "Date", "Workout", "Sets", &format!("Volume ({})", weight_unit.label()), "Duration", "Exercises"],
            header_color,
        ));
        for workout in &group.workouts {
            let number = service
                .history()
                .iter()
                .position(|w| w.id == workout.id)
                .map_or_else(String::new, |i| (i + 1).to_string());
            let stats = history::workout_stats(workout);
            table.add_row(vec![
                Cell::new(number),
                Cell::new(history::history_date_label(
                    workout.date.with_timezone(&Local).date_naive(),
                    today,
                )),
                Cell::new(&workout.name).add_attribute(Attribute::Bold),
                Cell::new(format!("{}/{}", stats.completed_sets, stats.total_sets)),
                Cell::new(stats.total_volume),
                Cell::new(history::format_duration(workout.duration)),
                Cell::new(history::exercise_preview(workout, &catalog)),
            ]);
        }
        println!("{table}");
    }
}

fn print_history_csv(service: &AppService) -> Result<()> {
    let catalog = service.exercises();
    let weight_unit = display_unit(service);
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "Workout_ID",
        "Date_Local",
        "Workout",
        "Duration_s",
        "Exercise",
        "Set",
        &format!("Weight_{}", weight_unit.label()),
        "Reps",
        "Completed",
    ])?;
    for workout in service.history() {
        for entry in &workout.exercises {
            for (s, set) in entry.sets.iter().enumerate() {
                writer.write_record([
                    workout.id.clone(),
                    workout.date.with_timezone(&Local).to_rfc3339(),
                    workout.name.clone(),
                    workout.duration.map_or_else(String::new, |d| d.to_string()),
                    exercise_name(&catalog, &entry.exercise_id),
                    (s + 1).to_string(),
                    format!("{:.2}", set.weight),
                    set.reps.to_string(),
                    set.completed.to_string(),
                ])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn print_settings(service: &AppService) {
    let mut table = new_table();
    table.set_header(header(&["Setting", "Value"], header_color(service)));
    table.add_row(vec![
        Cell::new("Auto-match weight"),
        Cell::new(service.settings().auto_match_weight),
    ]);
    table.add_row(vec![
        Cell::new("Weight unit"),
        Cell::new(service.config.weight_unit.label()),
    ]);
    table.add_row(vec![
        Cell::new("Header colour"),
        Cell::new(&service.config.theme.header_color),
    ]);
    table.add_row(vec![
        Cell::new("Storage key prefix"),
        Cell::new(&service.config.key_prefix),
    ]);
    println!("{table}");
}

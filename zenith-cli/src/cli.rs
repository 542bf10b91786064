// src/cli.rs
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use zenith_lib::{ExerciseType, MoveDirection, MuscleGroup, WeightUnit};

#[derive(Parser, Debug)]
#[command(author, version, about = "Track workouts, templates and training history", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print lists as CSV instead of tables
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MuscleGroupCli {
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

impl From<MuscleGroupCli> for MuscleGroup {
    fn from(value: MuscleGroupCli) -> Self {
        match value {
            MuscleGroupCli::Chest => Self::Chest,
            MuscleGroupCli::Back => Self::Back,
            MuscleGroupCli::Shoulders => Self::Shoulders,
            MuscleGroupCli::Biceps => Self::Biceps,
            MuscleGroupCli::Triceps => Self::Triceps,
            MuscleGroupCli::Forearms => Self::Forearms,
            MuscleGroupCli::Quads => Self::Quads,
            MuscleGroupCli::Hamstrings => Self::Hamstrings,
            MuscleGroupCli::Glutes => Self::Glutes,
            MuscleGroupCli::Calves => Self::Calves,
            MuscleGroupCli::Abs => Self::Abs,
            MuscleGroupCli::Traps => Self::Traps,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseTypeCli {
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

impl From<ExerciseTypeCli> for ExerciseType {
    fn from(value: ExerciseTypeCli) -> Self {
        match value {
            ExerciseTypeCli::Barbell => Self::Barbell,
            ExerciseTypeCli::Dumbbell => Self::Dumbbell,
            ExerciseTypeCli::Machine => Self::Machine,
            ExerciseTypeCli::MachineAssistance => Self::MachineAssistance,
            ExerciseTypeCli::SmithMachine => Self::SmithMachine,
            ExerciseTypeCli::Cable => Self::Cable,
            ExerciseTypeCli::Freemotion => Self::Freemotion,
            ExerciseTypeCli::Bodyweight => Self::Bodyweight,
            ExerciseTypeCli::LoadedBodyweight => Self::LoadedBodyweight,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionCli {
    Up,
    Down,
}

impl From<DirectionCli> for MoveDirection {
    fn from(value: DirectionCli) -> Self {
        match value {
            DirectionCli::Up => Self::Up,
            DirectionCli::Down => Self::Down,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightUnitCli {
    Lbs,
    Kg,
}

impl From<WeightUnitCli> for WeightUnit {
    fn from(value: WeightUnitCli) -> Self {
        match value {
            WeightUnitCli::Lbs => Self::Lbs,
            WeightUnitCli::Kg => Self::Kg,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and manage the exercise library
    #[command(subcommand)]
    Exercises(ExerciseCommands),
    /// Saved workout templates
    #[command(subcommand)]
    Templates(TemplateCommands),
    /// Build a template step by step (new template draft or edit of a saved one)
    #[command(subcommand)]
    Draft(DraftCommands),
    /// The workout in progress
    #[command(subcommand)]
    Workout(WorkoutCommands),
    /// Completed workouts
    #[command(subcommand)]
    History(HistoryCommands),
    /// App settings
    #[command(subcommand)]
    Settings(SettingsCommands),
    /// Show the path to the config file
    ConfigPath,
    /// Show the path to the database file
    DbPath,
    /// Generate shell completion script
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExerciseCommands {
    /// List exercises grouped by muscle group
    List {
        #[arg(short, long, value_enum)]
        muscle: Option<MuscleGroupCli>,
        /// Case-insensitive search on the exercise name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Define a new exercise
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, value_enum)]
        muscle: MuscleGroupCli,
        #[arg(short = 't', long = "type", value_enum)]
        type_: ExerciseTypeCli,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Edit an exercise (editing a built-in one saves your own copy)
    Edit {
        /// Exercise id or name
        identifier: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, value_enum)]
        muscle: Option<MuscleGroupCli>,
        #[arg(short = 't', long = "type", value_enum)]
        type_: Option<ExerciseTypeCli>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an exercise you created
    Delete {
        /// Exercise id or name
        identifier: String,
    },
    /// Drop your changes to a built-in exercise
    Reset {
        /// Exercise id or name
        identifier: String,
    },
    /// Set the note of an exercise
    Note { identifier: String, text: String },
    /// Clear the note of an exercise
    ClearNote { identifier: String },
    /// Show when an exercise was last performed
    Last { identifier: String },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List saved templates
    List,
    /// Show the days and exercises of a template
    Show {
        /// Template id or name
        template: String,
    },
    /// Delete a template
    Delete {
        /// Template id or name
        template: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Start a workout from a template
    Start {
        /// Template id or name
        template: String,
        /// Day number (1-based), required for multi-day templates
        #[arg(short, long)]
        day: Option<usize>,
    },
}

/// Group and slot numbers are 1-based positions within the active day.
#[derive(Subcommand, Debug)]
pub enum DraftCommands {
    /// Start (or resume) a new template draft
    New,
    /// Open a saved template for editing
    Edit {
        /// Template id or name
        template: String,
    },
    /// Show the open draft
    Show,
    /// Rename the template
    Rename { name: String },
    /// Append a day and make it active
    AddDay,
    /// Remove a day (the last remaining day cannot be removed)
    RemoveDay { day: usize },
    /// Make a day active
    SelectDay { day: usize },
    /// Rename a day
    RenameDay { day: usize, name: String },
    /// Add a muscle-group block to the active day
    AddGroup {
        #[arg(value_enum)]
        muscle: MuscleGroupCli,
    },
    /// Remove a muscle-group block
    RemoveGroup { group: usize },
    /// Move a muscle-group block up or down
    MoveGroup {
        group: usize,
        #[arg(value_enum)]
        direction: DirectionCli,
    },
    /// Add an exercise slot to a block
    AddSlot { group: usize },
    /// Remove an exercise slot from a block
    RemoveSlot { group: usize, slot: usize },
    /// Assign an exercise to a slot
    Select {
        group: usize,
        slot: usize,
        /// Exercise id or name (must match the block's muscle group)
        exercise: String,
    },
    /// Change the target set count of a slot by DELTA
    Sets {
        group: usize,
        slot: usize,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Validate and save the template
    Save,
    /// Throw the draft away
    Discard,
}

/// Exercise and set numbers are 1-based positions in the active workout.
#[derive(Subcommand, Debug)]
pub enum WorkoutCommands {
    /// Start an empty workout, or one from a template
    Start {
        /// Template id or name
        #[arg(short, long)]
        template: Option<String>,
        /// Day number (1-based) of a multi-day template
        #[arg(short, long, requires = "template")]
        day: Option<usize>,
    },
    /// Show the workout in progress
    Show,
    /// Rename the workout
    Rename { name: String },
    /// Add an exercise with one empty set
    Add {
        /// Exercise id or name
        exercise: String,
    },
    /// Remove an exercise
    Remove { exercise: usize },
    /// Add a set copying the previous set's weight and reps
    AddSet { exercise: usize },
    /// Remove a set
    RemoveSet { exercise: usize, set: usize },
    /// Log weight, reps or completion of a set
    Set {
        exercise: usize,
        set: usize,
        #[arg(short, long)]
        weight: Option<f64>,
        #[arg(short, long)]
        reps: Option<u32>,
        /// Mark the set completed
        #[arg(long, conflicts_with = "undone")]
        done: bool,
        /// Mark the set not completed
        #[arg(long)]
        undone: bool,
    },
    /// Swap an exercise for another one
    Replace {
        exercise: usize,
        /// Exercise id or name
        new_exercise: String,
        /// Also change the slot in the template this workout came from
        #[arg(long)]
        update_template: bool,
    },
    /// Finish the workout and move it to history
    Finish,
    /// Discard the workout
    Cancel {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List completed workouts by month
    List,
    /// Show one completed workout
    Show {
        /// Workout id, or its number in `history list`
        workout: String,
    },
    /// Delete a completed workout
    Delete {
        /// Workout id, or its number in `history list`
        workout: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current settings
    Show,
    /// Copy a new weight onto every set of the same exercise
    AutoMatchWeight {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
    /// Unit label shown next to weights
    WeightUnit {
        #[arg(value_enum)]
        unit: WeightUnitCli,
    },
    /// Table header colour (e.g. Green, DarkCyan)
    HeaderColor { color: String },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

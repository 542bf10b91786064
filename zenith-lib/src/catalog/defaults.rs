//src/catalog/defaults.rs
use crate::model::{Exercise, ExerciseType, MuscleGroup};

// (slug, name, muscle group, type), grouped by muscle group in declaration order.
#[rustfmt::skip]
const DEFAULTS: &[(&str, &str, MuscleGroup, ExerciseType)] = &[
    // Chest
    ("bench-press", "Bench Press", MuscleGroup::Chest, ExerciseType::Barbell),
    ("incline-bench-press", "Incline Bench Press", MuscleGroup::Chest, ExerciseType::Barbell),
    ("dumbbell-bench-press", "Dumbbell Bench Press", MuscleGroup::Chest, ExerciseType::Dumbbell),
    ("incline-dumbbell-press", "Incline Dumbbell Press", MuscleGroup::Chest, ExerciseType::Dumbbell),
    ("cable-fly", "Cable Fly", MuscleGroup::Chest, ExerciseType::Cable),
    ("machine-chest-press", "Machine Chest Press", MuscleGroup::Chest, ExerciseType::Machine),
    ("dip", "Dip", MuscleGroup::Chest, ExerciseType::Bodyweight),
    ("push-up", "Push-Up", MuscleGroup::Chest, ExerciseType::Bodyweight),
    // Back
    ("deadlift", "Deadlift", MuscleGroup::Back, ExerciseType::Barbell),
    ("barbell-row", "Barbell Row", MuscleGroup::Back, ExerciseType::Barbell),
    ("dumbbell-row", "Dumbbell Row", MuscleGroup::Back, ExerciseType::Dumbbell),
    ("lat-pulldown", "Lat Pulldown", MuscleGroup::Back, ExerciseType::Cable),
    ("seated-cable-row", "Seated Cable Row", MuscleGroup::Back, ExerciseType::Cable),
    ("pull-up", "Pull-Up", MuscleGroup::Back, ExerciseType::Bodyweight),
    ("weighted-pull-up", "Pull-Up (Weighted)", MuscleGroup::Back, ExerciseType::LoadedBodyweight),
    ("assisted-pull-up", "Assisted Pull-Up", MuscleGroup::Back, ExerciseType::MachineAssistance),
    // Shoulders
    ("overhead-press", "Overhead Press", MuscleGroup::Shoulders, ExerciseType::Barbell),
    ("dumbbell-shoulder-press", "Dumbbell Shoulder Press", MuscleGroup::Shoulders, ExerciseType::Dumbbell),
    ("lateral-raise", "Lateral Raise", MuscleGroup::Shoulders, ExerciseType::Dumbbell),
    ("cable-lateral-raise", "Cable Lateral Raise", MuscleGroup::Shoulders, ExerciseType::Cable),
    ("reverse-pec-deck", "Reverse Pec Deck", MuscleGroup::Shoulders, ExerciseType::Machine),
    ("face-pull", "Face Pull", MuscleGroup::Shoulders, ExerciseType::Cable),
    // Biceps
    ("barbell-curl", "Barbell Curl", MuscleGroup::Biceps, ExerciseType::Barbell),
    ("dumbbell-curl", "Dumbbell Curl", MuscleGroup::Biceps, ExerciseType::Dumbbell),
    ("hammer-curl", "Hammer Curl", MuscleGroup::Biceps, ExerciseType::Dumbbell),
    ("cable-curl", "Cable Curl", MuscleGroup::Biceps, ExerciseType::Cable),
    ("preacher-curl", "Preacher Curl", MuscleGroup::Biceps, ExerciseType::Machine),
    // Triceps
    ("close-grip-bench-press", "Close-Grip Bench Press", MuscleGroup::Triceps, ExerciseType::Barbell),
    ("skull-crusher", "Skull Crusher", MuscleGroup::Triceps, ExerciseType::Barbell),
    ("triceps-pushdown", "Triceps Pushdown", MuscleGroup::Triceps, ExerciseType::Cable),
    ("overhead-cable-extension", "Overhead Cable Extension", MuscleGroup::Triceps, ExerciseType::Cable),
    ("assisted-dip", "Assisted Dip", MuscleGroup::Triceps, ExerciseType::MachineAssistance),
    // Forearms
    ("barbell-standing-wrist-curl", "Barbell Standing Wrist Curl", MuscleGroup::Forearms, ExerciseType::Barbell),
    ("cable-wrist-curl", "Cable Wrist Curl", MuscleGroup::Forearms, ExerciseType::Cable),
    ("dumbbell-bench-wrist-curl", "Dumbbell Bench Wrist Curl", MuscleGroup::Forearms, ExerciseType::Dumbbell),
    ("dumbbell-standing-wrist-curl", "Dumbbell Standing Wrist Curl", MuscleGroup::Forearms, ExerciseType::Dumbbell),
    ("grip-roller", "Grip Roller", MuscleGroup::Forearms, ExerciseType::Machine),
    ("reverse-curl", "Reverse Curl", MuscleGroup::Forearms, ExerciseType::Barbell),
    // Quads
    ("squats", "Squats", MuscleGroup::Quads, ExerciseType::Barbell),
    ("front-squat", "Front Squat", MuscleGroup::Quads, ExerciseType::Barbell),
    ("smith-machine-squat", "Smith Machine Squat", MuscleGroup::Quads, ExerciseType::SmithMachine),
    ("leg-press", "Leg Press", MuscleGroup::Quads, ExerciseType::Machine),
    ("leg-extension", "Leg Extension", MuscleGroup::Quads, ExerciseType::Machine),
    ("bulgarian-split-squat", "Bulgarian Split Squat", MuscleGroup::Quads, ExerciseType::Dumbbell),
    ("freemotion-squat", "Freemotion Squat", MuscleGroup::Quads, ExerciseType::Freemotion),
    // Hamstrings
    ("romanian-deadlift", "Romanian Deadlift", MuscleGroup::Hamstrings, ExerciseType::Barbell),
    ("lying-leg-curl", "Lying Leg Curl", MuscleGroup::Hamstrings, ExerciseType::Machine),
    ("seated-leg-curl", "Seated Leg Curl", MuscleGroup::Hamstrings, ExerciseType::Machine),
    ("nordic-curl", "Nordic Curl", MuscleGroup::Hamstrings, ExerciseType::Bodyweight),
    // Glutes
    ("hip-thrust", "Hip Thrust", MuscleGroup::Glutes, ExerciseType::Barbell),
    ("glute-bridge", "Glute Bridge", MuscleGroup::Glutes, ExerciseType::Bodyweight),
    ("cable-kickback", "Cable Kickback", MuscleGroup::Glutes, ExerciseType::Cable),
    ("hip-abduction", "Hip Abduction", MuscleGroup::Glutes, ExerciseType::Machine),
    // Calves
    ("belt-squat-calves", "Belt Squat Calves", MuscleGroup::Calves, ExerciseType::Machine),
    ("calf-machine", "Calf Machine", MuscleGroup::Calves, ExerciseType::Machine),
    ("leg-press-calves", "Leg Press Calves", MuscleGroup::Calves, ExerciseType::Machine),
    ("smith-machine-calves", "Smith Machine Calves", MuscleGroup::Calves, ExerciseType::SmithMachine),
    ("stair-calves", "Stair Calves", MuscleGroup::Calves, ExerciseType::Bodyweight),
    ("stair-calves-single-leg", "Stair Calves (Single Leg)", MuscleGroup::Calves, ExerciseType::Bodyweight),
    ("standing-calf-raise", "Standing Calf Raise", MuscleGroup::Calves, ExerciseType::Machine),
    // Abs
    ("ab-wheel", "Ab Wheel", MuscleGroup::Abs, ExerciseType::Bodyweight),
    ("cable-rope-crunch", "Cable Rope Crunch", MuscleGroup::Abs, ExerciseType::Cable),
    ("hanging-knee-raise", "Hanging Knee Raise", MuscleGroup::Abs, ExerciseType::Bodyweight),
    ("hanging-straight-leg-raise", "Hanging Straight Leg Raise", MuscleGroup::Abs, ExerciseType::Bodyweight),
    ("machine-crunch", "Machine Crunch", MuscleGroup::Abs, ExerciseType::Machine),
    ("modified-candlestick", "Modified Candlestick", MuscleGroup::Abs, ExerciseType::Bodyweight),
    ("reaching-sit-up", "Reaching Sit-Up", MuscleGroup::Abs, ExerciseType::Bodyweight),
    ("slant-board-sit-up-weighted", "Slant Board Sit-Up (Weighted)", MuscleGroup::Abs, ExerciseType::LoadedBodyweight),
    ("v-up-weighted", "V-Up (Weighted)", MuscleGroup::Abs, ExerciseType::LoadedBodyweight),
    // Traps
    ("barbell-bent-over-shrug", "Barbell Bent Over Shrug", MuscleGroup::Traps, ExerciseType::Barbell),
    ("barbell-shrug", "Barbell Shrug", MuscleGroup::Traps, ExerciseType::Barbell),
    ("cable-bent-over-shrug", "Cable Bent Over Shrug", MuscleGroup::Traps, ExerciseType::Cable),
    ("cable-shrug", "Cable Shrug", MuscleGroup::Traps, ExerciseType::Cable),
    ("cable-side-shrug", "Cable Side Shrug", MuscleGroup::Traps, ExerciseType::Cable),
    ("cable-single-arm-side-shrug", "Cable Single Arm Side Shrug", MuscleGroup::Traps, ExerciseType::Cable),
    ("dumbbell-bent-over-shrug", "Dumbbell Bent Over Shrug", MuscleGroup::Traps, ExerciseType::Dumbbell),
    ("dumbbell-leaning-shrug", "Dumbbell Leaning Shrug", MuscleGroup::Traps, ExerciseType::Dumbbell),
    ("dumbbell-shrug", "Dumbbell Shrug", MuscleGroup::Traps, ExerciseType::Dumbbell),
    ("dumbbell-shrug-seated", "Dumbbell Shrug (Seated)", MuscleGroup::Traps, ExerciseType::Dumbbell),
    ("machine-shrug", "Machine Shrug", MuscleGroup::Traps, ExerciseType::Machine),
    ("smith-machine-shrug", "Smith Machine Shrug", MuscleGroup::Traps, ExerciseType::SmithMachine),
];

/// The built-in exercise catalog. Every id carries the `default-` prefix.
pub fn default_exercises() -> Vec<Exercise> {
    DEFAULTS
        .iter()
        .map(|&(slug, name, muscle_group, exercise_type)| Exercise {
            id: format!("{}{slug}", crate::model::DEFAULT_ID_PREFIX),
            name: name.to_string(),
            muscle_group,
            exercise_type,
            notes: String::new(),
        })
        .collect()
}

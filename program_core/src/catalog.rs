//! Exercise catalog: the raw categorized database and its flattened index.
//!
//! The raw document is the nested `category -> name -> record` structure the
//! catalog is authored in. `flatten` turns it into a name-keyed index of fully
//! typed exercises, refusing to index a catalog with missing fields,
//! non-canonical vocabulary or conflicting duplicate names.

use crate::rules::GenerationRules;
use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

// ============================================================================
// Raw Database Document
// ============================================================================

/// Top-level catalog document (`{"exercise_database": {...}}`)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDatabase {
    pub exercise_database: DatabaseBody,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DatabaseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_exercises: Option<usize>,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryEntry>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: BTreeMap<String, RawExercise>,
}

/// Exercise record as authored
///
/// Every attribute is optional here so that a missing field is reported
/// against the exercise that lacks it. Unknown fields (instructions, notes)
/// are preserved when the document is rewritten.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RawExercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<RangeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<RangeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<EquipmentValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_load: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isometric: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A set/rep range written either as a bare number or as text
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RangeValue {
    Number(u32),
    Text(String),
}

/// Equipment written as a single tag (possibly "None") or a list of tags
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EquipmentValue {
    One(String),
    Many(Vec<String>),
}

impl ExerciseDatabase {
    /// Load a raw catalog document from JSON
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let db: ExerciseDatabase = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded exercise database from {:?} ({} categories)",
            path,
            db.exercise_database.categories.len()
        );
        Ok(db)
    }

    /// Write the document as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Number of records across all categories
    pub fn record_count(&self) -> usize {
        self.exercise_database
            .categories
            .values()
            .map(|c| c.exercises.len())
            .sum()
    }

    /// Copy of the database without the emom/amrap/circuit/interval categories
    ///
    /// Compound structures are assembled from individual exercises at
    /// generation time, so stored compound records are never candidates.
    /// Returns the cleaned document (with `total_exercises` recomputed) and
    /// the removed categories with their record counts.
    pub fn without_compound_categories(&self) -> (ExerciseDatabase, Vec<(String, usize)>) {
        let mut cleaned = self.clone();
        let mut removed = Vec::new();

        cleaned.exercise_database.categories.retain(|name, entry| {
            if ExerciseCategory::from(name.as_str()).is_compound() {
                removed.push((name.clone(), entry.exercises.len()));
                false
            } else {
                true
            }
        });

        for (name, count) in &removed {
            tracing::info!("Removed {} category ({} records)", name, count);
        }

        cleaned.exercise_database.total_exercises = Some(cleaned.record_count());
        (cleaned, removed)
    }
}

// ============================================================================
// Flattened Index
// ============================================================================

/// Name-keyed lookup of typed exercises, ordered by name
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogIndex {
    exercises: BTreeMap<String, Exercise>,
}

impl CatalogIndex {
    /// Build an index directly from typed exercises (duplicates must agree)
    pub fn from_exercises(exercises: impl IntoIterator<Item = Exercise>) -> Result<Self> {
        let mut index = CatalogIndex::default();
        for exercise in exercises {
            index.insert(exercise)?;
        }
        Ok(index)
    }

    fn insert(&mut self, exercise: Exercise) -> Result<()> {
        match self.exercises.get(&exercise.name) {
            Some(existing) if existing.conflicts_with(&exercise) => {
                Err(Error::DataIntegrity(format!(
                    "Exercise '{}' is defined in categories '{}' and '{}' with conflicting attributes",
                    exercise.name, existing.category, exercise.category
                )))
            }
            Some(_) => {
                tracing::debug!("Collapsed identical duplicate '{}'", exercise.name);
                Ok(())
            }
            None => {
                self.exercises.insert(exercise.name.clone(), exercise);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Exercise> {
        self.exercises.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.exercises.contains_key(name)
    }

    /// Exercises in name order
    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.values()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Check that the index can serve the given rules
    ///
    /// Returns a list of problems, or an empty Vec if the index is usable.
    pub fn validate(&self, rules: &GenerationRules) -> Vec<String> {
        let mut errors = Vec::new();

        for exercise in self.iter() {
            if exercise.name.trim().is_empty() || exercise.name.trim() != exercise.name {
                errors.push(format!(
                    "Exercise name '{}' is empty or has surrounding whitespace",
                    exercise.name
                ));
            }
            if exercise.category.is_compound() {
                errors.push(format!(
                    "Exercise '{}' is stored as a {} structure; compound categories should be removed",
                    exercise.name, exercise.category
                ));
            }
            if let ExerciseCategory::Other(other) = &exercise.category {
                errors.push(format!(
                    "Exercise '{}' has unrecognized category '{}'",
                    exercise.name, other
                ));
            }
        }

        let present: BTreeSet<&ExerciseCategory> = self.iter().map(|e| &e.category).collect();
        for (kind, block) in &rules.blocks {
            if !block.categories.iter().any(|c| present.contains(c)) {
                errors.push(format!(
                    "No exercises in any source category of block '{}'",
                    kind
                ));
            }
        }

        errors
    }
}

/// Flatten a raw database into a name-keyed index
pub fn flatten(db: &ExerciseDatabase) -> Result<CatalogIndex> {
    let mut index = CatalogIndex::default();

    for (category_name, entry) in &db.exercise_database.categories {
        let category = ExerciseCategory::from(category_name.as_str());
        for (name, raw) in &entry.exercises {
            let exercise = typed_exercise(name, category.clone(), raw)?;
            index.insert(exercise)?;
        }
    }

    let records = db.record_count();
    match db.exercise_database.total_exercises {
        Some(total) if total != records => {
            tracing::warn!(
                "Catalog declares {} exercises but contains {} records",
                total,
                records
            );
        }
        _ => {}
    }

    tracing::info!("Indexed {} exercises", index.len());
    Ok(index)
}

fn typed_exercise(name: &str, category: ExerciseCategory, raw: &RawExercise) -> Result<Exercise> {
    let missing = |field: &str| {
        Error::DataIntegrity(format!(
            "Exercise '{}' is missing required field '{}'",
            name, field
        ))
    };
    let invalid = |what: String| Error::DataIntegrity(format!("Exercise '{}': {}", name, what));

    let sets = parse_range(raw.sets.as_ref().ok_or_else(|| missing("sets"))?).map_err(invalid)?;
    let reps = parse_range(raw.reps.as_ref().ok_or_else(|| missing("reps"))?).map_err(invalid)?;

    let equipment = match raw.equipment.as_ref().ok_or_else(|| missing("equipment"))? {
        EquipmentValue::One(tag) => parse_equipment(std::slice::from_ref(tag)),
        EquipmentValue::Many(tags) => parse_equipment(tags),
    }
    .map_err(invalid)?;

    let muscle_groups = raw
        .muscle_groups
        .as_ref()
        .ok_or_else(|| missing("muscle_groups"))?
        .iter()
        .map(|m| {
            MuscleGroup::parse(m).ok_or_else(|| invalid(format!("'{}' is not a canonical muscle group", m)))
        })
        .collect::<Result<BTreeSet<_>>>()?;
    if muscle_groups.is_empty() {
        return Err(invalid("muscle_groups is empty".into()));
    }

    let difficulty = raw.difficulty.as_ref().ok_or_else(|| missing("difficulty"))?;
    let difficulty = Difficulty::parse(difficulty)
        .ok_or_else(|| invalid(format!("'{}' is not a difficulty level", difficulty)))?;

    let external_load = raw
        .external_load
        .as_ref()
        .ok_or_else(|| missing("external_load"))?;
    let external_load = ExternalLoad::parse(external_load)
        .ok_or_else(|| invalid(format!("'{}' is not an external-load class", external_load)))?;

    Ok(Exercise {
        name: name.to_string(),
        category,
        sets,
        reps,
        equipment,
        muscle_groups,
        difficulty,
        external_load,
        isometric: raw.isometric.ok_or_else(|| missing("isometric"))?,
        variations: raw
            .variations
            .clone()
            .ok_or_else(|| missing("variations"))?,
    })
}

fn parse_range(value: &RangeValue) -> std::result::Result<TypicalRange, String> {
    match value {
        RangeValue::Number(0) => Err("a range of 0 is not valid".into()),
        RangeValue::Number(n) => Ok(TypicalRange::count(*n, *n)),
        RangeValue::Text(text) => text.parse(),
    }
}

fn parse_equipment(tags: &[String]) -> std::result::Result<BTreeSet<Equipment>, String> {
    tags.iter()
        .filter(|tag| !tag.trim().eq_ignore_ascii_case("none") && !tag.trim().is_empty())
        .map(|tag| {
            Equipment::parse(tag).ok_or_else(|| format!("'{}' is not a canonical equipment tag", tag))
        })
        .collect()
}

// ============================================================================
// Built-in Database
// ============================================================================

/// Cached default database - built once and reused
static DEFAULT_DATABASE: Lazy<ExerciseDatabase> = Lazy::new(build_default_database);

/// Reference to the built-in exercise database
///
/// The database is still passed explicitly into `flatten`; nothing in the
/// generator reads it implicitly.
pub fn get_default_database() -> &'static ExerciseDatabase {
    &DEFAULT_DATABASE
}

#[derive(Clone, Copy)]
struct Seed {
    name: &'static str,
    sets: &'static str,
    reps: &'static str,
    equipment: &'static [&'static str],
    muscles: &'static [&'static str],
    difficulty: &'static str,
    load: &'static str,
    isometric: bool,
    variations: &'static [&'static str],
}

const fn seed(
    name: &'static str,
    sets: &'static str,
    reps: &'static str,
    equipment: &'static [&'static str],
    muscles: &'static [&'static str],
    difficulty: &'static str,
    load: &'static str,
) -> Seed {
    Seed {
        name,
        sets,
        reps,
        equipment,
        muscles,
        difficulty,
        load,
        isometric: false,
        variations: &[],
    }
}

impl Seed {
    const fn hold(self) -> Self {
        Seed {
            isometric: true,
            ..self
        }
    }

    const fn variations(self, variations: &'static [&'static str]) -> Self {
        Seed { variations, ..self }
    }

    fn raw(&self) -> RawExercise {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        RawExercise {
            sets: Some(RangeValue::Text(self.sets.into())),
            reps: Some(RangeValue::Text(self.reps.into())),
            equipment: Some(if self.equipment.is_empty() {
                EquipmentValue::One("None".into())
            } else {
                EquipmentValue::Many(strings(self.equipment))
            }),
            muscle_groups: Some(strings(self.muscles)),
            difficulty: Some(self.difficulty.into()),
            external_load: Some(self.load.into()),
            isometric: Some(self.isometric),
            variations: Some(strings(self.variations)),
            extra: BTreeMap::new(),
        }
    }
}

const B: &str = "Beginner";
const I: &str = "Intermediate";
const A: &str = "Advanced";

const STRENGTH: &[Seed] = &[
    seed("Barbell Back Squat", "3-5", "5-8", &["Barbell"], &["Quadriceps", "Glutes", "Hamstrings", "Core"], I, "always")
        .variations(&["High-Bar Squat", "Low-Bar Squat"]),
    seed("Barbell Bench Press", "3-5", "5-8", &["Barbell", "Bench"], &["Chest", "Shoulders", "Triceps"], I, "always")
        .variations(&["Close-Grip Bench Press"]),
    seed("Barbell Deadlift", "3-5", "3-6", &["Barbell"], &["Hamstrings", "Glutes", "Lower Back", "Back", "Traps", "Forearms"], I, "always")
        .variations(&["Sumo Deadlift"]),
    seed("Overhead Press", "3-5", "5-8", &["Barbell"], &["Shoulders", "Triceps", "Core"], I, "always"),
    seed("Barbell Row", "3-4", "6-10", &["Barbell"], &["Back", "Lats", "Biceps", "Forearms"], I, "always"),
    seed("Barbell Hip Thrust", "3-4", "8-12", &["Barbell", "Bench"], &["Glutes", "Hamstrings"], I, "always"),
    seed("Front Squat", "3-5", "3-6", &["Barbell"], &["Quadriceps", "Glutes", "Core"], A, "always"),
    seed("Pendlay Row", "3-5", "3-6", &["Barbell"], &["Back", "Lats", "Traps", "Biceps"], A, "always"),
    seed("Push Press", "3-5", "3-5", &["Barbell"], &["Shoulders", "Triceps", "Core"], A, "always"),
    seed("Power Clean", "4-6", "2-4", &["Barbell"], &["Hamstrings", "Glutes", "Quadriceps", "Traps", "Back"], A, "always"),
    seed("Dumbbell Bench Press", "3-4", "8-12", &["Dumbbells", "Bench"], &["Chest", "Shoulders", "Triceps"], B, "always")
        .variations(&["Incline Dumbbell Press"]),
    seed("Goblet Squat", "3-4", "8-12", &["Dumbbells"], &["Quadriceps", "Glutes", "Core"], B, "always"),
    seed("Dumbbell Romanian Deadlift", "3-4", "8-12", &["Dumbbells"], &["Hamstrings", "Glutes", "Lower Back"], B, "always"),
    seed("Dumbbell Shoulder Press", "3-4", "8-12", &["Dumbbells"], &["Shoulders", "Triceps"], B, "always"),
    seed("One-Arm Dumbbell Row", "3-4", "8-12", &["Dumbbells", "Bench"], &["Back", "Lats", "Biceps"], B, "always"),
    seed("Dumbbell Biceps Curl", "2-3", "10-15", &["Dumbbells"], &["Biceps", "Forearms"], B, "always")
        .variations(&["Hammer Curl"]),
    seed("Dumbbell Lateral Raise", "2-3", "12-15", &["Dumbbells"], &["Shoulders", "Traps"], B, "always"),
    seed("Dumbbell Walking Lunge", "3", "10-12", &["Dumbbells"], &["Quadriceps", "Glutes", "Hamstrings"], I, "always"),
    seed("Kettlebell Swing", "3-5", "12-20", &["Kettlebell"], &["Glutes", "Hamstrings", "Lower Back", "Core"], I, "always"),
    seed("Lat Pulldown", "3-4", "8-12", &["Cable Machine"], &["Lats", "Back", "Biceps"], B, "always"),
    seed("Seated Cable Row", "3-4", "8-12", &["Cable Machine"], &["Back", "Lats", "Traps", "Biceps"], B, "always"),
    seed("Cable Triceps Pushdown", "2-3", "10-15", &["Cable Machine"], &["Triceps"], B, "always"),
    seed("Cable Woodchop", "2-3", "10-12", &["Cable Machine"], &["Obliques", "Core", "Shoulders"], I, "always"),
    seed("Leg Press", "3-4", "10-12", &["Machine"], &["Quadriceps", "Glutes", "Hamstrings"], B, "always"),
    seed("Band Pull-Apart", "2-3", "15-20", &["Resistance Bands"], &["Shoulders", "Traps", "Back"], B, "never"),
    seed("Weighted Pull-Up", "3-5", "3-6", &["Pull-up Bar"], &["Lats", "Back", "Biceps", "Forearms"], A, "always"),
    seed("Weighted Dip", "3-5", "5-8", &["Parallel Bars"], &["Chest", "Triceps", "Shoulders"], A, "always"),
];

const BODYWEIGHT: &[Seed] = &[
    seed("Push-Up", "3-4", "8-15", &[], &["Chest", "Shoulders", "Triceps", "Core"], B, "sometimes")
        .variations(&["Incline Push-Up", "Decline Push-Up"]),
    seed("Knee Push-Up", "3", "8-12", &[], &["Chest", "Shoulders", "Triceps"], B, "never"),
    seed("Bodyweight Squat", "3-4", "12-20", &[], &["Quadriceps", "Glutes", "Hamstrings"], B, "sometimes")
        .variations(&["Air Squat"]),
    seed("Reverse Lunge", "3", "10-12", &[], &["Quadriceps", "Glutes", "Hamstrings"], B, "sometimes"),
    seed("Glute Bridge", "3", "12-15", &[], &["Glutes", "Hamstrings", "Lower Back"], B, "sometimes")
        .variations(&["Single-Leg Glute Bridge"]),
    seed("Plank", "3", "30-60 seconds", &[], &["Core", "Shoulders"], B, "never").hold(),
    seed("Side Plank", "3", "20-45 seconds", &[], &["Obliques", "Core"], B, "never").hold(),
    seed("Wall Sit", "3", "30-60 seconds", &[], &["Quadriceps", "Glutes"], B, "never").hold(),
    seed("Dead Bug", "3", "8-12", &[], &["Core", "Hip Flexors"], B, "never"),
    seed("Bird Dog", "3", "8-12", &[], &["Core", "Lower Back", "Glutes"], B, "never"),
    seed("Superman", "3", "10-15", &[], &["Lower Back", "Glutes", "Back"], B, "never"),
    seed("Prone Y-T-W Raise", "2-3", "8-12", &[], &["Shoulders", "Traps", "Back"], B, "never"),
    seed("Reverse Snow Angel", "2-3", "10-12", &[], &["Back", "Traps", "Shoulders"], B, "never"),
    seed("Calf Raise", "3", "15-20", &[], &["Calves"], B, "sometimes")
        .variations(&["Single-Leg Calf Raise"]),
    seed("Diamond Push-Up", "3", "6-12", &[], &["Triceps", "Chest", "Shoulders"], I, "sometimes"),
    seed("Pike Push-Up", "3", "6-10", &[], &["Shoulders", "Triceps"], I, "never"),
    seed("Jump Squat", "3", "10-15", &[], &["Quadriceps", "Glutes", "Calves"], I, "never"),
    seed("Bulgarian Split Squat", "3", "8-12", &["Bench"], &["Quadriceps", "Glutes", "Hamstrings"], I, "sometimes"),
    seed("Pull-Up", "3-4", "5-10", &["Pull-up Bar"], &["Lats", "Back", "Biceps", "Forearms"], I, "sometimes")
        .variations(&["Neutral-Grip Pull-Up"]),
    seed("Chin-Up", "3-4", "5-10", &["Pull-up Bar"], &["Lats", "Biceps", "Back"], I, "sometimes"),
    seed("Inverted Row", "3", "8-12", &["Pull-up Bar"], &["Back", "Lats", "Biceps"], B, "never"),
    seed("Parallel Bar Dip", "3", "6-12", &["Parallel Bars"], &["Chest", "Triceps", "Shoulders"], I, "sometimes"),
    seed("Hanging Knee Raise", "3", "8-12", &["Pull-up Bar"], &["Core", "Hip Flexors", "Forearms"], I, "never"),
    seed("Pistol Squat", "3", "3-6", &[], &["Quadriceps", "Glutes", "Hamstrings", "Core"], A, "sometimes"),
    seed("Archer Push-Up", "3", "4-8", &[], &["Chest", "Shoulders", "Triceps", "Core"], A, "never"),
    seed("Nordic Hamstring Curl", "3", "3-6", &[], &["Hamstrings", "Glutes"], A, "never"),
    seed("Handstand Push-Up", "3", "3-6", &[], &["Shoulders", "Triceps", "Traps"], A, "never"),
];

const CARDIO: &[Seed] = &[
    seed("Jumping Jacks", "2-3", "30-60 seconds", &[], &["Calves", "Shoulders", "Quadriceps"], B, "never"),
    seed("High Knees", "2-3", "30-45 seconds", &[], &["Hip Flexors", "Quadriceps", "Calves", "Core"], B, "never"),
    seed("Mountain Climbers", "2-3", "30-45 seconds", &[], &["Core", "Shoulders", "Hip Flexors", "Quadriceps"], B, "never"),
    seed("Butt Kicks", "2-3", "30-45 seconds", &[], &["Hamstrings", "Calves"], B, "never"),
    seed("Shadow Boxing", "2-3", "2-3 minutes", &[], &["Shoulders", "Core", "Obliques"], B, "never"),
    seed("Jump Rope", "3", "60-120 seconds", &["Jump Rope"], &["Calves", "Shoulders", "Forearms"], B, "never")
        .variations(&["Double Unders"]),
    seed("Burpees", "3", "10-15", &[], &["Chest", "Quadriceps", "Shoulders", "Core", "Glutes"], I, "never"),
    seed("Skater Hops", "3", "30-45 seconds", &[], &["Glutes", "Quadriceps", "Calves"], I, "never"),
    seed("Bear Crawl", "3", "30-45 seconds", &[], &["Shoulders", "Core", "Quadriceps"], I, "never"),
    seed("Box Jump", "3", "8-12", &["Box"], &["Quadriceps", "Glutes", "Calves"], I, "never"),
    seed("Medicine Ball Slam", "3", "10-15", &["Medicine Ball"], &["Shoulders", "Core", "Lats"], I, "sometimes"),
    seed("Burpee Tuck Jump", "3", "6-10", &[], &["Quadriceps", "Glutes", "Core", "Chest"], A, "never"),
];

const MOBILITY: &[Seed] = &[
    seed("Cat-Cow", "2", "8-10", &[], &["Back", "Lower Back", "Core"], B, "never"),
    seed("Arm Circles", "2", "10-15", &[], &["Shoulders"], B, "never"),
    seed("Hip Circles", "2", "10-12", &[], &["Hip Flexors", "Glutes"], B, "never"),
    seed("Leg Swings", "2", "10-15", &[], &["Hip Flexors", "Hamstrings", "Glutes"], B, "never"),
    seed("Thoracic Rotation", "2", "8-10", &[], &["Back", "Obliques"], B, "never"),
    seed("World's Greatest Stretch", "2", "5-8", &[], &["Hip Flexors", "Hamstrings", "Glutes", "Back"], B, "never"),
    seed("Inchworm", "2", "6-10", &[], &["Hamstrings", "Shoulders", "Core"], B, "never"),
    seed("Wall Slides", "2", "10-12", &[], &["Shoulders", "Traps", "Back"], B, "never"),
    seed("Shoulder Dislocates", "2", "10-15", &["Resistance Bands"], &["Shoulders", "Chest"], B, "never"),
    seed("Deep Squat Hold", "2", "30-60 seconds", &[], &["Hip Flexors", "Glutes", "Quadriceps"], B, "never").hold(),
    seed("Cossack Squat", "2-3", "6-10", &[], &["Quadriceps", "Glutes", "Hip Flexors", "Hamstrings"], I, "never"),
    seed("Full Bridge", "3", "10-20 seconds", &[], &["Shoulders", "Lower Back", "Back", "Hip Flexors"], A, "never").hold(),
];

const FLEXIBILITY: &[Seed] = &[
    seed("Child's Pose", "2", "30-60 seconds", &[], &["Back", "Lats", "Lower Back"], B, "never").hold(),
    seed("Hamstring Stretch", "2", "30-45 seconds", &[], &["Hamstrings", "Lower Back"], B, "never").hold(),
    seed("Pigeon Pose", "2", "30-60 seconds", &[], &["Glutes", "Hip Flexors"], B, "never").hold(),
    seed("Doorway Chest Stretch", "2", "30-45 seconds", &[], &["Chest", "Shoulders"], B, "never").hold(),
    seed("Overhead Triceps Stretch", "2", "20-30 seconds", &[], &["Triceps", "Shoulders", "Lats"], B, "never").hold(),
    seed("Couch Stretch", "2", "30-60 seconds", &[], &["Hip Flexors", "Quadriceps"], B, "never").hold(),
    seed("Cobra Stretch", "2", "20-30 seconds", &[], &["Core", "Lower Back", "Chest"], B, "never").hold(),
    seed("Standing Calf Stretch", "2", "30 seconds", &[], &["Calves"], B, "never").hold(),
];

/// Builds the built-in database
///
/// **Note**: prefer `get_default_database()`, which returns a cached reference.
pub fn build_default_database() -> ExerciseDatabase {
    let categories = [
        ("strength", "Loaded lifts with free weights, cables and machines", STRENGTH),
        ("bodyweight", "Strength work using bodyweight and simple apparatus", BODYWEIGHT),
        ("cardio", "Conditioning drills", CARDIO),
        ("mobility", "Dynamic range-of-motion drills", MOBILITY),
        ("flexibility", "Static stretches", FLEXIBILITY),
    ];

    let mut db = ExerciseDatabase::default();
    for (name, description, seeds) in categories {
        let exercises = seeds
            .iter()
            .map(|s| (s.name.to_string(), s.raw()))
            .collect();
        db.exercise_database.categories.insert(
            name.to_string(),
            CategoryEntry {
                description: Some(description.to_string()),
                exercises,
            },
        );
    }
    db.exercise_database.total_exercises = Some(db.record_count());
    db
}

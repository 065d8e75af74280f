//! Core domain types for program generation.
//!
//! This module defines the canonical vocabulary shared by the catalog, the
//! rule configuration and the generator:
//! - Muscle groups and equipment tags
//! - Exercise categories, difficulty and external-load classes
//! - Questionnaire enums (goal, experience)
//! - Block kinds, locations and progression schemes
//! - The typed `Exercise` record produced by the catalog index

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A closed set of named values with a canonical spelling
pub trait Vocabulary: Sized + Copy + 'static {
    fn all() -> &'static [Self];

    fn name(self) -> &'static str;

    /// Case-insensitive lookup by canonical name
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(s))
    }
}

// ============================================================================
// Catalog Vocabulary
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MuscleGroup {
    Chest,
    Back,
    Lats,
    Traps,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Core,
    Obliques,
    #[serde(rename = "Lower Back")]
    LowerBack,
    Glutes,
    Quadriceps,
    Hamstrings,
    Calves,
    #[serde(rename = "Hip Flexors")]
    HipFlexors,
}

impl Vocabulary for MuscleGroup {
    fn all() -> &'static [Self] {
        use MuscleGroup::*;
        &[
            Chest, Back, Lats, Traps, Shoulders, Biceps, Triceps, Forearms, Core, Obliques,
            LowerBack, Glutes, Quadriceps, Hamstrings, Calves, HipFlexors,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Lats => "Lats",
            MuscleGroup::Traps => "Traps",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Forearms => "Forearms",
            MuscleGroup::Core => "Core",
            MuscleGroup::Obliques => "Obliques",
            MuscleGroup::LowerBack => "Lower Back",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Quadriceps => "Quadriceps",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Calves => "Calves",
            MuscleGroup::HipFlexors => "Hip Flexors",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Equipment {
    Barbell,
    Dumbbells,
    Kettlebell,
    Bench,
    #[serde(rename = "Pull-up Bar")]
    PullUpBar,
    #[serde(rename = "Parallel Bars")]
    ParallelBars,
    #[serde(rename = "Resistance Bands")]
    ResistanceBands,
    #[serde(rename = "Cable Machine")]
    CableMachine,
    Machine,
    Box,
    #[serde(rename = "Jump Rope")]
    JumpRope,
    #[serde(rename = "Medicine Ball")]
    MedicineBall,
}

impl Vocabulary for Equipment {
    fn all() -> &'static [Self] {
        use Equipment::*;
        &[
            Barbell,
            Dumbbells,
            Kettlebell,
            Bench,
            PullUpBar,
            ParallelBars,
            ResistanceBands,
            CableMachine,
            Machine,
            Box,
            JumpRope,
            MedicineBall,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Equipment::Barbell => "Barbell",
            Equipment::Dumbbells => "Dumbbells",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::Bench => "Bench",
            Equipment::PullUpBar => "Pull-up Bar",
            Equipment::ParallelBars => "Parallel Bars",
            Equipment::ResistanceBands => "Resistance Bands",
            Equipment::CableMachine => "Cable Machine",
            Equipment::Machine => "Machine",
            Equipment::Box => "Box",
            Equipment::JumpRope => "Jump Rope",
            Equipment::MedicineBall => "Medicine Ball",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Vocabulary for Difficulty {
    fn all() -> &'static [Self] {
        &[
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

/// Whether an exercise can carry an assigned weight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExternalLoad {
    Never,
    Sometimes,
    Always,
}

impl Vocabulary for ExternalLoad {
    fn all() -> &'static [Self] {
        &[ExternalLoad::Never, ExternalLoad::Sometimes, ExternalLoad::Always]
    }

    fn name(self) -> &'static str {
        match self {
            ExternalLoad::Never => "never",
            ExternalLoad::Sometimes => "sometimes",
            ExternalLoad::Always => "always",
        }
    }
}

/// Timed group structures built from individual exercises
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CompoundKind {
    Emom,
    Amrap,
    Circuit,
    Interval,
}

impl CompoundKind {
    pub fn label(self) -> &'static str {
        match self {
            CompoundKind::Emom => "EMOM",
            CompoundKind::Amrap => "AMRAP",
            CompoundKind::Circuit => "Circuit",
            CompoundKind::Interval => "Intervals",
        }
    }
}

impl Vocabulary for CompoundKind {
    fn all() -> &'static [Self] {
        &[
            CompoundKind::Emom,
            CompoundKind::Amrap,
            CompoundKind::Circuit,
            CompoundKind::Interval,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            CompoundKind::Emom => "emom",
            CompoundKind::Amrap => "amrap",
            CompoundKind::Circuit => "circuit",
            CompoundKind::Interval => "interval",
        }
    }
}

/// Exercise category
///
/// Category names outside the known set are carried as `Other` so that the
/// catalog can still be indexed; they fail later if a progression scheme is
/// ever needed for them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", into = "String")]
pub enum ExerciseCategory {
    Strength,
    Bodyweight,
    Mobility,
    Flexibility,
    Cardio,
    Compound(CompoundKind),
    Other(String),
}

impl ExerciseCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ExerciseCategory::Strength => "strength",
            ExerciseCategory::Bodyweight => "bodyweight",
            ExerciseCategory::Mobility => "mobility",
            ExerciseCategory::Flexibility => "flexibility",
            ExerciseCategory::Cardio => "cardio",
            ExerciseCategory::Compound(kind) => kind.name(),
            ExerciseCategory::Other(other) => other,
        }
    }

    pub fn compound_kind(&self) -> Option<CompoundKind> {
        match self {
            ExerciseCategory::Compound(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_compound(&self) -> bool {
        self.compound_kind().is_some()
    }
}

impl From<&str> for ExerciseCategory {
    fn from(s: &str) -> Self {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "strength" => ExerciseCategory::Strength,
            "bodyweight" => ExerciseCategory::Bodyweight,
            "mobility" => ExerciseCategory::Mobility,
            "flexibility" => ExerciseCategory::Flexibility,
            "cardio" => ExerciseCategory::Cardio,
            other => match CompoundKind::parse(other) {
                Some(kind) => ExerciseCategory::Compound(kind),
                None => ExerciseCategory::Other(other.to_string()),
            },
        }
    }
}

impl From<String> for ExerciseCategory {
    fn from(s: String) -> Self {
        ExerciseCategory::from(s.as_str())
    }
}

impl From<ExerciseCategory> for String {
    fn from(category: ExerciseCategory) -> Self {
        category.as_str().to_string()
    }
}

impl From<CompoundKind> for ExerciseCategory {
    fn from(kind: CompoundKind) -> Self {
        ExerciseCategory::Compound(kind)
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Questionnaire Vocabulary
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    BuildMuscle,
    Tone,
    LoseWeight,
}

impl Goal {
    pub fn label(self) -> &'static str {
        match self {
            Goal::BuildMuscle => "Build Muscle",
            Goal::Tone => "Tone",
            Goal::LoseWeight => "Lose Weight",
        }
    }
}

impl Vocabulary for Goal {
    fn all() -> &'static [Self] {
        &[Goal::BuildMuscle, Goal::Tone, Goal::LoseWeight]
    }

    fn name(self) -> &'static str {
        match self {
            Goal::BuildMuscle => "build_muscle",
            Goal::Tone => "tone",
            Goal::LoseWeight => "lose_weight",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExperienceLevel {
    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
            ExperienceLevel::Expert => "Expert",
        }
    }
}

impl Vocabulary for ExperienceLevel {
    fn all() -> &'static [Self] {
        &[
            ExperienceLevel::Beginner,
            ExperienceLevel::Intermediate,
            ExperienceLevel::Advanced,
            ExperienceLevel::Expert,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
            ExperienceLevel::Expert => "expert",
        }
    }
}

/// Where a training day takes place
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Gym,
    Home,
    Outdoor,
}

// ============================================================================
// Generation Vocabulary
// ============================================================================

/// Structural slot within a training day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Warmup,
    Strength,
    Compound,
    Accessory,
    Cardio,
    Mobility,
}

impl Vocabulary for BlockKind {
    fn all() -> &'static [Self] {
        &[
            BlockKind::Warmup,
            BlockKind::Strength,
            BlockKind::Compound,
            BlockKind::Accessory,
            BlockKind::Cardio,
            BlockKind::Mobility,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            BlockKind::Warmup => "warmup",
            BlockKind::Strength => "strength",
            BlockKind::Compound => "compound",
            BlockKind::Accessory => "accessory",
            BlockKind::Cardio => "cardio",
            BlockKind::Mobility => "mobility",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Week-over-week transformation applied to an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionScheme {
    Static,
    Linear,
    Volume,
    Density,
}

impl Vocabulary for ProgressionScheme {
    fn all() -> &'static [Self] {
        &[
            ProgressionScheme::Static,
            ProgressionScheme::Linear,
            ProgressionScheme::Volume,
            ProgressionScheme::Density,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            ProgressionScheme::Static => "static",
            ProgressionScheme::Linear => "linear",
            ProgressionScheme::Volume => "volume",
            ProgressionScheme::Density => "density",
        }
    }
}

impl fmt::Display for ProgressionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact percentage stored in hundredths of a percent (72.5% = 7250)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(u32);

impl Percent {
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub const fn whole(percent: u32) -> Self {
        Self(percent * 100)
    }

    /// Convert a configured decimal, rounding to the nearest hundredth
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value > 1000.0 {
            return None;
        }
        Some(Self((value * 100.0).round() as u32))
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn saturating_add(self, other: Percent) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn times(self, n: u32) -> Self {
        Self(self.0.saturating_mul(n))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

impl Serialize for Percent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Percent::from_f64(value).ok_or_else(|| {
            serde::de::Error::custom(format!("{} is not a valid percentage", value))
        })
    }
}

// ============================================================================
// Exercise Record
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RangeUnit {
    Count,
    Seconds,
}

/// Typical set or rep range from the catalog ("3-4", "10", "30-60 seconds")
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypicalRange {
    pub min: u32,
    pub max: u32,
    pub unit: RangeUnit,
}

impl TypicalRange {
    pub fn count(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            unit: RangeUnit::Count,
        }
    }

    pub fn seconds(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            unit: RangeUnit::Seconds,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.unit == RangeUnit::Seconds
    }
}

impl FromStr for TypicalRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (numbers, multiplier, unit) = if let Some(rest) = strip_unit(
            &lowered,
            &["minutes", "minute", "mins", "min"],
        ) {
            (rest, 60, RangeUnit::Seconds)
        } else if let Some(rest) = strip_unit(&lowered, &["seconds", "second", "secs", "sec", "s"])
        {
            (rest, 1, RangeUnit::Seconds)
        } else if let Some(rest) = strip_unit(&lowered, &["reps", "rep", "sets", "set"]) {
            (rest, 1, RangeUnit::Count)
        } else {
            (lowered.as_str(), 1, RangeUnit::Count)
        };

        let parse = |part: &str| -> Result<u32, String> {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a valid range", s))
        };

        let (min, max) = match numbers.split_once('-') {
            Some((lo, hi)) => (parse(lo)?, parse(hi)?),
            None => {
                let value = parse(numbers)?;
                (value, value)
            }
        };

        if min == 0 || min > max {
            return Err(format!("'{}' is not a valid range", s));
        }

        Ok(Self {
            min: min * multiplier,
            max: max * multiplier,
            unit,
        })
    }
}

fn strip_unit<'a>(s: &'a str, suffixes: &[&str]) -> Option<&'a str> {
    suffixes
        .iter()
        .find_map(|suffix| s.strip_suffix(suffix))
        .map(str::trim_end)
        .filter(|rest| rest.ends_with(|c: char| c.is_ascii_digit()))
}

/// A fully-typed catalog exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub category: ExerciseCategory,
    pub sets: TypicalRange,
    pub reps: TypicalRange,
    pub equipment: BTreeSet<Equipment>,
    pub muscle_groups: BTreeSet<MuscleGroup>,
    pub difficulty: Difficulty,
    pub external_load: ExternalLoad,
    pub isometric: bool,
    pub variations: Vec<String>,
}

impl Exercise {
    pub fn is_bodyweight(&self) -> bool {
        self.equipment.is_empty()
    }

    /// Differing attributes, ignoring which category listed the record and
    /// the informational variations
    pub fn conflicts_with(&self, other: &Exercise) -> bool {
        self.sets != other.sets
            || self.reps != other.reps
            || self.equipment != other.equipment
            || self.muscle_groups != other.muscle_groups
            || self.difficulty != other.difficulty
            || self.external_load != other.external_load
            || self.isometric != other.isometric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3-4", TypicalRange::count(3, 4))]
    #[case("10", TypicalRange::count(10, 10))]
    #[case("8-12 reps", TypicalRange::count(8, 12))]
    #[case("30-60 seconds", TypicalRange::seconds(30, 60))]
    #[case("45s", TypicalRange::seconds(45, 45))]
    #[case("10-20 minutes", TypicalRange::seconds(600, 1200))]
    fn test_parse_typical_range(#[case] input: &str, #[case] expected: TypicalRange) {
        assert_eq!(input.parse::<TypicalRange>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("many")]
    #[case("12-8")]
    #[case("0")]
    #[case("seconds")]
    fn test_reject_malformed_range(#[case] input: &str) {
        assert!(input.parse::<TypicalRange>().is_err());
    }

    #[test]
    fn test_vocabulary_rejects_vague_terms() {
        assert_eq!(MuscleGroup::parse("hip flexors"), Some(MuscleGroup::HipFlexors));
        assert_eq!(MuscleGroup::parse("Upper Body"), None);
        assert_eq!(Equipment::parse("pull-up bar"), Some(Equipment::PullUpBar));
        assert_eq!(Equipment::parse("Gym"), None);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(ExerciseCategory::from("Strength"), ExerciseCategory::Strength);
        assert_eq!(
            ExerciseCategory::from("emom"),
            ExerciseCategory::Compound(CompoundKind::Emom)
        );
        assert!(ExerciseCategory::from("circuit").is_compound());
        assert_eq!(
            ExerciseCategory::from("yoga"),
            ExerciseCategory::Other("yoga".into())
        );
    }

    #[test]
    fn test_category_serializes_as_plain_string() {
        let json = serde_json::to_string(&ExerciseCategory::Compound(CompoundKind::Amrap)).unwrap();
        assert_eq!(json, "\"amrap\"");
        let parsed: ExerciseCategory = serde_json::from_str("\"interval\"").unwrap();
        assert_eq!(parsed, ExerciseCategory::Compound(CompoundKind::Interval));
    }

    #[test]
    fn test_percent_is_exact() {
        let start = Percent::from_f64(70.0).unwrap();
        let step = Percent::from_f64(2.5).unwrap();
        let week3 = start.saturating_add(step.times(2));
        assert_eq!(week3, Percent::whole(75));
        assert_eq!(start.saturating_add(step).to_string(), "72.5%");
        assert_eq!(Percent::from_hundredths(6125).to_string(), "61.25%");
        assert!(Percent::from_f64(-1.0).is_none());
    }

    #[test]
    fn test_serde_names_match_vocabulary() {
        for muscle in MuscleGroup::all() {
            let json = serde_json::to_string(muscle).unwrap();
            assert_eq!(json, format!("\"{}\"", muscle.name()));
        }
        for equipment in Equipment::all() {
            let json = serde_json::to_string(equipment).unwrap();
            assert_eq!(json, format!("\"{}\"", equipment.name()));
        }
    }
}

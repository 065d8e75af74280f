//! Generation rules: the typed, versionable rule configuration.
//!
//! Rules are read from TOML and validated against a fixed shape before the
//! generator uses them. Every numeric constant the generator applies lives
//! here; missing sections fall back to the built-in defaults.

use crate::focus::{normalize_focus, BaseFocus};
use crate::questionnaire::QUESTIONS;
use crate::types::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Complete rule configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerationRules {
    #[serde(default)]
    pub questionnaire: QuestionnaireRules,

    #[serde(default = "default_experience")]
    pub experience: BTreeMap<ExperienceLevel, ExperienceModifier>,

    #[serde(default = "default_focus")]
    pub focus: BTreeMap<BaseFocus, FocusMuscles>,

    #[serde(default = "default_goals")]
    pub goals: BTreeMap<Goal, GoalRule>,

    #[serde(default = "default_equipment_access")]
    pub equipment_access: BTreeMap<String, EquipmentAccess>,

    #[serde(default = "default_splits")]
    pub splits: Vec<SplitRule>,

    #[serde(default = "default_blocks")]
    pub blocks: BTreeMap<BlockKind, BlockRule>,

    #[serde(default = "default_profiles")]
    pub profiles: BTreeMap<String, BlockProfile>,

    #[serde(default)]
    pub compound: CompoundRules,

    #[serde(default)]
    pub progression: ProgressionRules,
}

impl Default for GenerationRules {
    fn default() -> Self {
        Self {
            questionnaire: QuestionnaireRules::default(),
            experience: default_experience(),
            focus: default_focus(),
            goals: default_goals(),
            equipment_access: default_equipment_access(),
            splits: default_splits(),
            blocks: default_blocks(),
            profiles: default_profiles(),
            compound: CompoundRules::default(),
            progression: ProgressionRules::default(),
        }
    }
}

/// Which questions must be answered, and defaults for the rest
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuestionnaireRules {
    #[serde(default = "default_required_questions")]
    pub required_questions: Vec<String>,

    #[serde(default = "default_answer_defaults")]
    pub defaults: AnswerDefaults,

    #[serde(default = "default_max_program_weeks")]
    pub max_program_weeks: u32,

    #[serde(default = "default_min_session_minutes")]
    pub min_session_minutes: u32,
}

impl Default for QuestionnaireRules {
    fn default() -> Self {
        Self {
            required_questions: default_required_questions(),
            defaults: default_answer_defaults(),
            max_program_weeks: default_max_program_weeks(),
            min_session_minutes: default_min_session_minutes(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct AnswerDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_frequency: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_duration: Option<u32>,
}

/// Filters applied for an experience level
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExperienceModifier {
    pub complexity_filter: Vec<Difficulty>,
    pub external_load_filter: Vec<ExternalLoad>,
}

/// Muscle groups targeted by a base focus
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FocusMuscles {
    pub include: Vec<MuscleGroup>,
    #[serde(default)]
    pub exclude: Vec<MuscleGroup>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalRule {
    /// Scheme for strength and bodyweight exercises
    pub scheme: ProgressionScheme,
    /// Appended to split labels without a suffix ("Push" -> "Push-Strength")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_suffix: Option<String>,
    /// Compound structures rotated through by day
    pub compound_kinds: Vec<CompoundKind>,
}

/// What an equipment-access answer unlocks
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EquipmentAccess {
    pub location: Location,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
}

/// Split chosen for a range of training frequencies
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SplitRule {
    pub name: String,
    pub min_days: u8,
    pub max_days: u8,
    /// Focus labels for consecutive days; the first `frequency` are used
    pub days: Vec<String>,
}

/// Candidate scope and time estimate for a block kind
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BlockRule {
    pub categories: Vec<ExerciseCategory>,
    pub minutes_per_exercise: u32,
    #[serde(default = "default_true")]
    pub match_focus: bool,
    #[serde(default = "default_true")]
    pub match_external_load: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BlockCount {
    pub block: BlockKind,
    pub count: u32,
}

/// Base blocks of a day plus the blocks that absorb spare minutes
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BlockProfile {
    pub blocks: Vec<BlockCount>,
    #[serde(default)]
    pub fill: Vec<BlockKind>,
    #[serde(default = "default_max_fill")]
    pub max_fill: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CompoundRules {
    #[serde(default)]
    pub emom: EmomRule,
    #[serde(default)]
    pub amrap: AmrapRule,
    #[serde(default)]
    pub circuit: CircuitRule,
    #[serde(default)]
    pub interval: IntervalRule,
}

impl CompoundRules {
    pub fn sub_exercises(&self, kind: CompoundKind) -> u32 {
        match kind {
            CompoundKind::Emom => self.emom.sub_exercises,
            CompoundKind::Amrap => self.amrap.sub_exercises,
            CompoundKind::Circuit => self.circuit.sub_exercises,
            CompoundKind::Interval => self.interval.sub_exercises,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmomRule {
    pub sub_exercises: u32,
    /// Starting minutes per station (3 stations x 2 = 6 minutes)
    pub minutes_per_sub_exercise: u32,
}

impl Default for EmomRule {
    fn default() -> Self {
        Self {
            sub_exercises: 3,
            minutes_per_sub_exercise: 2,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AmrapRule {
    pub sub_exercises: u32,
    pub work_minutes: u32,
}

impl Default for AmrapRule {
    fn default() -> Self {
        Self {
            sub_exercises: 3,
            work_minutes: 10,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CircuitRule {
    pub sub_exercises: u32,
    pub rounds: u32,
    pub rest_seconds: u32,
}

impl Default for CircuitRule {
    fn default() -> Self {
        Self {
            sub_exercises: 4,
            rounds: 3,
            rest_seconds: 90,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IntervalRule {
    pub sub_exercises: u32,
    pub rounds: u32,
    pub work_seconds: u32,
    pub rest_seconds: u32,
}

impl Default for IntervalRule {
    fn default() -> Self {
        Self {
            sub_exercises: 2,
            rounds: 6,
            work_seconds: 30,
            rest_seconds: 30,
        }
    }
}

/// Numeric constants for each progression scheme
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressionRules {
    /// Weight descriptor for exercises that can optionally carry load
    #[serde(default = "default_bodyweight_descriptor")]
    pub bodyweight_descriptor: String,
    /// Seconds added per step to timed holds and timed efforts
    #[serde(default = "default_hold_step_seconds")]
    pub hold_step_seconds: u32,
    #[serde(default)]
    pub linear: LinearRule,
    #[serde(default)]
    pub volume: VolumeRule,
    #[serde(default)]
    pub density: DensityRule,
    #[serde(default, rename = "static")]
    pub static_rule: StaticRule,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            bodyweight_descriptor: default_bodyweight_descriptor(),
            hold_step_seconds: default_hold_step_seconds(),
            linear: LinearRule::default(),
            volume: VolumeRule::default(),
            density: DensityRule::default(),
            static_rule: StaticRule::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LinearRule {
    pub start_percent_tm: Percent,
    pub percent_step: Percent,
    pub max_percent_tm: Percent,
    pub reps_step: u32,
    pub rest_start_seconds: u32,
    pub rest_step_seconds: u32,
    pub rest_min_seconds: u32,
}

impl Default for LinearRule {
    fn default() -> Self {
        Self {
            start_percent_tm: Percent::whole(70),
            percent_step: Percent::from_hundredths(250),
            max_percent_tm: Percent::whole(90),
            reps_step: 1,
            rest_start_seconds: 150,
            rest_step_seconds: 15,
            rest_min_seconds: 90,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VolumeRule {
    pub percent_tm: Percent,
    /// Sets (and compound rounds) grow by one every this many weeks
    pub sets_every_weeks: u32,
    pub max_sets: u32,
    pub reps_step: u32,
    pub rest_seconds: u32,
    pub sub_reps_step: u32,
    /// EMOM minutes added per station per week, rounded half-up in total
    pub emom_minutes_per_sub_exercise: f64,
    pub amrap_minutes_per_week: f64,
    pub max_rounds: u32,
}

impl Default for VolumeRule {
    fn default() -> Self {
        Self {
            percent_tm: Percent::whole(65),
            sets_every_weeks: 2,
            max_sets: 5,
            reps_step: 1,
            rest_seconds: 60,
            sub_reps_step: 1,
            emom_minutes_per_sub_exercise: 1.0,
            amrap_minutes_per_week: 2.0,
            max_rounds: 6,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DensityRule {
    pub percent_tm: Percent,
    pub reps_step: u32,
    pub rest_start_seconds: u32,
    pub rest_step_seconds: u32,
    pub rest_min_seconds: u32,
    pub sub_reps_step: u32,
    pub compound_rest_step_seconds: u32,
    pub compound_rest_min_seconds: u32,
}

impl Default for DensityRule {
    fn default() -> Self {
        Self {
            percent_tm: Percent::whole(60),
            reps_step: 1,
            rest_start_seconds: 75,
            rest_step_seconds: 10,
            rest_min_seconds: 30,
            sub_reps_step: 1,
            compound_rest_step_seconds: 10,
            compound_rest_min_seconds: 15,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StaticRule {
    pub rest_seconds: u32,
    pub load_descriptor: String,
}

impl Default for StaticRule {
    fn default() -> Self {
        Self {
            rest_seconds: 30,
            load_descriptor: "light".into(),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_max_fill() -> u32 {
    3
}

fn default_bodyweight_descriptor() -> String {
    "bodyweight".into()
}

fn default_hold_step_seconds() -> u32 {
    5
}

fn default_required_questions() -> Vec<String> {
    [
        "goal",
        "experience_level",
        "training_frequency",
        "equipment",
        "program_duration",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_answer_defaults() -> AnswerDefaults {
    AnswerDefaults {
        session_duration: Some(45),
        ..AnswerDefaults::default()
    }
}

fn default_max_program_weeks() -> u32 {
    16
}

fn default_min_session_minutes() -> u32 {
    15
}

fn default_experience() -> BTreeMap<ExperienceLevel, ExperienceModifier> {
    use Difficulty::*;
    use ExternalLoad::*;
    BTreeMap::from([
        (
            ExperienceLevel::Beginner,
            ExperienceModifier {
                complexity_filter: vec![Beginner],
                external_load_filter: vec![Never, Sometimes, Always],
            },
        ),
        (
            ExperienceLevel::Intermediate,
            ExperienceModifier {
                complexity_filter: vec![Beginner, Intermediate],
                external_load_filter: vec![Never, Sometimes, Always],
            },
        ),
        (
            ExperienceLevel::Advanced,
            ExperienceModifier {
                complexity_filter: vec![Intermediate, Advanced],
                external_load_filter: vec![Sometimes, Always],
            },
        ),
        (
            ExperienceLevel::Expert,
            ExperienceModifier {
                complexity_filter: vec![Advanced],
                external_load_filter: vec![Always],
            },
        ),
    ])
}

fn default_focus() -> BTreeMap<BaseFocus, FocusMuscles> {
    use MuscleGroup::*;
    let focus = |include: &[MuscleGroup], exclude: &[MuscleGroup]| FocusMuscles {
        include: include.to_vec(),
        exclude: exclude.to_vec(),
    };
    BTreeMap::from([
        (BaseFocus::Push, focus(&[Chest, Shoulders, Triceps], &[])),
        (
            BaseFocus::Pull,
            focus(&[Back, Lats, Traps, Biceps, Forearms], &[]),
        ),
        (
            BaseFocus::Legs,
            focus(
                &[Quadriceps, Hamstrings, Glutes, Calves, HipFlexors, Core],
                &[],
            ),
        ),
        (
            BaseFocus::Upper,
            focus(
                &[Chest, Back, Lats, Traps, Shoulders, Biceps, Triceps, Forearms],
                &[Quadriceps, Hamstrings, Glutes, Calves],
            ),
        ),
        (
            BaseFocus::Lower,
            focus(
                &[Quadriceps, Hamstrings, Glutes, Calves, HipFlexors, LowerBack, Core],
                &[Chest, Triceps],
            ),
        ),
        (BaseFocus::FullBody, focus(MuscleGroup::all(), &[])),
        (
            BaseFocus::Mobility,
            focus(
                &[HipFlexors, LowerBack, Hamstrings, Shoulders, Glutes, Back, Obliques],
                &[],
            ),
        ),
    ])
}

fn default_goals() -> BTreeMap<Goal, GoalRule> {
    BTreeMap::from([
        (
            Goal::BuildMuscle,
            GoalRule {
                scheme: ProgressionScheme::Linear,
                focus_suffix: Some("Strength".into()),
                compound_kinds: vec![CompoundKind::Emom],
            },
        ),
        (
            Goal::Tone,
            GoalRule {
                scheme: ProgressionScheme::Volume,
                focus_suffix: Some("Volume".into()),
                compound_kinds: vec![CompoundKind::Circuit, CompoundKind::Emom],
            },
        ),
        (
            Goal::LoseWeight,
            GoalRule {
                scheme: ProgressionScheme::Density,
                focus_suffix: Some("HIIT".into()),
                compound_kinds: vec![
                    CompoundKind::Interval,
                    CompoundKind::Amrap,
                    CompoundKind::Emom,
                    CompoundKind::Circuit,
                ],
            },
        ),
    ])
}

fn default_equipment_access() -> BTreeMap<String, EquipmentAccess> {
    use Equipment::*;
    let access = |location: Location, equipment: &[Equipment]| EquipmentAccess {
        location,
        equipment: equipment.to_vec(),
    };
    BTreeMap::from([
        ("full_gym".to_string(), access(Location::Gym, Equipment::all())),
        (
            "home_dumbbells".to_string(),
            access(Location::Home, &[Dumbbells, Bench, ResistanceBands, PullUpBar]),
        ),
        (
            "minimal".to_string(),
            access(Location::Home, &[ResistanceBands, PullUpBar, JumpRope]),
        ),
        (
            "outdoor".to_string(),
            access(Location::Outdoor, &[PullUpBar, ParallelBars, JumpRope]),
        ),
        ("bodyweight_only".to_string(), access(Location::Home, &[])),
    ])
}

fn default_splits() -> Vec<SplitRule> {
    let split = |name: &str, min_days: u8, max_days: u8, days: &[&str]| SplitRule {
        name: name.into(),
        min_days,
        max_days,
        days: days.iter().map(|d| d.to_string()).collect(),
    };
    vec![
        split(
            "Full Body",
            1,
            3,
            &["Full Body", "Full Body", "Full Body"],
        ),
        split("Upper/Lower", 4, 4, &["Upper", "Lower", "Upper", "Lower"]),
        split(
            "Push/Pull/Legs + Upper/Lower",
            5,
            5,
            &["Push", "Pull", "Legs", "Upper", "Lower"],
        ),
        split(
            "Push/Pull/Legs",
            6,
            7,
            &["Push", "Pull", "Legs", "Push", "Pull", "Legs", "Mobility-Recovery"],
        ),
    ]
}

fn default_blocks() -> BTreeMap<BlockKind, BlockRule> {
    use ExerciseCategory::*;
    let block = |categories: &[ExerciseCategory],
                 minutes_per_exercise: u32,
                 match_focus: bool,
                 match_external_load: bool| BlockRule {
        categories: categories.to_vec(),
        minutes_per_exercise,
        match_focus,
        match_external_load,
    };
    BTreeMap::from([
        (BlockKind::Warmup, block(&[Mobility, Cardio], 4, false, false)),
        (BlockKind::Strength, block(&[Strength, Bodyweight], 10, true, true)),
        (
            BlockKind::Compound,
            block(&[Strength, Bodyweight, Cardio], 12, true, true),
        ),
        (BlockKind::Accessory, block(&[Strength, Bodyweight], 7, true, true)),
        (BlockKind::Cardio, block(&[Cardio], 8, false, false)),
        (
            BlockKind::Mobility,
            block(&[Mobility, Flexibility], 4, true, false),
        ),
    ])
}

fn default_profiles() -> BTreeMap<String, BlockProfile> {
    use BlockKind::*;
    let profile = |blocks: &[(BlockKind, u32)], fill: &[BlockKind]| BlockProfile {
        blocks: blocks
            .iter()
            .map(|&(block, count)| BlockCount { block, count })
            .collect(),
        fill: fill.to_vec(),
        max_fill: default_max_fill(),
    };
    BTreeMap::from([
        (
            "default".to_string(),
            profile(
                &[(Warmup, 1), (Strength, 2), (Accessory, 1)],
                &[Accessory, Cardio],
            ),
        ),
        (
            "Strength".to_string(),
            profile(
                &[(Warmup, 1), (Strength, 3), (Accessory, 1)],
                &[Accessory, Mobility],
            ),
        ),
        (
            "Volume".to_string(),
            profile(
                &[(Warmup, 1), (Strength, 2), (Compound, 1), (Accessory, 1)],
                &[Accessory, Cardio],
            ),
        ),
        (
            "HIIT".to_string(),
            profile(
                &[(Warmup, 1), (Compound, 1), (Strength, 1), (Cardio, 1)],
                &[Cardio, Accessory],
            ),
        ),
        (
            "Recovery".to_string(),
            profile(&[(Warmup, 1), (Mobility, 3)], &[Mobility]),
        ),
    ])
}

impl GenerationRules {
    /// Load rules from a TOML file (missing sections use defaults)
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let rules: GenerationRules = toml::from_str(&contents)?;
        tracing::info!("Loaded generation rules from {:?}", path);
        Ok(rules)
    }

    /// Load rules and reject them if they fail `validate`
    pub fn load_validated(path: &Path) -> Result<Self> {
        let rules = Self::load_from(path)?;
        rules.ensure_valid()?;
        Ok(rules)
    }

    /// Save the rules as pretty TOML
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        tracing::info!("Saved generation rules to {:?}", path);
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize rules: {}", e)))
    }

    /// Turn `validate` findings into a configuration error
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(errors.join("; ")))
        }
    }

    pub fn experience_modifier(&self, level: ExperienceLevel) -> Result<&ExperienceModifier> {
        self.experience.get(&level).ok_or_else(|| {
            Error::Config(format!("No experience modifier for '{}'", level.name()))
        })
    }

    pub fn focus_muscles(&self, base: BaseFocus) -> Result<&FocusMuscles> {
        self.focus
            .get(&base)
            .ok_or_else(|| Error::Config(format!("No muscle-group mapping for focus '{}'", base)))
    }

    pub fn goal(&self, goal: Goal) -> Result<&GoalRule> {
        self.goals
            .get(&goal)
            .ok_or_else(|| Error::Config(format!("No rule for goal '{}'", goal.name())))
    }

    pub fn block(&self, kind: BlockKind) -> Result<&BlockRule> {
        self.blocks
            .get(&kind)
            .ok_or_else(|| Error::Config(format!("No definition for block '{}'", kind)))
    }

    pub fn equipment_access(&self, descriptor: &str) -> Result<&EquipmentAccess> {
        self.equipment_access.get(descriptor).ok_or_else(|| {
            Error::Questionnaire(format!(
                "Unknown equipment access '{}' (expected one of: {})",
                descriptor,
                self.equipment_access
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }

    /// Split covering a training frequency
    pub fn split_for(&self, frequency: u8) -> Result<&SplitRule> {
        self.splits
            .iter()
            .find(|s| (s.min_days..=s.max_days).contains(&frequency))
            .ok_or_else(|| {
                Error::Questionnaire(format!("No split covers {} days per week", frequency))
            })
    }

    /// Profile for a focus: by suffix, then by base focus name, then `default`
    pub fn profile_for(&self, focus: &crate::focus::FocusLabel) -> Result<(&str, &BlockProfile)> {
        let find = |key: &str| {
            self.profiles
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
        };
        focus
            .suffix
            .as_deref()
            .and_then(find)
            .or_else(|| find(focus.base.name()))
            .or_else(|| find("default"))
            .map(|(name, profile)| (name.as_str(), profile))
            .ok_or_else(|| Error::Config("No 'default' block profile".into()))
    }

    /// Validate the rules for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for question in &self.questionnaire.required_questions {
            if !QUESTIONS.contains(&question.as_str()) {
                errors.push(format!("Unknown required question '{}'", question));
            }
        }
        if self.questionnaire.max_program_weeks == 0 {
            errors.push("questionnaire.max_program_weeks must be at least 1".into());
        }

        for level in ExperienceLevel::all() {
            match self.experience.get(level) {
                None => errors.push(format!("Missing experience modifier '{}'", level.name())),
                Some(modifier) => {
                    if modifier.complexity_filter.is_empty() {
                        errors.push(format!(
                            "Experience '{}' has an empty complexity_filter",
                            level.name()
                        ));
                    }
                    if modifier.external_load_filter.is_empty() {
                        errors.push(format!(
                            "Experience '{}' has an empty external_load_filter",
                            level.name()
                        ));
                    }
                }
            }
        }

        for base in BaseFocus::all() {
            match self.focus.get(base) {
                None => errors.push(format!("Missing focus mapping '{}'", base)),
                Some(muscles) => {
                    if muscles.include.is_empty() {
                        errors.push(format!("Focus '{}' has an empty include list", base));
                    }
                    let include: BTreeSet<_> = muscles.include.iter().collect();
                    if muscles.exclude.iter().any(|m| include.contains(m)) {
                        errors.push(format!(
                            "Focus '{}' includes and excludes the same muscle group",
                            base
                        ));
                    }
                }
            }
        }

        for goal in Goal::all() {
            match self.goals.get(goal) {
                None => errors.push(format!("Missing goal rule '{}'", goal.name())),
                Some(rule) => {
                    if rule.compound_kinds.is_empty() {
                        errors.push(format!("Goal '{}' has no compound kinds", goal.name()));
                    }
                    if rule.scheme == ProgressionScheme::Static {
                        errors.push(format!(
                            "Goal '{}' cannot use the static scheme for strength work",
                            goal.name()
                        ));
                    }
                }
            }
        }

        if self.equipment_access.is_empty() {
            errors.push("No equipment access descriptors defined".into());
        }

        self.validate_splits(&mut errors);
        self.validate_blocks(&mut errors);
        self.validate_progression(&mut errors);

        errors
    }

    fn validate_splits(&self, errors: &mut Vec<String>) {
        for split in &self.splits {
            if split.min_days == 0 || split.min_days > split.max_days {
                errors.push(format!("Split '{}' has an invalid day range", split.name));
            }
            if split.days.len() < usize::from(split.max_days) {
                errors.push(format!(
                    "Split '{}' lists {} days but covers up to {}",
                    split.name,
                    split.days.len(),
                    split.max_days
                ));
            }
            for label in &split.days {
                if let Err(e) = normalize_focus(label) {
                    errors.push(format!("Split '{}': {}", split.name, e));
                }
            }
        }
        for frequency in 1..=7u8 {
            let covering = self
                .splits
                .iter()
                .filter(|s| (s.min_days..=s.max_days).contains(&frequency))
                .count();
            if covering != 1 {
                errors.push(format!(
                    "{} splits cover {} days per week (expected exactly 1)",
                    covering, frequency
                ));
            }
        }
    }

    fn validate_blocks(&self, errors: &mut Vec<String>) {
        for kind in BlockKind::all() {
            match self.blocks.get(kind) {
                None => errors.push(format!("Missing block definition '{}'", kind)),
                Some(block) => {
                    if block.categories.is_empty() {
                        errors.push(format!("Block '{}' has no source categories", kind));
                    }
                    if block.categories.iter().any(|c| c.is_compound()) {
                        errors.push(format!(
                            "Block '{}' draws from a compound category; compound structures are built from individual exercises",
                            kind
                        ));
                    }
                    if block.minutes_per_exercise == 0 {
                        errors.push(format!("Block '{}' has zero minutes per exercise", kind));
                    }
                }
            }
        }

        if !self.profiles.contains_key("default") {
            errors.push("Missing 'default' block profile".into());
        }
        for (name, profile) in &self.profiles {
            if profile.blocks.is_empty() {
                errors.push(format!("Profile '{}' has no blocks", name));
            }
            let mut seen = BTreeSet::new();
            for count in &profile.blocks {
                if count.count == 0 {
                    errors.push(format!(
                        "Profile '{}' has a zero count for block '{}'",
                        name, count.block
                    ));
                }
                if !seen.insert(count.block) {
                    errors.push(format!(
                        "Profile '{}' lists block '{}' more than once",
                        name, count.block
                    ));
                }
            }
        }

        for kind in CompoundKind::all() {
            if self.compound.sub_exercises(*kind) == 0 {
                errors.push(format!("Compound '{}' needs at least one sub-exercise", kind.name()));
            }
        }
    }

    fn validate_progression(&self, errors: &mut Vec<String>) {
        let p = &self.progression;
        let hundred = Percent::whole(100);
        for (name, percent) in [
            ("linear.start_percent_tm", p.linear.start_percent_tm),
            ("linear.max_percent_tm", p.linear.max_percent_tm),
            ("volume.percent_tm", p.volume.percent_tm),
            ("density.percent_tm", p.density.percent_tm),
        ] {
            if percent > hundred {
                errors.push(format!("progression.{} exceeds 100%", name));
            }
        }
        if p.linear.start_percent_tm > p.linear.max_percent_tm {
            errors.push("progression.linear.start_percent_tm exceeds max_percent_tm".into());
        }
        if p.linear.rest_min_seconds > p.linear.rest_start_seconds {
            errors.push("progression.linear.rest_min_seconds exceeds rest_start_seconds".into());
        }
        if p.density.rest_min_seconds > p.density.rest_start_seconds {
            errors.push("progression.density.rest_min_seconds exceeds rest_start_seconds".into());
        }
        if p.hold_step_seconds == 0 {
            errors.push("progression.hold_step_seconds must be at least 1".into());
        }
        if p.volume.sets_every_weeks == 0 {
            errors.push("progression.volume.sets_every_weeks must be at least 1".into());
        }
        for (name, rate) in [
            (
                "volume.emom_minutes_per_sub_exercise",
                p.volume.emom_minutes_per_sub_exercise,
            ),
            ("volume.amrap_minutes_per_week", p.volume.amrap_minutes_per_week),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                errors.push(format!("progression.{} must be a non-negative number", name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusLabel;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_rules_validate() {
        let errors = GenerationRules::default().validate();
        assert!(errors.is_empty(), "Default rules have errors: {:?}", errors);
    }

    #[test]
    fn test_rules_roundtrip_through_toml() {
        let rules = GenerationRules::default();
        let text = rules.to_toml().unwrap();
        let parsed: GenerationRules = toml::from_str(&text).unwrap();
        assert_eq!(rules, parsed);
    }

    #[test]
    fn test_partial_rules_use_defaults() {
        let text = r#"
[progression.linear]
start_percent_tm = 72.5
percent_step = 5
max_percent_tm = 95
reps_step = 2
rest_start_seconds = 180
rest_step_seconds = 30
rest_min_seconds = 90
"#;
        let rules: GenerationRules = toml::from_str(text).unwrap();
        assert_eq!(
            rules.progression.linear.start_percent_tm,
            Percent::from_hundredths(7250)
        );
        assert_eq!(rules.progression.volume, VolumeRule::default());
        assert_eq!(rules.focus, default_focus());
    }

    #[test]
    fn test_load_and_save_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("rules").join("rules.toml");

        GenerationRules::default().save_to(&path).unwrap();
        let loaded = GenerationRules::load_validated(&path).unwrap();
        assert_eq!(loaded, GenerationRules::default());
    }

    #[test]
    fn test_overlapping_splits_rejected() {
        let mut rules = GenerationRules::default();
        rules.splits[1].min_days = 3;
        let errors = rules.validate();
        assert!(errors.iter().any(|e| e.contains("cover 3 days")));
    }

    #[test]
    fn test_missing_focus_rejected() {
        let mut rules = GenerationRules::default();
        rules.focus.remove(&BaseFocus::Pull);
        assert!(rules.ensure_valid().is_err());
    }

    #[test]
    fn test_compound_source_category_rejected() {
        let mut rules = GenerationRules::default();
        rules
            .blocks
            .get_mut(&BlockKind::Compound)
            .unwrap()
            .categories
            .push(ExerciseCategory::Compound(CompoundKind::Emom));
        let errors = rules.validate();
        assert!(errors.iter().any(|e| e.contains("compound category")));
    }

    #[test]
    fn test_profile_lookup_order() {
        let rules = GenerationRules::default();

        let (name, _) = rules
            .profile_for(&FocusLabel::new(BaseFocus::Push, Some("hiit")))
            .unwrap();
        assert_eq!(name, "HIIT");

        let (name, _) = rules
            .profile_for(&FocusLabel::new(BaseFocus::Mobility, Some("Recovery")))
            .unwrap();
        assert_eq!(name, "Recovery");

        let mut with_legs = rules.clone();
        let legs = with_legs.profiles["default"].clone();
        with_legs.profiles.insert("Legs".into(), legs);
        let (name, _) = with_legs
            .profile_for(&FocusLabel::new(BaseFocus::Legs, Some("Unlisted")))
            .unwrap();
        assert_eq!(name, "Legs");

        let (name, _) = rules
            .profile_for(&FocusLabel::new(BaseFocus::Legs, Some("Unlisted")))
            .unwrap();
        assert_eq!(name, "default");
    }

    #[test]
    fn test_unknown_equipment_access() {
        let rules = GenerationRules::default();
        let err = rules.equipment_access("spaceship").unwrap_err();
        assert!(err.to_string().contains("bodyweight_only"));
    }
}

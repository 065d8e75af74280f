//! Program generation pipeline.
//!
//! Generation runs in a fixed order for every day of the week:
//! 1. Structure: split, focus label and block counts from the answers
//! 2. Filter: candidate pool per block, failing on an empty pool
//! 3. Select: greedy picks with day-level de-duplication, failing when
//!    nothing unused is left
//! 4. Progress: per-week parameters from the category's scheme
//!
//! The finished program passes through `validate` before it is returned.

use crate::catalog::CatalogIndex;
use crate::filter::{filter_candidates, Constraints, FilterTrace};
use crate::progression::{parameterize, scheme_for};
use crate::program::{ParameterizedDay, ParameterizedWorkout};
use crate::questionnaire::QuestionnaireAnswers;
use crate::rules::GenerationRules;
use crate::selector::{select_for_block, DayState, PartialSelection, SelectionContext};
use crate::structure::structure_program;
use crate::types::*;
use crate::validate::validate;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Namespace for program ids derived from the answers
const PROGRAM_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_52a4_93d7_4e0b_8a51_2f6e_d0c3_b947);

/// A generated program plus the blocks that came up short
#[derive(Clone, Debug)]
pub struct GenerationReport {
    pub workout: ParameterizedWorkout,
    pub warnings: Vec<PartialSelection>,
}

/// Generate a complete multi-week program
pub fn generate_program(
    answers: &QuestionnaireAnswers,
    index: &CatalogIndex,
    rules: &GenerationRules,
) -> Result<GenerationReport> {
    rules.ensure_valid()?;
    answers.check(rules)?;
    let skeletons = structure_program(answers, rules)?;
    let split = rules.split_for(answers.training_frequency)?;
    let constraints = constraints_for(answers, rules)?;

    tracing::info!(
        goal = answers.goal.name(),
        experience = answers.experience_level.name(),
        equipment = %answers.equipment,
        weeks = answers.program_duration,
        catalog = index.len(),
        "Generating program"
    );

    let mut days = BTreeMap::new();
    let mut warnings = Vec::new();

    for skeleton in &skeletons {
        let focus_muscles = &rules.focus_muscles(skeleton.focus.base)?.include;
        let ctx = SelectionContext {
            day_number: skeleton.day_number,
            focus: &skeleton.focus,
            focus_muscles,
            compound: &rules.compound,
        };
        let mut state = DayState::default();
        let mut exercises = Vec::new();

        for spec in &skeleton.blocks {
            let pool = filter_candidates(index, spec.kind, &skeleton.focus, &constraints, rules)?
                .into_pool()?;
            let selection = select_for_block(&pool, spec, &mut state, &ctx)?;
            warnings.extend(selection.warning);

            for item in &selection.items {
                let scheme = scheme_for(item.name(), &item.category(), answers.goal, rules)?;
                tracing::debug!(
                    day = skeleton.day_number,
                    exercise = item.name(),
                    scheme = %scheme,
                    "Parameterizing"
                );
                exercises.push(parameterize(
                    item,
                    scheme,
                    answers.program_duration,
                    &rules.progression,
                )?);
            }
        }

        days.insert(
            skeleton.day_number,
            ParameterizedDay {
                day_number: skeleton.day_number,
                location: skeleton.location,
                focus: skeleton.focus.to_string(),
                exercises,
            },
        );
    }

    let total: u32 = skeletons.iter().map(|d| d.estimated_minutes).sum();
    let count = skeletons.len().max(1) as u32;

    let workout = ParameterizedWorkout {
        id: program_id(answers)?,
        name: format!(
            "{} {} - {} Weeks",
            answers.goal.label(),
            split.name,
            answers.program_duration
        ),
        weeks: answers.program_duration,
        days_per_week: u32::from(answers.training_frequency),
        difficulty: answers.experience_level,
        equipment: answers.equipment.clone(),
        estimated_duration: (total + count / 2) / count,
        days,
    };

    let issues = validate(&workout, index);
    if !issues.is_empty() {
        for issue in &issues {
            tracing::error!(%issue, "Generated program failed validation");
        }
        return Err(Error::Validation(issues));
    }

    tracing::info!(
        name = %workout.name,
        days = workout.days.len(),
        warnings = warnings.len(),
        "Program generated"
    );

    Ok(GenerationReport { workout, warnings })
}

/// Filter trace for one block of one day
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PoolReport {
    pub day: u32,
    pub focus: String,
    pub block: BlockKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compound: Option<CompoundKind>,
    pub trace: FilterTrace,
    pub candidates: Vec<String>,
}

/// Run structure and filtering only, reporting every pool without failing
/// on empty ones
pub fn diagnose(
    answers: &QuestionnaireAnswers,
    index: &CatalogIndex,
    rules: &GenerationRules,
) -> Result<Vec<PoolReport>> {
    rules.ensure_valid()?;
    answers.check(rules)?;
    let constraints = constraints_for(answers, rules)?;
    let mut reports = Vec::new();

    for skeleton in structure_program(answers, rules)? {
        for spec in &skeleton.blocks {
            let outcome = filter_candidates(index, spec.kind, &skeleton.focus, &constraints, rules)?;
            reports.push(PoolReport {
                day: skeleton.day_number,
                focus: skeleton.focus.to_string(),
                block: spec.kind,
                compound: spec.compound,
                candidates: outcome.candidates.iter().map(|e| e.name.clone()).collect(),
                trace: outcome.trace,
            });
        }
    }

    Ok(reports)
}

fn constraints_for(answers: &QuestionnaireAnswers, rules: &GenerationRules) -> Result<Constraints> {
    let access = rules.equipment_access(&answers.equipment)?;
    Ok(Constraints {
        experience: answers.experience_level,
        allowed_equipment: access.equipment.iter().copied().collect(),
    })
}

fn program_id(answers: &QuestionnaireAnswers) -> Result<Uuid> {
    let bytes = serde_json::to_vec(answers)?;
    Ok(Uuid::new_v5(&PROGRAM_NAMESPACE, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterStep;
    use crate::logging::init_test;
    use crate::program::ParameterizedExercise;
    use crate::test_support::{answers, default_index, exercise};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn day_names(exercise: &ParameterizedExercise) -> Vec<&str> {
        std::iter::once(exercise.name.as_str())
            .chain(exercise.sub_exercises.iter().flatten().map(|s| s.name.as_str()))
            .collect()
    }

    #[test]
    fn test_generation_is_deterministic() {
        init_test();
        let index = default_index();
        let rules = GenerationRules::default();
        let a = answers(Goal::BuildMuscle, ExperienceLevel::Intermediate, 4, "full_gym", 6);

        let first = generate_program(&a, &index, &rules).unwrap();
        let second = generate_program(&a, &index, &rules).unwrap();

        assert_eq!(
            first.workout.to_json(true).unwrap(),
            second.workout.to_json(true).unwrap()
        );
        assert_eq!(first.workout.id, second.workout.id);

        let other = answers(Goal::BuildMuscle, ExperienceLevel::Intermediate, 4, "full_gym", 8);
        let third = generate_program(&other, &index, &rules).unwrap();
        assert_ne!(first.workout.id, third.workout.id);
    }

    #[test]
    fn test_beginner_bodyweight_tone_program() {
        let index = default_index();
        let a = answers(Goal::Tone, ExperienceLevel::Beginner, 3, "bodyweight_only", 3);
        let report = generate_program(&a, &index, &GenerationRules::default()).unwrap();
        let workout = &report.workout;

        assert_eq!(workout.name, "Tone Full Body - 3 Weeks");
        assert_eq!(workout.days.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(workout.estimated_duration, 43);
        assert_eq!(workout.difficulty, ExperienceLevel::Beginner);

        for day in workout.days.values() {
            assert_eq!(day.location, Location::Home);
            assert_eq!(day.focus, "Full Body-Volume");
            for exercise in &day.exercises {
                for name in day_names(exercise) {
                    if let Some(record) = index.get(name) {
                        assert!(record.is_bodyweight(), "{} needs equipment", name);
                    }
                }
                assert_eq!(exercise.weeks.len(), 3);
            }
            assert_eq!(day.exercises.iter().filter(|e| e.is_compound_parent()).count(), 1);
        }
    }

    #[rstest]
    #[case(Goal::BuildMuscle, 2)]
    #[case(Goal::Tone, 4)]
    #[case(Goal::Tone, 5)]
    #[case(Goal::LoseWeight, 3)]
    #[case(Goal::LoseWeight, 7)]
    fn test_no_duplicate_names_within_a_day(#[case] goal: Goal, #[case] frequency: u8) {
        let index = default_index();
        let a = answers(goal, ExperienceLevel::Intermediate, frequency, "full_gym", 4);
        let report = generate_program(&a, &index, &GenerationRules::default()).unwrap();

        assert_eq!(report.workout.days.len(), usize::from(frequency));
        for day in report.workout.days.values() {
            let names: Vec<&str> = day.exercises.iter().flat_map(day_names).collect();
            let unique: BTreeSet<&str> = names.iter().copied().collect();
            assert_eq!(names.len(), unique.len(), "day {}", day.day_number);
        }
    }

    #[test]
    fn test_compound_parents_hold_their_time() {
        let index = default_index();
        let a = answers(Goal::LoseWeight, ExperienceLevel::Intermediate, 3, "full_gym", 4);
        let report = generate_program(&a, &index, &GenerationRules::default()).unwrap();

        let parents: Vec<&ParameterizedExercise> = report
            .workout
            .days
            .values()
            .flat_map(|d| d.exercises.iter())
            .filter(|e| e.is_compound_parent())
            .collect();
        assert_eq!(parents.len(), 3);

        for parent in parents {
            let first = parent.weeks.get(1).unwrap();
            for (_, week) in parent.weeks.iter() {
                assert_eq!(week.work_time, first.work_time);
                assert_eq!(week.sets, first.sets);
                assert!(week.reps.is_none());
            }
        }
    }

    fn advanced_only_index() -> CatalogIndex {
        let mut bridge = exercise("Full Bridge", ExerciseCategory::Mobility, &[MuscleGroup::Back]);
        bridge.difficulty = Difficulty::Advanced;
        let mut archer = exercise(
            "Archer Push-Up",
            ExerciseCategory::Bodyweight,
            &[MuscleGroup::Chest, MuscleGroup::Quadriceps],
        );
        archer.difficulty = Difficulty::Advanced;
        CatalogIndex::from_exercises([bridge, archer]).unwrap()
    }

    #[test]
    fn test_expert_bodyweight_pool_exhausted() {
        let a = answers(Goal::Tone, ExperienceLevel::Expert, 3, "bodyweight_only", 3);
        let err = generate_program(&a, &advanced_only_index(), &GenerationRules::default()).unwrap_err();

        match err {
            Error::PoolExhausted { block, focus, step } => {
                assert_eq!(block, "strength");
                assert_eq!(focus, "Full Body-Volume");
                assert_eq!(step, "external_load");
            }
            other => panic!("Expected PoolExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_pool_used_up_earlier_in_the_day() {
        let index = CatalogIndex::from_exercises([
            exercise("Arm Circles", ExerciseCategory::Mobility, &[MuscleGroup::Shoulders]),
            exercise("Push-Up", ExerciseCategory::Bodyweight, &[MuscleGroup::Chest]),
            exercise("Squat", ExerciseCategory::Bodyweight, &[MuscleGroup::Quadriceps]),
        ])
        .unwrap();
        let a = answers(Goal::Tone, ExperienceLevel::Beginner, 1, "bodyweight_only", 3);
        let err = generate_program(&a, &index, &GenerationRules::default()).unwrap_err();

        // Strength takes both bodyweight moves, leaving the compound block nothing
        match err {
            Error::PoolExhausted { block, focus, step } => {
                assert_eq!(block, "compound");
                assert_eq!(focus, "Full Body-Volume");
                assert_eq!(step, "day_dedup");
            }
            other => panic!("Expected PoolExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_unvalidated_rules_rejected() {
        let mut rules = GenerationRules::default();
        rules.goals.get_mut(&Goal::Tone).unwrap().compound_kinds.clear();
        let a = answers(Goal::Tone, ExperienceLevel::Beginner, 3, "bodyweight_only", 3);

        let err = generate_program(&a, &default_index(), &rules).unwrap_err();
        assert!(matches!(&err, Error::Config(msg) if msg.contains("no compound kinds")));
        assert!(matches!(diagnose(&a, &default_index(), &rules), Err(Error::Config(_))));
    }

    #[test]
    fn test_diagnose_reports_empty_pools() {
        let a = answers(Goal::Tone, ExperienceLevel::Expert, 3, "bodyweight_only", 3);
        let reports = diagnose(&a, &advanced_only_index(), &GenerationRules::default()).unwrap();

        assert_eq!(reports.iter().filter(|r| r.day == 1).count(), 4);
        let warmup = &reports[0];
        assert_eq!(warmup.block, BlockKind::Warmup);
        assert_eq!(warmup.candidates, vec!["Full Bridge".to_string()]);

        let strength = &reports[1];
        assert_eq!(strength.trace.emptied_by(), Some(FilterStep::ExternalLoad));
        assert!(strength.candidates.is_empty());
        assert_eq!(reports[2].compound, Some(CompoundKind::Circuit));
    }

    #[test]
    fn test_invalid_answers_rejected() {
        let mut a = answers(Goal::Tone, ExperienceLevel::Beginner, 3, "full_gym", 3);
        a.program_duration = 0;
        let result = generate_program(&a, &default_index(), &GenerationRules::default());
        assert!(matches!(result, Err(Error::Questionnaire(_))));
    }
}

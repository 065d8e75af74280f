//! Candidate filtering for a single block of a training day.
//!
//! Filtering runs as an ordered chain of steps, each narrowing the previous
//! step's survivors. The survivor count after every step is kept in a
//! `FilterTrace` so an empty pool can be attributed to the step that emptied
//! it.

use crate::catalog::CatalogIndex;
use crate::focus::FocusLabel;
use crate::rules::GenerationRules;
use crate::types::*;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FilterStep {
    Category,
    Equipment,
    MuscleGroup,
    Difficulty,
    ExternalLoad,
}

impl FilterStep {
    pub fn name(self) -> &'static str {
        match self {
            FilterStep::Category => "category",
            FilterStep::Equipment => "equipment",
            FilterStep::MuscleGroup => "muscle_group",
            FilterStep::Difficulty => "difficulty",
            FilterStep::ExternalLoad => "external_load",
        }
    }
}

impl fmt::Display for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Survivors after one step
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StepCount {
    pub step: FilterStep,
    /// False when the block definition skips this step
    pub applied: bool,
    pub remaining: usize,
}

/// Per-step survivor counts for one block
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct FilterTrace {
    /// Size of the whole catalog before scoping to the block's categories
    pub catalog_size: usize,
    pub steps: Vec<StepCount>,
}

impl FilterTrace {
    /// First step that left no survivors
    pub fn emptied_by(&self) -> Option<FilterStep> {
        self.steps
            .iter()
            .find(|s| s.remaining == 0)
            .map(|s| s.step)
    }

    pub fn remaining(&self) -> usize {
        self.steps.last().map_or(self.catalog_size, |s| s.remaining)
    }
}

/// Filtered candidates for one block, in name order
#[derive(Clone, Debug)]
pub struct FilterOutcome<'a> {
    pub block: BlockKind,
    pub focus: FocusLabel,
    pub candidates: Vec<&'a Exercise>,
    pub trace: FilterTrace,
}

impl<'a> FilterOutcome<'a> {
    /// Candidates, or `PoolExhausted` naming the step that emptied the pool
    pub fn into_pool(self) -> Result<Vec<&'a Exercise>> {
        if !self.candidates.is_empty() {
            return Ok(self.candidates);
        }
        let step = self.trace.emptied_by().unwrap_or(FilterStep::Category);
        tracing::warn!(
            block = %self.block,
            focus = %self.focus,
            step = %step,
            "Candidate pool exhausted"
        );
        Err(Error::PoolExhausted {
            block: self.block.to_string(),
            focus: self.focus.to_string(),
            step: step.to_string(),
        })
    }
}

/// User constraints that apply to every block of a program
#[derive(Clone, Debug)]
pub struct Constraints {
    pub experience: ExperienceLevel,
    pub allowed_equipment: BTreeSet<Equipment>,
}

/// Filter the catalog down to the candidates for one block
///
/// Only the focus's base is consulted; the suffix never changes the pool.
pub fn filter_candidates<'a>(
    index: &'a CatalogIndex,
    block: BlockKind,
    focus: &FocusLabel,
    constraints: &Constraints,
    rules: &GenerationRules,
) -> Result<FilterOutcome<'a>> {
    let block_rule = rules.block(block)?;
    let muscles = rules.focus_muscles(focus.base)?;
    let modifier = rules.experience_modifier(constraints.experience)?;

    let mut trace = FilterTrace {
        catalog_size: index.len(),
        steps: Vec::with_capacity(5),
    };
    let mut pool: Vec<&Exercise> = index.iter().collect();

    let mut narrow = |step: FilterStep, applied: bool, keep: &dyn Fn(&Exercise) -> bool| {
        if applied {
            pool.retain(|e| keep(e));
        }
        trace.steps.push(StepCount {
            step,
            applied,
            remaining: pool.len(),
        });
    };

    narrow(FilterStep::Category, true, &|e| {
        block_rule.categories.contains(&e.category)
    });
    narrow(FilterStep::Equipment, true, &|e| {
        e.equipment.is_subset(&constraints.allowed_equipment)
    });
    narrow(FilterStep::MuscleGroup, block_rule.match_focus, &|e| {
        e.muscle_groups.iter().any(|m| muscles.include.contains(m))
            && !e.muscle_groups.iter().any(|m| muscles.exclude.contains(m))
    });
    narrow(FilterStep::Difficulty, true, &|e| {
        modifier.complexity_filter.contains(&e.difficulty)
    });
    narrow(FilterStep::ExternalLoad, block_rule.match_external_load, &|e| {
        modifier.external_load_filter.contains(&e.external_load)
    });

    for count in &trace.steps {
        tracing::debug!(
            block = %block,
            focus = %focus,
            step = %count.step,
            applied = count.applied,
            remaining = count.remaining,
            "Filter step"
        );
    }

    Ok(FilterOutcome {
        block,
        focus: focus.clone(),
        candidates: pool,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::normalize_focus;
    use crate::test_support::{default_index, exercise};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn constraints(experience: ExperienceLevel, equipment: &[Equipment]) -> Constraints {
        Constraints {
            experience,
            allowed_equipment: equipment.iter().copied().collect(),
        }
    }

    fn names(outcome: &FilterOutcome<'_>) -> Vec<String> {
        outcome.candidates.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_steps_narrow_in_order() {
        let mut bench = exercise("Bench Press", ExerciseCategory::Strength, &[MuscleGroup::Chest]);
        bench.equipment = BTreeSet::from([Equipment::Barbell, Equipment::Bench]);
        bench.external_load = ExternalLoad::Always;
        let push_up = exercise("Push-Up", ExerciseCategory::Bodyweight, &[MuscleGroup::Chest]);
        let squat = exercise("Squat", ExerciseCategory::Bodyweight, &[MuscleGroup::Quadriceps]);
        let stretch = exercise("Stretch", ExerciseCategory::Flexibility, &[MuscleGroup::Chest]);
        let index = CatalogIndex::from_exercises([bench, push_up, squat, stretch]).unwrap();

        let focus = normalize_focus("Push").unwrap();
        let outcome = filter_candidates(
            &index,
            BlockKind::Strength,
            &focus,
            &constraints(ExperienceLevel::Beginner, &[]),
            &GenerationRules::default(),
        )
        .unwrap();

        assert_eq!(names(&outcome), vec!["Push-Up".to_string()]);
        let remaining: Vec<usize> = outcome.trace.steps.iter().map(|s| s.remaining).collect();
        assert_eq!(remaining, vec![3, 2, 1, 1, 1]);
    }

    #[test]
    fn test_unapplied_steps_pass_through() {
        let index = CatalogIndex::from_exercises([exercise(
            "Jumping Jacks",
            ExerciseCategory::Cardio,
            &[MuscleGroup::Calves],
        )])
        .unwrap();
        let focus = normalize_focus("Push").unwrap();
        let outcome = filter_candidates(
            &index,
            BlockKind::Warmup,
            &focus,
            &constraints(ExperienceLevel::Beginner, &[]),
            &GenerationRules::default(),
        )
        .unwrap();

        assert_eq!(outcome.candidates.len(), 1);
        let muscle_step = &outcome.trace.steps[2];
        assert_eq!(muscle_step.step, FilterStep::MuscleGroup);
        assert!(!muscle_step.applied);
    }

    #[test]
    fn test_exclude_list_removes_candidates() {
        let index = CatalogIndex::from_exercises([exercise(
            "Thruster",
            ExerciseCategory::Strength,
            &[MuscleGroup::Shoulders, MuscleGroup::Quadriceps],
        )])
        .unwrap();
        let focus = normalize_focus("Upper").unwrap();
        let outcome = filter_candidates(
            &index,
            BlockKind::Strength,
            &focus,
            &constraints(ExperienceLevel::Beginner, &[]),
            &GenerationRules::default(),
        )
        .unwrap();
        assert_eq!(outcome.trace.emptied_by(), Some(FilterStep::MuscleGroup));
    }

    #[rstest]
    #[case(ExperienceLevel::Expert)]
    #[case(ExperienceLevel::Advanced)]
    fn test_bodyweight_pool_dies_on_external_load(#[case] experience: ExperienceLevel) {
        let mut archer = exercise("Archer Push-Up", ExerciseCategory::Bodyweight, &[MuscleGroup::Chest]);
        archer.difficulty = Difficulty::Advanced;
        let index = CatalogIndex::from_exercises([archer]).unwrap();
        let focus = normalize_focus("Push-Strength").unwrap();

        let outcome = filter_candidates(
            &index,
            BlockKind::Strength,
            &focus,
            &constraints(experience, &[]),
            &GenerationRules::default(),
        )
        .unwrap();
        assert_eq!(outcome.trace.emptied_by(), Some(FilterStep::ExternalLoad));

        match outcome.into_pool() {
            Err(Error::PoolExhausted { block, focus, step }) => {
                assert_eq!(block, "strength");
                assert_eq!(focus, "Push-Strength");
                assert_eq!(step, "external_load");
            }
            other => panic!("Expected PoolExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_suffix_does_not_change_pool() {
        let index = default_index();
        let rules = GenerationRules::default();
        let limits = constraints(ExperienceLevel::Intermediate, Equipment::all());

        for block in BlockKind::all() {
            let plain = filter_candidates(&index, *block, &normalize_focus("Push").unwrap(), &limits, &rules)
                .unwrap();
            let suffixed = filter_candidates(
                &index,
                *block,
                &normalize_focus("Push-Strength").unwrap(),
                &limits,
                &rules,
            )
            .unwrap();
            assert_eq!(names(&plain), names(&suffixed));
            assert_eq!(plain.trace, suffixed.trace);
        }
    }

    #[test]
    fn test_candidates_are_name_ordered() {
        let index = default_index();
        let outcome = filter_candidates(
            &index,
            BlockKind::Strength,
            &normalize_focus("Full Body").unwrap(),
            &constraints(ExperienceLevel::Beginner, &[]),
            &GenerationRules::default(),
        )
        .unwrap();
        let names = names(&outcome);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(!names.is_empty());
    }
}

//! Exercise selection from filtered candidate pools.
//!
//! Selection is greedy and deterministic. Each pick prefers the candidate
//! covering the most focus muscle groups not yet trained that day; strength
//! blocks then prefer broader movements; remaining ties fall to a rotation
//! of the name-ordered pool that shifts with the day number.

use crate::focus::FocusLabel;
use crate::rules::CompoundRules;
use crate::structure::BlockSpec;
use crate::types::*;
use crate::{Error, Result};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;

/// Step reported when same-day de-duplication empties a block
pub const DAY_DEDUP_STEP: &str = "day_dedup";

/// Names and muscle groups already used in the current day
#[derive(Clone, Debug, Default)]
pub struct DayState {
    pub chosen: BTreeSet<String>,
    pub covered: BTreeSet<MuscleGroup>,
}

impl DayState {
    fn take(&mut self, exercise: &Exercise) {
        self.chosen.insert(exercise.name.clone());
        self.covered.extend(exercise.muscle_groups.iter().copied());
    }
}

/// Day-level inputs to selection
#[derive(Clone, Copy, Debug)]
pub struct SelectionContext<'a> {
    pub day_number: u32,
    pub focus: &'a FocusLabel,
    pub focus_muscles: &'a [MuscleGroup],
    pub compound: &'a CompoundRules,
}

/// Container parameters of a compound structure before progression
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundShape {
    pub work_minutes: Option<u32>,
    pub rounds: Option<u32>,
    pub work_seconds: Option<u32>,
    pub rest_seconds: Option<u32>,
}

impl CompoundShape {
    /// Starting shape for a structure with `subs` stations
    pub fn for_kind(kind: CompoundKind, subs: u32, rules: &CompoundRules) -> Self {
        match kind {
            CompoundKind::Emom => CompoundShape {
                work_minutes: Some(subs * rules.emom.minutes_per_sub_exercise),
                ..Default::default()
            },
            CompoundKind::Amrap => CompoundShape {
                work_minutes: Some(rules.amrap.work_minutes),
                ..Default::default()
            },
            CompoundKind::Circuit => CompoundShape {
                rounds: Some(rules.circuit.rounds),
                rest_seconds: Some(rules.circuit.rest_seconds),
                ..Default::default()
            },
            CompoundKind::Interval => CompoundShape {
                rounds: Some(rules.interval.rounds),
                work_seconds: Some(rules.interval.work_seconds),
                rest_seconds: Some(rules.interval.rest_seconds),
                ..Default::default()
            },
        }
    }
}

/// Synthetic parent grouping sub-exercises into a timed structure
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundGroup {
    pub name: String,
    pub kind: CompoundKind,
    pub shape: CompoundShape,
    pub sub_exercises: Vec<Exercise>,
}

impl CompoundGroup {
    pub fn category(&self) -> ExerciseCategory {
        ExerciseCategory::Compound(self.kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectedItem {
    Simple(Exercise),
    Compound(CompoundGroup),
}

impl SelectedItem {
    pub fn name(&self) -> &str {
        match self {
            SelectedItem::Simple(e) => &e.name,
            SelectedItem::Compound(g) => &g.name,
        }
    }

    pub fn category(&self) -> ExerciseCategory {
        match self {
            SelectedItem::Simple(e) => e.category.clone(),
            SelectedItem::Compound(g) => g.category(),
        }
    }
}

/// A block received fewer exercises than requested
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PartialSelection {
    pub day: u32,
    pub block: BlockKind,
    pub focus: String,
    pub requested: u32,
    pub selected: u32,
}

impl fmt::Display for PartialSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Day {} ({}): {} block selected {} of {} requested exercises",
            self.day, self.focus, self.block, self.selected, self.requested
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub items: Vec<SelectedItem>,
    pub warning: Option<PartialSelection>,
}

/// Choose the exercises for one block
///
/// Never picks a name already chosen in the day, including compound parent
/// and sub-exercise names. A block left with nothing once those names are
/// excluded is `PoolExhausted` at the `day_dedup` step.
pub fn select_for_block(
    candidates: &[&Exercise],
    spec: &BlockSpec,
    state: &mut DayState,
    ctx: &SelectionContext<'_>,
) -> Result<Selection> {
    let (requested, picks) = match spec.compound {
        Some(kind) => {
            let requested = ctx.compound.sub_exercises(kind);
            (requested, pick(candidates, requested, spec.kind, state, ctx))
        }
        None => (spec.count, pick(candidates, spec.count, spec.kind, state, ctx)),
    };

    if picks.is_empty() && requested > 0 {
        tracing::warn!(
            block = %spec.kind,
            focus = %ctx.focus,
            candidates = candidates.len(),
            "Every candidate was already used earlier in the day"
        );
        return Err(Error::PoolExhausted {
            block: spec.kind.to_string(),
            focus: ctx.focus.to_string(),
            step: DAY_DEDUP_STEP.to_string(),
        });
    }

    let selected = picks.len() as u32;
    let warning = (selected < requested).then(|| {
        let warning = PartialSelection {
            day: ctx.day_number,
            block: spec.kind,
            focus: ctx.focus.to_string(),
            requested,
            selected,
        };
        tracing::debug!("{}", warning);
        warning
    });

    let items = match spec.compound {
        Some(_) if picks.is_empty() => Vec::new(),
        Some(kind) => {
            let name = parent_name(kind, ctx.focus, state);
            state.chosen.insert(name.clone());
            tracing::debug!(
                parent = %name,
                subs = ?picks.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
                "Assembled compound structure"
            );
            vec![SelectedItem::Compound(CompoundGroup {
                name,
                kind,
                shape: CompoundShape::for_kind(kind, selected, ctx.compound),
                sub_exercises: picks,
            })]
        }
        None => picks.into_iter().map(SelectedItem::Simple).collect(),
    };

    Ok(Selection { items, warning })
}

fn pick(
    candidates: &[&Exercise],
    count: u32,
    block: BlockKind,
    state: &mut DayState,
    ctx: &SelectionContext<'_>,
) -> Vec<Exercise> {
    let len = candidates.len();
    if len == 0 {
        return Vec::new();
    }
    let offset = (ctx.day_number.saturating_sub(1) as usize) % len;
    let mut picks = Vec::new();

    while picks.len() < count as usize {
        let best = candidates
            .iter()
            .enumerate()
            .filter(|(_, e)| !state.chosen.contains(&e.name))
            .max_by_key(|(position, e)| {
                let new_coverage = e
                    .muscle_groups
                    .iter()
                    .filter(|&&m| ctx.focus_muscles.contains(&m) && !state.covered.contains(&m))
                    .count();
                let breadth = if block == BlockKind::Strength {
                    e.muscle_groups.len()
                } else {
                    0
                };
                let rotated = (position + len - offset) % len;
                (new_coverage, breadth, Reverse(rotated))
            })
            .map(|(_, e)| *e);

        let Some(exercise) = best else {
            break;
        };
        state.take(exercise);
        picks.push(exercise.clone());
    }

    picks
}

fn parent_name(kind: CompoundKind, focus: &FocusLabel, state: &DayState) -> String {
    let base = format!("{} {}", kind.label(), focus.base);
    if !state.chosen.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{} #{}", base, n))
        .find(|name| !state.chosen.contains(name))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::normalize_focus;
    use crate::test_support::exercise;
    use pretty_assertions::assert_eq;

    fn pool() -> Vec<Exercise> {
        vec![
            exercise("Bench Dip", ExerciseCategory::Bodyweight, &[MuscleGroup::Triceps]),
            exercise("Pike Push-Up", ExerciseCategory::Bodyweight, &[MuscleGroup::Shoulders]),
            exercise(
                "Push-Up",
                ExerciseCategory::Bodyweight,
                &[MuscleGroup::Chest, MuscleGroup::Shoulders, MuscleGroup::Triceps],
            ),
            exercise("Wall Push-Up", ExerciseCategory::Bodyweight, &[MuscleGroup::Chest]),
        ]
    }

    fn spec(kind: BlockKind, count: u32, compound: Option<CompoundKind>) -> BlockSpec {
        BlockSpec {
            kind,
            count,
            compound,
        }
    }

    fn names(items: &[SelectedItem]) -> Vec<&str> {
        items.iter().map(|i| i.name()).collect()
    }

    const PUSH: &[MuscleGroup] = &[MuscleGroup::Chest, MuscleGroup::Shoulders, MuscleGroup::Triceps];

    #[test]
    fn test_prefers_new_coverage() {
        let exercises = pool();
        let candidates: Vec<&Exercise> = exercises.iter().collect();
        let focus = normalize_focus("Push").unwrap();
        let compound = CompoundRules::default();
        let ctx = SelectionContext {
            day_number: 1,
            focus: &focus,
            focus_muscles: PUSH,
            compound: &compound,
        };
        let mut state = DayState::default();

        let selection = select_for_block(&candidates, &spec(BlockKind::Strength, 2, None), &mut state, &ctx).unwrap();

        // Push-Up covers all three; then nothing adds coverage and the rotation picks first by name
        assert_eq!(names(&selection.items), vec!["Push-Up", "Bench Dip"]);
        assert!(selection.warning.is_none());
    }

    #[test]
    fn test_never_repeats_within_day() {
        let exercises = pool();
        let candidates: Vec<&Exercise> = exercises.iter().collect();
        let focus = normalize_focus("Push").unwrap();
        let compound = CompoundRules::default();
        let ctx = SelectionContext {
            day_number: 2,
            focus: &focus,
            focus_muscles: PUSH,
            compound: &compound,
        };
        let mut state = DayState::default();

        let first = select_for_block(&candidates, &spec(BlockKind::Strength, 3, None), &mut state, &ctx).unwrap();
        let second = select_for_block(&candidates, &spec(BlockKind::Accessory, 3, None), &mut state, &ctx).unwrap();

        assert_eq!(first.items.len(), 3);
        assert_eq!(second.items.len(), 1);
        let all: BTreeSet<&str> = names(&first.items)
            .into_iter()
            .chain(names(&second.items))
            .collect();
        assert_eq!(all.len(), 4);

        let warning = second.warning.unwrap();
        assert_eq!((warning.requested, warning.selected), (3, 1));
        assert_eq!(warning.block, BlockKind::Accessory);
    }

    #[test]
    fn test_rotation_depends_on_day() {
        let exercises: Vec<Exercise> = ["A", "B", "C"]
            .iter()
            .map(|n| exercise(n, ExerciseCategory::Mobility, &[MuscleGroup::Back]))
            .collect();
        let candidates: Vec<&Exercise> = exercises.iter().collect();
        let focus = normalize_focus("Pull").unwrap();
        let compound = CompoundRules::default();

        let first_pick = |day_number| {
            let ctx = SelectionContext {
                day_number,
                focus: &focus,
                focus_muscles: &[MuscleGroup::Back],
                compound: &compound,
            };
            let selection = select_for_block(
                &candidates,
                &spec(BlockKind::Warmup, 1, None),
                &mut DayState::default(),
                &ctx,
            )
            .unwrap();
            selection.items[0].name().to_string()
        };

        assert_eq!(first_pick(1), "A");
        assert_eq!(first_pick(2), "B");
        assert_eq!(first_pick(3), "C");
        assert_eq!(first_pick(4), "A");
    }

    #[test]
    fn test_compound_block_builds_parent() {
        let exercises = pool();
        let candidates: Vec<&Exercise> = exercises.iter().collect();
        let focus = normalize_focus("Push-Volume").unwrap();
        let compound = CompoundRules::default();
        let ctx = SelectionContext {
            day_number: 1,
            focus: &focus,
            focus_muscles: PUSH,
            compound: &compound,
        };
        let mut state = DayState::default();

        let selection = select_for_block(
            &candidates,
            &spec(BlockKind::Compound, 1, Some(CompoundKind::Emom)),
            &mut state,
            &ctx,
        )
        .unwrap();

        assert_eq!(selection.items.len(), 1);
        let SelectedItem::Compound(group) = &selection.items[0] else {
            panic!("Expected a compound parent");
        };
        assert_eq!(group.name, "EMOM Push");
        assert_eq!(group.category(), ExerciseCategory::Compound(CompoundKind::Emom));
        assert_eq!(group.sub_exercises.len(), 3);
        assert_eq!(group.shape.work_minutes, Some(6));
        assert!(state.chosen.contains("EMOM Push"));
        for sub in &group.sub_exercises {
            assert!(state.chosen.contains(&sub.name));
        }
    }

    #[test]
    fn test_second_parent_gets_numbered_name() {
        let exercises = pool();
        let candidates: Vec<&Exercise> = exercises.iter().collect();
        let focus = normalize_focus("Push").unwrap();
        let compound = CompoundRules::default();
        let ctx = SelectionContext {
            day_number: 1,
            focus: &focus,
            focus_muscles: PUSH,
            compound: &compound,
        };
        let mut state = DayState::default();
        state.chosen.insert("Intervals Push".into());

        let selection = select_for_block(
            &candidates,
            &spec(BlockKind::Compound, 1, Some(CompoundKind::Interval)),
            &mut state,
            &ctx,
        )
        .unwrap();
        assert_eq!(names(&selection.items), vec!["Intervals Push #2"]);
    }

    #[test]
    fn test_used_up_pool_is_exhausted() {
        let exercises = pool();
        let candidates: Vec<&Exercise> = exercises.iter().collect();
        let focus = normalize_focus("Push").unwrap();
        let compound = CompoundRules::default();
        let ctx = SelectionContext {
            day_number: 1,
            focus: &focus,
            focus_muscles: PUSH,
            compound: &compound,
        };
        let mut state = DayState::default();

        let first = select_for_block(&candidates, &spec(BlockKind::Strength, 4, None), &mut state, &ctx).unwrap();
        assert_eq!(first.items.len(), 4);

        let err = select_for_block(
            &candidates,
            &spec(BlockKind::Compound, 1, Some(CompoundKind::Circuit)),
            &mut state,
            &ctx,
        )
        .unwrap_err();
        match err {
            Error::PoolExhausted { block, focus, step } => {
                assert_eq!(block, "compound");
                assert_eq!(focus, "Push");
                assert_eq!(step, DAY_DEDUP_STEP);
            }
            other => panic!("Expected PoolExhausted, got {:?}", other),
        }
        assert!(!state.chosen.contains("Circuit Push"));
    }
}

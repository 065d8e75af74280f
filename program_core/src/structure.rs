//! Day/week structure: split selection, day focus, and block counts.

use crate::focus::{normalize_focus, FocusLabel};
use crate::questionnaire::QuestionnaireAnswers;
use crate::rules::{BlockProfile, GenerationRules};
use crate::types::*;
use crate::Result;
use serde::Serialize;

/// One structural block of a day
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct BlockSpec {
    pub kind: BlockKind,
    /// Exercises to select; compound blocks always hold a single structure
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compound: Option<CompoundKind>,
}

/// Shape of one training day before any exercise is chosen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaySkeleton {
    pub day_number: u32,
    pub location: Location,
    pub focus: FocusLabel,
    pub blocks: Vec<BlockSpec>,
    pub estimated_minutes: u32,
}

/// Lay out every training day of the week
pub fn structure_program(
    answers: &QuestionnaireAnswers,
    rules: &GenerationRules,
) -> Result<Vec<DaySkeleton>> {
    let split = rules.split_for(answers.training_frequency)?;
    let goal = rules.goal(answers.goal)?;
    let access = rules.equipment_access(&answers.equipment)?;

    tracing::info!(
        split = %split.name,
        days = answers.training_frequency,
        minutes = answers.session_duration,
        "Structuring program"
    );

    split
        .days
        .iter()
        .take(usize::from(answers.training_frequency))
        .enumerate()
        .map(|(day_index, label)| {
            let mut focus = normalize_focus(label)?;
            if focus.suffix.is_none() {
                if let Some(suffix) = &goal.focus_suffix {
                    focus = focus.with_suffix(suffix);
                }
            }

            let (profile_name, profile) = rules.profile_for(&focus)?;
            let (counts, minutes) = budget_blocks(profile, answers.session_duration, rules)?;

            let mut blocks = Vec::new();
            for (kind, count) in counts {
                if kind == BlockKind::Compound {
                    for j in 0..count as usize {
                        let rotation = &goal.compound_kinds;
                        blocks.push(BlockSpec {
                            kind,
                            count: 1,
                            compound: rotation.get((day_index + j) % rotation.len().max(1)).copied(),
                        });
                    }
                } else {
                    blocks.push(BlockSpec {
                        kind,
                        count,
                        compound: None,
                    });
                }
            }

            tracing::debug!(
                day = day_index + 1,
                focus = %focus,
                profile = profile_name,
                minutes,
                "Day skeleton"
            );

            Ok(DaySkeleton {
                day_number: day_index as u32 + 1,
                location: access.location,
                focus,
                blocks,
                estimated_minutes: minutes,
            })
        })
        .collect()
}

/// Apply the session budget to a profile's base counts
///
/// Base counts are trimmed from the last block backwards (never below one)
/// while over budget, then the fill list adds one exercise at a time in
/// round-robin order until the next addition would exceed the budget or the
/// profile's fill cap is reached.
fn budget_blocks(
    profile: &BlockProfile,
    budget: u32,
    rules: &GenerationRules,
) -> Result<(Vec<(BlockKind, u32)>, u32)> {
    let mut counts: Vec<(BlockKind, u32)> = profile
        .blocks
        .iter()
        .map(|b| (b.block, b.count))
        .collect();

    let cost = |kind: BlockKind| rules.block(kind).map(|b| b.minutes_per_exercise);
    let mut minutes = 0;
    for (kind, count) in &counts {
        minutes += cost(*kind)? * count;
    }

    while minutes > budget {
        let Some(slot) = counts.iter_mut().rev().find(|(_, count)| *count > 1) else {
            tracing::warn!(
                minutes,
                budget,
                "Minimum day structure exceeds the session budget"
            );
            break;
        };
        slot.1 -= 1;
        minutes -= cost(slot.0)?;
    }

    for added in 0..profile.max_fill as usize {
        let Some(&kind) = profile.fill.get(added % profile.fill.len().max(1)) else {
            break;
        };
        let extra = cost(kind)?;
        if minutes + extra > budget {
            break;
        }
        match counts.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 += 1,
            None => counts.push((kind, 1)),
        }
        minutes += extra;
    }

    Ok((counts, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::answers;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn labels(days: &[DaySkeleton]) -> Vec<String> {
        days.iter().map(|d| d.focus.to_string()).collect()
    }

    fn count_of(day: &DaySkeleton, kind: BlockKind) -> u32 {
        day.blocks
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.count)
            .sum()
    }

    #[rstest]
    #[case(1, &["Full Body-Volume"])]
    #[case(3, &["Full Body-Volume", "Full Body-Volume", "Full Body-Volume"])]
    #[case(4, &["Upper-Volume", "Lower-Volume", "Upper-Volume", "Lower-Volume"])]
    #[case(5, &["Push-Volume", "Pull-Volume", "Legs-Volume", "Upper-Volume", "Lower-Volume"])]
    #[case(7, &["Push-Volume", "Pull-Volume", "Legs-Volume", "Push-Volume", "Pull-Volume", "Legs-Volume", "Mobility-Recovery"])]
    fn test_split_by_frequency(#[case] frequency: u8, #[case] expected: &[&str]) {
        let days = structure_program(
            &answers(Goal::Tone, ExperienceLevel::Beginner, frequency, "full_gym", 4),
            &GenerationRules::default(),
        )
        .unwrap();
        assert_eq!(labels(&days), expected);
        let numbers: Vec<u32> = days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, (1..=u32::from(frequency)).collect::<Vec<_>>());
    }

    #[test]
    fn test_volume_profile_within_45_minutes() {
        let days = structure_program(
            &answers(Goal::Tone, ExperienceLevel::Beginner, 3, "bodyweight_only", 3),
            &GenerationRules::default(),
        )
        .unwrap();
        let day = &days[0];

        assert_eq!(day.location, Location::Home);
        assert_eq!(count_of(day, BlockKind::Warmup), 1);
        assert_eq!(count_of(day, BlockKind::Strength), 2);
        assert_eq!(count_of(day, BlockKind::Compound), 1);
        assert_eq!(count_of(day, BlockKind::Accessory), 1);
        assert_eq!(day.estimated_minutes, 43);
    }

    #[test]
    fn test_longer_sessions_fill_round_robin() {
        let mut a = answers(Goal::Tone, ExperienceLevel::Beginner, 3, "full_gym", 3);
        a.session_duration = 60;
        let days = structure_program(&a, &GenerationRules::default()).unwrap();
        let day = &days[0];

        assert_eq!(count_of(day, BlockKind::Accessory), 2);
        assert_eq!(count_of(day, BlockKind::Cardio), 1);
        assert_eq!(day.estimated_minutes, 58);
        assert_eq!(day.blocks.last().map(|b| b.kind), Some(BlockKind::Cardio));
    }

    #[test]
    fn test_short_sessions_trim_from_the_end() {
        let mut a = answers(Goal::BuildMuscle, ExperienceLevel::Beginner, 3, "full_gym", 3);
        a.session_duration = 20;
        let days = structure_program(&a, &GenerationRules::default()).unwrap();
        let day = &days[0];

        assert_eq!(day.focus.to_string(), "Full Body-Strength");
        assert_eq!(count_of(day, BlockKind::Strength), 1);
        assert!(day.blocks.iter().all(|b| b.count >= 1));
        assert_eq!(day.estimated_minutes, 21);
    }

    #[test]
    fn test_compound_kind_rotates_by_day() {
        let days = structure_program(
            &answers(Goal::LoseWeight, ExperienceLevel::Beginner, 3, "full_gym", 3),
            &GenerationRules::default(),
        )
        .unwrap();
        let kinds: Vec<Option<CompoundKind>> = days
            .iter()
            .map(|d| {
                d.blocks
                    .iter()
                    .find(|b| b.kind == BlockKind::Compound)
                    .and_then(|b| b.compound)
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(CompoundKind::Interval),
                Some(CompoundKind::Amrap),
                Some(CompoundKind::Emom)
            ]
        );
    }

    #[test]
    fn test_unknown_equipment_rejected() {
        let result = structure_program(
            &answers(Goal::Tone, ExperienceLevel::Beginner, 3, "garage", 3),
            &GenerationRules::default(),
        );
        assert!(result.is_err());
    }
}

//! Week-over-week progression of selected exercises.
//!
//! Four schemes are supported:
//! - Static: identical parameters every week (mobility, flexibility, cardio)
//! - Linear: reps down, %TM up, rest down
//! - Volume: sets up every K weeks, reps up toward the range max
//! - Density: same or more work in the same or less time
//!
//! Compound parents (EMOM/AMRAP/circuit/interval) carry only container
//! parameters; their work is expressed through the sub-exercises.

use crate::program::{ParameterizedExercise, Reps, SubExercise, TimeSpec, WeekMap, WeekParameters, Weight};
use crate::rules::{GenerationRules, ProgressionRules};
use crate::selector::{CompoundGroup, SelectedItem};
use crate::types::*;
use crate::{Error, Result};

/// Pick the scheme for an exercise from its category and the goal
pub fn scheme_for(
    name: &str,
    category: &ExerciseCategory,
    goal: Goal,
    rules: &GenerationRules,
) -> Result<ProgressionScheme> {
    match category {
        ExerciseCategory::Mobility | ExerciseCategory::Flexibility | ExerciseCategory::Cardio => {
            Ok(ProgressionScheme::Static)
        }
        ExerciseCategory::Strength | ExerciseCategory::Bodyweight => Ok(rules.goal(goal)?.scheme),
        ExerciseCategory::Compound(_) => Ok(ProgressionScheme::Density),
        ExerciseCategory::Other(other) => Err(Error::UnknownCategory {
            exercise: name.to_string(),
            category: other.clone(),
        }),
    }
}

/// Compute every week's parameters for a selected item
pub fn parameterize(
    item: &SelectedItem,
    scheme: ProgressionScheme,
    weeks: u32,
    rules: &ProgressionRules,
) -> Result<ParameterizedExercise> {
    if weeks == 0 {
        return Err(Error::Progression(format!(
            "Cannot parameterize '{}' for zero weeks",
            item.name()
        )));
    }

    match item {
        SelectedItem::Simple(exercise) => {
            match &exercise.category {
                ExerciseCategory::Other(other) => {
                    return Err(Error::UnknownCategory {
                        exercise: exercise.name.clone(),
                        category: other.clone(),
                    })
                }
                category if category.is_compound() => {
                    return Err(Error::Progression(format!(
                        "'{}' has compound category '{}' but no sub-exercises",
                        exercise.name, category
                    )))
                }
                _ => {}
            }
            Ok(ParameterizedExercise {
                name: exercise.name.clone(),
                category: None,
                weeks: (1..=weeks)
                    .map(|week| (week, simple_week(exercise, scheme, week - 1, rules)))
                    .collect(),
                sub_exercises: None,
            })
        }
        SelectedItem::Compound(group) => parameterize_compound(group, scheme, weeks, rules),
    }
}

fn simple_week(
    exercise: &Exercise,
    scheme: ProgressionScheme,
    i: u32,
    rules: &ProgressionRules,
) -> WeekParameters {
    let sets = exercise.sets;
    let reps = exercise.reps;

    match scheme {
        ProgressionScheme::Static => WeekParameters {
            sets: Some(sets.min),
            reps: Some(reps_value(exercise, reps.max)),
            weight: match exercise.external_load {
                ExternalLoad::Always => Some(Weight::Descriptor {
                    text: rules.static_rule.load_descriptor.clone(),
                }),
                _ => None,
            },
            rest: Some(TimeSpec::seconds(rules.static_rule.rest_seconds)),
            work_time: None,
        },
        ProgressionScheme::Linear => {
            let r = &rules.linear;
            let target = if reps.is_timed() {
                reps.min
            } else {
                reps.max.saturating_sub(r.reps_step * i).max(reps.min)
            };
            let percent = r
                .start_percent_tm
                .saturating_add(r.percent_step.times(i))
                .min(r.max_percent_tm);
            WeekParameters {
                sets: Some(sets.max),
                reps: Some(reps_value(exercise, target)),
                weight: load(exercise, percent, rules),
                rest: Some(TimeSpec::seconds(declining(
                    r.rest_start_seconds,
                    r.rest_step_seconds,
                    r.rest_min_seconds,
                    i,
                ))),
                work_time: None,
            }
        }
        ProgressionScheme::Volume => {
            let r = &rules.volume;
            let every = r.sets_every_weeks.max(1);
            WeekParameters {
                sets: Some((sets.min + i / every).min(r.max_sets.max(sets.min))),
                reps: Some(reps_value(exercise, rising(exercise, r.reps_step, i, rules))),
                weight: load(exercise, r.percent_tm, rules),
                rest: Some(TimeSpec::seconds(r.rest_seconds)),
                work_time: None,
            }
        }
        ProgressionScheme::Density => {
            let r = &rules.density;
            WeekParameters {
                sets: Some(sets.min),
                reps: Some(reps_value(exercise, rising(exercise, r.reps_step, i, rules))),
                weight: load(exercise, r.percent_tm, rules),
                rest: Some(TimeSpec::seconds(declining(
                    r.rest_start_seconds,
                    r.rest_step_seconds,
                    r.rest_min_seconds,
                    i,
                ))),
                work_time: None,
            }
        }
    }
}

/// Compound parents under volume or density
///
/// The generation pipeline always assigns density to compound parents, so the
/// volume branch is only reached when a caller of this function asks for it
/// explicitly. Static and linear have no compound form and are rejected.
fn parameterize_compound(
    group: &CompoundGroup,
    scheme: ProgressionScheme,
    weeks: u32,
    rules: &ProgressionRules,
) -> Result<ParameterizedExercise> {
    if matches!(scheme, ProgressionScheme::Static | ProgressionScheme::Linear) {
        return Err(Error::Progression(format!(
            "Compound structure '{}' cannot use the {} scheme",
            group.name, scheme
        )));
    }
    if group.sub_exercises.is_empty() {
        return Err(Error::Progression(format!(
            "Compound structure '{}' has no sub-exercises",
            group.name
        )));
    }

    let subs = group.sub_exercises.len() as u32;
    let shape = &group.shape;
    let missing = |field: &str| {
        Error::Progression(format!(
            "{} structure '{}' is missing its {}",
            group.kind.label(),
            group.name,
            field
        ))
    };

    let mut parent_weeks = Vec::with_capacity(weeks as usize);
    for i in 0..weeks {
        let params = match (group.kind, scheme) {
            (CompoundKind::Emom, ProgressionScheme::Volume) => {
                let base = shape.work_minutes.ok_or_else(|| missing("work time"))?;
                let step = emom_minutes_step(subs, rules.volume.emom_minutes_per_sub_exercise);
                WeekParameters {
                    work_time: Some(TimeSpec::minutes(base + step * i)),
                    ..Default::default()
                }
            }
            (CompoundKind::Amrap, ProgressionScheme::Volume) => {
                let base = shape.work_minutes.ok_or_else(|| missing("work time"))?;
                let step = round_half_up(rules.volume.amrap_minutes_per_week);
                WeekParameters {
                    work_time: Some(TimeSpec::minutes(base + step * i)),
                    ..Default::default()
                }
            }
            (CompoundKind::Emom | CompoundKind::Amrap, _) => WeekParameters {
                work_time: Some(TimeSpec::minutes(
                    shape.work_minutes.ok_or_else(|| missing("work time"))?,
                )),
                ..Default::default()
            },
            (CompoundKind::Circuit | CompoundKind::Interval, scheme) => {
                let base_rounds = shape.rounds.ok_or_else(|| missing("round count"))?;
                let base_rest = shape.rest_seconds.ok_or_else(|| missing("rest"))?;
                let (rounds, rest) = if scheme == ProgressionScheme::Volume {
                    let every = rules.volume.sets_every_weeks.max(1);
                    let cap = rules.volume.max_rounds.max(base_rounds);
                    ((base_rounds + i / every).min(cap), base_rest)
                } else {
                    let r = &rules.density;
                    let floor = r.compound_rest_min_seconds.min(base_rest);
                    (
                        base_rounds,
                        declining(base_rest, r.compound_rest_step_seconds, floor, i),
                    )
                };
                WeekParameters {
                    sets: Some(rounds),
                    rest: Some(TimeSpec::seconds(rest)),
                    work_time: match group.kind {
                        CompoundKind::Interval => Some(TimeSpec::seconds(
                            shape.work_seconds.ok_or_else(|| missing("work interval"))?,
                        )),
                        _ => None,
                    },
                    ..Default::default()
                }
            }
        };
        parent_weeks.push((i + 1, params));
    }

    let (sub_step, percent) = match scheme {
        ProgressionScheme::Volume => (rules.volume.sub_reps_step, rules.volume.percent_tm),
        _ => (rules.density.sub_reps_step, rules.density.percent_tm),
    };
    let sub_exercises = group
        .sub_exercises
        .iter()
        .map(|sub| SubExercise {
            name: sub.name.clone(),
            weeks: (0..weeks)
                .map(|i| {
                    (
                        i + 1,
                        WeekParameters {
                            reps: Some(reps_value(sub, rising(sub, sub_step, i, rules))),
                            weight: load(sub, percent, rules),
                            ..Default::default()
                        },
                    )
                })
                .collect(),
        })
        .collect();

    Ok(ParameterizedExercise {
        name: group.name.clone(),
        category: Some(group.category()),
        weeks: parent_weeks.into_iter().collect::<WeekMap>(),
        sub_exercises: Some(sub_exercises),
    })
}

/// Round to the nearest whole number, halves away from zero
pub fn round_half_up(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value + 0.5).floor() as u32
}

/// Whole minutes added to an EMOM each week
///
/// `subs x rate` is rounded half-up, then raised to the next multiple of the
/// station count so every station gains the same number of minutes.
pub fn emom_minutes_step(subs: u32, rate_per_sub: f64) -> u32 {
    let raw = round_half_up(f64::from(subs) * rate_per_sub);
    if subs == 0 || raw % subs == 0 {
        raw
    } else {
        raw + subs - raw % subs
    }
}

fn declining(start: u32, step: u32, floor: u32, i: u32) -> u32 {
    start.saturating_sub(step.saturating_mul(i)).max(floor)
}

/// Reps (or seconds) rising from the range min toward the range max
fn rising(exercise: &Exercise, reps_step: u32, i: u32, rules: &ProgressionRules) -> u32 {
    let reps = exercise.reps;
    let step = if reps.is_timed() {
        rules.hold_step_seconds
    } else {
        reps_step
    };
    (reps.min + step.saturating_mul(i)).min(reps.max)
}

fn reps_value(exercise: &Exercise, value: u32) -> Reps {
    if !exercise.reps.is_timed() {
        Reps::Count(value)
    } else if exercise.isometric {
        Reps::Text(format!("{}s hold", value))
    } else {
        Reps::Text(format!("{}s", value))
    }
}

fn load(exercise: &Exercise, percent: Percent, rules: &ProgressionRules) -> Option<Weight> {
    match exercise.external_load {
        ExternalLoad::Always => Some(Weight::PercentTm { percent }),
        ExternalLoad::Sometimes => Some(Weight::Descriptor {
            text: rules.bodyweight_descriptor.clone(),
        }),
        ExternalLoad::Never => None,
    }
}

//! Structural check of a generated program.
//!
//! Used as the last gate of generation and standalone on program files.
//! An empty issue list means the program is valid.

use crate::catalog::CatalogIndex;
use crate::program::{ParameterizedExercise, ParameterizedWorkout, WeekMap};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    DayCount { expected: u32, found: usize },
    DayNumberMismatch { key: u32, day_number: u32 },
    EmptyDay,
    WeekKeys { expected: u32, found: Vec<u32> },
    FieldSetChanged { week: u32 },
    UnexpectedSubExercises,
    NotCompoundCategory,
    NoSubExercises,
    CompoundHasReps { week: u32 },
    UnknownExercise,
    DuplicateName,
}

/// One problem, located as `day N / exercise / sub-exercise`
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.location)?;
        match &self.kind {
            IssueKind::DayCount { expected, found } => {
                write!(f, "expected {} days, found {}", expected, found)
            }
            IssueKind::DayNumberMismatch { key, day_number } => {
                write!(f, "day key {} holds dayNumber {}", key, day_number)
            }
            IssueKind::EmptyDay => write!(f, "day has no exercises"),
            IssueKind::WeekKeys { expected, found } => {
                write!(f, "expected week1..week{}, found weeks {:?}", expected, found)
            }
            IssueKind::FieldSetChanged { week } => {
                write!(f, "week{} populates different fields than week1", week)
            }
            IssueKind::UnexpectedSubExercises => {
                write!(f, "non-compound exercise has sub-exercises")
            }
            IssueKind::NotCompoundCategory => {
                write!(f, "sub-exercises under a non-compound category")
            }
            IssueKind::NoSubExercises => write!(f, "compound structure has no sub-exercises"),
            IssueKind::CompoundHasReps { week } => {
                write!(f, "compound structure carries reps in week{}", week)
            }
            IssueKind::UnknownExercise => write!(f, "exercise is not in the catalog"),
            IssueKind::DuplicateName => write!(f, "name repeated within the day"),
        }
    }
}

/// Check a program against its own header and the catalog
pub fn validate(program: &ParameterizedWorkout, index: &CatalogIndex) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut push = |location: String, kind: IssueKind| issues.push(ValidationIssue { location, kind });

    if program.days.len() != program.days_per_week as usize {
        push(
            "program".to_string(),
            IssueKind::DayCount {
                expected: program.days_per_week,
                found: program.days.len(),
            },
        );
    }

    for (&key, day) in &program.days {
        let day_location = format!("day {}", key);
        if day.day_number != key {
            push(
                day_location.clone(),
                IssueKind::DayNumberMismatch {
                    key,
                    day_number: day.day_number,
                },
            );
        }
        if day.exercises.is_empty() {
            push(day_location.clone(), IssueKind::EmptyDay);
        }

        let mut names = BTreeSet::new();
        for exercise in &day.exercises {
            let location = format!("{} / {}", day_location, exercise.name);
            check_exercise(exercise, program.weeks, index, &location, &mut push);

            let subs = exercise.sub_exercises.iter().flatten();
            for name in std::iter::once(&exercise.name).chain(subs.map(|s| &s.name)) {
                if !names.insert(name.as_str()) {
                    push(format!("{} / {}", day_location, name), IssueKind::DuplicateName);
                }
            }
        }
    }

    issues
}

fn check_exercise(
    exercise: &ParameterizedExercise,
    weeks: u32,
    index: &CatalogIndex,
    location: &str,
    push: &mut impl FnMut(String, IssueKind),
) {
    check_weeks(&exercise.weeks, weeks, location, push);

    let subs = exercise.sub_exercises.as_deref();
    match &exercise.category {
        Some(category) if category.is_compound() => {
            if subs.map_or(true, <[_]>::is_empty) {
                push(location.to_string(), IssueKind::NoSubExercises);
            }
            for (week, params) in exercise.weeks.iter() {
                if params.reps.is_some() {
                    push(location.to_string(), IssueKind::CompoundHasReps { week });
                }
            }
        }
        category => {
            if subs.is_some() {
                let kind = match category {
                    Some(_) => IssueKind::NotCompoundCategory,
                    None => IssueKind::UnexpectedSubExercises,
                };
                push(location.to_string(), kind);
            }
            if !index.contains(&exercise.name) {
                push(location.to_string(), IssueKind::UnknownExercise);
            }
        }
    }

    for sub in subs.unwrap_or_default() {
        let sub_location = format!("{} / {}", location, sub.name);
        check_weeks(&sub.weeks, weeks, &sub_location, push);
        if !index.contains(&sub.name) {
            push(sub_location, IssueKind::UnknownExercise);
        }
    }
}

fn check_weeks(
    weeks: &WeekMap,
    expected: u32,
    location: &str,
    push: &mut impl FnMut(String, IssueKind),
) {
    if !weeks.weeks().eq(1..=expected) {
        push(
            location.to_string(),
            IssueKind::WeekKeys {
                expected,
                found: weeks.weeks().collect(),
            },
        );
    }

    let Some(first) = weeks.get(1).map(|w| w.populated_fields()) else {
        return;
    };
    for (week, params) in weeks.iter().skip(1) {
        if params.populated_fields() != first {
            push(location.to_string(), IssueKind::FieldSetChanged { week });
        }
    }
}

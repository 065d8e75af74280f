//! Fixture builders shared by the unit tests.

use crate::catalog::{flatten, get_default_database, CatalogIndex};
use crate::questionnaire::QuestionnaireAnswers;
use crate::types::*;
use std::collections::BTreeSet;

/// Beginner bodyweight exercise with 3-4 x 8-12 and no load
pub fn exercise(name: &str, category: ExerciseCategory, muscles: &[MuscleGroup]) -> Exercise {
    Exercise {
        name: name.to_string(),
        category,
        sets: TypicalRange::count(3, 4),
        reps: TypicalRange::count(8, 12),
        equipment: BTreeSet::new(),
        muscle_groups: muscles.iter().copied().collect(),
        difficulty: Difficulty::Beginner,
        external_load: ExternalLoad::Never,
        isometric: false,
        variations: Vec::new(),
    }
}

pub fn default_index() -> CatalogIndex {
    flatten(get_default_database()).unwrap()
}

pub fn answers(
    goal: Goal,
    experience_level: ExperienceLevel,
    training_frequency: u8,
    equipment: &str,
    program_duration: u32,
) -> QuestionnaireAnswers {
    QuestionnaireAnswers {
        goal,
        experience_level,
        training_frequency,
        session_duration: 45,
        equipment: equipment.to_string(),
        program_duration,
    }
}

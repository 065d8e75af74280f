//! Questionnaire responses and their resolution into complete answers.

use crate::rules::GenerationRules;
use crate::types::{ExperienceLevel, Goal, Vocabulary};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Every question the generator understands
pub const QUESTIONS: &[&str] = &[
    "goal",
    "experience_level",
    "training_frequency",
    "session_duration",
    "equipment",
    "program_duration",
];

/// Raw questionnaire response as submitted; any field may be missing
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct QuestionnaireResponse {
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

/// Complete, immutable answers used for generation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionnaireAnswers {
    pub goal: Goal,
    pub experience_level: ExperienceLevel,
    /// Days per week
    pub training_frequency: u8,
    /// Minutes per session
    pub session_duration: u32,
    /// Key into the rules' equipment-access table
    pub equipment: String,
    /// Weeks
    pub program_duration: u32,
}

impl QuestionnaireResponse {
    /// Fill unanswered questions from the rules and check the result
    pub fn resolve(&self, rules: &GenerationRules) -> Result<QuestionnaireAnswers> {
        let q = &rules.questionnaire;
        let d = &q.defaults;

        let answers = QuestionnaireAnswers {
            goal: pick("goal", self.goal, d.goal, rules)?,
            experience_level: pick(
                "experience_level",
                self.experience_level,
                d.experience_level,
                rules,
            )?,
            training_frequency: pick(
                "training_frequency",
                self.training_frequency,
                d.training_frequency,
                rules,
            )?,
            session_duration: pick(
                "session_duration",
                self.session_duration,
                d.session_duration,
                rules,
            )?,
            equipment: pick(
                "equipment",
                self.equipment.clone(),
                d.equipment.clone(),
                rules,
            )?,
            program_duration: pick(
                "program_duration",
                self.program_duration,
                d.program_duration,
                rules,
            )?,
        };

        answers.check(rules)?;
        tracing::debug!(
            goal = answers.goal.name(),
            experience = answers.experience_level.name(),
            frequency = answers.training_frequency,
            weeks = answers.program_duration,
            "Resolved questionnaire"
        );
        Ok(answers)
    }
}

fn pick<T>(
    question: &str,
    answered: Option<T>,
    default: Option<T>,
    rules: &GenerationRules,
) -> Result<T> {
    if let Some(value) = answered {
        return Ok(value);
    }
    let required = rules
        .questionnaire
        .required_questions
        .iter()
        .any(|q| q == question);
    if required {
        return Err(Error::Questionnaire(format!(
            "Missing answer to required question '{}'",
            question
        )));
    }
    default.ok_or_else(|| {
        Error::Questionnaire(format!(
            "Question '{}' was not answered and has no default",
            question
        ))
    })
}

impl QuestionnaireAnswers {
    /// Range checks against the rules
    pub fn check(&self, rules: &GenerationRules) -> Result<()> {
        let q = &rules.questionnaire;

        if !(1..=7).contains(&self.training_frequency) {
            return Err(Error::Questionnaire(format!(
                "training_frequency must be between 1 and 7 days, got {}",
                self.training_frequency
            )));
        }
        if self.program_duration == 0 || self.program_duration > q.max_program_weeks {
            return Err(Error::Questionnaire(format!(
                "program_duration must be between 1 and {} weeks, got {}",
                q.max_program_weeks, self.program_duration
            )));
        }
        if self.session_duration < q.min_session_minutes {
            return Err(Error::Questionnaire(format!(
                "session_duration must be at least {} minutes, got {}",
                q.min_session_minutes, self.session_duration
            )));
        }
        rules.equipment_access(&self.equipment)?;
        Ok(())
    }
}

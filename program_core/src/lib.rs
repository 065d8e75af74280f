#![forbid(unsafe_code)]

//! Core domain model and business logic for the strength program generator.
//!
//! This crate provides:
//! - Domain types (exercises, muscle groups, equipment, focus labels)
//! - Catalog flattening and indexing
//! - Generation rules and questionnaire resolution
//! - The generation pipeline (structure, filter, select, progress)
//! - Program validation

pub mod types;
pub mod error;
pub mod focus;
pub mod rules;
pub mod questionnaire;
pub mod catalog;
pub mod filter;
pub mod structure;
pub mod selector;
pub mod program;
pub mod progression;
pub mod validate;
pub mod engine;
pub mod config;
pub mod logging;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use focus::{normalize_focus, BaseFocus, FocusLabel};
pub use rules::GenerationRules;
pub use questionnaire::{QuestionnaireAnswers, QuestionnaireResponse};
pub use catalog::{flatten, get_default_database, CatalogIndex, ExerciseDatabase};
pub use program::ParameterizedWorkout;
pub use validate::{validate, ValidationIssue};
pub use engine::{diagnose, generate_program, GenerationReport, PoolReport};
pub use config::Config;

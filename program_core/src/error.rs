//! Error types for the program_core library.

use crate::validate::ValidationIssue;
use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for program_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration or rule validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Questionnaire answers are missing or out of range
    #[error("Questionnaire error: {0}")]
    Questionnaire(String),

    /// The exercise catalog is malformed
    #[error("Catalog data integrity error: {0}")]
    DataIntegrity(String),

    /// A block's filtered candidate pool is empty
    #[error(
        "No candidates left for block '{block}' (focus '{focus}'): emptied by the {step} filter"
    )]
    PoolExhausted {
        block: String,
        focus: String,
        step: String,
    },

    /// An exercise category has no progression scheme
    #[error("Exercise '{exercise}' has category '{category}' with no progression scheme")]
    UnknownCategory { exercise: String, category: String },

    /// A progression scheme cannot be applied to an exercise
    #[error("Progression error: {0}")]
    Progression(String),

    /// The generated program failed its structural check
    #[error("Program failed validation: {}", IssueList(.0))]
    Validation(Vec<ValidationIssue>),
}

struct IssueList<'a>(&'a [ValidationIssue]);

impl fmt::Display for IssueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

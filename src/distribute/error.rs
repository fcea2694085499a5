use std::fmt;

use thiserror::Error;

/// Naming template could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Naming template is empty")]
    Empty,
    #[error("Naming template must contain {{n}}: '{0}'")]
    MissingPlaceholder(String),
    #[error("Naming template must contain {{n}} exactly once: '{0}'")]
    MultiplePlaceholders(String),
    #[error("Failed to build matcher for naming template '{template}': {message}")]
    Pattern { template: String, message: String },
}

/// Why a record line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineIssue {
    MissingSeparator,
    EmptyName,
    EmptyId,
    InvalidId,
    IllegalCharacter(char),
}

/// First invalid line in the record input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Line {line} is not valid ({issue}): '{content}'\nExpected format: name+ID number, for example: 李四+110101199001011234"
)]
pub struct RecordError {
    /// 1-based line number, counting non-blank lines only.
    pub line: usize,
    /// The trimmed line content.
    pub content: String,
    pub issue: LineIssue,
}

/// Distribution plan could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Select at least one document label")]
    NoLabels,
    #[error("Enter at least one name+ID record")]
    NoRecords,
    #[error(
        "Image count does not match!\n  Images per person:     {per_record}\n  People:                {records}\n  Required total images: {needed}\n  Matching images found: {found}"
    )]
    CountMismatch {
        per_record: usize,
        records: usize,
        needed: usize,
        found: usize,
    },
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "missing '+' separator"),
            Self::EmptyName => write!(f, "empty name"),
            Self::EmptyId => write!(f, "empty ID number"),
            Self::InvalidId => write!(f, "invalid ID number"),
            Self::IllegalCharacter(c) => write!(f, "character {c:?} is not allowed in a folder name"),
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("placeholder starting at byte {start} in '{pattern}' is never closed")]
    UnterminatedPlaceholder { pattern: String, start: usize },
    #[error("constraint for parameter '{name}' starting at byte {start} in '{pattern}' is never closed")]
    UnterminatedConstraint {
        pattern: String,
        name: String,
        start: usize,
    },
    #[error("unexpected '}}' at byte {index} in '{pattern}'")]
    UnexpectedClosingBrace { pattern: String, index: usize },
    #[error("escape character at byte {index} in '{pattern}' has nothing to escape")]
    LoneEscapeCharacter { pattern: String, index: usize },
    #[error("parameter at byte {index} in '{pattern}' is missing a name")]
    ParameterMissingName { pattern: String, index: usize },
    #[error(
        "parameter name '{name}' in '{pattern}' must start with an alphabetic character or underscore (found '{found}')"
    )]
    ParameterInvalidStart {
        pattern: String,
        name: String,
        found: char,
    },
    #[error("parameter name '{name}' in '{pattern}' contains invalid character '{invalid}'")]
    ParameterInvalidCharacter {
        pattern: String,
        name: String,
        invalid: char,
    },
    #[error("parameter '{name}' in '{pattern}' declares an empty constraint")]
    EmptyConstraint { pattern: String, name: String },
    #[error("invalid regex constraint for parameter '{name}' in '{pattern}': {error}")]
    RegexConstraintInvalid {
        pattern: String,
        name: String,
        error: String,
    },
    #[error("constraint for parameter '{name}' in '{pattern}' must not contain capturing groups")]
    CapturingGroupInConstraint { pattern: String, name: String },
}

pub type PatternResult<T> = Result<T, PatternError>;

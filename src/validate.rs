//! Input validation for incoming texts.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static FORBIDDEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[<>{}\[\]]").expect("forbidden-chars regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyInput,
    TooLong { max: usize },
    ForbiddenCharacters,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyInput => write!(f, "El texto no puede estar vacío"),
            ValidationError::TooLong { max } => {
                write!(f, "El texto es demasiado largo (máximo {max} caracteres)")
            }
            ValidationError::ForbiddenCharacters => {
                write!(f, "El texto contiene caracteres no permitidos")
            }
        }
    }
}

/// Accumulated validation outcome; callers typically surface only the first
/// error message.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    pub errors: Vec<ValidationError>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first_message(&self) -> Option<String> {
        self.errors.first().map(|e| e.to_string())
    }
}

/// Length is counted in characters, not bytes.
pub fn validate(text: &str, max_length: usize) -> Validation {
    let mut errors = Vec::new();

    if text.trim().is_empty() {
        errors.push(ValidationError::EmptyInput);
    }
    if text.chars().count() > max_length {
        errors.push(ValidationError::TooLong { max: max_length });
    }
    if FORBIDDEN.is_match(text) {
        errors.push(ValidationError::ForbiddenCharacters);
    }

    Validation { errors }
}

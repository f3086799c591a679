use thiserror::Error;

use crate::domain::FormField;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    MissingField(FormField),
    #[error("unknown form field '{0}' (expected name, email or body)")]
    UnknownField(String),
}

use std::fmt;

use shared::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    List,
    Create,
    Replace,
    Delete,
}

impl RemoteOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteOperation::List => "list",
            RemoteOperation::Create => "create",
            RemoteOperation::Replace => "replace",
            RemoteOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("remote {operation} operation failed: {source:#}")]
pub struct RemoteOperationFailed {
    pub operation: RemoteOperation,
    pub source: anyhow::Error,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Remote(#[from] RemoteOperationFailed),
    #[error("form rejected before submit: {0}")]
    Invalid(#[from] ValidationError),
}

impl SessionError {
    pub fn operation(&self) -> Option<RemoteOperation> {
        match self {
            SessionError::Remote(failure) => Some(failure.operation),
            SessionError::Invalid(_) => None,
        }
    }
}

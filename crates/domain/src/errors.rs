use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Resolution of {record} failed: {reason}")]
    ResolutionFailed { record: String, reason: String },

    #[error("Resolution of {record} timed out after {timeout_ms}ms")]
    ResolutionTimeout { record: String, timeout_ms: u64 },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Lookup cancelled")]
    Cancelled,

    #[error("Invalid {key} payload: {reason}")]
    Classification { key: &'static str, reason: String },
}

impl DomainError {
    pub fn resolution(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResolutionFailed {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn classification(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Classification {
            key,
            reason: reason.into(),
        }
    }

    /// The resolution mechanism is not available to this process (sandboxed,
    /// missing privileges). Callers usually skip rather than fail.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::ResolutionFailed { .. } | Self::ResolutionTimeout { .. } | Self::NotFound(_)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_classification_error(&self) -> bool {
        matches!(self, Self::Classification { .. })
    }
}

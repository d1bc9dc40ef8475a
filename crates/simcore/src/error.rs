use thiserror::Error;

/// Errors surfaced at the controller boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// The sample interval must be strictly positive. Rejected before any
    /// state mutation, so a failed tick never partially updates the controller.
    #[error("invalid sample interval: expected dt > 0, got {0}")]
    InvalidInterval(f64),
}

pub type ControlResult<T> = Result<T, ControlError>;

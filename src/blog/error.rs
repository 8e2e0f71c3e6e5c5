use serde_json::Value;
use thiserror::Error;

use crate::api::ApiError;
use crate::store::StoreError;

use super::lifecycle::RejectReason;

/// Outcome of a failed blog operation, as seen by its caller.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The server rejected the input (HTTP 422). Holds its payload verbatim
    /// for field-level feedback.
    #[error("Validation failed: {0}")]
    Rejected(Value),

    /// Any other failure, unmodified.
    #[error(transparent)]
    Failed(#[from] ApiError),

    #[error("Operation aborted")]
    Aborted,

    #[error("Store is closed")]
    StoreClosed,
}

impl From<StoreError> for OperationError {
    fn from(_: StoreError) -> Self {
        OperationError::StoreClosed
    }
}

impl OperationError {
    /// Validation payload, if this is a 422 rejection.
    pub fn validation_payload(&self) -> Option<&Value> {
        match self {
            OperationError::Rejected(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, OperationError::Aborted)
    }

    pub(super) fn reject_reason(&self) -> RejectReason {
        match self {
            OperationError::Rejected(payload) => RejectReason::Validation(payload.clone()),
            OperationError::Aborted => RejectReason::Aborted,
            other => RejectReason::Failed(other.to_string()),
        }
    }
}

/// Whether an operation turns a 422 into [`OperationError::Rejected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ValidationHandling {
    Capture,
    Propagate,
}

pub(super) fn classify(err: ApiError, handling: ValidationHandling) -> OperationError {
    let capture = handling == ValidationHandling::Capture && err.is_validation();
    match err {
        ApiError::Status { body, .. } if capture => OperationError::Rejected(body),
        err => OperationError::Failed(err),
    }
}

//! Pending → fulfilled | rejected lifecycle shared by every async operation.

use serde_json::Value;

use super::state::{BlogState, RequestId};

/// Request id plus the argument the operation was started with.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMeta<A> {
    pub request_id: RequestId,
    pub arg: A,
}

/// Why an operation settled as rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// HTTP 422; the server's payload verbatim.
    Validation(Value),
    /// The caller aborted the operation.
    Aborted,
    /// Transport or unexpected failure, rendered to text.
    Failed(String),
}

/// One lifecycle event of an async operation taking `A` and producing `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle<A, T> {
    Pending(RequestMeta<A>),
    Fulfilled { meta: RequestMeta<A>, payload: T },
    Rejected { meta: RequestMeta<A>, reason: RejectReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Fulfilled,
    Rejected,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Pending => "pending",
            Phase::Fulfilled => "fulfilled",
            Phase::Rejected => "rejected",
        }
    }
}

impl<A, T> Lifecycle<A, T> {
    pub fn meta(&self) -> &RequestMeta<A> {
        match self {
            Lifecycle::Pending(meta)
            | Lifecycle::Fulfilled { meta, .. }
            | Lifecycle::Rejected { meta, .. } => meta,
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.meta().request_id
    }

    pub fn phase(&self) -> Phase {
        match self {
            Lifecycle::Pending(_) => Phase::Pending,
            Lifecycle::Fulfilled { .. } => Phase::Fulfilled,
            Lifecycle::Rejected { .. } => Phase::Rejected,
        }
    }
}

/// Apply the loading / current-request bookkeeping for one lifecycle event.
pub(super) fn track<A, T>(state: &mut BlogState, operation: &'static str, event: &Lifecycle<A, T>) {
    let request_id = event.request_id();
    let phase = event.phase();
    tracing::debug!(
        operation,
        phase = phase.as_str(),
        request_id = %request_id,
        "request lifecycle"
    );

    match phase {
        Phase::Pending => state.request_started(request_id),
        Phase::Fulfilled | Phase::Rejected => state.request_settled(request_id),
    }
}

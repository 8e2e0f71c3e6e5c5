use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mvi::SliceState;

use super::post::Post;

/// Correlation token generated for each dispatched async operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How `loading` reacts to overlapping requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingPolicy {
    /// One tracked request id. The newest pending request owns the slot,
    /// so if it settles before an older one, `loading` turns false while
    /// the older request is still running.
    #[default]
    SingleSlot,
    /// Every pending request id is tracked; `loading` stays true until the
    /// last of them settles.
    InFlight,
}

/// State of the blog slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlogState {
    /// Posts in server order.
    pub post_list: Vec<Post>,
    /// The post currently being edited, if any.
    pub editing_post: Option<Post>,
    pub loading: bool,
    /// Set only while `loading` is true.
    pub current_request_id: Option<RequestId>,
    pub(super) policy: LoadingPolicy,
    pub(super) in_flight: Vec<RequestId>,
}

impl SliceState for BlogState {}

impl BlogState {
    pub fn with_policy(policy: LoadingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> LoadingPolicy {
        self.policy
    }

    /// Pending request ids in dispatch order. Always empty under
    /// [`LoadingPolicy::SingleSlot`].
    pub fn in_flight(&self) -> &[RequestId] {
        &self.in_flight
    }

    pub fn find_post(&self, post_id: &str) -> Option<&Post> {
        self.post_list.iter().find(|post| post.id == post_id)
    }

    pub(super) fn request_started(&mut self, request_id: RequestId) {
        if self.policy == LoadingPolicy::InFlight {
            self.in_flight.push(request_id);
        }
        self.loading = true;
        self.current_request_id = Some(request_id);
    }

    pub(super) fn request_settled(&mut self, request_id: RequestId) {
        match self.policy {
            LoadingPolicy::SingleSlot => {
                if self.loading && self.current_request_id == Some(request_id) {
                    self.loading = false;
                    self.current_request_id = None;
                }
            }
            LoadingPolicy::InFlight => {
                self.in_flight.retain(|id| *id != request_id);
                self.current_request_id = self.in_flight.last().copied();
                self.loading = !self.in_flight.is_empty();
            }
        }
    }
}

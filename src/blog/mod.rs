//! Blog feature slice.
//!
//! - `post.rs` - post records with opaque domain fields
//! - `state.rs` - slice state and request tracking
//! - `intent.rs` - synchronous mutations and async lifecycle events
//! - `lifecycle.rs` - pending/fulfilled/rejected bookkeeping
//! - `reducer.rs` - state transitions
//! - `operations.rs` - store handle with the network-backed operations

mod error;
mod intent;
mod lifecycle;
mod operations;
mod post;
mod reducer;
mod state;

pub use error::OperationError;
pub use intent::{BlogIntent, UpdateArgs};
pub use lifecycle::{Lifecycle, Phase, RejectReason, RequestMeta};
pub use operations::BlogStore;
pub use post::{Post, PostDraft};
pub use reducer::BlogReducer;
pub use state::{BlogState, LoadingPolicy, RequestId};

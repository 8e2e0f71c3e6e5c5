//! Unidirectional state primitives shared by every store slice.
//!
//! ```text
//! Intent ──→ Reducer ──→ SliceState ──→ subscribers
//!    ↑                                      │
//!    └──────────────────────────────────────┘
//! ```
//!
//! - **SliceState**: owned snapshot of one slice
//! - **Intent**: a synchronous mutation request or an async lifecycle event
//! - **Reducer**: `(state, intent) -> state`, no I/O

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::SliceState;

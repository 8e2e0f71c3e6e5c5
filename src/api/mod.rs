//! HTTP collaborator for the blog slice.
//!
//! [`PostsApi`] is the seam the store's operations talk to;
//! [`HttpPostsApi`] implements it with `reqwest`.

mod client;
mod error;

pub use client::{HttpPostsApi, PostsApi};
pub use error::{ApiError, VALIDATION_STATUS};

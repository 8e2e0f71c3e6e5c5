//! Client-side state for a blog backed by a JSON posts API.
//!
//! A [`blog::BlogStore`] owns a [`blog::BlogState`] on a single dispatcher
//! task and keeps it in sync with the server through four operations
//! (list, create, update, delete), each cancellable through an
//! [`abort::AbortSignal`].

pub mod abort;
pub mod api;
pub mod blog;
pub mod config;
pub mod logging;
pub mod mvi;
pub mod store;

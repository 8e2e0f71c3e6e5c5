//! The blog store handle: synchronous action creators plus the four
//! network-backed operations.
//!
//! Each operation dispatches `Pending`, races the API call against its
//! [`AbortSignal`], then dispatches exactly one of `Fulfilled` or
//! `Rejected`. A future dropped before it settles dispatches `Rejected`
//! with [`RejectReason::Aborted`]. The caller gets the raw outcome back;
//! the store only keeps what the reducer derives from the lifecycle intents.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::abort::AbortSignal;
use crate::api::{ApiError, PostsApi};
use crate::mvi::Intent;
use crate::store::{Store, StoreError, StoreHandle};

use super::error::{classify, OperationError, ValidationHandling};
use super::intent::{BlogIntent, UpdateArgs};
use super::lifecycle::{Lifecycle, RejectReason, RequestMeta};
use super::post::{Post, PostDraft};
use super::reducer::BlogReducer;
use super::state::{BlogState, RequestId};

#[derive(Clone)]
pub struct BlogStore {
    store: StoreHandle<BlogReducer>,
    api: Arc<dyn PostsApi>,
}

impl BlogStore {
    /// Spawn a dispatcher for `state` and wrap it with `api`.
    pub fn spawn(api: Arc<dyn PostsApi>, state: BlogState) -> Self {
        Self {
            store: Store::spawn(state),
            api,
        }
    }

    pub fn from_handle(store: StoreHandle<BlogReducer>, api: Arc<dyn PostsApi>) -> Self {
        Self { store, api }
    }

    pub fn handle(&self) -> &StoreHandle<BlogReducer> {
        &self.store
    }

    pub fn dispatch(&self, intent: BlogIntent) -> Result<(), StoreError> {
        self.store.dispatch(intent)
    }

    /// State after everything dispatched so far.
    pub async fn state(&self) -> Result<BlogState, StoreError> {
        self.store.state().await
    }

    pub fn subscribe(&self) -> watch::Receiver<BlogState> {
        self.store.subscribe()
    }

    /// Append a local post with a generated id.
    pub fn add_post(&self, draft: PostDraft) -> Result<(), StoreError> {
        self.store.dispatch(BlogIntent::add_post(draft))
    }

    pub fn start_editing(&self, post_id: impl Into<String>) -> Result<(), StoreError> {
        self.store.dispatch(BlogIntent::start_editing(post_id))
    }

    pub fn cancel_editing(&self) -> Result<(), StoreError> {
        self.store.dispatch(BlogIntent::CancelEditing)
    }

    pub fn finish_editing(&self, post: Post) -> Result<(), StoreError> {
        self.store.dispatch(BlogIntent::FinishEditing(post))
    }

    /// Fetch every post and replace the local list with the server's.
    pub async fn get_post_list(&self, signal: AbortSignal) -> Result<Vec<Post>, OperationError> {
        let api = Arc::clone(&self.api);
        self.run(
            (),
            BlogIntent::GetPostList,
            ValidationHandling::Propagate,
            &signal,
            async move { api.list().await },
        )
        .await
    }

    /// Create a post on the server and append what it returns.
    pub async fn create_post(
        &self,
        draft: PostDraft,
        signal: AbortSignal,
    ) -> Result<Post, OperationError> {
        let api = Arc::clone(&self.api);
        let body = draft.clone();
        self.run(
            draft,
            BlogIntent::CreatePost,
            ValidationHandling::Capture,
            &signal,
            async move { api.create(&body).await },
        )
        .await
    }

    /// Replace `post_id` on the server with `body`.
    pub async fn update_post(
        &self,
        post_id: impl Into<String>,
        body: Post,
        signal: AbortSignal,
    ) -> Result<Post, OperationError> {
        let args = UpdateArgs {
            post_id: post_id.into(),
            body,
        };
        let api = Arc::clone(&self.api);
        let request = args.clone();
        self.run(
            args,
            BlogIntent::UpdatePost,
            ValidationHandling::Capture,
            &signal,
            async move { api.update(&request.post_id, &request.body).await },
        )
        .await
    }

    /// Delete `post_id` on the server and drop it from the local list.
    pub async fn delete_post(
        &self,
        post_id: impl Into<String>,
        signal: AbortSignal,
    ) -> Result<Option<Post>, OperationError> {
        let post_id = post_id.into();
        let api = Arc::clone(&self.api);
        let target = post_id.clone();
        self.run(
            post_id,
            BlogIntent::DeletePost,
            ValidationHandling::Propagate,
            &signal,
            async move { api.delete(&target).await },
        )
        .await
    }

    async fn run<A, T, F>(
        &self,
        arg: A,
        wrap: fn(Lifecycle<A, T>) -> BlogIntent,
        handling: ValidationHandling,
        signal: &AbortSignal,
        call: F,
    ) -> Result<T, OperationError>
    where
        A: Clone,
        T: Clone,
        F: Future<Output = Result<T, ApiError>>,
    {
        let request_id = RequestId::new();
        let meta = || RequestMeta {
            request_id,
            arg: arg.clone(),
        };

        let pending = wrap(Lifecycle::Pending(meta()));
        let operation = pending.name();
        self.store.dispatch(pending)?;

        let mut guard = SettleGuard {
            store: &self.store,
            operation,
            request_id,
            on_drop: Some(wrap(Lifecycle::Rejected {
                meta: meta(),
                reason: RejectReason::Aborted,
            })),
        };

        let outcome = tokio::select! {
            biased;
            _ = signal.aborted() => Err(OperationError::Aborted),
            result = call => result.map_err(|e| classify(e, handling)),
        };

        let settled = match &outcome {
            Ok(payload) => {
                tracing::debug!(operation, request_id = %request_id, "operation fulfilled");
                Lifecycle::Fulfilled {
                    meta: meta(),
                    payload: payload.clone(),
                }
            }
            Err(err) => {
                match err {
                    OperationError::Failed(api_error) => tracing::warn!(
                        operation,
                        request_id = %request_id,
                        error_type = api_error.error_type(),
                        error = %api_error,
                        "operation failed"
                    ),
                    other => tracing::debug!(
                        operation,
                        request_id = %request_id,
                        error = %other,
                        "operation rejected"
                    ),
                }
                Lifecycle::Rejected {
                    meta: meta(),
                    reason: err.reject_reason(),
                }
            }
        };

        guard.disarm();
        if self.store.dispatch(wrap(settled)).is_err() {
            tracing::warn!(operation, request_id = %request_id, "store closed before operation settled");
        }

        outcome
    }
}

/// Settles an operation as aborted if its future is dropped between
/// `Pending` and the final dispatch.
struct SettleGuard<'a> {
    store: &'a StoreHandle<BlogReducer>,
    operation: &'static str,
    request_id: RequestId,
    on_drop: Option<BlogIntent>,
}

impl SettleGuard<'_> {
    fn disarm(&mut self) {
        self.on_drop = None;
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        let Some(intent) = self.on_drop.take() else {
            return;
        };
        tracing::debug!(
            operation = self.operation,
            request_id = %self.request_id,
            "operation dropped before settling"
        );
        if self.store.dispatch(intent).is_err() {
            tracing::warn!(
                operation = self.operation,
                request_id = %self.request_id,
                "store closed before dropped operation settled"
            );
        }
    }
}

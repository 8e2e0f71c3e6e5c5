//! Single-task dispatcher that owns slice state.
//!
//! Every mutation arrives as a [`StoreCommand`] on one channel and is
//! reduced to completion before the next command is read, so reductions
//! never overlap. Async operations run elsewhere and report back by
//! sending commands, never by touching the state directly.

use std::marker::PhantomData;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

use crate::mvi::{Intent, Reducer};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store dispatcher is no longer running")]
    Closed,
}

pub enum StoreCommand<R: Reducer> {
    Dispatch(R::Intent),
    /// Reply with the state as of every command queued before this one.
    GetState {
        respond_to: oneshot::Sender<R::State>,
    },
}

/// Owns the state; consumed by [`Store::run`].
pub struct Store<R: Reducer> {
    state: R::State,
    receiver: mpsc::UnboundedReceiver<StoreCommand<R>>,
    publisher: watch::Sender<R::State>,
    _reducer: PhantomData<fn() -> R>,
}

impl<R: Reducer> Store<R> {
    pub fn new(state: R::State) -> (Self, StoreHandle<R>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (publisher, watcher) = watch::channel(state.clone());
        let store = Self {
            state,
            receiver,
            publisher,
            _reducer: PhantomData,
        };
        (store, StoreHandle { sender, watcher })
    }

    /// Start the dispatcher on the current tokio runtime.
    pub fn spawn(state: R::State) -> StoreHandle<R>
    where
        R: 'static,
    {
        let (store, handle) = Self::new(state);
        tokio::spawn(store.run());
        handle
    }

    /// Process commands until every handle is dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.receiver.recv().await {
            match command {
                StoreCommand::Dispatch(intent) => self.apply(intent),
                StoreCommand::GetState { respond_to } => {
                    let _ = respond_to.send(self.state.clone());
                }
            }
        }
        tracing::debug!("store dispatcher stopped");
    }

    fn apply(&mut self, intent: R::Intent) {
        tracing::trace!(intent = intent.name(), "dispatch");
        let state = std::mem::take(&mut self.state);
        self.state = R::reduce(state, intent);

        let next = &self.state;
        self.publisher.send_if_modified(|published| {
            if published == next {
                false
            } else {
                *published = next.clone();
                true
            }
        });
    }
}

/// Cheap, clonable access to a running [`Store`].
pub struct StoreHandle<R: Reducer> {
    sender: mpsc::UnboundedSender<StoreCommand<R>>,
    watcher: watch::Receiver<R::State>,
}

impl<R: Reducer> Clone for StoreHandle<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            watcher: self.watcher.clone(),
        }
    }
}

impl<R: Reducer> StoreHandle<R> {
    /// Queue an intent. Returns as soon as it is queued.
    pub fn dispatch(&self, intent: R::Intent) -> Result<(), StoreError> {
        self.sender
            .send(StoreCommand::Dispatch(intent))
            .map_err(|_| StoreError::Closed)
    }

    /// State after every intent dispatched so far has been reduced.
    pub async fn state(&self) -> Result<R::State, StoreError> {
        let (respond_to, receiver) = oneshot::channel();
        self.sender
            .send(StoreCommand::GetState { respond_to })
            .map_err(|_| StoreError::Closed)?;
        receiver.await.map_err(|_| StoreError::Closed)
    }

    /// Most recently published state, without waiting for queued intents.
    pub fn latest(&self) -> R::State {
        self.watcher.borrow().clone()
    }

    /// Change notifications for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.watcher.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::{BlogIntent, BlogReducer, BlogState, Post, PostDraft};
    use std::time::Duration;

    #[tokio::test]
    async fn state_reflects_every_prior_dispatch() {
        let handle = Store::<BlogReducer>::spawn(BlogState::default());
        for _ in 0..10 {
            handle
                .dispatch(BlogIntent::add_post(PostDraft::new().with("title", "t")))
                .unwrap();
        }
        let state = handle.state().await.unwrap();
        assert_eq!(state.post_list.len(), 10);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let handle = Store::<BlogReducer>::spawn(BlogState::default());
        let mut updates = handle.subscribe();
        handle
            .dispatch(BlogIntent::AddPost(Post::new("a")))
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), updates.changed())
            .await
            .expect("change notification")
            .unwrap();
        assert_eq!(updates.borrow().post_list, vec![Post::new("a")]);
        assert_eq!(handle.latest().post_list.len(), 1);
    }

    #[tokio::test]
    async fn unchanged_state_is_not_republished() {
        let handle = Store::<BlogReducer>::spawn(BlogState::default());
        let updates = handle.subscribe();
        handle.dispatch(BlogIntent::CancelEditing).unwrap();
        handle.state().await.unwrap();
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test]
    async fn dispatch_fails_once_dispatcher_is_gone() {
        let (store, handle) = Store::<BlogReducer>::new(BlogState::default());
        drop(store);
        assert_eq!(
            handle.dispatch(BlogIntent::CancelEditing),
            Err(StoreError::Closed)
        );
        assert_eq!(handle.state().await, Err(StoreError::Closed));
    }
}

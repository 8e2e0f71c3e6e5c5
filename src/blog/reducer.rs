use crate::mvi::{Intent, Reducer};

use super::intent::BlogIntent;
use super::lifecycle::{track, Lifecycle};
use super::post::Post;
use super::state::BlogState;

/// Reducer for the blog slice.
pub struct BlogReducer;

impl Reducer for BlogReducer {
    type State = BlogState;
    type Intent = BlogIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        let name = intent.name();

        match intent {
            BlogIntent::AddPost(post) => state.post_list.push(post),

            BlogIntent::StartEditing { post_id } => {
                state.editing_post = state.find_post(&post_id).cloned();
            }

            BlogIntent::CancelEditing => state.editing_post = None,

            BlogIntent::FinishEditing(post) => {
                let post_id = post.id.clone();
                if !replace_post(&mut state.post_list, post) {
                    tracing::debug!(post_id = %post_id, "finished editing a post that is no longer listed");
                }
                state.editing_post = None;
            }

            BlogIntent::GetPostList(event) => {
                track(&mut state, name, &event);
                if let Lifecycle::Fulfilled { payload, .. } = event {
                    // Server order wins over whatever was held locally.
                    state.post_list = payload;
                }
            }

            BlogIntent::CreatePost(event) => {
                track(&mut state, name, &event);
                if let Lifecycle::Fulfilled { payload, .. } = event {
                    state.post_list.push(payload);
                }
            }

            BlogIntent::UpdatePost(event) => {
                track(&mut state, name, &event);
                if let Lifecycle::Fulfilled { payload, .. } = event {
                    replace_post(&mut state.post_list, payload);
                    state.editing_post = None;
                }
            }

            BlogIntent::DeletePost(event) => {
                track(&mut state, name, &event);
                if let Lifecycle::Fulfilled { meta, .. } = event {
                    if let Some(index) = state.post_list.iter().position(|p| p.id == meta.arg) {
                        state.post_list.remove(index);
                    }
                }
            }
        }

        state
    }
}

/// Replace the first post sharing `post.id`. Returns whether one matched.
fn replace_post(posts: &mut [Post], post: Post) -> bool {
    match posts.iter_mut().find(|existing| existing.id == post.id) {
        Some(slot) => {
            *slot = post;
            true
        }
        None => false,
    }
}

use uuid::Uuid;

use crate::mvi::Intent;

use super::lifecycle::Lifecycle;
use super::post::{Post, PostDraft};

/// Arguments of the update operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateArgs {
    pub post_id: String,
    pub body: Post,
}

/// Everything that can change the blog slice.
#[derive(Debug, Clone, PartialEq)]
pub enum BlogIntent {
    /// Append a post whose id was generated locally.
    AddPost(Post),

    /// Select a post for editing; unknown ids clear the selection.
    StartEditing { post_id: String },

    CancelEditing,

    /// Replace the post with the same id and leave editing mode.
    FinishEditing(Post),

    GetPostList(Lifecycle<(), Vec<Post>>),
    CreatePost(Lifecycle<PostDraft, Post>),
    UpdatePost(Lifecycle<UpdateArgs, Post>),
    /// The payload is the server's optional echo; removal uses the argument.
    DeletePost(Lifecycle<String, Option<Post>>),
}

impl Intent for BlogIntent {
    fn name(&self) -> &'static str {
        match self {
            BlogIntent::AddPost(_) => "blog/addPost",
            BlogIntent::StartEditing { .. } => "blog/startEditingPost",
            BlogIntent::CancelEditing => "blog/cancelEditingPost",
            BlogIntent::FinishEditing(_) => "blog/finishEditingPost",
            BlogIntent::GetPostList(_) => "blog/getPostList",
            BlogIntent::CreatePost(_) => "blog/createPost",
            BlogIntent::UpdatePost(_) => "blog/updatePost",
            BlogIntent::DeletePost(_) => "blog/deletePost",
        }
    }
}

impl BlogIntent {
    /// Prepare a [`BlogIntent::AddPost`] with a fresh unique id.
    pub fn add_post(draft: PostDraft) -> Self {
        BlogIntent::AddPost(Post::from_draft(Uuid::new_v4().to_string(), draft))
    }

    pub fn start_editing(post_id: impl Into<String>) -> Self {
        BlogIntent::StartEditing {
            post_id: post_id.into(),
        }
    }
}

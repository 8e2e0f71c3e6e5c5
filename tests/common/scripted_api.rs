//! In-memory `PostsApi` whose responses are released by the test, so
//! completion order can be chosen independently of dispatch order.

#![allow(dead_code)]

use async_trait::async_trait;
use blog_client::api::{ApiError, PostsApi};
use blog_client::blog::{Post, PostDraft};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

type Reply<T> = oneshot::Sender<Result<T, ApiError>>;
type Pending<T> = Mutex<VecDeque<oneshot::Receiver<Result<T, ApiError>>>>;

#[derive(Default)]
pub struct ScriptedApi {
    list: Pending<Vec<Post>>,
    create: Pending<Post>,
    update: Pending<Post>,
    delete: Pending<Option<Post>>,
    calls: Mutex<Vec<String>>,
}

fn expect<T>(queue: &Pending<T>) -> Reply<T> {
    let (tx, rx) = oneshot::channel();
    queue.lock().unwrap().push_back(rx);
    tx
}

async fn answer<T>(queue: &Pending<T>) -> Result<T, ApiError> {
    let rx = queue
        .lock()
        .unwrap()
        .pop_front()
        .expect("unexpected call: no scripted response queued");
    rx.await.expect("scripted reply dropped")
}

impl ScriptedApi {
    pub fn expect_list(&self) -> Reply<Vec<Post>> {
        expect(&self.list)
    }

    pub fn expect_create(&self) -> Reply<Post> {
        expect(&self.create)
    }

    pub fn expect_update(&self) -> Reply<Post> {
        expect(&self.update)
    }

    pub fn expect_delete(&self) -> Reply<Option<Post>> {
        expect(&self.delete)
    }

    /// Calls that reached the API, e.g. `"GET posts"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PostsApi for ScriptedApi {
    async fn list(&self) -> Result<Vec<Post>, ApiError> {
        self.record("GET posts".to_string());
        answer(&self.list).await
    }

    async fn create(&self, _draft: &PostDraft) -> Result<Post, ApiError> {
        self.record("POST posts".to_string());
        answer(&self.create).await
    }

    async fn update(&self, post_id: &str, _post: &Post) -> Result<Post, ApiError> {
        self.record(format!("PUT posts/{}", post_id));
        answer(&self.update).await
    }

    async fn delete(&self, post_id: &str) -> Result<Option<Post>, ApiError> {
        self.record(format!("DELETE posts/{}", post_id));
        answer(&self.delete).await
    }
}

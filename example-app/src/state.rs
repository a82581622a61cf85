use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct AppState {
    posts: Arc<RwLock<BTreeMap<u64, Post>>>,
    next_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<Post> {
        self.posts.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: u64) -> Option<Post> {
        self.posts.read().await.get(&id).cloned()
    }

    pub async fn insert(&self, input: NewPost) -> Post {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let post = Post {
            id,
            title: input.title,
            body: input.body,
        };
        self.posts.write().await.insert(id, post.clone());
        post
    }

    pub async fn update(&self, id: u64, input: NewPost) -> Option<Post> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id)?;
        post.title = input.title;
        post.body = input.body;
        Some(post.clone())
    }

    pub async fn remove(&self, id: u64) -> Option<Post> {
        self.posts.write().await.remove(&id)
    }
}

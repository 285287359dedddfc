//! In-memory post store.
//!
//! Posts are kept in insertion order behind an [`RwLock`]. Reads hand out
//! cloned snapshots, so callers never observe a mutation halfway through.
//! Nothing is persisted; the store lives as long as the process that built it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::debug;

use crate::post::{Post, PostCreate, PostUpdate, Tag};
use crate::validation::Validated;

/// The store as shared between request handlers.
pub type SharedStore = Arc<PostStore>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("post {0} not found")]
    NotFound(u64),
}

#[derive(Debug, Default)]
pub struct PostStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    posts: Vec<Post>,
    /// Highest id ever handed out; ids are never reused, even after deletes.
    last_id: u64,
}

impl PostStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the three sample posts served at startup.
    pub fn seeded() -> Self {
        let samples = [
            ("Hola desde FastAPI", "Este es mi primer post en FastAPI.", &["intro", "fastapi"][..]),
            ("Segundo Post", "Aprendiendo FastAPI es divertido!", &["fastapi"][..]),
            ("Tercer Post", "¡Estoy emocionado por construir más con FastAPI!", &[][..]),
        ];
        let posts = samples
            .into_iter()
            .zip(1..)
            .map(|((title, content, tags), id)| Post {
                id,
                title: title.to_owned(),
                content: content.to_owned(),
                tags: tags.iter().copied().map(Tag::new).collect(),
                author: None,
            })
            .collect();
        Self::from_posts(posts)
    }

    /// A store pre-filled with `posts`, kept in the given order.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let last_id = posts.iter().map(|p| p.id).max().unwrap_or(0);
        Self { inner: RwLock::new(Inner { posts, last_id }) }
    }

    /// Snapshot of every post in insertion order.
    pub fn list(&self) -> Vec<Post> {
        self.read().posts.clone()
    }

    pub fn get(&self, id: u64) -> Result<Post, StoreError> {
        self.read()
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub fn create(&self, input: Validated<PostCreate>) -> Post {
        let mut inner = self.write();
        inner.last_id += 1;
        let post = Post::from_create(inner.last_id, input.into_inner());
        inner.posts.push(post.clone());
        debug!(post_id = post.id, total = inner.posts.len(), "post stored");
        post
    }

    pub fn update(&self, id: u64, input: Validated<PostUpdate>) -> Result<Post, StoreError> {
        let mut inner = self.write();
        let post = inner
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        post.apply(input.into_inner());
        Ok(post.clone())
    }

    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.write();
        let index = inner
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        inner.posts.remove(index);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written `Post`
    // behind, so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

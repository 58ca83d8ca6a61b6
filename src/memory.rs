//! In-memory store.
//!
//! Holds posts, comments and communities in plain vectors behind a
//! [`RwLock`]. Good for tests, demos and seeding from a JSON fixture.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{Comment, CommentId, Community, Post, PostId, Vote};
use crate::store::{Clock, PostFilter, StoreReader, StoreWriter, SystemClock};
use crate::threading::CommentDraft;

/// Records to load into a [`MemoryStore`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    /// Posts
    pub posts: Vec<Post>,
    /// Comments
    pub comments: Vec<Comment>,
    /// Communities
    pub communities: Vec<Community>,
}

impl Seed {
    /// Parse a seed from `{"posts": [...], "comments": [...], "communities": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Store(format!("invalid seed: {e}")))
    }
}

/// A store kept entirely in memory.
///
/// # Example
///
/// ```
/// use threadloop::memory::MemoryStore;
/// use threadloop::store::StoreReader;
///
/// # #[tokio::main]
/// # async fn main() -> threadloop::Result<()> {
/// let store = MemoryStore::new();
/// assert!(store.fetch_comments(1).await?.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore<C = SystemClock> {
    state: RwLock<Seed>,
    clock: C,
}

impl MemoryStore<SystemClock> {
    /// Create an empty store stamping records with the wall clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> MemoryStore<C> {
    /// Create an empty store stamping records with `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: RwLock::new(Seed::default()),
            clock,
        }
    }

    /// Replace the store's contents with `seed`.
    pub fn seeded(self, seed: Seed) -> Self {
        Self {
            state: RwLock::new(seed),
            clock: self.clock,
        }
    }

    /// Number of stored comments across all posts.
    pub fn comment_count(&self) -> Result<usize> {
        Ok(self.read()?.comments.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Seed>> {
        self.state
            .read()
            .map_err(|_| Error::Store("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Seed>> {
        self.state
            .write()
            .map_err(|_| Error::Store("memory store lock poisoned".to_string()))
    }
}

/// Next id after the largest in use, 1 when empty.
fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}

#[async_trait]
impl<C: Clock> StoreReader for MemoryStore<C> {
    async fn fetch_posts(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        let state = self.read()?;
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn fetch_post(&self, id: PostId) -> Result<Post> {
        self.read()?
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(Error::NotFound { kind: "post", id })
    }

    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let state = self.read()?;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn fetch_communities(&self) -> Result<Vec<Community>> {
        let mut communities = self.read()?.communities.clone();
        communities.sort_by(|a, b| b.member_count.cmp(&a.member_count));
        Ok(communities)
    }
}

#[async_trait]
impl<C: Clock> StoreWriter for MemoryStore<C> {
    async fn vote_post(&self, id: PostId, vote: Vote) -> Result<Post> {
        let mut state = self.write()?;
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::NotFound { kind: "post", id })?;
        vote.apply(&mut post.upvotes, &mut post.downvotes);
        Ok(post.clone())
    }

    async fn vote_comment(&self, id: CommentId, vote: Vote) -> Result<Comment> {
        let mut state = self.write()?;
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(Error::NotFound { kind: "comment", id })?;
        vote.apply(&mut comment.upvotes, &mut comment.downvotes);
        Ok(comment.clone())
    }

    async fn create_comment(&self, draft: CommentDraft) -> Result<Comment> {
        let now = self.clock.now();
        let mut state = self.write()?;

        // An unknown parent counts as depth 0, so its reply lands at 1
        let depth = match draft.parent_id {
            Some(parent) => {
                state
                    .comments
                    .iter()
                    .find(|c| c.id == parent)
                    .map_or(0, |c| c.depth)
                    + 1
            }
            None => 0,
        };

        let comment = Comment {
            id: next_id(state.comments.iter().map(|c| c.id)),
            post_id: draft.post_id,
            parent_id: draft.parent_id,
            author: draft.author,
            content: draft.content,
            upvotes: 1,
            downvotes: 0,
            created_at: now,
            depth,
        };
        if let Some(post) = state.posts.iter_mut().find(|p| p.id == comment.post_id) {
            post.comment_count = post.comment_count.saturating_add(1);
        }
        state.comments.push(comment.clone());
        Ok(comment)
    }
}

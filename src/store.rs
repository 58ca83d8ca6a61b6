//! Store ports.
//!
//! The ranking and threading code never talks to storage itself; a
//! [`Board`](crate::board::Board) pulls records through these traits.
//! [`MemoryStore`](crate::memory::MemoryStore) is the bundled
//! implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Comment, CommentId, Community, CommunityId, Post, PostId, Vote};
use crate::threading::CommentDraft;

/// Narrows the posts a store returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostFilter {
    /// Only posts in this community
    pub community: Option<CommunityId>,
    /// Only posts whose title or body contains this text, ignoring case
    pub query: Option<String>,
}

impl PostFilter {
    /// Every post.
    pub fn all() -> Self {
        Self::default()
    }

    /// Posts of one community.
    pub fn community(community: CommunityId) -> Self {
        Self {
            community: Some(community),
            query: None,
        }
    }

    /// Posts matching a text query.
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            community: None,
            query: Some(query.into()),
        }
    }

    /// Check if `post` passes this filter.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(community) = self.community {
            if post.community_id != community {
                return false;
            }
        }

        match &self.query {
            Some(query) => {
                let needle = query.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Read side of a board store.
#[async_trait]
pub trait StoreReader: Send + Sync {
    /// Posts passing `filter`, newest first.
    async fn fetch_posts(&self, filter: &PostFilter) -> Result<Vec<Post>>;

    /// One post by id.
    async fn fetch_post(&self, id: PostId) -> Result<Post>;

    /// Every comment of a post, oldest first.
    async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>>;

    /// All communities, most members first.
    async fn fetch_communities(&self) -> Result<Vec<Community>>;
}

/// Write side of a board store.
#[async_trait]
pub trait StoreWriter: Send + Sync {
    /// Record a vote on a post, returning the updated post.
    async fn vote_post(&self, id: PostId, vote: Vote) -> Result<Post>;

    /// Record a vote on a comment, returning the updated comment.
    async fn vote_comment(&self, id: CommentId, vote: Vote) -> Result<Comment>;

    /// Persist a new comment. The store assigns id, tally and timestamp.
    async fn create_comment(&self, draft: CommentDraft) -> Result<Comment>;
}

/// Source of "now" for hot ranking and new records.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant, for reproducible rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_post(id: PostId, community_id: CommunityId, title: &str, content: &str) -> Post {
        Post {
            id,
            community_id,
            title: title.to_string(),
            content: content.to_string(),
            image_url: None,
            author: "tester".to_string(),
            upvotes: 1,
            downvotes: 0,
            comment_count: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_filter_all_matches_everything() {
        assert!(PostFilter::all().matches(&make_post(1, 1, "a", "b")));
    }

    #[test]
    fn test_filter_by_community() {
        let filter = PostFilter::community(2);
        assert!(filter.matches(&make_post(1, 2, "a", "b")));
        assert!(!filter.matches(&make_post(1, 3, "a", "b")));
    }

    #[test]
    fn test_filter_query_is_case_insensitive() {
        let filter = PostFilter::search("RUST");
        assert!(filter.matches(&make_post(1, 1, "Learning rust", "")));
        assert!(filter.matches(&make_post(2, 1, "Hello", "I like Rust a lot")));
        assert!(!filter.matches(&make_post(3, 1, "Hello", "Go is fine")));
    }

    #[test]
    fn test_filter_combines_conditions() {
        let filter = PostFilter {
            community: Some(1),
            query: Some("cat".to_string()),
        };
        assert!(filter.matches(&make_post(1, 1, "Cats", "")));
        assert!(!filter.matches(&make_post(2, 2, "Cats", "")));
        assert!(!filter.matches(&make_post(3, 1, "Dogs", "")));
    }

    #[test]
    fn test_fixed_clock() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = FixedClock(t);
        assert_eq!(clock.now(), t);
        assert_eq!((&clock).now(), t);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let a = SystemClock.now();
        let b = SystemClock.now();
        assert!(b >= a);
    }
}

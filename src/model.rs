//! Board records consumed by the ranking and threading code.
//!
//! These mirror what the external store hands back. Field names serialize
//! in camelCase so records round-trip the store's JSON unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post identifier.
pub type PostId = u64;
/// Comment identifier, unique within a post.
pub type CommentId = u64;
/// Community identifier.
pub type CommunityId = u64;

/// Anything carrying a vote tally and a creation instant.
///
/// The ranking engine orders any `Scored` collection, so posts and comments
/// share one implementation.
pub trait Scored {
    /// Number of upvotes.
    fn upvotes(&self) -> u32;

    /// Number of downvotes.
    fn downvotes(&self) -> u32;

    /// When the item was created.
    fn created_at(&self) -> DateTime<Utc>;

    /// Vote differential, `upvotes - downvotes`. Never stored.
    fn score(&self) -> i64 {
        i64::from(self.upvotes()) - i64::from(self.downvotes())
    }
}

impl<T: Scored + ?Sized> Scored for &T {
    fn upvotes(&self) -> u32 {
        (**self).upvotes()
    }

    fn downvotes(&self) -> u32 {
        (**self).downvotes()
    }

    fn created_at(&self) -> DateTime<Utc> {
        (**self).created_at()
    }
}

/// A post in a community feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post id
    pub id: PostId,
    /// Owning community
    pub community_id: CommunityId,
    /// Headline
    pub title: String,
    /// Body text
    #[serde(default)]
    pub content: String,
    /// Optional attached image
    #[serde(default)]
    pub image_url: Option<String>,
    /// Display name of the poster
    pub author: String,
    /// Upvote counter
    pub upvotes: u32,
    /// Downvote counter
    pub downvotes: u32,
    /// Number of comments under the post
    #[serde(default)]
    pub comment_count: u32,
    /// Creation instant
    pub created_at: DateTime<Utc>,
    /// Last edit instant
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Scored for Post {
    fn upvotes(&self) -> u32 {
        self.upvotes
    }

    fn downvotes(&self) -> u32 {
        self.downvotes
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A comment on a post, possibly replying to another comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment id, unique within its post
    pub id: CommentId,
    /// Owning post
    pub post_id: PostId,
    /// Comment being replied to; `None` for a top-level comment
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    /// Display name of the commenter
    pub author: String,
    /// Body text
    pub content: String,
    /// Upvote counter
    pub upvotes: u32,
    /// Downvote counter
    pub downvotes: u32,
    /// Creation instant
    pub created_at: DateTime<Utc>,
    /// Depth as stored by whoever wrote the record.
    ///
    /// Informational only: thread assembly recomputes depth from the
    /// parent chain, since cached collections may predate the invariant.
    #[serde(default)]
    pub depth: usize,
}

impl Comment {
    /// Check if this comment is a reply (has a parent).
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

impl Scored for Comment {
    fn upvotes(&self) -> u32 {
        self.upvotes
    }

    fn downvotes(&self) -> u32 {
        self.downvotes
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A topic community that posts belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    /// Unique community id
    pub id: CommunityId,
    /// Short name
    pub name: String,
    /// Sidebar description
    #[serde(default)]
    pub description: String,
    /// Joined members
    pub member_count: u32,
    /// Creation instant
    pub created_at: DateTime<Utc>,
    /// Optional icon
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// Direction of a single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    /// Increment the upvote counter
    Up,
    /// Increment the downvote counter
    Down,
}

impl Vote {
    /// Apply this vote to a pair of counters, saturating at `u32::MAX`.
    pub fn apply(self, upvotes: &mut u32, downvotes: &mut u32) {
        match self {
            Vote::Up => *upvotes = upvotes.saturating_add(1),
            Vote::Down => *downvotes = downvotes.saturating_add(1),
        }
    }
}

//! Threaded comment trees.
//!
//! This module turns the flat comment list of a post into a forest of reply
//! trees and keeps it current while the user replies:
//!
//! - **Thread building**: Linking comments to their parents, computing depth
//!   and ordering replies oldest first
//! - **Live replies**: Appending a newly created comment without a rebuild
//! - **View state**: Tracking which comments are collapsed
//! - **Reply composition**: Building validated comment drafts
//!
//! # Overview
//!
//! - [`ThreadNode`]: A comment with its resolved depth and replies
//! - [`Forest`]: All root threads of a post plus recovered [`ThreadIssue`]s
//! - [`ThreadView`]: Expand/collapse flags, kept apart from the tree
//! - [`CommentDraft`]: A validated new comment, built with
//!   [`CommentDraftBuilder`]
//!
//! # Example
//!
//! ```
//! use threadloop::config::ThreadOptions;
//! use threadloop::model::Comment;
//! use threadloop::threading::{build_forest, ThreadView};
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> threadloop::Result<()> {
//! let comment = |id, parent_id| Comment {
//!     id,
//!     post_id: 1,
//!     parent_id,
//!     author: "alice".to_string(),
//!     content: "hi".to_string(),
//!     upvotes: 1,
//!     downvotes: 0,
//!     created_at: Utc.timestamp_opt(id as i64, 0).unwrap(),
//!     depth: 0,
//! };
//!
//! let forest = build_forest(vec![comment(1, None), comment(2, Some(1)), comment(3, Some(2))])?;
//! assert_eq!(forest.len(), 3);
//! assert_eq!(forest.find(3).map(|n| n.depth), Some(2));
//!
//! let mut view = ThreadView::new();
//! view.collapse(2);
//! let shown: Vec<u64> = view.visible(&forest).map(|n| n.id()).collect();
//! assert_eq!(shown, vec![1, 2]);
//!
//! assert!(forest.reply_target(2, &ThreadOptions::default()).is_ok());
//! # Ok(())
//! # }
//! ```

mod algorithm;
mod builder;
mod incremental;
mod types;
mod view;

// Re-export public types
pub use algorithm::{build_forest, build_forest_for_post};
pub use builder::{CommentDraft, CommentDraftBuilder};
pub use types::{Forest, ThreadIssue, ThreadNode, ThreadNodeIterator};
pub use view::{NodeState, ThreadView, VisibleNodes};

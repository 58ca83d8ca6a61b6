//! Error types for the ranking and threading library.

use thiserror::Error;

use crate::model::{CommentId, PostId};

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur when ranking feeds or assembling threads.
///
/// Recoverable conditions (orphaned comments, cross-post parents, stale
/// stored depths) are not errors; they are recorded as
/// [`ThreadIssue`](crate::threading::ThreadIssue)s on the built forest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Unrecognized sort key passed to a strict parse.
    ///
    /// [`SortType::parse_lossy`](crate::ranking::SortType::parse_lossy)
    /// never produces this; it falls back to `new` ordering instead.
    #[error("invalid sort type: {0:?}")]
    InvalidSortType(String),

    /// The `parent_id` chain of the listed comments loops back on itself.
    #[error("comment parent chain forms a cycle: {cycle:?}")]
    CycleDetected {
        /// Comment ids on the cycle, in parent-chain order
        cycle: Vec<CommentId>,
    },

    /// Two comments share one id.
    #[error("duplicate comment id {0}")]
    DuplicateComment(CommentId),

    /// A reply names a parent that is not in the thread.
    #[error("parent comment {0} not found in thread")]
    ParentNotFound(CommentId),

    /// A comment belongs to another post than the thread it is added to.
    #[error("comment on post {comment_post} does not belong to the thread of post {thread_post}")]
    PostMismatch {
        /// Post named by the comment
        comment_post: PostId,
        /// Post the thread was built for
        thread_post: PostId,
    },

    /// A reply targets a comment nested too deeply to accept replies.
    #[error("comment {parent} at depth {depth} does not accept replies (max depth {max_depth})")]
    ReplyDepthExceeded {
        /// The comment the reply was aimed at
        parent: CommentId,
        /// Its resolved depth
        depth: usize,
        /// Configured reply limit
        max_depth: usize,
    },

    /// A comment draft is missing a required field.
    #[error("invalid comment draft: {0}")]
    InvalidDraft(String),

    /// Store lookup failed (e.g., post or comment deleted).
    #[error("{kind} not found with ID {id}")]
    NotFound {
        /// Record kind ("post", "comment", ...)
        kind: &'static str,
        /// The missing id
        id: u64,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Opaque failure reported by an external store.
    #[error("store error: {0}")]
    Store(String),
}

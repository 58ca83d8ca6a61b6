//! Composing new comments.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Comment, CommentId, PostId};

/// A validated comment ready to hand to a store.
///
/// The store assigns the id, the initial tally and the creation instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    /// Post the comment belongs to
    pub post_id: PostId,
    /// Comment being replied to, if any
    pub parent_id: Option<CommentId>,
    /// Display name of the commenter
    pub author: String,
    /// Body text
    pub content: String,
}

impl CommentDraft {
    /// Start composing a comment.
    pub fn builder() -> CommentDraftBuilder {
        CommentDraftBuilder::new()
    }

    /// Check if this draft replies to another comment.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Builder for composing new comments.
///
/// # Example
///
/// ```
/// use threadloop::threading::CommentDraft;
///
/// let draft = CommentDraft::builder()
///     .post(1)
///     .author("alice")
///     .content("Nice post!")
///     .build()
///     .unwrap();
///
/// assert!(!draft.is_reply());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommentDraftBuilder {
    post_id: Option<PostId>,
    parent_id: Option<CommentId>,
    author: Option<String>,
    content: Option<String>,
}

impl CommentDraftBuilder {
    /// Create a new comment builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the post to comment on (required).
    pub fn post(mut self, post_id: PostId) -> Self {
        self.post_id = Some(post_id);
        self
    }

    /// Set the commenter (required).
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the body (required, not blank).
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Make this a reply to `parent`.
    ///
    /// Takes the post from the parent as well, so a reply can't end up on
    /// a different post than the comment it answers.
    pub fn in_reply_to(mut self, parent: &Comment) -> Self {
        self.post_id = Some(parent.post_id);
        self.parent_id = Some(parent.id);
        self
    }

    /// Make this a reply, using just the parent's id.
    ///
    /// Prefer [`in_reply_to`](Self::in_reply_to) when the parent comment is
    /// at hand.
    pub fn parent(mut self, parent_id: CommentId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Validate and produce the draft.
    ///
    /// Returns [`Error::InvalidDraft`] if the post or author is missing, or
    /// if the body is empty or only whitespace.
    pub fn build(self) -> Result<CommentDraft> {
        let post_id = self
            .post_id
            .ok_or_else(|| Error::InvalidDraft("post is required".to_string()))?;

        let author = self
            .author
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| Error::InvalidDraft("author is required".to_string()))?;

        let content = self
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::InvalidDraft("content must not be blank".to_string()))?;

        Ok(CommentDraft {
            post_id,
            parent_id: self.parent_id,
            author,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_parent() -> Comment {
        Comment {
            id: 12,
            post_id: 4,
            parent_id: Some(3),
            author: "bob".to_string(),
            content: "parent".to_string(),
            upvotes: 1,
            downvotes: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            depth: 1,
        }
    }

    #[test]
    fn test_draft_builder_basic() {
        let draft = CommentDraft::builder()
            .post(1)
            .author("alice")
            .content("Hello")
            .build()
            .unwrap();

        assert_eq!(draft.post_id, 1);
        assert_eq!(draft.parent_id, None);
        assert_eq!(draft.author, "alice");
        assert_eq!(draft.content, "Hello");
        assert!(!draft.is_reply());
    }

    #[test]
    fn test_draft_builder_in_reply_to() {
        let parent = make_parent();
        let draft = CommentDraft::builder()
            .author("alice")
            .content("Agreed")
            .in_reply_to(&parent)
            .build()
            .unwrap();

        assert_eq!(draft.post_id, 4);
        assert_eq!(draft.parent_id, Some(12));
        assert!(draft.is_reply());
    }

    #[test]
    fn test_draft_builder_reply_overrides_post() {
        // The parent's post wins over an earlier post() call
        let draft = CommentDraft::builder()
            .post(99)
            .author("alice")
            .content("Agreed")
            .in_reply_to(&make_parent())
            .build()
            .unwrap();

        assert_eq!(draft.post_id, 4);
    }

    #[test]
    fn test_draft_builder_parent_id_only() {
        let draft = CommentDraft::builder()
            .post(2)
            .parent(8)
            .author("carol")
            .content("Reply")
            .build()
            .unwrap();

        assert_eq!(draft.parent_id, Some(8));
    }

    #[test]
    fn test_draft_builder_missing_post() {
        let result = CommentDraft::builder().author("alice").content("Hi").build();
        assert!(matches!(result, Err(Error::InvalidDraft(_))));
    }

    #[test]
    fn test_draft_builder_missing_author() {
        let result = CommentDraft::builder().post(1).content("Hi").build();
        assert!(matches!(result, Err(Error::InvalidDraft(_))));

        let result = CommentDraft::builder()
            .post(1)
            .author("  ")
            .content("Hi")
            .build();
        assert!(matches!(result, Err(Error::InvalidDraft(_))));
    }

    #[test]
    fn test_draft_builder_blank_content() {
        let result = CommentDraft::builder().post(1).author("alice").build();
        assert!(matches!(result, Err(Error::InvalidDraft(_))));

        let result = CommentDraft::builder()
            .post(1)
            .author("alice")
            .content(" \n\t ")
            .build();
        assert!(matches!(result, Err(Error::InvalidDraft(_))));
    }

    #[test]
    fn test_draft_keeps_content_verbatim() {
        let draft = CommentDraft::builder()
            .post(1)
            .author("alice")
            .content("  padded  ")
            .build()
            .unwrap();
        assert_eq!(draft.content, "  padded  ");
    }
}

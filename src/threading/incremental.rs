//! Incremental reply insertion.
//!
//! After a reply is created, callers append it to the forest they are
//! already showing instead of refetching and rebuilding the whole thread.
//! Live replies go to the end of their parent's reply list, so they show up
//! where the user just typed them even if older replies arrived meanwhile;
//! the next full rebuild restores strict oldest-first order.

use crate::config::ThreadOptions;
use crate::error::{Error, Result};
use crate::model::{Comment, CommentId, PostId};

use super::types::{Forest, ThreadNode};

impl Forest {
    /// Look up the node a reply to `parent` would attach to, checking that
    /// it accepts replies under `options`.
    ///
    /// Use this before persisting a reply so a reply that can't be shown is
    /// never written.
    ///
    /// # Errors
    ///
    /// - [`Error::ParentNotFound`] if `parent` is not in the forest
    /// - [`Error::ReplyDepthExceeded`] if `parent` is at or beyond
    ///   `options.max_depth`
    pub fn reply_target(&self, parent: CommentId, options: &ThreadOptions) -> Result<&ThreadNode> {
        let path = self.reply_path(parent, options)?;
        Ok(self.node_at(&path))
    }

    /// Check that a comment on `post` may join this forest.
    ///
    /// A forest not yet tied to a post accepts any post.
    ///
    /// # Errors
    ///
    /// [`Error::PostMismatch`] if the forest belongs to another post
    pub fn check_post(&self, post: PostId) -> Result<()> {
        match self.post_id() {
            Some(thread_post) if thread_post != post => Err(Error::PostMismatch {
                comment_post: post,
                thread_post,
            }),
            _ => Ok(()),
        }
    }

    /// Append a freshly created comment to the forest.
    ///
    /// A comment without a parent becomes the last root at depth 0. A reply
    /// is placed last among its parent's replies at `parent.depth + 1`. No
    /// reordering happens.
    ///
    /// # Errors
    ///
    /// - [`Error::PostMismatch`] if the comment is for another post
    /// - [`Error::DuplicateComment`] if the id is already present
    /// - [`Error::ParentNotFound`] if the parent is missing or on another post
    /// - [`Error::ReplyDepthExceeded`] if the parent doesn't accept replies
    pub fn insert_reply(&mut self, reply: Comment, options: &ThreadOptions) -> Result<&ThreadNode> {
        self.check_post(reply.post_id)?;
        if self.contains(reply.id) {
            return Err(Error::DuplicateComment(reply.id));
        }

        let Some(parent_id) = reply.parent_id else {
            self.record_insert(reply.post_id);
            let roots = self.roots_mut();
            roots.push(ThreadNode::new(reply, 0));
            let last = roots.len() - 1;
            return Ok(&roots[last]);
        };

        let path = self.reply_path(parent_id, options)?;
        let parent = self.node_at(&path);
        if parent.comment.post_id != reply.post_id {
            return Err(Error::ParentNotFound(parent_id));
        }
        let depth = parent.depth + 1;

        self.record_insert(reply.post_id);
        let replies = &mut self.node_at_mut(&path).children;
        replies.push(ThreadNode::new(reply, depth));
        let last = replies.len() - 1;
        Ok(&replies[last])
    }

    fn reply_path(&self, parent: CommentId, options: &ThreadOptions) -> Result<Vec<usize>> {
        let path = self.path_to(parent).ok_or(Error::ParentNotFound(parent))?;
        let node = self.node_at(&path);
        if !node.can_reply(options) {
            return Err(Error::ReplyDepthExceeded {
                parent,
                depth: node.depth,
                max_depth: options.max_depth,
            });
        }
        Ok(path)
    }

    /// Child indices leading from a root to the node with `id`.
    fn path_to(&self, id: CommentId) -> Option<Vec<usize>> {
        // (level, index among siblings, node)
        let mut stack: Vec<(usize, usize, &ThreadNode)> = self
            .roots()
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (0, i, node))
            .collect();
        let mut path: Vec<usize> = Vec::new();

        while let Some((level, index, node)) = stack.pop() {
            path.truncate(level);
            path.push(index);
            if node.comment.id == id {
                return Some(path);
            }
            for (i, child) in node.children.iter().enumerate().rev() {
                stack.push((level + 1, i, child));
            }
        }

        None
    }

    fn node_at(&self, path: &[usize]) -> &ThreadNode {
        let mut node = &self.roots()[path[0]];
        for &i in &path[1..] {
            node = &node.children[i];
        }
        node
    }

    fn node_at_mut(&mut self, path: &[usize]) -> &mut ThreadNode {
        let mut node = &mut self.roots_mut()[path[0]];
        for &i in &path[1..] {
            node = &mut node.children[i];
        }
        node
    }
}

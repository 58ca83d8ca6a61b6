//! Core types for threaded comments.

use serde::Serialize;

use crate::config::ThreadOptions;
use crate::model::{Comment, CommentId, PostId};

/// A node in the thread tree: a comment, its resolved depth, and its replies.
///
/// `depth` is computed from the parent chain during assembly and is the
/// value to render with; the comment's own stored `depth` is ignored.
///
/// Dropping, cloning and comparing walk the tree with an explicit stack, so
/// reply chains of any length are safe. `Debug` and `Serialize` still nest
/// one call per level and are meant for threads of displayable depth.
#[derive(Debug, Serialize)]
pub struct ThreadNode {
    /// The comment at this node
    pub comment: Comment,
    /// Number of ancestors (0 for a root)
    pub depth: usize,
    /// Direct replies, oldest first as loaded, live replies appended last
    pub children: Vec<ThreadNode>,
}

impl ThreadNode {
    /// Create a new thread node with no replies.
    pub fn new(comment: Comment, depth: usize) -> Self {
        Self {
            comment,
            depth,
            children: Vec::new(),
        }
    }

    /// The comment id at this node.
    pub fn id(&self) -> CommentId {
        self.comment.id
    }

    /// Get the number of direct replies.
    pub fn reply_count(&self) -> usize {
        self.children.len()
    }

    /// Check if this comment has any replies.
    pub fn has_replies(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether a reply action should be offered at this node.
    ///
    /// Only reply eligibility is bounded; deeper nodes still render.
    pub fn can_reply(&self, options: &ThreadOptions) -> bool {
        options.can_reply(self.depth)
    }

    /// Find a node by comment id in this subtree.
    pub fn find(&self, id: CommentId) -> Option<&ThreadNode> {
        self.iter().find(|node| node.comment.id == id)
    }

    /// Count all nodes in this subtree, including this one.
    pub fn count_nodes(&self) -> usize {
        self.iter().count()
    }

    /// Length of the longest reply chain below this node (0 if no replies).
    pub fn height(&self) -> usize {
        self.iter()
            .map(|node| node.depth.saturating_sub(self.depth))
            .max()
            .unwrap_or(0)
    }

    /// Iterate over this subtree in pre-order (depth-first, oldest reply first).
    pub fn iter(&self) -> ThreadNodeIterator<'_> {
        ThreadNodeIterator::new(vec![self])
    }
}

impl Drop for ThreadNode {
    fn drop(&mut self) {
        // Detach every descendant so each node drops with no children left
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl Clone for ThreadNode {
    fn clone(&self) -> Self {
        // Reverse pre-order finishes every subtree before its parent; the
        // finished stack then holds a parent's children last-first on top.
        let order: Vec<&ThreadNode> = self.iter().collect();
        let mut finished: Vec<ThreadNode> = Vec::with_capacity(order.len());

        for source in order.into_iter().rev() {
            let first_child = finished.len() - source.children.len();
            let mut children = finished.split_off(first_child);
            children.reverse();
            finished.push(ThreadNode {
                comment: source.comment.clone(),
                depth: source.depth,
                children,
            });
        }

        finished
            .pop()
            .unwrap_or_else(|| ThreadNode::new(self.comment.clone(), self.depth))
    }
}

impl PartialEq for ThreadNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.depth != b.depth
                || a.children.len() != b.children.len()
                || a.comment != b.comment
            {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for ThreadNode {}

/// Something recovered from while assembling a forest.
///
/// None of these stop assembly; they are surfaced so the caller can decide
/// whether to report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ThreadIssue {
    /// The declared parent does not exist; the comment was promoted to root.
    OrphanParent {
        /// The promoted comment
        comment: CommentId,
        /// The parent id it declared
        parent: CommentId,
    },
    /// The declared parent belongs to another post; the comment was
    /// promoted to root.
    ForeignParent {
        /// The promoted comment
        comment: CommentId,
        /// The parent id it declared
        parent: CommentId,
        /// The post that parent actually belongs to
        parent_post: PostId,
    },
    /// The comment belongs to another post and was left out of the thread.
    ForeignComment {
        /// The excluded comment
        comment: CommentId,
        /// The post it belongs to
        post: PostId,
    },
    /// The stored depth disagrees with the parent chain.
    StaleDepth {
        /// The comment carrying the stale value
        comment: CommentId,
        /// Depth found on the record
        stored: usize,
        /// Depth derived from the parent chain
        resolved: usize,
    },
}

impl ThreadIssue {
    /// The comment this issue concerns.
    pub fn comment_id(&self) -> CommentId {
        match *self {
            ThreadIssue::OrphanParent { comment, .. }
            | ThreadIssue::ForeignParent { comment, .. }
            | ThreadIssue::ForeignComment { comment, .. }
            | ThreadIssue::StaleDepth { comment, .. } => comment,
        }
    }

    /// Whether the comment was promoted to a root because of this issue.
    pub fn is_promotion(&self) -> bool {
        matches!(
            self,
            ThreadIssue::OrphanParent { .. } | ThreadIssue::ForeignParent { .. }
        )
    }
}

/// All comment threads under one post.
///
/// Roots are ordered oldest first. The forest owns its nodes outright;
/// collapse state lives separately in [`ThreadView`](super::ThreadView).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Forest {
    /// Top-level threads
    roots: Vec<ThreadNode>,
    /// Conditions recovered from during assembly
    issues: Vec<ThreadIssue>,
    /// Total number of nodes across all threads
    len: usize,
    /// Post the threads belong to, when known
    post: Option<PostId>,
}

impl Forest {
    /// Create a forest from assembled roots.
    ///
    /// The forest is tied to a post when every node shares one `post_id`.
    pub fn new(roots: Vec<ThreadNode>, issues: Vec<ThreadIssue>) -> Self {
        let mut len = 0;
        let mut post = None;
        let mut uniform = true;
        for node in ThreadNodeIterator::new(roots.iter().rev().collect()) {
            len += 1;
            match post {
                None => post = Some(node.comment.post_id),
                Some(p) if p != node.comment.post_id => uniform = false,
                Some(_) => {}
            }
        }

        Self {
            roots,
            issues,
            len,
            post: post.filter(|_| uniform),
        }
    }

    /// Tie the forest to `post`, even while it is empty.
    pub(crate) fn for_post(mut self, post: PostId) -> Self {
        self.post = Some(post);
        self
    }

    /// The post every comment here belongs to.
    ///
    /// `None` for an empty forest not built for a specific post, or one
    /// mixing comments of several posts.
    pub fn post_id(&self) -> Option<PostId> {
        self.post
    }

    /// Get the top-level threads.
    pub fn roots(&self) -> &[ThreadNode] {
        &self.roots
    }

    /// Consume the forest, returning its top-level threads.
    pub fn into_roots(self) -> Vec<ThreadNode> {
        self.roots
    }

    /// Conditions recovered from during assembly.
    pub fn issues(&self) -> &[ThreadIssue] {
        &self.issues
    }

    /// Total number of comments in the forest.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the forest has no comments.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find a node by comment id.
    pub fn find(&self, id: CommentId) -> Option<&ThreadNode> {
        self.iter().find(|node| node.comment.id == id)
    }

    /// Check if a comment id is present.
    pub fn contains(&self, id: CommentId) -> bool {
        self.find(id).is_some()
    }

    /// Deepest resolved depth in the forest (0 if empty or flat).
    pub fn max_depth(&self) -> usize {
        self.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Iterate over every node in pre-order, thread by thread.
    pub fn iter(&self) -> ThreadNodeIterator<'_> {
        ThreadNodeIterator::new(self.roots.iter().rev().collect())
    }

    /// Iterate over the comments in pre-order.
    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.iter().map(|node| &node.comment)
    }

    /// Copy the comments back out in pre-order.
    ///
    /// Reassembling the result yields an equal forest.
    pub fn flatten(&self) -> Vec<Comment> {
        self.comments().cloned().collect()
    }

    pub(crate) fn roots_mut(&mut self) -> &mut Vec<ThreadNode> {
        &mut self.roots
    }

    pub(crate) fn record_insert(&mut self, post: PostId) {
        if self.len == 0 {
            self.post.get_or_insert(post);
        }
        self.len += 1;
    }
}

impl<'a> IntoIterator for &'a Forest {
    type Item = &'a ThreadNode;
    type IntoIter = ThreadNodeIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over thread nodes.
///
/// Uses an explicit stack, so arbitrarily deep threads cannot overflow.
pub struct ThreadNodeIterator<'a> {
    stack: Vec<&'a ThreadNode>,
}

impl<'a> ThreadNodeIterator<'a> {
    /// `stack` holds the starting nodes with the first one to visit last.
    fn new(stack: Vec<&'a ThreadNode>) -> Self {
        Self { stack }
    }
}

impl<'a> Iterator for ThreadNodeIterator<'a> {
    type Item = &'a ThreadNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push replies in reverse order so they're processed oldest first
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_comment(id: CommentId, parent_id: Option<CommentId>) -> Comment {
        Comment {
            id,
            post_id: 1,
            parent_id,
            author: "tester".to_string(),
            content: format!("comment {id}"),
            upvotes: 1,
            downvotes: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, id as u32).unwrap(),
            depth: 0,
        }
    }

    fn sample_tree() -> ThreadNode {
        ThreadNode {
            comment: make_comment(1, None),
            depth: 0,
            children: vec![
                ThreadNode::new(make_comment(2, Some(1)), 1),
                ThreadNode {
                    comment: make_comment(3, Some(1)),
                    depth: 1,
                    children: vec![ThreadNode::new(make_comment(4, Some(3)), 2)],
                },
            ],
        }
    }

    fn make_chain(len: usize, leaf: CommentId) -> ThreadNode {
        let mut node = ThreadNode::new(make_comment(leaf, Some(1)), len - 1);
        for depth in (0..len - 1).rev() {
            let mut parent = ThreadNode::new(make_comment(1, None), depth);
            parent.children.push(node);
            node = parent;
        }
        node
    }

    #[test]
    fn test_deep_chain_clone_compare_drop() {
        const DEPTH: usize = 100_000;
        let chain = make_chain(DEPTH, 2);

        let copy = chain.clone();
        assert_eq!(copy.count_nodes(), DEPTH);
        assert_eq!(copy.height(), DEPTH - 1);
        assert!(copy == chain);

        // Differs only at the far end
        let other = make_chain(DEPTH, 3);
        assert!(other != chain);

        drop(other);
        drop(copy);
        drop(chain);
    }

    #[test]
    fn test_clone_keeps_sibling_order() {
        let root = sample_tree();
        let copy = root.clone();
        let ids: Vec<CommentId> = copy.iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(copy, root);
    }

    #[test]
    fn test_thread_node_find() {
        let root = sample_tree();
        assert!(root.find(1).is_some());
        assert_eq!(root.find(4).unwrap().depth, 2);
        assert!(root.find(99).is_none());
    }

    #[test]
    fn test_thread_node_counts() {
        let root = sample_tree();
        assert_eq!(root.count_nodes(), 4);
        assert_eq!(root.reply_count(), 2);
        assert!(root.has_replies());
        assert_eq!(root.height(), 2);
        assert_eq!(root.children[1].height(), 1);
        assert_eq!(root.children[0].height(), 0);
    }

    #[test]
    fn test_thread_node_iter_is_preorder() {
        let root = sample_tree();
        let ids: Vec<CommentId> = root.iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_can_reply_respects_max_depth() {
        let root = sample_tree();
        let options = ThreadOptions { max_depth: 2 };
        assert!(root.can_reply(&options));
        assert!(root.children[1].can_reply(&options));
        assert!(!root.children[1].children[0].can_reply(&options));
    }

    #[test]
    fn test_forest_queries() {
        let forest = Forest::new(
            vec![sample_tree(), ThreadNode::new(make_comment(5, None), 0)],
            Vec::new(),
        );

        assert_eq!(forest.len(), 5);
        assert!(!forest.is_empty());
        assert_eq!(forest.max_depth(), 2);
        assert!(forest.contains(4));
        assert!(!forest.contains(6));

        let ids: Vec<CommentId> = forest.iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let flat: Vec<CommentId> = forest.flatten().iter().map(|c| c.id).collect();
        assert_eq!(flat, ids);
    }

    #[test]
    fn test_forest_empty() {
        let forest = Forest::default();
        assert!(forest.is_empty());
        assert_eq!(forest.max_depth(), 0);
        assert_eq!(forest.iter().count(), 0);
    }

    #[test]
    fn test_issue_helpers() {
        let orphan = ThreadIssue::OrphanParent {
            comment: 1,
            parent: 99,
        };
        let stale = ThreadIssue::StaleDepth {
            comment: 2,
            stored: 4,
            resolved: 1,
        };
        assert_eq!(orphan.comment_id(), 1);
        assert!(orphan.is_promotion());
        assert_eq!(stale.comment_id(), 2);
        assert!(!stale.is_promotion());
    }

    #[test]
    fn test_thread_node_serializes_nested() {
        let node = ThreadNode {
            comment: make_comment(1, None),
            depth: 0,
            children: vec![ThreadNode::new(make_comment(2, Some(1)), 1)],
        };
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["comment"]["id"], 1);
        assert_eq!(value["children"][0]["depth"], 1);
        assert_eq!(value["children"][0]["comment"]["parentId"], 1);
    }
}

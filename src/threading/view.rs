//! Per-comment expand/collapse state.
//!
//! Collapse state is owned by whoever renders the thread and is keyed by
//! comment id, never stored on [`ThreadNode`]s. Rebuilding the forest after
//! a reload therefore keeps every comment's state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::CommentId;

use super::types::{Forest, ThreadNode};

/// Display state of one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Body and replies shown
    #[default]
    Expanded,
    /// Only the header shown
    Collapsed,
}

impl NodeState {
    /// The state a toggle moves to.
    pub fn toggled(self) -> Self {
        match self {
            NodeState::Expanded => NodeState::Collapsed,
            NodeState::Collapsed => NodeState::Expanded,
        }
    }
}

/// Collapse flags for one rendered thread.
///
/// Every comment starts expanded. States only change through
/// [`toggle`](Self::toggle), [`collapse`](Self::collapse) and
/// [`expand`](Self::expand).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadView {
    /// Absence means expanded
    collapsed: HashSet<CommentId>,
}

impl ThreadView {
    /// Create a view with everything expanded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a comment.
    pub fn state(&self, id: CommentId) -> NodeState {
        if self.collapsed.contains(&id) {
            NodeState::Collapsed
        } else {
            NodeState::Expanded
        }
    }

    /// Check if a comment is collapsed.
    pub fn is_collapsed(&self, id: CommentId) -> bool {
        self.state(id) == NodeState::Collapsed
    }

    /// Flip a comment's state, returning the new one.
    pub fn toggle(&mut self, id: CommentId) -> NodeState {
        let next = self.state(id).toggled();
        self.set(id, next);
        next
    }

    /// Collapse a comment.
    pub fn collapse(&mut self, id: CommentId) {
        self.set(id, NodeState::Collapsed);
    }

    /// Expand a comment.
    pub fn expand(&mut self, id: CommentId) {
        self.set(id, NodeState::Expanded);
    }

    /// Expand everything.
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Number of collapsed comments.
    pub fn collapsed_count(&self) -> usize {
        self.collapsed.len()
    }

    /// Forget flags for comments no longer in `forest`.
    pub fn prune(&mut self, forest: &Forest) {
        let present: HashSet<CommentId> = forest.iter().map(ThreadNode::id).collect();
        self.collapsed.retain(|id| present.contains(id));
    }

    /// Nodes to render, in pre-order.
    ///
    /// A collapsed node is still yielded (its header stays visible) but its
    /// replies are skipped.
    pub fn visible<'a>(&'a self, forest: &'a Forest) -> VisibleNodes<'a> {
        VisibleNodes {
            view: self,
            stack: forest.roots().iter().rev().collect(),
        }
    }

    fn set(&mut self, id: CommentId, state: NodeState) {
        match state {
            NodeState::Collapsed => {
                self.collapsed.insert(id);
            }
            NodeState::Expanded => {
                self.collapsed.remove(&id);
            }
        }
    }
}

/// Iterator over the nodes a [`ThreadView`] leaves visible.
pub struct VisibleNodes<'a> {
    view: &'a ThreadView,
    stack: Vec<&'a ThreadNode>,
}

impl<'a> Iterator for VisibleNodes<'a> {
    type Item = &'a ThreadNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if !self.view.is_collapsed(node.comment.id) {
            for child in node.children.iter().rev() {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}

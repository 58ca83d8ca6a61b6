//! Thread building algorithm.
//!
//! This module turns the flat comment list a store returns into a forest of
//! [`ThreadNode`]s. All comments are placed in an index-addressed arena up
//! front and linked through an adjacency list keyed by parent index; the
//! nested nodes are only materialized at the end, bottom-up.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{Comment, CommentId, PostId};

use super::types::{Forest, ThreadIssue, ThreadNode};

/// Build a forest from a flat list of comments.
///
/// Steps:
/// 1. Places every comment in an arena and indexes it by id
/// 2. Links each comment to its parent; orphans and cross-post replies are
///    promoted to roots and recorded as issues
/// 3. Orders roots and each reply list by ascending `created_at`
/// 4. Walks from the roots with an explicit worklist, assigning depth
/// 5. Reports any comment the walk never reached as part of a cycle
/// 6. Materializes nested nodes deepest first
///
/// # Errors
///
/// - [`Error::DuplicateComment`] if two comments share an id
/// - [`Error::CycleDetected`] if a `parent_id` chain loops
pub fn build_forest(comments: Vec<Comment>) -> Result<Forest> {
    assemble(comments, None)
}

/// Build the forest for one post.
///
/// Comments belonging to other posts are left out and recorded as
/// [`ThreadIssue::ForeignComment`]; replies pointing at them are promoted to
/// roots as [`ThreadIssue::ForeignParent`].
pub fn build_forest_for_post(post_id: PostId, comments: Vec<Comment>) -> Result<Forest> {
    assemble(comments, Some(post_id))
}

fn assemble(comments: Vec<Comment>, post: Option<PostId>) -> Result<Forest> {
    let mut issues = Vec::new();

    // Step 1: Arena of comments for this thread, plus ids excluded as foreign
    let mut arena: Vec<Comment> = Vec::with_capacity(comments.len());
    let mut foreign: HashMap<CommentId, PostId> = HashMap::new();
    for comment in comments {
        match post {
            Some(post_id) if comment.post_id != post_id => {
                issues.push(ThreadIssue::ForeignComment {
                    comment: comment.id,
                    post: comment.post_id,
                });
                foreign.insert(comment.id, comment.post_id);
            }
            _ => arena.push(comment),
        }
    }

    let count = arena.len();
    if count == 0 {
        return Ok(tie_to_post(Forest::new(Vec::new(), issues), post));
    }

    let mut index: HashMap<CommentId, usize> = HashMap::with_capacity(count);
    for (i, comment) in arena.iter().enumerate() {
        if index.insert(comment.id, i).is_some() {
            return Err(Error::DuplicateComment(comment.id));
        }
    }

    // Step 2: Parent links and adjacency
    let mut parent_of: Vec<Option<usize>> = vec![None; count];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut promoted: Vec<bool> = vec![false; count];
    let mut roots: Vec<usize> = Vec::new();

    for (i, comment) in arena.iter().enumerate() {
        let Some(parent_id) = comment.parent_id else {
            roots.push(i);
            continue;
        };

        let issue = match index.get(&parent_id) {
            Some(&p) if arena[p].post_id == comment.post_id => {
                parent_of[i] = Some(p);
                children[p].push(i);
                continue;
            }
            Some(&p) => ThreadIssue::ForeignParent {
                comment: comment.id,
                parent: parent_id,
                parent_post: arena[p].post_id,
            },
            None => match foreign.get(&parent_id) {
                Some(&parent_post) => ThreadIssue::ForeignParent {
                    comment: comment.id,
                    parent: parent_id,
                    parent_post,
                },
                None => ThreadIssue::OrphanParent {
                    comment: comment.id,
                    parent: parent_id,
                },
            },
        };
        issues.push(issue);
        promoted[i] = true;
        roots.push(i);
    }

    // Step 3: Oldest first; stable sort keeps store order for ties
    roots.sort_by_key(|&i| arena[i].created_at);
    for replies in &mut children {
        replies.sort_by_key(|&i| arena[i].created_at);
    }

    // Step 4: Worklist walk from the roots
    let mut depth: Vec<Option<usize>> = vec![None; count];
    let mut preorder: Vec<usize> = Vec::with_capacity(count);
    let mut stack: Vec<usize> = Vec::with_capacity(count);
    for &root in roots.iter().rev() {
        depth[root] = Some(0);
        stack.push(root);
    }

    while let Some(i) = stack.pop() {
        preorder.push(i);
        let child_depth = depth[i].unwrap_or(0) + 1;
        for &child in children[i].iter().rev() {
            if depth[child].is_some() {
                continue;
            }
            depth[child] = Some(child_depth);
            stack.push(child);
        }
    }

    // Step 5: Anything unreached hangs off a parent cycle
    if preorder.len() < count {
        if let Some(start) = depth.iter().position(Option::is_none) {
            let cycle = find_cycle(start, &parent_of)
                .into_iter()
                .map(|i| arena[i].id)
                .collect();
            return Err(Error::CycleDetected { cycle });
        }
    }

    for &i in &preorder {
        let resolved = depth[i].unwrap_or(0);
        if !promoted[i] && arena[i].depth != resolved {
            issues.push(ThreadIssue::StaleDepth {
                comment: arena[i].id,
                stored: arena[i].depth,
                resolved,
            });
        }
    }

    // Step 6: Materialize bottom-up; reverse pre-order sees children first
    let mut slots: Vec<Option<Comment>> = arena.into_iter().map(Some).collect();
    let mut built: Vec<Option<ThreadNode>> = vec![None; count];

    for &i in preorder.iter().rev() {
        let Some(comment) = slots[i].take() else {
            continue;
        };
        let replies = children[i]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[i] = Some(ThreadNode {
            comment,
            depth: depth[i].unwrap_or(0),
            children: replies,
        });
    }

    let roots = roots.iter().filter_map(|&root| built[root].take()).collect();
    Ok(tie_to_post(Forest::new(roots, issues), post))
}

fn tie_to_post(forest: Forest, post: Option<PostId>) -> Forest {
    match post {
        Some(post_id) => forest.for_post(post_id),
        None => forest,
    }
}

/// Follow parent links from `start` until an index repeats, returning the
/// indices on the loop in parent-chain order.
///
/// Only called on nodes the root walk never reached, whose every ancestor
/// is likewise unreached, so the chain cannot end.
fn find_cycle(start: usize, parent_of: &[Option<usize>]) -> Vec<usize> {
    let mut seen: HashMap<usize, usize> = HashMap::new();
    let mut path: Vec<usize> = Vec::new();
    let mut current = Some(start);

    while let Some(i) = current {
        if let Some(&position) = seen.get(&i) {
            return path.split_off(position);
        }
        seen.insert(i, path.len());
        path.push(i);
        current = parent_of[i];
    }

    path
}

//! Board facade tying a store to ranking and threading.

use tracing::{debug, warn};

use crate::config::BoardConfig;
use crate::error::{Error, Result};
use crate::model::{Comment, CommentId, Community, Post, PostId, Vote};
use crate::ranking::{rank_owned, SortType};
use crate::store::{Clock, PostFilter, StoreReader, StoreWriter};
use crate::threading::{build_forest_for_post, CommentDraft, Forest};

/// Feeds, threads and replies over one store.
///
/// # Example
///
/// ```
/// use threadloop::board::Board;
/// use threadloop::config::BoardConfig;
/// use threadloop::memory::MemoryStore;
/// use threadloop::store::{PostFilter, SystemClock};
///
/// # #[tokio::main]
/// # async fn main() -> threadloop::Result<()> {
/// let board = Board::new(MemoryStore::new(), SystemClock, BoardConfig::default());
/// let feed = board.feed_for(Some("top"), &PostFilter::all()).await?;
/// assert!(feed.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Board<S, C> {
    store: S,
    clock: C,
    config: BoardConfig,
}

impl<S, C> Board<S, C>
where
    S: StoreReader + StoreWriter,
    C: Clock,
{
    /// Create a board over `store`.
    pub fn new(store: S, clock: C, config: BoardConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Get the board configuration.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Posts passing `filter`, ordered by `sort` at the current instant.
    pub async fn feed(&self, sort: SortType, filter: &PostFilter) -> Result<Vec<Post>> {
        let posts = self.store.fetch_posts(filter).await?;
        debug!(count = posts.len(), sort = %sort, "Fetched posts for feed");
        Ok(rank_owned(posts, sort, self.clock.now()))
    }

    /// Like [`feed`](Self::feed), taking the sort as a raw request parameter.
    ///
    /// An absent parameter uses the configured default; an unknown one
    /// falls back to `new`.
    pub async fn feed_for(&self, sort: Option<&str>, filter: &PostFilter) -> Result<Vec<Post>> {
        self.feed(self.config.resolve_sort(sort), filter).await
    }

    /// Posts whose title or body contains `query`, newest first.
    pub async fn search(&self, query: &str) -> Result<Vec<Post>> {
        let posts = self.store.fetch_posts(&PostFilter::search(query)).await?;
        debug!(count = posts.len(), query, "Search matched posts");
        Ok(rank_owned(posts, SortType::New, self.clock.now()))
    }

    /// One post by id.
    pub async fn post(&self, id: PostId) -> Result<Post> {
        self.store.fetch_post(id).await
    }

    /// All communities, most members first.
    pub async fn communities(&self) -> Result<Vec<Community>> {
        self.store.fetch_communities().await
    }

    /// The `limit` largest communities.
    pub async fn popular_communities(&self, limit: usize) -> Result<Vec<Community>> {
        let mut communities = self.store.fetch_communities().await?;
        communities.sort_by(|a, b| b.member_count.cmp(&a.member_count));
        communities.truncate(limit);
        Ok(communities)
    }

    /// Assemble the comment forest of a post.
    ///
    /// Recovered issues are logged and kept on the forest; a cycle is
    /// logged and returned as an error.
    pub async fn thread(&self, post_id: PostId) -> Result<Forest> {
        let comments = self.store.fetch_comments(post_id).await?;
        debug!(post_id, count = comments.len(), "Fetched comments for thread");

        let forest = build_forest_for_post(post_id, comments).map_err(|e| {
            if let Error::CycleDetected { cycle } = &e {
                warn!(post_id, ?cycle, "Comment parent chain forms a cycle");
            }
            e
        })?;

        for issue in forest.issues() {
            warn!(post_id, comment_id = issue.comment_id(), ?issue, "Recovered malformed comment");
        }

        Ok(forest)
    }

    /// Persist a new comment and append it to `forest`.
    ///
    /// The draft must be for the post `forest` was built for. For a reply,
    /// the parent must also be in `forest`, belong to the draft's post and
    /// accept replies under the configured depth limit. Nothing is written
    /// when any of these checks fails.
    ///
    /// Once the store has accepted the comment it is returned even if it
    /// can't be appended to `forest` (say, the store handed out an id the
    /// forest already shows). That case is logged and the caller should
    /// reload the thread.
    pub async fn reply(&self, forest: &mut Forest, draft: CommentDraft) -> Result<Comment> {
        forest.check_post(draft.post_id)?;
        if let Some(parent) = draft.parent_id {
            let target = forest.reply_target(parent, &self.config.thread)?;
            if target.comment.post_id != draft.post_id {
                return Err(Error::ParentNotFound(parent));
            }
        }

        let comment = self.store.create_comment(draft).await?;
        debug!(comment_id = comment.id, post_id = comment.post_id, "Created comment");

        if let Err(e) = forest.insert_reply(comment.clone(), &self.config.thread) {
            warn!(
                comment_id = comment.id,
                post_id = comment.post_id,
                error = %e,
                "Stored comment could not be added to the open thread"
            );
        }
        Ok(comment)
    }

    /// Vote on a post.
    pub async fn vote_post(&self, id: PostId, vote: Vote) -> Result<Post> {
        self.store.vote_post(id, vote).await
    }

    /// Vote on a comment.
    pub async fn vote_comment(&self, id: CommentId, vote: Vote) -> Result<Comment> {
        self.store.vote_comment(id, vote).await
    }
}

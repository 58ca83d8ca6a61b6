//! Feed ranking.
//!
//! Orders any collection of [`Scored`](crate::model::Scored) items (posts or
//! comments) by one of three [`SortType`]s:
//!
//! - **hot**: vote differential divided by age in hours plus one
//! - **new**: newest first
//! - **top**: highest vote differential first
//!
//! Ranking is a pure function of the snapshot and an injected `now`, so the
//! same input always yields the same order.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use threadloop::model::Post;
//! use threadloop::ranking::{rank, SortType};
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
//! let post = |id, upvotes, hours_ago| Post {
//!     id,
//!     community_id: 1,
//!     title: format!("post {id}"),
//!     content: String::new(),
//!     image_url: None,
//!     author: "alice".to_string(),
//!     upvotes,
//!     downvotes: 0,
//!     comment_count: 0,
//!     created_at: now - Duration::hours(hours_ago),
//!     updated_at: None,
//! };
//!
//! let posts = vec![post(1, 5, 10), post(2, 10, 1)];
//! let ranked = rank(&posts, SortType::Hot, now);
//! assert_eq!(ranked[0].id, 2);
//! ```

mod algorithm;
mod sort;

pub use algorithm::{hot_score, hours_since, rank, rank_owned};
pub use sort::SortType;

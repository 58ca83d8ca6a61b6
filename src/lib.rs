//! # threadloop
//!
//! Feed ranking and threaded comment assembly for community discussion
//! boards.
//!
//! ## Design Philosophy
//!
//! The core is pure and synchronous:
//! - **Ranking**: Orders posts or comments by `hot`, `new` or `top` against an
//!   explicit instant
//! - **Threading**: Turns a flat, possibly malformed comment list into a
//!   forest of reply trees, recovering from orphans and rejecting cycles
//!
//! Storage sits behind the async ports in [`store`]; [`board::Board`] wires a
//! store to the core and is the only place that logs.
//!
//! ## Examples
//!
//! ### Ranking
//!
//! ```rust
//! use threadloop::ranking::SortType;
//!
//! assert_eq!(SortType::from_query(None), SortType::Hot);
//! assert_eq!(SortType::from_query(Some("sideways")), SortType::New);
//! ```
//!
//! ### With a Store
//!
//! ```rust
//! use threadloop::board::Board;
//! use threadloop::config::BoardConfig;
//! use threadloop::memory::MemoryStore;
//! use threadloop::store::SystemClock;
//! use threadloop::threading::CommentDraft;
//!
//! # #[tokio::main]
//! # async fn main() -> threadloop::Result<()> {
//! let board = Board::new(MemoryStore::new(), SystemClock, BoardConfig::default());
//! let mut forest = board.thread(1).await?;
//!
//! let draft = CommentDraft::builder()
//!     .post(1)
//!     .author("alice")
//!     .content("First!")
//!     .build()?;
//! let comment = board.reply(&mut forest, draft).await?;
//!
//! assert_eq!(forest.roots()[0].id(), comment.id);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod board;
pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod ranking;
pub mod store;
pub mod threading;

pub use error::{Error, Result};

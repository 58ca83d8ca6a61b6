//! Options controlling feed and thread behavior.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ranking::SortType;

/// Options for threaded comment views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThreadOptions {
    /// Deepest node that still offers a reply action.
    ///
    /// A node at `depth` accepts replies while `depth < max_depth`. Nodes
    /// deeper than this (e.g., from older data) are still displayed.
    pub max_depth: usize,
}

impl Default for ThreadOptions {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

impl ThreadOptions {
    /// Allow replies at any depth.
    pub fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    /// Only top-level comments; nothing accepts replies.
    pub fn flat() -> Self {
        Self { max_depth: 0 }
    }

    /// Whether a node at `depth` accepts replies.
    pub fn can_reply(&self, depth: usize) -> bool {
        depth < self.max_depth
    }
}

/// Top-level configuration for a [`Board`](crate::board::Board).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Sort used when a request names none
    pub default_sort: SortType,
    /// Reply depth policy
    pub thread: ThreadOptions,
}

impl BoardConfig {
    /// Parse a configuration from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Resolve the sort for a request, applying `default_sort` when the
    /// request names none and falling back to `new` for unknown keys.
    pub fn resolve_sort(&self, param: Option<&str>) -> SortType {
        param.map(SortType::parse_lossy).unwrap_or(self.default_sort)
    }
}

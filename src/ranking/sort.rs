//! Sort keys accepted by the feed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How a feed is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    /// Time-decayed vote score
    #[default]
    Hot,
    /// Newest first
    New,
    /// Highest vote differential first
    Top,
}

impl SortType {
    /// All sort types, in the order a sort selector lists them.
    pub const ALL: [SortType; 3] = [SortType::Hot, SortType::New, SortType::Top];

    /// The lowercase key used in URLs and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            SortType::Hot => "hot",
            SortType::New => "new",
            SortType::Top => "top",
        }
    }

    /// Parse a sort key, falling back to [`SortType::New`] for anything
    /// unrecognized.
    pub fn parse_lossy(key: &str) -> Self {
        key.parse().unwrap_or(SortType::New)
    }

    /// Resolve the sort from an optional query parameter.
    ///
    /// An absent parameter selects the default `hot` view; a present but
    /// unknown value falls back to `new` like [`parse_lossy`](Self::parse_lossy).
    pub fn from_query(param: Option<&str>) -> Self {
        param.map(Self::parse_lossy).unwrap_or_default()
    }
}

impl FromStr for SortType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(SortType::Hot),
            "new" => Ok(SortType::New),
            "top" => Ok(SortType::Top),
            _ => Err(Error::InvalidSortType(s.to_string())),
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Query configuration for the catalog engine.
//!
//! Filter state lives in the frontend; every call passes the full
//! configuration explicitly so the engine holds no ambient state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Latest,
    Popular,
    Stars,
    Views,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Latest
    }
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Latest => "latest",
            SortKey::Popular => "popular",
            SortKey::Stars => "stars",
            SortKey::Views => "views",
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    // Strict: an unrecognized key is an error, not a fallback to Latest.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "latest" => Ok(SortKey::Latest),
            "popular" => Ok(SortKey::Popular),
            "stars" => Ok(SortKey::Stars),
            "views" => Ok(SortKey::Views),
            other => Err(Error::InvalidArgument(format!(
                "unknown sort key '{other}'"
            ))),
        }
    }
}

/// One catalog query. Empty/unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogQuery {
    /// Case-insensitive substring match against title, description, and
    /// each tag.
    pub search: String,
    /// A project qualifies only if it carries every one of these tags.
    pub tags: Vec<String>,
    /// Exact match against any replay step's model name.
    pub model: Option<String>,
    pub sort: SortKey,
}

impl CatalogQuery {
    pub fn sorted_by(sort: SortKey) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }
}

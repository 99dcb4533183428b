use crate::de::null_as_default;
use serde::{Deserialize, Serialize};

/// A movie as it appears in catalog listings and search results.
///
/// Field names on the wire follow the catalog API (`_id`, `origin_name`,
/// `thumb_url`, ...). The same encoding is used for the persisted watchlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MovieSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "origin_name", default, deserialize_with = "null_as_default")]
    pub original_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(rename = "thumb_url", default, deserialize_with = "null_as_default")]
    pub thumbnail_url: String,
    #[serde(rename = "poster_url", default, deserialize_with = "null_as_default")]
    pub poster_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: u32,
}

/// Watchlist entries are movie summaries stored verbatim.
pub type WatchlistEntry = MovieSummary;

impl MovieSummary {
    /// Minimal summary with only identity and title, mostly handy in tests.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

use crate::de::null_as_default;
use crate::movie::MovieSummary;
use serde::{Deserialize, Serialize};

/// A named catalog taxonomy entry (category or country).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Taxon {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Episode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link_embed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link_m3u8: String,
}

/// Episodes hosted on one streaming server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EpisodeServer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_data: Vec<Episode>,
}

/// Full detail record returned by the catalog's detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// HTML synopsis.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Runtime as free text, e.g. "120 phút".
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_current: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lang: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actor: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub director: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Vec<Taxon>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: Vec<Taxon>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<EpisodeServer>,
}

impl MovieDetail {
    pub fn summary(&self) -> MovieSummary {
        self.summary.clone()
    }

    pub fn id(&self) -> &str {
        &self.summary.id
    }

    /// Episodes of the first server, which is what gets played by default.
    pub fn primary_episodes(&self) -> &[Episode] {
        self.episodes
            .first()
            .map(|server| server.server_data.as_slice())
            .unwrap_or(&[])
    }

    /// Slug of the first category, used to look up similar movies.
    pub fn primary_category(&self) -> Option<&str> {
        self.category
            .first()
            .map(|c| c.slug.as_str())
            .filter(|slug| !slug.is_empty())
    }
}

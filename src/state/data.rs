//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the OMDb client, the state layer and the UI layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// OMDb uses this literal for every missing field, posters included
pub const NOT_AVAILABLE: &str = "N/A";

/// A single search hit as returned by `?s=`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    /// IMDb identifier (e.g. "tt0372784")
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    /// Poster URL, or "N/A"
    #[serde(rename = "Poster", default)]
    pub poster: String,
    /// "movie", "series", "episode" or "game"
    #[serde(rename = "Type", default)]
    pub media_type: String,
    /// Release year; series carry a range like "2005–2013"
    #[serde(rename = "Year", default)]
    pub year: String,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "Search", default)]
    pub results: Vec<MovieSummary>,
    /// Total hits across all pages; OMDb sends it as a string
    #[serde(rename = "totalResults", deserialize_with = "count_from_string", default)]
    pub total_results: i64,
}

/// A single rating entry (IMDb, Rotten Tomatoes, Metacritic...)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full record as returned by `?i=`
///
/// Only the identifier, title and poster are fixed. Every other field
/// (Plot, Actors, Runtime, imdbRating...) lands in `attributes` so new
/// upstream fields show up without a code change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetail {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<Rating>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl MovieSummary {
    /// Poster URL if the movie has one
    pub fn poster_url(&self) -> Option<&str> {
        poster_url(&self.poster)
    }
}

impl MovieDetail {
    /// Poster URL if the movie has one
    pub fn poster_url(&self) -> Option<&str> {
        poster_url(&self.poster)
    }

    /// Look up a free-form attribute as display text
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|value| value.as_str())
            .filter(|value| *value != NOT_AVAILABLE)
    }

    /// All displayable attributes in name order, skipping "N/A" values
    /// and non-text entries
    pub fn display_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().filter_map(|(name, value)| {
            let value = value.as_str()?;
            (value != NOT_AVAILABLE && !value.is_empty()).then_some((name.as_str(), value))
        })
    }
}

fn poster_url(poster: &str) -> Option<&str> {
    let poster = poster.trim();
    (!poster.is_empty() && poster != NOT_AVAILABLE).then_some(poster)
}

/// `totalResults` is a string in practice; accept numbers too.
/// Anything unparsable counts as zero hits.
fn count_from_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

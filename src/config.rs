//! Runtime configuration.
//!
//! Read once at startup from the environment (a `.env` file in the working
//! directory is loaded first).
//!
//! | Variable                       | Required | Default                    |
//! |--------------------------------|----------|----------------------------|
//! | `OMDB_API_KEY`                 | yes      | --                         |
//! | `OMDB_BASE_URL`                | no       | `https://www.omdbapi.com/` |
//! | `MOVIE_FINDER_DEBOUNCE_MS`     | no       | `1000`                     |
//! | `MOVIE_FINDER_DETAIL_TTL_SECS` | no       | `300`                      |
//! | `MOVIE_FINDER_DATA_DIR`        | no       | OS data dir + `movie-finder` |

use std::path::PathBuf;
use std::time::Duration;

use crate::state::debounce::DEFAULT_WINDOW;
use crate::state::detail::DEFAULT_TTL;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

const DB_FILE_NAME: &str = "movie_finder.db";
const APP_DIR_NAME: &str = "movie-finder";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OMDB_API_KEY is not set (get one at https://www.omdbapi.com/apikey.aspx)")]
    MissingApiKey,

    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("could not determine a data directory; set MOVIE_FINDER_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    /// Quiet window before typed text becomes a search
    pub debounce: Duration,
    /// Lifetime of cached movie lookups
    pub detail_ttl: Duration,
    /// Directory holding the favourites database
    pub data_dir: PathBuf,
}

impl Config {
    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = var("OMDB_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let base_url = var("OMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let debounce = match var("MOVIE_FINDER_DEBOUNCE_MS") {
            Some(value) => Duration::from_millis(parse_number("MOVIE_FINDER_DEBOUNCE_MS", value)?),
            None => DEFAULT_WINDOW,
        };

        let detail_ttl = match var("MOVIE_FINDER_DETAIL_TTL_SECS") {
            Some(value) => Duration::from_secs(parse_number("MOVIE_FINDER_DETAIL_TTL_SECS", value)?),
            None => DEFAULT_TTL,
        };

        let data_dir = match var("MOVIE_FINDER_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url,
            debounce,
            detail_ttl,
            data_dir,
        })
    }

    /// Where the favourites database lives
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

/// ~/.local/share/movie-finder on Linux, falling back to the home directory
fn default_data_dir() -> Option<PathBuf> {
    let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
    path.push(APP_DIR_NAME);
    Some(path)
}

fn parse_number(name: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}

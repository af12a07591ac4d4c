//! In-app addresses.
//!
//! The active route, query and page live in a location string shaped like
//! a URL (`?query=batman&page=2&more`, `/movie/tt0372784`, `/favourites`).
//! Everything the search view shows is derived from it, so the same string
//! restores the same screen and back/forward work for free.

use std::fmt;

/// Query/page part of the search address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Free text; empty means no active search
    pub query: String,
    /// 1-based page number
    pub page: u32,
    /// Set by "load more": append this page instead of replacing the list
    pub more: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            more: false,
        }
    }
}

impl SearchParams {
    /// Fresh search for `query`, starting at page 1
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Jump straight to `page` (replaces the rendered list)
    pub fn jump_to(&self, page: u32) -> Self {
        Self {
            query: self.query.clone(),
            page: page.max(1),
            more: false,
        }
    }

    /// Next page, appended to what is already shown
    pub fn load_more(&self) -> Self {
        Self {
            query: self.query.clone(),
            page: self.page + 1,
            more: true,
        }
    }
}

/// Every screen the app can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search(SearchParams),
    Detail(String),
    Favourites,
}

impl Default for Route {
    fn default() -> Self {
        Route::Search(SearchParams::default())
    }
}

impl Route {
    /// Parse an address. Unknown paths fall back to the empty search view.
    pub fn parse(address: &str) -> Self {
        let address = address.trim();
        let (path, query_string) = address.split_once('?').unwrap_or((address, ""));
        let path = path.trim_matches('/');

        if path == "favourites" {
            return Route::Favourites;
        }

        if let Some(id) = path.strip_prefix("movie/") {
            let id = decode(id);
            if !id.is_empty() && !id.contains('/') {
                return Route::Detail(id);
            }
        }

        if !path.is_empty() {
            tracing::debug!(address, "Unknown address, showing search");
        }

        Route::Search(parse_search_params(query_string))
    }
}

fn parse_search_params(query_string: &str) -> SearchParams {
    let mut params = SearchParams::default();

    for pair in query_string.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "query" => params.query = decode(value),
            "page" => {
                params.page = value.parse().ok().filter(|page| *page >= 1).unwrap_or(1);
            }
            // Presence-only flag
            "more" => params.more = true,
            _ => {}
        }
    }

    params
}

/// Form-style decoding: '+' is a space, invalid escapes are kept as-is
fn decode(value: &str) -> String {
    let value = value.replace('+', " ");
    match urlencoding::decode(&value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value,
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Favourites => write!(f, "/favourites"),
            Route::Detail(id) => write!(f, "/movie/{}", urlencoding::encode(id)),
            Route::Search(params) => {
                if params.query.is_empty() {
                    return write!(f, "/");
                }
                write!(f, "?query={}", urlencoding::encode(&params.query))?;
                if params.page != 1 {
                    write!(f, "&page={}", params.page)?;
                }
                if params.more {
                    write!(f, "&more")?;
                }
                Ok(())
            }
        }
    }
}

//! Paginated search state.
//!
//! Keeps every page fetched for the active query in a page-indexed cache,
//! tracks the total hit count and decides which request (if any) an
//! address change needs. Responses are matched to requests by generation
//! so a slow reply for an old query can never leak into the current one.

use std::collections::BTreeMap;

use super::address::SearchParams;
use super::data::{MovieSummary, SearchPage};
use crate::omdb::Failure;

/// OMDb always returns ten hits per page
pub const PAGE_SIZE: u32 = 10;

/// Total count before the first response for a query
pub const UNKNOWN_TOTAL: i64 = -1;

/// A fetch the caller should run and report back with [`SearchEngine::apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
    pub page: u32,
}

/// Last failure for the active query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Network or HTTP trouble; cached pages stay on screen
    Fetch,
    /// OMDb's own message ("Movie not found!", "Too many results.")
    Api(String),
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    query: String,
    page: u32,
    /// page number -> results for that page, for `query` only
    pages: BTreeMap<u32, Vec<MovieSummary>>,
    total: i64,
    /// Last generation handed out
    generation: u64,
    /// Generation of the request still outstanding
    in_flight: Option<u64>,
    error: Option<SearchError>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            page: 1,
            pages: BTreeMap::new(),
            total: UNKNOWN_TOTAL,
            generation: 0,
            in_flight: None,
            error: None,
        }
    }

    /// React to a new search address.
    ///
    /// - new query: drop the cache and forget the total
    /// - new page without `more`: drop the cache (jump navigation)
    /// - new page with `more`: keep earlier pages and append
    /// - same query and page after a transport failure: retry that page
    ///
    /// Returns the request to run, or `None` when nothing needs fetching
    /// (same query and page, empty query, or page already cached).
    pub fn navigate(&mut self, params: &SearchParams) -> Option<SearchRequest> {
        let query_changed = params.query != self.query;
        let page_changed = params.page != self.page;

        if !query_changed && !page_changed && !self.needs_retry() {
            return None;
        }

        if query_changed {
            self.pages.clear();
            self.total = UNKNOWN_TOTAL;
        } else if page_changed && !params.more {
            self.pages.clear();
        }

        self.query = params.query.clone();
        self.page = params.page.max(1);
        self.error = None;
        // Whatever was outstanding belongs to the previous address now
        self.in_flight = None;

        if self.query.is_empty() || self.pages.contains_key(&self.page) {
            return None;
        }

        self.generation += 1;
        self.in_flight = Some(self.generation);

        tracing::debug!(
            query = %self.query,
            page = self.page,
            generation = self.generation,
            "Search request issued"
        );

        Some(SearchRequest {
            generation: self.generation,
            query: self.query.clone(),
            page: self.page,
        })
    }

    /// Merge the outcome of a request issued by [`navigate`](Self::navigate).
    ///
    /// Returns false when the response is stale and was dropped.
    pub fn apply(&mut self, generation: u64, result: Result<SearchPage, Failure>) -> bool {
        if self.in_flight != Some(generation) {
            tracing::debug!(generation, current = self.generation, "Dropping stale search response");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(found) => {
                self.total = found.total_results;
                self.pages.insert(self.page, found.results);
                self.error = None;
            }
            Err(Failure::Api(message)) => {
                // In-band failure: the result set is gone
                self.pages.clear();
                self.total = UNKNOWN_TOTAL;
                self.error = Some(SearchError::Api(message));
            }
            Err(Failure::Transport(reason)) => {
                // Keep whatever is already rendered
                tracing::warn!(query = %self.query, page = self.page, %reason, "⚠️  Search fetch failed");
                self.error = Some(SearchError::Fetch);
            }
        }

        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn total_results(&self) -> i64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    /// The current page failed to load over the network and nothing is
    /// outstanding for it
    pub fn needs_retry(&self) -> bool {
        self.error == Some(SearchError::Fetch)
            && self.in_flight.is_none()
            && !self.pages.contains_key(&self.page)
    }

    /// Text for the current error, if any
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|error| match error {
            SearchError::Fetch => crate::omdb::error::GENERIC_FETCH_ERROR,
            SearchError::Api(message) => message.as_str(),
        })
    }

    pub fn show_results(&self) -> bool {
        !self.query.is_empty() && self.total > 0
    }

    pub fn show_load_more(&self) -> bool {
        self.total > i64::from(self.page) * i64::from(PAGE_SIZE) && !self.is_loading()
    }

    pub fn show_no_results(&self) -> bool {
        !self.is_loading() && !self.query.is_empty() && self.total <= 0
    }

    /// Number of pages OMDb has for this query
    pub fn page_count(&self) -> u32 {
        if self.total <= 0 {
            return 0;
        }
        let pages = (self.total + i64::from(PAGE_SIZE) - 1) / i64::from(PAGE_SIZE);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Cached results for pages `1..=current_page`, page by page in API order
    pub fn visible_movies(&self) -> impl Iterator<Item = &MovieSummary> + '_ {
        self.pages
            .range(1..=self.page)
            .flat_map(|(_, movies)| movies.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str) -> MovieSummary {
        MovieSummary {
            imdb_id: id.into(),
            title: format!("Movie {id}"),
            poster: "N/A".into(),
            media_type: "movie".into(),
            year: "2000".into(),
        }
    }

    fn page(prefix: &str, total: i64) -> SearchPage {
        SearchPage {
            results: (0..10).map(|i| movie(&format!("{prefix}{i}"))).collect(),
            total_results: total,
        }
    }

    fn params(query: &str, page: u32, more: bool) -> SearchParams {
        SearchParams {
            query: query.into(),
            page,
            more,
        }
    }

    fn ids(engine: &SearchEngine) -> Vec<String> {
        engine.visible_movies().map(|m| m.imdb_id.clone()).collect()
    }

    #[test]
    fn test_batman_load_more_scenario() {
        let mut engine = SearchEngine::new();

        let first = engine.navigate(&params("batman", 1, false)).unwrap();
        assert_eq!((first.query.as_str(), first.page), ("batman", 1));
        assert!(engine.is_loading());
        assert!(engine.apply(first.generation, Ok(page("p1-", 573))));
        assert_eq!(engine.total_results(), 573);
        assert!(engine.show_results());
        assert!(engine.show_load_more());

        let second = engine.navigate(&params("batman", 2, true)).unwrap();
        assert_eq!(second.page, 2);
        assert!(!engine.show_load_more());
        engine.apply(second.generation, Ok(page("p2-", 573)));

        assert_eq!(engine.pages.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        let shown = ids(&engine);
        assert_eq!(shown.len(), 20);
        assert_eq!(shown[0], "p1-0");
        assert_eq!(shown[10], "p2-0");
        assert_eq!(shown[19], "p2-9");
    }

    #[test]
    fn test_query_change_resets_cache_and_total() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("batman", 1, false)).unwrap();
        engine.apply(req.generation, Ok(page("b", 573)));
        let req = engine.navigate(&params("batman", 2, true)).unwrap();
        engine.apply(req.generation, Ok(page("c", 573)));

        // Even with `more` set, a different query starts from scratch
        let next = engine.navigate(&params("superman", 2, true));

        assert!(next.is_some());
        assert_eq!(engine.total_results(), UNKNOWN_TOTAL);
        assert_eq!(engine.pages.len(), 0);
        assert_eq!(ids(&engine).len(), 0);
    }

    #[test]
    fn test_jump_navigation_replaces_pages() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("alien", 1, false)).unwrap();
        engine.apply(req.generation, Ok(page("a", 80)));

        let req = engine.navigate(&params("alien", 5, false)).unwrap();
        assert_eq!(engine.pages.len(), 0);
        // Total survives so the pagination control stays put
        assert_eq!(engine.total_results(), 80);

        engine.apply(req.generation, Ok(page("e", 80)));
        assert_eq!(engine.pages.keys().copied().collect::<Vec<_>>(), vec![5]);
        assert_eq!(ids(&engine)[0], "e0");
    }

    #[test]
    fn test_same_query_and_page_issues_nothing() {
        let mut engine = SearchEngine::new();
        assert!(engine.navigate(&params("heat", 1, false)).is_some());
        assert!(engine.navigate(&params("heat", 1, false)).is_none());
    }

    #[test]
    fn test_empty_query_issues_nothing() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("heat", 1, false)).unwrap();
        engine.apply(req.generation, Ok(page("h", 12)));

        assert!(engine.navigate(&params("", 1, false)).is_none());
        assert!(!engine.is_loading());
        assert!(!engine.show_results());
        assert!(!engine.show_no_results());
        assert_eq!(ids(&engine).len(), 0);
    }

    #[test]
    fn test_load_more_flag_by_total() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("x", 1, false)).unwrap();
        engine.apply(req.generation, Ok(page("a", 25)));
        assert!(engine.show_load_more());

        let req = engine.navigate(&params("x", 2, true)).unwrap();
        engine.apply(req.generation, Ok(page("b", 25)));
        assert!(engine.show_load_more());

        let req = engine.navigate(&params("x", 3, true)).unwrap();
        engine.apply(req.generation, Ok(page("c", 25)));
        assert!(!engine.show_load_more());
        assert_eq!(engine.page_count(), 3);
    }

    #[test]
    fn test_api_error_clears_cache_and_keeps_message() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("batman", 1, false)).unwrap();
        engine.apply(req.generation, Ok(page("b", 573)));

        let req = engine.navigate(&params("zzznotamovie", 1, false)).unwrap();
        engine.apply(req.generation, Err(Failure::Api("Movie not found!".into())));

        assert_eq!(engine.pages.len(), 0);
        assert_eq!(engine.total_results(), UNKNOWN_TOTAL);
        assert_eq!(engine.error_message(), Some("Movie not found!"));
        assert!(engine.show_no_results());
    }

    #[test]
    fn test_api_error_mid_pagination_clears_earlier_pages() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("batman", 1, false)).unwrap();
        engine.apply(req.generation, Ok(page("b", 573)));

        let req = engine.navigate(&params("batman", 2, true)).unwrap();
        engine.apply(req.generation, Err(Failure::Api("Request limit reached!".into())));

        assert_eq!(ids(&engine).len(), 0);
        assert!(!engine.show_results());
    }

    #[test]
    fn test_transport_error_keeps_rendered_pages() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("batman", 1, false)).unwrap();
        engine.apply(req.generation, Ok(page("b", 573)));

        let req = engine.navigate(&params("batman", 2, true)).unwrap();
        engine.apply(req.generation, Err(Failure::Transport("connection reset".into())));

        assert_eq!(engine.error(), Some(&SearchError::Fetch));
        assert_eq!(engine.error_message(), Some("Error fetching data"));
        assert_eq!(ids(&engine).len(), 10);
        assert!(engine.show_results());
        assert_eq!(engine.total_results(), 573);
    }

    #[test]
    fn test_same_address_retries_after_transport_error() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("batman", 1, false)).unwrap();
        engine.apply(req.generation, Err(Failure::Transport("dns".into())));
        assert!(engine.needs_retry());

        let retry = engine.navigate(&params("batman", 1, false)).unwrap();
        assert_eq!((retry.query.as_str(), retry.page), ("batman", 1));
        assert!(retry.generation > req.generation);
        assert!(engine.error().is_none());
        assert!(!engine.needs_retry());

        // Still outstanding: resubmitting does not duplicate it
        assert!(engine.navigate(&params("batman", 1, false)).is_none());
    }

    #[test]
    fn test_failed_more_page_retry_keeps_earlier_pages() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("batman", 1, false)).unwrap();
        engine.apply(req.generation, Ok(page("b", 573)));
        let req = engine.navigate(&params("batman", 2, true)).unwrap();
        engine.apply(req.generation, Err(Failure::Transport("reset".into())));

        let retry = engine.navigate(&params("batman", 2, true)).unwrap();
        assert_eq!(retry.page, 2);
        assert_eq!(engine.pages.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_api_error_is_not_retried_on_same_address() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("zzz", 1, false)).unwrap();
        engine.apply(req.generation, Err(Failure::Api("Movie not found!".into())));

        assert!(!engine.needs_retry());
        assert!(engine.navigate(&params("zzz", 1, false)).is_none());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut engine = SearchEngine::new();
        let old = engine.navigate(&params("batman", 1, false)).unwrap();
        let new = engine.navigate(&params("superman", 1, false)).unwrap();
        assert!(new.generation > old.generation);

        assert!(!engine.apply(old.generation, Ok(page("bat", 573))));
        assert_eq!(engine.pages.len(), 0);
        assert!(engine.is_loading());

        assert!(engine.apply(new.generation, Ok(page("sup", 120))));
        assert_eq!(engine.total_results(), 120);
        assert_eq!(ids(&engine)[0], "sup0");
    }

    #[test]
    fn test_back_to_cached_more_page_skips_fetch() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("dune", 1, false)).unwrap();
        engine.apply(req.generation, Ok(page("a", 50)));
        let req = engine.navigate(&params("dune", 2, true)).unwrap();
        engine.apply(req.generation, Ok(page("b", 50)));
        let req = engine.navigate(&params("dune", 3, true)).unwrap();
        engine.apply(req.generation, Ok(page("c", 50)));

        assert!(engine.navigate(&params("dune", 2, true)).is_none());
        assert_eq!(ids(&engine).len(), 20);
        assert!(engine.show_load_more());
    }

    #[test]
    fn test_no_results_waits_for_loading() {
        let mut engine = SearchEngine::new();
        let req = engine.navigate(&params("qwerty", 1, false)).unwrap();
        assert!(!engine.show_no_results());

        engine.apply(req.generation, Ok(SearchPage { results: vec![], total_results: 0 }));
        assert!(engine.show_no_results());
    }
}

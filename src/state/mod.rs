/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The persisted favourites list (favourites.rs)
/// - In-app addresses and back/forward history (address.rs, history.rs)
/// - Paginated search cache (search.rs)
/// - Single-movie lookups with a TTL cache (detail.rs)
/// - Keystroke debouncing (debounce.rs)
/// - Poster images (posters.rs)

pub mod address;
pub mod data;
pub mod debounce;
pub mod detail;
pub mod favourites;
pub mod history;
pub mod posters;
pub mod search;

//! OMDb API access
//!
//! - `client.rs` - async HTTP client for search, lookup and posters
//! - `error.rs` - the two failure channels (transport vs in-band)

pub mod client;
pub mod error;

pub use client::OmdbClient;
pub use error::Failure;

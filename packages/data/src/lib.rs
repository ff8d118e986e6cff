#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data access for the preparedness map.
//!
//! Three sources feed the map:
//!
//! 1. **Resources**: the `get_all_ressurser` remote procedure, normalized
//!    into `GeoJSON` point features ([`resources`]).
//! 2. **Shelters**: a bundled `GeoJSON` file loaded through an
//!    [`assets::AssetSource`] ([`shelters`]).
//! 3. **Nearest resource**: the `finn_naermeste_ressurs` remote procedure,
//!    returning ranked candidates for a clicked point ([`nearest`]).
//!
//! Every fetch returns `Err(DataError)` on failure instead of panicking;
//! callers log it and skip whatever depended on the data.

pub mod assets;
pub mod features;
pub mod nearest;
pub mod resources;
pub mod shelters;

use thiserror::Error;

pub use nearest::find_nearest;
pub use resources::fetch_resources;
pub use shelters::fetch_shelters;

/// Errors that can occur while loading map data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Remote procedure call failed.
    #[error("Remote call error: {0}")]
    Remote(#[from] beredskap_map_supabase::SupabaseError),

    /// HTTP request for a static asset failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a static asset from disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A static asset could not be retrieved.
    #[error("Asset error: {message}")]
    Asset {
        /// Description of what went wrong.
        message: String,
    },

    /// Content was retrieved but is not valid `GeoJSON`.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },
}

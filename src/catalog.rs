//! Collaborator seams of the sync orchestrator.
//!
//! The orchestrator only talks to these traits, so the Deezer and Spotify
//! clients can be replaced by in-process fakes in tests.

use async_trait::async_trait;

use crate::{
    error::CatalogError,
    types::{DestinationTrack, SourceTrack},
};

/// The catalog favourites are read from.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// Display name used in log lines.
    fn name(&self) -> &'static str;

    /// All favourite tracks of the authorized user, in the catalog's order.
    async fn favorite_tracks(&self) -> Result<Vec<SourceTrack>, CatalogError>;
}

/// The catalog matches are searched in and written to.
#[async_trait]
pub trait DestinationCatalog: Send + Sync {
    fn name(&self) -> &'static str;

    /// Largest number of tracks accepted by a single [`add_tracks`] call.
    ///
    /// [`add_tracks`]: DestinationCatalog::add_tracks
    fn max_batch_size(&self) -> usize {
        100
    }

    /// Ranked candidates for a free-text query.
    async fn search_tracks(&self, query: &str) -> Result<Vec<DestinationTrack>, CatalogError>;

    /// Creates the playlist receiving the matches and returns its identifier.
    async fn create_playlist(&self, name: &str, description: &str)
    -> Result<String, CatalogError>;

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String])
    -> Result<(), CatalogError>;
}

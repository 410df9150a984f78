//! Spotify Web API client, the destination catalog.
//!
//! Wraps the three calls the sync needs: track search, playlist creation and
//! adding tracks to a playlist. Every request carries a bearer token that is
//! refreshed transparently when it is about to expire.

mod playlist;
mod search;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tokio::sync::Mutex;

use crate::{
    auth::{self, Provider},
    catalog::DestinationCatalog,
    error::CatalogError,
    types::{AccessToken, DestinationTrack},
    warning,
};

pub const SERVICE: &str = "Spotify";

/// Largest number of URIs accepted by `POST /playlists/{id}/tracks`.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Seconds before expiry at which the token is refreshed.
const REFRESH_MARGIN: u64 = 60;

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    market: Option<String>,
    provider: Provider,
    token: Mutex<AccessToken>,
}

impl SpotifyClient {
    pub fn new(provider: Provider, token: AccessToken, market: Option<String>) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url: provider.config.api_url.trim_end_matches('/').to_string(),
            market,
            provider,
            token: Mutex::new(token),
        }
    }

    async fn bearer(&self) -> String {
        let mut token = self.token.lock().await;
        if token.is_expired(REFRESH_MARGIN) {
            if let Some(refresh) = token.refresh_token.clone() {
                match auth::refresh_token(&self.http, &self.provider, &refresh).await {
                    Ok(fresh) => *token = fresh,
                    Err(e) => warning!("Failed to refresh Spotify token: {}", e),
                }
            }
        }

        token.access_token.clone()
    }
}

/// Maps a non-success response to [`CatalogError::Api`] with the body
/// Spotify sent along.
async fn check(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CatalogError::Api {
        service: SERVICE,
        message: format!("{}: {}", status, body.trim()),
    })
}

#[async_trait]
impl DestinationCatalog for SpotifyClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    fn max_batch_size(&self) -> usize {
        MAX_TRACKS_PER_REQUEST
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<DestinationTrack>, CatalogError> {
        self.search(query).await
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<String, CatalogError> {
        let created = self.create_private_playlist(name, description).await?;
        Ok(created.id)
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), CatalogError> {
        self.add_to_playlist(playlist_id, track_ids).await?;
        Ok(())
    }
}

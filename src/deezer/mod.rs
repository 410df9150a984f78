//! Deezer API client, the source catalog.
//!
//! Deezer authenticates API calls with an `access_token` query parameter and
//! reports most failures as a `200 OK` carrying an `{"error": {...}}` body.

mod favorites;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    catalog::SourceCatalog,
    error::CatalogError,
    types::{AccessToken, DeezerPage, SourceTrack},
};

pub const SERVICE: &str = "Deezer";

pub struct DeezerClient {
    http: Client,
    api_url: String,
    token: AccessToken,
}

impl DeezerClient {
    pub fn new(api_url: impl Into<String>, token: AccessToken) -> Self {
        DeezerClient {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

/// Turns a Deezer error payload into a [`CatalogError`].
fn check_page<T>(page: DeezerPage<T>) -> Result<DeezerPage<T>, CatalogError> {
    match page.error {
        Some(error) => Err(CatalogError::Api {
            service: SERVICE,
            message: format!("{} ({})", error.message, error.kind),
        }),
        None => Ok(page),
    }
}

#[async_trait]
impl SourceCatalog for DeezerClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn favorite_tracks(&self) -> Result<Vec<SourceTrack>, CatalogError> {
        self.get_favorite_tracks().await
    }
}

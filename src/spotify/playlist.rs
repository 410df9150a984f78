use crate::{
    error::CatalogError,
    spotify::{SpotifyClient, check},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUser,
    },
};

impl SpotifyClient {
    pub async fn current_user(&self) -> Result<CurrentUser, CatalogError> {
        let token = self.bearer().await;
        let response = self
            .http
            .get(format!("{}/me", self.api_url))
            .bearer_auth(token)
            .send()
            .await?;

        Ok(check(response).await?.json::<CurrentUser>().await?)
    }

    /// Creates a private, non-collaborative playlist owned by the current
    /// user.
    pub async fn create_private_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        let user = self.current_user().await?;
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
            collaborative: false,
        };

        let token = self.bearer().await;
        let response = self
            .http
            .post(format!("{}/users/{}/playlists", self.api_url, user.id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        Ok(check(response)
            .await?
            .json::<CreatePlaylistResponse>()
            .await?)
    }

    /// Appends tracks to a playlist in the given order.
    ///
    /// Spotify accepts at most 100 URIs per request; callers batch
    /// accordingly.
    pub async fn add_to_playlist(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<AddTrackToPlaylistResponse, CatalogError> {
        let body = AddTrackToPlaylistRequest {
            uris: track_ids
                .iter()
                .map(|id| format!("spotify:track:{}", id))
                .collect(),
        };

        let token = self.bearer().await;
        let response = self
            .http
            .post(format!("{}/playlists/{}/tracks", self.api_url, playlist_id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        Ok(check(response)
            .await?
            .json::<AddTrackToPlaylistResponse>()
            .await?)
    }
}

use crate::{
    error::CatalogError,
    spotify::{SpotifyClient, check},
    types::{DestinationTrack, SearchResponse},
};

impl SpotifyClient {
    /// Searches the Spotify catalog for tracks.
    ///
    /// Results are restricted to the configured target market when there is
    /// one, so only playable tracks come back. Items without an identifier
    /// (local files) are dropped. The ranking of the remaining items is kept.
    pub async fn search(&self, query: &str) -> Result<Vec<DestinationTrack>, CatalogError> {
        let api_url = format!("{}/search", self.api_url);
        let mut params = vec![("q", query), ("type", "track")];
        if let Some(market) = self.market.as_deref() {
            params.push(("market", market));
        }

        let token = self.bearer().await;
        let response = self
            .http
            .get(&api_url)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await?;

        let result = check(response).await?.json::<SearchResponse>().await?;

        Ok(result
            .tracks
            .map(|page| {
                page.items
                    .into_iter()
                    .filter_map(|track| track.into_destination())
                    .collect()
            })
            .unwrap_or_default())
    }
}

use crate::{
    deezer::{DeezerClient, check_page},
    error::CatalogError,
    types::{DeezerPage, DeezerTrack, SourceTrack},
};

const PAGE_SIZE: usize = 100;

impl DeezerClient {
    /// Retrieves every favourite track of the authorized user.
    ///
    /// Walks `/user/me/tracks` page by page with the `index` parameter until
    /// Deezer stops announcing a `next` page. Tracks are returned in the
    /// order Deezer lists them.
    ///
    /// # Errors
    ///
    /// Network failures, non-success statuses and Deezer error payloads are
    /// all returned as [`CatalogError`]; nothing is retried.
    pub async fn get_favorite_tracks(&self) -> Result<Vec<SourceTrack>, CatalogError> {
        let api_url = format!("{}/user/me/tracks", self.api_url);
        let mut tracks: Vec<SourceTrack> = Vec::new();

        loop {
            let index = tracks.len().to_string();
            let limit = PAGE_SIZE.to_string();
            let page = self
                .http
                .get(&api_url)
                .query(&[
                    ("access_token", self.token.access_token.as_str()),
                    ("index", index.as_str()),
                    ("limit", limit.as_str()),
                ])
                .send()
                .await?
                .error_for_status()?
                .json::<DeezerPage<DeezerTrack>>()
                .await?;

            let page = check_page(page)?;
            let received = page.data.len();
            tracks.extend(page.data.into_iter().map(SourceTrack::from));

            if page.next.is_none() || received == 0 {
                break;
            }
        }

        Ok(tracks)
    }
}

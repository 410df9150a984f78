use chrono::Utc;
use serde::{Deserialize, Serialize};

/// OAuth credential obtained once per run. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Lifetime in seconds; `None` for tokens that do not expire.
    pub expires_in: Option<u64>,
    pub obtained_at: u64,
}

impl AccessToken {
    pub fn new(access_token: String, expires_in: Option<u64>) -> Self {
        AccessToken {
            access_token,
            refresh_token: None,
            expires_in: expires_in.filter(|secs| *secs > 0),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }

    /// True when the token expires within `margin` seconds.
    pub fn is_expired(&self, margin: u64) -> bool {
        match self.expires_in {
            Some(expires_in) => {
                let now = Utc::now().timestamp() as u64;
                now + margin >= self.obtained_at + expires_in
            }
            None => false,
        }
    }
}

/// A favourite track as reported by the source catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTrack {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Duration in seconds.
    pub duration: u32,
}

/// A candidate returned by a destination catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationTrack {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub duration_ms: u64,
}

/// A resolved match, keyed by the source track identifier in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub source_id: String,
    pub destination_id: String,
    pub destination_title: String,
    pub destination_artist: String,
    pub destination_duration_ms: u64,
}

impl MatchRecord {
    pub fn new(source: &SourceTrack, destination: &DestinationTrack) -> Self {
        MatchRecord {
            source_id: source.id.clone(),
            destination_id: destination.id.clone(),
            destination_title: destination.title.clone(),
            destination_artist: destination.artist.clone(),
            destination_duration_ms: destination.duration_ms,
        }
    }
}

/// Per-run outcome reported to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub total: usize,
    pub matched: usize,
    pub from_cache: usize,
    pub unmatched: usize,
    pub added: usize,
    pub batches: usize,
    /// Matched tracks that were never submitted because the run was cancelled.
    pub dropped: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
    pub error: Option<DeezerApiError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerApiError {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    pub code: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerTrack {
    pub id: i64,
    pub title: String,
    pub duration: u32,
    pub artist: DeezerArtist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerArtist {
    pub name: String,
}

impl From<DeezerTrack> for SourceTrack {
    fn from(track: DeezerTrack) -> Self {
        SourceTrack {
            id: track.id.to_string(),
            title: track.title,
            artist: track.artist.name,
            duration: track.duration,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<SpotifyTrack>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    /// Absent for local files.
    pub id: Option<String>,
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

impl SpotifyTrack {
    pub fn into_destination(self) -> Option<DestinationTrack> {
        let id = self.id?;
        Some(DestinationTrack {
            id,
            title: self.name,
            artist: self
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_default(),
            duration_ms: self.duration_ms,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

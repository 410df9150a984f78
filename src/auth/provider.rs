use url::Url;

use crate::config::ProviderConfig;

/// Permissions requested from Deezer. `offline_access` yields a token that
/// does not expire during a long migration.
pub const DEEZER_PERMS: &[&str] = &["basic_access", "email", "offline_access"];

pub const SPOTIFY_SCOPES: &[&str] = &["playlist-read-private", "playlist-modify-private"];

/// The identity providers this tool knows how to talk to. They differ in
/// parameter names and in how the token endpoint is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Deezer,
    Spotify,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Deezer => "Deezer",
            ProviderKind::Spotify => "Spotify",
        }
    }
}

/// A service registration together with the flavour of OAuth it speaks.
#[derive(Debug, Clone)]
pub struct Provider {
    pub kind: ProviderKind,
    pub config: ProviderConfig,
}

impl Provider {
    pub fn deezer(config: ProviderConfig) -> Self {
        Provider {
            kind: ProviderKind::Deezer,
            config,
        }
    }

    pub fn spotify(config: ProviderConfig) -> Self {
        Provider {
            kind: ProviderKind::Spotify,
            config,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The page the user has to visit to grant access, bound to `state`.
    pub fn authorization_url(&self, state: &str) -> Url {
        let config = &self.config;
        let mut url = config.auth_url.clone();
        {
            let mut query = url.query_pairs_mut();
            match self.kind {
                ProviderKind::Deezer => {
                    query
                        .append_pair("app_id", &config.client_id)
                        .append_pair("redirect_uri", config.redirect_url.as_str())
                        .append_pair("perms", &DEEZER_PERMS.join(","));
                }
                ProviderKind::Spotify => {
                    query
                        .append_pair("client_id", &config.client_id)
                        .append_pair("response_type", "code")
                        .append_pair("redirect_uri", config.redirect_url.as_str())
                        .append_pair("scope", &SPOTIFY_SCOPES.join(" "));
                }
            }
            query.append_pair("state", state);
        }
        url
    }
}

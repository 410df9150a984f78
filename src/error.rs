use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to prepare configuration directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors of the OAuth authorization-code flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no authorization code provided ({provider})")]
    MissingCode { provider: &'static str },

    /// The `state` echoed by the identity provider does not match the one we
    /// generated. Always fatal.
    #[error("state mismatch ({provider}): {received} != {expected}")]
    StateMismatch {
        provider: &'static str,
        received: String,
        expected: String,
    },

    #[error("token exchange failed ({provider}): {reason}")]
    Exchange {
        provider: &'static str,
        reason: String,
    },

    #[error("token endpoint unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot bind callback listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("redirect URL {0} has no usable port")]
    RedirectPort(String),

    #[error("authorization already completed ({provider})")]
    AlreadyCompleted { provider: &'static str },

    #[error("authorization aborted ({provider})")]
    Cancelled { provider: &'static str },
}

/// Errors returned by the catalog clients.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} API error: {message}")]
    Api {
        service: &'static str,
        message: String,
    },
}

/// Errors returned by a match cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unreachable: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("malformed cache entry for {key}: {reason}")]
    Malformed { key: String, reason: String },

    #[error("cache did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("cache unavailable since the last failure, not retrying yet")]
    Unavailable,
}

/// Why a single source track could not be matched. Never aborts a run.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Error while search : {0}")]
    Search(#[from] CatalogError),

    #[error("No result found")]
    NoResult,
}

/// Failures that abort a whole sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("cannot retrieve favourite tracks: {0}")]
    Favorites(#[source] CatalogError),

    #[error("cannot create destination playlist: {0}")]
    Playlist(#[source] CatalogError),

    #[error("cannot submit batch of {size} tracks: {source}")]
    Submit {
        size: usize,
        #[source]
        source: CatalogError,
    },

    #[error("cannot write run log: {0}")]
    RunLog(#[from] std::io::Error),
}

/// Top-level error handed to `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

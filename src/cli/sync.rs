use std::path::PathBuf;

use chrono::Local;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::{
    auth::Provider,
    cli::auth::authorize,
    config::Config,
    deezer::DeezerClient,
    error::{AppError, SyncError},
    info,
    management::{MatchCache, MemoryMatchCache, RedisMatchCache, RunLog},
    resolver::TitleNormalizer,
    spotify::SpotifyClient,
    sync::{SyncOptions, Synchronizer},
    types::SyncReport,
    utils, warning,
};

pub const PLAYLIST_DESCRIPTION: &str = "Import from Deezer";

#[derive(Debug, Clone)]
pub struct SyncArgs {
    pub no_cache: bool,
    pub no_browser: bool,
    pub playlist_name: Option<String>,
    pub log_dir: PathBuf,
}

/// Authorizes against both services and migrates the Deezer favourites.
pub async fn sync(
    config: &Config,
    args: SyncArgs,
    cancel: CancellationToken,
    tracker: &TaskTracker,
) -> Result<SyncReport, AppError> {
    let tokens = authorize(config, !args.no_browser, &cancel, tracker).await?;

    let deezer = DeezerClient::new(config.deezer.api_url.clone(), tokens.deezer);
    let spotify = SpotifyClient::new(
        Provider::spotify(config.spotify.clone()),
        tokens.spotify,
        config.spotify_market.clone(),
    );

    let mut cache = open_cache(config, args.no_cache);
    let normalizer = TitleNormalizer::new();

    let mut run_log = RunLog::create(&args.log_dir)
        .await
        .map_err(SyncError::RunLog)?;
    info!("Writing run log to {}", run_log.path().display());

    let options = SyncOptions {
        playlist_name: args
            .playlist_name
            .unwrap_or_else(|| utils::default_playlist_name(&Local::now())),
        playlist_description: PLAYLIST_DESCRIPTION.to_string(),
    };

    let report = Synchronizer::new(
        &deezer,
        &spotify,
        cache.as_mut(),
        &normalizer,
        &mut run_log,
        cancel,
    )
    .run(&options)
    .await?;

    Ok(report)
}

fn open_cache(config: &Config, no_cache: bool) -> Box<dyn MatchCache> {
    if no_cache {
        return Box::new(MemoryMatchCache::new());
    }

    match RedisMatchCache::open(&config.redis_url) {
        Ok(cache) => Box::new(cache),
        Err(e) => {
            warning!(
                "Cannot use match cache at {}: {}. Continuing without it.",
                config.redis_url,
                e
            );
            Box::new(MemoryMatchCache::new())
        }
    }
}

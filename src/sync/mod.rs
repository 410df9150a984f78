//! The sync orchestrator.
//!
//! One pass over the source favourites, strictly sequential and in source
//! order: cache lookup, search cascade, conflict resolution, cache store and
//! batched submission to the destination playlist. Per-track failures are
//! logged and skipped; failures to fetch the favourites, create the playlist
//! or submit a batch abort the run.

mod batch;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

pub use batch::Batch;

use crate::{
    catalog::{DestinationCatalog, SourceCatalog},
    error::{MatchError, SyncError},
    info,
    management::{MatchCache, RunLog},
    resolver::{self, TitleNormalizer},
    success,
    types::{DestinationTrack, MatchRecord, SourceTrack, SyncReport},
    utils, warning,
};

/// Playlist the matches are written to.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub playlist_name: String,
    pub playlist_description: String,
}

/// Queries tried in order until one returns candidates.
///
/// The bracket-free title is only added when stripping actually changes the
/// title and leaves something to search for.
pub fn search_queries(normalizer: &TitleNormalizer, track: &SourceTrack) -> Vec<String> {
    let mut queries = vec![
        utils::field_query(&track.artist, &track.title),
        track.title.clone(),
    ];

    let bare_title = normalizer.strip_brackets(&track.title);
    if !bare_title.is_empty() && bare_title != track.title {
        queries.push(bare_title);
    }
    queries
}

pub struct Synchronizer<'a, S, D> {
    source: &'a S,
    destination: &'a D,
    cache: &'a mut dyn MatchCache,
    normalizer: &'a TitleNormalizer,
    run_log: &'a mut RunLog,
    cancel: CancellationToken,
}

impl<'a, S, D> Synchronizer<'a, S, D>
where
    S: SourceCatalog,
    D: DestinationCatalog,
{
    pub fn new(
        source: &'a S,
        destination: &'a D,
        cache: &'a mut dyn MatchCache,
        normalizer: &'a TitleNormalizer,
        run_log: &'a mut RunLog,
        cancel: CancellationToken,
    ) -> Self {
        Synchronizer {
            source,
            destination,
            cache,
            normalizer,
            run_log,
            cancel,
        }
    }

    /// Runs one full pass.
    ///
    /// The cancellation token is checked before every source track. When it
    /// fires the pass stops at once and the pending batch is dropped without
    /// being submitted; the report says how many matches were lost.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Favorites`] when the favourites cannot be fetched
    /// - [`SyncError::Playlist`] when the destination playlist cannot be created
    /// - [`SyncError::Submit`] when a batch is rejected
    pub async fn run(&mut self, options: &SyncOptions) -> Result<SyncReport, SyncError> {
        let favorites = self.fetch_favorites().await?;

        let playlist_id = self
            .destination
            .create_playlist(&options.playlist_name, &options.playlist_description)
            .await
            .map_err(SyncError::Playlist)?;
        success!("Playlist \"{}\" created", options.playlist_name);

        let mut report = SyncReport {
            total: favorites.len(),
            ..SyncReport::default()
        };
        let mut batch = Batch::new(self.destination.max_batch_size());
        let last = favorites.len().saturating_sub(1);

        for (index, track) in favorites.iter().enumerate() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                report.dropped = batch.len();
                warning!(
                    "Sync interrupted, {} matched tracks were not submitted",
                    batch.len()
                );
                return Ok(report);
            }

            let source_label = format!(
                "{} : {} - {} - {}",
                self.source.name(),
                track.artist,
                track.title,
                utils::format_duration(u64::from(track.duration))
            );

            match self.locate(track).await {
                Ok((record, cached)) => {
                    report.matched += 1;
                    if cached {
                        report.from_cache += 1;
                    }

                    let line = format!(
                        "{} | {} : {} - {} - {}",
                        source_label,
                        self.destination.name(),
                        record.destination_artist,
                        record.destination_title,
                        utils::format_duration_ms(record.destination_duration_ms)
                    );
                    info!("{}", line);
                    self.log(&line).await;

                    let ready = batch
                        .push(record.destination_id)
                        .or_else(|| (index == last).then(|| batch.take()));
                    if let Some(ids) = ready {
                        self.submit(&playlist_id, ids, &mut report).await?;
                    }
                }
                Err(e) => {
                    report.unmatched += 1;
                    let line = format!("{} | {} : {}", source_label, self.destination.name(), e);
                    warning!("{}", line);
                    self.log(&line).await;
                }
            }
        }

        // an unmatched last track leaves the tail of the batch behind
        if !batch.is_empty() {
            let ids = batch.take();
            self.submit(&playlist_id, ids, &mut report).await?;
        }

        Ok(report)
    }

    async fn fetch_favorites(&self) -> Result<Vec<SourceTrack>, SyncError> {
        let pb = ProgressBar::new_spinner();
        pb.set_message(format!("Fetching {} favourite tracks...", self.source.name()));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        let result = self.source.favorite_tracks().await;
        pb.finish_and_clear();

        let favorites = result.map_err(SyncError::Favorites)?;
        info!(
            "Found {} favourite tracks on {}",
            favorites.len(),
            self.source.name()
        );
        Ok(favorites)
    }

    /// Finds the destination match for one track, from the cache or by
    /// searching. The bool tells whether the cache answered.
    async fn locate(&mut self, track: &SourceTrack) -> Result<(MatchRecord, bool), MatchError> {
        match self.cache.lookup(&track.id).await {
            Ok(Some(record)) => {
                info!("Retrieved from cache : {}", track.title);
                return Ok((record, true));
            }
            Ok(None) => {}
            Err(e) => warning!("Error while retrieving from cache : {}", e),
        }

        let candidates = self.search(track).await?;
        let chosen = resolver::resolve(self.normalizer, track, &candidates)
            .ok_or(MatchError::NoResult)?;
        let record = MatchRecord::new(track, chosen);

        if let Err(e) = self.cache.store(&record).await {
            warning!("Error while storing in cache : {}", e);
        }
        Ok((record, false))
    }

    async fn search(&self, track: &SourceTrack) -> Result<Vec<DestinationTrack>, MatchError> {
        for query in search_queries(self.normalizer, track) {
            let candidates = self.destination.search_tracks(&query).await?;
            if !candidates.is_empty() {
                return Ok(candidates);
            }
        }
        Err(MatchError::NoResult)
    }

    async fn submit(
        &self,
        playlist_id: &str,
        ids: Vec<String>,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        self.destination
            .add_tracks(playlist_id, &ids)
            .await
            .map_err(|source| SyncError::Submit {
                size: ids.len(),
                source,
            })?;

        report.added += ids.len();
        report.batches += 1;
        Ok(())
    }

    async fn log(&mut self, line: &str) {
        if let Err(e) = self.run_log.write_line(line).await {
            warning!("Cannot write to {}: {}", self.run_log.path().display(), e);
        }
    }
}

use chrono::{DateTime, TimeZone};
use rand::{Rng, distr::Alphanumeric};

/// Generates the opaque `state` value bound to one OAuth flow.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Formats a duration in seconds as `XmYs`, e.g. `431` -> `7m11s`.
pub fn format_duration(seconds: u64) -> String {
    format!("{}m{}s", seconds / 60, seconds % 60)
}

/// Formats a duration in milliseconds, truncated to whole seconds.
pub fn format_duration_ms(millis: u64) -> String {
    format_duration(millis / 1000)
}

/// Name of the per-run log file, e.g. `Import 2024-03-01.18-04-59.txt`.
pub fn run_log_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Import {}", at.format("%Y-%m-%d.%H-%M-%S.txt"))
}

/// Default name of the playlist created on each run.
pub fn default_playlist_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Import from Deezer ({})", at.format("%d/%m/%Y %H:%M:%S"))
}

/// Builds the `artist:"X" track:"Y"` field-filtered search query.
pub fn field_query(artist: &str, title: &str) -> String {
    format!("artist:\"{}\" track:\"{}\"", artist, title)
}

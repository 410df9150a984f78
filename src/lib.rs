//! Deezer to Spotify favourites migration library
//!
//! This library moves a user's favourite tracks from Deezer into a freshly
//! created Spotify playlist. It authorizes against both services through a
//! local OAuth callback listener, searches the Spotify catalog for every
//! Deezer favourite, picks the best candidate and submits the matches in
//! batches.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback listener
//! - `auth` - OAuth bridge, provider descriptions and token exchange
//! - `catalog` - Traits describing the source and destination catalogs
//! - `cli` - Command-line command implementations
//! - `config` - Configuration loaded from environment variables
//! - `deezer` - Deezer API client (source catalog)
//! - `error` - Error types shared across the crate
//! - `management` - Match cache backends and the per-run log file
//! - `resolver` - Conflict resolution between catalog candidates
//! - `server` - Local HTTP listener bootstrap
//! - `spotify` - Spotify Web API client (destination catalog)
//! - `sync` - The sync orchestrator and batch accumulation
//! - `types` - Data structures and wire types
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod deezer;
pub mod error;
pub mod management;
pub mod resolver;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Searching {} favourites", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This is the only place the process is terminated on purpose. Library code
/// returns typed errors instead; `main` decides when a failure is fatal and
/// hands it to this macro.
///
/// # Example
///
/// ```
/// error!("Sync aborted: {}", err);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues: a track without a match, an unreachable
/// cache, a callback without an authorization code.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

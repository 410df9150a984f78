//! # CLI Module
//!
//! Command implementations behind the `favsync` binary. Commands wire the
//! configuration, the OAuth bridges, the catalog clients and the cache
//! together and hand the work to [`crate::sync`].
//!
//! ## Commands
//!
//! - [`sync`] - Authorize against Deezer and Spotify, then migrate the
//!   Deezer favourites into a new private Spotify playlist
//! - [`authorize`] - The two concurrent OAuth flows used by `sync`
//! - [`watch_interrupts`] - Ctrl-C handling: stop gracefully, then force
//!
//! ## Usage
//!
//! ```bash
//! favsync sync                          # migrate, caching matches in redis
//! favsync sync --no-cache --no-browser  # no redis, print login URLs only
//! favsync sync --playlist-name "Liked"  # custom playlist name
//! ```

mod auth;
mod interrupt;
mod sync;

pub use auth::{Tokens, authorize};
pub use interrupt::{Interrupt, watch_interrupts};
pub use sync::{PLAYLIST_DESCRIPTION, SyncArgs, sync};

//! # API Module
//!
//! HTTP handlers of the local OAuth callback listener. Each bridge serves its
//! own router built by [`crate::server::router`] with the bridge's
//! [`BridgeState`](crate::auth::BridgeState) attached as an extension.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the identity provider's redirect, checks the
//!   `state`, exchanges the `code` and hands the token to the waiting flow.
//! - [`index`] - Diagnostic catch-all; logs the request and answers with an
//!   empty body.

mod callback;
mod index;

pub use callback::callback;
pub use index::index;

//! OAuth authorization-code flow.
//!
//! One [`bridge`] runs per service. It serves the redirect URL on a local
//! listener, checks the `state` echoed back by the identity provider,
//! exchanges the code for a token and hands exactly one token to the waiting
//! caller.

pub mod bridge;
pub mod exchange;
pub mod provider;

pub use bridge::{BridgeHandle, BridgeState, SHUTDOWN_GRACE, start};
pub use exchange::{exchange_code, parse_token_response, refresh_token};
pub use provider::{Provider, ProviderKind};

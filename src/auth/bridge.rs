use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::{Mutex, oneshot};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use url::Url;

use crate::{
    auth::{exchange, provider::Provider},
    error::AuthError,
    info, server,
    types::AccessToken,
    utils,
};

/// How long in-flight callback requests may take once the listener is told
/// to shut down.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

type Outcome = Result<AccessToken, AuthError>;

/// State shared between the callback handler and the shutdown watcher of
/// one bridge.
///
/// The handoff slot holds the sending half of a oneshot channel. Whoever
/// takes it first decides the outcome of the flow: the callback handler
/// (token or state mismatch) or the shutdown watcher (dropping it closes the
/// channel).
pub struct BridgeState {
    provider: Provider,
    expected_state: String,
    http: Client,
    handoff: Mutex<Option<oneshot::Sender<Outcome>>>,
}

impl BridgeState {
    fn new(provider: Provider, expected_state: String, sender: oneshot::Sender<Outcome>) -> Self {
        BridgeState {
            provider,
            expected_state,
            http: Client::new(),
            handoff: Mutex::new(Some(sender)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.provider.name()
    }

    /// Runs the callback part of the flow for one inbound request.
    ///
    /// A missing `code` is reported to the caller only; the flow keeps
    /// waiting for a valid callback. A `state` mismatch is delivered to the
    /// waiting side as well, which makes the whole flow fail.
    pub async fn handle_callback(&self, params: &HashMap<String, String>) -> Result<(), AuthError> {
        let provider = self.name();

        let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
            return Err(AuthError::MissingCode { provider });
        };

        let received = params.get("state").cloned().unwrap_or_default();
        if received != self.expected_state {
            let mismatch = || AuthError::StateMismatch {
                provider,
                received: received.clone(),
                expected: self.expected_state.clone(),
            };
            self.deliver(Err(mismatch())).await;
            return Err(mismatch());
        }

        if self.handoff.lock().await.is_none() {
            return Err(AuthError::AlreadyCompleted { provider });
        }

        let token = exchange::exchange_code(&self.http, &self.provider, code).await?;
        info!("Received token on handler ({})", provider);

        if self.deliver(Ok(token)).await {
            Ok(())
        } else {
            Err(AuthError::AlreadyCompleted { provider })
        }
    }

    /// Puts `outcome` into the handoff slot. Returns false when the slot was
    /// already used or closed.
    async fn deliver(&self, outcome: Outcome) -> bool {
        match self.handoff.lock().await.take() {
            Some(sender) => sender.send(outcome).is_ok(),
            None => false,
        }
    }

    /// Closes the handoff channel without a value.
    async fn close(&self) {
        self.handoff.lock().await.take();
    }
}

/// A running bridge: the URL to show to the user and the pending token.
pub struct BridgeHandle {
    name: &'static str,
    authorization_url: Url,
    receiver: oneshot::Receiver<Outcome>,
    shutdown: CancellationToken,
}

impl BridgeHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn authorization_url(&self) -> &Url {
        &self.authorization_url
    }

    /// Waits for the single token of this flow.
    ///
    /// Resolves when the callback delivers a token or fails the flow, or when
    /// the process-wide cancellation fires. Either way the bridge's listener
    /// is shut down afterwards.
    pub async fn await_token(self) -> Result<AccessToken, AuthError> {
        let BridgeHandle {
            name,
            receiver,
            shutdown,
            ..
        } = self;

        let outcome = tokio::select! {
            biased;
            received = receiver => received.unwrap_or(Err(AuthError::Cancelled { provider: name })),
            _ = shutdown.cancelled() => Err(AuthError::Cancelled { provider: name }),
        };

        shutdown.cancel();
        outcome
    }
}

/// Starts the local callback listener for `provider`.
///
/// The listener binds `127.0.0.1` on the port of the provider's redirect URL
/// and serves the redirect URL's path. Two tasks are spawned on `tracker`:
/// the serving task and a watcher that closes the handoff channel when the
/// bridge's cancellation token (a child of `cancel`) fires.
///
/// # Errors
///
/// - [`AuthError::RedirectPort`] when the redirect URL carries no port
/// - [`AuthError::Bind`] when the port is already taken
pub async fn start(
    provider: Provider,
    cancel: &CancellationToken,
    tracker: &TaskTracker,
) -> Result<BridgeHandle, AuthError> {
    let redirect_url = provider.config.redirect_url.clone();
    let port = redirect_url
        .port_or_known_default()
        .ok_or_else(|| AuthError::RedirectPort(redirect_url.to_string()))?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let state = utils::generate_state();
    let authorization_url = provider.authorization_url(&state);
    let name = provider.name();

    let (sender, receiver) = oneshot::channel();
    let bridge = Arc::new(BridgeState::new(provider, state, sender));

    let listener = server::bind(addr).await?;
    let app = server::router(redirect_url.path(), Arc::clone(&bridge));
    let shutdown = cancel.child_token();

    tracker.spawn(server::serve(listener, app, shutdown.clone(), SHUTDOWN_GRACE, name));

    let watcher_token = shutdown.clone();
    tracker.spawn(async move {
        watcher_token.cancelled().await;
        info!("Closing auth http server ({})...", bridge.name());
        bridge.close().await;
    });

    Ok(BridgeHandle {
        name,
        authorization_url,
        receiver,
        shutdown,
    })
}

use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::{
    auth::{self, BridgeHandle, Provider},
    config::Config,
    error::AuthError,
    info, success,
    types::AccessToken,
    warning,
};

/// Tokens for both services, obtained once per run.
pub struct Tokens {
    pub deezer: AccessToken,
    pub spotify: AccessToken,
}

/// Runs the Deezer and Spotify authorization flows side by side.
///
/// Both callback listeners are started first so the user can complete the
/// logins in any order. The first failure of either flow, a state mismatch
/// in particular, is returned right away.
pub async fn authorize(
    config: &Config,
    open_browser: bool,
    cancel: &CancellationToken,
    tracker: &TaskTracker,
) -> Result<Tokens, AuthError> {
    let deezer = auth::start(Provider::deezer(config.deezer.clone()), cancel, tracker).await?;
    let spotify = auth::start(Provider::spotify(config.spotify.clone()), cancel, tracker).await?;

    present(&deezer, open_browser);
    present(&spotify, open_browser);

    let (deezer, spotify) = tokio::try_join!(deezer.await_token(), spotify.await_token())?;
    success!("Auth ok !");

    Ok(Tokens { deezer, spotify })
}

fn present(handle: &BridgeHandle, open_browser: bool) {
    let url = handle.authorization_url();
    info!(
        "Please log in to {} by visiting the following page in your browser: {}",
        handle.name(),
        url
    );

    if open_browser && webbrowser::open(url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the {} URL above manually.",
            handle.name()
        );
    }
}

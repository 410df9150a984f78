use axum::{Extension, Router, routing::get};
use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{api, auth::BridgeState, error::AuthError, info, warning};

/// Routes of one callback listener: the redirect path and a diagnostic
/// catch-all.
pub fn router(callback_path: &str, state: Arc<BridgeState>) -> Router {
    let callback_path = if callback_path.is_empty() {
        "/"
    } else {
        callback_path
    };

    let mut app = Router::new().route(callback_path, get(api::callback));
    if callback_path != "/" {
        app = app.route("/", get(api::index));
    }

    app.fallback(api::index).layer(Extension(state))
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, AuthError> {
    TcpListener::bind(&addr)
        .await
        .map_err(|source| AuthError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serves `app` until `shutdown` fires, then lets in-flight requests finish
/// for at most `grace`.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
    grace: Duration,
    name: &'static str,
) {
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    tokio::pin!(server);

    let deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = &mut server => {
            if let Err(e) = result {
                warning!("Auth http server error ({}): {}", name, e);
            }
        }
        _ = deadline => warning!("Auth http server ({}) did not drain in time", name),
    }

    info!("Auth http server closed ({})", name);
}

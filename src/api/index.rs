use std::sync::Arc;

use axum::{Extension, http::Uri};

use crate::{auth::BridgeState, info};

pub async fn index(uri: Uri, Extension(bridge): Extension<Arc<BridgeState>>) -> &'static str {
    info!("Got request for: {} ({})", uri, bridge.name());
    ""
}

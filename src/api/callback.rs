use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::StatusCode, response::Html};

use crate::{auth::BridgeState, error::AuthError, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(bridge): Extension<Arc<BridgeState>>,
) -> (StatusCode, Html<&'static str>) {
    match bridge.handle_callback(&params).await {
        Ok(()) => (
            StatusCode::OK,
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>"),
        ),
        Err(e @ AuthError::MissingCode { .. }) => {
            warning!("{}", e);
            (
                StatusCode::BAD_REQUEST,
                Html("<h4>Missing authorization code.</h4>"),
            )
        }
        Err(e @ AuthError::StateMismatch { .. }) => {
            warning!("{}", e);
            (StatusCode::NOT_FOUND, Html("<h4>Not found.</h4>"))
        }
        Err(e @ AuthError::AlreadyCompleted { .. }) => {
            warning!("{}", e);
            (StatusCode::GONE, Html("<h4>Login already completed.</h4>"))
        }
        Err(e) => {
            warning!("Error while retrieving token: {}", e);
            (StatusCode::BAD_GATEWAY, Html("<h4>Login failed.</h4>"))
        }
    }
}

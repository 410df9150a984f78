use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{Json, Router, extract::Query, routing::get};
use favsync::{
    auth::{self, BridgeHandle, Provider},
    config::ProviderConfig,
    error::AuthError,
};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use url::Url;

/// Token endpoint answering `tok-<code>` and counting its hits.
async fn token_endpoint() -> (Url, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let app = Router::new().route(
        "/oauth/access_token.php",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let code = params.get("code").cloned().unwrap_or_default();
                Json(json!({ "access_token": format!("tok-{}", code), "expires": 0 }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = Url::parse(&format!("http://{}/oauth/access_token.php", addr)).unwrap();
    (url, hits)
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn deezer_provider(token_url: Url, port: u16) -> Provider {
    Provider::deezer(ProviderConfig {
        client_id: "123456".to_string(),
        client_secret: "s3cr3t".to_string(),
        redirect_url: Url::parse(&format!("http://127.0.0.1:{}/callback", port)).unwrap(),
        auth_url: Url::parse("https://connect.deezer.com/oauth/auth.php").unwrap(),
        token_url,
        api_url: "https://api.deezer.com".to_string(),
    })
}

struct Running {
    handle: BridgeHandle,
    state: String,
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl Running {
    fn callback_url(&self, query: &str) -> String {
        format!("http://{}/callback?{}", self.addr, query)
    }
}

async fn start_bridge() -> Running {
    let (token_url, hits) = token_endpoint().await;
    let port = free_port();
    let cancel = CancellationToken::new();
    let tracker = TaskTracker::new();

    let handle = auth::start(deezer_provider(token_url, port), &cancel, &tracker)
        .await
        .unwrap();
    let state = handle
        .authorization_url()
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .unwrap();

    Running {
        handle,
        state,
        addr: SocketAddr::from(([127, 0, 0, 1], port)),
        hits,
        cancel,
        tracker,
    }
}

async fn get_status(url: &str) -> StatusCode {
    reqwest::get(url).await.unwrap().status()
}

async fn wait_for_shutdown(tracker: TaskTracker) {
    tracker.close();
    tokio::time::timeout(Duration::from_secs(10), tracker.wait())
        .await
        .expect("bridge tasks stopped");
}

#[tokio::test]
async fn test_authorization_url() {
    let running = start_bridge().await;
    let url = running.handle.authorization_url().clone();
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    assert_eq!(url.host_str(), Some("connect.deezer.com"));
    assert_eq!(params["app_id"], "123456");
    assert_eq!(params["perms"], "basic_access,email,offline_access");
    assert_eq!(
        params["redirect_uri"],
        format!("http://127.0.0.1:{}/callback", running.addr.port())
    );
    assert_eq!(running.state.len(), 32);
    assert!(running.state.chars().all(|c| c.is_ascii_alphanumeric()));

    running.cancel.cancel();
    wait_for_shutdown(running.tracker).await;
}

#[tokio::test]
async fn test_valid_callback_delivers_token() {
    let running = start_bridge().await;
    let url = running.callback_url(&format!("code=abc&state={}", running.state));

    let (status, token) = tokio::join!(get_status(&url), running.handle.await_token());

    assert_eq!(status, StatusCode::OK);
    let token = token.unwrap();
    assert_eq!(token.access_token, "tok-abc");
    assert_eq!(token.expires_in, None);
    assert_eq!(running.hits.load(Ordering::SeqCst), 1);

    // The listener shuts itself down once the token is handed over
    wait_for_shutdown(running.tracker).await;
}

#[tokio::test]
async fn test_state_mismatch_fails_flow() {
    let running = start_bridge().await;
    let url = running.callback_url("code=abc&state=forged");

    let (status, token) = tokio::join!(get_status(&url), running.handle.await_token());

    assert_eq!(status, StatusCode::NOT_FOUND);
    match token {
        Err(AuthError::StateMismatch { received, expected, .. }) => {
            assert_eq!(received, "forged");
            assert_eq!(expected, running.state);
        }
        other => panic!("expected a state mismatch, got {:?}", other),
    }
    assert_eq!(running.hits.load(Ordering::SeqCst), 0);

    wait_for_shutdown(running.tracker).await;
}

#[tokio::test]
async fn test_missing_code_keeps_waiting() {
    let running = start_bridge().await;

    let status = get_status(&running.callback_url(&format!("state={}", running.state))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let url = running.callback_url(&format!("code=second&state={}", running.state));
    let (status, token) = tokio::join!(get_status(&url), running.handle.await_token());

    assert_eq!(status, StatusCode::OK);
    assert_eq!(token.unwrap().access_token, "tok-second");
    assert_eq!(running.hits.load(Ordering::SeqCst), 1);

    wait_for_shutdown(running.tracker).await;
}

#[tokio::test]
async fn test_second_callback_is_gone() {
    let Running {
        handle,
        state,
        addr,
        hits,
        cancel,
        tracker,
    } = start_bridge().await;
    let url = format!("http://{}/callback?code=abc&state={}", addr, state);

    // Keep the bridge open while both callbacks arrive
    let waiter = tokio::spawn(async move {
        let token = handle.await_token().await;
        token.map(|t| t.access_token)
    });

    assert_eq!(get_status(&url).await, StatusCode::OK);
    let second = reqwest::get(&url).await;
    // Either answered 410 or refused once the listener closed
    if let Ok(res) = second {
        assert_eq!(res.status(), StatusCode::GONE);
    }

    assert_eq!(waiter.await.unwrap().unwrap(), "tok-abc");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    cancel.cancel();
    wait_for_shutdown(tracker).await;
}

#[tokio::test]
async fn test_index_answers_empty_body() {
    let running = start_bridge().await;

    let res = reqwest::get(format!("http://{}/", running.addr)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "");

    let res = reqwest::get(format!("http://{}/favicon.ico", running.addr))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    running.cancel.cancel();
    wait_for_shutdown(running.tracker).await;
}

#[tokio::test]
async fn test_cancellation_aborts_waiting() {
    let running = start_bridge().await;
    let cancel = running.cancel.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let token = tokio::time::timeout(Duration::from_secs(5), running.handle.await_token())
        .await
        .expect("await_token returns after cancellation");
    assert!(matches!(token, Err(AuthError::Cancelled { provider: "Deezer" })));

    wait_for_shutdown(running.tracker).await;
    assert_eq!(running.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_port_in_use_is_reported() {
    let (token_url, _) = token_endpoint().await;
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let result = auth::start(
        deezer_provider(token_url, port),
        &CancellationToken::new(),
        &TaskTracker::new(),
    )
    .await;

    assert!(matches!(result, Err(AuthError::Bind { .. })));
}

#[test]
fn test_token_body_value_shape() {
    // Deezer answers `expires` as a number in JSON mode
    let body: Value = json!({ "access_token": "frX7", "expires": 3600 });
    let token = auth::parse_token_response(&body.to_string()).unwrap();
    assert_eq!(token.expires_in, Some(3600));
}

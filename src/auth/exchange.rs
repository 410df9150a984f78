use std::collections::HashMap;

use reqwest::Client;
use serde_json::Value;

use crate::{
    auth::provider::{Provider, ProviderKind},
    error::AuthError,
    types::AccessToken,
};

/// Exchanges an authorization code for an access token.
///
/// Spotify gets a standard `authorization_code` form post carrying the client
/// credentials. Deezer's `access_token.php` is queried with `app_id`,
/// `secret` and `code` and asked for JSON output; older deployments still
/// answer with a form-encoded body, which is accepted too.
///
/// # Errors
///
/// - [`AuthError::Http`] when the token endpoint cannot be reached
/// - [`AuthError::Exchange`] when the endpoint rejects the code or answers
///   with something that is not a token
pub async fn exchange_code(
    http: &Client,
    provider: &Provider,
    code: &str,
) -> Result<AccessToken, AuthError> {
    let config = &provider.config;
    let request = match provider.kind {
        ProviderKind::Deezer => http.get(config.token_url.clone()).query(&[
            ("app_id", config.client_id.as_str()),
            ("secret", config.client_secret.as_str()),
            ("code", code),
            ("output", "json"),
        ]),
        ProviderKind::Spotify => http.post(config.token_url.clone()).form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_url.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ]),
    };

    let res = request.send().await?;
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(AuthError::Exchange {
            provider: provider.name(),
            reason: format!("{}: {}", status, body.trim()),
        });
    }

    parse_token_response(&body).map_err(|reason| AuthError::Exchange {
        provider: provider.name(),
        reason,
    })
}

/// Trades a refresh token for a fresh access token.
///
/// Only Spotify issues refresh tokens; Deezer `offline_access` tokens do not
/// expire. When the response omits a new refresh token the old one is kept.
pub async fn refresh_token(
    http: &Client,
    provider: &Provider,
    refresh_token: &str,
) -> Result<AccessToken, AuthError> {
    let config = &provider.config;
    let res = http
        .post(config.token_url.clone())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(AuthError::Exchange {
            provider: provider.name(),
            reason: format!("{}: {}", status, body.trim()),
        });
    }

    let mut token = parse_token_response(&body).map_err(|reason| AuthError::Exchange {
        provider: provider.name(),
        reason,
    })?;
    if token.refresh_token.is_none() {
        token.refresh_token = Some(refresh_token.to_string());
    }
    Ok(token)
}

/// Parses a token endpoint body, either JSON or `a=b&c=d`.
pub fn parse_token_response(body: &str) -> Result<AccessToken, String> {
    let fields: HashMap<String, String> = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                Value::Number(n) => Some((key, n.to_string())),
                _ => None,
            })
            .collect(),
        Ok(_) => return Err(format!("unexpected token response: {}", body.trim())),
        Err(_) => url::form_urlencoded::parse(body.trim().as_bytes())
            .into_owned()
            .collect(),
    };

    if let Some(error) = fields.get("error") {
        let description = fields
            .get("error_description")
            .map(String::as_str)
            .unwrap_or_default();
        return Err(format!("{} {}", error, description).trim().to_string());
    }

    let access_token = fields
        .get("access_token")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| format!("no access token in response: {}", body.trim()))?;

    let expires_in = fields
        .get("expires_in")
        .or_else(|| fields.get("expires"))
        .and_then(|v| v.parse::<u64>().ok());

    let mut token = AccessToken::new(access_token.clone(), expires_in);
    token.refresh_token = fields.get("refresh_token").cloned();
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spotify_json() {
        let token = parse_token_response(
            r#"{"access_token":"BQC","token_type":"Bearer","scope":"playlist-modify-private","expires_in":3600,"refresh_token":"AQD"}"#,
        )
        .unwrap();
        assert_eq!(token.access_token, "BQC");
        assert_eq!(token.refresh_token.as_deref(), Some("AQD"));
        assert_eq!(token.expires_in, Some(3600));
    }

    #[test]
    fn parses_deezer_form_body() {
        let token = parse_token_response("access_token=frX7&expires=0").unwrap();
        assert_eq!(token.access_token, "frX7");
        assert_eq!(token.expires_in, None);
        assert!(!token.is_expired(60));
    }

    #[test]
    fn parses_deezer_json_with_string_expiry() {
        let token = parse_token_response(r#"{"access_token":"frX7","expires":"3600"}"#).unwrap();
        assert_eq!(token.expires_in, Some(3600));
    }

    #[test]
    fn rejects_error_and_garbage_bodies() {
        assert!(
            parse_token_response(r#"{"error":"invalid_grant","error_description":"bad code"}"#)
                .unwrap_err()
                .contains("invalid_grant")
        );
        assert!(parse_token_response("wrong code").is_err());
        assert!(parse_token_response("[]").is_err());
    }
}

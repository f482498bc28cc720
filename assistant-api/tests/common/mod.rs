#![allow(dead_code)]

use assistant_api::helpers::credential_provider::CredentialProvider;
use assistant_api::helpers::google_oauth::GoogleOAuthClient;
use assistant_api::helpers::token_store::{FileTokenStore, StoredToken, TokenStore};
use base64::Engine;
use std::path::Path;
use std::sync::Arc;

pub const ACCESS_TOKEN: &str = "ya29.test-access";

/// Provider backed by a token file under `dir`, with OAuth endpoints on
/// `oauth_base` (a mock server URI)
pub fn credentials_with(
    dir: &Path,
    oauth_base: &str,
    token: Option<StoredToken>,
) -> Arc<CredentialProvider> {
    let store = FileTokenStore::new(dir.join("token.json"));
    if let Some(token) = token {
        store.save(&token).unwrap();
    }

    let oauth = GoogleOAuthClient::with_endpoints(
        "client-123",
        Some("secret"),
        "http://127.0.0.1:8080/api/oauth/google/callback",
        &format!("{}/auth", oauth_base),
        &format!("{}/token", oauth_base),
    )
    .unwrap();

    Arc::new(CredentialProvider::new(Arc::new(oauth), Box::new(store)))
}

pub fn fresh_token() -> StoredToken {
    StoredToken {
        access_token: ACCESS_TOKEN.to_string(),
        refresh_token: Some("refresh-123".to_string()),
        expires_at: Some(chrono::Utc::now().timestamp() + 3600),
        scopes: vec![],
    }
}

pub fn expired_token() -> StoredToken {
    StoredToken {
        access_token: "ya29.stale".to_string(),
        refresh_token: Some("refresh-123".to_string()),
        expires_at: Some(chrono::Utc::now().timestamp() - 60),
        scopes: vec![],
    }
}

/// Gmail `raw` payload for a plain-text message
pub fn raw_email(subject: &str, body: &str) -> String {
    let message = format!(
        "From: sender@example.com\r\n\
         To: me@example.com\r\n\
         Subject: {}\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         \r\n\
         {}\r\n",
        subject, body
    );
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(message)
}

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::InitiateOAuthResponse;
use std::sync::Arc;
use tracing::{info, warn};

use crate::helpers::credential_provider::CredentialProvider;
use crate::helpers::oauth_state::OAuthStateManager;

#[derive(Debug)]
pub enum OAuthError {
    Denied(String),
    InvalidState,
    Exchange(String),
    Storage(String),
}

impl std::fmt::Display for OAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OAuthError::Denied(msg) => write!(f, "OAuth authorization failed: {}", msg),
            OAuthError::InvalidState => write!(f, "Invalid or expired state parameter"),
            OAuthError::Exchange(msg) => write!(f, "Token exchange failed: {}", msg),
            OAuthError::Storage(msg) => write!(f, "Failed to store tokens: {}", msg),
        }
    }
}

impl actix_web::error::ResponseError for OAuthError {
    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "error": self.to_string() });
        match self {
            OAuthError::Denied(_) | OAuthError::InvalidState => {
                HttpResponse::BadRequest().json(body)
            }
            OAuthError::Exchange(_) => HttpResponse::BadGateway().json(body),
            OAuthError::Storage(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}

pub async fn initiate_google_oauth(
    credentials: web::Data<Arc<CredentialProvider>>,
    state_manager: web::Data<Arc<OAuthStateManager>>,
) -> HttpResponse {
    let (auth_url, csrf_token, pkce_verifier) = credentials.oauth_client().authorize_url();

    state_manager
        .store_verifier(csrf_token.secret().to_string(), pkce_verifier)
        .await;

    info!("Started Google OAuth flow");

    HttpResponse::Ok().json(InitiateOAuthResponse {
        authorization_url: auth_url,
    })
}

#[derive(Deserialize)]
pub struct OAuthCallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

pub async fn google_oauth_callback(
    query: web::Query<OAuthCallbackQuery>,
    credentials: web::Data<Arc<CredentialProvider>>,
    state_manager: web::Data<Arc<OAuthStateManager>>,
) -> Result<HttpResponse, OAuthError> {
    let query = query.into_inner();

    if let Some(error) = query.error {
        warn!(error = %error, "Google OAuth was denied");
        return Err(OAuthError::Denied(error));
    }

    let state = query.state.ok_or(OAuthError::InvalidState)?;
    let code = query
        .code
        .ok_or_else(|| OAuthError::Denied("missing authorization code".to_string()))?;

    let pkce_verifier = state_manager
        .retrieve_verifier(&state)
        .await
        .ok_or(OAuthError::InvalidState)?;

    let token_response = credentials
        .oauth_client()
        .exchange_code(code, pkce_verifier)
        .await
        .map_err(|e| OAuthError::Exchange(e.to_string()))?;

    let stored = credentials
        .store_authorization(&token_response)
        .await
        .map_err(|e| OAuthError::Storage(e.to_string()))?;

    if stored.refresh_token.is_none() {
        warn!("Google did not return a refresh token; background sync will stop when the access token expires");
    }

    info!(scopes = ?stored.scopes, "Google account connected");

    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(
        r#"<!DOCTYPE html>
<html>
<head><title>Google Connected</title></head>
<body>
    <h1>Google Account Connected Successfully!</h1>
    <p>Calendar and Gmail access granted. You can close this window and return to the assistant.</p>
    <script>
        setTimeout(() => window.close(), 2000);
    </script>
</body>
</html>"#,
    ))
}

pub async fn disconnect_google(
    credentials: web::Data<Arc<CredentialProvider>>,
) -> Result<HttpResponse, OAuthError> {
    credentials
        .disconnect()
        .await
        .map_err(|e| OAuthError::Storage(e.to_string()))?;

    info!("Google account disconnected");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

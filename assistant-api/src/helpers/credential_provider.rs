use chrono::{DateTime, Duration, Utc};
use oauth2::TokenResponse;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::helpers::google_oauth::{GoogleOAuthClient, GoogleTokenResponse};
use crate::helpers::token_cache::TokenCache;
use crate::helpers::token_store::{StoredToken, TokenStore, TokenStoreError};

/// Tokens within this margin of expiry are refreshed
const EXPIRY_MARGIN_SECS: i64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Google account is not connected")]
    NotConnected,

    #[error("Token refresh failed: {0}")]
    Refresh(String),

    #[error(transparent)]
    Store(#[from] TokenStoreError),
}

/// Single source of Google access tokens for Calendar and Gmail calls.
///
/// Serves the cached token while it is fresh, then the stored one, and
/// refreshes with the stored refresh token once both are stale.
pub struct CredentialProvider {
    oauth_client: Arc<GoogleOAuthClient>,
    store: Box<dyn TokenStore>,
    cache: TokenCache,
    refresh_lock: Mutex<()>,
}

impl CredentialProvider {
    pub fn new(oauth_client: Arc<GoogleOAuthClient>, store: Box<dyn TokenStore>) -> Self {
        Self {
            oauth_client,
            store,
            cache: TokenCache::new(),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn oauth_client(&self) -> &GoogleOAuthClient {
        &self.oauth_client
    }

    /// True when a refresh token is on file
    pub fn is_connected(&self) -> bool {
        matches!(self.store.load(), Ok(Some(token)) if token.refresh_token.is_some())
    }

    /// Persist a token response from the code exchange or a refresh. Google
    /// omits the refresh token on refresh, so the stored one is kept.
    pub async fn store_authorization(
        &self,
        response: &GoogleTokenResponse,
    ) -> Result<StoredToken, CredentialError> {
        let previous_refresh = self
            .store
            .load()
            .ok()
            .flatten()
            .and_then(|token| token.refresh_token);

        let expires_at = response
            .expires_in()
            .and_then(|ttl| Duration::from_std(ttl).ok())
            .map(|ttl| Utc::now() + ttl);

        let token = StoredToken {
            access_token: response.access_token().secret().clone(),
            refresh_token: response
                .refresh_token()
                .map(|refresh| refresh.secret().clone())
                .or(previous_refresh),
            expires_at: expires_at.map(|at| at.timestamp()),
            scopes: response
                .scopes()
                .map(|scopes| scopes.iter().map(|scope| scope.to_string()).collect())
                .unwrap_or_default(),
        };

        self.store.save(&token)?;
        self.cache_token(&token).await;

        Ok(token)
    }

    /// A valid access token, refreshing it when needed
    pub async fn access_token(&self) -> Result<String, CredentialError> {
        if let Some(token) = self.cache.get_token().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited
        if let Some(token) = self.cache.get_token().await {
            return Ok(token);
        }

        let stored = self.store.load()?.ok_or(CredentialError::NotConnected)?;

        if is_fresh(&stored, Utc::now()) {
            debug!("Using stored Google access token");
            self.cache_token(&stored).await;
            return Ok(stored.access_token);
        }

        let refresh_token = stored
            .refresh_token
            .as_deref()
            .ok_or(CredentialError::NotConnected)?;

        info!("Refreshing Google access token");
        let response = self
            .oauth_client
            .refresh_token(refresh_token)
            .await
            .map_err(|e| CredentialError::Refresh(e.to_string()))?;

        let token = self.store_authorization(&response).await?;
        Ok(token.access_token)
    }

    /// Forget the stored tokens
    pub async fn disconnect(&self) -> Result<(), CredentialError> {
        self.store.clear()?;
        self.cache.invalidate_token().await;
        Ok(())
    }

    async fn cache_token(&self, token: &StoredToken) {
        if let Some(expires_at) = token
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        {
            self.cache
                .store_token(token.access_token.clone(), expires_at)
                .await;
        }
    }
}

fn is_fresh(token: &StoredToken, now: DateTime<Utc>) -> bool {
    token
        .expires_at
        .is_some_and(|expires_at| now.timestamp() < expires_at - EXPIRY_MARGIN_SECS)
}

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// In-memory access token for the connected Google account
pub struct TokenCache {
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            token: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn store_token(&self, access_token: String, expires_at: DateTime<Utc>) {
        let mut token = self.token.lock().await;
        *token = Some(CachedToken {
            access_token,
            expires_at,
        });
    }

    /// The cached token, unless it expires within the next five minutes
    pub async fn get_token(&self) -> Option<String> {
        let token = self.token.lock().await;
        token
            .as_ref()
            .filter(|cached| Utc::now() < cached.expires_at - Duration::minutes(5))
            .map(|cached| cached.access_token.clone())
    }

    pub async fn invalidate_token(&self) {
        let mut token = self.token.lock().await;
        *token = None;
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

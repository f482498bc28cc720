use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use oauth2::PkceCodeVerifier;

/// Pending authorizations older than this are dropped
const STATE_TTL: Duration = Duration::from_secs(600);

struct PendingAuthorization {
    verifier: PkceCodeVerifier,
    created_at: Instant,
}

/// Maps the CSRF `state` of an in-flight authorization to its PKCE verifier.
/// Each state can be redeemed once.
pub struct OAuthStateManager {
    states: Arc<Mutex<HashMap<String, PendingAuthorization>>>,
}

impl OAuthStateManager {
    pub fn new() -> Self {
        Self {
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn store_verifier(&self, state: String, verifier: PkceCodeVerifier) {
        let mut states = self.states.lock().await;
        states.retain(|_, pending| pending.created_at.elapsed() < STATE_TTL);
        states.insert(
            state,
            PendingAuthorization {
                verifier,
                created_at: Instant::now(),
            },
        );
    }

    pub async fn retrieve_verifier(&self, state: &str) -> Option<PkceCodeVerifier> {
        let mut states = self.states.lock().await;
        states
            .remove(state)
            .filter(|pending| pending.created_at.elapsed() < STATE_TTL)
            .map(|pending| pending.verifier)
    }
}

impl Default for OAuthStateManager {
    fn default() -> Self {
        Self::new()
    }
}

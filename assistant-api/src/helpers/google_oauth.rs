use anyhow::Result;
use oauth2::basic::{BasicClient, BasicTokenType};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EmptyExtraTokenFields,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RefreshToken, Scope, StandardTokenResponse,
    TokenUrl,
};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

pub const CALENDAR_EVENTS_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

pub type GoogleTokenResponse = StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>;

pub struct GoogleOAuthClient {
    client: BasicClient,
}

impl GoogleOAuthClient {
    pub fn new(client_id: &str, client_secret: Option<&str>, redirect_uri: &str) -> Result<Self> {
        Self::with_endpoints(
            client_id,
            client_secret,
            redirect_uri,
            GOOGLE_AUTH_URL,
            GOOGLE_TOKEN_URL,
        )
    }

    pub fn with_endpoints(
        client_id: &str,
        client_secret: Option<&str>,
        redirect_uri: &str,
        auth_url: &str,
        token_url: &str,
    ) -> Result<Self> {
        let client = BasicClient::new(
            ClientId::new(client_id.to_string()),
            client_secret.map(|secret| ClientSecret::new(secret.to_string())),
            AuthUrl::new(auth_url.to_string())?,
            Some(TokenUrl::new(token_url.to_string())?),
        )
        .set_redirect_uri(RedirectUrl::new(redirect_uri.to_string())?);

        Ok(Self { client })
    }

    /// Consent URL for Calendar and Gmail access. Offline access with a forced
    /// consent prompt so Google returns a refresh token every time.
    pub fn authorize_url(&self) -> (String, CsrfToken, PkceCodeVerifier) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_token) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(CALENDAR_EVENTS_SCOPE.to_string()))
            .add_scope(Scope::new(GMAIL_READONLY_SCOPE.to_string()))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .set_pkce_challenge(pkce_challenge)
            .url();

        (auth_url.to_string(), csrf_token, pkce_verifier)
    }

    pub async fn exchange_code(
        &self,
        code: String,
        pkce_verifier: PkceCodeVerifier,
    ) -> Result<GoogleTokenResponse> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(oauth2::reqwest::async_http_client)
            .await?;

        Ok(token)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<GoogleTokenResponse> {
        let token = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(oauth2::reqwest::async_http_client)
            .await?;

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_requests_offline_calendar_and_gmail() {
        let client = GoogleOAuthClient::new(
            "client-123.apps.googleusercontent.com",
            None,
            "http://127.0.0.1:8080/api/oauth/google/callback",
        )
        .unwrap();

        let (url, csrf, _verifier) = client.authorize_url();

        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains("calendar.events"));
        assert!(url.contains("gmail.readonly"));
        assert!(url.contains(&format!("state={}", csrf.secret())));
    }

    #[test]
    fn test_invalid_redirect_uri() {
        assert!(GoogleOAuthClient::new("id", None, "not a url").is_err());
    }
}

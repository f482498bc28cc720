pub mod calendar;
pub mod emails;
pub mod health;
pub mod nlp;
pub mod oauth;
pub mod settings;

use actix_web::{web, HttpResponse};

use crate::helpers::credential_provider::CredentialError;

/// Failure talking to a Google API on behalf of the connected account
#[derive(Debug)]
pub enum GoogleApiError {
    NotConnected(String),
    Validation(String),
    Upstream(String),
    Internal(String),
}

impl std::fmt::Display for GoogleApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoogleApiError::NotConnected(msg) => write!(f, "{}", msg),
            GoogleApiError::Validation(msg) => write!(f, "{}", msg),
            GoogleApiError::Upstream(msg) => write!(f, "{}", msg),
            GoogleApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl actix_web::error::ResponseError for GoogleApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            GoogleApiError::NotConnected(msg) => {
                HttpResponse::Unauthorized().json(serde_json::json!({ "error": msg }))
            }
            GoogleApiError::Validation(msg) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }))
            }
            GoogleApiError::Upstream(msg) => {
                HttpResponse::BadGateway().json(serde_json::json!({ "error": msg }))
            }
            GoogleApiError::Internal(msg) => {
                HttpResponse::InternalServerError().json(serde_json::json!({ "error": msg }))
            }
        }
    }
}

impl From<anyhow::Error> for GoogleApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<CredentialError>() {
            Some(CredentialError::NotConnected) | Some(CredentialError::Refresh(_)) => {
                GoogleApiError::NotConnected(format!(
                    "{}. Connect your Google account at /api/oauth/google/initiate",
                    err
                ))
            }
            Some(CredentialError::Store(_)) => GoogleApiError::Internal(err.to_string()),
            None if err.is::<rusqlite::Error>() => GoogleApiError::Internal(err.to_string()),
            None => GoogleApiError::Upstream(format!("{:#}", err)),
        }
    }
}

/// Every route the API serves
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health))
        .route("/chat/", web::post().to(nlp::chat))
        .route("/ner/", web::post().to(nlp::ner))
        .route("/dates/extract", web::post().to(nlp::extract_dates))
        .route("/api/oauth/google/initiate", web::post().to(oauth::initiate_google_oauth))
        .route("/api/oauth/google/callback", web::get().to(oauth::google_oauth_callback))
        .route("/api/oauth/google/disconnect", web::post().to(oauth::disconnect_google))
        .route("/api/calendar/events", web::get().to(calendar::list_events))
        .route("/api/calendar/events", web::post().to(calendar::create_event))
        .route("/api/emails/sync-events", web::post().to(emails::sync_events))
        .route("/api/emails/created-events", web::get().to(emails::list_created_events))
        .route("/settings", web::get().to(settings::get_settings))
        .route("/settings/api-keys", web::post().to(settings::update_api_keys));
}

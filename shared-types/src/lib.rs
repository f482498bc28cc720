use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod email;
pub mod event;
pub mod nlp;
pub mod settings;

pub use email::{EmailMessage, SyncEventsRequest, SyncEventsResponse};
pub use event::{
    CalendarEvent, CalendarEventDraft, CreatedEvent, CreatedEventsResponse, EventDateTime,
    EventsResponse,
};
pub use nlp::{
    ChatRequest, ChatResponse, Entity, ExtractDatesRequest, ExtractDatesResponse, NerRequest,
    NerResponse,
};
pub use settings::{ApiKeyConfig, SettingsResponse, UpdateApiKeysRequest};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response after starting the Google OAuth flow
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct InitiateOAuthResponse {
    pub authorization_url: String,
}

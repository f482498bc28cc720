use anyhow::{Context, Result};
use serde::Deserialize;
use shared_types::{CalendarEvent, CalendarEventDraft};
use std::sync::Arc;
use tracing::{debug, info};

use crate::helpers::credential_provider::CredentialProvider;

pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

/// Google Calendar v3 client bound to the primary calendar
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialProvider>,
}

impl GoogleCalendarClient {
    pub fn new(credentials: Arc<CredentialProvider>) -> Self {
        Self::with_base_url(credentials, GOOGLE_CALENDAR_API)
    }

    pub fn with_base_url(credentials: Arc<CredentialProvider>, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/primary/events", self.base_url)
    }

    /// Upcoming events, soonest first
    pub async fn list_upcoming(&self, max_results: u32) -> Result<Vec<CalendarEvent>> {
        let access_token = self.credentials.access_token().await?;
        let time_min = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

        let response = self
            .http
            .get(self.events_url())
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("maxResults", &max_results.to_string()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await
            .context("Failed to reach Google Calendar")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Google Calendar returned {}: {}", status, body);
        }

        let list: EventList = response
            .json()
            .await
            .context("Failed to parse Google Calendar event list")?;

        debug!(count = list.items.len(), "Fetched upcoming events");
        Ok(list.items)
    }

    pub async fn insert_event(&self, draft: &CalendarEventDraft) -> Result<CalendarEvent> {
        let access_token = self.credentials.access_token().await?;

        let response = self
            .http
            .post(self.events_url())
            .bearer_auth(access_token)
            .json(draft)
            .send()
            .await
            .context("Failed to reach Google Calendar")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Google Calendar rejected event '{}': {} {}", draft.summary, status, body);
        }

        let event: CalendarEvent = response
            .json()
            .await
            .context("Failed to parse created event")?;

        info!(
            summary = %draft.summary,
            date = ?draft.start.date,
            event_id = ?event.id,
            "Created calendar event"
        );
        Ok(event)
    }
}

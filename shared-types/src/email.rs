use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A Gmail message reduced to the parts the event sync reads
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmailMessage {
    pub id: String,
    pub thread_id: Option<String>,
    pub subject: Option<String>,
    pub body_text: Option<String>,
}

impl EmailMessage {
    /// Subject and body joined by a single space, the text dates are read from
    pub fn searchable_text(&self) -> String {
        let subject = self.subject.as_deref().unwrap_or_default();
        let body = self.body_text.as_deref().unwrap_or_default();
        format!("{} {}", subject, body)
    }
}

/// Request body for triggering an email sync
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct SyncEventsRequest {
    pub query: Option<String>,
    pub max_emails: Option<u32>,
}

/// Outcome of one email sync run
#[derive(Debug, Default, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SyncEventsResponse {
    pub emails_scanned: usize,
    pub emails_skipped: usize,
    pub events_created: Vec<crate::CalendarEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searchable_text_joins_subject_and_body() {
        let email = EmailMessage {
            id: "m1".to_string(),
            thread_id: None,
            subject: Some("Dinner".to_string()),
            body_text: Some("See you on 2024-03-15".to_string()),
        };

        assert_eq!(email.searchable_text(), "Dinner See you on 2024-03-15");
    }

    #[test]
    fn test_searchable_text_without_subject() {
        let email = EmailMessage {
            id: "m2".to_string(),
            thread_id: None,
            subject: None,
            body_text: Some("body".to_string()),
        };

        assert_eq!(email.searchable_text(), " body");
    }
}

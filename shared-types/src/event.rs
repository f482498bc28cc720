use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Start or end of a Google Calendar event. All-day events carry `date`,
/// timed events carry `date_time`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn all_day(date: NaiveDate) -> Self {
        Self {
            date: Some(date.format("%Y-%m-%d").to_string()),
            date_time: None,
            time_zone: None,
        }
    }
}

/// Event as returned by the Google Calendar API
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: EventDateTime,
    #[serde(default)]
    pub end: EventDateTime,
    #[serde(default)]
    pub html_link: Option<String>,
}

/// Payload for inserting a new event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalendarEventDraft {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

impl CalendarEventDraft {
    /// All-day event on `date`. Google treats the end date as exclusive, so
    /// the end is the following day.
    pub fn all_day(summary: impl Into<String>, description: Option<String>, date: NaiveDate) -> Self {
        Self {
            summary: summary.into(),
            description,
            start: EventDateTime::all_day(date),
            end: EventDateTime::all_day(date + Duration::days(1)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EventsResponse {
    pub events: Vec<CalendarEvent>,
}

/// Event created by a previous email sync
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatedEvent {
    pub id: i64,
    pub message_id: String,
    pub event_date: String,
    pub summary: String,
    pub calendar_event_id: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatedEventsResponse {
    pub events: Vec<CreatedEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_day_draft_has_exclusive_end() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let draft = CalendarEventDraft::all_day("New year", None, date);

        assert_eq!(draft.start.date.as_deref(), Some("2024-12-31"));
        assert_eq!(draft.end.date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn test_draft_serializes_to_google_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let draft = CalendarEventDraft::all_day("Dentist", Some("Bring card".to_string()), date);

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["start"], serde_json::json!({ "date": "2024-03-15" }));
        assert_eq!(json["end"], serde_json::json!({ "date": "2024-03-16" }));
        assert_eq!(json["description"], "Bring card");
    }

    #[test]
    fn test_calendar_event_from_google_response() {
        let body = r#"{
            "kind": "calendar#event",
            "id": "abc123",
            "summary": "Standup",
            "htmlLink": "https://www.google.com/calendar/event?eid=abc123",
            "start": { "dateTime": "2024-03-15T09:00:00+02:00", "timeZone": "Europe/Athens" },
            "end": { "dateTime": "2024-03-15T09:15:00+02:00" }
        }"#;

        let event: CalendarEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.id.as_deref(), Some("abc123"));
        assert_eq!(event.start.date_time.as_deref(), Some("2024-03-15T09:00:00+02:00"));
        assert_eq!(event.start.time_zone.as_deref(), Some("Europe/Athens"));
        assert!(event.start.date.is_none());
        assert!(event.description.is_none());
    }
}

mod common;

use assistant_api::helpers::credential_provider::CredentialError;
use assistant_api::integrations::gmail::GmailClient;
use assistant_api::integrations::google_calendar::GoogleCalendarClient;
use chrono::NaiveDate;
use common::{credentials_with, expired_token, fresh_token, raw_email, ACCESS_TOKEN};
use serde_json::json;
use shared_types::CalendarEventDraft;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn lists_and_fetches_gmail_messages() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let credentials = credentials_with(dir.path(), &server.uri(), Some(fresh_token()));

    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .and(query_param("q", "newer_than:7d"))
        .and(query_param("maxResults", "5"))
        .and(header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                { "id": "m1", "threadId": "t1" },
                { "id": "m2", "threadId": "t2" }
            ],
            "resultSizeEstimate": 2
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/me/messages/m1"))
        .and(query_param("format", "raw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "threadId": "t1",
            "raw": raw_email("Invoice due", "Please pay by 2030-01-31.")
        })))
        .mount(&server)
        .await;

    let gmail = GmailClient::with_base_url(credentials, &server.uri());

    let ids = gmail.list_message_ids("newer_than:7d", 5).await.unwrap();
    assert_eq!(ids, vec!["m1", "m2"]);

    let email = gmail.fetch_message("m1").await.unwrap();
    assert_eq!(email.subject.as_deref(), Some("Invoice due"));
    assert_eq!(email.thread_id.as_deref(), Some("t1"));
    assert_eq!(email.body_text.as_deref(), Some("Please pay by 2030-01-31."));
}

#[tokio::test]
async fn empty_mailbox_has_no_messages_field() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let credentials = credentials_with(dir.path(), &server.uri(), Some(fresh_token()));

    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultSizeEstimate": 0 })))
        .mount(&server)
        .await;

    let gmail = GmailClient::with_base_url(credentials, &server.uri());

    assert!(gmail.list_message_ids("in:inbox", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn inserts_all_day_event() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let credentials = credentials_with(dir.path(), &server.uri(), Some(fresh_token()));

    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .and(body_partial_json(json!({
            "summary": "Dentist",
            "start": { "date": "2030-03-15" },
            "end": { "date": "2030-03-16" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "evt-1",
            "summary": "Dentist",
            "htmlLink": "https://www.google.com/calendar/event?eid=evt-1",
            "start": { "date": "2030-03-15" },
            "end": { "date": "2030-03-16" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let calendar = GoogleCalendarClient::with_base_url(credentials, &server.uri());
    let draft = CalendarEventDraft::all_day(
        "Dentist",
        None,
        NaiveDate::from_ymd_opt(2030, 3, 15).unwrap(),
    );

    let event = calendar.insert_event(&draft).await.unwrap();
    assert_eq!(event.id.as_deref(), Some("evt-1"));
    assert_eq!(event.start.date.as_deref(), Some("2030-03-15"));
}

#[tokio::test]
async fn lists_upcoming_events() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let credentials = credentials_with(dir.path(), &server.uri(), Some(fresh_token()));

    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .and(query_param("maxResults", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "calendar#events",
            "items": [
                { "id": "a", "summary": "Standup", "start": { "dateTime": "2030-03-15T09:00:00Z" }, "end": { "dateTime": "2030-03-15T09:15:00Z" } },
                { "id": "b", "summary": "Holiday", "start": { "date": "2030-03-16" }, "end": { "date": "2030-03-17" } }
            ]
        })))
        .mount(&server)
        .await;

    let calendar = GoogleCalendarClient::with_base_url(credentials, &server.uri());
    let events = calendar.list_upcoming(3).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].summary.as_deref(), Some("Standup"));
    assert_eq!(events[1].start.date.as_deref(), Some("2030-03-16"));
}

#[tokio::test]
async fn expired_token_is_refreshed_once() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let credentials = credentials_with(dir.path(), &server.uri(), Some(expired_token()));

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.refreshed",
            "token_type": "Bearer",
            "expires_in": 3599,
            "scope": "https://www.googleapis.com/auth/calendar.events"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(header("authorization", "Bearer ya29.refreshed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(2)
        .mount(&server)
        .await;

    let calendar = GoogleCalendarClient::with_base_url(credentials.clone(), &server.uri());

    calendar.list_upcoming(5).await.unwrap();
    // Second call is served from the cache
    calendar.list_upcoming(5).await.unwrap();

    // Google omits the refresh token on refresh; the stored one is kept
    assert!(credentials.is_connected());
}

#[tokio::test]
async fn calls_fail_when_not_connected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let credentials = credentials_with(dir.path(), &server.uri(), None);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let calendar = GoogleCalendarClient::with_base_url(credentials, &server.uri());
    let err = calendar.list_upcoming(5).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CredentialError>(),
        Some(CredentialError::NotConnected)
    ));
}

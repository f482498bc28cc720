use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::{CalendarEventDraft, EventsResponse};
use std::sync::Arc;

use super::GoogleApiError;
use crate::integrations::google_calendar::GoogleCalendarClient;

const DEFAULT_MAX_RESULTS: u32 = 10;
/// Google caps a single page at 2500; keep requests small
const MAX_RESULTS_LIMIT: u32 = 250;

#[derive(Deserialize)]
pub struct ListEventsQuery {
    max_results: Option<u32>,
}

pub async fn list_events(
    calendar: web::Data<Arc<GoogleCalendarClient>>,
    query: web::Query<ListEventsQuery>,
) -> Result<HttpResponse, GoogleApiError> {
    let max_results = query
        .max_results
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .clamp(1, MAX_RESULTS_LIMIT);

    let events = calendar.list_upcoming(max_results).await?;

    Ok(HttpResponse::Ok().json(EventsResponse { events }))
}

pub async fn create_event(
    calendar: web::Data<Arc<GoogleCalendarClient>>,
    request: web::Json<CalendarEventDraft>,
) -> Result<HttpResponse, GoogleApiError> {
    let draft = request.into_inner();
    validate_draft(&draft)?;

    let event = calendar.insert_event(&draft).await?;

    Ok(HttpResponse::Created().json(event))
}

fn validate_draft(draft: &CalendarEventDraft) -> Result<(), GoogleApiError> {
    if draft.summary.trim().is_empty() {
        return Err(GoogleApiError::Validation("summary cannot be empty".to_string()));
    }

    for (name, boundary) in [("start", &draft.start), ("end", &draft.end)] {
        if boundary.date.is_none() && boundary.date_time.is_none() {
            return Err(GoogleApiError::Validation(format!(
                "{} needs either date or dateTime",
                name
            )));
        }
        if let Some(date) = &boundary.date {
            if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                return Err(GoogleApiError::Validation(format!(
                    "{}.date must be YYYY-MM-DD, got {}",
                    name, date
                )));
            }
        }
    }

    Ok(())
}

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::{CreatedEventsResponse, SyncEventsRequest};
use std::sync::Arc;

use super::GoogleApiError;
use crate::database::created_events as created_events_db;
use crate::database::Database;
use crate::handlers::settings::SettingsAppState;
use crate::jobs::event_sync::EmailEventSync;

const DEFAULT_LIST_LIMIT: usize = 50;
const MAX_LIST_LIMIT: usize = 500;
const MAX_SYNC_EMAILS: u32 = 100;

pub async fn sync_events(
    sync: web::Data<Arc<EmailEventSync>>,
    settings: web::Data<SettingsAppState>,
    request: Option<web::Json<SyncEventsRequest>>,
) -> Result<HttpResponse, GoogleApiError> {
    let request = request.map(|r| r.into_inner()).unwrap_or_default();

    let (default_query, default_max) = {
        let config = settings.config.read().map_err(|e| {
            GoogleApiError::Internal(format!("Failed to acquire config read lock: {}", e))
        })?;
        (config.sync.query.clone(), config.sync.max_emails)
    };

    let query = request
        .query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or(default_query);
    let max_emails = request
        .max_emails
        .unwrap_or(default_max)
        .clamp(1, MAX_SYNC_EMAILS);

    let report = sync.sync_recent(&query, max_emails).await?;

    Ok(HttpResponse::Ok().json(report))
}

#[derive(Deserialize)]
pub struct CreatedEventsQuery {
    limit: Option<usize>,
}

pub async fn list_created_events(
    db: web::Data<Arc<Database>>,
    query: web::Query<CreatedEventsQuery>,
) -> Result<HttpResponse, GoogleApiError> {
    let limit = list_limit(query.limit);

    let events = created_events_db::list_created_events(db.async_connection.clone(), limit)
        .await
        .map_err(|e| GoogleApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(CreatedEventsResponse { events }))
}

fn list_limit(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_list_created_events() {
        let (_dir, db) = temp_database();
        created_events_db::record_created_event(
            db.async_connection.clone(),
            "msg-1",
            "2024-03-15",
            "Dentist",
            Some("evt-1"),
        )
        .await
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .route("/created-events", web::get().to(list_created_events)),
        )
        .await;

        let req = test::TestRequest::get().uri("/created-events?limit=5").to_request();
        let resp: CreatedEventsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.events.len(), 1);
        assert_eq!(resp.events[0].summary, "Dentist");
        assert_eq!(resp.events[0].calendar_event_id.as_deref(), Some("evt-1"));
    }

    #[::core::prelude::v1::test]
    fn test_list_limit_is_clamped() {
        assert_eq!(list_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(list_limit(Some(0)), 1);
        assert_eq!(list_limit(Some(20)), 20);
        assert_eq!(list_limit(Some(usize::MAX)), MAX_LIST_LIMIT);
    }

    #[actix_web::test]
    async fn test_huge_limit_still_lists() {
        let (_dir, db) = temp_database();
        created_events_db::record_created_event(
            db.async_connection.clone(),
            "msg-1",
            "2024-03-15",
            "Dentist",
            None,
        )
        .await
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .route("/created-events", web::get().to(list_created_events)),
        )
        .await;

        let uri = format!("/created-events?limit={}", usize::MAX);
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp: CreatedEventsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.events.len(), 1);
    }
}

use crate::database::created_events as created_events_db;
use crate::database::processed_emails as processed_db;
use crate::database::AsyncDbConnection;
use crate::integrations::gmail::GmailClient;
use crate::integrations::google_calendar::GoogleCalendarClient;
use anyhow::Result;
use extractors::DateExtractor;
use futures::stream::{self, StreamExt};
use shared_types::{CalendarEventDraft, EmailMessage, SyncEventsResponse};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const DEFAULT_SUMMARY: &str = "Event from email";
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Messages fetched from Gmail at the same time
const FETCH_CONCURRENCY: usize = 4;

/// Turns dates found in recent emails into all-day calendar events
pub struct EmailEventSync {
    db_conn: AsyncDbConnection,
    gmail: Arc<GmailClient>,
    calendar: Arc<GoogleCalendarClient>,
    extractor: Arc<DateExtractor>,
    run_lock: Mutex<()>,
    shutting_down: AtomicBool,
}

impl EmailEventSync {
    pub fn new(
        db_conn: AsyncDbConnection,
        gmail: Arc<GmailClient>,
        calendar: Arc<GoogleCalendarClient>,
        extractor: Arc<DateExtractor>,
    ) -> Self {
        Self {
            db_conn,
            gmail,
            calendar,
            extractor,
            run_lock: Mutex::new(()),
            shutting_down: AtomicBool::new(false),
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    /// Scan the newest messages matching `query` and create events for the
    /// dates found in those not seen before. Runs are serialized.
    pub async fn sync_recent(&self, query: &str, max_emails: u32) -> Result<SyncEventsResponse> {
        let _guard = self.run_lock.lock().await;

        let ids = self.gmail.list_message_ids(query, max_emails).await?;
        let mut report = SyncEventsResponse::default();

        let mut pending = Vec::new();
        for id in ids {
            if processed_db::is_processed(self.db_conn.clone(), &id).await? {
                debug!(message_id = %id, "Email already processed");
                continue;
            }
            pending.push(id);
        }

        info!(query = %query, pending = pending.len(), "Syncing events from email");

        let gmail = self.gmail.clone();
        let mut fetched = stream::iter(pending)
            .map(|id| {
                let gmail = gmail.clone();
                async move {
                    let result = gmail.fetch_message(&id).await;
                    (id, result)
                }
            })
            .buffered(FETCH_CONCURRENCY);

        let mut seen: HashSet<(String, String)> = HashSet::new();

        while let Some((id, result)) = fetched.next().await {
            if self.is_shutting_down() {
                info!("Shutdown requested, stopping email sync");
                break;
            }

            report.emails_scanned += 1;

            let email = match result {
                Ok(email) => email,
                Err(e) => {
                    warn!(message_id = %id, error = %e, "Failed to fetch email");
                    report.emails_skipped += 1;
                    continue;
                }
            };

            if let Err(e) = self.process_email(&email, &mut seen, &mut report).await {
                warn!(message_id = %id, error = %e, "Failed to process email");
                report.emails_skipped += 1;
            }
        }

        info!(
            scanned = report.emails_scanned,
            skipped = report.emails_skipped,
            created = report.events_created.len(),
            "Email sync finished"
        );

        Ok(report)
    }

    async fn process_email(
        &self,
        email: &EmailMessage,
        seen: &mut HashSet<(String, String)>,
        report: &mut SyncEventsResponse,
    ) -> Result<()> {
        let dates = self.extractor.extract_dates(&email.searchable_text()).await;

        let summary = event_summary(email);
        let description = event_description(email);

        for date in &dates {
            if !seen.insert((summary.clone(), date.clone())) {
                debug!(summary = %summary, date = %date, "Duplicate event in this run");
                continue;
            }

            let day = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
            let draft = CalendarEventDraft::all_day(summary.clone(), description.clone(), day);
            let event = self.calendar.insert_event(&draft).await?;

            created_events_db::record_created_event(
                self.db_conn.clone(),
                &email.id,
                date,
                &summary,
                event.id.as_deref(),
            )
            .await?;

            report.events_created.push(event);
        }

        processed_db::mark_processed(self.db_conn.clone(), &email.id, dates.len()).await?;
        Ok(())
    }

    /// Run `sync_recent` every `interval` until shutdown
    pub async fn run_periodic(self: Arc<Self>, interval: Duration, query: String, max_emails: u32) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if self.is_shutting_down() {
                break;
            }
            if let Err(e) = self.sync_recent(&query, max_emails).await {
                warn!("Periodic email sync failed: {}", e);
            }
        }
    }
}

fn event_summary(email: &EmailMessage) -> String {
    email
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|subject| !subject.is_empty())
        .unwrap_or(DEFAULT_SUMMARY)
        .to_string()
}

fn event_description(email: &EmailMessage) -> Option<String> {
    email
        .body_text
        .as_deref()
        .filter(|body| !body.trim().is_empty())
        .map(|body| body.chars().take(MAX_DESCRIPTION_CHARS).collect())
}

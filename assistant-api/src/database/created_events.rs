use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::params;
use shared_types::CreatedEvent;

pub async fn record_created_event(
    conn: AsyncDbConnection,
    message_id: &str,
    event_date: &str,
    summary: &str,
    calendar_event_id: Option<&str>,
) -> Result<i64> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO created_events (message_id, event_date, summary, calendar_event_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id",
        params![message_id, event_date, summary, calendar_event_id, now],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn list_created_events(conn: AsyncDbConnection, limit: usize) -> Result<Vec<CreatedEvent>> {
    // SQLite treats a negative LIMIT as unbounded
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT id, message_id, event_date, summary, calendar_event_id, created_at
         FROM created_events
         ORDER BY event_date DESC, id DESC
         LIMIT ?1",
    )?;

    let events = stmt
        .query_map(params![limit], |row| {
            Ok(CreatedEvent {
                id: row.get(0)?,
                message_id: row.get(1)?,
                event_date: row.get(2)?,
                summary: row.get(3)?,
                calendar_event_id: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

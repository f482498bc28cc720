use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, OptionalExtension};

pub async fn is_processed(conn: AsyncDbConnection, message_id: &str) -> Result<bool> {
    let conn = conn.lock().await?;

    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM processed_emails WHERE message_id = ?1",
            params![message_id],
            |row| row.get(0),
        )
        .optional()?;

    Ok(found.is_some())
}

pub async fn mark_processed(
    conn: AsyncDbConnection,
    message_id: &str,
    dates_found: usize,
) -> Result<()> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO processed_emails (message_id, dates_found, processed_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (message_id) DO UPDATE SET dates_found = excluded.dates_found,
                                                processed_at = excluded.processed_at",
        params![message_id, dates_found as i64, now],
    )?;

    Ok(())
}

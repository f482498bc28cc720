use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Emails already scanned for dates, so a sync never handles one twice
    conn.execute(
        "CREATE TABLE IF NOT EXISTS processed_emails (
            message_id VARCHAR PRIMARY KEY,
            dates_found INTEGER NOT NULL DEFAULT 0,
            processed_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Calendar events inserted by the email sync
    conn.execute(
        "CREATE TABLE IF NOT EXISTS created_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            message_id VARCHAR NOT NULL,
            event_date VARCHAR NOT NULL,
            summary VARCHAR NOT NULL,
            calendar_event_id VARCHAR,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_created_events_message ON created_events (message_id)",
        [],
    )?;

    Ok(())
}

pub mod created_events;
pub mod migrations;
pub mod processed_emails;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AsyncDbConnection {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl AsyncDbConnection {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn lock(&self) -> anyhow::Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| anyhow::anyhow!("Failed to get DB connection from pool: {}", e))
    }
}

pub struct Database {
    pub async_connection: AsyncDbConnection,
}

impl Database {
    /// Open the database file and run migrations
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        // Ensure directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Migrate on a plain connection before the pool hands any out
        {
            let conn = Connection::open(db_path)?;
            migrations::run_migrations(&conn)?;
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(8).build(manager)?;

        Ok(Database {
            async_connection: AsyncDbConnection::new(pool),
        })
    }

    /// Cheap round trip used by the health check
    pub async fn ping(&self) -> bool {
        match self.async_connection.lock().await {
            Ok(conn) => conn
                .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .is_ok(),
            Err(_) => false,
        }
    }
}

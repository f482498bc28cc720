use std::path::PathBuf;

/// Directory for the database and the token file
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/smart-assistant`
/// - **Linux**: `~/.local/share/smart-assistant`
/// - **Windows**: `%LOCALAPPDATA%\smart-assistant`
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("smart-assistant"))
}

pub fn get_db_path() -> anyhow::Result<PathBuf> {
    Ok(get_data_dir()?.join("db.sqlite"))
}

pub fn get_token_path() -> anyhow::Result<PathBuf> {
    Ok(get_data_dir()?.join("token.json"))
}

/// Initialize the database connection
pub fn initialize_database() -> anyhow::Result<std::sync::Arc<crate::database::Database>> {
    let db_path = get_db_path()?;
    let db = crate::database::Database::new(&db_path)?;
    Ok(std::sync::Arc::new(db))
}

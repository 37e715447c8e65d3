use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use std::env;
use std::time::Duration;

use crate::error::CleanupError;

const DEFAULT_DATABASE: &str = "sr_robot";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
}

impl DatabaseConfig {
    /// Reads `MONGODB_URI` (or the older `MONGODB_URL`) and `MONGODB_DATABASE`.
    pub fn from_env() -> Result<Self, CleanupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CleanupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup("MONGODB_URI")
            .or_else(|| lookup("MONGODB_URL"))
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| CleanupError::Config("MONGODB_URI must be set".to_string()))?;

        let name = lookup("MONGODB_DATABASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        Ok(Self { uri, name })
    }
}

pub async fn connect(config: &DatabaseConfig) -> Result<Database, CleanupError> {
    let mut options = ClientOptions::parse(&config.uri).await?;
    options.app_name = Some("sr-robot-maintenance".to_string());
    options.connect_timeout = Some(CONNECT_TIMEOUT);
    options.server_selection_timeout = Some(CONNECT_TIMEOUT);

    let client = Client::with_options(options)?;
    let db = client.database(&config.name);

    // Fail on a bad URI before any query runs
    db.run_command(doc! { "ping": 1 }).await?;
    tracing::info!(database = %config.name, "Connected to MongoDB");

    Ok(db)
}

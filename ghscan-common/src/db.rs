//! PostgreSQL connection settings and pool initialization

use crate::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "github_scan";

/// Store connection parameters, resolved once at startup
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

// Password stays out of logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DatabaseConfig {
    /// Connection options with TLS disabled, matching a local scan database
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(sqlx::postgres::PgSslMode::Disable)
    }
}

/// Open the connection pool and verify the server answers
///
/// The pool is shared by the inventory and scan-results reads and by the
/// single result writer.
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool> {
    tracing::debug!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        "Connecting to database"
    );

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(config.connect_options())
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;

    tracing::info!(
        host = %config.host,
        database = %config.name,
        "Database connection established"
    );

    Ok(pool)
}

//! # Database Handle
//!
//! Opening, first-run preparation and closing of the SQLite store.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Lifecycle                                 │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings / template              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                           │
//! │       ├── file missing + template set? → copy template                 │
//! │       ├── open (create_if_missing)                                     │
//! │       └── ensure_schema()                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.items().add_item(..) / list_items()                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.close().await ← later calls fail with DbError::Closed              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pool defaults to a single connection: one exclusive writer, no
//! concurrent access to the same store.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::item::ItemRepository;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use grocer_db::DbConfig;
///
/// let config = DbConfig::new("/path/to/grocer.db")
///     .template_path("/opt/grocer/blank.db");
/// assert_eq!(config.max_connections, 1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 1 (single writer)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,

    /// Blank database copied into place on first run.
    /// Default: none (a fresh file is created)
    pub template_path: Option<PathBuf>,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
            template_path: None,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets the first-run template.
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
            template_path: None,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Constructed once at startup and handed to whatever needs storage; there
/// is no global connection.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Opens the database, preparing it first if needed.
    ///
    /// ## What This Does
    /// 1. Copies the template into place if the file is missing and a
    ///    template is configured
    /// 2. Opens the file, creating it if it doesn't exist
    ///    (WAL journal, NORMAL synchronous)
    /// 3. Runs migrations (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Preparation, connection or migration failed
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            if let Some(template) = &config.template_path {
                copy_template_if_missing(&config.database_path, template)?;
            }

            SqliteConnectOptions::new()
                .filename(&config.database_path)
                // Readers don't block the writer; better crash recovery
                .journal_mode(SqliteJournalMode::Wal)
                // Safe from corruption, may lose the last transaction on crash
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.ensure_schema().await?;
        }

        Ok(db)
    }

    /// Creates the `items` table if it does not already exist.
    ///
    /// Idempotent: safe to call on every startup, existing rows are kept.
    /// Called by `new()` unless `run_migrations` is off.
    pub async fn ensure_schema(&self) -> DbResult<()> {
        info!("Ensuring database schema");
        migrations::run_migrations(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by the repository.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the item repository.
    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    /// Closes the connection pool.
    ///
    /// After calling close, every repository operation fails with
    /// [`DbError::Closed`].
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Whether `close()` has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Copies the blank template to `database` unless a file is already there.
fn copy_template_if_missing(database: &Path, template: &Path) -> DbResult<()> {
    if database.exists() {
        return Ok(());
    }

    if !template.is_file() {
        return Err(DbError::ConnectionFailed(format!(
            "template database not found: {}",
            template.display()
        )));
    }

    if let Some(parent) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| DbError::ConnectionFailed(format!("{}: {e}", parent.display())))?;
    }

    std::fs::copy(template, database)
        .map_err(|e| DbError::ConnectionFailed(format!("copying template: {e}")))?;

    info!(
        template = %template.display(),
        path = %database.display(),
        "Copied template database"
    );
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(3)
            .run_migrations(false)
            .template_path("/tmp/blank.db");

        assert_eq!(config.max_connections, 3);
        assert!(!config.run_migrations);
        assert_eq!(config.template_path, Some(PathBuf::from("/tmp/blank.db")));
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_ensure_schema_twice() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();
        assert_eq!(db.items().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_close_is_reported() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(db.is_closed());
        assert!(!db.health_check().await);
        assert!(matches!(db.ensure_schema().await, Err(DbError::Closed)));
    }

    #[tokio::test]
    async fn test_first_run_creates_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grocer.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(path.exists());
        assert_eq!(db.items().count().await.unwrap(), 0);
        db.close().await;
    }

    #[tokio::test]
    async fn test_missing_template_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("grocer.db"))
            .template_path(dir.path().join("nope.db"));

        let err = Database::new(config).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_without_migrations_schema_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("grocer.db")).run_migrations(false);

        let db = Database::new(config).await.unwrap();
        assert!(matches!(
            db.items().list_items().await,
            Err(DbError::SchemaMissing(_))
        ));

        db.ensure_schema().await.unwrap();
        assert!(db.items().list_items().await.unwrap().is_empty());
        db.close().await;
    }
}

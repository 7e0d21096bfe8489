use sea_orm::DatabaseConnection;

use crate::config::DatabaseConfig;
use crate::database::init_db;

/// Fresh SQLite database in a temporary directory, schema applied.
pub(crate) async fn test_db() -> (DatabaseConnection, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display()),
        max_connections: 1,
        min_connections: 1,
    };
    let db = init_db(&config).await.unwrap();
    (db, dir)
}

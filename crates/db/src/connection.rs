use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use cartview_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Opens the cart database described by the `[database]` section.
///
/// Missing database files are created. Every connection runs in WAL mode and
/// waits up to `timeout_secs` on a locked database, the same bound used for
/// acquiring a pooled connection.
pub async fn connect(database: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let timeout = Duration::from_secs(database.timeout_secs.max(1));
    let options = SqliteConnectOptions::from_str(&database.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(timeout);

    SqlitePoolOptions::new()
        .max_connections(database.max_connections.max(1))
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;
    use tempfile::TempDir;

    use cartview_core::config::DatabaseConfig;

    use super::connect;

    #[tokio::test]
    async fn creates_missing_file_in_wal_mode_with_busy_timeout() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("cart.db");
        let database = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 2,
            timeout_secs: 7,
        };

        let pool = connect(&database).await.expect("connect");

        let journal_mode: String = sqlx::query("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .expect("journal mode")
            .get(0);
        let busy_timeout: i64 = sqlx::query("PRAGMA busy_timeout")
            .fetch_one(&pool)
            .await
            .expect("busy timeout")
            .get(0);

        assert!(path.exists());
        assert_eq!(journal_mode.to_lowercase(), "wal");
        assert_eq!(busy_timeout, 7_000);
    }

    #[tokio::test]
    async fn fails_when_the_parent_directory_is_missing() {
        let dir = TempDir::new().expect("tempdir");
        let database = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("absent/cart.db").display()),
            max_connections: 1,
            timeout_secs: 1,
        };

        assert!(connect(&database).await.is_err());
    }
}

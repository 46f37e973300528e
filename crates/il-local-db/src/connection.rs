//! Database connection management.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Shared handle to the SQLite database.
#[derive(Debug, Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Get the default database path based on the IL_HOME environment variable or platform defaults.
    ///
    /// Priority order:
    /// 1. IL_HOME environment variable (custom)
    /// 2. Platform-specific defaults:
    ///    - Linux: `${XDG_STATE_HOME:-~/.local/state}/instructor-led/state.db`
    ///    - macOS: `~/Library/Application Support/instructor-led/state.db`
    ///    - Windows: `%LOCALAPPDATA%\instructor-led\state.db`
    pub fn default_path() -> crate::Result<PathBuf> {
        if let Ok(il_home) = std::env::var("IL_HOME") {
            return Ok(PathBuf::from(il_home).join("state.db"));
        }

        #[cfg(target_os = "linux")]
        {
            let state_home = match std::env::var("XDG_STATE_HOME") {
                Ok(dir) => PathBuf::from(dir),
                Err(_) => home_dir()?.join(".local").join("state"),
            };
            Ok(state_home.join("instructor-led").join("state.db"))
        }

        #[cfg(target_os = "macos")]
        {
            Ok(home_dir()?
                .join("Library")
                .join("Application Support")
                .join("instructor-led")
                .join("state.db"))
        }

        #[cfg(target_os = "windows")]
        {
            let local_appdata = std::env::var("LOCALAPPDATA")
                .map_err(|_| crate::Error::generic("LOCALAPPDATA environment variable not set"))?;
            Ok(PathBuf::from(local_appdata).join("instructor-led").join("state.db"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            Ok(home_dir()?.join(".instructor-led").join("state.db"))
        }
    }

    /// Open a new database connection at the specified path.
    ///
    /// Missing parent directories and the database file itself are created.
    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> crate::Result<()> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        crate::migrations::MigrationManager::migrate(conn)?;
        Ok(())
    }

    /// Get a reference to the underlying connection.
    ///
    /// Callers that need more than one statement to be atomic should use
    /// [`Database::transaction`] instead.
    pub fn connection(&self) -> &Mutex<Connection> {
        &self.connection
    }

    /// Execute `f` inside an `IMMEDIATE` transaction, committing on success and
    /// rolling back on error.
    ///
    /// The write lock is taken when the transaction begins, so a
    /// read-then-conditionally-update sequence inside `f` cannot interleave with
    /// another writer.
    pub fn transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
        E: From<crate::Error>,
    {
        let conn = self.connection.lock().map_err(|e| {
            crate::Error::generic(format!("Failed to acquire database lock: {}", e))
        })?;

        let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Immediate)
            .map_err(crate::Error::from)?;
        match f(&tx) {
            Ok(result) => {
                tx.commit().map_err(crate::Error::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback() {
                    tracing::warn!(error = %rollback, "rollback failed after workflow error");
                }
                Err(e)
            }
        }
    }
}

fn home_dir() -> crate::Result<PathBuf> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| crate::Error::generic("HOME environment variable not set"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    #[test]
    fn transaction_commits_on_success() {
        let db = Database::open_in_memory().unwrap();
        db.transaction(|conn| -> crate::Result<()> {
            conn.execute(
                "INSERT INTO users (id, name, role) VALUES (?, ?, ?)",
                params!["u1", "Alice", "trainer"],
            )?;
            Ok(())
        })
        .unwrap();

        let conn = db.connection().lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn failed_rollback_keeps_the_original_error() {
        let db = Database::open_in_memory().unwrap();
        let result = db.transaction(|conn| -> crate::Result<()> {
            // End the transaction early so the rollback has nothing to undo.
            conn.execute_batch("ROLLBACK")?;
            Err(crate::Error::generic("workflow failed"))
        });
        match result {
            Err(crate::Error::Generic(message)) => assert_eq!(message, "workflow failed"),
            other => panic!("expected the workflow error, got {other:?}"),
        }
    }

    #[test]
    fn transaction_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();
        let result = db.transaction(|conn| -> crate::Result<()> {
            conn.execute(
                "INSERT INTO users (id, name, role) VALUES (?, ?, ?)",
                params!["u1", "Alice", "trainer"],
            )?;
            Err(crate::Error::generic("boom"))
        });
        assert!(result.is_err());

        let conn = db.connection().lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.db");
        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        drop(db);

        // Reopening an existing file keeps the schema version.
        let db = Database::open(&path).unwrap();
        let conn = db.connection().lock().unwrap();
        let version = crate::migrations::MigrationManager::current_version(&conn).unwrap();
        assert_eq!(version, Some(crate::SCHEMA_VERSION));
    }
}

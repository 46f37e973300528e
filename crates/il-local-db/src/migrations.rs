//! Database migration management.

use rusqlite::{params, Connection};

/// Database migration manager.
pub struct MigrationManager;

impl MigrationManager {
    /// Apply all pending migrations to the database.
    pub fn migrate(conn: &Connection) -> crate::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        let current_version = Self::current_version(conn)?.unwrap_or(0);
        if current_version > crate::SCHEMA_VERSION {
            return Err(crate::Error::migration(format!(
                "database schema version {} is newer than supported version {}",
                current_version,
                crate::SCHEMA_VERSION
            )));
        }

        if current_version < 1 {
            tracing::info!("applying schema migration 1");
            Self::apply_migration_1(conn)?;
        }

        Ok(())
    }

    /// Apply migration version 1 - users, roster, schedules, attendance and questions
    fn apply_migration_1(conn: &Connection) -> crate::Result<()> {
        conn.execute_batch(
            r#"
            -- Accounts for every role (admin, trainer, participant)
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL DEFAULT '',
                username TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                role TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S','now')),
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S','now'))
            );

            CREATE TABLE IF NOT EXISTS trainers (
                id TEXT PRIMARY KEY,
                phone_number TEXT,
                user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S','now')),
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S','now'))
            );

            -- The participant role (Basic, Advance, ...) selects the cohort weekday
            CREATE TABLE IF NOT EXISTS participants (
                id TEXT PRIMARY KEY,
                date_of_birth TEXT NOT NULL DEFAULT '',
                place_of_birth TEXT NOT NULL DEFAULT '',
                last_education TEXT NOT NULL DEFAULT '',
                user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                role TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S','now')),
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S','now'))
            );

            -- One row per session instance
            CREATE TABLE IF NOT EXISTS schedules (
                id TEXT PRIMARY KEY,
                activity TEXT NOT NULL,
                date TEXT NOT NULL,
                trainer_id TEXT NOT NULL REFERENCES trainers(id) ON DELETE RESTRICT,
                participant_id TEXT REFERENCES participants(id) ON DELETE SET NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S','now')),
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%S','now'))
            );

            -- Attendance placeholders, filled in once by the trainer
            CREATE TABLE IF NOT EXISTS absences (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                information TEXT NOT NULL DEFAULT '',
                absence_status TEXT NOT NULL DEFAULT '',
                absence_time TEXT,
                schedule_id TEXT NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
                trainer_id TEXT NOT NULL REFERENCES trainers(id) ON DELETE RESTRICT,
                participant_id TEXT NOT NULL REFERENCES participants(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(schedule_id, participant_id)
            );

            CREATE TABLE IF NOT EXISTS questions (
                id TEXT PRIMARY KEY,
                question TEXT NOT NULL,
                answer TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                participant_id TEXT NOT NULL REFERENCES participants(id) ON DELETE CASCADE,
                trainer_id TEXT REFERENCES trainers(id) ON DELETE SET NULL,
                schedule_id TEXT NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Proof-of-activity uploads; the bytes live outside the database
            CREATE TABLE IF NOT EXISTS schedule_images (
                id TEXT PRIMARY KEY,
                schedule_id TEXT NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
                file_name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_schedules_trainer_date ON schedules(trainer_id, date);
            CREATE INDEX IF NOT EXISTS idx_schedules_participant ON schedules(participant_id);
            CREATE INDEX IF NOT EXISTS idx_schedules_date ON schedules(date);
            CREATE INDEX IF NOT EXISTS idx_questions_schedule_participant ON questions(schedule_id, participant_id);
            CREATE INDEX IF NOT EXISTS idx_questions_trainer ON questions(trainer_id);

            INSERT OR REPLACE INTO schema_migrations (version) VALUES (1);
            "#,
        )?;

        Ok(())
    }

    /// Get the current schema version.
    pub fn current_version(conn: &Connection) -> crate::Result<Option<u32>> {
        let mut stmt = conn.prepare("SELECT MAX(version) FROM schema_migrations")?;
        let version: Option<u32> = stmt.query_row(params![], |row| row.get(0))?;
        Ok(version)
    }
}

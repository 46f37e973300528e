//! Database models and persistence operations.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// Generate a new primary key for any table.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Database model for users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub address: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            username: row.get(3)?,
            address: row.get(4)?,
            role: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

/// Database model for trainers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerRecord {
    pub id: String,
    pub phone_number: Option<String>,
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TrainerRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            phone_number: row.get(1)?,
            user_id: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

/// Database model for participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: String,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub last_education: String,
    pub user_id: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ParticipantRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date_of_birth: row.get(1)?,
            place_of_birth: row.get(2)?,
            last_education: row.get(3)?,
            user_id: row.get(4)?,
            role: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

/// Database model for schedules (one row per session instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: String,
    pub activity: String,
    pub date: NaiveDate,
    pub trainer_id: String,
    pub participant_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ScheduleRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            activity: row.get(1)?,
            date: row.get(2)?,
            trainer_id: row.get(3)?,
            participant_id: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    /// Day of week of the session, derived from its date.
    pub fn weekday(&self) -> chrono::Weekday {
        chrono::Datelike::weekday(&self.date)
    }
}

/// Database model for attendance (absence) rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    pub id: String,
    pub date: NaiveDate,
    pub information: String,
    pub status: String,
    pub absence_time: Option<NaiveDateTime>,
    pub schedule_id: String,
    pub trainer_id: String,
    pub participant_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AbsenceRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            information: row.get(2)?,
            status: row.get(3)?,
            absence_time: row.get(4)?,
            schedule_id: row.get(5)?,
            trainer_id: row.get(6)?,
            participant_id: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

/// Database model for questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub status: String,
    pub participant_id: String,
    pub trainer_id: Option<String>,
    pub schedule_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl QuestionRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            status: row.get(3)?,
            participant_id: row.get(4)?,
            trainer_id: row.get(5)?,
            schedule_id: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

/// Database model for proof-of-activity images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleImageRecord {
    pub id: String,
    pub schedule_id: String,
    pub file_name: String,
    pub created_at: NaiveDateTime,
}

const USER_COLUMNS: &str = "id, name, email, username, address, role, created_at, updated_at";
const TRAINER_COLUMNS: &str = "id, phone_number, user_id, created_at, updated_at";
const PARTICIPANT_COLUMNS: &str =
    "id, date_of_birth, place_of_birth, last_education, user_id, role, created_at, updated_at";
const SCHEDULE_COLUMNS: &str =
    "id, activity, date, trainer_id, participant_id, created_at, updated_at";
const ABSENCE_COLUMNS: &str = "id, date, information, absence_status, absence_time, schedule_id, trainer_id, participant_id, created_at, updated_at";
const QUESTION_COLUMNS: &str =
    "id, question, answer, status, participant_id, trainer_id, schedule_id, created_at, updated_at";

/// Database operations for users.
pub struct UserStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, record: &UserRecord) -> crate::Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO users (id, name, email, username, address, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.id,
                record.name,
                record.email,
                record.username,
                record.address,
                record.role,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> crate::Result<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        Ok(self
            .conn
            .query_row(&sql, params![id], UserRecord::from_row)
            .optional()?)
    }

    /// Oldest user carrying `name`.
    pub fn id_by_name(&self, name: &str) -> crate::Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id FROM users WHERE name = ? ORDER BY created_at ASC, rowid ASC LIMIT 1",
                params![name],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Overwrite every mutable column of the user in one statement.
    pub fn update(&self, record: &UserRecord) -> crate::Result<usize> {
        Ok(self.conn.execute(
            r#"
            UPDATE users
            SET name = ?, email = ?, username = ?, address = ?, role = ?, updated_at = ?
            WHERE id = ?
            "#,
            params![
                record.name,
                record.email,
                record.username,
                record.address,
                record.role,
                record.updated_at,
                record.id
            ],
        )?)
    }
}

/// Database operations for trainers.
pub struct TrainerStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> TrainerStore<'a> {
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, record: &TrainerRecord) -> crate::Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO trainers (id, phone_number, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                record.id,
                record.phone_number,
                record.user_id,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> crate::Result<Option<TrainerRecord>> {
        let sql = format!("SELECT {TRAINER_COLUMNS} FROM trainers WHERE id = ?");
        Ok(self
            .conn
            .query_row(&sql, params![id], TrainerRecord::from_row)
            .optional()?)
    }

    pub fn get_by_user_id(&self, user_id: &str) -> crate::Result<Option<TrainerRecord>> {
        let sql = format!("SELECT {TRAINER_COLUMNS} FROM trainers WHERE user_id = ?");
        Ok(self
            .conn
            .query_row(&sql, params![user_id], TrainerRecord::from_row)
            .optional()?)
    }
}

/// Database operations for participants.
pub struct ParticipantStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> ParticipantStore<'a> {
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, record: &ParticipantRecord) -> crate::Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO participants (id, date_of_birth, place_of_birth, last_education, user_id, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.id,
                record.date_of_birth,
                record.place_of_birth,
                record.last_education,
                record.user_id,
                record.role,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> crate::Result<Option<ParticipantRecord>> {
        let sql = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?");
        Ok(self
            .conn
            .query_row(&sql, params![id], ParticipantRecord::from_row)
            .optional()?)
    }

    pub fn get_by_user_id(&self, user_id: &str) -> crate::Result<Option<ParticipantRecord>> {
        let sql = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE user_id = ?");
        Ok(self
            .conn
            .query_row(&sql, params![user_id], ParticipantRecord::from_row)
            .optional()?)
    }

    /// `(id, role)` of every participant, oldest first.
    pub fn list_ids_and_roles(&self) -> crate::Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, role FROM participants ORDER BY created_at ASC, rowid ASC")?;
        let rows = stmt.query_map(params![], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Overwrite every mutable column of the participant in one statement.
    pub fn update(&self, record: &ParticipantRecord) -> crate::Result<usize> {
        Ok(self.conn.execute(
            r#"
            UPDATE participants
            SET date_of_birth = ?, place_of_birth = ?, last_education = ?, role = ?, updated_at = ?
            WHERE id = ?
            "#,
            params![
                record.date_of_birth,
                record.place_of_birth,
                record.last_education,
                record.role,
                record.updated_at,
                record.id
            ],
        )?)
    }
}

/// Database operations for schedules.
pub struct ScheduleStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> ScheduleStore<'a> {
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, record: &ScheduleRecord) -> crate::Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO schedules (id, activity, date, trainer_id, participant_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.id,
                record.activity,
                record.date,
                record.trainer_id,
                record.participant_id,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> crate::Result<Option<ScheduleRecord>> {
        let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ?");
        Ok(self
            .conn
            .query_row(&sql, params![id], ScheduleRecord::from_row)
            .optional()?)
    }

    fn ids(&self, sql: &str, param: &dyn rusqlite::ToSql) -> crate::Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([param], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn records(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> crate::Result<Vec<ScheduleRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, ScheduleRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Every schedule id assigned to the trainer, in date order.
    pub fn ids_by_trainer(&self, trainer_id: &str) -> crate::Result<Vec<String>> {
        self.ids(
            "SELECT id FROM schedules WHERE trainer_id = ? ORDER BY date ASC, rowid ASC",
            &trainer_id,
        )
    }

    /// Every schedule id bound to the participant, in date order.
    pub fn ids_by_participant(&self, participant_id: &str) -> crate::Result<Vec<String>> {
        self.ids(
            "SELECT id FROM schedules WHERE participant_id = ? ORDER BY date ASC, rowid ASC",
            &participant_id,
        )
    }

    /// Schedule ids whose date falls on `weekday` (0 = Sunday .. 6 = Saturday), date ascending.
    pub fn ids_by_weekday(&self, weekday: u32) -> crate::Result<Vec<String>> {
        self.ids(
            "SELECT id FROM schedules WHERE CAST(strftime('%w', date) AS INTEGER) = ? ORDER BY date ASC, rowid ASC",
            &weekday,
        )
    }

    /// Dates of the schedules returned by [`ScheduleStore::ids_by_weekday`], in the same order.
    pub fn dates_by_weekday(&self, weekday: u32) -> crate::Result<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT date FROM schedules WHERE CAST(strftime('%w', date) AS INTEGER) = ? ORDER BY date ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![weekday], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn date_by_id(&self, id: &str) -> crate::Result<Option<NaiveDate>> {
        Ok(self
            .conn
            .query_row(
                "SELECT date FROM schedules WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Every schedule id dated `date`, across all trainers.
    pub fn ids_by_date(&self, date: NaiveDate) -> crate::Result<Vec<String>> {
        self.ids(
            "SELECT id FROM schedules WHERE date = ? ORDER BY rowid ASC",
            &date,
        )
    }

    /// The trainer's `limit` latest schedules, newest first.
    pub fn recent_by_trainer(
        &self,
        trainer_id: &str,
        limit: u32,
    ) -> crate::Result<Vec<ScheduleRecord>> {
        let sql = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE trainer_id = ? ORDER BY date DESC, rowid DESC LIMIT ?"
        );
        self.records(&sql, &[&trainer_id, &limit])
    }

    /// Point every schedule on `weekday` at `trainer_id` and return the updated rows.
    pub fn reassign_weekday(
        &self,
        trainer_id: &str,
        weekday: u32,
        updated_at: NaiveDateTime,
    ) -> crate::Result<Vec<ScheduleRecord>> {
        self.conn.execute(
            r#"
            UPDATE schedules
            SET trainer_id = ?, updated_at = ?
            WHERE CAST(strftime('%w', date) AS INTEGER) = ?
            "#,
            params![trainer_id, updated_at, weekday],
        )?;
        let sql = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE CAST(strftime('%w', date) AS INTEGER) = ? ORDER BY date ASC, rowid ASC"
        );
        self.records(&sql, &[&weekday])
    }

    pub fn delete_by_date(&self, date: NaiveDate) -> crate::Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM schedules WHERE date = ?", params![date])?)
    }
}

/// Database operations for attendance rows.
pub struct AbsenceStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> AbsenceStore<'a> {
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Insert an empty attendance row unless one already exists for the
    /// `(schedule, participant)` pair. Returns whether a row was created.
    pub fn insert_placeholder(
        &self,
        date: NaiveDate,
        schedule_id: &str,
        trainer_id: &str,
        participant_id: &str,
        created_at: NaiveDateTime,
    ) -> crate::Result<bool> {
        let changed = self.conn.execute(
            r#"
            INSERT OR IGNORE INTO absences (id, date, schedule_id, trainer_id, participant_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                new_id(),
                date,
                schedule_id,
                trainer_id,
                participant_id,
                created_at,
                created_at
            ],
        )?;
        Ok(changed == 1)
    }

    pub fn get_by_schedule_and_participant(
        &self,
        schedule_id: &str,
        participant_id: &str,
    ) -> crate::Result<Option<AbsenceRecord>> {
        let sql = format!(
            "SELECT {ABSENCE_COLUMNS} FROM absences WHERE schedule_id = ? AND participant_id = ?"
        );
        Ok(self
            .conn
            .query_row(&sql, params![schedule_id, participant_id], AbsenceRecord::from_row)
            .optional()?)
    }

    pub fn list_by_schedule(&self, schedule_id: &str) -> crate::Result<Vec<AbsenceRecord>> {
        let sql = format!(
            "SELECT {ABSENCE_COLUMNS} FROM absences WHERE schedule_id = ? ORDER BY created_at ASC, rowid ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![schedule_id], AbsenceRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn list_by_participant(&self, participant_id: &str) -> crate::Result<Vec<AbsenceRecord>> {
        let sql = format!(
            "SELECT {ABSENCE_COLUMNS} FROM absences WHERE participant_id = ? ORDER BY date ASC, rowid ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![participant_id], AbsenceRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Fill in the outcome of an existing row. Never inserts; returns the
    /// number of rows touched.
    pub fn record_outcome(
        &self,
        schedule_id: &str,
        participant_id: &str,
        information: &str,
        status: &str,
        absence_time: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> crate::Result<usize> {
        Ok(self.conn.execute(
            r#"
            UPDATE absences
            SET information = ?, absence_status = ?, absence_time = ?, updated_at = ?
            WHERE schedule_id = ? AND participant_id = ?
            "#,
            params![
                information,
                status,
                absence_time,
                updated_at,
                schedule_id,
                participant_id
            ],
        )?)
    }
}

/// Database operations for questions.
pub struct QuestionStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> QuestionStore<'a> {
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, record: &QuestionRecord) -> crate::Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO questions (id, question, answer, status, participant_id, trainer_id, schedule_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.id,
                record.question,
                record.answer,
                record.status,
                record.participant_id,
                record.trainer_id,
                record.schedule_id,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> crate::Result<Option<QuestionRecord>> {
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?");
        Ok(self
            .conn
            .query_row(&sql, params![id], QuestionRecord::from_row)
            .optional()?)
    }

    /// Questions a participant asked in one session, oldest first.
    pub fn list_by_schedule_and_participant(
        &self,
        schedule_id: &str,
        participant_id: &str,
    ) -> crate::Result<Vec<QuestionRecord>> {
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE schedule_id = ? AND participant_id = ? ORDER BY created_at ASC, rowid ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![schedule_id, participant_id], QuestionRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn list_by_trainer(&self, trainer_id: &str) -> crate::Result<Vec<QuestionRecord>> {
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE trainer_id = ? ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![trainer_id], QuestionRecord::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Store the trainer's answer on one question; returns the number of rows touched.
    pub fn answer(
        &self,
        id: &str,
        answer: &str,
        status: &str,
        trainer_id: &str,
        updated_at: NaiveDateTime,
    ) -> crate::Result<usize> {
        Ok(self.conn.execute(
            r#"
            UPDATE questions
            SET answer = ?, status = ?, trainer_id = ?, updated_at = ?
            WHERE id = ?
            "#,
            params![answer, status, trainer_id, updated_at, id],
        )?)
    }
}

/// Database operations for proof-of-activity images.
pub struct ScheduleImageStore<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> ScheduleImageStore<'a> {
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, record: &ScheduleImageRecord) -> crate::Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO schedule_images (id, schedule_id, file_name, created_at)
            VALUES (?, ?, ?, ?)
            "#,
            params![
                record.id,
                record.schedule_id,
                record.file_name,
                record.created_at
            ],
        )?;
        Ok(())
    }
}

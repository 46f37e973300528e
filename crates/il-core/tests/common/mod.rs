//! Shared fixtures for the workflow integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use il_api_contract::{Principal, Role};
use il_core::{Config, FixedClock, RequestContext, Workflows};
use il_local_db::{
    new_id, Database, ParticipantRecord, ParticipantStore, ScheduleRecord, ScheduleStore,
    TrainerRecord, TrainerStore, UserRecord, UserStore,
};
use rusqlite::Connection;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stamp() -> NaiveDateTime {
    date(2024, 1, 1).and_hms_opt(9, 0, 0).unwrap()
}

/// Seeded identities: (user id, trainer or participant id).
#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: String,
    pub id: String,
}

impl Member {
    pub fn as_trainer(&self) -> RequestContext {
        RequestContext::new(Principal::new(self.user_id.clone(), Role::Trainer))
    }

    pub fn as_participant(&self) -> RequestContext {
        RequestContext::new(Principal::new(self.user_id.clone(), Role::Participant))
    }
}

pub fn admin() -> RequestContext {
    RequestContext::new(Principal::new("admin-1", Role::Admin))
}

pub fn workflows_at(day: NaiveDate, hour: u32, minute: u32) -> Workflows {
    let db = Database::open_in_memory().unwrap();
    Workflows::new(
        db,
        Arc::new(FixedClock::at(day, hour, minute)),
        &Config::default(),
    )
    .unwrap()
}

/// Same database, different clock.
pub fn with_clock(db_owner: &Workflows, day: NaiveDate, hour: u32, minute: u32) -> Workflows {
    db_owner.at_clock(Arc::new(FixedClock::at(day, hour, minute)))
}

pub fn seed<T>(wf: &Workflows, f: impl FnOnce(&Connection) -> T) -> T {
    let conn = wf.database().connection().lock().unwrap();
    f(&conn)
}

pub fn count(wf: &Workflows, table: &str) -> i64 {
    seed(wf, |conn| {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    })
}

fn user(conn: &Connection, name: &str, role: &str) -> String {
    let id = new_id();
    UserStore::new(conn)
        .insert(&UserRecord {
            id: id.clone(),
            name: name.to_string(),
            email: String::new(),
            username: name.to_lowercase(),
            address: String::new(),
            role: role.to_string(),
            created_at: stamp(),
            updated_at: stamp(),
        })
        .unwrap();
    id
}

pub fn trainer(conn: &Connection, name: &str) -> Member {
    let user_id = user(conn, name, "trainer");
    let id = new_id();
    TrainerStore::new(conn)
        .insert(&TrainerRecord {
            id: id.clone(),
            phone_number: Some("555-0100".to_string()),
            user_id: user_id.clone(),
            created_at: stamp(),
            updated_at: stamp(),
        })
        .unwrap();
    Member { user_id, id }
}

pub fn participant(conn: &Connection, name: &str, cohort: &str) -> Member {
    let user_id = user(conn, name, "participant");
    let id = new_id();
    ParticipantStore::new(conn)
        .insert(&ParticipantRecord {
            id: id.clone(),
            date_of_birth: "2000-01-01".to_string(),
            place_of_birth: "Jakarta".to_string(),
            last_education: "High school".to_string(),
            user_id: user_id.clone(),
            role: cohort.to_string(),
            created_at: stamp(),
            updated_at: stamp(),
        })
        .unwrap();
    Member { user_id, id }
}

pub fn schedule(
    conn: &Connection,
    trainer_id: &str,
    on: NaiveDate,
    participant_id: Option<&str>,
) -> String {
    let id = new_id();
    ScheduleStore::new(conn)
        .insert(&ScheduleRecord {
            id: id.clone(),
            activity: format!("Session {on}"),
            date: on,
            trainer_id: trainer_id.to_string(),
            participant_id: participant_id.map(str::to_string),
            created_at: stamp(),
            updated_at: stamp(),
        })
        .unwrap();
    id
}

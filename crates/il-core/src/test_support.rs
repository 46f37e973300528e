use chrono::{NaiveDate, NaiveDateTime};
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

pub fn with_conn<T>(db: &Database, f: impl FnOnce(&Connection) -> T) -> T {
    let conn = db.connection().lock().unwrap();
    f(&conn)
}

pub fn user(conn: &Connection, name: &str, role: &str) -> String {
    let id = new_id();
    UserStore::new(conn)
        .insert(&UserRecord {
            id: id.clone(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            username: name.to_lowercase(),
            address: String::new(),
            role: role.to_string(),
            created_at: stamp(),
            updated_at: stamp(),
        })
        .unwrap();
    id
}

pub fn trainer(conn: &Connection, name: &str) -> String {
    let user_id = user(conn, name, "trainer");
    let id = new_id();
    TrainerStore::new(conn)
        .insert(&TrainerRecord {
            id: id.clone(),
            phone_number: None,
            user_id,
            created_at: stamp(),
            updated_at: stamp(),
        })
        .unwrap();
    id
}

pub fn participant(conn: &Connection, name: &str, cohort: &str) -> String {
    let user_id = user(conn, name, "participant");
    let id = new_id();
    ParticipantStore::new(conn)
        .insert(&ParticipantRecord {
            id: id.clone(),
            date_of_birth: String::new(),
            place_of_birth: String::new(),
            last_education: String::new(),
            user_id,
            role: cohort.to_string(),
            created_at: stamp(),
            updated_at: stamp(),
        })
        .unwrap();
    id
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
            activity: "Session".to_string(),
            date: on,
            trainer_id: trainer_id.to_string(),
            participant_id: participant_id.map(str::to_string),
            created_at: stamp(),
            updated_at: stamp(),
        })
        .unwrap();
    id
}

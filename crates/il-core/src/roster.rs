//! Roster: translating user accounts to trainer/participant identities and
//! applying partial profile updates.

use chrono::NaiveDateTime;
use il_api_contract::{ParticipantPatch, UserPatch};
use il_local_db::{
    ParticipantRecord, ParticipantStore, TrainerRecord, TrainerStore, UserRecord, UserStore,
};
use rusqlite::Connection;
use tracing::info;

use crate::{Error, Result};

pub struct Roster<'a> {
    users: UserStore<'a>,
    trainers: TrainerStore<'a>,
    participants: ParticipantStore<'a>,
}

impl<'a> Roster<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            users: UserStore::new(conn),
            trainers: TrainerStore::new(conn),
            participants: ParticipantStore::new(conn),
        }
    }

    pub fn user_id_by_name(&self, name: &str) -> Result<String> {
        self.users
            .id_by_name(name)?
            .ok_or_else(|| Error::not_found(format!("user named {name:?}")))
    }

    pub fn trainer_by_user_id(&self, user_id: &str) -> Result<TrainerRecord> {
        self.trainers
            .get_by_user_id(user_id)?
            .ok_or_else(|| Error::not_found(format!("trainer for user {user_id}")))
    }

    pub fn participant_by_user_id(&self, user_id: &str) -> Result<ParticipantRecord> {
        self.participants
            .get_by_user_id(user_id)?
            .ok_or_else(|| Error::not_found(format!("participant for user {user_id}")))
    }

    pub fn participant_by_name(&self, name: &str) -> Result<ParticipantRecord> {
        let user_id = self.user_id_by_name(name)?;
        self.participant_by_user_id(&user_id)
    }

    pub fn trainer(&self, trainer_id: &str) -> Result<TrainerRecord> {
        self.trainers
            .get(trainer_id)?
            .ok_or_else(|| Error::not_found(format!("trainer {trainer_id}")))
    }

    pub fn participant(&self, participant_id: &str) -> Result<ParticipantRecord> {
        self.participants
            .get(participant_id)?
            .ok_or_else(|| Error::not_found(format!("participant {participant_id}")))
    }

    pub fn update_participant(
        &self,
        participant_id: &str,
        patch: &ParticipantPatch,
        now: NaiveDateTime,
    ) -> Result<ParticipantRecord> {
        let existing = self.participant(participant_id)?;
        let mut merged = merge_participant(&existing, patch);
        merged.updated_at = now;
        self.participants.update(&merged)?;
        info!(participant_id, "Updated participant profile");
        Ok(merged)
    }

    pub fn update_user(
        &self,
        user_id: &str,
        patch: &UserPatch,
        now: NaiveDateTime,
    ) -> Result<UserRecord> {
        let existing = self
            .users
            .get(user_id)?
            .ok_or_else(|| Error::not_found(format!("user {user_id}")))?;
        let mut merged = merge_user(&existing, patch);
        merged.updated_at = now;
        self.users.update(&merged)?;
        info!(user_id, "Updated user account");
        Ok(merged)
    }
}

fn pick(current: &str, patch: Option<&String>) -> String {
    match patch.map(|value| value.trim()) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => current.to_string(),
    }
}

/// Field-by-field merge; absent or blank patch fields keep the stored value.
pub fn merge_participant(existing: &ParticipantRecord, patch: &ParticipantPatch) -> ParticipantRecord {
    ParticipantRecord {
        date_of_birth: pick(&existing.date_of_birth, patch.date_of_birth.as_ref()),
        place_of_birth: pick(&existing.place_of_birth, patch.place_of_birth.as_ref()),
        last_education: pick(&existing.last_education, patch.last_education.as_ref()),
        role: pick(&existing.role, patch.role.as_ref()),
        ..existing.clone()
    }
}

/// Field-by-field merge; absent or blank patch fields keep the stored value.
pub fn merge_user(existing: &UserRecord, patch: &UserPatch) -> UserRecord {
    UserRecord {
        name: pick(&existing.name, patch.name.as_ref()),
        email: pick(&existing.email, patch.email.as_ref()),
        username: pick(&existing.username, patch.username.as_ref()),
        address: pick(&existing.address, patch.address.as_ref()),
        role: patch
            .role
            .map(|role| role.to_string())
            .unwrap_or_else(|| existing.role.clone()),
        ..existing.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use il_api_contract::Role;
    use il_local_db::Database;

    #[test]
    fn blank_patch_fields_keep_existing_values() {
        let db = Database::open_in_memory().unwrap();
        with_conn(&db, |conn| {
            let id = participant(conn, "Dan", "Basic");
            let roster = Roster::new(conn);
            let now = date(2024, 3, 11).and_hms_opt(12, 0, 0).unwrap();

            let patch = ParticipantPatch {
                place_of_birth: Some("Bandung".to_string()),
                role: Some("  ".to_string()),
                ..Default::default()
            };
            let updated = roster.update_participant(&id, &patch, now).unwrap();
            assert_eq!(updated.place_of_birth, "Bandung");
            assert_eq!(updated.role, "Basic");

            let stored = roster.participant(&id).unwrap();
            assert_eq!(stored.place_of_birth, "Bandung");
            assert_eq!(stored.updated_at, now);
        });
    }

    #[test]
    fn user_patch_can_change_role() {
        let db = Database::open_in_memory().unwrap();
        with_conn(&db, |conn| {
            let id = user(conn, "Frank", "participant");
            let roster = Roster::new(conn);
            let now = date(2024, 3, 11).and_hms_opt(12, 0, 0).unwrap();

            let patch = UserPatch {
                role: Some(Role::Trainer),
                email: Some(String::new()),
                ..Default::default()
            };
            let updated = roster.update_user(&id, &patch, now).unwrap();
            assert_eq!(updated.role, "trainer");
            assert_eq!(updated.email, "frank@example.com");
        });
    }

    #[test]
    fn name_lookup_reaches_participant() {
        let db = Database::open_in_memory().unwrap();
        with_conn(&db, |conn| {
            let id = participant(conn, "Grace", "Advance");
            let roster = Roster::new(conn);
            assert_eq!(roster.participant_by_name("Grace").unwrap().id, id);
            assert!(matches!(
                roster.participant_by_name("Nobody"),
                Err(Error::NotFound { .. })
            ));
        });
    }
}

//! Role gating, cancellation and schedule administration through the facade.

mod common;

use chrono::Weekday;
use common::*;
use il_api_contract::{ParticipantPatch, Principal, QuestionDraft, Role, ScheduleDraft};
use il_core::{Cancellation, Error, RequestContext};
use tokio_util::sync::CancellationToken;

#[test]
fn roles_are_enforced_before_any_work() {
    let wf = workflows_at(date(2024, 3, 11), 9, 0);
    let (alice, dan) = seed(&wf, |conn| {
        let alice = trainer(conn, "Alice");
        let dan = participant(conn, "Dan", "Basic");
        schedule(conn, &alice.id, date(2024, 3, 11), Some(&dan.id));
        (alice, dan)
    });

    assert!(matches!(
        wf.start_attendance(&alice.as_trainer(), "Alice"),
        Err(Error::Forbidden { required: Role::Admin, actual: Role::Trainer })
    ));
    assert!(matches!(
        wf.attendance_summary(&dan.as_participant()),
        Err(Error::Forbidden { .. })
    ));
    let draft = QuestionDraft {
        question: "Hello?".to_string(),
        schedule_id: None,
    };
    assert!(matches!(
        wf.ask_question(&alice.as_trainer(), &draft),
        Err(Error::Forbidden { .. })
    ));
    assert_eq!(count(&wf, "absences"), 0);
}

#[test]
fn principal_without_trainer_profile_is_not_found() {
    let wf = workflows_at(date(2024, 3, 11), 9, 0);
    let stranger = RequestContext::new(Principal::new("no-such-user", Role::Trainer));
    assert!(matches!(
        wf.attendance_summary(&stranger),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn cancelled_request_rolls_back() {
    let wf = workflows_at(date(2024, 3, 11), 9, 0);
    seed(&wf, |conn| {
        let alice = trainer(conn, "Alice");
        participant(conn, "Dan", "Basic");
        participant(conn, "Eve", "Basic");
        schedule(conn, &alice.id, date(2024, 3, 11), None);
    });

    let token = CancellationToken::new();
    token.cancel();
    let ctx = admin().with_cancellation(Cancellation::new(token));
    assert!(matches!(
        wf.start_attendance(&ctx, "Alice"),
        Err(Error::Cancelled)
    ));
    assert_eq!(count(&wf, "absences"), 0);
}

#[test]
fn admin_manages_schedules() {
    let wf = workflows_at(date(2024, 3, 1), 9, 0);
    let (alice, bob, dan) = seed(&wf, |conn| {
        (
            trainer(conn, "Alice"),
            trainer(conn, "Bob"),
            participant(conn, "Dan", "Basic"),
        )
    });

    let monday = wf
        .create_schedule(
            &admin(),
            &ScheduleDraft {
                activity: "Intro".to_string(),
                date: date(2024, 3, 4),
                trainer_id: alice.id.clone(),
                participant_id: Some(dan.id.clone()),
            },
        )
        .unwrap();
    wf.create_schedule(
        &admin(),
        &ScheduleDraft {
            activity: "Review".to_string(),
            date: date(2024, 3, 11),
            trainer_id: alice.id.clone(),
            participant_id: None,
        },
    )
    .unwrap();
    assert_eq!(monday.weekday(), Weekday::Mon);

    let unknown = ScheduleDraft {
        activity: "Ghost".to_string(),
        date: date(2024, 3, 5),
        trainer_id: "nobody".to_string(),
        participant_id: None,
    };
    assert!(matches!(
        wf.create_schedule(&admin(), &unknown),
        Err(Error::NotFound { .. })
    ));

    let reassigned = wf
        .assign_trainer_to_weekday(&admin(), &bob.id, Weekday::Mon)
        .unwrap();
    assert_eq!(reassigned.len(), 2);
    assert!(reassigned.iter().all(|s| s.trainer_id == bob.id));

    assert_eq!(wf.delete_schedules_on(&admin(), date(2024, 3, 4)).unwrap(), 1);
    assert_eq!(count(&wf, "schedules"), 1);
}

#[test]
fn admin_patches_participant_profile() {
    let wf = workflows_at(date(2024, 3, 1), 9, 0);
    let dan = seed(&wf, |conn| participant(conn, "Dan", "Basic"));

    let patch = ParticipantPatch {
        role: Some("Advance".to_string()),
        last_education: Some(String::new()),
        ..Default::default()
    };
    let updated = wf.update_participant(&admin(), &dan.id, &patch).unwrap();
    assert_eq!(updated.role, "Advance");
    assert_eq!(updated.last_education, "High school");
}

#[tokio::test]
async fn workflows_run_on_the_blocking_pool() {
    let wf = workflows_at(date(2024, 3, 11), 9, 0);
    let alice = seed(&wf, |conn| {
        let alice = trainer(conn, "Alice");
        participant(conn, "Dan", "Basic");
        schedule(conn, &alice.id, date(2024, 3, 11), None);
        alice
    });

    let batch = wf
        .spawn(|wf| wf.start_attendance(&admin(), "Alice"))
        .await
        .unwrap();
    assert_eq!(batch.created(), 1);

    let ctx = alice.as_trainer();
    let summary = wf
        .spawn(move |wf| wf.attendance_summary(&ctx))
        .await
        .unwrap();
    assert_eq!(summary.records.len(), 1);
}

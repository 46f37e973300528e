use chrono::{NaiveDate, NaiveDateTime};
use il_api_contract::Role;
use il_cli::{
    attendance::AttendanceCommands, question::QuestionCommands, schedule::ScheduleCommands, Cli,
    Commands, Parser,
};
use il_local_db::{
    new_id, Database, ScheduleRecord, ScheduleStore, TrainerRecord, TrainerStore, UserRecord,
    UserStore,
};

#[test]
fn test_cli_parsing_attendance_record() {
    let args = vec![
        "il",
        "--as",
        "user-1",
        "--role",
        "trainer",
        "attendance",
        "record",
        "participant-1",
        "--status",
        "Present",
    ];

    let cli = Cli::try_parse_from(args).unwrap();
    assert_eq!(cli.role, Some(Role::Trainer));
    match cli.command {
        Commands::Attendance {
            subcommand: AttendanceCommands::Record(args),
        } => {
            assert_eq!(args.participant_id, "participant-1");
            assert_eq!(args.status, "Present");
            assert_eq!(args.information, "");
        }
        _ => panic!("expected attendance record"),
    }
}

#[test]
fn test_cli_parsing_question_ask_for() {
    let args = vec![
        "il",
        "question",
        "ask-for",
        "participant-1",
        "--question",
        "What is a lifetime?",
        "--answer",
        "A region of code",
    ];

    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Commands::Question {
            subcommand: QuestionCommands::AskFor(args),
        } => assert_eq!(args.status, "Answered"),
        _ => panic!("expected question ask-for"),
    }
}

#[test]
fn test_cli_parsing_schedule_assign_weekday() {
    let args = vec![
        "il", "schedule", "assign", "--trainer", "t-1", "--weekday", "tuesday",
    ];

    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Commands::Schedule {
            subcommand: ScheduleCommands::Assign(args),
        } => assert_eq!(args.weekday, chrono::Weekday::Tue),
        _ => panic!("expected schedule assign"),
    }
}

#[test]
fn test_cli_rejects_unknown_role() {
    let args = vec!["il", "--role", "guest", "attendance", "summary"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_cli_parsing_pinned_clock() {
    let args = vec!["il", "--now", "2024-03-11 20:00:00", "upload", "class.png"];
    let cli = Cli::try_parse_from(args).unwrap();
    assert_eq!(
        cli.now,
        Some(NaiveDateTime::parse_from_str("2024-03-11 20:00:00", "%Y-%m-%d %H:%M:%S").unwrap())
    );
}

fn seed_trainer_with_sessions(path: &std::path::Path) -> String {
    let db = Database::open(path).unwrap();
    let conn = db.connection().lock().unwrap();
    let stamp = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    let user_id = new_id();
    UserStore::new(&conn)
        .insert(&UserRecord {
            id: user_id.clone(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            address: String::new(),
            role: "trainer".to_string(),
            created_at: stamp,
            updated_at: stamp,
        })
        .unwrap();
    let trainer_id = new_id();
    TrainerStore::new(&conn)
        .insert(&TrainerRecord {
            id: trainer_id.clone(),
            phone_number: None,
            user_id: user_id.clone(),
            created_at: stamp,
            updated_at: stamp,
        })
        .unwrap();
    for day in [10, 11] {
        ScheduleStore::new(&conn)
            .insert(&ScheduleRecord {
                id: format!("session-{day}"),
                activity: "Workshop".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                trainer_id: trainer_id.clone(),
                participant_id: None,
                created_at: stamp,
                updated_at: stamp,
            })
            .unwrap();
    }
    user_id
}

#[tokio::test]
async fn test_upload_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.db");
    let user_id = seed_trainer_with_sessions(&path);
    let db_arg = path.to_string_lossy().to_string();

    let cli = Cli::try_parse_from([
        "il",
        "--db",
        db_arg.as_str(),
        "--as",
        user_id.as_str(),
        "--role",
        "trainer",
        "--now",
        "2024-03-11 20:00:00",
        "upload",
        "class.jpg",
    ])
    .unwrap();
    let output = cli.execute().await.unwrap();
    assert_eq!(output["schedule_id"], "session-11");
    assert_eq!(output["file_name"], "class.jpg");

    let late = Cli::try_parse_from([
        "il",
        "--db",
        db_arg.as_str(),
        "--as",
        user_id.as_str(),
        "--role",
        "trainer",
        "--now",
        "2024-03-11 21:00:00",
        "upload",
        "class.jpg",
    ])
    .unwrap();
    let err = late.execute().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<il_core::Error>(),
        Some(il_core::Error::OutOfWindow { .. })
    ));
}

#[tokio::test]
async fn test_missing_identity_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.db");
    let db_arg = path.to_string_lossy().to_string();

    let cli = Cli::try_parse_from(["il", "--db", db_arg.as_str(), "attendance", "summary"]).unwrap();
    let err = cli.execute().await.unwrap_err();
    assert!(err.to_string().contains("--as"));
}

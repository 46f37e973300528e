//! Database schema definitions and constants.

// Current schema version
pub const SCHEMA_VERSION: u32 = 1;

// Table names
pub const TABLE_SCHEMA_MIGRATIONS: &str = "schema_migrations";
pub const TABLE_USERS: &str = "users";
pub const TABLE_TRAINERS: &str = "trainers";
pub const TABLE_PARTICIPANTS: &str = "participants";
pub const TABLE_SCHEDULES: &str = "schedules";
pub const TABLE_ABSENCES: &str = "absences";
pub const TABLE_QUESTIONS: &str = "questions";
pub const TABLE_SCHEDULE_IMAGES: &str = "schedule_images";

/// Every table created by the migrations.
pub const ALL_TABLES: [&str; 8] = [
    TABLE_SCHEMA_MIGRATIONS,
    TABLE_USERS,
    TABLE_TRAINERS,
    TABLE_PARTICIPANTS,
    TABLE_SCHEDULES,
    TABLE_ABSENCES,
    TABLE_QUESTIONS,
    TABLE_SCHEDULE_IMAGES,
];

/// Text format of `date` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

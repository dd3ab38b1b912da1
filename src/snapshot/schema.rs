/// Schema for the user snapshot file.
///
/// Uses CREATE TABLE IF NOT EXISTS for idempotent execution.
pub const USER_SNAPSHOT_SCHEMA: &str = r#"
-- Users table: one row per registered user, ids preserved across restarts
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    credential TEXT NOT NULL
);
"#;

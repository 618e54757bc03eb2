use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    id           TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    rating       INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    body         TEXT NOT NULL,
    name         TEXT NOT NULL,               -- 'Anonymous' when anonymous
    email        TEXT NOT NULL,               -- empty when anonymous
    role         TEXT,
    submitted_at TEXT NOT NULL
);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}

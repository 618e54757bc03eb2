//! v001 -- Initial schema creation.
//!
//! Creates the `users`, `items` and `reservations` tables.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users (profile + role attribute)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY NOT NULL,     -- opaque id from the auth provider
    email      TEXT NOT NULL,
    role       TEXT NOT NULL,                 -- donator | receiver | rider
    first_name TEXT,
    last_name  TEXT,
    verified   INTEGER NOT NULL DEFAULT 0,    -- boolean 0/1
    created_at TEXT NOT NULL                  -- RFC-3339
);

-- ----------------------------------------------------------------
-- Items (donation listings)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS items (
    id          TEXT PRIMARY KEY NOT NULL,    -- UUID v4
    donator_id  TEXT NOT NULL,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    latitude    REAL,
    longitude   REAL,
    image_ref   TEXT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_donator ON items(donator_id);
CREATE INDEX IF NOT EXISTS idx_items_created ON items(created_at DESC);

-- ----------------------------------------------------------------
-- Reservations
--
-- UNIQUE(item_id) is the conditional write behind reserve: a second
-- insert for the same item fails atomically.
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS reservations (
    id               TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    item_id          TEXT NOT NULL UNIQUE,       -- FK -> items(id)
    donator_id       TEXT NOT NULL,
    receiver_id      TEXT NOT NULL,
    rider_id         TEXT,
    item_name        TEXT NOT NULL,
    item_description TEXT NOT NULL,
    item_image_ref   TEXT,
    donator_lat      REAL,
    donator_lon      REAL,
    receiver_lat     REAL,
    receiver_lon     REAL,
    receiver_name    TEXT NOT NULL,
    receiver_contact TEXT NOT NULL,
    receiver_email   TEXT,
    receiver_message TEXT,
    reserved_at      TEXT NOT NULL,
    claimed_at       TEXT,
    completed_at     TEXT,

    CHECK (completed_at IS NULL OR rider_id IS NOT NULL),
    FOREIGN KEY (item_id) REFERENCES items(id)
);

CREATE INDEX IF NOT EXISTS idx_reservations_open
    ON reservations(reserved_at) WHERE rider_id IS NULL AND completed_at IS NULL;
CREATE INDEX IF NOT EXISTS idx_reservations_receiver ON reservations(receiver_id);
CREATE INDEX IF NOT EXISTS idx_reservations_rider ON reservations(rider_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}

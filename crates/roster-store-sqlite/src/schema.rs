//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. `PRAGMA foreign_keys` is per
//! connection, so it lives here rather than in a migration.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS contacts (
    id                         INTEGER PRIMARY KEY AUTOINCREMENT,
    prefix                     TEXT,
    first_name                 TEXT NOT NULL,
    last_name                  TEXT,
    email                      TEXT NOT NULL,
    contact_number             TEXT,
    alternative_contact_number TEXT,
    company_name               TEXT,
    job_title                  TEXT,
    notes                      TEXT,
    date_of_birth              TEXT,            -- YYYY-MM-DD
    created_on                 TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    updated_on                 TEXT
);

-- At most one address per contact.
CREATE TABLE IF NOT EXISTS addresses (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id INTEGER NOT NULL UNIQUE REFERENCES contacts(id) ON DELETE CASCADE,
    address1   TEXT,
    address2   TEXT,
    city       TEXT,
    state      TEXT,
    zip_code   TEXT,
    country    TEXT
);

CREATE TABLE IF NOT EXISTS emergency_contacts (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id   INTEGER NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    relationship TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    email        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS contacts_email_idx     ON contacts(email);
CREATE INDEX IF NOT EXISTS contacts_name_idx      ON contacts(first_name, last_name);
CREATE INDEX IF NOT EXISTS emergency_contact_idx  ON emergency_contacts(contact_id);

PRAGMA user_version = 1;
";

//! SQLite schema for the upriver exchange store
//!
//! The schema is intentionally minimal: it is the interface the
//! traversal engine requires, not a general data model.

use rusqlite::Connection;

/// Main store: exchange edges plus name tables.
const SCHEMA_SQL: &str = r#"
-- Exchange edges: process consumes provider's product through flow
CREATE TABLE IF NOT EXISTS exchanges (
    id TEXT PRIMARY KEY,
    process_id TEXT NOT NULL,
    flow_id TEXT NOT NULL,
    provider_id TEXT,
    value REAL,
    unit_id TEXT,
    gwp REAL,
    gwp_contribution REAL,
    is_input INTEGER NOT NULL DEFAULT 0,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    version TEXT NOT NULL,
    description TEXT
);
CREATE INDEX IF NOT EXISTS idx_exchanges_process ON exchanges(process_id, version);
CREATE INDEX IF NOT EXISTS idx_exchanges_provider ON exchanges(provider_id);

-- Display names, versioned like the edges
CREATE TABLE IF NOT EXISTS processes (
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    version TEXT NOT NULL,
    PRIMARY KEY (id, version)
);

CREATE TABLE IF NOT EXISTS flows (
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    version TEXT NOT NULL,
    PRIMARY KEY (id, version)
);

CREATE TABLE IF NOT EXISTS units (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);
"#;

/// Filter partition: maps exchange ids to material categories. Lives in
/// an independent store joined to the main one by exchange id only.
const FILTER_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS process_data (
    id TEXT PRIMARY KEY,
    process_id TEXT NOT NULL,
    category_id TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_process_data_process ON process_data(process_id, category_id);
"#;

/// Create the main store schema.
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// Create the filter partition schema.
pub fn create_filter_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(FILTER_SCHEMA_SQL)
}

//! Migration runner.

use anyhow::Result;
use rusqlite::Connection;

/// Schema migrations, applied in name order.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_create_alerts.sql",
    include_str!("../../migrations/001_create_alerts.sql"),
)];

/// Apply every migration not yet recorded in `_schema_migrations`.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _schema_migrations (name TEXT PRIMARY KEY)",
        [],
    )?;

    for (name, sql) in MIGRATIONS {
        let applied: bool = conn
            .query_row(
                "SELECT 1 FROM _schema_migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if applied {
            continue;
        }

        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO _schema_migrations (name) VALUES (?1)", [name])?;
        tracing::debug!(migration = name, "applied migration");
    }

    Ok(())
}

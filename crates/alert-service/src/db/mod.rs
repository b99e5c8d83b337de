//! Alert storage (SQLite).

mod migrations;

use anyhow::Result;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use shared::Alert;

pub use migrations::run_migrations;

/// Database connection wrapper.
pub struct Db(pub Mutex<Connection>);

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self(Mutex::new(conn)))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self(Mutex::new(Connection::open_in_memory()?)))
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn run_migrations(&self) -> Result<()> {
        run_migrations(&self.conn())
    }
}

fn alert_from_row(row: &Row<'_>) -> rusqlite::Result<Alert> {
    Ok(Alert {
        id: Some(row.get(0)?),
        alert: row.get(1)?,
        sent_by: Some(row.get(2)?),
        sent_at: row.get(3)?,
    })
}

/// Insert an alert and return the stored row.
pub fn create_alert(conn: &Connection, alert: &str, sent_by: &str, sent_at: &str) -> Result<Alert> {
    conn.execute(
        "INSERT INTO alerts (alert, sent_by, sent_at) VALUES (?1, ?2, ?3)",
        params![alert, sent_by, sent_at],
    )?;
    let id = conn.last_insert_rowid();
    get_alert(conn, id)?.ok_or_else(|| anyhow::anyhow!("alert {} vanished after insert", id))
}

/// All alerts in insertion order.
pub fn list_alerts(conn: &Connection) -> Result<Vec<Alert>> {
    let mut stmt = conn.prepare(
        "SELECT alert_id, alert, sent_by, sent_at FROM alerts ORDER BY alert_id ASC",
    )?;
    let rows = stmt.query_map([], alert_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Get alert by id.
pub fn get_alert(conn: &Connection, id: i64) -> Result<Option<Alert>> {
    let row = conn.query_row(
        "SELECT alert_id, alert, sent_by, sent_at FROM alerts WHERE alert_id = ?1",
        [id],
        alert_from_row,
    );
    match row {
        Ok(a) => Ok(Some(a)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

//! Schema bootstrap for the attendance store.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps.
//! - Bring any connection up to the latest step inside one transaction.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - Every step is written with `IF NOT EXISTS` or as an in-place rewrite, so
//!   databases created before version tracking (legacy `attendance.db` files)
//!   upgrade without failing.
//! - Attendance dates are canonical before the unique `(person_id, date)`
//!   index is created.

use crate::db::{DbError, DbResult};
use crate::model::attendance::AttendanceDate;
use log::{info, warn};
use rusqlite::{params, Connection, Transaction};
use std::collections::HashSet;

#[derive(Clone, Copy)]
enum SchemaChange {
    Sql(&'static str),
    Rust(fn(&Transaction<'_>) -> DbResult<()>),
}

#[derive(Clone, Copy)]
struct SchemaStep {
    version: u32,
    change: SchemaChange,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        change: SchemaChange::Sql(include_str!("0001_init.sql")),
    },
    SchemaStep {
        version: 2,
        change: SchemaChange::Rust(canonicalize_attendance_dates),
    },
    SchemaStep {
        version: 3,
        change: SchemaChange::Sql(include_str!("0003_attendance_unique_day.sql")),
    },
];

/// Returns the newest schema version this binary can create.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Creates the `people` and `attendance` tables when absent.
///
/// Safe to call on every startup: a second call on an up-to-date database is
/// a no-op and never touches stored rows.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file was written by a
///   newer build.
/// - [`DbError::Sqlite`] when a schema statement fails.
pub fn initialize_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let latest = latest_version();

    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }
    if found == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > found) {
        match step.change {
            SchemaChange::Sql(sql) => tx.execute_batch(sql)?,
            SchemaChange::Rust(apply) => apply(&tx)?,
        }
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    info!("event=schema_init module=db status=ok from_version={found} to_version={latest}");
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

/// Rewrites legacy dates such as `2024-1-10` to canonical `YYYY-MM-DD`.
///
/// Rows are visited in id order. When several rows name the same person and
/// the same day, the earliest (lowest id) is kept and the later ones are
/// deleted, matching the rule that the first mark for a day stands.
/// Dates that do not parse are left untouched.
fn canonicalize_attendance_dates(tx: &Transaction<'_>) -> DbResult<()> {
    let rows = {
        let mut stmt = tx.prepare("SELECT id, person_id, date FROM attendance ORDER BY id ASC;")?;
        let mapped = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;
        mapped.collect::<rusqlite::Result<Vec<_>>>()?
    };

    let mut seen_days: HashSet<(i64, String)> = HashSet::new();
    let mut rewritten = 0usize;
    let mut removed = 0usize;
    let mut unparsed = 0usize;

    for (id, person_id, raw_date) in rows {
        let Some(raw_date) = raw_date else {
            continue;
        };
        let date = match AttendanceDate::parse(&raw_date) {
            Some(date) => date.to_string(),
            None => {
                unparsed += 1;
                raw_date.clone()
            }
        };

        // NULL person ids never collide under the unique index.
        if let Some(person_id) = person_id {
            if !seen_days.insert((person_id, date.clone())) {
                tx.execute("DELETE FROM attendance WHERE id = ?1;", [id])?;
                removed += 1;
                continue;
            }
        }

        if date != raw_date {
            tx.execute(
                "UPDATE attendance SET date = ?1 WHERE id = ?2;",
                params![date, id],
            )?;
            rewritten += 1;
        }
    }

    info!(
        "event=schema_canonicalize_dates module=db status=ok rewritten={rewritten} removed_duplicates={removed}"
    );
    if unparsed > 0 {
        warn!("event=schema_canonicalize_dates module=db status=partial unparsed_dates={unparsed}");
    }
    Ok(())
}

//! Attendance repository contract and SQLite implementation.
//!
//! # Invariants
//! - Dates are written in canonical `YYYY-MM-DD` form, so text ordering in
//!   SQL matches calendar ordering.
//! - Report rows are ordered by `date DESC, name ASC`.

use crate::model::attendance::{
    AttendanceDate, AttendanceRecord, AttendanceStatus, ReportRow,
};
use crate::model::person::{PersonId, Role};
use crate::repo::{RepoError, RepoResult};
use rusqlite::ffi;
use rusqlite::{params, Connection, OptionalExtension};

/// Data access for daily attendance records.
pub trait AttendanceRepository {
    fn find_record(
        &self,
        person_id: PersonId,
        date: AttendanceDate,
    ) -> RepoResult<Option<AttendanceRecord>>;

    /// Inserts one record.
    ///
    /// Returns [`RepoError::DuplicateDay`] or [`RepoError::MissingPerson`]
    /// when the store's own constraints reject the row.
    fn insert_record(
        &self,
        person_id: PersonId,
        date: AttendanceDate,
        status: AttendanceStatus,
    ) -> RepoResult<AttendanceRecord>;

    /// Joins every record to its person, most recent day first.
    fn list_report_rows(&self) -> RepoResult<Vec<ReportRow>>;
}

/// SQLite-backed attendance repository.
pub struct SqliteAttendanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendanceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AttendanceRepository for SqliteAttendanceRepository<'_> {
    fn find_record(
        &self,
        person_id: PersonId,
        date: AttendanceDate,
    ) -> RepoResult<Option<AttendanceRecord>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, status
                 FROM attendance
                 WHERE person_id = ?1 AND date = ?2
                 LIMIT 1;",
                params![person_id, date.to_string()],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((id, status_text)) = found else {
            return Ok(None);
        };
        Ok(Some(AttendanceRecord {
            id,
            person_id,
            date,
            status: parse_status(&status_text)?,
        }))
    }

    fn insert_record(
        &self,
        person_id: PersonId,
        date: AttendanceDate,
        status: AttendanceStatus,
    ) -> RepoResult<AttendanceRecord> {
        let inserted = self.conn.execute(
            "INSERT INTO attendance (person_id, date, status) VALUES (?1, ?2, ?3);",
            params![person_id, date.to_string(), status.as_str()],
        );

        match inserted {
            Ok(_) => Ok(AttendanceRecord {
                id: self.conn.last_insert_rowid(),
                person_id,
                date,
                status,
            }),
            Err(err) => Err(match constraint_code(&err) {
                Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => RepoError::DuplicateDay { person_id, date },
                Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => RepoError::MissingPerson(person_id),
                _ => err.into(),
            }),
        }
    }

    fn list_report_rows(&self) -> RepoResult<Vec<ReportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.name, p.role, a.date, a.status
             FROM attendance a
             JOIN people p ON a.person_id = p.id
             ORDER BY a.date DESC, p.name ASC, a.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut report = Vec::new();

        while let Some(row) = rows.next()? {
            let role_text: String = row.get(1)?;
            let date_text: String = row.get(2)?;
            let status_text: String = row.get(3)?;
            report.push(ReportRow {
                name: row.get(0)?,
                role: role_text.parse::<Role>().map_err(|_| {
                    RepoError::InvalidData(format!("invalid role `{role_text}` in people.role"))
                })?,
                date: AttendanceDate::parse(&date_text).ok_or_else(|| {
                    RepoError::InvalidData(format!("invalid date `{date_text}` in attendance.date"))
                })?,
                status: parse_status(&status_text)?,
            });
        }

        Ok(report)
    }
}

fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(inner.extended_code)
        }
        _ => None,
    }
}

fn parse_status(value: &str) -> RepoResult<AttendanceStatus> {
    value.parse::<AttendanceStatus>().map_err(|_| {
        RepoError::InvalidData(format!("invalid status `{value}` in attendance.status"))
    })
}

//! Attendance access and validation service.
//!
//! # Responsibility
//! - Register people, mark daily attendance and build the joined report.
//! - Report every rejected input as a [`ValidationError`].
//!
//! # Invariants
//! - A failed call inserts nothing; a successful mutating call inserts one row.
//! - `mark_attendance` checks person, then date format, then duplicates, and
//!   does not touch the attendance table when an earlier check fails.
//! - Store constraint failures surface as validation errors, not SQLite errors.

use crate::model::attendance::{AttendanceDate, AttendanceRecord, AttendanceStatus, ReportRow};
use crate::model::person::{Person, PersonId, Role};
use crate::repo::attendance_repo::{AttendanceRepository, SqliteAttendanceRepository};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::RepoError;
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rejected user input. Recoverable by re-entering the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    UnknownPerson,
    BadDateFormat,
    DuplicateAttendance,
}

impl ValidationError {
    /// Stable machine-readable code used in log events.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::UnknownPerson => "unknown_person",
            Self::BadDateFormat => "bad_date_format",
            Self::DuplicateAttendance => "duplicate_attendance",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::EmptyName => "Name cannot be empty",
            Self::UnknownPerson => "Invalid person selected",
            Self::BadDateFormat => "Date must be in YYYY-MM-DD format",
            Self::DuplicateAttendance => "Attendance already marked for this person on this date",
        })
    }
}

impl Error for ValidationError {}

/// Service error for attendance use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    /// Persistence failure with no domain meaning (I/O, corrupt rows).
    Repo(RepoError),
}

impl ServiceError {
    /// Returns the validation reason, if this is a rejected input.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::Validation(reason) => Some(*reason),
            Self::Repo(_) => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(reason) => write!(f, "{reason}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(reason) => Some(reason),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateDay { .. } => Self::Validation(ValidationError::DuplicateAttendance),
            RepoError::MissingPerson(_) => Self::Validation(ValidationError::UnknownPerson),
            other => Self::Repo(other),
        }
    }
}

/// Access and validation facade over person and attendance repositories.
pub struct AttendanceService<P: PersonRepository, A: AttendanceRepository> {
    people: P,
    records: A,
}

/// Service wired to SQLite repositories sharing one connection.
pub type SqliteAttendanceService<'conn> =
    AttendanceService<SqlitePersonRepository<'conn>, SqliteAttendanceRepository<'conn>>;

impl<'conn> SqliteAttendanceService<'conn> {
    /// Builds a service whose repositories both borrow `conn`.
    pub fn for_connection(conn: &'conn Connection) -> Self {
        Self::new(
            SqlitePersonRepository::new(conn),
            SqliteAttendanceRepository::new(conn),
        )
    }
}

impl<P: PersonRepository, A: AttendanceRepository> AttendanceService<P, A> {
    pub fn new(people: P, records: A) -> Self {
        Self { people, records }
    }

    /// Registers a person under the trimmed `name`.
    ///
    /// # Errors
    /// - [`ValidationError::EmptyName`] when `name` is blank after trimming.
    pub fn register_person(&self, name: &str, role: Role) -> ServiceResult<Person> {
        let name = name.trim();
        if name.is_empty() {
            return Err(reject("person_register", ValidationError::EmptyName));
        }

        let person = self.people.insert_person(name, role)?;
        info!(
            "event=person_register module=service status=ok person_id={} role={}",
            person.id, person.role
        );
        Ok(person)
    }

    /// Lists every registered person sorted by name.
    pub fn list_people(&self) -> ServiceResult<Vec<Person>> {
        Ok(self.people.list_people()?)
    }

    pub fn get_person(&self, id: PersonId) -> ServiceResult<Option<Person>> {
        Ok(self.people.get_person(id)?)
    }

    /// Records `status` for `person_id` on the day named by `date_text`.
    ///
    /// # Errors
    /// In check order:
    /// - [`ValidationError::UnknownPerson`] when no person has `person_id`.
    /// - [`ValidationError::BadDateFormat`] when `date_text` is not a
    ///   `YYYY-MM-DD` calendar date.
    /// - [`ValidationError::DuplicateAttendance`] when that person already has
    ///   a record for that day.
    pub fn mark_attendance(
        &self,
        person_id: PersonId,
        date_text: &str,
        status: AttendanceStatus,
    ) -> ServiceResult<AttendanceRecord> {
        if self.people.get_person(person_id)?.is_none() {
            return Err(reject("attendance_mark", ValidationError::UnknownPerson));
        }
        let Some(date) = AttendanceDate::parse(date_text) else {
            return Err(reject("attendance_mark", ValidationError::BadDateFormat));
        };
        if self.records.find_record(person_id, date)?.is_some() {
            return Err(reject("attendance_mark", ValidationError::DuplicateAttendance));
        }

        let record = self
            .records
            .insert_record(person_id, date, status)
            .map_err(|err| match ServiceError::from(err) {
                ServiceError::Validation(reason) => reject("attendance_mark", reason),
                other => other,
            })?;
        info!(
            "event=attendance_mark module=service status=ok person_id={} date={} attendance={}",
            record.person_id, record.date, record.status
        );
        Ok(record)
    }

    /// Builds the joined report, most recent day first and names ascending
    /// within a day. Empty when nothing has been marked.
    pub fn generate_report(&self) -> ServiceResult<Vec<ReportRow>> {
        let rows = self.records.list_report_rows()?;
        info!(
            "event=report_generate module=service status=ok rows={}",
            rows.len()
        );
        Ok(rows)
    }
}

fn reject(event: &str, reason: ValidationError) -> ServiceError {
    warn!(
        "event={event} module=service status=rejected reason={}",
        reason.code()
    );
    ServiceError::Validation(reason)
}

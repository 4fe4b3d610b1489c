//! Repository layer over the attendance store.
//!
//! # Responsibility
//! - Define the data-access contracts used by the attendance service.
//! - Keep SQL and row decoding inside the persistence boundary.
//!
//! # Invariants
//! - Read paths reject rows whose role/status/date fall outside the model
//!   instead of masking them.
//! - Store constraint failures that have a domain meaning are reported as
//!   semantic variants, never as raw SQLite errors.

use crate::db::DbError;
use crate::model::attendance::AttendanceDate;
use crate::model::person::PersonId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendance_repo;
pub mod person_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person and attendance persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The unique `(person_id, date)` index rejected an insert.
    DuplicateDay {
        person_id: PersonId,
        date: AttendanceDate,
    },
    /// The foreign key to `people` rejected an insert.
    MissingPerson(PersonId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateDay { person_id, date } => write!(
                f,
                "attendance already stored for person {person_id} on {date}"
            ),
            Self::MissingPerson(person_id) => write!(f, "person not found: {person_id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted attendance data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

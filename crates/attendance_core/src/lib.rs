//! Core domain logic for attendance recording.
//! This crate is the single source of truth for people, attendance rules and
//! the report; front ends only call into it and render results.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{initialize_schema, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::attendance::{
    AttendanceDate, AttendanceId, AttendanceRecord, AttendanceStatus, ReportRow, UnknownStatus,
};
pub use model::person::{parse_selection_label, Person, PersonId, Role, UnknownRole};
pub use repo::attendance_repo::{AttendanceRepository, SqliteAttendanceRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::{RepoError, RepoResult};
pub use service::attendance_service::{
    AttendanceService, ServiceError, ServiceResult, SqliteAttendanceService, ValidationError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

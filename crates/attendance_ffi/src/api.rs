//! FFI use-case API for the attendance form.
//!
//! # Responsibility
//! - Accept the raw strings form widgets produce and hand typed values to core.
//! - Render core results into flat, UI-ready envelopes.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - One session connection is opened lazily and reused until
//!   [`attendance_close`] releases it.
//! - Role, status and person selection are re-validated here; the picker is
//!   never trusted to have constrained them.

use attendance_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_db,
    parse_selection_label, AttendanceDate, AttendanceStatus, Person, ReportRow, Role,
    ServiceError, SqliteAttendanceService, ValidationError,
};
use log::{info, warn};
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

#[cfg_attr(test, allow(dead_code))]
const DB_PATH_ENV: &str = "ATTENDANCE_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "attendance.sqlite3";

static SESSION: Lazy<Mutex<Option<Connection>>> = Lazy::new(|| Mutex::new(None));

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the call with the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Today's local date as `YYYY-MM-DD`, used to prefill the date field.
#[flutter_rust_bridge::frb(sync)]
pub fn today_date_text() -> String {
    AttendanceDate::today().to_string()
}

/// Role picker entries.
#[flutter_rust_bridge::frb(sync)]
pub fn role_choices() -> Vec<String> {
    Role::ALL.iter().map(|role| role.as_str().to_owned()).collect()
}

/// Status picker entries.
#[flutter_rust_bridge::frb(sync)]
pub fn status_choices() -> Vec<String> {
    AttendanceStatus::ALL
        .iter()
        .map(|status| status.as_str().to_owned())
        .collect()
}

/// Outcome of a form action, shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created person or attendance record.
    pub id: Option<i64>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: i64) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// One entry of the person picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonOption {
    pub person_id: i64,
    /// `"<name> (ID:<id>)"`, passed back verbatim to [`attendance_mark`].
    pub label: String,
}

/// One line of the four-column report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportItem {
    pub name: String,
    pub role: String,
    pub date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResponse {
    pub rows: Vec<ReportItem>,
    pub message: String,
}

/// Registers a person from the "Manage People" form.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_register_person(name: String, role: String) -> ActionResponse {
    let role = match role.parse::<Role>() {
        Ok(role) => role,
        Err(err) => return ActionResponse::failure(err.to_string()),
    };
    match with_service(|service| service.register_person(&name, role)) {
        Ok(person) => ActionResponse::success(
            format!("{} '{}' added.", person.role, person.name),
            person.id,
        ),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Lists picker entries sorted by name. Empty when the store is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_list_people() -> Vec<PersonOption> {
    match with_service(|service| service.list_people()) {
        Ok(people) => people.iter().map(to_person_option).collect(),
        Err(message) => {
            warn!("event=people_list module=ffi status=error error={message}");
            Vec::new()
        }
    }
}

/// Marks attendance from the "Mark Attendance" form.
///
/// `selection` is a label from [`attendance_list_people`].
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_mark(selection: String, date_text: String, status: String) -> ActionResponse {
    if selection.trim().is_empty() {
        return ActionResponse::failure("Select a person.");
    }
    let Some(person_id) = parse_selection_label(&selection) else {
        return ActionResponse::failure(ValidationError::UnknownPerson.to_string());
    };
    let status = match status.parse::<AttendanceStatus>() {
        Ok(status) => status,
        Err(err) => return ActionResponse::failure(err.to_string()),
    };

    match with_service(|service| service.mark_attendance(person_id, &date_text, status)) {
        Ok(record) => ActionResponse::success("Attendance marked.", record.id),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Loads the attendance report, most recent day first.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_report() -> ReportResponse {
    match with_service(|service| service.generate_report()) {
        Ok(rows) => {
            let message = if rows.is_empty() {
                "No attendance recorded.".to_string()
            } else {
                format!("{} record(s).", rows.len())
            };
            ReportResponse {
                rows: rows.into_iter().map(to_report_item).collect(),
                message,
            }
        }
        Err(message) => ReportResponse {
            rows: Vec::new(),
            message,
        },
    }
}

/// Releases the session connection. Returns an empty string on success.
///
/// A later `attendance_*` call reopens the store.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_close() -> String {
    let mut session = match SESSION.lock() {
        Ok(session) => session,
        Err(_) => return "attendance session lock poisoned".to_string(),
    };
    match session.take() {
        Some(conn) => match conn.close() {
            Ok(()) => {
                info!("event=db_close module=ffi status=ok");
                String::new()
            }
            Err((_, err)) => format!("attendance_close failed: {err}"),
        },
        None => String::new(),
    }
}

#[cfg(not(test))]
fn resolve_db_path() -> PathBuf {
    db_path_from_env(std::env::var(DB_PATH_ENV).ok())
}

/// Unit tests never touch the user's store; each test process gets its own file.
#[cfg(test)]
fn resolve_db_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "attendance-ffi-tests-{}.sqlite3",
        std::process::id()
    ))
}

fn db_path_from_env(raw: Option<String>) -> PathBuf {
    match raw {
        Some(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
    }
}

fn with_service<T>(
    f: impl FnOnce(&SqliteAttendanceService<'_>) -> Result<T, ServiceError>,
) -> Result<T, String> {
    let mut session = SESSION
        .lock()
        .map_err(|_| "attendance session lock poisoned".to_string())?;
    if session.is_none() {
        let conn =
            open_db(resolve_db_path()).map_err(|err| format!("attendance DB open failed: {err}"))?;
        *session = Some(conn);
    }
    let conn = session
        .as_ref()
        .ok_or_else(|| "attendance session unavailable".to_string())?;
    let service = SqliteAttendanceService::for_connection(conn);
    f(&service).map_err(|err| err.to_string())
}

fn to_person_option(person: &Person) -> PersonOption {
    PersonOption {
        person_id: person.id,
        label: person.selection_label(),
    }
}

fn to_report_item(row: ReportRow) -> ReportItem {
    ReportItem {
        name: row.name,
        role: row.role.to_string(),
        date: row.date.to_string(),
        status: row.status.to_string(),
    }
}

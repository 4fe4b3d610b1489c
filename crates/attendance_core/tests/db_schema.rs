use attendance_core::db::migrations::latest_version;
use attendance_core::db::{initialize_schema, open_db, open_db_in_memory, DbError};
use attendance_core::{AttendanceStatus, Role, SqliteAttendanceService, ValidationError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_both_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "people");
    assert_table_exists(&conn, "attendance");
}

#[test]
fn initialize_schema_twice_keeps_data() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let service = SqliteAttendanceService::for_connection(&conn);
        let person = service.register_person("Ada", Role::Student).unwrap();
        service
            .mark_attendance(person.id, "2024-01-10", AttendanceStatus::Present)
            .unwrap();
    }

    initialize_schema(&mut conn).unwrap();
    initialize_schema(&mut conn).unwrap();

    let service = SqliteAttendanceService::for_connection(&conn);
    assert_eq!(service.list_people().unwrap().len(), 1);
    assert_eq!(service.generate_report().unwrap().len(), 1);
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn reopening_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.db");

    {
        let conn = open_db(&path).unwrap();
        SqliteAttendanceService::for_connection(&conn)
            .register_person("Grace", Role::Staff)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let people = SqliteAttendanceService::for_connection(&conn)
        .list_people()
        .unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name, "Grace");
}

#[test]
fn legacy_database_without_version_opens_without_data_loss() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.db");

    let legacy = Connection::open(&path).unwrap();
    legacy
        .execute_batch(
            "CREATE TABLE people (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                role TEXT CHECK(role IN ('Student', 'Staff', 'Worker')) NOT NULL);
             CREATE TABLE attendance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                person_id INTEGER,
                date TEXT,
                status TEXT CHECK(status IN ('Present', 'Absent', 'Late')),
                FOREIGN KEY(person_id) REFERENCES people(id));
             INSERT INTO people (name, role) VALUES ('Linus', 'Worker');
             INSERT INTO attendance (person_id, date, status) VALUES (1, '2023-09-01', 'Late');",
        )
        .unwrap();
    drop(legacy);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let service = SqliteAttendanceService::for_connection(&conn);
    let report = service.generate_report().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].name, "Linus");
    assert_eq!(report[0].status, AttendanceStatus::Late);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_checks_reject_values_outside_the_domain() {
    let conn = open_db_in_memory().unwrap();

    assert!(conn
        .execute(
            "INSERT INTO people (name, role) VALUES ('Eve', 'Visitor');",
            [],
        )
        .is_err());

    conn.execute(
        "INSERT INTO people (name, role) VALUES ('Eve', 'Staff');",
        [],
    )
    .unwrap();
    assert!(conn
        .execute(
            "INSERT INTO attendance (person_id, date, status) VALUES (1, '2024-01-10', 'Excused');",
            [],
        )
        .is_err());
    assert!(conn
        .execute(
            "INSERT INTO attendance (person_id, date, status) VALUES (42, '2024-01-10', 'Present');",
            [],
        )
        .is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

#[test]
fn legacy_unpadded_dates_are_canonicalized_and_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.db");

    let legacy = Connection::open(&path).unwrap();
    legacy
        .execute_batch(
            "CREATE TABLE people (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                role TEXT CHECK(role IN ('Student', 'Staff', 'Worker')) NOT NULL);
             CREATE TABLE attendance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                person_id INTEGER,
                date TEXT,
                status TEXT CHECK(status IN ('Present', 'Absent', 'Late')),
                FOREIGN KEY(person_id) REFERENCES people(id));
             INSERT INTO people (name, role) VALUES ('Linus', 'Worker');
             INSERT INTO attendance (person_id, date, status) VALUES (1, '2024-1-10', 'Late');
             INSERT INTO attendance (person_id, date, status) VALUES (1, '2024-02-01', 'Late');
             INSERT INTO attendance (person_id, date, status) VALUES (1, '2024-01-10', 'Absent');",
        )
        .unwrap();
    drop(legacy);

    let conn = open_db(&path).unwrap();
    let stored: Vec<(i64, String, String)> = conn
        .prepare("SELECT id, date, status FROM attendance ORDER BY id;")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();
    assert_eq!(
        stored,
        [
            (1, "2024-01-10".to_string(), "Late".to_string()),
            (2, "2024-02-01".to_string(), "Late".to_string()),
        ]
    );

    let service = SqliteAttendanceService::for_connection(&conn);
    let err = service
        .mark_attendance(1, "2024-01-10", AttendanceStatus::Present)
        .unwrap_err();
    assert_eq!(err.validation(), Some(ValidationError::DuplicateAttendance));

    let dates: Vec<String> = service
        .generate_report()
        .unwrap()
        .iter()
        .map(|row| row.date.to_string())
        .collect();
    assert_eq!(dates, ["2024-02-01", "2024-01-10"]);
}

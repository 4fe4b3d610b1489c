//! Command-line front end for the attendance core.
//!
//! # Responsibility
//! - Map subcommands onto the four attendance use-cases.
//! - Own the single store connection for the lifetime of one invocation.

mod cli;
mod render;

use anyhow::{anyhow, Context, Result};
use attendance_core::{
    core_version, default_log_level, init_logging, open_db, AttendanceDate, SqliteAttendanceService,
    ValidationError,
};
use clap::Parser;
use cli::{resolve_person_arg, Cli, Command, StoreCommand};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let db_path = cli.db_path();
    let command = match cli.command {
        Command::Store(command) => command,
        Command::Version => {
            println!("attendance_core version={}", core_version());
            return Ok(());
        }
    };

    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open attendance database `{}`", db_path.display()))?;
    let output = {
        let service = SqliteAttendanceService::for_connection(&conn);
        execute(&service, command)
    };
    conn.close()
        .map_err(|(_, err)| err)
        .context("failed to close attendance database")?;
    info!("event=db_close module=cli status=ok");

    print!("{}", output?);
    Ok(())
}

fn execute(service: &SqliteAttendanceService<'_>, command: StoreCommand) -> Result<String> {
    match command {
        StoreCommand::Add { name, role } => {
            let person = service.register_person(&name, role)?;
            Ok(format!(
                "{} '{}' added. {}\n",
                person.role,
                person.name,
                person.selection_label()
            ))
        }
        StoreCommand::People => Ok(render::render_people(&service.list_people()?)),
        StoreCommand::Mark {
            person,
            date,
            status,
        } => {
            let person_id = resolve_person_arg(&person)
                .ok_or_else(|| anyhow!(ValidationError::UnknownPerson))?;
            let date_text = date.unwrap_or_else(|| AttendanceDate::today().to_string());
            let record = service.mark_attendance(person_id, &date_text, status)?;
            Ok(format!(
                "Attendance marked: person {} on {} as {}.\n",
                record.person_id, record.date, record.status
            ))
        }
        StoreCommand::Report { json } => {
            let rows = service.generate_report()?;
            if json {
                Ok(format!("{}\n", serde_json::to_string_pretty(&rows)?))
            } else {
                Ok(render::render_report(&rows))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::execute;
    use crate::cli::StoreCommand;
    use attendance_core::{open_db_in_memory, AttendanceStatus, Role, SqliteAttendanceService};

    #[test]
    fn add_mark_and_report_flow() {
        let conn = open_db_in_memory().unwrap();
        let service = SqliteAttendanceService::for_connection(&conn);

        let added = execute(
            &service,
            StoreCommand::Add {
                name: "Ada".to_string(),
                role: Role::Worker,
            },
        )
        .unwrap();
        assert_eq!(added, "Worker 'Ada' added. Ada (ID:1)\n");

        execute(
            &service,
            StoreCommand::Mark {
                person: "Ada (ID:1)".to_string(),
                date: Some("2024-01-10".to_string()),
                status: AttendanceStatus::Absent,
            },
        )
        .unwrap();

        let report = execute(&service, StoreCommand::Report { json: false }).unwrap();
        assert!(report.contains("Ada   Worker  2024-01-10  Absent"));
    }

    #[test]
    fn mark_without_date_uses_today() {
        let conn = open_db_in_memory().unwrap();
        let service = SqliteAttendanceService::for_connection(&conn);
        service.register_person("Ada", Role::Student).unwrap();

        let out = execute(
            &service,
            StoreCommand::Mark {
                person: "1".to_string(),
                date: None,
                status: AttendanceStatus::Present,
            },
        )
        .unwrap();
        let today = attendance_core::AttendanceDate::today().to_string();
        assert!(out.contains(&today));
    }

    #[test]
    fn unresolvable_person_is_reported() {
        let conn = open_db_in_memory().unwrap();
        let service = SqliteAttendanceService::for_connection(&conn);

        let err = execute(
            &service,
            StoreCommand::Mark {
                person: "nobody".to_string(),
                date: None,
                status: AttendanceStatus::Present,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid person selected");
    }
}

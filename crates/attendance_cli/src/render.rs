//! Plain-text rendering of people and report rows.

use attendance_core::{Person, ReportRow};

const REPORT_HEADERS: [&str; 4] = ["Name", "Role", "Date", "Status"];

pub fn render_people(people: &[Person]) -> String {
    if people.is_empty() {
        return "No people registered.\n".to_string();
    }
    people
        .iter()
        .map(|person| format!("{}\n", person.selection_label()))
        .collect()
}

/// Four left-aligned columns padded to the widest cell.
pub fn render_report(rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return "No attendance recorded.\n".to_string();
    }

    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.name.clone(),
                row.role.to_string(),
                row.date.to_string(),
                row.status.to_string(),
            ]
        })
        .collect();

    let mut widths = REPORT_HEADERS.map(|header| header.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format_line(&REPORT_HEADERS.map(str::to_string), &widths);
    for line in &cells {
        out.push_str(&format_line(line, &widths));
    }
    out
}

fn format_line(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::{render_people, render_report};
    use attendance_core::{AttendanceDate, AttendanceStatus, Person, ReportRow, Role};

    #[test]
    fn people_render_as_picker_labels() {
        let people = [Person {
            id: 3,
            name: "Ada".to_string(),
            role: Role::Student,
        }];
        assert_eq!(render_people(&people), "Ada (ID:3)\n");
        assert_eq!(render_people(&[]), "No people registered.\n");
    }

    #[test]
    fn report_pads_columns() {
        let rows = [ReportRow {
            name: "Bartholomew".to_string(),
            role: Role::Staff,
            date: AttendanceDate::parse("2024-01-10").unwrap(),
            status: AttendanceStatus::Late,
        }];
        let rendered = render_report(&rows);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Name         Role   Date        Status");
        assert_eq!(lines[1], "Bartholomew  Staff  2024-01-10  Late");
    }

    #[test]
    fn empty_report_has_message() {
        assert_eq!(render_report(&[]), "No attendance recorded.\n");
    }
}

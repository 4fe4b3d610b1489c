//! Attendance records and report rows.
//!
//! # Invariants
//! - At most one record exists per `(person_id, date)`.
//! - Dates are always stored in canonical `YYYY-MM-DD` form.

use crate::model::person::{PersonId, Role};
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$").expect("valid date shape regex"));

/// Storage-assigned attendance record identifier.
pub type AttendanceId = i64;

/// Outcome recorded for one person on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    /// Every status, in picker order.
    pub const ALL: [AttendanceStatus; 3] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
    ];

    /// Word stored in `attendance.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
        }
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value.trim())
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Raised when free text does not name one of [`AttendanceStatus::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown attendance status `{}`; expected Present|Absent|Late",
            self.0
        )
    }
}

impl Error for UnknownStatus {}

/// Calendar day an attendance record applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceDate(NaiveDate);

impl AttendanceDate {
    /// `strftime` pattern for the textual form.
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Parses `YYYY-MM-DD` text, ignoring surrounding whitespace.
    ///
    /// The year must be exactly four unsigned digits; month and day may omit
    /// the leading zero. Returns `None` for malformed text and impossible
    /// dates such as `2024-13-40` or `2023-02-29`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !DATE_SHAPE_RE.is_match(text) {
            return None;
        }
        NaiveDate::parse_from_str(text, Self::FORMAT).ok().map(Self)
    }

    /// Current day in the local time zone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn as_naive_date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for AttendanceDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl Display for AttendanceDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

/// One stored daily attendance entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub person_id: PersonId,
    pub date: AttendanceDate,
    pub status: AttendanceStatus,
}

/// One line of the attendance report, joined with the person it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub name: String,
    pub role: Role,
    pub date: AttendanceDate,
    pub status: AttendanceStatus,
}

#[cfg(test)]
mod tests {
    use super::{AttendanceDate, AttendanceStatus};
    use chrono::NaiveDate;

    #[test]
    fn date_parse_accepts_calendar_dates() {
        let parsed = AttendanceDate::parse(" 2024-01-10 ").expect("valid date");
        assert_eq!(
            parsed.as_naive_date(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert_eq!(parsed.to_string(), "2024-01-10");
        assert!(AttendanceDate::parse("2024-02-29").is_some());
        assert_eq!(
            AttendanceDate::parse("2024-1-5").map(|date| date.to_string()),
            Some("2024-01-05".to_string())
        );
    }

    #[test]
    fn date_parse_rejects_bad_input() {
        for text in [
            "2024-13-40",
            "2023-02-29",
            "10/01/2024",
            "",
            "2024-01-10x",
            "today",
            "+2024-01-10",
            "999-01-10",
            "-0001-01-10",
            "02024-01-10",
            "2024-001-10",
        ] {
            assert!(AttendanceDate::parse(text).is_none(), "accepted `{text}`");
        }
    }

    #[test]
    fn status_parses_stored_words_only() {
        assert_eq!("Late".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Late));
        assert!("late".parse::<AttendanceStatus>().is_err());
        assert!("Excused".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn date_serializes_as_text() {
        let date = AttendanceDate::parse("2024-03-05").unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-03-05\"");
    }
}

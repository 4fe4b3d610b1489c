//! Person model and picker label helpers.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused.
//! - `name` is stored trimmed and is never empty.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static SELECTION_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(ID:(\d+)\)$").expect("valid selection label regex"));

/// Storage-assigned person identifier.
pub type PersonId = i64;

/// What a registered person does at the institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Staff,
    Worker,
}

impl Role {
    /// Every role, in picker order.
    pub const ALL: [Role; 3] = [Role::Student, Role::Staff, Role::Worker];

    /// Word stored in `people.role`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Staff => "Staff",
            Self::Worker => "Worker",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value.trim())
            .ok_or_else(|| UnknownRole(value.to_string()))
    }
}

/// Raised when free text does not name one of [`Role::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl Display for UnknownRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown role `{}`; expected Student|Staff|Worker",
            self.0
        )
    }
}

impl Error for UnknownRole {}

/// A registered individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: Role,
}

impl Person {
    /// Renders the picker entry `"<name> (ID:<id>)"`.
    pub fn selection_label(&self) -> String {
        format!("{} (ID:{})", self.name, self.id)
    }
}

/// Extracts the id from a label produced by [`Person::selection_label`].
///
/// Only the trailing `(ID:<digits>)` group counts, so names that themselves
/// contain parentheses still resolve. Returns `None` for anything else.
pub fn parse_selection_label(label: &str) -> Option<PersonId> {
    SELECTION_LABEL_RE
        .captures(label.trim())
        .and_then(|captures| captures.get(1))
        .and_then(|id| id.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::{parse_selection_label, Person, Role};

    #[test]
    fn role_parses_stored_words_only() {
        assert_eq!("Staff".parse::<Role>(), Ok(Role::Staff));
        assert_eq!(" Worker ".parse::<Role>(), Ok(Role::Worker));
        let err = "teacher".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("teacher"));
        assert!("student".parse::<Role>().is_err());
    }

    #[test]
    fn selection_label_round_trips_id() {
        let person = Person {
            id: 42,
            name: "Ada (night shift)".to_string(),
            role: Role::Worker,
        };
        let label = person.selection_label();
        assert_eq!(label, "Ada (night shift) (ID:42)");
        assert_eq!(parse_selection_label(&label), Some(42));
    }

    #[test]
    fn malformed_labels_do_not_resolve() {
        assert_eq!(parse_selection_label(""), None);
        assert_eq!(parse_selection_label("Ada"), None);
        assert_eq!(parse_selection_label("Ada (ID:)"), None);
        assert_eq!(parse_selection_label("Ada (ID:x1)"), None);
        assert_eq!(parse_selection_label("Ada (ID:99999999999999999999)"), None);
    }
}

//! Person repository contract and SQLite implementation.

use crate::model::person::{Person, PersonId, Role};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PERSON_SELECT_SQL: &str = "SELECT id, name, role FROM people";

/// Data access for registered people.
pub trait PersonRepository {
    /// Inserts one person and returns it with its assigned id.
    fn insert_person(&self, name: &str, role: Role) -> RepoResult<Person>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Lists everyone ordered by name, then id.
    fn list_people(&self) -> RepoResult<Vec<Person>>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn insert_person(&self, name: &str, role: Role) -> RepoResult<Person> {
        self.conn.execute(
            "INSERT INTO people (name, role) VALUES (?1, ?2);",
            params![name, role.as_str()],
        )?;

        Ok(Person {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            role,
        })
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
        stmt.query_row([id], read_person_columns)
            .optional()?
            .map(parse_person)
            .transpose()
    }

    fn list_people(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();

        while let Some(row) = rows.next()? {
            people.push(parse_person(read_person_columns(row)?)?);
        }

        Ok(people)
    }
}

type PersonColumns = (PersonId, String, String);

fn read_person_columns(row: &Row<'_>) -> rusqlite::Result<PersonColumns> {
    Ok((row.get("id")?, row.get("name")?, row.get("role")?))
}

fn parse_person((id, name, role_text): PersonColumns) -> RepoResult<Person> {
    let role = role_text.parse::<Role>().map_err(|_| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in people.role"))
    })?;
    Ok(Person { id, name, role })
}

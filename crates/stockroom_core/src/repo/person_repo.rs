//! Person/note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist persons together with their owned notes.
//! - Own the attach-note logic with atomic existence-check semantics.
//!
//! # Invariants
//! - Reading a person always loads the full note set, ordered by note id.
//! - `add_note` verifies the owning person inside one immediate
//!   transaction, so the check and the insert cannot be split by a
//!   concurrent person removal.
//! - Removing a person removes its notes through the foreign-key cascade.

use crate::db::DbPool;
use crate::model::person::{Note, NoteId, Person, PersonId};
use crate::repo::{ensure_required_table, ensure_schema_version, StoreError, StoreResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    person_id,
    body,
    created_at
FROM notes";

/// Repository interface for person/note operations.
pub trait PersonRepository {
    /// Inserts a new person row and assigns the generated id.
    fn create_person(&self, person: &mut Person) -> StoreResult<PersonId>;
    /// Returns one person with all owned notes.
    fn find_person(&self, id: PersonId) -> StoreResult<Person>;
    /// Returns all persons with their notes, ordered by person id.
    fn list_persons(&self) -> StoreResult<Vec<Person>>;
    /// Overwrites first and last name of the row matching the person id.
    fn update_person(&self, person: &Person) -> StoreResult<()>;
    /// Deletes the person row; owned notes are removed by cascade.
    fn remove_person(&self, person: &Person) -> StoreResult<()>;
    /// Attaches a note to an existing person and assigns the generated
    /// note id.
    fn add_note(&self, person_id: PersonId, note: &mut Note) -> StoreResult<NoteId>;
}

/// SQLite-backed person repository over a shared connection pool.
#[derive(Clone)]
pub struct SqlitePersonRepository {
    pool: DbPool,
}

impl SqlitePersonRepository {
    /// Constructs a repository after checking the pool points at a
    /// migrated database with the expected person/note schema.
    pub fn try_new(pool: DbPool) -> StoreResult<Self> {
        let conn = pool.get()?;
        ensure_schema_version(&conn)?;
        ensure_required_table(&conn, "persons", &["id", "first_name", "last_name"])?;
        ensure_required_table(&conn, "notes", &["id", "person_id", "body", "created_at"])?;
        drop(conn);
        Ok(Self { pool })
    }
}

impl PersonRepository for SqlitePersonRepository {
    fn create_person(&self, person: &mut Person) -> StoreResult<PersonId> {
        person.validate()?;

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO persons (first_name, last_name) VALUES (?1, ?2);",
            params![person.first_name.as_str(), person.last_name.as_str()],
        )?;

        let id = conn.last_insert_rowid();
        if id <= 0 {
            return Err(StoreError::InvalidData(
                "insert did not yield a generated person id".to_string(),
            ));
        }

        person.id = Some(id);
        Ok(id)
    }

    fn find_person(&self, id: PersonId) -> StoreResult<Person> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT id, first_name, last_name FROM persons WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;

        match rows.next()? {
            Some(row) => {
                let mut person = parse_person_row(row)?;
                person.notes = load_notes_for_person(&conn, id)?;
                Ok(person)
            }
            None => Err(StoreError::NotFound {
                entity: "person",
                id,
            }),
        }
    }

    fn list_persons(&self) -> StoreResult<Vec<Person>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT id, first_name, last_name FROM persons ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;

        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }
        for person in &mut persons {
            if let Some(id) = person.id {
                person.notes = load_notes_for_person(&conn, id)?;
            }
        }

        Ok(persons)
    }

    fn update_person(&self, person: &Person) -> StoreResult<()> {
        person.validate()?;
        let id = person.id.ok_or(StoreError::MissingId("person"))?;

        let conn = self.pool.get()?;
        let changed = conn.execute(
            "UPDATE persons SET first_name = ?1, last_name = ?2 WHERE id = ?3;",
            params![person.first_name.as_str(), person.last_name.as_str(), id],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "person",
                id,
            });
        }

        Ok(())
    }

    fn remove_person(&self, person: &Person) -> StoreResult<()> {
        let id = person.id.ok_or(StoreError::MissingId("person"))?;

        let conn = self.pool.get()?;
        let changed = conn.execute("DELETE FROM persons WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "person",
                id,
            });
        }

        Ok(())
    }

    fn add_note(&self, person_id: PersonId, note: &mut Note) -> StoreResult<NoteId> {
        note.validate()?;

        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !person_exists_in_tx(&tx, person_id)? {
            return Err(StoreError::NotFound {
                entity: "person",
                id: person_id,
            });
        }

        tx.execute(
            "INSERT INTO notes (person_id, body) VALUES (?1, ?2);",
            params![person_id, note.body.as_str()],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        note.id = Some(id);
        note.person_id = Some(person_id);
        Ok(id)
    }
}

fn parse_person_row(row: &Row<'_>) -> StoreResult<Person> {
    let person = Person {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        notes: Vec::new(),
    };
    person.validate()?;
    Ok(person)
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<Note> {
    Ok(Note {
        id: Some(row.get("id")?),
        person_id: Some(row.get("person_id")?),
        body: row.get("body")?,
        created_at: Some(row.get("created_at")?),
    })
}

fn load_notes_for_person(conn: &Connection, person_id: PersonId) -> StoreResult<Vec<Note>> {
    let mut stmt = conn.prepare(&format!(
        "{NOTE_SELECT_SQL} WHERE person_id = ?1 ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([person_id])?;

    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(parse_note_row(row)?);
    }
    Ok(notes)
}

fn person_exists_in_tx(tx: &Transaction<'_>, person_id: PersonId) -> StoreResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM persons WHERE id = ?1);",
        [person_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

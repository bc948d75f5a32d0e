//! Person and note domain models.
//!
//! # Responsibility
//! - Define the owning side of the person -> notes one-to-many shape.
//! - Validate field constraints before SQL writes.
//!
//! # Invariants
//! - A note belongs to exactly one person; removing the person removes
//!   its notes at the storage layer.
//! - `notes` always holds the full persisted note set when a person is
//!   read through the repository.

use crate::model::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Database-generated person identifier.
pub type PersonId = i64;

/// Database-generated note identifier.
pub type NoteId = i64;

/// One row of the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Generated primary key. `None` for values not yet saved.
    pub id: Option<NoteId>,
    /// Owning person. Assigned when the note is attached or persisted.
    pub person_id: Option<PersonId>,
    pub body: String,
    /// Set by the database on insert; read-only afterwards.
    pub created_at: Option<NaiveDateTime>,
}

impl Note {
    /// Creates a transient note not yet attached to a person.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            id: None,
            person_id: None,
            body: body.into(),
            created_at: None,
        }
    }

    /// Checks field constraints enforced before any SQL write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.body.trim().is_empty() {
            return Err(ValidationError::EmptyNoteBody);
        }
        Ok(())
    }
}

/// One row of the `persons` table together with its owned notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Generated primary key. `None` for values not yet saved.
    pub id: Option<PersonId>,
    pub first_name: String,
    pub last_name: String,
    /// Notes owned by this person, ordered by note id.
    pub notes: Vec<Note>,
}

impl Person {
    /// Creates a transient person with no notes.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            notes: Vec::new(),
        }
    }

    /// Attaches a note in memory, linking it to this person when the
    /// person already has an identifier.
    pub fn add_note(&mut self, mut note: Note) {
        note.person_id = self.id;
        self.notes.push(note);
    }

    /// Checks field constraints enforced before any SQL write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::EmptyFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::EmptyLastName);
        }
        Ok(())
    }
}

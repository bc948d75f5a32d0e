//! Person/notes use-case service.
//!
//! # Responsibility
//! - Provide the register-person and attach-note use-cases.
//! - Delegate persistence to repository implementations.

use crate::model::person::{Note, NoteId, Person, PersonId};
use crate::repo::person_repo::PersonRepository;
use crate::repo::StoreResult;

/// Use-case service wrapper for person/note operations.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new person and returns it with the generated id.
    pub fn register(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> StoreResult<Person> {
        let mut person = Person::new(first_name, last_name);
        self.repo.create_person(&mut person)?;
        Ok(person)
    }

    /// Attaches a note to an existing person.
    ///
    /// # Contract
    /// - Fails with a not-found error when the person does not exist;
    ///   nothing is persisted in that case.
    pub fn add_note(&self, person_id: PersonId, body: impl Into<String>) -> StoreResult<NoteId> {
        let mut note = Note::new(body);
        self.repo.add_note(person_id, &mut note)
    }

    /// Returns one person with all owned notes.
    pub fn get_person(&self, id: PersonId) -> StoreResult<Person> {
        self.repo.find_person(id)
    }

    /// Returns all persons with their notes.
    pub fn list_persons(&self) -> StoreResult<Vec<Person>> {
        self.repo.list_persons()
    }

    /// Updates name fields of an existing person.
    pub fn update_person(&self, person: &Person) -> StoreResult<()> {
        self.repo.update_person(person)
    }

    /// Removes a person together with all owned notes.
    pub fn remove_person(&self, person: &Person) -> StoreResult<()> {
        self.repo.remove_person(person)
    }
}

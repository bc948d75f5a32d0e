use stockroom_core::{
    new_pool_in_memory, DbPool, PersonService, SqlitePersonRepository, StoreError,
};

fn memory_store() -> (DbPool, PersonService<SqlitePersonRepository>) {
    let pool = new_pool_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(pool.clone()).unwrap();
    (pool, PersonService::new(repo))
}

fn count_notes(pool: &DbPool) -> i64 {
    pool.get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn register_and_fetch_person_with_notes() {
    let (_pool, service) = memory_store();

    let person = service.register("Jane", "Doe").unwrap();
    let person_id = person.id.unwrap();

    service.add_note(person_id, "call supplier").unwrap();
    service.add_note(person_id, "renew contract").unwrap();

    let loaded = service.get_person(person_id).unwrap();
    assert_eq!(loaded.first_name, "Jane");
    assert_eq!(loaded.last_name, "Doe");
    assert_eq!(loaded.notes.len(), 2);
    assert_eq!(loaded.notes[0].body, "call supplier");
    assert_eq!(loaded.notes[1].body, "renew contract");
    assert!(loaded
        .notes
        .iter()
        .all(|note| note.person_id == Some(person_id) && note.created_at.is_some()));
}

#[test]
fn add_note_to_missing_person_fails_and_persists_nothing() {
    let (pool, service) = memory_store();

    let err = service.add_note(99, "orphan note").unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "person",
            id: 99
        }
    ));
    assert_eq!(count_notes(&pool), 0);
}

#[test]
fn add_note_rejects_blank_body() {
    let (pool, service) = memory_store();
    let person = service.register("Jane", "Doe").unwrap();

    let err = service.add_note(person.id.unwrap(), "   ").unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(count_notes(&pool), 0);
}

#[test]
fn update_person_changes_name_fields() {
    let (_pool, service) = memory_store();

    let mut person = service.register("Jane", "Doe").unwrap();
    person.first_name = "Janet".to_string();
    person.last_name = "Smith".to_string();
    service.update_person(&person).unwrap();

    let loaded = service.get_person(person.id.unwrap()).unwrap();
    assert_eq!(loaded.first_name, "Janet");
    assert_eq!(loaded.last_name, "Smith");
}

#[test]
fn update_person_without_id_is_rejected() {
    let (_pool, service) = memory_store();

    let person = stockroom_core::Person::new("Jane", "Doe");
    let err = service.update_person(&person).unwrap_err();
    assert!(matches!(err, StoreError::MissingId("person")));
    assert_eq!(err.to_string(), "person id cannot be null");
}

#[test]
fn remove_person_cascades_owned_notes() {
    let (pool, service) = memory_store();

    let person = service.register("Jane", "Doe").unwrap();
    let person_id = person.id.unwrap();
    service.add_note(person_id, "first").unwrap();
    service.add_note(person_id, "second").unwrap();
    assert_eq!(count_notes(&pool), 2);

    service.remove_person(&person).unwrap();

    assert_eq!(count_notes(&pool), 0);
    assert!(matches!(
        service.get_person(person_id).unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn list_persons_returns_all_with_their_notes() {
    let (_pool, service) = memory_store();

    let first = service.register("Jane", "Doe").unwrap();
    let second = service.register("John", "Roe").unwrap();
    service.add_note(first.id.unwrap(), "only for jane").unwrap();

    let listed = service.list_persons().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[0].notes.len(), 1);
    assert_eq!(listed[1].id, second.id);
    assert!(listed[1].notes.is_empty());
}

#[test]
fn repository_rejects_unmigrated_database() {
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .build(r2d2_sqlite::SqliteConnectionManager::memory())
        .unwrap();

    let result = SqlitePersonRepository::try_new(pool);
    assert!(matches!(
        result,
        Err(StoreError::UninitializedDatabase { .. })
    ));
}

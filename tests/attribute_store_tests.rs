use pretty_assertions::assert_eq;
use schedule_mpx::{
    AttributeStore, DataKind, FieldSet, ProjectError, ProjectFile, ResourceField, TaskField, Value,
};

#[test]
fn unset_fields_read_as_absent() {
    let store: AttributeStore<TaskField> = AttributeStore::new();
    assert!(store.get(TaskField::NAME).is_none());
    assert!(!store.is_set(TaskField::DURATION));
    assert_eq!(store.populated().count(), 0);
}

#[test]
fn put_none_clears_a_slot() {
    let mut store = AttributeStore::new();
    store.put(TaskField::NAME, Some(Value::from("Design")));
    assert_eq!(store.get(TaskField::NAME), Some(&Value::Text("Design".into())));

    store.put(TaskField::NAME, None);
    assert!(store.get(TaskField::NAME).is_none());
}

#[test]
fn populated_slots_come_back_in_identifier_order() {
    let mut store = AttributeStore::new();
    store.put(TaskField::DURATION, Some(Value::from(5)));
    store.put(TaskField::NAME, Some(Value::from("Build")));
    store.put(TaskField::text(1), Some(Value::from("note")));

    let ids: Vec<usize> = store.populated().map(|(field, _)| field.id()).collect();
    assert_eq!(ids, vec![1, 4, 40]);
}

#[test]
fn take_empties_the_slot() {
    let mut store = AttributeStore::new();
    store.put(ResourceField::INITIALS, Some(Value::from("AB")));
    assert_eq!(store.take(ResourceField::INITIALS), Some(Value::from("AB")));
    assert!(!store.is_set(ResourceField::INITIALS));
}

#[test]
fn numbered_families_map_to_stable_identifiers() {
    assert_eq!(TaskField::text(10).id(), 13);
    assert_eq!(TaskField::start(2).id(), 62);
    assert_eq!(TaskField::finish(3).id(), 65);
    assert_eq!(TaskField::flag(10).id(), 119);
    assert_eq!(TaskField::number(5).id(), 144);
    assert!(!TaskField::number(5).is_extended());
    assert!(TaskField::number(6).is_extended());
    assert!(ResourceField::number(1).is_extended());
}

#[test]
#[should_panic(expected = "out of range")]
fn numbered_family_index_is_bounded() {
    let _ = TaskField::text(31);
}

#[test]
fn schema_kinds_drive_formatting() {
    assert_eq!(TaskField::DURATION.kind(), DataKind::Duration);
    assert_eq!(TaskField::PREDECESSORS.kind(), DataKind::RelationList);
    assert_eq!(TaskField::FIXED.kind(), DataKind::TaskType);
    assert_eq!(TaskField::number(1).kind(), DataKind::Numeric);
    assert_eq!(TaskField::number(12).kind(), DataKind::Numeric);
    assert_eq!(ResourceField::MAX_UNITS.kind(), DataKind::Units);
    assert_eq!(ResourceField::ACCRUE_AT.kind(), DataKind::Accrue);
}

#[test]
fn unmapped_identifiers_default_to_text() {
    assert_eq!(TaskField::NAME.kind(), DataKind::Text);
    assert_eq!(TaskField::WBS.kind(), DataKind::Text);
    assert_eq!(ResourceField::EMAIL_ADDRESS.kind(), DataKind::Text);
    assert_eq!(TaskField::schema().kind_of(10_000), DataKind::Text);
}

#[test]
fn extended_number_reads_back_what_was_written() {
    let mut project = ProjectFile::new();
    let key = project.add_resource();
    let resource = project.resource_mut(key);
    resource.set_number(3, 7.5);

    assert_eq!(resource.number(3), Some(7.5));
    assert_eq!(resource.number(4), None);
    assert_eq!(
        resource.get(ResourceField::number(3)),
        Some(&Value::Number(7.5))
    );
}

#[test]
fn identifier_fields_are_owned_by_the_project() {
    let mut project = ProjectFile::new();
    let task = project.add_task();
    let err = project.task_mut(task).set(TaskField::ID, 9).unwrap_err();
    assert!(matches!(err, ProjectError::IdentifierField(_)));
    assert_eq!(project.task(task).id(), Some(1));

    let resource = project.add_resource();
    let err = project
        .resource_mut(resource)
        .set(ResourceField::UNIQUE_ID, 9)
        .unwrap_err();
    assert!(matches!(err, ProjectError::IdentifierField(_)));
}

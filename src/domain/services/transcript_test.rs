use super::EntryKind;
use super::Transcript;
use crate::domain::models::Block;
use crate::domain::models::PlaceholderHandle;
use crate::domain::models::Role;

#[test]
fn it_appends_in_order() {
    let mut transcript = Transcript::default();
    transcript.append(Role::User, "Hello");
    transcript.append(Role::Assistant, "Hi there!");
    transcript.append(Role::Error, "Oops");

    let roles = transcript
        .messages()
        .iter()
        .map(|e| return e.role)
        .collect::<Vec<Role>>();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Error]);
}

#[test]
fn it_formats_assistant_entries() {
    let mut transcript = Transcript::default();
    transcript.append(Role::Assistant, "Steps\n- One\n- Two");

    let messages = transcript.messages();
    assert_eq!(
        messages[0].blocks(),
        &[Block::List(vec![
            "Steps".to_string(),
            "One".to_string(),
            "Two".to_string()
        ])]
    );
}

#[test]
fn it_assigns_unique_ids() {
    let mut transcript = Transcript::default();
    transcript.append(Role::User, "a");
    let handle = transcript.show_loading_placeholder();
    transcript.append(Role::User, "b");

    let ids = transcript
        .entries()
        .iter()
        .map(|e| return e.id)
        .collect::<Vec<u64>>();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(handle, PlaceholderHandle(2));
}

#[test]
fn it_removes_placeholders_once() {
    let mut transcript = Transcript::default();
    let handle = transcript.show_loading_placeholder();
    assert_eq!(transcript.placeholders(), 1);

    assert!(transcript.remove_placeholder(handle));
    assert!(!transcript.remove_placeholder(handle));
    assert_eq!(transcript.placeholders(), 0);
    assert!(transcript.is_empty());
}

#[test]
fn it_removes_the_matching_placeholder_only() {
    let mut transcript = Transcript::default();
    let first = transcript.show_loading_placeholder();
    let second = transcript.show_loading_placeholder();

    assert!(transcript.remove_placeholder(second));
    assert_eq!(transcript.len(), 1);
    assert!(matches!(
        transcript.entries()[0].kind,
        EntryKind::Placeholder(e) if e == first
    ));
}

#[test]
fn it_ignores_messages_when_removing_placeholders() {
    let mut transcript = Transcript::default();
    transcript.append(Role::User, "a");
    assert!(!transcript.remove_placeholder(PlaceholderHandle(1)));
    assert_eq!(transcript.len(), 1);
}

#[test]
fn it_keeps_ids_growing_after_clear() {
    let mut transcript = Transcript::default();
    transcript.append(Role::User, "a");
    transcript.clear();
    assert!(transcript.is_empty());

    transcript.append(Role::User, "b");
    assert_eq!(transcript.entries()[0].id, 2);
}

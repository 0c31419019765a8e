//! Owner-scoped note operations.

use std::sync::Arc;

use super::{non_empty, required};
use crate::db::Database;
use crate::error::ApiError;
use crate::models::{AddNoteRequest, EditNoteRequest, Note, NotePatch, merge_tags, title_tags};

pub struct NoteService {
    db: Arc<Database>,
}

impl NoteService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a note. Its tags are the caller's tags plus the words of the title.
    pub fn add_note(&self, owner_id: &str, req: AddNoteRequest) -> Result<Note, ApiError> {
        let title = required(blank_as_absent(req.title), "title is required")?;
        let content = required(req.content, "content is required")?;
        let tags = merge_tags(&req.tags.unwrap_or_default(), &title);

        let note = self.db.create_note(owner_id, &title, &content, &tags)?;
        log::debug!("[NOTES] User {} added note {}", owner_id, note.id);
        Ok(note)
    }

    /// Change the supplied fields of an owned note. A new title replaces the
    /// whole tag set with the title's words; earlier tags are dropped. A blank
    /// title is ignored.
    pub fn edit_note(
        &self,
        owner_id: &str,
        note_id: &str,
        req: EditNoteRequest,
    ) -> Result<Note, ApiError> {
        let title = blank_as_absent(req.title);
        let patch = NotePatch {
            tags: title.as_deref().map(title_tags),
            title,
            content: non_empty(req.content),
            is_pinned: req.is_pinned,
        };
        if patch.is_empty() {
            return Err(ApiError::NoChanges);
        }

        self.db
            .update_note(note_id, owner_id, &patch)?
            .ok_or(ApiError::NotFound)
    }

    pub fn list_notes(&self, owner_id: &str) -> Result<Vec<Note>, ApiError> {
        Ok(self.db.list_notes(owner_id)?)
    }

    /// Returns `false` when the caller owns no note with that id.
    pub fn delete_note(&self, owner_id: &str, note_id: &str) -> Result<bool, ApiError> {
        let deleted = self.db.delete_note(note_id, owner_id)?;
        if deleted {
            log::debug!("[NOTES] User {} deleted note {}", owner_id, note_id);
        }
        Ok(deleted)
    }

    pub fn toggle_pinned(&self, owner_id: &str, note_id: &str) -> Result<Note, ApiError> {
        self.db
            .toggle_note_pinned(note_id, owner_id)?
            .ok_or(ApiError::NotFound)
    }

    pub fn search(&self, owner_id: &str, query: Option<String>) -> Result<Vec<Note>, ApiError> {
        let query = required(query, "Search query is required")?;
        Ok(self.db.search_notes(owner_id, &query)?)
    }
}

/// A title of only whitespace has no words to tag and counts as missing.
fn blank_as_absent(title: Option<String>) -> Option<String> {
    title.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn setup() -> (NoteService, String, String) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let alice = db.create_user("Alice", "alice@example.com", "hash").unwrap();
        let bob = db.create_user("Bob", "bob@example.com", "hash").unwrap();
        (NoteService::new(db), alice.id, bob.id)
    }

    fn add(svc: &NoteService, owner: &str, title: &str, content: &str) -> Note {
        svc.add_note(
            owner,
            AddNoteRequest {
                title: Some(title.to_string()),
                content: Some(content.to_string()),
                tags: None,
            },
        )
        .unwrap()
    }

    fn tag_set(note: &Note) -> HashSet<&str> {
        note.tags.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_add_note_derives_tags_from_title() {
        let (svc, alice, _) = setup();
        let note = add(&svc, &alice, "Buy milk today", "2 litres");
        assert_eq!(tag_set(&note), HashSet::from(["Buy", "milk", "today"]));
        assert_eq!(note.user_id, alice);
        assert!(!note.is_pinned);
    }

    #[test]
    fn test_add_note_keeps_supplied_tags() {
        let (svc, alice, _) = setup();
        let note = svc
            .add_note(
                &alice,
                AddNoteRequest {
                    title: Some("Buy milk".to_string()),
                    content: Some("now".to_string()),
                    tags: Some(vec!["errands".to_string(), "milk".to_string()]),
                },
            )
            .unwrap();
        assert_eq!(note.tags.len(), 3);
        assert_eq!(tag_set(&note), HashSet::from(["errands", "milk", "Buy"]));
    }

    #[test]
    fn test_add_note_validation() {
        let (svc, alice, _) = setup();
        let err = svc
            .add_note(
                &alice,
                AddNoteRequest {
                    title: Some(String::new()),
                    content: Some("body".to_string()),
                    tags: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation("title is required")));

        let err = svc
            .add_note(
                &alice,
                AddNoteRequest {
                    title: Some("Title".to_string()),
                    content: None,
                    tags: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation("content is required")));
    }

    #[test]
    fn test_edit_title_replaces_tags() {
        let (svc, alice, _) = setup();
        let note = svc
            .add_note(
                &alice,
                AddNoteRequest {
                    title: Some("Old idea".to_string()),
                    content: Some("body".to_string()),
                    tags: Some(vec!["custom".to_string()]),
                },
            )
            .unwrap();

        let edited = svc
            .edit_note(
                &alice,
                &note.id,
                EditNoteRequest {
                    title: Some("New Plan".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.title, "New Plan");
        assert_eq!(edited.content, "body");
        assert_eq!(tag_set(&edited), HashSet::from(["New", "Plan"]));
    }

    #[test]
    fn test_edit_content_keeps_tags() {
        let (svc, alice, _) = setup();
        let note = add(&svc, &alice, "Buy milk", "body");

        let edited = svc
            .edit_note(
                &alice,
                &note.id,
                EditNoteRequest {
                    content: Some("new body".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.tags, note.tags);
        assert_eq!(edited.content, "new body");
    }

    #[test]
    fn test_edit_honours_explicit_false() {
        let (svc, alice, _) = setup();
        let note = add(&svc, &alice, "Pinned", "body");
        svc.toggle_pinned(&alice, &note.id).unwrap();

        let edited = svc
            .edit_note(
                &alice,
                &note.id,
                EditNoteRequest {
                    is_pinned: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!edited.is_pinned);
    }

    #[test]
    fn test_edit_without_changes() {
        let (svc, alice, _) = setup();
        let note = add(&svc, &alice, "Title", "body");
        let err = svc
            .edit_note(
                &alice,
                &note.id,
                EditNoteRequest {
                    title: Some(String::new()),
                    content: Some(String::new()),
                    is_pinned: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::NoChanges));
    }

    #[test]
    fn test_blank_title_is_ignored_on_edit() {
        let (svc, alice, _) = setup();
        let note = add(&svc, &alice, "Buy milk", "body");

        let err = svc
            .edit_note(
                &alice,
                &note.id,
                EditNoteRequest {
                    title: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::NoChanges));

        let edited = svc
            .edit_note(
                &alice,
                &note.id,
                EditNoteRequest {
                    title: Some(" \t ".to_string()),
                    content: Some("new body".to_string()),
                    is_pinned: None,
                },
            )
            .unwrap();
        assert_eq!(edited.title, "Buy milk");
        assert_eq!(edited.tags, note.tags);
        assert_eq!(edited.content, "new body");
    }

    #[test]
    fn test_blank_title_rejected_on_add() {
        let (svc, alice, _) = setup();
        let err = svc
            .add_note(
                &alice,
                AddNoteRequest {
                    title: Some("   ".to_string()),
                    content: Some("body".to_string()),
                    tags: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation("title is required")));
    }

    #[test]
    fn test_other_users_notes_are_not_found() {
        let (svc, alice, bob) = setup();
        let note = add(&svc, &alice, "Private", "mine");

        let err = svc
            .edit_note(
                &bob,
                &note.id,
                EditNoteRequest {
                    content: Some("stolen".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert!(matches!(
            svc.toggle_pinned(&bob, &note.id),
            Err(ApiError::NotFound)
        ));
        assert!(!svc.delete_note(&bob, &note.id).unwrap());
        assert!(svc.list_notes(&bob).unwrap().is_empty());
        assert!(svc.search(&bob, Some("mine".to_string())).unwrap().is_empty());

        let notes = svc.list_notes(&alice).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "mine");
        assert!(!notes[0].is_pinned);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let (svc, alice, _) = setup();
        let note = add(&svc, &alice, "Flip", "flop");
        let once = svc.toggle_pinned(&alice, &note.id).unwrap();
        assert!(once.is_pinned);
        let twice = svc.toggle_pinned(&alice, &note.id).unwrap();
        assert_eq!(twice.is_pinned, note.is_pinned);
    }

    #[test]
    fn test_list_pinned_first() {
        let (svc, alice, _) = setup();
        add(&svc, &alice, "one", "a");
        let pinned = add(&svc, &alice, "two", "b");
        add(&svc, &alice, "three", "c");
        svc.toggle_pinned(&alice, &pinned.id).unwrap();

        let notes = svc.list_notes(&alice).unwrap();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].id, pinned.id);
        assert!(notes[1..].iter().all(|n| !n.is_pinned));
    }

    #[test]
    fn test_search() {
        let (svc, alice, _) = setup();
        let milk = add(&svc, &alice, "Shopping", "I need Milk");
        add(&svc, &alice, "Bakery", "bread");

        let found = svc.search(&alice, Some("milk".to_string())).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, milk.id);

        assert!(matches!(
            svc.search(&alice, None),
            Err(ApiError::Validation("Search query is required"))
        ));
        assert!(matches!(
            svc.search(&alice, Some(String::new())),
            Err(ApiError::Validation("Search query is required"))
        ));
    }

    #[test]
    fn test_delete() {
        let (svc, alice, _) = setup();
        let note = add(&svc, &alice, "Temp", "x");
        assert!(svc.delete_note(&alice, &note.id).unwrap());
        assert!(!svc.delete_note(&alice, &note.id).unwrap());
        assert!(svc.list_notes(&alice).unwrap().is_empty());
    }
}

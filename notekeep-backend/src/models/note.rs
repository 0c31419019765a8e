use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A note owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub user_id: String,
    pub created_on: DateTime<Utc>,
}

/// Columns to change on an owned note. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.is_pinned.is_none()
    }
}

/// Words of a title, used as tags. Repeated words collapse to one.
pub fn title_tags(title: &str) -> Vec<String> {
    dedup_tags(title.split_whitespace().map(str::to_string))
}

/// Tags for a new note: caller-supplied tags plus the title's words.
pub fn merge_tags(supplied: &[String], title: &str) -> Vec<String> {
    dedup_tags(
        supplied
            .iter()
            .cloned()
            .chain(title.split_whitespace().map(str::to_string)),
    )
}

fn dedup_tags(tags: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

// --- Requests ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_pinned: Option<bool>,
}

/// Body of the pin toggle. Accepted for compatibility; the toggle ignores it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinNoteRequest {
    #[allow(dead_code)]
    pub is_pinned: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchNotesQuery {
    pub query: Option<String>,
}

// --- Responses ---

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub error: bool,
    pub note: Note,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub error: bool,
    pub notes: Vec<Note>,
    pub message: String,
}

/// Bare `{ error, message }` envelope.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub error: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(error: bool, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}

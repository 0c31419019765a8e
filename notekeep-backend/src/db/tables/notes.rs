//! Note database operations
//!
//! Every statement that addresses a single note filters on the note id and the
//! owner id together, so a caller can never touch, or learn about, another
//! user's note.

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

use super::super::{Database, DbResult};
use crate::models::{Note, NotePatch};

const NOTE_COLUMNS: &str = "id, title, content, tags, is_pinned, user_id, created_on";

fn row_to_note(row: &Row<'_>) -> rusqlite::Result<Note> {
    let tags_json: String = row.get(3)?;
    let tags = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        tags,
        is_pinned: row.get(4)?,
        user_id: row.get(5)?,
        created_on: row.get(6)?,
    })
}

/// Escape LIKE wildcards so the search term matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl Database {
    pub fn create_note(
        &self,
        user_id: &str,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> DbResult<Note> {
        let conn = self.conn()?;
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.to_vec(),
            is_pinned: false,
            user_id: user_id.to_string(),
            created_on: Utc::now(),
        };

        conn.execute(
            "INSERT INTO notes (id, user_id, title, content, tags, is_pinned, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                note.id,
                note.user_id,
                note.title,
                note.content,
                serde_json::to_string(&note.tags)?,
                note.is_pinned,
                note.created_on,
            ],
        )?;

        Ok(note)
    }

    #[cfg(test)]
    pub fn get_note(&self, note_id: &str, user_id: &str) -> DbResult<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                &format!(
                    "SELECT {} FROM notes WHERE id = ?1 AND user_id = ?2",
                    NOTE_COLUMNS
                ),
                params![note_id, user_id],
                row_to_note,
            )
            .optional()?;
        Ok(note)
    }

    /// Apply `patch` to an owned note and return the updated row, or `None`
    /// when the caller owns no note with that id.
    pub fn update_note(
        &self,
        note_id: &str,
        user_id: &str,
        patch: &NotePatch,
    ) -> DbResult<Option<Note>> {
        let conn = self.conn()?;
        let tags_json = patch.tags.as_ref().map(serde_json::to_string).transpose()?;

        let note = conn
            .query_row(
                &format!(
                    "UPDATE notes SET
                        title = COALESCE(?3, title),
                        content = COALESCE(?4, content),
                        tags = COALESCE(?5, tags),
                        is_pinned = COALESCE(?6, is_pinned)
                     WHERE id = ?1 AND user_id = ?2
                     RETURNING {}",
                    NOTE_COLUMNS
                ),
                params![
                    note_id,
                    user_id,
                    patch.title,
                    patch.content,
                    tags_json,
                    patch.is_pinned,
                ],
                row_to_note,
            )
            .optional()?;
        Ok(note)
    }

    /// Flip the pinned flag of an owned note in one statement.
    pub fn toggle_note_pinned(&self, note_id: &str, user_id: &str) -> DbResult<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                &format!(
                    "UPDATE notes SET is_pinned = NOT is_pinned
                     WHERE id = ?1 AND user_id = ?2
                     RETURNING {}",
                    NOTE_COLUMNS
                ),
                params![note_id, user_id],
                row_to_note,
            )
            .optional()?;
        Ok(note)
    }

    /// Returns whether an owned note was deleted.
    pub fn delete_note(&self, note_id: &str, user_id: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows_affected = conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
            params![note_id, user_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// All notes of a user, pinned ones first, then in insertion order.
    pub fn list_notes(&self, user_id: &str) -> DbResult<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notes WHERE user_id = ?1
             ORDER BY is_pinned DESC, rowid ASC",
            NOTE_COLUMNS
        ))?;
        let notes = stmt
            .query_map(params![user_id], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Case-insensitive substring match on title or content. Both sides are
    /// lower-cased with full Unicode rules before comparing.
    pub fn search_notes(&self, user_id: &str, query: &str) -> DbResult<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notes
             WHERE user_id = ?1
               AND (unicode_lower(title) LIKE ?2 ESCAPE '\\'
                    OR unicode_lower(content) LIKE ?2 ESCAPE '\\')
             ORDER BY is_pinned DESC, rowid ASC",
            NOTE_COLUMNS
        ))?;
        let pattern = like_pattern(&query.to_lowercase());
        let notes = stmt
            .query_map(params![user_id, pattern], row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }
}

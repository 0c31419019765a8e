//! Note endpoints. Every route sits behind the bearer-token gate and only
//! ever touches the caller's own notes.

use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{
    AddNoteRequest, EditNoteRequest, MessageResponse, Note, NoteResponse, NotesResponse,
    PinNoteRequest, SearchNotesQuery,
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/add-note").route(web::post().to(add_note)))
        .service(web::resource("/edit-note/{note_id}").route(web::put().to(edit_note)))
        .service(web::resource("/get-all-notes").route(web::get().to(get_all_notes)))
        .service(web::resource("/delete-note/{note_id}").route(web::delete().to(delete_note)))
        .service(
            web::resource("/update-note-pinned/{note_id}").route(web::put().to(update_note_pinned)),
        )
        .service(web::resource("/search-notes").route(web::get().to(search_notes)));
}

fn note_response(note: Note, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(NoteResponse {
        error: false,
        note,
        message: message.to_string(),
    })
}

fn notes_response(notes: Vec<Note>, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(NotesResponse {
        error: false,
        notes,
        message: message.to_string(),
    })
}

async fn add_note(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<AddNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    match state.notes.add_note(&auth.user.id, body.into_inner()) {
        Ok(note) => Ok(note_response(note, "Todo added successfully")),
        // Store failures on this route answer 200 with the error flag set
        Err(e) if e.is_server_error() => {
            log::error!("[NOTES] Failed to add note for user {}: {}", auth.user.id, e);
            Ok(HttpResponse::Ok().json(MessageResponse::new(true, "Server Error")))
        }
        Err(e) => Err(e),
    }
}

async fn edit_note(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
    body: web::Json<EditNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let note = state
        .notes
        .edit_note(&auth.user.id, &path.into_inner(), body.into_inner())?;
    Ok(note_response(note, "Todo updated successfully"))
}

async fn get_all_notes(
    state: web::Data<AppState>,
    auth: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let notes = state.notes.list_notes(&auth.user.id)?;
    Ok(notes_response(notes, "All todos retrived successfully"))
}

/// Both outcomes answer 200 with `error: true`; only the message differs.
async fn delete_note(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let deleted = state.notes.delete_note(&auth.user.id, &path.into_inner())?;
    let message = if deleted { "Todo deleted" } else { "Todo not found" };
    Ok(HttpResponse::Ok().json(MessageResponse::new(true, message)))
}

/// Flips the stored flag. A body is tolerated but its `isPinned` is ignored.
async fn update_note_pinned(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
    _body: Option<web::Json<PinNoteRequest>>,
) -> Result<HttpResponse, ApiError> {
    let note = state
        .notes
        .toggle_pinned(&auth.user.id, &path.into_inner())?;
    Ok(note_response(note, "Todo updated successfully"))
}

async fn search_notes(
    state: web::Data<AppState>,
    auth: AuthUser,
    query: web::Query<SearchNotesQuery>,
) -> Result<HttpResponse, ApiError> {
    let notes = state
        .notes
        .search(&auth.user.id, query.into_inner().query)?;
    Ok(notes_response(notes, "matching notes found"))
}

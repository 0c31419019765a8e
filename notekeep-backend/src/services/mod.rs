//! Business rules behind the HTTP handlers.
//!
//! Services own no mutable state; the store handle, token codec and TTLs are
//! injected once at startup.

pub mod accounts;
pub mod notes;

pub use accounts::AccountService;
pub use notes::NoteService;

/// Treat absent and empty strings alike.
pub(crate) fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

pub(crate) fn required(
    field: Option<String>,
    message: &'static str,
) -> Result<String, crate::error::ApiError> {
    non_empty(field).ok_or(crate::error::ApiError::Validation(message))
}

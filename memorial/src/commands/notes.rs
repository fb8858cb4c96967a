//! Note-related commands

use crate::app::AppState;
use crate::database::Note;
use crate::error::Result;

/// Public guest book form
pub async fn submit_note(
    state: &AppState,
    name: String,
    message: String,
    image_url: Option<String>,
) -> Result<Note> {
    state
        .notes
        .submit_note(&name, &message, image_url.as_deref())
        .await
}

/// Notes shown on the public wall
pub async fn list_approved_notes(state: &AppState) -> Result<Vec<Note>> {
    state.notes.list_approved().await
}

pub async fn list_pending_notes(state: &AppState) -> Result<Vec<Note>> {
    state.session.require_admin()?;
    state.notes.list_pending().await
}

pub async fn list_all_notes(state: &AppState) -> Result<Vec<Note>> {
    state.session.require_admin()?;
    state.notes.list_all().await
}

pub async fn approve_note(state: &AppState, id: String) -> Result<Option<Note>> {
    state.session.require_admin()?;
    state.notes.approve_note(&id).await
}

pub async fn reject_note(state: &AppState, id: String) -> Result<bool> {
    state.session.require_admin()?;
    state.notes.reject_note(&id).await
}

pub async fn delete_note(state: &AppState, id: String) -> Result<bool> {
    state.session.require_admin()?;
    state.notes.delete_note(&id).await
}

/// Save the drag-and-drop order of the public wall
pub async fn reorder_notes(state: &AppState, ids: Vec<String>) -> Result<()> {
    state.session.require_admin()?;
    state.notes.reorder_approved(&ids).await
}

//! Contact people and contact form commands

use crate::app::AppState;
use crate::database::{
    ContactMessage, ContactMessageInput, ContactPerson, ContactPersonInput, ContactPersonPatch,
};
use crate::error::Result;

pub async fn list_contacts(state: &AppState) -> Result<Vec<ContactPerson>> {
    state.contacts.list().await
}

pub async fn add_contact(state: &AppState, input: ContactPersonInput) -> Result<ContactPerson> {
    state.session.require_admin()?;
    state.contacts.add_contact(input).await
}

pub async fn update_contact(
    state: &AppState,
    id: String,
    patch: ContactPersonPatch,
) -> Result<ContactPerson> {
    state.session.require_admin()?;
    state.contacts.update_contact(&id, patch).await
}

pub async fn delete_contact(state: &AppState, id: String) -> Result<bool> {
    state.session.require_admin()?;
    state.contacts.delete_contact(&id).await
}

pub async fn reorder_contacts(state: &AppState, ids: Vec<String>) -> Result<()> {
    state.session.require_admin()?;
    state.contacts.reorder(&ids).await
}

/// Public contact form
pub async fn send_contact_message(
    state: &AppState,
    input: ContactMessageInput,
) -> Result<ContactMessage> {
    state.contacts.send_message(input).await
}

pub async fn list_contact_messages(state: &AppState) -> Result<Vec<ContactMessage>> {
    state.session.require_admin()?;
    state.contacts.list_messages().await
}

//! Contacts service
//!
//! Ordered list of contact people plus the public contact form.

use super::validation;
use crate::config::{
    MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH, MAX_PHONE_LENGTH, MAX_TITLE_LENGTH,
};
use crate::database::{
    ContactMessage, ContactMessageInput, ContactPerson, ContactPersonInput, ContactPersonPatch,
    SharedBackend,
};
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct ContactsService {
    backend: SharedBackend,
}

impl ContactsService {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub async fn add_contact(&self, input: ContactPersonInput) -> Result<ContactPerson> {
        let input = ContactPersonInput {
            name: validation::required("Name", &input.name, MAX_NAME_LENGTH)?,
            relation: validation::required("Relation", &input.relation, MAX_TITLE_LENGTH)?,
            phone: validation::optional("Phone", input.phone.as_deref(), MAX_PHONE_LENGTH)?,
            email: match input.email.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(email) => Some(validation::email(email)?),
            },
        };

        let contact = self.backend.create_contact(input).await?;

        tracing::info!("Contact added: {} at {}", contact.id, contact.order);

        Ok(contact)
    }

    /// Edit contact details without moving the entry
    pub async fn update_contact(
        &self,
        id: &str,
        patch: ContactPersonPatch,
    ) -> Result<ContactPerson> {
        let patch = ContactPersonPatch {
            name: patch
                .name
                .map(|name| validation::required("Name", &name, MAX_NAME_LENGTH))
                .transpose()?,
            relation: patch
                .relation
                .map(|relation| validation::required("Relation", &relation, MAX_TITLE_LENGTH))
                .transpose()?,
            phone: patch
                .phone
                .map(|phone| {
                    validation::optional("Phone", Some(&phone), MAX_PHONE_LENGTH)
                        .map(Option::unwrap_or_default)
                })
                .transpose()?,
            email: patch
                .email
                .map(|email| {
                    if email.trim().is_empty() {
                        Ok(String::new())
                    } else {
                        validation::email(&email)
                    }
                })
                .transpose()?,
        };

        self.backend
            .update_contact(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Contact", id))
    }

    pub async fn delete_contact(&self, id: &str) -> Result<bool> {
        let deleted = self.backend.delete_contact(id).await?;

        if deleted {
            tracing::info!("Contact deleted: {}", id);
        }

        Ok(deleted)
    }

    pub async fn reorder(&self, ids: &[String]) -> Result<()> {
        self.backend.reorder_contacts(ids).await?;
        tracing::info!("Contacts reordered ({} entries)", ids.len());
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<ContactPerson>> {
        self.backend.list_contacts().await
    }

    pub async fn get(&self, id: &str) -> Result<ContactPerson> {
        self.backend
            .get_contact(id)
            .await?
            .ok_or_else(|| AppError::not_found("Contact", id))
    }

    /// Store a message from the public contact form
    pub async fn send_message(&self, input: ContactMessageInput) -> Result<ContactMessage> {
        let input = ContactMessageInput {
            name: validation::required("Name", &input.name, MAX_NAME_LENGTH)?,
            email: validation::email(&input.email)?,
            phone: validation::optional("Phone", input.phone.as_deref(), MAX_PHONE_LENGTH)?,
            message: validation::required("Message", &input.message, MAX_MESSAGE_LENGTH)?,
        };

        let message = self.backend.create_contact_message(input).await?;

        tracing::info!("Contact message received: {}", message.id);

        Ok(message)
    }

    /// Received messages, newest first
    pub async fn list_messages(&self) -> Result<Vec<ContactMessage>> {
        self.backend.list_contact_messages().await
    }
}

//! Notes service
//!
//! Guest note lifecycle: public submission, admin moderation and the
//! manual ordering of the approved wall.

use super::validation;
use crate::config::{MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH, MAX_URL_LENGTH};
use crate::database::{
    ModerationAction, Note, NoteInput, NotePatch, NoteQuery, NoteStatus, SharedBackend,
};
use crate::error::{AppError, Result};

/// Service for guest notes
#[derive(Clone)]
pub struct NotesService {
    backend: SharedBackend,
}

impl NotesService {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Submit a note from the public form. Always lands as pending.
    pub async fn submit_note(
        &self,
        name: &str,
        message: &str,
        image_url: Option<&str>,
    ) -> Result<Note> {
        let input = NoteInput {
            name: validation::required("Name", name, MAX_NAME_LENGTH)?,
            message: validation::required("Message", message, MAX_MESSAGE_LENGTH)?,
            image_url: validation::optional("Image URL", image_url, MAX_URL_LENGTH)?,
        };

        tracing::info!("Submitting note from {}", input.name);

        let note = self.backend.create_note(input, NoteStatus::Pending).await?;

        tracing::info!("Note submitted for moderation: {}", note.id);

        Ok(note)
    }

    /// Approve a note. Returns the updated note, or `None` for an unknown id.
    pub async fn approve_note(&self, id: &str) -> Result<Option<Note>> {
        self.moderate(id, ModerationAction::Approve).await
    }

    /// Reject a note. Returns `false` for an unknown id.
    pub async fn reject_note(&self, id: &str) -> Result<bool> {
        Ok(self.moderate(id, ModerationAction::Reject).await?.is_some())
    }

    async fn moderate(&self, id: &str, action: ModerationAction) -> Result<Option<Note>> {
        let Some(note) = self.backend.get_note(id).await? else {
            tracing::warn!("Moderation of unknown note: {}", id);
            return Ok(None);
        };

        let next = note.status.apply(action);
        if next == note.status {
            tracing::debug!("Note {} already {}", id, next);
            return Ok(Some(note));
        }

        let updated = self
            .backend
            .update_note(id, NotePatch::status(next))
            .await?;

        if updated.is_some() {
            tracing::info!("Note {} moved {} -> {}", id, note.status, next);
        }

        Ok(updated)
    }

    /// Permanently remove a note
    pub async fn delete_note(&self, id: &str) -> Result<bool> {
        tracing::info!("Deleting note: {}", id);

        let deleted = self.backend.delete_note(id).await?;
        if !deleted {
            tracing::warn!("Delete of unknown note: {}", id);
        }

        Ok(deleted)
    }

    pub async fn get_note(&self, id: &str) -> Result<Note> {
        self.backend
            .get_note(id)
            .await?
            .ok_or_else(|| AppError::not_found("Note", id))
    }

    /// Published wall: manually placed notes after fresh unplaced ones
    pub async fn list_approved(&self) -> Result<Vec<Note>> {
        self.backend.list_notes(NoteQuery::approved()).await
    }

    /// Moderation queue, newest first
    pub async fn list_pending(&self) -> Result<Vec<Note>> {
        self.backend.list_notes(NoteQuery::pending()).await
    }

    pub async fn list_all(&self) -> Result<Vec<Note>> {
        self.backend.list_notes(NoteQuery::all()).await
    }

    /// Persist a new manual order for approved notes.
    ///
    /// Every id must name an approved note; otherwise nothing is written.
    pub async fn reorder_approved(&self, ids: &[String]) -> Result<()> {
        let approved = self.list_approved().await?;

        if let Some(stray) = ids
            .iter()
            .find(|id| !approved.iter().any(|note| &note.id == *id))
        {
            return Err(AppError::InvalidReorder(format!(
                "not an approved note: {}",
                stray
            )));
        }

        self.backend.reorder_notes(ids).await?;

        tracing::info!("Reordered {} approved notes", ids.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::memory_backend;

    async fn create_test_service() -> NotesService {
        NotesService::new(memory_backend().await)
    }

    #[tokio::test]
    async fn test_submit_note_is_pending() {
        let service = create_test_service().await;

        let note = service
            .submit_note("  Ayşe ", " Seni özleyeceğiz ", Some(""))
            .await
            .unwrap();

        assert_eq!(note.status, NoteStatus::Pending);
        assert_eq!(note.name, "Ayşe");
        assert_eq!(note.message, "Seni özleyeceğiz");
        assert!(note.image_url.is_none());

        assert!(service.list_approved().await.unwrap().is_empty());
        assert_eq!(service.list_pending().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_fields() {
        let service = create_test_service().await;

        let result = service.submit_note("", "hello", None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service.submit_note("A", "   ", None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_and_reject() {
        let service = create_test_service().await;

        let first = service.submit_note("A", "one", None).await.unwrap();
        let second = service.submit_note("B", "two", None).await.unwrap();

        let approved = service.approve_note(&first.id).await.unwrap().unwrap();
        assert_eq!(approved.status, NoteStatus::Approved);

        assert!(service.reject_note(&second.id).await.unwrap());
        assert!(service.list_pending().await.unwrap().is_empty());

        let wall = service.list_approved().await.unwrap();
        assert_eq!(wall.len(), 1);
        assert_eq!(wall[0].id, first.id);
    }

    #[tokio::test]
    async fn test_moderation_is_idempotent() {
        let service = create_test_service().await;
        let note = service.submit_note("A", "one", None).await.unwrap();

        service.approve_note(&note.id).await.unwrap();
        let again = service.approve_note(&note.id).await.unwrap().unwrap();
        assert_eq!(again.status, NoteStatus::Approved);

        // Admin may take a published note down again
        assert!(service.reject_note(&note.id).await.unwrap());
        assert_eq!(
            service.get_note(&note.id).await.unwrap().status,
            NoteStatus::Rejected
        );
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let service = create_test_service().await;

        assert!(service.approve_note("missing").await.unwrap().is_none());
        assert!(!service.reject_note("missing").await.unwrap());
        assert!(!service.delete_note("missing").await.unwrap());
        assert!(matches!(
            service.get_note("missing").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_reorder_approved() {
        let service = create_test_service().await;

        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            let note = service.submit_note(name, "msg", None).await.unwrap();
            service.approve_note(&note.id).await.unwrap();
            ids.push(note.id);
        }

        service.reorder_approved(&ids).await.unwrap();

        let wall: Vec<String> = service
            .list_approved()
            .await
            .unwrap()
            .into_iter()
            .map(|note| note.id)
            .collect();
        assert_eq!(wall, ids);
    }

    #[tokio::test]
    async fn test_reorder_refuses_pending_note() {
        let service = create_test_service().await;

        let approved = service.submit_note("A", "one", None).await.unwrap();
        service.approve_note(&approved.id).await.unwrap();
        let pending = service.submit_note("B", "two", None).await.unwrap();

        let result = service
            .reorder_approved(&[approved.id.clone(), pending.id.clone()])
            .await;
        assert!(matches!(result, Err(AppError::InvalidReorder(_))));

        let note = service.get_note(&approved.id).await.unwrap();
        assert!(note.order.is_none());
    }
}

//! Creation events
//!
//! The remote backend publishes an event after a note or contact message
//! has been committed. A [`Notifier`](crate::services::Notifier) consumes
//! them on its own task, so mail delivery never sits on the write path.

use crate::database::{ContactMessage, Note};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum DomainEvent {
    NoteCreated(Note),
    ContactMessageCreated(ContactMessage),
}

impl DomainEvent {
    /// Id of the document that triggered the event
    pub fn document_id(&self) -> &str {
        match self {
            DomainEvent::NoteCreated(note) => &note.id,
            DomainEvent::ContactMessageCreated(message) => &message.id,
        }
    }
}

/// Sending half of the event queue
#[derive(Clone)]
pub struct Outbox {
    tx: Option<mpsc::UnboundedSender<DomainEvent>>,
}

impl Outbox {
    /// Create a connected outbox and the receiver a notifier drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Outbox that drops everything (tests, notifications disabled)
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Queue an event. Never fails the caller: a closed queue is only logged.
    pub fn publish(&self, event: DomainEvent) {
        let Some(tx) = &self.tx else {
            return;
        };

        let id = event.document_id().to_string();
        if tx.send(event).is_err() {
            tracing::warn!("Notification queue closed, dropping event for {}", id);
        } else {
            tracing::debug!("Queued notification for {}", id);
        }
    }
}

//! Services module
//!
//! Business logic services that sit between the command handlers and the
//! active persistence backend.

pub mod contacts;
pub mod content;
pub mod gallery;
pub mod notes;
pub mod notifier;
pub mod session;
pub mod validation;

pub use contacts::ContactsService;
pub use content::{ContentService, VisitCounter};
pub use gallery::GalleryService;
pub use notes::NotesService;
pub use notifier::{DispatchOutcome, Mailer, Notifier, OutgoingEmail, RelayMailer};
pub use session::{AdminSession, SessionStorage};

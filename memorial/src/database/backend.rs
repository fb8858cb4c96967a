//! Persistence backend contract
//!
//! Both the remote document store ([`Repository`](super::Repository)) and
//! the local fallback ([`LocalStore`](crate::storage::LocalStore)) implement
//! this trait. Services hold an `Arc<dyn Backend>` and never learn which
//! one is active.

use super::models::*;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type SharedBackend = Arc<dyn Backend>;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    // ----- notes -----

    async fn list_notes(&self, query: NoteQuery) -> Result<Vec<Note>>;
    async fn get_note(&self, id: &str) -> Result<Option<Note>>;
    /// Store a new note with a fresh id and timestamp
    async fn create_note(&self, input: NoteInput, status: NoteStatus) -> Result<Note>;
    /// Store a complete note as given, keeping its id and timestamp.
    /// Never announced as a new submission.
    async fn import_note(&self, note: Note) -> Result<Note>;
    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>>;
    async fn delete_note(&self, id: &str) -> Result<bool>;
    /// Set `order = index` for every listed note in one atomic write
    async fn reorder_notes(&self, ids: &[String]) -> Result<()>;

    // ----- gallery -----

    async fn list_gallery(&self) -> Result<Vec<GalleryImage>>;
    async fn get_gallery_image(&self, id: &str) -> Result<Option<GalleryImage>>;
    async fn create_gallery_image(&self, input: GalleryImageInput) -> Result<GalleryImage>;
    async fn update_gallery_image(
        &self,
        id: &str,
        patch: GalleryImagePatch,
    ) -> Result<Option<GalleryImage>>;
    async fn delete_gallery_image(&self, id: &str) -> Result<bool>;
    async fn reorder_gallery(&self, ids: &[String]) -> Result<()>;

    // ----- contact people -----

    async fn list_contacts(&self) -> Result<Vec<ContactPerson>>;
    async fn get_contact(&self, id: &str) -> Result<Option<ContactPerson>>;
    async fn create_contact(&self, input: ContactPersonInput) -> Result<ContactPerson>;
    async fn update_contact(
        &self,
        id: &str,
        patch: ContactPersonPatch,
    ) -> Result<Option<ContactPerson>>;
    async fn delete_contact(&self, id: &str) -> Result<bool>;
    async fn reorder_contacts(&self, ids: &[String]) -> Result<()>;

    // ----- contact form -----

    async fn create_contact_message(&self, input: ContactMessageInput) -> Result<ContactMessage>;
    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>>;

    // ----- singletons -----

    async fn get_resume(&self) -> Result<ResumeData>;
    async fn put_resume(&self, resume: &ResumeData) -> Result<()>;
    async fn get_achievements(&self) -> Result<AchievementsData>;
    async fn put_achievements(&self, achievements: &AchievementsData) -> Result<()>;
    async fn get_hero(&self) -> Result<HeroContent>;
    async fn put_hero(&self, hero: &HeroContent) -> Result<()>;
    async fn get_stats(&self) -> Result<Option<SiteStats>>;
    async fn put_stats(&self, stats: &SiteStats) -> Result<()>;
}

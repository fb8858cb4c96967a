//! Local fallback backend
//!
//! Mirrors browser local storage: one JSON value per key, namespaced with
//! [`LOCAL_STORAGE_PREFIX`]. A key that was never written reads as the
//! fixed fallback content. Every mutation rewrites the whole value for its
//! key with a single temp-file-and-rename, so a reorder lands at once or
//! not at all.
//!
//! Example: the notes collection lives at `local/memorial_notes.json`

use crate::config::{
    ACHIEVEMENTS_KEY, CONTACTS_COLLECTION, CONTACT_MESSAGES_COLLECTION, GALLERY_COLLECTION,
    HERO_KEY, LOCAL_STORAGE_PREFIX, NOTES_COLLECTION, RESUME_KEY, STATS_KEY,
};
use crate::database::ordering::{apply_reorder, next_order, sort_by_order, sort_notes};
use crate::database::*;
use crate::error::Result;
use crate::seed::FallbackContent;
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Values returned for keys that were never written
struct Fallback {
    notes: Vec<Note>,
    gallery: Vec<GalleryImage>,
    contacts: Vec<ContactPerson>,
    resume: LocalizedText,
    achievements: LocalizedText,
    hero: HeroContent,
}

impl Fallback {
    fn from_content(content: &FallbackContent) -> Self {
        Self {
            notes: content.notes(),
            gallery: content.gallery(),
            contacts: content.contacts(),
            resume: content.resume(),
            achievements: content.achievements(),
            hero: content.hero(),
        }
    }
}

/// File-backed key-value store standing in for browser local storage
#[derive(Clone)]
pub struct LocalStore {
    root: PathBuf,
    fallback: Arc<Fallback>,
    write_lock: Arc<Mutex<()>>,
}

impl LocalStore {
    /// Create a store rooted at `root`, seeded with the fixed fallback content
    pub fn new(root: PathBuf) -> Result<Self> {
        let content = FallbackContent::load()?;
        Ok(Self {
            root,
            fallback: Arc::new(Fallback::from_content(&content)),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Create the storage directory if needed
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Local store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Overwrite every key with the fallback content
    pub async fn reset_all_data(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        self.write_key(NOTES_COLLECTION, &self.fallback.notes).await?;
        self.write_key(GALLERY_COLLECTION, &self.fallback.gallery).await?;
        self.write_key(CONTACTS_COLLECTION, &self.fallback.contacts).await?;
        self.write_key(RESUME_KEY, &self.fallback.resume).await?;
        self.write_key(ACHIEVEMENTS_KEY, &self.fallback.achievements).await?;
        self.write_key(HERO_KEY, &self.fallback.hero).await?;

        tracing::info!("Local store reset to fallback content");
        Ok(())
    }

    fn key_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{}{}.json", LOCAL_STORAGE_PREFIX, name))
    }

    /// Read a key; only a key that was never written yields `None`
    async fn read_key<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.key_path(name);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                tracing::error!("Error reading {}{} from local storage: {}", LOCAL_STORAGE_PREFIX, name, e);
                return Err(e.into());
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!("Error parsing {}{} from local storage: {}", LOCAL_STORAGE_PREFIX, name, e);
                Err(e.into())
            }
        }
    }

    async fn read_or<T: DeserializeOwned + Clone>(&self, name: &str, fallback: &T) -> Result<T> {
        Ok(self
            .read_key(name)
            .await?
            .unwrap_or_else(|| fallback.clone()))
    }

    /// Replace the whole value of a key
    async fn write_key<T: Serialize + Sync>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.key_path(name);
        let data = serde_json::to_vec(value)?;

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!("Wrote {}{} ({} bytes)", LOCAL_STORAGE_PREFIX, name, data.len());
        Ok(())
    }

    async fn notes(&self) -> Result<Vec<Note>> {
        self.read_or(NOTES_COLLECTION, &self.fallback.notes).await
    }

    async fn gallery(&self) -> Result<Vec<GalleryImage>> {
        self.read_or(GALLERY_COLLECTION, &self.fallback.gallery).await
    }

    async fn contacts(&self) -> Result<Vec<ContactPerson>> {
        self.read_or(CONTACTS_COLLECTION, &self.fallback.contacts).await
    }

    async fn messages(&self) -> Result<Vec<ContactMessage>> {
        Ok(self
            .read_key(CONTACT_MESSAGES_COLLECTION)
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl Backend for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list_notes(&self, query: NoteQuery) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .notes()
            .await?
            .into_iter()
            .filter(|note| query.matches(note))
            .collect();

        sort_notes(&mut notes, query.sort);
        Ok(notes)
    }

    async fn get_note(&self, id: &str) -> Result<Option<Note>> {
        Ok(self.notes().await?.into_iter().find(|note| note.id == id))
    }

    async fn create_note(&self, input: NoteInput, status: NoteStatus) -> Result<Note> {
        let _guard = self.write_lock.lock().await;

        let mut notes = self.notes().await?;
        let note = Note {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            message: input.message,
            image_url: input.image_url,
            created_at: Utc::now(),
            status,
            order: None,
        };
        notes.push(note.clone());
        self.write_key(NOTES_COLLECTION, &notes).await?;

        // No mail relay behind local storage; the admin only sees this in the log
        tracing::info!(
            "Local notice: new {} note from {} ({} chars, image: {})",
            note.status,
            note.name,
            note.message.chars().count(),
            note.image_url.is_some()
        );

        Ok(note)
    }

    async fn import_note(&self, note: Note) -> Result<Note> {
        let _guard = self.write_lock.lock().await;

        let mut notes = self.notes().await?;
        notes.retain(|existing| existing.id != note.id);
        notes.push(note.clone());
        self.write_key(NOTES_COLLECTION, &notes).await?;

        Ok(note)
    }

    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>> {
        let _guard = self.write_lock.lock().await;

        let mut notes = self.notes().await?;
        let Some(note) = notes.iter_mut().find(|note| note.id == id) else {
            return Ok(None);
        };

        patch.apply_to(note);
        let updated = note.clone();
        self.write_key(NOTES_COLLECTION, &notes).await?;

        Ok(Some(updated))
    }

    async fn delete_note(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut notes = self.notes().await?;
        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() == before {
            return Ok(false);
        }

        self.write_key(NOTES_COLLECTION, &notes).await?;
        Ok(true)
    }

    async fn reorder_notes(&self, ids: &[String]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut notes = self.notes().await?;
        apply_reorder(&mut notes, ids)?;
        self.write_key(NOTES_COLLECTION, &notes).await
    }

    async fn list_gallery(&self) -> Result<Vec<GalleryImage>> {
        let mut images = self.gallery().await?;
        sort_by_order(&mut images);
        Ok(images)
    }

    async fn get_gallery_image(&self, id: &str) -> Result<Option<GalleryImage>> {
        Ok(self.gallery().await?.into_iter().find(|image| image.id == id))
    }

    async fn create_gallery_image(&self, input: GalleryImageInput) -> Result<GalleryImage> {
        let _guard = self.write_lock.lock().await;

        let mut images = self.gallery().await?;
        let image = GalleryImage {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            image_url: input.image_url,
            created_at: Utc::now(),
            order: next_order(images.len()),
        };
        images.push(image.clone());
        self.write_key(GALLERY_COLLECTION, &images).await?;

        Ok(image)
    }

    async fn update_gallery_image(
        &self,
        id: &str,
        patch: GalleryImagePatch,
    ) -> Result<Option<GalleryImage>> {
        let _guard = self.write_lock.lock().await;

        let mut images = self.gallery().await?;
        let Some(image) = images.iter_mut().find(|image| image.id == id) else {
            return Ok(None);
        };

        patch.apply_to(image);
        let updated = image.clone();
        self.write_key(GALLERY_COLLECTION, &images).await?;

        Ok(Some(updated))
    }

    async fn delete_gallery_image(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut images = self.gallery().await?;
        let before = images.len();
        images.retain(|image| image.id != id);
        if images.len() == before {
            return Ok(false);
        }

        self.write_key(GALLERY_COLLECTION, &images).await?;
        Ok(true)
    }

    async fn reorder_gallery(&self, ids: &[String]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut images = self.gallery().await?;
        apply_reorder(&mut images, ids)?;
        self.write_key(GALLERY_COLLECTION, &images).await
    }

    async fn list_contacts(&self) -> Result<Vec<ContactPerson>> {
        let mut contacts = self.contacts().await?;
        sort_by_order(&mut contacts);
        Ok(contacts)
    }

    async fn get_contact(&self, id: &str) -> Result<Option<ContactPerson>> {
        Ok(self
            .contacts()
            .await?
            .into_iter()
            .find(|contact| contact.id == id))
    }

    async fn create_contact(&self, input: ContactPersonInput) -> Result<ContactPerson> {
        let _guard = self.write_lock.lock().await;

        let mut contacts = self.contacts().await?;
        let contact = ContactPerson {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            relation: input.relation,
            phone: input.phone,
            email: input.email,
            created_at: Utc::now(),
            order: next_order(contacts.len()),
        };
        contacts.push(contact.clone());
        self.write_key(CONTACTS_COLLECTION, &contacts).await?;

        Ok(contact)
    }

    async fn update_contact(
        &self,
        id: &str,
        patch: ContactPersonPatch,
    ) -> Result<Option<ContactPerson>> {
        let _guard = self.write_lock.lock().await;

        let mut contacts = self.contacts().await?;
        let Some(contact) = contacts.iter_mut().find(|contact| contact.id == id) else {
            return Ok(None);
        };

        patch.apply_to(contact);
        let updated = contact.clone();
        self.write_key(CONTACTS_COLLECTION, &contacts).await?;

        Ok(Some(updated))
    }

    async fn delete_contact(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut contacts = self.contacts().await?;
        let before = contacts.len();
        contacts.retain(|contact| contact.id != id);
        if contacts.len() == before {
            return Ok(false);
        }

        self.write_key(CONTACTS_COLLECTION, &contacts).await?;
        Ok(true)
    }

    async fn reorder_contacts(&self, ids: &[String]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut contacts = self.contacts().await?;
        apply_reorder(&mut contacts, ids)?;
        self.write_key(CONTACTS_COLLECTION, &contacts).await
    }

    async fn create_contact_message(&self, input: ContactMessageInput) -> Result<ContactMessage> {
        let _guard = self.write_lock.lock().await;

        let mut messages = self.messages().await?;
        let message = ContactMessage {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            message: input.message,
            created_at: Utc::now(),
        };
        messages.push(message.clone());
        self.write_key(CONTACT_MESSAGES_COLLECTION, &messages).await?;

        tracing::info!("Local notice: contact message from {}", message.email);
        Ok(message)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>> {
        let mut messages = self.messages().await?;
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    async fn get_resume(&self) -> Result<ResumeData> {
        self.read_or(RESUME_KEY, &self.fallback.resume).await
    }

    async fn put_resume(&self, resume: &ResumeData) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_key(RESUME_KEY, resume).await
    }

    async fn get_achievements(&self) -> Result<AchievementsData> {
        self.read_or(ACHIEVEMENTS_KEY, &self.fallback.achievements)
            .await
    }

    async fn put_achievements(&self, achievements: &AchievementsData) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_key(ACHIEVEMENTS_KEY, achievements).await
    }

    async fn get_hero(&self) -> Result<HeroContent> {
        self.read_or(HERO_KEY, &self.fallback.hero).await
    }

    async fn put_hero(&self, hero: &HeroContent) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_key(HERO_KEY, hero).await
    }

    async fn get_stats(&self) -> Result<Option<SiteStats>> {
        self.read_key(STATS_KEY).await
    }

    async fn put_stats(&self, stats: &SiteStats) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_key(STATS_KEY, stats).await
    }
}

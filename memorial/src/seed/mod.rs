//! Fixed fallback content
//!
//! The same content seeds an empty remote store and answers every read of
//! a local key that has never been written.

use crate::database::{
    Backend, ContactPerson, ContactPersonInput, GalleryImage, GalleryImageInput, HeroContent,
    LocalizedText, Note, NoteQuery, NoteStatus,
};
use crate::error::Result;
use chrono::{Duration, Utc};
use serde::Deserialize;

const FALLBACK_JSON: &str = include_str!("fallback.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedNote {
    id: String,
    name: String,
    message: String,
    #[serde(default)]
    image_url: Option<String>,
    age_days: i64,
    status: NoteStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedImage {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    image_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedContact {
    id: String,
    name: String,
    relation: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Parsed fallback content
#[derive(Debug, Deserialize)]
pub struct FallbackContent {
    hero: HeroContent,
    resume: String,
    achievements: String,
    notes: Vec<SeedNote>,
    gallery: Vec<SeedImage>,
    contacts: Vec<SeedContact>,
}

impl FallbackContent {
    pub fn load() -> Result<Self> {
        Ok(serde_json::from_str(FALLBACK_JSON)?)
    }

    /// Notes with fixed ids, backdated by their configured age
    pub fn notes(&self) -> Vec<Note> {
        let now = Utc::now();
        self.notes
            .iter()
            .map(|seed| Note {
                id: seed.id.clone(),
                name: seed.name.clone(),
                message: seed.message.clone(),
                image_url: seed.image_url.clone(),
                created_at: now - Duration::days(seed.age_days),
                status: seed.status,
                order: None,
            })
            .collect()
    }

    pub fn gallery(&self) -> Vec<GalleryImage> {
        let now = Utc::now();
        self.gallery
            .iter()
            .enumerate()
            .map(|(position, seed)| GalleryImage {
                id: seed.id.clone(),
                title: seed.title.clone(),
                description: seed.description.clone(),
                image_url: seed.image_url.clone(),
                created_at: now,
                order: position as i64,
            })
            .collect()
    }

    pub fn contacts(&self) -> Vec<ContactPerson> {
        let now = Utc::now();
        self.contacts
            .iter()
            .enumerate()
            .map(|(position, seed)| ContactPerson {
                id: seed.id.clone(),
                name: seed.name.clone(),
                relation: seed.relation.clone(),
                phone: seed.phone.clone(),
                email: seed.email.clone(),
                created_at: now,
                order: position as i64,
            })
            .collect()
    }

    pub fn resume(&self) -> LocalizedText {
        LocalizedText {
            content: self.resume.clone(),
            content_en: String::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn achievements(&self) -> LocalizedText {
        LocalizedText {
            content: self.achievements.clone(),
            content_en: String::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn hero(&self) -> HeroContent {
        self.hero.clone()
    }
}

/// Load the fallback content into a backend that has no notes yet.
///
/// Returns `false` when data already exists and nothing was written.
pub async fn seed_initial_data(backend: &dyn Backend) -> Result<bool> {
    let existing = backend.list_notes(NoteQuery::all()).await?;
    if !existing.is_empty() {
        tracing::info!("Data already exists, skipping seed");
        return Ok(false);
    }

    tracing::info!("Seeding initial data into {} backend", backend.name());
    let content = FallbackContent::load()?;

    backend.put_hero(&content.hero()).await?;
    backend.put_resume(&content.resume()).await?;
    backend.put_achievements(&content.achievements()).await?;

    // Only published notes, keeping their fixed ids and backdated timestamps
    for note in content
        .notes()
        .into_iter()
        .filter(|note| note.status == NoteStatus::Approved)
    {
        backend.import_note(note).await?;
    }

    for image in content.gallery() {
        backend
            .create_gallery_image(GalleryImageInput {
                title: image.title,
                description: image.description,
                image_url: image.image_url,
            })
            .await?;
    }

    for contact in content.contacts() {
        backend
            .create_contact(ContactPersonInput {
                name: contact.name,
                relation: contact.relation,
                phone: contact.phone,
                email: contact.email,
            })
            .await?;
    }

    tracing::info!("Initial data seeded successfully");
    Ok(true)
}

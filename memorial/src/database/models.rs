//! Database models
//!
//! Rust structs representing stored documents.
//! All models use serde with camelCase fields so both backends and the
//! frontend share one JSON shape.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Moderation state of a guest note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Pending,
    Approved,
    Rejected,
}

/// Admin decision on a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl NoteStatus {
    /// Resulting status after an admin decision.
    ///
    /// Both actions are idempotent and nothing ever leads back to `Pending`.
    pub fn apply(self, action: ModerationAction) -> NoteStatus {
        match action {
            ModerationAction::Approve => NoteStatus::Approved,
            ModerationAction::Reject => NoteStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Pending => "pending",
            NoteStatus::Approved => "approved",
            NoteStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(NoteStatus::Pending),
            "approved" => Ok(NoteStatus::Approved),
            "rejected" => Ok(NoteStatus::Rejected),
            other => Err(AppError::Generic(format!("Unknown note status: {}", other))),
        }
    }
}

impl TryFrom<String> for NoteStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A guest-submitted note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: NoteStatus,
    /// Manual position among approved notes, set only by a reorder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(rename = "sort_order")]
    pub order: Option<i64>,
}

/// Public note submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial note update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    pub name: Option<String>,
    pub message: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<NoteStatus>,
}

impl NotePatch {
    pub fn status(status: NoteStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply_to(self, note: &mut Note) {
        if let Some(name) = self.name {
            note.name = name;
        }
        if let Some(message) = self.message {
            note.message = message;
        }
        if let Some(image_url) = self.image_url {
            note.image_url = Some(image_url);
        }
        if let Some(status) = self.status {
            note.status = status;
        }
    }
}

/// Ordering applied to a note listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteSort {
    /// Creation time, newest first
    #[default]
    Newest,
    /// Notes never placed by hand first (newest first), then by manual order
    Manual,
}

/// Filter and sort for a note listing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteQuery {
    pub status: Option<NoteStatus>,
    pub sort: NoteSort,
}

impl NoteQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn approved() -> Self {
        Self {
            status: Some(NoteStatus::Approved),
            sort: NoteSort::Manual,
        }
    }

    pub fn pending() -> Self {
        Self {
            status: Some(NoteStatus::Pending),
            sort: NoteSort::Newest,
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        self.status.map_or(true, |status| note.status == status)
    }
}

/// A photo in the gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
}

/// A blank value in a patch clears an optional field
fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImagePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl GalleryImagePatch {
    pub fn apply_to(self, image: &mut GalleryImage) {
        if let Some(title) = self.title {
            image.title = title;
        }
        if let Some(description) = self.description {
            image.description = non_blank(description);
        }
        if let Some(image_url) = self.image_url {
            image.image_url = image_url;
        }
    }
}

/// A family member or friend listed on the contact page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactPerson {
    pub id: String,
    pub name: String,
    pub relation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPersonInput {
    pub name: String,
    pub relation: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPersonPatch {
    pub name: Option<String>,
    pub relation: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactPersonPatch {
    pub fn apply_to(self, contact: &mut ContactPerson) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(relation) = self.relation {
            contact.relation = relation;
        }
        if let Some(phone) = self.phone {
            contact.phone = non_blank(phone);
        }
        if let Some(email) = self.email {
            contact.email = non_blank(email);
        }
    }
}

/// Message sent through the public contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

/// Site language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Tr,
    En,
}

/// Free-text singleton with an optional English version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_en: String,
    pub last_updated: DateTime<Utc>,
}

impl LocalizedText {
    pub fn empty() -> Self {
        Self {
            content: String::new(),
            content_en: String::new(),
            last_updated: Utc::now(),
        }
    }

    /// Text for the requested language, falling back to Turkish
    pub fn content_for(&self, lang: Lang) -> &str {
        match lang {
            Lang::En if !self.content_en.trim().is_empty() => &self.content_en,
            _ => &self.content,
        }
    }
}

pub type ResumeData = LocalizedText;
pub type AchievementsData = LocalizedText;

/// Landing page header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub image_url: String,
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            title: "Yeşim Özgen".to_string(),
            subtitle: "Hayatı, dokunduğu kalpler ve geride bıraktığı ilham verici mirası hakkında kısa, içten bir giriş.".to_string(),
            image_url: String::new(),
        }
    }
}

/// Visit counter document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SiteStats {
    #[serde(default)]
    pub views: u64,
}

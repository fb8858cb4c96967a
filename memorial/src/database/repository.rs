//! Repository layer for the remote document store
//!
//! One table per collection plus a `settings` table holding JSON
//! singletons. Writes that touch more than one row run in a transaction;
//! committed guest submissions are announced on the outbox.

use super::backend::Backend;
use super::models::*;
use super::ordering::{next_order, sort_by_order, sort_notes, validate_reorder};
use crate::config::{ACHIEVEMENTS_KEY, HERO_KEY, RESUME_KEY, SETTINGS_COLLECTION, STATS_KEY};
use crate::error::Result;
use crate::events::{DomainEvent, Outbox};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashSet;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
    outbox: Outbox,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            outbox: Outbox::disabled(),
        }
    }

    /// Repository whose committed submissions are published to `outbox`
    pub fn with_outbox(pool: SqlitePool, outbox: Outbox) -> Self {
        Self { pool, outbox }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Rewrite `sort_order` for a batch of ids in one transaction.
    ///
    /// `table` is always one of the fixed collection names.
    async fn reorder_table(&self, table: &'static str, ids: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let existing: Vec<String> = sqlx::query_scalar(&format!("SELECT id FROM {}", table))
            .fetch_all(&mut *tx)
            .await?;
        let existing: HashSet<String> = existing.into_iter().collect();

        validate_reorder(ids, |id| existing.contains(id))?;

        let statement = format!("UPDATE {} SET sort_order = ? WHERE id = ?", table);
        for (position, id) in ids.iter().enumerate() {
            sqlx::query(&statement)
                .bind(position as i64)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Reordered {} items in {}", ids.len(), table);
        Ok(())
    }

    async fn delete_from(&self, table: &'static str, id: &str) -> Result<bool> {
        let rows = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table))
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!("Deleted {} from {}: {}", id, table, rows > 0);
        Ok(rows > 0)
    }

    async fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let value: Option<String> = sqlx::query_scalar(&format!(
            "SELECT value FROM {} WHERE key = ?",
            SETTINGS_COLLECTION
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Overwrite a singleton document
    async fn put_setting<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;

        sqlx::query(&format!(
            r#"
            INSERT INTO {} (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            SETTINGS_COLLECTION
        ))
        .bind(key)
        .bind(&json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Set setting: {}", key);
        Ok(())
    }
}

#[async_trait]
impl Backend for Repository {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn list_notes(&self, query: NoteQuery) -> Result<Vec<Note>> {
        let mut notes = match query.status {
            Some(status) => {
                sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE status = ?")
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Note>("SELECT * FROM notes")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        sort_notes(&mut notes, query.sort);
        Ok(notes)
    }

    async fn get_note(&self, id: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(note)
    }

    async fn create_note(&self, input: NoteInput, status: NoteStatus) -> Result<Note> {
        let id = Uuid::new_v4().to_string();

        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, name, message, image_url, created_at, status)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.message)
        .bind(&input.image_url)
        .bind(Utc::now())
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created note: {} ({})", id, status);

        // Only guest submissions wait for a moderator
        if note.status == NoteStatus::Pending {
            self.outbox.publish(DomainEvent::NoteCreated(note.clone()));
        }

        Ok(note)
    }

    async fn import_note(&self, note: Note) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, name, message, image_url, created_at, status, sort_order)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&note.id)
        .bind(&note.name)
        .bind(&note.message)
        .bind(&note.image_url)
        .bind(note.created_at)
        .bind(note.status.as_str())
        .bind(note.order)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Imported note: {} ({})", note.id, note.status);
        Ok(note)
    }

    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut note) = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        patch.apply_to(&mut note);

        sqlx::query("UPDATE notes SET name = ?, message = ?, image_url = ?, status = ? WHERE id = ?")
            .bind(&note.name)
            .bind(&note.message)
            .bind(&note.image_url)
            .bind(note.status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Updated note: {}", id);
        Ok(Some(note))
    }

    async fn delete_note(&self, id: &str) -> Result<bool> {
        self.delete_from("notes", id).await
    }

    async fn reorder_notes(&self, ids: &[String]) -> Result<()> {
        self.reorder_table("notes", ids).await
    }

    async fn list_gallery(&self) -> Result<Vec<GalleryImage>> {
        let mut images = sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery")
            .fetch_all(&self.pool)
            .await?;

        sort_by_order(&mut images);
        Ok(images)
    }

    async fn get_gallery_image(&self, id: &str) -> Result<Option<GalleryImage>> {
        let image = sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(image)
    }

    async fn create_gallery_image(&self, input: GalleryImageInput) -> Result<GalleryImage> {
        let id = Uuid::new_v4().to_string();
        let mut tx = self.pool.begin().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gallery")
            .fetch_one(&mut *tx)
            .await?;

        let image = sqlx::query_as::<_, GalleryImage>(
            r#"
            INSERT INTO gallery (id, title, description, image_url, created_at, sort_order)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(Utc::now())
        .bind(next_order(count as usize))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Created gallery image: {} at {}", id, image.order);
        Ok(image)
    }

    async fn update_gallery_image(
        &self,
        id: &str,
        patch: GalleryImagePatch,
    ) -> Result<Option<GalleryImage>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut image) = sqlx::query_as::<_, GalleryImage>("SELECT * FROM gallery WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        patch.apply_to(&mut image);

        sqlx::query("UPDATE gallery SET title = ?, description = ?, image_url = ? WHERE id = ?")
            .bind(&image.title)
            .bind(&image.description)
            .bind(&image.image_url)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Updated gallery image: {}", id);
        Ok(Some(image))
    }

    async fn delete_gallery_image(&self, id: &str) -> Result<bool> {
        self.delete_from("gallery", id).await
    }

    async fn reorder_gallery(&self, ids: &[String]) -> Result<()> {
        self.reorder_table("gallery", ids).await
    }

    async fn list_contacts(&self) -> Result<Vec<ContactPerson>> {
        let mut contacts = sqlx::query_as::<_, ContactPerson>("SELECT * FROM contacts")
            .fetch_all(&self.pool)
            .await?;

        sort_by_order(&mut contacts);
        Ok(contacts)
    }

    async fn get_contact(&self, id: &str) -> Result<Option<ContactPerson>> {
        let contact = sqlx::query_as::<_, ContactPerson>("SELECT * FROM contacts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contact)
    }

    async fn create_contact(&self, input: ContactPersonInput) -> Result<ContactPerson> {
        let id = Uuid::new_v4().to_string();
        let mut tx = self.pool.begin().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&mut *tx)
            .await?;

        let contact = sqlx::query_as::<_, ContactPerson>(
            r#"
            INSERT INTO contacts (id, name, relation, phone, email, created_at, sort_order)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.relation)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(Utc::now())
        .bind(next_order(count as usize))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Created contact: {} at {}", id, contact.order);
        Ok(contact)
    }

    async fn update_contact(
        &self,
        id: &str,
        patch: ContactPersonPatch,
    ) -> Result<Option<ContactPerson>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut contact) =
            sqlx::query_as::<_, ContactPerson>("SELECT * FROM contacts WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Ok(None);
        };

        patch.apply_to(&mut contact);

        sqlx::query("UPDATE contacts SET name = ?, relation = ?, phone = ?, email = ? WHERE id = ?")
            .bind(&contact.name)
            .bind(&contact.relation)
            .bind(&contact.phone)
            .bind(&contact.email)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Updated contact: {}", id);
        Ok(Some(contact))
    }

    async fn delete_contact(&self, id: &str) -> Result<bool> {
        self.delete_from("contacts", id).await
    }

    async fn reorder_contacts(&self, ids: &[String]) -> Result<()> {
        self.reorder_table("contacts", ids).await
    }

    async fn create_contact_message(&self, input: ContactMessageInput) -> Result<ContactMessage> {
        let id = Uuid::new_v4().to_string();

        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (id, name, email, phone, message, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created contact message: {}", id);
        self.outbox
            .publish(DomainEvent::ContactMessageCreated(message.clone()));

        Ok(message)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT * FROM contact_messages ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn get_resume(&self) -> Result<ResumeData> {
        Ok(self
            .get_setting(RESUME_KEY)
            .await?
            .unwrap_or_else(LocalizedText::empty))
    }

    async fn put_resume(&self, resume: &ResumeData) -> Result<()> {
        self.put_setting(RESUME_KEY, resume).await
    }

    async fn get_achievements(&self) -> Result<AchievementsData> {
        Ok(self
            .get_setting(ACHIEVEMENTS_KEY)
            .await?
            .unwrap_or_else(LocalizedText::empty))
    }

    async fn put_achievements(&self, achievements: &AchievementsData) -> Result<()> {
        self.put_setting(ACHIEVEMENTS_KEY, achievements).await
    }

    async fn get_hero(&self) -> Result<HeroContent> {
        Ok(self.get_setting(HERO_KEY).await?.unwrap_or_default())
    }

    async fn put_hero(&self, hero: &HeroContent) -> Result<()> {
        self.put_setting(HERO_KEY, hero).await
    }

    async fn get_stats(&self) -> Result<Option<SiteStats>> {
        self.get_setting(STATS_KEY).await
    }

    async fn put_stats(&self, stats: &SiteStats) -> Result<()> {
        self.put_setting(STATS_KEY, stats).await
    }
}

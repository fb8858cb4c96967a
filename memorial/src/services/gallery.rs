//! Gallery service

use super::validation;
use crate::config::{MAX_MESSAGE_LENGTH, MAX_TITLE_LENGTH, MAX_URL_LENGTH};
use crate::database::{GalleryImage, GalleryImageInput, GalleryImagePatch, SharedBackend};
use crate::error::{AppError, Result};

/// Service for the photo gallery
#[derive(Clone)]
pub struct GalleryService {
    backend: SharedBackend,
}

impl GalleryService {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Append an image at the end of the gallery
    pub async fn add_image(&self, input: GalleryImageInput) -> Result<GalleryImage> {
        let input = GalleryImageInput {
            title: validation::required("Title", &input.title, MAX_TITLE_LENGTH)?,
            description: validation::optional(
                "Description",
                input.description.as_deref(),
                MAX_MESSAGE_LENGTH,
            )?,
            image_url: validation::required("Image URL", &input.image_url, MAX_URL_LENGTH)?,
        };

        let image = self.backend.create_gallery_image(input).await?;

        tracing::info!("Gallery image added: {} at {}", image.id, image.order);

        Ok(image)
    }

    /// Edit title, description or URL. Position is untouched.
    pub async fn update_image(&self, id: &str, patch: GalleryImagePatch) -> Result<GalleryImage> {
        let patch = GalleryImagePatch {
            title: patch
                .title
                .map(|title| validation::required("Title", &title, MAX_TITLE_LENGTH))
                .transpose()?,
            description: patch
                .description
                .map(|text| {
                    validation::optional("Description", Some(&text), MAX_MESSAGE_LENGTH)
                        .map(Option::unwrap_or_default)
                })
                .transpose()?,
            image_url: patch
                .image_url
                .map(|url| validation::required("Image URL", &url, MAX_URL_LENGTH))
                .transpose()?,
        };

        let image = self
            .backend
            .update_gallery_image(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Gallery image", id))?;

        tracing::debug!("Gallery image updated: {}", id);

        Ok(image)
    }

    /// Remove an image; the remaining positions keep their gap
    pub async fn delete_image(&self, id: &str) -> Result<bool> {
        let deleted = self.backend.delete_gallery_image(id).await?;

        if deleted {
            tracing::info!("Gallery image deleted: {}", id);
        }

        Ok(deleted)
    }

    pub async fn reorder(&self, ids: &[String]) -> Result<()> {
        self.backend.reorder_gallery(ids).await?;
        tracing::info!("Gallery reordered ({} images)", ids.len());
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<GalleryImage>> {
        self.backend.list_gallery().await
    }

    pub async fn get(&self, id: &str) -> Result<GalleryImage> {
        self.backend
            .get_gallery_image(id)
            .await?
            .ok_or_else(|| AppError::not_found("Gallery image", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::memory_backend;

    fn input(title: &str) -> GalleryImageInput {
        GalleryImageInput {
            title: title.to_string(),
            description: None,
            image_url: format!("/images/{}.jpg", title),
        }
    }

    #[tokio::test]
    async fn test_add_appends_in_order() {
        let service = GalleryService::new(memory_backend().await);

        let a = service.add_image(input("a")).await.unwrap();
        let b = service.add_image(input("b")).await.unwrap();

        assert_eq!(a.order, 0);
        assert_eq!(b.order, 1);
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let service = GalleryService::new(memory_backend().await);

        service.add_image(input("a")).await.unwrap();
        let b = service.add_image(input("b")).await.unwrap();

        let updated = service
            .update_image(
                &b.id,
                GalleryImagePatch {
                    title: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.order, 1);
    }

    #[tokio::test]
    async fn test_update_unknown_image() {
        let service = GalleryService::new(memory_backend().await);

        let result = service
            .update_image("missing", GalleryImagePatch::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_add_requires_url() {
        let service = GalleryService::new(memory_backend().await);

        let mut bad = input("a");
        bad.image_url = " ".to_string();

        assert!(matches!(
            service.add_image(bad).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_then_reorder() {
        let service = GalleryService::new(memory_backend().await);

        let a = service.add_image(input("a")).await.unwrap();
        let b = service.add_image(input("b")).await.unwrap();
        let c = service.add_image(input("c")).await.unwrap();

        assert!(service.delete_image(&b.id).await.unwrap());
        let orders: Vec<i64> = service.list().await.unwrap().iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 2]);

        service
            .reorder(&[c.id.clone(), a.id.clone()])
            .await
            .unwrap();
        let listed: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(listed, vec![c.id, a.id]);
    }

    #[tokio::test]
    async fn test_update_trims_and_blank_description_clears() {
        let service = GalleryService::new(memory_backend().await);
        let image = service
            .add_image(GalleryImageInput {
                description: Some("Bahçede".to_string()),
                ..input("a")
            })
            .await
            .unwrap();

        let updated = service
            .update_image(
                &image.id,
                GalleryImagePatch {
                    title: Some("  Yaz  ".to_string()),
                    description: Some(" ".to_string()),
                    image_url: Some(" /images/yaz.jpg ".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Yaz");
        assert_eq!(updated.image_url, "/images/yaz.jpg");
        assert!(updated.description.is_none());

        let blank_title = service
            .update_image(
                &image.id,
                GalleryImagePatch {
                    title: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(blank_title, Err(AppError::Validation(_))));
    }
}

//! Gallery commands

use crate::app::AppState;
use crate::database::{GalleryImage, GalleryImageInput, GalleryImagePatch};
use crate::error::Result;

pub async fn list_gallery(state: &AppState) -> Result<Vec<GalleryImage>> {
    state.gallery.list().await
}

pub async fn get_gallery_image(state: &AppState, id: String) -> Result<GalleryImage> {
    state.gallery.get(&id).await
}

pub async fn add_gallery_image(
    state: &AppState,
    input: GalleryImageInput,
) -> Result<GalleryImage> {
    state.session.require_admin()?;
    state.gallery.add_image(input).await
}

pub async fn update_gallery_image(
    state: &AppState,
    id: String,
    patch: GalleryImagePatch,
) -> Result<GalleryImage> {
    state.session.require_admin()?;
    state.gallery.update_image(&id, patch).await
}

pub async fn delete_gallery_image(state: &AppState, id: String) -> Result<bool> {
    state.session.require_admin()?;
    state.gallery.delete_image(&id).await
}

pub async fn reorder_gallery(state: &AppState, ids: Vec<String>) -> Result<()> {
    state.session.require_admin()?;
    state.gallery.reorder(&ids).await
}

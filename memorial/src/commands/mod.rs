//! Command handlers mirroring the site's UI actions
//!
//! This module organizes commands into logical submodules:
//! - `notes`: guest note submission and moderation
//! - `gallery`: photo gallery reads and edits
//! - `contacts`: contact people and the contact form
//! - `content`: resume, achievements, hero and the visit counter
//! - `session`: admin login and logout
//!
//! Admin-only handlers call [`AdminSession::require_admin`] before doing
//! anything else.
//!
//! [`AdminSession::require_admin`]: crate::services::AdminSession::require_admin

pub mod contacts;
pub mod content;
pub mod gallery;
pub mod notes;
pub mod session;

use crate::app::AppState;
use crate::error::{AppError, Result};

pub use contacts::*;
pub use content::*;
pub use gallery::*;
pub use notes::*;
pub use session::*;

// ===== General Commands =====

/// Get application information
pub async fn get_app_info(state: &AppState) -> Result<AppInfo> {
    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.backend.name().to_string(),
        data_dir: state.config.data_dir.to_string_lossy().to_string(),
    })
}

/// Application information structure
#[derive(Debug, serde::Serialize)]
pub struct AppInfo {
    pub version: String,
    pub backend: String,
    pub data_dir: String,
}

/// Restore the local fallback store to its initial content
pub async fn reset_local_data(state: &AppState) -> Result<()> {
    state.session.require_admin()?;

    let Some(store) = &state.local_store else {
        return Err(AppError::Generic(
            "Reset is only available with local storage".to_string(),
        ));
    };

    store.reset_all_data().await
}

//! Browser session stand-in and the admin gate
//!
//! A [`SessionStorage`] is one directory holding string markers that
//! survive a page reload but not a new session. Marker I/O failures are
//! logged and otherwise ignored; the worst outcome is a second login or a
//! second counted visit.

use crate::config::{ADMIN_PASSWORD, ADMIN_USERNAME, SESSION_ADMIN_KEY, SESSION_VISITED_KEY};
use crate::error::{AppError, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::fs;

/// Session-scoped key/value markers
#[derive(Debug, Clone)]
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn marker_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    async fn get_item(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.marker_path(key)).await {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read session marker {}: {}", key, e);
                None
            }
        }
    }

    async fn set_item(&self, key: &str, value: &str) {
        if let Err(e) = fs::create_dir_all(&self.dir).await {
            tracing::warn!("Failed to create session directory: {}", e);
            return;
        }
        if let Err(e) = fs::write(self.marker_path(key), value).await {
            tracing::warn!("Failed to write session marker {}: {}", key, e);
        }
    }

    async fn remove_item(&self, key: &str) {
        match fs::remove_file(self.marker_path(key)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to clear session marker {}: {}", key, e),
        }
    }

    pub async fn is_admin(&self) -> bool {
        self.get_item(SESSION_ADMIN_KEY).await.as_deref() == Some("true")
    }

    pub async fn set_admin(&self, admin: bool) {
        if admin {
            self.set_item(SESSION_ADMIN_KEY, "true").await;
        } else {
            self.remove_item(SESSION_ADMIN_KEY).await;
        }
    }

    pub async fn has_visited(&self) -> bool {
        self.get_item(SESSION_VISITED_KEY).await.as_deref() == Some("true")
    }

    pub async fn mark_visited(&self) {
        self.set_item(SESSION_VISITED_KEY, "true").await;
    }
}

/// Admin flag shared by every handler of one session
#[derive(Debug, Clone)]
pub struct AdminSession {
    storage: SessionStorage,
    is_admin: Arc<AtomicBool>,
}

impl AdminSession {
    /// Rebuild the session state from persisted markers (page reload)
    pub async fn restore(storage: SessionStorage) -> Self {
        let is_admin = storage.is_admin().await;
        if is_admin {
            tracing::debug!("Restored admin session");
        }

        Self {
            storage,
            is_admin: Arc::new(AtomicBool::new(is_admin)),
        }
    }

    /// Check the fixed credential pair. Success persists the marker.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        if username != ADMIN_USERNAME || password != ADMIN_PASSWORD {
            tracing::warn!("Rejected admin login for user: {}", username);
            return false;
        }

        self.is_admin.store(true, Ordering::SeqCst);
        self.storage.set_admin(true).await;

        tracing::info!("Admin logged in");
        true
    }

    pub async fn logout(&self) {
        self.is_admin.store(false, Ordering::SeqCst);
        self.storage.set_admin(false).await;

        tracing::info!("Admin logged out");
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin.load(Ordering::SeqCst)
    }

    /// Gate for admin-only handlers
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_login_survives_reload() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(temp_dir.path().join("session"));

        let session = AdminSession::restore(storage.clone()).await;
        assert!(!session.is_admin());
        assert!(matches!(
            session.require_admin(),
            Err(AppError::Unauthorized)
        ));

        assert!(session.login("admin", "admin").await);
        assert!(session.require_admin().is_ok());

        let reloaded = AdminSession::restore(storage).await;
        assert!(reloaded.is_admin());
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(temp_dir.path().join("session"));
        let session = AdminSession::restore(storage.clone()).await;

        assert!(!session.login("admin", "wrong").await);
        assert!(!session.login("root", "admin").await);
        assert!(!session.is_admin());
        assert!(!storage.is_admin().await);
    }

    #[tokio::test]
    async fn test_logout_clears_marker() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(temp_dir.path().join("session"));
        let session = AdminSession::restore(storage.clone()).await;

        session.login("admin", "admin").await;
        let clone = session.clone();
        clone.logout().await;

        assert!(!session.is_admin());
        assert!(!AdminSession::restore(storage).await.is_admin());
    }

    #[tokio::test]
    async fn test_visited_marker() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(temp_dir.path().join("session"));

        assert!(!storage.has_visited().await);
        storage.mark_visited().await;
        assert!(storage.has_visited().await);
    }
}

//! Application configuration
//!
//! Central location for collection names, storage keys, validation
//! boundaries and the runtime configuration file.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

// ===== Document Store Layout =====

/// Guest notes collection
pub const NOTES_COLLECTION: &str = "notes";
/// Photo gallery collection
pub const GALLERY_COLLECTION: &str = "gallery";
/// Contact people collection
pub const CONTACTS_COLLECTION: &str = "contacts";
/// Messages sent through the public contact form
pub const CONTACT_MESSAGES_COLLECTION: &str = "contact_messages";
/// Singleton documents (resume, achievements, hero, stats)
pub const SETTINGS_COLLECTION: &str = "settings";

pub const RESUME_KEY: &str = "resume";
pub const ACHIEVEMENTS_KEY: &str = "achievements";
pub const HERO_KEY: &str = "hero";
pub const STATS_KEY: &str = "stats";

// ===== Local Fallback Storage =====

/// Prefix shared by every key written by the local fallback backend
pub const LOCAL_STORAGE_PREFIX: &str = "memorial_";

/// Session marker set after a successful admin login
pub const SESSION_ADMIN_KEY: &str = "isAdmin";
/// Session marker set after the visit counter was bumped once
pub const SESSION_VISITED_KEY: &str = "hasVisited";

// ===== Admin Gate =====

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

// ===== Form Validation Limits =====

/// Maximum length of a guest display name, in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of a note or contact message, in characters
pub const MAX_MESSAGE_LENGTH: usize = 5_000;

/// Maximum length of a gallery title or contact relation label
pub const MAX_TITLE_LENGTH: usize = 200;

pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_PHONE_LENGTH: usize = 40;

/// Maximum length of an image URL
pub const MAX_URL_LENGTH: usize = 2_048;

// ===== Notifications =====

pub const NOTE_EMAIL_SUBJECT: &str = "Yeni Not Gönderildi - Yeşim Özgen Anı Sitesi";
pub const CONTACT_EMAIL_SUBJECT: &str = "Yeni İletişim Formu - Yeşim Özgen Anı Sitesi";

/// Admin panel link included in note notifications
pub const ADMIN_PANEL_URL: &str = "https://yesim-ozgen-web.web.app/notlar";

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE_NAME: &str = "memorial.json";

/// Which persistence backend to open at start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Remote document database
    #[default]
    Remote,
    /// Local key-value fallback seeded with fixed content
    Local,
}

impl std::str::FromStr for BackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(BackendKind::Remote),
            "local" => Ok(BackendKind::Local),
            other => Err(AppError::Config(format!(
                "Unknown backend '{}'. Use 'remote' or 'local'",
                other
            ))),
        }
    }
}

/// Transactional mail relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_mail_from")]
    pub from: String,
    #[serde(default = "default_mail_to")]
    pub to: String,
}

fn default_relay_url() -> String {
    "http://127.0.0.1:8025/api/send".to_string()
}

fn default_mail_from() -> String {
    "noreply@localhost".to_string()
}

fn default_mail_to() -> String {
    "admin@localhost".to_string()
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            relay_url: default_relay_url(),
            api_key: None,
            from: default_mail_from(),
            to: default_mail_to(),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// SQLite file backing the remote document store (relative to data dir)
    #[serde(default = "default_database_file")]
    pub database_file: String,
    /// Directory holding the local fallback keys (relative to data dir)
    #[serde(default = "default_local_dir")]
    pub local_dir: String,
    /// Directory holding session-scoped markers (relative to data dir)
    #[serde(default = "default_session_dir")]
    pub session_dir: String,
    /// Seed the remote store with fallback content when it is empty
    #[serde(default = "default_true")]
    pub seed_on_start: bool,
    #[serde(default)]
    pub mail: MailSettings,
    #[serde(skip)]
    pub data_dir: PathBuf,
}

fn default_database_file() -> String {
    "memorial.db".to_string()
}

fn default_local_dir() -> String {
    "local".to_string()
}

fn default_session_dir() -> String {
    "session".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            database_file: default_database_file(),
            local_dir: default_local_dir(),
            session_dir: default_session_dir(),
            seed_on_start: true,
            mail: MailSettings::default(),
            data_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Load configuration from `data_dir/memorial.json`, writing defaults if
    /// the file is missing, then apply `MEMORIAL_*` environment overrides.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).await?;
        let path = data_dir.join(CONFIG_FILE_NAME);

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path).await?;
            serde_json::from_str::<AppConfig>(&content)
                .map_err(|e| AppError::Config(format!("Failed to parse {:?}: {}", path, e)))?
        } else {
            tracing::info!("Config file not found, writing defaults to {:?}", path);
            let default = AppConfig::default();
            fs::write(&path, serde_json::to_string_pretty(&default)?).await?;
            default
        };

        config.data_dir = data_dir.to_path_buf();
        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("MEMORIAL_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(url) = lookup("MEMORIAL_MAIL_RELAY_URL") {
            self.mail.relay_url = url;
            self.mail.enabled = true;
        }
        if let Some(key) = lookup("MEMORIAL_MAIL_API_KEY") {
            self.mail.api_key = Some(key);
        }
        if let Some(to) = lookup("MEMORIAL_MAIL_TO") {
            self.mail.to = to;
        }
        if let Some(seed) = lookup("MEMORIAL_SEED") {
            self.seed_on_start = matches!(seed.as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn local_path(&self) -> PathBuf {
        self.data_dir.join(&self.local_dir)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(&self.session_dir)
    }
}

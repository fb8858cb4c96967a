//! Application state and initialization
//!
//! Opens the configured backend once, builds every service on top of it
//! and starts the notifier task. Handlers receive `&AppState`.

use crate::config::{AppConfig, BackendKind};
use crate::database::{self, Repository, SharedBackend};
use crate::error::Result;
use crate::events::Outbox;
use crate::seed::seed_initial_data;
use crate::services::{
    AdminSession, ContactsService, ContentService, GalleryService, Mailer, NotesService,
    Notifier, RelayMailer, SessionStorage, VisitCounter,
};
use crate::storage::LocalStore;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub backend: SharedBackend,
    /// Present when the local fallback is the active backend
    pub local_store: Option<LocalStore>,
    pub notes: NotesService,
    pub gallery: GalleryService,
    pub contacts: ContactsService,
    pub content: ContentService,
    pub visits: VisitCounter,
    pub session: AdminSession,
}

impl AppState {
    pub async fn new(
        config: AppConfig,
        backend: SharedBackend,
        local_store: Option<LocalStore>,
    ) -> Self {
        let session = AdminSession::restore(SessionStorage::new(config.session_path())).await;

        Self {
            notes: NotesService::new(backend.clone()),
            gallery: GalleryService::new(backend.clone()),
            contacts: ContactsService::new(backend.clone()),
            content: ContentService::new(backend.clone()),
            visits: VisitCounter::new(backend.clone()),
            session,
            config,
            backend,
            local_store,
        }
    }
}

/// Open the configured backend.
///
/// A remote store that cannot be opened is replaced by the local
/// fallback. Only the remote store publishes creation events.
pub async fn open_backend(
    config: &AppConfig,
    outbox: Outbox,
) -> Result<(SharedBackend, Option<LocalStore>)> {
    if config.backend == BackendKind::Remote {
        match database::create_pool(&config.database_path()).await {
            Ok(pool) => {
                tracing::info!("Using remote document store");
                let repo = Repository::with_outbox(pool, outbox);
                return Ok((Arc::new(repo), None));
            }
            Err(e) => {
                tracing::warn!("Remote store unavailable, using local storage: {}", e);
            }
        }
    }

    let store = LocalStore::new(config.local_path())?;
    store.initialize().await?;
    tracing::info!("Using local storage backend");

    Ok((Arc::new(store.clone()), Some(store)))
}

/// Application setup - called once on startup.
///
/// Returns the state and, when mail is enabled, the notifier task. The
/// task ends once every clone of the state has been dropped.
pub async fn setup(config: AppConfig) -> Result<(AppState, Option<JoinHandle<()>>)> {
    tracing::info!("Initializing application");
    tracing::info!("Data directory: {:?}", config.data_dir);

    tokio::fs::create_dir_all(&config.data_dir).await?;

    let (outbox, notifier_task) = if config.mail.enabled {
        let mailer: Arc<dyn Mailer> = Arc::new(RelayMailer::new(&config.mail)?);
        let notifier = Notifier::new(mailer, &config.mail);
        let (outbox, events) = Outbox::channel();
        (outbox, Some(tokio::spawn(notifier.run(events))))
    } else {
        tracing::info!("Mail relay disabled, admin notifications off");
        (Outbox::disabled(), None)
    };

    let (backend, local_store) = open_backend(&config, outbox).await?;

    if config.seed_on_start && local_store.is_none() {
        seed_initial_data(backend.as_ref()).await?;
    }

    let state = AppState::new(config, backend, local_store).await;

    tracing::info!("Application initialized successfully");

    Ok((state, notifier_task))
}

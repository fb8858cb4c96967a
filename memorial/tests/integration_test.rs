//! Integration tests for the memorial core
//!
//! These tests verify end-to-end functionality including:
//! - Note moderation and ordering on both backends
//! - Gallery ordering
//! - Admin session persistence and command gating
//! - Creation events reaching the notifier

use memorial::app::{self, AppState};
use memorial::commands;
use memorial::config::{AppConfig, BackendKind};
use memorial::database::{create_pool, GalleryImageInput, Repository, SharedBackend};
use memorial::error::AppError;
use memorial::events::{DomainEvent, Outbox};
use memorial::services::{AdminSession, GalleryService, NotesService, SessionStorage};
use memorial::storage::LocalStore;
use std::sync::Arc;
use tempfile::TempDir;

/// Helper to create a file-backed remote store with schema
async fn create_remote(outbox: Outbox) -> (SharedBackend, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let pool = create_pool(&db_path).await.unwrap();
    let repo = Repository::with_outbox(pool, outbox);

    (Arc::new(repo), temp_dir)
}

/// Helper to create a local store (starts with fallback content)
async fn create_local() -> (SharedBackend, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path().join("local")).unwrap();
    store.initialize().await.unwrap();

    (Arc::new(store), temp_dir)
}

async fn both_backends() -> Vec<(SharedBackend, TempDir)> {
    vec![create_remote(Outbox::disabled()).await, create_local().await]
}

fn ids_of<T, F: Fn(&T) -> &str>(items: &[T], id: F) -> Vec<String> {
    items.iter().map(|item| id(item).to_string()).collect()
}

#[tokio::test]
async fn test_submitted_note_waits_for_moderation() {
    for (backend, _temp) in both_backends().await {
        let notes = NotesService::new(backend.clone());

        let note = notes.submit_note("A", "hi", None).await.unwrap();

        let pending = notes.list_pending().await.unwrap();
        let approved = notes.list_approved().await.unwrap();
        assert!(pending.iter().any(|n| n.id == note.id), "{}", backend.name());
        assert!(!approved.iter().any(|n| n.id == note.id), "{}", backend.name());
    }
}

#[tokio::test]
async fn test_approve_is_idempotent_and_listed_once() {
    for (backend, _temp) in both_backends().await {
        let notes = NotesService::new(backend.clone());
        let note = notes.submit_note("A", "hi", None).await.unwrap();

        let once = notes.approve_note(&note.id).await.unwrap().unwrap();
        let twice = notes.approve_note(&note.id).await.unwrap().unwrap();
        assert_eq!(once.status, twice.status);

        let approved = notes.list_approved().await.unwrap();
        assert_eq!(
            approved.iter().filter(|n| n.id == note.id).count(),
            1,
            "{}",
            backend.name()
        );
    }
}

#[tokio::test]
async fn test_reject_removes_from_both_lists() {
    for (backend, _temp) in both_backends().await {
        let notes = NotesService::new(backend.clone());
        let note = notes.submit_note("A", "hi", None).await.unwrap();

        assert!(notes.reject_note(&note.id).await.unwrap());

        assert!(!notes
            .list_approved()
            .await
            .unwrap()
            .iter()
            .any(|n| n.id == note.id));
        assert!(!notes
            .list_pending()
            .await
            .unwrap()
            .iter()
            .any(|n| n.id == note.id));
    }
}

#[tokio::test]
async fn test_delete_note() {
    for (backend, _temp) in both_backends().await {
        let notes = NotesService::new(backend.clone());
        let note = notes.submit_note("A", "hi", None).await.unwrap();

        assert!(notes.delete_note(&note.id).await.unwrap());
        assert!(!notes
            .list_all()
            .await
            .unwrap()
            .iter()
            .any(|n| n.id == note.id));

        assert!(!notes.delete_note("does-not-exist").await.unwrap());
    }
}

#[tokio::test]
async fn test_reorder_three_approved_notes() {
    for (backend, _temp) in both_backends().await {
        let notes = NotesService::new(backend.clone());

        let mut created = Vec::new();
        for name in ["a", "b", "c"] {
            let note = notes.submit_note(name, "msg", None).await.unwrap();
            notes.approve_note(&note.id).await.unwrap();
            created.push(note.id);
        }
        let (a, b, c) = (created[0].clone(), created[1].clone(), created[2].clone());

        notes
            .reorder_approved(&[c.clone(), a.clone(), b.clone()])
            .await
            .unwrap();

        let listed: Vec<String> = ids_of(&notes.list_approved().await.unwrap(), |n| n.id.as_str())
            .into_iter()
            .filter(|id| created.contains(id))
            .collect();
        assert_eq!(listed, vec![c, a, b], "{}", backend.name());
    }
}

#[tokio::test]
async fn test_gallery_orders_on_empty_collection() {
    for (backend, _temp) in both_backends().await {
        let gallery = GalleryService::new(backend.clone());

        // The local store starts with fallback images
        for image in gallery.list().await.unwrap() {
            gallery.delete_image(&image.id).await.unwrap();
        }
        assert!(gallery.list().await.unwrap().is_empty());

        let input = |title: &str| GalleryImageInput {
            title: title.to_string(),
            description: None,
            image_url: format!("/images/{}.jpg", title),
        };
        let first = gallery.add_image(input("one")).await.unwrap();
        let second = gallery.add_image(input("two")).await.unwrap();

        assert_eq!((first.order, second.order), (0, 1), "{}", backend.name());
    }
}

#[tokio::test]
async fn test_reorder_with_unknown_id_changes_nothing() {
    for (backend, _temp) in both_backends().await {
        let gallery = GalleryService::new(backend.clone());
        let image = gallery
            .add_image(GalleryImageInput {
                title: "x".to_string(),
                description: None,
                image_url: "/x.jpg".to_string(),
            })
            .await
            .unwrap();
        let before = gallery.list().await.unwrap();

        let result = gallery
            .reorder(&[image.id.clone(), "ghost".to_string()])
            .await;
        assert!(matches!(result, Err(AppError::InvalidReorder(_))));

        let after = gallery.list().await.unwrap();
        assert_eq!(
            ids_of(&before, |i| i.id.as_str()),
            ids_of(&after, |i| i.id.as_str()),
            "{}",
            backend.name()
        );
    }
}

#[tokio::test]
async fn test_login_persists_across_reload() {
    let temp_dir = TempDir::new().unwrap();
    let storage = SessionStorage::new(temp_dir.path().join("session"));

    let session = AdminSession::restore(storage.clone()).await;
    assert!(!session.login("admin", "secret").await);
    assert!(!session.is_admin());

    assert!(session.login("admin", "admin").await);
    assert!(session.is_admin());

    let reloaded = AdminSession::restore(storage).await;
    assert!(reloaded.is_admin());

    // A fresh session starts logged out
    let other = AdminSession::restore(SessionStorage::new(temp_dir.path().join("other"))).await;
    assert!(!other.is_admin());
}

async fn create_app(temp_dir: &TempDir, backend: BackendKind) -> AppState {
    let config = AppConfig {
        backend,
        data_dir: temp_dir.path().to_path_buf(),
        ..Default::default()
    };

    let (state, _) = app::setup(config).await.unwrap();
    state
}

#[tokio::test]
async fn test_guest_note_scenario() {
    for kind in [BackendKind::Remote, BackendKind::Local] {
        let temp_dir = TempDir::new().unwrap();
        let state = create_app(&temp_dir, kind).await;

        let note = commands::submit_note(&state, "A".to_string(), "hi".to_string(), None)
            .await
            .unwrap();

        // Moderation queue is admin-only
        assert!(matches!(
            commands::list_pending_notes(&state).await,
            Err(AppError::Unauthorized)
        ));
        assert!(commands::login(&state, "admin".to_string(), "admin".to_string()).await);

        let pending = commands::list_pending_notes(&state).await.unwrap();
        assert!(pending.iter().any(|n| n.id == note.id));
        assert!(!commands::list_approved_notes(&state)
            .await
            .unwrap()
            .iter()
            .any(|n| n.id == note.id));

        commands::approve_note(&state, note.id.clone()).await.unwrap();
        let wall = commands::list_approved_notes(&state).await.unwrap();
        assert_eq!(wall[0].id, note.id, "{:?}", kind);

        let mut order = ids_of(&wall, |n| n.id.as_str());
        order.retain(|id| id != &note.id);
        order.push(note.id.clone());
        commands::reorder_notes(&state, order.clone()).await.unwrap();

        let wall = commands::list_approved_notes(&state).await.unwrap();
        assert_eq!(ids_of(&wall, |n| n.id.as_str()), order, "{:?}", kind);
        assert_eq!(wall.last().unwrap().id, note.id);
    }
}

#[tokio::test]
async fn test_admin_commands_are_gated() {
    let temp_dir = TempDir::new().unwrap();
    let state = create_app(&temp_dir, BackendKind::Local).await;

    let images = commands::list_gallery(&state).await.unwrap();
    assert!(matches!(
        commands::delete_gallery_image(&state, images[0].id.clone()).await,
        Err(AppError::Unauthorized)
    ));
    assert!(matches!(
        commands::reset_local_data(&state).await,
        Err(AppError::Unauthorized)
    ));

    commands::login(&state, "admin".to_string(), "admin".to_string()).await;
    assert!(commands::delete_gallery_image(&state, images[0].id.clone())
        .await
        .unwrap());

    commands::reset_local_data(&state).await.unwrap();
    assert_eq!(commands::list_gallery(&state).await.unwrap().len(), images.len());

    commands::logout(&state).await;
    assert!(!commands::is_admin(&state));
}

#[tokio::test]
async fn test_record_visit_counts_session_once() {
    let temp_dir = TempDir::new().unwrap();
    let state = create_app(&temp_dir, BackendKind::Remote).await;

    assert_eq!(commands::record_visit(&state).await.unwrap(), 1);
    assert_eq!(commands::record_visit(&state).await.unwrap(), 1);
}

#[tokio::test]
async fn test_remote_store_publishes_creation_events() {
    let (outbox, mut events) = Outbox::channel();
    let (backend, _temp) = create_remote(outbox).await;
    let notes = NotesService::new(backend);

    let note = notes.submit_note("A", "hi", None).await.unwrap();
    notes.approve_note(&note.id).await.unwrap();

    match events.recv().await {
        Some(DomainEvent::NoteCreated(created)) => assert_eq!(created.id, note.id),
        other => panic!("unexpected event: {:?}", other),
    }
    // Moderation is not a creation
    assert!(events.try_recv().is_err());
}

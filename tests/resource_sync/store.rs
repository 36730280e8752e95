use resource_sync::{
    Contact, ErrorKind, HttpError, Project, ProjectDraft, ResourceStore, StoreChange, Task,
};
use serde_json::json;

use crate::support::{start_backend, store, Backend, LOCKED_PROJECT};

#[tokio::test]
async fn list_keeps_server_order() {
    let base = start_backend(Backend::seeded()).await;
    let projects: ResourceStore<Project> = store(&base);

    let listed = projects.list().await.unwrap();
    assert_eq!(listed.ids(), vec![1, 2, LOCKED_PROJECT]);
    assert_eq!(projects.snapshot(), listed);

    // Unnamed fields ride along.
    let walls = listed.get(1).unwrap();
    assert_eq!(walls.attributes["budget"], json!(120000));
}

#[tokio::test]
async fn empty_list_is_not_an_error() {
    let base = start_backend(Backend::seeded()).await;
    let tasks: ResourceStore<Task> = store(&base);

    let listed = tasks.list().await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn unsuccessful_envelope_is_shape_error() {
    let base = start_backend(Backend::seeded()).await;
    let contacts: ResourceStore<Contact> = store(&base);

    let err = contacts.list().await.unwrap_err();
    assert_eq!(err, HttpError::Shape("contacts are disabled".into()));
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let base = start_backend(Backend::seeded()).await;
    let projects: ResourceStore<Project> = store(&base);

    let err = projects.get(404).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err, HttpError::NotFound("project 404".into()));
}

#[tokio::test]
async fn get_caches_fresh_copy() {
    let backend = Backend::seeded();
    let base = start_backend(backend.clone()).await;
    let projects: ResourceStore<Project> = store(&base);
    projects.list().await.unwrap();

    backend.rename(2, "Dry dock (east)");
    let fetched = projects.get(2).await.unwrap();

    assert_eq!(fetched.title, "Dry dock (east)");
    assert_eq!(projects.cached(2).unwrap().title, "Dry dock (east)");
    assert_eq!(projects.snapshot().ids(), vec![1, 2, LOCKED_PROJECT]);
}

#[tokio::test]
async fn create_caches_server_representation() {
    let base = start_backend(Backend::seeded()).await;
    let projects: ResourceStore<Project> = store(&base);
    projects.list().await.unwrap();

    let draft = ProjectDraft::new("  Quay extension  ").description("North quay");
    let created = projects.create(&draft).await.unwrap();

    assert_eq!(created.id, 100);
    assert_eq!(created.title, "Quay extension");
    assert_eq!(created.status.as_deref(), Some("planned"));
    assert_eq!(projects.cached(100), Some(created));
    assert_eq!(projects.snapshot().ids(), vec![1, 2, LOCKED_PROJECT, 100]);
}

#[tokio::test]
async fn update_caches_server_representation_and_is_retry_safe() {
    let base = start_backend(Backend::seeded()).await;
    let projects: ResourceStore<Project> = store(&base);
    projects.list().await.unwrap();

    let patch = json!({ "title": "  Harbour walls, phase 2 ", "status": "active" });
    let first = projects.update(1, &patch).await.unwrap();
    let second = projects.update(1, &patch).await.unwrap();

    assert_eq!(first.title, "Harbour walls, phase 2");
    assert_eq!(first, second);
    assert_eq!(projects.cached(1), Some(second));
    assert_eq!(projects.snapshot().len(), 3);
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let base = start_backend(Backend::seeded()).await;
    let projects: ResourceStore<Project> = store(&base);

    let err = projects.update(77, &json!({ "title": "x" })).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(projects.snapshot().is_empty());
}

#[tokio::test]
async fn remove_prunes_cache() {
    let base = start_backend(Backend::seeded()).await;
    let projects: ResourceStore<Project> = store(&base);
    projects.list().await.unwrap();

    projects.remove(2).await.unwrap();

    assert_eq!(projects.snapshot().ids(), vec![1, LOCKED_PROJECT]);
    assert_eq!(projects.list().await.unwrap().ids(), vec![1, LOCKED_PROJECT]);
}

#[tokio::test]
async fn failed_remove_leaves_cache_unchanged() {
    let base = start_backend(Backend::seeded()).await;
    let projects: ResourceStore<Project> = store(&base);
    projects.list().await.unwrap();
    let before = projects.snapshot();

    let err = projects.remove(LOCKED_PROJECT).await.unwrap_err();

    assert_eq!(
        err,
        HttpError::Http {
            status: 403,
            message: Some("project is locked".into()),
        }
    );
    assert_eq!(projects.snapshot(), before);
}

#[tokio::test]
async fn failed_list_leaves_cache_unchanged() {
    let backend = Backend::seeded();
    let base = start_backend(backend.clone()).await;
    let projects: ResourceStore<Project> = store(&base);
    projects.list().await.unwrap();

    backend.fail_lists(true);
    let err = projects.list().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(projects.snapshot().len(), 3);
}

#[tokio::test]
async fn mutations_publish_changes() {
    let base = start_backend(Backend::seeded()).await;
    let projects: ResourceStore<Project> = store(&base);
    let mut changes = projects.subscribe();

    projects.list().await.unwrap();
    let created = projects.create(&ProjectDraft::new("Slipway")).await.unwrap();
    projects.update(1, &json!({ "status": "done" })).await.unwrap();
    projects.remove(2).await.unwrap();
    let _ = projects.remove(LOCKED_PROJECT).await;

    assert_eq!(changes.try_recv().unwrap(), StoreChange::Created(created.id));
    assert_eq!(changes.try_recv().unwrap(), StoreChange::Updated(1));
    assert_eq!(changes.try_recv().unwrap(), StoreChange::Removed(2));
    // Reads and failed mutations are silent.
    assert!(changes.try_recv().is_err());
}

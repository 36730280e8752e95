use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use resource_sync::{
    CalendarEvent, ChatMessage, Confirmed, FetchOutcome, FetchStatus, ItemQuery, ListQuery,
    Project, ProjectDraft, RemoveOutcome, ResourceStore, ScopedListQuery, Task, ViewModel,
};
use serde_json::json;

use crate::support::{
    start_backend, store, Backend, FAST_CONTACT, LOCKED_PROJECT, SLOW_CONTACT,
};

#[tokio::test]
async fn load_populates_state_in_server_order() {
    let base = start_backend(Backend::seeded()).await;
    let projects = ViewModel::new(ListQuery::new(store::<Project>(&base)));

    assert_eq!(projects.state().status(), FetchStatus::Idle);
    assert_eq!(projects.load(()).await, FetchOutcome::Applied);

    let state = projects.state();
    assert_eq!(state.status(), FetchStatus::Ready);
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.data.unwrap().ids(), vec![1, 2, LOCKED_PROJECT]);
}

#[tokio::test]
async fn empty_list_is_ready_not_failed() {
    let base = start_backend(Backend::seeded()).await;
    let tasks = ViewModel::new(ListQuery::new(store::<Task>(&base)));

    tasks.load(()).await;

    let state = tasks.state();
    assert_eq!(state.status(), FetchStatus::Ready);
    assert!(state.data.unwrap().is_empty());
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn failure_keeps_stale_data() {
    let backend = Backend::seeded();
    let base = start_backend(backend.clone()).await;
    let projects = ViewModel::new(ListQuery::new(store::<Project>(&base)));
    projects.load(()).await;

    backend.fail_lists(true);
    assert_eq!(projects.refetch().await, FetchOutcome::Applied);

    let state = projects.state();
    assert_eq!(state.status(), FetchStatus::Failed);
    assert_eq!(
        state.error.as_deref(),
        Some("request failed with status 500: database unavailable")
    );
    assert_eq!(state.data.unwrap().len(), 3);

    // The next good fetch clears the error.
    backend.fail_lists(false);
    projects.refetch().await;
    assert_eq!(projects.state().status(), FetchStatus::Ready);
}

#[tokio::test]
async fn refetch_is_idempotent() {
    let backend = Backend::seeded();
    let base = start_backend(backend.clone()).await;
    let projects = ViewModel::new(ListQuery::new(store::<Project>(&base)));

    assert_eq!(projects.refetch().await, FetchOutcome::Unbound);
    assert_eq!(backend.list_calls(), 0);

    projects.load(()).await;
    projects.refetch().await;
    let first = projects.state().data;
    projects.refetch().await;
    let second = projects.state().data;

    assert_eq!(first, second);
    assert_eq!(backend.list_calls(), 3);
}

#[tokio::test]
async fn later_load_wins_over_slower_earlier_load() {
    let base = start_backend(Backend::seeded()).await;
    let messages = ViewModel::new(ScopedListQuery::new(
        store::<ChatMessage>(&base),
        ChatMessage::CONTACT_PARAM,
    ));

    // The slow contact is requested first and resolves last.
    let (slow, fast) = tokio::join!(
        messages.load(Some(SLOW_CONTACT)),
        messages.load(Some(FAST_CONTACT)),
    );

    assert_eq!(slow, FetchOutcome::Superseded);
    assert_eq!(fast, FetchOutcome::Applied);
    assert_eq!(messages.key(), Some(Some(FAST_CONTACT)));

    let state = messages.state();
    assert!(!state.loading);
    let data = state.data.unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|m| m.contact_id == FAST_CONTACT));
}

#[tokio::test]
async fn no_subject_yields_empty_without_request() {
    // Nothing listens here; a request would fail.
    let messages = ViewModel::new(ScopedListQuery::new(
        store::<ChatMessage>("http://127.0.0.1:9"),
        ChatMessage::CONTACT_PARAM,
    ));

    messages.load(None).await;
    let state = messages.state();
    assert_eq!(state.status(), FetchStatus::Ready);
    assert!(state.data.unwrap().is_empty());
}

#[tokio::test]
async fn calendar_events_sorted_by_date() {
    let base = start_backend(Backend::seeded()).await;
    let events = ViewModel::new(
        ListQuery::new(store::<CalendarEvent>(&base)).sorted_by(CalendarEvent::chronological),
    );

    events.load(()).await;
    assert_eq!(events.state().data.unwrap().ids(), vec![2, 3, 1]);
}

#[tokio::test]
async fn item_query_tracks_selected_id() {
    let base = start_backend(Backend::seeded()).await;
    let project = ViewModel::new(ItemQuery::new(store::<Project>(&base)));

    project.load(2).await;
    assert_eq!(project.state().data.unwrap().title, "Dry dock");

    project.load(404).await;
    let state = project.state();
    assert_eq!(state.error.as_deref(), Some("not found: project 404"));
    // Stale selection stays visible.
    assert_eq!(state.data.unwrap().id, 2);
}

#[tokio::test]
async fn declined_remove_sends_nothing() {
    let base = start_backend(Backend::seeded()).await;
    let projects = ViewModel::new(ListQuery::new(store::<Project>(&base)));
    projects.load(()).await;

    let asked = AtomicUsize::new(0);
    let decline = |prompt: &str| {
        assert!(prompt.contains("project 2"));
        asked.fetch_add(1, Ordering::SeqCst);
        false
    };
    let outcome = projects.remove(2, &decline).await.unwrap();

    assert_eq!(outcome, RemoveOutcome::Declined);
    assert_eq!(asked.load(Ordering::SeqCst), 1);
    projects.refetch().await;
    assert!(projects.state().data.unwrap().contains(2));
}

#[tokio::test]
async fn failed_remove_keeps_ids_and_sets_error() {
    let base = start_backend(Backend::seeded()).await;
    let projects = ViewModel::new(ListQuery::new(store::<Project>(&base)));
    projects.load(()).await;
    let before = projects.state().data.unwrap().ids();

    let err = projects.remove(LOCKED_PROJECT, &Confirmed).await.unwrap_err();

    let state = projects.state();
    assert_eq!(state.error, Some(err.to_string()));
    assert_eq!(state.data.unwrap().ids(), before);
}

#[tokio::test]
async fn remove_refetches() {
    let backend = Backend::seeded();
    let base = start_backend(backend.clone()).await;
    let projects = ViewModel::new(ListQuery::new(store::<Project>(&base)));
    projects.load(()).await;

    let outcome = projects.remove(2, &Confirmed).await.unwrap();

    assert_eq!(outcome, RemoveOutcome::Removed);
    assert_eq!(projects.state().data.unwrap().ids(), vec![1, LOCKED_PROJECT]);
    assert_eq!(backend.list_calls(), 2);
}

#[tokio::test]
async fn create_and_update_show_server_representation() {
    let base = start_backend(Backend::seeded()).await;
    let projects = ViewModel::new(ListQuery::new(store::<Project>(&base)));
    projects.load(()).await;

    let created = projects.create(&ProjectDraft::new(" Boathouse ")).await.unwrap();
    let listed = projects.state().data.unwrap();
    assert_eq!(listed.get(created.id).unwrap().title, "Boathouse");

    projects
        .update(created.id, &json!({ "title": "Boathouse roof  " }))
        .await
        .unwrap();
    let listed = projects.state().data.unwrap();
    assert_eq!(listed.get(created.id).unwrap().title, "Boathouse roof");
}

#[tokio::test]
async fn sibling_view_model_refreshes_on_store_change() {
    let base = start_backend(Backend::seeded()).await;
    let shared: ResourceStore<Project> = store(&base);
    let table = ViewModel::new(ListQuery::new(shared.clone()));
    let sidebar = ViewModel::new(ListQuery::new(shared.clone()));
    table.load(()).await;
    sidebar.load(()).await;

    let refresh = sidebar.refresh_on(shared.subscribe());
    let mut rx = sidebar.subscribe();
    let _ = rx.borrow_and_update();

    table.remove(1, &Confirmed).await.unwrap();

    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            if !state.loading && state.data.map_or(false, |d| !d.contains(1)) {
                break;
            }
        }
    })
    .await
    .expect("sidebar never refreshed");

    refresh.abort();
}

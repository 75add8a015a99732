mod common;

use std::sync::Arc;

use anyhow::Result;

use jobboard_admin::api::models::{ImportRecord, Job};
use jobboard_admin::list::screens::{IMPORTS, JOBS, TEAM_POSTED_JOBS};
use jobboard_admin::list::{ApiListSource, FetchOutcome, ListController, ListView, ViewStatus};
use jobboard_admin::navigation::Destination;
use jobboard_admin::session::{Role, SessionStore};

async fn jobs_view(server: &common::MockServer, store: &SessionStore, location: &str) -> Result<ListView<Job>> {
    let (client, _nav) = server.client(store)?;
    let controller = ListController::<Job>::initialize_from_url(&JOBS, location);
    let source = Arc::new(ApiListSource::for_screen(client, &JOBS, None));
    Ok(ListView::new(controller, source))
}

fn signed_in() -> Result<SessionStore> {
    let store = SessionStore::in_memory();
    store.set_session("abc123", Role::Admin)?;
    Ok(store)
}

#[tokio::test]
async fn mount_reads_page_from_location() -> Result<()> {
    let server = common::spawn_mock().await?;
    let view = jobs_view(&server, &signed_in()?, "/jobs?page=3").await?;

    assert!(view.mount().await.is_applied());

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.state.page, 3);
    assert_eq!(snapshot.state.total_pages, 3);
    assert_eq!(snapshot.state.total_items, common::TOTAL_JOBS);
    assert_eq!(snapshot.items.len(), 3);
    assert_eq!(snapshot.status, ViewStatus::Ready);

    let hits = server.state.hits_for("/jobs");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].query.get("page").map(String::as_str), Some("3"));
    assert_eq!(hits[0].query.get("limit").map(String::as_str), Some("10"));
    assert_eq!(hits[0].authorization.as_deref(), Some("Bearer abc123"));
    Ok(())
}

#[tokio::test]
async fn changing_a_filter_resets_to_page_one_with_one_fetch() -> Result<()> {
    let server = common::spawn_mock().await?;
    let view = jobs_view(&server, &signed_in()?, "/jobs?page=3").await?;
    view.mount().await;
    server.state.clear_hits();

    let outcome = view.set_filter("status", "open").await?;

    assert!(matches!(outcome, Some(FetchOutcome::Applied)), "{:?}", outcome);
    let hits = server.state.hits_for("/jobs");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].query.get("page").map(String::as_str), Some("1"));
    assert_eq!(hits[0].query.get("status").map(String::as_str), Some("open"));

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.state.page, 1);
    assert_eq!(snapshot.state.total_items, 3);
    assert_eq!(snapshot.location, "/jobs?status=open");
    assert!(snapshot.items.iter().all(|job| job.status.as_deref() == Some("open")));
    Ok(())
}

#[tokio::test]
async fn repeated_page_change_fetches_once() -> Result<()> {
    let server = common::spawn_mock().await?;
    let view = jobs_view(&server, &signed_in()?, "/jobs").await?;
    view.mount().await;
    server.state.clear_hits();

    assert!(view.set_page(2).await.is_some());
    assert!(view.set_page(2).await.is_none());
    // Past the last page
    assert!(view.set_page(9).await.is_none());
    assert!(view.set_page(0).await.is_none());

    assert_eq!(server.state.hits_for("/jobs").len(), 1);
    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.state.page, 2);
    assert_eq!(snapshot.location, "/jobs?page=2");
    Ok(())
}

#[tokio::test]
async fn location_is_published_on_state_change() -> Result<()> {
    let server = common::spawn_mock().await?;
    let view = jobs_view(&server, &signed_in()?, "/jobs?status=all&page=1").await?;
    let location = view.subscribe_location();
    assert_eq!(*location.borrow(), "/jobs");

    view.mount().await;
    view.set_page(3).await;
    assert_eq!(*location.borrow(), "/jobs?page=3");

    view.set_filter("verification", "pending").await?;
    assert_eq!(*location.borrow(), "/jobs?verified=pending");
    Ok(())
}

#[tokio::test]
async fn server_page_correction_wins() -> Result<()> {
    let server = common::spawn_mock().await?;
    let view = jobs_view(&server, &signed_in()?, "/jobs?page=40").await?;

    view.mount().await;

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.state.page, 3);
    assert_eq!(snapshot.location, "/jobs?page=3");
    Ok(())
}

#[tokio::test]
async fn echoed_page_past_the_end_is_pulled_back() -> Result<()> {
    let server = common::spawn_mock().await?;
    let view = jobs_view(&server, &signed_in()?, "/jobs?status=gone&page=3").await?;

    view.mount().await;

    let hits = server.state.hits_for("/jobs");
    assert_eq!(hits[0].query.get("page").map(String::as_str), Some("3"));
    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.state.page, 1);
    assert_eq!(snapshot.state.total_pages, 0);
    assert_eq!(snapshot.status, ViewStatus::Empty);
    assert_eq!(snapshot.location, "/jobs?status=gone");
    Ok(())
}

#[tokio::test]
async fn late_response_for_superseded_filter_is_dropped() -> Result<()> {
    let server = common::spawn_mock().await?;
    let view = jobs_view(&server, &signed_in()?, "/jobs").await?;
    view.mount().await;

    // "slow" answers after "fast" even though it was requested first
    let (slow, fast) = tokio::join!(view.set_filter("status", "slow"), view.set_filter("status", "fast"));

    assert!(matches!(slow?, Some(FetchOutcome::Stale)));
    assert!(matches!(fast?, Some(FetchOutcome::Applied)));

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.state.filters.get("status").map(String::as_str), Some("fast"));
    assert!(!snapshot.items.is_empty());
    assert!(snapshot.items.iter().all(|job| job.status.as_deref() == Some("fast")));
    assert_eq!(snapshot.status, ViewStatus::Ready);
    Ok(())
}

#[tokio::test]
async fn empty_result_is_not_an_error() -> Result<()> {
    let server = common::spawn_mock().await?;
    let view = jobs_view(&server, &signed_in()?, "/jobs?status=empty").await?;

    assert!(view.mount().await.is_applied());

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.status, ViewStatus::Empty);
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.state.total_items, 0);
    Ok(())
}

#[tokio::test]
async fn failed_fetch_shows_error_and_keeps_pagination() -> Result<()> {
    let server = common::spawn_mock().await?;
    let view = jobs_view(&server, &signed_in()?, "/jobs").await?;
    view.mount().await;

    let outcome = view.set_filter("status", "boom").await?;
    assert!(matches!(outcome, Some(FetchOutcome::Failed(_))), "{:?}", outcome);

    let snapshot = view.snapshot().await;
    assert!(snapshot.items.is_empty());
    match &snapshot.status {
        ViewStatus::Error { inline, .. } => assert!(!inline),
        other => panic!("expected error state, got {:?}", other),
    }
    assert_eq!(snapshot.state.total_items, common::TOTAL_JOBS);

    // Going back to the default filter recovers
    let outcome = view.set_filter("status", "all").await?;
    assert!(matches!(outcome, Some(FetchOutcome::Applied)), "{:?}", outcome);
    assert_eq!(view.snapshot().await.status, ViewStatus::Ready);
    Ok(())
}

#[tokio::test]
async fn expired_session_redirects_and_leaves_view_idle() -> Result<()> {
    let server = common::spawn_mock().await?;
    let store = SessionStore::in_memory();
    store.set_session(common::EXPIRED_TOKEN, Role::Recruiter)?;
    let (client, nav) = server.client(&store)?;
    let controller = ListController::<Job>::initialize_from_url(&JOBS, "/jobs?page=2");
    let view = ListView::new(controller, Arc::new(ApiListSource::for_screen(client, &JOBS, None)));

    let outcome = view.mount().await;

    assert!(matches!(outcome, FetchOutcome::Failed(ref e) if e.is_auth_expired()));
    assert_eq!(view.snapshot().await.status, ViewStatus::Idle);
    assert!(store.get_token().is_none());
    assert_eq!(nav.visited(), vec![Destination::Login]);
    Ok(())
}

#[tokio::test]
async fn team_member_jobs_use_member_path() -> Result<()> {
    let server = common::spawn_mock().await?;
    let store = signed_in()?;
    let (client, _nav) = server.client(&store)?;
    let controller = ListController::<Job>::initialize_from_url(&TEAM_POSTED_JOBS, "/team/m-2/jobs?status=open");
    let view = ListView::new(
        controller,
        Arc::new(ApiListSource::for_screen(client, &TEAM_POSTED_JOBS, Some("m-2"))),
    );

    view.mount().await;

    let hits = server.state.hits_for("/team/m-2/jobs");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].query.get("status").map(String::as_str), Some("open"));
    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.location, "/team/m-2/jobs?status=open");
    assert!(snapshot.items.iter().all(|job| job.id.starts_with("m-2-job")));
    Ok(())
}

#[tokio::test]
async fn imports_list_uses_its_own_page_size() -> Result<()> {
    let server = common::spawn_mock().await?;
    let store = signed_in()?;
    let (client, _nav) = server.client(&store)?;
    let controller = ListController::<ImportRecord>::initialize_from_url(&IMPORTS, "type=jobs");
    let view = ListView::new(controller, Arc::new(ApiListSource::for_screen(client, &IMPORTS, None)));

    view.mount().await;

    let hits = server.state.hits_for("/imports");
    assert_eq!(hits[0].query.get("limit").map(String::as_str), Some("20"));
    assert_eq!(hits[0].query.get("type").map(String::as_str), Some("jobs"));
    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.items[0].import_type.as_deref(), Some("jobs"));
    assert_eq!(snapshot.location, "/imports?type=jobs");
    Ok(())
}

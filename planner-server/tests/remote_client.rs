//! End-to-end: the remote store variant against a served router.

use std::sync::Arc;
use std::time::Duration;

use planner_core::client::RemoteClient;
use planner_core::controller::{Controller, Intent};
use planner_core::date_key::DateKey;
use planner_core::error::PlannerError;
use planner_core::grid::WeekStart;
use planner_core::store::{DateNoteStore, GeneralNoteStore, TaskStore};

use planner_server::app;
use planner_server::auth::{Authorizer, TokenAuthorizer};
use planner_server::db::Database;
use planner_server::state::AppState;

async fn serve(authorizer: Arc<dyn Authorizer>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(AppState::new(Database::in_memory(), authorizer));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(url: &str, token: Option<&str>) -> RemoteClient {
    RemoteClient::new(url, token.map(String::from), Duration::from_secs(5)).unwrap()
}

fn secret() -> Arc<dyn Authorizer> {
    Arc::new(TokenAuthorizer::new(["secret".to_string()]))
}

#[tokio::test]
async fn test_remote_task_store() {
    let url = serve(secret()).await;
    let mut remote = client(&url, Some("secret"));
    let date: DateKey = "05-03-2025".parse().unwrap();

    remote.health_check().await.unwrap();

    let added = remote.add_task(date, "Buy milk").await.unwrap();
    assert!(!added.item.completed);

    let listed = remote.list_tasks(date).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].item.text, "Buy milk");

    assert!(remote.toggle_task(date, &added.id).await.unwrap().completed);
    assert!(!remote.toggle_task(date, &added.id).await.unwrap().completed);

    remote.delete_task(date, &added.id).await.unwrap();
    assert!(remote.list_tasks(date).await.unwrap().is_empty());

    let err = remote.toggle_task(date, &added.id).await.unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));
    let err = remote.delete_task(date, &added.id).await.unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));
}

#[tokio::test]
async fn test_remote_validation_happens_before_the_request() {
    let url = serve(secret()).await;
    let mut remote = client(&url, Some("secret"));
    let date: DateKey = "05-03-2025".parse().unwrap();

    assert!(matches!(remote.add_task(date, " ").await, Err(PlannerError::Validation(_))));
    assert!(matches!(remote.create_note("", "b").await, Err(PlannerError::Validation(_))));
    assert!(remote.list_tasks(date).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remote_notes() {
    let url = serve(secret()).await;
    let mut remote = client(&url, Some("secret"));
    let date: DateKey = "05-03-2025".parse().unwrap();

    assert_eq!(remote.day_note(date).await.unwrap(), "");
    remote.set_day_note(date, "dentist").await.unwrap();
    assert_eq!(remote.day_note(date).await.unwrap(), "dentist");

    let note = remote.create_note("Ideas", "rust").await.unwrap();
    let updated = remote.update_note(&note.id, "more rust").await.unwrap();
    assert_eq!(updated.body, "more rust");
    assert_eq!(remote.list_notes().await.unwrap().len(), 1);

    remote.delete_note(&note.id).await.unwrap();
    assert!(remote.list_notes().await.unwrap().is_empty());
    assert!(matches!(
        remote.update_note(&note.id, "x").await,
        Err(PlannerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_refs_with_path_separators_stay_on_their_route() {
    let url = serve(secret()).await;
    let mut remote = client(&url, Some("secret"));
    let date: DateKey = "05-03-2025".parse().unwrap();

    let note = remote.create_note("Ideas", "rust").await.unwrap();
    let task = remote.add_task(date, "Buy milk").await.unwrap();

    let err = remote
        .delete_task(date, &format!("../notes/{}", note.id))
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));

    let err = remote
        .delete_note(&format!("../tasks/{}", task.id))
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));

    let err = remote
        .update_note(&format!("../tasks/{}", task.id), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));

    for id in ["", ".", ".."] {
        assert!(matches!(remote.delete_note(&id.to_string()).await, Err(PlannerError::NotFound(_))));
    }

    assert_eq!(remote.list_notes().await.unwrap().len(), 1);
    assert_eq!(remote.list_tasks(date).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remote_delete_checks_the_date() {
    let url = serve(secret()).await;
    let mut remote = client(&url, Some("secret"));
    let monday: DateKey = "03-03-2025".parse().unwrap();
    let tuesday: DateKey = "04-03-2025".parse().unwrap();

    let task = remote.add_task(monday, "Buy milk").await.unwrap();

    let err = remote.delete_task(tuesday, &task.id).await.unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));
    assert_eq!(remote.list_tasks(monday).await.unwrap().len(), 1);

    remote.delete_task(monday, &task.id).await.unwrap();
    assert!(remote.list_tasks(monday).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_server_url_is_config_error() {
    let err = RemoteClient::new("not a url", None, Duration::from_secs(1)).err().unwrap();
    assert!(matches!(err, PlannerError::Config(_)));
}

#[tokio::test]
async fn test_unauthenticated_client_gets_authentication_error() {
    let url = serve(secret()).await;

    let anonymous = client(&url, None);
    assert!(matches!(anonymous.list_notes().await, Err(PlannerError::Authentication)));

    let wrong = client(&url, Some("nope"));
    let date: DateKey = "05-03-2025".parse().unwrap();
    assert!(matches!(wrong.list_tasks(date).await, Err(PlannerError::Authentication)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let remote = client(&url, None);
    assert!(matches!(remote.list_notes().await, Err(PlannerError::Network(_))));
}

#[tokio::test]
async fn test_controller_over_remote_backend() {
    let url = serve(secret()).await;
    let mut controller = Controller::new(client(&url, Some("secret")), WeekStart::Monday);
    let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();

    controller.dispatch(Intent::SelectDate(date)).await.unwrap();
    controller.dispatch(Intent::AddTask("Buy milk".into())).await.unwrap();
    let id = controller.view().tasks[0].id.clone();

    controller.dispatch(Intent::ToggleTask(id.clone())).await.unwrap();
    assert!(controller.view().tasks[0].item.completed);

    controller.dispatch(Intent::DeleteTask(id)).await.unwrap();
    assert!(controller.view().tasks.is_empty());
}

//! The HTTP client and record store against a live mock server.

use std::time::Duration;

use agenda::api::create_router;
use agenda::client::HttpDataService;
use agenda::config::{ClientArgs, Config};
use agenda_core::models::{Meeting, MeetingField, Note, NoteField};
use agenda_core::{DataService, Database, RecordStore, ServiceError};
use axum::routing::get;
use axum::Router;
use reqwest::Url;

async fn spawn(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{}", addr)).unwrap()
}

async fn spawn_backend() -> Url {
    let db = Database::open_memory().unwrap();
    db.migrate().unwrap();
    spawn(create_router(db)).await
}

fn config_for(base_url: &Url) -> Config {
    Config::from_args(&ClientArgs {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn note_round_trip_through_the_store() {
    let base = spawn_backend().await;
    let service = HttpDataService::<Note>::new(&config_for(&base)).unwrap();
    let mut store = RecordStore::<Note>::new();

    assert!(store.load(&service).await);
    assert!(store.records().is_empty());

    store.begin_create().unwrap();
    store.update_draft_field(NoteField::Title, "Q1 Review").unwrap();
    store.update_draft_field(NoteField::Content, "Budget discussion").unwrap();
    store.update_draft_field(NoteField::Date, "2024-03-01").unwrap();
    store.update_draft_field(NoteField::Author, "CPC").unwrap();
    store.save(&service).await.unwrap();

    let id = store.records()[0].id.clone();
    assert!(!id.is_empty());

    // A fresh store sees what the server kept.
    let mut fresh = RecordStore::<Note>::new();
    fresh.load(&service).await;
    assert_eq!(fresh.records(), store.records());

    store.begin_edit(&id).unwrap();
    store.update_draft_field(NoteField::Title, "Q1 Review (final)").unwrap();
    store.save(&service).await.unwrap();
    assert_eq!(store.records()[0].title, "Q1 Review (final)");
    assert_eq!(store.records()[0].id, id);

    store.delete(&id, &service).await.unwrap();
    assert!(store.records().is_empty());
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn meeting_participants_survive_the_round_trip() {
    let base = spawn_backend().await;
    let service = HttpDataService::<Meeting>::new(&config_for(&base)).unwrap();
    let mut store = RecordStore::<Meeting>::new();

    store.begin_create().unwrap();
    store.update_draft_field(MeetingField::Title, "Planning").unwrap();
    store.update_draft_field(MeetingField::Agenda, "Roadmap").unwrap();
    store.update_draft_field(MeetingField::Date, "2024-03-04").unwrap();
    store.update_draft_field(MeetingField::StartTime, "10:00").unwrap();
    store.update_draft_field(MeetingField::EndTime, "11:00").unwrap();
    store.update_draft_field(MeetingField::Persons, "Ana, Bo").unwrap();
    store.save(&service).await.unwrap();

    let listed = service.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].persons, vec!["Ana", "Bo"]);
    assert_eq!(listed[0].starts_at, "2024-03-04T10:00");
    assert_eq!(listed[0].end_time, "11:00");
}

#[tokio::test]
async fn deleting_an_unknown_id_reports_not_found() {
    let base = spawn_backend().await;
    let service = HttpDataService::<Note>::new(&config_for(&base)).unwrap();

    match service.delete("missing").await {
        Err(ServiceError::Status(404)) => {}
        other => panic!("expected 404, got {:?}", other),
    }
}

#[tokio::test]
async fn non_array_list_bodies_load_as_empty() {
    let app = Router::new().route("/notes", get(|| async { "<html>maintenance</html>" }));
    let base = spawn(app).await;
    let service = HttpDataService::<Note>::new(&config_for(&base)).unwrap();

    let mut store = RecordStore::<Note>::new();
    assert!(store.load(&service).await);
    assert!(store.records().is_empty());
    assert!(store.banner().is_none());
}

#[tokio::test]
async fn unreachable_service_empties_the_page_and_raises_a_banner() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        base_url: Url::parse(&format!("http://{}", addr)).unwrap(),
        timeout: Duration::from_secs(2),
    };
    let service = HttpDataService::<Meeting>::new(&config).unwrap();
    let mut store = RecordStore::<Meeting>::new();

    store.load(&service).await;
    assert!(store.records().is_empty());
    assert!(store.banner().unwrap().starts_with("Could not load meetings"));
}

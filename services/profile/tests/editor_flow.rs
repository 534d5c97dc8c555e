//! Profile editor against a local fake backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use common::{ApiClient, SessionManager};
use profile::{
    EditorError, HandleStatus, HttpProfileApi, ProfileDraft, ProfileEditor, SaveStep,
};
use serde_json::{Value, json};

#[derive(Default)]
struct Backend {
    profile: Option<Value>,
    fail_languages: bool,
    fail_load: bool,
    requests: Vec<String>,
    bodies: HashMap<String, Value>,
}

type Shared = Arc<Mutex<Backend>>;

fn record(state: &Shared, request: &str, body: Option<Value>) {
    let mut backend = state.lock().unwrap();
    backend.requests.push(request.to_string());
    if let Some(body) = body {
        backend.bodies.insert(request.to_string(), body);
    }
}

async fn get_profile(State(state): State<Shared>) -> impl IntoResponse {
    record(&state, "GET /profile", None);
    let backend = state.lock().unwrap();

    if backend.fail_load {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response();
    }

    match &backend.profile {
        Some(profile) => Json(json!({
            "user": { "id": "user-1", "email": "neo@example.com" },
            "profile": profile,
            "languages": [
                { "language_code": "en", "level": 5, "is_native": true, "is_target": false },
                { "language_code": "es", "level": 2, "is_native": false, "is_target": true }
            ],
            "availability": [
                { "weekday": 1, "start_local_time": "18:00", "end_local_time": "20:00", "timezone": "America/Vancouver" },
                { "weekday": 3, "start_local_time": "18:00", "end_local_time": "20:00", "timezone": "America/Vancouver" }
            ]
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Profile not found" })),
        )
            .into_response(),
    }
}

async fn put_profile(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "PUT /profile", Some(body.clone()));
    let mut profile = body;
    profile["discoverable"] = json!(true);
    state.lock().unwrap().profile = Some(profile.clone());
    Json(json!({ "profile": profile }))
}

async fn put_languages(State(state): State<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
    record(&state, "PUT /profile/languages", Some(body));
    if state.lock().unwrap().fail_languages {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "code": "invalid_language", "message": "Unknown language code" } })),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn put_availability(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "PUT /profile/availability", Some(body));
    Json(json!({}))
}

async fn check_handle(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let handle = query.get("handle").cloned().unwrap_or_default();
    record(&state, &format!("GET /profile/handle/check?handle={}", handle), None);
    Json(json!({ "available": handle != "taken" }))
}

async fn start(backend: Backend) -> (Shared, ProfileEditor<HttpProfileApi>) {
    let state = Arc::new(Mutex::new(backend));
    let app = Router::new().nest(
        "/api/v1",
        Router::new()
            .route("/profile", get(get_profile).put(put_profile))
            .route("/profile/languages", axum::routing::put(put_languages))
            .route("/profile/availability", axum::routing::put(put_availability))
            .route("/profile/handle/check", get(check_handle))
            .with_state(Arc::clone(&state)),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let session = SessionManager::in_memory();
    session.create_session("access-123", "user-1").unwrap();
    let client = ApiClient::with_api_url(format!("http://{}/api/v1", addr), "en", session);
    let api = Arc::new(HttpProfileApi::new(client));

    (
        state,
        ProfileEditor::new(api, "America/Vancouver", Duration::from_millis(20)),
    )
}

fn existing_profile() -> Value {
    json!({
        "handle": "neo",
        "birth_year": 1990,
        "birth_month": null,
        "country_code": "CA",
        "timezone": "America/Vancouver",
        "discoverable": false
    })
}

fn requests(state: &Shared) -> Vec<String> {
    state.lock().unwrap().requests.clone()
}

#[tokio::test]
async fn not_found_on_load_is_silent_and_keeps_defaults() {
    let (_, mut editor) = start(Backend::default()).await;

    editor.load().await;

    assert!(editor.is_loaded());
    assert_eq!(editor.message(), None);
    assert_eq!(editor.discoverable(), None);
    assert_eq!(editor.draft(), &ProfileDraft::empty("America/Vancouver"));
}

#[tokio::test]
async fn other_load_failures_surface_a_message() {
    let (_, mut editor) = start(Backend {
        fail_load: true,
        ..Default::default()
    })
    .await;

    editor.load().await;

    assert!(editor.is_loaded());
    assert_eq!(editor.message(), Some("Request failed (500)"));
}

#[tokio::test]
async fn load_hydrates_and_regroups_availability() {
    let (_, mut editor) = start(Backend {
        profile: Some(existing_profile()),
        ..Default::default()
    })
    .await;

    editor.load().await;

    let draft = editor.draft();
    assert_eq!(editor.email(), "neo@example.com");
    assert_eq!(editor.discoverable(), Some(false));
    assert_eq!(draft.handle, "neo");
    assert_eq!(draft.country_code, "CA");
    assert_eq!(draft.languages.len(), 2);
    assert_eq!(draft.availability.len(), 1);
    assert_eq!(
        draft.availability[0].weekdays.iter().copied().collect::<Vec<_>>(),
        vec![1, 3]
    );
    // The loaded handle is never looked up.
    assert_eq!(editor.handle_status(), HandleStatus::Idle);
}

#[tokio::test]
async fn languages_failure_stops_the_sequence_without_rollback() {
    let (state, mut editor) = start(Backend {
        profile: Some(existing_profile()),
        fail_languages: true,
        ..Default::default()
    })
    .await;

    editor.load().await;
    editor.set_country_code("US");

    let err = editor.save().await.unwrap_err();
    match err {
        EditorError::Save(save) => assert_eq!(save.step, SaveStep::Languages),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(editor.message(), Some("Unknown language code"));

    assert_eq!(
        requests(&state),
        vec!["GET /profile", "PUT /profile", "PUT /profile/languages"]
    );
    // The profile write already landed and stays.
    let stored = state.lock().unwrap().profile.clone().unwrap();
    assert_eq!(stored["country_code"], "US");
}

#[tokio::test]
async fn new_profile_is_saved_in_order_and_refreshed() {
    let (state, mut editor) = start(Backend::default()).await;

    editor.load().await;
    editor.set_handle("@neo");
    editor.add_language();
    editor.set_language_code(1, " ES ");
    editor.set_language_level(1, 2);
    editor.set_language_target(1, true);
    editor.toggle_weekday(0, 5);
    editor.toggle_weekday(0, 3);

    assert_eq!(editor.settle_handle_check().await, HandleStatus::Available);
    assert!(editor.can_save());

    let outcome = editor.save().await.unwrap();
    assert_eq!(outcome.discoverable, Some(true));
    assert_eq!(editor.discoverable(), Some(true));
    assert_eq!(editor.message(), Some("Profile saved."));
    // Saved handle is now the account's own.
    assert_eq!(editor.handle_status(), HandleStatus::Idle);

    assert_eq!(
        requests(&state),
        vec![
            "GET /profile",
            "GET /profile/handle/check?handle=neo",
            "PUT /profile",
            "PUT /profile/languages",
            "PUT /profile/availability",
            "GET /profile",
        ]
    );

    let backend = state.lock().unwrap();
    assert_eq!(
        backend.bodies["PUT /profile"],
        json!({
            "handle": "neo",
            "birth_year": null,
            "birth_month": null,
            "country_code": null,
            "timezone": "America/Vancouver"
        })
    );
    assert_eq!(
        backend.bodies["PUT /profile/languages"]["languages"][1],
        json!({
            "language_code": "es",
            "level": 2,
            "is_native": false,
            "is_target": true,
            "description": null
        })
    );
    let weekdays: Vec<u64> = backend.bodies["PUT /profile/availability"]["availability"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["weekday"].as_u64().unwrap())
        .collect();
    assert_eq!(weekdays, vec![1, 3, 5]);
}

#[tokio::test]
async fn taken_handle_blocks_the_save() {
    let (state, mut editor) = start(Backend::default()).await;

    editor.load().await;
    editor.set_handle("taken");

    assert_eq!(editor.settle_handle_check().await, HandleStatus::Unavailable);
    assert!(!editor.can_save());

    let err = editor.save().await.unwrap_err();
    assert!(matches!(err, EditorError::HandleUnavailable));
    assert!(
        requests(&state)
            .iter()
            .all(|request| !request.starts_with("PUT"))
    );
}

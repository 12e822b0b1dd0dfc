use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use entities::{Program, UserRecord};
use record_store::{CsvRecordStore, MemoryRecordStore, RecordStore, table};
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};
use tower::ServiceExt;

use crate::config::Config;
use crate::render::{ADMIN_ACTIVE, ADMIN_PRIVATE, BANNER_MISSING};
use crate::services::qr::encode_png;
use crate::state::AppState;
use crate::{create_app, create_state};

const ADMIN: &str = "boss@x.com";

fn test_config(dir: &TempDir) -> Config {
    Config {
        public_url: "https://points.example/".to_string(),
        admin_emails: vec![ADMIN.to_string()],
        banner_path: dir.path().join("welcome.png"),
        site_title: "Rewards".to_string(),
        ..Config::default()
    }
}

fn memory_app(
    dir: &TempDir,
    users: Vec<UserRecord>,
) -> (Router, Arc<AppState<MemoryRecordStore>>) {
    let state = create_state(test_config(dir), MemoryRecordStore::with_users(users));
    (create_app(state.clone()), state)
}

fn ledger() -> Vec<UserRecord> {
    vec![
        UserRecord::new(1, "Ana", "ana@x.com", Program::Diseno).with_points(12),
        UserRecord::new(2, "Bea", "bea@x.com", Program::Derecho),
    ]
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).unwrap())
}

fn assert_main_sections(html: &str) {
    assert!(html.contains(r#"action="/register""#));
    assert!(html.contains(r#"action="/lookup""#));
    assert!(html.contains(r#"action="/admin""#));
}

fn assert_lookup_only(html: &str) {
    assert!(!html.contains(r#"action="/register""#));
    assert!(!html.contains(r#"action="/lookup""#));
    assert!(!html.contains(r#"action="/admin""#));
}

#[tokio::test]
async fn test_register_then_scan_qr_with_csv_files() {
    let dir = tempdir().unwrap();
    let store = CsvRecordStore::new(
        dir.path().join("users.csv"),
        dir.path().join("registrations.csv"),
    );
    let app = create_app(create_state(test_config(&dir), store));

    let (status, html) = send(
        &app,
        form("/register", "name=Ana&email=ana%40x.com&program=Dise%C3%B1o"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Registration successful! Welcome, Ana"));
    assert!(html.contains("data:image/png;base64,"));

    let ledger = std::fs::read_to_string(dir.path().join("users.csv")).unwrap();
    assert_eq!(ledger, "id,name,email,program,points\n1,Ana,ana@x.com,Diseño,0\n");

    let log = std::fs::read_to_string(dir.path().join("registrations.csv")).unwrap();
    let mut lines = log.lines();
    assert_eq!(lines.next(), Some("date,time,name,email,program"));
    assert!(lines.next().unwrap().ends_with(",Ana,ana@x.com,Diseño"));
    assert_eq!(lines.next(), None);

    let (status, html) = send(&app, get("/?id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Hello, Ana!"));
    assert!(html.contains("You have 0 points"));
    assert_lookup_only(&html);
}

#[tokio::test]
async fn test_sequential_registrations_get_increasing_ids() {
    let dir = tempdir().unwrap();
    let (app, state) = memory_app(&dir, ledger());

    send(&app, form("/register", "name=Cal&email=cal%40x.com")).await;
    send(&app, form("/register", "name=Dan&email=dan%40x.com&program=Otra")).await;

    let users = state.store.list_users().await.unwrap();
    assert_eq!(users.len(), 4);
    assert_eq!((users[2].id, users[2].program), (3, Program::Ingenieria));
    assert_eq!((users[3].id, users[3].program), (4, Program::Otra));

    let log = state.store.list_registrations().await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].email, "dan@x.com");
}

#[tokio::test]
async fn test_lookup_by_id_outcomes_halt_the_page() {
    let dir = tempdir().unwrap();
    let (app, _) = memory_app(&dir, ledger());

    let (_, html) = send(&app, get("/?id=1")).await;
    assert!(html.contains("Hello, Ana!"));
    assert!(html.contains("You have 12 points"));
    assert_lookup_only(&html);

    let (status, html) = send(&app, get("/?id=99")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("User not found."));
    assert_lookup_only(&html);

    let (status, html) = send(&app, get("/?id=abc")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Invalid ID."));
    assert_lookup_only(&html);
}

#[tokio::test]
async fn test_repeated_id_uses_first_and_other_params_are_ignored() {
    let dir = tempdir().unwrap();
    let (app, _) = memory_app(&dir, ledger());

    let (_, html) = send(&app, get("/?ref=poster&id=2&id=1")).await;
    assert!(html.contains("Hello, Bea!"));

    let (_, html) = send(&app, get("/?ref=poster")).await;
    assert_main_sections(&html);
}

#[tokio::test]
async fn test_id_parameter_short_circuits_form_submissions() {
    let dir = tempdir().unwrap();
    let (app, state) = memory_app(&dir, ledger());

    let (_, html) = send(&app, form("/register?id=1", "name=Cal&email=cal%40x.com")).await;
    assert!(html.contains("Hello, Ana!"));
    assert_eq!(state.store.list_users().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let dir = tempdir().unwrap();
    let (app, state) = memory_app(&dir, ledger());

    let (status, html) = send(&app, form("/register", "name=Other&email=ana%40x.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("This email is already registered."));
    assert!(!html.contains("data:image/png"));
    assert_main_sections(&html);

    assert_eq!(state.store.list_users().await.unwrap().len(), 2);
    assert!(state.store.list_registrations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_fields_are_rejected_without_writes() {
    let dir = tempdir().unwrap();
    let (app, state) = memory_app(&dir, Vec::new());

    for body in ["name=&email=a%40x.com", "name=Ana&email=", ""] {
        let (_, html) = send(&app, form("/register", body)).await;
        assert!(html.contains("Please fill in name and email."));
    }

    assert!(state.store.list_users().await.unwrap().is_empty());
    assert!(state.store.list_registrations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_by_email_form() {
    let dir = tempdir().unwrap();
    let (app, _) = memory_app(&dir, ledger());

    let (_, html) = send(&app, form("/lookup", "email=ana%40x.com")).await;
    assert!(html.contains("Ana, you have 12 points"));
    assert_main_sections(&html);

    let (_, html) = send(&app, form("/lookup", "email=Ana%40x.com")).await;
    assert!(html.contains("We could not find that email. Have you registered?"));
    assert_main_sections(&html);
}

#[tokio::test]
async fn test_admin_gate() {
    let dir = tempdir().unwrap();
    let (app, _) = memory_app(&dir, ledger());

    let (_, html) = send(&app, get("/")).await;
    assert!(html.contains(ADMIN_PRIVATE));
    assert!(!html.contains("/admin/assign"));

    for email in ["", "Boss%40x.com", "someone%40x.com"] {
        let (_, html) = send(&app, form("/admin", &format!("admin_email={email}"))).await;
        assert!(html.contains(ADMIN_PRIVATE));
        assert!(!html.contains(ADMIN_ACTIVE));
        assert!(!html.contains("/admin/export"));
    }

    let (_, html) = send(&app, form("/admin", "admin_email=boss%40x.com")).await;
    assert!(html.contains(ADMIN_ACTIVE));
    assert!(html.contains(r#"action="/admin/assign""#));
    assert!(html.contains("/admin/export/users.csv?admin_email=boss%40x.com"));
    assert!(html.contains("/admin/export/registrations.csv?admin_email=boss%40x.com"));
}

#[tokio::test]
async fn test_admin_assigns_points_through_form() {
    let dir = tempdir().unwrap();
    let (app, state) = memory_app(&dir, ledger());

    let (_, html) = send(
        &app,
        form(
            "/admin/assign",
            "admin_email=boss%40x.com&target_email=bea%40x.com&amount=25",
        ),
    )
    .await;
    assert!(html.contains("Assigned 25 points to bea@x.com!"));
    assert!(html.contains(ADMIN_ACTIVE));

    let users = state.store.list_users().await.unwrap();
    assert_eq!(users[0].points, 12);
    assert_eq!(users[1].points, 25);

    let (_, html) = send(
        &app,
        form(
            "/admin/assign",
            "admin_email=boss%40x.com&target_email=ghost%40x.com&amount=5",
        ),
    )
    .await;
    assert!(html.contains("Email not found."));

    let (_, html) = send(
        &app,
        form(
            "/admin/assign",
            "admin_email=boss%40x.com&target_email=bea%40x.com&amount=0",
        ),
    )
    .await;
    assert!(html.contains("Points must be a whole number of at least 1."));

    assert_eq!(state.store.list_users().await.unwrap(), users);
}

#[tokio::test]
async fn test_non_admin_cannot_assign_through_form() {
    let dir = tempdir().unwrap();
    let (app, state) = memory_app(&dir, ledger());

    let (_, html) = send(
        &app,
        form(
            "/admin/assign",
            "admin_email=mallory%40x.com&target_email=bea%40x.com&amount=25",
        ),
    )
    .await;
    assert!(html.contains(ADMIN_PRIVATE));
    assert_eq!(state.store.list_users().await.unwrap()[1].points, 0);
}

#[tokio::test]
async fn test_exports() {
    let dir = tempdir().unwrap();
    let (app, _) = memory_app(&dir, ledger());

    let (status, _) = send(&app, get("/admin/export/users.csv")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, get("/admin/export/registrations.csv?admin_email=x")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get("/admin/export/users.csv?admin_email=boss%40x.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"users.csv\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let exported: Vec<UserRecord> = table::parse_rows(&bytes).unwrap();
    assert_eq!(exported, ledger());

    let response = app
        .clone()
        .oneshot(get("/admin/export/registrations.csv?admin_email=boss%40x.com"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"registrations.csv\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"date,time,name,email,program\n");
}

#[tokio::test]
async fn test_banner() {
    let dir = tempdir().unwrap();
    let (app, _) = memory_app(&dir, Vec::new());

    let (status, html) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(BANNER_MISSING));
    assert_main_sections(&html);

    std::fs::write(dir.path().join("welcome.png"), encode_png("banner").unwrap()).unwrap();

    let (_, html) = send(&app, get("/")).await;
    assert!(!html.contains(BANNER_MISSING));
    assert!(html.contains(r#"<img class="banner" src="data:image/png;base64,"#));
}

#[tokio::test]
async fn test_malformed_ledger_aborts_render() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("users.csv");
    std::fs::write(&ledger_path, "id,name,email,program,points\nx,Ana,a@x.com,Otra,0\n").unwrap();
    let store = CsvRecordStore::new(ledger_path, dir.path().join("registrations.csv"));
    let app = create_app(create_state(test_config(&dir), store));

    let (status, _) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_json_register_and_get_points() {
    let dir = tempdir().unwrap();
    let (app, _) = memory_app(&dir, Vec::new());

    let (status, body) = send_json(
        &app,
        json_post(
            "/api/register",
            json!({ "name": "Ana", "email": "ana@x.com", "program": "Diseño" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["user"],
        json!({ "id": 1, "name": "Ana", "email": "ana@x.com", "program": "Diseño", "points": 0 })
    );
    assert_eq!(body["lookup_url"], "https://points.example/?id=1");
    assert!(body["qr_png_base64"].as_str().unwrap().starts_with("iVBORw0KGgo"));

    let (status, body) = send_json(
        &app,
        json_post("/api/register", json!({ "name": "Ana", "email": "ana@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_EXISTS");

    let (status, _) = send_json(
        &app,
        json_post("/api/register", json!({ "name": "", "email": "x@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(&app, json_post("/api/points/get", json!({ "id": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ana");

    let (status, body) =
        send_json(&app, json_post("/api/points/get", json!({ "id": "1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["points"], 0);

    let (status, _) =
        send_json(&app, json_post("/api/points/get", json!({ "email": "ana@x.com" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, json_post("/api/points/get", json!({ "id": 7 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
        send_json(&app, json_post("/api/points/get", json!({ "id": "seven" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&app, json_post("/api/points/get", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_json_assign_points() {
    let dir = tempdir().unwrap();
    let (app, state) = memory_app(&dir, ledger());

    let (status, body) = send_json(
        &app,
        json_post(
            "/api/admin/assign-points",
            json!({ "admin_email": "nobody@x.com", "email": "ana@x.com", "amount": 3 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");

    let (status, _) = send_json(
        &app,
        json_post(
            "/api/admin/assign-points",
            json!({ "admin_email": ADMIN, "email": "ana@x.com", "amount": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        json_post(
            "/api/admin/assign-points",
            json!({ "admin_email": ADMIN, "email": "ghost@x.com", "amount": 3 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(
        &app,
        json_post(
            "/api/admin/assign-points",
            json!({ "admin_email": ADMIN, "email": "ana@x.com", "amount": 3 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "email": "ana@x.com", "amount": 3, "points": 15 }));

    let users = state.store.list_users().await.unwrap();
    assert_eq!(users[0].points, 15);
    assert_eq!(users[1].points, 0);
}

#[tokio::test]
async fn test_health() {
    let dir = tempdir().unwrap();
    let (app, _) = memory_app(&dir, Vec::new());

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

// Shared test helpers for integration tests
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Writes `content` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Builds a minimal `.xlsx` workbook. Cells that parse as numbers are stored
/// as numeric cells, empty strings are left out, everything else is an inline
/// string.
pub fn write_xlsx(path: &Path, sheets: &[(&str, Vec<Vec<&str>>)]) {
    let file = fs::File::create(path).expect("Failed to create workbook");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let overrides: String = (1..=sheets.len())
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    let entries: Vec<(String, String)> = vec![
        (
            "[Content_Types].xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
            ),
        ),
        (
            "_rels/.rels".to_string(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
                .to_string(),
        ),
        (
            "xl/workbook.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
                sheets
                    .iter()
                    .enumerate()
                    .map(|(i, (name, _))| format!(
                        r#"<sheet name="{name}" sheetId="{id}" r:id="rId{id}"/>"#,
                        id = i + 1
                    ))
                    .collect::<String>()
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                (1..=sheets.len())
                    .map(|i| format!(
                        r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
                    ))
                    .collect::<String>()
            ),
        ),
    ];

    for (name, body) in entries {
        zip.start_file(name, options).expect("Failed to start zip entry");
        zip.write_all(body.as_bytes()).expect("Failed to write zip entry");
    }
    for (i, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
            .expect("Failed to start sheet entry");
        zip.write_all(sheet_xml(rows).as_bytes())
            .expect("Failed to write sheet entry");
    }
    zip.finish().expect("Failed to finish workbook");
}

fn sheet_xml(rows: &[Vec<&str>]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(r, cells)| {
            let cells: String = cells
                .iter()
                .enumerate()
                .filter(|(_, value)| !value.is_empty())
                .map(|(c, value)| {
                    let reference = format!("{}{}", column_name(c), r + 1);
                    if value.parse::<f64>().is_ok() {
                        format!(r#"<c r="{reference}"><v>{value}</v></c>"#)
                    } else {
                        format!(
                            r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                            escape_xml(value)
                        )
                    }
                })
                .collect();
            format!(r#"<row r="{}">{cells}</row>"#, r + 1)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{body}</sheetData></worksheet>"#
    )
}

fn column_name(mut index: usize) -> String {
    let mut name = String::new();
    index += 1;
    while index > 0 {
        let rem = (index - 1) % 26;
        name.insert(0, (b'A' + rem as u8) as char);
        index = (index - 1) / 26;
    }
    name
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Writes a `Suite.toml` into `dir` and returns its path.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    write_file(dir, "Suite.toml", content)
}

/// A temp directory holding a config whose services both point at
/// `base_url` (the mock serves users under `/api` and objects at the root).
pub fn project_with_suites(base_url: &str, suites: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let config = format!(
        r#"
language = "en"
jobs = 1

[services.reqres]
base_url = "{base_url}/api"

[services.objects]
base_url = "{base_url}"

{suites}
"#
    );
    write_config(dir.path(), &config);
    dir
}

// ---------------------------------------------------------------------------
// In-process mock of both target services
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockState {
    objects: Mutex<BTreeMap<String, Value>>,
    next_id: AtomicU64,
    /// When set, creating an object named "LargePayload" answers with this
    /// status instead of storing it.
    large_payload_status: Option<StatusCode>,
}

type Shared = Arc<MockState>;

/// A running mock server.
pub struct MockServer {
    pub addr: SocketAddr,
}

impl MockServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Starts the mock on an ephemeral port of the current runtime.
    pub async fn start() -> Self {
        Self::serve(MockState::default()).await
    }

    /// Starts a mock that rejects large-payload creation with `status`.
    pub async fn start_with_large_payload_status(status: u16) -> Self {
        let status = StatusCode::from_u16(status).expect("Invalid status code");
        Self::serve(MockState {
            large_payload_status: Some(status),
            ..MockState::default()
        })
        .await
    }

    async fn serve(state: MockState) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Mock server has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router(state)).await;
        });
        Self { addr }
    }

    /// Starts the mock on its own runtime thread, for synchronous tests that
    /// drive the binary.
    pub fn start_in_background() -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("Failed to build runtime");
            runtime.block_on(async move {
                let server = MockServer::start().await;
                tx.send(server.addr).expect("Failed to report mock address");
                std::future::pending::<()>().await;
            });
        });
        let addr = rx.recv().expect("Mock server did not start");
        Self { addr }
    }
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/objects", get(list_objects).post(create_object))
        .route(
            "/objects/{id}",
            get(get_object)
                .put(replace_object)
                .patch(patch_object)
                .delete(delete_object),
        )
        .with_state(Arc::new(state))
}

async fn list_users() -> Json<Value> {
    Json(json!({ "page": 1, "data": [{ "id": 1 }, { "id": 2 }] }))
}

async fn get_user(AxumPath(id): AxumPath<String>) -> Response {
    match id.parse::<u32>() {
        Ok(n) if (1..=12).contains(&n) => {
            Json(json!({ "data": { "id": n, "email": format!("user{n}@example.com") } }))
                .into_response()
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn create_user(Json(body): Json<Value>) -> Response {
    let mut body = body;
    if let Some(map) = body.as_object_mut() {
        map.insert("id".to_string(), json!("101"));
        map.insert("createdAt".to_string(), json!("2024-01-01T00:00:00.000Z"));
    }
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_user(AxumPath(_id): AxumPath<String>, Json(body): Json<Value>) -> Json<Value> {
    let mut body = body;
    if let Some(map) = body.as_object_mut() {
        map.insert("updatedAt".to_string(), json!("2024-01-01T00:00:00.000Z"));
    }
    Json(body)
}

async fn delete_user(AxumPath(_id): AxumPath<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn list_objects(State(state): State<Shared>) -> Json<Value> {
    let mut list = vec![json!({ "id": "1", "name": "Google Pixel 6 Pro", "data": null })];
    list.extend(state.objects.lock().unwrap().values().cloned());
    Json(Value::Array(list))
}

async fn create_object(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Some(status) = state.large_payload_status {
        if body.get("name") == Some(&json!("LargePayload")) {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            return (status, Json(json!({ "error": reason }))).into_response();
        }
    }
    let id = format!("ff{}", state.next_id.fetch_add(1, Ordering::SeqCst));
    let object = json!({
        "id": id,
        "name": body.get("name").cloned().unwrap_or(Value::Null),
        "data": body.get("data").cloned().unwrap_or(Value::Null),
        "createdAt": "2024-01-01T00:00:00.000+00:00"
    });
    state.objects.lock().unwrap().insert(id, object.clone());
    Json(object).into_response()
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("Oject with id={id} was not found.") })),
    )
        .into_response()
}

async fn get_object(State(state): State<Shared>, AxumPath(id): AxumPath<String>) -> Response {
    match state.objects.lock().unwrap().get(&id) {
        Some(object) => Json(object.clone()).into_response(),
        None => not_found(&id),
    }
}

async fn replace_object(
    State(state): State<Shared>,
    AxumPath(id): AxumPath<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut objects = state.objects.lock().unwrap();
    if !objects.contains_key(&id) {
        return not_found(&id);
    }
    let object = json!({
        "id": id,
        "name": body.get("name").cloned().unwrap_or(Value::Null),
        "data": body.get("data").cloned().unwrap_or(Value::Null),
        "updatedAt": "2024-01-01T00:00:00.000+00:00"
    });
    objects.insert(id, object.clone());
    Json(object).into_response()
}

async fn patch_object(
    State(state): State<Shared>,
    AxumPath(id): AxumPath<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut objects = state.objects.lock().unwrap();
    let Some(object) = objects.get_mut(&id) else {
        return not_found(&id);
    };
    if let (Some(target), Some(patch)) = (object.as_object_mut(), body.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(object.clone()).into_response()
}

async fn delete_object(State(state): State<Shared>, AxumPath(id): AxumPath<String>) -> Response {
    match state.objects.lock().unwrap().remove(&id) {
        Some(_) => Json(json!({ "message": format!("Object with id = {id} has been deleted.") }))
            .into_response(),
        None => not_found(&id),
    }
}

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use jobboard_admin::api::ApiClient;
use jobboard_admin::navigation::RecordingNavigator;
use jobboard_admin::session::SessionStore;

/// Token the mock treats as expired (401 on every request)
pub const EXPIRED_TOKEN: &str = "expired-token";
pub const PASSWORD: &str = "secret";
pub const TOTAL_JOBS: u64 = 23;

#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

/// Shared mock state: recorded requests and knobs tests can turn.
#[derive(Default)]
pub struct MockState {
    hits: Mutex<Vec<Hit>>,
    failing_paths: Mutex<HashSet<String>>,
    login_role: Mutex<Option<String>>,
}

impl MockState {
    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_for(&self, path: &str) -> Vec<Hit> {
        self.hits().into_iter().filter(|h| h.path == path).collect()
    }

    pub fn clear_hits(&self) {
        self.hits.lock().unwrap().clear();
    }

    /// Answer 500 for this path from now on
    pub fn fail_path(&self, path: &str) {
        self.failing_paths.lock().unwrap().insert(path.to_string());
    }

    /// Stop failing a path set up with `fail_path`
    pub fn restore_path(&self, path: &str) {
        self.failing_paths.lock().unwrap().remove(path);
    }

    pub fn set_login_role(&self, role: &str) {
        *self.login_role.lock().unwrap() = Some(role.to_string());
    }
}

pub struct MockServer {
    pub port: u16,
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockServer {
    /// Gateway client plus the navigator it reports redirects to
    pub fn client(&self, store: &SessionStore) -> Result<(ApiClient, Arc<RecordingNavigator>)> {
        let navigator = Arc::new(RecordingNavigator::new());
        let client = ApiClient::new(
            self.base_url.clone(),
            Duration::from_secs(5),
            store.clone(),
            navigator.clone(),
        )?;
        Ok((client, navigator))
    }
}

/// Start the mock upstream API on a free port. Lives as long as the test runtime.
pub async fn spawn_mock() -> Result<MockServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let state = Arc::new(MockState::default());

    let app = Router::new().fallback(dispatch).with_state(state.clone());
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind mock API")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(MockServer {
        port,
        base_url: format!("http://127.0.0.1:{}/api", port),
        state,
    })
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

async fn dispatch(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().trim_start_matches("/api").to_string();
    let query: HashMap<String, String> = url::form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes())
        .into_owned()
        .collect();
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.hits.lock().unwrap().push(Hit {
        method: method.to_string(),
        path: path.clone(),
        query: query.clone(),
        authorization: authorization.clone(),
    });

    if authorization.as_deref() == Some(&format!("Bearer {}", EXPIRED_TOKEN)) {
        return failure(StatusCode::UNAUTHORIZED, "jwt expired");
    }
    if state.failing_paths.lock().unwrap().contains(&path) {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded");
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match (method.as_str(), segments.as_slice()) {
        ("POST", ["auth", "login"]) => login(&state, &body),
        ("GET", ["jobs"]) => jobs_page(&query, "job").await,
        ("GET", ["jobs", "categories"]) => ok(json!([
            { "name": "Engineering", "jobCount": 12 },
            { "name": "Design", "jobCount": 4 }
        ])),
        ("GET", ["jobs", "verification-counts"]) => ok(json!({ "verified": 15, "pending": 6, "rejected": 2 })),
        ("GET", ["team", "stats"]) => ok(json!([
            { "memberId": "m-1", "name": "Ana", "jobCount": 3 },
            { "memberId": "m-2", "name": "Ben", "jobCount": 8 }
        ])),
        ("GET", ["team"]) => ok(json!([
            { "_id": "m-1", "name": "Ana", "email": "ana@example.com", "role": "recruiter" },
            { "_id": "m-2", "name": "Ben", "email": "ben@example.com", "role": "eliteTeam" },
            { "_id": "m-3", "name": "Cy", "email": "cy@example.com", "role": "jobHoster" }
        ])),
        ("GET", ["team", member, "jobs"]) => jobs_page(&query, &format!("{}-job", member)).await,
        ("GET", ["applicants"]) => ok(json!({
            "items": [
                { "_id": "a-1", "name": "Dee", "email": "dee@example.com", "jobTitle": "Rust Engineer", "status": "shortlisted" },
                { "_id": "a-2", "name": "Eli", "email": "eli@example.com", "jobTitle": "Designer", "status": "new" }
            ],
            "pagination": { "currentPage": 1, "totalPages": 1, "totalItems": 2 }
        })),
        ("GET", ["users", "count"]) => ok(json!({ "total": 640 })),
        ("GET", ["users", "growth"]) => {
            let role = query.get("role").cloned().unwrap_or_default();
            let period = query.get("period").cloned().unwrap_or_default();
            ok(json!([
                { "label": format!("{}:{}:1", role, period), "count": 10 },
                { "label": format!("{}:{}:2", role, period), "count": 14 }
            ]))
        }
        ("GET", ["imports"]) => ok(json!({
            "items": [
                { "_id": "i-1", "fileName": "jobs.csv", "type": "jobs", "status": "done", "rows": 120 }
            ],
            "pagination": { "currentPage": 1, "totalPages": 1, "totalItems": 1 }
        })),
        _ => failure(StatusCode::NOT_FOUND, "no such endpoint"),
    }
}

fn login(state: &MockState, body: &str) -> Response {
    let body: Value = serde_json::from_str(body).unwrap_or_default();
    if body["password"] != PASSWORD {
        return failure(StatusCode::BAD_REQUEST, "Invalid email or password");
    }
    let role = state
        .login_role
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| "admin".to_string());
    ok(json!({ "token": format!("token-for-{}", role), "role": role }))
}

/// Paginated jobs. The `status` filter steers behaviour:
/// `empty` yields no rows, `gone` yields no rows but echoes the requested
/// page, `slow` answers after 300ms, `boom` fails, any other value yields
/// three rows with that status.
async fn jobs_page(query: &HashMap<String, String>, prefix: &str) -> Response {
    let status = query.get("status").map(String::as_str);
    match status {
        Some("slow") => tokio::time::sleep(Duration::from_millis(300)).await,
        Some("boom") => return failure(StatusCode::INTERNAL_SERVER_ERROR, "status filter exploded"),
        _ => {}
    }

    let total: u64 = match status {
        Some("empty") | Some("gone") => 0,
        Some(_) => 3,
        None => TOTAL_JOBS,
    };
    let limit: u64 = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(10).max(1);
    let total_pages = total.div_ceil(limit);
    let requested: u64 = query.get("page").and_then(|v| v.parse().ok()).unwrap_or(1).max(1);
    let current = match status {
        Some("gone") => requested,
        _ if total_pages > 0 => requested.min(total_pages),
        _ => 1,
    };

    let start = ((current - 1) * limit).min(total);
    let end = (start + limit).min(total);
    let items: Vec<Value> = (start..end)
        .map(|n| {
            json!({
                "_id": format!("{}-{}", prefix, n + 1),
                "title": format!("Position {}", n + 1),
                "company": "Acme",
                "status": status.unwrap_or(if n % 2 == 0 { "active" } else { "closed" }),
                "verificationStatus": "verified"
            })
        })
        .collect();

    ok(json!({
        "items": items,
        "pagination": { "currentPage": current, "totalPages": total_pages, "totalItems": total }
    }))
}

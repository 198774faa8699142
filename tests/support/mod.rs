//! In-process mock of the Vector Tasks API for integration tests.
//!
//! Serves the HTTP surface plus the `/ws` push endpoint on an ephemeral
//! port. State is plain in-memory vectors behind mutexes; every mutation
//! broadcasts a bare `update` frame to connected push clients, matching the
//! production server's contract. `fail_remote` flips every HTTP handler to
//! a 500 so tests can exercise the absorb-and-render-empty path.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use vcc::model::{Briefing, BriefingSlot, DailyLog, Priority, Project, Status, Task};

pub struct ServerState {
    pub tasks: Mutex<Vec<Task>>,
    pub projects: Mutex<Vec<Project>>,
    pub daily_log: Mutex<Option<DailyLog>>,
    pub history: Mutex<Vec<DailyLog>>,
    fail: AtomicBool,
    delay_ms: AtomicU64,
    next_id: AtomicI64,
    updates: broadcast::Sender<()>,
}

impl ServerState {
    fn new() -> Self {
        let (updates, _) = broadcast::channel(16);
        Self {
            tasks: Mutex::new(Vec::new()),
            projects: Mutex::new(Vec::new()),
            daily_log: Mutex::new(None),
            history: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
            next_id: AtomicI64::new(1),
            updates,
        }
    }

    pub fn fail_remote(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn failing(&self) -> bool {
        self.fail.load(Ordering::SeqCst)
    }

    /// Hold every read response for `ms` after the data was captured, so a
    /// test can race a slow stale load against a fast fresh one.
    pub fn set_delay_ms(&self, ms: u64) {
        self.delay_ms.store(ms, Ordering::SeqCst);
    }

    async fn maybe_delay(&self) {
        let ms = self.delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        }
    }

    pub fn alloc_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Broadcast one payload-less `update` frame to push clients.
    pub fn notify_update(&self) {
        let _ = self.updates.send(());
    }

    pub fn seed_task(&self, task: Task) {
        self.tasks.lock().expect("lock").push(task);
    }

    pub fn seed_project(&self, project: Project) {
        self.projects.lock().expect("lock").push(project);
    }

    pub fn seed_daily_log(&self, log: DailyLog) {
        *self.daily_log.lock().expect("lock") = Some(log);
    }

    pub fn seed_history(&self, log: DailyLog) {
        self.history.lock().expect("lock").push(log);
    }
}

pub struct MockServer {
    pub state: Arc<ServerState>,
    base_url: String,
    server: JoinHandle<()>,
}

impl MockServer {
    /// Bind an ephemeral port and serve the API on the current runtime.
    pub async fn start() -> Self {
        let state = Arc::new(ServerState::new());
        let app = router(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        Self {
            state,
            base_url: format!("http://{addr}"),
            server,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ws_url(&self) -> String {
        format!("ws{}/ws", self.base_url.trim_start_matches("http"))
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub fn task(id: i64, title: &str, priority: Priority, status: Status) -> Task {
    let at = Utc::now();
    Task {
        id,
        title: title.to_string(),
        description: None,
        priority,
        status,
        project_id: None,
        nudge_count: 0,
        created_at: at,
        updated_at: at,
    }
}

pub fn task_done_at(id: i64, title: &str, updated_at: DateTime<Utc>) -> Task {
    let mut task = task(id, title, Priority::Med, Status::Done);
    task.updated_at = updated_at;
    task
}

pub fn project(id: i64, name: &str, parent_id: Option<i64>) -> Project {
    Project {
        id,
        name: name.to_string(),
        description: None,
        category: None,
        parent_id,
    }
}

pub fn daily_log(id: i64, date: NaiveDate) -> DailyLog {
    DailyLog {
        id,
        date,
        big_win: None,
        starting_nudge: None,
        morning_briefing: None,
        midday_briefing: None,
        shutdown_briefing: None,
        nightly_reflection: None,
        goals_for_tomorrow: Vec::new(),
        reflections: None,
        timer_end: None,
        briefings: Vec::new(),
    }
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", delete(delete_task).patch(patch_task))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", delete(delete_project))
        .route("/daily-log", get(get_daily_log))
        .route("/daily-log/history", get(get_history))
        .route("/daily-log/update", post(update_daily_log))
        .route("/daily-log/briefing", post(add_briefing))
        .route("/daily-log/mark-goal", post(mark_goal))
        .route("/ws", get(ws_upgrade))
        .with_state(state)
}

async fn list_tasks(State(state): State<Arc<ServerState>>) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let tasks = state.tasks.lock().expect("lock").clone();
    state.maybe_delay().await;
    Json(tasks).into_response()
}

#[derive(Deserialize)]
struct TaskBody {
    title: String,
    #[serde(default)]
    description: Option<String>,
    priority: Priority,
    status: Status,
    #[serde(default)]
    project_id: Option<i64>,
}

async fn create_task(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<TaskBody>,
) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let now = Utc::now();
    let task = Task {
        id: state.alloc_id(),
        title: body.title,
        description: body.description,
        priority: body.priority,
        status: body.status,
        project_id: body.project_id,
        nudge_count: 0,
        created_at: now,
        updated_at: now,
    };
    state.tasks.lock().expect("lock").push(task.clone());
    state.notify_update();
    Json(task).into_response()
}

async fn patch_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut tasks = state.tasks.lock().expect("lock");
    let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(value) = patch.get("title").and_then(Value::as_str) {
        task.title = value.to_string();
    }
    if let Some(value) = patch.get("status") {
        match serde_json::from_value::<Status>(value.clone()) {
            Ok(status) => task.status = status,
            Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
        }
    }
    if let Some(value) = patch.get("priority") {
        match serde_json::from_value::<Priority>(value.clone()) {
            Ok(priority) => task.priority = priority,
            Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
        }
    }
    if let Some(value) = patch.get("project_id").and_then(Value::as_i64) {
        task.project_id = Some(value);
    }
    task.updated_at = Utc::now();
    let updated = task.clone();
    drop(tasks);
    state.notify_update();
    Json(updated).into_response()
}

async fn delete_task(State(state): State<Arc<ServerState>>, Path(id): Path<i64>) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut tasks = state.tasks.lock().expect("lock");
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    if tasks.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    drop(tasks);
    state.notify_update();
    Json(json!({ "deleted": true })).into_response()
}

async fn list_projects(State(state): State<Arc<ServerState>>) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let projects = state.projects.lock().expect("lock").clone();
    state.maybe_delay().await;
    Json(projects).into_response()
}

#[derive(Deserialize)]
struct ProjectBody {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    parent_id: Option<i64>,
}

async fn create_project(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<ProjectBody>,
) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let project = Project {
        id: state.alloc_id(),
        name: body.name,
        description: body.description,
        category: body.category,
        parent_id: body.parent_id,
    };
    state.projects.lock().expect("lock").push(project.clone());
    state.notify_update();
    Json(project).into_response()
}

async fn delete_project(State(state): State<Arc<ServerState>>, Path(id): Path<i64>) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut projects = state.projects.lock().expect("lock");
    let before = projects.len();
    // cascade to sub-sectors, like the production server
    projects.retain(|project| project.id != id && project.parent_id != Some(id));
    if projects.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    drop(projects);
    state.notify_update();
    Json(json!({ "deleted": true })).into_response()
}

async fn get_daily_log(State(state): State<Arc<ServerState>>) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let log = state.daily_log.lock().expect("lock").clone();
    state.maybe_delay().await;
    Json(log).into_response()
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    has_morning: bool,
    #[serde(default)]
    has_night: bool,
}

fn default_limit() -> usize {
    20
}

async fn get_history(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let history = state.history.lock().expect("lock");
    let page: Vec<DailyLog> = history
        .iter()
        .filter(|log| !query.has_morning || log.morning_briefing.is_some())
        .filter(|log| !query.has_night || log.nightly_reflection.is_some())
        .skip(query.offset)
        .take(query.limit)
        .cloned()
        .collect();
    Json(page).into_response()
}

async fn update_daily_log(
    State(state): State<Arc<ServerState>>,
    Json(patch): Json<Value>,
) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut slot = state.daily_log.lock().expect("lock");
    let log = slot.get_or_insert_with(|| daily_log(state.alloc_id(), Utc::now().date_naive()));
    if let Some(value) = patch.get("big_win").and_then(Value::as_str) {
        log.big_win = Some(value.to_string());
    }
    if let Some(value) = patch.get("starting_nudge").and_then(Value::as_str) {
        log.starting_nudge = Some(value.to_string());
    }
    if let Some(value) = patch.get("goals_for_tomorrow").and_then(Value::as_array) {
        log.goals_for_tomorrow = value
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }
    if let Some(value) = patch.get("reflections").and_then(Value::as_str) {
        log.reflections = Some(value.to_string());
    }
    // presence of the key matters: an explicit null stops the timer
    if let Some(value) = patch.get("timer_end") {
        log.timer_end = if value.is_null() {
            None
        } else {
            match serde_json::from_value(value.clone()) {
                Ok(end) => Some(end),
                Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
            }
        };
    }
    let updated = log.clone();
    drop(slot);
    state.notify_update();
    Json(updated).into_response()
}

#[derive(Deserialize)]
struct BriefingBody {
    slot: BriefingSlot,
    content: String,
}

async fn add_briefing(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<BriefingBody>,
) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let briefing = Briefing {
        id: state.alloc_id(),
        slot: body.slot,
        content: body.content.clone(),
        created_at: Utc::now(),
    };
    let mut slot = state.daily_log.lock().expect("lock");
    let log = slot.get_or_insert_with(|| daily_log(state.alloc_id(), Utc::now().date_naive()));
    let column = match body.slot {
        BriefingSlot::Morning => &mut log.morning_briefing,
        BriefingSlot::Midday => &mut log.midday_briefing,
        BriefingSlot::Shutdown => &mut log.shutdown_briefing,
        BriefingSlot::Night => &mut log.nightly_reflection,
    };
    *column = Some(body.content);
    log.briefings.insert(0, briefing.clone());
    drop(slot);
    state.notify_update();
    Json(briefing).into_response()
}

#[derive(Deserialize)]
struct GoalQuery {
    goal: String,
}

async fn mark_goal(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<GoalQuery>,
) -> Response {
    if state.failing() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut slot = state.daily_log.lock().expect("lock");
    let Some(log) = slot.as_mut() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mut completed: Vec<String> = log
        .completed_goals()
        .into_iter()
        .map(str::to_string)
        .collect();
    if !completed.iter().any(|goal| goal == &query.goal) {
        completed.push(query.goal);
    }
    log.reflections = Some(completed.join("|"));
    let updated = log.clone();
    drop(slot);
    state.notify_update();
    Json(updated).into_response()
}

async fn ws_upgrade(State(state): State<Arc<ServerState>>, ws: WebSocketUpgrade) -> Response {
    // subscribe before the 101 goes out so no update can fall between the
    // client observing the connect and the forwarding loop starting
    let updates = state.updates.subscribe();
    ws.on_upgrade(move |socket| push_updates(socket, updates))
}

async fn push_updates(mut socket: WebSocket, mut updates: broadcast::Receiver<()>) {
    loop {
        tokio::select! {
            received = updates.recv() => {
                match received {
                    // a lagged receiver still means something changed
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        if socket.send(Message::Text("update".into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            message = socket.recv() => {
                match message {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

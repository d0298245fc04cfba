//! A small in-process LMS server speaking the same JSON shapes as the real API.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use seeder_lib::config::Config;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tracing::Level;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Default)]
pub struct ServerState {
    pub users: Vec<User>,
    pub courses: Vec<Value>,
    pub lessons: Vec<Value>,
    pub quizzes: Vec<Value>,
    pub submissions: Vec<Value>,
    pub completions: Vec<Value>,
    /// Login hands the token out only as a cookie.
    pub cookie_only_login: bool,
}

pub type Shared = Arc<Mutex<ServerState>>;

pub struct FakeServer {
    pub base_url: String,
    pub state: Shared,
}

impl FakeServer {
    pub fn add_user(&self, name: &str, email: &str, password: &str, role: &str) -> String {
        let id = new_id();
        self.state.lock().unwrap().users.push(User {
            id: id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        });
        id
    }

    pub fn lesson(&self, id: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .lessons
            .iter()
            .find(|l| l["_id"] == id)
            .cloned()
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// The user behind a `Bearer token-<id>` header.
fn caller(state: &ServerState, headers: &HeaderMap) -> Option<User> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let id = value.strip_prefix("Bearer token-")?;
    state.users.iter().find(|u| u.id == id).cloned()
}

fn user_json(user: &User) -> Value {
    json!({ "_id": user.id, "name": user.name, "email": user.email, "role": user.role })
}

//=========================================================================================
// Handlers
//=========================================================================================

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let state = state.lock().unwrap();
    let Some(user) = state
        .users
        .iter()
        .find(|u| body["email"] == u.email.as_str() && body["password"] == u.password.as_str())
    else {
        return message(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };

    let token = format!("token-{}", user.id);
    if state.cookie_only_login {
        (
            [(header::SET_COOKIE, format!("token={}; HttpOnly; Path=/", token))],
            Json(json!({ "user": { "id": user.id } })),
        )
            .into_response()
    } else {
        Json(json!({ "token": token, "user": { "id": user.id, "email": user.email } })).into_response()
    }
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if state.users.iter().any(|u| u.email == email) {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }
    let user = User {
        id: new_id(),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email,
        password: body["password"].as_str().unwrap_or_default().to_string(),
        role: "student".to_string(),
    };
    let payload = json!({ "message": "User registered", "user": user_json(&user) });
    state.users.push(user);
    (StatusCode::CREATED, Json(payload)).into_response()
}

async fn create_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if caller(&state, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "No token provided");
    }
    if !matches!(body["category"].as_str(), Some("Secundaria" | "Preparatoria")) {
        return message(StatusCode::BAD_REQUEST, "Invalid category");
    }
    body["_id"] = json!(new_id());
    state.courses.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn list_courses(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let Some(user) = caller(&state, &headers) else {
        return message(StatusCode::UNAUTHORIZED, "No token provided");
    };
    let visible: Vec<Value> = state
        .courses
        .iter()
        .filter(|c| {
            user.role == "admin"
                || c["accessList"]
                    .as_array()
                    .map_or(false, |list| list.iter().any(|e| e == user.email.as_str()))
        })
        .cloned()
        .collect();
    Json(Value::Array(visible)).into_response()
}

async fn create_lesson(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if caller(&state, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "No token provided");
    }
    body["_id"] = json!(new_id());
    body["createdAt"] = json!("2025-01-01T00:00:00Z");
    // The server assigns ids to embedded content items.
    if let Some(contents) = body["contents"].as_array_mut() {
        for item in contents {
            item["_id"] = json!(new_id());
        }
    }
    state.lessons.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_lesson(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let state = state.lock().unwrap();
    match state.lessons.iter().find(|l| l["_id"] == id.as_str()) {
        Some(lesson) => Json(lesson.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Lesson not found"),
    }
}

async fn update_lesson(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    let mut state = state.lock().unwrap();
    if caller(&state, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "No token provided");
    }
    let Some(lesson) = state.lessons.iter_mut().find(|l| l["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Lesson not found");
    };
    for (key, value) in body {
        lesson[key.as_str()] = value;
    }
    Json(lesson.clone()).into_response()
}

async fn delete_lesson(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    if caller(&state, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "No token provided");
    }
    let before = state.lessons.len();
    state.lessons.retain(|l| l["_id"] != id.as_str());
    if state.lessons.len() == before {
        return message(StatusCode::NOT_FOUND, "Lesson not found");
    }
    message(StatusCode::OK, "Lesson deleted successfully")
}

async fn course_lessons(State(state): State<Shared>, Path(course_id): Path<String>) -> Response {
    let state = state.lock().unwrap();
    let lessons: Vec<Value> = state
        .lessons
        .iter()
        .filter(|l| l["courseId"] == course_id.as_str())
        .cloned()
        .collect();
    Json(Value::Array(lessons)).into_response()
}

async fn toggle_completion(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if !state.lessons.iter().any(|l| l["_id"] == id.as_str()) {
        return message(StatusCode::NOT_FOUND, "Lesson not found");
    }
    body["lessonId"] = json!(id);
    state.completions.push(body);
    message(StatusCode::OK, "Progress updated")
}

async fn create_quiz(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if caller(&state, &headers).is_none() {
        return message(StatusCode::UNAUTHORIZED, "No token provided");
    }
    if body["courseId"].as_str().is_none() {
        return message(StatusCode::BAD_REQUEST, "courseId is required");
    }
    body["_id"] = json!(new_id());
    state.quizzes.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn submit_answer(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    if !state.quizzes.iter().any(|q| q["_id"] == body["quizId"]) {
        return message(StatusCode::NOT_FOUND, "Quiz not found");
    }
    state.submissions.push(body);
    message(StatusCode::OK, "Answer submitted")
}

async fn list_users(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    Json(Value::Array(state.users.iter().map(user_json).collect())).into_response()
}

async fn get_user(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let state = state.lock().unwrap();
    match state.users.iter().find(|u| u.id == id) {
        Some(user) => Json(user_json(user)).into_response(),
        None => message(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn update_role(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let role = body["role"].as_str().unwrap_or_default().to_string();
    if role != "student" && role != "admin" {
        return message(StatusCode::BAD_REQUEST, "Role must be either 'student' or 'admin'");
    }
    let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
        return message(StatusCode::NOT_FOUND, "User not found");
    };
    user.role = role;
    Json(json!({ "message": "User role updated", "user": user_json(user) })).into_response()
}

//=========================================================================================
// Startup
//=========================================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/courses", post(create_course).get(list_courses))
        .route("/api/lessons", post(create_lesson))
        .route(
            "/api/lessons/{id}",
            get(get_lesson).put(update_lesson).delete(delete_lesson),
        )
        .route("/api/lessons/{id}/lessons", get(course_lessons))
        .route("/api/lessons/{id}/toggle-completion", put(toggle_completion))
        .route("/api/quizzes", post(create_quiz))
        .route("/api/quizzes/no-auth-submit-answer", post(submit_answer))
        .route("/api/user", get(list_users))
        .route("/api/user/{id}", get(get_user))
        .route("/api/user/{id}/role", put(update_role))
        .with_state(state)
}

/// Spawns the fake LMS on a random local port.
pub async fn spawn_server() -> FakeServer {
    let state = Shared::default();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeServer {
        base_url: format!("http://{}/api", addr),
        state,
    }
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        log_level: Level::INFO,
        request_timeout: Duration::from_secs(5),
        course_pause: Duration::from_millis(0),
        admin_email: Some("director@test.com".to_string()),
        admin_password: Some("Hola1234".to_string()),
        admin_name: "Director Académico".to_string(),
        student_count: 5,
        student_password: "password123".to_string(),
        test_user_count: 5,
        test_user_password: "testtest".to_string(),
        progress_student_count: 5,
        bulk_course_ids: Vec::new(),
        bulk_user_ids: Vec::new(),
        quizzes_per_course: 5,
        users_export_path: None::<PathBuf>,
        target_user_id: None,
        new_role: None,
    }
}

//! services/seeder/src/adapters/http.rs
//!
//! This module contains the adapter for the remote LMS REST API.
//! It implements the `LmsApi` port from the `core` crate on top of `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use lms_seed_core::domain::{
    AccountSpec, AnswerSubmission, AuthSession, AuthToken, CourseId, CourseRecord, Credentials,
    Lesson, LessonId, LessonUpdate, NewCourse, NewLesson, NewQuiz, QuizId, Role, UserId,
    UserSummary,
};
use lms_seed_core::ports::{LmsApi, PortError, PortResult};
use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `LmsApi` against the LMS HTTP API.
#[derive(Clone)]
pub struct HttpLmsAdapter {
    client: Client,
    base_url: String,
}

impl HttpLmsAdapter {
    /// Creates a new adapter whose requests time out after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder, token: Option<&AuthToken>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    /// Sends the request and returns the response headers and parsed body.
    /// Non-2xx statuses are mapped onto `PortError`; an empty body becomes `Null`.
    async fn send(&self, request: RequestBuilder) -> PortResult<(HeaderMap, Value)> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            debug!("LMS responded {}: {}", status, text);
            return Err(PortError::from_status(status.as_u16(), error_message(&text)));
        }

        if text.trim().is_empty() {
            return Ok((headers, Value::Null));
        }
        let body = serde_json::from_str(&text).map_err(|e| PortError::Decode(e.to_string()))?;
        Ok((headers, body))
    }

    async fn send_json(&self, request: RequestBuilder) -> PortResult<Value> {
        self.send(request).await.map(|(_, body)| body)
    }

    async fn send_as<T: DeserializeOwned>(&self, request: RequestBuilder) -> PortResult<T> {
        let body = self.send_json(request).await?;
        serde_json::from_value(body).map_err(|e| PortError::Decode(e.to_string()))
    }
}

//=========================================================================================
// Response Helpers
//=========================================================================================

fn transport_error(e: reqwest::Error) -> PortError {
    if e.is_connect() || e.is_timeout() {
        PortError::Connection(e.to_string())
    } else if e.is_decode() {
        PortError::Decode(e.to_string())
    } else {
        PortError::Unexpected(e.to_string())
    }
}

/// Pulls a readable message out of an error body: `message`, then `error`,
/// then the raw text.
fn error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|key| v.get(key).and_then(Value::as_str).map(String::from))
        })
        .unwrap_or_else(|| text.trim().to_string())
}

/// Reads `id`, then `_id`, accepting strings and numbers.
fn id_of(value: &Value) -> Option<String> {
    ["id", "_id"].iter().find_map(|key| match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Id of the user echoed by an auth response: `user.id|user._id`, then the top level.
fn user_id_of(body: &Value) -> Option<UserId> {
    body.get("user")
        .and_then(id_of)
        .or_else(|| id_of(body))
        .map(UserId::from)
}

fn token_from_cookie(headers: &HeaderMap) -> Option<AuthToken> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| c.trim().strip_prefix("token="))
        .filter(|t| !t.is_empty())
        .map(AuthToken::new)
}

/// Unwraps `{ "user": {...} }` envelopes.
fn user_payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("user").map_or(false, Value::is_object) => {
            map.remove("user").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn require_id(body: &Value) -> PortResult<String> {
    id_of(body).ok_or(PortError::MissingId)
}

//=========================================================================================
// `LmsApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl LmsApi for HttpLmsAdapter {
    async fn login(&self, credentials: &Credentials) -> PortResult<AuthSession> {
        let request = self.client.post(self.url("/auth/login")).json(credentials);
        let (headers, body) = self.send(request).await?;

        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(AuthToken::new)
            .or_else(|| token_from_cookie(&headers));

        Ok(AuthSession {
            token,
            user_id: user_id_of(&body),
        })
    }

    async fn register(&self, account: &AccountSpec) -> PortResult<Option<UserId>> {
        let request = self.client.post(self.url("/auth/register")).json(account);
        let body = self.send_json(request).await?;
        Ok(user_id_of(&body))
    }

    async fn create_course(&self, token: &AuthToken, course: &NewCourse) -> PortResult<CourseRecord> {
        let request = self.client.post(self.url("/courses")).json(course);
        let body = self.send_json(self.authorized(request, Some(token))).await?;
        Ok(CourseRecord {
            id: CourseId::new(require_id(&body)?),
            title: body.get("title").and_then(Value::as_str).map(String::from),
        })
    }

    async fn list_courses(&self, token: &AuthToken) -> PortResult<Vec<CourseRecord>> {
        let request = self.client.get(self.url("/courses"));
        let body = self.send_json(self.authorized(request, Some(token))).await?;
        let courses = body
            .as_array()
            .ok_or_else(|| PortError::Decode("expected an array of courses".to_string()))?;

        Ok(courses
            .iter()
            .filter_map(|course| {
                let id = id_of(course)?;
                let title = ["title", "name"]
                    .iter()
                    .find_map(|key| course.get(key).and_then(Value::as_str))
                    .map(String::from);
                Some(CourseRecord {
                    id: CourseId::new(id),
                    title,
                })
            })
            .collect())
    }

    async fn create_lesson(&self, token: &AuthToken, lesson: &NewLesson) -> PortResult<LessonId> {
        let request = self.client.post(self.url("/lessons")).json(lesson);
        let body = self.send_json(self.authorized(request, Some(token))).await?;
        Ok(LessonId::new(require_id(&body)?))
    }

    async fn get_lesson(&self, token: &AuthToken, lesson_id: &LessonId) -> PortResult<Lesson> {
        let request = self.client.get(self.url(&format!("/lessons/{}", lesson_id)));
        self.send_as(self.authorized(request, Some(token))).await
    }

    async fn update_lesson(
        &self,
        token: &AuthToken,
        lesson_id: &LessonId,
        update: &LessonUpdate,
    ) -> PortResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/lessons/{}", lesson_id)))
            .json(update);
        self.send(self.authorized(request, Some(token))).await?;
        Ok(())
    }

    async fn delete_lesson(&self, token: &AuthToken, lesson_id: &LessonId) -> PortResult<String> {
        let request = self.client.delete(self.url(&format!("/lessons/{}", lesson_id)));
        let body = self.send_json(self.authorized(request, Some(token))).await?;
        Ok(body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Lesson deleted")
            .to_string())
    }

    async fn list_course_lessons(&self, course_id: &CourseId) -> PortResult<Vec<Lesson>> {
        let request = self
            .client
            .get(self.url(&format!("/lessons/{}/lessons", course_id)));
        self.send_as(request).await
    }

    async fn toggle_completion(
        &self,
        lesson_id: &LessonId,
        user_id: &UserId,
        completed: bool,
    ) -> PortResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/lessons/{}/toggle-completion", lesson_id)))
            .json(&json!({ "userId": user_id, "completed": completed }));
        self.send(request).await?;
        Ok(())
    }

    async fn create_quiz(&self, token: &AuthToken, quiz: &NewQuiz) -> PortResult<QuizId> {
        let request = self.client.post(self.url("/quizzes")).json(quiz);
        let body = self.send_json(self.authorized(request, Some(token))).await?;
        Ok(QuizId::new(require_id(&body)?))
    }

    async fn submit_answer(&self, submission: &AnswerSubmission) -> PortResult<()> {
        let request = self
            .client
            .post(self.url("/quizzes/no-auth-submit-answer"))
            .json(submission);
        self.send(request).await?;
        Ok(())
    }

    async fn list_users(&self, token: Option<&AuthToken>) -> PortResult<Vec<UserSummary>> {
        let request = self.client.get(self.url("/user"));
        self.send_as(self.authorized(request, token)).await
    }

    async fn get_user(&self, token: Option<&AuthToken>, user_id: &UserId) -> PortResult<UserSummary> {
        let request = self.client.get(self.url(&format!("/user/{}", user_id)));
        let body = self.send_json(self.authorized(request, token)).await?;
        serde_json::from_value(user_payload(body)).map_err(|e| PortError::Decode(e.to_string()))
    }

    async fn update_user_role(
        &self,
        token: Option<&AuthToken>,
        user_id: &UserId,
        role: Role,
    ) -> PortResult<UserSummary> {
        let request = self
            .client
            .put(self.url(&format!("/user/{}/role", user_id)))
            .json(&json!({ "role": role }));
        let body = self.send_json(self.authorized(request, token)).await?;
        serde_json::from_value(user_payload(body)).map_err(|e| PortError::Decode(e.to_string()))
    }
}
